use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::warn;

/// Events emitted while a dataset table is being built.
#[derive(Debug, Clone, PartialEq)]
pub enum Progress {
    /// A new stage, e.g. one CASP round, begins.
    StageStart { name: String },
    /// The stage has `total` items to process.
    ItemsStart { total: u64 },
    ItemDone,
    /// An item was kept incomplete or skipped.
    Warning(String),
    StageFinish,
}

pub type ProgressCallback = Box<dyn Fn(Progress) + Send + Sync>;

/// Renders [`Progress`] events on a single terminal bar.
#[derive(Clone)]
pub struct CliProgressHandler {
    bar: ProgressBar,
    stage: Arc<Mutex<String>>,
    warnings: Arc<AtomicUsize>,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        Self::with_draw_target(ProgressDrawTarget::stderr())
    }

    pub fn with_draw_target(target: ProgressDrawTarget) -> Self {
        let bar = ProgressBar::with_draw_target(None, target).with_style(Self::spinner_style());
        Self {
            bar,
            stage: Arc::new(Mutex::new(String::new())),
            warnings: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn get_callback(&self) -> ProgressCallback {
        let handler = self.clone();
        Box::new(move |event| handler.handle(event))
    }

    fn handle(&self, event: Progress) {
        match event {
            Progress::StageStart { name } => {
                self.bar.reset();
                self.bar.set_length(0);
                self.bar.set_style(Self::spinner_style());
                self.bar.enable_steady_tick(Duration::from_millis(80));
                self.bar.set_message(name.clone());
                self.warnings.store(0, Ordering::Relaxed);
                match self.stage.lock() {
                    Ok(mut stage) => *stage = name,
                    Err(_) => warn!("Progress stage lock was poisoned."),
                }
            }
            Progress::ItemsStart { total } => {
                self.bar.disable_steady_tick();
                self.bar.set_style(Self::bar_style());
                self.bar.set_length(total);
                self.bar.set_position(0);
            }
            Progress::ItemDone => self.bar.inc(1),
            Progress::Warning(message) => {
                self.warnings.fetch_add(1, Ordering::Relaxed);
                self.bar.println(format!("  ! {}", message));
            }
            Progress::StageFinish => {
                self.bar.disable_steady_tick();
                let stage = self.stage.lock().map(|s| s.clone()).unwrap_or_default();
                self.bar.finish_with_message(Self::summary(
                    &stage,
                    self.bar.position(),
                    self.warnings.load(Ordering::Relaxed),
                ));
            }
        }
    }

    fn summary(stage: &str, done: u64, warnings: usize) -> String {
        match warnings {
            0 => format!("✓ {}: {} item(s)", stage, done),
            n => format!("✓ {}: {} item(s), {} warning(s)", stage, done, n),
        }
    }

    pub fn spinner_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .expect("static spinner template")
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::with_template("{msg:<12} [{bar:40.cyan/blue}] {pos}/{len} [{elapsed}]")
            .expect("static bar template")
            .progress_chars("=>-")
    }

    pub fn download_style() -> ProgressStyle {
        ProgressStyle::with_template("{msg} [{bar:30.green/white}] {bytes}/{total_bytes}")
            .expect("static download template")
            .progress_chars("=>-")
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}
