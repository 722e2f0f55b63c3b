use plmbench::align::{AlignerOptions, AlignmentMethod, ExternalTool, ToolLocator};
use plmbench::model::GenerationOptions;
use plmbench::view::MoleculeView;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub model: ModelSettings,
    pub comparison: ComparisonSettings,
    pub datasets: DatasetSettings,
    pub view: ViewSettings,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelSettings {
    pub endpoint: String,
    pub model_id: String,
    /// Environment variables searched for the API token, in order.
    pub token_envs: Vec<String>,
    pub num_steps: usize,
    pub temperature: Option<f64>,
}

impl ModelSettings {
    pub fn generation_options(&self) -> GenerationOptions {
        let options = GenerationOptions::new().num_steps(self.num_steps);
        match self.temperature {
            Some(temperature) => options.temperature(temperature),
            None => options,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonSettings {
    pub method: AlignmentMethod,
    pub options: AlignerOptions,
    pub tmalign_path: Option<PathBuf>,
    pub usalign_path: Option<PathBuf>,
}

impl ComparisonSettings {
    /// Tool lookup: configured paths first, then the data directory's `tools/`, then `PATH`.
    pub fn locator(&self, tools_dir: &Path) -> ToolLocator {
        let mut locator = ToolLocator::new().with_search_dir(tools_dir);
        if let Some(path) = &self.tmalign_path {
            locator = locator.with_override(ExternalTool::TmAlign, path);
        }
        if let Some(path) = &self.usalign_path {
            locator = locator.with_override(ExternalTool::UsAlign, path);
        }
        locator
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DatasetSettings {
    pub casp_repository: String,
    pub rcsb_url: String,
    pub thermomutdb_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewSettings {
    pub width: u32,
    pub height: u32,
}

impl ViewSettings {
    pub fn new_view(&self) -> MoleculeView {
        MoleculeView::new(self.width, self.height)
    }
}
