mod builder;
mod defaults;
mod file;
mod models;

pub use builder::{CliOverrides, build_config};
pub use models::{AppConfig, ComparisonSettings, DatasetSettings, ModelSettings, ViewSettings};
