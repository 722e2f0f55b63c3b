use plmbench::align::AlignmentMethod;
use plmbench::datasets::casp::CASP_DATASETS_REPOSITORY;
use plmbench::datasets::thermomutdb::THERMOMUTDB_API_URL;
use plmbench::model::config::DEFAULT_NUM_STEPS;
use plmbench::view::DEFAULT_VIEW_SIZE;

pub struct DefaultsConfig {
    pub endpoint: String,
    pub model_id: String,
    pub token_env: String,
    pub fallback_token_env: String,
    pub num_steps: usize,
    pub method: AlignmentMethod,
    pub multimer_mode: u8,
    pub ter_mode: u8,
    pub average_length: bool,
    pub casp_repository: String,
    pub rcsb_url: String,
    pub thermomutdb_url: String,
    pub view_width: u32,
    pub view_height: u32,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://forge.evolutionaryscale.ai/api/v1/generate".to_string(),
            model_id: "esm3-open".to_string(),
            token_env: "ESM_API_TOKEN".to_string(),
            fallback_token_env: "HF_TOKEN".to_string(),
            num_steps: DEFAULT_NUM_STEPS,
            method: AlignmentMethod::UsAlign,
            multimer_mode: 1,
            ter_mode: 0,
            average_length: false,
            casp_repository: CASP_DATASETS_REPOSITORY.to_string(),
            rcsb_url: "https://files.rcsb.org/download".to_string(),
            thermomutdb_url: THERMOMUTDB_API_URL.to_string(),
            view_width: DEFAULT_VIEW_SIZE,
            view_height: DEFAULT_VIEW_SIZE,
        }
    }
}
