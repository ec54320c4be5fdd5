//! Loading pipeline configuration from TOML files.

use std::path::Path;

use rtx_model::PipelineConfig;
use tracing::info;

use crate::error::{IngestError, Result};

/// Load and validate a configuration file. Missing keys take their defaults.
pub fn load_config(path: &Path) -> Result<PipelineConfig> {
    let text = std::fs::read_to_string(path).map_err(|source| IngestError::io(path, source))?;
    let config: PipelineConfig = toml::from_str(&text).map_err(|source| IngestError::Toml {
        path: path.to_path_buf(),
        source,
    })?;
    config.validate()?;
    info!(
        config_file = %path.display(),
        program_years = config.program_years.len(),
        "loaded pipeline config"
    );
    Ok(config)
}

/// Load `path` when given, otherwise the built-in configuration.
pub fn load_config_or_default(path: Option<&Path>) -> Result<PipelineConfig> {
    match path {
        Some(path) => load_config(path),
        None => Ok(PipelineConfig::default()),
    }
}

pub fn config_to_toml(config: &PipelineConfig) -> Result<String> {
    Ok(toml::to_string_pretty(config)?)
}
