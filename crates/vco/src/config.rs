//! Loading transformer options from disk

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use vco_transform::TransformOptions;

/// Read options from a TOML file, or use the defaults when no file is given
pub fn load_options(path: Option<&Path>) -> Result<TransformOptions> {
    let Some(path) = path else {
        return Ok(TransformOptions::default());
    };

    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let options = TransformOptions::from_toml_str(&text)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

    tracing::debug!(path = %path.display(), "loaded transformer options");
    Ok(options)
}
