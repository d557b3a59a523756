//! Transform command implementation

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;
use vco_transform::ComponentOverrideTransformer;

use crate::config::load_options;

/// Arguments for the transform command
#[derive(Debug)]
pub struct TransformArgs {
    /// Module source file
    pub input: PathBuf,
    /// Module id, defaulting to the input path
    pub id: Option<String>,
    /// Options file
    pub config: Option<PathBuf>,
    /// Code destination; stdout when unset
    pub output: Option<PathBuf>,
    /// Source map destination
    pub map: Option<PathBuf>,
    /// Append the map to the code as a data URL
    pub inline_map: bool,
}

/// Execute the transform command
pub fn execute(args: TransformArgs) -> Result<()> {
    let options = load_options(args.config.as_deref())?;
    let transformer = ComponentOverrideTransformer::new(options)
        .context("Failed to set up the transformer")?;

    let code = fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read input file: {}", args.input.display()))?;
    let id = args
        .id
        .clone()
        .unwrap_or_else(|| args.input.display().to_string());

    let Some(output) = transformer.transform(&code, &id)? else {
        info!(id = %id, "module not transformed, copying it unchanged");
        return write_code(&args, &code);
    };

    let mut rendered = output.code;
    if args.inline_map {
        let url = output
            .map
            .to_url()
            .context("Failed to encode source map")?;
        rendered.push_str("\n//# sourceMappingURL=");
        rendered.push_str(&url);
    }
    write_code(&args, &rendered)?;

    if let Some(map_path) = &args.map {
        let json = output.map.to_json().context("Failed to encode source map")?;
        fs::write(map_path, json)
            .with_context(|| format!("Failed to write source map: {}", map_path.display()))?;
    }

    info!(id = %id, "transformed module");
    Ok(())
}

fn write_code(args: &TransformArgs, code: &str) -> Result<()> {
    match &args.output {
        Some(path) => fs::write(path, code)
            .with_context(|| format!("Failed to write output file: {}", path.display())),
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(code.as_bytes())
                .context("Failed to write to stdout")
        }
    }
}
