//! Excluded command implementation

use std::path::PathBuf;

use anyhow::{Context, Result};
use vco_transform::ComponentOverrideTransformer;

use crate::config::load_options;

/// Arguments for the excluded command
#[derive(Debug)]
pub struct ExcludedArgs {
    pub ids: Vec<String>,
    pub config: Option<PathBuf>,
}

/// Exclusion verdict for each id, in input order
pub fn check(args: &ExcludedArgs) -> Result<Vec<(String, bool)>> {
    let options = load_options(args.config.as_deref())?;
    let transformer = ComponentOverrideTransformer::new(options)
        .context("Failed to set up the transformer")?;

    Ok(args
        .ids
        .iter()
        .map(|id| (id.clone(), transformer.is_excluded("", id)))
        .collect())
}

/// Execute the excluded command
pub fn execute(args: ExcludedArgs) -> Result<()> {
    for (id, excluded) in check(&args)? {
        let verdict = if excluded { "excluded" } else { "included" };
        println!("{verdict}\t{id}");
    }
    Ok(())
}
