//! vco CLI - Main entry point

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vco::commands;

#[derive(Parser)]
#[command(name = "vco")]
#[command(version)]
#[command(about = "Make Vue component imports overridable at runtime", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rewrite the component imports of one module
    Transform {
        /// Module source file
        input: PathBuf,

        /// Module id to transform as (defaults to the input path)
        #[arg(long)]
        id: Option<String>,

        /// TOML file with transformer options
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Write code to FILE instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write the source map as JSON to FILE
        #[arg(long)]
        map: Option<PathBuf>,

        /// Append the source map to the code as a data URL comment
        #[arg(long)]
        inline_map: bool,
    },

    /// Report whether module ids are excluded by the configuration
    Excluded {
        /// Module ids to check
        #[arg(required = true)]
        ids: Vec<String>,

        /// TOML file with transformer options
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vco=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Transform {
            input,
            id,
            config,
            output,
            map,
            inline_map,
        } => commands::transform::execute(commands::transform::TransformArgs {
            input,
            id,
            config,
            output,
            map,
            inline_map,
        }),
        Commands::Excluded { ids, config } => {
            commands::excluded::execute(commands::excluded::ExcludedArgs { ids, config })
        }
    }
}
