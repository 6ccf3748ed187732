//! fxpack - JavaFX application packaging
//!
//! Command-line entry point.

use std::path::PathBuf;
use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use fxpack::commands::{
    BuildfileCommand, CleanCommand, ConfigCommand, DeployCommand, PackageCommand,
};
use fxpack::core::ConfigError;
use fxpack::build::BuildError;

/// Application name
pub const APP_NAME: &str = "fxpack";

#[derive(Parser)]
#[command(name = "fxpack", version, about = "Package and deploy JavaFX applications")]
struct Cli {
    /// Project directory containing fxpack.toml
    #[arg(short, long, global = true, default_value = ".", env = "FXPACK_PROJECT")]
    project: PathBuf,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Package the application with the JavaFX Ant tasks
    Package,
    /// Package, then copy the result into the deploy directory
    Deploy,
    /// Print the generated Ant buildfile without running it
    Buildfile {
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Remove previous packaging output
    Clean,
    /// Print the resolved packaging configuration
    Config {
        /// Print as JSON instead of TOML
        #[arg(long)]
        json: bool,
    },
}

/// Main entry point
#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli).await {
        error!("{:#}", e);
        if let Some(hint) = e.downcast_ref::<ConfigError>().and_then(ConfigError::hint) {
            info!("hint: {}", hint);
        }
        if let Some(BuildError::StalePreviousBuild { path, .. }) = e.downcast_ref::<BuildError>() {
            info!("hint: remove {} and run again", path.display());
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let project_path = cli.project;

    match cli.command {
        Commands::Package => {
            let output = PackageCommand { project_path }.execute().await?;
            info!(
                "{} packaged {:?} ({} libraries{}) in {:.2}s",
                APP_NAME,
                output.jar_file,
                output.libraries,
                if output.signed { ", signed" } else { "" },
                output.duration_secs
            );
        }
        Commands::Deploy => {
            let (_, deployed) = DeployCommand { project_path }.execute().await?;
            info!("Deployed {} files to {:?}", deployed.files, deployed.deployed_to);
        }
        Commands::Buildfile { output } => {
            let xml = BuildfileCommand { project_path }.execute().await?;
            match output {
                Some(path) => {
                    tokio::fs::write(&path, xml).await?;
                    info!("Wrote buildfile to {:?}", path);
                }
                None => println!("{}", xml),
            }
        }
        Commands::Clean => {
            CleanCommand { project_path }.execute().await?;
        }
        Commands::Config { json } => {
            let rendered = ConfigCommand { project_path, json }.execute().await?;
            println!("{}", rendered);
        }
    }

    Ok(())
}
