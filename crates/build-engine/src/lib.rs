//! fxpack Build Engine
//!
//! Runs the packaging pipeline: stale output removal, library staging,
//! external engine invocation and deployment.

pub mod ant_build;
pub mod classpath;
pub mod deploy;
pub mod runner;
pub mod staging;

pub use ant_build::{AntEngine, EngineOutput, InvocationResult, PackagingEngine, PackagingInvoker};
pub use classpath::ClasspathDiscovery;
pub use deploy::{DeployResult, DeployStep};
pub use runner::{PackageOutput, PackageRequest, PackageRunner};

use std::path::PathBuf;

/// Build errors
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Previous build output at {} could not be removed, clear it manually: {source}", path.display())]
    StalePreviousBuild {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Packaging failed with exit code {exit_code}:\n{log}")]
    PackagingFailure { exit_code: i32, log: String },
    #[error("Packaging engine not found: {0}")]
    EngineNotFound(String),
    #[error("Compiled classes directory not found: {}", .0.display())]
    ClassesNotFound(PathBuf),
    #[error("Library archive not found: {}", .0.display())]
    MissingLibrary(PathBuf),
    #[error("Deploy directory is not configured (set `output.deploy-dir`)")]
    DeployDirNotConfigured,
    #[error("Deploy failed: {cause}")]
    DeployFailure { cause: String },
    #[error("Buildfile error: {0}")]
    Buildfile(#[from] fxpack_buildfile::WriteError),
    #[error("Configuration error: {0}")]
    Config(#[from] fxpack_core::ConfigError),
    #[error("Invalid classpath pattern: {0}")]
    Pattern(#[from] glob::PatternError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
