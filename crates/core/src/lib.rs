//! fxpack Core - Packaging configuration model
//!
//! This crate turns user-supplied settings into a fully resolved,
//! immutable packaging configuration shared by the rest of fxpack.

pub mod config;
pub mod error;
pub mod naming;
pub mod resolver;
pub mod settings;

pub use config::{
    Dimensions, EngineConfig, Info, Misc, NativeBundles, Output, PackagingConfig, Permissions,
    Signing, SigningCredentials, Template, ANT_JAVAFX_JAR, BUILDFILE_NAME, RUNTIME_LIBRARY,
    STAGING_DIR_NAME,
};
pub use error::{ConfigError, Result, SigningField};
pub use naming::{default_naming, ArtifactId, ModuleId, NamingFn, NamingPattern};
pub use resolver::{ConfigResolver, ProjectIdentity};
pub use settings::UserSettings;

/// fxpack version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
