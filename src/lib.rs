//! fxpack - JavaFX application packaging
//!
//! Resolves a declarative packaging configuration, turns it into an Ant
//! buildfile for the JavaFX packaging tasks, runs Ant and optionally deploys
//! the result.
//!
//! ## Architecture
//!
//! - `fxpack-core`: settings, naming and configuration resolution
//! - `fxpack-buildfile`: packaging descriptor and buildfile serialization
//! - `fxpack-build-engine`: staging, engine invocation and deployment

#![warn(clippy::all)]

pub mod commands;
pub mod project;

// Re-export main components for library usage
pub use fxpack_core as core;
pub use fxpack_buildfile as buildfile;
pub use fxpack_build_engine as build;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
