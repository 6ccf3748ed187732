//! fxpack Buildfile
//!
//! Builds the packaging descriptor for a resolved configuration and
//! serializes it into an Ant buildfile for the JavaFX Ant tasks.

pub mod builder;
pub mod descriptor;
pub mod writer;

pub use builder::{filter_libraries, DescriptorBuilder};
pub use descriptor::{
    ApplicationInstruction, DeployInstruction, Descriptor, FileSet, Instruction, JarInstruction,
    LibraryArchive, OutputLayout, ResourcesInstruction, SignInstruction, SignTarget,
    TemplateInstruction, APP_RESOURCES_ID, BUILDFILE_NAME, STAGING_DIR_NAME,
};
pub use writer::{BuildfileWriter, WriteError};
