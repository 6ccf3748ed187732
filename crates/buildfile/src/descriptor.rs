//! Packaging Descriptor
//!
//! Plain data describing what the external engine has to do. Built once by
//! the [`DescriptorBuilder`](crate::builder::DescriptorBuilder), serialized by
//! the [`BuildfileWriter`](crate::writer::BuildfileWriter).

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use fxpack_core::{Dimensions, Info, NativeBundles, Permissions, SigningCredentials};

pub use fxpack_core::{BUILDFILE_NAME, STAGING_DIR_NAME};

/// Id of the shared application resources
pub const APP_RESOURCES_ID: &str = "appRes";

/// Where everything lands for one artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    pub output_root: PathBuf,
    /// `<output_root>/<artifact_base_name>`
    pub output_dir: PathBuf,
    /// `<output_dir>/<artifact_base_name>.jar`
    pub jar_file: PathBuf,
    /// `<output_root>/lib`
    pub staging_dir: PathBuf,
    /// `<output_root>/build.xml`
    pub buildfile: PathBuf,
}

impl OutputLayout {
    pub fn new(output_root: &Path, artifact_base_name: &str) -> Self {
        let output_dir = output_root.join(artifact_base_name);
        Self {
            output_root: output_root.to_path_buf(),
            jar_file: output_dir.join(format!("{}.jar", artifact_base_name)),
            output_dir,
            staging_dir: output_root.join(STAGING_DIR_NAME),
            buildfile: output_root.join(BUILDFILE_NAME),
        }
    }
}

/// Library archive and its staged copy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryArchive {
    pub source: PathBuf,
    pub staged: PathBuf,
}

impl LibraryArchive {
    /// File name of the archive
    pub fn file_name(&self) -> String {
        self.staged
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    }
}

/// Files selected under a base directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSet {
    pub dir: PathBuf,
    pub includes: String,
}

impl FileSet {
    pub fn new(dir: impl Into<PathBuf>, includes: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            includes: includes.into(),
        }
    }
}

/// Application identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationInstruction {
    pub id: String,
    pub name: String,
    pub main_class: String,
    pub version: Option<String>,
    pub jvm_options: Vec<String>,
    pub jvm_properties: BTreeMap<String, String>,
}

impl ApplicationInstruction {
    pub fn has_platform_settings(&self) -> bool {
        !self.jvm_options.is_empty() || !self.jvm_properties.is_empty()
    }
}

/// Libraries and compiled classes that make up the application
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourcesInstruction {
    pub id: String,
    pub libraries: Vec<FileSet>,
    pub classes_dir: PathBuf,
}

/// Assemble the application JAR
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JarInstruction {
    pub dest_file: PathBuf,
    pub application_ref: String,
    pub resources_ref: String,
    pub css_to_bin: bool,
}

/// What a signing step applies to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignTarget {
    Jar(PathBuf),
    Directory(FileSet),
}

/// Sign JARs with the resolved credentials
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignInstruction {
    pub target: SignTarget,
    pub credentials: SigningCredentials,
}

/// HTML template substitution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateInstruction {
    pub file: PathBuf,
    pub dest_file: PathBuf,
    pub placeholder_id: String,
}

/// Produce the deployable package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployInstruction {
    pub out_dir: PathBuf,
    pub out_file: String,
    pub dimensions: Dimensions,
    pub permissions: Permissions,
    pub info: Info,
    pub native_bundles: NativeBundles,
    pub verbose: bool,
    pub application_ref: String,
    pub resources: Vec<FileSet>,
    pub template: Option<TemplateInstruction>,
}

/// One packaging step, in execution order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    Application(ApplicationInstruction),
    Resources(ResourcesInstruction),
    Jar(JarInstruction),
    Sign(SignInstruction),
    Deploy(DeployInstruction),
}

impl Instruction {
    pub fn kind(&self) -> &'static str {
        match self {
            Instruction::Application(_) => "application",
            Instruction::Resources(_) => "resources",
            Instruction::Jar(_) => "jar",
            Instruction::Sign(_) => "sign",
            Instruction::Deploy(_) => "deploy",
        }
    }
}

/// Complete packaging instructions for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descriptor {
    /// Project name in the buildfile; the artifact base name
    pub name: String,
    /// JavaFX Ant task library
    pub ant_lib: PathBuf,
    pub layout: OutputLayout,
    /// Libraries to stage before the engine runs
    pub libraries: Vec<LibraryArchive>,
    pub instructions: Vec<Instruction>,
}

impl Descriptor {
    pub fn resources(&self, id: &str) -> Option<&ResourcesInstruction> {
        self.instructions.iter().find_map(|i| match i {
            Instruction::Resources(r) if r.id == id => Some(r),
            _ => None,
        })
    }

    pub fn signing(&self) -> impl Iterator<Item = &SignInstruction> {
        self.instructions.iter().filter_map(|i| match i {
            Instruction::Sign(s) => Some(s),
            _ => None,
        })
    }

    pub fn deploy(&self) -> Option<&DeployInstruction> {
        self.instructions.iter().find_map(|i| match i {
            Instruction::Deploy(d) => Some(d),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout() {
        let layout = OutputLayout::new(Path::new("/work/target"), "demo");
        assert_eq!(layout.output_dir, PathBuf::from("/work/target/demo"));
        assert_eq!(layout.jar_file, PathBuf::from("/work/target/demo/demo.jar"));
        assert_eq!(layout.staging_dir, PathBuf::from("/work/target/lib"));
        assert_eq!(layout.buildfile, PathBuf::from("/work/target/build.xml"));
    }
}
