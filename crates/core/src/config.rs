//! Packaging Configuration
//!
//! The fully resolved, immutable configuration for one packaging run:
//! - SDK location and application entry point
//! - Output naming and deploy target
//! - HTML template substitution
//! - Window and embedded dimensions
//! - Permissions and signing credentials

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};

/// Library inside the SDK that provides the JavaFX Ant tasks
pub const ANT_JAVAFX_JAR: &str = "ant-javafx.jar";

/// Runtime library that ships with the target JRE and must never be bundled
pub const RUNTIME_LIBRARY: &str = "jfxrt.jar";

/// Placeholder id used when the template settings leave it unset
pub const DEFAULT_PLACEHOLDER_ID: &str = "javafx";

/// Keystore type used when signing is required but no type was given
pub const DEFAULT_STORE_TYPE: &str = "jks";

/// Staging directory for library archives, relative to the output root
pub const STAGING_DIR_NAME: &str = "lib";

/// Serialized buildfile, relative to the output root
pub const BUILDFILE_NAME: &str = "build.xml";

/// Expected location of the JavaFX Ant library for an SDK directory
pub fn ant_lib_path(sdk_dir: &Path) -> PathBuf {
    sdk_dir.join("lib").join(ANT_JAVAFX_JAR)
}

/// Resolved packaging configuration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PackagingConfig {
    /// SDK directory containing `lib/ant-javafx.jar`
    pub sdk_dir: PathBuf,
    /// Application main class
    pub main_class: String,
    /// Java-only project (no language runtime libraries)
    pub java_only: bool,
    pub output: Output,
    pub template: Template,
    pub dimensions: Dimensions,
    pub permissions: Permissions,
    pub signing: Signing,
    pub info: Info,
    pub native_bundles: NativeBundles,
    pub misc: Misc,
    pub engine: EngineConfig,
}

impl PackagingConfig {
    /// Path to the JavaFX Ant task library
    pub fn ant_lib(&self) -> PathBuf {
        ant_lib_path(&self.sdk_dir)
    }

    /// Name shared by the output JAR, output directory and deploy subdirectory
    pub fn artifact_base_name(&self) -> &str {
        &self.output.artifact_base_name_value
    }

    /// Signing credentials, present only when elevated permissions were requested
    pub fn signing_credentials(&self) -> Option<SigningCredentials> {
        if self.permissions.elevated {
            self.signing.credentials()
        } else {
            None
        }
    }
}

/// Output naming and deployment target
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Output {
    pub artifact_base_name_value: String,
    pub deploy_dir: Option<PathBuf>,
}

/// HTML template substitution
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Template {
    pub file: Option<PathBuf>,
    /// Falls back to `file` during resolution
    pub dest_file: Option<PathBuf>,
    pub placeholder_id: String,
}

impl Template {
    /// Input and destination paths, if a template is configured
    pub fn paths(&self) -> Option<(&Path, &Path)> {
        let file = self.file.as_deref()?;
        let dest = self.dest_file.as_deref().unwrap_or(file);
        Some((file, dest))
    }
}

impl Default for Template {
    fn default() -> Self {
        Self {
            file: None,
            dest_file: None,
            placeholder_id: DEFAULT_PLACEHOLDER_ID.to_string(),
        }
    }
}

/// Window size and embedded (browser) size
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
    pub embedded_width: String,
    pub embedded_height: String,
}

impl Default for Dimensions {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            embedded_width: "100%".to_string(),
            embedded_height: "100%".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Permissions {
    /// Request trusted execution; requires signing
    pub elevated: bool,
    pub cache_certificates: bool,
}

/// Signing fields at rest. Only validated when elevated permissions are requested.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Signing {
    pub key_store: Option<PathBuf>,
    #[serde(skip_serializing)]
    pub store_pass: Option<String>,
    pub alias: Option<String>,
    #[serde(skip_serializing)]
    pub key_pass: Option<String>,
    pub store_type: Option<String>,
}

impl Signing {
    /// Complete credentials, if every mandatory field is present
    pub fn credentials(&self) -> Option<SigningCredentials> {
        Some(SigningCredentials {
            key_store: self.key_store.clone()?,
            store_pass: self.store_pass.clone()?,
            alias: self.alias.clone()?,
            key_pass: self.key_pass.clone()?,
            store_type: self
                .store_type
                .clone()
                .unwrap_or_else(|| DEFAULT_STORE_TYPE.to_string()),
        })
    }
}

/// Signing fields with every value present
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningCredentials {
    pub key_store: PathBuf,
    pub store_pass: String,
    pub alias: String,
    pub key_pass: String,
    pub store_type: String,
}

/// Application metadata shown by installers and the browser plugin
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Info {
    pub title: String,
    pub vendor: Option<String>,
    pub description: Option<String>,
}

/// Native bundle selection passed to the deploy task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NativeBundles {
    #[default]
    None,
    All,
    Image,
    Installer,
    Exe,
    Msi,
    Dmg,
    Rpm,
    Deb,
}

impl NativeBundles {
    pub fn as_str(&self) -> &'static str {
        match self {
            NativeBundles::None => "none",
            NativeBundles::All => "all",
            NativeBundles::Image => "image",
            NativeBundles::Installer => "installer",
            NativeBundles::Exe => "exe",
            NativeBundles::Msi => "msi",
            NativeBundles::Dmg => "dmg",
            NativeBundles::Rpm => "rpm",
            NativeBundles::Deb => "deb",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Misc {
    /// Convert CSS stylesheets to binary form inside the JAR
    pub css_to_bin: bool,
    /// Ask the engine for verbose output
    pub verbose: bool,
    pub jvm_options: Vec<String>,
    pub jvm_properties: BTreeMap<String, String>,
}

/// External engine invocation settings
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct EngineConfig {
    /// Ant executable; looked up on PATH when unset
    pub executable: Option<PathBuf>,
    pub java_home: Option<PathBuf>,
    pub args: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let dims = Dimensions::default();
        assert_eq!((dims.width, dims.height), (800, 600));
        assert_eq!(dims.embedded_width, "100%");
        assert_eq!(dims.embedded_height, "100%");

        let template = Template::default();
        assert_eq!(template.placeholder_id, "javafx");
        assert!(template.paths().is_none());
    }

    #[test]
    fn test_template_dest_falls_back_to_file() {
        let template = Template {
            file: Some(PathBuf::from("t.html")),
            ..Default::default()
        };
        let (file, dest) = template.paths().unwrap();
        assert_eq!(file, Path::new("t.html"));
        assert_eq!(dest, Path::new("t.html"));
    }

    #[test]
    fn test_credentials_default_store_type() {
        let signing = Signing {
            key_store: Some(PathBuf::from("keys.jks")),
            store_pass: Some("storepw".into()),
            alias: Some("me".into()),
            key_pass: Some("keypw".into()),
            store_type: None,
        };
        let creds = signing.credentials().unwrap();
        assert_eq!(creds.store_type, "jks");

        let partial = Signing {
            alias: None,
            ..signing
        };
        assert!(partial.credentials().is_none());
    }

    #[test]
    fn test_ant_lib_path() {
        assert_eq!(
            ant_lib_path(Path::new("/opt/jdk")),
            PathBuf::from("/opt/jdk/lib/ant-javafx.jar")
        );
    }
}
