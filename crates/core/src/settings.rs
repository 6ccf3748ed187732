//! User Settings
//!
//! The `[javafx]` table of a project file, exactly as the user wrote it.
//! Every field is optional here; defaults are applied by the resolver.

use std::collections::BTreeMap;
use std::path::PathBuf;
use serde::{Deserialize, Serialize};

use crate::config::NativeBundles;

/// Unresolved packaging settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct UserSettings {
    /// JDK or JavaFX SDK directory containing `lib/ant-javafx.jar`
    pub sdk_dir: Option<PathBuf>,
    /// Application entry point
    pub main_class: Option<String>,
    /// Skip the language runtime libraries and drop the language version from the artifact name
    pub java_only: Option<bool>,
    pub output: OutputSettings,
    pub template: TemplateSettings,
    pub dimensions: DimensionSettings,
    pub permissions: PermissionSettings,
    pub signing: SigningSettings,
    pub info: InfoSettings,
    pub bundling: BundlingSettings,
    pub misc: MiscSettings,
    pub engine: EngineSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct OutputSettings {
    /// Naming pattern, e.g. `"{artifact}-{revision}"`
    pub artifact_base_name: Option<String>,
    /// Explicit artifact name; wins over any naming pattern
    pub artifact_base_name_value: Option<String>,
    /// Target directory for `fxpack deploy`
    pub deploy_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct TemplateSettings {
    pub file: Option<PathBuf>,
    pub dest_file: Option<PathBuf>,
    pub placeholder_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct DimensionSettings {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub embedded_width: Option<String>,
    pub embedded_height: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct PermissionSettings {
    pub elevated: Option<bool>,
    pub cache_certificates: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct SigningSettings {
    pub key_store: Option<PathBuf>,
    pub store_pass: Option<String>,
    pub alias: Option<String>,
    pub key_pass: Option<String>,
    pub store_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct InfoSettings {
    pub title: Option<String>,
    pub vendor: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct BundlingSettings {
    pub native_bundles: Option<NativeBundles>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct MiscSettings {
    pub css_to_bin: Option<bool>,
    pub verbose: Option<bool>,
    pub jvm_options: Vec<String>,
    pub jvm_properties: BTreeMap<String, String>,
}

/// How to run the external Ant engine
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct EngineSettings {
    pub executable: Option<PathBuf>,
    pub java_home: Option<PathBuf>,
    pub args: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_kebab_case_table() {
        let toml = r#"
            sdk-dir = "/opt/jdk"
            main-class = "demo.Main"
            java-only = true

            [output]
            deploy-dir = "/srv/www"

            [template]
            file = "index.html"

            [dimensions]
            width = 1024
            embedded-height = "480px"

            [permissions]
            elevated = true
            cache-certificates = true

            [signing]
            key-store = "keys.jks"
            store-pass = "secret"

            [bundling]
            native-bundles = "image"

            [misc]
            jvm-options = ["-Xmx512m"]
        "#;

        let settings: UserSettings = toml::from_str(toml).unwrap();
        assert_eq!(settings.sdk_dir, Some(PathBuf::from("/opt/jdk")));
        assert_eq!(settings.main_class.as_deref(), Some("demo.Main"));
        assert_eq!(settings.java_only, Some(true));
        assert_eq!(settings.output.deploy_dir, Some(PathBuf::from("/srv/www")));
        assert_eq!(settings.template.file, Some(PathBuf::from("index.html")));
        assert_eq!(settings.dimensions.width, Some(1024));
        assert_eq!(settings.dimensions.height, None);
        assert_eq!(settings.dimensions.embedded_height.as_deref(), Some("480px"));
        assert_eq!(settings.permissions.cache_certificates, Some(true));
        assert_eq!(settings.signing.store_pass.as_deref(), Some("secret"));
        assert_eq!(settings.bundling.native_bundles, Some(NativeBundles::Image));
        assert_eq!(settings.misc.jvm_options, vec!["-Xmx512m".to_string()]);
    }

    #[test]
    fn test_empty_table_is_all_unset() {
        let settings: UserSettings = toml::from_str("").unwrap();
        assert_eq!(settings, UserSettings::default());
    }
}
