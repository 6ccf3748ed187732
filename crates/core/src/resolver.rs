//! Configuration Resolver
//!
//! Merges user settings with defaults, validates the combinations that matter
//! and produces an immutable [`PackagingConfig`].

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{
    ant_lib_path, Dimensions, EngineConfig, Info, Misc, Output, PackagingConfig, Permissions,
    Signing, Template, BUILDFILE_NAME, DEFAULT_PLACEHOLDER_ID, DEFAULT_STORE_TYPE,
    STAGING_DIR_NAME,
};
use crate::error::{ConfigError, Result, SigningField};
use crate::naming::{default_naming, ArtifactId, ModuleId, NamingFn};
use crate::settings::UserSettings;

/// Identity of the project being packaged
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProjectIdentity {
    pub module: ModuleId,
    pub artifact: ArtifactId,
    /// Language version mixed into the default artifact name (e.g. "2.13")
    pub language_version: Option<String>,
}

/// Resolves [`UserSettings`] into a [`PackagingConfig`]
pub struct ConfigResolver {
    identity: ProjectIdentity,
    naming: Option<NamingFn>,
}

impl ConfigResolver {
    /// Create a resolver for a project
    pub fn new(identity: ProjectIdentity) -> Self {
        Self {
            identity,
            naming: None,
        }
    }

    /// Replace the default naming function
    pub fn with_naming(mut self, naming: NamingFn) -> Self {
        self.naming = Some(naming);
        self
    }

    /// Resolve settings, applying defaults and validating them
    pub fn resolve(&self, settings: &UserSettings) -> Result<PackagingConfig> {
        let main_class = settings
            .main_class
            .clone()
            .filter(|c| !c.trim().is_empty())
            .ok_or(ConfigError::MissingSetting("main-class"))?;

        let sdk_dir = settings
            .sdk_dir
            .clone()
            .ok_or(ConfigError::MissingSetting("sdk-dir"))?;
        let ant_lib = ant_lib_path(&sdk_dir);
        if !ant_lib.is_file() {
            return Err(ConfigError::MissingSdk { expected: ant_lib });
        }

        let java_only = settings.java_only.unwrap_or(false);
        let permissions = Permissions {
            elevated: settings.permissions.elevated.unwrap_or(false),
            cache_certificates: settings.permissions.cache_certificates.unwrap_or(false),
        };

        let signing = resolve_signing(settings, permissions.elevated)?;
        let dimensions = resolve_dimensions(settings)?;
        let artifact_base_name_value = self.artifact_base_name(settings, java_only)?;
        debug!("Artifact base name: {}", artifact_base_name_value);

        let template = Template {
            file: settings.template.file.clone(),
            dest_file: settings
                .template
                .dest_file
                .clone()
                .or_else(|| settings.template.file.clone()),
            placeholder_id: settings
                .template
                .placeholder_id
                .clone()
                .unwrap_or_else(|| DEFAULT_PLACEHOLDER_ID.to_string()),
        };

        let info = Info {
            title: settings
                .info
                .title
                .clone()
                .unwrap_or_else(|| self.identity.module.name.clone()),
            vendor: settings.info.vendor.clone(),
            description: settings.info.description.clone(),
        };

        Ok(PackagingConfig {
            sdk_dir,
            main_class,
            java_only,
            output: Output {
                artifact_base_name_value,
                deploy_dir: settings.output.deploy_dir.clone(),
            },
            template,
            dimensions,
            permissions,
            signing,
            info,
            native_bundles: settings.bundling.native_bundles.unwrap_or_default(),
            misc: Misc {
                css_to_bin: settings.misc.css_to_bin.unwrap_or(false),
                verbose: settings.misc.verbose.unwrap_or(false),
                jvm_options: settings.misc.jvm_options.clone(),
                jvm_properties: settings.misc.jvm_properties.clone(),
            },
            engine: EngineConfig {
                executable: settings.engine.executable.clone(),
                java_home: settings.engine.java_home.clone(),
                args: settings.engine.args.clone(),
            },
        })
    }

    fn artifact_base_name(&self, settings: &UserSettings, java_only: bool) -> Result<String> {
        let name = match settings.output.artifact_base_name_value {
            Some(ref explicit) => explicit.clone(),
            None => {
                let version = self.identity.language_version.as_deref().unwrap_or("");
                let (module, artifact) = (&self.identity.module, &self.identity.artifact);
                match self.naming {
                    Some(ref naming) => naming(version, module, artifact),
                    None => default_naming(java_only)(version, module, artifact),
                }
            }
        };
        validate_artifact_name(&name)?;
        Ok(name)
    }
}

/// The name becomes a directory directly under the output root, which is
/// removed before every build
fn validate_artifact_name(name: &str) -> Result<()> {
    let reason = if name.trim().is_empty() {
        Some("must not be empty")
    } else if name == "." || name == ".." {
        Some("must not refer to the current or parent directory")
    } else if name.contains(['/', '\\']) {
        Some("must not contain path separators")
    } else if name == STAGING_DIR_NAME || name == BUILDFILE_NAME {
        Some("is reserved for packaging output")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(ConfigError::InvalidArtifactName {
            name: name.to_string(),
            reason: reason.to_string(),
        }),
        None => Ok(()),
    }
}

fn resolve_signing(settings: &UserSettings, elevated: bool) -> Result<Signing> {
    let s = &settings.signing;
    let mut signing = Signing {
        key_store: s.key_store.clone(),
        store_pass: s.store_pass.clone(),
        alias: s.alias.clone(),
        key_pass: s.key_pass.clone(),
        store_type: s.store_type.clone(),
    };

    if !elevated {
        return Ok(signing);
    }

    let missing = if signing.key_store.is_none() {
        Some(SigningField::KeyStore)
    } else if signing.store_pass.is_none() {
        Some(SigningField::StorePass)
    } else if signing.alias.is_none() {
        Some(SigningField::Alias)
    } else if signing.key_pass.is_none() {
        Some(SigningField::KeyPass)
    } else {
        None
    };

    if let Some(field) = missing {
        return Err(ConfigError::IncompleteSigningConfig { field });
    }

    signing
        .store_type
        .get_or_insert_with(|| DEFAULT_STORE_TYPE.to_string());
    Ok(signing)
}

fn resolve_dimensions(settings: &UserSettings) -> Result<Dimensions> {
    let defaults = Dimensions::default();
    let d = &settings.dimensions;
    let dims = Dimensions {
        width: d.width.unwrap_or(defaults.width),
        height: d.height.unwrap_or(defaults.height),
        embedded_width: d.embedded_width.clone().unwrap_or(defaults.embedded_width),
        embedded_height: d.embedded_height.clone().unwrap_or(defaults.embedded_height),
    };

    if dims.width == 0 || dims.height == 0 {
        return Err(ConfigError::InvalidDimensions(format!(
            "width and height must be positive, got {}x{}",
            dims.width, dims.height
        )));
    }
    for (key, value) in [
        ("embedded-width", &dims.embedded_width),
        ("embedded-height", &dims.embedded_height),
    ] {
        if !is_css_length(value) {
            return Err(ConfigError::InvalidDimensions(format!(
                "{} must be a percentage or pixel value, got `{}`",
                key, value
            )));
        }
    }

    Ok(dims)
}

/// Accepts `"100%"`, `"50.5%"`, `"640px"` and bare pixel counts like `"640"`
fn is_css_length(value: &str) -> bool {
    let number = value
        .strip_suffix('%')
        .or_else(|| value.strip_suffix("px"))
        .unwrap_or(value);
    let (int, frac) = match number.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (number, None),
    };
    let digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    match frac {
        Some(frac) => !(int.is_empty() && frac.is_empty()) && digits(int) && digits(frac),
        None => !int.is_empty() && digits(int),
    }
}
