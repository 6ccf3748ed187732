//! Error types for configuration resolution
//!
//! Centralized error handling using thiserror.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Signing fields that become mandatory once elevated permissions are requested.
///
/// Declared in the order they are validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SigningField {
    KeyStore,
    StorePass,
    Alias,
    KeyPass,
}

impl SigningField {
    /// Setting key as written in the project file
    pub fn key(&self) -> &'static str {
        match self {
            SigningField::KeyStore => "signing.key-store",
            SigningField::StorePass => "signing.store-pass",
            SigningField::Alias => "signing.alias",
            SigningField::KeyPass => "signing.key-pass",
        }
    }
}

impl fmt::Display for SigningField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Configuration errors. All of them are fatal and raised before the
/// filesystem is touched.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("JavaFX packaging library not found at {}", expected.display())]
    MissingSdk { expected: PathBuf },

    #[error("Incomplete signing configuration: `{field}` is required when elevated permissions are requested")]
    IncompleteSigningConfig { field: SigningField },

    #[error("Missing required setting `{0}`")]
    MissingSetting(&'static str),

    #[error("Invalid dimensions: {0}")]
    InvalidDimensions(String),

    #[error("Invalid artifact name `{name}`: {reason}")]
    InvalidArtifactName { name: String, reason: String },

    #[error("Invalid artifact name pattern `{pattern}`: {reason}")]
    InvalidNamingPattern { pattern: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;

impl ConfigError {
    /// Get a user-friendly hint for fixing the problem
    pub fn hint(&self) -> Option<String> {
        match self {
            ConfigError::MissingSdk { .. } => Some(
                "Point `sdk-dir` (or JAVAFX_SDK) at a JDK or JavaFX SDK containing lib/ant-javafx.jar".to_string(),
            ),
            ConfigError::IncompleteSigningConfig { field } => Some(format!(
                "Set `{}` or disable `permissions.elevated`",
                field
            )),
            ConfigError::InvalidArtifactName { .. } => Some(
                "Set `output.artifact-base-name-value` to a plain file name".to_string(),
            ),
            ConfigError::MissingSetting(key) => Some(format!("Add `{}` to the [javafx] table", key)),
            _ => None,
        }
    }
}
