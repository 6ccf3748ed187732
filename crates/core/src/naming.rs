//! Artifact Naming
//!
//! The artifact base-name is computed from the language version, the module
//! identity and the artifact identity. Callers can plug in any naming
//! function; project files express one as a pattern string.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Module coordinates of the project being packaged
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ModuleId {
    pub organization: String,
    pub name: String,
    pub revision: String,
}

/// Identity of the main artifact
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ArtifactId {
    pub name: String,
    pub classifier: Option<String>,
}

impl ArtifactId {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            classifier: None,
        }
    }
}

/// Pluggable naming function: `(version, module, artifact) -> base name`
pub type NamingFn = Box<dyn Fn(&str, &ModuleId, &ArtifactId) -> String + Send + Sync>;

/// Default naming: `{artifact}_{version}-{revision}`, or `{artifact}-{revision}`
/// for java-only projects and projects without a language version.
pub fn default_naming(java_only: bool) -> NamingFn {
    Box::new(move |version: &str, module: &ModuleId, artifact: &ArtifactId| {
        let mut name = artifact.name.clone();
        if !java_only && !version.is_empty() {
            name.push('_');
            name.push_str(version);
        }
        name.push('-');
        name.push_str(&module.revision);
        if let Some(ref classifier) = artifact.classifier {
            name.push('-');
            name.push_str(classifier);
        }
        name
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Version,
    Organization,
    Module,
    Revision,
    Artifact,
}

/// Naming function written as a pattern, e.g. `"{artifact}-{revision}"`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingPattern {
    source: String,
    segments: Vec<Segment>,
}

impl NamingPattern {
    /// Parse a pattern, rejecting unknown or unterminated placeholders
    pub fn parse(pattern: &str) -> Result<Self> {
        let invalid = |reason: String| ConfigError::InvalidNamingPattern {
            pattern: pattern.to_string(),
            reason,
        };

        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut rest = pattern;

        while let Some(start) = rest.find('{') {
            literal.push_str(&rest[..start]);
            let after = &rest[start + 1..];
            let end = after
                .find('}')
                .ok_or_else(|| invalid("unterminated placeholder".to_string()))?;

            let segment = match &after[..end] {
                "version" => Segment::Version,
                "organization" => Segment::Organization,
                "module" => Segment::Module,
                "revision" => Segment::Revision,
                "artifact" => Segment::Artifact,
                other => return Err(invalid(format!("unknown placeholder `{{{}}}`", other))),
            };

            if !literal.is_empty() {
                segments.push(Segment::Literal(std::mem::take(&mut literal)));
            }
            segments.push(segment);
            rest = &after[end + 1..];
        }

        if rest.contains('}') {
            return Err(invalid("unmatched `}`".to_string()));
        }
        literal.push_str(rest);
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        if segments.is_empty() {
            return Err(invalid("pattern is empty".to_string()));
        }

        Ok(Self {
            source: pattern.to_string(),
            segments,
        })
    }

    /// Original pattern text
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Render the pattern for the given identity
    pub fn render(&self, version: &str, module: &ModuleId, artifact: &ArtifactId) -> String {
        self.segments
            .iter()
            .map(|segment| match segment {
                Segment::Literal(text) => text.as_str(),
                Segment::Version => version,
                Segment::Organization => module.organization.as_str(),
                Segment::Module => module.name.as_str(),
                Segment::Revision => module.revision.as_str(),
                Segment::Artifact => artifact.name.as_str(),
            })
            .collect()
    }

    /// Turn the pattern into a naming function
    pub fn into_naming_fn(self) -> NamingFn {
        Box::new(move |version: &str, module: &ModuleId, artifact: &ArtifactId| {
            self.render(version, module, artifact)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn module() -> ModuleId {
        ModuleId {
            organization: "org.demo".into(),
            name: "viewer".into(),
            revision: "1.2.0".into(),
        }
    }

    #[test]
    fn test_default_naming() {
        let artifact = ArtifactId::new("viewer");
        assert_eq!(default_naming(false)("2.13", &module(), &artifact), "viewer_2.13-1.2.0");
        assert_eq!(default_naming(true)("2.13", &module(), &artifact), "viewer-1.2.0");
        assert_eq!(default_naming(false)("", &module(), &artifact), "viewer-1.2.0");
    }

    #[test]
    fn test_pattern_render() {
        let pattern = NamingPattern::parse("{organization}.{artifact}-v{revision}").unwrap();
        assert_eq!(
            pattern.render("3", &module(), &ArtifactId::new("app")),
            "org.demo.app-v1.2.0"
        );
        assert_eq!(pattern.as_str(), "{organization}.{artifact}-v{revision}");
    }

    #[test]
    fn test_pattern_literal_only() {
        let pattern = NamingPattern::parse("demo").unwrap();
        assert_eq!(pattern.render("", &module(), &ArtifactId::new("x")), "demo");
    }

    #[test]
    fn test_pattern_errors() {
        assert!(matches!(
            NamingPattern::parse("{artifact"),
            Err(ConfigError::InvalidNamingPattern { .. })
        ));
        assert!(matches!(
            NamingPattern::parse("{nope}-x"),
            Err(ConfigError::InvalidNamingPattern { .. })
        ));
        assert!(matches!(
            NamingPattern::parse("a}b"),
            Err(ConfigError::InvalidNamingPattern { .. })
        ));
        assert!(NamingPattern::parse("").is_err());
    }
}
