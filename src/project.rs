//! Project management for fxpack
//!
//! Loads `fxpack.toml` and turns it into resolved packaging inputs.

use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use fxpack_build_engine::{ClasspathDiscovery, PackageRequest};
use fxpack_core::{
    ArtifactId, ConfigResolver, ModuleId, NamingPattern, PackagingConfig, ProjectIdentity,
    UserSettings,
};

/// Project file name
pub const PROJECT_FILE: &str = "fxpack.toml";

/// Environment variables consulted, in order, when `sdk-dir` is unset
pub const SDK_ENV_VARS: [&str; 2] = ["JAVAFX_SDK", "JAVA_HOME"];

/// fxpack project configuration (fxpack.toml)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ProjectFile {
    #[serde(default)]
    pub project: ProjectSection,
    #[serde(default)]
    pub build: BuildSection,
    /// Packaging settings
    #[serde(default)]
    pub javafx: UserSettings,
}

/// Project identity section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ProjectSection {
    #[serde(default)]
    pub organization: String,
    pub name: String,
    #[serde(default = "default_version")]
    pub version: String,
    /// Language version, e.g. "2.13" for Scala projects
    pub language_version: Option<String>,
}

fn default_version() -> String {
    "0.1.0".to_string()
}

/// Build inputs section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BuildSection {
    #[serde(default = "default_classes_dir")]
    pub classes_dir: PathBuf,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Explicit classpath entries, glob patterns allowed
    #[serde(default)]
    pub classpath: Vec<PathBuf>,
    /// Directories scanned for `.jar` files
    #[serde(default)]
    pub lib_dirs: Vec<PathBuf>,
    /// Language runtime libraries
    #[serde(default)]
    pub language_libraries: Vec<PathBuf>,
}

fn default_classes_dir() -> PathBuf {
    PathBuf::from("target/classes")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("target")
}

impl Default for BuildSection {
    fn default() -> Self {
        Self {
            classes_dir: default_classes_dir(),
            output_dir: default_output_dir(),
            classpath: Vec::new(),
            lib_dirs: Vec::new(),
            language_libraries: Vec::new(),
        }
    }
}

/// A loaded project
#[derive(Debug, Clone)]
pub struct Project {
    /// Directory containing `fxpack.toml`
    pub root: PathBuf,
    pub file: ProjectFile,
}

impl Project {
    /// Load a project from its directory
    pub async fn load(dir: impl AsRef<Path>) -> Result<Self> {
        let root = dir.as_ref().to_path_buf();
        let path = root.join(PROJECT_FILE);

        let content = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let project = Self::parse(root, &content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        info!("Loaded project: {}", project.file.project.name);
        Ok(project)
    }

    /// Parse project file contents for a project rooted at `root`
    pub fn parse(root: impl Into<PathBuf>, content: &str) -> Result<Self> {
        let file: ProjectFile = toml::from_str(content).map_err(fxpack_core::ConfigError::from)?;
        Ok(Self {
            root: root.into(),
            file,
        })
    }

    fn absolute(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    /// Module and artifact identity
    pub fn identity(&self) -> ProjectIdentity {
        let p = &self.file.project;
        ProjectIdentity {
            module: ModuleId {
                organization: p.organization.clone(),
                name: p.name.clone(),
                revision: p.version.clone(),
            },
            artifact: ArtifactId::new(&p.name),
            language_version: p.language_version.clone(),
        }
    }

    /// Packaging settings with paths made absolute and the SDK env fallback applied
    pub fn settings(&self) -> UserSettings {
        self.settings_with_env(|key| std::env::var(key).ok())
    }

    /// Like [`settings`](Self::settings) with an explicit environment lookup
    pub fn settings_with_env(&self, env: impl Fn(&str) -> Option<String>) -> UserSettings {
        let mut settings = self.file.javafx.clone();

        if settings.sdk_dir.is_none() {
            settings.sdk_dir = SDK_ENV_VARS
                .iter()
                .find_map(|key| env(key).filter(|v| !v.is_empty()))
                .map(PathBuf::from);
            if let Some(ref sdk) = settings.sdk_dir {
                debug!("Using SDK from environment: {:?}", sdk);
            }
        }

        settings.sdk_dir = settings.sdk_dir.map(|p| self.absolute(&p));
        settings.output.deploy_dir = settings.output.deploy_dir.map(|p| self.absolute(&p));
        settings.signing.key_store = settings.signing.key_store.map(|p| self.absolute(&p));
        settings.engine.executable = settings.engine.executable.map(|p| self.absolute(&p));
        settings.engine.java_home = settings.engine.java_home.map(|p| self.absolute(&p));
        settings
    }

    /// Resolve the packaging configuration
    pub fn resolve(&self) -> Result<PackagingConfig> {
        self.resolve_settings(&self.settings())
    }

    /// Resolve already prepared settings for this project
    pub fn resolve_settings(&self, settings: &UserSettings) -> Result<PackagingConfig> {
        let mut resolver = ConfigResolver::new(self.identity());
        if let Some(ref pattern) = settings.output.artifact_base_name {
            resolver = resolver.with_naming(NamingPattern::parse(pattern)?.into_naming_fn());
        }
        Ok(resolver.resolve(settings)?)
    }

    /// Discover the classpath
    pub fn classpath(&self, java_only: bool) -> Result<Vec<PathBuf>> {
        let build = &self.file.build;
        let abs = |paths: &[PathBuf]| paths.iter().map(|p| self.absolute(p)).collect::<Vec<_>>();

        let classpath = ClasspathDiscovery::new()
            .with_entries(abs(&build.classpath))
            .with_lib_dirs(abs(&build.lib_dirs))
            .with_language_libraries(abs(&build.language_libraries))
            .java_only(java_only)
            .discover()?;
        Ok(classpath)
    }

    /// Packaging inputs for a resolved configuration
    pub fn package_request(&self, config: &PackagingConfig) -> Result<PackageRequest> {
        Ok(PackageRequest {
            classpath: self.classpath(config.java_only)?,
            classes_dir: self.absolute(&self.file.build.classes_dir),
            output_root: self.absolute(&self.file.build.output_dir),
            base_dir: self.root.clone(),
            version: Some(self.file.project.version.clone()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROJECT: &str = r#"
[project]
organization = "org.demo"
name = "demo"
version = "1.2"
language-version = "2.13"

[build]
classpath = ["libs/extra.jar", "/abs/other.jar"]
lib-dirs = ["lib"]

[javafx]
sdk-dir = "jdk"
main-class = "demo.Main"

[javafx.engine]
executable = "tools/ant/bin/ant"
java-home = "/usr/lib/jvm/java-8"

[javafx.output]
deploy-dir = "dist"
"#;

    #[test]
    fn test_parse() {
        let project = Project::parse("/work", PROJECT).unwrap();
        assert_eq!(project.file.project.name, "demo");
        assert_eq!(project.file.build.classes_dir, PathBuf::from("target/classes"));
        assert_eq!(project.file.javafx.main_class.as_deref(), Some("demo.Main"));

        let identity = project.identity();
        assert_eq!(identity.module.organization, "org.demo");
        assert_eq!(identity.module.revision, "1.2");
        assert_eq!(identity.artifact.name, "demo");
        assert_eq!(identity.language_version.as_deref(), Some("2.13"));
    }

    #[test]
    fn test_settings_absolute_paths() {
        let project = Project::parse("/work", PROJECT).unwrap();
        let settings = project.settings_with_env(|_| None);
        assert_eq!(settings.sdk_dir, Some(PathBuf::from("/work/jdk")));
        assert_eq!(settings.output.deploy_dir, Some(PathBuf::from("/work/dist")));
        assert_eq!(
            settings.engine.executable,
            Some(PathBuf::from("/work/tools/ant/bin/ant"))
        );
        assert_eq!(settings.engine.java_home, Some(PathBuf::from("/usr/lib/jvm/java-8")));
    }

    #[test]
    fn test_sdk_env_fallback() {
        let project = Project::parse("/work", "[project]\nname = \"demo\"\n").unwrap();

        let settings = project.settings_with_env(|key| match key {
            "JAVA_HOME" => Some("/usr/lib/jvm/java-8".into()),
            _ => None,
        });
        assert_eq!(settings.sdk_dir, Some(PathBuf::from("/usr/lib/jvm/java-8")));

        let settings = project.settings_with_env(|key| match key {
            "JAVAFX_SDK" => Some("/opt/javafx".into()),
            "JAVA_HOME" => Some("/usr/lib/jvm/java-8".into()),
            _ => None,
        });
        assert_eq!(settings.sdk_dir, Some(PathBuf::from("/opt/javafx")));

        assert_eq!(project.settings_with_env(|_| None).sdk_dir, None);
    }

    #[test]
    fn test_resolve_with_pattern() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("jdk/lib")).unwrap();
        std::fs::write(dir.path().join("jdk/lib/ant-javafx.jar"), b"PK").unwrap();

        let content = format!(
            "{}\nartifact-base-name = \"{{organization}}.{{artifact}}-{{revision}}\"\n",
            PROJECT
        );
        let project = Project::parse(dir.path(), &content).unwrap();
        let config = project.resolve_settings(&project.settings_with_env(|_| None)).unwrap();
        assert_eq!(config.artifact_base_name(), "org.demo.demo-1.2");
    }

    #[test]
    fn test_resolve_default_name() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("jdk/lib")).unwrap();
        std::fs::write(dir.path().join("jdk/lib/ant-javafx.jar"), b"PK").unwrap();

        let project = Project::parse(dir.path(), PROJECT).unwrap();
        let config = project.resolve_settings(&project.settings_with_env(|_| None)).unwrap();
        assert_eq!(config.artifact_base_name(), "demo_2.13-1.2");
    }

    #[test]
    fn test_package_request() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("lib")).unwrap();
        std::fs::write(dir.path().join("lib/guava.jar"), b"PK").unwrap();

        let project = Project::parse(dir.path(), PROJECT).unwrap();
        let classpath = project.classpath(true).unwrap();
        assert_eq!(
            classpath,
            vec![
                dir.path().join("libs/extra.jar"),
                PathBuf::from("/abs/other.jar"),
                dir.path().join("lib/guava.jar"),
            ]
        );
    }
}
