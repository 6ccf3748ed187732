//! Deployment
//!
//! Copies a finished package into the configured deploy directory.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

use fxpack_core::PackagingConfig;

use crate::BuildError;

/// Outcome of a deploy
#[derive(Debug, Clone)]
pub struct DeployResult {
    pub deployed_to: PathBuf,
    pub files: usize,
}

/// Copies `<output_dir>` to `<deploy_dir>/<artifact_base_name>`
#[derive(Debug, Clone)]
pub struct DeployStep {
    deploy_dir: Option<PathBuf>,
    artifact_base_name: String,
}

impl DeployStep {
    pub fn new(deploy_dir: Option<PathBuf>, artifact_base_name: impl Into<String>) -> Self {
        Self {
            deploy_dir,
            artifact_base_name: artifact_base_name.into(),
        }
    }

    pub fn from_config(config: &PackagingConfig) -> Self {
        Self::new(config.output.deploy_dir.clone(), config.artifact_base_name())
    }

    /// Deploy target, if a deploy directory is configured
    pub fn target(&self) -> Option<PathBuf> {
        self.deploy_dir
            .as_ref()
            .map(|dir| dir.join(&self.artifact_base_name))
    }

    /// Copy the package recursively, overwriting existing files and keeping
    /// each file's modification time
    pub async fn deploy(&self, output_dir: &Path) -> Result<DeployResult, BuildError> {
        let target = self.target().ok_or(BuildError::DeployDirNotConfigured)?;

        if !output_dir.is_dir() {
            return Err(BuildError::DeployFailure {
                cause: format!("package output {} does not exist", output_dir.display()),
            });
        }

        info!("Deploying {:?} to {:?}", output_dir, target);

        let source = output_dir.to_path_buf();
        let dest = target.clone();
        let files = tokio::task::spawn_blocking(move || copy_dir_preserving_mtime(&source, &dest))
            .await
            .map_err(|e| BuildError::DeployFailure {
                cause: e.to_string(),
            })?
            .map_err(|e| BuildError::DeployFailure {
                cause: e.to_string(),
            })?;

        info!("Deployed {} files", files);
        Ok(DeployResult {
            deployed_to: target,
            files,
        })
    }
}

fn copy_dir_preserving_mtime(src: &Path, dest: &Path) -> std::io::Result<usize> {
    fs::create_dir_all(dest)?;
    let mut files = 0;

    for entry in WalkDir::new(src).min_depth(1) {
        let entry = entry.map_err(std::io::Error::from)?;
        let relative = entry
            .path()
            .strip_prefix(src)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        let target = dest.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
            continue;
        }

        fs::copy(entry.path(), &target)?;
        let modified = fs::metadata(entry.path())?.modified()?;
        File::options()
            .write(true)
            .open(&target)?
            .set_modified(modified)?;

        debug!("Deployed {:?}", relative);
        files += 1;
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, SystemTime};

    fn write_with_mtime(path: &Path, contents: &[u8], mtime: SystemTime) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
        File::options()
            .write(true)
            .open(path)
            .unwrap()
            .set_modified(mtime)
            .unwrap();
    }

    #[tokio::test]
    async fn test_deploy_preserves_mtime() {
        let dir = tempfile::tempdir().unwrap();
        let output_dir = dir.path().join("target/demo");
        let old = SystemTime::UNIX_EPOCH + Duration::from_secs(1_500_000_000);
        write_with_mtime(&output_dir.join("demo.jar"), b"jar", old);
        write_with_mtime(&output_dir.join("demo.jnlp"), b"jnlp", old + Duration::from_secs(60));
        write_with_mtime(&output_dir.join("bundles/demo.deb"), b"deb", old + Duration::from_secs(120));

        let deploy_root = dir.path().join("deploy");
        let step = DeployStep::new(Some(deploy_root.clone()), "demo");
        let result = step.deploy(&output_dir).await.unwrap();

        assert_eq!(result.deployed_to, deploy_root.join("demo"));
        assert_eq!(result.files, 3);

        for relative in ["demo.jar", "demo.jnlp", "bundles/demo.deb"] {
            let src = fs::metadata(output_dir.join(relative)).unwrap();
            let dst = fs::metadata(result.deployed_to.join(relative)).unwrap();
            assert_eq!(src.modified().unwrap(), dst.modified().unwrap(), "{}", relative);
            assert_eq!(src.len(), dst.len());
        }
    }

    #[tokio::test]
    async fn test_deploy_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let output_dir = dir.path().join("target/demo");
        let mtime = SystemTime::UNIX_EPOCH + Duration::from_secs(1_600_000_000);
        write_with_mtime(&output_dir.join("demo.jar"), b"new", mtime);

        let deploy_root = dir.path().join("deploy");
        write_with_mtime(&deploy_root.join("demo/demo.jar"), b"old contents", SystemTime::now());

        DeployStep::new(Some(deploy_root.clone()), "demo")
            .deploy(&output_dir)
            .await
            .unwrap();

        let deployed = deploy_root.join("demo/demo.jar");
        assert_eq!(fs::read(&deployed).unwrap(), b"new");
        assert_eq!(fs::metadata(&deployed).unwrap().modified().unwrap(), mtime);
    }

    #[tokio::test]
    async fn test_deploy_without_dir() {
        let dir = tempfile::tempdir().unwrap();
        let step = DeployStep::new(None, "demo");
        assert!(matches!(
            step.deploy(dir.path()).await,
            Err(BuildError::DeployDirNotConfigured)
        ));
    }

    #[tokio::test]
    async fn test_deploy_missing_output() {
        let dir = tempfile::tempdir().unwrap();
        let step = DeployStep::new(Some(dir.path().join("deploy")), "demo");
        assert!(matches!(
            step.deploy(&dir.path().join("nope")).await,
            Err(BuildError::DeployFailure { .. })
        ));
        assert!(!dir.path().join("deploy").exists());
    }
}
