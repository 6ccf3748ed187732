//! Ant Build for JavaFX Packaging
//!
//! Wraps Apache Ant running the JavaFX packaging tasks.

use std::future::Future;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{debug, error, info};

use fxpack_buildfile::{BuildfileWriter, Descriptor};
use fxpack_core::EngineConfig;

use crate::staging::stage_libraries;
use crate::BuildError;

/// Captured result of one engine run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineOutput {
    pub success: bool,
    /// Exit code, `-1` when the process was terminated by a signal
    pub exit_code: i32,
    /// Combined stdout and stderr
    pub log: String,
}

/// External process that executes a serialized buildfile
pub trait PackagingEngine {
    fn run(
        &self,
        buildfile: &Path,
        work_dir: &Path,
    ) -> impl Future<Output = Result<EngineOutput, BuildError>> + Send;
}

/// Apache Ant
#[derive(Debug, Clone)]
pub struct AntEngine {
    executable: PathBuf,
    java_home: Option<PathBuf>,
    args: Vec<String>,
}

impl AntEngine {
    /// Create an engine for a known Ant executable
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            java_home: None,
            args: Vec::new(),
        }
    }

    /// Locate Ant from engine settings, falling back to `ant` on PATH
    pub fn from_config(config: &EngineConfig) -> Result<Self, BuildError> {
        let executable = match &config.executable {
            Some(path) if path.is_file() => path.clone(),
            Some(path) => {
                return Err(BuildError::EngineNotFound(format!(
                    "{} does not exist",
                    path.display()
                )))
            }
            None => which::which("ant").map_err(|_| {
                BuildError::EngineNotFound("`ant` not found on PATH (set `engine.executable`)".into())
            })?,
        };
        debug!("Using Ant at {:?}", executable);

        let mut engine = Self::new(executable);
        engine.java_home = config.java_home.clone();
        engine.args = config.args.clone();
        Ok(engine)
    }

    /// Add extra command-line arguments
    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    fn command(&self, buildfile: &Path, work_dir: &Path) -> Command {
        let mut cmd = Command::new(&self.executable);
        cmd.current_dir(work_dir);
        cmd.arg("-f").arg(buildfile);
        cmd.args(&self.args);

        if let Some(ref java_home) = self.java_home {
            cmd.env("JAVA_HOME", java_home);
        }
        cmd
    }
}

impl PackagingEngine for AntEngine {
    async fn run(&self, buildfile: &Path, work_dir: &Path) -> Result<EngineOutput, BuildError> {
        debug!("Running: {:?} -f {:?} {:?}", self.executable, buildfile, self.args);

        let output = self.command(buildfile, work_dir).output().await?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        for line in stdout.lines().chain(stderr.lines()) {
            debug!("[ant] {}", line);
        }

        Ok(EngineOutput {
            success: output.status.success(),
            exit_code: output.status.code().unwrap_or(-1),
            log: format!("{}{}", stdout, stderr),
        })
    }
}

/// Successful packaging run
#[derive(Debug, Clone)]
pub struct InvocationResult {
    pub output_dir: PathBuf,
    pub jar_file: PathBuf,
    pub buildfile: PathBuf,
    pub libraries: usize,
    pub log: String,
}

/// Serializes a descriptor and hands it to the packaging engine
pub struct PackagingInvoker<E> {
    engine: E,
    writer: BuildfileWriter,
}

impl<E: PackagingEngine> PackagingInvoker<E> {
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            writer: BuildfileWriter::new(),
        }
    }

    /// Stage libraries, write the buildfile and run the engine to completion.
    ///
    /// A non-zero exit surfaces the exit code and the full engine log.
    pub async fn invoke(&self, descriptor: &Descriptor) -> Result<InvocationResult, BuildError> {
        let layout = &descriptor.layout;

        let libraries = stage_libraries(descriptor).await?;
        self.writer.write_to_file(descriptor, &layout.buildfile).await?;
        debug!("Wrote buildfile {:?}", layout.buildfile);

        info!("Packaging {} with Ant...", descriptor.name);
        let output = self.engine.run(&layout.buildfile, &layout.output_root).await?;

        if !output.success {
            error!("Packaging engine exited with code {}", output.exit_code);
            return Err(BuildError::PackagingFailure {
                exit_code: output.exit_code,
                log: output.log,
            });
        }

        info!("Packaged {:?}", layout.jar_file);

        Ok(InvocationResult {
            output_dir: layout.output_dir.clone(),
            jar_file: layout.jar_file.clone(),
            buildfile: layout.buildfile.clone(),
            libraries,
            log: output.log,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fxpack_buildfile::OutputLayout;

    struct ScriptedEngine {
        exit_code: i32,
    }

    impl PackagingEngine for ScriptedEngine {
        async fn run(&self, buildfile: &Path, _work_dir: &Path) -> Result<EngineOutput, BuildError> {
            let contents = tokio::fs::read_to_string(buildfile).await?;
            Ok(EngineOutput {
                success: self.exit_code == 0,
                exit_code: self.exit_code,
                log: format!("BUILD LOG ({} bytes)", contents.len()),
            })
        }
    }

    fn descriptor(root: &Path) -> Descriptor {
        Descriptor {
            name: "demo".into(),
            ant_lib: "/opt/jdk/lib/ant-javafx.jar".into(),
            layout: OutputLayout::new(root, "demo"),
            libraries: Vec::new(),
            instructions: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_invoke_writes_buildfile() {
        let dir = tempfile::tempdir().unwrap();
        let invoker = PackagingInvoker::new(ScriptedEngine { exit_code: 0 });

        let result = invoker.invoke(&descriptor(dir.path())).await.unwrap();
        assert_eq!(result.buildfile, dir.path().join("build.xml"));
        assert!(result.buildfile.is_file());
        assert!(result.log.starts_with("BUILD LOG"));
        assert!(dir.path().join("lib").is_dir());
    }

    #[tokio::test]
    async fn test_invoke_surfaces_failure() {
        let dir = tempfile::tempdir().unwrap();
        let invoker = PackagingInvoker::new(ScriptedEngine { exit_code: 3 });

        match invoker.invoke(&descriptor(dir.path())).await {
            Err(BuildError::PackagingFailure { exit_code, log }) => {
                assert_eq!(exit_code, 3);
                assert!(log.starts_with("BUILD LOG"));
            }
            other => panic!("expected packaging failure, got {:?}", other.map(|r| r.jar_file)),
        }
    }

    #[test]
    fn test_missing_executable() {
        let config = EngineConfig {
            executable: Some(PathBuf::from("/definitely/not/here/ant")),
            ..Default::default()
        };
        assert!(matches!(
            AntEngine::from_config(&config),
            Err(BuildError::EngineNotFound(_))
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_ant_engine_runs_executable() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("fake-ant");
        std::fs::write(&script, "#!/bin/sh\necho \"args: $@\"\necho oops >&2\nexit 2\n").unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let engine = AntEngine::new(&script).with_args(vec!["-verbose".into()]);
        let output = engine
            .run(&dir.path().join("build.xml"), dir.path())
            .await
            .unwrap();

        assert!(!output.success);
        assert_eq!(output.exit_code, 2);
        assert!(output.log.contains("-f"));
        assert!(output.log.contains("-verbose"));
        assert!(output.log.contains("oops"));
    }
}
