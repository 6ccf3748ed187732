//! Package Runner
//!
//! Coordinates the entire packaging process.

use std::path::PathBuf;
use tracing::{debug, info};

use fxpack_buildfile::{Descriptor, DescriptorBuilder, OutputLayout};
use fxpack_core::PackagingConfig;

use crate::{
    ant_build::{AntEngine, PackagingEngine, PackagingInvoker},
    deploy::{DeployResult, DeployStep},
    staging, BuildError,
};

/// Inputs of one packaging run
#[derive(Debug, Clone)]
pub struct PackageRequest {
    /// Discovered classpath, unfiltered
    pub classpath: Vec<PathBuf>,
    /// Compiled classes
    pub classes_dir: PathBuf,
    /// Root of the build output
    pub output_root: PathBuf,
    /// Directory relative template paths are resolved against
    pub base_dir: PathBuf,
    /// Application version
    pub version: Option<String>,
}

/// Package output
#[derive(Debug, Clone)]
pub struct PackageOutput {
    /// Directory holding the packaged application
    pub output_dir: PathBuf,
    /// Path to the output JAR
    pub jar_file: PathBuf,
    /// Build duration in seconds
    pub duration_secs: f64,
    /// Was signed
    pub signed: bool,
    /// Library archives bundled
    pub libraries: usize,
    /// Engine log
    pub log: String,
}

/// Runner that coordinates the packaging process
pub struct PackageRunner<E> {
    config: PackagingConfig,
    invoker: PackagingInvoker<E>,
}

impl PackageRunner<AntEngine> {
    /// Create a runner backed by Ant
    pub fn new(config: PackagingConfig) -> Result<Self, BuildError> {
        let engine = AntEngine::from_config(&config.engine)?;
        Ok(Self::with_engine(config, engine))
    }
}

impl<E: PackagingEngine> PackageRunner<E> {
    pub fn with_engine(config: PackagingConfig, engine: E) -> Self {
        Self {
            config,
            invoker: PackagingInvoker::new(engine),
        }
    }

    pub fn config(&self) -> &PackagingConfig {
        &self.config
    }

    pub fn layout(&self, request: &PackageRequest) -> OutputLayout {
        OutputLayout::new(&request.output_root, self.config.artifact_base_name())
    }

    /// Build the descriptor for a request without touching the filesystem
    pub fn descriptor(&self, request: &PackageRequest) -> Descriptor {
        let mut builder = DescriptorBuilder::new(&self.config).with_base_dir(&request.base_dir);
        if let Some(ref version) = request.version {
            builder = builder.with_version(version);
        }
        builder.build(&request.classpath, &request.classes_dir, &request.output_root)
    }

    /// Run the packaging
    pub async fn package(&self, request: &PackageRequest) -> Result<PackageOutput, BuildError> {
        let start = std::time::Instant::now();

        if !request.classes_dir.is_dir() {
            return Err(BuildError::ClassesNotFound(request.classes_dir.clone()));
        }

        let descriptor = self.descriptor(request);
        debug!(
            "Descriptor for {} has {} instructions",
            descriptor.name,
            descriptor.instructions.len()
        );

        staging::remove_previous_build(&descriptor.layout).await?;
        let result = self.invoker.invoke(&descriptor).await?;

        let signed = descriptor.signing().next().is_some();
        let duration = start.elapsed();
        info!("Packaging completed in {:.2}s", duration.as_secs_f64());

        Ok(PackageOutput {
            output_dir: result.output_dir,
            jar_file: result.jar_file,
            duration_secs: duration.as_secs_f64(),
            signed,
            libraries: result.libraries,
            log: result.log,
        })
    }

    /// Package, then copy the package into the deploy directory
    pub async fn deploy(
        &self,
        request: &PackageRequest,
    ) -> Result<(PackageOutput, DeployResult), BuildError> {
        let step = DeployStep::from_config(&self.config);
        if step.target().is_none() {
            return Err(BuildError::DeployDirNotConfigured);
        }

        let output = self.package(request).await?;
        let deployed = step.deploy(&output.output_dir).await?;
        Ok((output, deployed))
    }

    /// Remove previous output for a request
    pub async fn clean(&self, request: &PackageRequest) -> Result<(), BuildError> {
        staging::clean(&self.layout(request)).await
    }
}
