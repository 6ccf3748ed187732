//! CLI commands for fxpack
//!
//! Each command loads the project, resolves its configuration and drives the
//! build engine.

use std::path::PathBuf;
use anyhow::Result;
use tracing::info;

use fxpack_build_engine::{
    AntEngine, DeployResult, PackageOutput, PackageRunner, PackagingEngine,
};
use fxpack_buildfile::BuildfileWriter;

use crate::project::Project;

/// Package command options
pub struct PackageCommand {
    pub project_path: PathBuf,
}

impl PackageCommand {
    /// Execute the package command with Ant
    pub async fn execute(&self) -> Result<PackageOutput> {
        let project = Project::load(&self.project_path).await?;
        let config = project.resolve()?;
        let runner = PackageRunner::new(config)?;
        self.execute_with(&project, &runner).await
    }

    /// Execute against an already constructed runner
    pub async fn execute_with<E: PackagingEngine>(
        &self,
        project: &Project,
        runner: &PackageRunner<E>,
    ) -> Result<PackageOutput> {
        info!("Packaging project: {:?}", self.project_path);
        let request = project.package_request(runner.config())?;
        let output = runner.package(&request).await?;
        info!("Package successful: {:?}", output.jar_file);
        Ok(output)
    }
}

/// Deploy command options
pub struct DeployCommand {
    pub project_path: PathBuf,
}

impl DeployCommand {
    /// Execute the deploy command with Ant
    pub async fn execute(&self) -> Result<(PackageOutput, DeployResult)> {
        let project = Project::load(&self.project_path).await?;
        let config = project.resolve()?;
        let runner = PackageRunner::new(config)?;
        self.execute_with(&project, &runner).await
    }

    pub async fn execute_with<E: PackagingEngine>(
        &self,
        project: &Project,
        runner: &PackageRunner<E>,
    ) -> Result<(PackageOutput, DeployResult)> {
        info!("Deploying project: {:?}", self.project_path);
        let request = project.package_request(runner.config())?;
        let (output, deployed) = runner.deploy(&request).await?;
        info!("Deployed to {:?}", deployed.deployed_to);
        Ok((output, deployed))
    }
}

/// Buildfile command options
pub struct BuildfileCommand {
    pub project_path: PathBuf,
}

impl BuildfileCommand {
    /// Render the buildfile without running the engine
    pub async fn execute(&self) -> Result<String> {
        let project = Project::load(&self.project_path).await?;
        let config = project.resolve()?;
        let request = project.package_request(&config)?;

        // The engine is never started here, so it does not need to exist
        let runner = PackageRunner::with_engine(config, AntEngine::new("ant"));
        let descriptor = runner.descriptor(&request);
        Ok(BuildfileWriter::new().write_to_string(&descriptor)?)
    }
}

/// Clean command options
pub struct CleanCommand {
    pub project_path: PathBuf,
}

impl CleanCommand {
    pub async fn execute(&self) -> Result<()> {
        let project = Project::load(&self.project_path).await?;
        let config = project.resolve()?;
        let request = project.package_request(&config)?;
        let runner = PackageRunner::with_engine(config, AntEngine::new("ant"));
        runner.clean(&request).await?;
        Ok(())
    }
}

/// Config command options
pub struct ConfigCommand {
    pub project_path: PathBuf,
    pub json: bool,
}

impl ConfigCommand {
    /// Render the resolved configuration
    pub async fn execute(&self) -> Result<String> {
        let project = Project::load(&self.project_path).await?;
        let config = project.resolve()?;
        if self.json {
            Ok(serde_json::to_string_pretty(&config)?)
        } else {
            Ok(toml::to_string_pretty(&config)?)
        }
    }
}
