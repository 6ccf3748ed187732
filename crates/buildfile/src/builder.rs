//! Descriptor Builder
//!
//! Derives the packaging instructions from a resolved configuration, the
//! discovered classpath and the compiled classes directory.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::debug;

use fxpack_core::{PackagingConfig, RUNTIME_LIBRARY};

use crate::descriptor::{
    ApplicationInstruction, DeployInstruction, Descriptor, FileSet, Instruction, JarInstruction,
    LibraryArchive, OutputLayout, ResourcesInstruction, SignInstruction, SignTarget,
    TemplateInstruction, APP_RESOURCES_ID, STAGING_DIR_NAME,
};

/// Keep `.jar` archives only, drop the runtime library and repeated file names.
///
/// Order of first occurrence is preserved.
pub fn filter_libraries(classpath: &[PathBuf]) -> Vec<PathBuf> {
    let mut seen = HashSet::new();
    classpath
        .iter()
        .filter(|path| is_archive(path) && !is_runtime_library(path))
        .filter(|path| match path.file_name() {
            Some(name) => seen.insert(name.to_os_string()),
            None => false,
        })
        .cloned()
        .collect()
}

fn is_archive(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("jar"))
        .unwrap_or(false)
}

fn is_runtime_library(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().ends_with(RUNTIME_LIBRARY))
        .unwrap_or(false)
}

fn resolve_against(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

/// Builds a [`Descriptor`] from a [`PackagingConfig`]
pub struct DescriptorBuilder<'a> {
    config: &'a PackagingConfig,
    base_dir: PathBuf,
    version: Option<String>,
}

impl<'a> DescriptorBuilder<'a> {
    /// Create a builder; relative template inputs resolve against the current directory
    pub fn new(config: &'a PackagingConfig) -> Self {
        Self {
            config,
            base_dir: PathBuf::from("."),
            version: None,
        }
    }

    /// Directory that relative template inputs are resolved against
    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = base_dir.into();
        self
    }

    /// Application version recorded in the descriptor
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Build the descriptor
    pub fn build(&self, classpath: &[PathBuf], classes_dir: &Path, output_root: &Path) -> Descriptor {
        let name = self.config.artifact_base_name().to_string();
        let layout = OutputLayout::new(output_root, &name);

        let libraries: Vec<LibraryArchive> = filter_libraries(classpath)
            .into_iter()
            .filter_map(|source| {
                let file_name = source.file_name()?.to_os_string();
                Some(LibraryArchive {
                    staged: layout.staging_dir.join(file_name),
                    source,
                })
            })
            .collect();

        debug!(
            "Building descriptor for {} with {} libraries",
            name,
            libraries.len()
        );

        let library_sets: Vec<FileSet> = libraries
            .iter()
            .map(|lib| {
                FileSet::new(
                    &layout.output_root,
                    format!("{}/{}", STAGING_DIR_NAME, lib.file_name()),
                )
            })
            .collect();

        let mut instructions = Vec::with_capacity(6);

        instructions.push(Instruction::Application(ApplicationInstruction {
            id: name.clone(),
            name: name.clone(),
            main_class: self.config.main_class.clone(),
            version: self.version.clone(),
            jvm_options: self.config.misc.jvm_options.clone(),
            jvm_properties: self.config.misc.jvm_properties.clone(),
        }));

        instructions.push(Instruction::Resources(ResourcesInstruction {
            id: APP_RESOURCES_ID.to_string(),
            libraries: library_sets.clone(),
            classes_dir: classes_dir.to_path_buf(),
        }));

        instructions.push(Instruction::Jar(JarInstruction {
            dest_file: layout.jar_file.clone(),
            application_ref: name.clone(),
            resources_ref: APP_RESOURCES_ID.to_string(),
            css_to_bin: self.config.misc.css_to_bin,
        }));

        if let Some(credentials) = self.config.signing_credentials() {
            instructions.push(Instruction::Sign(SignInstruction {
                target: SignTarget::Jar(layout.jar_file.clone()),
                credentials: credentials.clone(),
            }));
            instructions.push(Instruction::Sign(SignInstruction {
                target: SignTarget::Directory(FileSet::new(&layout.staging_dir, "*.jar")),
                credentials,
            }));
        }

        let mut deploy_resources = vec![FileSet::new(
            &layout.output_dir,
            format!("{}.jar", name),
        )];
        deploy_resources.extend(library_sets);

        let template = self.config.template.paths().map(|(file, dest)| TemplateInstruction {
            file: resolve_against(&self.base_dir, file),
            dest_file: resolve_against(&layout.output_dir, dest),
            placeholder_id: self.config.template.placeholder_id.clone(),
        });

        instructions.push(Instruction::Deploy(DeployInstruction {
            out_dir: layout.output_dir.clone(),
            out_file: name.clone(),
            dimensions: self.config.dimensions.clone(),
            permissions: self.config.permissions,
            info: self.config.info.clone(),
            native_bundles: self.config.native_bundles,
            verbose: self.config.misc.verbose,
            application_ref: name.clone(),
            resources: deploy_resources,
            template,
        }));

        Descriptor {
            name,
            ant_lib: self.config.ant_lib(),
            layout,
            libraries,
            instructions,
        }
    }
}
