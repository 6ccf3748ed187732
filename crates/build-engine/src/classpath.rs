//! Classpath Discovery
//!
//! Assembles the library archives to bundle from explicit entries, glob
//! patterns, library directories and the language runtime libraries.

use std::path::PathBuf;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::BuildError;

/// Collects classpath entries for one project
#[derive(Debug, Clone, Default)]
pub struct ClasspathDiscovery {
    entries: Vec<PathBuf>,
    lib_dirs: Vec<PathBuf>,
    language_libraries: Vec<PathBuf>,
    java_only: bool,
}

impl ClasspathDiscovery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Explicit entries; entries containing `*`, `?` or `[` are glob patterns
    pub fn with_entries(mut self, entries: Vec<PathBuf>) -> Self {
        self.entries = entries;
        self
    }

    /// Directories scanned recursively for `.jar` files
    pub fn with_lib_dirs(mut self, dirs: Vec<PathBuf>) -> Self {
        self.lib_dirs = dirs;
        self
    }

    /// Runtime libraries of the project's language, skipped for java-only projects
    pub fn with_language_libraries(mut self, libraries: Vec<PathBuf>) -> Self {
        self.language_libraries = libraries;
        self
    }

    pub fn java_only(mut self, java_only: bool) -> Self {
        self.java_only = java_only;
        self
    }

    /// Discover the classpath in a stable order
    pub fn discover(&self) -> Result<Vec<PathBuf>, BuildError> {
        let mut classpath = Vec::new();

        if !self.java_only {
            classpath.extend(self.language_libraries.iter().cloned());
        }

        for entry in &self.entries {
            let text = entry.to_string_lossy();
            if text.contains(['*', '?', '[']) {
                let mut matches: Vec<PathBuf> = glob::glob(&text)?
                    .filter_map(|m| m.ok())
                    .collect();
                matches.sort();
                if matches.is_empty() {
                    warn!("Classpath pattern {} matched nothing", text);
                }
                classpath.extend(matches);
            } else {
                classpath.push(entry.clone());
            }
        }

        for dir in &self.lib_dirs {
            if !dir.is_dir() {
                warn!("Library directory {:?} does not exist, skipping", dir);
                continue;
            }
            classpath.extend(
                WalkDir::new(dir)
                    .sort_by_file_name()
                    .into_iter()
                    .filter_map(|e| e.ok())
                    .filter(|e| e.file_type().is_file())
                    .filter(|e| {
                        e.path()
                            .extension()
                            .map(|ext| ext.eq_ignore_ascii_case("jar"))
                            .unwrap_or(false)
                    })
                    .map(|e| e.into_path()),
            );
        }

        debug!("Discovered {} classpath entries", classpath.len());
        Ok(classpath)
    }
}
