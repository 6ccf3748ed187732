//! Output Staging
//!
//! Removes stale output before a rebuild and stages library archives where
//! the engine expects them.

use std::io;
use std::path::Path;
use tokio::fs;
use tracing::{debug, info};

use fxpack_buildfile::{Descriptor, OutputLayout};

use crate::BuildError;

async fn remove_stale(path: &Path) -> Result<(), BuildError> {
    match fs::remove_dir_all(path).await {
        Ok(()) => debug!("Removed previous output {:?}", path),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => {
            return Err(BuildError::StalePreviousBuild {
                path: path.to_path_buf(),
                source: e,
            })
        }
    }

    if fs::symlink_metadata(path).await.is_ok() {
        return Err(BuildError::StalePreviousBuild {
            path: path.to_path_buf(),
            source: io::Error::new(io::ErrorKind::Other, "path still exists after removal"),
        });
    }
    Ok(())
}

/// Remove the previous package directory and the library staging directory.
///
/// Anything that cannot be fully removed is reported as a stale build
/// instead of being merged with the new output.
pub async fn remove_previous_build(layout: &OutputLayout) -> Result<(), BuildError> {
    remove_stale(&layout.output_dir).await?;
    remove_stale(&layout.staging_dir).await?;
    Ok(())
}

/// Remove everything a packaging run leaves behind for this layout
pub async fn clean(layout: &OutputLayout) -> Result<(), BuildError> {
    remove_previous_build(layout).await?;
    match fs::remove_file(&layout.buildfile).await {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e.into()),
    }
    info!("Cleaned {:?}", layout.output_root);
    Ok(())
}

/// Copy every library archive into the staging directory
pub async fn stage_libraries(descriptor: &Descriptor) -> Result<usize, BuildError> {
    fs::create_dir_all(&descriptor.layout.staging_dir).await?;

    for lib in &descriptor.libraries {
        if !lib.source.is_file() {
            return Err(BuildError::MissingLibrary(lib.source.clone()));
        }
        fs::copy(&lib.source, &lib.staged).await?;
        debug!("Staged {:?}", lib.staged);
    }

    info!(
        "Staged {} libraries in {:?}",
        descriptor.libraries.len(),
        descriptor.layout.staging_dir
    );
    Ok(descriptor.libraries.len())
}
