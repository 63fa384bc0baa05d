use crate::script::InstallerScript;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmitError {
    #[error("Destination directory {} does not exist or is not a directory", .path.display())]
    MissingDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Destination {} is a directory", .path.display())]
    DestinationIsDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Existing file {} is not writable", .path.display())]
    NotWritable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Could not create a file in {}", .path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Could not write installer script for {}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Could not set permissions {mode:o} on {}", .path.display())]
    Permissions {
        path: PathBuf,
        mode: u32,
        #[source]
        source: io::Error,
    },
    #[error("Could not move installer script into place at {}", .path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

fn has_trailing_separator(path: &Path) -> bool {
    path.as_os_str()
        .to_string_lossy()
        .ends_with(std::path::is_separator)
}

/// Directory the script lands in; a bare file name means the working directory.
fn parent_dir(destination: &Path) -> PathBuf {
    match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Follow a symlinked destination to the file it points at, so the link
/// itself survives. A dangling link resolves to its (missing) target.
fn resolve_target(destination: &Path) -> PathBuf {
    let is_link = fs::symlink_metadata(destination)
        .map(|meta| meta.file_type().is_symlink())
        .unwrap_or(false);
    if !is_link {
        return destination.to_path_buf();
    }

    match fs::canonicalize(destination) {
        Ok(target) => target,
        Err(_) => match fs::read_link(destination) {
            Ok(link) if link.is_absolute() => link,
            Ok(link) => parent_dir(destination).join(link),
            Err(_) => destination.to_path_buf(),
        },
    }
}

fn ensure_directory(dir: &Path) -> Result<(), EmitError> {
    match fs::metadata(dir) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(EmitError::MissingDirectory {
            path: dir.to_path_buf(),
            source: io::Error::new(io::ErrorKind::InvalidInput, "not a directory"),
        }),
        Err(source) => Err(EmitError::MissingDirectory {
            path: dir.to_path_buf(),
            source,
        }),
    }
}

/// Write `script` to its destination and make it executable.
///
/// The content is staged in a temporary file next to the destination, made
/// executable, then renamed over the destination. A symlinked destination is
/// written through to its target. An existing file must be writable, the same
/// as for an in-place overwrite; on failure the destination is left untouched.
pub fn emit(script: &InstallerScript) -> Result<PathBuf, EmitError> {
    let destination = &script.destination_path;

    // "dir/" names a directory, never a file
    if has_trailing_separator(destination) {
        ensure_directory(destination)?;
        return Err(EmitError::DestinationIsDirectory {
            path: destination.clone(),
            source: io::Error::new(io::ErrorKind::InvalidInput, "is a directory"),
        });
    }

    let target = resolve_target(destination);
    if target != *destination {
        tracing::debug!(
            "{} is a symlink, writing through to {}",
            destination.display(),
            target.display()
        );
    }

    let parent = parent_dir(&target);
    ensure_directory(&parent)?;

    if let Ok(meta) = fs::metadata(&target) {
        if meta.is_dir() {
            return Err(EmitError::DestinationIsDirectory {
                path: destination.clone(),
                source: io::Error::new(io::ErrorKind::InvalidInput, "is a directory"),
            });
        }
        // Opening without truncation leaves the file as it is
        OpenOptions::new()
            .write(true)
            .open(&target)
            .map_err(|source| EmitError::NotWritable {
                path: target.clone(),
                source,
            })?;
    }

    let mut staged = NamedTempFile::new_in(&parent).map_err(|source| EmitError::Create {
        path: parent.clone(),
        source,
    })?;
    tracing::debug!("Staging installer script at {}", staged.path().display());

    staged
        .write_all(script.content.as_bytes())
        .and_then(|_| staged.as_file().sync_all())
        .map_err(|source| EmitError::Write {
            path: destination.clone(),
            source,
        })?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = fs::Permissions::from_mode(script.permission_mode);
        fs::set_permissions(staged.path(), perms).map_err(|source| EmitError::Permissions {
            path: destination.clone(),
            mode: script.permission_mode,
            source,
        })?;
    }
    #[cfg(not(unix))]
    tracing::debug!(
        "Skipping permission mode {:o} on this platform",
        script.permission_mode
    );

    staged
        .persist(&target)
        .map_err(|err| EmitError::Persist {
            path: destination.clone(),
            source: err.error,
        })?;

    tracing::info!(
        "Wrote installer script to {} (mode {:o})",
        destination.display(),
        script.permission_mode
    );
    Ok(destination.clone())
}
