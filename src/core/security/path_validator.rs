use std::io;
use std::path::{Path, PathBuf};

/// Errors that can occur during path validation
#[derive(Debug, thiserror::Error)]
pub enum PathSecurityError {
    #[error("Path '{path}' is outside allowed root directory '{root}'")]
    OutsideRootDirectory { path: PathBuf, root: PathBuf },

    #[error("Symlink '{path}' is not allowed")]
    SymlinkNotAllowed { path: PathBuf },

    #[error("Path does not exist: '{path}'")]
    PathNotFound {
        path: PathBuf,
        #[source]
        error: io::Error,
    },

    #[error("IO error for path '{path}': {error}")]
    IoError { path: PathBuf, error: io::Error },
}

/// Validates that `path` resolves to a location inside `root`.
///
/// This function performs the following checks:
/// 1. Canonicalizes the root and the input path to resolve `.`, `..`, and symlinks
/// 2. Ensures the canonical path is within the canonical root
/// 3. Rejects a symlinked input path when `allow_symlinks` is false
///
/// # Returns
///
/// * `Ok(PathBuf)` - The canonicalized, validated path
/// * `Err(PathSecurityError)` - If validation fails. A missing root or a
///   missing path are both reported as [`PathSecurityError::PathNotFound`].
///
/// # Examples
///
/// ```rust,ignore
/// let template = validate_path(Path::new("templates/book.html"), Path::new("templates"), true)?;
/// ```
pub fn validate_path(
    path: &Path,
    root: &Path,
    allow_symlinks: bool,
) -> Result<PathBuf, PathSecurityError> {
    let canonical_root = canonicalize_path(root)?;

    if !allow_symlinks && path.is_symlink() {
        return Err(PathSecurityError::SymlinkNotAllowed {
            path: path.to_path_buf(),
        });
    }

    let canonical_path = canonicalize_path(path)?;

    if !is_within_root(&canonical_path, &canonical_root) {
        return Err(PathSecurityError::OutsideRootDirectory {
            path: canonical_path,
            root: canonical_root,
        });
    }

    Ok(canonical_path)
}

/// Checks if a path is within (or equal to) a root directory
fn is_within_root(path: &Path, root: &Path) -> bool {
    path.starts_with(root)
}

fn canonicalize_path(path: &Path) -> Result<PathBuf, PathSecurityError> {
    path.canonicalize().map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            PathSecurityError::PathNotFound {
                path: path.to_path_buf(),
                error: e,
            }
        } else {
            PathSecurityError::IoError {
                path: path.to_path_buf(),
                error: e,
            }
        }
    })
}
