//! Document root confinement
//!
//! Maps request targets onto files below a single root directory. Both
//! the requested path and the root are canonicalized before comparing
//! them, so `..` segments and symbolic links pointing outside the root
//! are rejected.
//!
//! The check and the later `open` are separate filesystem operations; a
//! symlink swapped in between is not detected.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Longest joined path accepted before canonicalization.
pub const MAX_PATH_LEN: usize = 4096;

/// Why a request target could not be mapped to a servable file.
///
/// Callers answer every variant with the same 404 so clients cannot tell
/// a missing file from a confinement rejection.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("joined path of {len} bytes exceeds the path length limit")]
    TooLong { len: usize },

    #[error("cannot canonicalize {}: {source}", .path.display())]
    Canonicalize {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot canonicalize document root: {0}")]
    Root(#[source] io::Error),

    #[error("{} is outside the document root", .path.display())]
    OutsideRoot { path: PathBuf },

    #[error("cannot open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{} is not a regular file", .path.display())]
    NotRegularFile { path: PathBuf },
}

/// The directory files are served from.
#[derive(Debug, Clone)]
pub struct DocumentRoot {
    root: PathBuf,
    default_document: String,
}

impl DocumentRoot {
    /// Canonicalize `root` once. Fails if the directory does not exist.
    pub fn new(root: impl AsRef<Path>, default_document: impl Into<String>) -> Result<Self, ResolveError> {
        let root = fs::canonicalize(root.as_ref()).map_err(ResolveError::Root)?;
        Ok(Self {
            root,
            default_document: default_document.into(),
        })
    }

    /// Canonical root path.
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Resolve a raw request target to a canonical path inside the root.
    ///
    /// The query component is ignored. An empty target or `/` maps to the
    /// default document.
    pub fn resolve(&self, target: &str) -> Result<PathBuf, ResolveError> {
        let target = if target.is_empty() || target == "/" {
            self.default_document.as_str()
        } else {
            target
        };

        let relative = match target.find('?') {
            Some(idx) => &target[..idx],
            None => target,
        };
        let relative = relative.strip_prefix('/').unwrap_or(relative);

        // Textual join: an absolute remainder must never replace the root
        let mut joined = OsString::with_capacity(self.root.as_os_str().len() + 1 + relative.len());
        joined.push(self.root.as_os_str());
        joined.push("/");
        joined.push(relative);

        if joined.len() > MAX_PATH_LEN {
            return Err(ResolveError::TooLong { len: joined.len() });
        }

        let joined = PathBuf::from(joined);
        let canonical = fs::canonicalize(&joined).map_err(|source| ResolveError::Canonicalize {
            path: joined.clone(),
            source,
        })?;
        let root = fs::canonicalize(&self.root).map_err(ResolveError::Root)?;

        // Path::starts_with compares whole components, so "/srv/www2"
        // is not inside "/srv/www"
        if !canonical.starts_with(&root) {
            return Err(ResolveError::OutsideRoot { path: canonical });
        }

        Ok(canonical)
    }
}

/// Open a resolved path and return it with its size at stat time.
///
/// The metadata comes from the open handle, so the size matches the file
/// actually streamed.
pub fn open_regular(path: &Path) -> Result<(File, u64), ResolveError> {
    let file = File::open(path).map_err(|source| ResolveError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let metadata = file.metadata().map_err(|source| ResolveError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    if !metadata.is_file() {
        return Err(ResolveError::NotRegularFile {
            path: path.to_path_buf(),
        });
    }

    Ok((file, metadata.len()))
}
