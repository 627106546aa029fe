//! Request-scoped temp files.
//!
//! Uploads that a capability can only read from disk are written into the
//! scratch directory and wrapped in a [`ScratchFile`]. The guard removes the
//! file when it goes out of scope, so every handler exit path (success, error
//! or early return) cleans up after itself.

use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::error::Result;

#[derive(Debug, Clone)]
pub struct ScratchDir {
    root: PathBuf,
}

impl ScratchDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the directory if it is absent.
    pub async fn ensure(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.root).await?;
        Ok(())
    }

    /// Reserve a pair of paths for one request: the upload, named after the
    /// client's filename, and the derived output with `output_ext`.
    ///
    /// A per-request prefix keeps concurrent uploads of the same name apart.
    pub fn reserve(&self, file_name: &str, output_ext: &str) -> ScratchPaths {
        let prefix = Uuid::new_v4().simple().to_string();
        let safe_name = sanitize_file_name(file_name);
        let stem = file_stem(&safe_name).to_string();

        ScratchPaths {
            input: self.root.join(format!("{prefix}-{safe_name}")),
            output: self.root.join(format!("{prefix}-{stem}.{output_ext}")),
            download_name: format!("{stem}.{output_ext}"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScratchPaths {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Filename offered to the client for the output.
    pub download_name: String,
}

/// Deletes its path on drop. Errors are ignored.
#[derive(Debug)]
pub struct ScratchFile {
    path: PathBuf,
}

impl ScratchFile {
    /// Take ownership of a path that may not exist yet.
    pub fn claim(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Write `bytes` to `path` and return its guard.
    pub async fn write(path: impl Into<PathBuf>, bytes: &[u8]) -> Result<Self> {
        let guard = Self::claim(path);
        tokio::fs::write(&guard.path, bytes).await?;
        Ok(guard)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::debug!(path = %self.path.display(), error = %e, "Failed to remove scratch file");
            }
        }
    }
}

/// Reduce a client-supplied filename to a single safe path component.
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or("");

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '.' | '-' | '_' | ' ') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let cleaned = cleaned.trim().trim_start_matches('.').to_string();
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned
    }
}

/// Everything before the last `.`, or the whole name if there is none.
pub fn file_stem(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => name,
    }
}
