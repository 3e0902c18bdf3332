//! Sharded, path-addressed file cache for avatar artifacts.

use std::io::Write;
use std::path::{Component, Path, PathBuf};
use std::time::{Duration, SystemTime};

use regex::Regex;
use tokio::fs;
use tokio::sync::OnceCell;
use tracing::{debug, error, trace, warn};
use walkdir::WalkDir;

use super::filter::{AgeFilter, CacheFilter, PatternFilter};
use crate::domain::errors::FilesystemError;

/// File cache rooted at a public directory and mirrored under a public URL.
///
/// Per-file operations never fail loudly: they report success as a `bool`
/// so callers can fall back to a default avatar.
#[derive(Debug)]
pub struct FileCache {
    root: PathBuf,
    base_url: String,
    base_dir: OnceCell<PathBuf>,
}

impl FileCache {
    /// Creates a cache rooted at `root`, served under `base_url`.
    ///
    /// The root directory is created lazily by [`FileCache::get_base_dir`].
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, base_url: &str) -> Self {
        let mut base_url = base_url.trim().to_string();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        Self {
            root: root.into(),
            base_url,
            base_dir: OnceCell::new(),
        }
    }

    /// Returns the storage root, creating it on first use.
    ///
    /// # Errors
    /// Returns error if the directory cannot be created.
    pub async fn get_base_dir(&self) -> Result<&Path, FilesystemError> {
        self.base_dir
            .get_or_try_init(|| async {
                if let Ok(meta) = fs::metadata(&self.root).await
                    && !meta.is_dir()
                {
                    return Err(FilesystemError::NotADirectory {
                        path: self.root.clone(),
                    });
                }

                fs::create_dir_all(&self.root)
                    .await
                    .map_err(|e| FilesystemError::create_dir(&self.root, e))?;

                debug!(path = %self.root.display(), "Cache root ready");
                Ok(self.root.clone())
            })
            .await
            .map(PathBuf::as_path)
    }

    /// Returns the public URL prefix, always ending in `/`.
    #[must_use]
    pub fn get_base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the public URL of `relative_path` without checking it exists.
    #[must_use]
    pub fn get_url(&self, relative_path: &str) -> String {
        format!("{}{}", self.base_url, relative_path.trim_start_matches('/'))
    }

    /// Stores `bytes` at `relative_path`.
    ///
    /// Without `force` an existing file is left untouched and counts as
    /// success. The file is written to a temporary sibling first, so readers
    /// never observe partial content.
    pub async fn set(&self, relative_path: &str, bytes: &[u8], force: bool) -> bool {
        let Some(path) = self.absolute(relative_path).await else {
            return false;
        };

        if !force && fs::try_exists(&path).await.unwrap_or(false) {
            trace!(path = %path.display(), "Cache entry exists, not overwriting");
            return true;
        }

        let Some(parent) = path.parent().map(Path::to_path_buf) else {
            return false;
        };
        if let Err(e) = fs::create_dir_all(&parent).await {
            warn!(path = %parent.display(), error = %e, "Failed to create cache directory");
            return false;
        }

        let bytes = bytes.to_vec();
        let target = path.clone();
        let result = tokio::task::spawn_blocking(move || -> std::io::Result<()> {
            let mut temp_file = tempfile::NamedTempFile::new_in(&parent)?;
            temp_file.write_all(&bytes)?;
            if force {
                temp_file.persist(&target).map_err(|e| e.error)?;
            } else {
                match temp_file.persist_noclobber(&target) {
                    Ok(_) => {}
                    Err(e) if e.error.kind() == std::io::ErrorKind::AlreadyExists => {}
                    Err(e) => return Err(e.error),
                }
            }
            Ok(())
        })
        .await;

        match result {
            Ok(Ok(())) => {
                debug!(path = %path.display(), force, "Stored cache entry");
                true
            }
            Ok(Err(e)) => {
                warn!(path = %path.display(), error = %e, "Failed to write cache entry");
                false
            }
            Err(e) => {
                error!(path = %path.display(), error = %e, "Cache write task panicked");
                false
            }
        }
    }

    /// Reads the bytes stored at `relative_path`.
    pub async fn get(&self, relative_path: &str) -> Option<Vec<u8>> {
        let path = self.absolute(relative_path).await?;
        fs::read(&path).await.ok()
    }

    /// Checks whether `relative_path` exists.
    pub async fn contains(&self, relative_path: &str) -> bool {
        match self.absolute(relative_path).await {
            Some(path) => fs::try_exists(&path).await.unwrap_or(false),
            None => false,
        }
    }

    /// Removes the file at `relative_path`.
    ///
    /// Returns false if it does not exist or cannot be removed.
    pub async fn delete(&self, relative_path: &str) -> bool {
        let Some(path) = self.absolute(relative_path).await else {
            return false;
        };

        match fs::remove_file(&path).await {
            Ok(()) => {
                debug!(path = %path.display(), "Deleted cache entry");
                true
            }
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    warn!(path = %path.display(), error = %e, "Failed to delete cache entry");
                }
                false
            }
        }
    }

    /// Removes every writable file below `subdir` whose path matches `pattern`.
    ///
    /// Returns the number of removed files. Missing or unreadable subtrees
    /// are skipped.
    pub async fn invalidate(&self, subdir: &str, pattern: &Regex) -> usize {
        self.remove_matching(subdir, PatternFilter::new(pattern.clone()))
            .await
    }

    /// Removes every writable file below `subdir` matching `pattern` that is
    /// older than `max_age`.
    pub async fn invalidate_older_than(
        &self,
        max_age: Duration,
        subdir: &str,
        pattern: &Regex,
    ) -> usize {
        let filter = AgeFilter::new(pattern.clone(), max_age, SystemTime::now());
        self.remove_matching(subdir, filter).await
    }

    /// Walks `subdir` and removes every writable file accepted by `filter`.
    pub async fn remove_matching<F>(&self, subdir: &str, filter: F) -> usize
    where
        F: CacheFilter + 'static,
    {
        let Some(dir) = self.absolute(subdir).await else {
            return 0;
        };

        let walked = dir.clone();
        match tokio::task::spawn_blocking(move || remove_matching_blocking(&walked, &filter)).await
        {
            Ok(removed) => {
                if removed > 0 {
                    debug!(dir = %dir.display(), removed, "Invalidated cache entries");
                }
                removed
            }
            Err(e) => {
                error!(dir = %dir.display(), error = %e, "Invalidation task panicked");
                0
            }
        }
    }

    /// Resolves a relative path below the base dir, rejecting escapes.
    async fn absolute(&self, relative_path: &str) -> Option<PathBuf> {
        let base = match self.get_base_dir().await {
            Ok(base) => base,
            Err(e) => {
                warn!(error = %e, "Cache root unavailable");
                return None;
            }
        };

        let relative = Path::new(relative_path);
        if !relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
        {
            warn!(path = relative_path, "Rejected cache path outside the cache root");
            return None;
        }

        Some(base.join(relative))
    }
}

fn remove_matching_blocking(dir: &Path, filter: &dyn CacheFilter) -> usize {
    let mut removed = 0;

    for entry in WalkDir::new(dir).min_depth(1).into_iter().filter_map(Result::ok) {
        if entry.file_type().is_dir() {
            continue;
        }

        let Ok(metadata) = entry.metadata() else {
            continue;
        };

        if metadata.permissions().readonly() || !filter.matches(entry.path(), &metadata) {
            continue;
        }

        match std::fs::remove_file(entry.path()) {
            Ok(()) => {
                trace!(path = %entry.path().display(), "Removed cache entry");
                removed += 1;
            }
            Err(e) => {
                warn!(path = %entry.path().display(), error = %e, "Failed to remove cache entry");
            }
        }
    }

    removed
}
