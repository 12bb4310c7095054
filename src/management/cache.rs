use std::{
    io::Error,
    path::{Path, PathBuf},
};

/// Reads the pixel dimensions of a cached entry from its image header.
///
/// Only the header is parsed, so listing a large cache stays cheap. `None`
/// marks an entry that is not a readable image; full decode validation
/// stays with the resolver.
pub fn entry_dimensions(path: &Path) -> Option<(u32, u32)> {
    image::ImageReader::open(path)
        .ok()?
        .with_guessed_format()
        .ok()?
        .into_dimensions()
        .ok()
}

#[derive(Debug)]
pub enum CacheError {
    IoError(Error),
    CriticalError(String),
}

impl From<Error> for CacheError {
    fn from(err: Error) -> Self {
        CacheError::IoError(err)
    }
}

/// Manages the flat on-disk cover cache: a directory of `{key}.jpg` files.
///
/// The manager owns path derivation and bulk operations; entry validity is
/// decided elsewhere, since a cached file's existence never implies it still
/// decodes to an acceptable cover.
pub struct CoverCacheManager {
    root: PathBuf,
}

impl CoverCacheManager {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Cache file path for a cache key.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.jpg"))
    }

    pub async fn ensure_dir(&self) -> Result<(), CacheError> {
        async_fs::create_dir_all(&self.root)
            .await
            .map_err(CacheError::IoError)
    }

    /// Lists all cached cover files, sorted by file name.
    ///
    /// A missing cache directory counts as an empty cache.
    pub fn entries(&self) -> Result<Vec<PathBuf>, CacheError> {
        let read_dir = match std::fs::read_dir(&self.root) {
            Ok(read_dir) => read_dir,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(CacheError::IoError(err)),
        };

        let mut entries = Vec::new();
        for entry in read_dir {
            let path = entry.map_err(CacheError::IoError)?.path();
            if path.extension().is_some_and(|ext| ext == "jpg") {
                entries.push(path);
            }
        }
        entries.sort();
        Ok(entries)
    }

    /// Removes every cached cover and returns how many were deleted.
    pub fn clear(&self) -> Result<usize, CacheError> {
        let entries = self.entries()?;
        let mut removed = 0;
        for path in &entries {
            std::fs::remove_file(path).map_err(CacheError::IoError)?;
            removed += 1;
        }
        Ok(removed)
    }

    /// Writes cover bytes for a key and returns the entry path.
    ///
    /// The bytes are expected to be validated by the caller; the manager
    /// only persists them.
    pub async fn store(&self, key: &str, bytes: &[u8]) -> Result<PathBuf, CacheError> {
        if key.is_empty() {
            return Err(CacheError::CriticalError(
                "refusing to store a cover under an empty cache key".to_string(),
            ));
        }
        self.ensure_dir().await?;
        let path = self.path_for(key);
        async_fs::write(&path, bytes)
            .await
            .map_err(CacheError::IoError)?;
        Ok(path)
    }
}
