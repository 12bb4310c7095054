//! Configuration management for the cover collage generator.
//!
//! This module handles loading and accessing configuration values from
//! environment variables and `.env` files. It provides a centralized way to
//! manage application configuration including the cover cache location, the
//! base URLs of the remote cover sources, and network timeouts.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults
//!
//! Every value has a working default, so the tool runs without any setup.
//! The overrides exist mainly so tests can point the source clients at an
//! isolated address and substitute a temporary cache directory.

use std::{env, path::PathBuf, time::Duration};

use crate::Res;

/// Loads environment variables from a `.env` file in the local data directory.
///
/// Creates the necessary directory structure if it doesn't exist and loads
/// environment variables from a `.env` file located in the platform-specific
/// local data directory under `covergen/.env`. A missing file is not an
/// error; all configuration values have defaults.
///
/// # Directory Structure
///
/// The function looks for the `.env` file in:
/// - Linux: `~/.local/share/covergen/.env`
/// - macOS: `~/Library/Application Support/covergen/.env`
/// - Windows: `%LOCALAPPDATA%/covergen/.env`
///
/// # Errors
///
/// This function will return an error if:
/// - The parent directory cannot be created
/// - An existing `.env` file cannot be read or parsed
pub async fn load_env() -> Res<()> {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("covergen/.env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent).await?;
    }

    if path.is_file() {
        dotenv::from_path(path)?;
    }
    Ok(())
}

/// Returns the directory used to cache downloaded cover images.
///
/// Honors the `COVERGEN_CACHE_DIR` environment variable when set, otherwise
/// defaults to `covergen/covers` inside the platform-specific local data
/// directory. This is only the CLI-level default; the fetcher takes the
/// cache directory as an explicit argument on every call so tests can
/// substitute an isolated temporary directory.
///
/// # Example
///
/// ```
/// let dir = cache_dir(); // e.g. ~/.local/share/covergen/covers
/// ```
pub fn cache_dir() -> PathBuf {
    if let Ok(dir) = env::var("COVERGEN_CACHE_DIR") {
        return PathBuf::from(dir);
    }
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("covergen/covers");
    path
}

/// Returns the base URL of the Open Library metadata API.
///
/// Honors the `OPENLIBRARY_API_URL` environment variable when set. The
/// edition lookup endpoint `/isbn/{isbn}.json` is resolved against this base.
pub fn openlibrary_api_url() -> String {
    env::var("OPENLIBRARY_API_URL").unwrap_or_else(|_| "https://openlibrary.org".to_string())
}

/// Returns the base URL of the Open Library covers host.
///
/// Honors the `OPENLIBRARY_COVERS_URL` environment variable when set. Cover
/// renditions are fetched from `/b/id/{cover_id}-L.jpg` on this host.
pub fn openlibrary_covers_url() -> String {
    env::var("OPENLIBRARY_COVERS_URL")
        .unwrap_or_else(|_| "https://covers.openlibrary.org".to_string())
}

/// Returns the base URL of the Google Books volumes API.
///
/// Honors the `GOOGLEBOOKS_API_URL` environment variable when set. The
/// volume search endpoint `/volumes?q=...` is resolved against this base.
pub fn googlebooks_api_url() -> String {
    env::var("GOOGLEBOOKS_API_URL")
        .unwrap_or_else(|_| "https://www.googleapis.com/books/v1".to_string())
}

/// Per-request timeout for cover source lookups and downloads.
pub fn fetch_timeout() -> Duration {
    Duration::from_secs(10)
}

/// Per-request timeout for manual single-cover additions.
///
/// Manual adds point at arbitrary user-supplied URLs which may be slower
/// than the well-provisioned source APIs, so they get a longer budget.
pub fn manual_fetch_timeout() -> Duration {
    Duration::from_secs(30)
}
