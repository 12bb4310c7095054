use std::path::PathBuf;

use reqwest::Client;

use crate::{config, error, management::CoverCacheManager, success, utils};

/// Manually adds a cover image to the cache for a book.
///
/// The image comes either from a URL (fetched with the longer manual-add
/// timeout) or from a local file. It must decode, measure at least 200px on
/// both axes, and not look like a placeholder graphic before it is stored
/// under the key derived from the given identity fields.
pub async fn add_cover(
    isbn: Option<String>,
    title: Option<String>,
    author: Option<String>,
    url: Option<String>,
    file: Option<PathBuf>,
) {
    if isbn.is_none() && title.is_none() {
        error!("Provide at least --isbn or --title to identify the book.");
    }

    let bytes = if let Some(url) = url {
        match download(&url).await {
            Some(bytes) => bytes,
            None => error!("Cannot download cover from {}", url),
        }
    } else if let Some(file) = file {
        match async_fs::read(&file).await {
            Ok(bytes) => bytes,
            Err(e) => error!("Cannot read {}. Err: {}", file.display(), e),
        }
    } else {
        error!("Provide --url or --file for the cover image.")
    };

    let decoded = match image::load_from_memory(&bytes) {
        Ok(decoded) => decoded,
        Err(e) => error!("Not a decodable image. Err: {}", e),
    };
    if !utils::is_valid_cover(&decoded) {
        error!(
            "Image rejected: smaller than {}px on an axis or looks like a placeholder.",
            utils::MIN_COVER_DIMENSION
        );
    }

    let key = utils::derive_cache_key(isbn.as_deref(), title.as_deref(), author.as_deref());
    let manager = CoverCacheManager::new(config::cache_dir());
    match manager.store(&key, &bytes).await {
        Ok(path) => success!("Cover cached at {}", path.display()),
        Err(e) => error!("Cannot store cover. Err: {:?}", e),
    }
}

async fn download(url: &str) -> Option<Vec<u8>> {
    let client = Client::builder()
        .timeout(config::manual_fetch_timeout())
        .build()
        .ok()?;
    let bytes = client
        .get(url)
        .send()
        .await
        .ok()?
        .error_for_status()
        .ok()?
        .bytes()
        .await
        .ok()?;
    Some(bytes.to_vec())
}
