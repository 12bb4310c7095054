use image::GenericImageView;
use reqwest::Client;

use crate::{config, types::EditionRecord, utils};

/// Tries to fetch a cover image from Open Library for an ISBN.
///
/// Looks up the edition record at `/isbn/{isbn}.json` first and only follows
/// an explicit cover reference from the metadata. Editions without cover
/// data yield `None` rather than an attempt against the generic
/// `/b/isbn/...` guess URL, which can silently serve unrelated art.
///
/// The largest rendition (`-L.jpg`) of the referenced cover is fetched and
/// decoded; images smaller than 200px on either axis are rejected.
///
/// # Returns
///
/// The raw image bytes of an acceptably sized cover, or `None`. Network
/// errors, timeouts, missing editions, absent cover references, and decode
/// failures are all treated identically as "no cover here".
pub async fn fetch_by_isbn(isbn: &str) -> Option<Vec<u8>> {
    let client = Client::builder()
        .timeout(config::fetch_timeout())
        .build()
        .ok()?;

    let api_url = format!(
        "{uri}/isbn/{isbn}.json",
        uri = config::openlibrary_api_url(),
        isbn = isbn
    );
    let edition = client
        .get(&api_url)
        .send()
        .await
        .ok()?
        .error_for_status()
        .ok()?
        .json::<EditionRecord>()
        .await
        .ok()?;

    // Open Library occasionally lists -1 for deleted covers.
    let cover_id = edition.covers.into_iter().find(|id| *id > 0)?;

    let image_url = format!(
        "{uri}/b/id/{id}-L.jpg",
        uri = config::openlibrary_covers_url(),
        id = cover_id
    );
    let bytes = client
        .get(&image_url)
        .send()
        .await
        .ok()?
        .error_for_status()
        .ok()?
        .bytes()
        .await
        .ok()?;

    let decoded = image::load_from_memory(&bytes).ok()?;
    let (width, height) = decoded.dimensions();
    if width < utils::MIN_COVER_DIMENSION || height < utils::MIN_COVER_DIMENSION {
        return None;
    }

    Some(bytes.to_vec())
}
