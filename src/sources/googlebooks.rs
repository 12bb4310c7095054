use image::GenericImageView;
use reqwest::Client;

use crate::{config, types::VolumesResponse, utils};

/// How many ranked search results to inspect before giving up.
const MAX_RESULTS: usize = 5;

/// Tries to fetch a cover image from the Google Books volume search.
///
/// With an ISBN the query is `isbn:{isbn}`; otherwise a quoted-title (plus
/// quoted-author, when given) free-text query is used. The first
/// [`MAX_RESULTS`] results are inspected in ranked order. For each, the
/// largest available image link is normalized and downloaded, and the first
/// candidate that decodes to at least 200px on both axes and does not look
/// like a "cover not available" placeholder wins.
///
/// Retrying an unsuccessful ISBN query with title/author is the resolver's
/// job, not this client's.
///
/// # Returns
///
/// The raw bytes of the first acceptable cover, or `None`. All failures
/// (network, malformed response, decode, validation) degrade to `None`.
pub async fn fetch_cover(
    isbn: Option<&str>,
    title: Option<&str>,
    author: Option<&str>,
) -> Option<Vec<u8>> {
    let query = build_query(isbn, title, author)?;
    let client = Client::builder()
        .timeout(config::fetch_timeout())
        .build()
        .ok()?;

    let api_url = format!(
        "{uri}/volumes?q={query}",
        uri = config::googlebooks_api_url(),
        query = query
    );
    let volumes = client
        .get(&api_url)
        .send()
        .await
        .ok()?
        .error_for_status()
        .ok()?
        .json::<VolumesResponse>()
        .await
        .ok()?;

    if volumes.total_items == 0 {
        return None;
    }

    for volume in volumes.items.iter().take(MAX_RESULTS) {
        let Some(links) = volume
            .volume_info
            .as_ref()
            .and_then(|info| info.image_links.as_ref())
        else {
            continue;
        };
        let Some(link) = links.best() else {
            continue;
        };

        let image_url = normalize_image_url(link);
        let Ok(response) = client.get(&image_url).send().await else {
            continue;
        };
        let Ok(response) = response.error_for_status() else {
            continue;
        };
        let Ok(bytes) = response.bytes().await else {
            continue;
        };

        let Ok(decoded) = image::load_from_memory(&bytes) else {
            continue;
        };
        let (width, height) = decoded.dimensions();
        if width < utils::MIN_COVER_DIMENSION
            || height < utils::MIN_COVER_DIMENSION
            || utils::is_placeholder(&decoded)
        {
            continue;
        }

        return Some(bytes.to_vec());
    }

    None
}

/// Builds the url-encoded search query for a volume lookup.
///
/// ISBN queries take precedence and need no encoding. Title queries quote
/// the title (and author) so multi-word names match as phrases.
pub fn build_query(isbn: Option<&str>, title: Option<&str>, author: Option<&str>) -> Option<String> {
    if let Some(isbn) = isbn {
        return Some(format!("isbn:{isbn}"));
    }

    let title = title.filter(|t| !t.trim().is_empty())?;
    let mut query = format!("intitle:\"{title}\"");
    if let Some(author) = author.filter(|a| !a.trim().is_empty()) {
        query.push_str(&format!("+inauthor:\"{author}\""));
    }
    Some(urlencoding::encode(&query).into_owned())
}

/// Normalizes a Google Books image link before downloading.
///
/// Google serves plain-http links with a decorative page-curl edge effect
/// and a conservative zoom level; this upgrades to https, strips the edge
/// effect, and bumps `zoom=1` to `zoom=3` for a larger rendition.
pub fn normalize_image_url(url: &str) -> String {
    let mut normalized = url.replacen("http://", "https://", 1);
    normalized = normalized.replace("&edge=curl", "");
    if normalized.contains("zoom=1") {
        normalized = normalized.replace("zoom=1", "zoom=3");
    }
    normalized
}
