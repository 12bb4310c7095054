use serde::Deserialize;
use tabled::Tabled;

/// A single book from a Goodreads export, immutable once parsed.
#[derive(Debug, Clone)]
pub struct Book {
    pub title: String,
    pub author: String,
    pub isbn: Option<String>,
    pub isbn13: Option<String>,
    pub date_read: Option<String>,
}

impl Book {
    /// Returns the best available identifier: ISBN-13 if present, else ISBN-10.
    ///
    /// Goodreads wraps ISBN columns in an `="..."` quoting artifact which is
    /// stripped here; a field that is empty after stripping counts as absent.
    pub fn best_isbn(&self) -> Option<String> {
        Self::clean_isbn(self.isbn13.as_deref()).or_else(|| Self::clean_isbn(self.isbn.as_deref()))
    }

    /// Returns the leading 4-digit year of the `Date Read` field, if parsable.
    ///
    /// Goodreads dates are formatted `YYYY/MM/DD`.
    pub fn read_year(&self) -> Option<i32> {
        self.date_read
            .as_deref()?
            .split('/')
            .next()?
            .parse::<i32>()
            .ok()
    }

    fn clean_isbn(value: Option<&str>) -> Option<String> {
        let cleaned = value?
            .trim()
            .trim_start_matches("=\"")
            .trim_matches('"')
            .trim_matches('=')
            .to_string();
        if cleaned.is_empty() { None } else { Some(cleaned) }
    }
}

/// Raw row of a Goodreads CSV export. Only the columns we use are mapped;
/// absent columns deserialize to empty strings.
#[derive(Debug, Clone, Deserialize)]
pub struct GoodreadsRecord {
    #[serde(rename = "Title", default)]
    pub title: String,
    #[serde(rename = "Author", default)]
    pub author: String,
    #[serde(rename = "ISBN", default)]
    pub isbn: String,
    #[serde(rename = "ISBN13", default)]
    pub isbn13: String,
    #[serde(rename = "Date Read", default)]
    pub date_read: String,
}

/// Open Library edition record, as returned by `/isbn/{isbn}.json`.
///
/// Only the cover references matter here; editions without cover data
/// deserialize with an empty list.
#[derive(Debug, Clone, Deserialize)]
pub struct EditionRecord {
    #[serde(default)]
    pub covers: Vec<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VolumesResponse {
    #[serde(rename = "totalItems", default)]
    pub total_items: u64,
    #[serde(default)]
    pub items: Vec<Volume>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Volume {
    #[serde(rename = "volumeInfo")]
    pub volume_info: Option<VolumeInfo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VolumeInfo {
    #[serde(rename = "imageLinks")]
    pub image_links: Option<ImageLinks>,
}

/// Image links of a Google Books volume, keyed by rendition size.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageLinks {
    #[serde(rename = "extraLarge")]
    pub extra_large: Option<String>,
    pub large: Option<String>,
    pub medium: Option<String>,
    pub thumbnail: Option<String>,
    #[serde(rename = "smallThumbnail")]
    pub small_thumbnail: Option<String>,
}

impl ImageLinks {
    /// Returns the largest available rendition link.
    pub fn best(&self) -> Option<&str> {
        self.extra_large
            .as_deref()
            .or(self.large.as_deref())
            .or(self.medium.as_deref())
            .or(self.thumbnail.as_deref())
            .or(self.small_thumbnail.as_deref())
    }
}

#[derive(Tabled)]
pub struct CacheTableRow {
    pub entry: String,
    pub dimensions: String,
    pub size: String,
}
