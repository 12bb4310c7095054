use std::collections::HashSet;

use image::{DynamicImage, GenericImageView};
use sha2::{Digest, Sha256};

/// Covers with either dimension below this are rejected as placeholders.
pub const MIN_COVER_DIMENSION: u32 = 200;

const SAMPLE_TARGET: usize = 1000;
const DISTINCT_BUCKET_THRESHOLD: usize = 15;

/// Makes a book title safe for use in a cache file name.
///
/// Lowercases, keeps alphanumerics, collapses whitespace and underscores to
/// single hyphens, drops everything else, trims edge hyphens and truncates
/// to 50 characters without a trailing hyphen. Applying it twice gives the
/// same result as applying it once.
pub fn sanitize_title(title: &str) -> String {
    let mut mapped = String::with_capacity(title.len());
    for c in title.to_lowercase().chars() {
        if c.is_alphanumeric() {
            mapped.push(c);
        } else if c.is_whitespace() || c == '-' || c == '_' {
            mapped.push('-');
        }
    }

    let mut collapsed = String::with_capacity(mapped.len());
    let mut previous_hyphen = false;
    for c in mapped.chars() {
        if c == '-' {
            if !previous_hyphen {
                collapsed.push(c);
            }
            previous_hyphen = true;
        } else {
            collapsed.push(c);
            previous_hyphen = false;
        }
    }

    let mut result: String = collapsed.trim_matches('-').chars().take(50).collect();
    while result.ends_with('-') {
        result.pop();
    }
    result
}

/// Derives the stable cache key for a book identity.
///
/// With an identifier and a title the key is `{isbn}-{sanitized-title}` (or
/// the identifier alone when the title sanitizes to nothing). With only an
/// identifier it is used verbatim. Without an identifier the key is the
/// first 16 hex characters of the SHA-256 of `"{title}-{author}"`, which is
/// stable across runs and platforms. Same inputs always yield the same key;
/// the author never influences the key when an identifier is present.
pub fn derive_cache_key(isbn: Option<&str>, title: Option<&str>, author: Option<&str>) -> String {
    match (isbn, title) {
        (Some(isbn), Some(title)) => {
            let slug = sanitize_title(title);
            if slug.is_empty() {
                isbn.to_string()
            } else {
                format!("{isbn}-{slug}")
            }
        }
        (Some(isbn), None) => isbn.to_string(),
        _ => {
            let seed = format!(
                "{title}-{author}",
                title = title.unwrap_or(""),
                author = author.unwrap_or("")
            );
            let hash = Sha256::digest(seed.as_bytes());
            hash.iter()
                .map(|byte| format!("{byte:02x}"))
                .collect::<String>()
                .chars()
                .take(16)
                .collect()
        }
    }
}

/// Classifies a decoded image as a generic "cover not available" graphic.
///
/// Some sources return a nearly flat placeholder graphic instead of failing
/// outright, and size checks alone don't catch it. This samples up to 1000
/// evenly spaced pixels, quantizes each channel into 32-wide buckets and
/// counts the distinct colors seen; fewer than 15 distinct buckets reads as
/// a placeholder. It is a heuristic: very low-texture real covers can be
/// misclassified, and that is accepted.
pub fn is_placeholder(image: &DynamicImage) -> bool {
    let rgb = image.to_rgb8();
    let total = (rgb.width() as usize) * (rgb.height() as usize);
    if total == 0 {
        return true;
    }

    let stride = std::cmp::max(1, total / SAMPLE_TARGET);
    let mut buckets: HashSet<(u8, u8, u8)> = HashSet::new();
    for pixel in rgb.pixels().step_by(stride) {
        let [r, g, b] = pixel.0;
        buckets.insert((r / 32, g / 32, b / 32));
        if buckets.len() >= DISTINCT_BUCKET_THRESHOLD {
            return false;
        }
    }
    buckets.len() < DISTINCT_BUCKET_THRESHOLD
}

/// Full validity check for a cover image: large enough on both axes and not
/// a placeholder graphic.
pub fn is_valid_cover(image: &DynamicImage) -> bool {
    let (width, height) = image.dimensions();
    width >= MIN_COVER_DIMENSION && height >= MIN_COVER_DIMENSION && !is_placeholder(image)
}

/// Parses a `#rrggbb` (or `rrggbb`) hex color into RGB channels.
pub fn parse_hex_color(hex: &str) -> Option<[u8; 3]> {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some([r, g, b])
}

/// Greedy word wrap to at most `max_chars` characters per line.
///
/// A single word longer than the limit gets its own line rather than being
/// split mid-word.
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current = word.to_string();
        } else if current.chars().count() + 1 + word.chars().count() <= max_chars {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(current);
            current = word.to_string();
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
