//! Collage compositing.
//!
//! Pure rendering: consumes the fetch coordinator's `(Book, cover path)`
//! list plus an immutable layout configuration and produces the final
//! raster. Books without a cover get a generated placeholder tile with the
//! title and author; cached files that exist but fail to decode are
//! reported back to the caller, since that points at cache corruption
//! rather than a missing cover.

use std::path::{Path, PathBuf};

use ab_glyph::{FontVec, PxScale};
use image::{DynamicImage, GenericImageView, Rgb, RgbImage, imageops::FilterType};
use imageproc::drawing::{draw_text_mut, text_size};

use crate::{types::Book, utils};

/// Standard book cover aspect ratio (width:height).
pub const BOOK_ASPECT_RATIO: f32 = 2.0 / 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum TitlePosition {
    Top,
    Bottom,
}

/// Immutable layout configuration for a collage run.
#[derive(Debug, Clone)]
pub struct CollageConfig {
    pub width: u32,
    /// Auto-calculated from the grid when `None`.
    pub height: Option<u32>,
    pub columns: u32,
    pub padding: u32,
    pub margin: u32,
    pub background: String,
    pub title: Option<String>,
    pub title_color: String,
    pub title_position: TitlePosition,
    pub title_size: u32,
}

impl Default for CollageConfig {
    fn default() -> Self {
        Self {
            width: 1440,
            height: None,
            columns: 7,
            padding: 20,
            margin: 40,
            background: "#ffffff".to_string(),
            title: None,
            title_color: "#000000".to_string(),
            title_position: TitlePosition::Top,
            title_size: 48,
        }
    }
}

#[derive(Debug)]
pub enum CollageError {
    NoBooks,
    InvalidColor(String),
    IoError(std::io::Error),
    ImageError(image::ImageError),
}

impl From<std::io::Error> for CollageError {
    fn from(err: std::io::Error) -> Self {
        CollageError::IoError(err)
    }
}

impl From<image::ImageError> for CollageError {
    fn from(err: image::ImageError) -> Self {
        CollageError::ImageError(err)
    }
}

/// Generates the collage image and writes it to `output_path`.
///
/// The grid is `config.columns` wide with 2:3 tiles sized from the
/// available width; height is auto-calculated unless fixed in the config.
/// Output format follows the file extension (PNG unless `.jpg`/`.jpeg`).
///
/// Returns the output path together with the books whose cover file existed
/// on disk but failed to decode. Those are composited as placeholder tiles,
/// and the caller is expected to surface them separately from "not found".
pub fn generate_collage(
    books_with_covers: &[(Book, Option<PathBuf>)],
    config: &CollageConfig,
    output_path: &Path,
) -> Result<(PathBuf, Vec<Book>), CollageError> {
    if books_with_covers.is_empty() {
        return Err(CollageError::NoBooks);
    }

    let bg_color = utils::parse_hex_color(&config.background)
        .ok_or_else(|| CollageError::InvalidColor(config.background.clone()))?;
    let title_color = utils::parse_hex_color(&config.title_color)
        .ok_or_else(|| CollageError::InvalidColor(config.title_color.clone()))?;

    let columns = config.columns.max(1);
    let num_books = books_with_covers.len() as u32;
    let num_rows = num_books.div_ceil(columns);

    let available_width = config
        .width
        .saturating_sub(2 * config.margin + (columns - 1) * config.padding);
    let cover_width = (available_width / columns).max(1);
    let cover_height = ((cover_width as f32 / BOOK_ASPECT_RATIO) as u32).max(1);

    let title_space = if config.title.is_some() {
        config.title_size + config.margin
    } else {
        0
    };

    let total_height = config.height.unwrap_or_else(|| {
        let grid_height = num_rows * cover_height + (num_rows - 1) * config.padding;
        grid_height + 2 * config.margin + title_space
    });

    let mut canvas = RgbImage::from_pixel(config.width.max(1), total_height.max(1), Rgb(bg_color));
    let font = load_font();

    let grid_start_y = if config.title.is_some() && config.title_position == TitlePosition::Top {
        config.margin + title_space
    } else {
        config.margin
    };

    let mut failed_to_load: Vec<Book> = Vec::new();

    for (idx, (book, cover_path)) in books_with_covers.iter().enumerate() {
        let row = idx as u32 / columns;
        let col = idx as u32 % columns;

        let x = (config.margin + col * (cover_width + config.padding)) as i64;
        let y = (grid_start_y + row * (cover_height + config.padding)) as i64;

        if let Some(path) = cover_path {
            let decoded = std::fs::read(path)
                .ok()
                .and_then(|bytes| image::load_from_memory(&bytes).ok());
            match decoded {
                Some(cover) => {
                    let tile = resize_and_crop(&cover, cover_width, cover_height);
                    image::imageops::overlay(&mut canvas, &tile, x, y);
                    continue;
                }
                None => failed_to_load.push(book.clone()),
            }
        }

        let tile = create_placeholder(book, cover_width, cover_height, bg_color, font.as_ref());
        image::imageops::overlay(&mut canvas, &tile, x, y);
    }

    if let (Some(title), Some(font)) = (config.title.as_deref(), font.as_ref()) {
        let scale = PxScale::from(config.title_size as f32);
        let (text_width, _) = text_size(scale, font, title);
        let text_x = ((config.width as i64 - text_width as i64) / 2).max(0) as i32;
        let text_y = match config.title_position {
            TitlePosition::Top => config.margin as i64,
            TitlePosition::Bottom => {
                (total_height as i64 - config.margin as i64 - config.title_size as i64).max(0)
            }
        } as i32;
        draw_text_mut(&mut canvas, Rgb(title_color), text_x, text_y, scale, font, title);
    }

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    canvas.save(output_path)?;

    Ok((output_path.to_path_buf(), failed_to_load))
}

/// Resizes and center-crops an image to exact tile dimensions.
pub fn resize_and_crop(image: &DynamicImage, target_width: u32, target_height: u32) -> RgbImage {
    image
        .resize_to_fill(target_width.max(1), target_height.max(1), FilterType::Lanczos3)
        .to_rgb8()
}

/// Shrinks an image to fit within `max_height`, keeping its aspect ratio.
///
/// Images already within the limit are returned at their original size.
pub fn resize_to_max_height(image: &DynamicImage, max_height: u32) -> RgbImage {
    let max_height = max_height.max(1);
    if image.height() <= max_height {
        return image.to_rgb8();
    }

    let ratio = max_height as f32 / image.height() as f32;
    let new_width = ((image.width() as f32 * ratio) as u32).max(1);
    image
        .resize_exact(new_width, max_height, FilterType::Lanczos3)
        .to_rgb8()
}

/// Builds a placeholder tile for a book without a usable cover.
///
/// The tile is a slightly darker shade of the collage background with the
/// title and author wrapped and centered. Without a usable system font the
/// tile stays text-free.
fn create_placeholder(
    book: &Book,
    width: u32,
    height: u32,
    bg_color: [u8; 3],
    font: Option<&FontVec>,
) -> RgbImage {
    let darker = bg_color.map(|channel| channel.saturating_sub(30));
    let mut tile = RgbImage::from_pixel(width.max(1), height.max(1), Rgb(darker));

    let Some(font) = font else {
        return tile;
    };

    // Light text on dark backgrounds, dark text on light ones.
    let luminance =
        0.299 * bg_color[0] as f32 + 0.587 * bg_color[1] as f32 + 0.114 * bg_color[2] as f32;
    let text_color = if luminance > 128.0 {
        Rgb([60, 60, 60])
    } else {
        Rgb([200, 200, 200])
    };

    let font_size = (width / 10).max(12) as f32;
    let small_font_size = (width / 14).max(10) as f32;
    let max_chars = ((width / ((font_size as u32 / 2).max(1))) as usize).max(10);

    let title_lines = utils::wrap_text(&book.title, max_chars);
    let author_lines = utils::wrap_text(&book.author, max_chars);

    let pad = (width / 10) as i32;
    let line_height = (font_size * 1.2) as i32;
    let small_line_height = (small_font_size * 1.2) as i32;

    let total_text_height =
        title_lines.len() as i32 * line_height + pad + author_lines.len() as i32 * small_line_height;
    let mut y = ((height as i32 - total_text_height) / 2).max(pad);

    let title_scale = PxScale::from(font_size);
    for line in &title_lines {
        draw_text_mut(&mut tile, text_color, pad, y, title_scale, font, line);
        y += line_height;
    }

    y += pad;
    let author_scale = PxScale::from(small_font_size);
    for line in &author_lines {
        draw_text_mut(&mut tile, text_color, pad, y, author_scale, font, line);
        y += small_line_height;
    }

    tile
}

/// Probes well-known system font locations.
///
/// There is no bundled font; when nothing resolves, callers render without
/// text rather than failing the whole collage.
fn load_font() -> Option<FontVec> {
    const FONT_CANDIDATES: &[&str] = &[
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans.ttf",
        "/System/Library/Fonts/Supplemental/Arial.ttf",
        "/Library/Fonts/Arial.ttf",
        "C:\\Windows\\Fonts\\arial.ttf",
    ];

    for candidate in FONT_CANDIDATES {
        if let Ok(bytes) = std::fs::read(candidate) {
            if let Ok(font) = FontVec::try_from_vec(bytes) {
                return Some(font);
            }
        }
    }
    None
}
