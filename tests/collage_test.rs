use std::path::PathBuf;

use covergen::collage::{CollageConfig, CollageError, generate_collage};
use covergen::types::Book;
use image::{GenericImageView, Rgb, RgbImage};
use tempfile::TempDir;

fn book(title: &str, author: &str) -> Book {
    Book {
        title: title.to_string(),
        author: author.to_string(),
        isbn: None,
        isbn13: None,
        date_read: None,
    }
}

fn small_config(width: u32, columns: u32) -> CollageConfig {
    CollageConfig {
        width,
        columns,
        padding: 10,
        margin: 20,
        ..CollageConfig::default()
    }
}

fn write_cover(dir: &TempDir, name: &str) -> PathBuf {
    let path = dir.path().join(name);
    RgbImage::from_fn(120, 180, |x, y| Rgb([x as u8, y as u8, (x * y % 256) as u8]))
        .save(&path)
        .unwrap();
    path
}

#[test]
fn test_generate_collage_auto_height() {
    let dir = TempDir::new().unwrap();
    let cover = write_cover(&dir, "a.jpg");

    let books = vec![
        (book("First", "Author One"), Some(cover)),
        (book("Second", "Author Two"), None),
    ];

    let output = dir.path().join("collage.png");
    let (path, failed) = generate_collage(&books, &small_config(400, 2), &output).unwrap();

    assert_eq!(path, output);
    assert!(failed.is_empty());

    // width 400, 2 columns, margin 20, padding 10:
    // available = 400 - 50 = 350, cover 175x262, one row
    // height = 262 + 2 * 20 = 302
    let saved = image::open(&output).unwrap();
    assert_eq!(saved.dimensions(), (400, 302));
}

#[test]
fn test_generate_collage_fixed_height_and_background() {
    let dir = TempDir::new().unwrap();

    let books = vec![(book("Solo", "Author"), None)];
    let config = CollageConfig {
        height: Some(500),
        background: "#102030".to_string(),
        ..small_config(400, 2)
    };

    let output = dir.path().join("fixed.png");
    generate_collage(&books, &config, &output).unwrap();

    let saved = image::open(&output).unwrap().to_rgb8();
    assert_eq!(saved.dimensions(), (400, 500));

    // A corner pixel lies outside the grid and carries the background color.
    assert_eq!(saved.get_pixel(0, 499), &Rgb([16, 32, 48]));
}

#[test]
fn test_generate_collage_reports_undecodable_cover_files() {
    let dir = TempDir::new().unwrap();

    let garbage = dir.path().join("garbage.jpg");
    std::fs::write(&garbage, b"not an image at all").unwrap();
    let good = write_cover(&dir, "good.jpg");

    let books = vec![
        (book("Readable", "Author One"), Some(good)),
        (book("Broken", "Author Two"), Some(garbage)),
    ];

    let output = dir.path().join("collage.png");
    let (_, failed) = generate_collage(&books, &small_config(400, 2), &output).unwrap();

    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].title, "Broken");
    assert!(output.exists());
}

#[test]
fn test_generate_collage_rejects_empty_input() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("collage.png");

    let result = generate_collage(&[], &CollageConfig::default(), &output);
    assert!(matches!(result, Err(CollageError::NoBooks)));
}

#[test]
fn test_generate_collage_rejects_bad_color() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("collage.png");

    let books = vec![(book("Solo", "Author"), None)];
    let config = CollageConfig {
        background: "teal".to_string(),
        ..CollageConfig::default()
    };

    let result = generate_collage(&books, &config, &output);
    assert!(matches!(result, Err(CollageError::InvalidColor(_))));
}

#[test]
fn test_generate_collage_creates_missing_output_directory() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("nested").join("deep").join("collage.png");

    let books = vec![(book("Solo", "Author"), None)];
    generate_collage(&books, &small_config(400, 2), &output).unwrap();

    assert!(output.exists());
}
