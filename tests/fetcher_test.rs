use std::path::{Path, PathBuf};

use covergen::fetcher::{fetch_covers, fetch_covers_with, resolve_cover};
use covergen::types::Book;
use covergen::utils::derive_cache_key;
use image::{Rgb, RgbImage};
use tempfile::TempDir;

// Point every source at an unroutable address so no test ever performs a
// real network call; connection attempts fail immediately.
fn block_network() {
    unsafe {
        std::env::set_var("OPENLIBRARY_API_URL", "http://127.0.0.1:9");
        std::env::set_var("OPENLIBRARY_COVERS_URL", "http://127.0.0.1:9");
        std::env::set_var("GOOGLEBOOKS_API_URL", "http://127.0.0.1:9");
    }
}

// Writes a decodable, sufficiently large, color-diverse cover for a key.
fn write_valid_cover(cache_dir: &Path, key: &str) -> PathBuf {
    let cover = RgbImage::from_fn(300, 450, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    });
    let path = cache_dir.join(format!("{key}.jpg"));
    cover.save(&path).unwrap();
    path
}

fn book(title: &str, author: &str, isbn13: Option<&str>) -> Book {
    Book {
        title: title.to_string(),
        author: author.to_string(),
        isbn: None,
        isbn13: isbn13.map(|s| s.to_string()),
        date_read: None,
    }
}

#[tokio::test]
async fn test_cache_hit_returns_existing_path_without_network() {
    block_network();
    let dir = TempDir::new().unwrap();

    let key = derive_cache_key(
        Some("9780743273565"),
        Some("The Great Gatsby"),
        Some("F. Scott Fitzgerald"),
    );
    let cached = write_valid_cover(dir.path(), &key);

    // All sources are unroutable, so a result can only come from the cache.
    let resolved = resolve_cover(
        dir.path(),
        Some("9780743273565"),
        Some("The Great Gatsby"),
        Some("F. Scott Fitzgerald"),
    )
    .await;

    assert_eq!(resolved, Some(cached.clone()));
    assert!(cached.exists());
}

#[tokio::test]
async fn test_undersized_cache_entry_is_evicted() {
    block_network();
    let dir = TempDir::new().unwrap();

    let key = derive_cache_key(Some("1111111111111"), Some("Tiny"), None);
    let path = dir.path().join(format!("{key}.jpg"));
    RgbImage::from_fn(50, 50, |x, y| Rgb([x as u8, y as u8, (x + y) as u8]))
        .save(&path)
        .unwrap();

    let resolved = resolve_cover(dir.path(), Some("1111111111111"), Some("Tiny"), None).await;

    // The bad entry is deleted and the (unreachable) fallback chain finds nothing.
    assert_eq!(resolved, None);
    assert!(!path.exists());
}

#[tokio::test]
async fn test_corrupt_cache_entry_is_evicted() {
    block_network();
    let dir = TempDir::new().unwrap();

    let key = derive_cache_key(Some("2222222222222"), Some("Corrupt"), None);
    let path = dir.path().join(format!("{key}.jpg"));
    std::fs::write(&path, b"this is not an image").unwrap();

    let resolved = resolve_cover(dir.path(), Some("2222222222222"), Some("Corrupt"), None).await;

    assert_eq!(resolved, None);
    assert!(!path.exists());
}

#[tokio::test]
async fn test_placeholder_cache_entry_is_evicted() {
    block_network();
    let dir = TempDir::new().unwrap();

    let key = derive_cache_key(Some("3333333333333"), Some("Flat"), None);
    let path = dir.path().join(format!("{key}.jpg"));
    // Large enough, but a flat single color: classified as a placeholder.
    RgbImage::from_pixel(300, 450, Rgb([230, 230, 230]))
        .save(&path)
        .unwrap();

    let resolved = resolve_cover(dir.path(), Some("3333333333333"), Some("Flat"), None).await;

    assert_eq!(resolved, None);
    assert!(!path.exists());
}

#[tokio::test]
async fn test_resolve_without_any_identity_finds_nothing() {
    block_network();
    let dir = TempDir::new().unwrap();

    let resolved = resolve_cover(dir.path(), None, None, None).await;
    assert_eq!(resolved, None);
}

#[tokio::test]
async fn test_fetch_covers_returns_one_outcome_per_book() {
    block_network();
    let dir = TempDir::new().unwrap();

    let books = vec![
        book("The Great Gatsby", "F. Scott Fitzgerald", Some("9780743273565")),
        book("Missing Cover", "Unknown Author", None),
        book("Dune", "Frank Herbert", Some("9780441172719")),
    ];

    // Pre-populate valid covers for the two identified books; the third can
    // only fail against the blocked sources.
    for b in [&books[0], &books[2]] {
        let key = derive_cache_key(
            b.best_isbn().as_deref(),
            Some(b.title.as_str()),
            Some(b.author.as_str()),
        );
        write_valid_cover(dir.path(), &key);
    }

    let results = fetch_covers(books, dir.path(), 2, None::<fn(usize, usize)>).await;

    assert_eq!(results.len(), 3);
    let found = results.iter().filter(|(_, path)| path.is_some()).count();
    let missing: Vec<&str> = results
        .iter()
        .filter(|(_, path)| path.is_none())
        .map(|(b, _)| b.title.as_str())
        .collect();

    assert_eq!(found, 2);
    assert_eq!(missing, vec!["Missing Cover"]);
}

#[tokio::test]
async fn test_fetch_covers_progress_is_strictly_increasing() {
    block_network();
    let dir = TempDir::new().unwrap();

    let books: Vec<Book> = (0..5)
        .map(|i| book(&format!("Book {i}"), "Author", None))
        .collect();

    let mut calls: Vec<(usize, usize)> = Vec::new();
    let results = fetch_covers(
        books,
        dir.path(),
        3,
        Some(|completed: usize, total: usize| calls.push((completed, total))),
    )
    .await;

    assert_eq!(results.len(), 5);

    // Called exactly once per book with 1..=N completed and a constant total.
    // Completion order across books is not asserted anywhere.
    assert_eq!(calls.len(), 5);
    for (i, (completed, total)) in calls.iter().enumerate() {
        assert_eq!(*completed, i + 1);
        assert_eq!(*total, 5);
    }
}

#[tokio::test]
async fn test_panicking_resolution_yields_outcome_without_aborting_batch() {
    let books = vec![
        book("Fine", "Author", None),
        book("Explodes", "Author", None),
        book("Also Fine", "Author", None),
    ];

    let mut calls: Vec<(usize, usize)> = Vec::new();
    let results = fetch_covers_with(
        books,
        2,
        Some(|completed: usize, total: usize| calls.push((completed, total))),
        |b: Book| async move {
            if b.title == "Explodes" {
                panic!("resolution blew up");
            }
            let path = PathBuf::from(format!("{}.jpg", b.title));
            (b, Some(path))
        },
    )
    .await;

    assert_eq!(results.len(), 3);
    let missing: Vec<&str> = results
        .iter()
        .filter(|(_, path)| path.is_none())
        .map(|(b, _)| b.title.as_str())
        .collect();
    assert_eq!(missing, vec!["Explodes"]);

    // The panicked resolution still counts as a completion.
    assert_eq!(calls, vec![(1, 3), (2, 3), (3, 3)]);
}

#[tokio::test]
async fn test_fetch_covers_empty_batch() {
    block_network();
    let dir = TempDir::new().unwrap();

    let mut calls = 0;
    let results = fetch_covers(
        Vec::new(),
        dir.path(),
        4,
        Some(|_c: usize, _t: usize| calls += 1),
    )
    .await;

    assert!(results.is_empty());
    assert_eq!(calls, 0);
}
