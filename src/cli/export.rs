use std::path::PathBuf;

use crate::{collage, error, info, success, utils, warning};

use super::generate::{fetch_with_progress, require_books};

/// Exports per-book cover thumbnails instead of a composite collage.
///
/// Resolves covers exactly like `generate`, then writes one JPEG per book
/// into `out_dir`, capped at `max_height` pixels and named by the book's
/// cache key. Books without a cover are skipped and summarized.
pub async fn export(
    input_file: PathBuf,
    out_dir: PathBuf,
    year: Option<i32>,
    max_height: u32,
    concurrency: usize,
) {
    info!("Reading {}...", input_file.display());
    let books = require_books(&input_file, year);
    info!("Found {} books", books.len());

    let results = fetch_with_progress(books, concurrency).await;

    if let Err(e) = std::fs::create_dir_all(&out_dir) {
        error!("Cannot create {}. Err: {}", out_dir.display(), e);
    }

    let mut exported = 0;
    let mut skipped = 0;
    let mut failed = 0;

    for (book, cover_path) in &results {
        let Some(path) = cover_path else {
            skipped += 1;
            continue;
        };

        let decoded = match std::fs::read(path)
            .ok()
            .and_then(|bytes| image::load_from_memory(&bytes).ok())
        {
            Some(decoded) => decoded,
            None => {
                warning!("Cache entry looks corrupt: {}", path.display());
                failed += 1;
                continue;
            }
        };

        let thumbnail = collage::resize_to_max_height(&decoded, max_height);
        let isbn = book.best_isbn();
        let key = utils::derive_cache_key(
            isbn.as_deref(),
            Some(book.title.as_str()),
            Some(book.author.as_str()),
        );
        let target = out_dir.join(format!("{key}.jpg"));
        match thumbnail.save(&target) {
            Ok(_) => exported += 1,
            Err(e) => {
                warning!("Cannot write {}. Err: {}", target.display(), e);
                failed += 1;
            }
        }
    }

    success!("Exported {} thumbnail(s) to {}", exported, out_dir.display());
    if skipped > 0 {
        warning!("{} book(s) had no cover and were skipped.", skipped);
    }
    if failed > 0 {
        warning!("{} cover(s) could not be exported.", failed);
    }
}
