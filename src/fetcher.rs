//! Cover resolution pipeline.
//!
//! This is the heart of the tool: given a book's bibliographic fields it
//! derives a cache identity, consults the local disk cache, and on a miss
//! walks an ordered fallback chain of remote sources, validating every
//! candidate before it is accepted. A bounded coordinator runs the resolver
//! across a whole export concurrently and aggregates per-book outcomes.
//!
//! "No cover obtainable" is a normal outcome here, not an error: every
//! function in this module reports absence as `None` and keeps failures of
//! one book strictly isolated from its siblings.

use std::{
    collections::HashMap,
    future::Future,
    path::{Path, PathBuf},
    sync::Arc,
};

use tokio::{sync::Semaphore, task::JoinSet};

use crate::{management::CoverCacheManager, sources, types::Book, utils};

/// Default number of concurrently in-flight cover resolutions.
pub const DEFAULT_CONCURRENCY: usize = 5;

/// Resolves a single book to a valid cached cover path.
///
/// Steps, in order:
/// 1. derive the cache key and entry path;
/// 2. if the entry exists and still decodes to a valid cover, return it
///    without any network call; a corrupt, undersized, or placeholder entry
///    is deleted and resolution falls through to a refetch;
/// 3. walk the source fallback chain, stopping at the first hit: Open
///    Library by ISBN, then Google Books by ISBN, then Google Books by
///    title/author;
/// 4. nothing found leaves no file behind and returns `None`;
/// 5. otherwise the bytes are written to the cache and re-validated from
///    disk with the same size-and-placeholder check as step 2. The search
///    client already validates before returning, but the identifier-keyed
///    client only checks size, so the uniform re-check keeps any source
///    from bypassing validation.
///
/// The check-then-write sequence takes no lock on the cache file; two
/// concurrent calls for the same key can race benignly. A well-formed batch
/// submits each book once, so this is accepted rather than guarded.
pub async fn resolve_cover(
    cache_dir: &Path,
    isbn: Option<&str>,
    title: Option<&str>,
    author: Option<&str>,
) -> Option<PathBuf> {
    let cache = CoverCacheManager::new(cache_dir.to_path_buf());
    cache.ensure_dir().await.ok()?;

    let key = utils::derive_cache_key(isbn, title, author);
    let cache_path = cache.path_for(&key);

    if cache_path.exists() {
        match async_fs::read(&cache_path).await {
            Ok(bytes) if decodes_to_valid_cover(&bytes) => return Some(cache_path),
            _ => {
                // Self-healing: drop the stale entry and refetch.
                let _ = async_fs::remove_file(&cache_path).await;
            }
        }
    }

    let mut image_data: Option<Vec<u8>> = None;

    if let Some(isbn) = isbn {
        image_data = sources::openlibrary::fetch_by_isbn(isbn).await;

        if image_data.is_none() {
            image_data = sources::googlebooks::fetch_cover(Some(isbn), None, None).await;
        }
    }

    if image_data.is_none() && title.is_some() {
        image_data = sources::googlebooks::fetch_cover(None, title, author).await;
    }

    let image_data = image_data?;

    async_fs::write(&cache_path, &image_data).await.ok()?;

    match async_fs::read(&cache_path).await {
        Ok(bytes) if decodes_to_valid_cover(&bytes) => Some(cache_path),
        _ => {
            let _ = async_fs::remove_file(&cache_path).await;
            None
        }
    }
}

fn decodes_to_valid_cover(bytes: &[u8]) -> bool {
    match image::load_from_memory(bytes) {
        Ok(decoded) => utils::is_valid_cover(&decoded),
        Err(_) => false,
    }
}

/// Resolves covers for a batch of books with bounded parallelism.
///
/// One task is spawned per book, gated by a semaphore of `max_concurrency`
/// permits. A failing or panicking task is converted into a `(book, None)`
/// outcome and never aborts its siblings. After each completion, in
/// completion order, the optional `progress` callback receives the number
/// of finished books and the batch total; the completed count is strictly
/// increasing from 1 to the batch size, but which book finishes when is not
/// deterministic.
///
/// Returns one outcome per input book, in completion order.
pub async fn fetch_covers<F>(
    books: Vec<Book>,
    cache_dir: &Path,
    max_concurrency: usize,
    progress: Option<F>,
) -> Vec<(Book, Option<PathBuf>)>
where
    F: FnMut(usize, usize),
{
    let cache_dir = cache_dir.to_path_buf();
    fetch_covers_with(books, max_concurrency, progress, move |book: Book| {
        let cache_dir = cache_dir.clone();
        async move {
            let isbn = book.best_isbn();
            let cover = resolve_cover(
                &cache_dir,
                isbn.as_deref(),
                Some(book.title.as_str()),
                Some(book.author.as_str()),
            )
            .await;
            (book, cover)
        }
    })
    .await
}

/// Coordinator generic over the per-book resolution.
///
/// `fetch_covers` plugs in `resolve_cover`; the batch mechanics (semaphore
/// gating, panic conversion, progress reporting) live here and hold for any
/// resolution.
pub async fn fetch_covers_with<F, R, Fut>(
    books: Vec<Book>,
    max_concurrency: usize,
    mut progress: Option<F>,
    resolver: R,
) -> Vec<(Book, Option<PathBuf>)>
where
    F: FnMut(usize, usize),
    R: Fn(Book) -> Fut,
    Fut: Future<Output = (Book, Option<PathBuf>)> + Send + 'static,
{
    let total = books.len();
    let semaphore = Arc::new(Semaphore::new(max_concurrency.max(1)));
    let mut tasks: JoinSet<(Book, Option<PathBuf>)> = JoinSet::new();
    let mut submitted: HashMap<tokio::task::Id, Book> = HashMap::new();

    for book in books {
        let semaphore = Arc::clone(&semaphore);
        // The future is inert until its task holds a permit.
        let work = resolver(book.clone());

        let handle = tasks.spawn(async move {
            let _permit = semaphore.acquire_owned().await;
            work.await
        });
        submitted.insert(handle.id(), book);
    }

    let mut results = Vec::with_capacity(total);
    let mut completed = 0;

    while let Some(joined) = tasks.join_next_with_id().await {
        let outcome = match joined {
            Ok((id, outcome)) => {
                submitted.remove(&id);
                outcome
            }
            // A panicked task still yields an outcome for its book.
            Err(join_error) => match submitted.remove(&join_error.id()) {
                Some(book) => (book, None),
                None => continue,
            },
        };

        completed += 1;
        if let Some(callback) = progress.as_mut() {
            callback(completed, total);
        }
        results.push(outcome);
    }

    results
}
