use std::path::{Path, PathBuf};

use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    collage::{self, CollageConfig},
    config, error, fetcher, goodreads, info, success,
    types::Book,
    warning,
};

pub async fn generate(
    input_file: PathBuf,
    output_file: PathBuf,
    year: Option<i32>,
    collage_config: CollageConfig,
    concurrency: usize,
) {
    info!("Reading {}...", input_file.display());
    let books = require_books(&input_file, year);
    match year {
        Some(year) => info!("Found {} books from {}", books.len(), year),
        None => info!("Found {} books", books.len()),
    }

    let results = fetch_with_progress(books, concurrency).await;

    let missing: Vec<&Book> = results
        .iter()
        .filter(|(_, path)| path.is_none())
        .map(|(book, _)| book)
        .collect();
    let found = results.len() - missing.len();

    if !missing.is_empty() {
        warning!(
            "{} cover(s) not found (will show as placeholders):",
            missing.len()
        );
        list_books(&missing);
    }
    success!("Fetched {} covers", found);

    info!("Generating collage...");
    match collage::generate_collage(&results, &collage_config, &output_file) {
        Ok((path, failed_to_load)) => {
            if !failed_to_load.is_empty() {
                warning!("{} cached image(s) failed to load:", failed_to_load.len());
                let failed: Vec<&Book> = failed_to_load.iter().collect();
                list_books(&failed);
                warning!("Run covergen cache clear and try again.");
            }
            success!("Collage saved to: {}", path.display());
        }
        Err(e) => error!("Cannot generate collage. Err: {:?}", e),
    }
}

pub(crate) async fn fetch_with_progress(
    books: Vec<Book>,
    concurrency: usize,
) -> Vec<(Book, Option<PathBuf>)> {
    let pb = ProgressBar::new(books.len() as u64);
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} [{bar:40.blue}] {pos}/{len} covers")
            .unwrap()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .progress_chars("=> "),
    );

    let cache_dir = config::cache_dir();
    let results = fetcher::fetch_covers(
        books,
        &cache_dir,
        concurrency,
        Some(|completed: usize, _total: usize| pb.set_position(completed as u64)),
    )
    .await;
    pb.finish_and_clear();
    results
}

pub(crate) fn list_books(books: &[&Book]) {
    for book in books.iter().take(5) {
        println!("  - {} by {}", book.title, book.author);
    }
    if books.len() > 5 {
        println!("  ... and {} more", books.len() - 5);
    }
}

pub(crate) fn require_books(input_file: &Path, year: Option<i32>) -> Vec<Book> {
    let books = match goodreads::parse_export(input_file, year) {
        Ok(books) => books,
        Err(e) => error!("Cannot parse Goodreads export. Err: {:?}", e),
    };
    if books.is_empty() {
        match year {
            Some(year) => error!("No books found for year {}.", year),
            None => error!("No books found in export."),
        }
    }
    books
}
