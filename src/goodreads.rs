//! Parsing of Goodreads CSV exports.
//!
//! A Goodreads export is a plain CSV file with one row per shelved book. The
//! importer maps the columns we care about onto [`Book`] records and applies
//! the single filtering rule the rest of the tool needs: when a year filter
//! is requested, only rows whose `Date Read` starts with that 4-digit year
//! survive, and rows with missing or unparsable dates are dropped.

use std::path::Path;

use crate::types::{Book, GoodreadsRecord};

#[derive(Debug)]
pub enum GoodreadsError {
    IoError(std::io::Error),
    CsvError(csv::Error),
}

impl From<std::io::Error> for GoodreadsError {
    fn from(err: std::io::Error) -> Self {
        GoodreadsError::IoError(err)
    }
}

impl From<csv::Error> for GoodreadsError {
    fn from(err: csv::Error) -> Self {
        GoodreadsError::CsvError(err)
    }
}

/// Parses a Goodreads CSV export into a list of books.
///
/// Empty ISBN and date fields become `None` on the resulting [`Book`]. With
/// `year` given, only books finished in that year are kept.
pub fn parse_export(filepath: &Path, year: Option<i32>) -> Result<Vec<Book>, GoodreadsError> {
    let mut reader = csv::Reader::from_path(filepath)?;
    let mut books = Vec::new();

    for record in reader.deserialize::<GoodreadsRecord>() {
        let record = record?;
        let book = Book {
            title: record.title,
            author: record.author,
            isbn: none_if_empty(record.isbn),
            isbn13: none_if_empty(record.isbn13),
            date_read: none_if_empty(record.date_read),
        };

        if let Some(year) = year {
            match book.read_year() {
                Some(read_year) if read_year == year => {}
                _ => continue,
            }
        }

        books.push(book);
    }

    Ok(books)
}

fn none_if_empty(value: String) -> Option<String> {
    if value.trim().is_empty() { None } else { Some(value) }
}
