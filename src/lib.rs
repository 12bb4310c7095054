//! Goodreads Cover Collage CLI Library
//!
//! This library turns a Goodreads reading-history CSV export into a single
//! composite image: a grid of book cover thumbnails, optionally filtered by
//! year, with an optional title overlay. It includes modules for parsing the
//! export, resolving cover images from remote sources with a local disk
//! cache, and compositing the final collage.
//!
//! # Modules
//!
//! - `cli` - Command-line interface implementations
//! - `collage` - Grid compositing, placeholder tiles, and title overlay
//! - `config` - Configuration management and environment variables
//! - `fetcher` - Cover resolution pipeline and concurrent fetch coordinator
//! - `goodreads` - Goodreads CSV export parsing
//! - `management` - Local cover cache management
//! - `sources` - Remote cover source clients (Open Library, Google Books)
//! - `types` - Data structures and type definitions
//! - `utils` - Pure helper functions (keys, validation, colors)
//!
//! # Example
//!
//! ```
//! use covergen::{config, fetcher};
//!
//! #[tokio::main]
//! async fn main() {
//!     let cover = fetcher::resolve_cover(
//!         &config::cache_dir(),
//!         Some("9780743273565"),
//!         Some("The Great Gatsby"),
//!         Some("F. Scott Fitzgerald"),
//!     )
//!     .await;
//!     // Use the cached path...
//! }
//! ```

pub mod cli;
pub mod collage;
pub mod config;
pub mod fetcher;
pub mod goodreads;
pub mod management;
pub mod sources;
pub mod types;
pub mod utils;

/// A convenient Result type alias for operations that may fail.
///
/// Provides a standard error handling pattern throughout the application
/// using a boxed dynamic error trait object. This allows for flexible
/// error handling while maintaining Send + Sync bounds for async contexts.
///
/// # Type Parameters
///
/// - `T` - The success type returned on successful operations
///
/// # Example
///
/// ```
/// use covergen::Res;
///
/// async fn fetch_data() -> Res<String> {
///     Ok("data".to_string())
/// }
/// ```
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// Creates a formatted output line with a distinctive blue "o" indicator
/// followed by the provided message. Used for general information and
/// status updates throughout the application.
///
/// # Arguments
///
/// The macro accepts the same arguments as `println!`, supporting format
/// strings and interpolation.
///
/// # Example
///
/// ```
/// info!("Reading export...");
/// info!("Found {} books", count);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// Creates a formatted output line with a green "✓" indicator to signify
/// successful completion of operations. Used to provide positive feedback
/// when operations complete successfully.
///
/// # Arguments
///
/// The macro accepts the same arguments as `println!`, supporting format
/// strings and interpolation.
///
/// # Example
///
/// ```
/// success!("Collage saved to: {}", path.display());
/// success!("Fetched {} covers", count);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Creates a formatted error output with a red "!" indicator and immediately
/// terminates the program with exit code 1. Used for unrecoverable errors
/// that require immediate program termination.
///
/// # Arguments
///
/// The macro accepts the same arguments as `println!`, supporting format
/// strings and interpolation.
///
/// # Behavior
///
/// This macro will cause the program to exit immediately after printing
/// the error message. It should only be used for fatal errors where
/// recovery is not possible.
///
/// # Example
///
/// ```
/// error!("Cannot parse Goodreads export");
/// error!("No books found for year {}", year);
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Creates a formatted output line with a yellow "!" indicator to highlight
/// potential issues or important notices that don't require program termination.
/// Used for recoverable issues or important information that users should notice.
///
/// # Arguments
///
/// The macro accepts the same arguments as `println!`, supporting format
/// strings and interpolation.
///
/// # Example
///
/// ```
/// warning!("{} cover(s) not found", missing.len());
/// warning!("Cache entry looks corrupt: {}", path.display());
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
