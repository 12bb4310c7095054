//! # CLI Module
//!
//! User-facing command implementations for covergen. Each command delegates
//! to the parsing, fetching, caching, and compositing layers while owning
//! user interaction: progress bars for long fetches, tabled listings, and
//! colored status output.
//!
//! ## Commands
//!
//! - [`generate`] - Parse a Goodreads export, resolve covers, composite the
//!   collage
//! - [`cache_info`] / [`cache_clear`] - Inspect or wipe the local cover
//!   cache
//! - [`add_cover`] - Manually place a cover into the cache for a book
//! - [`export`] - Write per-book cover thumbnails to a directory
//!
//! ## Error handling
//!
//! Remote-source failures never abort a run; they surface as placeholder
//! tiles and a summary of missing covers. Cached files that exist but no
//! longer decode are reported separately with a remediation hint, since
//! they indicate cache corruption rather than an unavailable cover. Fatal
//! conditions (unreadable export, unwritable output) terminate via the
//! `error!` macro.

mod cache;
mod cover;
mod export;
mod generate;

pub use cache::cache_clear;
pub use cache::cache_info;
pub use cover::add_cover;
pub use export::export;
pub use generate::generate;
