//! # Cover Source Clients
//!
//! Remote sources that may hold a cover image for a book. Each client is an
//! independent fetch strategy returning validated raw image bytes, or
//! nothing. The clients are pure with respect to the local cache: they never
//! read or write cache files, and every network, protocol, or decode failure
//! degrades to `None` instead of surfacing an error, because "no cover at
//! this source" is the common, expected outcome.
//!
//! ## Strategies
//!
//! - [`openlibrary`] - identifier-keyed lookup against the Open Library
//!   edition registry. Only usable when an ISBN is available, and only
//!   follows explicit cover references from the edition metadata.
//! - [`googlebooks`] - full-text volume search, usable with an ISBN or with
//!   title/author. Scans the top ranked results and picks the first
//!   candidate that passes size and placeholder validation.
//!
//! The fallback order across strategies is owned by the resolver in
//! [`crate::fetcher`], not by the clients themselves.

pub mod googlebooks;
pub mod openlibrary;
