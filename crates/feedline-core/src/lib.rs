//! Incremental line streaming for text feeds, plus a typed news-source directory.
//!
//! This crate provides two complementary ways of consuming a line-oriented text
//! resource: eager materialization, where the whole body is downloaded and split
//! before iteration begins, and incremental streaming, where each line is yielded
//! as soon as it arrives on the wire. The same split semantics apply to both, so
//! a consumer switching from one to the other sees the same ordered sequence of
//! lines.
//!
//! On top of the line pipeline sit two small clients:
//!
//! - **Quake feed**: a client for the USGS all-month earthquake CSV feed, exposing
//!   both raw lines and typed records parsed row by row as the feed streams in.
//! - **Source directory**: a client for a news-source directory service, behind a
//!   provider trait so callers are not tied to a concrete backend, with a catalog
//!   that republishes the fetched list to any number of observers.

pub mod catalog;
pub mod config;
pub mod errors;
pub mod lines;
pub mod quake;
pub mod sources;
pub mod stream;

#[cfg(test)]
pub mod test_utils;

pub use catalog::SourceCatalog;
pub use config::{ConfigLoader, FeedlineConfig};
pub use errors::FeedError;
pub use lines::{read_all_lines, LineCursor, Lines};
pub use quake::{QuakeFeedClient, QuakeRecord, ALL_MONTH_CSV_URL};
pub use sources::{NewsApiClient, NewsSource, SourceProvider};
pub use stream::{fetch_all_lines, fetch_lines, LineStream};
