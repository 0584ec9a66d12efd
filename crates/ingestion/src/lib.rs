//! Data ingestion and normalization for the vacancy statistics system.
//!
//! This crate handles:
//! - Field cleaning (HTML tags, odd whitespace)
//! - CSV dataset reading
//! - Salary normalization to the reference currency
//! - Splitting an export into per-year files
//! - Listing queries (typed filters and sort keys)

pub mod clean;
pub mod normalizer;
pub mod query;
pub mod reader;
pub mod splitter;

pub use normalizer::Normalizer;
pub use query::{ListingQuery, SortKey, SortOrder, VacancyFilter};
pub use reader::{Dataset, DatasetReader};
pub use splitter::split_by_year;
