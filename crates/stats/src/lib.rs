//! Statistics aggregation for the vacancy statistics system.
//!
//! This crate handles:
//! - Running means with associative merge
//! - Grouped accumulators by year, filtered year and city
//! - City rankings (top-N, then the share threshold)
//! - The final aggregate snapshot

pub mod accumulator;
pub mod engine;
pub mod ranking;
pub mod result;
pub mod running_mean;

pub use accumulator::{CityBucket, StatsAccumulator};
pub use engine::{aggregate, finalize, AggregationEngine};
pub use ranking::{CityStat, RankingPolicy};
pub use result::{AggregateResult, YearRow};
pub use running_mean::RunningMean;
