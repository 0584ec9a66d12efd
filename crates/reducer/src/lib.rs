//! Partitioned reduction for the vacancy statistics system.
//!
//! This crate provides:
//! - Shard planning over a directory of CSV files or a record slice
//! - Per-shard accumulation on scoped worker threads
//! - Merge in input order followed by a single ranking pass

pub mod partitioned;
pub mod sharding;
pub mod worker;

pub use partitioned::PartitionedReducer;
pub use sharding::{discover_csv_files, worker_count, ShardInput, ShardPlan};
pub use worker::{PartialAccumulator, ShardWorker};
