//! Partitioned reducer.
//!
//! Runs one [`ShardWorker`] per shard on scoped threads, waits for all of
//! them, merges their partial accumulators in input position order and
//! finalizes once. Any failed or panicked shard fails the whole run.
//!
//! Merging by position rather than by shard keeps the first-seen city order
//! of a single pass, so tied rankings do not depend on the worker count.

use crate::sharding::{chunk_slice, discover_csv_files, worker_count, ShardPlan};
use crate::worker::{PartialAccumulator, ShardWorker};
use std::any::Any;
use std::path::{Path, PathBuf};
use std::thread;
use tracing::{debug, info, warn};
use vacancy_core::{Config, Error, Result, VacancyRecord};
use vacancy_ingestion::{DatasetReader, Normalizer};
use vacancy_stats::{finalize, AggregateResult, StatsAccumulator};

/// Fan-out, merge and finalize over independent shards.
#[derive(Debug, Clone)]
pub struct PartitionedReducer {
    config: Config,
    normalizer: Normalizer,
    reader: DatasetReader,
}

impl PartitionedReducer {
    pub fn new(config: Config) -> Self {
        let normalizer = Normalizer::new(config.currency.clone());
        let reader = DatasetReader::new(&config.ingestion);
        Self {
            config,
            normalizer,
            reader,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Reduce every CSV file directly inside `dir`.
    pub fn reduce_dir(&self, dir: impl AsRef<Path>) -> Result<AggregateResult> {
        let files = discover_csv_files(dir)?;
        self.reduce_files(files)
    }

    /// Reduce a set of CSV files, dealt round-robin over the workers.
    pub fn reduce_files(&self, files: Vec<PathBuf>) -> Result<AggregateResult> {
        if files.is_empty() {
            return Err(Error::empty_input("no input files"));
        }
        let workers = worker_count(self.config.reducer.workers, files.len());
        let plan = ShardPlan::round_robin(files, workers);

        info!(shards = plan.len(), "reducing files");

        let merged = self.run_shards(plan.shards(), |worker, files| {
            worker.run_files(&self.reader, files)
        })?;
        Ok(finalize(merged, &self.config.stats))
    }

    /// Reduce an in-memory record stream split into `shards` chunks.
    pub fn reduce_records(&self, records: &[VacancyRecord], shards: usize) -> Result<AggregateResult> {
        if records.is_empty() {
            return Err(Error::empty_input("record stream has no rows"));
        }
        let chunks = chunk_slice(records, shards);

        info!(shards = chunks.len(), records = records.len(), "reducing records");

        let merged = self.run_shards(&chunks, |worker, chunk| worker.run_records(chunk))?;
        Ok(finalize(merged, &self.config.stats))
    }

    /// Run `task` once per shard and merge the partials in position order.
    fn run_shards<T, F>(&self, shards: &[T], task: F) -> Result<StatsAccumulator>
    where
        T: Sync,
        F: Fn(&ShardWorker, &T) -> Result<Vec<PartialAccumulator>> + Sync,
    {
        let outcomes: Vec<Result<Vec<PartialAccumulator>>> = thread::scope(|scope| {
            let mut handles = Vec::with_capacity(shards.len());
            for (index, shard) in shards.iter().enumerate() {
                let worker = ShardWorker::new(index, self.config.stats.clone(), self.normalizer.clone());
                let task = &task;
                let handle = thread::Builder::new()
                    .name(format!("shard-{index}"))
                    .spawn_scoped(scope, move || task(&worker, shard))?;
                handles.push(handle);
            }

            Ok::<_, Error>(
                handles
                    .into_iter()
                    .enumerate()
                    .map(|(index, handle)| {
                        handle.join().unwrap_or_else(|payload| {
                            Err(Error::worker(format!(
                                "shard {index} panicked: {}",
                                panic_message(payload.as_ref())
                            )))
                        })
                    })
                    .collect(),
            )
        })?;

        let shard_count = outcomes.len();
        let mut partials = Vec::new();
        for (index, outcome) in outcomes.into_iter().enumerate() {
            match outcome {
                Ok(shard_partials) => partials.extend(shard_partials),
                Err(err) => {
                    warn!(shard = index, error = %err, "shard failed, discarding partial results");
                    return Err(err);
                }
            }
        }

        partials.sort_by_key(|partial| partial.position);
        let partial_count = partials.len();
        let mut merged = StatsAccumulator::new();
        for partial in partials {
            merged.merge(partial.accumulator);
        }
        debug!(
            shards = shard_count,
            partials = partial_count,
            records = merged.total_records(),
            "shards merged"
        );
        Ok(merged)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
