//! Per-shard accumulation.
//!
//! A worker owns its engine outright and returns raw accumulators; ranking
//! happens only after the merge.

use crate::sharding::ShardInput;
use tracing::{debug, info};
use vacancy_core::config::StatsConfig;
use vacancy_core::{Error, Result, VacancyRecord};
use vacancy_ingestion::{DatasetReader, Normalizer};
use vacancy_stats::{AggregationEngine, StatsAccumulator};

/// Raw accumulator of one input, with the input's position in stream order.
#[derive(Debug, Clone)]
pub struct PartialAccumulator {
    pub position: usize,
    pub accumulator: StatsAccumulator,
}

/// Everything a worker needs, handed over at spawn time.
#[derive(Debug, Clone)]
pub struct ShardWorker {
    index: usize,
    stats: StatsConfig,
    normalizer: Normalizer,
}

impl ShardWorker {
    pub fn new(index: usize, stats: StatsConfig, normalizer: Normalizer) -> Self {
        Self {
            index,
            stats,
            normalizer,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    fn engine(&self) -> AggregationEngine {
        AggregationEngine::with_normalizer(self.stats.clone(), self.normalizer.clone())
    }

    /// Read and accumulate every file of the shard.
    ///
    /// Returns one accumulator per file, tagged with the file's listing
    /// position. A file without vacancy rows fails the shard with
    /// `EmptyInput`.
    pub fn run_files(
        &self,
        reader: &DatasetReader,
        inputs: &[ShardInput],
    ) -> Result<Vec<PartialAccumulator>> {
        let mut partials = Vec::with_capacity(inputs.len());
        let mut records = 0u64;

        for input in inputs {
            let dataset = reader.read_path(&input.path)?;
            if dataset.is_empty() {
                return Err(Error::empty_input(format!(
                    "{} has no vacancy rows",
                    input.path.display()
                )));
            }
            let mut engine = self.engine();
            engine.add_records(&dataset.records)?;
            debug!(shard = self.index, path = %input.path.display(), records = dataset.len(), "file accumulated");

            let accumulator = engine.into_accumulator();
            records += accumulator.total_records();
            partials.push(PartialAccumulator {
                position: input.position,
                accumulator,
            });
        }

        info!(
            shard = self.index,
            files = inputs.len(),
            records,
            "shard complete"
        );
        Ok(partials)
    }

    /// Accumulate an in-memory slice of records.
    ///
    /// The result is positioned at the worker index, so chunks must be
    /// contiguous and in stream order.
    pub fn run_records(&self, records: &[VacancyRecord]) -> Result<Vec<PartialAccumulator>> {
        let mut engine = self.engine();
        engine.add_records(records)?;
        debug!(shard = self.index, records = records.len(), "shard complete");
        Ok(vec![PartialAccumulator {
            position: self.index,
            accumulator: engine.into_accumulator(),
        }])
    }
}
