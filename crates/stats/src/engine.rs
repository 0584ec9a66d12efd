//! Single-pass aggregation engine.
//!
//! Records are normalized and folded into a [`StatsAccumulator`] one at a
//! time. [`finalize`] runs the ranking and fallback pass once over the
//! complete accumulator.

use crate::accumulator::StatsAccumulator;
use crate::ranking::RankingPolicy;
use crate::result::AggregateResult;
use crate::running_mean::RunningMean;
use std::collections::BTreeMap;
use tracing::debug;
use vacancy_core::config::StatsConfig;
use vacancy_core::{Config, Result, VacancyRecord};
use vacancy_ingestion::Normalizer;

/// Aggregation engine for one vacancy stream.
#[derive(Debug, Clone)]
pub struct AggregationEngine {
    normalizer: Normalizer,
    stats: StatsConfig,
    accumulator: StatsAccumulator,
}

impl AggregationEngine {
    pub fn new(config: &Config) -> Self {
        Self::with_normalizer(config.stats.clone(), Normalizer::new(config.currency.clone()))
    }

    pub fn with_normalizer(stats: StatsConfig, normalizer: Normalizer) -> Self {
        Self {
            normalizer,
            stats,
            accumulator: StatsAccumulator::new(),
        }
    }

    /// Normalize one record and account for it.
    ///
    /// The accumulator is left untouched when normalization fails.
    pub fn add_record(&mut self, record: &VacancyRecord) -> Result<()> {
        let point = self.normalizer.point(record, &self.stats.profession)?;
        self.accumulator.add(&point);
        Ok(())
    }

    pub fn add_records<'a, I>(&mut self, records: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a VacancyRecord>,
    {
        for record in records {
            self.add_record(record)?;
        }
        Ok(())
    }

    pub fn accumulator(&self) -> &StatsAccumulator {
        &self.accumulator
    }

    /// Raw accumulator, for merging with other shards.
    pub fn into_accumulator(self) -> StatsAccumulator {
        self.accumulator
    }

    /// Run the ranking pass and produce the result.
    pub fn finish(self) -> AggregateResult {
        finalize(self.accumulator, &self.stats)
    }
}

/// Turn a complete accumulator into the published result.
///
/// Must run once over global totals. Thresholds and rankings of separate
/// shards do not combine.
pub fn finalize(accumulator: StatsAccumulator, stats: &StatsConfig) -> AggregateResult {
    let policy = RankingPolicy::from_config(stats);
    let total_records = accumulator.total_records();

    let share_by_city = policy.share_by_city(accumulator.cities(), total_records);
    let salary_by_city = policy.salary_by_city(accumulator.cities(), total_records);

    debug!(
        total_records,
        cities = accumulator.cities().len(),
        threshold = policy.threshold(total_records),
        shown_by_share = share_by_city.len(),
        shown_by_salary = salary_by_city.len(),
        "city rankings computed"
    );

    let parts = accumulator.into_parts();

    let mut filtered_count_by_year = parts.filtered_count_by_year;
    if filtered_count_by_year.is_empty() {
        debug!(
            profession = %stats.profession,
            year = stats.fallback_year,
            "profession matched nothing, using fallback year"
        );
        filtered_count_by_year = BTreeMap::from([(stats.fallback_year, 0)]);
    }
    let mut filtered_salary_by_year = parts.filtered_salary_by_year;
    if filtered_salary_by_year.is_empty() {
        filtered_salary_by_year = BTreeMap::from([(stats.fallback_year, RunningMean::new())]);
    }

    AggregateResult {
        profession: stats.profession.clone(),
        total_records: parts.total_records,
        salary_by_year: parts.salary_by_year,
        count_by_year: parts.count_by_year,
        filtered_salary_by_year,
        filtered_count_by_year,
        salary_by_city,
        share_by_city,
    }
}

/// Aggregate a record sequence in one pass.
pub fn aggregate<'a, I>(records: I, config: &Config) -> Result<AggregateResult>
where
    I: IntoIterator<Item = &'a VacancyRecord>,
{
    let mut engine = AggregationEngine::new(config);
    engine.add_records(records)?;
    Ok(engine.finish())
}
