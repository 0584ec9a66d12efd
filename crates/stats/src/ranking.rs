//! City rankings.
//!
//! Both rankings truncate to the top N cities first and only then drop the
//! cities below the minimum-share threshold. A city just outside the top N is
//! never shown even when it would pass the threshold.

use crate::accumulator::CityBucket;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use vacancy_core::config::StatsConfig;

/// One row of a city ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityStat {
    pub city: String,
    /// Posting share or mean salary, depending on the ranking.
    pub value: f64,
}

/// Top-N-then-filter ranking parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankingPolicy {
    pub top_n: usize,
    pub min_share_divisor: u64,
    pub share_precision: u32,
}

impl Default for RankingPolicy {
    fn default() -> Self {
        Self::from_config(&StatsConfig::default())
    }
}

impl RankingPolicy {
    pub fn from_config(config: &StatsConfig) -> Self {
        Self {
            top_n: config.top_cities,
            min_share_divisor: config.min_share_divisor,
            share_precision: config.share_precision,
        }
    }

    /// Minimum posting count for a city to be shown, `floor(total / divisor)`.
    pub fn threshold(&self, total_records: u64) -> u64 {
        total_records / self.min_share_divisor.max(1)
    }

    fn allowed<'a>(&self, cities: &'a [CityBucket], total_records: u64) -> HashSet<&'a str> {
        let threshold = self.threshold(total_records);
        cities
            .iter()
            .filter(|c| c.count >= threshold)
            .map(|c| c.city.as_str())
            .collect()
    }

    /// Cities by posting share, highest first.
    ///
    /// Ties keep the order of `cities`.
    pub fn share_by_city(&self, cities: &[CityBucket], total_records: u64) -> Vec<CityStat> {
        let allowed = self.allowed(cities, total_records);

        let mut ranked: Vec<&CityBucket> = cities.iter().collect();
        ranked.sort_by(|a, b| b.count.cmp(&a.count));

        ranked
            .into_iter()
            .take(self.top_n)
            .map(|c| CityStat {
                city: c.city.clone(),
                value: self.share(c.count, total_records),
            })
            .filter(|stat| allowed.contains(stat.city.as_str()))
            .collect()
    }

    /// Cities by mean salary, highest first.
    ///
    /// Ties keep the order of `cities`.
    pub fn salary_by_city(&self, cities: &[CityBucket], total_records: u64) -> Vec<CityStat> {
        let allowed = self.allowed(cities, total_records);

        let mut ranked: Vec<(&CityBucket, OrderedFloat<f64>)> = cities
            .iter()
            .map(|c| (c, OrderedFloat(c.salary.value())))
            .collect();
        ranked.sort_by(|(_, a), (_, b)| b.cmp(a));

        ranked
            .into_iter()
            .take(self.top_n)
            .filter(|(c, _)| allowed.contains(c.city.as_str()))
            .map(|(c, mean)| CityStat {
                city: c.city.clone(),
                value: mean.into_inner(),
            })
            .collect()
    }

    fn share(&self, count: u64, total_records: u64) -> f64 {
        if total_records == 0 {
            return 0.0;
        }
        round_to(count as f64 / total_records as f64, self.share_precision)
    }
}

/// Round half away from zero to `places` decimals.
pub(crate) fn round_to(value: f64, places: u32) -> f64 {
    let scale = 10f64.powi(places as i32);
    (value * scale).round() / scale
}
