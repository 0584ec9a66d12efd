//! Grouped accumulators for one reduction pass.
//!
//! Holds the raw per-year and per-city buckets before any ranking or
//! filtering. Accumulators built over disjoint shards can be merged; bucket
//! sums and counts do not depend on merge order.

use crate::running_mean::RunningMean;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use vacancy_core::{VacancyPoint, Year};

/// Posting count and salary mean of one city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityBucket {
    pub city: String,
    pub count: u64,
    pub salary: RunningMean,
}

/// Raw aggregates of a vacancy stream.
#[derive(Debug, Clone, Default)]
pub struct StatsAccumulator {
    salary_by_year: BTreeMap<Year, RunningMean>,
    filtered_salary_by_year: BTreeMap<Year, RunningMean>,
    count_by_year: BTreeMap<Year, u64>,
    filtered_count_by_year: BTreeMap<Year, u64>,
    /// City buckets in first-seen order.
    cities: Vec<CityBucket>,
    city_index: HashMap<String, usize>,
    total_records: u64,
}

impl StatsAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for one normalized vacancy.
    pub fn add(&mut self, point: &VacancyPoint<'_>) {
        self.total_records += 1;

        self.salary_by_year
            .entry(point.year)
            .or_default()
            .add(point.salary);
        *self.count_by_year.entry(point.year).or_insert(0) += 1;

        if point.matches_profession {
            self.filtered_salary_by_year
                .entry(point.year)
                .or_default()
                .add(point.salary);
            *self.filtered_count_by_year.entry(point.year).or_insert(0) += 1;
        }

        let bucket = self.city_bucket_mut(point.city);
        bucket.count += 1;
        bucket.salary.add(point.salary);
    }

    fn city_bucket_mut(&mut self, city: &str) -> &mut CityBucket {
        let idx = match self.city_index.get(city) {
            Some(&idx) => idx,
            None => {
                let idx = self.cities.len();
                self.cities.push(CityBucket {
                    city: city.to_string(),
                    count: 0,
                    salary: RunningMean::new(),
                });
                self.city_index.insert(city.to_string(), idx);
                idx
            }
        };
        &mut self.cities[idx]
    }

    /// Fold another shard's accumulator into this one.
    ///
    /// Cities first seen in `other` are appended after this accumulator's
    /// cities, keeping their relative order.
    pub fn merge(&mut self, other: StatsAccumulator) {
        self.total_records += other.total_records;

        for (year, mean) in other.salary_by_year {
            self.salary_by_year.entry(year).or_default().merge(&mean);
        }
        for (year, mean) in other.filtered_salary_by_year {
            self.filtered_salary_by_year
                .entry(year)
                .or_default()
                .merge(&mean);
        }
        for (year, count) in other.count_by_year {
            *self.count_by_year.entry(year).or_insert(0) += count;
        }
        for (year, count) in other.filtered_count_by_year {
            *self.filtered_count_by_year.entry(year).or_insert(0) += count;
        }
        for bucket in other.cities {
            let target = self.city_bucket_mut(&bucket.city);
            target.count += bucket.count;
            target.salary.merge(&bucket.salary);
        }
    }

    /// Number of vacancies accounted for.
    pub fn total_records(&self) -> u64 {
        self.total_records
    }

    pub fn is_empty(&self) -> bool {
        self.total_records == 0
    }

    pub fn salary_by_year(&self) -> &BTreeMap<Year, RunningMean> {
        &self.salary_by_year
    }

    pub fn filtered_salary_by_year(&self) -> &BTreeMap<Year, RunningMean> {
        &self.filtered_salary_by_year
    }

    pub fn count_by_year(&self) -> &BTreeMap<Year, u64> {
        &self.count_by_year
    }

    pub fn filtered_count_by_year(&self) -> &BTreeMap<Year, u64> {
        &self.filtered_count_by_year
    }

    /// City buckets in first-seen order.
    pub fn cities(&self) -> &[CityBucket] {
        &self.cities
    }

    pub fn city(&self, name: &str) -> Option<&CityBucket> {
        self.city_index.get(name).map(|&idx| &self.cities[idx])
    }

    pub(crate) fn into_parts(self) -> AccumulatorParts {
        AccumulatorParts {
            salary_by_year: self.salary_by_year,
            filtered_salary_by_year: self.filtered_salary_by_year,
            count_by_year: self.count_by_year,
            filtered_count_by_year: self.filtered_count_by_year,
            cities: self.cities,
            total_records: self.total_records,
        }
    }
}

/// Owned accumulator contents handed to post-processing.
pub(crate) struct AccumulatorParts {
    pub salary_by_year: BTreeMap<Year, RunningMean>,
    pub filtered_salary_by_year: BTreeMap<Year, RunningMean>,
    pub count_by_year: BTreeMap<Year, u64>,
    pub filtered_count_by_year: BTreeMap<Year, u64>,
    pub cities: Vec<CityBucket>,
    pub total_records: u64,
}
