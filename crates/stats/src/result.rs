//! Final aggregate snapshot.

use crate::ranking::CityStat;
use crate::running_mean::RunningMean;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::collections::BTreeMap;
use vacancy_core::{ProfessionFilter, Year};

/// Result of one reduction pass. Built once by [`crate::finalize`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateResult {
    pub(crate) profession: ProfessionFilter,
    pub(crate) total_records: u64,
    #[serde(serialize_with = "serialize_means")]
    pub(crate) salary_by_year: BTreeMap<Year, RunningMean>,
    pub(crate) count_by_year: BTreeMap<Year, u64>,
    #[serde(serialize_with = "serialize_means")]
    pub(crate) filtered_salary_by_year: BTreeMap<Year, RunningMean>,
    pub(crate) filtered_count_by_year: BTreeMap<Year, u64>,
    pub(crate) salary_by_city: Vec<CityStat>,
    pub(crate) share_by_city: Vec<CityStat>,
}

/// One year of the dynamics table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct YearRow {
    pub year: Year,
    pub salary: f64,
    pub filtered_salary: f64,
    pub count: u64,
    pub filtered_count: u64,
}

impl AggregateResult {
    /// Profession filter the filtered maps were built with.
    pub fn profession(&self) -> &ProfessionFilter {
        &self.profession
    }

    pub fn total_records(&self) -> u64 {
        self.total_records
    }

    /// Years with at least one vacancy, ascending.
    pub fn years(&self) -> Vec<Year> {
        self.salary_by_year.keys().copied().collect()
    }

    pub fn salary_by_year(&self) -> &BTreeMap<Year, RunningMean> {
        &self.salary_by_year
    }

    pub fn count_by_year(&self) -> &BTreeMap<Year, u64> {
        &self.count_by_year
    }

    pub fn filtered_salary_by_year(&self) -> &BTreeMap<Year, RunningMean> {
        &self.filtered_salary_by_year
    }

    pub fn filtered_count_by_year(&self) -> &BTreeMap<Year, u64> {
        &self.filtered_count_by_year
    }

    /// Mean salary per year.
    pub fn mean_salary_by_year(&self) -> BTreeMap<Year, f64> {
        means(&self.salary_by_year)
    }

    /// Mean salary per year for the profession filter.
    pub fn mean_filtered_salary_by_year(&self) -> BTreeMap<Year, f64> {
        means(&self.filtered_salary_by_year)
    }

    /// Top cities by mean salary, highest first.
    pub fn salary_by_city(&self) -> &[CityStat] {
        &self.salary_by_city
    }

    /// Top cities by posting share, highest first.
    pub fn share_by_city(&self) -> &[CityStat] {
        &self.share_by_city
    }

    /// One row per year of [`years`](Self::years).
    ///
    /// Years missing from the filtered maps report 0.
    pub fn year_rows(&self) -> Vec<YearRow> {
        self.salary_by_year
            .iter()
            .map(|(&year, salary)| YearRow {
                year,
                salary: salary.value(),
                filtered_salary: self
                    .filtered_salary_by_year
                    .get(&year)
                    .map(RunningMean::value)
                    .unwrap_or(0.0),
                count: self.count_by_year.get(&year).copied().unwrap_or(0),
                filtered_count: self.filtered_count_by_year.get(&year).copied().unwrap_or(0),
            })
            .collect()
    }
}

fn means(map: &BTreeMap<Year, RunningMean>) -> BTreeMap<Year, f64> {
    map.iter().map(|(&year, mean)| (year, mean.value())).collect()
}

fn serialize_means<S>(map: &BTreeMap<Year, RunningMean>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let mut out = serializer.serialize_map(Some(map.len()))?;
    for (year, mean) in map {
        out.serialize_entry(year, &mean.value())?;
    }
    out.end()
}
