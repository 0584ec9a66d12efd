//! Listing queries over vacancy records.
//!
//! A listing narrows records with one [`VacancyFilter`], orders them by a
//! [`SortKey`] and prints a row range. Filters are parsed from
//! `"<Field>: <value>"` strings.

use crate::normalizer::Normalizer;
use chrono::NaiveDate;
use ordered_float::OrderedFloat;
use std::cmp::Ordering;
use std::str::FromStr;
use vacancy_core::{Error, Result, VacancyRecord};

/// Typed record predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum VacancyFilter {
    /// Exact profession name.
    Name(String),
    /// Exact city name.
    Area(String),
    /// Exact currency code.
    Currency(String),
    /// Salary fork contains the value.
    Salary(f64),
    /// Published on the given date.
    Published(NaiveDate),
}

impl VacancyFilter {
    pub fn matches(&self, record: &VacancyRecord) -> bool {
        match self {
            VacancyFilter::Name(name) => record.name == *name,
            VacancyFilter::Area(area) => record.area_name == *area,
            VacancyFilter::Currency(code) => record.salary.currency == *code,
            VacancyFilter::Salary(value) => record.salary.contains(*value),
            VacancyFilter::Published(date) => record.published_date() == Some(*date),
        }
    }
}

impl FromStr for VacancyFilter {
    type Err = Error;

    fn from_str(raw: &str) -> Result<Self> {
        let (field, value) = raw
            .split_once(": ")
            .ok_or_else(|| Error::invalid_filter(format!("expected '<Field>: <value>', got {raw:?}")))?;

        match field.trim() {
            "Name" => Ok(VacancyFilter::Name(value.to_string())),
            "Area" => Ok(VacancyFilter::Area(value.to_string())),
            "Currency" => Ok(VacancyFilter::Currency(value.to_string())),
            "Salary" => value
                .trim()
                .parse::<f64>()
                .map(VacancyFilter::Salary)
                .map_err(|_| Error::invalid_filter(format!("salary must be a number, got {value:?}"))),
            "Published" => NaiveDate::parse_from_str(value.trim(), "%d.%m.%Y")
                .map(VacancyFilter::Published)
                .map_err(|_| Error::invalid_filter(format!("date must be DD.MM.YYYY, got {value:?}"))),
            other => Err(Error::invalid_filter(format!("unknown filter field {other:?}"))),
        }
    }
}

/// Field a listing is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Name,
    Area,
    /// Midpoint salary in the reference currency.
    Salary,
    Published,
    Currency,
}

impl FromStr for SortKey {
    type Err = Error;

    fn from_str(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(SortKey::Name),
            "area" => Ok(SortKey::Area),
            "salary" => Ok(SortKey::Salary),
            "published" => Ok(SortKey::Published),
            "currency" => Ok(SortKey::Currency),
            other => Err(Error::invalid_filter(format!("unknown sort key {other:?}"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum SortValue {
    Text(String),
    Number(OrderedFloat<f64>),
}

impl SortKey {
    fn value(self, record: &VacancyRecord, normalizer: &Normalizer) -> Result<SortValue> {
        Ok(match self {
            SortKey::Name => SortValue::Text(record.name.clone()),
            SortKey::Area => SortValue::Text(record.area_name.clone()),
            SortKey::Salary => SortValue::Number(OrderedFloat(normalizer.exact_salary(&record.salary)?)),
            SortKey::Published => SortValue::Text(record.published_at.clone()),
            SortKey::Currency => SortValue::Text(record.salary.currency.clone()),
        })
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    }
}

/// Filter, order and slice a list of records.
#[derive(Debug, Clone, Default)]
pub struct ListingQuery {
    pub filter: Option<VacancyFilter>,
    pub sort: Option<(SortKey, SortOrder)>,
    /// First row to show, 1-based.
    pub start: Option<usize>,
    /// Row to stop before, 1-based.
    pub end: Option<usize>,
}

impl ListingQuery {
    /// Run the query and return `(row number, record)` pairs.
    ///
    /// Rows are numbered after filtering and sorting, before slicing. Sorting
    /// is stable in both directions.
    pub fn apply(
        &self,
        records: Vec<VacancyRecord>,
        normalizer: &Normalizer,
    ) -> Result<Vec<(usize, VacancyRecord)>> {
        let mut records: Vec<VacancyRecord> = match &self.filter {
            Some(filter) => records.into_iter().filter(|r| filter.matches(r)).collect(),
            None => records,
        };

        if let Some((key, order)) = self.sort {
            let mut keyed = records
                .into_iter()
                .map(|r| Ok((key.value(&r, normalizer)?, r)))
                .collect::<Result<Vec<_>>>()?;
            keyed.sort_by(|(a, _), (b, _)| order.apply(a.cmp(b)));
            records = keyed.into_iter().map(|(_, r)| r).collect();
        }

        let len = records.len();
        let start = self.start.map(|s| s.saturating_sub(1)).unwrap_or(0).min(len);
        let end = self.end.map(|e| e.saturating_sub(1)).unwrap_or(len).clamp(start, len);

        Ok(records
            .into_iter()
            .enumerate()
            .skip(start)
            .take(end - start)
            .map(|(i, r)| (i + 1, r))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vacancy_core::SalaryRange;

    fn make_record(name: &str, from: f64, to: f64, currency: &str, area: &str, published_at: &str) -> VacancyRecord {
        VacancyRecord {
            name: name.to_string(),
            salary: SalaryRange::new(from, to, currency),
            area_name: area.to_string(),
            published_at: published_at.to_string(),
        }
    }

    fn sample() -> Vec<VacancyRecord> {
        vec![
            make_record("Программист", 100_000.0, 150_000.0, "RUR", "Москва", "2022-07-05T18:19:30+0300"),
            make_record("Аналитик", 1_000.0, 2_000.0, "USD", "Казань", "2022-07-06T10:00:00+0300"),
            make_record("Тестировщик", 50_000.0, 70_000.0, "RUR", "Москва", "2021-01-01T10:00:00+0300"),
            make_record("Дизайнер", 60_000.0, 60_000.0, "RUR", "Пермь", "2022-07-05T09:00:00+0300"),
        ]
    }

    fn names(rows: &[(usize, VacancyRecord)]) -> Vec<&str> {
        rows.iter().map(|(_, r)| r.name.as_str()).collect()
    }

    #[test]
    fn test_parse_filters() {
        assert_eq!(
            "Area: Москва".parse::<VacancyFilter>().unwrap(),
            VacancyFilter::Area("Москва".to_string())
        );
        assert_eq!(
            "Salary: 60000".parse::<VacancyFilter>().unwrap(),
            VacancyFilter::Salary(60000.0)
        );
        assert_eq!(
            "Published: 05.07.2022".parse::<VacancyFilter>().unwrap(),
            VacancyFilter::Published(NaiveDate::from_ymd_opt(2022, 7, 5).unwrap())
        );
    }

    #[test]
    fn test_parse_filter_errors() {
        assert!(matches!("Area Москва".parse::<VacancyFilter>(), Err(Error::InvalidFilter(_))));
        assert!(matches!("Color: red".parse::<VacancyFilter>(), Err(Error::InvalidFilter(_))));
        assert!(matches!("Salary: lots".parse::<VacancyFilter>(), Err(Error::InvalidFilter(_))));
        assert!(matches!("Published: 2022-07-05".parse::<VacancyFilter>(), Err(Error::InvalidFilter(_))));
        assert!(matches!("Published: 32.01.2022".parse::<VacancyFilter>(), Err(Error::InvalidFilter(_))));
        assert!(matches!("colour".parse::<SortKey>(), Err(Error::InvalidFilter(_))));
    }

    #[test]
    fn test_filter_matches() {
        let normalizer = Normalizer::default();
        let query = ListingQuery {
            filter: Some(VacancyFilter::Area("Москва".to_string())),
            ..Default::default()
        };
        let rows = query.apply(sample(), &normalizer).unwrap();
        assert_eq!(names(&rows), vec!["Программист", "Тестировщик"]);

        let query = ListingQuery {
            filter: Some(VacancyFilter::Published(NaiveDate::from_ymd_opt(2022, 7, 5).unwrap())),
            ..Default::default()
        };
        let rows = query.apply(sample(), &normalizer).unwrap();
        assert_eq!(names(&rows), vec!["Программист", "Дизайнер"]);

        let query = ListingQuery {
            filter: Some(VacancyFilter::Salary(60_000.0)),
            ..Default::default()
        };
        let rows = query.apply(sample(), &normalizer).unwrap();
        assert_eq!(names(&rows), vec!["Тестировщик", "Дизайнер"]);
    }

    #[test]
    fn test_nothing_found() {
        let query = ListingQuery {
            filter: Some(VacancyFilter::Currency("EUR".to_string())),
            ..Default::default()
        };
        assert!(query.apply(sample(), &Normalizer::default()).unwrap().is_empty());
    }

    #[test]
    fn test_sort_by_converted_salary() {
        let query = ListingQuery {
            sort: Some((SortKey::Salary, SortOrder::Descending)),
            ..Default::default()
        };
        let rows = query.apply(sample(), &Normalizer::default()).unwrap();
        // 1500 USD is about 91k RUR.
        assert_eq!(names(&rows), vec!["Программист", "Аналитик", "Тестировщик", "Дизайнер"]);
        assert_eq!(rows[0].0, 1);
    }

    #[test]
    fn test_sort_is_stable_when_reversed() {
        let query = ListingQuery {
            sort: Some((SortKey::Area, SortOrder::Descending)),
            ..Default::default()
        };
        let rows = query.apply(sample(), &Normalizer::default()).unwrap();
        // Пермь > Москва > Казань; the two Москва rows keep input order.
        assert_eq!(names(&rows), vec!["Дизайнер", "Программист", "Тестировщик", "Аналитик"]);
    }

    #[test]
    fn test_sort_unknown_currency_fails() {
        let mut records = sample();
        records.push(make_record("Оператор", 1.0, 2.0, "XXX", "Омск", "2022-01-01"));
        let query = ListingQuery {
            sort: Some((SortKey::Salary, SortOrder::Ascending)),
            ..Default::default()
        };
        assert!(matches!(
            query.apply(records, &Normalizer::default()),
            Err(Error::UnknownCurrency(_))
        ));
    }

    #[test]
    fn test_row_range() {
        let query = ListingQuery {
            start: Some(2),
            end: Some(4),
            ..Default::default()
        };
        let rows = query.apply(sample(), &Normalizer::default()).unwrap();
        assert_eq!(rows.iter().map(|(n, _)| *n).collect::<Vec<_>>(), vec![2, 3]);

        let query = ListingQuery {
            start: Some(10),
            ..Default::default()
        };
        assert!(query.apply(sample(), &Normalizer::default()).unwrap().is_empty());
    }
}
