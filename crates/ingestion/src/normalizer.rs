//! Salary normalization.
//!
//! Turns a vacancy record into a [`VacancyPoint`]: year bucket, city bucket,
//! salary in the reference currency and the profession-filter match.

use vacancy_core::{CurrencyTable, ProfessionFilter, Result, SalaryRange, VacancyPoint, VacancyRecord};

/// Converts salary forks into whole reference-currency amounts.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    currencies: CurrencyTable,
}

impl Normalizer {
    /// Create a normalizer over a rate table.
    pub fn new(currencies: CurrencyTable) -> Self {
        Self { currencies }
    }

    /// Rate table in use.
    pub fn currencies(&self) -> &CurrencyTable {
        &self.currencies
    }

    /// Midpoint of the fork in the reference currency, truncated toward zero.
    ///
    /// Fails with `UnknownCurrency` when the code has no rate.
    pub fn salary(&self, salary: &SalaryRange) -> Result<f64> {
        Ok(self.exact_salary(salary)?.trunc())
    }

    /// Midpoint of the fork in the reference currency, without truncation.
    pub fn exact_salary(&self, salary: &SalaryRange) -> Result<f64> {
        self.currencies
            .to_reference(salary.midpoint(), &salary.currency)
    }

    /// Normalize one record for aggregation.
    pub fn point<'a>(
        &self,
        record: &'a VacancyRecord,
        filter: &ProfessionFilter,
    ) -> Result<VacancyPoint<'a>> {
        let year = record.year()?;
        let salary = self.salary(&record.salary)?;

        Ok(VacancyPoint {
            year,
            city: &record.area_name,
            salary,
            matches_profession: filter.matches(&record.name),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vacancy_core::Error;

    fn make_record(name: &str, from: f64, to: f64, currency: &str, published_at: &str) -> VacancyRecord {
        VacancyRecord {
            name: name.to_string(),
            salary: SalaryRange::new(from, to, currency),
            area_name: "Екатеринбург".to_string(),
            published_at: published_at.to_string(),
        }
    }

    #[test]
    fn test_salary_in_rub() {
        let normalizer = Normalizer::default();
        assert_eq!(normalizer.salary(&SalaryRange::new(10.0, 20.0, "RUR")).unwrap(), 15.0);
        assert_eq!(normalizer.salary(&SalaryRange::new(10.0, 30.0, "RUR")).unwrap(), 20.0);
    }

    #[test]
    fn test_salary_conversion() {
        let normalizer = Normalizer::default();
        assert_eq!(normalizer.salary(&SalaryRange::new(10.0, 30.0, "EUR")).unwrap(), 1198.0);
        assert_eq!(normalizer.salary(&SalaryRange::new(1000.0, 2000.0, "KZT")).unwrap(), 195.0);
        assert_eq!(normalizer.salary(&SalaryRange::new(2000.0, 4000.0, "AZN")).unwrap(), 107040.0);
    }

    #[test]
    fn test_salary_truncates() {
        let normalizer = Normalizer::new(CurrencyTable::from_rates([("RUR", 1.0)]));
        assert_eq!(normalizer.salary(&SalaryRange::new(10.0, 11.0, "RUR")).unwrap(), 10.0);
        assert_eq!(normalizer.exact_salary(&SalaryRange::new(10.0, 11.0, "RUR")).unwrap(), 10.5);
    }

    #[test]
    fn test_unknown_currency() {
        let normalizer = Normalizer::default();
        let record = make_record("Аналитик", 1.0, 2.0, "BTC", "2022-01-01");
        let err = normalizer
            .point(&record, &ProfessionFilter::new("Аналитик"))
            .unwrap_err();
        assert!(matches!(err, Error::UnknownCurrency(code) if code == "BTC"));
    }

    #[test]
    fn test_point() {
        let normalizer = Normalizer::default();
        let record = make_record("Ведущий аналитик", 100.0, 300.0, "RUR", "2019-03-01T10:00:00+0300");

        let point = normalizer
            .point(&record, &ProfessionFilter::new("аналитик"))
            .unwrap();
        assert_eq!(point.year, 2019);
        assert_eq!(point.city, "Екатеринбург");
        assert_eq!(point.salary, 200.0);
        assert!(point.matches_profession);

        let point = normalizer
            .point(&record, &ProfessionFilter::new("Аналитик"))
            .unwrap();
        assert!(!point.matches_profession);
    }

    #[test]
    fn test_malformed_timestamp() {
        let normalizer = Normalizer::default();
        let record = make_record("Аналитик", 1.0, 2.0, "RUR", "22-01-01");
        assert!(matches!(
            normalizer.point(&record, &ProfessionFilter::default()),
            Err(Error::MalformedTimestamp(_))
        ));
    }
}
