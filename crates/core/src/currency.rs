//! Static currency-to-ruble rate table.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Code of the reference currency every salary is normalized to.
pub const REFERENCE_CURRENCY: &str = "RUR";

/// Built-in multipliers from each supported currency to rubles.
const DEFAULT_RATES: [(&str, f64); 10] = [
    ("AZN", 35.68),
    ("BYR", 23.91),
    ("EUR", 59.90),
    ("GEL", 21.74),
    ("KGS", 0.76),
    ("KZT", 0.13),
    ("RUR", 1.0),
    ("UAH", 1.64),
    ("USD", 60.66),
    ("UZS", 0.0055),
];

/// Lookup table of currency code to reference-currency multiplier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrencyTable {
    rates: BTreeMap<String, f64>,
}

impl Default for CurrencyTable {
    fn default() -> Self {
        Self {
            rates: DEFAULT_RATES
                .iter()
                .map(|(code, rate)| (code.to_string(), *rate))
                .collect(),
        }
    }
}

impl CurrencyTable {
    /// Create a table from explicit rates.
    pub fn from_rates<I, S>(rates: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        Self {
            rates: rates.into_iter().map(|(code, rate)| (code.into(), rate)).collect(),
        }
    }

    /// Multiplier for a currency code.
    pub fn rate(&self, code: &str) -> Result<f64> {
        self.rates
            .get(code)
            .copied()
            .ok_or_else(|| Error::unknown_currency(code))
    }

    /// Convert an amount to the reference currency.
    pub fn to_reference(&self, amount: f64, code: &str) -> Result<f64> {
        Ok(amount * self.rate(code)?)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.rates.contains_key(code)
    }

    /// Currency codes in ascending order.
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.rates.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// Check that every rate is a positive finite number.
    pub fn validate(&self) -> Result<()> {
        if self.rates.is_empty() {
            return Err(Error::config("currency table is empty"));
        }
        for (code, rate) in &self.rates {
            if !rate.is_finite() || *rate <= 0.0 {
                return Err(Error::config(format!(
                    "rate for {code} must be positive, got {rate}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_table() {
        let table = CurrencyTable::default();
        assert_eq!(table.len(), 10);
        assert_eq!(table.rate(REFERENCE_CURRENCY).unwrap(), 1.0);
        assert_relative_eq!(table.rate("USD").unwrap(), 60.66);
        assert_relative_eq!(table.rate("UZS").unwrap(), 0.0055);
        assert!(table.validate().is_ok());
    }

    #[test]
    fn test_unknown_currency() {
        let table = CurrencyTable::default();
        match table.rate("XYZ") {
            Err(Error::UnknownCurrency(code)) => assert_eq!(code, "XYZ"),
            other => panic!("expected UnknownCurrency, got {other:?}"),
        }
    }

    #[test]
    fn test_to_reference() {
        let table = CurrencyTable::default();
        assert_relative_eq!(table.to_reference(1500.0, "KZT").unwrap(), 195.0, epsilon = 1e-9);
        assert_relative_eq!(table.to_reference(3000.0, "AZN").unwrap(), 107040.0, epsilon = 1e-6);
    }

    #[test]
    fn test_validate_rejects_non_positive() {
        let table = CurrencyTable::from_rates([("RUR", 1.0), ("USD", 0.0)]);
        assert!(matches!(table.validate(), Err(Error::Config(_))));

        let table = CurrencyTable::from_rates(Vec::<(String, f64)>::new());
        assert!(table.is_empty());
        assert!(table.validate().is_err());
    }
}
