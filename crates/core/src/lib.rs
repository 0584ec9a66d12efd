//! Core types and configuration for the vacancy statistics system.
//!
//! This crate provides shared types used across all other crates:
//! - Vacancy records and salary ranges
//! - The static currency-to-ruble rate table
//! - Configuration structures
//! - Common error types

pub mod config;
pub mod currency;
pub mod error;
pub mod types;

pub use config::Config;
pub use currency::CurrencyTable;
pub use error::{Error, Result};
pub use types::*;
