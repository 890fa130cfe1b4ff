//! Currency conversion abstractions

use super::amount::AmountInput;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::fmt::{self, Display};
use std::str::FromStr;

/// A three-letter ISO 4217 style currency code, always upper case.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for CurrencyCode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        if code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()) {
            Ok(CurrencyCode(code.to_ascii_uppercase()))
        } else {
            Err(anyhow!("Invalid currency code: {}", s))
        }
    }
}

impl Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Secret used to authenticate against the pair-rate endpoint.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiCredential(String);

impl ApiCredential {
    pub fn new(key: impl Into<String>) -> Result<Self> {
        let key = key.into().trim().to_string();
        if key.is_empty() {
            return Err(anyhow!("API key must not be empty"));
        }
        Ok(ApiCredential(key))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiCredential(***)")
    }
}

/// Decoded answer of a pair-rate request.
///
/// Every field is optional: a structurally valid response may still lack the
/// rate, which callers treat as a soft failure.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PairQuote {
    pub conversion_rate: Option<f64>,
    pub time_last_update: Option<DateTime<Utc>>,
    pub error_type: Option<String>,
}

impl PairQuote {
    /// Returns the rate when it can be used as a multiplier.
    pub fn usable_rate(&self) -> Option<f64> {
        self.conversion_rate
            .filter(|rate| rate.is_finite() && *rate > 0.0)
    }
}

#[async_trait]
pub trait PairRateProvider: Send + Sync {
    async fn fetch_pair(
        &self,
        from: &CurrencyCode,
        to: &CurrencyCode,
        amount: &AmountInput,
    ) -> Result<PairQuote>;
}
