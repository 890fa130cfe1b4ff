use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error, instrument};

use crate::core::amount::AmountInput;
use crate::core::currency::{ApiCredential, CurrencyCode, PairQuote, PairRateProvider};

#[derive(Debug, Deserialize)]
struct PairResponse {
    result: Option<String>,
    conversion_rate: Option<f64>,
    time_last_update_unix: Option<i64>,
    #[serde(rename = "error-type")]
    error_type: Option<String>,
}

impl From<PairResponse> for PairQuote {
    fn from(response: PairResponse) -> Self {
        PairQuote {
            conversion_rate: response.conversion_rate,
            time_last_update: response
                .time_last_update_unix
                .and_then(|ts| Utc.timestamp_opt(ts, 0).single()),
            error_type: response.error_type,
        }
    }
}

// ExchangeRateApiProvider implementation for PairRateProvider
pub struct ExchangeRateApiProvider {
    base_url: String,
    version: String,
    credential: ApiCredential,
    client: reqwest::Client,
}

impl ExchangeRateApiProvider {
    pub fn new(
        base_url: &str,
        version: &str,
        credential: ApiCredential,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("cconv/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(ExchangeRateApiProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            version: version.to_string(),
            credential,
            client,
        })
    }

    /// Builds `{base}/{version}/{key}/pair/{from}/{to}[/{amount}]`.
    fn pair_url(&self, from: &CurrencyCode, to: &CurrencyCode, amount: &AmountInput) -> String {
        let mut url = format!(
            "{}/{}/{}/pair/{}/{}",
            self.base_url,
            self.version,
            self.credential.expose(),
            from,
            to
        );
        if !amount.is_empty() {
            url.push('/');
            url.push_str(amount.as_str());
        }
        url
    }
}

#[async_trait]
impl PairRateProvider for ExchangeRateApiProvider {
    #[instrument(
        name = "ExchangeRateApiFetch",
        skip(self),
        fields(from = %from, to = %to, amount = %amount)
    )]
    async fn fetch_pair(
        &self,
        from: &CurrencyCode,
        to: &CurrencyCode,
        amount: &AmountInput,
    ) -> Result<PairQuote> {
        let url = self.pair_url(from, to, amount);
        debug!("Requesting pair rate for {}/{}", from, to);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for currency pair: {}/{}", e.without_url(), from, to))?;

        let status = response.status();
        debug!(%status, "Received pair rate response");

        // Error statuses still carry a JSON body describing the failure.
        let text = response
            .text()
            .await
            .map_err(|e| anyhow!("Failed to read response body for {}/{}: {}", from, to, e.without_url()))?;
        let data: PairResponse = match serde_json::from_str(&text) {
            Ok(data) => data,
            Err(e) => {
                error!(error = ?e, %status, "Failed to parse pair rate response");
                return Err(e).with_context(|| {
                    format!("Failed to parse JSON response for {from}/{to}")
                });
            }
        };
        debug!(result = ?data.result, "Decoded pair rate response");

        Ok(data.into())
    }
}
