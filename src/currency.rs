//! Exchange rate lookup.
//!
//! Rates come from a Frankfurter-compatible HTTP service. A fixed table
//! provider is available for offline use.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::config::CurrencyConfig;
use crate::{BankError, Result};

/// User agent string for rate requests.
const USER_AGENT: &str = "pinbank/0.1 (exchange rates)";

/// Boxed future returned by [`RateProvider::rate`].
pub type RateFuture<'a> = Pin<Box<dyn Future<Output = Result<f64>> + Send + 'a>>;

/// Source of exchange rates.
pub trait RateProvider: Send + Sync {
    /// Units of `to` bought by one unit of `from`.
    fn rate<'a>(&'a self, from: &'a str, to: &'a str) -> RateFuture<'a>;
}

/// Convert `amount` from one currency to another.
pub async fn convert<P>(provider: &P, amount: f64, from: &str, to: &str) -> Result<f64>
where
    P: RateProvider + ?Sized,
{
    if from.eq_ignore_ascii_case(to) {
        return Ok(amount);
    }
    let rate = provider.rate(from, to).await?;
    Ok(amount * rate)
}

/// Normalize a currency code to three uppercase ASCII letters.
pub fn normalize_code(code: &str) -> Result<String> {
    let code = code.trim();
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(BankError::Validation(format!(
            "invalid currency code: {code}"
        )));
    }
    Ok(code.to_ascii_uppercase())
}

/// Response body of `GET /v1/latest`.
#[derive(Debug, Clone, Deserialize)]
pub struct ExchangeRate {
    pub amount: f64,
    pub base: String,
    pub date: String,
    pub rates: HashMap<String, f64>,
}

impl ExchangeRate {
    /// The rate for `to`, if present.
    pub fn rate_for(&self, to: &str) -> Result<f64> {
        self.rates
            .get(to)
            .copied()
            .ok_or_else(|| BankError::ExchangeRate(format!("no rate for {} -> {}", self.base, to)))
    }
}

/// Client for a Frankfurter-compatible rate service.
#[derive(Debug, Clone)]
pub struct FrankfurterClient {
    client: Client,
    base_url: String,
}

impl FrankfurterClient {
    /// Create a client for `base_url`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| BankError::ExchangeRate(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Create a client from configuration.
    pub fn from_config(config: &CurrencyConfig) -> Result<Self> {
        Self::new(&config.base_url, Duration::from_secs(config.timeout_secs))
    }

    /// Endpoint URL for the latest rates.
    pub fn latest_url(&self) -> String {
        format!("{}/v1/latest", self.base_url)
    }

    async fn fetch(&self, from: &str, to: &str) -> Result<f64> {
        let from = normalize_code(from)?;
        let to = normalize_code(to)?;
        if from == to {
            return Ok(1.0);
        }

        let response = self
            .client
            .get(self.latest_url())
            .query(&[("from", from.as_str()), ("to", to.as_str())])
            .send()
            .await
            .map_err(|e| BankError::ExchangeRate(format!("failed to fetch rate: {e}")))?;

        if !response.status().is_success() {
            return Err(BankError::ExchangeRate(format!(
                "HTTP error: {}",
                response.status()
            )));
        }

        let body: ExchangeRate = response
            .json()
            .await
            .map_err(|e| BankError::ExchangeRate(format!("invalid rate response: {e}")))?;

        let rate = body.rate_for(&to)?;
        debug!(%from, %to, rate, date = %body.date, "Fetched exchange rate");
        Ok(rate)
    }
}

impl RateProvider for FrankfurterClient {
    fn rate<'a>(&'a self, from: &'a str, to: &'a str) -> RateFuture<'a> {
        Box::pin(self.fetch(from, to))
    }
}

/// Fixed rate table.
///
/// A pair not in the table falls back to the inverse of the reverse pair.
#[derive(Debug, Clone, Default)]
pub struct StaticRateProvider {
    rates: HashMap<(String, String), f64>,
}

impl StaticRateProvider {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rate, builder style.
    pub fn with_rate(mut self, from: &str, to: &str, rate: f64) -> Self {
        self.insert(from, to, rate);
        self
    }

    /// Add or replace a rate.
    pub fn insert(&mut self, from: &str, to: &str, rate: f64) {
        self.rates
            .insert((from.to_ascii_uppercase(), to.to_ascii_uppercase()), rate);
    }

    fn lookup(&self, from: &str, to: &str) -> Result<f64> {
        let from = normalize_code(from)?;
        let to = normalize_code(to)?;
        if from == to {
            return Ok(1.0);
        }
        if let Some(rate) = self.rates.get(&(from.clone(), to.clone())) {
            return Ok(*rate);
        }
        match self.rates.get(&(to.clone(), from.clone())) {
            Some(rate) if *rate != 0.0 => Ok(1.0 / rate),
            _ => Err(BankError::ExchangeRate(format!("no rate for {from} -> {to}"))),
        }
    }
}

impl RateProvider for StaticRateProvider {
    fn rate<'a>(&'a self, from: &'a str, to: &'a str) -> RateFuture<'a> {
        let result = self.lookup(from, to);
        Box::pin(async move { result })
    }
}
