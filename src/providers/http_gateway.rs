use crate::core::config::{ApiConfig, FiatEnvelope};
use crate::core::{ConversionGateway, ConversionRequest, ConversionResult, CryptoAsset, FiatCurrency};
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Url;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::str::FromStr;
use tracing::{debug, error, instrument};

const USER_AGENT: &str = concat!("coinconv/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
struct DataEnvelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct ConvertResponse {
    #[serde(default)]
    error: Option<Value>,
    #[serde(rename = "convertedAmount")]
    converted_amount: Option<Value>,
    fiat: Option<String>,
    message: Option<String>,
}

/// Talks to the conversion service over HTTP.
pub struct HttpGateway {
    base_url: String,
    fiat_envelope: FiatEnvelope,
    client: reqwest::Client,
}

impl HttpGateway {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            fiat_envelope: config.fiat_envelope,
            client,
        })
    }

    async fn get_text(&self, url: &str) -> Result<String> {
        debug!("Requesting {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Request error for URL: {url}"))?;

        if !response.status().is_success() {
            return Err(anyhow!("HTTP error: {} for URL: {}", response.status(), url));
        }

        response
            .text()
            .await
            .with_context(|| format!("Failed to get response text for URL: {url}"))
    }

    async fn fetch_list<T: DeserializeOwned>(&self, path: &str, nested: bool) -> Result<Vec<T>> {
        let url = format!("{}{}", self.base_url, path);
        let text = self.get_text(&url).await?;

        let items = if nested {
            serde_json::from_str::<DataEnvelope<DataEnvelope<Vec<T>>>>(&text).map(|e| e.data.data)
        } else {
            serde_json::from_str::<DataEnvelope<Vec<T>>>(&text).map(|e| e.data)
        }
        .with_context(|| format!("Failed to parse list response from {url}. Response: '{text}'"))?;

        debug!("Fetched {} entries from {}", items.len(), url);
        Ok(items)
    }
}

/// Any `error` value other than null, `false`, `0` or `""` flags a failure.
fn is_error_flag(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(n) => n.as_f64() != Some(0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Reads the converted amount from a JSON number or numeric string. `None`
/// when it is missing, not numeric or outside the range `Decimal` can hold.
fn parse_converted_amount(value: &Value) -> Option<Decimal> {
    let text = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        _ => return None,
    };
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

/// Logs a failed list fetch and turns it into "no data".
fn or_log<T>(result: Result<Vec<T>>, what: &str) -> Option<Vec<T>> {
    match result {
        Ok(items) => Some(items),
        Err(e) => {
            error!(error = %format!("{e:#}"), "Failed to fetch {} list", what);
            None
        }
    }
}

#[async_trait]
impl ConversionGateway for HttpGateway {
    async fn fetch_fiat_list(&self) -> Option<Vec<FiatCurrency>> {
        let nested = self.fiat_envelope == FiatEnvelope::Nested;
        or_log(self.fetch_list("/api/fiat/list", nested).await, "fiat")
    }

    async fn fetch_crypto_list(&self) -> Option<Vec<CryptoAsset>> {
        or_log(self.fetch_list("/api/crypto/list", false).await, "crypto")
    }

    #[instrument(
        name = "Convert",
        skip(self, request),
        fields(crypto = %request.cryptocurrency_symbol, fiat = %request.fiat_symbol)
    )]
    async fn convert(&self, request: &ConversionRequest) -> Result<Option<ConversionResult>> {
        let amount = request.amount.normalize().to_string();
        let url = Url::parse_with_params(
            &format!("{}/api/crypto/convert", self.base_url),
            &[
                ("crypto", request.cryptocurrency_symbol.as_str()),
                ("fiat", request.fiat_symbol.as_str()),
                ("amount", amount.as_str()),
            ],
        )
        .with_context(|| format!("Invalid base url: {}", self.base_url))?;

        let text = self.get_text(url.as_str()).await?;
        let body: ConvertResponse = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse convert response: '{text}'"))?;

        if body.error.as_ref().is_some_and(is_error_flag) {
            debug!(message = ?body.message, "Service reported a conversion error");
            return Ok(None);
        }

        let Some(raw_amount) = body.converted_amount.filter(|v| !v.is_null()) else {
            debug!("Convert response carried no amount");
            return Ok(None);
        };
        match parse_converted_amount(&raw_amount) {
            Some(converted_amount) => Ok(Some(ConversionResult {
                converted_amount,
                fiat_symbol: body.fiat.unwrap_or_else(|| request.fiat_symbol.clone()),
            })),
            None => {
                error!(amount = %raw_amount, "Converted amount is not a representable number");
                Ok(None)
            }
        }
    }
}
