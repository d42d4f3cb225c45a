//! Currency and conversion types shared by the gateway, form and CLI

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiatCurrency {
    pub id: i64,
    pub name: String,
    pub sign: String,
    pub symbol: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CryptoAsset {
    pub id: i64,
    pub rank: i64,
    pub name: String,
    pub symbol: String,
    pub slug: String,
    #[serde(default)]
    pub is_active: u8,
    #[serde(default)]
    pub first_historical_data: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_historical_data: Option<DateTime<Utc>>,
    /// Token platform metadata, passed through untouched.
    #[serde(default)]
    pub platform: Option<serde_json::Value>,
}

impl CryptoAsset {
    pub fn is_active(&self) -> bool {
        self.is_active != 0
    }
}

/// Something that can be offered as an option in a currency selector.
pub trait Listed {
    fn symbol(&self) -> &str;
    fn name(&self) -> &str;
}

impl Listed for FiatCurrency {
    fn symbol(&self) -> &str {
        &self.symbol
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl Listed for CryptoAsset {
    fn symbol(&self) -> &str {
        &self.symbol
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// A validated conversion request. Only the form validator builds these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequest {
    pub cryptocurrency_symbol: String,
    pub amount: Decimal,
    pub fiat_symbol: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionResult {
    pub converted_amount: Decimal,
    pub fiat_symbol: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormState {
    #[default]
    Idle,
    Loading,
    Error,
}

impl Display for FormState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                FormState::Idle => "idle",
                FormState::Loading => "loading",
                FormState::Error => "error",
            }
        )
    }
}
