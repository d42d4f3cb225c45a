//! Test doubles shared by unit tests.

use super::gateway::ConversionGateway;
use super::model::{ConversionRequest, ConversionResult, CryptoAsset, FiatCurrency};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Notify;

#[derive(Clone, Copy)]
pub enum ConvertReply {
    Amount(&'static str),
    AppError,
    Transport,
}

pub struct MockGateway {
    pub fiat: Option<Vec<FiatCurrency>>,
    pub crypto: Option<Vec<CryptoAsset>>,
    pub reply: Mutex<ConvertReply>,
    pub convert_calls: AtomicUsize,
    pub fiat_gate: Option<Notify>,
    pub convert_gate: Option<Notify>,
}

impl MockGateway {
    pub fn new(reply: ConvertReply) -> Self {
        Self {
            fiat: Some(vec![fiat("USD"), fiat("EUR")]),
            crypto: Some(vec![crypto("BTC"), crypto("ETH")]),
            reply: Mutex::new(reply),
            convert_calls: AtomicUsize::new(0),
            fiat_gate: None,
            convert_gate: None,
        }
    }

    pub fn set_reply(&self, reply: ConvertReply) {
        *self.reply.lock().unwrap() = reply;
    }

    pub fn calls(&self) -> usize {
        self.convert_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ConversionGateway for MockGateway {
    async fn fetch_fiat_list(&self) -> Option<Vec<FiatCurrency>> {
        if let Some(gate) = &self.fiat_gate {
            gate.notified().await;
        }
        self.fiat.clone()
    }

    async fn fetch_crypto_list(&self) -> Option<Vec<CryptoAsset>> {
        self.crypto.clone()
    }

    async fn convert(&self, request: &ConversionRequest) -> Result<Option<ConversionResult>> {
        self.convert_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.convert_gate {
            gate.notified().await;
        }
        let reply = *self.reply.lock().unwrap();
        match reply {
            ConvertReply::Amount(amount) => Ok(Some(ConversionResult {
                converted_amount: Decimal::from_str(amount).unwrap(),
                fiat_symbol: request.fiat_symbol.clone(),
            })),
            ConvertReply::AppError => Ok(None),
            ConvertReply::Transport => Err(anyhow!("connection refused")),
        }
    }
}

pub fn fiat(symbol: &str) -> FiatCurrency {
    FiatCurrency {
        id: 1,
        name: format!("{symbol} name"),
        sign: "$".to_string(),
        symbol: symbol.to_string(),
    }
}

pub fn crypto(symbol: &str) -> CryptoAsset {
    CryptoAsset {
        id: 1,
        rank: 1,
        name: format!("{symbol} name"),
        symbol: symbol.to_string(),
        slug: symbol.to_lowercase(),
        is_active: 1,
        first_historical_data: None,
        last_historical_data: None,
        platform: None,
    }
}
