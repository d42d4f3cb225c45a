//! Remote conversion service abstraction

use super::model::{ConversionRequest, ConversionResult, CryptoAsset, FiatCurrency};
use anyhow::Result;
use async_trait::async_trait;

/// Access to the remote pricing service.
///
/// List fetches never fail loudly: implementations log the failure and return
/// `None`, which callers treat as "no data yet". A conversion yields
/// `Ok(None)` when the service reports an application error and `Err` when
/// the request itself failed.
#[async_trait]
pub trait ConversionGateway: Send + Sync {
    async fn fetch_fiat_list(&self) -> Option<Vec<FiatCurrency>>;

    async fn fetch_crypto_list(&self) -> Option<Vec<CryptoAsset>>;

    async fn convert(&self, request: &ConversionRequest) -> Result<Option<ConversionResult>>;
}
