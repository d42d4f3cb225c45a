//! Core business logic abstractions

pub mod config;
pub mod form;
pub mod gateway;
pub mod log;
pub mod model;
pub mod workflow;

#[cfg(test)]
pub(crate) mod testing;

// Re-export main types for cleaner imports
pub use form::{Field, FormSchema, FormValues, ValidationErrors};
pub use gateway::ConversionGateway;
pub use model::{
    ConversionRequest, ConversionResult, CryptoAsset, FiatCurrency, FormState, Listed,
};
pub use workflow::{ConvertorForm, SubmitOutcome};
