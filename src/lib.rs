pub mod cli;
pub mod core;
pub mod providers;

use crate::core::ConversionGateway;
use crate::core::config::{API_URL_ENV, AppConfig};
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    Lists,
    Convert {
        crypto: String,
        amount: String,
        currency: Option<String>,
    },
    Interactive,
}

/// Settings shared by every command.
#[derive(Debug, Clone, Default)]
pub struct RunOptions<'a> {
    pub config_path: Option<&'a str>,
    pub base_url: Option<&'a str>,
}

/// Resolves the configuration once: file, then environment, then flag.
pub fn load_config(options: &RunOptions<'_>) -> Result<AppConfig> {
    let config = match options.config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    Ok(config.with_base_url_override(std::env::var(API_URL_ENV).ok(), options.base_url))
}

pub async fn run_command(command: AppCommand, options: RunOptions<'_>) -> Result<()> {
    info!("Crypto convertor starting...");

    let config = load_config(&options)?;
    debug!("Loaded config: {config:#?}");

    let gateway: Arc<dyn ConversionGateway> =
        Arc::new(providers::HttpGateway::new(&config.api)?);

    match command {
        AppCommand::Lists => cli::lists::run(gateway.as_ref()).await,
        AppCommand::Convert {
            crypto,
            amount,
            currency,
        } => {
            cli::convert::run(
                gateway,
                &config.form,
                &crypto,
                &amount,
                currency.as_deref(),
            )
            .await
        }
        AppCommand::Interactive => cli::interactive::run(gateway, &config.form).await,
    }
}
