pub mod cli;
pub mod core;
pub mod providers;

use crate::core::config::{API_KEY_ENV, AppConfig};
use crate::core::{BuiltinSymbols, Converter, Session};
use anyhow::Result;
use providers::exchangerate_api::ExchangeRateApiProvider;
use std::sync::Arc;
use tracing::{debug, info};

pub enum AppCommand {
    Convert {
        amount: String,
        from: Option<String>,
        to: Option<String>,
    },
    Interactive {
        from: Option<String>,
        to: Option<String>,
    },
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Currency converter starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!(providers = ?config.providers, defaults = ?config.defaults, "Loaded config");

    let credential = config.api_credential(std::env::var(API_KEY_ENV).ok())?;
    let exchangerate = &config.providers.exchangerate;
    let provider = Arc::new(ExchangeRateApiProvider::new(
        &exchangerate.base_url,
        &exchangerate.version,
        credential,
        exchangerate.timeout(),
    )?);

    let (from, to) = match &command {
        AppCommand::Convert { from, to, .. } | AppCommand::Interactive { from, to } => {
            config.initial_pair(from.as_deref(), to.as_deref())?
        }
    };
    let session = Session::new(Converter::new(from, to), provider);

    match command {
        AppCommand::Convert { amount, .. } => {
            cli::convert::run(session, &amount, &BuiltinSymbols).await
        }
        AppCommand::Interactive { .. } => cli::interactive::run(session, &BuiltinSymbols).await,
    }
}
