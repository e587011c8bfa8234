//! Logging setup.

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Set to any value to log JSON lines instead of plain text
pub const LOG_JSON_ENV: &str = "GROVE_LOG_JSON";

const DEFAULT_FILTER: &str = "info,grove_world=debug";

pub fn init_telemetry() -> Result<()> {
    let json = std::env::var_os(LOG_JSON_ENV).is_some();
    let (plain_layer, json_layer) = if json {
        (None, Some(fmt::layer().json().with_target(true)))
    } else {
        (Some(fmt::layer().with_target(true)), None)
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into()))
        .with(plain_layer)
        .with(json_layer)
        .try_init()?;

    info!(json, "Telemetry initialized");
    Ok(())
}
