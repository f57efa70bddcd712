use time::{UtcOffset, format_description::well_known::Rfc3339};
use tracing::Subscriber;
use tracing_subscriber::{
    EnvFilter, fmt, fmt::time::OffsetTime, layer::SubscriberExt, util::SubscriberInitExt,
};

use crate::config::{LogConfig, LogFormat};
use crate::error::LogError;

/// Install the global tracing subscriber described by `cfg`.
pub fn init_logger(cfg: &LogConfig) -> Result<(), LogError> {
    let filter =
        EnvFilter::try_new(&cfg.filter).map_err(|_| LogError::InvalidFilter(cfg.filter.clone()))?;

    match cfg.format {
        LogFormat::Text => {
            let layer = fmt::layer()
                .with_ansi(cfg.use_color)
                .with_target(cfg.with_targets)
                .with_timer(timer());
            install(tracing_subscriber::registry().with(filter).with(layer))
        }
        LogFormat::Json => {
            let layer = fmt::layer()
                .json()
                .with_ansi(false)
                .with_target(cfg.with_targets)
                .with_timer(timer());
            install(tracing_subscriber::registry().with(filter).with(layer))
        }
        LogFormat::Journald => init_journald(filter),
    }
}

fn timer() -> OffsetTime<Rfc3339> {
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    OffsetTime::new(offset, Rfc3339)
}

fn install<S>(subscriber: S) -> Result<(), LogError>
where
    S: Subscriber + Send + Sync + 'static,
{
    subscriber.try_init().map_err(|e| {
        let text = e.to_string();
        if text.contains("global default") {
            LogError::AlreadyInitialized
        } else {
            LogError::InitFailed(text)
        }
    })
}

#[cfg(all(target_os = "linux", feature = "journald"))]
fn init_journald(filter: EnvFilter) -> Result<(), LogError> {
    let layer = tracing_journald::layer()
        .map_err(|e| LogError::InitFailed(format!("journald: {e}")))?;
    install(tracing_subscriber::registry().with(filter).with(layer))
}

#[cfg(not(all(target_os = "linux", feature = "journald")))]
fn init_journald(_filter: EnvFilter) -> Result<(), LogError> {
    Err(LogError::JournaldNotSupported)
}
