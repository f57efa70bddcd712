use std::env;
use std::io::IsTerminal;
use std::str::FromStr;

use crate::error::LogError;

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
    Journald,
}

impl FromStr for LogFormat {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            "journald" | "journal" => Ok(LogFormat::Journald),
            _ => Err(LogError::InvalidFormat(s.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub format: LogFormat,
    /// Tracing filter directive, e.g. `info` or `genvisor_core=debug`.
    pub filter: String,
    pub with_targets: bool,
    pub use_color: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Text,
            filter: "info".to_string(),
            with_targets: true,
            use_color: std::io::stdout().is_terminal(),
        }
    }
}

impl LogConfig {
    /// Read `GENVISOR_LOG` and `GENVISOR_LOG_FORMAT`, keeping the defaults
    /// for anything unset or unparsable. Runs before the subscriber exists,
    /// so a bad value cannot be logged, only ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut cfg = Self::default();
        if let Some(filter) = lookup("GENVISOR_LOG")
            && !filter.trim().is_empty()
        {
            cfg.filter = filter;
        }
        if let Some(format) = lookup("GENVISOR_LOG_FORMAT")
            && let Ok(parsed) = format.parse()
        {
            cfg.format = parsed;
        }
        cfg
    }
}
