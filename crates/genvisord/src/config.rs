use std::env;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use tracing::warn;

use genvisor_model::InstanceSpec;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_BASE_DIR: &str = "/var/lib/genvisor";
const DEFAULT_GENERATOR: &str = "/opt/genvisor/bin/generate";
const DEFAULT_ASSETS_DIR: &str = "/opt/genvisor/web";
const DEFAULT_INTERVAL: Duration = Duration::from_secs(300);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("GENVISOR_INSTANCES is not set; declare at least one instance name")]
    NoInstances,
}

/// Daemon configuration, resolved once at startup from the environment.
///
/// Only a missing instance list is fatal; every other variable falls back to
/// its default, with a warning when the value was present but unparsable.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub base_dir: PathBuf,
    /// Location of the generation executable.
    pub generator: PathBuf,
    /// Seed tree copied into each new instance's public directory.
    pub assets_dir: PathBuf,
    pub instances: Vec<InstanceSpec>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Resolve through `lookup`; `from_env` passes the process environment,
    /// tests pass maps.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let names: Vec<String> = lookup("GENVISOR_INSTANCES")
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect();
        if names.is_empty() {
            return Err(ConfigError::NoInstances);
        }

        let port = match lookup("GENVISOR_PORT") {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                warn!(value = %raw, "invalid GENVISOR_PORT, using {DEFAULT_PORT}");
                DEFAULT_PORT
            }),
            None => DEFAULT_PORT,
        };

        let base_dir = path_or(&lookup, "GENVISOR_BASE_DIR", DEFAULT_BASE_DIR);
        let generator = path_or(&lookup, "GENVISOR_GENERATOR", DEFAULT_GENERATOR);
        let assets_dir = path_or(&lookup, "GENVISOR_ASSETS_DIR", DEFAULT_ASSETS_DIR);

        let instances = names
            .into_iter()
            .map(|name| {
                let interval = interval_for(&lookup, &name);
                InstanceSpec::new(name, &base_dir, interval)
            })
            .collect();

        Ok(Self {
            port,
            base_dir,
            generator,
            assets_dir,
            instances,
        })
    }
}

fn path_or(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> PathBuf {
    lookup(key)
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(default))
}

/// Re-run period for one instance: `GENVISOR_INTERVAL_SECONDS_<NAME>` wins
/// over the global `GENVISOR_INTERVAL_SECONDS`; anything unset or unparsable
/// falls through to the next candidate, then to the default.
fn interval_for(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Duration {
    let specific = format!("GENVISOR_INTERVAL_SECONDS_{}", env_suffix(name));
    for key in [specific.as_str(), "GENVISOR_INTERVAL_SECONDS"] {
        let Some(raw) = lookup(key) else {
            continue;
        };
        match raw.trim().parse::<u64>() {
            Ok(secs) if secs > 0 => return Duration::from_secs(secs),
            _ => warn!(
                key,
                value = %raw,
                "invalid interval, using {}s",
                DEFAULT_INTERVAL.as_secs()
            ),
        }
    }
    DEFAULT_INTERVAL
}

/// Instance name as an environment variable suffix: uppercased, with
/// anything outside `[A-Za-z0-9]` mapped to `_`.
fn env_suffix(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect()
}
