use std::path::{Path, PathBuf};
use std::time::Duration;

/// Name of the per-instance file handed to the generation executable.
pub const INSTANCE_CONFIG_FILE: &str = "config.json";

/// Immutable description of one supervised instance.
///
/// Built once from configuration at startup. The name doubles as the URL
/// path segment under which the instance's static tree is served.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InstanceSpec {
    pub name: String,
    /// Working directory of the generation executable (`<base>/<name>`).
    pub dir: PathBuf,
    /// Static asset tree served over HTTP (`<base>/<name>/public`).
    pub public_dir: PathBuf,
    /// Fixed re-run period, resolved once at startup.
    pub interval: Duration,
}

impl InstanceSpec {
    pub fn new(name: impl Into<String>, base_dir: &Path, interval: Duration) -> Self {
        let name = name.into();
        let dir = base_dir.join(&name);
        let public_dir = dir.join("public");
        Self {
            name,
            dir,
            public_dir,
            interval,
        }
    }

    /// Path of the configuration file passed as the single argument to the
    /// generation executable.
    pub fn config_path(&self) -> PathBuf {
        self.dir.join(INSTANCE_CONFIG_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_paths_derive_from_base_and_name() {
        let spec = InstanceSpec::new("alpha", Path::new("/srv/data"), Duration::from_secs(60));
        assert_eq!(spec.dir, PathBuf::from("/srv/data/alpha"));
        assert_eq!(spec.public_dir, PathBuf::from("/srv/data/alpha/public"));
        assert_eq!(spec.config_path(), PathBuf::from("/srv/data/alpha/config.json"));
    }
}
