use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::trace;

use genvisor_core::Generator;
use genvisor_model::{InstanceSpec, RunOutcome};

/// Generator backed by the external generation executable.
///
/// Invoked once per tick as `<program> <config.json>` with the instance
/// directory as the working directory. Exit code zero is success; a non-zero
/// exit or a launch failure is a failed run whose captured output becomes
/// the instance's error record.
pub struct ProcGenerator {
    program: PathBuf,
}

impl ProcGenerator {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

#[async_trait]
impl Generator for ProcGenerator {
    async fn generate(&self, spec: &InstanceSpec) -> RunOutcome {
        let mut cmd = Command::new(&self.program);
        cmd.arg(spec.config_path())
            .current_dir(&spec.dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        trace!(
            instance = %spec.name,
            program = %self.program.display(),
            "spawning generator"
        );

        let output = match cmd.output().await {
            Ok(output) => output,
            Err(e) => {
                return RunOutcome::failed(format!(
                    "failed to launch {}: {e}",
                    self.program.display()
                ));
            }
        };

        // The streams are captured separately: stdout first, stderr appended.
        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));

        if output.status.success() {
            RunOutcome::succeeded(combined)
        } else {
            RunOutcome::failed(combined)
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::path::Path;
    use std::time::Duration;

    use super::*;

    fn spec_in(tmp: &tempfile::TempDir) -> InstanceSpec {
        let spec = InstanceSpec::new("alpha", tmp.path(), Duration::from_secs(60));
        fs::create_dir_all(&spec.dir).unwrap();
        spec
    }

    fn script(dir: &Path, body: &str) -> std::path::PathBuf {
        let path = dir.join("generate.sh");
        fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[tokio::test]
    async fn zero_exit_is_a_successful_run() {
        let tmp = tempfile::tempdir().unwrap();
        let spec = spec_in(&tmp);
        let generator = ProcGenerator::new(script(tmp.path(), "echo generated"));

        let outcome = generator.generate(&spec).await;
        assert!(outcome.success);
        assert_eq!(outcome.output, "generated\n");
    }

    #[tokio::test]
    async fn non_zero_exit_captures_both_streams() {
        let tmp = tempfile::tempdir().unwrap();
        let spec = spec_in(&tmp);
        let generator = ProcGenerator::new(script(
            tmp.path(),
            "echo to stdout\necho to stderr >&2\nexit 3",
        ));

        let outcome = generator.generate(&spec).await;
        assert!(!outcome.success);
        assert!(outcome.output.contains("to stdout"));
        assert!(outcome.output.contains("to stderr"));
    }

    #[tokio::test]
    async fn launch_failure_is_a_failed_run() {
        let tmp = tempfile::tempdir().unwrap();
        let spec = spec_in(&tmp);
        let generator = ProcGenerator::new(tmp.path().join("does-not-exist"));

        let outcome = generator.generate(&spec).await;
        assert!(!outcome.success);
        assert!(outcome.output.contains("failed to launch"));
    }

    #[tokio::test]
    async fn runs_in_the_instance_directory_with_the_config_argument() {
        let tmp = tempfile::tempdir().unwrap();
        let spec = spec_in(&tmp);
        let generator = ProcGenerator::new(script(tmp.path(), "pwd\necho \"$1\""));

        let outcome = generator.generate(&spec).await;
        assert!(outcome.success);

        let mut lines = outcome.output.lines();
        let cwd = lines.next().unwrap();
        assert_eq!(
            fs::canonicalize(cwd).unwrap(),
            fs::canonicalize(&spec.dir).unwrap()
        );
        assert_eq!(
            Path::new(lines.next().unwrap()),
            spec.config_path().as_path()
        );
    }
}
