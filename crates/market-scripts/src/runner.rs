//! Child process runner

use crate::config::ScriptConfig;
use crate::error::{Result, ScriptError};
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, error, info, instrument, warn};

/// Captured result of a successful script run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: Option<i32>,
}

/// Runs scripts from the configured directory through the interpreter
#[derive(Debug, Clone)]
pub struct ScriptRunner {
    config: ScriptConfig,
}

impl ScriptRunner {
    /// Create a runner, validating the configuration
    pub fn new(config: ScriptConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Get the configuration
    pub fn config(&self) -> &ScriptConfig {
        &self.config
    }

    /// Resolve a script name against the scripts directory
    pub fn script_path(&self, script: &str) -> PathBuf {
        self.config.scripts_dir.join(script)
    }

    /// Run `script` with `args`, waiting at most the configured timeout
    ///
    /// On timeout the child is killed. A non-zero exit is an error carrying
    /// the script's stderr; stderr output on success is only logged.
    #[instrument(skip(self, args), fields(interpreter = %self.config.interpreter))]
    pub async fn run(&self, script: &str, args: &[&str]) -> Result<ScriptOutput> {
        let path = self.script_path(script);
        info!("Starting script {}", path.display());

        let child = Command::new(&self.config.interpreter)
            .arg(&path)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| {
                error!("Failed to start script {}: {}", script, source);
                ScriptError::Spawn {
                    script: script.to_string(),
                    source,
                }
            })?;

        let Ok(waited) = tokio::time::timeout(self.config.timeout, child.wait_with_output()).await
        else {
            error!(
                "Script {} timed out after {:?}, killing process",
                script, self.config.timeout
            );
            return Err(ScriptError::TimedOut {
                script: script.to_string(),
                timeout: self.config.timeout,
            });
        };
        let output = waited?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        let exit_code = output.status.code();
        info!("Script {} exited with code {:?}", script, exit_code);

        if !output.status.success() {
            warn!("Script {} stderr: {}", script, stderr.trim());
            return Err(ScriptError::Failed {
                script: script.to_string(),
                code: exit_code,
                stderr,
            });
        }

        if !stderr.trim().is_empty() {
            warn!("Script {} produced warnings (stderr): {}", script, stderr.trim());
        }
        debug!("Script {} stdout: {}", script, stdout.trim());

        Ok(ScriptOutput {
            stdout,
            stderr,
            exit_code,
        })
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::TempDir;

    fn write_script(dir: &TempDir, name: &str, body: &str) {
        std::fs::write(dir.path().join(name), body).unwrap();
    }

    fn sh_runner(dir: &TempDir) -> ScriptRunner {
        let config = ScriptConfig::default()
            .with_interpreter("sh")
            .with_scripts_dir(dir.path())
            .with_timeout(Duration::from_secs(10));
        ScriptRunner::new(config).unwrap()
    }

    #[tokio::test]
    async fn test_captures_stdout_and_stderr() {
        let dir = TempDir::new().unwrap();
        write_script(&dir, "ok.sh", "echo collected 50 tickers\necho 'deprecated api' >&2\n");

        let output = sh_runner(&dir).run("ok.sh", &[]).await.unwrap();
        assert_eq!(output.stdout, "collected 50 tickers\n");
        assert_eq!(output.stderr, "deprecated api\n");
        assert_eq!(output.exit_code, Some(0));
    }

    #[tokio::test]
    async fn test_passes_arguments() {
        let dir = TempDir::new().unwrap();
        write_script(&dir, "args.sh", "echo \"$1|$2\"\n");

        let output = sh_runner(&dir)
            .run("args.sh", &["RELIANCE.NS", "7"])
            .await
            .unwrap();
        assert_eq!(output.stdout.trim(), "RELIANCE.NS|7");
    }

    #[tokio::test]
    async fn test_non_zero_exit() {
        let dir = TempDir::new().unwrap();
        write_script(&dir, "fail.sh", "echo 'db unreachable' >&2\nexit 3\n");

        let err = sh_runner(&dir).run("fail.sh", &[]).await.unwrap_err();
        match err {
            ScriptError::Failed { code, stderr, .. } => {
                assert_eq!(code, Some(3));
                assert!(stderr.contains("db unreachable"));
            }
            other => panic!("Expected Failed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_timeout_kills_script() {
        let dir = TempDir::new().unwrap();
        write_script(&dir, "slow.sh", "sleep 5\n");

        let config = ScriptConfig::default()
            .with_interpreter("sh")
            .with_scripts_dir(dir.path())
            .with_timeout(Duration::from_millis(200));
        let runner = ScriptRunner::new(config).unwrap();

        let started = std::time::Instant::now();
        let err = runner.run("slow.sh", &[]).await.unwrap_err();
        assert!(matches!(err, ScriptError::TimedOut { .. }));
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[tokio::test]
    async fn test_missing_interpreter() {
        let dir = TempDir::new().unwrap();
        let config = ScriptConfig::default()
            .with_interpreter("/nonexistent/bin/python3")
            .with_scripts_dir(dir.path());
        let runner = ScriptRunner::new(config).unwrap();

        let err = runner.run("daily_collector.py", &[]).await.unwrap_err();
        assert!(matches!(err, ScriptError::Spawn { .. }));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = ScriptConfig::default().with_timeout(Duration::ZERO);
        assert!(ScriptRunner::new(config).is_err());
    }
}
