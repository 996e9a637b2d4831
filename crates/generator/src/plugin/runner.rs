//! Plugin process management

use super::proto::{Request, Response};
use prost::Message as _;
use sacagawea_common::{GeneratorError, Result};
use std::io::{ErrorKind, Write};
use std::process::{Command, Stdio};
use std::thread;
use tracing::debug;

/// Default plugin binary and its arguments
pub const DEFAULT_PLUGIN: &str = "gnostic-go-generator";
const DEFAULT_PLUGIN_ARGS: &[&str] = &["-plugin"];

/// Runs an external plugin binary
///
/// The marshalled request is written to the plugin's stdin and the
/// response is read from its stdout. The plugin's stderr is inherited so
/// its log output reaches the user.
#[derive(Debug, Clone)]
pub struct PluginRunner {
    binary: String,
    args: Vec<String>,
}

impl Default for PluginRunner {
    fn default() -> Self {
        Self::new(DEFAULT_PLUGIN).with_args(DEFAULT_PLUGIN_ARGS.iter().copied())
    }
}

impl PluginRunner {
    pub fn new(binary: &str) -> Self {
        Self {
            binary: binary.to_string(),
            args: Vec::new(),
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }

    /// Send a request to the plugin and decode its response
    pub fn run(&self, request: &Request) -> Result<Response> {
        debug!("Running plugin {} {:?}", self.binary, self.args);

        let mut child = Command::new(&self.binary)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| GeneratorError::Plugin(format!("failed to start {}: {}", self.binary, e)))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| GeneratorError::Plugin("plugin stdin unavailable".to_string()))?;

        // Feed stdin from a thread so a plugin filling its stdout pipe can't deadlock us
        let input = request.encode_to_vec();
        let writer = thread::spawn(move || stdin.write_all(&input));

        let output = child.wait_with_output()?;

        match writer.join() {
            Ok(Ok(())) => {}
            Ok(Err(e)) if e.kind() == ErrorKind::BrokenPipe => {
                debug!("Plugin {} closed stdin early", self.binary);
            }
            Ok(Err(e)) => return Err(e.into()),
            Err(_) => {
                return Err(GeneratorError::Plugin(
                    "failed to write plugin request".to_string(),
                ))
            }
        }

        if !output.status.success() {
            return Err(GeneratorError::Plugin(format!(
                "{} failed: {}",
                self.binary, output.status
            )));
        }

        Response::decode(output.stdout.as_slice()).map_err(|e| {
            debug!("Undecodable plugin output: {}", e);
            GeneratorError::InvalidPluginResponse
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shell(script: &str) -> PluginRunner {
        PluginRunner::new("/bin/sh").with_args(["-c", script])
    }

    #[test]
    fn test_default_runner() {
        let runner = PluginRunner::default();
        assert_eq!(runner.binary(), "gnostic-go-generator");
        assert_eq!(runner.args, vec!["-plugin".to_string()]);
    }

    #[test]
    fn test_run_decodes_response() {
        let runner = shell("cat >/dev/null; printf '\\022\\011\\012\\004a.go\\022\\001x'");
        let response = runner.run(&Request::default()).unwrap();

        assert_eq!(response.files.len(), 1);
        assert_eq!(response.files[0].name, "a.go");
    }

    #[test]
    fn test_run_rejects_log_output_on_stdout() {
        let runner = shell("echo 'WARNING: writing logs to stdout'");
        let err = runner.run(&Request::default()).unwrap_err();
        assert!(matches!(err, GeneratorError::InvalidPluginResponse));
    }

    #[test]
    fn test_run_reports_exit_status() {
        let err = shell("exit 3").run(&Request::default()).unwrap_err();
        assert!(matches!(err, GeneratorError::Plugin(_)));
    }

    #[test]
    fn test_run_missing_binary() {
        let err = PluginRunner::new("/nonexistent/sacagawea-plugin")
            .run(&Request::default())
            .unwrap_err();
        assert!(err.to_string().contains("failed to start"));
    }
}
