use std::env;
use std::process::Command;
use std::process::Stdio;

use crate::error::EditorError;
use crate::port::EditorPort;

const DEFAULT_BINARY: &str = "vim";
const DEFAULT_SERVERNAME: &str = "VIM";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    pub binary: String,
    pub servername: String,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

impl RemoteConfig {
    pub fn from_env() -> Self {
        Self {
            binary: env::var("VDEBUG_PROBE_VIM")
                .ok()
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_BINARY.to_string()),
            servername: env::var("VDEBUG_PROBE_SERVERNAME")
                .ok()
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_SERVERNAME.to_string()),
        }
    }

    pub fn with_binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = binary.into();
        self
    }

    pub fn with_servername(mut self, servername: impl Into<String>) -> Self {
        self.servername = servername.into();
        self
    }
}

/// Talks to an already running editor through its client-server flags
/// (`--servername NAME --remote-expr EXPR`, `--remote-send KEYS`).
///
/// Each request spawns one short-lived client process and blocks until it
/// exits.
#[derive(Debug, Clone)]
pub struct VimRemote {
    config: RemoteConfig,
}

impl VimRemote {
    pub fn new(config: RemoteConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RemoteConfig {
        &self.config
    }

    fn run(&self, flag: &str, arg: &str) -> Result<String, EditorError> {
        tracing::trace!(
            binary = %self.config.binary,
            servername = %self.config.servername,
            flag,
            arg,
            "editor request"
        );

        let output = Command::new(&self.config.binary)
            .arg("--servername")
            .arg(&self.config.servername)
            .arg(flag)
            .arg(arg)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| EditorError::Spawn {
                binary: self.config.binary.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(EditorError::CommandFailed {
                status: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim_end().to_string(),
            });
        }

        String::from_utf8(output.stdout).map_err(|e| EditorError::InvalidResponse(e.to_string()))
    }
}

impl EditorPort for VimRemote {
    fn command(&mut self, command: &str) -> Result<String, EditorError> {
        let reply = self.echo(&command_expr(command))?;
        Ok(strip_leading_newline(reply))
    }

    fn remote_send(&mut self, keys: &str) -> Result<(), EditorError> {
        self.run("--remote-send", keys).map(|_| ())
    }

    fn echo(&mut self, expr: &str) -> Result<String, EditorError> {
        let reply = self.run("--remote-expr", expr)?;
        Ok(strip_trailing_newline(reply))
    }
}

/// Quotes `text` as a single-quoted editor string literal.
pub fn vim_string_literal(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}

fn command_expr(command: &str) -> String {
    format!("execute({})", vim_string_literal(command))
}

// `--remote-expr` terminates the printed result with a newline.
fn strip_trailing_newline(mut reply: String) -> String {
    if reply.ends_with('\n') {
        reply.pop();
        if reply.ends_with('\r') {
            reply.pop();
        }
    }
    reply
}

// `execute()` output starts with the newline the command printed first.
fn strip_leading_newline(reply: String) -> String {
    match reply.strip_prefix('\n') {
        Some(rest) => rest.to_string(),
        None => reply,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_literal_doubles_single_quotes() {
        assert_eq!(vim_string_literal("buffers"), "'buffers'");
        assert_eq!(vim_string_literal("echo 'hi'"), "'echo ''hi'''");
    }

    #[test]
    fn test_command_expr_wraps_in_execute() {
        assert_eq!(
            command_expr("python3 debugger.step_over()"),
            "execute('python3 debugger.step_over()')"
        );
    }

    #[test]
    fn test_strip_trailing_newline_removes_one() {
        assert_eq!(strip_trailing_newline("a\n\n".to_string()), "a\n");
        assert_eq!(strip_trailing_newline("a\r\n".to_string()), "a");
        assert_eq!(strip_trailing_newline("a".to_string()), "a");
    }

    #[test]
    fn test_strip_leading_newline_removes_one() {
        assert_eq!(strip_leading_newline("\n  1 a".to_string()), "  1 a");
        assert_eq!(strip_leading_newline("running".to_string()), "running");
    }

    #[test]
    fn test_config_builder() {
        let config = RemoteConfig::default()
            .with_binary("/usr/bin/gvim")
            .with_servername("VDEBUG");
        assert_eq!(config.binary, "/usr/bin/gvim");
        assert_eq!(config.servername, "VDEBUG");
    }

    #[test]
    fn test_missing_binary_is_spawn_error() {
        let mut remote = VimRemote::new(
            RemoteConfig::default().with_binary("/nonexistent/vdebug-probe-test-vim"),
        );
        let result = remote.echo("1");
        assert!(matches!(result, Err(EditorError::Spawn { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_requests_against_fake_editor() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("fake-vim");
        std::fs::write(
            &script,
            "#!/bin/sh\n\
             [ \"$1\" = \"--servername\" ] || exit 3\n\
             case \"$3\" in\n\
               --remote-expr) printf '%s\\n' \"$4\" ;;\n\
               --remote-send) [ \"$4\" = 'fail' ] && { echo 'E247: no server' >&2; exit 1; } ;;\n\
             esac\n\
             exit 0\n",
        )
        .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let mut remote = VimRemote::new(
            RemoteConfig::default()
                .with_binary(script.to_string_lossy())
                .with_servername("TEST"),
        );

        assert_eq!(remote.echo("1 + 1").unwrap(), "1 + 1");
        assert_eq!(remote.command("buffers").unwrap(), "execute('buffers')");
        assert!(remote.remote_send(":echo<CR>").is_ok());

        match remote.remote_send("fail") {
            Err(EditorError::CommandFailed { status, stderr }) => {
                assert_eq!(status, Some(1));
                assert_eq!(stderr, "E247: no server");
            }
            other => panic!("expected CommandFailed, got {:?}", other),
        }
    }
}
