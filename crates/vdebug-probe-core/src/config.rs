use std::env;
use std::time::Duration;

const DEFAULT_START: &str = ":python3 debugger.run()<CR>";
const DEFAULT_STEP_OVER: &str = "python3 debugger.step_over()";
const DEFAULT_STATUS: &str = "python3 print(debugger.status())";
const DEFAULT_CONNECTED_TOKEN: &str = "running";
const DEFAULT_LIST_BUFFERS: &str = "buffers";
const DEFAULT_EVAL: &str = "VdebugEval";
const DEFAULT_EVAL_PERSISTENT: &str = "VdebugEval!";
const DEFAULT_TRACE: &str = "VdebugTrace";

const DEFAULT_SETTLE_MS: u64 = 1000;
const DEFAULT_POLL_ATTEMPTS: u32 = 10;
const DEFAULT_POLL_MS: u64 = 1000;

/// The literal strings sent to the editor for each debugger operation.
///
/// They depend on how the plugin is loaded (`python` vs `python3` prefix,
/// command names), so every one of them can be overridden.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSet {
    /// Keys typed into the editor to start listening for a connection.
    pub start: String,
    pub step_over: String,
    /// Prints the session status: `stopped`, `listening`, `running` or `break`.
    pub status: String,
    /// The one status reply that means a debugger engine is connected.
    pub connected_token: String,
    pub list_buffers: String,
    pub eval: String,
    pub eval_persistent: String,
    pub trace: String,
}

impl Default for CommandSet {
    fn default() -> Self {
        Self {
            start: DEFAULT_START.to_string(),
            step_over: DEFAULT_STEP_OVER.to_string(),
            status: DEFAULT_STATUS.to_string(),
            connected_token: DEFAULT_CONNECTED_TOKEN.to_string(),
            list_buffers: DEFAULT_LIST_BUFFERS.to_string(),
            eval: DEFAULT_EVAL.to_string(),
            eval_persistent: DEFAULT_EVAL_PERSISTENT.to_string(),
            trace: DEFAULT_TRACE.to_string(),
        }
    }
}

fn string_var(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

impl CommandSet {
    pub fn from_env() -> Self {
        Self {
            start: string_var("VDEBUG_PROBE_START_CMD", DEFAULT_START),
            step_over: string_var("VDEBUG_PROBE_STEP_OVER_CMD", DEFAULT_STEP_OVER),
            status: string_var("VDEBUG_PROBE_STATUS_CMD", DEFAULT_STATUS),
            connected_token: string_var("VDEBUG_PROBE_CONNECTED_TOKEN", DEFAULT_CONNECTED_TOKEN),
            list_buffers: string_var("VDEBUG_PROBE_BUFFERS_CMD", DEFAULT_LIST_BUFFERS),
            eval: string_var("VDEBUG_PROBE_EVAL_CMD", DEFAULT_EVAL),
            eval_persistent: string_var("VDEBUG_PROBE_EVAL_PERSIST_CMD", DEFAULT_EVAL_PERSISTENT),
            trace: string_var("VDEBUG_PROBE_TRACE_CMD", DEFAULT_TRACE),
        }
    }

    /// Commands for a plugin loaded through the legacy `python` interface.
    pub fn python2() -> Self {
        Self {
            start: ":python debugger.run()<CR>".to_string(),
            step_over: "python debugger.step_over()".to_string(),
            status: "python print debugger.status()".to_string(),
            ..Self::default()
        }
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    pub fn with_connected_token(mut self, token: impl Into<String>) -> Self {
        self.connected_token = token.into();
        self
    }
}

#[derive(Debug, Clone)]
pub struct ProbeConfig {
    pub commands: CommandSet,
    /// Fixed wait after sending the start command.
    pub settle_delay: Duration,
    pub poll_attempts: u32,
    pub poll_interval: Duration,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

impl ProbeConfig {
    pub fn from_env() -> Self {
        Self {
            commands: CommandSet::from_env(),
            settle_delay: Duration::from_millis(
                env::var("VDEBUG_PROBE_SETTLE_MS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(DEFAULT_SETTLE_MS),
            ),
            poll_attempts: env::var("VDEBUG_PROBE_POLL_ATTEMPTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_POLL_ATTEMPTS),
            poll_interval: Duration::from_millis(
                env::var("VDEBUG_PROBE_POLL_MS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(DEFAULT_POLL_MS),
            ),
        }
    }

    pub fn with_commands(mut self, commands: CommandSet) -> Self {
        self.commands = commands;
        self
    }

    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    pub fn with_poll_attempts(mut self, attempts: u32) -> Self {
        self.poll_attempts = attempts;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_commands() {
        let commands = CommandSet::default();
        assert_eq!(commands.start, ":python3 debugger.run()<CR>");
        assert_eq!(commands.step_over, "python3 debugger.step_over()");
        assert_eq!(commands.connected_token, "running");
        assert_eq!(commands.list_buffers, "buffers");
    }

    #[test]
    fn test_python2_commands_keep_token() {
        let commands = CommandSet::python2();
        assert_eq!(commands.start, ":python debugger.run()<CR>");
        assert_eq!(commands.status, "python print debugger.status()");
        assert_eq!(commands.connected_token, DEFAULT_CONNECTED_TOKEN);
    }

    #[test]
    fn test_builder_pattern() {
        let config = ProbeConfig::default()
            .with_commands(CommandSet::default().with_status("python3 print(vdebug_status())"))
            .with_settle_delay(Duration::from_millis(250))
            .with_poll_attempts(3)
            .with_poll_interval(Duration::from_millis(50));

        assert_eq!(config.commands.status, "python3 print(vdebug_status())");
        assert_eq!(config.settle_delay, Duration::from_millis(250));
        assert_eq!(config.poll_attempts, 3);
        assert_eq!(config.poll_interval, Duration::from_millis(50));
    }
}
