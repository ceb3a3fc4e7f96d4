use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
pub use clap_complete::Shell;

use vdebug_probe_ipc::RemoteConfig;

const LONG_ABOUT: &str = r#"vdebug-probe reads the debugger windows of an editor running the Vdebug plugin.

The editor must have been started as a server (vim --servername NAME). Every
command talks to it through the editor's --remote-expr / --remote-send flags.

WORKFLOW:
    1. Start listening for a debugger connection
    2. Launch the script under debug with its debugger pointed at the editor
    3. Wait until the debugger windows are open and the session is running
    4. Read the stack, watch and status windows; step over; evaluate

EXAMPLES:
    vdebug-probe --servername VDEBUG listen
    XDEBUG_CONFIG="idekey=something" php test.php &
    vdebug-probe wait --attempts 10
    vdebug-probe stack
    vdebug-probe watch --json
    vdebug-probe step-over
    vdebug-probe window status

CONFIGURATION:
    VDEBUG_PROBE_VIM            editor binary (default: vim)
    VDEBUG_PROBE_SERVERNAME     editor server name (default: VIM)
    VDEBUG_PROBE_START_CMD      keys sent to start listening
    VDEBUG_PROBE_STEP_OVER_CMD  ex command for step over
    VDEBUG_PROBE_STATUS_CMD     ex command printing the session status
    VDEBUG_PROBE_CONNECTED_TOKEN  status reply meaning connected (default: running)
    VDEBUG_PROBE_SETTLE_MS      pause after starting to listen (default: 1000)
    VDEBUG_PROBE_POLL_ATTEMPTS  readiness checks for 'wait' (default: 10)
    VDEBUG_PROBE_POLL_MS        pause between readiness checks (default: 1000)
    VDEBUG_PROBE_LOG            append logs to this file instead of stderr"#;

#[derive(Parser)]
#[command(name = "vdebug-probe")]
#[command(author, version)]
#[command(about = "Inspect Vdebug debugger windows in a running editor")]
#[command(long_about = LONG_ABOUT)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Editor server name to talk to
    #[arg(long, global = true, env = "VDEBUG_PROBE_SERVERNAME", default_value = "VIM")]
    pub servername: String,

    /// Editor binary used as the remote client
    #[arg(long, global = true, env = "VDEBUG_PROBE_VIM", default_value = "vim")]
    pub vim: String,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Output as JSON (shorthand for --format json)
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colored output (also respects NO_COLOR env var)
    ///
    /// Any non-empty NO_COLOR value disables color, except the usual
    /// false spellings (`0`, `false`, `no`, `off`).
    #[arg(
        long,
        global = true,
        env = "NO_COLOR",
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    pub no_color: bool,

    /// Log editor requests to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl Cli {
    /// Returns the effective output format, considering --json shorthand.
    pub fn effective_format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            self.format
        }
    }

    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "warn" }
    }

    pub fn remote_config(&self) -> RemoteConfig {
        RemoteConfig::from_env()
            .with_binary(self.vim.clone())
            .with_servername(self.servername.clone())
    }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start listening for an incoming debugger connection
    #[command(long_about = r#"Start listening for an incoming debugger connection.

Sends the start keys to the editor, then pauses for the settle delay so the
listener can bind. With --wait, keeps polling until the debugger windows are
open and the session is running."#)]
    Listen {
        /// Poll until the session is running
        #[arg(long)]
        wait: bool,
    },

    /// Step over the current line
    StepOver,

    /// Show the session status, whether the GUI is open and whether it is running
    Status,

    /// List the editor's buffers by number
    Buffers,

    /// Print the raw text of a debugger window
    Window {
        /// Which window to print
        #[arg(value_enum)]
        window: WindowKind,
    },

    /// Show the call stack, one frame per line
    Stack,

    /// Show the variables in the watch window
    Watch,

    /// Show the variables in the trace window
    TraceVars,

    /// Evaluate an expression in the current context
    Eval {
        /// Expression to evaluate (re-renders the last evaluation if omitted)
        expr: Option<String>,

        /// Re-evaluate the expression at every break
        #[arg(long)]
        persist: bool,
    },

    /// Trace an expression in the trace window
    Trace {
        /// Expression to trace (toggles the trace window if omitted)
        expr: Option<String>,
    },

    /// Poll until the debugger GUI is open and the session is running
    Wait {
        /// Number of checks before giving up [default: VDEBUG_PROBE_POLL_ATTEMPTS or 10]
        #[arg(long)]
        attempts: Option<u32>,

        /// Milliseconds between checks [default: VDEBUG_PROBE_POLL_MS or 1000]
        #[arg(long)]
        interval_ms: Option<u64>,
    },

    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum WindowKind {
    Watch,
    Status,
    Stack,
    Trace,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}
