use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::debug;
use vdebug_probe_ipc::EditorPort;

use crate::buffers::BufferDirectory;
use crate::buffers::DEBUGGER_STACK;
use crate::buffers::DEBUGGER_STATUS;
use crate::buffers::DEBUGGER_TRACE;
use crate::buffers::DEBUGGER_WATCH;
use crate::buffers::GUI_BUFFERS;
use crate::buffers::parse_buffer_listing;
use crate::config::CommandSet;
use crate::config::ProbeConfig;
use crate::error::VdebugError;
use crate::sleeper::RealSleeper;
use crate::sleeper::Sleeper;
use crate::windows::StackFrame;
use crate::windows::WatchVariable;
use crate::windows::parse_stack;
use crate::windows::parse_watch;

const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WaitOutcome {
    pub running: bool,
    /// Readiness checks performed, including the successful one.
    pub attempts: u32,
}

/// A status reply and whether it means a debugger engine is connected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionStatus {
    pub status: String,
    pub connected: bool,
}

/// Editor expression yielding every line of buffer `id` joined by newlines.
pub fn buffer_content_expr(id: u32) -> String {
    format!(r#"join(getbufline({}, 1, "$"), "\n")"#, id)
}

fn with_argument(command: &str, argument: Option<&str>) -> String {
    match argument {
        Some(arg) if !arg.is_empty() => format!("{} {}", command, arg),
        _ => command.to_string(),
    }
}

/// Reads debugger state back out of an editor running the Vdebug plugin.
///
/// The buffer directory is fetched on first use and then served from a cache
/// until [`clear_buffer_cache`](Self::clear_buffer_cache) or
/// [`start_listening`](Self::start_listening) drops it. Buffers the editor
/// opens or closes in the meantime are not noticed.
///
/// One instance drives one editor session from one thread; every operation
/// takes `&mut self`.
pub struct Vdebug<P: EditorPort> {
    editor: P,
    commands: CommandSet,
    settle_delay: Duration,
    sleeper: Arc<dyn Sleeper>,
    buffers: Option<BufferDirectory>,
}

impl<P: EditorPort> Vdebug<P> {
    /// Uses the default command set and a one second settle delay, ignoring
    /// the environment.
    pub fn new(editor: P) -> Self {
        Self {
            editor,
            commands: CommandSet::default(),
            settle_delay: DEFAULT_SETTLE_DELAY,
            sleeper: Arc::new(RealSleeper),
            buffers: None,
        }
    }

    pub fn with_config(editor: P, config: &ProbeConfig) -> Self {
        Self {
            commands: config.commands.clone(),
            settle_delay: config.settle_delay,
            ..Self::new(editor)
        }
    }

    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Tells the plugin to listen for a debugger connection, then waits the
    /// settle delay so the listener can bind.
    pub fn start_listening(&mut self) -> crate::Result<()> {
        self.clear_buffer_cache();
        debug!(keys = %self.commands.start, "starting debugger listener");
        self.editor.remote_send(&self.commands.start)?;
        self.sleeper.sleep(self.settle_delay);
        Ok(())
    }

    /// Steps over the current line. Does not check for a connection first.
    pub fn step_over(&mut self) -> crate::Result<()> {
        debug!("step over");
        self.editor.command(&self.commands.step_over)?;
        Ok(())
    }

    /// The plugin's status reply without its trailing line terminator.
    pub fn status(&mut self) -> crate::Result<String> {
        let reply = self.editor.command(&self.commands.status)?;
        Ok(reply.trim_end_matches(['\r', '\n']).to_string())
    }

    /// Queries the status once and classifies it against the connected token.
    pub fn session_status(&mut self) -> crate::Result<SessionStatus> {
        let status = self.status()?;
        let connected = status == self.commands.connected_token;
        debug!(%status, connected, "connection status");
        Ok(SessionStatus { status, connected })
    }

    /// True only when the status reply is exactly the connected token.
    pub fn connected(&mut self) -> crate::Result<bool> {
        Ok(self.session_status()?.connected)
    }

    pub fn buffers(&mut self) -> crate::Result<&BufferDirectory> {
        let directory = match self.buffers.take() {
            Some(directory) => directory,
            None => self.fetch_buffers()?,
        };
        Ok(self.buffers.insert(directory))
    }

    pub fn clear_buffer_cache(&mut self) {
        self.buffers = None;
    }

    pub fn has_cached_buffers(&self) -> bool {
        self.buffers.is_some()
    }

    /// Whether the stack, status and watch windows are all open.
    pub fn gui_open(&mut self) -> crate::Result<bool> {
        Ok(self.buffers()?.contains_all(&GUI_BUFFERS))
    }

    /// GUI open and engine connected. The status is not queried when the GUI
    /// is closed.
    pub fn running(&mut self) -> crate::Result<bool> {
        Ok(self.gui_open()? && self.connected()?)
    }

    pub fn watch_window_content(&mut self) -> crate::Result<String> {
        self.buffer_content(DEBUGGER_WATCH)
    }

    pub fn status_window_content(&mut self) -> crate::Result<String> {
        self.buffer_content(DEBUGGER_STATUS)
    }

    pub fn stack_window_content(&mut self) -> crate::Result<String> {
        self.buffer_content(DEBUGGER_STACK)
    }

    pub fn trace_window_content(&mut self) -> crate::Result<String> {
        self.buffer_content(DEBUGGER_TRACE)
    }

    /// Full text of the buffer called `name`, exactly as the editor returns it.
    pub fn buffer_content(&mut self, name: &str) -> crate::Result<String> {
        let id = self
            .buffers()?
            .id_of(name)
            .ok_or_else(|| VdebugError::buffer_not_found(name))?;
        debug!(name, id, "reading buffer");
        Ok(self.editor.echo(&buffer_content_expr(id))?)
    }

    pub fn stack(&mut self) -> crate::Result<Vec<StackFrame>> {
        Ok(parse_stack(&self.stack_window_content()?))
    }

    pub fn watch_variables(&mut self) -> crate::Result<Vec<WatchVariable>> {
        Ok(parse_watch(&self.watch_window_content()?))
    }

    pub fn trace_variables(&mut self) -> crate::Result<Vec<WatchVariable>> {
        Ok(parse_watch(&self.trace_window_content()?))
    }

    /// Watch window values by variable name; the first row wins for a
    /// repeated name.
    pub fn watch_vars(&mut self) -> crate::Result<BTreeMap<String, String>> {
        let mut vars = BTreeMap::new();
        for var in self.watch_variables()? {
            vars.entry(var.name).or_insert(var.value);
        }
        Ok(vars)
    }

    /// Evaluates `expr` once, or re-renders the last evaluation when `None`.
    pub fn evaluate(&mut self, expr: Option<&str>) -> crate::Result<()> {
        let command = with_argument(&self.commands.eval, expr);
        debug!(%command, "evaluate");
        self.editor.command(&command)?;
        Ok(())
    }

    /// Evaluates `expr` and keeps re-evaluating it at every break.
    pub fn evaluate_persistent(&mut self, expr: &str) -> crate::Result<()> {
        let command = with_argument(&self.commands.eval_persistent, Some(expr));
        debug!(%command, "evaluate persistently");
        self.editor.command(&command)?;
        Ok(())
    }

    /// Opens the trace window for `expr`, or toggles it off when `None`.
    pub fn trace(&mut self, expr: Option<&str>) -> crate::Result<()> {
        let command = with_argument(&self.commands.trace, expr);
        debug!(%command, "trace");
        self.editor.command(&command)?;
        Ok(())
    }

    /// Polls [`running`](Self::running) up to `attempts` times, sleeping
    /// `interval` between checks. The buffer cache is dropped before each
    /// check. Editor failures end the wait immediately.
    pub fn wait_until_running(
        &mut self,
        attempts: u32,
        interval: Duration,
    ) -> crate::Result<WaitOutcome> {
        for attempt in 1..=attempts {
            self.clear_buffer_cache();
            if self.running()? {
                debug!(attempt, "debugger session running");
                return Ok(WaitOutcome {
                    running: true,
                    attempts: attempt,
                });
            }
            if attempt < attempts {
                self.sleeper.sleep(interval);
            }
        }

        debug!(attempts, "debugger session not running");
        Ok(WaitOutcome {
            running: false,
            attempts,
        })
    }

    fn fetch_buffers(&mut self) -> crate::Result<BufferDirectory> {
        let listing = self.editor.command(&self.commands.list_buffers)?;
        let directory = parse_buffer_listing(&listing);
        debug!(count = directory.len(), "fetched buffer directory");
        Ok(directory)
    }
}
