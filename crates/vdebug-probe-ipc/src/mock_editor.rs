use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;

use vdebug_probe_common::mutex_lock_or_recover;

use crate::error::EditorError;
use crate::port::EditorPort;

/// One request received by a [`MockEditor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorCall {
    Command(String),
    RemoteSend(String),
    Echo(String),
}

#[derive(Debug, Clone)]
enum Reply {
    Text(String),
    Failure(String),
}

/// A scripted [`EditorPort`] for tests.
///
/// Replies are configured per exact command or expression string and every
/// request is recorded. Clones share state, so a test can keep one handle and
/// give the other to the code under test.
///
/// # Example
///
/// ```ignore
/// use vdebug_probe_ipc::{EditorPort, MockEditor};
///
/// let mut editor = MockEditor::new();
/// editor.set_command_response("buffers", "  1 a \"[No Name]\" line 1");
///
/// let listing = editor.command("buffers").unwrap();
/// assert_eq!(editor.command_count("buffers"), 1);
/// ```
#[derive(Clone)]
pub struct MockEditor {
    commands: Arc<Mutex<HashMap<String, Reply>>>,
    echoes: Arc<Mutex<HashMap<String, Reply>>>,
    calls: Arc<Mutex<Vec<EditorCall>>>,
    default_response: String,
    error_on_missing: bool,
}

impl Default for MockEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl MockEditor {
    /// Unconfigured requests answer with an empty string.
    pub fn new() -> Self {
        Self {
            commands: Arc::new(Mutex::new(HashMap::new())),
            echoes: Arc::new(Mutex::new(HashMap::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            default_response: String::new(),
            error_on_missing: false,
        }
    }

    /// Unconfigured commands and expressions fail with `CommandFailed`.
    pub fn new_strict() -> Self {
        Self {
            error_on_missing: true,
            ..Self::new()
        }
    }

    pub fn set_command_response(&mut self, command: &str, reply: impl Into<String>) {
        mutex_lock_or_recover(&self.commands).insert(command.to_string(), Reply::Text(reply.into()));
    }

    pub fn set_command_failure(&mut self, command: &str, stderr: impl Into<String>) {
        mutex_lock_or_recover(&self.commands)
            .insert(command.to_string(), Reply::Failure(stderr.into()));
    }

    pub fn set_echo_response(&mut self, expr: &str, reply: impl Into<String>) {
        mutex_lock_or_recover(&self.echoes).insert(expr.to_string(), Reply::Text(reply.into()));
    }

    pub fn set_echo_failure(&mut self, expr: &str, stderr: impl Into<String>) {
        mutex_lock_or_recover(&self.echoes).insert(expr.to_string(), Reply::Failure(stderr.into()));
    }

    pub fn set_default_response(&mut self, reply: impl Into<String>) {
        self.default_response = reply.into();
    }

    pub fn calls(&self) -> Vec<EditorCall> {
        mutex_lock_or_recover(&self.calls).clone()
    }

    pub fn command_count(&self, command: &str) -> usize {
        self.count(|call| matches!(call, EditorCall::Command(c) if c == command))
    }

    pub fn echo_count(&self, expr: &str) -> usize {
        self.count(|call| matches!(call, EditorCall::Echo(e) if e == expr))
    }

    /// Every key sequence passed to `remote_send`, oldest first.
    pub fn remote_sends(&self) -> Vec<String> {
        mutex_lock_or_recover(&self.calls)
            .iter()
            .filter_map(|call| match call {
                EditorCall::RemoteSend(keys) => Some(keys.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn clear_calls(&mut self) {
        mutex_lock_or_recover(&self.calls).clear();
    }

    pub fn reset(&mut self) {
        self.clear_calls();
        mutex_lock_or_recover(&self.commands).clear();
        mutex_lock_or_recover(&self.echoes).clear();
    }

    fn count(&self, predicate: impl Fn(&EditorCall) -> bool) -> usize {
        mutex_lock_or_recover(&self.calls)
            .iter()
            .filter(|call| predicate(call))
            .count()
    }

    fn answer(&self, table: &Mutex<HashMap<String, Reply>>, key: &str) -> Result<String, EditorError> {
        match mutex_lock_or_recover(table).get(key) {
            Some(Reply::Text(text)) => Ok(text.clone()),
            Some(Reply::Failure(stderr)) => Err(EditorError::CommandFailed {
                status: Some(1),
                stderr: stderr.clone(),
            }),
            None if self.error_on_missing => Err(EditorError::CommandFailed {
                status: Some(1),
                stderr: format!("unexpected request: {}", key),
            }),
            None => Ok(self.default_response.clone()),
        }
    }
}

impl EditorPort for MockEditor {
    fn command(&mut self, command: &str) -> Result<String, EditorError> {
        mutex_lock_or_recover(&self.calls).push(EditorCall::Command(command.to_string()));
        self.answer(&self.commands, command)
    }

    fn remote_send(&mut self, keys: &str) -> Result<(), EditorError> {
        mutex_lock_or_recover(&self.calls).push(EditorCall::RemoteSend(keys.to_string()));
        Ok(())
    }

    fn echo(&mut self, expr: &str) -> Result<String, EditorError> {
        mutex_lock_or_recover(&self.calls).push(EditorCall::Echo(expr.to_string()));
        self.answer(&self.echoes, expr)
    }
}
