use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Failed to launch editor client '{binary}': {source}")]
    Spawn {
        binary: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Editor request failed ({}): {stderr}", exit_label(.status))]
    CommandFailed { status: Option<i32>, stderr: String },

    #[error("Invalid response from editor: {0}")]
    InvalidResponse(String),
}

fn exit_label(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!("exit {}", code),
        None => "terminated by signal".to_string(),
    }
}

impl EditorError {
    pub fn suggestion(&self) -> String {
        match self {
            EditorError::Spawn { source, .. }
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                "Editor binary not found. Set VDEBUG_PROBE_VIM or pass --vim.".to_string()
            }
            EditorError::Spawn { .. } => {
                "Could not start the editor client. Check the binary path and permissions."
                    .to_string()
            }
            EditorError::CommandFailed { .. } => {
                "Is an editor running with the expected --servername? Check VDEBUG_PROBE_SERVERNAME."
                    .to_string()
            }
            EditorError::InvalidResponse(_) => {
                "The editor replied with non-UTF-8 output. Check the editor's encoding.".to_string()
            }
        }
    }

    /// A failed request may succeed once the editor server has registered.
    pub fn is_retryable(&self) -> bool {
        matches!(self, EditorError::CommandFailed { .. })
    }
}
