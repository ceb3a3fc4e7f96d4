use thiserror::Error;
use vdebug_probe_ipc::EditorError;

#[derive(Error, Debug)]
pub enum VdebugError {
    #[error("{name} buffer not found")]
    BufferNotFound { name: String },

    #[error(transparent)]
    Editor(#[from] EditorError),
}

impl VdebugError {
    pub fn buffer_not_found(name: impl Into<String>) -> Self {
        VdebugError::BufferNotFound { name: name.into() }
    }

    pub fn suggestion(&self) -> String {
        match self {
            VdebugError::BufferNotFound { .. } => {
                "The debugger window is not open. Start listening and wait until the session is running."
                    .to_string()
            }
            VdebugError::Editor(err) => err.suggestion(),
        }
    }

    /// Missing windows usually appear once the debugger connects.
    pub fn is_retryable(&self) -> bool {
        match self {
            VdebugError::BufferNotFound { .. } => true,
            VdebugError::Editor(err) => err.is_retryable(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_not_found_display() {
        let err = VdebugError::buffer_not_found("DebuggerWatch");
        assert_eq!(err.to_string(), "DebuggerWatch buffer not found");
    }

    #[test]
    fn test_editor_error_display_is_transparent() {
        let err = VdebugError::from(EditorError::InvalidResponse("bad utf-8".into()));
        assert_eq!(err.to_string(), "Invalid response from editor: bad utf-8");
    }

    #[test]
    fn test_retryable() {
        assert!(VdebugError::buffer_not_found("DebuggerStatus").is_retryable());
        assert!(!VdebugError::from(EditorError::InvalidResponse("x".into())).is_retryable());
    }
}
