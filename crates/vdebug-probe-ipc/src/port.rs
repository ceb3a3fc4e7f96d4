use crate::error::EditorError;

/// Request/response boundary with a running editor session.
///
/// Every call is a blocking round-trip. Implementations do not retry; a
/// failure is reported to the caller unchanged.
pub trait EditorPort {
    /// Runs an ex command and returns the output it printed.
    fn command(&mut self, command: &str) -> Result<String, EditorError>;

    /// Feeds `keys` to the editor as typed input. No reply is read.
    fn remote_send(&mut self, keys: &str) -> Result<(), EditorError>;

    /// Evaluates an expression and returns its stringified result.
    fn echo(&mut self, expr: &str) -> Result<String, EditorError>;
}

impl<P: EditorPort + ?Sized> EditorPort for Box<P> {
    fn command(&mut self, command: &str) -> Result<String, EditorError> {
        (**self).command(command)
    }

    fn remote_send(&mut self, keys: &str) -> Result<(), EditorError> {
        (**self).remote_send(keys)
    }

    fn echo(&mut self, expr: &str) -> Result<String, EditorError> {
        (**self).echo(expr)
    }
}
