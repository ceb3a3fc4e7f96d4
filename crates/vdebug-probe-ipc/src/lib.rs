#![deny(clippy::all)]

mod error;
mod mock_editor;
mod port;
mod remote;

pub use error::EditorError;
pub use mock_editor::EditorCall;
pub use mock_editor::MockEditor;
pub use port::EditorPort;
pub use remote::RemoteConfig;
pub use remote::VimRemote;
pub use remote::vim_string_literal;

pub type Result<T> = std::result::Result<T, EditorError>;
