//! Inspection of the debugger windows a Vdebug session renders into editor
//! buffers.
//!
//! [`Vdebug`] owns an [`EditorPort`](vdebug_probe_ipc::EditorPort), caches the
//! editor's buffer directory, and reads the stack, watch, status and trace
//! windows back as text or parsed rows.

#![deny(clippy::all)]

mod buffers;
mod config;
mod error;
mod sleeper;
mod vdebug;
mod windows;

pub use buffers::BufferDirectory;
pub use buffers::DEBUGGER_STACK;
pub use buffers::DEBUGGER_STATUS;
pub use buffers::DEBUGGER_TRACE;
pub use buffers::DEBUGGER_WATCH;
pub use buffers::GUI_BUFFERS;
pub use buffers::parse_buffer_line;
pub use buffers::parse_buffer_listing;
pub use config::CommandSet;
pub use config::ProbeConfig;
pub use error::VdebugError;
pub use sleeper::MockSleeper;
pub use sleeper::RealSleeper;
pub use sleeper::Sleeper;
pub use vdebug::SessionStatus;
pub use vdebug::Vdebug;
pub use vdebug::WaitOutcome;
pub use vdebug::buffer_content_expr;
pub use windows::StackFrame;
pub use windows::WatchVariable;
pub use windows::parse_stack;
pub use windows::parse_watch;

pub type Result<T> = std::result::Result<T, VdebugError>;
