//! Logging setup for the CLI.
//!
//! The core crates emit `debug!` events for every operation sent to the
//! editor (start keys, step over, eval and trace commands), each buffer
//! directory fetch, each status reply with its connected verdict, and each
//! readiness poll. The remote client adds a `trace!` event per spawned
//! `--remote-expr`/`--remote-send` request. None of this is shown by default;
//! `-v` lowers the level to `debug` and `RUST_LOG=trace` shows raw requests.
//!
//! Log lines never go to stdout, which carries command results only.

use std::io::IsTerminal;
use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

/// Keeps the file writer flushing until dropped at the end of `main`.
#[derive(Debug)]
pub struct TelemetryGuard {
    _guard: Option<WorkerGuard>,
}

impl TelemetryGuard {
    fn disabled() -> Self {
        Self { _guard: None }
    }
}

/// Installs the global subscriber. `RUST_LOG` overrides `default_level`.
///
/// Events go to stderr, or are appended to the file named by
/// `VDEBUG_PROBE_LOG` when it is set, so a test suite driving the probe can
/// collect the editor traffic of every invocation in one file. ANSI styling
/// is only used on an interactive stderr.
pub fn init_tracing(default_level: &str) -> TelemetryGuard {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let (writer, guard, ansi) = match log_file_path_from_env() {
        Some(path) => match std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
        {
            Ok(file) => {
                let (non_blocking, guard) = tracing_appender::non_blocking(file);
                (BoxMakeWriter::new(non_blocking), Some(guard), false)
            }
            Err(err) => {
                eprintln!(
                    "Warning: failed to open log file {}: {}",
                    path.display(),
                    err
                );
                (
                    BoxMakeWriter::new(std::io::stderr),
                    None,
                    std::io::stderr().is_terminal(),
                )
            }
        },
        None => (
            BoxMakeWriter::new(std::io::stderr),
            None,
            std::io::stderr().is_terminal(),
        ),
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(ansi)
        .with_writer(writer);

    if subscriber.try_init().is_err() {
        return TelemetryGuard::disabled();
    }

    TelemetryGuard { _guard: guard }
}

fn log_file_path_from_env() -> Option<PathBuf> {
    std::env::var("VDEBUG_PROBE_LOG")
        .ok()
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}
