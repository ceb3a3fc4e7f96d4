use serde_json::Value;

use vdebug_probe_common::Colors;

use crate::commands::OutputFormat;

/// Output sink for command results.
///
/// Handlers build a JSON value once and hand a text rendering alongside it;
/// the presenter picks whichever matches the selected format.
pub trait Presenter {
    fn present_success(&self, message: &str);

    /// Failure report on stderr. `retryable` marks errors that may clear on
    /// their own, such as an editor that has not registered its server yet.
    fn present_error(&self, message: &str, suggestion: Option<&str>, retryable: bool);

    /// Structured result. Text mode prints `text` instead.
    fn present_result(&self, value: &Value, text: &str);

    fn present_raw(&self, text: &str);
}

pub struct TextPresenter;

impl Presenter for TextPresenter {
    fn present_success(&self, message: &str) {
        println!("{} {}", Colors::success("✓"), message);
    }

    fn present_error(&self, message: &str, suggestion: Option<&str>, retryable: bool) {
        eprintln!("{} {}", Colors::error("Error:"), message);
        if let Some(suggestion) = suggestion {
            eprintln!("{} {}", Colors::dim("Suggestion:"), suggestion);
        }
        if retryable {
            eprintln!(
                "{}",
                Colors::dim("(This error may be transient - retry may succeed)")
            );
        }
    }

    fn present_result(&self, _value: &Value, text: &str) {
        if !text.is_empty() {
            println!("{}", text);
        }
    }

    // Window text keeps its own line endings; a final newline is added only when missing.
    fn present_raw(&self, text: &str) {
        print!("{}", text);
        if !text.ends_with('\n') && !text.is_empty() {
            println!();
        }
    }
}

pub struct JsonPresenter;

impl JsonPresenter {
    fn print(value: &Value) {
        println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
    }
}

impl Presenter for JsonPresenter {
    fn present_success(&self, message: &str) {
        Self::print(&serde_json::json!({
            "success": true,
            "message": message
        }));
    }

    fn present_error(&self, message: &str, suggestion: Option<&str>, retryable: bool) {
        let output = serde_json::json!({
            "success": false,
            "error": message,
            "suggestion": suggestion,
            "retryable": retryable
        });
        eprintln!("{}", serde_json::to_string_pretty(&output).unwrap_or_default());
    }

    fn present_result(&self, value: &Value, _text: &str) {
        Self::print(value);
    }

    fn present_raw(&self, text: &str) {
        Self::print(&serde_json::json!({ "content": text }));
    }
}

pub fn create_presenter(format: OutputFormat) -> Box<dyn Presenter> {
    match format {
        OutputFormat::Json => Box::new(JsonPresenter),
        OutputFormat::Text => Box::new(TextPresenter),
    }
}
