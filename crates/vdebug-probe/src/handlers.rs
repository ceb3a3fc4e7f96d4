use std::time::Duration;

use serde_json::json;
use thiserror::Error;

use vdebug_probe_common::Colors;
use vdebug_probe_core::ProbeConfig;
use vdebug_probe_core::SessionStatus;
use vdebug_probe_core::Vdebug;
use vdebug_probe_core::WatchVariable;
use vdebug_probe_ipc::EditorPort;

use crate::commands::OutputFormat;
use crate::commands::WindowKind;
use crate::presenter::Presenter;
use crate::presenter::create_presenter;

pub type HandlerResult = Result<(), Box<dyn std::error::Error>>;

#[derive(Error, Debug)]
#[error("Debugger session not running after {attempts} checks")]
pub struct NotRunning {
    pub attempts: u32,
}

#[derive(Error, Debug)]
#[error("--persist needs an expression to evaluate")]
pub struct MissingExpression;

pub struct HandlerContext<P: EditorPort> {
    pub vdebug: Vdebug<P>,
    pub config: ProbeConfig,
    pub format: OutputFormat,
    presenter: Box<dyn Presenter>,
}

impl<P: EditorPort> HandlerContext<P> {
    pub fn new(vdebug: Vdebug<P>, config: ProbeConfig, format: OutputFormat) -> Self {
        Self {
            vdebug,
            config,
            format,
            presenter: create_presenter(format),
        }
    }

    pub fn presenter(&self) -> &dyn Presenter {
        self.presenter.as_ref()
    }
}

fn yes_no(value: bool) -> String {
    if value {
        Colors::success("yes")
    } else {
        Colors::dim("no")
    }
}

fn render_variables(vars: &[WatchVariable]) -> String {
    vars.iter()
        .map(|var| {
            let indent = "  ".repeat(var.depth);
            if var.value.is_empty() {
                format!("{}{} = ({})", indent, Colors::bold(&var.name), var.kind)
            } else {
                format!(
                    "{}{} = ({}) {}",
                    indent,
                    Colors::bold(&var.name),
                    var.kind,
                    var.value
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn handle_listen<P: EditorPort>(ctx: &mut HandlerContext<P>, wait: bool) -> HandlerResult {
    ctx.vdebug.start_listening()?;
    if wait {
        return handle_wait(ctx, None, None);
    }
    ctx.presenter()
        .present_success("Listening for a debugger connection");
    Ok(())
}

pub fn handle_step_over<P: EditorPort>(ctx: &mut HandlerContext<P>) -> HandlerResult {
    ctx.vdebug.step_over()?;
    ctx.presenter().present_success("Stepped over");
    Ok(())
}

pub fn handle_status<P: EditorPort>(ctx: &mut HandlerContext<P>) -> HandlerResult {
    let SessionStatus { status, connected } = ctx.vdebug.session_status()?;
    let gui_open = ctx.vdebug.gui_open()?;
    let running = gui_open && connected;

    let value = json!({
        "status": status,
        "connected": connected,
        "gui_open": gui_open,
        "running": running,
    });
    let text = format!(
        "{} {}\n{} {}\n{} {}\n{} {}",
        Colors::bold("Status:"),
        status,
        Colors::bold("Connected:"),
        yes_no(connected),
        Colors::bold("GUI open:"),
        yes_no(gui_open),
        Colors::bold("Running:"),
        yes_no(running),
    );
    ctx.presenter().present_result(&value, &text);
    Ok(())
}

pub fn handle_buffers<P: EditorPort>(ctx: &mut HandlerContext<P>) -> HandlerResult {
    let buffers = ctx.vdebug.buffers()?.clone();

    let entries: Vec<_> = buffers
        .iter()
        .map(|(id, name)| json!({ "id": id, "name": name }))
        .collect();
    let text = if buffers.is_empty() {
        Colors::dim("No buffers")
    } else {
        buffers
            .iter()
            .map(|(id, name)| format!("{:>4}  {}", id, Colors::buffer_name(name)))
            .collect::<Vec<_>>()
            .join("\n")
    };
    ctx.presenter()
        .present_result(&json!({ "buffers": entries }), &text);
    Ok(())
}

pub fn handle_window<P: EditorPort>(ctx: &mut HandlerContext<P>, window: WindowKind) -> HandlerResult {
    let content = match window {
        WindowKind::Watch => ctx.vdebug.watch_window_content()?,
        WindowKind::Status => ctx.vdebug.status_window_content()?,
        WindowKind::Stack => ctx.vdebug.stack_window_content()?,
        WindowKind::Trace => ctx.vdebug.trace_window_content()?,
    };
    ctx.presenter().present_raw(&content);
    Ok(())
}

pub fn handle_stack<P: EditorPort>(ctx: &mut HandlerContext<P>) -> HandlerResult {
    let frames = ctx.vdebug.stack()?;

    let text = if frames.is_empty() {
        Colors::dim("Stack is empty")
    } else {
        frames
            .iter()
            .map(|frame| {
                format!(
                    "[{}] {} @ {}:{}",
                    frame.level,
                    Colors::bold(&frame.location),
                    frame.file,
                    frame.line
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    };
    let value = json!({ "frames": serde_json::to_value(&frames)? });
    ctx.presenter().present_result(&value, &text);
    Ok(())
}

pub fn handle_watch<P: EditorPort>(ctx: &mut HandlerContext<P>) -> HandlerResult {
    let vars = ctx.vdebug.watch_variables()?;
    present_variables(ctx, &vars)
}

pub fn handle_trace_vars<P: EditorPort>(ctx: &mut HandlerContext<P>) -> HandlerResult {
    let vars = ctx.vdebug.trace_variables()?;
    present_variables(ctx, &vars)
}

fn present_variables<P: EditorPort>(ctx: &HandlerContext<P>, vars: &[WatchVariable]) -> HandlerResult {
    let text = if vars.is_empty() {
        Colors::dim("No variables")
    } else {
        render_variables(vars)
    };
    let value = json!({ "variables": serde_json::to_value(vars)? });
    ctx.presenter().present_result(&value, &text);
    Ok(())
}

pub fn handle_eval<P: EditorPort>(
    ctx: &mut HandlerContext<P>,
    expr: Option<String>,
    persist: bool,
) -> HandlerResult {
    match (expr.as_deref(), persist) {
        (Some(expr), true) => ctx.vdebug.evaluate_persistent(expr)?,
        (None, true) => return Err(Box::new(MissingExpression)),
        (expr, false) => ctx.vdebug.evaluate(expr)?,
    }
    let message = match expr {
        Some(expr) => format!("Evaluating {}", expr),
        None => "Re-evaluating last expression".to_string(),
    };
    ctx.presenter().present_success(&message);
    Ok(())
}

pub fn handle_trace<P: EditorPort>(ctx: &mut HandlerContext<P>, expr: Option<String>) -> HandlerResult {
    ctx.vdebug.trace(expr.as_deref())?;
    let message = match expr {
        Some(expr) => format!("Tracing {}", expr),
        None => "Toggled trace window".to_string(),
    };
    ctx.presenter().present_success(&message);
    Ok(())
}

pub fn handle_wait<P: EditorPort>(
    ctx: &mut HandlerContext<P>,
    attempts: Option<u32>,
    interval_ms: Option<u64>,
) -> HandlerResult {
    let attempts = attempts.unwrap_or(ctx.config.poll_attempts);
    let interval = interval_ms
        .map(Duration::from_millis)
        .unwrap_or(ctx.config.poll_interval);

    let outcome = ctx.vdebug.wait_until_running(attempts, interval)?;
    if !outcome.running {
        return Err(Box::new(NotRunning {
            attempts: outcome.attempts,
        }));
    }

    let text = format!(
        "{} Debugger session running (after {} check{})",
        Colors::success("✓"),
        outcome.attempts,
        if outcome.attempts == 1 { "" } else { "s" }
    );
    ctx.presenter()
        .present_result(&serde_json::to_value(outcome)?, &text);
    Ok(())
}
