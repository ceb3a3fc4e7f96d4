use clap::CommandFactory;
use clap::Parser;
use clap_complete::generate;
use tracing::debug;

use vdebug_probe::commands::Cli;
use vdebug_probe::commands::Commands;
use vdebug_probe::handlers;
use vdebug_probe::handlers::HandlerContext;
use vdebug_probe::handlers::NotRunning;
use vdebug_probe::presenter::create_presenter;
use vdebug_probe::telemetry::init_tracing;
use vdebug_probe_common::color_init;
use vdebug_probe_core::ProbeConfig;
use vdebug_probe_core::Vdebug;
use vdebug_probe_core::VdebugError;
use vdebug_probe_ipc::EditorError;
use vdebug_probe_ipc::VimRemote;

/// How a failure is reported: exit code, suggestion and retryability.
struct Failure {
    code: i32,
    suggestion: Option<String>,
    retryable: bool,
}

fn classify(error: &(dyn std::error::Error + 'static)) -> Failure {
    if let Some(vdebug_error) = error.downcast_ref::<VdebugError>() {
        Failure {
            code: exit_code_for_vdebug_error(vdebug_error),
            suggestion: Some(vdebug_error.suggestion()),
            retryable: vdebug_error.is_retryable(),
        }
    } else if let Some(editor_error) = error.downcast_ref::<EditorError>() {
        Failure {
            code: 74, // EX_IOERR
            suggestion: Some(editor_error.suggestion()),
            retryable: editor_error.is_retryable(),
        }
    } else if error.downcast_ref::<NotRunning>().is_some() {
        Failure {
            code: 75, // EX_TEMPFAIL
            suggestion: Some(
                "Check that the script was started with its debugger pointed at this editor."
                    .to_string(),
            ),
            retryable: true,
        }
    } else {
        Failure {
            code: 1,
            suggestion: None,
            retryable: false,
        }
    }
}

fn exit_code_for_vdebug_error(error: &VdebugError) -> i32 {
    match error {
        VdebugError::BufferNotFound { .. } => 69, // EX_UNAVAILABLE
        VdebugError::Editor(_) => 74,             // EX_IOERR
    }
}

fn main() {
    let cli = Cli::parse();
    color_init(cli.no_color);
    let presenter = create_presenter(cli.effective_format());

    if let Err(e) = run(cli) {
        let failure = classify(&*e);
        presenter.present_error(
            &e.to_string(),
            failure.suggestion.as_deref(),
            failure.retryable,
        );
        std::process::exit(failure.code);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let _telemetry = init_tracing(cli.log_level());

    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = Cli::command();
        generate(*shell, &mut cmd, "vdebug-probe", &mut std::io::stdout());
        return Ok(());
    }

    let remote = VimRemote::new(cli.remote_config());
    let config = ProbeConfig::from_env();
    debug!(
        binary = %remote.config().binary,
        servername = %remote.config().servername,
        "using editor"
    );

    let vdebug = Vdebug::with_config(remote, &config);
    let mut ctx = HandlerContext::new(vdebug, config, cli.effective_format());

    match cli.command {
        Commands::Completions { .. } => unreachable!(),

        Commands::Listen { wait } => handlers::handle_listen(&mut ctx, wait)?,
        Commands::StepOver => handlers::handle_step_over(&mut ctx)?,
        Commands::Status => handlers::handle_status(&mut ctx)?,
        Commands::Buffers => handlers::handle_buffers(&mut ctx)?,
        Commands::Window { window } => handlers::handle_window(&mut ctx, window)?,
        Commands::Stack => handlers::handle_stack(&mut ctx)?,
        Commands::Watch => handlers::handle_watch(&mut ctx)?,
        Commands::TraceVars => handlers::handle_trace_vars(&mut ctx)?,
        Commands::Eval { expr, persist } => handlers::handle_eval(&mut ctx, expr, persist)?,
        Commands::Trace { expr } => handlers::handle_trace(&mut ctx, expr)?,
        Commands::Wait {
            attempts,
            interval_ms,
        } => handlers::handle_wait(&mut ctx, attempts, interval_ms)?,
    }

    Ok(())
}
