mod config;
mod exit;
mod logging;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use nativebridge::exchange::{
    ExchangeLoop, MessagesClient, TracingDiagnostics, DEFAULT_API_BASE_URL, DEFAULT_MAX_TOKENS,
    DEFAULT_MODEL,
};
use nativebridge::frame::FrameConfig;

use crate::exit::{exchange_error, CliError, CliResult, INTERNAL, SUCCESS};
use crate::logging::{init_logging, LogFormat, LogLevel};

#[derive(Parser, Debug)]
#[command(
    name = "nativebridge",
    version,
    about = "Native messaging host relaying browser extension requests to a text-generation API"
)]
pub struct Cli {
    /// Model identifier sent with every completion request.
    #[arg(long, env = "NATIVEBRIDGE_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    /// Maximum output tokens per completion.
    #[arg(long, env = "NATIVEBRIDGE_MAX_TOKENS", default_value_t = DEFAULT_MAX_TOKENS)]
    max_tokens: u32,

    /// Messages API root URL.
    #[arg(long, env = "NATIVEBRIDGE_API_BASE_URL", default_value = DEFAULT_API_BASE_URL)]
    api_base_url: String,

    /// Deadline for each completion request (e.g. 120s, 500ms, 2m).
    #[arg(long, env = "NATIVEBRIDGE_TIMEOUT", default_value = "120s")]
    timeout: String,

    /// File whose contents replace the built-in default system prompt.
    #[arg(long, value_name = "FILE")]
    system_prompt_file: Option<PathBuf>,

    /// Diagnostics log, opened for appending ("-" for stderr).
    #[arg(
        long,
        env = "NATIVEBRIDGE_LOG_FILE",
        value_name = "PATH",
        default_value = "/tmp/nativebridge.log"
    )]
    log_file: PathBuf,

    /// Log output format.
    #[arg(long, value_name = "FORMAT", default_value = "text")]
    log_format: LogFormat,

    /// Minimum log level.
    #[arg(long, value_name = "LEVEL", default_value = "info")]
    log_level: LogLevel,

    /// Arguments appended by the browser (extension origin, parent window).
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, hide = true)]
    caller: Vec<String>,
}

fn main() {
    let cli = Cli::parse();
    if let Some(err) = init_logging(&cli.log_file, cli.log_format, cli.log_level) {
        tracing::warn!(
            path = %cli.log_file.display(),
            error = %err,
            "could not open log file, logging to stderr"
        );
    }

    match run(&cli) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            tracing::error!(code = err.code, error = %err, "native host exiting");
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

fn run(cli: &Cli) -> CliResult<i32> {
    let exchange_config = config::exchange_config(cli)?;
    let client = MessagesClient::new(config::client_config(cli)?)
        .map_err(|err| CliError::new(INTERNAL, format!("client setup failed: {err}")))?;

    tracing::info!(
        caller = ?cli.caller,
        model = %exchange_config.model,
        timeout = ?client.config().timeout,
        "native host started"
    );

    let stdin = std::io::stdin().lock();
    let stdout = std::io::stdout().lock();
    let mut exchange = ExchangeLoop::new(stdin, stdout, client)
        .with_config(exchange_config)
        .with_frame_limits(FrameConfig::default(), FrameConfig::host_to_browser())
        .with_diagnostics(Arc::new(TracingDiagnostics));

    match exchange.run() {
        Ok(summary) => {
            tracing::info!(exchanges = summary.exchanges, "native host finished");
            Ok(SUCCESS)
        }
        Err(err) => Err(exchange_error(&err)),
    }
}
