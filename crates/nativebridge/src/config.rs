use std::path::Path;
use std::time::Duration;

use nativebridge::exchange::{ClientConfig, ExchangeConfig};

use crate::exit::{CliError, CliResult, USAGE};
use crate::Cli;

/// Build the exchange settings from the command line.
pub fn exchange_config(cli: &Cli) -> CliResult<ExchangeConfig> {
    if cli.model.trim().is_empty() {
        return Err(CliError::new(USAGE, "model must not be empty"));
    }
    if cli.max_tokens == 0 {
        return Err(CliError::new(USAGE, "max tokens must be greater than zero"));
    }

    let mut config = ExchangeConfig {
        model: cli.model.clone(),
        max_tokens: cli.max_tokens,
        ..ExchangeConfig::default()
    };
    if let Some(path) = &cli.system_prompt_file {
        config.default_system_prompt = read_system_prompt(path)?;
    }
    Ok(config)
}

/// Build the messages client settings from the command line.
pub fn client_config(cli: &Cli) -> CliResult<ClientConfig> {
    let base_url = cli.api_base_url.trim();
    if !(base_url.starts_with("https://") || base_url.starts_with("http://")) {
        return Err(CliError::new(
            USAGE,
            format!("api base url must be http(s): {base_url}"),
        ));
    }

    Ok(ClientConfig {
        base_url: base_url.to_string(),
        timeout: parse_duration(&cli.timeout)?,
        ..ClientConfig::default()
    })
}

fn read_system_prompt(path: &Path) -> CliResult<String> {
    let text = std::fs::read_to_string(path).map_err(|err| {
        CliError::new(
            USAGE,
            format!("cannot read system prompt file {}: {err}", path.display()),
        )
    })?;
    let text = text.trim();
    if text.is_empty() {
        return Err(CliError::new(
            USAGE,
            format!("system prompt file {} is empty", path.display()),
        ));
    }
    Ok(text.to_string())
}

/// Parse `500ms`, `30s`, `2m` or a bare number of seconds.
pub fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    let (number, unit) = if let Some(num) = input.strip_suffix("ms") {
        (num, "ms")
    } else if let Some(num) = input.strip_suffix('s') {
        (num, "s")
    } else if let Some(num) = input.strip_suffix('m') {
        (num, "m")
    } else {
        (input, "s")
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;

    if value == 0 {
        return Err(CliError::new(USAGE, "duration must be greater than zero"));
    }

    match unit {
        "ms" => Ok(Duration::from_millis(value)),
        "s" => Ok(Duration::from_secs(value)),
        "m" => Ok(Duration::from_secs(value.saturating_mul(60))),
        _ => Err(CliError::new(
            USAGE,
            format!("unsupported duration unit: {unit}"),
        )),
    }
}
