//! Configuration validation utilities.

use obot_core::is_separator;

use super::error::{ConfigError, ConfigResult};
use super::schema::{LogOutput, LoggingConfig, ObotConfig, RuntimeConfig};
use obot_framework::RouterOptions;

/// Validates the entire configuration.
pub fn validate_config(config: &ObotConfig) -> ConfigResult<()> {
    validate_router_options(&config.router)?;
    validate_runtime_config(&config.runtime)?;
    validate_logging_config(&config.logging)?;
    Ok(())
}

/// The prefix must lex as exactly one token.
fn validate_router_options(options: &RouterOptions) -> ConfigResult<()> {
    if options.prefix.is_empty() {
        return Err(ConfigError::validation("Router prefix cannot be empty"));
    }

    if options.prefix.chars().any(is_separator) {
        return Err(ConfigError::validation(format!(
            "Router prefix cannot contain whitespace: {:?}",
            options.prefix
        )));
    }

    Ok(())
}

fn validate_runtime_config(runtime: &RuntimeConfig) -> ConfigResult<()> {
    if runtime.inbound_buffer == 0 {
        return Err(ConfigError::validation(
            "Inbound buffer must be greater than 0",
        ));
    }
    Ok(())
}

fn validate_logging_config(logging: &LoggingConfig) -> ConfigResult<()> {
    if logging.output == LogOutput::File && logging.file_path.is_none() {
        return Err(ConfigError::validation(
            "File log output requires logging.file_path",
        ));
    }
    Ok(())
}
