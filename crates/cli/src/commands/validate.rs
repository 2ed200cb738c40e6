//! `validate` command implementation.

use anyhow::{Context, Result};
use contracts::ExporterConfig;
use serde::Serialize;
use tracing::info;

use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    warnings: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    receivers: Vec<ReceiverSummary>,
}

#[derive(Serialize)]
struct ReceiverSummary {
    name: String,
    endpoint: String,
    debug: bool,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating configuration");

    let result = validate_config(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn validate_config(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();

    let invalid = |error: String| ValidationResult {
        valid: false,
        config_path: config_path.clone(),
        error: Some(error),
        warnings: Vec::new(),
        receivers: Vec::new(),
    };

    if !args.config.exists() {
        return invalid(format!("File not found: {}", args.config.display()));
    }

    let config = match config_loader::ConfigLoader::load_from_path(&args.config) {
        Ok(config) => config,
        Err(e) => return invalid(e.to_string()),
    };

    // Building a sink performs no network I/O, so every receiver can be checked.
    let mut receivers = Vec::with_capacity(config.receivers.len());
    for receiver in &config.receivers {
        match sinks::build_sink(receiver) {
            Ok(sink) => receivers.push(ReceiverSummary {
                name: receiver.name.clone(),
                endpoint: sink.endpoint().to_string(),
                debug: receiver.logzio.debug,
            }),
            Err(e) => return invalid(e.to_string()),
        }
    }

    ValidationResult {
        valid: true,
        warnings: collect_warnings(&config),
        config_path,
        error: None,
        receivers,
    }
}

/// Non-fatal issues
fn collect_warnings(config: &ExporterConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    for receiver in &config.receivers {
        if receiver.logzio.base_api.starts_with("http://") {
            warnings.push(format!(
                "Receiver '{}' sends its token over plain HTTP",
                receiver.name
            ));
        }
        if receiver.logzio.base_api.ends_with('/') {
            warnings.push(format!(
                "Receiver '{}' baseApi ends with '/', requests will use a double slash",
                receiver.name
            ));
        }
        if receiver.logzio.debug {
            warnings.push(format!(
                "Receiver '{}' has debug enabled, request bodies will be logged",
                receiver.name
            ));
        }
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.config_path);

        println!("\n  Receivers: {}", result.receivers.len());
        for receiver in &result.receivers {
            println!("  - {} -> {}", receiver.name, receiver.endpoint);
        }

        if !result.warnings.is_empty() {
            println!("\n⚠ Warnings:");
            for warning in &result.warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}
