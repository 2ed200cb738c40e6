//! Configuration validation
//!
//! Rules:
//! - at least one receiver
//! - receiver names non-empty and unique
//!
//! Sink parameters (token, baseApi) are checked when the sink is built.

use std::collections::HashSet;

use contracts::{ContractError, ExporterConfig};

/// Validate an ExporterConfig
///
/// Returns the first violation, or Ok(()).
pub fn validate(config: &ExporterConfig) -> Result<(), ContractError> {
    validate_receivers_present(config)?;
    validate_receiver_names(config)?;
    Ok(())
}

fn validate_receivers_present(config: &ExporterConfig) -> Result<(), ContractError> {
    if config.receivers.is_empty() {
        return Err(ContractError::config_validation(
            "receivers",
            "at least one receiver must be configured",
        ));
    }
    Ok(())
}

fn validate_receiver_names(config: &ExporterConfig) -> Result<(), ContractError> {
    let mut seen = HashSet::new();
    for (idx, receiver) in config.receivers.iter().enumerate() {
        if receiver.name.trim().is_empty() {
            return Err(ContractError::config_validation(
                format!("receivers[{idx}].name"),
                "receiver name cannot be empty",
            ));
        }
        if !seen.insert(receiver.name.as_str()) {
            return Err(ContractError::config_validation(
                format!("receivers[name={}]", receiver.name),
                "duplicate receiver name",
            ));
        }
    }
    Ok(())
}
