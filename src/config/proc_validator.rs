//! Configuration validation with aggregated errors.
//! - Aggregates all issues into Vec<String>
//! - Checks issuer fields, lifetime, sink path and logging invariants
//! - Lifetime above the configured ceiling is only a warning: the third-party
//!   validity window is not enforced here

use std::path::Path;

use tracing::{error, info, warn};

use crate::config::settings::{
    FileSinkConfig, IssuerSection, KeyMaterialValue, ServiceConfig, SettingsConfig,
    MAX_LIFETIME_SECONDS_DEFAULT,
};

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Public entrypoint: returns Ok(()) or Err(Vec<String>) containing all issues.
pub fn validate_service_config(cfg: &ServiceConfig) -> Result<(), Vec<String>> {
    let mut errors: Vec<String> = Vec::new();

    validate_settings(&cfg.settings, &mut errors);
    validate_issuer(&cfg.issuer, &cfg.settings, &mut errors);
    if let Some(sink) = &cfg.sink {
        validate_sink(sink, &mut errors);
    }

    if errors.is_empty() {
        info!("config valid");
        Ok(())
    } else {
        error!("configuration validation errors ({}):", errors.len());
        for e in &errors {
            error!(" - {}", e);
        }
        Err(errors)
    }
}

/// SETTINGS VALIDATION
fn validate_settings(settings: &SettingsConfig, errors: &mut Vec<String>) {
    if let Some(logging) = &settings.logging {
        if !LOG_LEVELS.contains(&logging.level.to_lowercase().as_str()) {
            errors.push(format!(
                "settings.logging.level '{}' invalid; allowed: {:?}",
                logging.level, LOG_LEVELS
            ));
        }
    }
    if settings.max_lifetime_seconds == Some(0) {
        errors.push("settings.max_lifetime_seconds must be > 0".to_string());
    }
}

/// ISSUER VALIDATION
fn validate_issuer(issuer: &IssuerSection, settings: &SettingsConfig, errors: &mut Vec<String>) {
    for (field, value) in [
        ("issuer", &issuer.issuer),
        ("key_id", &issuer.key_id),
        ("audience", &issuer.audience),
    ] {
        if value.trim().is_empty() {
            errors.push(format!("issuer.{}: cannot be empty", field));
        }
    }

    if issuer.lifetime_seconds == 0 {
        errors.push("issuer.lifetime_seconds must be > 0".to_string());
    }
    let ceiling = settings
        .max_lifetime_seconds
        .unwrap_or(MAX_LIFETIME_SECONDS_DEFAULT);
    if issuer.lifetime_seconds > ceiling {
        warn!(
            "issuer.lifetime_seconds ({}) exceeds max_lifetime_seconds ({}); the consumer may reject these tokens",
            issuer.lifetime_seconds, ceiling
        );
    }

    validate_key_material("issuer.private_key", &issuer.private_key, errors);
}

fn validate_key_material(path: &str, v: &KeyMaterialValue, errors: &mut Vec<String>) {
    match v {
        KeyMaterialValue::Literal { value } => {
            if value.trim().is_empty() {
                errors.push(format!("{}: literal value cannot be empty", path));
            }
        }
        KeyMaterialValue::FromEnv { from_env } => {
            if from_env.trim().is_empty() {
                errors.push(format!("{}: env name cannot be empty", path));
            }
        }
        KeyMaterialValue::FromFile { path: p } => {
            if p.trim().is_empty() {
                errors.push(format!("{}: path cannot be empty", path));
            }
            // existence is checked when the key material is resolved
        }
    }
}

/// SINK VALIDATION
fn validate_sink(sink: &FileSinkConfig, errors: &mut Vec<String>) {
    if !Path::new(&sink.path).is_absolute() {
        errors.push(format!("sink.path '{}' must be an absolute path", sink.path));
    }
    if sink.refresh_interval_seconds == 0 {
        errors.push("sink.refresh_interval_seconds must be > 0".to_string());
    }
}
