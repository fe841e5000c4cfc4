use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use regex::Regex;
use tracing::{debug, error};

use crate::config::proc_validator::validate_service_config;
use crate::config::settings::{IssuerConfig, KeyMaterialValue, LoggingConfig, ServiceConfig};

/// Load and validate config from YAML file
pub fn file_to_config(path: &Path) -> Result<ServiceConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read config '{}'", path.display()))?;
    parse_config(&content)
}

pub fn parse_config(content: &str) -> Result<ServiceConfig> {
    let expanded = expand_env_vars(content)?;
    let mut service_config: ServiceConfig = serde_yaml::from_str(&expanded)
        .inspect_err(|e| error!("parse config error: {}", e))?;

    // Apply defaults
    if service_config.settings.logging.is_none() {
        service_config.settings.logging = Some(LoggingConfig::default());
    }

    debug!("validation config ...");
    validate_service_config(&service_config).map_err(|errors| {
        anyhow!(
            "config is not valid, total errors:{}, \n{}",
            errors.len(),
            errors.join("\n")
        )
    })?;

    Ok(service_config)
}

/// Build the core issuer config, resolving the private key from its source.
pub fn issuer_config(service_config: &ServiceConfig) -> Result<IssuerConfig> {
    let section = &service_config.issuer;
    Ok(IssuerConfig {
        issuer: section.issuer.to_owned(),
        key_id: section.key_id.to_owned(),
        lifetime: Duration::from_secs(section.lifetime_seconds),
        audience: section.audience.to_owned(),
        private_key_material: resolve_key_material(&section.private_key)?,
    })
}

pub fn resolve_key_material(value: &KeyMaterialValue) -> Result<String> {
    let material = match value {
        KeyMaterialValue::Literal { value } => value.to_owned(),
        KeyMaterialValue::FromEnv { from_env } => std::env::var(from_env)
            .with_context(|| format!("env var '{}' with private key is not set", from_env))?,
        KeyMaterialValue::FromFile { path } => fs::read_to_string(path)
            .with_context(|| format!("failed to read private key file '{}'", path))?,
    };
    if material.trim().is_empty() {
        bail!("private key material is empty");
    }
    Ok(material)
}

/// Replace `${VAR}` and `${VAR:default}` with values from the environment.
fn expand_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{(\w+)(?::([^\}]+))?\}")?;
    Ok(re
        .replace_all(input, |caps: &regex::Captures| {
            let var = &caps[1];
            let default = caps.get(2).map(|m| m.as_str()).unwrap_or("");
            std::env::var(var).unwrap_or_else(|_| default.to_string())
        })
        .to_string())
}
