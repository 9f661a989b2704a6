//! Configuration file loading with environment variable substitution.

use std::path::Path;
use std::sync::LazyLock;

use log::info;
use regex::Regex;

use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};

static ENV_VAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("valid env var regex"));

/// Substitute `${VAR_NAME}` patterns with environment variable values
///
/// Every unset variable is reported in a single error.
pub fn substitute_env_vars(input: &str) -> Result<String> {
    let mut missing = Vec::new();

    let result = ENV_VAR_RE.replace_all(input, |caps: &regex::Captures<'_>| {
        std::env::var(&caps[1]).unwrap_or_else(|_| {
            missing.push(caps[1].to_string());
            String::new()
        })
    });

    if !missing.is_empty() {
        return Err(PipelineError::Config(format!(
            "Missing environment variable(s): {}",
            missing.join(", ")
        )));
    }

    Ok(result.into_owned())
}

/// Parse YAML configuration text (after env var substitution)
pub fn parse_yaml_str(yaml: &str) -> Result<PipelineConfig> {
    let substituted = substitute_env_vars(yaml)?;
    serde_yaml::from_str(&substituted)
        .map_err(|e| PipelineError::Config(format!("Failed to parse YAML configuration: {e}")))
}

/// Parse properties configuration text (after env var substitution)
pub fn parse_properties_str(text: &str) -> Result<PipelineConfig> {
    let substituted = substitute_env_vars(text)?;
    PipelineConfig::from_properties(&substituted)
}

/// Load a configuration file, choosing the format from its extension
///
/// `.yaml` and `.yml` are read as YAML; anything else as properties.
pub fn load_config(path: &Path) -> Result<PipelineConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        PipelineError::Config(format!("Failed to read {}: {e}", path.display()))
    })?;

    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

    let config = if is_yaml {
        parse_yaml_str(&content)?
    } else {
        parse_properties_str(&content)?
    };

    info!(
        "Loaded configuration from {} ({} dataset(s))",
        path.display(),
        config.modules.len()
    );
    Ok(config)
}
