//! Configuration for the pipeline.
//!
//! A configuration lists the datasets to process in order, the shared
//! connection settings, and per dataset the fetch statement, update statement
//! and target shape name. It can be loaded from a Java-style properties file
//! or from YAML, see [`parser::load_config`].

pub mod parser;
pub mod properties;

use std::fmt;
use std::str::FromStr;

use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::error::PipelineError;
use crate::registry::ShapeKind;

/// Shared connection settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConnectionSettings {
    /// Driver identifier (`sqlite`, `postgres`, or a JDBC driver class name)
    pub driver: String,
    /// Connection URL or path
    pub url: String,
    pub user: Option<String>,
    pub password: Option<String>,
}

/// What happens to the rest of a dataset when one row fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RowFailurePolicy {
    /// Stop processing the dataset at the failing row
    #[default]
    AbortDataset,
    /// Log the failing row and continue with the next one
    SkipRow,
}

impl FromStr for RowFailurePolicy {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "abort-dataset" | "abort" => Ok(Self::AbortDataset),
            "skip-row" | "skip" => Ok(Self::SkipRow),
            other => Err(PipelineError::Config(format!(
                "Unknown row failure policy '{other}' (expected abort-dataset or skip-row)"
            ))),
        }
    }
}

impl fmt::Display for RowFailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AbortDataset => write!(f, "abort-dataset"),
            Self::SkipRow => write!(f, "skip-row"),
        }
    }
}

/// Run-wide options
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PipelineOptions {
    /// Whether a failing row aborts the rest of its dataset
    pub row_failure_policy: RowFailurePolicy,
    /// Log each generated JSON document at debug level
    pub log_json: bool,
    /// Bind and serialize every row, but execute no update
    pub dry_run: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            row_failure_policy: RowFailurePolicy::AbortDataset,
            log_json: true,
            dry_run: false,
        }
    }
}

/// Raw per-dataset settings as configured; any of them may be missing
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DatasetSettings {
    #[serde(alias = "fetchSql")]
    pub fetch_sql: Option<String>,
    #[serde(alias = "updateSql")]
    pub update_sql: Option<String>,
    #[serde(alias = "dtoClass", alias = "dto_class")]
    pub shape: Option<String>,
}

impl DatasetSettings {
    /// Names of the required settings that are absent or blank
    #[must_use]
    pub fn missing_keys(&self) -> Vec<&'static str> {
        let blank = |value: &Option<String>| value.as_deref().is_none_or(|v| v.trim().is_empty());

        let mut missing = Vec::new();
        if blank(&self.fetch_sql) {
            missing.push("fetchSql");
        }
        if blank(&self.update_sql) {
            missing.push("updateSql");
        }
        if blank(&self.shape) {
            missing.push("dtoClass");
        }
        missing
    }
}

/// A validated dataset: everything needed to run it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetConfig {
    pub id: String,
    pub fetch_sql: String,
    pub update_sql: String,
    pub shape: ShapeKind,
}

/// Complete pipeline configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PipelineConfig {
    /// Dataset identifiers, processed in this order
    pub modules: Vec<String>,
    #[serde(default)]
    pub connection: ConnectionSettings,
    /// Per-dataset settings keyed by dataset identifier
    #[serde(default)]
    pub datasets: FxHashMap<String, DatasetSettings>,
    #[serde(default)]
    pub options: PipelineOptions,
}
