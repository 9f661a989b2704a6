//! Dataset orchestration.
//!
//! Datasets run strictly in configured order. Each one walks
//! `Pending -> Validated -> Connected -> Reading -> Done`, or ends early as
//! `Skipped` (invalid configuration) or `Failed` (connection, read, or an
//! aborting row error). A failing dataset never stops the run.
//!
//! Rows are processed one at a time: bind, serialize, write. A coercion miss
//! only leaves a field unset. With [`RowFailurePolicy::AbortDataset`] any
//! other row error stops the remaining rows of that dataset; with
//! [`RowFailurePolicy::SkipRow`] row-level errors are logged and the next row
//! is processed.

use std::fmt;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use itertools::Itertools;
use log::{debug, error, info, warn};

use crate::config::{DatasetConfig, PipelineConfig, PipelineOptions, RowFailurePolicy};
use crate::error::{PipelineError, Result};
use crate::json::to_json;
use crate::reader::{Row, fetch_rows};
use crate::registry::{SchemaRegistry, ShapeKind};
use crate::source::{DataSource, DriverDataSource, SqlConnection};
use crate::writer;

/// Lifecycle state of one dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetState {
    Pending,
    Validated,
    Connected,
    Reading,
    Done,
    Skipped,
    Failed,
}

impl DatasetState {
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Skipped | Self::Failed)
    }
}

impl fmt::Display for DatasetState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pending => "PENDING",
            Self::Validated => "VALIDATED",
            Self::Connected => "CONNECTED",
            Self::Reading => "READING",
            Self::Done => "DONE",
            Self::Skipped => "SKIPPED",
            Self::Failed => "FAILED",
        };
        write!(f, "{name}")
    }
}

/// What happened to one dataset
#[derive(Debug, Clone)]
pub struct DatasetOutcome {
    pub id: String,
    pub shape: Option<ShapeKind>,
    pub state: DatasetState,
    pub rows_fetched: usize,
    /// Rows that were bound, serialized and written (or would have been, in a dry run)
    pub rows_written: usize,
    /// Rows dropped under the skip-row policy
    pub rows_skipped: usize,
    /// Total rows affected as reported by the data source
    pub rows_affected: usize,
    pub error: Option<String>,
    pub started_at: DateTime<Utc>,
    pub elapsed: Duration,
}

impl DatasetOutcome {
    fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            shape: None,
            state: DatasetState::Pending,
            rows_fetched: 0,
            rows_written: 0,
            rows_skipped: 0,
            rows_affected: 0,
            error: None,
            started_at: Utc::now(),
            elapsed: Duration::ZERO,
        }
    }

    fn finish(mut self, state: DatasetState, error: Option<&PipelineError>, started: Instant) -> Self {
        self.state = state;
        self.error = error.map(ToString::to_string);
        self.elapsed = started.elapsed();
        self
    }
}

/// Outcome of a whole run
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub outcomes: Vec<DatasetOutcome>,
    pub started_at: DateTime<Utc>,
    pub elapsed: Duration,
}

impl RunSummary {
    /// Number of datasets that ended in `state`
    #[must_use]
    pub fn count(&self, state: DatasetState) -> usize {
        self.outcomes.iter().filter(|o| o.state == state).count()
    }

    /// First outcome for a dataset id
    #[must_use]
    pub fn outcome(&self, id: &str) -> Option<&DatasetOutcome> {
        self.outcomes.iter().find(|o| o.id == id)
    }

    /// Log one line per dataset plus a totals line
    pub fn log(&self) {
        for outcome in &self.outcomes {
            let line = format!(
                "Dataset '{}': {} (fetched {}, written {}, skipped {}) in {:?}",
                outcome.id,
                outcome.state,
                outcome.rows_fetched,
                outcome.rows_written,
                outcome.rows_skipped,
                outcome.elapsed
            );
            match (&outcome.state, &outcome.error) {
                (DatasetState::Done, _) => info!("{line}"),
                (_, Some(err)) => warn!("{line}: {err}"),
                (_, None) => warn!("{line}"),
            }
        }

        info!(
            "Run started {} finished in {:?}: {} done, {} skipped, {} failed",
            self.started_at.format("%Y-%m-%d %H:%M:%S"),
            self.elapsed,
            self.count(DatasetState::Done),
            self.count(DatasetState::Skipped),
            self.count(DatasetState::Failed)
        );
    }
}

/// Drives every configured dataset through read, bind, serialize and write
pub struct Pipeline {
    modules: Vec<String>,
    registry: SchemaRegistry,
    options: PipelineOptions,
    source: Box<dyn DataSource>,
}

impl Pipeline {
    /// Create a pipeline over an explicit data source
    #[must_use]
    pub fn new(config: PipelineConfig, source: Box<dyn DataSource>) -> Self {
        Self {
            registry: SchemaRegistry::from_config(&config),
            modules: config.modules,
            options: config.options,
            source,
        }
    }

    /// Create a pipeline using the configured driver
    #[must_use]
    pub fn from_config(config: PipelineConfig) -> Self {
        let source = DriverDataSource::new(config.connection.clone());
        Self::new(config, Box::new(source))
    }

    /// Process every dataset in configured order
    pub fn run(&self) -> RunSummary {
        let started_at = Utc::now();
        let start = Instant::now();

        info!(
            "Starting run over {} dataset(s): {}",
            self.modules.len(),
            self.modules.iter().join(", ")
        );
        if self.options.dry_run {
            info!("Dry run: no updates will be executed");
        }

        let outcomes = self.modules.iter().map(|id| self.run_dataset(id)).collect();

        RunSummary {
            outcomes,
            started_at,
            elapsed: start.elapsed(),
        }
    }

    fn run_dataset(&self, id: &str) -> DatasetOutcome {
        let start = Instant::now();
        let mut outcome = DatasetOutcome::new(id);
        info!("Processing dataset '{id}'");

        let dataset = match self.registry.resolve(id) {
            Ok(dataset) => dataset,
            Err(e) => {
                warn!("Skipping dataset '{id}': {e}");
                return outcome.finish(DatasetState::Skipped, Some(&e), start);
            }
        };
        outcome.shape = Some(dataset.shape);
        outcome.state = DatasetState::Validated;
        debug!("Dataset '{id}' targets shape {}", dataset.shape.name());

        let mut conn = match self.source.connect() {
            Ok(conn) => conn,
            Err(e) => {
                error!("Dataset '{id}' failed to connect: {e}");
                return outcome.finish(DatasetState::Failed, Some(&e), start);
            }
        };
        outcome.state = DatasetState::Connected;

        let result = self.process_rows(&dataset, conn.as_mut(), &mut outcome);
        drop(conn);
        debug!("Released connection for dataset '{id}'");

        match result {
            Ok(()) => {
                info!(
                    "Dataset '{id}' done: {} of {} row(s) written",
                    outcome.rows_written, outcome.rows_fetched
                );
                outcome.finish(DatasetState::Done, None, start)
            }
            Err(e) => {
                error!("Dataset '{id}' failed: {e}");
                outcome.finish(DatasetState::Failed, Some(&e), start)
            }
        }
    }

    fn process_rows(
        &self,
        dataset: &DatasetConfig,
        conn: &mut dyn SqlConnection,
        outcome: &mut DatasetOutcome,
    ) -> Result<()> {
        outcome.state = DatasetState::Reading;
        let rows = fetch_rows(conn, &dataset.fetch_sql)?;
        outcome.rows_fetched = rows.len();
        info!("Fetched {} row(s) for dataset '{}'", rows.len(), dataset.id);

        for (idx, row) in rows.iter().enumerate() {
            match self.process_row(dataset, conn, row) {
                Ok(affected) => {
                    outcome.rows_written += 1;
                    outcome.rows_affected += affected;
                }
                Err(e)
                    if e.is_row_level()
                        && self.options.row_failure_policy == RowFailurePolicy::SkipRow =>
                {
                    warn!("Skipping row {} of dataset '{}': {e}", idx + 1, dataset.id);
                    outcome.rows_skipped += 1;
                }
                Err(e) => {
                    error!(
                        "Row {} of dataset '{}' failed, abandoning the remaining {} row(s)",
                        idx + 1,
                        dataset.id,
                        rows.len() - idx - 1
                    );
                    return Err(e);
                }
            }
        }

        Ok(())
    }

    fn process_row(
        &self,
        dataset: &DatasetConfig,
        conn: &mut dyn SqlConnection,
        row: &Row,
    ) -> Result<usize> {
        let record = dataset.shape.bind(row)?;
        let json = to_json(&record)?;
        if self.options.log_json {
            debug!("Generated JSON for dataset '{}': {json}", dataset.id);
        }

        if self.options.dry_run {
            let key = writer::infer_primary_key(row)?;
            info!("Dry run: would update dataset '{}' row with key {key}", dataset.id);
            return Ok(0);
        }

        let affected = writer::write(conn, &dataset.update_sql, row, &json)?;
        info!("Updated {affected} row(s) in dataset '{}'", dataset.id);
        Ok(affected)
    }
}
