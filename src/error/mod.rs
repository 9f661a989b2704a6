//! Error handling for the pipeline.

/// Errors that can occur while processing datasets
///
/// A coercion miss on a single field is deliberately absent: it leaves the
/// field unset and is reported as a warning by the binder.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// A dataset is missing one of its required settings
    #[error("Dataset '{dataset}' is missing configuration: {}", missing.join(", "))]
    ConfigInvalid {
        dataset: String,
        missing: Vec<&'static str>,
    },

    /// The configuration file could not be read or parsed
    #[error("Configuration error: {0}")]
    Config(String),

    /// The configured shape name does not resolve to a known record shape
    #[error("Unknown record shape: {0}")]
    UnknownShape(String),

    /// Driver or connection acquisition failure
    #[error("Connection error: {0}")]
    Connection(String),

    /// The fetch statement could not be executed
    #[error("Read error: {0}")]
    Read(String),

    /// No usable primary key was found in a row
    #[error("Primary key not found in the fetched data (tried: {})", tried.join(", "))]
    MissingKey { tried: Vec<&'static str> },

    /// The update statement could not be executed
    #[error("Write error: {0}")]
    Write(String),

    /// Unexpected failure while binding a row to its record
    #[error("Binding error: {0}")]
    Bind(String),

    /// A bound record could not be rendered as JSON
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl PipelineError {
    /// Whether this error aborts the remaining rows of the current dataset
    ///
    /// Row-level failures (binding, serialization, missing key, write) are
    /// the ones a `skip-row` policy may isolate; anything else belongs to
    /// the dataset as a whole.
    #[must_use]
    pub fn is_row_level(&self) -> bool {
        matches!(
            self,
            Self::MissingKey { .. } | Self::Bind(_) | Self::Serialize(_) | Self::Write(_)
        )
    }
}

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;
