//! A configuration-driven pipeline that reads rows from a relational data
//! source, binds each row to a typed record, renders the record as JSON and
//! writes the JSON back into the originating row.

// Lets `#[derive(Shape)]` refer to this crate by name from inside it.
extern crate self as db_to_json;

pub mod binder;
pub mod config;
pub mod error;
pub mod json;
pub mod models;
pub mod pipeline;
pub mod reader;
pub mod registry;
pub mod schema;
pub mod source;
pub mod writer;

// Re-export the most common types for easier use
pub use config::parser::load_config;
pub use config::{PipelineConfig, PipelineOptions, RowFailurePolicy};
pub use error::{PipelineError, Result};
pub use pipeline::{DatasetOutcome, DatasetState, Pipeline, RunSummary};
pub use reader::{Row, Value};
pub use registry::{BoundRecord, SchemaRegistry, ShapeKind};
pub use source::{DataSource, DriverDataSource, SqlConnection};

pub use macros::Shape;
