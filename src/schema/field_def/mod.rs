//! Field definitions, typed setters and record shapes

pub mod field;
pub mod mapping;
mod registry_schema;

pub use field::{FieldDefinition, FieldType};
pub use mapping::{FieldMapping, Setter};
pub use registry_schema::{Record, RecordShape, Shaped};
