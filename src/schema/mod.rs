//! Record shapes: field tables, naming convention and value coercion.

pub mod adapt;
pub mod field_def;
pub mod naming;

pub use adapt::{Coerced, CoercionMiss, coerce};
pub use field_def::{FieldDefinition, FieldMapping, FieldType, Record, RecordShape, Setter, Shaped};
pub use naming::to_camel_case;
