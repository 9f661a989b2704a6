//! Record shape definitions
//!
//! A record shape is the ordered field table of one record type. Shapes are
//! compiled in via the `Shape` derive and built once on first use.

use serde::Serialize;

use super::mapping::FieldMapping;
use crate::error::Result;
use crate::reader::Row;

/// The field table of a record type
pub struct RecordShape<T> {
    /// The shape name
    pub name: &'static str,
    /// Field mappings in declaration order
    pub field_mappings: Vec<FieldMapping<T>>,
}

impl<T> RecordShape<T> {
    #[must_use]
    pub fn new(name: &'static str, field_mappings: Vec<FieldMapping<T>>) -> Self {
        Self {
            name,
            field_mappings,
        }
    }

    /// Get a field mapping by bound name
    #[must_use]
    pub fn get_field_mapping(&self, name: &str) -> Option<&FieldMapping<T>> {
        self.field_mappings
            .iter()
            .find(|mapping| mapping.definition.matches_name(name))
    }

    /// Bound names of all fields, in declaration order
    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.field_mappings.iter().map(FieldMapping::name)
    }
}

/// Implemented by the `Shape` derive
pub trait Shaped: Sized + 'static {
    /// The compiled field table of this record type
    fn shape() -> &'static RecordShape<Self>;
}

/// A record type rows can be bound into
///
/// The default binding rule maps columns by naming convention. Shapes with
/// nested structure or conditional redaction override [`Record::bind`].
pub trait Record: Shaped + Serialize + Default {
    /// Bind one row into a new record
    fn bind(row: &Row) -> Result<Self> {
        Ok(crate::binder::bind_by_convention(row, Self::shape()))
    }
}
