//! Row-to-record binding.
//!
//! The default rule walks the row's columns, camelCases each name and
//! assigns the value to the field of that name after coercing it to the
//! field's declared type. Columns with no matching field are skipped; a value
//! that cannot be coerced leaves its field unset.

use log::{debug, trace, warn};

use crate::reader::{Row, Value};
use crate::schema::{FieldMapping, RecordShape, coerce, to_camel_case};

/// Bind a row into a new record using the naming convention
pub fn bind_by_convention<T: Default>(row: &Row, shape: &RecordShape<T>) -> T {
    let mut record = T::default();
    for (column, value) in row.iter() {
        let field_name = to_camel_case(column);
        match shape.get_field_mapping(&field_name) {
            Some(mapping) => {
                apply_value(&mut record, shape.name, column, value, mapping);
            }
            None => trace!("{}: no field '{field_name}' for column '{column}'", shape.name),
        }
    }
    record
}

/// Bind a single named column onto an existing record
///
/// Returns whether the field was set. A missing column, a column without a
/// matching field, or a coercion miss all leave the record untouched.
pub fn bind_column<T>(record: &mut T, shape: &RecordShape<T>, row: &Row, column: &str) -> bool {
    let field_name = to_camel_case(column);
    let Some(mapping) = shape.get_field_mapping(&field_name) else {
        warn!("{}: no field '{field_name}' for column '{column}'", shape.name);
        return false;
    };
    match row.get(column) {
        Some(value) => apply_value(record, shape.name, column, value, mapping),
        None => {
            debug!("{}: column '{column}' not present in row", shape.name);
            false
        }
    }
}

/// Coerce and assign one value; logs and returns false on a miss
fn apply_value<T>(
    record: &mut T,
    shape: &str,
    column: &str,
    value: &Value,
    mapping: &FieldMapping<T>,
) -> bool {
    let Some(setter) = &mapping.setter else {
        trace!(
            "{shape}: field '{}' ({}) is only set by a custom binding rule",
            mapping.name(),
            mapping.field_type()
        );
        return false;
    };

    match coerce(value, mapping.field_type()) {
        Ok(coerced) => {
            if setter.set(record, coerced) {
                true
            } else {
                warn!("{shape}: setter for '{}' rejected coerced value", mapping.name());
                false
            }
        }
        Err(miss) if value.is_null() => {
            debug!("{shape}: column '{column}' is null ({miss})");
            false
        }
        Err(miss) => {
            warn!("Failed to cast value for column {column}: {miss}");
            false
        }
    }
}
