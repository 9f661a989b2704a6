//! Writing JSON documents back into their source rows.

use log::debug;

use crate::error::{PipelineError, Result};
use crate::reader::{Row, Value};
use crate::source::SqlConnection;

/// Candidate key columns, in the order they are tried
pub const KEY_COLUMNS: [&str; 3] = ["id", "user_id", "employee_id"];

/// Find the row's primary key value
///
/// The first of [`KEY_COLUMNS`] present with a non-null value wins.
pub fn infer_primary_key(row: &Row) -> Result<&Value> {
    KEY_COLUMNS
        .iter()
        .find_map(|column| row.get_non_null(column))
        .ok_or_else(|| PipelineError::MissingKey {
            tried: KEY_COLUMNS.to_vec(),
        })
}

/// Execute the update statement with the JSON text and the row's key
///
/// The key is inferred before anything is executed, so a row without one
/// leaves the data source untouched.
pub fn write(
    conn: &mut dyn SqlConnection,
    update_sql: &str,
    row: &Row,
    json: &str,
) -> Result<usize> {
    let key = infer_primary_key(row)?;
    let affected = conn.execute(update_sql, &[Value::Text(json.to_string()), key.clone()])?;
    debug!("Updated {affected} row(s) for key {key}");
    Ok(affected)
}
