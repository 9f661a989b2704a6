//! Reading rows for a dataset.

pub mod value;

use itertools::Itertools;
use log::debug;

use crate::error::Result;
use crate::source::SqlConnection;

pub use value::{ResultSet, Row, Value};

/// Execute the fetch statement and materialize every row
///
/// Column names are lower-cased. When a result carries the same column name
/// twice, the later value wins.
pub fn fetch_rows(conn: &mut dyn SqlConnection, sql: &str) -> Result<Vec<Row>> {
    let result = conn.query(sql)?;
    debug!(
        "Fetched {} row(s) with columns [{}]",
        result.rows.len(),
        result.columns.iter().join(", ")
    );
    Ok(into_rows(result))
}

/// Pair each row's values with the result's column names
#[must_use]
pub fn into_rows(result: ResultSet) -> Vec<Row> {
    let ResultSet { columns, rows } = result;
    rows.into_iter()
        .map(|values| {
            let mut row = Row::new();
            for (column, value) in columns.iter().zip(values) {
                row.insert(column, value);
            }
            row
        })
        .collect()
}
