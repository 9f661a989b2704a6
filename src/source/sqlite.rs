//! `SQLite` connection backed by `rusqlite`.

use log::debug;
use rusqlite::types::{Value as SqliteValue, ValueRef};
use rusqlite::{Connection, OpenFlags, params_from_iter};

use crate::error::{PipelineError, Result};
use crate::reader::{ResultSet, Value};
use crate::source::SqlConnection;

const URL_PREFIXES: [&str; 2] = ["jdbc:sqlite:", "sqlite:"];

/// Strip a JDBC or scheme prefix from a `SQLite` URL, leaving the file path
#[must_use]
pub fn normalize_path(url: &str) -> &str {
    let url = url.trim();
    URL_PREFIXES
        .iter()
        .find_map(|prefix| url.strip_prefix(prefix))
        .unwrap_or(url)
}

pub struct SqliteConnection {
    conn: Connection,
}

impl SqliteConnection {
    /// Open an existing database file
    ///
    /// The file is not created when missing; that is a connection error.
    pub fn open(url: &str) -> Result<Self> {
        let path = normalize_path(url);
        if path.is_empty() {
            return Err(PipelineError::Connection("No SQLite database path configured".to_string()));
        }

        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_URI
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let conn = Connection::open_with_flags(path, flags)
            .map_err(|e| PipelineError::Connection(format!("Failed to open {path}: {e}")))?;

        debug!("Opened SQLite database {path}");
        Ok(Self { conn })
    }
}

fn from_sqlite(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::Integer(i),
        ValueRef::Real(r) => Value::Real(r),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            Value::Text(String::from_utf8_lossy(bytes).into_owned())
        }
    }
}

fn to_sqlite(value: &Value) -> SqliteValue {
    match value {
        Value::Null => SqliteValue::Null,
        Value::Text(s) => SqliteValue::Text(s.clone()),
        Value::Integer(i) => SqliteValue::Integer(*i),
        Value::Real(r) => SqliteValue::Real(*r),
        Value::Boolean(b) => SqliteValue::Integer(i64::from(*b)),
        Value::Numeric(d) => SqliteValue::Text(d.to_string()),
    }
}

impl SqlConnection for SqliteConnection {
    fn query(&mut self, sql: &str) -> Result<ResultSet> {
        let read_err = |e: rusqlite::Error| PipelineError::Read(e.to_string());

        let mut stmt = self.conn.prepare(sql).map_err(read_err)?;
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let width = columns.len();

        let mut result = ResultSet {
            columns,
            rows: Vec::new(),
        };

        let mut rows = stmt.query([]).map_err(read_err)?;
        while let Some(row) = rows.next().map_err(read_err)? {
            let mut values = Vec::with_capacity(width);
            for idx in 0..width {
                values.push(from_sqlite(row.get_ref(idx).map_err(read_err)?));
            }
            result.rows.push(values);
        }

        Ok(result)
    }

    fn execute(&mut self, sql: &str, params: &[Value]) -> Result<usize> {
        self.conn
            .execute(sql, params_from_iter(params.iter().map(to_sqlite)))
            .map_err(|e| PipelineError::Write(e.to_string()))
    }
}
