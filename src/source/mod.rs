//! Data sources: connection acquisition and raw statement execution.
//!
//! A [`DataSource`] hands out one [`SqlConnection`] per dataset. The
//! connection lives for the dataset's scope and is released when dropped.

pub mod postgres;
pub mod sqlite;

use std::fmt;
use std::str::FromStr;

use log::debug;

use crate::config::ConnectionSettings;
use crate::error::{PipelineError, Result};
use crate::reader::{ResultSet, Value};

/// An open connection able to run the fetch and update statements
pub trait SqlConnection {
    /// Execute a query and return every row it produces
    fn query(&mut self, sql: &str) -> Result<ResultSet>;

    /// Execute a parameterized statement and return the number of rows affected
    fn execute(&mut self, sql: &str, params: &[Value]) -> Result<usize>;
}

/// Something that can open connections
pub trait DataSource {
    fn connect(&self) -> Result<Box<dyn SqlConnection>>;
}

/// Supported database drivers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Driver {
    Sqlite,
    Postgres,
}

impl FromStr for Driver {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "sqlite" | "sqlite3" | "org.sqlite.jdbc" => Ok(Driver::Sqlite),
            "postgres" | "postgresql" | "org.postgresql.driver" => Ok(Driver::Postgres),
            "" => Err(PipelineError::Connection("No database driver configured".to_string())),
            other => Err(PipelineError::Connection(format!(
                "Unsupported database driver: {other}"
            ))),
        }
    }
}

impl fmt::Display for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Driver::Sqlite => write!(f, "sqlite"),
            Driver::Postgres => write!(f, "postgres"),
        }
    }
}

/// Data source that opens connections with the configured driver
#[derive(Debug, Clone)]
pub struct DriverDataSource {
    settings: ConnectionSettings,
}

impl DriverDataSource {
    #[must_use]
    pub fn new(settings: ConnectionSettings) -> Self {
        Self { settings }
    }
}

impl DataSource for DriverDataSource {
    fn connect(&self) -> Result<Box<dyn SqlConnection>> {
        let driver: Driver = self.settings.driver.parse()?;
        debug!("Opening {driver} connection");

        Ok(match driver {
            Driver::Sqlite => Box::new(sqlite::SqliteConnection::open(&self.settings.url)?),
            Driver::Postgres => Box::new(postgres::PostgresConnection::open(&self.settings)?),
        })
    }
}
