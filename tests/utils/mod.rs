use std::path::PathBuf;

use db_to_json::config::{ConnectionSettings, DatasetSettings, PipelineConfig};
use rusqlite::Connection;
use tempfile::TempDir;

/// Tables used across the integration tests
pub const SCHEMA: &str = r"
CREATE TABLE products (
    id INTEGER PRIMARY KEY,
    name TEXT,
    price REAL,
    category TEXT,
    payload TEXT
);

CREATE TABLE people (
    user_id INTEGER PRIMARY KEY,
    full_name TEXT,
    date_of_birth TEXT,
    street TEXT,
    city TEXT,
    postal_code TEXT,
    payload TEXT
);

CREATE TABLE employees (
    employee_id INTEGER PRIMARY KEY,
    employee_name TEXT,
    employee_age INTEGER,
    active_status TEXT,
    employee_phone TEXT,
    street TEXT,
    city TEXT,
    zip_code TEXT,
    payload TEXT
);

CREATE TABLE items (
    id INTEGER,
    name TEXT,
    payload TEXT
);
";

/// Initialize logging once for the test binary
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A SQLite database in a temporary directory
pub struct Fixture {
    _dir: TempDir,
    pub db_path: PathBuf,
}

impl Fixture {
    /// Create the database with [`SCHEMA`] and the given seed statements
    #[must_use]
    pub fn new(seed: &str) -> Self {
        init_logging();
        let dir = tempfile::tempdir().expect("temp dir");
        let db_path = dir.path().join("pipeline.db");

        let conn = Connection::open(&db_path).expect("open fixture db");
        conn.execute_batch(SCHEMA).expect("create schema");
        conn.execute_batch(seed).expect("seed data");

        Self { _dir: dir, db_path }
    }

    /// Connection URL in the JDBC form used by properties files
    #[must_use]
    pub fn url(&self) -> String {
        format!("jdbc:sqlite:{}", self.db_path.display())
    }

    /// Configuration running `datasets` in the given order
    #[must_use]
    pub fn config(&self, datasets: Vec<(&str, DatasetSettings)>) -> PipelineConfig {
        let mut config = PipelineConfig {
            modules: datasets.iter().map(|(id, _)| (*id).to_string()).collect(),
            connection: ConnectionSettings {
                driver: "org.sqlite.JDBC".to_string(),
                url: self.url(),
                ..ConnectionSettings::default()
            },
            ..PipelineConfig::default()
        };
        for (id, settings) in datasets {
            config.datasets.insert(id.to_string(), settings);
        }
        config
    }

    /// Payload column of `table`, ordered by `key`
    #[must_use]
    pub fn payloads(&self, table: &str, key: &str) -> Vec<Option<serde_json::Value>> {
        let conn = Connection::open(&self.db_path).expect("reopen fixture db");
        let mut stmt = conn
            .prepare(&format!("SELECT payload FROM {table} ORDER BY {key}"))
            .expect("prepare payload query");
        stmt.query_map([], |row| row.get::<_, Option<String>>(0))
            .expect("query payloads")
            .map(|payload| {
                payload
                    .expect("read payload")
                    .map(|text| serde_json::from_str(&text).expect("payload is JSON"))
            })
            .collect()
    }
}

/// Complete dataset settings
#[must_use]
pub fn dataset(fetch_sql: &str, update_sql: &str, shape: &str) -> DatasetSettings {
    DatasetSettings {
        fetch_sql: Some(fetch_sql.to_string()),
        update_sql: Some(update_sql.to_string()),
        shape: Some(shape.to_string()),
    }
}

#[must_use]
pub fn products_dataset() -> DatasetSettings {
    dataset(
        "SELECT * FROM products ORDER BY id",
        "UPDATE products SET payload = ? WHERE id = ?",
        "com.example.dto.Product",
    )
}

#[must_use]
pub fn people_dataset() -> DatasetSettings {
    dataset(
        "SELECT * FROM people ORDER BY user_id",
        "UPDATE people SET payload = ? WHERE user_id = ?",
        "Person",
    )
}

#[must_use]
pub fn employees_dataset() -> DatasetSettings {
    dataset(
        "SELECT * FROM employees ORDER BY employee_id",
        "UPDATE employees SET payload = ? WHERE employee_id = ?",
        "Employee",
    )
}

#[must_use]
pub fn items_dataset() -> DatasetSettings {
    dataset(
        "SELECT id, name FROM items ORDER BY rowid",
        "UPDATE items SET payload = ? WHERE id = ?",
        "Product",
    )
}
