//! Shape and dataset registry
//!
//! The set of record shapes is closed and compiled in: a configured shape
//! name resolves to a [`ShapeKind`], which dispatches to that shape's binding
//! rule. The registry also resolves a dataset identifier to its validated
//! fetch/update statements and shape.

pub mod factory;

use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::config::{DatasetConfig, DatasetSettings, PipelineConfig};
use crate::error::{PipelineError, Result};
use crate::models::{Employee, Person, Product};
use crate::reader::Row;
use crate::schema::{FieldDefinition, Record, Shaped};

pub use factory::shape_from_name;

/// The record shapes a dataset can target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Product,
    Person,
    Employee,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 3] = [ShapeKind::Product, ShapeKind::Person, ShapeKind::Employee];

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            ShapeKind::Product => Product::shape().name,
            ShapeKind::Person => Person::shape().name,
            ShapeKind::Employee => Employee::shape().name,
        }
    }

    /// Field definitions of the shape, in declaration order
    #[must_use]
    pub fn fields(&self) -> Vec<&'static FieldDefinition> {
        match self {
            ShapeKind::Product => Product::shape().field_mappings.iter().map(|m| &m.definition).collect(),
            ShapeKind::Person => Person::shape().field_mappings.iter().map(|m| &m.definition).collect(),
            ShapeKind::Employee => Employee::shape().field_mappings.iter().map(|m| &m.definition).collect(),
        }
    }

    /// Bind a row with this shape's binding rule
    pub fn bind(&self, row: &Row) -> Result<BoundRecord> {
        Ok(match self {
            ShapeKind::Product => BoundRecord::Product(Product::bind(row)?),
            ShapeKind::Person => BoundRecord::Person(Person::bind(row)?),
            ShapeKind::Employee => BoundRecord::Employee(Employee::bind(row)?),
        })
    }
}

/// The typed result of binding one row
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BoundRecord {
    Product(Product),
    Person(Person),
    Employee(Employee),
}

impl BoundRecord {
    #[must_use]
    pub fn shape(&self) -> ShapeKind {
        match self {
            BoundRecord::Product(_) => ShapeKind::Product,
            BoundRecord::Person(_) => ShapeKind::Person,
            BoundRecord::Employee(_) => ShapeKind::Employee,
        }
    }
}

/// Resolves dataset identifiers to validated dataset configurations
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    datasets: FxHashMap<String, DatasetSettings>,
}

impl SchemaRegistry {
    #[must_use]
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self {
            datasets: config.datasets.clone(),
        }
    }

    /// Register or replace the settings of one dataset
    pub fn insert(&mut self, id: impl Into<String>, settings: DatasetSettings) {
        self.datasets.insert(id.into(), settings);
    }

    /// Resolve a dataset identifier
    ///
    /// Fails with [`PipelineError::ConfigInvalid`] when fetch SQL, update SQL
    /// or shape name is missing, and [`PipelineError::UnknownShape`] when the
    /// shape name does not resolve.
    pub fn resolve(&self, id: &str) -> Result<DatasetConfig> {
        let settings = self.datasets.get(id).cloned().unwrap_or_default();

        let missing = settings.missing_keys();
        match settings {
            DatasetSettings {
                fetch_sql: Some(fetch_sql),
                update_sql: Some(update_sql),
                shape: Some(shape_name),
            } if missing.is_empty() => Ok(DatasetConfig {
                id: id.to_string(),
                fetch_sql,
                update_sql,
                shape: shape_from_name(&shape_name)?,
            }),
            _ => Err(PipelineError::ConfigInvalid {
                dataset: id.to_string(),
                missing,
            }),
        }
    }
}
