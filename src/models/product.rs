//! Product records.

use macros::Shape;
use serde::Serialize;

use crate::schema::Record;

/// A catalogue product
#[derive(Debug, Clone, Default, PartialEq, Serialize, Shape)]
#[shape(name = "Product")]
pub struct Product {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl Record for Product {}
