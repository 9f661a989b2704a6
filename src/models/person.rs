//! Person records.
//!
//! Bound names follow the struct fields (`userId`, `fullName`, ...) while the
//! JSON keys keep the snake_case names of the source columns, with the user
//! identifier published as `id`.

use macros::Shape;
use serde::Serialize;

use crate::schema::Record;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Shape)]
#[shape(name = "Person")]
pub struct Person {
    #[serde(rename = "id", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
}

impl Record for Person {}
