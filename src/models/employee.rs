//! Employee records with status-gated redaction.
//!
//! Only the basic fields (id, name, age) are bound for every row. Phone
//! numbers and the nested address are bound only when `active_status`
//! equals "active" (case-insensitive); otherwise they stay absent no matter
//! what the row contains.

use log::warn;
use macros::Shape;
use serde::Serialize;

use crate::binder::{bind_by_convention, bind_column};
use crate::error::{PipelineError, Result};
use crate::reader::Row;
use crate::schema::{Record, Shaped};

/// Column gating the sensitive fields
pub const STATUS_COLUMN: &str = "active_status";

/// Status value that unlocks the sensitive fields
pub const ACTIVE_MARKER: &str = "active";

/// Column holding delimited phone numbers
pub const PHONE_COLUMN: &str = "employee_phone";

/// Delimiter between phone numbers
pub const PHONE_DELIMITER: char = ',';

/// Columns bound regardless of status
const BASIC_COLUMNS: [&str; 3] = ["employee_id", "employee_name", "employee_age"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Shape)]
#[shape(name = "Employee")]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_age: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_phone: Option<Vec<String>>,
    #[field(nested = "Address")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_address: Option<Address>,
}

/// Postal address nested inside an employee
#[derive(Debug, Clone, Default, PartialEq, Serialize, Shape)]
#[shape(name = "Address")]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
}

impl Employee {
    #[must_use]
    pub fn is_active(row: &Row) -> bool {
        row.get_non_null(STATUS_COLUMN)
            .is_some_and(|status| status.to_string().eq_ignore_ascii_case(ACTIVE_MARKER))
    }
}

impl Record for Employee {
    fn bind(row: &Row) -> Result<Self> {
        let shape = Self::shape();
        let mut employee = Employee::default();

        for column in BASIC_COLUMNS {
            bind_column(&mut employee, shape, row, column);
        }

        if !Self::is_active(row) {
            warn!(
                "Skipping sensitive fields for inactive employee {}",
                employee
                    .employee_id
                    .map_or_else(|| "<unknown>".to_string(), |id| id.to_string())
            );
            return Ok(employee);
        }

        employee.employee_phone = split_phone_numbers(row)?;
        employee.employee_address = Some(bind_by_convention(row, Address::shape()));

        Ok(employee)
    }
}

/// Split the phone column into its numbers, in source order
///
/// An absent, null or empty column leaves the list unset. Trailing empty
/// entries are dropped.
fn split_phone_numbers(row: &Row) -> Result<Option<Vec<String>>> {
    let Some(value) = row.get_non_null(PHONE_COLUMN) else {
        return Ok(None);
    };
    let raw = value.as_text().ok_or_else(|| {
        PipelineError::Bind(format!(
            "column '{PHONE_COLUMN}' must be text, got {}",
            value.kind()
        ))
    })?;

    let mut numbers: Vec<String> = raw.split(PHONE_DELIMITER).map(str::to_string).collect();
    while numbers.last().is_some_and(String::is_empty) {
        numbers.pop();
    }

    Ok((!numbers.is_empty()).then_some(numbers))
}
