//! Canonical JSON rendering of bound records.
//!
//! Unset fields are omitted rather than emitted as `null`; the omission
//! comes from each record's serde attributes and applies to nested objects
//! as well.

use crate::error::Result;
use crate::registry::BoundRecord;

/// Render a bound record as compact JSON text
pub fn to_json(record: &BoundRecord) -> Result<String> {
    Ok(serde_json::to_string(record)?)
}
