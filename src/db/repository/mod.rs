//! Repository layer: entity-scoped database operations.
//!
//! Free functions over a borrowed `Connection`, one sub-module per table.

mod diagnosis;
mod model;
mod patient;
mod user;

use chrono::NaiveDate;

use super::DatabaseError;

pub use diagnosis::*;
pub use model::*;
pub use patient::*;
pub use user::*;

pub(crate) fn parse_date(field: &str, raw: &str) -> Result<NaiveDate, DatabaseError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| DatabaseError::InvalidEnum {
        field: field.to_string(),
        value: raw.to_string(),
    })
}

/// JSON-encoded list column. `None` stays NULL.
pub(crate) fn encode_list(list: &Option<Vec<String>>) -> Result<Option<String>, DatabaseError> {
    list.as_ref()
        .map(serde_json::to_string)
        .transpose()
        .map_err(DatabaseError::from)
}

pub(crate) fn decode_list(raw: Option<String>) -> Result<Option<Vec<String>>, DatabaseError> {
    raw.map(|s| serde_json::from_str::<Vec<String>>(&s))
        .transpose()
        .map_err(DatabaseError::from)
}
