//! Shared validation helpers for inbound HTTP adapters.
//!
//! Request bodies are deserialized into loosely typed DTOs (optional strings)
//! so that missing fields, unknown enumeration values and malformed
//! references surface as field-level `invalid_request` errors instead of
//! opaque deserialization failures.

use std::str::FromStr;

use serde_json::json;

use crate::domain::{Error, FieldError, FieldProblem};

/// Require `value`, attributing its absence to `field`.
pub(crate) fn require<'a>(
    field: &'static str,
    value: Option<&'a str>,
) -> Result<&'a str, FieldError> {
    value.ok_or_else(|| FieldError::missing(field))
}

/// Read a field that may be omitted but must not be `null`.
///
/// `None` is an absent field; an explicit `null` is reported as missing.
pub(crate) fn non_null<'a>(
    field: &'static str,
    value: &'a Option<Option<String>>,
) -> Result<Option<&'a str>, FieldError> {
    match value {
        None => Ok(None),
        Some(None) => Err(FieldError::missing(field)),
        Some(Some(raw)) => Ok(Some(raw.as_str())),
    }
}

/// Parse `raw` into a closed enumeration or identifier.
///
/// The value must match exactly; anything unparseable, including padded
/// input, is reported as `unknown_value`.
pub(crate) fn parse_field<T: FromStr>(field: &'static str, raw: &str) -> Result<T, FieldError> {
    raw.parse::<T>().map_err(|_| {
        FieldError::new(
            field,
            FieldProblem::UnknownValue {
                input: raw.to_owned(),
            },
        )
    })
}

/// Parse an optional query parameter, treating blank values as absent.
pub(crate) fn parse_query_param<T: FromStr>(
    field: &'static str,
    raw: Option<&str>,
) -> Result<Option<T>, Error> {
    match raw.filter(|value| !value.trim().is_empty()) {
        None => Ok(None),
        Some(value) => parse_field(field, value).map(Some).map_err(|err| {
            Error::invalid_request(err.to_string()).with_details(json!({
                "field": field,
                "code": err.code(),
                "value": value,
            }))
        }),
    }
}

/// Parse a path identifier. A malformed id cannot name an existing resource,
/// so it is reported as not found.
pub(crate) fn parse_path_id<T: FromStr>(raw: &str, not_found: &'static str) -> Result<T, Error> {
    raw.parse::<T>().map_err(|_| Error::not_found(not_found))
}
