//! Field-level validation shared by ticket and activity input.

use std::fmt;

use serde_json::json;

use super::Error;

/// What went wrong with a single input field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldProblem {
    /// Required field was absent.
    Missing,
    /// Field was present but blank once trimmed.
    Empty,
    /// Field exceeds its character limit.
    TooLong { max: usize },
    /// Field contains a NUL character, which PostgreSQL text cannot store.
    NullCharacter,
    /// Field is not a syntactically valid email address.
    InvalidEmail,
    /// Field is not one of the enumerated values.
    UnknownValue { input: String },
    /// Field references a user the directory does not know.
    UnknownUser,
    /// Field references a ticket that does not exist.
    UnknownTicket,
}

/// Validation failure attributed to a named input field.
///
/// # Examples
/// ```
/// use ticketrax::domain::{FieldError, FieldProblem};
///
/// let err = FieldError::new("title", FieldProblem::TooLong { max: 200 });
/// assert_eq!(err.code(), "too_long");
/// assert_eq!(err.to_string(), "title must be at most 200 characters");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    field: &'static str,
    problem: FieldProblem,
}

impl FieldError {
    pub fn new(field: &'static str, problem: FieldProblem) -> Self {
        Self { field, problem }
    }

    pub fn missing(field: &'static str) -> Self {
        Self::new(field, FieldProblem::Missing)
    }

    /// Wire name of the offending field.
    pub fn field(&self) -> &'static str {
        self.field
    }

    pub fn problem(&self) -> &FieldProblem {
        &self.problem
    }

    /// Stable machine-readable code for the problem.
    pub fn code(&self) -> &'static str {
        match self.problem {
            FieldProblem::Missing => "missing_field",
            FieldProblem::Empty => "empty",
            FieldProblem::TooLong { .. } => "too_long",
            FieldProblem::NullCharacter => "null_character",
            FieldProblem::InvalidEmail => "invalid_email",
            FieldProblem::UnknownValue { .. } => "unknown_value",
            FieldProblem::UnknownUser => "unknown_user",
            FieldProblem::UnknownTicket => "unknown_ticket",
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let field = self.field;
        match &self.problem {
            FieldProblem::Missing => write!(f, "{field} is required"),
            FieldProblem::Empty => write!(f, "{field} must not be empty"),
            FieldProblem::TooLong { max } => {
                write!(f, "{field} must be at most {max} characters")
            }
            FieldProblem::NullCharacter => {
                write!(f, "{field} must not contain null characters")
            }
            FieldProblem::InvalidEmail => write!(f, "{field} must be a valid email address"),
            FieldProblem::UnknownValue { input } => {
                write!(f, "{field} has unsupported value '{input}'")
            }
            FieldProblem::UnknownUser => write!(f, "{field} does not reference a known user"),
            FieldProblem::UnknownTicket => {
                write!(f, "{field} does not reference an existing ticket")
            }
        }
    }
}

impl std::error::Error for FieldError {}

impl From<FieldError> for Error {
    fn from(err: FieldError) -> Self {
        Error::invalid_request(err.to_string())
            .with_details(json!({ "field": err.field(), "code": err.code() }))
    }
}

/// Reject text carrying a NUL character.
pub(crate) fn reject_null_characters(field: &'static str, value: &str) -> Result<(), FieldError> {
    if value.contains('\0') {
        return Err(FieldError::new(field, FieldProblem::NullCharacter));
    }
    Ok(())
}

/// Trim `value` and enforce non-emptiness, the absence of NUL characters and
/// an optional character limit.
pub(crate) fn required_text(
    field: &'static str,
    value: &str,
    max: Option<usize>,
) -> Result<String, FieldError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(FieldError::new(field, FieldProblem::Empty));
    }
    reject_null_characters(field, trimmed)?;
    if let Some(max) = max
        && trimmed.chars().count() > max
    {
        return Err(FieldError::new(field, FieldProblem::TooLong { max }));
    }
    Ok(trimmed.to_owned())
}
