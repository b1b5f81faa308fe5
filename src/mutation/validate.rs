//! Field-level checks run before any lookup.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::ValidationError;

fn email_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^.+@.+\..+$").expect("email regex must compile"))
}

pub(crate) fn email(value: &str) -> Result<(), ValidationError> {
    if email_re().is_match(value) {
        Ok(())
    } else {
        Err(ValidationError::MalformedEmail {
            value: value.to_string(),
        })
    }
}

/// Checks `min <= value.len() <= max` (byte length).
pub(crate) fn length(
    field: &str,
    value: &str,
    min: usize,
    max: usize,
) -> Result<(), ValidationError> {
    if value.len() < min {
        return Err(ValidationError::FieldTooShort {
            field: field.to_string(),
            min_length: min,
        });
    }
    max_length(field, value, max)
}

pub(crate) fn max_length(field: &str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.len() > max {
        return Err(ValidationError::FieldTooLong {
            field: field.to_string(),
            max_length: max,
        });
    }
    Ok(())
}
