//! Form definitions backing the client pages.

use thiserror::Error;
use validator::{ValidationError, ValidationErrors};

pub mod chat;
pub mod member;

#[derive(Debug, Error)]
/// Errors that can occur when processing form data.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("invalid character id")]
    InvalidCharacter,

    #[error("invalid date")]
    InvalidDate,

    #[error("invalid name")]
    InvalidName,
}

impl FormError {
    /// First human-readable message, stable across runs.
    pub fn message(&self) -> String {
        match self {
            FormError::Validation(errors) => first_message(errors),
            other => other.to_string(),
        }
    }
}

fn first_message(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));
    for (field, errs) in fields {
        if let Some(err) = errs.first() {
            return match &err.message {
                Some(message) => message.to_string(),
                None => format!("{field}: {}", err.code),
            };
        }
    }
    "invalid form".to_string()
}

/// Rejects values with no non-whitespace characters.
pub(crate) fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::new("blank").with_message("value cannot be blank".into()))
    } else {
        Ok(())
    }
}
