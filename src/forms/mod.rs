//! Form definitions backing the dashboard routes.

use thiserror::Error;
use validator::{ValidationError, ValidationErrors};

use crate::domain::types::html_to_text;
use crate::repository::errors::FieldErrors;

pub mod commentaires;
pub mod declic;
pub mod documents;
pub mod formations;
pub mod objectifs;
pub mod prepa;
pub mod prospections;
pub mod selection;

#[derive(Debug, Error)]
/// Errors that can occur when processing form data.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("missing field `{0}`")]
    MissingField(&'static str),

    #[error("invalid year")]
    InvalidYear,

    #[error("invalid file: {0}")]
    InvalidFile(String),
}

/// Flattens validator output into field-keyed messages.
pub fn field_errors(errors: &ValidationErrors) -> FieldErrors {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, errors)| {
            let messages = errors
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string())
                })
                .collect();
            (field.to_string(), messages)
        })
        .collect()
}

/// Trims optional text; blank becomes `None`.
pub(crate) fn optional_text(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

pub(crate) fn required<T: Copy>(value: Option<T>, field: &'static str) -> Result<T, FormError> {
    value.ok_or(FormError::MissingField(field))
}

pub(crate) fn error(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(message.into())
}

/// Rejects HTML whose visible text is empty (`<p><br></p>`).
pub(crate) fn not_blank_html(value: &str) -> Result<(), ValidationError> {
    if html_to_text(value).trim().is_empty() {
        return Err(error("blank", "Le contenu est obligatoire."));
    }
    Ok(())
}
