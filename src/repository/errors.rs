use std::collections::BTreeMap;

use serde_json::Value;
use thiserror::Error;

/// Field name to messages, as returned by form validation on the backend.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Entity not found")]
    NotFound,

    #[error("Validation error: {}", join_field_errors(.0))]
    ValidationError(FieldErrors),

    #[error("Backend error ({status}): {message}")]
    Http { status: u16, message: String },

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Decode error: {0}")]
    DecodeError(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Keys that carry a general message rather than a field error.
const MESSAGE_KEYS: [&str; 5] = ["message", "detail", "errors", "success", "status"];

fn messages(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => vec![s.trim().to_string()],
        Value::Array(items) => items.iter().flat_map(messages).collect(),
        Value::Object(map) => map.values().flat_map(messages).collect(),
        Value::Number(n) => vec![n.to_string()],
        _ => Vec::new(),
    }
}

/// Field-keyed errors from `{errors: {...}}` or a top-level `{field: [..]}` body.
pub fn field_errors(body: &Value) -> FieldErrors {
    let Value::Object(map) = body else {
        return FieldErrors::new();
    };

    let (source, skip_reserved) = match map.get("errors") {
        Some(Value::Object(errors)) => (errors, false),
        _ => (map, true),
    };

    source
        .iter()
        .filter(|(key, _)| !(skip_reserved && MESSAGE_KEYS.contains(&key.as_str())))
        .filter_map(|(key, value)| {
            let found = messages(value);
            (!found.is_empty()).then(|| (key.clone(), found))
        })
        .collect()
}

pub fn join_field_errors(errors: &FieldErrors) -> String {
    errors
        .iter()
        .map(|(field, messages)| {
            if field == "non_field_errors" || field == "__all__" {
                messages.join(", ")
            } else {
                format!("{field}: {}", messages.join(", "))
            }
        })
        .collect::<Vec<_>>()
        .join(" ; ")
}

/// Best-effort message: `message`, then `detail`, then the field-keyed errors.
pub fn error_message(body: &Value) -> Option<String> {
    match body {
        Value::String(s) if !s.trim().is_empty() => return Some(s.trim().to_string()),
        Value::Object(_) => {}
        _ => return None,
    }

    for key in ["message", "detail"] {
        if let Some(Value::String(s)) = body.get(key) {
            if !s.trim().is_empty() {
                return Some(s.trim().to_string());
            }
        }
    }

    let fields = field_errors(body);
    (!fields.is_empty()).then(|| join_field_errors(&fields))
}

impl RepositoryError {
    /// Classifies a non-success response from its status and parsed body.
    pub fn from_response(status: u16, body: &Value) -> Self {
        match status {
            404 => RepositoryError::NotFound,
            400 | 422 => {
                let fields = field_errors(body);
                if fields.is_empty() {
                    RepositoryError::Http {
                        status,
                        message: error_message(body)
                            .unwrap_or_else(|| "Requête invalide".to_string()),
                    }
                } else {
                    RepositoryError::ValidationError(fields)
                }
            }
            _ => RepositoryError::Http {
                status,
                message: error_message(body).unwrap_or_else(|| format!("Erreur HTTP {status}")),
            },
        }
    }

    /// Message suitable for a flash notification.
    pub fn user_message(&self) -> String {
        match self {
            RepositoryError::NotFound => "Élément introuvable.".to_string(),
            RepositoryError::ValidationError(fields) => join_field_errors(fields),
            RepositoryError::Http { message, .. } => message.clone(),
            RepositoryError::ConnectionError(_) => "Le serveur est injoignable.".to_string(),
            RepositoryError::DecodeError(_) => "Réponse du serveur illisible.".to_string(),
            RepositoryError::Unexpected(_) => "Erreur inattendue.".to_string(),
        }
    }
}

impl From<reqwest::Error> for RepositoryError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            RepositoryError::DecodeError(err.to_string())
        } else if err.is_timeout() || err.is_connect() || err.is_request() {
            RepositoryError::ConnectionError(err.to_string())
        } else if let Some(status) = err.status() {
            RepositoryError::Http {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            RepositoryError::Unexpected(err.to_string())
        }
    }
}

impl From<serde_json::Error> for RepositoryError {
    fn from(err: serde_json::Error) -> Self {
        RepositoryError::DecodeError(err.to_string())
    }
}
