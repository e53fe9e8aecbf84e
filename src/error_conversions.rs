//! Error conversion glue between the data layer and the server layer.
//!
//! The domain and repository modules compile without the `server` feature,
//! so their conversions into service errors live here.

use crate::domain::types::TypeConstraintError;
use crate::forms::{FormError, field_errors};
use crate::services::ServiceError;

impl From<TypeConstraintError> for ServiceError {
    fn from(val: TypeConstraintError) -> Self {
        ServiceError::TypeConstraint(val.to_string())
    }
}

impl From<FormError> for ServiceError {
    fn from(val: FormError) -> Self {
        match val {
            FormError::Validation(errors) => ServiceError::Validation(field_errors(&errors)),
            FormError::MissingField(field) => ServiceError::Validation(
                [(field.to_string(), vec!["Ce champ est obligatoire.".to_string()])].into(),
            ),
            FormError::InvalidYear => ServiceError::Validation(
                [("annee".to_string(), vec!["Année invalide.".to_string()])].into(),
            ),
            FormError::InvalidFile(message) => ServiceError::Form(format!("Fichier invalide : {message}")),
        }
    }
}
