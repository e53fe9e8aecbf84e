use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::objectif::{Objectif, ObjectifPayload};
use crate::domain::types::Annee;
use crate::forms::{FormError, optional_text, required};
use crate::repository::filters::blank_as_none;

#[derive(Debug, Default, Serialize, Deserialize, Validate)]
/// Form data for an annual objective of one centre.
pub struct ObjectifForm {
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(required(message = "Le centre est obligatoire."))]
    pub centre_id: Option<i64>,
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(
        required(message = "L'année est obligatoire."),
        range(min = 2000, max = 2100, message = "Année hors limites (2000-2100).")
    )]
    pub annee: Option<i32>,
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(
        required(message = "La valeur de l'objectif est obligatoire."),
        range(max = 100000)
    )]
    pub valeur_objectif: Option<u32>,
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(length(max = 2000))]
    pub commentaire: Option<String>,
}

impl TryFrom<&ObjectifForm> for ObjectifPayload {
    type Error = FormError;

    fn try_from(form: &ObjectifForm) -> Result<Self, Self::Error> {
        let annee = Annee::new(required(form.annee, "annee")?).map_err(|_| FormError::InvalidYear)?;
        Ok(ObjectifPayload {
            centre_id: required(form.centre_id, "centre_id")?,
            annee,
            valeur_objectif: required(form.valeur_objectif, "valeur_objectif")?,
            commentaire: optional_text(&form.commentaire),
        })
    }
}

impl From<&Objectif> for ObjectifForm {
    fn from(objectif: &Objectif) -> Self {
        Self {
            centre_id: objectif.centre_id(),
            annee: Some(objectif.annee.get()),
            valeur_objectif: Some(objectif.valeur_objectif),
            commentaire: objectif.commentaire.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_outside_range_is_rejected() {
        let form = ObjectifForm {
            centre_id: Some(1),
            annee: Some(1999),
            valeur_objectif: Some(20),
            commentaire: None,
        };
        assert!(form.validate().is_err());
        assert!(matches!(
            ObjectifPayload::try_from(&form),
            Err(FormError::InvalidYear)
        ));
    }

    #[test]
    fn valid_form_builds_payload() {
        let form: ObjectifForm =
            serde_html_form::from_str("centre_id=4&annee=2025&valeur_objectif=120&commentaire=++")
                .unwrap();
        assert!(form.validate().is_ok());
        let payload = ObjectifPayload::try_from(&form).unwrap();
        assert_eq!(payload.annee.get(), 2025);
        assert_eq!(payload.valeur_objectif, 120);
        assert_eq!(payload.commentaire, None);
    }
}
