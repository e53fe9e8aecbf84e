use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::prospection::{
    ObjectifProspection, Prospection, ProspectionPayload, StatutProspection,
};
use crate::forms::{FormError, optional_text, required};
use crate::repository::filters::blank_as_none;

#[derive(Debug, Default, Serialize, Deserialize, Validate)]
/// Form data for a prospection contact.
pub struct ProspectionForm {
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(required(message = "La date est obligatoire."))]
    pub date_prospection: Option<NaiveDate>,
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(length(max = 255))]
    pub entreprise: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub formation_id: Option<i64>,
    /// Text of the formation autocomplete, echoed back on errors.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub formation_label: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub objectif: Option<ObjectifProspection>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub statut: Option<StatutProspection>,
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(length(max = 500))]
    pub motif: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(length(max = 2000))]
    pub commentaire: Option<String>,
}

impl TryFrom<&ProspectionForm> for ProspectionPayload {
    type Error = FormError;

    fn try_from(form: &ProspectionForm) -> Result<Self, Self::Error> {
        Ok(ProspectionPayload {
            date_prospection: required(form.date_prospection, "date_prospection")?,
            entreprise: optional_text(&form.entreprise),
            formation: form.formation_id,
            objectif: form.objectif.unwrap_or_default(),
            statut: form.statut.unwrap_or_default(),
            motif: optional_text(&form.motif),
            commentaire: optional_text(&form.commentaire),
        })
    }
}

impl From<&Prospection> for ProspectionForm {
    fn from(prospection: &Prospection) -> Self {
        Self {
            date_prospection: Some(prospection.date_prospection),
            entreprise: prospection.entreprise.clone(),
            formation_id: prospection.formation.as_ref().map(|f| f.id),
            formation_label: prospection
                .formation
                .is_some()
                .then(|| prospection.formation_nom()),
            objectif: Some(prospection.objectif),
            statut: Some(prospection.statut),
            motif: prospection.motif.clone(),
            commentaire: prospection.commentaire.clone(),
        }
    }
}
