use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::domain::formation::{Formation, FormationPayload};
use crate::forms::{error, optional_text};
use crate::repository::filters::blank_as_none;

#[derive(Debug, Default, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_dates"))]
/// Form data for creating or editing a formation.
pub struct FormationForm {
    #[serde(default)]
    #[validate(length(min = 1, max = 255, message = "Le nom est obligatoire (255 caractères max)."))]
    pub nom: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(length(max = 50))]
    pub num_offre: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub centre_id: Option<i64>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub statut_id: Option<i64>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub type_offre_id: Option<i64>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(range(max = 10000))]
    pub prevus_crif: Option<u32>,
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(range(max = 10000))]
    pub prevus_mp: Option<u32>,
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(range(max = 10000))]
    pub inscrits_crif: Option<u32>,
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(range(max = 10000))]
    pub inscrits_mp: Option<u32>,
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(range(max = 10000))]
    pub cap: Option<u32>,
}

fn validate_dates(form: &FormationForm) -> Result<(), ValidationError> {
    match (form.start_date, form.end_date) {
        (Some(start), Some(end)) if end < start => Err(error(
            "dates",
            "La date de fin précède la date de début.",
        )),
        _ => Ok(()),
    }
}

impl From<&FormationForm> for FormationPayload {
    fn from(form: &FormationForm) -> Self {
        Self {
            nom: form.nom.trim().to_string(),
            num_offre: optional_text(&form.num_offre),
            centre_id: form.centre_id,
            statut_id: form.statut_id,
            type_offre_id: form.type_offre_id,
            start_date: form.start_date,
            end_date: form.end_date,
            prevus_crif: form.prevus_crif.unwrap_or_default(),
            prevus_mp: form.prevus_mp.unwrap_or_default(),
            inscrits_crif: form.inscrits_crif.unwrap_or_default(),
            inscrits_mp: form.inscrits_mp.unwrap_or_default(),
            cap: form.cap,
        }
    }
}

impl From<&Formation> for FormationForm {
    /// Pre-fills the edit form.
    fn from(formation: &Formation) -> Self {
        Self {
            nom: formation.nom.clone(),
            num_offre: formation.num_offre.clone(),
            centre_id: formation.centre.as_ref().map(|c| c.id),
            statut_id: formation.statut.as_ref().map(|s| s.id),
            type_offre_id: formation.type_offre.as_ref().map(|t| t.id),
            start_date: formation.start_date,
            end_date: formation.end_date,
            prevus_crif: Some(formation.prevus_crif),
            prevus_mp: Some(formation.prevus_mp),
            inscrits_crif: Some(formation.inscrits_crif),
            inscrits_mp: Some(formation.inscrits_mp),
            cap: formation.cap,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> FormationForm {
        serde_html_form::from_str(body).unwrap()
    }

    #[test]
    fn blank_inputs_become_defaults() {
        let form = parse("nom=+CAP+Cuisine+&num_offre=&centre_id=3&prevus_crif=&cap=");
        assert!(form.validate().is_ok());
        let payload = FormationPayload::from(&form);
        assert_eq!(payload.nom, "CAP Cuisine");
        assert_eq!(payload.num_offre, None);
        assert_eq!(payload.centre_id, Some(3));
        assert_eq!(payload.prevus_crif, 0);
        assert_eq!(payload.cap, None);
    }

    #[test]
    fn end_before_start_is_rejected() {
        let form = parse("nom=BTS&start_date=2025-09-01&end_date=2025-06-30");
        let errors = form.validate().unwrap_err();
        let fields = crate::forms::field_errors(&errors);
        assert_eq!(
            fields["__all__"],
            vec!["La date de fin précède la date de début."]
        );
    }

    #[test]
    fn missing_name_is_rejected() {
        let form = parse("nom=&prevus_crif=12");
        assert!(form.validate().is_err());
    }
}
