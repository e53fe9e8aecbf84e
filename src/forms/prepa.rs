use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::attendance::Attendance;
use crate::domain::prepa::{Prepa, PrepaCounters, PrepaPayload, TypePrepa, attendance_for};
use crate::forms::{FormError, optional_text, required};
use crate::repository::filters::blank_as_none;

#[derive(Debug, Default, Serialize, Deserialize, Validate)]
/// Form data for a Prépa session.
pub struct PrepaForm {
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(required(message = "Le type de séance est obligatoire."))]
    pub type_prepa: Option<TypePrepa>,
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(required(message = "La date est obligatoire."))]
    pub date_prepa: Option<NaiveDate>,
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(required(message = "Le centre est obligatoire."))]
    pub centre_id: Option<i64>,
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(range(max = 1000))]
    pub nombre_places_ouvertes: Option<u32>,
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(range(max = 1000))]
    pub nombre_prescriptions: Option<u32>,
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(range(max = 1000))]
    pub nombre_presents_ic: Option<u32>,
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(range(max = 1000))]
    pub nombre_adhesions: Option<u32>,
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(range(max = 1000))]
    pub nb_inscrits: Option<u32>,
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(range(max = 1000))]
    pub nb_presents: Option<u32>,
    /// Shown read-only; recomputed from the other counters.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub nb_absents: Option<u32>,
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(length(max = 2000))]
    pub commentaire: Option<String>,
}

impl PrepaForm {
    pub fn counters(&self) -> PrepaCounters {
        PrepaCounters {
            nombre_places_ouvertes: self.nombre_places_ouvertes.unwrap_or_default(),
            nombre_prescriptions: self.nombre_prescriptions.unwrap_or_default(),
            nombre_presents_ic: self.nombre_presents_ic.unwrap_or_default(),
            nombre_adhesions: self.nombre_adhesions.unwrap_or_default(),
            nb_inscrits: self.nb_inscrits.unwrap_or_default(),
            nb_presents: self.nb_presents.unwrap_or_default(),
        }
    }

    /// Attendance for the selected session type.
    pub fn attendance(&self) -> Attendance {
        attendance_for(self.type_prepa.unwrap_or_default(), &self.counters())
    }
}

impl TryFrom<&PrepaForm> for PrepaPayload {
    type Error = FormError;

    fn try_from(form: &PrepaForm) -> Result<Self, Self::Error> {
        Ok(PrepaPayload::new(
            required(form.type_prepa, "type_prepa")?,
            required(form.date_prepa, "date_prepa")?,
            required(form.centre_id, "centre_id")?,
            form.counters(),
            optional_text(&form.commentaire),
        ))
    }
}

impl From<&Prepa> for PrepaForm {
    fn from(prepa: &Prepa) -> Self {
        Self {
            type_prepa: Some(prepa.type_prepa),
            date_prepa: Some(prepa.date_prepa),
            centre_id: prepa.centre.as_ref().map(|c| c.id),
            nombre_places_ouvertes: Some(prepa.nombre_places_ouvertes),
            nombre_prescriptions: Some(prepa.nombre_prescriptions),
            nombre_presents_ic: Some(prepa.nombre_presents_ic),
            nombre_adhesions: Some(prepa.nombre_adhesions),
            nb_inscrits: Some(prepa.nb_inscrits),
            nb_presents: Some(prepa.nb_presents),
            nb_absents: Some(prepa.absents()),
            commentaire: prepa.commentaire.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn information_collective_derives_absents_from_prescriptions() {
        let form: PrepaForm = serde_html_form::from_str(
            "type_prepa=info_collective&date_prepa=2025-02-03&centre_id=2\
             &nombre_prescriptions=15&nombre_presents_ic=11&nb_inscrits=&nb_presents=&nb_absents=99",
        )
        .unwrap();
        assert!(form.validate().is_ok());
        let payload = PrepaPayload::try_from(&form).unwrap();
        assert_eq!(payload.nb_absents, 4);
        assert_eq!(payload.nb_inscrits, 0);
    }

    #[test]
    fn workshops_derive_absents_from_inscrits() {
        let form: PrepaForm = serde_html_form::from_str(
            "type_prepa=atelier3&date_prepa=2025-02-03&centre_id=2&nb_inscrits=8&nb_presents=6",
        )
        .unwrap();
        assert_eq!(form.attendance(), Attendance::new(8, 6));
        assert_eq!(PrepaPayload::try_from(&form).unwrap().nb_absents, 2);
    }
}
