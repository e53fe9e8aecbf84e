use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::attendance::Attendance;
use crate::domain::declic::{Declic, DeclicPayload, TypeDeclic};
use crate::forms::{FormError, optional_text, required};
use crate::repository::filters::blank_as_none;

#[derive(Debug, Default, Serialize, Deserialize, Validate)]
/// Form data for a Déclic session.
pub struct DeclicForm {
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(required(message = "Le type d'atelier est obligatoire."))]
    pub type_declic: Option<TypeDeclic>,
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(required(message = "La date est obligatoire."))]
    pub date_declic: Option<NaiveDate>,
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(required(message = "Le centre est obligatoire."))]
    pub centre_id: Option<i64>,
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

impl DeclicForm {
    pub fn attendance(&self) -> Attendance {
        Attendance::new(
            self.nb_inscrits.unwrap_or_default(),
            self.nb_presents.unwrap_or_default(),
        )
    }
}

impl TryFrom<&DeclicForm> for DeclicPayload {
    type Error = FormError;

    fn try_from(form: &DeclicForm) -> Result<Self, Self::Error> {
        Ok(DeclicPayload::new(
            required(form.type_declic, "type_declic")?,
            required(form.date_declic, "date_declic")?,
            required(form.centre_id, "centre_id")?,
            form.attendance(),
            optional_text(&form.commentaire),
        ))
    }
}

impl From<&Declic> for DeclicForm {
    fn from(declic: &Declic) -> Self {
        Self {
            type_declic: Some(declic.type_declic),
            date_declic: Some(declic.date_declic),
            centre_id: declic.centre.as_ref().map(|c| c.id),
            nb_inscrits: Some(declic.nb_inscrits),
            nb_presents: Some(declic.nb_presents),
            nb_absents: Some(declic.absents()),
            commentaire: declic.commentaire.clone(),
        }
    }
}
