use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::attendance::Attendance;
use crate::domain::types::{DeclicId, NamedRef};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum TypeDeclic {
    #[default]
    Atelier1,
    Atelier2,
    Atelier3,
    Atelier4,
    Atelier5,
    Atelier6,
    #[serde(other)]
    AtelierAutre,
}

impl TypeDeclic {
    pub const ALL: [TypeDeclic; 7] = [
        Self::Atelier1,
        Self::Atelier2,
        Self::Atelier3,
        Self::Atelier4,
        Self::Atelier5,
        Self::Atelier6,
        Self::AtelierAutre,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Atelier1 => "atelier1",
            Self::Atelier2 => "atelier2",
            Self::Atelier3 => "atelier3",
            Self::Atelier4 => "atelier4",
            Self::Atelier5 => "atelier5",
            Self::Atelier6 => "atelier6",
            Self::AtelierAutre => "atelier_autre",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Atelier1 => "Atelier 1",
            Self::Atelier2 => "Atelier 2",
            Self::Atelier3 => "Atelier 3",
            Self::Atelier4 => "Atelier 4",
            Self::Atelier5 => "Atelier 5",
            Self::Atelier6 => "Atelier 6",
            Self::AtelierAutre => "Autre atelier",
        }
    }
}

/// Déclic workshop session.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Declic {
    pub id: DeclicId,
    #[serde(default)]
    pub type_declic: TypeDeclic,
    pub date_declic: NaiveDate,
    #[serde(default)]
    pub centre: Option<NamedRef>,
    #[serde(default)]
    pub nb_inscrits: u32,
    #[serde(default)]
    pub nb_presents: u32,
    #[serde(default)]
    pub nb_absents: Option<u32>,
    #[serde(default)]
    pub commentaire: Option<String>,
    #[serde(default)]
    pub taux_presence: Option<f64>,
}

impl Declic {
    pub fn attendance(&self) -> Attendance {
        Attendance::new(self.nb_inscrits, self.nb_presents)
    }

    /// Backend value when present, otherwise derived from the counters.
    pub fn absents(&self) -> u32 {
        self.nb_absents.unwrap_or_else(|| self.attendance().absent())
    }

    pub fn taux_presence(&self) -> Option<f64> {
        self.taux_presence
            .or_else(|| self.attendance().presence_rate())
    }

    pub fn centre_nom(&self) -> String {
        self.centre.as_ref().map(NamedRef::display).unwrap_or_default()
    }
}

/// Payload for creating or updating a Déclic session.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct DeclicPayload {
    pub type_declic: TypeDeclic,
    pub date_declic: NaiveDate,
    pub centre_id: i64,
    pub nb_inscrits: u32,
    pub nb_presents: u32,
    pub nb_absents: u32,
    pub commentaire: Option<String>,
}

impl DeclicPayload {
    /// Builds the payload; the absent count is always derived.
    pub fn new(
        type_declic: TypeDeclic,
        date_declic: NaiveDate,
        centre_id: i64,
        attendance: Attendance,
        commentaire: Option<String>,
    ) -> Self {
        Self {
            type_declic,
            date_declic,
            centre_id,
            nb_inscrits: attendance.total,
            nb_presents: attendance.present,
            nb_absents: attendance.absent(),
            commentaire: commentaire
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn absents_derived_when_backend_omits_them() {
        let declic: Declic = serde_json::from_value(json!({
            "id": 1,
            "type_declic": "atelier2",
            "date_declic": "2025-03-04",
            "nb_inscrits": 10,
            "nb_presents": 7
        }))
        .unwrap();
        assert_eq!(declic.type_declic, TypeDeclic::Atelier2);
        assert_eq!(declic.absents(), 3);
        assert_eq!(declic.taux_presence(), Some(70.0));
    }

    #[test]
    fn payload_derives_absents() {
        let payload = DeclicPayload::new(
            TypeDeclic::Atelier1,
            NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
            3,
            Attendance::new(5, 8),
            Some("  ".into()),
        );
        assert_eq!(payload.nb_absents, 0);
        assert_eq!(payload.commentaire, None);
    }
}
