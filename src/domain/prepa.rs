use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::attendance::Attendance;
use crate::domain::types::{NamedRef, PrepaId};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum TypePrepa {
    #[default]
    InfoCollective,
    Atelier1,
    Atelier2,
    Atelier3,
    Atelier4,
    Atelier5,
    Atelier6,
    #[serde(other)]
    AtelierAutre,
}

impl TypePrepa {
    pub const ALL: [TypePrepa; 8] = [
        Self::InfoCollective,
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
            Self::InfoCollective => "info_collective",
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
            Self::InfoCollective => "Information collective",
            Self::Atelier1 => "Atelier 1",
            Self::Atelier2 => "Atelier 2",
            Self::Atelier3 => "Atelier 3",
            Self::Atelier4 => "Atelier 4",
            Self::Atelier5 => "Atelier 5",
            Self::Atelier6 => "Atelier 6",
            Self::AtelierAutre => "Autre atelier",
        }
    }

    pub fn is_info_collective(self) -> bool {
        matches!(self, Self::InfoCollective)
    }
}

/// Prépa session: an information collective or a workshop.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Prepa {
    pub id: PrepaId,
    #[serde(default)]
    pub type_prepa: TypePrepa,
    pub date_prepa: NaiveDate,
    #[serde(default)]
    pub centre: Option<NamedRef>,
    #[serde(default)]
    pub nombre_places_ouvertes: u32,
    #[serde(default)]
    pub nombre_prescriptions: u32,
    #[serde(default)]
    pub nombre_presents_ic: u32,
    #[serde(default)]
    pub nombre_adhesions: u32,
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

impl Prepa {
    /// Counters the absent count is derived from, depending on the session type.
    pub fn attendance(&self) -> Attendance {
        attendance_for(
            self.type_prepa,
            &PrepaCounters {
                nombre_places_ouvertes: self.nombre_places_ouvertes,
                nombre_prescriptions: self.nombre_prescriptions,
                nombre_presents_ic: self.nombre_presents_ic,
                nombre_adhesions: self.nombre_adhesions,
                nb_inscrits: self.nb_inscrits,
                nb_presents: self.nb_presents,
            },
        )
    }

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

/// Raw counters entered in the Prépa form.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PrepaCounters {
    pub nombre_places_ouvertes: u32,
    pub nombre_prescriptions: u32,
    pub nombre_presents_ic: u32,
    pub nombre_adhesions: u32,
    pub nb_inscrits: u32,
    pub nb_presents: u32,
}

/// Information collectives count prescriptions against IC attendance,
/// workshops count registrations against attendance.
pub fn attendance_for(type_prepa: TypePrepa, counters: &PrepaCounters) -> Attendance {
    if type_prepa.is_info_collective() {
        Attendance::new(counters.nombre_prescriptions, counters.nombre_presents_ic)
    } else {
        Attendance::new(counters.nb_inscrits, counters.nb_presents)
    }
}

/// Payload for creating or updating a Prépa session.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct PrepaPayload {
    pub type_prepa: TypePrepa,
    pub date_prepa: NaiveDate,
    pub centre_id: i64,
    pub nombre_places_ouvertes: u32,
    pub nombre_prescriptions: u32,
    pub nombre_presents_ic: u32,
    pub nombre_adhesions: u32,
    pub nb_inscrits: u32,
    pub nb_presents: u32,
    pub nb_absents: u32,
    pub commentaire: Option<String>,
}

impl PrepaPayload {
    /// Builds the payload; the absent count is always derived.
    pub fn new(
        type_prepa: TypePrepa,
        date_prepa: NaiveDate,
        centre_id: i64,
        counters: PrepaCounters,
        commentaire: Option<String>,
    ) -> Self {
        let nb_absents = attendance_for(type_prepa, &counters).absent();
        Self {
            type_prepa,
            date_prepa,
            centre_id,
            nombre_places_ouvertes: counters.nombre_places_ouvertes,
            nombre_prescriptions: counters.nombre_prescriptions,
            nombre_presents_ic: counters.nombre_presents_ic,
            nombre_adhesions: counters.nombre_adhesions,
            nb_inscrits: counters.nb_inscrits,
            nb_presents: counters.nb_presents,
            nb_absents,
            commentaire: commentaire
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()
    }

    #[test]
    fn info_collective_uses_prescriptions() {
        let counters = PrepaCounters {
            nombre_prescriptions: 20,
            nombre_presents_ic: 14,
            nb_inscrits: 3,
            nb_presents: 3,
            ..PrepaCounters::default()
        };
        let payload = PrepaPayload::new(TypePrepa::InfoCollective, date(), 1, counters, None);
        assert_eq!(payload.nb_absents, 6);
    }

    #[test]
    fn workshops_use_registrations() {
        let counters = PrepaCounters {
            nombre_prescriptions: 20,
            nombre_presents_ic: 2,
            nb_inscrits: 9,
            nb_presents: 9,
            ..PrepaCounters::default()
        };
        let payload = PrepaPayload::new(TypePrepa::Atelier3, date(), 1, counters, None);
        assert_eq!(payload.nb_absents, 0);
    }

    #[test]
    fn unknown_type_is_other_workshop() {
        let t: TypePrepa = serde_json::from_str("\"atelier_bonus\"").unwrap();
        assert_eq!(t, TypePrepa::AtelierAutre);
    }
}
