use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::types::{FormationId, NamedRef};

/// Training program as the backend returns it.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Formation {
    pub id: FormationId,
    pub nom: String,
    #[serde(default)]
    pub num_offre: Option<String>,
    #[serde(default)]
    pub centre: Option<NamedRef>,
    #[serde(default)]
    pub statut: Option<NamedRef>,
    #[serde(default)]
    pub type_offre: Option<NamedRef>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub prevus_crif: u32,
    #[serde(default)]
    pub prevus_mp: u32,
    #[serde(default)]
    pub inscrits_crif: u32,
    #[serde(default)]
    pub inscrits_mp: u32,
    /// Maximum capacity when the backend tracks one.
    #[serde(default)]
    pub cap: Option<u32>,
    /// Occupancy percentage computed by the backend.
    #[serde(default)]
    pub saturation: Option<f64>,
    #[serde(default)]
    pub taux_transformation: Option<f64>,
}

impl Formation {
    pub fn total_places(&self) -> u32 {
        self.prevus_crif + self.prevus_mp
    }

    pub fn total_inscrits(&self) -> u32 {
        self.inscrits_crif + self.inscrits_mp
    }

    /// Remaining seats; never negative.
    pub fn places_disponibles(&self) -> u32 {
        self.total_places().saturating_sub(self.total_inscrits())
    }

    pub fn saturation_level(&self) -> SaturationLevel {
        SaturationLevel::from_rate(self.saturation)
    }

    pub fn centre_nom(&self) -> String {
        self.centre.as_ref().map(NamedRef::display).unwrap_or_default()
    }

    pub fn statut_nom(&self) -> String {
        self.statut.as_ref().map(NamedRef::display).unwrap_or_default()
    }

    pub fn type_offre_nom(&self) -> String {
        self.type_offre
            .as_ref()
            .map(NamedRef::display)
            .unwrap_or_default()
    }
}

/// Badge category for a saturation percentage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SaturationLevel {
    Unknown,
    Low,
    Medium,
    High,
    Full,
}

impl SaturationLevel {
    pub fn from_rate(rate: Option<f64>) -> Self {
        match rate {
            None => Self::Unknown,
            Some(r) if r.is_nan() => Self::Unknown,
            Some(r) if r >= 100.0 => Self::Full,
            Some(r) if r >= 70.0 => Self::High,
            Some(r) if r >= 40.0 => Self::Medium,
            Some(_) => Self::Low,
        }
    }

    /// Bootstrap contextual class used by the badge template.
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Unknown => "secondary",
            Self::Low => "danger",
            Self::Medium => "warning",
            Self::High => "success",
            Self::Full => "primary",
        }
    }
}

/// Payload sent when creating or updating a formation.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct FormationPayload {
    pub nom: String,
    pub num_offre: Option<String>,
    pub centre_id: Option<i64>,
    pub statut_id: Option<i64>,
    pub type_offre_id: Option<i64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub prevus_crif: u32,
    pub prevus_mp: u32,
    pub inscrits_crif: u32,
    pub inscrits_mp: u32,
    pub cap: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_with_missing_optional_fields() {
        let formation: Formation =
            serde_json::from_value(json!({"id": 3, "nom": "CAP Cuisine"})).unwrap();
        assert_eq!(formation.id.get(), 3);
        assert_eq!(formation.total_places(), 0);
        assert_eq!(formation.saturation_level(), SaturationLevel::Unknown);
        assert_eq!(formation.centre_nom(), "");
    }

    #[test]
    fn computes_remaining_places() {
        let formation: Formation = serde_json::from_value(json!({
            "id": 1,
            "nom": "BTS",
            "prevus_crif": 10,
            "prevus_mp": 2,
            "inscrits_crif": 8,
            "inscrits_mp": 6,
            "centre": {"id": 2, "nom": "Nord"},
            "saturation": 116.0
        }))
        .unwrap();
        assert_eq!(formation.total_inscrits(), 14);
        assert_eq!(formation.places_disponibles(), 0);
        assert_eq!(formation.saturation_level(), SaturationLevel::Full);
        assert_eq!(formation.centre_nom(), "Nord");
    }

    #[test]
    fn saturation_thresholds() {
        assert_eq!(SaturationLevel::from_rate(Some(10.0)), SaturationLevel::Low);
        assert_eq!(SaturationLevel::from_rate(Some(40.0)), SaturationLevel::Medium);
        assert_eq!(SaturationLevel::from_rate(Some(85.5)), SaturationLevel::High);
        assert_eq!(SaturationLevel::from_rate(Some(f64::NAN)), SaturationLevel::Unknown);
    }
}
