//! One explicit filter set per list page.
//!
//! Filters are read from the page query string (blank inputs mean "no
//! filter") and forwarded to the backend as query parameters.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::domain::declic::TypeDeclic;
use crate::domain::document::TypeDocument;
use crate::domain::prepa::TypePrepa;
use crate::domain::prospection::{ObjectifProspection, StatutProspection};
use crate::pagination::PageRequest;

/// Treats blank query values as missing and parses the rest as `T`.
pub fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    let Some(raw) = raw.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    serde_json::from_value(Value::String(raw.clone()))
        .or_else(|_| serde_json::from_str(&raw))
        .map(Some)
        .map_err(|_| serde::de::Error::custom(format!("invalid filter value `{raw}`")))
}

/// Common behaviour of page filter sets.
pub trait ListFilters: Serialize {
    /// Number of filters currently applied, `ordering` and `search` excluded.
    fn active_count(&self) -> usize {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map
                .iter()
                .filter(|(key, value)| {
                    !value.is_null() && key.as_str() != "ordering" && key.as_str() != "search"
                })
                .count(),
            _ => 0,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FormationFilters {
    #[serde(default, deserialize_with = "blank_as_none", skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none", skip_serializing_if = "Option::is_none")]
    pub centre: Option<i64>,
    #[serde(default, deserialize_with = "blank_as_none", skip_serializing_if = "Option::is_none")]
    pub statut: Option<i64>,
    #[serde(default, deserialize_with = "blank_as_none", skip_serializing_if = "Option::is_none")]
    pub type_offre: Option<i64>,
    #[serde(default, deserialize_with = "blank_as_none", skip_serializing_if = "Option::is_none")]
    pub annee: Option<i32>,
    #[serde(default, deserialize_with = "blank_as_none", skip_serializing_if = "Option::is_none")]
    pub ordering: Option<String>,
}

impl ListFilters for FormationFilters {}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CommentaireFilters {
    #[serde(default, deserialize_with = "blank_as_none", skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none", skip_serializing_if = "Option::is_none")]
    pub formation: Option<i64>,
    #[serde(default, deserialize_with = "blank_as_none", skip_serializing_if = "Option::is_none")]
    pub centre: Option<i64>,
    #[serde(default, deserialize_with = "blank_as_none", skip_serializing_if = "Option::is_none")]
    pub auteur: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none", skip_serializing_if = "Option::is_none")]
    pub ordering: Option<String>,
}

impl ListFilters for CommentaireFilters {}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentFilters {
    #[serde(default, deserialize_with = "blank_as_none", skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none", skip_serializing_if = "Option::is_none")]
    pub formation: Option<i64>,
    #[serde(default, deserialize_with = "blank_as_none", skip_serializing_if = "Option::is_none")]
    pub type_document: Option<TypeDocument>,
    #[serde(default, deserialize_with = "blank_as_none", skip_serializing_if = "Option::is_none")]
    pub ordering: Option<String>,
}

impl ListFilters for DocumentFilters {}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DeclicFilters {
    #[serde(default, deserialize_with = "blank_as_none", skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none", skip_serializing_if = "Option::is_none")]
    pub centre: Option<i64>,
    #[serde(default, deserialize_with = "blank_as_none", skip_serializing_if = "Option::is_none")]
    pub type_declic: Option<TypeDeclic>,
    #[serde(default, deserialize_with = "blank_as_none", skip_serializing_if = "Option::is_none")]
    pub annee: Option<i32>,
    #[serde(default, deserialize_with = "blank_as_none", skip_serializing_if = "Option::is_none")]
    pub ordering: Option<String>,
}

impl ListFilters for DeclicFilters {}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PrepaFilters {
    #[serde(default, deserialize_with = "blank_as_none", skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none", skip_serializing_if = "Option::is_none")]
    pub centre: Option<i64>,
    #[serde(default, deserialize_with = "blank_as_none", skip_serializing_if = "Option::is_none")]
    pub type_prepa: Option<TypePrepa>,
    #[serde(default, deserialize_with = "blank_as_none", skip_serializing_if = "Option::is_none")]
    pub annee: Option<i32>,
    #[serde(default, deserialize_with = "blank_as_none", skip_serializing_if = "Option::is_none")]
    pub ordering: Option<String>,
}

impl ListFilters for PrepaFilters {}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectifFilters {
    #[serde(default, deserialize_with = "blank_as_none", skip_serializing_if = "Option::is_none")]
    pub centre: Option<i64>,
    #[serde(default, deserialize_with = "blank_as_none", skip_serializing_if = "Option::is_none")]
    pub annee: Option<i32>,
    #[serde(default, deserialize_with = "blank_as_none", skip_serializing_if = "Option::is_none")]
    pub ordering: Option<String>,
}

impl ListFilters for ObjectifFilters {}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProspectionFilters {
    #[serde(default, deserialize_with = "blank_as_none", skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none", skip_serializing_if = "Option::is_none")]
    pub formation: Option<i64>,
    #[serde(default, deserialize_with = "blank_as_none", skip_serializing_if = "Option::is_none")]
    pub statut: Option<StatutProspection>,
    #[serde(default, deserialize_with = "blank_as_none", skip_serializing_if = "Option::is_none")]
    pub objectif: Option<ObjectifProspection>,
    #[serde(default, deserialize_with = "blank_as_none", skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none", skip_serializing_if = "Option::is_none")]
    pub ordering: Option<String>,
}

impl ListFilters for ProspectionFilters {}

/// Filters plus the requested page.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ListQuery<F> {
    pub filters: F,
    pub page: PageRequest,
}

impl<F> ListQuery<F> {
    pub fn new(filters: F) -> Self {
        Self {
            filters,
            page: PageRequest::default(),
        }
    }

    pub fn paginate(mut self, page: PageRequest) -> Self {
        self.page = page;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_values_are_ignored() {
        let filters: FormationFilters =
            serde_json::from_value(serde_json::json!({"search": "  ", "centre": "", "annee": "2025"}))
                .unwrap();
        assert_eq!(filters.search, None);
        assert_eq!(filters.centre, None);
        assert_eq!(filters.annee, Some(2025));
        assert_eq!(filters.active_count(), 1);
    }

    #[test]
    fn enum_filters_parse_backend_codes() {
        let filters: DeclicFilters =
            serde_json::from_value(serde_json::json!({"type_declic": "atelier3"})).unwrap();
        assert_eq!(filters.type_declic, Some(TypeDeclic::Atelier3));
    }

    #[test]
    fn invalid_numbers_are_rejected() {
        let result: Result<FormationFilters, _> =
            serde_json::from_value(serde_json::json!({"centre": "abc"}));
        assert!(result.is_err());
    }

    #[test]
    fn serialization_skips_missing_filters() {
        let filters = ProspectionFilters {
            statut: Some(StatutProspection::EnCours),
            search: Some("boulangerie".into()),
            ..ProspectionFilters::default()
        };
        let value = serde_json::to_value(&filters).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"search": "boulangerie", "statut": "en_cours"})
        );
        assert_eq!(filters.active_count(), 1);
    }
}
