//! View models handed from services to templates.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::objectif::{ActivityModule, Objectif, Progress};
use crate::domain::types::NamedRef;
use crate::repository::errors::FieldErrors;
use crate::repository::filters::blank_as_none;
use crate::table::TableView;

/// List pages that keep a selection and preference flags in the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListPage {
    Formations,
    Commentaires,
    Documents,
    Declic,
    Prepa,
    DeclicObjectifs,
    PrepaObjectifs,
    Prospections,
}

impl ListPage {
    pub const ALL: [ListPage; 8] = [
        Self::Formations,
        Self::Commentaires,
        Self::Documents,
        Self::Declic,
        Self::Prepa,
        Self::DeclicObjectifs,
        Self::PrepaObjectifs,
        Self::Prospections,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Formations => "formations",
            Self::Commentaires => "commentaires",
            Self::Documents => "documents",
            Self::Declic => "declic",
            Self::Prepa => "prepa",
            Self::DeclicObjectifs => "declic_objectifs",
            Self::PrepaObjectifs => "prepa_objectifs",
            Self::Prospections => "prospections",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Formations => "Formations",
            Self::Commentaires => "Commentaires",
            Self::Documents => "Documents",
            Self::Declic => "Séances Déclic",
            Self::Prepa => "Séances Prépa",
            Self::DeclicObjectifs => "Objectifs Déclic",
            Self::PrepaObjectifs => "Objectifs Prépa",
            Self::Prospections => "Prospections",
        }
    }

    /// Path of the list page.
    pub fn path(self) -> &'static str {
        match self {
            Self::Formations => "/formations",
            Self::Commentaires => "/commentaires",
            Self::Documents => "/documents",
            Self::Declic => "/declic",
            Self::Prepa => "/prepa",
            Self::DeclicObjectifs => "/objectifs/declic",
            Self::PrepaObjectifs => "/objectifs/prepa",
            Self::Prospections => "/prospections",
        }
    }

    pub fn objectifs(module: ActivityModule) -> Self {
        match module {
            ActivityModule::Declic => Self::DeclicObjectifs,
            ActivityModule::Prepa => Self::PrepaObjectifs,
        }
    }

    pub fn selection_key(self) -> String {
        format!("selection.{}", self.as_str())
    }
}

impl fmt::Display for ListPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ListPage {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|page| page.as_str() == s)
            .ok_or(())
    }
}

/// Paging and display-sort parameters shared by every list page.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct ListParams {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub page: Option<usize>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub page_size: Option<usize>,
    /// Client-side sort, `field` or `-field`.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub sort: Option<String>,
}

/// Everything a list template needs.
#[derive(Debug, Serialize)]
pub struct ListPageData<F> {
    pub page: ListPage,
    pub title: &'static str,
    pub table: TableView,
    pub pages: Vec<Option<usize>>,
    pub current_page: usize,
    pub page_size: usize,
    pub total: usize,
    pub filters: F,
    pub active_filters: usize,
    pub sort: Option<String>,
    /// Filters encoded for pagination and sort links.
    pub filter_query: String,
}

/// Select options of the entity forms.
#[derive(Debug, Default, Serialize)]
pub struct FormOptions {
    pub centres: Vec<NamedRef>,
    pub statuts: Vec<NamedRef>,
    pub types_offre: Vec<NamedRef>,
}

/// Submitted values echoed back with their field errors.
#[derive(Debug, Serialize)]
pub struct FormPageData<V> {
    pub values: V,
    pub errors: FieldErrors,
    pub options: FormOptions,
}

/// One row of the per-centre statistics table.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct CentreStats {
    pub centre_id: Option<i64>,
    pub centre: String,
    pub sessions: usize,
    pub inscrits: u64,
    pub presents: u64,
    pub absents: u64,
    pub taux_presence: Option<f64>,
    pub adhesions: u64,
    pub realise: u64,
    pub progress: Option<Progress>,
}

#[derive(Debug, Serialize)]
pub struct StatsPageData {
    pub module: ActivityModule,
    pub annee: i32,
    pub rows: Vec<CentreStats>,
    pub totals: CentreStats,
    pub objectifs: Vec<Objectif>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_pages_round_trip_through_their_names() {
        for page in ListPage::ALL {
            assert_eq!(page.as_str().parse::<ListPage>(), Ok(page));
        }
        assert!("clients".parse::<ListPage>().is_err());
    }

    #[test]
    fn blank_list_params_are_ignored() {
        let params: ListParams =
            serde_html_form::from_str("page=&page_size=10&sort=-centre.nom").unwrap();
        assert_eq!(params.page, None);
        assert_eq!(params.page_size, Some(10));
        assert_eq!(params.sort.as_deref(), Some("-centre.nom"));
    }
}
