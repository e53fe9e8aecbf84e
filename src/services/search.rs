use serde::Serialize;

use crate::domain::formation::Formation;
use crate::pagination::PageRequest;
use crate::repository::FormationReader;
use crate::repository::filters::{FormationFilters, ListQuery};
use crate::services::{ServiceResult, backend_failure};

/// Terms shorter than this return no suggestion.
pub const MIN_TERM_CHARS: usize = 2;
pub const MAX_SUGGESTIONS: usize = 10;

/// Formation suggestion returned by the JSON search endpoint.
#[derive(Debug, Serialize, PartialEq)]
pub struct FormationHit {
    pub id: i64,
    pub nom: String,
    pub num_offre: Option<String>,
    pub centre: String,
    pub label: String,
}

impl From<Formation> for FormationHit {
    fn from(formation: Formation) -> Self {
        let centre = formation.centre_nom();
        let label = match (&formation.num_offre, centre.is_empty()) {
            (Some(num), false) => format!("{} ({num}, {centre})", formation.nom),
            (Some(num), true) => format!("{} ({num})", formation.nom),
            (None, false) => format!("{} ({centre})", formation.nom),
            (None, true) => formation.nom.clone(),
        };
        Self {
            id: formation.id.get(),
            nom: formation.nom,
            num_offre: formation.num_offre,
            centre,
            label,
        }
    }
}

/// Formations matching `term`, used by autocomplete fields.
pub async fn search_formations<R>(repo: &R, term: &str) -> ServiceResult<Vec<FormationHit>>
where
    R: FormationReader + ?Sized,
{
    let term = term.trim();
    if term.chars().count() < MIN_TERM_CHARS {
        return Ok(Vec::new());
    }

    let query = ListQuery::new(FormationFilters {
        search: Some(term.to_string()),
        ..FormationFilters::default()
    })
    .paginate(PageRequest::new(Some(1), Some(MAX_SUGGESTIONS)));

    let envelope = repo
        .list_formations(&query)
        .await
        .map_err(backend_failure("search formations"))?;

    Ok(envelope
        .results
        .into_iter()
        .take(MAX_SUGGESTIONS)
        .map(FormationHit::from)
        .collect())
}
