use actix_web::web;
use chrono::Local;
use serde::Serialize;
use thiserror::Error;
use validator::Validate;

use crate::columns::Column;
use crate::dto::{ListPage, ListPageData, ListParams};
use crate::envelope::ListEnvelope;
use crate::export::{ExportError, ExportFile, ExportFormat, export_rows};
use crate::forms::FormError;
use crate::pagination::{PageRequest, Paginated};
use crate::repository::errors::{FieldErrors, RepositoryError, join_field_errors};
use crate::repository::filters::ListFilters;
use crate::selection::Selection;
use crate::table::{SortSpec, TableView, sort_records};

pub mod commentaires;
pub mod declic;
pub mod documents;
pub mod formations;
pub mod objectifs;
pub mod prepa;
pub mod prospections;
pub mod search;
pub mod stats;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("not found")]
    NotFound,

    #[error("form error: {0}")]
    Form(String),

    #[error("validation error: {}", join_field_errors(.0))]
    Validation(FieldErrors),

    #[error("type constraint violated: {0}")]
    TypeConstraint(String),

    #[error("nothing to export")]
    EmptyExport,

    #[error("export failed: {0}")]
    Export(ExportError),

    #[error(transparent)]
    Backend(RepositoryError),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => ServiceError::NotFound,
            RepositoryError::ValidationError(fields) => ServiceError::Validation(fields),
            other => ServiceError::Backend(other),
        }
    }
}

impl From<ExportError> for ServiceError {
    fn from(err: ExportError) -> Self {
        match err {
            ExportError::Empty => ServiceError::EmptyExport,
            other => ServiceError::Export(other),
        }
    }
}

impl ServiceError {
    /// French message shown in a flash notification.
    pub fn user_message(&self) -> String {
        match self {
            ServiceError::NotFound => "Élément introuvable.".to_string(),
            ServiceError::Form(message) => message.clone(),
            ServiceError::Validation(fields) => {
                format!("Formulaire invalide : {}", join_field_errors(fields))
            }
            ServiceError::TypeConstraint(message) => format!("Valeur invalide : {message}"),
            ServiceError::EmptyExport => "Aucune ligne à exporter.".to_string(),
            ServiceError::Export(_) => "La génération du fichier a échoué.".to_string(),
            ServiceError::Backend(err) => err.user_message(),
            ServiceError::Internal(_) => "Erreur interne.".to_string(),
        }
    }
}

/// Logs a failed backend call and turns it into a service error.
pub(crate) fn backend_failure(action: &str) -> impl FnOnce(RepositoryError) -> ServiceError + '_ {
    move |err| {
        log::error!("Failed to {action}: {err}");
        ServiceError::from(err)
    }
}

/// Rows, sort and selection of one list page.
pub(crate) struct ListInput<'a, T, F> {
    pub page: ListPage,
    pub envelope: ListEnvelope<T>,
    pub request: PageRequest,
    pub params: &'a ListParams,
    pub filters: F,
    pub columns: &'a [Column<T>],
    pub id: fn(&T) -> i64,
}

/// Builds the view model of a list page.
///
/// The selection is pruned to the rows now visible before the table is built.
pub(crate) fn build_list_page<T, F>(
    input: ListInput<'_, T, F>,
    selection: &mut Selection,
) -> ListPageData<F>
where
    T: Serialize,
    F: ListFilters,
{
    let ListInput {
        page,
        envelope,
        request,
        params,
        filters,
        columns,
        id,
    } = input;

    let sort = params.sort.as_deref().and_then(SortSpec::parse);
    let paginated = Paginated::from_envelope(envelope, request);
    let items = match &sort {
        Some(spec) => sort_records(paginated.items, spec),
        None => paginated.items,
    };

    let visible: Vec<i64> = items.iter().map(id).collect();
    selection.prune(&visible);

    let table = TableView::build(&items, columns, id, selection, sort.as_ref());
    let filter_query = serde_html_form::to_string(&filters).unwrap_or_default();

    ListPageData {
        page,
        title: page.title(),
        table,
        pages: paginated.pages,
        current_page: paginated.page,
        page_size: request.page_size,
        total: paginated.total,
        active_filters: filters.active_count(),
        filters,
        sort: sort.map(|s| s.to_param()),
        filter_query,
    }
}

/// Page request from the list parameters, falling back to the configured size.
pub(crate) fn page_request(params: &ListParams, default_size: usize) -> PageRequest {
    PageRequest::new(params.page, params.page_size.or(Some(default_size)))
}

/// Runs the form validators, logging and converting failures.
pub(crate) fn validate_form<F: Validate>(form: &F) -> ServiceResult<()> {
    form.validate().map_err(|err| {
        log::warn!("Failed to validate form: {err}");
        ServiceError::from(FormError::from(err))
    })
}

/// Rows of the exported page in display order, restricted to the selection.
pub(crate) fn export_rows_from<T: Serialize>(
    envelope: ListEnvelope<T>,
    params: &ListParams,
    selection: &Selection,
    id: fn(&T) -> i64,
) -> Vec<T> {
    let rows = match params.sort.as_deref().and_then(SortSpec::parse) {
        Some(spec) => sort_records(envelope.results, &spec),
        None => envelope.results,
    };
    rows_for_export(rows, selection, id)
}

/// Rows to export: the selected ones when a selection exists, else all.
pub fn rows_for_export<T>(rows: Vec<T>, selection: &Selection, id: fn(&T) -> i64) -> Vec<T> {
    if selection.is_empty() {
        return rows;
    }
    rows.into_iter()
        .filter(|row| selection.contains(id(row)))
        .collect()
}

/// Renders the export file on the blocking thread pool.
pub async fn export_file<T>(
    rows: Vec<T>,
    columns: Vec<Column<T>>,
    format: ExportFormat,
    base: &'static str,
) -> ServiceResult<ExportFile>
where
    T: Send + 'static,
{
    let today = Local::now().date_naive();
    let result = web::block(move || export_rows(&rows, &columns, format, base, today))
        .await
        .map_err(|err| {
            log::error!("Export task failed: {err}");
            ServiceError::Internal(err.to_string())
        })?;

    result.map_err(|err| {
        if !matches!(err, ExportError::Empty) {
            log::error!("Failed to export {base}: {err}");
        }
        ServiceError::from(err)
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::columns::formation_columns;
    use crate::domain::formation::Formation;
    use crate::repository::filters::FormationFilters;

    fn formation(id: i64, nom: &str) -> Formation {
        serde_json::from_value(json!({"id": id, "nom": nom})).unwrap()
    }

    fn formation_id(f: &Formation) -> i64 {
        f.id.get()
    }

    #[test]
    fn list_page_prunes_selection_and_sorts_rows() {
        let envelope = ListEnvelope {
            count: 60,
            next: Some("http://api/formations/?page=2".into()),
            previous: None,
            results: vec![formation(1, "Élagage"), formation(2, "cuisine"), formation(3, "Boulangerie")],
        };
        let params = ListParams {
            sort: Some("nom".into()),
            ..ListParams::default()
        };
        let columns = formation_columns();
        let mut selection = Selection::from_ids([2, 9]);

        let data = build_list_page(
            ListInput {
                page: ListPage::Formations,
                envelope,
                request: PageRequest::new(Some(1), Some(25)),
                params: &params,
                filters: FormationFilters {
                    centre: Some(4),
                    ..FormationFilters::default()
                },
                columns: &columns,
                id: formation_id,
            },
            &mut selection,
        );

        let ids: Vec<i64> = data.table.rows.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
        assert_eq!(selection, Selection::from_ids([2]));
        assert_eq!(data.table.selected_count, 1);
        assert_eq!(data.total, 60);
        assert_eq!(data.pages, vec![Some(1), Some(2), Some(3)]);
        assert_eq!(data.active_filters, 1);
        assert_eq!(data.filter_query, "centre=4");
        assert_eq!(data.sort.as_deref(), Some("nom"));
    }

    #[test]
    fn export_rows_prefer_the_selection() {
        let rows = vec![formation(1, "A"), formation(2, "B"), formation(3, "C")];
        let picked = rows_for_export(rows.clone(), &Selection::from_ids([3]), formation_id);
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].nom, "C");
        assert_eq!(rows_for_export(rows, &Selection::default(), formation_id).len(), 3);
    }

    #[actix_web::test]
    async fn exports_run_off_the_request_thread() {
        let file = export_file(
            vec![formation(1, "CAP")],
            formation_columns(),
            ExportFormat::Csv,
            "formations",
        )
        .await
        .unwrap();
        assert!(file.filename.starts_with("formations_"));
        assert!(file.filename.ends_with(".csv"));

        let empty = export_file(
            Vec::<Formation>::new(),
            formation_columns(),
            ExportFormat::Csv,
            "formations",
        )
        .await;
        assert!(matches!(empty, Err(ServiceError::EmptyExport)));
    }

    #[test]
    fn repository_errors_map_to_service_errors() {
        assert!(matches!(
            ServiceError::from(RepositoryError::NotFound),
            ServiceError::NotFound
        ));
        let err = ServiceError::from(RepositoryError::from_response(
            502,
            &json!({"detail": "Passerelle indisponible"}),
        ));
        assert_eq!(err.user_message(), "Passerelle indisponible");
        assert!(matches!(
            ServiceError::from(ExportError::Empty),
            ServiceError::EmptyExport
        ));
    }
}
