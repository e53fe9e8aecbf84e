use serde::Serialize;

use crate::columns::formation_columns;
use crate::domain::commentaire::Commentaire;
use crate::domain::document::Document;
use crate::domain::formation::{Formation, FormationPayload};
use crate::domain::types::FormationId;
use crate::dto::{FormOptions, ListPage, ListPageData, ListParams};
use crate::forms::formations::FormationForm;
use crate::pagination::PageRequest;
use crate::repository::filters::{CommentaireFilters, DocumentFilters, FormationFilters, ListQuery};
use crate::repository::{
    CommentaireReader, DocumentReader, FormationReader, FormationWriter, ReferenceReader,
};
use crate::selection::Selection;
use crate::services::{
    ListInput, ServiceError, ServiceResult, backend_failure, build_list_page, export_rows_from,
    page_request, validate_form,
};

fn formation_id(formation: &Formation) -> i64 {
    formation.id.get()
}

/// Loads one page of formations with the filters of the query string.
pub async fn load_formations_page<R>(
    repo: &R,
    params: &ListParams,
    filters: FormationFilters,
    page_size: usize,
    selection: &mut Selection,
) -> ServiceResult<ListPageData<FormationFilters>>
where
    R: FormationReader + ?Sized,
{
    let request = page_request(params, page_size);
    let query = ListQuery::new(filters.clone()).paginate(request);
    let envelope = repo
        .list_formations(&query)
        .await
        .map_err(backend_failure("list formations"))?;

    Ok(build_list_page(
        ListInput {
            page: ListPage::Formations,
            envelope,
            request,
            params,
            filters,
            columns: &formation_columns(),
            id: formation_id,
        },
        selection,
    ))
}

/// Rows of the current page to export, restricted to the selection.
pub async fn formations_for_export<R>(
    repo: &R,
    params: &ListParams,
    filters: FormationFilters,
    page_size: usize,
    selection: &Selection,
) -> ServiceResult<Vec<Formation>>
where
    R: FormationReader + ?Sized,
{
    let query = ListQuery::new(filters).paginate(page_request(params, page_size));
    let envelope = repo
        .list_formations(&query)
        .await
        .map_err(backend_failure("list formations for export"))?;
    Ok(export_rows_from(envelope, params, selection, formation_id))
}

/// Formation with its latest comments and its documents.
#[derive(Debug, Serialize)]
pub struct FormationDetail {
    pub formation: Formation,
    pub commentaires: Vec<Commentaire>,
    pub documents: Vec<Document>,
}

pub async fn load_formation_detail<R>(repo: &R, id: i64) -> ServiceResult<FormationDetail>
where
    R: FormationReader + CommentaireReader + DocumentReader + ?Sized,
{
    let formation = get_formation(repo, id).await?;
    let page = PageRequest::new(Some(1), Some(50));

    let commentaires = repo
        .list_commentaires(
            &ListQuery::new(CommentaireFilters {
                formation: Some(id),
                ordering: Some("-created_at".into()),
                ..CommentaireFilters::default()
            })
            .paginate(page),
        )
        .await
        .map_err(backend_failure("list formation comments"))?
        .results
        .into_iter()
        .map(|commentaire| Commentaire {
            contenu: commentaire.safe_html(),
            ..commentaire
        })
        .collect();

    let documents = repo
        .list_documents(
            &ListQuery::new(DocumentFilters {
                formation: Some(id),
                ..DocumentFilters::default()
            })
            .paginate(page),
        )
        .await
        .map_err(backend_failure("list formation documents"))?
        .results;

    Ok(FormationDetail {
        formation,
        commentaires,
        documents,
    })
}

pub async fn get_formation<R>(repo: &R, id: i64) -> ServiceResult<Formation>
where
    R: FormationReader + ?Sized,
{
    let id = FormationId::new(id)?;
    repo.get_formation(id)
        .await
        .map_err(backend_failure("get formation"))?
        .ok_or(ServiceError::NotFound)
}

/// Select options of the formation form. Lookup failures leave a list empty.
pub async fn load_form_options<R>(repo: &R) -> FormOptions
where
    R: ReferenceReader + ?Sized,
{
    let centres = repo.list_centres().await.unwrap_or_else(|err| {
        log::warn!("Failed to load centres: {err}");
        Vec::new()
    });
    let statuts = repo.list_statuts().await.unwrap_or_else(|err| {
        log::warn!("Failed to load statuts: {err}");
        Vec::new()
    });
    let types_offre = repo.list_types_offre().await.unwrap_or_else(|err| {
        log::warn!("Failed to load offer types: {err}");
        Vec::new()
    });

    FormOptions {
        centres,
        statuts,
        types_offre,
    }
}

pub async fn create_formation<R>(repo: &R, form: &FormationForm) -> ServiceResult<Formation>
where
    R: FormationWriter + ?Sized,
{
    validate_form(form)?;
    let payload = FormationPayload::from(form);
    repo.create_formation(&payload)
        .await
        .map_err(backend_failure("create formation"))
}

pub async fn update_formation<R>(repo: &R, id: i64, form: &FormationForm) -> ServiceResult<Formation>
where
    R: FormationWriter + ?Sized,
{
    validate_form(form)?;
    let id = FormationId::new(id)?;
    let payload = FormationPayload::from(form);
    repo.update_formation(id, &payload)
        .await
        .map_err(backend_failure("update formation"))
}

pub async fn delete_formation<R>(repo: &R, id: i64) -> ServiceResult<()>
where
    R: FormationWriter + ?Sized,
{
    let id = FormationId::new(id)?;
    repo.delete_formation(id)
        .await
        .map_err(backend_failure("delete formation"))
}
