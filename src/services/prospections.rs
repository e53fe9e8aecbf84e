use crate::columns::prospection_columns;
use crate::domain::prospection::{Prospection, ProspectionPayload};
use crate::domain::types::{FormationId, ProspectionId};
use crate::dto::{ListPage, ListPageData, ListParams};
use crate::forms::prospections::ProspectionForm;
use crate::repository::filters::{ListQuery, ProspectionFilters};
use crate::repository::{ProspectionReader, ProspectionWriter};
use crate::selection::Selection;
use crate::services::{
    ListInput, ServiceError, ServiceResult, backend_failure, build_list_page, export_rows_from,
    page_request, validate_form,
};

fn prospection_id(prospection: &Prospection) -> i64 {
    prospection.id.get()
}

pub async fn load_prospections_page<R>(
    repo: &R,
    params: &ListParams,
    filters: ProspectionFilters,
    page_size: usize,
    selection: &mut Selection,
) -> ServiceResult<ListPageData<ProspectionFilters>>
where
    R: ProspectionReader + ?Sized,
{
    let request = page_request(params, page_size);
    let query = ListQuery::new(filters.clone()).paginate(request);
    let envelope = repo
        .list_prospections(&query)
        .await
        .map_err(backend_failure("list prospections"))?;

    Ok(build_list_page(
        ListInput {
            page: ListPage::Prospections,
            envelope,
            request,
            params,
            filters,
            columns: &prospection_columns(),
            id: prospection_id,
        },
        selection,
    ))
}

pub async fn prospections_for_export<R>(
    repo: &R,
    params: &ListParams,
    filters: ProspectionFilters,
    page_size: usize,
    selection: &Selection,
) -> ServiceResult<Vec<Prospection>>
where
    R: ProspectionReader + ?Sized,
{
    let query = ListQuery::new(filters).paginate(page_request(params, page_size));
    let envelope = repo
        .list_prospections(&query)
        .await
        .map_err(backend_failure("list prospections for export"))?;
    Ok(export_rows_from(envelope, params, selection, prospection_id))
}

pub async fn get_prospection<R>(repo: &R, id: i64) -> ServiceResult<Prospection>
where
    R: ProspectionReader + ?Sized,
{
    let id = ProspectionId::new(id)?;
    repo.get_prospection(id)
        .await
        .map_err(backend_failure("get prospection"))?
        .ok_or(ServiceError::NotFound)
}

fn payload(form: &ProspectionForm) -> ServiceResult<ProspectionPayload> {
    validate_form(form)?;
    let payload = ProspectionPayload::try_from(form)?;
    if let Some(formation) = payload.formation {
        FormationId::new(formation)?;
    }
    Ok(payload)
}

pub async fn create_prospection<R>(repo: &R, form: &ProspectionForm) -> ServiceResult<Prospection>
where
    R: ProspectionWriter + ?Sized,
{
    let payload = payload(form)?;
    repo.create_prospection(&payload)
        .await
        .map_err(backend_failure("create prospection"))
}

pub async fn update_prospection<R>(
    repo: &R,
    id: i64,
    form: &ProspectionForm,
) -> ServiceResult<Prospection>
where
    R: ProspectionWriter + ?Sized,
{
    let id = ProspectionId::new(id)?;
    let payload = payload(form)?;
    repo.update_prospection(id, &payload)
        .await
        .map_err(backend_failure("update prospection"))
}

pub async fn delete_prospection<R>(repo: &R, id: i64) -> ServiceResult<()>
where
    R: ProspectionWriter + ?Sized,
{
    let id = ProspectionId::new(id)?;
    repo.delete_prospection(id)
        .await
        .map_err(backend_failure("delete prospection"))
}
