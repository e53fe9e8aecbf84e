use crate::columns::prepa_columns;
use crate::domain::prepa::{Prepa, PrepaPayload};
use crate::domain::types::PrepaId;
use crate::dto::{ListPage, ListPageData, ListParams};
use crate::forms::prepa::PrepaForm;
use crate::repository::filters::{PrepaFilters, ListQuery};
use crate::repository::{PrepaReader, PrepaWriter};
use crate::selection::Selection;
use crate::services::{
    ListInput, ServiceError, ServiceResult, backend_failure, build_list_page, export_rows_from,
    page_request, validate_form,
};

fn prepa_id(prepa: &Prepa) -> i64 {
    prepa.id.get()
}

pub async fn load_prepa_page<R>(
    repo: &R,
    params: &ListParams,
    filters: PrepaFilters,
    page_size: usize,
    selection: &mut Selection,
) -> ServiceResult<ListPageData<PrepaFilters>>
where
    R: PrepaReader + ?Sized,
{
    let request = page_request(params, page_size);
    let query = ListQuery::new(filters.clone()).paginate(request);
    let envelope = repo
        .list_prepa(&query)
        .await
        .map_err(backend_failure("list prepa sessions"))?;

    Ok(build_list_page(
        ListInput {
            page: ListPage::Prepa,
            envelope,
            request,
            params,
            filters,
            columns: &prepa_columns(),
            id: prepa_id,
        },
        selection,
    ))
}

pub async fn prepa_for_export<R>(
    repo: &R,
    params: &ListParams,
    filters: PrepaFilters,
    page_size: usize,
    selection: &Selection,
) -> ServiceResult<Vec<Prepa>>
where
    R: PrepaReader + ?Sized,
{
    let query = ListQuery::new(filters).paginate(page_request(params, page_size));
    let envelope = repo
        .list_prepa(&query)
        .await
        .map_err(backend_failure("list prepa sessions for export"))?;
    Ok(export_rows_from(envelope, params, selection, prepa_id))
}

pub async fn get_prepa<R>(repo: &R, id: i64) -> ServiceResult<Prepa>
where
    R: PrepaReader + ?Sized,
{
    let id = PrepaId::new(id)?;
    repo.get_prepa(id)
        .await
        .map_err(backend_failure("get prepa session"))?
        .ok_or(ServiceError::NotFound)
}

/// Validates the form; the absent count sent is always recomputed.
fn payload(form: &PrepaForm) -> ServiceResult<PrepaPayload> {
    validate_form(form)?;
    Ok(PrepaPayload::try_from(form)?)
}

pub async fn create_prepa<R>(repo: &R, form: &PrepaForm) -> ServiceResult<Prepa>
where
    R: PrepaWriter + ?Sized,
{
    let payload = payload(form)?;
    repo.create_prepa(&payload)
        .await
        .map_err(backend_failure("create prepa session"))
}

pub async fn update_prepa<R>(repo: &R, id: i64, form: &PrepaForm) -> ServiceResult<Prepa>
where
    R: PrepaWriter + ?Sized,
{
    let id = PrepaId::new(id)?;
    let payload = payload(form)?;
    repo.update_prepa(id, &payload)
        .await
        .map_err(backend_failure("update prepa session"))
}

pub async fn delete_prepa<R>(repo: &R, id: i64) -> ServiceResult<()>
where
    R: PrepaWriter + ?Sized,
{
    let id = PrepaId::new(id)?;
    repo.delete_prepa(id)
        .await
        .map_err(backend_failure("delete prepa session"))
}
