use crate::columns::declic_columns;
use crate::domain::declic::{Declic, DeclicPayload};
use crate::domain::types::DeclicId;
use crate::dto::{ListPage, ListPageData, ListParams};
use crate::forms::declic::DeclicForm;
use crate::repository::filters::{DeclicFilters, ListQuery};
use crate::repository::{DeclicReader, DeclicWriter};
use crate::selection::Selection;
use crate::services::{
    ListInput, ServiceError, ServiceResult, backend_failure, build_list_page, export_rows_from,
    page_request, validate_form,
};

fn declic_id(declic: &Declic) -> i64 {
    declic.id.get()
}

pub async fn load_declic_page<R>(
    repo: &R,
    params: &ListParams,
    filters: DeclicFilters,
    page_size: usize,
    selection: &mut Selection,
) -> ServiceResult<ListPageData<DeclicFilters>>
where
    R: DeclicReader + ?Sized,
{
    let request = page_request(params, page_size);
    let query = ListQuery::new(filters.clone()).paginate(request);
    let envelope = repo
        .list_declic(&query)
        .await
        .map_err(backend_failure("list declic sessions"))?;

    Ok(build_list_page(
        ListInput {
            page: ListPage::Declic,
            envelope,
            request,
            params,
            filters,
            columns: &declic_columns(),
            id: declic_id,
        },
        selection,
    ))
}

pub async fn declic_for_export<R>(
    repo: &R,
    params: &ListParams,
    filters: DeclicFilters,
    page_size: usize,
    selection: &Selection,
) -> ServiceResult<Vec<Declic>>
where
    R: DeclicReader + ?Sized,
{
    let query = ListQuery::new(filters).paginate(page_request(params, page_size));
    let envelope = repo
        .list_declic(&query)
        .await
        .map_err(backend_failure("list declic sessions for export"))?;
    Ok(export_rows_from(envelope, params, selection, declic_id))
}

pub async fn get_declic<R>(repo: &R, id: i64) -> ServiceResult<Declic>
where
    R: DeclicReader + ?Sized,
{
    let id = DeclicId::new(id)?;
    repo.get_declic(id)
        .await
        .map_err(backend_failure("get declic session"))?
        .ok_or(ServiceError::NotFound)
}

/// Validates the form; the absent count sent is always recomputed.
fn payload(form: &DeclicForm) -> ServiceResult<DeclicPayload> {
    validate_form(form)?;
    Ok(DeclicPayload::try_from(form)?)
}

pub async fn create_declic<R>(repo: &R, form: &DeclicForm) -> ServiceResult<Declic>
where
    R: DeclicWriter + ?Sized,
{
    let payload = payload(form)?;
    repo.create_declic(&payload)
        .await
        .map_err(backend_failure("create declic session"))
}

pub async fn update_declic<R>(repo: &R, id: i64, form: &DeclicForm) -> ServiceResult<Declic>
where
    R: DeclicWriter + ?Sized,
{
    let id = DeclicId::new(id)?;
    let payload = payload(form)?;
    repo.update_declic(id, &payload)
        .await
        .map_err(backend_failure("update declic session"))
}

pub async fn delete_declic<R>(repo: &R, id: i64) -> ServiceResult<()>
where
    R: DeclicWriter + ?Sized,
{
    let id = DeclicId::new(id)?;
    repo.delete_declic(id)
        .await
        .map_err(backend_failure("delete declic session"))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use serde_json::json;

    use super::*;
    use crate::domain::declic::TypeDeclic;
    use crate::envelope::ListEnvelope;
    use crate::repository::mock::MockRepository;

    #[actix_web::test]
    async fn absents_are_recomputed_on_create() {
        let mut repo = MockRepository::new();
        repo.expect_create_declic()
            .withf(|payload| payload.nb_absents == 3 && payload.centre_id == 2)
            .times(1)
            .returning(|payload| {
                Ok(serde_json::from_value(json!({
                    "id": 17,
                    "type_declic": payload.type_declic,
                    "date_declic": payload.date_declic,
                    "centre": {"id": payload.centre_id, "nom": "Évry"},
                    "nb_inscrits": payload.nb_inscrits,
                    "nb_presents": payload.nb_presents,
                    "nb_absents": payload.nb_absents,
                }))
                .unwrap())
            });
        let form = DeclicForm {
            type_declic: Some(TypeDeclic::Atelier1),
            date_declic: NaiveDate::from_ymd_opt(2025, 3, 14),
            centre_id: Some(2),
            nb_inscrits: Some(12),
            nb_presents: Some(9),
            nb_absents: Some(40),
            commentaire: None,
        };

        let created = create_declic(&repo, &form).await.unwrap();

        assert_eq!(created.absents(), 3);
        assert_eq!(created.centre.map(|c| c.id), Some(2));
    }

    #[actix_web::test]
    async fn missing_required_fields_are_inline_errors() {
        let mut repo = MockRepository::new();
        repo.expect_create_declic().times(0);

        match create_declic(&repo, &DeclicForm::default()).await {
            Err(ServiceError::Validation(fields)) => {
                assert!(fields.contains_key("type_declic"));
                assert!(fields.contains_key("date_declic"));
                assert!(fields.contains_key("centre_id"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[actix_web::test]
    async fn list_page_shows_derived_columns() {
        let mut repo = MockRepository::new();
        repo.expect_list_declic().times(1).returning(|_| {
            Ok(ListEnvelope::from_items(vec![
                serde_json::from_value(json!({
                    "id": 1,
                    "type_declic": "atelier2",
                    "date_declic": "2025-02-01",
                    "nb_inscrits": 10,
                    "nb_presents": 7
                }))
                .unwrap(),
            ]))
        });

        let data = load_declic_page(
            &repo,
            &ListParams::default(),
            DeclicFilters::default(),
            25,
            &mut Selection::default(),
        )
        .await
        .unwrap();

        let cells = &data.table.rows[0].cells;
        assert_eq!(cells[0], "01/02/2025");
        assert_eq!(cells[5], "3");
    }
}
