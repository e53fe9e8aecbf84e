use crate::columns::objectif_columns;
use crate::domain::objectif::{ActivityModule, Objectif, ObjectifPayload};
use crate::domain::types::ObjectifId;
use crate::dto::{ListPage, ListPageData, ListParams};
use crate::forms::objectifs::ObjectifForm;
use crate::repository::filters::{ListQuery, ObjectifFilters};
use crate::repository::{ObjectifReader, ObjectifWriter};
use crate::selection::Selection;
use crate::services::{
    ListInput, ServiceError, ServiceResult, backend_failure, build_list_page, page_request,
    validate_form,
};

fn objectif_id(objectif: &Objectif) -> i64 {
    objectif.id.get()
}

/// Objectives of one activity module, one page at a time.
pub async fn load_objectifs_page<R>(
    repo: &R,
    module: ActivityModule,
    params: &ListParams,
    filters: ObjectifFilters,
    page_size: usize,
    selection: &mut Selection,
) -> ServiceResult<ListPageData<ObjectifFilters>>
where
    R: ObjectifReader + ?Sized,
{
    let request = page_request(params, page_size);
    let query = ListQuery::new(filters.clone()).paginate(request);
    let envelope = repo
        .list_objectifs(module, &query)
        .await
        .map_err(backend_failure("list objectives"))?;

    Ok(build_list_page(
        ListInput {
            page: ListPage::objectifs(module),
            envelope,
            request,
            params,
            filters,
            columns: &objectif_columns(),
            id: objectif_id,
        },
        selection,
    ))
}

pub async fn get_objectif<R>(repo: &R, module: ActivityModule, id: i64) -> ServiceResult<Objectif>
where
    R: ObjectifReader + ?Sized,
{
    let id = ObjectifId::new(id)?;
    repo.get_objectif(module, id)
        .await
        .map_err(backend_failure("get objective"))?
        .ok_or(ServiceError::NotFound)
}

fn payload(form: &ObjectifForm) -> ServiceResult<ObjectifPayload> {
    validate_form(form)?;
    Ok(ObjectifPayload::try_from(form)?)
}

pub async fn create_objectif<R>(
    repo: &R,
    module: ActivityModule,
    form: &ObjectifForm,
) -> ServiceResult<Objectif>
where
    R: ObjectifWriter + ?Sized,
{
    let payload = payload(form)?;
    repo.create_objectif(module, &payload)
        .await
        .map_err(backend_failure("create objective"))
}

pub async fn update_objectif<R>(
    repo: &R,
    module: ActivityModule,
    id: i64,
    form: &ObjectifForm,
) -> ServiceResult<Objectif>
where
    R: ObjectifWriter + ?Sized,
{
    let id = ObjectifId::new(id)?;
    let payload = payload(form)?;
    repo.update_objectif(module, id, &payload)
        .await
        .map_err(backend_failure("update objective"))
}

pub async fn delete_objectif<R>(repo: &R, module: ActivityModule, id: i64) -> ServiceResult<()>
where
    R: ObjectifWriter + ?Sized,
{
    let id = ObjectifId::new(id)?;
    repo.delete_objectif(module, id)
        .await
        .map_err(backend_failure("delete objective"))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::envelope::ListEnvelope;
    use crate::repository::mock::MockRepository;

    #[actix_web::test]
    async fn modules_are_kept_apart() {
        let mut repo = MockRepository::new();
        repo.expect_list_objectifs()
            .withf(|module, _| *module == ActivityModule::Prepa)
            .times(1)
            .returning(|_, _| {
                Ok(ListEnvelope::from_items(vec![
                    serde_json::from_value(json!({"id": 1, "annee": 2025, "valeur_objectif": 40}))
                        .unwrap(),
                ]))
            });
        repo.expect_list_objectifs()
            .withf(|module, _| *module == ActivityModule::Declic)
            .times(1)
            .returning(|_, _| Ok(ListEnvelope::default()));

        let prepa = load_objectifs_page(
            &repo,
            ActivityModule::Prepa,
            &ListParams::default(),
            ObjectifFilters::default(),
            25,
            &mut Selection::default(),
        )
        .await
        .unwrap();
        let declic = load_objectifs_page(
            &repo,
            ActivityModule::Declic,
            &ListParams::default(),
            ObjectifFilters::default(),
            25,
            &mut Selection::default(),
        )
        .await
        .unwrap();

        assert_eq!(prepa.page, ListPage::PrepaObjectifs);
        assert_eq!(prepa.table.rows.len(), 1);
        assert!(declic.table.rows.is_empty());
    }

    #[actix_web::test]
    async fn create_targets_the_module_endpoint() {
        let mut repo = MockRepository::new();
        repo.expect_create_objectif()
            .withf(|module, payload| {
                *module == ActivityModule::Declic
                    && payload.centre_id == 4
                    && payload.annee.get() == 2026
                    && payload.valeur_objectif == 120
            })
            .times(1)
            .returning(|_, payload| {
                Ok(serde_json::from_value(json!({
                    "id": 2,
                    "centre": {"id": payload.centre_id, "nom": "Évry"},
                    "annee": payload.annee,
                    "valeur_objectif": payload.valeur_objectif,
                }))
                .unwrap())
            });
        let form = ObjectifForm {
            centre_id: Some(4),
            annee: Some(2026),
            valeur_objectif: Some(120),
            commentaire: None,
        };

        let created = create_objectif(&repo, ActivityModule::Declic, &form)
            .await
            .unwrap();

        assert_eq!(created.valeur_objectif, 120);
        assert_eq!(created.annee.get(), 2026);
    }

    #[actix_web::test]
    async fn out_of_range_year_is_rejected() {
        let mut repo = MockRepository::new();
        repo.expect_create_objectif().times(0);
        let form = ObjectifForm {
            centre_id: Some(4),
            annee: Some(1999),
            valeur_objectif: Some(10),
            commentaire: None,
        };

        let result = create_objectif(&repo, ActivityModule::Prepa, &form).await;

        assert!(matches!(result, Err(ServiceError::Validation(ref f)) if f.contains_key("annee")));
    }
}
