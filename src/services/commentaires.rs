use crate::columns::commentaire_columns;
use crate::domain::commentaire::{Commentaire, NewCommentaire};
use crate::domain::types::{CommentaireId, FormationId};
use crate::dto::{ListPage, ListPageData, ListParams};
use crate::forms::commentaires::CommentaireForm;
use crate::repository::filters::{CommentaireFilters, ListQuery};
use crate::repository::{CommentaireReader, CommentaireWriter};
use crate::selection::Selection;
use crate::services::{
    ListInput, ServiceResult, backend_failure, build_list_page, export_rows_from, page_request,
    validate_form,
};

fn commentaire_id(commentaire: &Commentaire) -> i64 {
    commentaire.id.get()
}

pub async fn load_commentaires_page<R>(
    repo: &R,
    params: &ListParams,
    filters: CommentaireFilters,
    page_size: usize,
    selection: &mut Selection,
) -> ServiceResult<ListPageData<CommentaireFilters>>
where
    R: CommentaireReader + ?Sized,
{
    let request = page_request(params, page_size);
    let query = ListQuery::new(filters.clone()).paginate(request);
    let envelope = repo
        .list_commentaires(&query)
        .await
        .map_err(backend_failure("list comments"))?;

    Ok(build_list_page(
        ListInput {
            page: ListPage::Commentaires,
            envelope,
            request,
            params,
            filters,
            columns: &commentaire_columns(),
            id: commentaire_id,
        },
        selection,
    ))
}

pub async fn commentaires_for_export<R>(
    repo: &R,
    params: &ListParams,
    filters: CommentaireFilters,
    page_size: usize,
    selection: &Selection,
) -> ServiceResult<Vec<Commentaire>>
where
    R: CommentaireReader + ?Sized,
{
    let query = ListQuery::new(filters).paginate(page_request(params, page_size));
    let envelope = repo
        .list_commentaires(&query)
        .await
        .map_err(backend_failure("list comments for export"))?;
    Ok(export_rows_from(envelope, params, selection, commentaire_id))
}

/// Adds a comment to a formation. The HTML is sanitized before sending.
pub async fn add_commentaire<R>(repo: &R, form: &CommentaireForm) -> ServiceResult<Commentaire>
where
    R: CommentaireWriter + ?Sized,
{
    FormationId::new(form.formation_id)?;
    validate_form(form)?;
    repo.create_commentaire(&NewCommentaire::from(form))
        .await
        .map_err(backend_failure("create comment"))
}

pub async fn delete_commentaire<R>(repo: &R, id: i64) -> ServiceResult<()>
where
    R: CommentaireWriter + ?Sized,
{
    let id = CommentaireId::new(id)?;
    repo.delete_commentaire(id)
        .await
        .map_err(backend_failure("delete comment"))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::envelope::ListEnvelope;
    use crate::repository::mock::MockRepository;
    use crate::services::ServiceError;

    #[actix_web::test]
    async fn comment_is_sanitized_and_sent() {
        let mut repo = MockRepository::new();
        repo.expect_create_commentaire()
            .withf(|new| new.formation == 8 && new.contenu == "<b>Groupe complet</b>")
            .times(1)
            .returning(|new| {
                Ok(serde_json::from_value(json!({
                    "id": 30,
                    "formation": {"id": new.formation, "nom": "CAP Cuisine"},
                    "contenu": new.contenu,
                }))
                .unwrap())
            });
        let form = CommentaireForm {
            formation_id: 8,
            contenu: "<b>Groupe complet</b><script>x()</script>".into(),
        };

        let created = add_commentaire(&repo, &form).await.unwrap();

        assert_eq!(created.contenu, "<b>Groupe complet</b>");
        assert_eq!(created.formation.map(|f| f.id), Some(8));
    }

    #[actix_web::test]
    async fn blank_comment_is_rejected() {
        let mut repo = MockRepository::new();
        repo.expect_create_commentaire().times(0);
        let form = CommentaireForm {
            formation_id: 8,
            contenu: "<p><br></p>".into(),
        };

        let result = add_commentaire(&repo, &form).await;

        assert!(matches!(result, Err(ServiceError::Validation(ref f)) if f.contains_key("contenu")));
    }

    #[actix_web::test]
    async fn export_keeps_selected_rows() {
        let mut repo = MockRepository::new();
        repo.expect_list_commentaires().times(1).returning(|_| {
            Ok(ListEnvelope::from_items(vec![
                serde_json::from_value(json!({"id": 1, "contenu": "a"})).unwrap(),
                serde_json::from_value(json!({"id": 2, "contenu": "b"})).unwrap(),
            ]))
        });

        let rows = commentaires_for_export(
            &repo,
            &ListParams::default(),
            CommentaireFilters::default(),
            25,
            &Selection::from_ids([2]),
        )
        .await
        .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].contenu, "b");
    }

    #[actix_web::test]
    async fn delete_targets_the_comment() {
        let mut repo = MockRepository::new();
        repo.expect_delete_commentaire()
            .withf(|id| id.get() == 3)
            .times(1)
            .returning(|_| Ok(()));

        delete_commentaire(&repo, 3).await.unwrap();
    }
}
