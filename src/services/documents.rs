use crate::columns::document_columns;
use crate::domain::document::{Document, DownloadedFile, NewDocument};
use crate::domain::types::{DocumentId, FormationId};
use crate::dto::{ListPage, ListPageData, ListParams};
use crate::forms::documents::DocumentUploadForm;
use crate::repository::filters::{DocumentFilters, ListQuery};
use crate::repository::{DocumentReader, DocumentWriter};
use crate::selection::Selection;
use crate::services::{ListInput, ServiceResult, backend_failure, build_list_page, page_request};

fn document_id(document: &Document) -> i64 {
    document.id.get()
}

pub async fn load_documents_page<R>(
    repo: &R,
    params: &ListParams,
    filters: DocumentFilters,
    page_size: usize,
    selection: &mut Selection,
) -> ServiceResult<ListPageData<DocumentFilters>>
where
    R: DocumentReader + ?Sized,
{
    let request = page_request(params, page_size);
    let query = ListQuery::new(filters.clone()).paginate(request);
    let envelope = repo
        .list_documents(&query)
        .await
        .map_err(backend_failure("list documents"))?;

    Ok(build_list_page(
        ListInput {
            page: ListPage::Documents,
            envelope,
            request,
            params,
            filters,
            columns: &document_columns(),
            id: document_id,
        },
        selection,
    ))
}

/// Sends an uploaded file to the backend, attached to its formation.
pub async fn upload_document<R>(repo: &R, form: DocumentUploadForm) -> ServiceResult<Document>
where
    R: DocumentWriter + ?Sized,
{
    let new = NewDocument::try_from(form).inspect_err(|err| {
        log::warn!("Rejected document upload: {err}");
    })?;
    FormationId::new(new.formation)?;

    log::info!(
        "Uploading `{}` ({} bytes) for formation {}",
        new.nom_fichier,
        new.contenu.len(),
        new.formation
    );
    repo.upload_document(new)
        .await
        .map_err(backend_failure("upload document"))
}

pub async fn download_document<R>(repo: &R, id: i64) -> ServiceResult<DownloadedFile>
where
    R: DocumentReader + ?Sized,
{
    let id = DocumentId::new(id)?;
    repo.download_document(id)
        .await
        .map_err(backend_failure("download document"))
}

pub async fn delete_document<R>(repo: &R, id: i64) -> ServiceResult<()>
where
    R: DocumentWriter + ?Sized,
{
    let id = DocumentId::new(id)?;
    repo.delete_document(id)
        .await
        .map_err(backend_failure("delete document"))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::envelope::ListEnvelope;
    use crate::repository::errors::RepositoryError;
    use crate::repository::mock::MockRepository;
    use crate::services::ServiceError;

    fn document(id: i64, nom: &str) -> Document {
        serde_json::from_value(json!({"id": id, "nom_fichier": nom, "type_document": "contrat"}))
            .unwrap()
    }

    #[actix_web::test]
    async fn list_page_uses_document_columns() {
        let mut repo = MockRepository::new();
        repo.expect_list_documents()
            .times(1)
            .returning(|_| Ok(ListEnvelope::from_items(vec![document(4, "convention.pdf")])));

        let data = load_documents_page(
            &repo,
            &ListParams::default(),
            DocumentFilters::default(),
            25,
            &mut Selection::default(),
        )
        .await
        .unwrap();

        assert_eq!(data.title, "Documents");
        assert_eq!(data.table.rows[0].id, 4);
        assert!(data.table.rows[0].cells.contains(&"convention.pdf".to_string()));
    }

    #[actix_web::test]
    async fn download_returns_backend_file() {
        let mut repo = MockRepository::new();
        repo.expect_download_document()
            .withf(|id| id.get() == 4)
            .returning(|_| {
                Ok(DownloadedFile {
                    filename: "convention.pdf".into(),
                    content_type: "application/pdf".into(),
                    bytes: b"%PDF".to_vec(),
                })
            });
        repo.expect_download_document()
            .withf(|id| id.get() == 5)
            .returning(|_| Err(RepositoryError::NotFound));

        let file = download_document(&repo, 4).await.unwrap();
        assert_eq!(file.filename, "convention.pdf");

        assert!(matches!(
            download_document(&repo, 5).await,
            Err(ServiceError::NotFound)
        ));
    }

    #[actix_web::test]
    async fn delete_rejects_invalid_ids() {
        let mut repo = MockRepository::new();
        repo.expect_delete_document().times(0);

        assert!(matches!(
            delete_document(&repo, -1).await,
            Err(ServiceError::TypeConstraint(_))
        ));
    }
}
