use reqwest::multipart::{Form, Part};

use crate::domain::document::{Document, DownloadedFile, NewDocument};
use crate::domain::types::DocumentId;
use crate::envelope::ListEnvelope;
use crate::repository::errors::RepositoryResult;
use crate::repository::filters::{DocumentFilters, ListQuery};
use crate::repository::{DocumentReader, DocumentWriter, HttpRepository};

const PATH: &str = "documents/";

impl DocumentReader for HttpRepository {
    async fn list_documents(
        &self,
        query: &ListQuery<DocumentFilters>,
    ) -> RepositoryResult<ListEnvelope<Document>> {
        self.list(PATH, query).await
    }

    async fn download_document(&self, id: DocumentId) -> RepositoryResult<DownloadedFile> {
        self.download(&format!("{PATH}{id}/download/"), &format!("document_{id}"))
            .await
    }
}

impl DocumentWriter for HttpRepository {
    async fn upload_document(&self, new: NewDocument) -> RepositoryResult<Document> {
        let mut part = Part::bytes(new.contenu).file_name(new.nom_fichier.clone());
        if let Some(content_type) = new.content_type.as_deref() {
            part = part.mime_str(content_type)?;
        }

        let form = Form::new()
            .text("formation", new.formation.to_string())
            .text("nom_fichier", new.nom_fichier)
            .text("type_document", new.type_document.as_str())
            .part("fichier", part);

        self.post_multipart(PATH, form).await
    }

    async fn delete_document(&self, id: DocumentId) -> RepositoryResult<()> {
        self.delete(&format!("{PATH}{id}/")).await
    }
}
