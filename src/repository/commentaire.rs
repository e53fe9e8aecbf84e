use reqwest::Method;

use crate::domain::commentaire::{Commentaire, NewCommentaire};
use crate::domain::types::CommentaireId;
use crate::envelope::ListEnvelope;
use crate::repository::errors::RepositoryResult;
use crate::repository::filters::{CommentaireFilters, ListQuery};
use crate::repository::{CommentaireReader, CommentaireWriter, HttpRepository};

const PATH: &str = "commentaires/";

impl CommentaireReader for HttpRepository {
    async fn list_commentaires(
        &self,
        query: &ListQuery<CommentaireFilters>,
    ) -> RepositoryResult<ListEnvelope<Commentaire>> {
        self.list(PATH, query).await
    }
}

impl CommentaireWriter for HttpRepository {
    async fn create_commentaire(&self, new: &NewCommentaire) -> RepositoryResult<Commentaire> {
        self.send_json(Method::POST, PATH, new).await
    }

    async fn delete_commentaire(&self, id: CommentaireId) -> RepositoryResult<()> {
        self.delete(&format!("{PATH}{id}/")).await
    }
}
