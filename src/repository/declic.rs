use reqwest::Method;

use crate::domain::declic::{Declic, DeclicPayload};
use crate::domain::types::DeclicId;
use crate::envelope::ListEnvelope;
use crate::repository::errors::RepositoryResult;
use crate::repository::filters::{DeclicFilters, ListQuery};
use crate::repository::{DeclicReader, DeclicWriter, HttpRepository};

const PATH: &str = "declic/";

fn detail(id: DeclicId) -> String {
    format!("{PATH}{id}/")
}

impl DeclicReader for HttpRepository {
    async fn list_declic(
        &self,
        query: &ListQuery<DeclicFilters>,
    ) -> RepositoryResult<ListEnvelope<Declic>> {
        self.list(PATH, query).await
    }

    async fn list_all_declic(&self, filters: &DeclicFilters) -> RepositoryResult<Vec<Declic>> {
        self.list_all(PATH, filters).await
    }

    async fn get_declic(&self, id: DeclicId) -> RepositoryResult<Option<Declic>> {
        self.get(&detail(id)).await
    }
}

impl DeclicWriter for HttpRepository {
    async fn create_declic(&self, payload: &DeclicPayload) -> RepositoryResult<Declic> {
        self.send_json(Method::POST, PATH, payload).await
    }

    async fn update_declic(
        &self,
        id: DeclicId,
        payload: &DeclicPayload,
    ) -> RepositoryResult<Declic> {
        self.send_json(Method::PUT, &detail(id), payload).await
    }

    async fn delete_declic(&self, id: DeclicId) -> RepositoryResult<()> {
        self.delete(&detail(id)).await
    }
}
