use reqwest::Method;

use crate::domain::prepa::{Prepa, PrepaPayload};
use crate::domain::types::PrepaId;
use crate::envelope::ListEnvelope;
use crate::repository::errors::RepositoryResult;
use crate::repository::filters::{ListQuery, PrepaFilters};
use crate::repository::{HttpRepository, PrepaReader, PrepaWriter};

const PATH: &str = "prepa/";

fn detail(id: PrepaId) -> String {
    format!("{PATH}{id}/")
}

impl PrepaReader for HttpRepository {
    async fn list_prepa(
        &self,
        query: &ListQuery<PrepaFilters>,
    ) -> RepositoryResult<ListEnvelope<Prepa>> {
        self.list(PATH, query).await
    }

    async fn list_all_prepa(&self, filters: &PrepaFilters) -> RepositoryResult<Vec<Prepa>> {
        self.list_all(PATH, filters).await
    }

    async fn get_prepa(&self, id: PrepaId) -> RepositoryResult<Option<Prepa>> {
        self.get(&detail(id)).await
    }
}

impl PrepaWriter for HttpRepository {
    async fn create_prepa(&self, payload: &PrepaPayload) -> RepositoryResult<Prepa> {
        self.send_json(Method::POST, PATH, payload).await
    }

    async fn update_prepa(
        &self,
        id: PrepaId,
        payload: &PrepaPayload,
    ) -> RepositoryResult<Prepa> {
        self.send_json(Method::PUT, &detail(id), payload).await
    }

    async fn delete_prepa(&self, id: PrepaId) -> RepositoryResult<()> {
        self.delete(&detail(id)).await
    }
}
