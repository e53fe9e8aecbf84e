use reqwest::Method;

use crate::domain::prospection::{Prospection, ProspectionPayload};
use crate::domain::types::ProspectionId;
use crate::envelope::ListEnvelope;
use crate::repository::errors::RepositoryResult;
use crate::repository::filters::{ListQuery, ProspectionFilters};
use crate::repository::{HttpRepository, ProspectionReader, ProspectionWriter};

const PATH: &str = "prospections/";

fn detail(id: ProspectionId) -> String {
    format!("{PATH}{id}/")
}

impl ProspectionReader for HttpRepository {
    async fn list_prospections(
        &self,
        query: &ListQuery<ProspectionFilters>,
    ) -> RepositoryResult<ListEnvelope<Prospection>> {
        self.list(PATH, query).await
    }

    async fn get_prospection(&self, id: ProspectionId) -> RepositoryResult<Option<Prospection>> {
        self.get(&detail(id)).await
    }
}

impl ProspectionWriter for HttpRepository {
    async fn create_prospection(
        &self,
        payload: &ProspectionPayload,
    ) -> RepositoryResult<Prospection> {
        self.send_json(Method::POST, PATH, payload).await
    }

    async fn update_prospection(
        &self,
        id: ProspectionId,
        payload: &ProspectionPayload,
    ) -> RepositoryResult<Prospection> {
        self.send_json(Method::PATCH, &detail(id), payload).await
    }

    async fn delete_prospection(&self, id: ProspectionId) -> RepositoryResult<()> {
        self.delete(&detail(id)).await
    }
}
