use reqwest::Method;

use crate::domain::formation::{Formation, FormationPayload};
use crate::domain::types::FormationId;
use crate::envelope::ListEnvelope;
use crate::repository::errors::RepositoryResult;
use crate::repository::filters::{FormationFilters, ListQuery};
use crate::repository::{FormationReader, FormationWriter, HttpRepository};

const PATH: &str = "formations/";

fn detail(id: FormationId) -> String {
    format!("{PATH}{id}/")
}

impl FormationReader for HttpRepository {
    async fn list_formations(
        &self,
        query: &ListQuery<FormationFilters>,
    ) -> RepositoryResult<ListEnvelope<Formation>> {
        self.list(PATH, query).await
    }

    async fn get_formation(&self, id: FormationId) -> RepositoryResult<Option<Formation>> {
        self.get(&detail(id)).await
    }
}

impl FormationWriter for HttpRepository {
    async fn create_formation(&self, payload: &FormationPayload) -> RepositoryResult<Formation> {
        self.send_json(Method::POST, PATH, payload).await
    }

    async fn update_formation(
        &self,
        id: FormationId,
        payload: &FormationPayload,
    ) -> RepositoryResult<Formation> {
        self.send_json(Method::PATCH, &detail(id), payload).await
    }

    async fn delete_formation(&self, id: FormationId) -> RepositoryResult<()> {
        self.delete(&detail(id)).await
    }
}
