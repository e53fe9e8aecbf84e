use reqwest::Method;

use crate::domain::objectif::{ActivityModule, Objectif, ObjectifPayload};
use crate::domain::types::ObjectifId;
use crate::envelope::ListEnvelope;
use crate::repository::errors::RepositoryResult;
use crate::repository::filters::{ListQuery, ObjectifFilters};
use crate::repository::{HttpRepository, ObjectifReader, ObjectifWriter};

/// Collection endpoint of a module's objectives.
pub fn objectifs_path(module: ActivityModule) -> &'static str {
    match module {
        ActivityModule::Declic => "declic-objectifs/",
        ActivityModule::Prepa => "prepa-objectifs/",
    }
}

fn detail(module: ActivityModule, id: ObjectifId) -> String {
    format!("{}{id}/", objectifs_path(module))
}

impl ObjectifReader for HttpRepository {
    async fn list_objectifs(
        &self,
        module: ActivityModule,
        query: &ListQuery<ObjectifFilters>,
    ) -> RepositoryResult<ListEnvelope<Objectif>> {
        self.list(objectifs_path(module), query).await
    }

    async fn list_all_objectifs(
        &self,
        module: ActivityModule,
        filters: &ObjectifFilters,
    ) -> RepositoryResult<Vec<Objectif>> {
        self.list_all(objectifs_path(module), filters).await
    }

    async fn get_objectif(
        &self,
        module: ActivityModule,
        id: ObjectifId,
    ) -> RepositoryResult<Option<Objectif>> {
        self.get(&detail(module, id)).await
    }
}

impl ObjectifWriter for HttpRepository {
    async fn create_objectif(
        &self,
        module: ActivityModule,
        payload: &ObjectifPayload,
    ) -> RepositoryResult<Objectif> {
        self.send_json(Method::POST, objectifs_path(module), payload)
            .await
    }

    async fn update_objectif(
        &self,
        module: ActivityModule,
        id: ObjectifId,
        payload: &ObjectifPayload,
    ) -> RepositoryResult<Objectif> {
        self.send_json(Method::PUT, &detail(module, id), payload)
            .await
    }

    async fn delete_objectif(
        &self,
        module: ActivityModule,
        id: ObjectifId,
    ) -> RepositoryResult<()> {
        self.delete(&detail(module, id)).await
    }
}
