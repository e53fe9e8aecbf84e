use serde::Serialize;

use crate::domain::types::NamedRef;
use crate::repository::errors::RepositoryResult;
use crate::repository::{HttpRepository, ReferenceReader};

#[derive(Clone, Debug, Default, Serialize)]
struct NoFilters {}

impl HttpRepository {
    async fn references(&self, path: &str) -> RepositoryResult<Vec<NamedRef>> {
        let mut items: Vec<NamedRef> = self.list_all(path, &NoFilters::default()).await?;
        items.sort_by_key(|r| r.display().to_lowercase());
        Ok(items)
    }
}

impl ReferenceReader for HttpRepository {
    async fn list_centres(&self) -> RepositoryResult<Vec<NamedRef>> {
        self.references("centres/").await
    }

    async fn list_statuts(&self) -> RepositoryResult<Vec<NamedRef>> {
        self.references("statuts/").await
    }

    async fn list_types_offre(&self) -> RepositoryResult<Vec<NamedRef>> {
        self.references("typeoffres/").await
    }
}
