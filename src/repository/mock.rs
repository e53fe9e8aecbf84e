//! Mock repository implementations for isolating services in tests.

use mockall::mock;

use crate::domain::commentaire::{Commentaire, NewCommentaire};
use crate::domain::declic::{Declic, DeclicPayload};
use crate::domain::document::{Document, DownloadedFile, NewDocument};
use crate::domain::formation::{Formation, FormationPayload};
use crate::domain::objectif::{ActivityModule, Objectif, ObjectifPayload};
use crate::domain::prepa::{Prepa, PrepaPayload};
use crate::domain::prospection::{Prospection, ProspectionPayload};
use crate::domain::types::{
    CommentaireId, DeclicId, DocumentId, FormationId, NamedRef, ObjectifId, PrepaId,
    ProspectionId,
};
use crate::envelope::ListEnvelope;
use crate::repository::errors::RepositoryResult;
use crate::repository::filters::{
    CommentaireFilters, DeclicFilters, DocumentFilters, FormationFilters, ListQuery,
    ObjectifFilters, PrepaFilters, ProspectionFilters,
};
use crate::repository::{
    CommentaireReader, CommentaireWriter, DeclicReader, DeclicWriter, DocumentReader,
    DocumentWriter, FormationReader, FormationWriter, ObjectifReader, ObjectifWriter,
    PrepaReader, PrepaWriter, ProspectionReader, ProspectionWriter, ReferenceReader,
};

mock! {
    pub Repository {}

    impl FormationReader for Repository {
        async fn list_formations(
            &self,
            query: &ListQuery<FormationFilters>,
        ) -> RepositoryResult<ListEnvelope<Formation>>;
        async fn get_formation(&self, id: FormationId) -> RepositoryResult<Option<Formation>>;
    }

    impl FormationWriter for Repository {
        async fn create_formation(&self, payload: &FormationPayload) -> RepositoryResult<Formation>;
        async fn update_formation(
            &self,
            id: FormationId,
            payload: &FormationPayload,
        ) -> RepositoryResult<Formation>;
        async fn delete_formation(&self, id: FormationId) -> RepositoryResult<()>;
    }

    impl CommentaireReader for Repository {
        async fn list_commentaires(
            &self,
            query: &ListQuery<CommentaireFilters>,
        ) -> RepositoryResult<ListEnvelope<Commentaire>>;
    }

    impl CommentaireWriter for Repository {
        async fn create_commentaire(&self, new: &NewCommentaire) -> RepositoryResult<Commentaire>;
        async fn delete_commentaire(&self, id: CommentaireId) -> RepositoryResult<()>;
    }

    impl DocumentReader for Repository {
        async fn list_documents(
            &self,
            query: &ListQuery<DocumentFilters>,
        ) -> RepositoryResult<ListEnvelope<Document>>;
        async fn download_document(&self, id: DocumentId) -> RepositoryResult<DownloadedFile>;
    }

    impl DocumentWriter for Repository {
        async fn upload_document(&self, new: NewDocument) -> RepositoryResult<Document>;
        async fn delete_document(&self, id: DocumentId) -> RepositoryResult<()>;
    }

    impl DeclicReader for Repository {
        async fn list_declic(
            &self,
            query: &ListQuery<DeclicFilters>,
        ) -> RepositoryResult<ListEnvelope<Declic>>;
        async fn list_all_declic(&self, filters: &DeclicFilters) -> RepositoryResult<Vec<Declic>>;
        async fn get_declic(&self, id: DeclicId) -> RepositoryResult<Option<Declic>>;
    }

    impl DeclicWriter for Repository {
        async fn create_declic(&self, payload: &DeclicPayload) -> RepositoryResult<Declic>;
        async fn update_declic(
            &self,
            id: DeclicId,
            payload: &DeclicPayload,
        ) -> RepositoryResult<Declic>;
        async fn delete_declic(&self, id: DeclicId) -> RepositoryResult<()>;
    }

    impl PrepaReader for Repository {
        async fn list_prepa(
            &self,
            query: &ListQuery<PrepaFilters>,
        ) -> RepositoryResult<ListEnvelope<Prepa>>;
        async fn list_all_prepa(&self, filters: &PrepaFilters) -> RepositoryResult<Vec<Prepa>>;
        async fn get_prepa(&self, id: PrepaId) -> RepositoryResult<Option<Prepa>>;
    }

    impl PrepaWriter for Repository {
        async fn create_prepa(&self, payload: &PrepaPayload) -> RepositoryResult<Prepa>;
        async fn update_prepa(&self, id: PrepaId, payload: &PrepaPayload) -> RepositoryResult<Prepa>;
        async fn delete_prepa(&self, id: PrepaId) -> RepositoryResult<()>;
    }

    impl ObjectifReader for Repository {
        async fn list_objectifs(
            &self,
            module: ActivityModule,
            query: &ListQuery<ObjectifFilters>,
        ) -> RepositoryResult<ListEnvelope<Objectif>>;
        async fn list_all_objectifs(
            &self,
            module: ActivityModule,
            filters: &ObjectifFilters,
        ) -> RepositoryResult<Vec<Objectif>>;
        async fn get_objectif(
            &self,
            module: ActivityModule,
            id: ObjectifId,
        ) -> RepositoryResult<Option<Objectif>>;
    }

    impl ObjectifWriter for Repository {
        async fn create_objectif(
            &self,
            module: ActivityModule,
            payload: &ObjectifPayload,
        ) -> RepositoryResult<Objectif>;
        async fn update_objectif(
            &self,
            module: ActivityModule,
            id: ObjectifId,
            payload: &ObjectifPayload,
        ) -> RepositoryResult<Objectif>;
        async fn delete_objectif(
            &self,
            module: ActivityModule,
            id: ObjectifId,
        ) -> RepositoryResult<()>;
    }

    impl ProspectionReader for Repository {
        async fn list_prospections(
            &self,
            query: &ListQuery<ProspectionFilters>,
        ) -> RepositoryResult<ListEnvelope<Prospection>>;
        async fn get_prospection(&self, id: ProspectionId) -> RepositoryResult<Option<Prospection>>;
    }

    impl ProspectionWriter for Repository {
        async fn create_prospection(
            &self,
            payload: &ProspectionPayload,
        ) -> RepositoryResult<Prospection>;
        async fn update_prospection(
            &self,
            id: ProspectionId,
            payload: &ProspectionPayload,
        ) -> RepositoryResult<Prospection>;
        async fn delete_prospection(&self, id: ProspectionId) -> RepositoryResult<()>;
    }

    impl ReferenceReader for Repository {
        async fn list_centres(&self) -> RepositoryResult<Vec<NamedRef>>;
        async fn list_statuts(&self) -> RepositoryResult<Vec<NamedRef>>;
        async fn list_types_offre(&self) -> RepositoryResult<Vec<NamedRef>>;
    }
}
