#![allow(async_fn_in_trait)]

use crate::{
    domain::{
        commentaire::{Commentaire, NewCommentaire},
        declic::{Declic, DeclicPayload},
        document::{Document, DownloadedFile, NewDocument},
        formation::{Formation, FormationPayload},
        objectif::{ActivityModule, Objectif, ObjectifPayload},
        prepa::{Prepa, PrepaPayload},
        prospection::{Prospection, ProspectionPayload},
        types::{
            CommentaireId, DeclicId, DocumentId, FormationId, NamedRef, ObjectifId, PrepaId,
            ProspectionId,
        },
    },
    envelope::ListEnvelope,
    repository::{
        errors::RepositoryResult,
        filters::{
            CommentaireFilters, DeclicFilters, DocumentFilters, FormationFilters, ListQuery,
            ObjectifFilters, PrepaFilters, ProspectionFilters,
        },
    },
};

pub mod commentaire;
pub mod declic;
pub mod document;
pub mod errors;
pub mod filters;
pub mod formation;
pub mod http;
pub mod objectif;
pub mod prepa;
pub mod prospection;
pub mod reference;

#[cfg(any(test, feature = "test-mocks"))]
pub mod mock;

pub use http::{BackendConfig, HttpRepository};

pub trait FormationReader {
    async fn list_formations(
        &self,
        query: &ListQuery<FormationFilters>,
    ) -> RepositoryResult<ListEnvelope<Formation>>;
    async fn get_formation(&self, id: FormationId) -> RepositoryResult<Option<Formation>>;
}

pub trait FormationWriter {
    async fn create_formation(&self, payload: &FormationPayload) -> RepositoryResult<Formation>;
    async fn update_formation(
        &self,
        id: FormationId,
        payload: &FormationPayload,
    ) -> RepositoryResult<Formation>;
    async fn delete_formation(&self, id: FormationId) -> RepositoryResult<()>;
}

pub trait CommentaireReader {
    async fn list_commentaires(
        &self,
        query: &ListQuery<CommentaireFilters>,
    ) -> RepositoryResult<ListEnvelope<Commentaire>>;
}

pub trait CommentaireWriter {
    async fn create_commentaire(&self, new: &NewCommentaire) -> RepositoryResult<Commentaire>;
    async fn delete_commentaire(&self, id: CommentaireId) -> RepositoryResult<()>;
}

pub trait DocumentReader {
    async fn list_documents(
        &self,
        query: &ListQuery<DocumentFilters>,
    ) -> RepositoryResult<ListEnvelope<Document>>;
    async fn download_document(&self, id: DocumentId) -> RepositoryResult<DownloadedFile>;
}

pub trait DocumentWriter {
    async fn upload_document(&self, new: NewDocument) -> RepositoryResult<Document>;
    async fn delete_document(&self, id: DocumentId) -> RepositoryResult<()>;
}

pub trait DeclicReader {
    async fn list_declic(
        &self,
        query: &ListQuery<DeclicFilters>,
    ) -> RepositoryResult<ListEnvelope<Declic>>;
    /// Every session matching `filters`, following pagination links.
    async fn list_all_declic(&self, filters: &DeclicFilters) -> RepositoryResult<Vec<Declic>>;
    async fn get_declic(&self, id: DeclicId) -> RepositoryResult<Option<Declic>>;
}

pub trait DeclicWriter {
    async fn create_declic(&self, payload: &DeclicPayload) -> RepositoryResult<Declic>;
    async fn update_declic(&self, id: DeclicId, payload: &DeclicPayload)
    -> RepositoryResult<Declic>;
    async fn delete_declic(&self, id: DeclicId) -> RepositoryResult<()>;
}

pub trait PrepaReader {
    async fn list_prepa(
        &self,
        query: &ListQuery<PrepaFilters>,
    ) -> RepositoryResult<ListEnvelope<Prepa>>;
    /// Every session matching `filters`, following pagination links.
    async fn list_all_prepa(&self, filters: &PrepaFilters) -> RepositoryResult<Vec<Prepa>>;
    async fn get_prepa(&self, id: PrepaId) -> RepositoryResult<Option<Prepa>>;
}

pub trait PrepaWriter {
    async fn create_prepa(&self, payload: &PrepaPayload) -> RepositoryResult<Prepa>;
    async fn update_prepa(&self, id: PrepaId, payload: &PrepaPayload) -> RepositoryResult<Prepa>;
    async fn delete_prepa(&self, id: PrepaId) -> RepositoryResult<()>;
}

/// Objectives exist once per activity module, behind distinct endpoints.
pub trait ObjectifReader {
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

pub trait ObjectifWriter {
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
    async fn delete_objectif(&self, module: ActivityModule, id: ObjectifId)
    -> RepositoryResult<()>;
}

pub trait ProspectionReader {
    async fn list_prospections(
        &self,
        query: &ListQuery<ProspectionFilters>,
    ) -> RepositoryResult<ListEnvelope<Prospection>>;
    async fn get_prospection(&self, id: ProspectionId) -> RepositoryResult<Option<Prospection>>;
}

pub trait ProspectionWriter {
    async fn create_prospection(&self, payload: &ProspectionPayload)
    -> RepositoryResult<Prospection>;
    async fn update_prospection(
        &self,
        id: ProspectionId,
        payload: &ProspectionPayload,
    ) -> RepositoryResult<Prospection>;
    async fn delete_prospection(&self, id: ProspectionId) -> RepositoryResult<()>;
}

/// Lookup lists used to fill the select inputs of the forms.
pub trait ReferenceReader {
    async fn list_centres(&self) -> RepositoryResult<Vec<NamedRef>>;
    async fn list_statuts(&self) -> RepositoryResult<Vec<NamedRef>>;
    async fn list_types_offre(&self) -> RepositoryResult<Vec<NamedRef>>;
}
