use chrono::NaiveDate;
use formations_dashboard::domain::attendance::Attendance;
use formations_dashboard::domain::declic::{DeclicPayload, TypeDeclic};
use formations_dashboard::domain::types::{DocumentId, FormationId, ProspectionId};
use formations_dashboard::pagination::PageRequest;
use formations_dashboard::repository::errors::RepositoryError;
use formations_dashboard::repository::filters::{
    CommentaireFilters, DeclicFilters, FormationFilters, ListQuery, PrepaFilters,
};
use formations_dashboard::repository::{
    BackendConfig, CommentaireReader, DeclicReader, DeclicWriter, DocumentReader,
    FormationReader, HttpRepository, PrepaReader, ProspectionWriter, ReferenceReader,
};

mod common;

use common::FakeBackend;

#[actix_web::test]
async fn paged_and_bare_lists_are_normalized() {
    let backend = FakeBackend::start().await;
    let repo = backend.repository();

    let paged = repo
        .list_formations(
            &ListQuery::new(FormationFilters::default())
                .paginate(PageRequest::new(Some(1), Some(25))),
        )
        .await
        .unwrap();
    assert_eq!(paged.count, 42);
    assert!(paged.has_next());
    assert_eq!(paged.results[1].nom, "BTS Commerce");

    let bare = repo
        .list_formations(&ListQuery::new(FormationFilters {
            search: Some("vide".into()),
            ..FormationFilters::default()
        }))
        .await
        .unwrap();
    assert_eq!(bare.count, 0);
    assert!(bare.results.is_empty());

    let data = repo
        .list_prepa(&ListQuery::new(PrepaFilters::default()))
        .await
        .unwrap();
    assert_eq!(data.count, 1);
    assert_eq!(data.results[0].absents(), 3);

    backend.stop().await;
}

#[actix_web::test]
async fn list_all_follows_next_links() {
    let backend = FakeBackend::start().await;
    let repo = backend.repository();

    let sessions = repo.list_all_declic(&DeclicFilters::default()).await.unwrap();

    let ids: Vec<i64> = sessions.iter().map(|s| s.id.get()).collect();
    assert_eq!(ids, vec![1, 2, 3]);

    backend.stop().await;
}

#[actix_web::test]
async fn missing_detail_is_none() {
    let backend = FakeBackend::start().await;
    let repo = backend.repository();

    let found = repo.get_formation(FormationId::new(1).unwrap()).await.unwrap();
    assert_eq!(found.map(|f| f.nom).as_deref(), Some("CAP Cuisine"));
    assert!(repo
        .get_formation(FormationId::new(99).unwrap())
        .await
        .unwrap()
        .is_none());

    backend.stop().await;
}

#[actix_web::test]
async fn backend_errors_carry_their_message() {
    let backend = FakeBackend::start().await;

    let anonymous = HttpRepository::new(&backend.config(None)).unwrap();
    match anonymous
        .list_formations(&ListQuery::new(FormationFilters::default()))
        .await
    {
        Err(RepositoryError::Http { status, message }) => {
            assert_eq!(status, 401);
            assert_eq!(message, "Non authentifié.");
        }
        other => panic!("unexpected result: {other:?}"),
    }

    let repo = backend.repository();
    match repo
        .list_commentaires(&ListQuery::new(CommentaireFilters::default()))
        .await
    {
        Err(err @ RepositoryError::Http { status: 503, .. }) => {
            assert_eq!(err.user_message(), "Maintenance en cours");
        }
        other => panic!("unexpected result: {other:?}"),
    }

    backend.stop().await;
}

#[actix_web::test]
async fn field_errors_become_validation_errors() {
    let backend = FakeBackend::start().await;
    let repo = backend.repository();

    let payload = DeclicPayload::new(
        TypeDeclic::Atelier1,
        NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
        77,
        Attendance::new(5, 7),
        None,
    );
    assert_eq!(payload.nb_absents, 0);

    match repo.create_declic(&payload).await {
        Err(RepositoryError::ValidationError(fields)) => {
            assert_eq!(fields["centre_id"], vec!["Centre inconnu.".to_string()]);
        }
        other => panic!("unexpected result: {other:?}"),
    }

    backend.stop().await;
}

#[actix_web::test]
async fn downloads_are_named_from_the_disposition_header() {
    let backend = FakeBackend::start().await;
    let repo = backend.repository();

    let named = repo
        .download_document(DocumentId::new(5).unwrap())
        .await
        .unwrap();
    assert_eq!(named.filename, "bilan été.pdf");
    assert_eq!(named.content_type, "application/pdf");
    assert_eq!(named.bytes, b"%PDF-1.4");

    let unnamed = repo
        .download_document(DocumentId::new(9).unwrap())
        .await
        .unwrap();
    assert_eq!(unnamed.filename, "document_9");

    backend.stop().await;
}

#[actix_web::test]
async fn references_are_sorted_and_deletes_accept_no_content() {
    let backend = FakeBackend::start().await;
    let repo = backend.repository();

    let centres = repo.list_centres().await.unwrap();
    let names: Vec<String> = centres.iter().map(|c| c.display()).collect();
    assert_eq!(names, vec!["Bobigny", "Paris"]);

    repo.delete_prospection(ProspectionId::new(3).unwrap())
        .await
        .unwrap();

    backend.stop().await;
}

#[actix_web::test]
async fn unreachable_backend_is_a_connection_error() {
    let repo = HttpRepository::new(&BackendConfig {
        base_url: "http://127.0.0.1:9/api/".into(),
        token: None,
        timeout_secs: 2,
    })
    .unwrap();

    let err = repo
        .list_formations(&ListQuery::new(FormationFilters::default()))
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::ConnectionError(_)));
    assert_eq!(err.user_message(), "Le serveur est injoignable.");
}
