use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::ServiceResponse;
use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use actix_web_flash_messages::{FlashMessagesFramework, Level, storage::CookieMessageStore};
use tera::Tera;

use formations_dashboard::inflight::LatestOnly;
use formations_dashboard::models::config::ServerConfig;
use formations_dashboard::routes::{self, alert_level_to_str};

mod common;

use common::{FakeBackend, TOKEN};

#[::core::prelude::v1::test]
fn test_alert_level_to_str_mappings() {
    assert_eq!(alert_level_to_str(&Level::Error), "danger");
    assert_eq!(alert_level_to_str(&Level::Warning), "warning");
    assert_eq!(alert_level_to_str(&Level::Success), "success");
    assert_eq!(alert_level_to_str(&Level::Info), "info");
    assert_eq!(alert_level_to_str(&Level::Debug), "info");
}

fn server_config(backend: &FakeBackend) -> ServerConfig {
    ServerConfig {
        domain: "localhost".into(),
        address: "127.0.0.1".into(),
        port: 8080,
        templates_dir: "templates/**/*".into(),
        secret: "0".repeat(64),
        api_base_url: backend.base_url.clone(),
        api_token: Some(TOKEN.into()),
        request_timeout_secs: 5,
        page_size: 25,
    }
}

/// Builds the application against `backend`, wired like `run` wires it.
macro_rules! app {
    ($backend:expr) => {{
        let backend: &FakeBackend = $backend;
        let key = Key::from(&[7u8; 64]);
        let messages =
            FlashMessagesFramework::builder(CookieMessageStore::builder(key.clone()).build())
                .build();
        let tera = Tera::new("templates/**/*").expect("templates parse");

        test::init_service(
            App::new()
                .wrap(messages)
                .wrap(
                    SessionMiddleware::builder(CookieSessionStore::default(), key)
                        .cookie_secure(false)
                        .build(),
                )
                .configure(routes::configure)
                .app_data(web::Data::new(tera))
                .app_data(web::Data::new(backend.repository()))
                .app_data(web::Data::new(LatestOnly::new()))
                .app_data(web::Data::new(server_config(backend))),
        )
        .await
    }};
}

fn location(resp: &ServiceResponse) -> &str {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

async fn body_text(resp: ServiceResponse) -> String {
    String::from_utf8(test::read_body(resp).await.to_vec()).expect("utf-8 body")
}

/// Browser-side cookie store: later cookies replace earlier ones by name.
fn keep_cookies(jar: &mut Vec<Cookie<'static>>, resp: &ServiceResponse) {
    for cookie in resp.response().cookies() {
        jar.retain(|kept| kept.name() != cookie.name());
        jar.push(cookie.into_owned());
    }
}

fn select_all_body(ids: impl Iterator<Item = i64>) -> String {
    std::iter::once("action=select_all".to_string())
        .chain(ids.map(|id| format!("visible={id}")))
        .collect::<Vec<_>>()
        .join("&")
}

fn session_cookie_len(resp: &ServiceResponse) -> usize {
    resp.response()
        .cookies()
        .find(|c| c.name() == "id")
        .map(|c| c.value().len())
        .expect("session cookie")
}

#[actix_web::test]
async fn root_redirects_to_formations() {
    let backend = FakeBackend::start().await;
    let app = app!(&backend);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/formations");

    backend.stop().await;
}

#[actix_web::test]
async fn formation_list_renders_backend_rows() {
    let backend = FakeBackend::start().await;
    let app = app!(&backend);

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/formations").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_text(resp).await;
    assert!(body.contains("CAP Cuisine"));
    assert!(body.contains("BTS Commerce"));

    backend.stop().await;
}

#[actix_web::test]
async fn csv_export_is_an_attachment() {
    let backend = FakeBackend::start().await;
    let app = app!(&backend);

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/formations/export?format=csv")
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let disposition = resp
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(disposition.starts_with("attachment;"));
    assert!(disposition.contains(".csv"));
    assert!(body_text(resp).await.contains("CAP Cuisine"));

    backend.stop().await;
}

#[actix_web::test]
async fn formation_search_returns_labelled_hits() {
    let backend = FakeBackend::start().await;
    let app = app!(&backend);

    let short = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/formations/search?q=a")
            .to_request(),
    )
    .await;
    assert_eq!(short.status(), StatusCode::OK);
    assert_eq!(body_text(short).await, "[]");

    let hits: serde_json::Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/api/formations/search?q=cap")
            .to_request(),
    )
    .await;
    assert_eq!(hits[0]["id"], 1);
    assert_eq!(hits[0]["label"], "CAP Cuisine (OF-1, Paris)");

    backend.stop().await;
}

#[actix_web::test]
async fn unknown_pages_are_rejected() {
    let backend = FakeBackend::start().await;
    let app = app!(&backend);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/selection/inconnue")
            .insert_header((header::CONTENT_TYPE, "application/x-www-form-urlencoded"))
            .set_payload("action=toggle&id=1")
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/");

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/objectifs/foo").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    backend.stop().await;
}

#[actix_web::test]
async fn missing_formation_redirects_to_the_list() {
    let backend = FakeBackend::start().await;
    let app = app!(&backend);

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/formations/99").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/formations");

    backend.stop().await;
}

#[actix_web::test]
async fn declic_statistics_group_by_centre() {
    let backend = FakeBackend::start().await;
    let app = app!(&backend);

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/declic/stats?annee=2025")
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_text(resp).await;
    assert!(body.contains("Paris"));
    assert!(body.contains("2025"));

    backend.stop().await;
}

#[actix_web::test]
async fn backend_field_errors_are_shown_on_the_form() {
    let backend = FakeBackend::start().await;
    let app = app!(&backend);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/declic/new")
            .set_form([
                ("type_declic", "atelier1"),
                ("date_declic", "2025-03-01"),
                ("centre_id", "77"),
                ("nb_inscrits", "5"),
                ("nb_presents", "3"),
                ("commentaire", ""),
            ])
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains("Centre inconnu."));

    backend.stop().await;
}

#[actix_web::test]
async fn list_load_errors_are_rendered_inline() {
    let backend = FakeBackend::start().await;
    let app = app!(&backend);

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/commentaires").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains("Maintenance en cours"));

    backend.stop().await;
}

#[actix_web::test]
async fn selections_of_several_pages_fit_in_the_session_cookie() {
    let backend = FakeBackend::start().await;
    let app = app!(&backend);
    let mut jar: Vec<Cookie<'static>> = Vec::new();

    for (n, page) in ["formations", "declic", "prepa"].into_iter().enumerate() {
        let first = 1_000_000 + 1_000 * n as i64;
        let mut req = test::TestRequest::post()
            .uri(&format!("/selection/{page}"))
            .insert_header((header::CONTENT_TYPE, "application/x-www-form-urlencoded"))
            .set_payload(select_all_body(first..first + 200));
        for cookie in &jar {
            req = req.cookie(cookie.clone());
        }

        let resp = test::call_service(&app, req.to_request()).await;

        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&resp), format!("/{page}"));
        assert!(session_cookie_len(&resp) < 4064);
        keep_cookies(&mut jar, &resp);
    }

    backend.stop().await;
}

#[actix_web::test]
async fn oversized_selection_is_truncated_with_a_warning() {
    let backend = FakeBackend::start().await;
    let app = app!(&backend);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/selection/formations")
            .insert_header((header::CONTENT_TYPE, "application/x-www-form-urlencoded"))
            .set_payload(select_all_body(1_000_000..1_000_600))
            .to_request(),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert!(session_cookie_len(&resp) < 4064);
    assert!(resp.response().cookies().any(|c| c.name() == "_flash"));

    backend.stop().await;
}
