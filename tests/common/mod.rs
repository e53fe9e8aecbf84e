//! In-process stand-in for the REST backend.

#![allow(dead_code)]

use std::collections::HashMap;

use actix_web::dev::ServerHandle;
use actix_web::http::header;
use actix_web::{App, HttpRequest, HttpResponse, HttpServer, web};
use serde_json::{Value, json};

use formations_dashboard::repository::{BackendConfig, HttpRepository};

pub const TOKEN: &str = "secret-token";

type Query = web::Query<HashMap<String, String>>;

fn authorized(req: &HttpRequest) -> bool {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        == Some(format!("Bearer {TOKEN}").as_str())
}

pub fn formation(id: i64, nom: &str) -> Value {
    json!({
        "id": id,
        "nom": nom,
        "num_offre": format!("OF-{id}"),
        "centre": {"id": 2, "nom": "Paris"},
        "prevus_crif": 10,
        "inscrits_crif": 7,
    })
}

fn declic(id: i64, inscrits: u32, presents: u32) -> Value {
    json!({
        "id": id,
        "type_declic": "atelier1",
        "date_declic": "2025-03-01",
        "centre": {"id": 2, "nom": "Paris"},
        "nb_inscrits": inscrits,
        "nb_presents": presents,
    })
}

async fn formations(req: HttpRequest, query: Query) -> HttpResponse {
    if !authorized(&req) {
        return HttpResponse::Unauthorized().json(json!({"detail": "Non authentifié."}));
    }
    match query.get("search").map(String::as_str) {
        Some("vide") => HttpResponse::Ok().json(json!([])),
        _ => HttpResponse::Ok().json(json!({
            "count": 42,
            "next": "http://backend/api/formations/?page=2",
            "previous": null,
            "results": [formation(1, "CAP Cuisine"), formation(2, "BTS Commerce")],
        })),
    }
}

async fn formation_detail(path: web::Path<i64>) -> HttpResponse {
    match path.into_inner() {
        1 => HttpResponse::Ok().json(formation(1, "CAP Cuisine")),
        _ => HttpResponse::NotFound().json(json!({"detail": "Introuvable."})),
    }
}

async fn declic_list(query: Query) -> HttpResponse {
    match query.get("page").map(String::as_str) {
        Some("2") => HttpResponse::Ok().json(json!({
            "count": 3,
            "next": null,
            "results": [declic(3, 6, 6)],
        })),
        _ => HttpResponse::Ok().json(json!({
            "count": 3,
            "next": "http://backend/api/declic/?page=2",
            "results": [declic(1, 10, 8), declic(2, 4, 1)],
        })),
    }
}

async fn declic_create() -> HttpResponse {
    HttpResponse::BadRequest().json(json!({"centre_id": ["Centre inconnu."]}))
}

async fn prepa_list() -> HttpResponse {
    HttpResponse::Ok().json(json!({"data": [{
        "id": 1,
        "type_prepa": "info_collective",
        "date_prepa": "2025-02-11",
        "centre": {"id": 2, "nom": "Paris"},
        "nombre_prescriptions": 12,
        "nombre_presents_ic": 9,
        "nombre_adhesions": 5,
    }]}))
}

async fn declic_objectifs() -> HttpResponse {
    HttpResponse::Ok().json(json!([{
        "id": 1,
        "centre": {"id": 2, "nom": "Paris"},
        "annee": 2025,
        "valeur_objectif": 30,
    }]))
}

async fn centres() -> HttpResponse {
    HttpResponse::Ok().json(json!({"data": {
        "results": [{"id": 2, "nom": "Paris"}, {"id": 1, "nom": "Bobigny"}],
        "next": null,
    }}))
}

async fn commentaires() -> HttpResponse {
    HttpResponse::ServiceUnavailable().body("Maintenance en cours")
}

async fn download(path: web::Path<i64>) -> HttpResponse {
    let mut response = HttpResponse::Ok();
    response.content_type("application/pdf");
    if path.into_inner() == 5 {
        response.insert_header((
            header::CONTENT_DISPOSITION,
            "attachment; filename=\"fallback.pdf\"; filename*=UTF-8''bilan%20%C3%A9t%C3%A9.pdf",
        ));
    }
    response.body("%PDF-1.4")
}

async fn no_content() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/formations/", web::get().to(formations))
        .route("/formations/{id}/", web::get().to(formation_detail))
        .route("/declic/", web::get().to(declic_list))
        .route("/declic/", web::post().to(declic_create))
        .route("/prepa/", web::get().to(prepa_list))
        .route("/declic-objectifs/", web::get().to(declic_objectifs))
        .route("/centres/", web::get().to(centres))
        .route("/commentaires/", web::get().to(commentaires))
        .route("/documents/{id}/download/", web::get().to(download))
        .route("/prospections/{id}/", web::delete().to(no_content));
}

pub struct FakeBackend {
    pub base_url: String,
    handle: ServerHandle,
}

impl FakeBackend {
    pub async fn start() -> Self {
        let server = HttpServer::new(|| App::new().service(web::scope("/api").configure(routes)))
            .workers(1)
            .bind(("127.0.0.1", 0))
            .expect("bind fake backend");
        let addr = server.addrs()[0];
        let server = server.run();
        let handle = server.handle();
        actix_web::rt::spawn(server);

        Self {
            base_url: format!("http://{addr}/api/"),
            handle,
        }
    }

    pub fn config(&self, token: Option<&str>) -> BackendConfig {
        BackendConfig {
            base_url: self.base_url.clone(),
            token: token.map(str::to_string),
            timeout_secs: 5,
        }
    }

    pub fn repository(&self) -> HttpRepository {
        HttpRepository::new(&self.config(Some(TOKEN))).expect("build repository")
    }

    pub async fn stop(self) {
        self.handle.stop(false).await;
    }
}
