use actix_session::Session;
use actix_web::{HttpResponse, Responder, get, web};
use serde::Deserialize;
use serde_json::json;

use crate::inflight::{InflightError, LatestOnly};
use crate::repository::HttpRepository;
use crate::routes::client_key;
use crate::services::{ServiceError, search};

#[derive(Deserialize)]
struct SearchQueryParams {
    #[serde(default)]
    q: String,
}

/// Autocomplete for formation fields. A newer search from the same browser
/// cancels the previous one, which then answers `204 No Content`.
#[get("/formations/search")]
pub async fn search_formations(
    params: web::Query<SearchQueryParams>,
    session: Session,
    repo: web::Data<HttpRepository>,
    inflight: web::Data<LatestOnly>,
) -> impl Responder {
    let key = format!("{}:formations-search", client_key(&session));
    let term = params.into_inner().q;

    let result = inflight
        .run(&key, async move {
            search::search_formations(repo.get_ref(), &term).await
        })
        .await;

    match result {
        Ok(Ok(hits)) => HttpResponse::Ok().json(hits),
        Ok(Err(err @ ServiceError::Backend(_))) => {
            HttpResponse::BadGateway().json(json!({ "detail": err.user_message() }))
        }
        Ok(Err(err)) => {
            HttpResponse::InternalServerError().json(json!({ "detail": err.user_message() }))
        }
        Err(InflightError::Superseded) => HttpResponse::NoContent().finish(),
        Err(err) => {
            log::error!("Formation search task failed: {err}");
            HttpResponse::InternalServerError().json(json!({ "detail": "Erreur interne." }))
        }
    }
}
