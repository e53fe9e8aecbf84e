use actix_session::Session;
use actix_web::{HttpRequest, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::columns::commentaire_columns;
use crate::dto::{ListPage, ListParams};
use crate::forms::commentaires::CommentaireForm;
use crate::forms::selection::{NextForm, safe_next};
use crate::models::config::ServerConfig;
use crate::repository::HttpRepository;
use crate::repository::filters::CommentaireFilters;
use crate::routes::{
    ExportQuery, export_response, flash_error, list_context, list_url, load_selection,
    query_params, redirect, render_template, store_selection,
};
use crate::services::{commentaires, export_file};

const PAGE: ListPage = ListPage::Commentaires;

#[get("/commentaires")]
pub async fn list_commentaires(
    req: HttpRequest,
    session: Session,
    repo: web::Data<HttpRepository>,
    server_config: web::Data<ServerConfig>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let params: ListParams = query_params(&req);
    let filters: CommentaireFilters = query_params(&req);
    let mut selection = load_selection(&session, PAGE);

    let result = commentaires::load_commentaires_page(
        repo.get_ref(),
        &params,
        filters,
        server_config.page_size,
        &mut selection,
    )
    .await;
    if result.is_ok() {
        store_selection(&session, PAGE, &selection);
    }

    let context = list_context(&flash_messages, &session, &req, PAGE, result);
    render_template(&tera, "commentaires/index.html", &context)
}

#[get("/commentaires/export")]
pub async fn export_commentaires(
    req: HttpRequest,
    session: Session,
    repo: web::Data<HttpRepository>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    let params: ListParams = query_params(&req);
    let filters: CommentaireFilters = query_params(&req);
    let export: ExportQuery = query_params(&req);
    let selection = load_selection(&session, PAGE);
    let back = list_url(PAGE, &req);

    match commentaires::commentaires_for_export(
        repo.get_ref(),
        &params,
        filters,
        server_config.page_size,
        &selection,
    )
    .await
    {
        Ok(rows) => export_response(
            export_file(rows, commentaire_columns(), export.format, "commentaires").await,
            &back,
        ),
        Err(err) => {
            flash_error(&err);
            redirect(&back)
        }
    }
}

#[post("/commentaires/add")]
pub async fn add_commentaire(
    repo: web::Data<HttpRepository>,
    web::Form(form): web::Form<CommentaireForm>,
) -> impl Responder {
    match commentaires::add_commentaire(repo.get_ref(), &form).await {
        Ok(_) => FlashMessage::success("Commentaire ajouté.").send(),
        Err(err) => flash_error(&err),
    }
    redirect(&format!("/formations/{}", form.formation_id))
}

#[post("/commentaires/{commentaire_id:\\d+}/delete")]
pub async fn delete_commentaire(
    commentaire_id: web::Path<i64>,
    repo: web::Data<HttpRepository>,
    web::Form(form): web::Form<NextForm>,
) -> impl Responder {
    match commentaires::delete_commentaire(repo.get_ref(), *commentaire_id).await {
        Ok(()) => FlashMessage::success("Commentaire supprimé.").send(),
        Err(err) => flash_error(&err),
    }
    redirect(&safe_next(form.next.as_deref(), PAGE.path()))
}
