use actix_multipart::form::MultipartForm;
use actix_session::Session;
use actix_web::{HttpRequest, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::dto::{ListPage, ListParams};
use crate::forms::documents::DocumentUploadForm;
use crate::forms::selection::{NextForm, safe_next};
use crate::models::config::ServerConfig;
use crate::repository::HttpRepository;
use crate::repository::filters::DocumentFilters;
use crate::routes::{
    attachment, flash_error, list_context, load_selection, query_params, redirect,
    render_template, store_selection,
};
use crate::services::documents;

const PAGE: ListPage = ListPage::Documents;

#[get("/documents")]
pub async fn list_documents(
    req: HttpRequest,
    session: Session,
    repo: web::Data<HttpRepository>,
    server_config: web::Data<ServerConfig>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let params: ListParams = query_params(&req);
    let filters: DocumentFilters = query_params(&req);
    let mut selection = load_selection(&session, PAGE);

    let result = documents::load_documents_page(
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
    render_template(&tera, "documents/index.html", &context)
}

#[post("/documents/upload")]
pub async fn upload_document(
    repo: web::Data<HttpRepository>,
    MultipartForm(form): MultipartForm<DocumentUploadForm>,
) -> impl Responder {
    let formation_id = *form.formation_id;
    match documents::upload_document(repo.get_ref(), form).await {
        Ok(document) => {
            FlashMessage::success(format!("Document « {} » ajouté.", document.nom_fichier)).send()
        }
        Err(err) => flash_error(&err),
    }
    redirect(&format!("/formations/{formation_id}"))
}

#[get("/documents/{document_id:\\d+}/download")]
pub async fn download_document(
    document_id: web::Path<i64>,
    repo: web::Data<HttpRepository>,
) -> impl Responder {
    match documents::download_document(repo.get_ref(), *document_id).await {
        Ok(file) => attachment(&file.filename, &file.content_type, file.bytes),
        Err(err) => {
            flash_error(&err);
            redirect(PAGE.path())
        }
    }
}

#[post("/documents/{document_id:\\d+}/delete")]
pub async fn delete_document(
    document_id: web::Path<i64>,
    repo: web::Data<HttpRepository>,
    web::Form(form): web::Form<NextForm>,
) -> impl Responder {
    match documents::delete_document(repo.get_ref(), *document_id).await {
        Ok(()) => FlashMessage::success("Document supprimé.").send(),
        Err(err) => flash_error(&err),
    }
    redirect(&safe_next(form.next.as_deref(), PAGE.path()))
}
