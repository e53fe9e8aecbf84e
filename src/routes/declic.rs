use std::collections::BTreeMap;

use actix_session::Session;
use actix_web::{HttpRequest, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::columns::declic_columns;
use crate::domain::declic::TypeDeclic;
use crate::domain::objectif::ActivityModule;
use crate::dto::{FormPageData, ListPage, ListParams};
use crate::forms::declic::DeclicForm;
use crate::models::config::ServerConfig;
use crate::repository::HttpRepository;
use crate::repository::errors::FieldErrors;
use crate::repository::filters::DeclicFilters;
use crate::routes::{
    ExportQuery, FormView, export_response, flash_error, form_failure, list_context, list_url,
    load_selection, query_params, redirect, render_form, render_template, stats_page,
    store_selection,
};
use crate::services::{ServiceError, declic, export_file, formations};

const PAGE: ListPage = ListPage::Declic;

fn form_view(title: &str, action: String) -> FormView<'static> {
    let types = TypeDeclic::ALL
        .into_iter()
        .map(|t| (t.as_str(), t.label()))
        .collect();
    FormView {
        template: "declic/form.html",
        current_page: PAGE.as_str(),
        title: title.to_string(),
        action,
        cancel: PAGE.path().to_string(),
        choices: BTreeMap::from([("type_declic", types)]),
    }
}

#[get("/declic")]
pub async fn list_declic(
    req: HttpRequest,
    session: Session,
    repo: web::Data<HttpRepository>,
    server_config: web::Data<ServerConfig>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let params: ListParams = query_params(&req);
    let filters: DeclicFilters = query_params(&req);
    let mut selection = load_selection(&session, PAGE);

    let result = declic::load_declic_page(
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

    let mut context = list_context(&flash_messages, &session, &req, PAGE, result);
    context.insert("options", &formations::load_form_options(repo.get_ref()).await);
    context.insert(
        "types",
        &TypeDeclic::ALL
            .into_iter()
            .map(|t| (t.as_str(), t.label()))
            .collect::<Vec<_>>(),
    );
    render_template(&tera, "declic/index.html", &context)
}

#[get("/declic/export")]
pub async fn export_declic(
    req: HttpRequest,
    session: Session,
    repo: web::Data<HttpRepository>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    let params: ListParams = query_params(&req);
    let filters: DeclicFilters = query_params(&req);
    let export: ExportQuery = query_params(&req);
    let selection = load_selection(&session, PAGE);
    let back = list_url(PAGE, &req);

    match declic::declic_for_export(
        repo.get_ref(),
        &params,
        filters,
        server_config.page_size,
        &selection,
    )
    .await
    {
        Ok(rows) => export_response(
            export_file(rows, declic_columns(), export.format, "declic").await,
            &back,
        ),
        Err(err) => {
            flash_error(&err);
            redirect(&back)
        }
    }
}

#[get("/declic/stats")]
pub async fn declic_stats(
    req: HttpRequest,
    repo: web::Data<HttpRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    stats_page(
        &tera,
        &flash_messages,
        &req,
        repo.get_ref(),
        ActivityModule::Declic,
    )
    .await
}

#[get("/declic/new")]
pub async fn new_declic(
    repo: web::Data<HttpRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let data = FormPageData {
        values: DeclicForm::default(),
        errors: FieldErrors::new(),
        options: formations::load_form_options(repo.get_ref()).await,
    };
    render_form(
        &tera,
        &flash_messages,
        form_view("Nouvelle séance Déclic", "/declic/new".to_string()),
        &data,
        None,
    )
}

#[post("/declic/new")]
pub async fn create_declic(
    repo: web::Data<HttpRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<DeclicForm>,
) -> impl Responder {
    match declic::create_declic(repo.get_ref(), &form).await {
        Ok(_) => {
            FlashMessage::success("Séance Déclic enregistrée.").send();
            redirect(PAGE.path())
        }
        Err(err) => {
            let data = FormPageData {
                values: form,
                errors: FieldErrors::new(),
                options: formations::load_form_options(repo.get_ref()).await,
            };
            form_failure(
                &tera,
                &flash_messages,
                form_view("Nouvelle séance Déclic", "/declic/new".to_string()),
                data,
                err,
            )
        }
    }
}

#[get("/declic/{declic_id:\\d+}/edit")]
pub async fn edit_declic(
    declic_id: web::Path<i64>,
    repo: web::Data<HttpRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let id = declic_id.into_inner();
    let seance = match declic::get_declic(repo.get_ref(), id).await {
        Ok(seance) => seance,
        Err(err) => {
            flash_error(&err);
            return redirect(PAGE.path());
        }
    };

    let data = FormPageData {
        values: DeclicForm::from(&seance),
        errors: FieldErrors::new(),
        options: formations::load_form_options(repo.get_ref()).await,
    };
    render_form(
        &tera,
        &flash_messages,
        form_view("Modifier la séance Déclic", format!("/declic/{id}/edit")),
        &data,
        None,
    )
}

#[post("/declic/{declic_id:\\d+}/edit")]
pub async fn update_declic(
    declic_id: web::Path<i64>,
    repo: web::Data<HttpRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<DeclicForm>,
) -> impl Responder {
    let id = declic_id.into_inner();
    match declic::update_declic(repo.get_ref(), id, &form).await {
        Ok(_) => {
            FlashMessage::success("Séance Déclic mise à jour.").send();
            redirect(PAGE.path())
        }
        Err(err @ ServiceError::NotFound) | Err(err @ ServiceError::TypeConstraint(_)) => {
            flash_error(&err);
            redirect(PAGE.path())
        }
        Err(err) => {
            let data = FormPageData {
                values: form,
                errors: FieldErrors::new(),
                options: formations::load_form_options(repo.get_ref()).await,
            };
            form_failure(
                &tera,
                &flash_messages,
                form_view("Modifier la séance Déclic", format!("/declic/{id}/edit")),
                data,
                err,
            )
        }
    }
}

#[post("/declic/{declic_id:\\d+}/delete")]
pub async fn delete_declic(
    declic_id: web::Path<i64>,
    repo: web::Data<HttpRepository>,
) -> impl Responder {
    match declic::delete_declic(repo.get_ref(), *declic_id).await {
        Ok(()) => FlashMessage::success("Séance Déclic supprimée.").send(),
        Err(err) => flash_error(&err),
    }
    redirect(PAGE.path())
}
