use std::collections::BTreeMap;

use actix_session::Session;
use actix_web::{HttpRequest, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::columns::prepa_columns;
use crate::domain::prepa::TypePrepa;
use crate::domain::objectif::ActivityModule;
use crate::dto::{FormPageData, ListPage, ListParams};
use crate::forms::prepa::PrepaForm;
use crate::models::config::ServerConfig;
use crate::repository::HttpRepository;
use crate::repository::errors::FieldErrors;
use crate::repository::filters::PrepaFilters;
use crate::routes::{
    ExportQuery, FormView, export_response, flash_error, form_failure, list_context, list_url,
    load_selection, query_params, redirect, render_form, render_template, stats_page,
    store_selection,
};
use crate::services::{ServiceError, export_file, formations, prepa};

const PAGE: ListPage = ListPage::Prepa;

fn form_view(title: &str, action: String) -> FormView<'static> {
    let types = TypePrepa::ALL
        .into_iter()
        .map(|t| (t.as_str(), t.label()))
        .collect();
    FormView {
        template: "prepa/form.html",
        current_page: PAGE.as_str(),
        title: title.to_string(),
        action,
        cancel: PAGE.path().to_string(),
        choices: BTreeMap::from([("type_prepa", types)]),
    }
}

#[get("/prepa")]
pub async fn list_prepa(
    req: HttpRequest,
    session: Session,
    repo: web::Data<HttpRepository>,
    server_config: web::Data<ServerConfig>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let params: ListParams = query_params(&req);
    let filters: PrepaFilters = query_params(&req);
    let mut selection = load_selection(&session, PAGE);

    let result = prepa::load_prepa_page(
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
        &TypePrepa::ALL
            .into_iter()
            .map(|t| (t.as_str(), t.label()))
            .collect::<Vec<_>>(),
    );
    render_template(&tera, "prepa/index.html", &context)
}

#[get("/prepa/export")]
pub async fn export_prepa(
    req: HttpRequest,
    session: Session,
    repo: web::Data<HttpRepository>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    let params: ListParams = query_params(&req);
    let filters: PrepaFilters = query_params(&req);
    let export: ExportQuery = query_params(&req);
    let selection = load_selection(&session, PAGE);
    let back = list_url(PAGE, &req);

    match prepa::prepa_for_export(
        repo.get_ref(),
        &params,
        filters,
        server_config.page_size,
        &selection,
    )
    .await
    {
        Ok(rows) => export_response(
            export_file(rows, prepa_columns(), export.format, "prepa").await,
            &back,
        ),
        Err(err) => {
            flash_error(&err);
            redirect(&back)
        }
    }
}

#[get("/prepa/stats")]
pub async fn prepa_stats(
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
        ActivityModule::Prepa,
    )
    .await
}

#[get("/prepa/new")]
pub async fn new_prepa(
    repo: web::Data<HttpRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let data = FormPageData {
        values: PrepaForm::default(),
        errors: FieldErrors::new(),
        options: formations::load_form_options(repo.get_ref()).await,
    };
    render_form(
        &tera,
        &flash_messages,
        form_view("Nouvelle séance Prépa", "/prepa/new".to_string()),
        &data,
        None,
    )
}

#[post("/prepa/new")]
pub async fn create_prepa(
    repo: web::Data<HttpRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<PrepaForm>,
) -> impl Responder {
    match prepa::create_prepa(repo.get_ref(), &form).await {
        Ok(_) => {
            FlashMessage::success("Séance Prépa enregistrée.").send();
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
                form_view("Nouvelle séance Prépa", "/prepa/new".to_string()),
                data,
                err,
            )
        }
    }
}

#[get("/prepa/{prepa_id:\\d+}/edit")]
pub async fn edit_prepa(
    prepa_id: web::Path<i64>,
    repo: web::Data<HttpRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let id = prepa_id.into_inner();
    let seance = match prepa::get_prepa(repo.get_ref(), id).await {
        Ok(seance) => seance,
        Err(err) => {
            flash_error(&err);
            return redirect(PAGE.path());
        }
    };

    let data = FormPageData {
        values: PrepaForm::from(&seance),
        errors: FieldErrors::new(),
        options: formations::load_form_options(repo.get_ref()).await,
    };
    render_form(
        &tera,
        &flash_messages,
        form_view("Modifier la séance Prépa", format!("/prepa/{id}/edit")),
        &data,
        None,
    )
}

#[post("/prepa/{prepa_id:\\d+}/edit")]
pub async fn update_prepa(
    prepa_id: web::Path<i64>,
    repo: web::Data<HttpRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<PrepaForm>,
) -> impl Responder {
    let id = prepa_id.into_inner();
    match prepa::update_prepa(repo.get_ref(), id, &form).await {
        Ok(_) => {
            FlashMessage::success("Séance Prépa mise à jour.").send();
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
                form_view("Modifier la séance Prépa", format!("/prepa/{id}/edit")),
                data,
                err,
            )
        }
    }
}

#[post("/prepa/{prepa_id:\\d+}/delete")]
pub async fn delete_prepa(
    prepa_id: web::Path<i64>,
    repo: web::Data<HttpRepository>,
) -> impl Responder {
    match prepa::delete_prepa(repo.get_ref(), *prepa_id).await {
        Ok(()) => FlashMessage::success("Séance Prépa supprimée.").send(),
        Err(err) => flash_error(&err),
    }
    redirect(PAGE.path())
}
