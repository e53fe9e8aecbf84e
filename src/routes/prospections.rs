use std::collections::BTreeMap;

use actix_session::Session;
use actix_web::{HttpRequest, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::columns::prospection_columns;
use crate::domain::prospection::{ObjectifProspection, StatutProspection};
use crate::dto::{FormPageData, ListPage, ListParams};
use crate::forms::prospections::ProspectionForm;
use crate::models::config::ServerConfig;
use crate::repository::HttpRepository;
use crate::repository::errors::FieldErrors;
use crate::repository::filters::ProspectionFilters;
use crate::routes::{
    Choice, ExportQuery, FormView, export_response, flash_error, form_failure, list_context,
    list_url, load_selection, query_params, redirect, render_form, render_template,
    store_selection,
};
use crate::services::{ServiceError, export_file, prospections};

const PAGE: ListPage = ListPage::Prospections;

fn choices() -> BTreeMap<&'static str, Vec<Choice>> {
    BTreeMap::from([
        (
            "statut",
            StatutProspection::ALL
                .into_iter()
                .map(|s| (s.as_str(), s.label()))
                .collect(),
        ),
        (
            "objectif",
            ObjectifProspection::ALL
                .into_iter()
                .map(|o| (o.as_str(), o.label()))
                .collect(),
        ),
    ])
}

fn form_view(title: &str, action: String) -> FormView<'static> {
    FormView {
        template: "prospections/form.html",
        current_page: PAGE.as_str(),
        title: title.to_string(),
        action,
        cancel: PAGE.path().to_string(),
        choices: choices(),
    }
}

fn form_data(values: ProspectionForm) -> FormPageData<ProspectionForm> {
    FormPageData {
        values,
        errors: FieldErrors::new(),
        options: Default::default(),
    }
}

#[get("/prospections")]
pub async fn list_prospections(
    req: HttpRequest,
    session: Session,
    repo: web::Data<HttpRepository>,
    server_config: web::Data<ServerConfig>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let params: ListParams = query_params(&req);
    let filters: ProspectionFilters = query_params(&req);
    let mut selection = load_selection(&session, PAGE);

    let result = prospections::load_prospections_page(
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
    context.insert("choices", &choices());
    render_template(&tera, "prospections/index.html", &context)
}

#[get("/prospections/export")]
pub async fn export_prospections(
    req: HttpRequest,
    session: Session,
    repo: web::Data<HttpRepository>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    let params: ListParams = query_params(&req);
    let filters: ProspectionFilters = query_params(&req);
    let export: ExportQuery = query_params(&req);
    let selection = load_selection(&session, PAGE);
    let back = list_url(PAGE, &req);

    match prospections::prospections_for_export(
        repo.get_ref(),
        &params,
        filters,
        server_config.page_size,
        &selection,
    )
    .await
    {
        Ok(rows) => export_response(
            export_file(rows, prospection_columns(), export.format, "prospections").await,
            &back,
        ),
        Err(err) => {
            flash_error(&err);
            redirect(&back)
        }
    }
}

#[get("/prospections/new")]
pub async fn new_prospection(
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    render_form(
        &tera,
        &flash_messages,
        form_view("Nouvelle prospection", "/prospections/new".to_string()),
        &form_data(ProspectionForm::default()),
        None,
    )
}

#[post("/prospections/new")]
pub async fn create_prospection(
    repo: web::Data<HttpRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<ProspectionForm>,
) -> impl Responder {
    match prospections::create_prospection(repo.get_ref(), &form).await {
        Ok(_) => {
            FlashMessage::success("Prospection enregistrée.").send();
            redirect(PAGE.path())
        }
        Err(err) => form_failure(
            &tera,
            &flash_messages,
            form_view("Nouvelle prospection", "/prospections/new".to_string()),
            form_data(form),
            err,
        ),
    }
}

#[get("/prospections/{prospection_id:\\d+}/edit")]
pub async fn edit_prospection(
    prospection_id: web::Path<i64>,
    repo: web::Data<HttpRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let id = prospection_id.into_inner();
    let prospection = match prospections::get_prospection(repo.get_ref(), id).await {
        Ok(prospection) => prospection,
        Err(err) => {
            flash_error(&err);
            return redirect(PAGE.path());
        }
    };

    render_form(
        &tera,
        &flash_messages,
        form_view("Modifier la prospection", format!("/prospections/{id}/edit")),
        &form_data(ProspectionForm::from(&prospection)),
        None,
    )
}

#[post("/prospections/{prospection_id:\\d+}/edit")]
pub async fn update_prospection(
    prospection_id: web::Path<i64>,
    repo: web::Data<HttpRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<ProspectionForm>,
) -> impl Responder {
    let id = prospection_id.into_inner();
    match prospections::update_prospection(repo.get_ref(), id, &form).await {
        Ok(_) => {
            FlashMessage::success("Prospection mise à jour.").send();
            redirect(PAGE.path())
        }
        Err(err @ ServiceError::NotFound) => {
            flash_error(&err);
            redirect(PAGE.path())
        }
        Err(err) => form_failure(
            &tera,
            &flash_messages,
            form_view("Modifier la prospection", format!("/prospections/{id}/edit")),
            form_data(form),
            err,
        ),
    }
}

#[post("/prospections/{prospection_id:\\d+}/delete")]
pub async fn delete_prospection(
    prospection_id: web::Path<i64>,
    repo: web::Data<HttpRepository>,
) -> impl Responder {
    match prospections::delete_prospection(repo.get_ref(), *prospection_id).await {
        Ok(()) => FlashMessage::success("Prospection supprimée.").send(),
        Err(err) => flash_error(&err),
    }
    redirect(PAGE.path())
}
