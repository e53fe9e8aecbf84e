use actix_session::Session;
use actix_web::{HttpRequest, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::columns::formation_columns;
use crate::dto::{FormPageData, ListPage, ListParams};
use crate::forms::formations::FormationForm;
use crate::models::config::ServerConfig;
use crate::repository::HttpRepository;
use crate::repository::errors::FieldErrors;
use crate::repository::filters::FormationFilters;
use crate::routes::{
    ExportQuery, FormView, base_context, export_response, flash_error, form_failure,
    list_context, list_url, load_selection, query_params, redirect, render_form,
    render_template, store_selection,
};
use crate::services::{ServiceError, export_file, formations};

const PAGE: ListPage = ListPage::Formations;

fn form_view(title: &str, action: String) -> FormView<'static> {
    FormView {
        template: "formations/form.html",
        current_page: PAGE.as_str(),
        title: title.to_string(),
        action,
        cancel: PAGE.path().to_string(),
        choices: Default::default(),
    }
}

#[get("/")]
pub async fn index() -> impl Responder {
    redirect(PAGE.path())
}

#[get("/formations")]
pub async fn list_formations(
    req: HttpRequest,
    session: Session,
    repo: web::Data<HttpRepository>,
    server_config: web::Data<ServerConfig>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let params: ListParams = query_params(&req);
    let filters: FormationFilters = query_params(&req);
    let mut selection = load_selection(&session, PAGE);

    let result = formations::load_formations_page(
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
    render_template(&tera, "formations/index.html", &context)
}

#[get("/formations/export")]
pub async fn export_formations(
    req: HttpRequest,
    session: Session,
    repo: web::Data<HttpRepository>,
    server_config: web::Data<ServerConfig>,
) -> impl Responder {
    let params: ListParams = query_params(&req);
    let filters: FormationFilters = query_params(&req);
    let export: ExportQuery = query_params(&req);
    let selection = load_selection(&session, PAGE);
    let back = list_url(PAGE, &req);

    let rows = match formations::formations_for_export(
        repo.get_ref(),
        &params,
        filters,
        server_config.page_size,
        &selection,
    )
    .await
    {
        Ok(rows) => rows,
        Err(err) => {
            flash_error(&err);
            return redirect(&back);
        }
    };

    export_response(
        export_file(rows, formation_columns(), export.format, "formations").await,
        &back,
    )
}

#[get("/formations/new")]
pub async fn new_formation(
    repo: web::Data<HttpRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let data = FormPageData {
        values: FormationForm::default(),
        errors: FieldErrors::new(),
        options: formations::load_form_options(repo.get_ref()).await,
    };
    render_form(
        &tera,
        &flash_messages,
        form_view("Nouvelle formation", "/formations/new".to_string()),
        &data,
        None,
    )
}

#[post("/formations/new")]
pub async fn create_formation(
    repo: web::Data<HttpRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<FormationForm>,
) -> impl Responder {
    match formations::create_formation(repo.get_ref(), &form).await {
        Ok(formation) => {
            FlashMessage::success(format!("Formation « {} » créée.", formation.nom)).send();
            redirect(&format!("/formations/{}", formation.id))
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
                form_view("Nouvelle formation", "/formations/new".to_string()),
                data,
                err,
            )
        }
    }
}

#[get("/formations/{formation_id:\\d+}")]
pub async fn show_formation(
    formation_id: web::Path<i64>,
    repo: web::Data<HttpRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let detail = match formations::load_formation_detail(repo.get_ref(), *formation_id).await {
        Ok(detail) => detail,
        Err(err) => {
            flash_error(&err);
            return redirect(PAGE.path());
        }
    };

    let mut context = base_context(&flash_messages, PAGE.as_str());
    context.insert("formation", &detail.formation);
    context.insert("saturation", detail.formation.saturation_level().css_class());
    context.insert("commentaires", &detail.commentaires);
    context.insert("documents", &detail.documents);
    render_template(&tera, "formations/detail.html", &context)
}

#[get("/formations/{formation_id:\\d+}/edit")]
pub async fn edit_formation(
    formation_id: web::Path<i64>,
    repo: web::Data<HttpRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let id = formation_id.into_inner();
    let formation = match formations::get_formation(repo.get_ref(), id).await {
        Ok(formation) => formation,
        Err(err) => {
            flash_error(&err);
            return redirect(PAGE.path());
        }
    };

    let data = FormPageData {
        values: FormationForm::from(&formation),
        errors: FieldErrors::new(),
        options: formations::load_form_options(repo.get_ref()).await,
    };
    render_form(
        &tera,
        &flash_messages,
        form_view(
            &format!("Modifier « {} »", formation.nom),
            format!("/formations/{id}/edit"),
        ),
        &data,
        None,
    )
}

#[post("/formations/{formation_id:\\d+}/edit")]
pub async fn update_formation(
    formation_id: web::Path<i64>,
    repo: web::Data<HttpRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<FormationForm>,
) -> impl Responder {
    let id = formation_id.into_inner();
    match formations::update_formation(repo.get_ref(), id, &form).await {
        Ok(_) => {
            FlashMessage::success("Formation mise à jour.").send();
            redirect(&format!("/formations/{id}"))
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
                form_view("Modifier la formation", format!("/formations/{id}/edit")),
                data,
                err,
            )
        }
    }
}

#[post("/formations/{formation_id:\\d+}/delete")]
pub async fn delete_formation(
    formation_id: web::Path<i64>,
    repo: web::Data<HttpRepository>,
) -> impl Responder {
    match formations::delete_formation(repo.get_ref(), *formation_id).await {
        Ok(()) => FlashMessage::success("Formation supprimée.").send(),
        Err(err) => flash_error(&err),
    }
    redirect(PAGE.path())
}
