use actix_session::Session;
use actix_web::{HttpRequest, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::domain::objectif::ActivityModule;
use crate::dto::{FormPageData, ListPage, ListParams};
use crate::forms::objectifs::ObjectifForm;
use crate::models::config::ServerConfig;
use crate::repository::HttpRepository;
use crate::repository::errors::FieldErrors;
use crate::repository::filters::ObjectifFilters;
use crate::routes::{
    FormView, flash_error, form_failure, list_context, load_selection, query_params, redirect,
    render_form, render_template, store_selection,
};
use crate::services::{ServiceError, formations, objectifs};

fn form_view(module: ActivityModule, title: String, action: String) -> FormView<'static> {
    let page = ListPage::objectifs(module);
    FormView {
        template: "objectifs/form.html",
        current_page: page.as_str(),
        title,
        action,
        cancel: page.path().to_string(),
        choices: Default::default(),
    }
}

#[get("/objectifs/{module:declic|prepa}")]
pub async fn list_objectifs(
    module: web::Path<ActivityModule>,
    req: HttpRequest,
    session: Session,
    repo: web::Data<HttpRepository>,
    server_config: web::Data<ServerConfig>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let module = module.into_inner();
    let page = ListPage::objectifs(module);
    let params: ListParams = query_params(&req);
    let filters: ObjectifFilters = query_params(&req);
    let mut selection = load_selection(&session, page);

    let result = objectifs::load_objectifs_page(
        repo.get_ref(),
        module,
        &params,
        filters,
        server_config.page_size,
        &mut selection,
    )
    .await;
    if result.is_ok() {
        store_selection(&session, page, &selection);
    }

    let mut context = list_context(&flash_messages, &session, &req, page, result);
    context.insert("module", &module);
    context.insert("module_label", module.label());
    context.insert("options", &formations::load_form_options(repo.get_ref()).await);
    render_template(&tera, "objectifs/index.html", &context)
}

#[get("/objectifs/{module:declic|prepa}/new")]
pub async fn new_objectif(
    module: web::Path<ActivityModule>,
    repo: web::Data<HttpRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let module = module.into_inner();
    let data = FormPageData {
        values: ObjectifForm::default(),
        errors: FieldErrors::new(),
        options: formations::load_form_options(repo.get_ref()).await,
    };
    render_form(
        &tera,
        &flash_messages,
        form_view(
            module,
            format!("Nouvel objectif {}", module.label()),
            format!("/objectifs/{}/new", module.as_str()),
        ),
        &data,
        None,
    )
}

#[post("/objectifs/{module:declic|prepa}/new")]
pub async fn create_objectif(
    module: web::Path<ActivityModule>,
    repo: web::Data<HttpRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<ObjectifForm>,
) -> impl Responder {
    let module = module.into_inner();
    match objectifs::create_objectif(repo.get_ref(), module, &form).await {
        Ok(_) => {
            FlashMessage::success("Objectif enregistré.").send();
            redirect(ListPage::objectifs(module).path())
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
                form_view(
                    module,
                    format!("Nouvel objectif {}", module.label()),
                    format!("/objectifs/{}/new", module.as_str()),
                ),
                data,
                err,
            )
        }
    }
}

#[get("/objectifs/{module:declic|prepa}/{objectif_id:\\d+}/edit")]
pub async fn edit_objectif(
    path: web::Path<(ActivityModule, i64)>,
    repo: web::Data<HttpRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let (module, id) = path.into_inner();
    let objectif = match objectifs::get_objectif(repo.get_ref(), module, id).await {
        Ok(objectif) => objectif,
        Err(err) => {
            flash_error(&err);
            return redirect(ListPage::objectifs(module).path());
        }
    };

    let data = FormPageData {
        values: ObjectifForm::from(&objectif),
        errors: FieldErrors::new(),
        options: formations::load_form_options(repo.get_ref()).await,
    };
    render_form(
        &tera,
        &flash_messages,
        form_view(
            module,
            format!("Modifier l'objectif {}", module.label()),
            format!("/objectifs/{}/{id}/edit", module.as_str()),
        ),
        &data,
        None,
    )
}

#[post("/objectifs/{module:declic|prepa}/{objectif_id:\\d+}/edit")]
pub async fn update_objectif(
    path: web::Path<(ActivityModule, i64)>,
    repo: web::Data<HttpRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<ObjectifForm>,
) -> impl Responder {
    let (module, id) = path.into_inner();
    let list = ListPage::objectifs(module).path();
    match objectifs::update_objectif(repo.get_ref(), module, id, &form).await {
        Ok(_) => {
            FlashMessage::success("Objectif mis à jour.").send();
            redirect(list)
        }
        Err(err @ ServiceError::NotFound) | Err(err @ ServiceError::TypeConstraint(_)) => {
            flash_error(&err);
            redirect(list)
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
                form_view(
                    module,
                    format!("Modifier l'objectif {}", module.label()),
                    format!("/objectifs/{}/{id}/edit", module.as_str()),
                ),
                data,
                err,
            )
        }
    }
}

#[post("/objectifs/{module:declic|prepa}/{objectif_id:\\d+}/delete")]
pub async fn delete_objectif(
    path: web::Path<(ActivityModule, i64)>,
    repo: web::Data<HttpRepository>,
) -> impl Responder {
    let (module, id) = path.into_inner();
    match objectifs::delete_objectif(repo.get_ref(), module, id).await {
        Ok(()) => FlashMessage::success("Objectif supprimé.").send(),
        Err(err) => flash_error(&err),
    }
    redirect(ListPage::objectifs(module).path())
}
