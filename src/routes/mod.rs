//! HTTP handlers and the helpers they share.

use std::collections::{BTreeMap, BTreeSet};

use actix_session::Session;
use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages, Level};
use chrono::{Datelike, Local};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tera::{Context, Tera};
use uuid::Uuid;

use crate::domain::objectif::ActivityModule;
use crate::dto::{FormPageData, ListPage, ListPageData};
use crate::export::{ExportFile, ExportFormat};
use crate::preferences::page_flags;
use crate::repository::HttpRepository;
use crate::repository::filters::blank_as_none;
use crate::selection::Selection;
use crate::services::{ServiceError, ServiceResult, stats};

pub mod api;
pub mod commentaires;
pub mod declic;
pub mod documents;
pub mod formations;
pub mod objectifs;
pub mod prepa;
pub mod preferences;
pub mod prospections;
pub mod selection;

const CLIENT_KEY: &str = "client_key";

/// `?format=` of the export links.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ExportQuery {
    #[serde(default)]
    pub format: ExportFormat,
}

/// Registers every handler; shared by the server and the integration tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(formations::index)
        .service(formations::list_formations)
        .service(formations::export_formations)
        .service(formations::new_formation)
        .service(formations::create_formation)
        .service(formations::show_formation)
        .service(formations::edit_formation)
        .service(formations::update_formation)
        .service(formations::delete_formation)
        .service(commentaires::list_commentaires)
        .service(commentaires::export_commentaires)
        .service(commentaires::add_commentaire)
        .service(commentaires::delete_commentaire)
        .service(documents::list_documents)
        .service(documents::upload_document)
        .service(documents::download_document)
        .service(documents::delete_document)
        .service(declic::list_declic)
        .service(declic::export_declic)
        .service(declic::declic_stats)
        .service(declic::new_declic)
        .service(declic::create_declic)
        .service(declic::edit_declic)
        .service(declic::update_declic)
        .service(declic::delete_declic)
        .service(prepa::list_prepa)
        .service(prepa::export_prepa)
        .service(prepa::prepa_stats)
        .service(prepa::new_prepa)
        .service(prepa::create_prepa)
        .service(prepa::edit_prepa)
        .service(prepa::update_prepa)
        .service(prepa::delete_prepa)
        .service(objectifs::list_objectifs)
        .service(objectifs::new_objectif)
        .service(objectifs::create_objectif)
        .service(objectifs::edit_objectif)
        .service(objectifs::update_objectif)
        .service(objectifs::delete_objectif)
        .service(prospections::list_prospections)
        .service(prospections::export_prospections)
        .service(prospections::new_prospection)
        .service(prospections::create_prospection)
        .service(prospections::edit_prospection)
        .service(prospections::update_prospection)
        .service(prospections::delete_prospection)
        .service(selection::update_selection)
        .service(preferences::toggle_preference)
        .service(web::scope("/api").service(api::search_formations));
}

pub fn alert_level_to_str(level: &Level) -> &'static str {
    match level {
        Level::Error => "danger",
        Level::Warning => "warning",
        Level::Success => "success",
        _ => "info",
    }
}

pub fn render_template(tera: &Tera, template: &str, context: &Context) -> HttpResponse {
    match tera.render(template, context) {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(body),
        Err(err) => {
            log::error!("Failed to render template '{template}': {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Context with the pending alerts and the active menu entry.
pub fn base_context(flash_messages: &IncomingFlashMessages, current_page: &str) -> Context {
    let alerts = flash_messages
        .iter()
        .map(|f| (f.content(), alert_level_to_str(&f.level())))
        .collect::<Vec<_>>();
    let mut context = Context::new();
    context.insert("alerts", &alerts);
    context.insert("current_page", current_page);
    context
}

/// Page query string decoded into `T`. A parameter that does not decode is
/// dropped on its own and the others are kept.
pub(crate) fn query_params<T: DeserializeOwned + Default>(req: &HttpRequest) -> T {
    decode_query(req.query_string())
}

fn decode_query<T: DeserializeOwned + Default>(query: &str) -> T {
    let err = match serde_html_form::from_str(query) {
        Ok(value) => return value,
        Err(err) => err,
    };
    log::warn!("Invalid query `{query}`: {err}");

    let mut pairs: Vec<(String, String)> = serde_html_form::from_str(query).unwrap_or_default();
    let keys: BTreeSet<String> = pairs.iter().map(|(key, _)| key.clone()).collect();
    for key in keys {
        let alone: Vec<(&str, &str)> = pairs
            .iter()
            .filter(|(k, _)| *k == key)
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        let decodes = serde_html_form::to_string(&alone)
            .is_ok_and(|encoded| serde_html_form::from_str::<T>(&encoded).is_ok());
        if !decodes {
            log::warn!("Ignoring query parameter `{key}`");
            pairs.retain(|(k, _)| *k != key);
        }
    }

    serde_html_form::to_string(&pairs)
        .ok()
        .and_then(|kept| serde_html_form::from_str(&kept).ok())
        .unwrap_or_default()
}

/// Path and query of the current request, used as a `next` target.
pub(crate) fn current_url(req: &HttpRequest) -> String {
    match req.query_string() {
        "" => req.path().to_string(),
        query => format!("{}?{query}", req.path()),
    }
}

pub(crate) fn load_selection(session: &Session, page: ListPage) -> Selection {
    session
        .get::<Selection>(&page.selection_key())
        .unwrap_or_else(|err| {
            log::warn!("Dropping unreadable selection of {page}: {err}");
            None
        })
        .unwrap_or_default()
}

/// Stores the selection of `page`. A non-empty selection replaces those of the
/// other pages, so the cookie session holds at most one set of ids.
pub(crate) fn store_selection(session: &Session, page: ListPage, selection: &Selection) {
    if selection.is_empty() {
        session.remove(&page.selection_key());
        return;
    }
    for other in ListPage::ALL.into_iter().filter(|other| *other != page) {
        if session.remove(&other.selection_key()).is_some() {
            log::debug!("Dropped selection of {other} for {page}");
        }
    }
    if let Err(err) = session.insert(page.selection_key(), selection) {
        log::error!("Failed to store selection of {page}: {err}");
    }
}

/// Stable per-browser key, created on first use.
pub(crate) fn client_key(session: &Session) -> String {
    if let Ok(Some(key)) = session.get::<String>(CLIENT_KEY) {
        return key;
    }
    let key = Uuid::new_v4().to_string();
    if let Err(err) = session.insert(CLIENT_KEY, &key) {
        log::warn!("Failed to store client key: {err}");
    }
    key
}

pub(crate) fn flash_error(err: &ServiceError) {
    FlashMessage::error(err.user_message()).send();
}

/// Context of a list page: the data, or the load error in its place.
pub(crate) fn list_context<F: Serialize>(
    flash_messages: &IncomingFlashMessages,
    session: &Session,
    req: &HttpRequest,
    page: ListPage,
    result: ServiceResult<ListPageData<F>>,
) -> Context {
    let mut context = base_context(flash_messages, page.as_str());
    context.insert("list_page", page.as_str());
    context.insert("list_path", page.path());
    context.insert("flags", &page_flags(session, page));
    context.insert("current_url", &current_url(req));
    match result {
        Ok(data) => context.insert("data", &data),
        Err(err) => context.insert("load_error", &err.user_message()),
    }
    context
}

/// `(value, label)` of a select option.
pub(crate) type Choice = (&'static str, &'static str);

/// What a form template needs besides the values.
pub(crate) struct FormView<'a> {
    pub template: &'a str,
    pub current_page: &'a str,
    pub title: String,
    pub action: String,
    pub cancel: String,
    /// Fixed select options, by field name.
    pub choices: BTreeMap<&'static str, Vec<Choice>>,
}

pub(crate) fn render_form<V: Serialize>(
    tera: &Tera,
    flash_messages: &IncomingFlashMessages,
    view: FormView<'_>,
    data: &FormPageData<V>,
    form_error: Option<String>,
) -> HttpResponse {
    let mut context = base_context(flash_messages, view.current_page);
    context.insert("title", &view.title);
    context.insert("action", &view.action);
    context.insert("cancel", &view.cancel);
    context.insert("form", data);
    context.insert("choices", &view.choices);
    if let Some(message) = form_error {
        context.insert("form_error", &message);
    }
    render_template(tera, view.template, &context)
}

/// Re-renders a rejected form with its values, inline errors or a general message.
pub(crate) fn form_failure<V: Serialize>(
    tera: &Tera,
    flash_messages: &IncomingFlashMessages,
    view: FormView<'_>,
    data: FormPageData<V>,
    err: ServiceError,
) -> HttpResponse {
    match err {
        ServiceError::Validation(errors) => {
            let data = FormPageData { errors, ..data };
            render_form(tera, flash_messages, view, &data, None)
        }
        other => render_form(tera, flash_messages, view, &data, Some(other.user_message())),
    }
}

fn is_header_safe(c: char) -> bool {
    c.is_ascii_alphanumeric() || "-_.~".contains(c)
}

/// `attachment` disposition with an ASCII fallback and the UTF-8 name.
pub fn content_disposition(filename: &str) -> String {
    let fallback: String = filename
        .chars()
        .map(|c| if is_header_safe(c) || c == ' ' { c } else { '_' })
        .collect();
    let encoded: String = filename
        .chars()
        .map(|c| {
            if is_header_safe(c) {
                c.to_string()
            } else {
                let mut buf = [0u8; 4];
                c.encode_utf8(&mut buf)
                    .bytes()
                    .map(|b| format!("%{b:02X}"))
                    .collect()
            }
        })
        .collect();
    format!("attachment; filename=\"{fallback}\"; filename*=UTF-8''{encoded}")
}

pub(crate) fn attachment(filename: &str, content_type: &str, bytes: Vec<u8>) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(content_type.to_string())
        .insert_header((header::CONTENT_DISPOSITION, content_disposition(filename)))
        .body(bytes)
}

/// Sends the export, or flashes why not and goes back to the list.
pub(crate) fn export_response(result: ServiceResult<ExportFile>, back: &str) -> HttpResponse {
    match result {
        Ok(file) => attachment(&file.filename, file.content_type, file.bytes),
        Err(ServiceError::EmptyExport) => {
            FlashMessage::warning("Aucune ligne à exporter.").send();
            redirect(back)
        }
        Err(err) => {
            flash_error(&err);
            redirect(back)
        }
    }
}

/// `?annee=` of the statistics pages.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct StatsQuery {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub annee: Option<i32>,
}

/// Per-centre statistics of one module, the current year by default.
pub(crate) async fn stats_page(
    tera: &Tera,
    flash_messages: &IncomingFlashMessages,
    req: &HttpRequest,
    repo: &HttpRepository,
    module: ActivityModule,
) -> HttpResponse {
    let query: StatsQuery = query_params(req);
    let annee = query.annee.unwrap_or_else(|| Local::now().year());

    let mut context = base_context(flash_messages, module.as_str());
    context.insert("module", &module);
    context.insert("module_label", module.label());
    context.insert("annee", &annee);
    match stats::load_stats(repo, module, annee).await {
        Ok(data) => context.insert("stats", &data),
        Err(err) => context.insert("load_error", &err.user_message()),
    }
    render_template(tera, "stats.html", &context)
}

/// List path with the filters kept, for redirects after an export.
pub(crate) fn list_url(page: ListPage, req: &HttpRequest) -> String {
    let query: Vec<(String, String)> =
        serde_html_form::from_str(req.query_string()).unwrap_or_default();
    let kept: Vec<(String, String)> = query.into_iter().filter(|(k, _)| k != "format").collect();
    match serde_html_form::to_string(&kept) {
        Ok(q) if !q.is_empty() => format!("{}?{q}", page.path()),
        _ => page.path().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use actix_web::test::TestRequest;

    use super::*;
    use crate::dto::ListParams;
    use crate::repository::filters::FormationFilters;

    #[test]
    fn bad_query_parameter_keeps_the_others() {
        let req = TestRequest::with_uri("/formations?page=abc&centre=4&sort=-nom").to_http_request();

        let params: ListParams = query_params(&req);
        let filters: FormationFilters = query_params(&req);

        assert_eq!(params.page, None);
        assert_eq!(params.sort.as_deref(), Some("-nom"));
        assert_eq!(filters.centre, Some(4));
    }

    #[test]
    fn valid_query_decodes_unchanged() {
        let params: ListParams = decode_query("page=3&page_size=50");
        assert_eq!(params.page, Some(3));
        assert_eq!(params.page_size, Some(50));

        let stats: StatsQuery = decode_query("annee=deux-mille");
        assert_eq!(stats.annee, None);
    }

    #[test]
    fn disposition_keeps_utf8_names() {
        assert_eq!(
            content_disposition("synthèse 2025.pdf"),
            "attachment; filename=\"synth_se 2025.pdf\"; filename*=UTF-8''synth%C3%A8se%202025.pdf"
        );
    }

    #[test]
    fn disposition_escapes_quotes() {
        let value = content_disposition("a\"b.csv");
        assert!(value.starts_with("attachment; filename=\"a_b.csv\""));
    }
}
