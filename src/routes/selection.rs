use actix_session::Session;
use actix_web::{Responder, post, web};
use actix_web_flash_messages::FlashMessage;

use crate::dto::ListPage;
use crate::forms::selection::{SelectionForm, safe_next};
use crate::pagination::MAX_ITEMS_PER_PAGE;
use crate::routes::{load_selection, redirect, store_selection};

/// Applies a checkbox action to the selection of a list page.
///
/// The body is decoded with `serde_html_form` since `visible` repeats once per row.
#[post("/selection/{page}")]
pub async fn update_selection(
    page: web::Path<String>,
    session: Session,
    body: web::Bytes,
) -> impl Responder {
    let Ok(page) = page.parse::<ListPage>() else {
        FlashMessage::error("Page inconnue.").send();
        return redirect("/");
    };

    let form: SelectionForm = match serde_html_form::from_bytes(&body) {
        Ok(form) => form,
        Err(err) => {
            log::warn!("Rejected selection change on {page}: {err}");
            FlashMessage::error("Sélection invalide.").send();
            return redirect(page.path());
        }
    };

    let mut selection = load_selection(&session, page);
    form.action.apply(&mut selection, form.id, &form.visible);
    // A selection never spans more than one page of rows.
    if selection.truncate(MAX_ITEMS_PER_PAGE) {
        log::warn!("Selection of {page} truncated to {MAX_ITEMS_PER_PAGE} ids");
        FlashMessage::warning(format!(
            "Sélection limitée aux {MAX_ITEMS_PER_PAGE} premières lignes."
        ))
        .send();
    }
    store_selection(&session, page, &selection);

    redirect(&safe_next(form.next.as_deref(), page.path()))
}
