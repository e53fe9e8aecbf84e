use actix_session::Session;
use actix_web::{Responder, post, web};
use actix_web_flash_messages::FlashMessage;

use crate::dto::ListPage;
use crate::forms::selection::{NextForm, safe_next};
use crate::preferences::{PreferenceFlag, toggle_flag};
use crate::routes::redirect;

#[post("/preferences/{page}/{flag}/toggle")]
pub async fn toggle_preference(
    path: web::Path<(String, String)>,
    session: Session,
    web::Form(form): web::Form<NextForm>,
) -> impl Responder {
    let (page, flag) = path.into_inner();
    let (Ok(page), Ok(flag)) = (page.parse::<ListPage>(), flag.parse::<PreferenceFlag>()) else {
        FlashMessage::error("Préférence inconnue.").send();
        return redirect(&safe_next(form.next.as_deref(), "/"));
    };

    if let Err(err) = toggle_flag(&session, page, flag) {
        log::error!("Failed to toggle {} on {page}: {err}", flag.as_str());
        FlashMessage::error("La préférence n'a pas pu être enregistrée.").send();
    }
    redirect(&safe_next(form.next.as_deref(), page.path()))
}
