use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::commentaire::NewCommentaire;
use crate::forms::not_blank_html;

#[derive(Debug, Default, Serialize, Deserialize, Validate)]
/// Form data for adding a comment to a formation.
pub struct CommentaireForm {
    pub formation_id: i64,
    #[serde(default)]
    #[validate(
        length(max = 10000, message = "Commentaire trop long."),
        custom(function = "not_blank_html")
    )]
    pub contenu: String,
}

impl From<&CommentaireForm> for NewCommentaire {
    /// Sanitizes the HTML before it is sent.
    fn from(form: &CommentaireForm) -> Self {
        NewCommentaire::new(form.formation_id, &form.contenu)
    }
}
