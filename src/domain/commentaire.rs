use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::types::{CommentaireId, NamedRef, html_to_text, sanitize_html};

/// Comment attached to a formation. `contenu` is HTML authored in the editor.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Commentaire {
    pub id: CommentaireId,
    #[serde(default)]
    pub formation: Option<NamedRef>,
    #[serde(default)]
    pub contenu: String,
    #[serde(default)]
    pub auteur: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Saturation of the formation when the comment was written.
    #[serde(default)]
    pub saturation_formation: Option<f64>,
}

impl Commentaire {
    /// HTML safe to embed unescaped in a template.
    pub fn safe_html(&self) -> String {
        sanitize_html(&self.contenu)
    }

    /// Plain-text preview capped at `max_chars` characters.
    pub fn excerpt(&self, max_chars: usize) -> String {
        let text = html_to_text(&self.contenu);
        if text.chars().count() <= max_chars {
            return text;
        }
        let mut cut: String = text.chars().take(max_chars).collect();
        cut.push('…');
        cut
    }

    pub fn auteur_nom(&self) -> String {
        self.auteur.clone().unwrap_or_else(|| "Anonyme".to_string())
    }
}

/// Payload for a new comment; `contenu` is sanitized on construction.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct NewCommentaire {
    pub formation: i64,
    pub contenu: String,
}

impl NewCommentaire {
    pub fn new(formation: i64, contenu: &str) -> Self {
        Self {
            formation,
            contenu: sanitize_html(contenu),
        }
    }
}
