use actix_multipart::form::{MultipartForm, bytes::Bytes, text::Text};

use crate::domain::document::{NewDocument, TypeDocument};
use crate::forms::FormError;

#[derive(MultipartForm)]
/// Multipart upload of a document attached to a formation.
pub struct DocumentUploadForm {
    #[multipart(limit = "20MB")]
    pub fichier: Bytes,
    pub formation_id: Text<i64>,
    pub type_document: Option<Text<String>>,
}

/// Keeps the last path component of a client-provided file name.
fn file_name(raw: &str) -> Option<String> {
    let name = raw.rsplit(['/', '\\']).next().unwrap_or(raw).trim();
    (!name.is_empty()).then(|| name.to_string())
}

fn parse_type(raw: Option<&str>) -> TypeDocument {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| serde_json::from_value(serde_json::Value::String(s.to_string())).ok())
        .unwrap_or_default()
}

impl TryFrom<DocumentUploadForm> for NewDocument {
    type Error = FormError;

    fn try_from(form: DocumentUploadForm) -> Result<Self, Self::Error> {
        let nom_fichier = form
            .fichier
            .file_name
            .as_deref()
            .and_then(file_name)
            .ok_or_else(|| FormError::InvalidFile("nom de fichier manquant".into()))?;
        if form.fichier.data.is_empty() {
            return Err(FormError::InvalidFile("fichier vide".into()));
        }

        Ok(NewDocument {
            formation: form.formation_id.into_inner(),
            nom_fichier,
            type_document: parse_type(form.type_document.as_ref().map(|t| t.as_str())),
            content_type: form.fichier.content_type.map(|m| m.to_string()),
            contenu: form.fichier.data.to_vec(),
        })
    }
}
