use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::types::{DocumentId, NamedRef};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TypeDocument {
    Pdf,
    Image,
    Contrat,
    Attestation,
    #[default]
    #[serde(other)]
    Autre,
}

impl TypeDocument {
    pub const ALL: [TypeDocument; 5] = [
        Self::Pdf,
        Self::Image,
        Self::Contrat,
        Self::Attestation,
        Self::Autre,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Image => "image",
            Self::Contrat => "contrat",
            Self::Attestation => "attestation",
            Self::Autre => "autre",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Pdf => "PDF",
            Self::Image => "Image",
            Self::Contrat => "Contrat",
            Self::Attestation => "Attestation",
            Self::Autre => "Autre",
        }
    }
}

/// File attached to a formation.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Document {
    pub id: DocumentId,
    #[serde(default)]
    pub formation: Option<NamedRef>,
    pub nom_fichier: String,
    #[serde(default)]
    pub type_document: TypeDocument,
    /// Size in bytes.
    #[serde(default)]
    pub taille: Option<u64>,
    #[serde(default)]
    pub download_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Document {
    /// Human-readable size (`12.5 Ko`).
    pub fn taille_lisible(&self) -> String {
        let Some(bytes) = self.taille else {
            return String::new();
        };
        const UNITS: [&str; 4] = ["o", "Ko", "Mo", "Go"];
        let mut value = bytes as f64;
        let mut unit = 0;
        while value >= 1024.0 && unit < UNITS.len() - 1 {
            value /= 1024.0;
            unit += 1;
        }
        if unit == 0 {
            format!("{bytes} o")
        } else {
            format!("{value:.1} {}", UNITS[unit])
        }
    }
}

/// Metadata of an upload; the bytes travel separately as multipart.
#[derive(Clone, Debug, PartialEq)]
pub struct NewDocument {
    pub formation: i64,
    pub nom_fichier: String,
    pub type_document: TypeDocument,
    pub content_type: Option<String>,
    pub contenu: Vec<u8>,
}

/// File body downloaded from the backend.
#[derive(Clone, Debug, PartialEq)]
pub struct DownloadedFile {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}
