use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::types::{NamedRef, ProspectionId};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum StatutProspection {
    #[default]
    AFaire,
    EnCours,
    Acceptee,
    Refusee,
    Annulee,
    #[serde(other)]
    Autre,
}

impl StatutProspection {
    pub const ALL: [StatutProspection; 6] = [
        Self::AFaire,
        Self::EnCours,
        Self::Acceptee,
        Self::Refusee,
        Self::Annulee,
        Self::Autre,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::AFaire => "a_faire",
            Self::EnCours => "en_cours",
            Self::Acceptee => "acceptee",
            Self::Refusee => "refusee",
            Self::Annulee => "annulee",
            Self::Autre => "autre",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::AFaire => "À faire",
            Self::EnCours => "En cours",
            Self::Acceptee => "Acceptée",
            Self::Refusee => "Refusée",
            Self::Annulee => "Annulée",
            Self::Autre => "Autre",
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            Self::AFaire => "secondary",
            Self::EnCours => "info",
            Self::Acceptee => "success",
            Self::Refusee => "danger",
            Self::Annulee | Self::Autre => "light",
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ObjectifProspection {
    #[default]
    PriseContact,
    RendezVous,
    Presentation,
    Contrat,
    Partenariat,
    #[serde(other)]
    Autre,
}

impl ObjectifProspection {
    pub const ALL: [ObjectifProspection; 6] = [
        Self::PriseContact,
        Self::RendezVous,
        Self::Presentation,
        Self::Contrat,
        Self::Partenariat,
        Self::Autre,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::PriseContact => "prise_contact",
            Self::RendezVous => "rendez_vous",
            Self::Presentation => "presentation",
            Self::Contrat => "contrat",
            Self::Partenariat => "partenariat",
            Self::Autre => "autre",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::PriseContact => "Prise de contact",
            Self::RendezVous => "Rendez-vous",
            Self::Presentation => "Présentation de l'offre",
            Self::Contrat => "Signature de contrat",
            Self::Partenariat => "Partenariat",
            Self::Autre => "Autre",
        }
    }
}

/// Prospection contact with a company or partner.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Prospection {
    pub id: ProspectionId,
    pub date_prospection: NaiveDate,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub entreprise: Option<String>,
    #[serde(default)]
    pub formation: Option<NamedRef>,
    #[serde(default)]
    pub objectif: ObjectifProspection,
    #[serde(default)]
    pub statut: StatutProspection,
    #[serde(default)]
    pub motif: Option<String>,
    #[serde(default)]
    pub commentaire: Option<String>,
}

impl Prospection {
    pub fn formation_nom(&self) -> String {
        self.formation
            .as_ref()
            .map(NamedRef::display)
            .unwrap_or_default()
    }
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct ProspectionPayload {
    pub date_prospection: NaiveDate,
    pub entreprise: Option<String>,
    pub formation: Option<i64>,
    pub objectif: ObjectifProspection,
    pub statut: StatutProspection,
    pub motif: Option<String>,
    pub commentaire: Option<String>,
}
