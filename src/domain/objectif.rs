use serde::{Deserialize, Serialize};

use crate::domain::attendance::{rate, round_rate};
use crate::domain::types::{Annee, NamedRef, ObjectifId};

/// Activity sub-module an objective or a statistic belongs to.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ActivityModule {
    Declic,
    Prepa,
}

impl ActivityModule {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Declic => "declic",
            Self::Prepa => "prepa",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Declic => "Déclic",
            Self::Prepa => "Prépa",
        }
    }
}

/// Annual target for a centre. Derived fields are normally computed by the backend.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Objectif {
    pub id: ObjectifId,
    #[serde(default)]
    pub centre: Option<NamedRef>,
    pub annee: Annee,
    pub valeur_objectif: u32,
    #[serde(default)]
    pub commentaire: Option<String>,
    #[serde(default)]
    pub realise: Option<u32>,
    #[serde(default)]
    pub reste_a_faire: Option<u32>,
    #[serde(default)]
    pub taux_atteinte: Option<f64>,
}

impl Objectif {
    pub fn centre_id(&self) -> Option<i64> {
        self.centre.as_ref().map(|c| c.id)
    }

    pub fn centre_nom(&self) -> String {
        self.centre.as_ref().map(NamedRef::display).unwrap_or_default()
    }

    /// Progress using backend values when provided, `realise` otherwise.
    pub fn progress(&self, realise: u32) -> Progress {
        let computed = Progress::compute(self.valeur_objectif, self.realise.unwrap_or(realise));
        Progress {
            objectif: self.valeur_objectif,
            realise: computed.realise,
            reste_a_faire: self.reste_a_faire.unwrap_or(computed.reste_a_faire),
            taux_atteinte: self.taux_atteinte.unwrap_or(computed.taux_atteinte),
        }
    }
}

/// Realised count compared with a target.
#[derive(Clone, Copy, Debug, Serialize, PartialEq)]
pub struct Progress {
    pub objectif: u32,
    pub realise: u32,
    pub reste_a_faire: u32,
    pub taux_atteinte: f64,
}

impl Progress {
    pub fn compute(objectif: u32, realise: u32) -> Self {
        Self {
            objectif,
            realise,
            reste_a_faire: objectif.saturating_sub(realise),
            taux_atteinte: round_rate(rate(u64::from(realise), u64::from(objectif))),
        }
    }
}

/// Payload for creating or updating an objective.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct ObjectifPayload {
    pub centre_id: i64,
    pub annee: Annee,
    pub valeur_objectif: u32,
    pub commentaire: Option<String>,
}
