//! Strongly-typed value objects used by domain entities.
//!
//! These wrappers enforce basic invariants (positive identifiers, plausible
//! years, trimmed labels) so that once a value reaches the domain layer it can
//! be treated as trusted.
use std::fmt::{Display, Formatter};
use std::ops::Deref;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced when attempting to construct a constrained value object.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// Provided identifier is zero or negative.
    #[error("id must be greater than zero")]
    NonPositiveId,
    /// Provided string contained no non-whitespace characters.
    #[error("value cannot be empty")]
    EmptyString,
    /// Year outside of the range handled by the backend.
    #[error("year must be between {min} and {max}")]
    YearOutOfRange { min: i32, max: i32 },
    /// Provided value failed custom validation.
    #[error("invalid value: {0}")]
    InvalidValue(String),
}

/// Macro to generate lightweight newtypes for positive identifiers.
macro_rules! id_newtype {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(i64);

        impl $name {
            /// Creates a new identifier ensuring it is greater than zero.
            pub fn new(value: i64) -> Result<Self, TypeConstraintError> {
                if value > 0 {
                    Ok(Self(value))
                } else {
                    Err(TypeConstraintError::NonPositiveId)
                }
            }

            /// Returns the raw `i64` backing this identifier.
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<i64> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: i64) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for i64 {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

id_newtype!(FormationId, "Unique identifier for a training program.");
id_newtype!(CentreId, "Unique identifier for a training centre.");
id_newtype!(CommentaireId, "Unique identifier for a comment.");
id_newtype!(DocumentId, "Unique identifier for a document.");
id_newtype!(DeclicId, "Unique identifier for a Déclic session.");
id_newtype!(PrepaId, "Unique identifier for a Prépa session.");
id_newtype!(ObjectifId, "Unique identifier for an annual objective.");
id_newtype!(ProspectionId, "Unique identifier for a prospection.");

/// Calendar year attached to objectives and statistics.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "i32", into = "i32")]
pub struct Annee(i32);

impl Annee {
    pub const MIN: i32 = 2000;
    pub const MAX: i32 = 2100;

    /// Validates the year against the supported range.
    pub fn new(value: i32) -> Result<Self, TypeConstraintError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(TypeConstraintError::YearOutOfRange {
                min: Self::MIN,
                max: Self::MAX,
            })
        }
    }

    pub const fn get(self) -> i32 {
        self.0
    }
}

impl Display for Annee {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i32> for Annee {
    type Error = TypeConstraintError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Annee> for i32 {
    fn from(value: Annee) -> Self {
        value.0
    }
}

/// Wrapper for non-empty, trimmed strings.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Label(String);

impl Label {
    /// Trims whitespace and rejects empty inputs.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let trimmed = value.into().trim().to_string();
        if trimmed.is_empty() {
            return Err(TypeConstraintError::EmptyString);
        }
        Ok(Self(trimmed))
    }

    /// Borrow the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper returning the owned string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Deref for Label {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for Label {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<&str> for Label {
    type Error = TypeConstraintError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Label> for String {
    fn from(value: Label) -> Self {
        value.0
    }
}

/// Reference to a related record as the backend embeds it (`{id, nom}`).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct NamedRef {
    pub id: i64,
    #[serde(default)]
    pub nom: Option<String>,
}

impl NamedRef {
    /// Display name, falling back to `#id` when the backend omitted it.
    pub fn display(&self) -> String {
        match self.nom.as_deref().map(str::trim) {
            Some(nom) if !nom.is_empty() => nom.to_string(),
            _ => format!("#{}", self.id),
        }
    }
}

/// Removes scripts and unsafe attributes from user-authored HTML.
pub fn sanitize_html(raw: &str) -> String {
    ammonia::clean(raw).trim().to_string()
}

/// Strips all markup, keeping the text content on one line.
pub fn html_to_text(raw: &str) -> String {
    let text = ammonia::Builder::empty().clean(raw).to_string();
    let text = text
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'");
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_reject_non_positive_values() {
        assert_eq!(FormationId::new(0), Err(TypeConstraintError::NonPositiveId));
        assert_eq!(FormationId::new(-3), Err(TypeConstraintError::NonPositiveId));
        assert_eq!(FormationId::new(7).map(FormationId::get), Ok(7));
    }

    #[test]
    fn annee_is_bounded() {
        assert!(Annee::new(1999).is_err());
        assert!(Annee::new(2101).is_err());
        assert_eq!(Annee::new(2025).map(Annee::get), Ok(2025));
    }

    #[test]
    fn annee_deserialization_validates() {
        assert!(serde_json::from_str::<Annee>("2024").is_ok());
        assert!(serde_json::from_str::<Annee>("12").is_err());
    }

    #[test]
    fn label_trims_and_rejects_blank() {
        assert_eq!(Label::new("  Lyon ").unwrap().as_str(), "Lyon");
        assert_eq!(Label::new("   "), Err(TypeConstraintError::EmptyString));
    }

    #[test]
    fn named_ref_falls_back_to_id() {
        let named = NamedRef {
            id: 4,
            nom: Some("Centre Nord".into()),
        };
        let anonymous = NamedRef { id: 9, nom: None };
        assert_eq!(named.display(), "Centre Nord");
        assert_eq!(anonymous.display(), "#9");
    }

    #[test]
    fn sanitize_html_drops_scripts() {
        let cleaned = sanitize_html("<p>Bonjour</p><script>alert('x')</script>");
        assert_eq!(cleaned, "<p>Bonjour</p>");
    }

    #[test]
    fn html_to_text_flattens_markup() {
        assert_eq!(
            html_to_text("<p>Session <b>complète</b></p>\n<p>ok &amp; validé</p>"),
            "Session complète ok & validé"
        );
    }
}
