//! Column definitions shared by the HTML tables and the file exports.

use chrono::{DateTime, NaiveDate, Utc};

use crate::domain::commentaire::Commentaire;
use crate::domain::declic::Declic;
use crate::domain::document::Document;
use crate::domain::formation::Formation;
use crate::domain::objectif::Objectif;
use crate::domain::prepa::Prepa;
use crate::domain::prospection::Prospection;

/// One column: the field path used for sorting, a header and a cell mapper.
pub struct Column<T> {
    pub key: &'static str,
    pub header: &'static str,
    pub value: fn(&T) -> String,
}

impl<T> Clone for Column<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Column<T> {}

impl<T> std::fmt::Debug for Column<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Column")
            .field("key", &self.key)
            .field("header", &self.header)
            .finish()
    }
}

impl<T> Column<T> {
    pub const fn new(key: &'static str, header: &'static str, value: fn(&T) -> String) -> Self {
        Self { key, header, value }
    }
}

pub fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%d/%m/%Y").to_string())
        .unwrap_or_default()
}

pub fn format_datetime(at: Option<DateTime<Utc>>) -> String {
    at.map(|d| d.format("%d/%m/%Y %H:%M").to_string())
        .unwrap_or_default()
}

pub fn format_rate(rate: Option<f64>) -> String {
    rate.map(|r| format!("{r:.1} %")).unwrap_or_default()
}

fn text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

pub fn formation_columns() -> Vec<Column<Formation>> {
    vec![
        Column::new("nom", "Nom", |f: &Formation| f.nom.clone()),
        Column::new("num_offre", "N° offre", |f: &Formation| text(&f.num_offre)),
        Column::new("centre.nom", "Centre", Formation::centre_nom),
        Column::new("type_offre.nom", "Type d'offre", Formation::type_offre_nom),
        Column::new("statut.nom", "Statut", Formation::statut_nom),
        Column::new("start_date", "Début", |f: &Formation| format_date(f.start_date)),
        Column::new("end_date", "Fin", |f: &Formation| format_date(f.end_date)),
        Column::new("prevus_crif", "Places", |f: &Formation| f.total_places().to_string()),
        Column::new("inscrits_crif", "Inscrits", |f: &Formation| f.total_inscrits().to_string()),
        Column::new("saturation", "Saturation", |f: &Formation| format_rate(f.saturation)),
    ]
}

pub fn commentaire_columns() -> Vec<Column<Commentaire>> {
    vec![
        Column::new("created_at", "Date", |c: &Commentaire| format_datetime(c.created_at)),
        Column::new("formation.nom", "Formation", |c: &Commentaire| {
            c.formation.as_ref().map(|f| f.display()).unwrap_or_default()
        }),
        Column::new("auteur", "Auteur", Commentaire::auteur_nom),
        Column::new("contenu", "Commentaire", |c: &Commentaire| c.excerpt(120)),
        Column::new("saturation_formation", "Saturation", |c: &Commentaire| {
            format_rate(c.saturation_formation)
        }),
    ]
}

pub fn document_columns() -> Vec<Column<Document>> {
    vec![
        Column::new("nom_fichier", "Fichier", |d: &Document| d.nom_fichier.clone()),
        Column::new("type_document", "Type", |d: &Document| d.type_document.label().to_string()),
        Column::new("formation.nom", "Formation", |d: &Document| {
            d.formation.as_ref().map(|f| f.display()).unwrap_or_default()
        }),
        Column::new("taille", "Taille", Document::taille_lisible),
        Column::new("created_at", "Ajouté le", |d: &Document| format_datetime(d.created_at)),
    ]
}

pub fn declic_columns() -> Vec<Column<Declic>> {
    vec![
        Column::new("date_declic", "Date", |d: &Declic| format_date(Some(d.date_declic))),
        Column::new("type_declic", "Type", |d: &Declic| d.type_declic.label().to_string()),
        Column::new("centre.nom", "Centre", Declic::centre_nom),
        Column::new("nb_inscrits", "Inscrits", |d: &Declic| d.nb_inscrits.to_string()),
        Column::new("nb_presents", "Présents", |d: &Declic| d.nb_presents.to_string()),
        Column::new("nb_absents", "Absents", |d: &Declic| d.absents().to_string()),
        Column::new("taux_presence", "Présence", |d: &Declic| format_rate(d.taux_presence())),
    ]
}

pub fn prepa_columns() -> Vec<Column<Prepa>> {
    vec![
        Column::new("date_prepa", "Date", |p: &Prepa| format_date(Some(p.date_prepa))),
        Column::new("type_prepa", "Type", |p: &Prepa| p.type_prepa.label().to_string()),
        Column::new("centre.nom", "Centre", Prepa::centre_nom),
        Column::new("nombre_places_ouvertes", "Places", |p: &Prepa| {
            p.nombre_places_ouvertes.to_string()
        }),
        Column::new("nombre_prescriptions", "Prescriptions", |p: &Prepa| {
            p.nombre_prescriptions.to_string()
        }),
        Column::new("nb_inscrits", "Inscrits", |p: &Prepa| p.nb_inscrits.to_string()),
        Column::new("nb_presents", "Présents", |p: &Prepa| p.attendance().present.to_string()),
        Column::new("nb_absents", "Absents", |p: &Prepa| p.absents().to_string()),
        Column::new("nombre_adhesions", "Adhésions", |p: &Prepa| p.nombre_adhesions.to_string()),
    ]
}

pub fn objectif_columns() -> Vec<Column<Objectif>> {
    vec![
        Column::new("annee", "Année", |o: &Objectif| o.annee.to_string()),
        Column::new("centre.nom", "Centre", Objectif::centre_nom),
        Column::new("valeur_objectif", "Objectif", |o: &Objectif| o.valeur_objectif.to_string()),
        Column::new("realise", "Réalisé", |o: &Objectif| {
            o.realise.map(|r| r.to_string()).unwrap_or_default()
        }),
        Column::new("reste_a_faire", "Reste à faire", |o: &Objectif| {
            o.reste_a_faire.map(|r| r.to_string()).unwrap_or_default()
        }),
        Column::new("taux_atteinte", "Atteinte", |o: &Objectif| format_rate(o.taux_atteinte)),
    ]
}

pub fn prospection_columns() -> Vec<Column<Prospection>> {
    vec![
        Column::new("date_prospection", "Date", |p: &Prospection| format_date(Some(p.date_prospection))),
        Column::new("entreprise", "Entreprise", |p: &Prospection| text(&p.entreprise)),
        Column::new("formation.nom", "Formation", Prospection::formation_nom),
        Column::new("objectif", "Objectif", |p: &Prospection| p.objectif.label().to_string()),
        Column::new("statut", "Statut", |p: &Prospection| p.statut.label().to_string()),
        Column::new("owner", "Responsable", |p: &Prospection| text(&p.owner)),
        Column::new("commentaire", "Commentaire", |p: &Prospection| text(&p.commentaire)),
    ]
}
