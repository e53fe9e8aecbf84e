//! Yearly per-centre synthesis of Déclic and Prépa sessions.
//!
//! Every session of the year is loaded (following `next` links), grouped by
//! centre and joined with the objectives of the same module and year.

use std::collections::BTreeMap;

use crate::domain::attendance::{rate, round_rate};
use crate::domain::declic::Declic;
use crate::domain::objectif::{ActivityModule, Objectif, Progress};
use crate::domain::prepa::Prepa;
use crate::domain::types::{Annee, NamedRef};
use crate::dto::{CentreStats, StatsPageData};
use crate::repository::filters::{DeclicFilters, ObjectifFilters, PrepaFilters};
use crate::repository::{DeclicReader, ObjectifReader, PrepaReader};
use crate::services::{ServiceResult, backend_failure};
use crate::table::locale_cmp;

const WITHOUT_CENTRE: &str = "Sans centre";

/// Counters a session contributes to its centre row.
trait SessionCounts {
    fn centre(&self) -> Option<&NamedRef>;
    fn inscrits(&self) -> u32;
    fn presents(&self) -> u32;
    fn absents(&self) -> u32;
    fn adhesions(&self) -> u32;
}

impl SessionCounts for Declic {
    fn centre(&self) -> Option<&NamedRef> {
        self.centre.as_ref()
    }

    fn inscrits(&self) -> u32 {
        self.nb_inscrits
    }

    fn presents(&self) -> u32 {
        self.nb_presents
    }

    fn absents(&self) -> u32 {
        Declic::absents(self)
    }

    fn adhesions(&self) -> u32 {
        0
    }
}

impl SessionCounts for Prepa {
    fn centre(&self) -> Option<&NamedRef> {
        self.centre.as_ref()
    }

    // Information collectives count prescriptions and IC attendance.
    fn inscrits(&self) -> u32 {
        self.attendance().total
    }

    fn presents(&self) -> u32 {
        self.attendance().present
    }

    fn absents(&self) -> u32 {
        Prepa::absents(self)
    }

    fn adhesions(&self) -> u32 {
        self.nombre_adhesions
    }
}

fn realised(module: ActivityModule, row: &CentreStats) -> u64 {
    match module {
        ActivityModule::Declic => row.presents,
        ActivityModule::Prepa => row.adhesions,
    }
}

fn clamp(value: u64) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

fn presence_rate(row: &CentreStats) -> Option<f64> {
    (row.inscrits > 0).then(|| round_rate(rate(row.presents, row.inscrits)))
}

fn row_for(centre: Option<&NamedRef>) -> CentreStats {
    CentreStats {
        centre_id: centre.map(|c| c.id),
        centre: centre
            .map(NamedRef::display)
            .unwrap_or_else(|| WITHOUT_CENTRE.to_string()),
        ..CentreStats::default()
    }
}

/// Groups sessions per centre and attaches each centre's objective.
fn aggregate<S: SessionCounts>(
    module: ActivityModule,
    sessions: &[S],
    objectifs: &[Objectif],
) -> (Vec<CentreStats>, CentreStats) {
    let mut rows: BTreeMap<Option<i64>, CentreStats> = BTreeMap::new();

    for session in sessions {
        let centre = session.centre();
        let row = rows
            .entry(centre.map(|c| c.id))
            .or_insert_with(|| row_for(centre));
        row.sessions += 1;
        row.inscrits += u64::from(session.inscrits());
        row.presents += u64::from(session.presents());
        row.absents += u64::from(session.absents());
        row.adhesions += u64::from(session.adhesions());
    }

    for objectif in objectifs {
        rows.entry(objectif.centre_id())
            .or_insert_with(|| row_for(objectif.centre.as_ref()));
    }

    let mut rows: Vec<CentreStats> = rows
        .into_values()
        .map(|mut row| {
            row.taux_presence = presence_rate(&row);
            row.realise = realised(module, &row);
            if let Some(objectif) = objectifs.iter().find(|o| o.centre_id() == row.centre_id) {
                let progress = objectif.progress(clamp(row.realise));
                row.realise = u64::from(progress.realise);
                row.progress = Some(progress);
            }
            row
        })
        .collect();

    rows.sort_by(|a, b| {
        a.centre_id
            .is_none()
            .cmp(&b.centre_id.is_none())
            .then_with(|| locale_cmp(&a.centre, &b.centre))
    });

    let mut totals = CentreStats {
        centre: "Total".to_string(),
        ..CentreStats::default()
    };
    let mut target: u64 = 0;
    for row in &rows {
        totals.sessions += row.sessions;
        totals.inscrits += row.inscrits;
        totals.presents += row.presents;
        totals.absents += row.absents;
        totals.adhesions += row.adhesions;
        totals.realise += row.realise;
        target += row.progress.map(|p| u64::from(p.objectif)).unwrap_or_default();
    }
    totals.taux_presence = presence_rate(&totals);
    if !objectifs.is_empty() {
        totals.progress = Some(Progress::compute(clamp(target), clamp(totals.realise)));
    }

    (rows, totals)
}

/// Builds the statistics page of one module for one year.
pub async fn load_stats<R>(repo: &R, module: ActivityModule, annee: i32) -> ServiceResult<StatsPageData>
where
    R: DeclicReader + PrepaReader + ObjectifReader + ?Sized,
{
    let year = Annee::new(annee)?;

    let objectifs = repo
        .list_all_objectifs(
            module,
            &ObjectifFilters {
                annee: Some(year.get()),
                ..ObjectifFilters::default()
            },
        )
        .await
        .map_err(backend_failure("load objectives for statistics"))?;

    let (rows, totals) = match module {
        ActivityModule::Declic => {
            let sessions = repo
                .list_all_declic(&DeclicFilters {
                    annee: Some(year.get()),
                    ..DeclicFilters::default()
                })
                .await
                .map_err(backend_failure("load declic sessions for statistics"))?;
            aggregate(module, &sessions, &objectifs)
        }
        ActivityModule::Prepa => {
            let sessions = repo
                .list_all_prepa(&PrepaFilters {
                    annee: Some(year.get()),
                    ..PrepaFilters::default()
                })
                .await
                .map_err(backend_failure("load prepa sessions for statistics"))?;
            aggregate(module, &sessions, &objectifs)
        }
    };

    log::debug!(
        "Built {} statistics for {annee}: {} centres",
        module.as_str(),
        rows.len()
    );

    Ok(StatsPageData {
        module,
        annee: year.get(),
        rows,
        totals,
        objectifs,
    })
}
