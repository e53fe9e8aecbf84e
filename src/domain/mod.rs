//! Domain records mirrored from the REST backend.

pub mod attendance;
pub mod commentaire;
pub mod declic;
pub mod document;
pub mod formation;
pub mod objectif;
pub mod prepa;
pub mod prospection;
pub mod types;
