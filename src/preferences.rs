//! Small UI preferences (panel visibility and the like) keyed by page.

use std::cell::RefCell;
use std::collections::HashMap;
use std::str::FromStr;

use actix_session::Session;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dto::ListPage;

#[derive(Debug, Error)]
#[error("failed to store preference `{key}`: {message}")]
pub struct PreferenceError {
    pub key: String,
    pub message: String,
}

/// Narrow string key/value store.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError>;
}

impl PreferenceStore for Session {
    fn get(&self, key: &str) -> Option<String> {
        match Session::get::<String>(self, key) {
            Ok(value) => value,
            Err(err) => {
                log::warn!("Ignoring unreadable preference `{key}`: {err}");
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError> {
        self.insert(key, value).map_err(|err| PreferenceError {
            key: key.to_string(),
            message: err.to_string(),
        })
    }
}

#[derive(Debug, Default)]
pub struct MemoryPreferences {
    values: RefCell<HashMap<String, String>>,
}

impl PreferenceStore for MemoryPreferences {
    fn get(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError> {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreferenceFlag {
    ShowFilters,
    CompactTable,
}

impl PreferenceFlag {
    pub const ALL: [PreferenceFlag; 2] = [Self::ShowFilters, Self::CompactTable];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ShowFilters => "show_filters",
            Self::CompactTable => "compact_table",
        }
    }

    pub fn default_value(self) -> bool {
        match self {
            Self::ShowFilters => true,
            Self::CompactTable => false,
        }
    }

    /// `formations.show_filters`
    pub fn key(self, page: ListPage) -> String {
        format!("{}.{}", page.as_str(), self.as_str())
    }
}

impl FromStr for PreferenceFlag {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|f| f.as_str() == s).ok_or(())
    }
}

/// Reads a boolean flag; anything but `true`/`false` yields the default.
pub fn flag<S: PreferenceStore + ?Sized>(store: &S, page: ListPage, flag: PreferenceFlag) -> bool {
    match store.get(&flag.key(page)).as_deref() {
        Some("true") => true,
        Some("false") => false,
        _ => flag.default_value(),
    }
}

/// Flips a flag and returns its new value.
pub fn toggle_flag<S: PreferenceStore + ?Sized>(
    store: &S,
    page: ListPage,
    flag_name: PreferenceFlag,
) -> Result<bool, PreferenceError> {
    let value = !flag(store, page, flag_name);
    store.set(&flag_name.key(page), if value { "true" } else { "false" })?;
    Ok(value)
}

/// Every flag of a page, for templates.
pub fn page_flags<S: PreferenceStore + ?Sized>(
    store: &S,
    page: ListPage,
) -> HashMap<&'static str, bool> {
    PreferenceFlag::ALL
        .into_iter()
        .map(|f| (f.as_str(), flag(store, page, f)))
        .collect()
}
