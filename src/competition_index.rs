//! Static index of tracked competitions.
//!
//! Maps a canonical key such as `premier-league` to the id, name and path of
//! the competition in every source. The table ships inside the binary and is
//! parsed once per process.

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::AppError;
use crate::fusion::CompetitionParams;
use crate::matching::{MatchField, Matchable};

const INDEX_JSON: &str = include_str!("../data/competitions.json");

static INDEX: OnceCell<CompetitionIndex> = OnceCell::new();

/// One competition as a single source knows it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexedSource {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_name: Option<String>,
}

impl Matchable for IndexedSource {
    fn field(&self, field: MatchField) -> Option<&str> {
        match field {
            MatchField::Name => Some(&self.name),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub fotmob: IndexedSource,
    pub fbref: IndexedSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub official: Option<IndexedSource>,
    pub transfermarkt: IndexedSource,
}

impl IndexEntry {
    /// Join keys straight from the index, without consulting any source
    pub fn params(&self) -> CompetitionParams {
        CompetitionParams {
            fotmob_id: self.fotmob.id.clone(),
            fbref_id: self.fbref.id.clone(),
            fbref_path_name: self.fbref.path_name.clone(),
            official_name: self.official.as_ref().map(|o| o.name.clone()),
            transfermarkt_id: self.transfermarkt.id.clone(),
            transfermarkt_path_name: self.transfermarkt.path_name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompetitionIndex {
    entries: BTreeMap<String, IndexEntry>,
}

impl CompetitionIndex {
    /// The embedded index, parsed on first use.
    pub fn global() -> Result<&'static CompetitionIndex, AppError> {
        INDEX.get_or_try_init(|| Self::from_json(INDEX_JSON))
    }

    pub fn from_json(json: &str) -> Result<Self, AppError> {
        let index: CompetitionIndex = serde_json::from_str(json)?;
        if index.entries.is_empty() {
            return Err(AppError::config_error("Competition index is empty"));
        }
        Ok(index)
    }

    pub fn get(&self, key: &str) -> Result<&IndexEntry, AppError> {
        self.entries
            .get(key)
            .ok_or_else(|| AppError::unknown_competition(key))
    }

    pub fn params(&self, key: &str) -> Result<CompetitionParams, AppError> {
        self.get(key).map(IndexEntry::params)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Entries in key order
    pub fn entries(&self) -> impl Iterator<Item = (&str, &IndexEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn key_for_fotmob_id(&self, id: &str) -> Option<&str> {
        self.entries()
            .find(|(_, entry)| entry.fotmob.id == id)
            .map(|(key, _)| key)
    }

    pub fn key_for_fbref_id(&self, id: &str) -> Option<&str> {
        self.entries()
            .find(|(_, entry)| entry.fbref.id == id)
            .map(|(key, _)| key)
    }
}
