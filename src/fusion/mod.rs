//! Fusion aggregators.
//!
//! Every aggregator follows the same forward pass: build one descriptor per
//! consulted source, run them as one batch, parse each response with its
//! adapter, reconcile sub-entities with the matcher and keep the merged
//! result. The pure `fuse` step is separate from `fetch` so it can be driven
//! with fixture records.
//!
//! Primary identity comes from FotMob for every kind except staff, where
//! Transfermarkt leads because FotMob only knows some staff members.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::error;

use crate::data_fetcher::RawResponse;
use crate::error::AppError;
use crate::sources::SourceAdapter;

pub mod competition;
pub mod competitions;
pub mod match_detail;
pub mod matches;
pub mod member;
pub mod team;

pub use competition::{Competition, CompetitionInfo, CompetitionTeam, TableEntry};
pub use competitions::{CompetitionEntry, Competitions};
pub use match_detail::{LineupEntry, Match, MatchInfo, MatchSide};
pub use matches::{MatchEntry, Matches};
pub use member::{Player, PlayerInfo, Staff, StaffInfo};
pub use team::{RosterEntry, StaffEntry, Team, TeamInfo};

/// Every spelling the consulted sources use for one entity.
///
/// Only ever grows; inserting a known spelling is a no-op.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Names(BTreeSet<String>);

impl Names {
    pub fn new() -> Self {
        Names(BTreeSet::new())
    }

    pub fn insert(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !name.is_empty() {
            self.0.insert(name);
        }
    }

    /// Adds every alias of `other`.
    pub fn union(&mut self, other: &Names) {
        self.0.extend(other.0.iter().cloned());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for Names {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut names = Names::new();
        names.extend(iter);
        names
    }
}

impl<S: Into<String>> Extend<S> for Names {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for name in iter {
            self.insert(name);
        }
    }
}

fn require(value: &str, field: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::config_error(format!("{field} must not be empty")));
    }
    Ok(())
}

fn require_if_present(value: Option<&str>, field: &str) -> Result<(), AppError> {
    value.map_or(Ok(()), |v| require(v, field))
}

/// Join keys of one competition in every source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompetitionParams {
    pub fotmob_id: String,
    pub fbref_id: String,
    pub fbref_path_name: Option<String>,
    /// Only competitions run by the official league body have one
    pub official_name: Option<String>,
    pub transfermarkt_id: String,
    pub transfermarkt_path_name: Option<String>,
}

impl CompetitionParams {
    pub fn validate(&self) -> Result<(), AppError> {
        require(&self.fotmob_id, "fotmob_id")?;
        require(&self.fbref_id, "fbref_id")?;
        require(&self.transfermarkt_id, "transfermarkt_id")?;
        require_if_present(self.official_name.as_deref(), "official_name")
    }
}

/// Join keys of one team in every source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TeamParams {
    pub fotmob_id: String,
    pub fbref_id: String,
    pub fbref_path_name: Option<String>,
    pub transfermarkt_id: String,
    pub transfermarkt_path_name: Option<String>,
}

impl TeamParams {
    pub fn validate(&self) -> Result<(), AppError> {
        require(&self.fotmob_id, "fotmob_id")?;
        require(&self.fbref_id, "fbref_id")?;
        require(&self.transfermarkt_id, "transfermarkt_id")
    }
}

/// Join keys of one player. Sources other than FotMob are consulted only
/// when their id is known.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerParams {
    pub fotmob_id: String,
    pub fbref_id: Option<String>,
    pub fbref_path_name: Option<String>,
    pub transfermarkt_id: Option<String>,
    pub transfermarkt_path_name: Option<String>,
}

impl PlayerParams {
    pub fn validate(&self) -> Result<(), AppError> {
        require(&self.fotmob_id, "fotmob_id")?;
        require_if_present(self.fbref_id.as_deref(), "fbref_id")?;
        require_if_present(self.transfermarkt_id.as_deref(), "transfermarkt_id")
    }
}

/// Join keys of one staff member.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StaffParams {
    pub transfermarkt_id: String,
    pub transfermarkt_path_name: Option<String>,
    pub fotmob_id: Option<String>,
}

impl StaffParams {
    pub fn validate(&self) -> Result<(), AppError> {
        require(&self.transfermarkt_id, "transfermarkt_id")?;
        require_if_present(self.fotmob_id.as_deref(), "fotmob_id")
    }
}

/// Join keys of one fixture.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchParams {
    pub fotmob_id: String,
    pub fbref_id: String,
}

impl MatchParams {
    pub fn validate(&self) -> Result<(), AppError> {
        require(&self.fotmob_id, "fotmob_id")?;
        require(&self.fbref_id, "fbref_id")
    }
}

/// Runs an adapter's parser, logging which source drifted on failure.
pub(crate) fn parse<A: SourceAdapter>(
    adapter: &A,
    raw: &RawResponse,
) -> Result<A::Output, AppError> {
    adapter.parse(raw).inspect_err(|e| {
        error!(
            "Failed to parse {} response from {}: {}",
            adapter.source(),
            raw.url,
            e
        )
    })
}

/// Next response of a batch whose length depends on optional sources.
pub(crate) fn next_response(
    responses: &mut impl Iterator<Item = RawResponse>,
) -> Result<RawResponse, AppError> {
    responses
        .next()
        .ok_or_else(|| AppError::api_unexpected_structure("batch returned too few responses", "batch"))
}

/// Parses the next response with `adapter` when that source was consulted.
pub(crate) fn parse_optional<A: SourceAdapter>(
    adapter: Option<&A>,
    responses: &mut impl Iterator<Item = RawResponse>,
) -> Result<Option<A::Output>, AppError> {
    adapter
        .map(|adapter| parse(adapter, &next_response(responses)?))
        .transpose()
}
