use chrono::NaiveDate;
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, info, instrument};

use super::{MatchParams, Names, parse};
use crate::competition_index::CompetitionIndex;
use crate::config::Config;
use crate::data_fetcher::execute_array;
use crate::error::AppError;
use crate::matching::{MatchField, best_match};
use crate::sources::fbref::{self, FbrefMatchSummary};
use crate::sources::fotmob::{self, FotmobMatchSummary};
use crate::sources::{SideScore, SourceAdapter};

/// A tracked fixture found on both FotMob and FBref.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchEntry {
    pub competition_key: String,
    pub id: String,
    pub name: String,
    pub names: Names,
    pub utc_time: Option<String>,
    pub home: SideScore,
    pub away: SideScore,
    pub finished: bool,
    pub cancelled: bool,
    pub fotmob: FotmobMatchSummary,
    pub fbref: FbrefMatchSummary,
}

/// Fixtures of tracked competitions on one day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Matches {
    pub date: NaiveDate,
    fotmob: Vec<FotmobMatchSummary>,
    fbref: Vec<FbrefMatchSummary>,
    entries: Vec<MatchEntry>,
}

impl Matches {
    #[instrument(skip(client, config, index))]
    pub async fn fetch(
        client: &Client,
        config: &Config,
        index: &CompetitionIndex,
        date: NaiveDate,
    ) -> Result<Self, AppError> {
        info!("Fetching matches");
        let fotmob = fotmob::MatchesRequest {
            base_url: config.sources.fotmob.clone(),
            date,
        };
        let fbref = fbref::MatchesRequest {
            base_url: config.sources.fbref.clone(),
            date,
        };

        let [fotmob_raw, fbref_raw] =
            execute_array(client, [fotmob.descriptor(), fbref.descriptor()]).await?;

        Ok(Self::fuse(
            index,
            date,
            parse(&fotmob, &fotmob_raw)?,
            parse(&fbref, &fbref_raw)?,
            config.cutoffs.fixture,
        ))
    }

    /// Keeps fixtures of indexed competitions and pairs each FotMob fixture
    /// with the FBref fixture of the same competition whose home and away
    /// names fit best. An empty day is not an error.
    pub fn fuse(
        index: &CompetitionIndex,
        date: NaiveDate,
        fotmob: Vec<FotmobMatchSummary>,
        fbref: Vec<FbrefMatchSummary>,
        cutoff: f64,
    ) -> Self {
        let fotmob: Vec<FotmobMatchSummary> = fotmob
            .into_iter()
            .filter(|m| index.key_for_fotmob_id(&m.competition_id).is_some())
            .collect();
        let fbref: Vec<FbrefMatchSummary> = fbref
            .into_iter()
            .filter(|m| index.key_for_fbref_id(&m.competition_id).is_some())
            .collect();

        let mut entries = Vec::new();
        for key in index.keys() {
            let candidates: Vec<&FbrefMatchSummary> = fbref
                .iter()
                .filter(|m| index.key_for_fbref_id(&m.competition_id) == Some(key))
                .collect();

            for fixture in fotmob
                .iter()
                .filter(|m| index.key_for_fotmob_id(&m.competition_id) == Some(key))
            {
                let Some(matched) = best_match(fixture, &candidates, MatchField::FIXTURE, cutoff)
                else {
                    debug!("No FBref fixture for '{}'", fixture.name);
                    continue;
                };
                let other: &FbrefMatchSummary = matched.candidate;

                let mut names = Names::new();
                names.insert(&fixture.name);
                names.insert(&other.name);

                entries.push(MatchEntry {
                    competition_key: key.to_string(),
                    id: fixture.id.clone(),
                    name: fixture.name.clone(),
                    names,
                    utc_time: fixture.utc_time.clone(),
                    home: fixture.home.clone(),
                    away: fixture.away.clone(),
                    finished: fixture.finished,
                    cancelled: fixture.cancelled,
                    fotmob: fixture.clone(),
                    fbref: other.clone(),
                });
            }
        }

        info!(
            "{} tracked fixture(s) on {}, {} matched",
            fotmob.len(),
            date,
            entries.len()
        );
        Matches {
            date,
            fotmob,
            fbref,
            entries,
        }
    }

    pub fn entries(&self) -> &[MatchEntry] {
        &self.entries
    }

    /// FotMob fixtures of tracked competitions, cancelled ones included.
    pub fn fotmob_matches(&self) -> &[FotmobMatchSummary] {
        &self.fotmob
    }

    pub fn fbref_matches(&self) -> &[FbrefMatchSummary] {
        &self.fbref
    }

    /// Join keys for [`Match::fetch`](super::Match::fetch). Cancelled
    /// fixtures have no report and are skipped.
    pub fn match_params(&self) -> Vec<MatchParams> {
        self.entries
            .iter()
            .filter(|entry| !entry.cancelled)
            .map(|entry| MatchParams {
                fotmob_id: entry.id.clone(),
                fbref_id: entry.fbref.id.clone(),
            })
            .collect()
    }
}
