use reqwest::Client;
use serde::Serialize;
use tracing::{debug, info, instrument};

use super::{CompetitionParams, Names, parse};
use crate::competition_index::{CompetitionIndex, IndexedSource};
use crate::config::Config;
use crate::data_fetcher::execute_array;
use crate::error::AppError;
use crate::matching::{MatchField, Matchable, best_match};
use crate::sources::fbref::{self, FbrefCompetition};
use crate::sources::fotmob::{self, FotmobCompetition};
use crate::sources::official::{self, OfficialCompetition};
use crate::sources::{Season, SourceAdapter, Stat};

/// One tracked competition with the record of every source that lists it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompetitionEntry {
    pub key: String,
    pub id: String,
    pub name: String,
    pub names: Names,
    pub country_code: Option<String>,
    pub fotmob: FotmobCompetition,
    pub fbref: Option<FbrefCompetition>,
    pub official: Option<OfficialCompetition>,
    pub transfermarkt: IndexedSource,
}

/// Tracked competitions across FotMob, FBref and the official league.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Competitions {
    pub season: Option<Season>,
    entries: Vec<CompetitionEntry>,
}

/// Looks a competition up by its indexed id, falling back to the indexed name.
fn locate<'a, C>(
    indexed: &IndexedSource,
    records: &'a [C],
    cutoff: f64,
) -> Option<&'a C>
where
    C: Stat + Matchable,
{
    records
        .iter()
        .find(|record| record.id() == indexed.id)
        .or_else(|| best_match(indexed, records, MatchField::NAME, cutoff).map(|m| m.candidate))
}

impl Competitions {
    #[instrument(skip(client, config, index))]
    pub async fn fetch(
        client: &Client,
        config: &Config,
        index: &CompetitionIndex,
        season: Option<Season>,
    ) -> Result<Self, AppError> {
        info!("Fetching competitions");
        let fotmob = fotmob::AllLeaguesRequest {
            base_url: config.sources.fotmob.clone(),
        };
        let fbref = fbref::CompetitionsRequest {
            base_url: config.sources.fbref.clone(),
        };
        let official = official::CompetitionsRequest {
            base_url: config.sources.official.clone(),
        };

        let [fotmob_raw, fbref_raw, official_raw] = execute_array(
            client,
            [fotmob.descriptor(), fbref.descriptor(), official.descriptor()],
        )
        .await?;

        Self::fuse(
            index,
            season,
            parse(&fotmob, &fotmob_raw)?,
            parse(&fbref, &fbref_raw)?,
            parse(&official, &official_raw)?,
            config.cutoffs.competition,
        )
    }

    /// Resolves every indexed competition in each source's list. Competitions
    /// FotMob does not list are left out.
    pub fn fuse(
        index: &CompetitionIndex,
        season: Option<Season>,
        fotmob: Vec<FotmobCompetition>,
        fbref: Vec<FbrefCompetition>,
        official: Vec<OfficialCompetition>,
        cutoff: f64,
    ) -> Result<Self, AppError> {
        if fotmob.is_empty() {
            return Err(AppError::no_match("competition", "FotMob league list is empty"));
        }

        let mut entries = Vec::new();
        for (key, indexed) in index.entries() {
            let Some(primary) = locate(&indexed.fotmob, &fotmob, cutoff) else {
                debug!("No FotMob record for competition '{key}'");
                continue;
            };
            let fbref_record = locate(&indexed.fbref, &fbref, cutoff);
            let official_record = indexed
                .official
                .as_ref()
                .and_then(|o| locate(o, &official, cutoff));

            let mut names = Names::new();
            names.insert(&primary.name);
            names.extend(fbref_record.map(|r| r.name.as_str()));
            names.extend(official_record.map(|r| r.name.as_str()));

            entries.push(CompetitionEntry {
                key: key.to_string(),
                id: primary.id.clone(),
                name: primary.name.clone(),
                names,
                country_code: primary
                    .country_code
                    .clone()
                    .or_else(|| fbref_record.and_then(|r| r.country_code.clone())),
                fotmob: primary.clone(),
                fbref: fbref_record.cloned(),
                official: official_record.cloned(),
                transfermarkt: indexed.transfermarkt.clone(),
            });
        }

        info!("Resolved {} tracked competition(s)", entries.len());
        Ok(Competitions { season, entries })
    }

    pub fn entries(&self) -> &[CompetitionEntry] {
        &self.entries
    }

    pub fn get(&self, key: &str) -> Option<&CompetitionEntry> {
        self.entries.iter().find(|e| e.key == key)
    }

    /// Join keys for [`Competition::fetch`](super::Competition::fetch), for
    /// every competition FBref lists too.
    pub fn competition_params(&self) -> Vec<CompetitionParams> {
        self.entries
            .iter()
            .filter_map(|entry| {
                let fbref = entry.fbref.as_ref()?;
                Some(CompetitionParams {
                    fotmob_id: entry.fotmob.id.clone(),
                    fbref_id: fbref.id.clone(),
                    fbref_path_name: fbref.path_name.clone(),
                    official_name: entry.official.as_ref().map(|o| o.name.clone()),
                    transfermarkt_id: entry.transfermarkt.id.clone(),
                    transfermarkt_path_name: entry.transfermarkt.path_name.clone(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INDEX: &str = r#"{
        "premier-league": {
            "fotmob": {"id": "47", "name": "Premier League"},
            "fbref": {"id": "9", "name": "Premier League", "path_name": "Premier-League"},
            "official": {"id": "1", "name": "Premier League"},
            "transfermarkt": {"id": "GB1", "name": "Premier League", "path_name": "premier-league"}
        },
        "la-liga": {
            "fotmob": {"id": "87", "name": "LaLiga"},
            "fbref": {"id": "12", "name": "La Liga", "path_name": "La-Liga"},
            "transfermarkt": {"id": "ES1", "name": "LaLiga", "path_name": "laliga"}
        },
        "serie-a": {
            "fotmob": {"id": "55", "name": "Serie A"},
            "fbref": {"id": "11", "name": "Serie A", "path_name": "Serie-A"},
            "transfermarkt": {"id": "IT1", "name": "Serie A", "path_name": "serie-a"}
        }
    }"#;

    fn fotmob(id: &str, name: &str) -> FotmobCompetition {
        FotmobCompetition {
            id: id.to_string(),
            name: name.to_string(),
            country_code: Some("ENG".to_string()),
        }
    }

    fn fbref(id: &str, name: &str, path_name: &str) -> FbrefCompetition {
        FbrefCompetition {
            id: id.to_string(),
            name: name.to_string(),
            path_name: Some(path_name.to_string()),
            country_code: None,
        }
    }

    fn official(id: &str, name: &str) -> OfficialCompetition {
        OfficialCompetition {
            id: id.to_string(),
            name: name.to_string(),
            abbreviation: None,
        }
    }

    #[test]
    fn test_identical_spelling_is_deduped_and_both_ids_kept() {
        let index = CompetitionIndex::from_json(INDEX).unwrap();
        let competitions = Competitions::fuse(
            &index,
            None,
            vec![fotmob("47", "Premier League")],
            vec![fbref("9", "Premier League", "Premier-League")],
            vec![official("1", "Premier League")],
            80.0,
        )
        .unwrap();

        let entry = competitions.get("premier-league").unwrap();
        assert_eq!(entry.names.len(), 1);
        assert!(entry.names.contains("Premier League"));

        let params = competitions.competition_params();
        assert_eq!(params.len(), 1);
        assert_eq!(params[0].fotmob_id, "47");
        assert_eq!(params[0].fbref_id, "9");
        assert_eq!(params[0].official_name.as_deref(), Some("Premier League"));
        assert_eq!(params[0].transfermarkt_id, "GB1");
    }

    #[test]
    fn test_name_fallback_when_indexed_id_is_absent() {
        let index = CompetitionIndex::from_json(INDEX).unwrap();
        let competitions = Competitions::fuse(
            &index,
            None,
            vec![fotmob("87", "LaLiga")],
            // FBref renumbered the competition
            vec![fbref("120", "La Liga", "La-Liga")],
            Vec::new(),
            80.0,
        )
        .unwrap();

        let entry = competitions.get("la-liga").unwrap();
        assert_eq!(entry.fbref.as_ref().unwrap().id, "120");
        assert!(entry.names.contains("LaLiga"));
        assert!(entry.names.contains("La Liga"));
        assert_eq!(entry.official, None);
    }

    #[test]
    fn test_competitions_missing_from_fotmob_are_omitted() {
        let index = CompetitionIndex::from_json(INDEX).unwrap();
        let competitions = Competitions::fuse(
            &index,
            Some(Season::new(2023)),
            vec![fotmob("47", "Premier League"), fotmob("48", "Championship")],
            vec![fbref("9", "Premier League", "Premier-League")],
            Vec::new(),
            80.0,
        )
        .unwrap();

        assert_eq!(competitions.entries().len(), 1);
        assert!(competitions.get("serie-a").is_none());
    }

    #[test]
    fn test_competition_without_fbref_has_no_params() {
        let index = CompetitionIndex::from_json(INDEX).unwrap();
        let competitions = Competitions::fuse(
            &index,
            None,
            vec![fotmob("55", "Serie A")],
            vec![fbref("9", "Premier League", "Premier-League")],
            Vec::new(),
            80.0,
        )
        .unwrap();

        assert_eq!(competitions.entries().len(), 1);
        assert!(competitions.entries()[0].fbref.is_none());
        assert!(competitions.competition_params().is_empty());
    }

    #[test]
    fn test_empty_fotmob_list_is_fatal() {
        let index = CompetitionIndex::from_json(INDEX).unwrap();
        let err = Competitions::fuse(&index, None, Vec::new(), Vec::new(), Vec::new(), 80.0)
            .unwrap_err();
        assert!(matches!(err, AppError::NoMatch { .. }));
    }
}
