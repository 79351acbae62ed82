use reqwest::Client;
use serde::Serialize;
use tracing::{debug, info, instrument};

use super::{MatchParams, Names, parse};
use crate::config::Config;
use crate::data_fetcher::execute_array;
use crate::error::AppError;
use crate::matching::{MatchField, best_match};
use crate::sources::fbref::{self, FbrefLineupPlayer, FbrefMatchReport};
use crate::sources::fotmob::{self, FotmobLineupPlayer, FotmobMatch};
use crate::sources::{Position, SideScore, SourceAdapter};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineupEntry {
    pub id: String,
    pub name: String,
    pub names: Names,
    pub position: Option<Position>,
    pub shirt_number: Option<String>,
    pub starter: bool,
    pub fbref_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchSide {
    pub id: String,
    pub name: String,
    pub names: Names,
    pub score: Option<u32>,
    pub xg: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchInfo {
    pub id: String,
    pub name: String,
    pub names: Names,
    pub competition: Option<String>,
    pub date: Option<String>,
    pub finished: bool,
    pub cancelled: bool,
    pub home: MatchSide,
    pub away: MatchSide,
}

/// One fixture from FotMob match details and the FBref match report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Match {
    pub params: MatchParams,
    pub fotmob: FotmobMatch,
    pub fbref: FbrefMatchReport,
    home_lineup: Vec<LineupEntry>,
    away_lineup: Vec<LineupEntry>,
}

fn lineup(
    fotmob: &[FotmobLineupPlayer],
    fbref: &[FbrefLineupPlayer],
    cutoff: f64,
) -> Vec<LineupEntry> {
    fotmob
        .iter()
        .filter_map(|player| {
            let Some(matched) = best_match(player, fbref, MatchField::NAME, cutoff) else {
                debug!("No FBref lineup entry for '{}'", player.name);
                return None;
            };
            let other = matched.candidate;
            let mut names = Names::new();
            names.insert(&player.name);
            names.insert(&other.name);

            Some(LineupEntry {
                id: player.id.clone(),
                name: player.name.clone(),
                names,
                position: player.position,
                shirt_number: player
                    .shirt_number
                    .clone()
                    .or_else(|| other.shirt_number.clone()),
                starter: player.starter,
                fbref_id: other.id.clone(),
            })
        })
        .collect()
}

fn side(fotmob: &SideScore, fbref: &SideScore, xg: Option<f64>, fbref_xg: Option<f64>) -> MatchSide {
    let mut names = Names::new();
    names.insert(&fotmob.name);
    names.insert(&fbref.name);
    MatchSide {
        id: fotmob.id.clone(),
        name: fotmob.name.clone(),
        names,
        score: fotmob.score.or(fbref.score),
        xg: xg.or(fbref_xg),
    }
}

impl Match {
    #[instrument(skip(client, config), fields(fotmob_id = %params.fotmob_id, fbref_id = %params.fbref_id))]
    pub async fn fetch(
        client: &Client,
        config: &Config,
        params: &MatchParams,
    ) -> Result<Self, AppError> {
        info!("Fetching match");
        let fotmob = fotmob::MatchDetailsRequest {
            base_url: config.sources.fotmob.clone(),
            id: params.fotmob_id.clone(),
        };
        let fbref = fbref::MatchReportRequest {
            base_url: config.sources.fbref.clone(),
            id: params.fbref_id.clone(),
        };

        let [fotmob_raw, fbref_raw] =
            execute_array(client, [fotmob.descriptor(), fbref.descriptor()]).await?;

        Ok(Self::fuse(
            params.clone(),
            parse(&fotmob, &fotmob_raw)?,
            parse(&fbref, &fbref_raw)?,
            config.cutoffs.player,
        ))
    }

    /// Lineups are matched per side by player name; FBref lineups carry no
    /// nationality or position.
    pub fn fuse(params: MatchParams, fotmob: FotmobMatch, fbref: FbrefMatchReport, cutoff: f64) -> Self {
        let home_lineup = lineup(&fotmob.home_lineup, &fbref.home_lineup, cutoff);
        let away_lineup = lineup(&fotmob.away_lineup, &fbref.away_lineup, cutoff);
        Match {
            params,
            fotmob,
            fbref,
            home_lineup,
            away_lineup,
        }
    }

    pub fn home_lineup(&self) -> &[LineupEntry] {
        &self.home_lineup
    }

    pub fn away_lineup(&self) -> &[LineupEntry] {
        &self.away_lineup
    }

    pub fn info(&self) -> MatchInfo {
        let mut names = Names::new();
        names.insert(&self.fotmob.name);
        names.insert(&self.fbref.name);

        MatchInfo {
            id: self.fotmob.id.clone(),
            name: self.fotmob.name.clone(),
            names,
            competition: self.fotmob.competition_name.clone(),
            date: self
                .fotmob
                .utc_time
                .clone()
                .or_else(|| self.fbref.date.clone()),
            finished: self.fotmob.finished,
            cancelled: self.fotmob.cancelled,
            home: side(
                &self.fotmob.home,
                &self.fbref.home,
                self.fotmob.home_xg,
                self.fbref.home_xg,
            ),
            away: side(
                &self.fotmob.away,
                &self.fbref.away,
                self.fotmob.away_xg,
                self.fbref.away_xg,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(id: &str, name: &str, score: Option<u32>) -> SideScore {
        SideScore {
            id: id.to_string(),
            name: name.to_string(),
            score,
        }
    }

    fn fotmob_player(id: &str, name: &str, starter: bool) -> FotmobLineupPlayer {
        FotmobLineupPlayer {
            id: id.to_string(),
            name: name.to_string(),
            position: Some(Position::Midfielder),
            shirt_number: None,
            starter,
        }
    }

    fn fbref_player(id: &str, name: &str, shirt: &str) -> FbrefLineupPlayer {
        FbrefLineupPlayer {
            id: id.to_string(),
            name: name.to_string(),
            shirt_number: Some(shirt.to_string()),
            starter: true,
        }
    }

    fn fixture() -> (FotmobMatch, FbrefMatchReport) {
        let fotmob = FotmobMatch {
            id: "4193701".to_string(),
            name: "Manchester City - Arsenal".to_string(),
            competition_id: Some("47".to_string()),
            competition_name: Some("Premier League".to_string()),
            utc_time: Some("2024-03-31T15:30:00.000Z".to_string()),
            home: score("8456", "Manchester City", Some(0)),
            away: score("9825", "Arsenal", Some(0)),
            home_xg: Some(0.82),
            away_xg: None,
            finished: true,
            cancelled: false,
            home_lineup: vec![fotmob_player("1", "Rodri", true)],
            away_lineup: vec![
                fotmob_player("2", "Martin Ødegaard", true),
                fotmob_player("3", "Declan Rice", true),
                fotmob_player("4", "Academy Substitute", false),
            ],
        };
        let fbref = FbrefMatchReport {
            id: "e5f6a7b8".to_string(),
            name: "Manchester City - Arsenal".to_string(),
            date: Some("2024-03-31".to_string()),
            home: score("b8fd03ef", "Manchester City", Some(0)),
            away: score("18bb7c10", "Arsenal", Some(0)),
            home_xg: Some(0.8),
            away_xg: Some(0.4),
            home_lineup: vec![fbref_player("6434f10d", "Rodri", "16")],
            away_lineup: vec![
                fbref_player("79300479", "Martin Ødegaard", "8"),
                fbref_player("1c7012b8", "Declan Rice", "41"),
            ],
        };
        (fotmob, fbref)
    }

    fn params() -> MatchParams {
        MatchParams {
            fotmob_id: "4193701".to_string(),
            fbref_id: "e5f6a7b8".to_string(),
        }
    }

    #[test]
    fn test_lineups_match_per_side() {
        let (fotmob, fbref) = fixture();
        let fixture = Match::fuse(params(), fotmob, fbref, 80.0);

        assert_eq!(fixture.home_lineup().len(), 1);
        assert_eq!(fixture.home_lineup()[0].fbref_id, "6434f10d");
        assert_eq!(fixture.home_lineup()[0].shirt_number.as_deref(), Some("16"));

        let away: Vec<&str> = fixture.away_lineup().iter().map(|e| e.fbref_id.as_str()).collect();
        assert_eq!(away, vec!["79300479", "1c7012b8"]);
    }

    #[test]
    fn test_info_fills_missing_xg_from_fbref() {
        let (fotmob, fbref) = fixture();
        let info = Match::fuse(params(), fotmob, fbref, 80.0).info();

        assert_eq!(info.id, "4193701");
        assert_eq!(info.home.xg, Some(0.82));
        assert_eq!(info.away.xg, Some(0.4));
        assert_eq!(info.home.score, Some(0));
        assert_eq!(info.names.len(), 1);
        assert_eq!(info.competition.as_deref(), Some("Premier League"));
        assert_eq!(info.date.as_deref(), Some("2024-03-31T15:30:00.000Z"));
    }
}
