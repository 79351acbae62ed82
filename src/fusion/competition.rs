use reqwest::Client;
use serde::Serialize;
use std::cmp::Ordering;
use tracing::{debug, info, instrument};

use super::{CompetitionParams, Names, TeamParams, next_response, parse, parse_optional};
use crate::config::Config;
use crate::data_fetcher::execute;
use crate::error::AppError;
use crate::matching::{MatchField, match_unique};
use crate::sources::fbref::{self, FbrefCompetitionStats, FbrefShooting, FbrefTableRow};
use crate::sources::fotmob::{self, FotmobLeague, FotmobTableRow};
use crate::sources::official::{self, OfficialStandings, OfficialTableRow};
use crate::sources::transfermarkt::{self, TransfermarktClubEntry, TransfermarktCompetition};
use crate::sources::{Season, SourceAdapter};

/// One team of a competition, reconciled across sources.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompetitionTeam {
    pub id: String,
    pub name: String,
    pub names: Names,
    pub fotmob: FotmobTableRow,
    pub fbref: Option<FbrefTableRow>,
    pub shooting: Option<FbrefShooting>,
    pub official: Option<OfficialTableRow>,
    pub transfermarkt: Option<TransfermarktClubEntry>,
}

/// A standings row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableEntry {
    pub position: usize,
    pub id: String,
    pub name: String,
    pub played: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub goal_difference: i64,
    pub points: u32,
    pub xg_for: Option<f64>,
    pub xg_against: Option<f64>,
    pub market_value: Option<u64>,
}

impl TableEntry {
    /// Points, then goal difference, then goals scored, all descending;
    /// the team name ascending settles what is left.
    pub fn standings_order(a: &TableEntry, b: &TableEntry) -> Ordering {
        b.points
            .cmp(&a.points)
            .then_with(|| b.goal_difference.cmp(&a.goal_difference))
            .then_with(|| b.goals_for.cmp(&a.goals_for))
            .then_with(|| a.name.cmp(&b.name))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompetitionInfo {
    pub id: String,
    pub name: String,
    pub names: Names,
    pub season: Option<String>,
    pub country_code: Option<String>,
    pub market_value: Option<u64>,
    pub teams: usize,
}

/// One competition season across all four sources.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Competition {
    pub params: CompetitionParams,
    pub fotmob: FotmobLeague,
    pub fbref: FbrefCompetitionStats,
    pub official: Option<OfficialStandings>,
    pub transfermarkt: TransfermarktCompetition,
    teams: Vec<CompetitionTeam>,
}

impl Competition {
    #[instrument(skip(client, config), fields(fotmob_id = %params.fotmob_id))]
    pub async fn fetch(
        client: &Client,
        config: &Config,
        params: &CompetitionParams,
        season: Option<Season>,
    ) -> Result<Self, AppError> {
        info!("Fetching competition");
        let fotmob = fotmob::LeagueRequest {
            base_url: config.sources.fotmob.clone(),
            id: params.fotmob_id.clone(),
            season,
        };
        let fbref = fbref::CompetitionRequest {
            base_url: config.sources.fbref.clone(),
            id: params.fbref_id.clone(),
            path_name: params.fbref_path_name.clone(),
            season,
        };
        let transfermarkt = transfermarkt::CompetitionRequest {
            base_url: config.sources.transfermarkt.clone(),
            id: params.transfermarkt_id.clone(),
            path_name: params.transfermarkt_path_name.clone(),
            season,
        };
        let official = params
            .official_name
            .as_ref()
            .map(|name| official::StandingsRequest {
                base_url: config.sources.official.clone(),
                competition: name.clone(),
                season,
            });

        let mut descriptors = vec![
            fotmob.descriptor(),
            fbref.descriptor(),
            transfermarkt.descriptor(),
        ];
        descriptors.extend(official.as_ref().map(|o| o.descriptor()));

        let mut responses = execute(client, &descriptors).await?.into_iter();
        let fotmob = parse(&fotmob, &next_response(&mut responses)?)?;
        let fbref = parse(&fbref, &next_response(&mut responses)?)?;
        let transfermarkt = parse(&transfermarkt, &next_response(&mut responses)?)?;
        let official = parse_optional(official.as_ref(), &mut responses)?;

        Self::fuse(
            params.clone(),
            fotmob,
            fbref,
            official,
            transfermarkt,
            config.cutoffs.team,
        )
    }

    /// Matches every FotMob table row against the other sources by team name.
    /// Each other-source row joins at most one FotMob row; rows that join
    /// none are dropped.
    pub fn fuse(
        params: CompetitionParams,
        fotmob: FotmobLeague,
        fbref: FbrefCompetitionStats,
        official: Option<OfficialStandings>,
        transfermarkt: TransfermarktCompetition,
        cutoff: f64,
    ) -> Result<Self, AppError> {
        if !fotmob.table.is_empty() {
            if fbref.table.is_empty() {
                return Err(AppError::no_match("FBref standings", &fotmob.name));
            }
            if transfermarkt.clubs.is_empty() {
                return Err(AppError::no_match("Transfermarkt clubs", &fotmob.name));
            }
        }

        let official_table = official.as_ref().map_or(&[][..], |o| &o.table[..]);
        let fbref_rows = match_unique(&fotmob.table, &fbref.table, MatchField::NAME, cutoff);
        let official_rows = match_unique(&fotmob.table, official_table, MatchField::NAME, cutoff);
        let clubs = match_unique(&fotmob.table, &transfermarkt.clubs, MatchField::NAME, cutoff);

        let mut teams = Vec::with_capacity(fotmob.table.len());
        for (i, row) in fotmob.table.iter().enumerate() {
            let (fbref_row, official_row, club) = (fbref_rows[i], official_rows[i], clubs[i]);
            if fbref_row.is_none() || club.is_none() {
                debug!("Team '{}' is missing in FBref or Transfermarkt", row.name);
            }

            let mut names = Names::new();
            names.insert(&row.name);
            names.extend(row.short_name.as_deref());
            names.extend(fbref_row.map(|m| m.candidate.name.as_str()));
            names.extend(official_row.map(|m| m.candidate.name.as_str()));
            names.extend(club.map(|m| m.candidate.name.as_str()));

            let shooting = fbref_row.and_then(|m| {
                fbref
                    .shooting
                    .iter()
                    .find(|s| s.id == m.candidate.id)
                    .map(|s| s.shooting.clone())
            });

            teams.push(CompetitionTeam {
                id: row.id.clone(),
                name: row.name.clone(),
                names,
                fotmob: row.clone(),
                fbref: fbref_row.map(|m| m.candidate.clone()),
                shooting,
                official: official_row.map(|m| m.candidate.clone()),
                transfermarkt: club.map(|m| m.candidate.clone()),
            });
        }

        Ok(Competition {
            params,
            fotmob,
            fbref,
            official,
            transfermarkt,
            teams,
        })
    }

    pub fn teams(&self) -> &[CompetitionTeam] {
        &self.teams
    }

    pub fn info(&self) -> CompetitionInfo {
        let mut names = Names::new();
        names.insert(&self.fotmob.name);
        names.insert(&self.fbref.name);
        names.insert(&self.transfermarkt.name);
        names.extend(self.official.as_ref().map(|o| o.name.as_str()));

        CompetitionInfo {
            id: self.fotmob.id.clone(),
            name: self.fotmob.name.clone(),
            names,
            season: self
                .fotmob
                .season
                .clone()
                .or_else(|| self.fbref.season.clone()),
            country_code: self.fotmob.country_code.clone(),
            market_value: self.transfermarkt.market_value,
            teams: self.teams.len(),
        }
    }

    /// Standings in table order. Results come from FotMob; xG and market
    /// values are added where the team was matched.
    pub fn table(&self) -> Vec<TableEntry> {
        let mut table: Vec<TableEntry> = self
            .teams
            .iter()
            .map(|team| {
                let row = &team.fotmob;
                TableEntry {
                    position: 0,
                    id: team.id.clone(),
                    name: team.name.clone(),
                    played: row.played,
                    wins: row.wins,
                    draws: row.draws,
                    losses: row.losses,
                    goals_for: row.goals_for,
                    goals_against: row.goals_against,
                    goal_difference: i64::from(row.goals_for) - i64::from(row.goals_against),
                    points: row.points,
                    xg_for: team.fbref.as_ref().and_then(|f| f.xg_for),
                    xg_against: team.fbref.as_ref().and_then(|f| f.xg_against),
                    market_value: team.transfermarkt.as_ref().and_then(|t| t.market_value),
                }
            })
            .collect();

        table.sort_by(TableEntry::standings_order);
        for (i, entry) in table.iter_mut().enumerate() {
            entry.position = i + 1;
        }
        table
    }

    /// Join keys for [`Team::fetch`](super::Team::fetch), for every team
    /// matched in both FBref and Transfermarkt.
    pub fn team_params(&self) -> Vec<TeamParams> {
        self.teams
            .iter()
            .filter_map(|team| {
                let fbref = team.fbref.as_ref()?;
                let club = team.transfermarkt.as_ref()?;
                Some(TeamParams {
                    fotmob_id: team.id.clone(),
                    fbref_id: fbref.id.clone(),
                    fbref_path_name: fbref.path_name.clone(),
                    transfermarkt_id: club.id.clone(),
                    transfermarkt_path_name: club.path_name.clone(),
                })
            })
            .collect()
    }
}
