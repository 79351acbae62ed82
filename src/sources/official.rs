//! Official league JSON API adapters.

use serde::{Deserialize, Serialize};

use super::{Season, Source, SourceAdapter, join_url};
use crate::data_fetcher::{FetchDescriptor, RawResponse};
use crate::error::AppError;
use crate::matching::{MatchField, Matchable};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfficialCompetition {
    pub id: String,
    pub name: String,
    pub abbreviation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfficialTableRow {
    pub id: String,
    pub name: String,
    pub short_name: Option<String>,
    pub abbreviation: Option<String>,
    pub position: u32,
    pub played: u32,
    pub won: u32,
    pub drawn: u32,
    pub lost: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub points: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfficialStandings {
    pub id: String,
    pub name: String,
    pub season: Option<String>,
    pub table: Vec<OfficialTableRow>,
}

impl_stat!(OfficialCompetition, OfficialTableRow, OfficialStandings);

impl Matchable for OfficialCompetition {
    fn field(&self, field: MatchField) -> Option<&str> {
        match field {
            MatchField::Name => Some(&self.name),
            _ => None,
        }
    }
}

impl Matchable for OfficialTableRow {
    fn field(&self, field: MatchField) -> Option<&str> {
        match field {
            MatchField::Name => Some(&self.name),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CompetitionsResponse {
    competitions: Vec<CompetitionEntry>,
}

#[derive(Debug, Deserialize)]
struct CompetitionEntry {
    id: serde_json::Value,
    name: String,
    #[serde(default)]
    abbreviation: Option<String>,
}

fn value_id(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Competitions the league body publishes data for.
#[derive(Debug, Clone)]
pub struct CompetitionsRequest {
    pub base_url: String,
}

impl SourceAdapter for CompetitionsRequest {
    type Output = Vec<OfficialCompetition>;

    fn source(&self) -> Source {
        Source::Official
    }

    fn descriptor(&self) -> FetchDescriptor {
        FetchDescriptor::get(join_url(&self.base_url, "competitions"))
            .with_header("Origin", "https://www.premierleague.com")
    }

    fn parse(&self, raw: &RawResponse) -> Result<Self::Output, AppError> {
        let response: CompetitionsResponse = raw.json()?;
        Ok(response
            .competitions
            .into_iter()
            .map(|c| OfficialCompetition {
                id: value_id(&c.id),
                name: c.name,
                abbreviation: c.abbreviation,
            })
            .collect())
    }
}

#[derive(Debug, Deserialize)]
struct StandingsResponse {
    competition: StandingsCompetition,
    #[serde(default)]
    season: Option<String>,
    tables: Vec<StandingsTable>,
}

#[derive(Debug, Deserialize)]
struct StandingsCompetition {
    id: serde_json::Value,
    name: String,
}

#[derive(Debug, Deserialize)]
struct StandingsTable {
    entries: Vec<StandingsEntry>,
}

#[derive(Debug, Deserialize)]
struct StandingsEntry {
    team: StandingsTeam,
    position: u32,
    overall: Overall,
}

#[derive(Debug, Deserialize)]
struct StandingsTeam {
    id: serde_json::Value,
    name: String,
    #[serde(rename = "shortName", default)]
    short_name: Option<String>,
    #[serde(default)]
    club: Option<Club>,
}

#[derive(Debug, Deserialize)]
struct Club {
    #[serde(default)]
    abbr: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Overall {
    played: u32,
    won: u32,
    drawn: u32,
    lost: u32,
    #[serde(rename = "goalsFor")]
    goals_for: u32,
    #[serde(rename = "goalsAgainst")]
    goals_against: u32,
    points: u32,
}

/// League standings of one competition, selected by its official name.
#[derive(Debug, Clone)]
pub struct StandingsRequest {
    pub base_url: String,
    pub competition: String,
    pub season: Option<Season>,
}

impl SourceAdapter for StandingsRequest {
    type Output = OfficialStandings;

    fn source(&self) -> Source {
        Source::Official
    }

    fn descriptor(&self) -> FetchDescriptor {
        let descriptor = FetchDescriptor::get(join_url(&self.base_url, "standings"))
            .with_param("competition", &self.competition)
            .with_header("Origin", "https://www.premierleague.com");
        match self.season {
            Some(season) => descriptor.with_param("season", season.official()),
            None => descriptor,
        }
    }

    fn parse(&self, raw: &RawResponse) -> Result<Self::Output, AppError> {
        let response: StandingsResponse = raw.json()?;
        if response.tables.is_empty() {
            return Err(AppError::api_no_data("standings contain no table", &raw.url));
        }

        let table = response
            .tables
            .into_iter()
            .flat_map(|t| t.entries)
            .map(|entry| OfficialTableRow {
                id: value_id(&entry.team.id),
                name: entry.team.name,
                short_name: entry.team.short_name,
                abbreviation: entry.team.club.and_then(|c| c.abbr),
                position: entry.position,
                played: entry.overall.played,
                won: entry.overall.won,
                drawn: entry.overall.drawn,
                lost: entry.overall.lost,
                goals_for: entry.overall.goals_for,
                goals_against: entry.overall.goals_against,
                points: entry.overall.points,
            })
            .collect();

        Ok(OfficialStandings {
            id: value_id(&response.competition.id),
            name: response.competition.name,
            season: response.season,
            table,
        })
    }
}
