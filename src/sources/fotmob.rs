//! FotMob JSON API adapters.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;

use super::{Position, Season, SideScore, Source, SourceAdapter, join_url};
use crate::data_fetcher::{FetchDescriptor, RawResponse};
use crate::error::AppError;
use crate::matching::{MatchField, Matchable};

/// FotMob sends ids as numbers in most payloads and as strings in a few.
fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Number(i64),
        Text(String),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Number(n) => n.to_string(),
        Id::Text(s) => s,
    })
}

fn opt_id_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Wrapper(#[serde(deserialize_with = "id_string")] String);

    Ok(Option::<Wrapper>::deserialize(deserializer)?.map(|Wrapper(id)| id))
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FotmobCompetition {
    pub id: String,
    pub name: String,
    pub country_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FotmobTableRow {
    pub id: String,
    pub name: String,
    pub short_name: Option<String>,
    pub position: u32,
    pub played: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub points: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FotmobLeague {
    pub id: String,
    pub name: String,
    pub country_code: Option<String>,
    pub season: Option<String>,
    pub table: Vec<FotmobTableRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FotmobSquadMember {
    pub id: String,
    pub name: String,
    pub country_code: Option<String>,
    pub position: Option<Position>,
    pub shirt_number: Option<u32>,
    pub age: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FotmobTeam {
    pub id: String,
    pub name: String,
    pub short_name: Option<String>,
    pub country_code: Option<String>,
    pub players: Vec<FotmobSquadMember>,
    pub staff: Vec<FotmobSquadMember>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FotmobTeamRef {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FotmobPlayer {
    pub id: String,
    pub name: String,
    pub country_code: Option<String>,
    pub position: Option<Position>,
    pub birth_date: Option<String>,
    pub height_cm: Option<u32>,
    pub shirt_number: Option<u32>,
    pub team: Option<FotmobTeamRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FotmobMatchSummary {
    pub id: String,
    /// `Home - Away`
    pub name: String,
    pub competition_id: String,
    pub competition_name: String,
    pub home: SideScore,
    pub away: SideScore,
    pub utc_time: Option<String>,
    pub started: bool,
    pub finished: bool,
    pub cancelled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FotmobLineupPlayer {
    pub id: String,
    pub name: String,
    pub position: Option<Position>,
    pub shirt_number: Option<String>,
    pub starter: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FotmobMatch {
    pub id: String,
    /// `Home - Away`
    pub name: String,
    pub competition_id: Option<String>,
    pub competition_name: Option<String>,
    pub utc_time: Option<String>,
    pub home: SideScore,
    pub away: SideScore,
    pub home_xg: Option<f64>,
    pub away_xg: Option<f64>,
    pub finished: bool,
    pub cancelled: bool,
    pub home_lineup: Vec<FotmobLineupPlayer>,
    pub away_lineup: Vec<FotmobLineupPlayer>,
}

impl_stat!(
    FotmobCompetition,
    FotmobTableRow,
    FotmobLeague,
    FotmobSquadMember,
    FotmobTeam,
    FotmobPlayer,
    FotmobMatchSummary,
    FotmobLineupPlayer,
    FotmobMatch,
);

impl Matchable for FotmobCompetition {
    fn field(&self, field: MatchField) -> Option<&str> {
        match field {
            MatchField::Name => Some(&self.name),
            MatchField::CountryCode => self.country_code.as_deref(),
            _ => None,
        }
    }
}

impl Matchable for FotmobTableRow {
    fn field(&self, field: MatchField) -> Option<&str> {
        match field {
            MatchField::Name => Some(&self.name),
            _ => None,
        }
    }
}

impl Matchable for FotmobSquadMember {
    fn field(&self, field: MatchField) -> Option<&str> {
        match field {
            MatchField::Name => Some(&self.name),
            MatchField::CountryCode => self.country_code.as_deref(),
            MatchField::Position => self.position.map(|p| p.code()),
            _ => None,
        }
    }
}

impl Matchable for FotmobMatchSummary {
    fn field(&self, field: MatchField) -> Option<&str> {
        match field {
            MatchField::HomeTeam => Some(&self.home.name),
            MatchField::AwayTeam => Some(&self.away.name),
            _ => None,
        }
    }
}

impl Matchable for FotmobLineupPlayer {
    fn field(&self, field: MatchField) -> Option<&str> {
        match field {
            MatchField::Name => Some(&self.name),
            MatchField::Position => self.position.map(|p| p.code()),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// allLeagues
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct AllLeaguesResponse {
    #[serde(default)]
    popular: Vec<LeagueEntry>,
    #[serde(default)]
    international: Vec<LeagueGroup>,
    #[serde(default)]
    countries: Vec<LeagueGroup>,
}

#[derive(Debug, Deserialize)]
struct LeagueGroup {
    ccode: Option<String>,
    #[serde(default)]
    leagues: Vec<LeagueEntry>,
}

#[derive(Debug, Deserialize)]
struct LeagueEntry {
    #[serde(deserialize_with = "id_string")]
    id: String,
    name: String,
}

/// Every league FotMob knows about.
#[derive(Debug, Clone)]
pub struct AllLeaguesRequest {
    pub base_url: String,
}

impl SourceAdapter for AllLeaguesRequest {
    type Output = Vec<FotmobCompetition>;

    fn source(&self) -> Source {
        Source::Fotmob
    }

    fn descriptor(&self) -> FetchDescriptor {
        FetchDescriptor::get(join_url(&self.base_url, "allLeagues"))
    }

    fn parse(&self, raw: &RawResponse) -> Result<Self::Output, AppError> {
        let response: AllLeaguesResponse = raw.json()?;

        let mut seen = HashSet::new();
        let mut competitions = Vec::new();
        let grouped = response
            .countries
            .into_iter()
            .chain(response.international)
            .flat_map(|group| {
                let ccode = group.ccode;
                group
                    .leagues
                    .into_iter()
                    .map(move |league| (league, ccode.clone()))
            });
        let popular = response.popular.into_iter().map(|league| (league, None));

        // Grouped entries carry a country code; popular ones only fill gaps.
        for (league, country_code) in grouped.chain(popular) {
            if seen.insert(league.id.clone()) {
                competitions.push(FotmobCompetition {
                    id: league.id,
                    name: league.name,
                    country_code,
                });
            }
        }
        Ok(competitions)
    }
}

// ---------------------------------------------------------------------------
// leagues
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct LeagueResponse {
    details: LeagueDetails,
    #[serde(default)]
    table: Vec<TableBlock>,
}

#[derive(Debug, Deserialize)]
struct LeagueDetails {
    #[serde(deserialize_with = "id_string")]
    id: String,
    name: String,
    #[serde(default)]
    country: Option<String>,
    #[serde(rename = "selectedSeason", default)]
    selected_season: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TableBlock {
    data: TableData,
}

#[derive(Debug, Deserialize)]
struct TableData {
    table: TableGroups,
}

#[derive(Debug, Deserialize)]
struct TableGroups {
    all: Vec<TableEntry>,
}

#[derive(Debug, Deserialize)]
struct TableEntry {
    #[serde(deserialize_with = "id_string")]
    id: String,
    name: String,
    #[serde(rename = "shortName", default)]
    short_name: Option<String>,
    idx: u32,
    played: u32,
    wins: u32,
    draws: u32,
    losses: u32,
    #[serde(rename = "scoresStr")]
    scores_str: String,
    pts: u32,
}

/// `"91-29"` into goals for and against
fn parse_scores(scores: &str) -> Option<(u32, u32)> {
    let (goals_for, goals_against) = scores.split_once('-')?;
    Some((goals_for.trim().parse().ok()?, goals_against.trim().parse().ok()?))
}

/// League overview including the overall table.
#[derive(Debug, Clone)]
pub struct LeagueRequest {
    pub base_url: String,
    pub id: String,
    pub season: Option<Season>,
}

impl SourceAdapter for LeagueRequest {
    type Output = FotmobLeague;

    fn source(&self) -> Source {
        Source::Fotmob
    }

    fn descriptor(&self) -> FetchDescriptor {
        let descriptor =
            FetchDescriptor::get(join_url(&self.base_url, "leagues")).with_param("id", &self.id);
        match self.season {
            Some(season) => descriptor.with_param("season", season.fotmob()),
            None => descriptor,
        }
    }

    fn parse(&self, raw: &RawResponse) -> Result<Self::Output, AppError> {
        let response: LeagueResponse = raw.json()?;

        // Split tables (e.g. groups) are flattened in order
        let mut table = Vec::new();
        for entry in response.table.into_iter().flat_map(|b| b.data.table.all) {
            let (goals_for, goals_against) = parse_scores(&entry.scores_str).ok_or_else(|| {
                AppError::api_unexpected_structure(
                    format!("unreadable score string '{}'", entry.scores_str),
                    &raw.url,
                )
            })?;
            table.push(FotmobTableRow {
                id: entry.id,
                name: entry.name,
                short_name: entry.short_name,
                position: entry.idx,
                played: entry.played,
                wins: entry.wins,
                draws: entry.draws,
                losses: entry.losses,
                goals_for,
                goals_against,
                points: entry.pts,
            });
        }

        Ok(FotmobLeague {
            id: response.details.id,
            name: response.details.name,
            country_code: response.details.country,
            season: response.details.selected_season,
            table,
        })
    }
}

// ---------------------------------------------------------------------------
// teams
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct TeamResponse {
    details: TeamDetails,
    squad: SquadBlock,
}

#[derive(Debug, Deserialize)]
struct TeamDetails {
    #[serde(deserialize_with = "id_string")]
    id: String,
    name: String,
    #[serde(rename = "shortName", default)]
    short_name: Option<String>,
    #[serde(default)]
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SquadBlock {
    squad: Vec<SquadGroup>,
}

#[derive(Debug, Deserialize)]
struct SquadGroup {
    title: String,
    #[serde(default)]
    members: Vec<SquadEntry>,
}

#[derive(Debug, Deserialize)]
struct SquadEntry {
    #[serde(deserialize_with = "id_string")]
    id: String,
    name: String,
    #[serde(default)]
    ccode: Option<String>,
    #[serde(rename = "shirtNumber", default)]
    shirt_number: Option<u32>,
    #[serde(default)]
    age: Option<u32>,
}

/// Team overview with the current squad grouped by position.
#[derive(Debug, Clone)]
pub struct TeamRequest {
    pub base_url: String,
    pub id: String,
}

impl SourceAdapter for TeamRequest {
    type Output = FotmobTeam;

    fn source(&self) -> Source {
        Source::Fotmob
    }

    fn descriptor(&self) -> FetchDescriptor {
        FetchDescriptor::get(join_url(&self.base_url, "teams")).with_param("id", &self.id)
    }

    fn parse(&self, raw: &RawResponse) -> Result<Self::Output, AppError> {
        let response: TeamResponse = raw.json()?;

        let mut players = Vec::new();
        let mut staff = Vec::new();
        for group in response.squad.squad {
            let is_staff = group.title.eq_ignore_ascii_case("coach");
            let position = Position::from_label(&group.title);
            for entry in group.members {
                let member = FotmobSquadMember {
                    id: entry.id,
                    name: entry.name,
                    country_code: entry.ccode,
                    position: if is_staff { None } else { position },
                    shirt_number: entry.shirt_number,
                    age: entry.age,
                };
                if is_staff {
                    staff.push(member);
                } else {
                    players.push(member);
                }
            }
        }

        Ok(FotmobTeam {
            id: response.details.id,
            name: response.details.name,
            short_name: response.details.short_name,
            country_code: response.details.country,
            players,
            staff,
        })
    }
}

// ---------------------------------------------------------------------------
// playerData
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct PlayerResponse {
    #[serde(deserialize_with = "id_string")]
    id: String,
    name: String,
    #[serde(rename = "birthDate", default)]
    birth_date: Option<UtcTime>,
    #[serde(rename = "primaryTeam", default)]
    primary_team: Option<PrimaryTeam>,
    #[serde(rename = "positionDescription", default)]
    position_description: Option<PositionDescription>,
    #[serde(rename = "playerInformation", default)]
    player_information: Vec<InformationEntry>,
}

#[derive(Debug, Deserialize)]
struct UtcTime {
    #[serde(rename = "utcTime")]
    utc_time: String,
}

#[derive(Debug, Deserialize)]
struct PrimaryTeam {
    #[serde(rename = "teamId", deserialize_with = "id_string")]
    team_id: String,
    #[serde(rename = "teamName")]
    team_name: String,
}

#[derive(Debug, Deserialize)]
struct PositionDescription {
    #[serde(rename = "primaryPosition", default)]
    primary_position: Option<Label>,
}

#[derive(Debug, Deserialize)]
struct Label {
    label: String,
}

#[derive(Debug, Deserialize)]
struct InformationEntry {
    title: String,
    value: InformationValue,
    #[serde(rename = "countryCode", default)]
    country_code: Option<String>,
}

#[derive(Debug, Deserialize)]
struct InformationValue {
    #[serde(default)]
    fallback: Option<serde_json::Value>,
}

impl InformationValue {
    fn text(&self) -> Option<String> {
        match self.fallback.as_ref()? {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// Leading digits of `183 cm` or `22`
fn leading_number(text: &str) -> Option<u32> {
    let digits: String = text
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

/// Player profile. Also serves staff members, who FotMob models as players.
#[derive(Debug, Clone)]
pub struct PlayerRequest {
    pub base_url: String,
    pub id: String,
}

impl SourceAdapter for PlayerRequest {
    type Output = FotmobPlayer;

    fn source(&self) -> Source {
        Source::Fotmob
    }

    fn descriptor(&self) -> FetchDescriptor {
        FetchDescriptor::get(join_url(&self.base_url, "playerData")).with_param("id", &self.id)
    }

    fn parse(&self, raw: &RawResponse) -> Result<Self::Output, AppError> {
        let response: PlayerResponse = raw.json()?;

        let mut player = FotmobPlayer {
            id: response.id,
            name: response.name,
            country_code: None,
            position: response
                .position_description
                .and_then(|d| d.primary_position)
                .and_then(|p| Position::from_label(&p.label)),
            birth_date: response
                .birth_date
                .map(|d| d.utc_time.chars().take(10).collect()),
            height_cm: None,
            shirt_number: None,
            team: response.primary_team.map(|t| FotmobTeamRef {
                id: t.team_id,
                name: t.team_name,
            }),
        };

        for entry in response.player_information {
            match entry.title.as_str() {
                "Country" => player.country_code = entry.country_code,
                "Height" => player.height_cm = entry.value.text().and_then(|t| leading_number(&t)),
                "Shirt" => {
                    player.shirt_number = entry.value.text().and_then(|t| leading_number(&t))
                }
                _ => {}
            }
        }
        Ok(player)
    }
}

// ---------------------------------------------------------------------------
// matches
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct MatchesResponse {
    #[serde(default)]
    leagues: Vec<MatchesLeague>,
}

#[derive(Debug, Deserialize)]
struct MatchesLeague {
    #[serde(rename = "primaryId", deserialize_with = "id_string")]
    primary_id: String,
    name: String,
    #[serde(default)]
    matches: Vec<MatchEntry>,
}

#[derive(Debug, Deserialize)]
struct MatchEntry {
    #[serde(deserialize_with = "id_string")]
    id: String,
    home: SideEntry,
    away: SideEntry,
    status: MatchStatus,
}

#[derive(Debug, Deserialize)]
struct SideEntry {
    #[serde(deserialize_with = "id_string")]
    id: String,
    name: String,
    #[serde(default)]
    score: Option<u32>,
}

impl From<SideEntry> for SideScore {
    fn from(side: SideEntry) -> Self {
        SideScore {
            id: side.id,
            name: side.name,
            score: side.score,
        }
    }
}

#[derive(Debug, Deserialize)]
struct MatchStatus {
    #[serde(rename = "utcTime", default)]
    utc_time: Option<String>,
    #[serde(default)]
    started: bool,
    #[serde(default)]
    finished: bool,
    #[serde(default)]
    cancelled: bool,
}

/// Every fixture FotMob lists on one day.
#[derive(Debug, Clone)]
pub struct MatchesRequest {
    pub base_url: String,
    pub date: NaiveDate,
}

impl SourceAdapter for MatchesRequest {
    type Output = Vec<FotmobMatchSummary>;

    fn source(&self) -> Source {
        Source::Fotmob
    }

    fn descriptor(&self) -> FetchDescriptor {
        FetchDescriptor::get(join_url(&self.base_url, "matches"))
            .with_param("date", self.date.format("%Y%m%d").to_string())
    }

    fn parse(&self, raw: &RawResponse) -> Result<Self::Output, AppError> {
        let response: MatchesResponse = raw.json()?;

        Ok(response
            .leagues
            .into_iter()
            .flat_map(|league| {
                let competition_id = league.primary_id;
                let competition_name = league.name;
                league
                    .matches
                    .into_iter()
                    .map(move |m| {
                        let home: SideScore = m.home.into();
                        let away: SideScore = m.away.into();
                        FotmobMatchSummary {
                            id: m.id,
                            name: format!("{} - {}", home.name, away.name),
                            competition_id: competition_id.clone(),
                            competition_name: competition_name.clone(),
                            home,
                            away,
                            utc_time: m.status.utc_time,
                            started: m.status.started,
                            finished: m.status.finished,
                            cancelled: m.status.cancelled,
                        }
                    })
            })
            .collect())
    }
}

// ---------------------------------------------------------------------------
// matchDetails
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct MatchDetailsResponse {
    general: MatchGeneral,
    header: MatchHeader,
    #[serde(default)]
    content: Option<MatchContent>,
}

#[derive(Debug, Deserialize)]
struct MatchGeneral {
    #[serde(rename = "matchId", deserialize_with = "id_string")]
    match_id: String,
    #[serde(rename = "leagueId", default, deserialize_with = "opt_id_string")]
    league_id: Option<String>,
    #[serde(rename = "leagueName", default)]
    league_name: Option<String>,
    #[serde(rename = "matchTimeUTCDate", default)]
    match_time_utc_date: Option<String>,
    #[serde(default)]
    finished: bool,
}

#[derive(Debug, Deserialize)]
struct MatchHeader {
    teams: Vec<SideEntry>,
    #[serde(default)]
    status: Option<HeaderStatus>,
}

#[derive(Debug, Deserialize)]
struct HeaderStatus {
    #[serde(default)]
    cancelled: bool,
}

#[derive(Debug, Deserialize)]
struct MatchContent {
    #[serde(default)]
    lineup: Option<Lineups>,
    #[serde(default)]
    stats: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct Lineups {
    #[serde(rename = "homeTeam")]
    home_team: LineupSide,
    #[serde(rename = "awayTeam")]
    away_team: LineupSide,
}

#[derive(Debug, Deserialize)]
struct LineupSide {
    #[serde(default)]
    starters: Vec<LineupEntry>,
    #[serde(default)]
    subs: Vec<LineupEntry>,
}

#[derive(Debug, Deserialize)]
struct LineupEntry {
    #[serde(deserialize_with = "id_string")]
    id: String,
    name: String,
    #[serde(rename = "usualPlayingPositionId", default)]
    usual_playing_position_id: Option<i64>,
    #[serde(rename = "shirtNumber", default, deserialize_with = "opt_id_string")]
    shirt_number: Option<String>,
}

impl LineupSide {
    fn into_players(self) -> Vec<FotmobLineupPlayer> {
        let starters = self.starters.into_iter().map(|p| (p, true));
        let subs = self.subs.into_iter().map(|p| (p, false));
        starters
            .chain(subs)
            .map(|(p, starter)| FotmobLineupPlayer {
                id: p.id,
                name: p.name,
                position: p.usual_playing_position_id.and_then(Position::from_fotmob_id),
                shirt_number: p.shirt_number,
                starter,
            })
            .collect()
    }
}

/// Finds the `expected_goals` entry of the whole-match stats period.
fn expected_goals(stats: &serde_json::Value) -> Option<(f64, f64)> {
    let groups = stats.pointer("/Periods/All/stats")?.as_array()?;
    let entry = groups
        .iter()
        .filter_map(|g| g.get("stats")?.as_array())
        .flatten()
        .find(|s| s.get("key").and_then(|k| k.as_str()) == Some("expected_goals"))?;
    let values = entry.get("stats")?.as_array()?;
    let as_f64 = |v: &serde_json::Value| match v {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.parse().ok(),
        _ => None,
    };
    Some((as_f64(values.first()?)?, as_f64(values.get(1)?)?))
}

/// Full match details: score, lineups and team stats.
#[derive(Debug, Clone)]
pub struct MatchDetailsRequest {
    pub base_url: String,
    pub id: String,
}

impl SourceAdapter for MatchDetailsRequest {
    type Output = FotmobMatch;

    fn source(&self) -> Source {
        Source::Fotmob
    }

    fn descriptor(&self) -> FetchDescriptor {
        FetchDescriptor::get(join_url(&self.base_url, "matchDetails"))
            .with_param("matchId", &self.id)
    }

    fn parse(&self, raw: &RawResponse) -> Result<Self::Output, AppError> {
        let response: MatchDetailsResponse = raw.json()?;

        let mut teams = response.header.teams.into_iter();
        let (Some(home), Some(away)) = (teams.next(), teams.next()) else {
            return Err(AppError::api_unexpected_structure(
                "match header lists fewer than two teams",
                &raw.url,
            ));
        };
        let home: SideScore = home.into();
        let away: SideScore = away.into();

        let content = response.content;
        let xg = content
            .as_ref()
            .and_then(|c| c.stats.as_ref())
            .and_then(expected_goals);
        let (home_lineup, away_lineup) = match content.and_then(|c| c.lineup) {
            Some(lineup) => (
                lineup.home_team.into_players(),
                lineup.away_team.into_players(),
            ),
            None => (Vec::new(), Vec::new()),
        };

        Ok(FotmobMatch {
            id: response.general.match_id,
            name: format!("{} - {}", home.name, away.name),
            competition_id: response.general.league_id,
            competition_name: response.general.league_name,
            utc_time: response.general.match_time_utc_date,
            home,
            away,
            home_xg: xg.map(|(home, _)| home),
            away_xg: xg.map(|(_, away)| away),
            finished: response.general.finished,
            cancelled: response.header.status.is_some_and(|s| s.cancelled),
            home_lineup,
            away_lineup,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::Stat;

    const BASE: &str = "https://www.fotmob.com/api";

    fn raw(body: &str) -> RawResponse {
        RawResponse::new("https://www.fotmob.com/api/test", 200, body)
    }

    #[test]
    fn test_all_leagues_dedupes_and_keeps_country_codes() {
        let body = r#"{
            "popular": [{"id": 47, "name": "Premier League"}, {"id": 42, "name": "Champions League"}],
            "international": [{"ccode": "INT", "name": "International",
                "leagues": [{"id": 42, "name": "Champions League"}]}],
            "countries": [{"ccode": "ENG", "name": "England",
                "leagues": [{"id": 47, "name": "Premier League"}, {"id": 48, "name": "Championship"}]}]
        }"#;
        let adapter = AllLeaguesRequest {
            base_url: BASE.to_string(),
        };
        assert_eq!(adapter.descriptor().url, "https://www.fotmob.com/api/allLeagues");

        let competitions = adapter.parse(&raw(body)).unwrap();
        assert_eq!(competitions.len(), 3);
        assert_eq!(competitions[0].id, "47");
        assert_eq!(competitions[0].country_code.as_deref(), Some("ENG"));
        let ucl = competitions.iter().find(|c| c.id == "42").unwrap();
        assert_eq!(ucl.country_code.as_deref(), Some("INT"));
    }

    #[test]
    fn test_league_table_parsing() {
        let body = r#"{
            "details": {"id": 47, "name": "Premier League", "country": "ENG", "selectedSeason": "2023/2024"},
            "table": [{"data": {"table": {"all": [
                {"id": 8456, "name": "Manchester City", "shortName": "Man City", "idx": 1,
                 "played": 38, "wins": 28, "draws": 7, "losses": 3, "scoresStr": "96-34", "pts": 91},
                {"id": 9825, "name": "Arsenal", "shortName": "Arsenal", "idx": 2,
                 "played": 38, "wins": 28, "draws": 5, "losses": 5, "scoresStr": "91-29", "pts": 89}
            ]}}}]
        }"#;
        let adapter = LeagueRequest {
            base_url: BASE.to_string(),
            id: "47".to_string(),
            season: Some(Season::new(2023)),
        };
        let descriptor = adapter.descriptor();
        assert_eq!(
            descriptor.display_url(),
            "https://www.fotmob.com/api/leagues?id=47&season=2023/2024"
        );

        let league = adapter.parse(&raw(body)).unwrap();
        assert_eq!(league.name(), "Premier League");
        assert_eq!(league.season.as_deref(), Some("2023/2024"));
        assert_eq!(league.table.len(), 2);
        assert_eq!(league.table[1].goals_for, 91);
        assert_eq!(league.table[1].goals_against, 29);
        assert_eq!(league.table[1].id(), "9825");
    }

    #[test]
    fn test_league_with_unreadable_scores_is_format_drift() {
        let body = r#"{"details": {"id": 47, "name": "Premier League"},
            "table": [{"data": {"table": {"all": [
                {"id": 1, "name": "X", "idx": 1, "played": 0, "wins": 0, "draws": 0,
                 "losses": 0, "scoresStr": "n/a", "pts": 0}]}}}]}"#;
        let adapter = LeagueRequest {
            base_url: BASE.to_string(),
            id: "47".to_string(),
            season: None,
        };
        let err = adapter.parse(&raw(body)).unwrap_err();
        assert!(err.is_parse());
    }

    #[test]
    fn test_team_squad_groups() {
        let body = r#"{
            "details": {"id": 9825, "name": "Arsenal", "shortName": "Arsenal", "country": "ENG"},
            "squad": {"squad": [
                {"title": "coach", "members": [{"id": 100, "name": "Mikel Arteta", "ccode": "ESP"}]},
                {"title": "keepers", "members": [
                    {"id": 562727, "name": "David Raya", "ccode": "ESP", "shirtNumber": 22, "age": 28}]},
                {"title": "attackers", "members": [
                    {"id": 961995, "name": "Bukayo Saka", "ccode": "ENG", "shirtNumber": 7, "age": 22}]}
            ]}
        }"#;
        let adapter = TeamRequest {
            base_url: BASE.to_string(),
            id: "9825".to_string(),
        };
        let team = adapter.parse(&raw(body)).unwrap();
        assert_eq!(team.staff.len(), 1);
        assert_eq!(team.staff[0].position, None);
        assert_eq!(team.players.len(), 2);
        assert_eq!(team.players[0].position, Some(Position::Goalkeeper));
        assert_eq!(team.players[1].position, Some(Position::Forward));
        assert_eq!(team.players[0].field(MatchField::Position), Some("GK"));
    }

    #[test]
    fn test_player_data() {
        let body = r#"{
            "id": 562727, "name": "David Raya",
            "birthDate": {"utcTime": "1995-09-15T00:00:00.000Z"},
            "primaryTeam": {"teamId": 9825, "teamName": "Arsenal"},
            "positionDescription": {"primaryPosition": {"label": "Keeper"}},
            "playerInformation": [
                {"title": "Height", "value": {"fallback": "183 cm"}},
                {"title": "Shirt", "value": {"fallback": 22}},
                {"title": "Country", "value": {"fallback": "Spain"}, "countryCode": "ESP"}
            ]
        }"#;
        let adapter = PlayerRequest {
            base_url: BASE.to_string(),
            id: "562727".to_string(),
        };
        let player = adapter.parse(&raw(body)).unwrap();
        assert_eq!(player.birth_date.as_deref(), Some("1995-09-15"));
        assert_eq!(player.height_cm, Some(183));
        assert_eq!(player.shirt_number, Some(22));
        assert_eq!(player.country_code.as_deref(), Some("ESP"));
        assert_eq!(player.position, Some(Position::Goalkeeper));
        assert_eq!(player.team.unwrap().name, "Arsenal");
    }

    #[test]
    fn test_matches_by_date() {
        let body = r#"{"leagues": [{"primaryId": 47, "id": 47, "name": "Premier League", "matches": [
            {"id": 4193490, "home": {"id": 8456, "name": "Manchester City", "score": 2},
             "away": {"id": 10252, "name": "Sheffield United", "score": 0},
             "status": {"utcTime": "2023-12-30T15:00:00Z", "started": true, "finished": true}},
            {"id": 4193491, "home": {"id": 1, "name": "Luton Town"},
             "away": {"id": 2, "name": "Chelsea"},
             "status": {"cancelled": true}}
        ]}]}"#;
        let adapter = MatchesRequest {
            base_url: BASE.to_string(),
            date: NaiveDate::from_ymd_opt(2023, 12, 30).unwrap(),
        };
        assert_eq!(
            adapter.descriptor().params,
            vec![("date".to_string(), "20231230".to_string())]
        );
        let matches = adapter.parse(&raw(body)).unwrap();
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].competition_id, "47");
        assert_eq!(matches[0].name, "Manchester City - Sheffield United");
        assert_eq!(Stat::name(&matches[1]), "Luton Town - Chelsea");
        assert_eq!(matches[0].home.score, Some(2));
        assert!(!matches[0].cancelled);
        assert!(matches[1].cancelled);
        assert_eq!(matches[1].field(MatchField::AwayTeam), Some("Chelsea"));
    }

    #[test]
    fn test_match_details() {
        let body = r#"{
            "general": {"matchId": "4193490", "leagueId": 47, "leagueName": "Premier League",
                "matchTimeUTCDate": "2023-12-30T15:00:00.000Z", "finished": true},
            "header": {"teams": [{"id": 8456, "name": "Manchester City", "score": 2},
                                 {"id": 10252, "name": "Sheffield United", "score": 0}],
                       "status": {"cancelled": false}},
            "content": {
                "lineup": {
                    "homeTeam": {"starters": [{"id": 1, "name": "Ederson", "usualPlayingPositionId": 0, "shirtNumber": "31"}],
                                 "subs": [{"id": 2, "name": "Stefan Ortega", "usualPlayingPositionId": 0, "shirtNumber": 18}]},
                    "awayTeam": {"starters": [{"id": 3, "name": "Wes Foderingham", "usualPlayingPositionId": 0}]}
                },
                "stats": {"Periods": {"All": {"stats": [
                    {"title": "Top stats", "stats": [
                        {"key": "ball_possession", "stats": [70, 30]},
                        {"key": "expected_goals", "stats": ["2.61", "0.32"]}
                    ]}
                ]}}}
            }
        }"#;
        let adapter = MatchDetailsRequest {
            base_url: BASE.to_string(),
            id: "4193490".to_string(),
        };
        let details = adapter.parse(&raw(body)).unwrap();
        assert_eq!(details.name, "Manchester City - Sheffield United");
        assert_eq!(details.home.score, Some(2));
        assert_eq!(details.home_xg, Some(2.61));
        assert_eq!(details.away_xg, Some(0.32));
        assert_eq!(details.home_lineup.len(), 2);
        assert!(details.home_lineup[0].starter);
        assert!(!details.home_lineup[1].starter);
        assert_eq!(details.home_lineup[1].shirt_number.as_deref(), Some("18"));
        assert_eq!(details.away_lineup[0].position, Some(Position::Goalkeeper));
    }

    #[test]
    fn test_match_details_without_teams_fails() {
        let body = r#"{"general": {"matchId": 1}, "header": {"teams": []}}"#;
        let adapter = MatchDetailsRequest {
            base_url: BASE.to_string(),
            id: "1".to_string(),
        };
        assert!(adapter.parse(&raw(body)).unwrap_err().is_parse());
    }
}
