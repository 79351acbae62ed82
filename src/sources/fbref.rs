//! FBref HTML adapters.
//!
//! FBref tables are keyed by `data-stat` attributes, which are far more stable
//! than column order. Secondary tables ship inside HTML comments and are only
//! visible after [`uncomment`].

use chrono::NaiveDate;
use scraper::{ElementRef, Html};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::str::FromStr;

use super::codes::fbref_nation_code;
use super::html::{
    href, parse_number, path_segments, select_first, select_text, selector, segment_after,
    stat_cell, text, uncomment,
};
use super::{PathRef, Position, Season, SideScore, Source, SourceAdapter, join_url};
use crate::data_fetcher::{FetchDescriptor, RawResponse};
use crate::error::AppError;
use crate::matching::{MatchField, Matchable};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FbrefCompetition {
    pub id: String,
    pub name: String,
    pub path_name: Option<String>,
    pub country_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FbrefTableRow {
    pub id: String,
    pub name: String,
    pub path_name: Option<String>,
    pub position: Option<u32>,
    pub played: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub points: u32,
    pub xg_for: Option<f64>,
    pub xg_against: Option<f64>,
}

/// Squad shooting totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FbrefShooting {
    pub shots: u32,
    pub shots_on_target: u32,
    pub xg: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FbrefTeamShooting {
    pub id: String,
    pub name: String,
    pub shooting: FbrefShooting,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FbrefCompetitionStats {
    pub id: String,
    pub name: String,
    pub season: Option<String>,
    pub table: Vec<FbrefTableRow>,
    pub shooting: Vec<FbrefTeamShooting>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FbrefSquadPlayer {
    pub id: String,
    pub name: String,
    pub path_name: Option<String>,
    pub country_code: Option<String>,
    pub position: Option<Position>,
    pub age: Option<u32>,
    pub games: Option<u32>,
    pub minutes: Option<u32>,
    pub goals: Option<u32>,
    pub assists: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FbrefSquad {
    pub id: String,
    pub name: String,
    pub season: Option<String>,
    pub players: Vec<FbrefSquadPlayer>,
    pub shooting: FbrefShooting,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FbrefPlayer {
    pub id: String,
    pub name: String,
    pub path_name: Option<String>,
    pub position: Option<Position>,
    pub footed: Option<String>,
    pub height_cm: Option<u32>,
    pub birth_date: Option<String>,
    pub country_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FbrefMatchSummary {
    pub id: String,
    /// `Home - Away`
    pub name: String,
    pub competition_id: String,
    pub home: SideScore,
    pub away: SideScore,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FbrefLineupPlayer {
    pub id: String,
    pub name: String,
    pub shirt_number: Option<String>,
    pub starter: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FbrefMatchReport {
    pub id: String,
    pub name: String,
    pub date: Option<String>,
    pub home: SideScore,
    pub away: SideScore,
    pub home_xg: Option<f64>,
    pub away_xg: Option<f64>,
    pub home_lineup: Vec<FbrefLineupPlayer>,
    pub away_lineup: Vec<FbrefLineupPlayer>,
}

impl_stat!(
    FbrefCompetition,
    FbrefTableRow,
    FbrefTeamShooting,
    FbrefCompetitionStats,
    FbrefSquadPlayer,
    FbrefSquad,
    FbrefPlayer,
    FbrefMatchSummary,
    FbrefLineupPlayer,
    FbrefMatchReport,
);

impl Matchable for FbrefCompetition {
    fn field(&self, field: MatchField) -> Option<&str> {
        match field {
            MatchField::Name => Some(&self.name),
            MatchField::CountryCode => self.country_code.as_deref(),
            _ => None,
        }
    }
}

impl Matchable for FbrefTableRow {
    fn field(&self, field: MatchField) -> Option<&str> {
        match field {
            MatchField::Name => Some(&self.name),
            _ => None,
        }
    }
}

impl Matchable for FbrefSquadPlayer {
    fn field(&self, field: MatchField) -> Option<&str> {
        match field {
            MatchField::Name => Some(&self.name),
            MatchField::CountryCode => self.country_code.as_deref(),
            MatchField::Position => self.position.map(|p| p.code()),
            _ => None,
        }
    }
}

impl Matchable for FbrefMatchSummary {
    fn field(&self, field: MatchField) -> Option<&str> {
        match field {
            MatchField::HomeTeam => Some(&self.home.name),
            MatchField::AwayTeam => Some(&self.away.name),
            _ => None,
        }
    }
}

impl Matchable for FbrefLineupPlayer {
    fn field(&self, field: MatchField) -> Option<&str> {
        match field {
            MatchField::Name => Some(&self.name),
            _ => None,
        }
    }
}

/// Optional numeric `data-stat` cell
fn stat_number<T: FromStr>(row: ElementRef<'_>, stat: &str) -> Result<Option<T>, AppError> {
    Ok(stat_cell(row, stat)?.and_then(|t| parse_number(&t)))
}

/// Mandatory numeric `data-stat` cell
fn required_number<T: FromStr>(row: ElementRef<'_>, stat: &str, url: &str) -> Result<T, AppError> {
    stat_number(row, stat)?.ok_or_else(|| AppError::element_not_found(format!("data-stat={stat}"), url))
}

/// Last path segment of an FBref link without its page suffix:
/// `/en/squads/18bb7c10/Arsenal-Stats` becomes `Arsenal`.
fn path_name(link: &str) -> Option<String> {
    let last = path_segments(link).last().copied()?;
    let trimmed = ["-Stats", "-Seasons"]
        .iter()
        .find_map(|suffix| last.strip_suffix(*suffix))
        .unwrap_or(last);
    Some(trimmed.to_string())
}

/// Id and path name of the first link in `scope` pointing below `/en/<kind>/`.
fn linked_ref(scope: ElementRef<'_>, kind: &str) -> Result<Option<(PathRef, String)>, AppError> {
    let sel = selector(&format!("a[href*=\"/{kind}/\"]"))?;
    Ok(scope.select(&sel).find_map(|a| {
        let link = href(a)?;
        let id = segment_after(link, kind)?;
        Some((PathRef::new(id, path_name(link)), text(a)))
    }))
}

/// Splits page headings such as `2023-2024 Arsenal Stats, Premier League`
/// into the season and the entity name.
fn split_heading(heading: &str) -> (Option<String>, String) {
    let name = heading.split(" Stats").next().unwrap_or(heading).trim();
    match name.split_once(' ') {
        Some((first, rest))
            if first.len() >= 4 && first.chars().all(|c| c.is_ascii_digit() || c == '-') =>
        {
            (Some(first.to_string()), rest.trim().to_string())
        }
        _ => (None, name.to_string()),
    }
}

fn heading(document: &Html, url: &str) -> Result<(Option<String>, String), AppError> {
    let h1 = select_first(document.root_element(), "h1", url)?;
    Ok(split_heading(&text(h1)))
}

fn shooting(row: ElementRef<'_>, url: &str) -> Result<FbrefShooting, AppError> {
    Ok(FbrefShooting {
        shots: required_number(row, "shots", url)?,
        shots_on_target: required_number(row, "shots_on_target", url)?,
        xg: stat_number(row, "xg")?,
    })
}

/// Data rows of a stats table, without repeated header and spacer rows.
const BODY_ROWS: &str = "tbody > tr:not(.thead):not(.spacer):not(.over_header)";

// ---------------------------------------------------------------------------
// Competitions
// ---------------------------------------------------------------------------

/// All competitions FBref covers.
#[derive(Debug, Clone)]
pub struct CompetitionsRequest {
    pub base_url: String,
}

impl SourceAdapter for CompetitionsRequest {
    type Output = Vec<FbrefCompetition>;

    fn source(&self) -> Source {
        Source::Fbref
    }

    fn descriptor(&self) -> FetchDescriptor {
        FetchDescriptor::get(join_url(&self.base_url, "/en/comps/"))
    }

    fn parse(&self, raw: &RawResponse) -> Result<Self::Output, AppError> {
        let document = Html::parse_document(&uncomment(&raw.body));
        let tables = selector("table[id^=\"comps_\"]")?;
        let rows = selector(BODY_ROWS)?;
        let league_name = selector("[data-stat=\"league_name\"]")?;

        let mut seen = HashSet::new();
        let mut competitions = Vec::new();
        for table in document.select(&tables) {
            for row in table.select(&rows) {
                let Some(cell) = row.select(&league_name).next() else {
                    continue;
                };
                let Some((link, name)) = linked_ref(cell, "comps")? else {
                    continue;
                };
                if !seen.insert(link.id.clone()) {
                    continue;
                }
                competitions.push(FbrefCompetition {
                    id: link.id,
                    name,
                    path_name: link.path_name,
                    country_code: stat_cell(row, "country")?.and_then(|c| fbref_nation_code(&c)),
                });
            }
        }

        if competitions.is_empty() {
            return Err(AppError::element_not_found("table[id^=comps_] rows", &raw.url));
        }
        Ok(competitions)
    }
}

// ---------------------------------------------------------------------------
// Competition stats
// ---------------------------------------------------------------------------

/// Season stats page of one competition: standings and squad shooting.
#[derive(Debug, Clone)]
pub struct CompetitionRequest {
    pub base_url: String,
    pub id: String,
    pub path_name: Option<String>,
    pub season: Option<Season>,
}

impl SourceAdapter for CompetitionRequest {
    type Output = FbrefCompetitionStats;

    fn source(&self) -> Source {
        Source::Fbref
    }

    fn descriptor(&self) -> FetchDescriptor {
        let path = match (&self.season, &self.path_name) {
            (Some(season), Some(name)) => format!(
                "/en/comps/{}/{}/{}-{}-Stats",
                self.id,
                season.fbref(),
                season.fbref(),
                name
            ),
            (Some(season), None) => format!("/en/comps/{}/{}", self.id, season.fbref()),
            (None, Some(name)) => format!("/en/comps/{}/{}-Stats", self.id, name),
            (None, None) => format!("/en/comps/{}", self.id),
        };
        FetchDescriptor::get(join_url(&self.base_url, &path))
    }

    fn parse(&self, raw: &RawResponse) -> Result<Self::Output, AppError> {
        let document = Html::parse_document(&uncomment(&raw.body));
        let (season, name) = heading(&document, &raw.url)?;

        let standings = select_first(document.root_element(), "table[id$=\"_overall\"]", &raw.url)?;
        let mut table = Vec::new();
        for row in standings.select(&selector(BODY_ROWS)?) {
            let Some((team, team_name)) = linked_ref(row, "squads")? else {
                continue;
            };
            table.push(FbrefTableRow {
                id: team.id,
                name: team_name,
                path_name: team.path_name,
                position: stat_number(row, "rank")?,
                played: required_number(row, "games", &raw.url)?,
                wins: required_number(row, "wins", &raw.url)?,
                draws: required_number(row, "ties", &raw.url)?,
                losses: required_number(row, "losses", &raw.url)?,
                goals_for: required_number(row, "goals_for", &raw.url)?,
                goals_against: required_number(row, "goals_against", &raw.url)?,
                points: required_number(row, "points", &raw.url)?,
                xg_for: stat_number(row, "xg_for")?,
                xg_against: stat_number(row, "xg_against")?,
            });
        }

        let mut squad_shooting = Vec::new();
        let shooting_table = selector("table#stats_squads_shooting_for")?;
        if let Some(shooting_table) = document.select(&shooting_table).next() {
            for row in shooting_table.select(&selector(BODY_ROWS)?) {
                let Some((team, team_name)) = linked_ref(row, "squads")? else {
                    continue;
                };
                squad_shooting.push(FbrefTeamShooting {
                    id: team.id,
                    name: team_name,
                    shooting: shooting(row, &raw.url)?,
                });
            }
        }

        Ok(FbrefCompetitionStats {
            id: self.id.clone(),
            name,
            season,
            table,
            shooting: squad_shooting,
        })
    }
}

// ---------------------------------------------------------------------------
// Squad
// ---------------------------------------------------------------------------

/// Squad page: standard stats roster and shooting totals.
#[derive(Debug, Clone)]
pub struct SquadRequest {
    pub base_url: String,
    pub id: String,
    pub path_name: Option<String>,
    pub season: Option<Season>,
}

impl SourceAdapter for SquadRequest {
    type Output = FbrefSquad;

    fn source(&self) -> Source {
        Source::Fbref
    }

    fn descriptor(&self) -> FetchDescriptor {
        let mut path = format!("/en/squads/{}", self.id);
        if let Some(season) = self.season {
            path.push('/');
            path.push_str(&season.fbref());
        }
        if let Some(name) = &self.path_name {
            path.push_str(&format!("/{name}-Stats"));
        }
        FetchDescriptor::get(join_url(&self.base_url, &path))
    }

    fn parse(&self, raw: &RawResponse) -> Result<Self::Output, AppError> {
        let document = Html::parse_document(&uncomment(&raw.body));
        let root = document.root_element();
        let (season, name) = heading(&document, &raw.url)?;

        let standard = select_first(root, "table[id^=\"stats_standard\"]", &raw.url)?;
        let mut players = Vec::new();
        for row in standard.select(&selector(BODY_ROWS)?) {
            let Some((player, player_name)) = linked_ref(row, "players")? else {
                continue;
            };
            players.push(FbrefSquadPlayer {
                id: player.id,
                name: player_name,
                path_name: player.path_name,
                country_code: stat_cell(row, "nationality")?.and_then(|c| fbref_nation_code(&c)),
                position: stat_cell(row, "position")?.and_then(|p| Position::from_label(&p)),
                age: stat_cell(row, "age")?
                    .and_then(|a| a.split('-').next().and_then(|years| years.parse().ok())),
                games: stat_number(row, "games")?,
                minutes: stat_number(row, "minutes")?,
                goals: stat_number(row, "goals")?,
                assists: stat_number(row, "assists")?,
            });
        }

        let totals = select_first(root, "table[id^=\"stats_shooting\"] tfoot tr", &raw.url)?;

        Ok(FbrefSquad {
            id: self.id.clone(),
            name,
            season,
            players,
            shooting: shooting(totals, &raw.url)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Player
// ---------------------------------------------------------------------------

/// Value following `label` in a `#meta` paragraph, up to the next separator.
fn meta_value(paragraph: &str, label: &str) -> Option<String> {
    let (_, rest) = paragraph.split_once(label)?;
    let value = rest.split(['▪', '\u{a0}']).next()?.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Player profile.
#[derive(Debug, Clone)]
pub struct PlayerRequest {
    pub base_url: String,
    pub id: String,
    pub path_name: Option<String>,
}

impl SourceAdapter for PlayerRequest {
    type Output = FbrefPlayer;

    fn source(&self) -> Source {
        Source::Fbref
    }

    fn descriptor(&self) -> FetchDescriptor {
        let path = match &self.path_name {
            Some(name) => format!("/en/players/{}/{}", self.id, name),
            None => format!("/en/players/{}", self.id),
        };
        FetchDescriptor::get(join_url(&self.base_url, &path))
    }

    fn parse(&self, raw: &RawResponse) -> Result<Self::Output, AppError> {
        let document = Html::parse_document(&raw.body);
        let meta = select_first(document.root_element(), "#meta", &raw.url)?;
        let name = text(select_first(meta, "h1", &raw.url)?);

        let mut player = FbrefPlayer {
            id: self.id.clone(),
            name,
            path_name: self.path_name.clone(),
            position: None,
            footed: None,
            height_cm: None,
            birth_date: None,
            country_code: None,
        };

        for paragraph in meta.select(&selector("p")?).map(text) {
            if let Some(position) = meta_value(&paragraph, "Position:") {
                player.position = position
                    .split([' ', '-', '('])
                    .next()
                    .and_then(Position::from_label);
            }
            if let Some(footed) = meta_value(&paragraph, "Footed:") {
                player.footed = footed
                    .split_whitespace()
                    .last()
                    .map(|f| f.to_string());
            }
        }

        player.height_cm = select_text(meta, &selector("[itemprop=\"height\"]")?)
            .and_then(|h| h.trim_end_matches("cm").trim().parse().ok());
        player.birth_date = meta
            .select(&selector("[itemprop=\"birthDate\"]")?)
            .next()
            .and_then(|b| b.value().attr("data-birth"))
            .map(str::to_string);
        player.country_code = meta
            .select(&selector("a[href*=\"/country/\"]")?)
            .filter_map(href)
            .find_map(|link| segment_after(link, "country"))
            .map(str::to_string);

        Ok(player)
    }
}

// ---------------------------------------------------------------------------
// Matches by date
// ---------------------------------------------------------------------------

/// `2–1` (en dash on FBref) into both scores
fn parse_score(score: &str) -> Option<(u32, u32)> {
    let (home, away) = score.split_once(['–', '-'])?;
    Some((home.trim().parse().ok()?, away.trim().parse().ok()?))
}

/// Competition id embedded in schedule table ids such as `sched_2023-2024_9_1`
fn schedule_competition_id(table_id: &str) -> Option<&str> {
    let parts: Vec<&str> = table_id.split('_').collect();
    (parts.len() >= 3).then(|| parts[parts.len() - 2])
}

fn side(scope: ElementRef<'_>, score: Option<u32>) -> Result<Option<SideScore>, AppError> {
    Ok(linked_ref(scope, "squads")?.map(|(team, name)| SideScore {
        id: team.id,
        name,
        score,
    }))
}

/// Every fixture FBref lists on one day.
#[derive(Debug, Clone)]
pub struct MatchesRequest {
    pub base_url: String,
    pub date: NaiveDate,
}

impl SourceAdapter for MatchesRequest {
    type Output = Vec<FbrefMatchSummary>;

    fn source(&self) -> Source {
        Source::Fbref
    }

    fn descriptor(&self) -> FetchDescriptor {
        let path = format!("/en/matches/{}", self.date.format("%Y-%m-%d"));
        FetchDescriptor::get(join_url(&self.base_url, &path))
    }

    fn parse(&self, raw: &RawResponse) -> Result<Self::Output, AppError> {
        let document = Html::parse_document(&uncomment(&raw.body));
        let tables = selector("table[id^=\"sched_\"]")?;
        let home_cell = selector("[data-stat=\"home_team\"]")?;
        let away_cell = selector("[data-stat=\"away_team\"]")?;
        let report = selector("[data-stat=\"match_report\"] a")?;

        let mut matches = Vec::new();
        for table in document.select(&tables) {
            let Some(competition_id) = table.value().attr("id").and_then(schedule_competition_id)
            else {
                continue;
            };
            for row in table.select(&selector(BODY_ROWS)?) {
                // Fixtures without a report link have no match page yet
                let Some(id) = row
                    .select(&report)
                    .next()
                    .and_then(href)
                    .and_then(|link| segment_after(link, "matches"))
                else {
                    continue;
                };
                let (home_score, away_score) = match stat_cell(row, "score")?
                    .as_deref()
                    .and_then(parse_score)
                {
                    Some((home, away)) => (Some(home), Some(away)),
                    None => (None, None),
                };
                let (Some(home), Some(away)) = (
                    row.select(&home_cell).next(),
                    row.select(&away_cell).next(),
                ) else {
                    continue;
                };
                let (Some(home), Some(away)) = (side(home, home_score)?, side(away, away_score)?)
                else {
                    continue;
                };
                matches.push(FbrefMatchSummary {
                    id: id.to_string(),
                    name: format!("{} - {}", home.name, away.name),
                    competition_id: competition_id.to_string(),
                    home,
                    away,
                });
            }
        }
        Ok(matches)
    }
}

// ---------------------------------------------------------------------------
// Match report
// ---------------------------------------------------------------------------

fn lineup(document: &Html, side_id: &str) -> Result<Vec<FbrefLineupPlayer>, AppError> {
    let rows = selector(&format!("div.lineup#{side_id} tr"))?;
    let header = selector("th")?;
    let cells = selector("td")?;

    let mut players = Vec::new();
    let mut starter = true;
    for row in document.select(&rows) {
        if let Some(th) = row.select(&header).next() {
            if text(th).eq_ignore_ascii_case("bench") {
                starter = false;
            }
            continue;
        }
        let Some((player, name)) = linked_ref(row, "players")? else {
            continue;
        };
        players.push(FbrefLineupPlayer {
            id: player.id,
            name,
            shirt_number: row.select(&cells).next().map(text).filter(|n| !n.is_empty()),
            starter,
        });
    }
    Ok(players)
}

/// Match report: scorebox and lineups.
#[derive(Debug, Clone)]
pub struct MatchReportRequest {
    pub base_url: String,
    pub id: String,
}

impl SourceAdapter for MatchReportRequest {
    type Output = FbrefMatchReport;

    fn source(&self) -> Source {
        Source::Fbref
    }

    fn descriptor(&self) -> FetchDescriptor {
        FetchDescriptor::get(join_url(&self.base_url, &format!("/en/matches/{}", self.id)))
    }

    fn parse(&self, raw: &RawResponse) -> Result<Self::Output, AppError> {
        let document = Html::parse_document(&raw.body);
        let scorebox = select_first(document.root_element(), "div.scorebox", &raw.url)?;
        let team_box = selector("div.scorebox > div:not(.scorebox_meta)")?;
        let score_sel = selector(".score")?;
        let xg_sel = selector(".score_xg")?;

        let mut sides = Vec::new();
        for team in scorebox.select(&team_box).take(2) {
            let score = select_text(team, &score_sel).and_then(|s| parse_number(&s));
            let xg = select_text(team, &xg_sel).and_then(|s| parse_number::<f64>(&s));
            let side = side(team, score)?
                .ok_or_else(|| AppError::element_not_found("scorebox team link", &raw.url))?;
            sides.push((side, xg));
        }
        let mut sides = sides.into_iter();
        let (Some((home, home_xg)), Some((away, away_xg))) = (sides.next(), sides.next()) else {
            return Err(AppError::element_not_found("scorebox teams", &raw.url));
        };

        let date = scorebox
            .select(&selector(".scorebox_meta a[href*=\"/matches/\"]")?)
            .filter_map(href)
            .find_map(|link| segment_after(link, "matches"))
            .filter(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").is_ok())
            .map(str::to_string);

        Ok(FbrefMatchReport {
            id: self.id.clone(),
            name: format!("{} - {}", home.name, away.name),
            date,
            home,
            away,
            home_xg,
            away_xg,
            home_lineup: lineup(&document, "a")?,
            away_lineup: lineup(&document, "b")?,
        })
    }
}
