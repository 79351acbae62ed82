//! Transfermarkt HTML adapters.

use chrono::NaiveDate;
use scraper::{ElementRef, Html};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::codes::country_code;
use super::html::{
    href, parse_market_value, path_segments, select_first, select_text, selector, segment_after,
    text,
};
use super::{PathRef, Position, Season, Source, SourceAdapter, join_url};
use crate::data_fetcher::{FetchDescriptor, RawResponse};
use crate::error::AppError;
use crate::matching::{MatchField, Matchable};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransfermarktClubEntry {
    pub id: String,
    pub name: String,
    pub path_name: Option<String>,
    pub market_value: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransfermarktCompetition {
    pub id: String,
    pub name: String,
    pub market_value: Option<u64>,
    pub clubs: Vec<TransfermarktClubEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransfermarktSquadPlayer {
    pub id: String,
    pub name: String,
    pub path_name: Option<String>,
    pub country_code: Option<String>,
    pub position: Option<Position>,
    pub birth_date: Option<String>,
    pub market_value: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransfermarktStaffMember {
    pub id: String,
    pub name: String,
    pub path_name: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransfermarktClub {
    pub id: String,
    pub name: String,
    pub market_value: Option<u64>,
    pub players: Vec<TransfermarktSquadPlayer>,
    pub staff: Vec<TransfermarktStaffMember>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransfermarktPlayer {
    pub id: String,
    pub name: String,
    pub path_name: Option<String>,
    pub birth_date: Option<String>,
    pub country_code: Option<String>,
    pub position: Option<Position>,
    pub height_cm: Option<u32>,
    pub foot: Option<String>,
    pub market_value: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransfermarktStaff {
    pub id: String,
    pub name: String,
    pub path_name: Option<String>,
    pub birth_date: Option<String>,
    pub country_code: Option<String>,
    pub club: Option<String>,
}

impl_stat!(
    TransfermarktClubEntry,
    TransfermarktCompetition,
    TransfermarktSquadPlayer,
    TransfermarktStaffMember,
    TransfermarktClub,
    TransfermarktPlayer,
    TransfermarktStaff,
);

impl Matchable for TransfermarktClubEntry {
    fn field(&self, field: MatchField) -> Option<&str> {
        match field {
            MatchField::Name => Some(&self.name),
            _ => None,
        }
    }
}

impl Matchable for TransfermarktSquadPlayer {
    fn field(&self, field: MatchField) -> Option<&str> {
        match field {
            MatchField::Name => Some(&self.name),
            MatchField::CountryCode => self.country_code.as_deref(),
            MatchField::Position => self.position.map(|p| p.code()),
            _ => None,
        }
    }
}

impl Matchable for TransfermarktStaffMember {
    fn field(&self, field: MatchField) -> Option<&str> {
        match field {
            MatchField::Name => Some(&self.name),
            _ => None,
        }
    }
}

/// Transfermarkt links read `/<slug>/<page>/<kind>/<id>/...`.
fn linked_ref(link: &str, kind: &str) -> Option<PathRef> {
    let id = segment_after(link, kind)?;
    let slug = path_segments(link).first().map(|s| s.to_string());
    Some(PathRef::new(id, slug))
}

/// Builds `/<slug>/<page>/<kind>/<id>` plus the season suffix when given.
fn page_path(path_name: Option<&str>, page: &str, kind: &str, id: &str, season: Option<Season>) -> String {
    let mut path = format!("/{}/{page}/{kind}/{id}", path_name.unwrap_or("-"));
    if let Some(season) = season {
        path.push_str(&format!("/saison_id/{}", season.transfermarkt()));
    }
    path
}

/// `Sep 15, 1995 (28)` into `1995-09-15`
fn parse_birth_date(raw: &str) -> Option<String> {
    let date = raw.split(" (").next()?.trim();
    NaiveDate::parse_from_str(date, "%b %d, %Y")
        .ok()
        .map(|d| d.format(crate::constants::DATE_FORMAT).to_string())
}

/// Position labels such as `Attack - Right Winger` carry the detail last.
fn parse_position(raw: &str) -> Option<Position> {
    raw.rsplit(" - ")
        .find_map(|part| Position::from_label(part.trim()))
}

/// `1,83 m` into centimetres
fn parse_height(raw: &str) -> Option<u32> {
    let metres: f64 = raw
        .trim_end_matches('m')
        .trim()
        .replace(',', ".")
        .parse()
        .ok()?;
    Some((metres * 100.0).round() as u32)
}

fn headline(document: &Html, url: &str) -> Result<String, AppError> {
    let h1 = select_first(document.root_element(), "h1.data-header__headline-wrapper", url)?;
    // Player headlines start with the shirt number, e.g. `#22 David Raya`
    let name = text(h1);
    Ok(match name.split_once(' ') {
        Some((number, rest)) if number.starts_with('#') => rest.to_string(),
        _ => name,
    })
}

fn header_market_value(document: &Html) -> Result<Option<u64>, AppError> {
    let sel = selector("a.data-header__market-value-wrapper")?;
    Ok(document
        .select(&sel)
        .next()
        .and_then(|a| parse_market_value(&text(a))))
}

/// Label/value pairs of the profile info table, labels without the colon.
fn info_table(document: &Html) -> Result<Vec<(String, ElementRef<'_>)>, AppError> {
    let labels = selector("span.info-table__content--regular")?;
    let values = selector("span.info-table__content--bold")?;
    Ok(document
        .select(&labels)
        .map(|l| text(l).trim_end_matches(':').to_string())
        .zip(document.select(&values))
        .collect())
}

fn flag_country(scope: ElementRef<'_>) -> Result<Option<String>, AppError> {
    let sel = selector("img.flaggenrahmen")?;
    Ok(scope
        .select(&sel)
        .filter_map(|img| img.value().attr("title"))
        .find_map(country_code)
        .map(str::to_string))
}

// ---------------------------------------------------------------------------
// Competition
// ---------------------------------------------------------------------------

/// Competition start page: participating clubs with market values.
#[derive(Debug, Clone)]
pub struct CompetitionRequest {
    pub base_url: String,
    pub id: String,
    pub path_name: Option<String>,
    pub season: Option<Season>,
}

impl SourceAdapter for CompetitionRequest {
    type Output = TransfermarktCompetition;

    fn source(&self) -> Source {
        Source::Transfermarkt
    }

    fn descriptor(&self) -> FetchDescriptor {
        let path = page_path(
            self.path_name.as_deref(),
            "startseite",
            "wettbewerb",
            &self.id,
            self.season,
        );
        FetchDescriptor::get(join_url(&self.base_url, &path))
    }

    fn parse(&self, raw: &RawResponse) -> Result<Self::Output, AppError> {
        let document = Html::parse_document(&raw.body);
        let name = headline(&document, &raw.url)?;
        let items = select_first(document.root_element(), "table.items", &raw.url)?;
        let link_sel = selector("td.hauptlink a[href*=\"/verein/\"]")?;
        let value_sel = selector("td.rechts")?;

        let mut clubs = Vec::new();
        for row in items.select(&selector("tbody > tr")?) {
            let Some(link) = row.select(&link_sel).next() else {
                continue;
            };
            let Some(club) = href(link).and_then(|l| linked_ref(l, "verein")) else {
                continue;
            };
            let name = link
                .value()
                .attr("title")
                .map(str::to_string)
                .unwrap_or_else(|| text(link));
            clubs.push(TransfermarktClubEntry {
                id: club.id,
                name,
                path_name: club.path_name,
                market_value: row
                    .select(&value_sel)
                    .last()
                    .and_then(|v| parse_market_value(&text(v))),
            });
        }

        Ok(TransfermarktCompetition {
            id: self.id.clone(),
            name,
            market_value: header_market_value(&document)?,
            clubs,
        })
    }
}

// ---------------------------------------------------------------------------
// Club
// ---------------------------------------------------------------------------

fn staff_box(document: &Html) -> Result<Vec<TransfermarktStaffMember>, AppError> {
    let boxes = selector("div[data-viewport=\"Mitarbeiter\"]")?;
    let links = selector("a[href*=\"/trainer/\"]")?;

    let mut seen = HashSet::new();
    let mut staff = Vec::new();
    for link in document.select(&boxes).flat_map(|b| b.select(&links)) {
        let name = text(link);
        if name.is_empty() {
            continue;
        }
        let Some(member) = href(link).and_then(|l| linked_ref(l, "trainer")) else {
            continue;
        };
        if !seen.insert(member.id.clone()) {
            continue;
        }
        // The role follows the name inside the same cell
        let role = link
            .parent()
            .and_then(ElementRef::wrap)
            .map(text)
            .and_then(|cell| cell.strip_prefix(&name).map(|r| r.trim().to_string()))
            .filter(|r| !r.is_empty());
        staff.push(TransfermarktStaffMember {
            id: member.id,
            name,
            path_name: member.path_name,
            role,
        });
    }
    Ok(staff)
}

/// Club start page: squad with market values, and the staff box.
#[derive(Debug, Clone)]
pub struct ClubRequest {
    pub base_url: String,
    pub id: String,
    pub path_name: Option<String>,
    pub season: Option<Season>,
}

impl SourceAdapter for ClubRequest {
    type Output = TransfermarktClub;

    fn source(&self) -> Source {
        Source::Transfermarkt
    }

    fn descriptor(&self) -> FetchDescriptor {
        let path = page_path(
            self.path_name.as_deref(),
            "startseite",
            "verein",
            &self.id,
            self.season,
        );
        FetchDescriptor::get(join_url(&self.base_url, &path))
    }

    fn parse(&self, raw: &RawResponse) -> Result<Self::Output, AppError> {
        let document = Html::parse_document(&raw.body);
        let name = headline(&document, &raw.url)?;
        let items = select_first(document.root_element(), "table.items", &raw.url)?;

        let link_sel = selector("td.hauptlink a[href*=\"/spieler/\"]")?;
        let position_sel = selector("table.inline-table tr:last-child td")?;
        let centred_sel = selector("td.zentriert")?;
        let value_sel = selector("td.rechts.hauptlink")?;

        let mut players = Vec::new();
        for row in items.select(&selector("table.items > tbody > tr")?) {
            let Some(link) = row.select(&link_sel).next() else {
                continue;
            };
            let Some(player) = href(link).and_then(|l| linked_ref(l, "spieler")) else {
                continue;
            };
            players.push(TransfermarktSquadPlayer {
                id: player.id,
                name: text(link),
                path_name: player.path_name,
                country_code: flag_country(row)?,
                position: select_text(row, &position_sel).and_then(|p| parse_position(&p)),
                birth_date: row
                    .select(&centred_sel)
                    .find_map(|td| parse_birth_date(&text(td))),
                market_value: select_text(row, &value_sel).and_then(|v| parse_market_value(&v)),
            });
        }

        Ok(TransfermarktClub {
            id: self.id.clone(),
            name,
            market_value: header_market_value(&document)?,
            players,
            staff: staff_box(&document)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Player and coach profiles
// ---------------------------------------------------------------------------

/// Player profile page.
#[derive(Debug, Clone)]
pub struct PlayerRequest {
    pub base_url: String,
    pub id: String,
    pub path_name: Option<String>,
}

impl SourceAdapter for PlayerRequest {
    type Output = TransfermarktPlayer;

    fn source(&self) -> Source {
        Source::Transfermarkt
    }

    fn descriptor(&self) -> FetchDescriptor {
        let path = page_path(self.path_name.as_deref(), "profil", "spieler", &self.id, None);
        FetchDescriptor::get(join_url(&self.base_url, &path))
    }

    fn parse(&self, raw: &RawResponse) -> Result<Self::Output, AppError> {
        let document = Html::parse_document(&raw.body);
        let mut player = TransfermarktPlayer {
            id: self.id.clone(),
            name: headline(&document, &raw.url)?,
            path_name: self.path_name.clone(),
            birth_date: None,
            country_code: None,
            position: None,
            height_cm: None,
            foot: None,
            market_value: header_market_value(&document)?,
        };

        for (label, value) in info_table(&document)? {
            match label.as_str() {
                "Date of birth/Age" => player.birth_date = parse_birth_date(&text(value)),
                "Citizenship" => player.country_code = flag_country(value)?,
                "Height" => player.height_cm = parse_height(&text(value)),
                "Position" => player.position = parse_position(&text(value)),
                "Foot" => player.foot = Some(text(value)).filter(|f| !f.is_empty()),
                _ => {}
            }
        }
        Ok(player)
    }
}

/// Coach and staff profile page.
#[derive(Debug, Clone)]
pub struct StaffRequest {
    pub base_url: String,
    pub id: String,
    pub path_name: Option<String>,
}

impl SourceAdapter for StaffRequest {
    type Output = TransfermarktStaff;

    fn source(&self) -> Source {
        Source::Transfermarkt
    }

    fn descriptor(&self) -> FetchDescriptor {
        let path = page_path(self.path_name.as_deref(), "profil", "trainer", &self.id, None);
        FetchDescriptor::get(join_url(&self.base_url, &path))
    }

    fn parse(&self, raw: &RawResponse) -> Result<Self::Output, AppError> {
        let document = Html::parse_document(&raw.body);
        let mut staff = TransfermarktStaff {
            id: self.id.clone(),
            name: headline(&document, &raw.url)?,
            path_name: self.path_name.clone(),
            birth_date: None,
            country_code: None,
            club: select_text(document.root_element(), &selector("span.data-header__club a")?),
        };

        for (label, value) in info_table(&document)? {
            match label.as_str() {
                "Date of birth/Age" => staff.birth_date = parse_birth_date(&text(value)),
                "Citizenship" => staff.country_code = flag_country(value)?,
                _ => {}
            }
        }
        Ok(staff)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://www.transfermarkt.com";

    fn raw(body: &str) -> RawResponse {
        RawResponse::new("https://www.transfermarkt.com/test", 200, body)
    }

    #[test]
    fn test_helpers() {
        assert_eq!(parse_birth_date("Sep 15, 1995 (28)").as_deref(), Some("1995-09-15"));
        assert_eq!(parse_birth_date("N/A"), None);
        assert_eq!(parse_height("1,83 m"), Some(183));
        assert_eq!(parse_position("Attack - Right Winger"), Some(Position::Forward));
        assert_eq!(parse_position("Goalkeeper"), Some(Position::Goalkeeper));
        let club = linked_ref("/fc-arsenal/startseite/verein/11/saison_id/2023", "verein").unwrap();
        assert_eq!(club.id, "11");
        assert_eq!(club.path_name.as_deref(), Some("fc-arsenal"));
    }

    #[test]
    fn test_competition() {
        let body = r#"<html><body>
            <h1 class="data-header__headline-wrapper">Premier League</h1>
            <a class="data-header__market-value-wrapper">€10.88bn <p>Total Market Value</p></a>
            <div id="yw1"><table class="items"><tbody>
              <tr class="odd">
                <td class="hauptlink"><a title="Manchester City" href="/manchester-city/startseite/verein/281/saison_id/2023">Man City</a></td>
                <td class="rechts">€48.52m</td><td class="rechts"><a>€1.26bn</a></td></tr>
              <tr class="even">
                <td class="hauptlink"><a title="Arsenal FC" href="/fc-arsenal/startseite/verein/11/saison_id/2023">Arsenal</a></td>
                <td class="rechts">€43.00m</td><td class="rechts"><a>€1.12bn</a></td></tr>
            </tbody></table></div>
        </body></html>"#;
        let adapter = CompetitionRequest {
            base_url: BASE.to_string(),
            id: "GB1".to_string(),
            path_name: Some("premier-league".to_string()),
            season: Some(Season::new(2023)),
        };
        assert_eq!(
            adapter.descriptor().url,
            "https://www.transfermarkt.com/premier-league/startseite/wettbewerb/GB1/saison_id/2023"
        );

        let competition = adapter.parse(&raw(body)).unwrap();
        assert_eq!(competition.name, "Premier League");
        assert_eq!(competition.market_value, Some(10_880_000_000));
        assert_eq!(competition.clubs.len(), 2);
        assert_eq!(competition.clubs[1].name, "Arsenal FC");
        assert_eq!(competition.clubs[1].id, "11");
        assert_eq!(competition.clubs[1].market_value, Some(1_120_000_000));
    }

    #[test]
    fn test_club_squad_and_staff() {
        let body = r#"<html><body>
            <h1 class="data-header__headline-wrapper">Arsenal FC</h1>
            <a class="data-header__market-value-wrapper">€1.12bn <span>Total market value</span></a>
            <table class="items"><tbody>
              <tr class="odd">
                <td class="zentriert rueckennummer">22</td>
                <td class="posrela"><table class="inline-table">
                  <tr><td class="hauptlink"><a href="/david-raya/profil/spieler/262749">David Raya</a></td></tr>
                  <tr><td>Goalkeeper</td></tr></table></td>
                <td class="zentriert">Sep 15, 1995 (28)</td>
                <td class="zentriert"><img title="Spain" class="flaggenrahmen"></td>
                <td class="rechts hauptlink"><a>€35.00m</a></td></tr>
            </tbody></table>
            <div class="box" data-viewport="Mitarbeiter"><table>
              <tr><td><a href="/mikel-arteta/profil/trainer/47620"><img title="Mikel Arteta"></a></td>
                  <td><a href="/mikel-arteta/profil/trainer/47620">Mikel Arteta</a> Manager</td></tr>
            </table></div>
        </body></html>"#;
        let adapter = ClubRequest {
            base_url: BASE.to_string(),
            id: "11".to_string(),
            path_name: Some("fc-arsenal".to_string()),
            season: None,
        };
        assert_eq!(
            adapter.descriptor().url,
            "https://www.transfermarkt.com/fc-arsenal/startseite/verein/11"
        );

        let club = adapter.parse(&raw(body)).unwrap();
        assert_eq!(club.name, "Arsenal FC");
        assert_eq!(club.players.len(), 1);
        let raya = &club.players[0];
        assert_eq!(raya.id, "262749");
        assert_eq!(raya.path_name.as_deref(), Some("david-raya"));
        assert_eq!(raya.country_code.as_deref(), Some("ESP"));
        assert_eq!(raya.position, Some(Position::Goalkeeper));
        assert_eq!(raya.birth_date.as_deref(), Some("1995-09-15"));
        assert_eq!(raya.market_value, Some(35_000_000));
        assert_eq!(club.staff.len(), 1);
        assert_eq!(club.staff[0].id, "47620");
        assert_eq!(club.staff[0].role.as_deref(), Some("Manager"));
    }

    #[test]
    fn test_player_profile() {
        let body = r#"<html><body>
            <h1 class="data-header__headline-wrapper"><span class="data-header__shirt-number">#22</span> David <strong>Raya</strong></h1>
            <a class="data-header__market-value-wrapper">€35.00m <span>Last update: Dec 19, 2023</span></a>
            <div class="info-table">
              <span class="info-table__content info-table__content--regular">Date of birth/Age:</span>
              <span class="info-table__content info-table__content--bold"><a>Sep 15, 1995</a> (28)</span>
              <span class="info-table__content info-table__content--regular">Citizenship:</span>
              <span class="info-table__content info-table__content--bold"><img title="Spain" class="flaggenrahmen"> Spain</span>
              <span class="info-table__content info-table__content--regular">Height:</span>
              <span class="info-table__content info-table__content--bold">1,83 m</span>
              <span class="info-table__content info-table__content--regular">Position:</span>
              <span class="info-table__content info-table__content--bold">Goalkeeper</span>
              <span class="info-table__content info-table__content--regular">Foot:</span>
              <span class="info-table__content info-table__content--bold">right</span>
            </div>
        </body></html>"#;
        let adapter = PlayerRequest {
            base_url: BASE.to_string(),
            id: "262749".to_string(),
            path_name: Some("david-raya".to_string()),
        };
        assert_eq!(
            adapter.descriptor().url,
            "https://www.transfermarkt.com/david-raya/profil/spieler/262749"
        );

        let player = adapter.parse(&raw(body)).unwrap();
        assert_eq!(player.name, "David Raya");
        assert_eq!(player.birth_date.as_deref(), Some("1995-09-15"));
        assert_eq!(player.country_code.as_deref(), Some("ESP"));
        assert_eq!(player.height_cm, Some(183));
        assert_eq!(player.position, Some(Position::Goalkeeper));
        assert_eq!(player.foot.as_deref(), Some("right"));
        assert_eq!(player.market_value, Some(35_000_000));
    }

    #[test]
    fn test_staff_profile() {
        let body = r#"<html><body>
            <h1 class="data-header__headline-wrapper">Mikel Arteta</h1>
            <span class="data-header__club"><a href="/fc-arsenal/startseite/verein/11">Arsenal FC</a></span>
            <span class="info-table__content info-table__content--regular">Date of birth/Age:</span>
            <span class="info-table__content info-table__content--bold">Mar 26, 1982 (41)</span>
            <span class="info-table__content info-table__content--regular">Citizenship:</span>
            <span class="info-table__content info-table__content--bold"><img title="Spain" class="flaggenrahmen"> Spain</span>
        </body></html>"#;
        let adapter = StaffRequest {
            base_url: BASE.to_string(),
            id: "47620".to_string(),
            path_name: None,
        };
        assert_eq!(
            adapter.descriptor().url,
            "https://www.transfermarkt.com/-/profil/trainer/47620"
        );

        let staff = adapter.parse(&raw(body)).unwrap();
        assert_eq!(staff.name, "Mikel Arteta");
        assert_eq!(staff.club.as_deref(), Some("Arsenal FC"));
        assert_eq!(staff.birth_date.as_deref(), Some("1982-03-26"));
        assert_eq!(staff.country_code.as_deref(), Some("ESP"));
    }

    #[test]
    fn test_missing_headline_is_format_drift() {
        let adapter = StaffRequest {
            base_url: BASE.to_string(),
            id: "1".to_string(),
            path_name: None,
        };
        let err = adapter.parse(&raw("<html><body></body></html>")).unwrap_err();
        assert!(err.is_parse());
    }
}
