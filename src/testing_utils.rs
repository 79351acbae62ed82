use crate::fusion::CompetitionParams;
use crate::sources::fbref::{
    FbrefCompetitionStats, FbrefMatchSummary, FbrefShooting, FbrefSquad, FbrefSquadPlayer,
    FbrefTableRow,
};
use crate::sources::fotmob::{
    FotmobLeague, FotmobMatchSummary, FotmobPlayer, FotmobSquadMember, FotmobTableRow, FotmobTeam,
    FotmobTeamRef,
};
use crate::sources::transfermarkt::{
    TransfermarktClub, TransfermarktClubEntry, TransfermarktCompetition,
    TransfermarktSquadPlayer, TransfermarktStaffMember,
};
use crate::sources::{Position, SideScore};

/// Test utilities for building source records without going through a parser
pub struct TestDataBuilder;

fn side(name: &str) -> SideScore {
    SideScore {
        id: name.to_lowercase().replace(' ', "-"),
        name: name.to_string(),
        score: None,
    }
}

impl TestDataBuilder {
    /// Premier League join keys as the embedded index has them
    pub fn competition_params() -> CompetitionParams {
        CompetitionParams {
            fotmob_id: "47".to_string(),
            fbref_id: "9".to_string(),
            fbref_path_name: Some("Premier-League".to_string()),
            official_name: Some("Premier League".to_string()),
            transfermarkt_id: "GB1".to_string(),
            transfermarkt_path_name: Some("premier-league".to_string()),
        }
    }

    /// A FotMob table row; wins, draws and losses are derived from `points`
    pub fn fotmob_row(
        id: &str,
        name: &str,
        points: u32,
        goals_for: u32,
        goals_against: u32,
    ) -> FotmobTableRow {
        let wins = points / 3;
        let draws = points % 3;
        FotmobTableRow {
            id: id.to_string(),
            name: name.to_string(),
            short_name: None,
            position: 0,
            played: 38,
            wins,
            draws,
            losses: 38u32.saturating_sub(wins + draws),
            goals_for,
            goals_against,
            points,
        }
    }

    pub fn fotmob_league(table: Vec<FotmobTableRow>) -> FotmobLeague {
        FotmobLeague {
            id: "47".to_string(),
            name: "Premier League".to_string(),
            country_code: Some("ENG".to_string()),
            season: Some("2023/2024".to_string()),
            table,
        }
    }

    pub fn fbref_row(id: &str, name: &str) -> FbrefTableRow {
        FbrefTableRow {
            id: id.to_string(),
            name: name.to_string(),
            path_name: Some(name.replace(' ', "-")),
            position: None,
            played: 38,
            wins: 0,
            draws: 0,
            losses: 0,
            goals_for: 0,
            goals_against: 0,
            points: 0,
            xg_for: Some(70.1),
            xg_against: Some(28.5),
        }
    }

    pub fn fbref_competition(table: Vec<FbrefTableRow>) -> FbrefCompetitionStats {
        FbrefCompetitionStats {
            id: "9".to_string(),
            name: "Premier League".to_string(),
            season: Some("2023-2024".to_string()),
            table,
            shooting: Vec::new(),
        }
    }

    pub fn club_entry(id: &str, name: &str) -> TransfermarktClubEntry {
        TransfermarktClubEntry {
            id: id.to_string(),
            name: name.to_string(),
            path_name: Some(name.to_lowercase().replace(' ', "-")),
            market_value: Some(500_000_000),
        }
    }

    pub fn transfermarkt_competition(clubs: Vec<TransfermarktClubEntry>) -> TransfermarktCompetition {
        TransfermarktCompetition {
            id: "GB1".to_string(),
            name: "Premier League".to_string(),
            market_value: Some(11_140_000_000),
            clubs,
        }
    }

    pub fn fotmob_member(
        id: &str,
        name: &str,
        country_code: &str,
        position: Position,
    ) -> FotmobSquadMember {
        FotmobSquadMember {
            id: id.to_string(),
            name: name.to_string(),
            country_code: Some(country_code.to_string()),
            position: Some(position),
            shirt_number: None,
            age: Some(28),
        }
    }

    /// A squad member FotMob knows nothing else about, such as a coach
    pub fn fotmob_member_named(id: &str, name: &str) -> FotmobSquadMember {
        FotmobSquadMember {
            id: id.to_string(),
            name: name.to_string(),
            country_code: None,
            position: None,
            shirt_number: None,
            age: None,
        }
    }

    pub fn fotmob_team(
        players: Vec<FotmobSquadMember>,
        staff: Vec<FotmobSquadMember>,
    ) -> FotmobTeam {
        FotmobTeam {
            id: "9825".to_string(),
            name: "Arsenal".to_string(),
            short_name: Some("Arsenal".to_string()),
            country_code: Some("ENG".to_string()),
            players,
            staff,
        }
    }

    pub fn fbref_player(
        id: &str,
        name: &str,
        country_code: &str,
        position: Position,
    ) -> FbrefSquadPlayer {
        FbrefSquadPlayer {
            id: id.to_string(),
            name: name.to_string(),
            path_name: Some(name.replace(' ', "-")),
            country_code: Some(country_code.to_string()),
            position: Some(position),
            age: Some(28),
            games: Some(38),
            minutes: Some(3420),
            goals: Some(0),
            assists: Some(0),
        }
    }

    /// Arsenal's FBref squad page
    pub fn fbref_squad(players: Vec<FbrefSquadPlayer>) -> FbrefSquad {
        FbrefSquad {
            id: "18bb7c10".to_string(),
            name: "Arsenal".to_string(),
            season: Some("2023-2024".to_string()),
            players,
            shooting: FbrefShooting {
                shots: 648,
                shots_on_target: 222,
                xg: Some(76.2),
            },
        }
    }

    pub fn transfermarkt_player(
        id: &str,
        name: &str,
        country_code: &str,
        position: Position,
        market_value: u64,
    ) -> TransfermarktSquadPlayer {
        TransfermarktSquadPlayer {
            id: id.to_string(),
            name: name.to_string(),
            path_name: Some(name.to_lowercase().replace(' ', "-")),
            country_code: Some(country_code.to_string()),
            position: Some(position),
            birth_date: None,
            market_value: Some(market_value),
        }
    }

    pub fn staff_member(id: &str, name: &str, role: &str) -> TransfermarktStaffMember {
        TransfermarktStaffMember {
            id: id.to_string(),
            name: name.to_string(),
            path_name: Some(name.to_lowercase().replace(' ', "-")),
            role: Some(role.to_string()),
        }
    }

    /// Arsenal's Transfermarkt club page
    pub fn transfermarkt_club(
        players: Vec<TransfermarktSquadPlayer>,
        staff: Vec<TransfermarktStaffMember>,
    ) -> TransfermarktClub {
        TransfermarktClub {
            id: "11".to_string(),
            name: "Arsenal FC".to_string(),
            market_value: Some(1_120_000_000),
            players,
            staff,
        }
    }

    /// A FotMob player profile of an Arsenal player
    pub fn fotmob_player(id: &str, name: &str) -> FotmobPlayer {
        FotmobPlayer {
            id: id.to_string(),
            name: name.to_string(),
            country_code: Some("ESP".to_string()),
            position: Some(Position::Goalkeeper),
            birth_date: Some("1995-09-15".to_string()),
            height_cm: Some(183),
            shirt_number: Some(22),
            team: Some(FotmobTeamRef {
                id: "9825".to_string(),
                name: "Arsenal".to_string(),
            }),
        }
    }

    pub fn fotmob_fixture(
        id: &str,
        competition_id: &str,
        home: &str,
        away: &str,
    ) -> FotmobMatchSummary {
        FotmobMatchSummary {
            id: id.to_string(),
            name: format!("{home} - {away}"),
            competition_id: competition_id.to_string(),
            competition_name: "Premier League".to_string(),
            home: side(home),
            away: side(away),
            utc_time: Some("2024-03-31T15:30:00.000Z".to_string()),
            started: false,
            finished: false,
            cancelled: false,
        }
    }

    pub fn fbref_fixture(
        id: &str,
        competition_id: &str,
        home: &str,
        away: &str,
    ) -> FbrefMatchSummary {
        FbrefMatchSummary {
            id: id.to_string(),
            name: format!("{home} - {away}"),
            competition_id: competition_id.to_string(),
            home: side(home),
            away: side(away),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fotmob_row_is_consistent() {
        let row = TestDataBuilder::fotmob_row("9825", "Arsenal", 89, 91, 29);
        assert_eq!(row.wins * 3 + row.draws, 89);
        assert_eq!(row.wins + row.draws + row.losses, row.played);
    }
}
