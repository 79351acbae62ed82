use reqwest::Client;
use serde::Serialize;
use tracing::{debug, info, instrument};

use super::{Names, PlayerParams, StaffParams, TeamParams, parse};
use crate::config::Config;
use crate::data_fetcher::execute_array;
use crate::error::AppError;
use crate::matching::{MatchField, best_match};
use crate::sources::fbref::{self, FbrefShooting, FbrefSquad, FbrefSquadPlayer};
use crate::sources::fotmob::{self, FotmobSquadMember, FotmobTeam};
use crate::sources::transfermarkt::{
    self, TransfermarktClub, TransfermarktSquadPlayer, TransfermarktStaffMember,
};
use crate::sources::{Position, Season, SourceAdapter};

/// A squad player known to FotMob and at least one other source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RosterEntry {
    pub id: String,
    pub name: String,
    pub names: Names,
    pub country_code: Option<String>,
    pub position: Option<Position>,
    pub shirt_number: Option<u32>,
    pub age: Option<u32>,
    pub market_value: Option<u64>,
    pub fotmob: FotmobSquadMember,
    pub fbref: Option<FbrefSquadPlayer>,
    pub transfermarkt: Option<TransfermarktSquadPlayer>,
}

/// A staff member as Transfermarkt lists it, with the FotMob id when FotMob
/// knows them too.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StaffEntry {
    pub id: String,
    pub name: String,
    pub names: Names,
    pub role: Option<String>,
    pub path_name: Option<String>,
    pub fotmob_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamInfo {
    pub id: String,
    pub name: String,
    pub names: Names,
    pub country_code: Option<String>,
    pub season: Option<String>,
    pub market_value: Option<u64>,
    pub shooting: FbrefShooting,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Team {
    pub params: TeamParams,
    pub fotmob: FotmobTeam,
    pub fbref: FbrefSquad,
    pub transfermarkt: TransfermarktClub,
    roster: Vec<RosterEntry>,
    staff: Vec<StaffEntry>,
}

impl Team {
    #[instrument(skip(client, config), fields(fotmob_id = %params.fotmob_id))]
    pub async fn fetch(
        client: &Client,
        config: &Config,
        params: &TeamParams,
        season: Option<Season>,
    ) -> Result<Self, AppError> {
        info!("Fetching team");
        // FotMob serves the current squad only
        let fotmob = fotmob::TeamRequest {
            base_url: config.sources.fotmob.clone(),
            id: params.fotmob_id.clone(),
        };
        let fbref = fbref::SquadRequest {
            base_url: config.sources.fbref.clone(),
            id: params.fbref_id.clone(),
            path_name: params.fbref_path_name.clone(),
            season,
        };
        let transfermarkt = transfermarkt::ClubRequest {
            base_url: config.sources.transfermarkt.clone(),
            id: params.transfermarkt_id.clone(),
            path_name: params.transfermarkt_path_name.clone(),
            season,
        };

        let [fotmob_raw, fbref_raw, transfermarkt_raw] = execute_array(
            client,
            [
                fotmob.descriptor(),
                fbref.descriptor(),
                transfermarkt.descriptor(),
            ],
        )
        .await?;

        Self::fuse(
            params.clone(),
            parse(&fotmob, &fotmob_raw)?,
            parse(&fbref, &fbref_raw)?,
            parse(&transfermarkt, &transfermarkt_raw)?,
            config.cutoffs.player,
        )
    }

    /// Matches FotMob squad members on name, nationality and position, and
    /// Transfermarkt staff to FotMob staff on name.
    pub fn fuse(
        params: TeamParams,
        fotmob: FotmobTeam,
        fbref: FbrefSquad,
        transfermarkt: TransfermarktClub,
        cutoff: f64,
    ) -> Result<Self, AppError> {
        if !fotmob.players.is_empty()
            && fbref.players.is_empty()
            && transfermarkt.players.is_empty()
        {
            return Err(AppError::no_match("squad", &fotmob.name));
        }

        let mut roster = Vec::with_capacity(fotmob.players.len());
        for member in &fotmob.players {
            let fbref_player = best_match(member, &fbref.players, MatchField::PERSON, cutoff);
            let tm_player = best_match(member, &transfermarkt.players, MatchField::PERSON, cutoff);
            if fbref_player.is_none() && tm_player.is_none() {
                debug!("Dropping '{}': no FBref or Transfermarkt match", member.name);
                continue;
            }
            let fbref_player = fbref_player.map(|m| m.candidate);
            let tm_player = tm_player.map(|m| m.candidate);

            let mut names = Names::new();
            names.insert(&member.name);
            names.extend(fbref_player.map(|p| p.name.as_str()));
            names.extend(tm_player.map(|p| p.name.as_str()));

            roster.push(RosterEntry {
                id: member.id.clone(),
                name: member.name.clone(),
                names,
                country_code: member
                    .country_code
                    .clone()
                    .or_else(|| fbref_player.and_then(|p| p.country_code.clone()))
                    .or_else(|| tm_player.and_then(|p| p.country_code.clone())),
                position: member
                    .position
                    .or_else(|| fbref_player.and_then(|p| p.position))
                    .or_else(|| tm_player.and_then(|p| p.position)),
                shirt_number: member.shirt_number,
                age: member.age.or_else(|| fbref_player.and_then(|p| p.age)),
                market_value: tm_player.and_then(|p| p.market_value),
                fotmob: member.clone(),
                fbref: fbref_player.cloned(),
                transfermarkt: tm_player.cloned(),
            });
        }

        let staff = transfermarkt
            .staff
            .iter()
            .map(|member| staff_entry(member, &fotmob.staff, cutoff))
            .collect();

        info!(
            "Matched {} of {} squad player(s)",
            roster.len(),
            fotmob.players.len()
        );
        Ok(Team {
            params,
            fotmob,
            fbref,
            transfermarkt,
            roster,
            staff,
        })
    }

    pub fn roster(&self) -> &[RosterEntry] {
        &self.roster
    }

    pub fn staff(&self) -> &[StaffEntry] {
        &self.staff
    }

    pub fn info(&self) -> TeamInfo {
        let mut names = Names::new();
        names.insert(&self.fotmob.name);
        names.extend(self.fotmob.short_name.as_deref());
        names.insert(&self.fbref.name);
        names.insert(&self.transfermarkt.name);

        TeamInfo {
            id: self.fotmob.id.clone(),
            name: self.fotmob.name.clone(),
            names,
            country_code: self.fotmob.country_code.clone(),
            season: self.fbref.season.clone(),
            market_value: self.transfermarkt.market_value,
            shooting: self.fbref.shooting.clone(),
        }
    }

    pub fn player_params(&self) -> Vec<PlayerParams> {
        self.roster
            .iter()
            .map(|entry| PlayerParams {
                fotmob_id: entry.id.clone(),
                fbref_id: entry.fbref.as_ref().map(|p| p.id.clone()),
                fbref_path_name: entry.fbref.as_ref().and_then(|p| p.path_name.clone()),
                transfermarkt_id: entry.transfermarkt.as_ref().map(|p| p.id.clone()),
                transfermarkt_path_name: entry
                    .transfermarkt
                    .as_ref()
                    .and_then(|p| p.path_name.clone()),
            })
            .collect()
    }

    pub fn staff_params(&self) -> Vec<StaffParams> {
        self.staff
            .iter()
            .map(|entry| StaffParams {
                transfermarkt_id: entry.id.clone(),
                transfermarkt_path_name: entry.path_name.clone(),
                fotmob_id: entry.fotmob_id.clone(),
            })
            .collect()
    }
}

fn staff_entry(
    member: &TransfermarktStaffMember,
    fotmob_staff: &[FotmobSquadMember],
    cutoff: f64,
) -> StaffEntry {
    let fotmob = best_match(member, fotmob_staff, MatchField::NAME, cutoff).map(|m| m.candidate);
    let mut names = Names::new();
    names.insert(&member.name);
    names.extend(fotmob.map(|f| f.name.as_str()));

    StaffEntry {
        id: member.id.clone(),
        name: member.name.clone(),
        names,
        role: member.role.clone(),
        path_name: member.path_name.clone(),
        fotmob_id: fotmob.map(|f| f.id.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing_utils::TestDataBuilder;

    fn team_params() -> TeamParams {
        TeamParams {
            fotmob_id: "9825".to_string(),
            fbref_id: "18bb7c10".to_string(),
            fbref_path_name: Some("Arsenal".to_string()),
            transfermarkt_id: "11".to_string(),
            transfermarkt_path_name: Some("fc-arsenal".to_string()),
        }
    }

    fn arsenal() -> (FotmobTeam, FbrefSquad, TransfermarktClub) {
        let fotmob = TestDataBuilder::fotmob_team(
            vec![
                TestDataBuilder::fotmob_member("562727", "David Raya", "ESP", Position::Goalkeeper),
                TestDataBuilder::fotmob_member("961995", "Bukayo Saka", "ENG", Position::Forward),
                TestDataBuilder::fotmob_member("1", "Youth Trialist", "ISL", Position::Defender),
            ],
            vec![TestDataBuilder::fotmob_member_named("1160", "Mikel Arteta")],
        );
        let fbref = TestDataBuilder::fbref_squad(vec![
            TestDataBuilder::fbref_player("98ea5115", "David-Raya", "ESP", Position::Goalkeeper),
            TestDataBuilder::fbref_player("bc7dc64d", "Bukayo Saka", "ENG", Position::Forward),
        ]);
        let transfermarkt = TestDataBuilder::transfermarkt_club(
            vec![TestDataBuilder::transfermarkt_player(
                "262749",
                "David Raya",
                "ESP",
                Position::Goalkeeper,
                35_000_000,
            )],
            vec![
                TestDataBuilder::staff_member("47620", "Mikel Arteta", "Manager"),
                TestDataBuilder::staff_member("90001", "Albert Stuivenberg", "Assistant Manager"),
            ],
        );
        (fotmob, fbref, transfermarkt)
    }

    #[test]
    fn test_path_name_spelling_is_joined_by_mean_scorer() {
        let (fotmob, fbref, transfermarkt) = arsenal();
        let team = Team::fuse(team_params(), fotmob, fbref, transfermarkt, 80.0).unwrap();

        let raya = &team.roster()[0];
        assert_eq!(raya.id, "562727");
        assert_eq!(raya.fbref.as_ref().unwrap().id, "98ea5115");
        assert_eq!(raya.transfermarkt.as_ref().unwrap().id, "262749");
        assert!(raya.names.contains("David Raya"));
        assert!(raya.names.contains("David-Raya"));
        assert_eq!(raya.market_value, Some(35_000_000));
    }

    #[test]
    fn test_unmatched_squad_members_are_omitted() {
        let (fotmob, fbref, transfermarkt) = arsenal();
        let team = Team::fuse(team_params(), fotmob, fbref, transfermarkt, 80.0).unwrap();

        assert_eq!(team.roster().len(), 2);
        assert!(team.roster().iter().all(|e| e.name != "Youth Trialist"));
        // Saka is only on FBref
        assert!(team.roster()[1].transfermarkt.is_none());
    }

    #[test]
    fn test_player_params_carry_every_known_id() {
        let (fotmob, fbref, transfermarkt) = arsenal();
        let team = Team::fuse(team_params(), fotmob, fbref, transfermarkt, 80.0).unwrap();

        let params = team.player_params();
        assert_eq!(params[0].fotmob_id, "562727");
        assert_eq!(params[0].fbref_id.as_deref(), Some("98ea5115"));
        assert_eq!(params[0].transfermarkt_id.as_deref(), Some("262749"));
        assert_eq!(params[1].transfermarkt_id, None);
        assert!(params.iter().all(|p| p.validate().is_ok()));
    }

    #[test]
    fn test_staff_led_by_transfermarkt() {
        let (fotmob, fbref, transfermarkt) = arsenal();
        let team = Team::fuse(team_params(), fotmob, fbref, transfermarkt, 80.0).unwrap();

        let staff = team.staff_params();
        assert_eq!(staff.len(), 2);
        assert_eq!(staff[0].transfermarkt_id, "47620");
        assert_eq!(staff[0].fotmob_id.as_deref(), Some("1160"));
        assert_eq!(staff[1].fotmob_id, None);
    }

    #[test]
    fn test_info_unions_names_and_carries_shooting() {
        let (fotmob, fbref, transfermarkt) = arsenal();
        let team = Team::fuse(team_params(), fotmob, fbref, transfermarkt, 80.0).unwrap();

        let info = team.info();
        assert_eq!(info.id, "9825");
        assert!(info.names.contains("Arsenal"));
        assert!(info.names.contains("Arsenal FC"));
        assert_eq!(info.shooting.shots, 648);
        assert_eq!(info.market_value, Some(1_120_000_000));
    }

    #[test]
    fn test_squad_with_no_candidates_is_fatal() {
        let (fotmob, _, _) = arsenal();
        let err = Team::fuse(
            team_params(),
            fotmob,
            TestDataBuilder::fbref_squad(Vec::new()),
            TestDataBuilder::transfermarkt_club(Vec::new(), Vec::new()),
            80.0,
        )
        .unwrap_err();
        assert!(matches!(err, AppError::NoMatch { .. }));
    }
}
