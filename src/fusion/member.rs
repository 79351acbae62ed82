//! Players and staff. Their ids are known from a team's params, so members
//! are fetched directly and fused without matching.

use reqwest::Client;
use serde::Serialize;
use tracing::{info, instrument};

use super::{Names, PlayerParams, StaffParams, next_response, parse, parse_optional};
use crate::config::Config;
use crate::data_fetcher::execute;
use crate::error::AppError;
use crate::sources::fbref::{self, FbrefPlayer};
use crate::sources::fotmob::{self, FotmobPlayer};
use crate::sources::transfermarkt::{self, TransfermarktPlayer, TransfermarktStaff};
use crate::sources::{Position, SourceAdapter};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerInfo {
    pub id: String,
    pub name: String,
    pub names: Names,
    pub country_code: Option<String>,
    pub position: Option<Position>,
    pub birth_date: Option<String>,
    pub height_cm: Option<u32>,
    pub footed: Option<String>,
    pub shirt_number: Option<u32>,
    pub team: Option<String>,
    pub market_value: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Player {
    pub params: PlayerParams,
    pub fotmob: FotmobPlayer,
    pub fbref: Option<FbrefPlayer>,
    pub transfermarkt: Option<TransfermarktPlayer>,
}

impl Player {
    /// FBref and Transfermarkt are only asked when their id is known.
    #[instrument(skip(client, config), fields(fotmob_id = %params.fotmob_id))]
    pub async fn fetch(
        client: &Client,
        config: &Config,
        params: &PlayerParams,
    ) -> Result<Self, AppError> {
        info!("Fetching player");
        let fotmob = fotmob::PlayerRequest {
            base_url: config.sources.fotmob.clone(),
            id: params.fotmob_id.clone(),
        };
        let fbref = params.fbref_id.as_ref().map(|id| fbref::PlayerRequest {
            base_url: config.sources.fbref.clone(),
            id: id.clone(),
            path_name: params.fbref_path_name.clone(),
        });
        let transfermarkt = params
            .transfermarkt_id
            .as_ref()
            .map(|id| transfermarkt::PlayerRequest {
                base_url: config.sources.transfermarkt.clone(),
                id: id.clone(),
                path_name: params.transfermarkt_path_name.clone(),
            });

        let mut descriptors = vec![fotmob.descriptor()];
        descriptors.extend(fbref.as_ref().map(|a| a.descriptor()));
        descriptors.extend(transfermarkt.as_ref().map(|a| a.descriptor()));

        let mut responses = execute(client, &descriptors).await?.into_iter();
        let fotmob = parse(&fotmob, &next_response(&mut responses)?)?;
        let fbref = parse_optional(fbref.as_ref(), &mut responses)?;
        let transfermarkt = parse_optional(transfermarkt.as_ref(), &mut responses)?;

        Ok(Player {
            params: params.clone(),
            fotmob,
            fbref,
            transfermarkt,
        })
    }

    pub fn info(&self) -> PlayerInfo {
        let fbref = self.fbref.as_ref();
        let tm = self.transfermarkt.as_ref();

        let mut names = Names::new();
        names.insert(&self.fotmob.name);
        names.extend(fbref.map(|p| p.name.as_str()));
        names.extend(tm.map(|p| p.name.as_str()));

        PlayerInfo {
            id: self.fotmob.id.clone(),
            name: self.fotmob.name.clone(),
            names,
            country_code: self
                .fotmob
                .country_code
                .clone()
                .or_else(|| fbref.and_then(|p| p.country_code.clone()))
                .or_else(|| tm.and_then(|p| p.country_code.clone())),
            position: self
                .fotmob
                .position
                .or_else(|| fbref.and_then(|p| p.position))
                .or_else(|| tm.and_then(|p| p.position)),
            birth_date: self
                .fotmob
                .birth_date
                .clone()
                .or_else(|| fbref.and_then(|p| p.birth_date.clone()))
                .or_else(|| tm.and_then(|p| p.birth_date.clone())),
            height_cm: self
                .fotmob
                .height_cm
                .or_else(|| fbref.and_then(|p| p.height_cm))
                .or_else(|| tm.and_then(|p| p.height_cm)),
            footed: fbref
                .and_then(|p| p.footed.clone())
                .or_else(|| tm.and_then(|p| p.foot.clone())),
            shirt_number: self.fotmob.shirt_number,
            team: self.fotmob.team.as_ref().map(|t| t.name.clone()),
            market_value: tm.and_then(|p| p.market_value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StaffInfo {
    pub id: String,
    pub name: String,
    pub names: Names,
    pub country_code: Option<String>,
    pub birth_date: Option<String>,
    pub club: Option<String>,
    pub fotmob_id: Option<String>,
}

/// A coach or other staff member. Transfermarkt leads; FotMob only knows
/// head coaches.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Staff {
    pub params: StaffParams,
    pub transfermarkt: TransfermarktStaff,
    pub fotmob: Option<FotmobPlayer>,
}

impl Staff {
    #[instrument(skip(client, config), fields(transfermarkt_id = %params.transfermarkt_id))]
    pub async fn fetch(
        client: &Client,
        config: &Config,
        params: &StaffParams,
    ) -> Result<Self, AppError> {
        info!("Fetching staff member");
        let transfermarkt = transfermarkt::StaffRequest {
            base_url: config.sources.transfermarkt.clone(),
            id: params.transfermarkt_id.clone(),
            path_name: params.transfermarkt_path_name.clone(),
        };
        // FotMob profiles coaches through the player endpoint
        let fotmob = params.fotmob_id.as_ref().map(|id| fotmob::PlayerRequest {
            base_url: config.sources.fotmob.clone(),
            id: id.clone(),
        });

        let mut descriptors = vec![transfermarkt.descriptor()];
        descriptors.extend(fotmob.as_ref().map(|a| a.descriptor()));

        let mut responses = execute(client, &descriptors).await?.into_iter();
        let transfermarkt = parse(&transfermarkt, &next_response(&mut responses)?)?;
        let fotmob = parse_optional(fotmob.as_ref(), &mut responses)?;

        Ok(Staff {
            params: params.clone(),
            transfermarkt,
            fotmob,
        })
    }

    pub fn info(&self) -> StaffInfo {
        let fotmob = self.fotmob.as_ref();
        let mut names = Names::new();
        names.insert(&self.transfermarkt.name);
        names.extend(fotmob.map(|f| f.name.as_str()));

        StaffInfo {
            id: self.transfermarkt.id.clone(),
            name: self.transfermarkt.name.clone(),
            names,
            country_code: self
                .transfermarkt
                .country_code
                .clone()
                .or_else(|| fotmob.and_then(|f| f.country_code.clone())),
            birth_date: self
                .transfermarkt
                .birth_date
                .clone()
                .or_else(|| fotmob.and_then(|f| f.birth_date.clone())),
            club: self
                .transfermarkt
                .club
                .clone()
                .or_else(|| fotmob.and_then(|f| f.team.as_ref().map(|t| t.name.clone()))),
            fotmob_id: fotmob.map(|f| f.id.clone()),
        }
    }
}
