//! Top-level entry point.
//!
//! [`FootballApi`] owns the shared HTTP client and the configuration, checks
//! every argument before any request goes out and hands off to the fusion
//! aggregators.

use chrono::NaiveDate;
use reqwest::Client;
use tracing::{debug, info};

use crate::competition_index::CompetitionIndex;
use crate::config::Config;
use crate::constants::DATE_FORMAT;
use crate::data_fetcher::create_http_client_with_timeout;
use crate::error::AppError;
use crate::fusion::{
    Competition, CompetitionParams, Competitions, Match, MatchParams, Matches, Player,
    PlayerParams, Staff, StaffParams, Team, TeamParams,
};
use crate::sources::Season;

pub struct FootballApi {
    client: Option<Client>,
    config: Config,
}

impl FootballApi {
    /// Validates `config` and builds a client from it.
    pub fn new(config: Config) -> Result<Self, AppError> {
        config.validate()?;
        let client =
            create_http_client_with_timeout(config.http_timeout_seconds, &config.user_agent)?;
        Ok(FootballApi {
            client: Some(client),
            config,
        })
    }

    /// Uses an existing client, e.g. one shared with the rest of an application.
    pub fn with_client(config: Config, client: Client) -> Result<Self, AppError> {
        config.validate()?;
        Ok(FootballApi {
            client: Some(client),
            config,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn is_closed(&self) -> bool {
        self.client.is_none()
    }

    /// Releases the client. Closing twice is an error, as is any fetch
    /// after closing.
    pub fn close(&mut self) -> Result<(), AppError> {
        match self.client.take() {
            Some(_) => {
                debug!("HTTP client closed");
                Ok(())
            }
            None => Err(AppError::ClientClosed),
        }
    }

    fn client(&self) -> Result<&Client, AppError> {
        self.client.as_ref().ok_or(AppError::ClientClosed)
    }

    /// Join keys of an indexed competition, e.g. `premier-league`.
    pub fn competition_params(&self, key: &str) -> Result<CompetitionParams, AppError> {
        CompetitionIndex::global()?.params(key)
    }

    pub async fn get_competitions(&self, season: Option<Season>) -> Result<Competitions, AppError> {
        let client = self.client()?;
        let index = CompetitionIndex::global()?;
        Competitions::fetch(client, &self.config, index, season).await
    }

    pub async fn get_competition(
        &self,
        params: &CompetitionParams,
        season: Option<Season>,
    ) -> Result<Competition, AppError> {
        params.validate()?;
        let client = self.client()?;
        Competition::fetch(client, &self.config, params, season).await
    }

    pub async fn get_team(
        &self,
        params: &TeamParams,
        season: Option<Season>,
    ) -> Result<Team, AppError> {
        params.validate()?;
        let client = self.client()?;
        Team::fetch(client, &self.config, params, season).await
    }

    pub async fn get_player(&self, params: &PlayerParams) -> Result<Player, AppError> {
        params.validate()?;
        let client = self.client()?;
        Player::fetch(client, &self.config, params).await
    }

    pub async fn get_staff(&self, params: &StaffParams) -> Result<Staff, AppError> {
        params.validate()?;
        let client = self.client()?;
        Staff::fetch(client, &self.config, params).await
    }

    /// Fixtures of tracked competitions on `date` (`YYYY-MM-DD`).
    pub async fn get_matches(&self, date: &str) -> Result<Matches, AppError> {
        let date = parse_date(date)?;
        let client = self.client()?;
        let index = CompetitionIndex::global()?;
        info!("Fetching fixtures for {date}");
        Matches::fetch(client, &self.config, index, date).await
    }

    pub async fn get_match(&self, params: &MatchParams) -> Result<Match, AppError> {
        params.validate()?;
        let client = self.client()?;
        Match::fetch(client, &self.config, params).await
    }
}

/// Parses a `YYYY-MM-DD` date.
pub fn parse_date(date: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(date.trim(), DATE_FORMAT).map_err(|e| {
        AppError::datetime_parse_error(format!("Invalid date '{date}', expected YYYY-MM-DD: {e}"))
    })
}
