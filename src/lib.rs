//! Cross-source football statistics.
//!
//! This library fetches competition, team, player, staff and match data from
//! FotMob, FBref, the official league API and Transfermarkt, reconciles the
//! records by fuzzy name matching and exposes fused entities.
//!
//! # Examples
//!
//! ```rust,no_run
//! use football_fusion::{Config, FootballApi};
//! use football_fusion::error::AppError;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), AppError> {
//!     let api = FootballApi::new(Config::load().await?)?;
//!
//!     // Join keys come from the embedded competition index
//!     let params = api.competition_params("premier-league")?;
//!     let competition = api.get_competition(&params, None).await?;
//!     for row in competition.table() {
//!         println!("{:>2}. {} {}", row.position, row.name, row.points);
//!     }
//!
//!     // ...and chain down to a team
//!     if let Some(team_params) = competition.team_params().first() {
//!         let team = api.get_team(team_params, None).await?;
//!         println!("{} players matched", team.roster().len());
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod competition_index;
pub mod config;
pub mod constants;
pub mod data_fetcher;
pub mod error;
pub mod fusion;
pub mod matching;
pub mod sources;
pub mod testing_utils;

// Re-export commonly used types for convenience
pub use api::FootballApi;
pub use config::Config;
pub use error::AppError;
pub use fusion::{
    Competition, CompetitionParams, Competitions, Match, MatchParams, Matches, Names, Player,
    PlayerParams, Staff, StaffParams, Team, TeamParams,
};
pub use sources::{Season, Source};

/// Current version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
