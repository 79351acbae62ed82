use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::{Args as ClapArgs, Parser, Subcommand};
use football_fusion::Season;
use football_fusion::fusion::{MatchParams, PlayerParams, StaffParams, TeamParams};

fn get_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
        .usage(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Yellow.on_default())
        .error(AnsiColor::Red.on_default().effects(Effects::BOLD))
        .valid(AnsiColor::Green.on_default())
        .invalid(AnsiColor::Red.on_default())
}

/// Football statistics fused from FotMob, FBref, the official league API and
/// Transfermarkt.
///
/// Every command prints the fused view as pretty JSON, including the join
/// keys needed for the next command down the chain:
/// competitions -> competition -> team -> player / staff, and
/// matches -> match.
#[derive(Parser, Debug)]
#[command(author = "Niko Salonen", version, about, long_about = None)]
#[command(styles = get_styles())]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Mirror log output to stdout in addition to the log file.
    #[arg(long = "debug", global = true, help_heading = "Debug")]
    pub debug: bool,

    /// Specify a custom log file path. If not provided, logs will be written to the default location.
    #[arg(long = "log-file", global = true, help_heading = "Debug")]
    pub log_file: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List tracked competitions as every source knows them
    Competitions {
        /// Season such as 2023, 2023/2024 or 2023-24
        #[arg(long, short = 's')]
        season: Option<Season>,
    },

    /// Show a competition's fused table and team join keys
    Competition {
        /// Competition key, e.g. premier-league (see `competitions`)
        key: String,
        #[arg(long, short = 's')]
        season: Option<Season>,
    },

    /// Show a team's roster, staff and shooting
    Team {
        #[command(flatten)]
        ids: TeamIds,
        #[arg(long, short = 's')]
        season: Option<Season>,
    },

    /// Show one player's profile across sources
    Player {
        #[command(flatten)]
        ids: PlayerIds,
    },

    /// Show one staff member's profile across sources
    Staff {
        #[command(flatten)]
        ids: StaffIds,
    },

    /// List fixtures of tracked competitions on a date
    Matches {
        /// Date in YYYY-MM-DD format
        date: String,
    },

    /// Show one fixture with fused score, xG and lineups
    Match {
        #[arg(long)]
        fotmob_id: String,
        #[arg(long)]
        fbref_id: String,
    },

    /// List current configuration settings
    ListConfig,

    /// Update log file path in config. This sets a persistent custom log file location.
    SetLogFile { path: String },

    /// Clear the custom log file path from config. This reverts to using the default log location.
    ClearLogFile,
}

#[derive(ClapArgs, Debug)]
pub struct TeamIds {
    #[arg(long)]
    pub fotmob_id: String,
    #[arg(long)]
    pub fbref_id: String,
    /// FBref URL slug, e.g. Arsenal
    #[arg(long)]
    pub fbref_path: Option<String>,
    #[arg(long)]
    pub transfermarkt_id: String,
    /// Transfermarkt URL slug, e.g. fc-arsenal
    #[arg(long)]
    pub transfermarkt_path: Option<String>,
}

impl From<TeamIds> for TeamParams {
    fn from(ids: TeamIds) -> Self {
        TeamParams {
            fotmob_id: ids.fotmob_id,
            fbref_id: ids.fbref_id,
            fbref_path_name: ids.fbref_path,
            transfermarkt_id: ids.transfermarkt_id,
            transfermarkt_path_name: ids.transfermarkt_path,
        }
    }
}

#[derive(ClapArgs, Debug)]
pub struct PlayerIds {
    #[arg(long)]
    pub fotmob_id: String,
    #[arg(long)]
    pub fbref_id: Option<String>,
    #[arg(long)]
    pub fbref_path: Option<String>,
    #[arg(long)]
    pub transfermarkt_id: Option<String>,
    #[arg(long)]
    pub transfermarkt_path: Option<String>,
}

impl From<PlayerIds> for PlayerParams {
    fn from(ids: PlayerIds) -> Self {
        PlayerParams {
            fotmob_id: ids.fotmob_id,
            fbref_id: ids.fbref_id,
            fbref_path_name: ids.fbref_path,
            transfermarkt_id: ids.transfermarkt_id,
            transfermarkt_path_name: ids.transfermarkt_path,
        }
    }
}

#[derive(ClapArgs, Debug)]
pub struct StaffIds {
    #[arg(long)]
    pub transfermarkt_id: String,
    #[arg(long)]
    pub transfermarkt_path: Option<String>,
    #[arg(long)]
    pub fotmob_id: Option<String>,
}

impl From<StaffIds> for StaffParams {
    fn from(ids: StaffIds) -> Self {
        StaffParams {
            transfermarkt_id: ids.transfermarkt_id,
            transfermarkt_path_name: ids.transfermarkt_path,
            fotmob_id: ids.fotmob_id,
        }
    }
}

pub fn match_params(fotmob_id: String, fbref_id: String) -> MatchParams {
    MatchParams {
        fotmob_id,
        fbref_id,
    }
}

impl Command {
    /// Commands that only touch the local configuration
    pub fn is_config_command(&self) -> bool {
        matches!(
            self,
            Command::ListConfig | Command::SetLogFile { .. } | Command::ClearLogFile
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_team_command() {
        let args = Args::try_parse_from([
            "football_fusion",
            "team",
            "--fotmob-id",
            "9825",
            "--fbref-id",
            "18bb7c10",
            "--transfermarkt-id",
            "11",
            "--season",
            "2023/24",
        ])
        .unwrap();

        let Command::Team { ids, season } = args.command else {
            panic!("expected team command");
        };
        assert_eq!(season, Some(Season::new(2023)));
        let params = TeamParams::from(ids);
        assert_eq!(params.transfermarkt_id, "11");
        assert_eq!(params.fbref_path_name, None);
    }

    #[test]
    fn test_invalid_season_is_rejected() {
        let result = Args::try_parse_from(["football_fusion", "competitions", "--season", "23"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_debug_flag() {
        let args = Args::try_parse_from(["football_fusion", "matches", "2024-03-31", "--debug"])
            .unwrap();
        assert!(args.debug);
        assert!(!args.command.is_config_command());
    }
}
