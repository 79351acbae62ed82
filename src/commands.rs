use crate::cli::{Command, match_params};
use football_fusion::config::Config;
use football_fusion::error::AppError;
use football_fusion::{FootballApi, Season};
use serde::Serialize;
use serde_json::json;
use tracing::info;

/// Prints a fused view as pretty JSON on stdout.
fn print_json(value: &impl Serialize) -> Result<(), AppError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Handles the list-config command.
pub async fn handle_list_config_command() -> Result<(), AppError> {
    Config::display().await
}

/// Handles set-log-file and clear-log-file.
pub async fn handle_config_update_command(log_file_path: Option<String>) -> Result<(), AppError> {
    let mut config = Config::load().await.unwrap_or_default();

    match log_file_path {
        Some(path) => config.log_file_path = Some(path),
        None => {
            config.log_file_path = None;
            println!("Custom log file path cleared. Using default location.");
        }
    }

    config.save().await?;
    println!("Config updated successfully!");
    Ok(())
}

async fn handle_competitions(api: &FootballApi, season: Option<Season>) -> Result<(), AppError> {
    let competitions = api.get_competitions(season).await?;
    print_json(&json!({
        "season": season.map(|s| s.to_string()),
        "competitions": competitions.entries(),
        "competition_params": competitions.competition_params(),
    }))
}

async fn handle_competition(
    api: &FootballApi,
    key: &str,
    season: Option<Season>,
) -> Result<(), AppError> {
    let params = api.competition_params(key)?;
    let competition = api.get_competition(&params, season).await?;
    print_json(&json!({
        "info": competition.info(),
        "table": competition.table(),
        "team_params": competition.team_params(),
    }))
}

async fn run(api: &FootballApi, command: Command) -> Result<(), AppError> {
    match command {
        Command::Competitions { season } => handle_competitions(api, season).await,
        Command::Competition { key, season } => handle_competition(api, &key, season).await,
        Command::Team { ids, season } => {
            let team = api.get_team(&ids.into(), season).await?;
            print_json(&json!({
                "info": team.info(),
                "roster": team.roster(),
                "staff": team.staff(),
                "player_params": team.player_params(),
                "staff_params": team.staff_params(),
            }))
        }
        Command::Player { ids } => {
            let player = api.get_player(&ids.into()).await?;
            print_json(&json!({ "info": player.info(), "params": player.params }))
        }
        Command::Staff { ids } => {
            let staff = api.get_staff(&ids.into()).await?;
            print_json(&json!({ "info": staff.info(), "params": staff.params }))
        }
        Command::Matches { date } => {
            let matches = api.get_matches(&date).await?;
            print_json(&json!({
                "date": matches.date,
                "matches": matches.entries(),
                "match_params": matches.match_params(),
            }))
        }
        Command::Match {
            fotmob_id,
            fbref_id,
        } => {
            let fixture = api.get_match(&match_params(fotmob_id, fbref_id)).await?;
            print_json(&json!({
                "info": fixture.info(),
                "home_lineup": fixture.home_lineup(),
                "away_lineup": fixture.away_lineup(),
            }))
        }
        Command::ListConfig | Command::SetLogFile { .. } | Command::ClearLogFile => Err(
            AppError::config_error("Configuration commands do not fetch data"),
        ),
    }
}

/// Runs one data command against the live sources and prints the result.
pub async fn handle_fetch_command(command: Command) -> Result<(), AppError> {
    let config = Config::load().await?;
    let mut api = FootballApi::new(config)?;

    let result = run(&api, command).await;
    api.close()?;
    info!("Done");
    result
}
