use crate::constants::{self, cutoffs, env_vars, source_urls};
use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncWriteExt;

pub mod paths;
pub mod validation;

use paths::{get_config_path, get_log_dir_path};
use validation::validate_config;

/// Base URLs of the four consulted sources.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct SourceUrls {
    #[serde(default = "default_fotmob_url")]
    pub fotmob: String,
    #[serde(default = "default_fbref_url")]
    pub fbref: String,
    #[serde(default = "default_official_url")]
    pub official: String,
    #[serde(default = "default_transfermarkt_url")]
    pub transfermarkt: String,
}

fn default_fotmob_url() -> String {
    source_urls::FOTMOB.to_string()
}

fn default_fbref_url() -> String {
    source_urls::FBREF.to_string()
}

fn default_official_url() -> String {
    source_urls::OFFICIAL.to_string()
}

fn default_transfermarkt_url() -> String {
    source_urls::TRANSFERMARKT.to_string()
}

impl Default for SourceUrls {
    fn default() -> Self {
        SourceUrls {
            fotmob: default_fotmob_url(),
            fbref: default_fbref_url(),
            official: default_official_url(),
            transfermarkt: default_transfermarkt_url(),
        }
    }
}

impl SourceUrls {
    /// Points every source at the same host, each under its own path prefix.
    /// Handy for mock servers and local mirrors.
    pub fn with_common_root(root: &str) -> Self {
        let root = root.trim_end_matches('/');
        SourceUrls {
            fotmob: format!("{root}/fotmob"),
            fbref: format!("{root}/fbref"),
            official: format!("{root}/official"),
            transfermarkt: format!("{root}/transfermarkt"),
        }
    }
}

/// Minimum similarity scores (0-100) accepted by the matcher, per entity kind.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct MatchCutoffs {
    #[serde(default = "default_competition_cutoff")]
    pub competition: f64,
    #[serde(default = "default_team_cutoff")]
    pub team: f64,
    #[serde(default = "default_player_cutoff")]
    pub player: f64,
    #[serde(default = "default_match_cutoff", rename = "match")]
    pub fixture: f64,
}

fn default_competition_cutoff() -> f64 {
    cutoffs::COMPETITION
}

fn default_team_cutoff() -> f64 {
    cutoffs::TEAM
}

fn default_player_cutoff() -> f64 {
    cutoffs::PLAYER
}

fn default_match_cutoff() -> f64 {
    cutoffs::MATCH
}

impl Default for MatchCutoffs {
    fn default() -> Self {
        MatchCutoffs {
            competition: default_competition_cutoff(),
            team: default_team_cutoff(),
            player: default_player_cutoff(),
            fixture: default_match_cutoff(),
        }
    }
}

/// Configuration structure for the library and CLI.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Source base URLs
    #[serde(default)]
    pub sources: SourceUrls,
    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// HTTP timeout in seconds for source requests. Defaults to 30 seconds.
    #[serde(default = "default_http_timeout")]
    pub http_timeout_seconds: u64,
    /// Path to the log file. If not specified, logs will be written to a default location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file_path: Option<String>,
    /// Matcher cutoffs
    #[serde(default)]
    pub cutoffs: MatchCutoffs,
}

fn default_user_agent() -> String {
    constants::DEFAULT_USER_AGENT.to_string()
}

/// Default HTTP timeout in seconds
fn default_http_timeout() -> u64 {
    constants::DEFAULT_HTTP_TIMEOUT_SECONDS
}

impl Default for Config {
    fn default() -> Self {
        Config {
            sources: SourceUrls::default(),
            user_agent: default_user_agent(),
            http_timeout_seconds: default_http_timeout(),
            log_file_path: None,
            cutoffs: MatchCutoffs::default(),
        }
    }
}

impl Config {
    /// Loads configuration from the default config file location.
    /// If no config file exists the defaults are used.
    /// Environment variables override config file values.
    ///
    /// # Environment Variables
    /// - `FOOTBALL_FUSION_FOTMOB_URL`, `FOOTBALL_FUSION_FBREF_URL`,
    ///   `FOOTBALL_FUSION_OFFICIAL_URL`, `FOOTBALL_FUSION_TRANSFERMARKT_URL` - source base URLs
    /// - `FOOTBALL_FUSION_LOG_FILE` - Override log file path
    /// - `FOOTBALL_FUSION_HTTP_TIMEOUT` - Override HTTP timeout in seconds (default: 30)
    pub async fn load() -> Result<Self, AppError> {
        let config_path = get_config_path();

        let mut config = if Path::new(&config_path).exists() {
            Self::load_from_path(&config_path).await?
        } else {
            Config::default()
        };

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads configuration from a custom file path without env overrides.
    pub async fn load_from_path(path: &str) -> Result<Self, AppError> {
        let content = fs::read_to_string(path).await?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Applies `FOOTBALL_FUSION_*` environment overrides in place.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var(env_vars::FOTMOB_URL) {
            self.sources.fotmob = url;
        }
        if let Ok(url) = std::env::var(env_vars::FBREF_URL) {
            self.sources.fbref = url;
        }
        if let Ok(url) = std::env::var(env_vars::OFFICIAL_URL) {
            self.sources.official = url;
        }
        if let Ok(url) = std::env::var(env_vars::TRANSFERMARKT_URL) {
            self.sources.transfermarkt = url;
        }
        if let Ok(log_file_path) = std::env::var(env_vars::LOG_FILE) {
            self.log_file_path = Some(log_file_path);
        }
        if let Some(timeout) = std::env::var(env_vars::HTTP_TIMEOUT)
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
        {
            self.http_timeout_seconds = timeout;
        }
    }

    /// Validates the configuration settings
    pub fn validate(&self) -> Result<(), AppError> {
        validate_config(self)
    }

    /// Saves current configuration to the default config file location.
    pub async fn save(&self) -> Result<(), AppError> {
        let config_path = get_config_path();
        self.save_to_path(&config_path).await
    }

    /// Saves configuration to a custom file path, creating the parent directory
    /// if needed.
    ///
    /// # Errors
    /// * `AppError::Config` - If the provided path has no parent directory
    /// * `AppError::Io` - If there's an I/O error creating directories or writing the file
    /// * `AppError::TomlSerialize` - If there's an error serializing the configuration
    pub async fn save_to_path(&self, path: &str) -> Result<(), AppError> {
        let config_dir = Path::new(path).parent().ok_or_else(|| {
            AppError::config_error(format!("Path '{path}' has no parent directory"))
        })?;

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).await?;
        }
        let content = toml::to_string_pretty(self)?;
        let mut file = fs::File::create(path).await?;
        file.write_all(content.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }

    /// Returns the platform-specific path for the config file.
    pub fn get_config_path() -> String {
        paths::get_config_path()
    }

    /// Returns the platform-specific path for the log directory.
    pub fn get_log_dir_path() -> String {
        paths::get_log_dir_path()
    }

    /// Displays current configuration settings to stdout.
    pub async fn display() -> Result<(), AppError> {
        let config_path = get_config_path();
        let log_dir = get_log_dir_path();
        let config = Config::load().await?;

        println!("\nCurrent Configuration");
        println!("────────────────────────────────────");
        println!("Config Location:");
        if Path::new(&config_path).exists() {
            println!("{config_path}");
        } else {
            println!("{config_path} (not created, using defaults)");
        }
        println!("────────────────────────────────────");
        println!("Sources:");
        println!("  FotMob:        {}", config.sources.fotmob);
        println!("  FBref:         {}", config.sources.fbref);
        println!("  Official:      {}", config.sources.official);
        println!("  Transfermarkt: {}", config.sources.transfermarkt);
        println!("────────────────────────────────────");
        println!("HTTP Timeout:");
        println!("{} seconds", config.http_timeout_seconds);
        println!("────────────────────────────────────");
        println!("Match Cutoffs:");
        println!(
            "  competition {} / team {} / player {} / match {}",
            config.cutoffs.competition,
            config.cutoffs.team,
            config.cutoffs.player,
            config.cutoffs.fixture
        );
        println!("────────────────────────────────────");
        println!("Log File Location:");
        if let Some(custom_path) = &config.log_file_path {
            println!("{custom_path}");
        } else {
            println!("{log_dir}/{}", constants::LOG_FILE_NAME);
            println!("(Default location)");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_config_load_existing_file() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        let config_path_str = config_path.to_string_lossy();

        let config_content = r#"
user_agent = "test-agent"
log_file_path = "/custom/log/path"

[sources]
fotmob = "http://localhost:9000/fotmob"

[cutoffs]
player = 90.0
"#;
        tokio::fs::write(&config_path, config_content).await.unwrap();

        let config = Config::load_from_path(&config_path_str).await.unwrap();

        assert_eq!(config.user_agent, "test-agent");
        assert_eq!(config.log_file_path, Some("/custom/log/path".to_string()));
        assert_eq!(config.sources.fotmob, "http://localhost:9000/fotmob");
        // Unspecified sources and cutoffs keep their defaults
        assert_eq!(config.sources.fbref, source_urls::FBREF);
        assert_eq!(config.cutoffs.player, 90.0);
        assert_eq!(config.cutoffs.team, cutoffs::TEAM);
        assert_eq!(config.http_timeout_seconds, default_http_timeout());
    }

    #[tokio::test]
    async fn test_config_load_empty_file_uses_defaults() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        tokio::fs::write(&config_path, "").await.unwrap();

        let config = Config::load_from_path(&config_path.to_string_lossy())
            .await
            .unwrap();

        assert_eq!(config, Config::default());
    }

    #[tokio::test]
    async fn test_config_save_and_load_roundtrip() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("nested").join("config.toml");
        let config_path_str = config_path.to_string_lossy();
        let original_config = Config {
            sources: SourceUrls::with_common_root("http://127.0.0.1:8080"),
            log_file_path: Some("/custom/log/path".to_string()),
            ..Config::default()
        };
        original_config.save_to_path(&config_path_str).await.unwrap();
        assert!(config_path.exists());

        let content = tokio::fs::read_to_string(&config_path).await.unwrap();
        assert!(content.contains("[sources]"), "Content: {content}");
        assert!(content.contains("match = "), "Content: {content}");

        let loaded_config = Config::load_from_path(&config_path_str).await.unwrap();
        assert_eq!(original_config, loaded_config);
    }

    #[test]
    fn test_with_common_root() {
        let urls = SourceUrls::with_common_root("http://127.0.0.1:8080/");
        assert_eq!(urls.fotmob, "http://127.0.0.1:8080/fotmob");
        assert_eq!(urls.fbref, "http://127.0.0.1:8080/fbref");
        assert_eq!(urls.official, "http://127.0.0.1:8080/official");
        assert_eq!(urls.transfermarkt, "http://127.0.0.1:8080/transfermarkt");
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        unsafe {
            std::env::set_var(env_vars::FBREF_URL, "http://mirror.local/fbref");
            std::env::set_var(env_vars::HTTP_TIMEOUT, "5");
            std::env::set_var(env_vars::LOG_FILE, "/tmp/ff.log");
        }

        let mut config = Config::default();
        config.apply_env_overrides();

        unsafe {
            std::env::remove_var(env_vars::FBREF_URL);
            std::env::remove_var(env_vars::HTTP_TIMEOUT);
            std::env::remove_var(env_vars::LOG_FILE);
        }

        assert_eq!(config.sources.fbref, "http://mirror.local/fbref");
        assert_eq!(config.sources.fotmob, source_urls::FOTMOB);
        assert_eq!(config.http_timeout_seconds, 5);
        assert_eq!(config.log_file_path, Some("/tmp/ff.log".to_string()));
    }

    #[test]
    #[serial]
    fn test_env_override_ignores_invalid_timeout() {
        unsafe {
            std::env::set_var(env_vars::HTTP_TIMEOUT, "soon");
        }
        let mut config = Config::default();
        config.apply_env_overrides();
        unsafe {
            std::env::remove_var(env_vars::HTTP_TIMEOUT);
        }
        assert_eq!(config.http_timeout_seconds, default_http_timeout());
    }

    #[test]
    fn test_get_config_path() {
        let config_path = Config::get_config_path();
        assert!(config_path.contains(constants::APP_DIR_NAME));
        assert!(config_path.ends_with("config.toml"));
    }

    #[test]
    fn test_get_log_dir_path() {
        let log_dir_path = Config::get_log_dir_path();
        assert!(log_dir_path.contains(constants::APP_DIR_NAME));
        assert!(log_dir_path.ends_with("logs"));
    }
}
