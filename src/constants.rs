//! Application-wide constants and configuration defaults
//!
//! This module centralizes source endpoints, matcher cutoffs and other
//! tuning values so they can be overridden from one place.

/// Directory name used under the platform config directory
pub const APP_DIR_NAME: &str = "football_fusion";

/// Default log file name inside the log directory
pub const LOG_FILE_NAME: &str = "football_fusion.log";

/// Default timeout for HTTP requests in seconds
pub const DEFAULT_HTTP_TIMEOUT_SECONDS: u64 = 30;

/// Maximum number of idle connections per host in the shared HTTP pool
pub const HTTP_POOL_MAX_IDLE_PER_HOST: usize = 16;

/// Browser-like user agent; Transfermarkt rejects requests without one
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0 Safari/537.36";

/// Default base URLs of the consulted sources
pub mod source_urls {
    pub const FOTMOB: &str = "https://www.fotmob.com/api";
    pub const FBREF: &str = "https://fbref.com";
    pub const OFFICIAL: &str = "https://footballapi.pulselive.com/football";
    pub const TRANSFERMARKT: &str = "https://www.transfermarkt.com";
}

/// Default score cutoffs (0-100) for the entity matcher
pub mod cutoffs {
    /// Competition names across sources are close but not identical
    pub const COMPETITION: f64 = 80.0;

    /// Team lists per competition are small, so a looser cutoff is safe
    pub const TEAM: f64 = 60.0;

    /// Player pools are large and names are often shared
    pub const PLAYER: f64 = 80.0;

    /// Mean of home and away team name similarity
    pub const MATCH: f64 = 70.0;
}

/// Environment variable names
pub mod env_vars {
    /// Override FotMob base URL
    pub const FOTMOB_URL: &str = "FOOTBALL_FUSION_FOTMOB_URL";

    /// Override FBref base URL
    pub const FBREF_URL: &str = "FOOTBALL_FUSION_FBREF_URL";

    /// Override official league API base URL
    pub const OFFICIAL_URL: &str = "FOOTBALL_FUSION_OFFICIAL_URL";

    /// Override Transfermarkt base URL
    pub const TRANSFERMARKT_URL: &str = "FOOTBALL_FUSION_TRANSFERMARKT_URL";

    /// Override log file path
    pub const LOG_FILE: &str = "FOOTBALL_FUSION_LOG_FILE";

    /// Override HTTP timeout in seconds
    pub const HTTP_TIMEOUT: &str = "FOOTBALL_FUSION_HTTP_TIMEOUT";
}

/// Date format accepted by the matches-by-date operation
pub const DATE_FORMAT: &str = "%Y-%m-%d";
