use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Failed to fetch data from source: {0}")]
    ApiFetch(#[from] reqwest::Error),

    #[error("Failed to parse source response: {0}")]
    ApiParse(#[from] serde_json::Error),

    // Specific HTTP status code errors
    #[error("Source request not found (404): {url}")]
    ApiNotFound { url: String },

    #[error("Source server error ({status}): {message} (URL: {url})")]
    ApiServerError {
        status: u16,
        message: String,
        url: String,
    },

    #[error("Source client error ({status}): {message} (URL: {url})")]
    ApiClientError {
        status: u16,
        message: String,
        url: String,
    },

    #[error("Source rate limit exceeded (429): {message} (URL: {url})")]
    ApiRateLimit { message: String, url: String },

    #[error("Source service unavailable ({status}): {message} (URL: {url})")]
    ApiServiceUnavailable {
        status: u16,
        message: String,
        url: String,
    },

    // Network-specific errors
    #[error("Network timeout while fetching data from: {url}")]
    NetworkTimeout { url: String },

    #[error("Connection failed to: {url} - {message}")]
    NetworkConnection { url: String, message: String },

    // Data parsing errors (upstream format drift)
    #[error("Source returned malformed JSON: {message} (URL: {url})")]
    ApiMalformedJson { message: String, url: String },

    #[error("Source returned unexpected data structure: {message} (URL: {url})")]
    ApiUnexpectedStructure { message: String, url: String },

    #[error("Source returned empty or missing data: {message} (URL: {url})")]
    ApiNoData { message: String, url: String },

    #[error("Element not found: {context} (URL: {url})")]
    ElementNotFound { context: String, url: String },

    #[error("Invalid CSS selector: {0}")]
    SelectorParse(String),

    // Reconciliation errors
    #[error("No {entity} match for '{query}'")]
    NoMatch { entity: String, query: String },

    // Configuration and argument errors
    #[error("Unknown competition: {key}")]
    UnknownCompetition { key: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDeserialize(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Date/time parsing error: {0}")]
    DateTimeParse(String),

    #[error("Log setup error: {0}")]
    LogSetup(String),

    #[error("HTTP client has already been closed")]
    ClientClosed,
}

impl<'a> From<scraper::error::SelectorErrorKind<'a>> for AppError {
    fn from(err: scraper::error::SelectorErrorKind<'a>) -> Self {
        Self::SelectorParse(err.to_string())
    }
}

impl AppError {
    /// Create a configuration error with context
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a date/time parsing error with context
    pub fn datetime_parse_error(msg: impl Into<String>) -> Self {
        Self::DateTimeParse(msg.into())
    }

    /// Create a log setup error with context
    pub fn log_setup_error(msg: impl Into<String>) -> Self {
        Self::LogSetup(msg.into())
    }

    /// Create a source not found error
    pub fn api_not_found(url: impl Into<String>) -> Self {
        Self::ApiNotFound { url: url.into() }
    }

    /// Create a source server error (5xx status codes)
    pub fn api_server_error(
        status: u16,
        message: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self::ApiServerError {
            status,
            message: message.into(),
            url: url.into(),
        }
    }

    /// Create a source client error (4xx status codes except 404 and 429)
    pub fn api_client_error(
        status: u16,
        message: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self::ApiClientError {
            status,
            message: message.into(),
            url: url.into(),
        }
    }

    /// Create a rate limit error
    pub fn api_rate_limit(message: impl Into<String>, url: impl Into<String>) -> Self {
        Self::ApiRateLimit {
            message: message.into(),
            url: url.into(),
        }
    }

    /// Create a service unavailable error
    pub fn api_service_unavailable(
        status: u16,
        message: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self::ApiServiceUnavailable {
            status,
            message: message.into(),
            url: url.into(),
        }
    }

    /// Create a network timeout error
    pub fn network_timeout(url: impl Into<String>) -> Self {
        Self::NetworkTimeout { url: url.into() }
    }

    /// Create a network connection error
    pub fn network_connection(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NetworkConnection {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create a malformed JSON error
    pub fn api_malformed_json(message: impl Into<String>, url: impl Into<String>) -> Self {
        Self::ApiMalformedJson {
            message: message.into(),
            url: url.into(),
        }
    }

    /// Create an unexpected data structure error
    pub fn api_unexpected_structure(message: impl Into<String>, url: impl Into<String>) -> Self {
        Self::ApiUnexpectedStructure {
            message: message.into(),
            url: url.into(),
        }
    }

    /// Create a no data error
    pub fn api_no_data(message: impl Into<String>, url: impl Into<String>) -> Self {
        Self::ApiNoData {
            message: message.into(),
            url: url.into(),
        }
    }

    /// Create an element-not-found error for HTML extraction
    pub fn element_not_found(context: impl Into<String>, url: impl Into<String>) -> Self {
        Self::ElementNotFound {
            context: context.into(),
            url: url.into(),
        }
    }

    /// Create a no-match error for a mandatory cross-source join
    pub fn no_match(entity: impl Into<String>, query: impl Into<String>) -> Self {
        Self::NoMatch {
            entity: entity.into(),
            query: query.into(),
        }
    }

    /// Create an unknown competition error
    pub fn unknown_competition(key: impl Into<String>) -> Self {
        Self::UnknownCompetition { key: key.into() }
    }

    /// Whether the whole fetch batch failed on the wire (status or connection)
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            AppError::ApiFetch(_)
                | AppError::ApiNotFound { .. }
                | AppError::ApiServerError { .. }
                | AppError::ApiClientError { .. }
                | AppError::ApiRateLimit { .. }
                | AppError::ApiServiceUnavailable { .. }
                | AppError::NetworkTimeout { .. }
                | AppError::NetworkConnection { .. }
        )
    }

    /// Whether a source response no longer has the expected shape
    pub fn is_parse(&self) -> bool {
        matches!(
            self,
            AppError::ApiParse(_)
                | AppError::ApiMalformedJson { .. }
                | AppError::ApiUnexpectedStructure { .. }
                | AppError::ApiNoData { .. }
                | AppError::ElementNotFound { .. }
                | AppError::SelectorParse(_)
        )
    }

    /// Whether the error was raised before any network call was made
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            AppError::Config(_)
                | AppError::UnknownCompetition { .. }
                | AppError::DateTimeParse(_)
                | AppError::TomlDeserialize(_)
                | AppError::TomlSerialize(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_helper() {
        let error = AppError::config_error("Invalid configuration");
        assert!(matches!(error, AppError::Config(_)));
        assert_eq!(
            error.to_string(),
            "Configuration error: Invalid configuration"
        );
    }

    #[test]
    fn test_api_not_found_helper() {
        let error = AppError::api_not_found("https://www.fotmob.com/api/teams?id=1");
        assert!(matches!(error, AppError::ApiNotFound { .. }));
        assert_eq!(
            error.to_string(),
            "Source request not found (404): https://www.fotmob.com/api/teams?id=1"
        );
    }

    #[test]
    fn test_api_server_error_helper() {
        let error = AppError::api_server_error(500, "Internal server error", "https://fbref.com");
        assert_eq!(
            error.to_string(),
            "Source server error (500): Internal server error (URL: https://fbref.com)"
        );
    }

    #[test]
    fn test_element_not_found_helper() {
        let error = AppError::element_not_found("standings table", "https://fbref.com/en/comps/9");
        assert!(matches!(error, AppError::ElementNotFound { .. }));
        assert_eq!(
            error.to_string(),
            "Element not found: standings table (URL: https://fbref.com/en/comps/9)"
        );
    }

    #[test]
    fn test_no_match_helper() {
        let error = AppError::no_match("team", "Man City");
        assert_eq!(error.to_string(), "No team match for 'Man City'");
    }

    #[test]
    fn test_unknown_competition_helper() {
        let error = AppError::unknown_competition("eredivisie");
        assert_eq!(error.to_string(), "Unknown competition: eredivisie");
        assert!(error.is_configuration());
    }

    #[test]
    fn test_error_classification() {
        assert!(AppError::network_timeout("url").is_transport());
        assert!(AppError::network_connection("url", "refused").is_transport());
        assert!(AppError::api_rate_limit("slow down", "url").is_transport());
        assert!(AppError::api_not_found("url").is_transport());
        assert!(!AppError::element_not_found("h1", "url").is_transport());

        assert!(AppError::element_not_found("h1", "url").is_parse());
        assert!(AppError::api_unexpected_structure("missing table", "url").is_parse());
        assert!(AppError::SelectorParse("bad".to_string()).is_parse());
        assert!(!AppError::api_server_error(500, "boom", "url").is_parse());

        assert!(AppError::config_error("missing id").is_configuration());
        assert!(AppError::datetime_parse_error("bad date").is_configuration());
        assert!(!AppError::ClientClosed.is_configuration());
    }

    #[test]
    fn test_error_from_serde_json() {
        let json_error = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let app_error: AppError = json_error.into();
        assert!(matches!(app_error, AppError::ApiParse(_)));
    }

    #[test]
    fn test_error_from_selector() {
        let selector_error = scraper::Selector::parse("td[").unwrap_err();
        let app_error: AppError = selector_error.into();
        assert!(matches!(app_error, AppError::SelectorParse(_)));
    }

    #[test]
    fn test_error_from_io() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let app_error: AppError = io_error.into();
        assert!(matches!(app_error, AppError::Io(_)));
    }

    #[test]
    fn test_error_from_toml_deserialize() {
        let toml_error = toml::from_str::<serde_json::Value>("invalid = [toml").unwrap_err();
        let app_error: AppError = toml_error.into();
        assert!(matches!(app_error, AppError::TomlDeserialize(_)));
    }

    #[test]
    fn test_client_closed_display() {
        assert_eq!(
            AppError::ClientClosed.to_string(),
            "HTTP client has already been closed"
        );
    }
}
