use reqwest::Url;

/// Client configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub environment: Environment,
    pub log_level: String,
}

/// Deployment environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

/// Where the code server listens when nothing else is configured.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000";

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Optional with defaults: `API_BASE_URL`, `ENVIRONMENT`, `LOG_LEVEL`
    ///
    /// # Errors
    ///
    /// Returns an error if `API_BASE_URL` is not an http(s) URL.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let api_base_url = parse_base_url(
            &std::env::var("API_BASE_URL").unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string()),
        )?;

        let environment = match std::env::var("ENVIRONMENT")
            .unwrap_or_else(|_| "development".to_string())
            .as_str()
        {
            "production" => Environment::Production,
            "staging" => Environment::Staging,
            _ => Environment::Development,
        };

        let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            api_base_url,
            environment,
            log_level,
        })
    }
}

/// Validate a base URL and strip trailing slashes.
///
/// # Errors
///
/// Returns an error if `raw` does not parse or is not http/https.
pub fn parse_base_url(raw: &str) -> anyhow::Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    let url = Url::parse(trimmed)
        .map_err(|e| anyhow::anyhow!("API_BASE_URL must be a valid URL: {e}"))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(anyhow::anyhow!(
            "API_BASE_URL must use http or https, got {}",
            url.scheme()
        ));
    }

    Ok(trimmed.to_string())
}
