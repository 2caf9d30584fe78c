use std::env;
use std::path::PathBuf;
use std::time::Duration;
use reqwest::Url;
use crate::error::{ClientError, Result};

pub const DEFAULT_API_BASE: &str = "http://localhost:5000/api";

#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the scraping API, without a trailing slash.
    pub api_base: String,
    pub output_dir: PathBuf,
    pub error_notice_ttl: Duration,
    pub success_notice_ttl: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_base: DEFAULT_API_BASE.to_string(),
            output_dir: PathBuf::from("."),
            error_notice_ttl: Duration::from_secs(10),
            success_notice_ttl: Duration::from_secs(5),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load environment variables from .env file if it exists
        dotenv::dotenv().ok();

        let api_base = env::var("SCRAPER_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.to_string());
        let output_dir = env::var("SCRAPER_OUTPUT_DIR").unwrap_or_else(|_| ".".to_string());

        Ok(Config {
            api_base: normalize_api_base(&api_base)?,
            output_dir: PathBuf::from(output_dir),
            ..Config::default()
        })
    }

    /// Uses `api_base` as given, after the same checks `load` applies.
    pub fn with_api_base(api_base: &str) -> Result<Self> {
        Ok(Config {
            api_base: normalize_api_base(api_base)?,
            ..Config::default()
        })
    }

    pub fn health_url(&self) -> String {
        format!("{}/health", self.api_base)
    }

    pub fn scrape_url(&self) -> String {
        format!("{}/scrape", self.api_base)
    }
}

fn normalize_api_base(raw: &str) -> Result<String> {
    let url = Url::parse(raw).map_err(|e| ClientError::Config(format!("Invalid API base URL: {}", e)))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ClientError::Config(format!("Unsupported API scheme: {}", url.scheme())));
    }
    Ok(raw.trim_end_matches('/').to_string())
}
