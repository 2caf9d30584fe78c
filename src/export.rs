use chrono::{DateTime, Utc};

use crate::api::models::ScrapeResult;
use crate::error::Result;

pub const EXPORTED: &str = "Results exported successfully!";

/// Pretty-printed JSON with two-space indentation.
pub fn export_json(result: &ScrapeResult) -> Result<String> {
    Ok(serde_json::to_string_pretty(result)?)
}

/// `scraped_data_<YYYY-MM-DDTHH-MM-SS>.json`, in UTC.
pub fn export_file_name(now: DateTime<Utc>) -> String {
    format!("scraped_data_{}.json", now.format("%Y-%m-%dT%H-%M-%S"))
}
