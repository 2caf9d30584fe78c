use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrapingType {
    Text,
    Titles,
    Links,
    Images,
    Custom,
}

impl ScrapingType {
    pub const ALL: [ScrapingType; 5] = [
        ScrapingType::Text,
        ScrapingType::Titles,
        ScrapingType::Links,
        ScrapingType::Images,
        ScrapingType::Custom,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ScrapingType::Text => "text",
            ScrapingType::Titles => "titles",
            ScrapingType::Links => "links",
            ScrapingType::Images => "images",
            ScrapingType::Custom => "custom",
        }
    }
}

impl fmt::Display for ScrapingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScrapingType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ScrapingType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("unknown scraping type: {}", s))
    }
}

/// Body of `POST /scrape`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeRequest {
    pub url: String,
    pub scraping_type: ScrapingType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_selector: Option<String>,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver_active: Option<bool>,
}

impl HealthReport {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub text: String,
    pub url: String,
}

/// Extracted items, keyed by the result's `type`.
#[derive(Debug, Clone, PartialEq)]
pub enum ScrapeData {
    Text(Vec<String>),
    Titles(Vec<String>),
    Links(Vec<Link>),
    Images(Vec<String>),
    Custom(Vec<String>),
    /// A `type` this client does not know; items are kept as received.
    Other { kind: String, items: Vec<Value> },
}

impl ScrapeData {
    pub fn from_wire(kind: &str, items: Vec<Value>) -> Result<Self, String> {
        let Ok(known) = kind.parse::<ScrapingType>() else {
            return Ok(ScrapeData::Other { kind: kind.to_string(), items });
        };

        let data = match known {
            ScrapingType::Text => ScrapeData::Text(strings(known, items)?),
            ScrapingType::Titles => ScrapeData::Titles(strings(known, items)?),
            ScrapingType::Images => ScrapeData::Images(strings(known, items)?),
            ScrapingType::Custom => ScrapeData::Custom(strings(known, items)?),
            ScrapingType::Links => ScrapeData::Links(
                items
                    .into_iter()
                    .map(serde_json::from_value::<Link>)
                    .collect::<Result<_, _>>()
                    .map_err(|e| format!("malformed link item: {}", e))?,
            ),
        };
        Ok(data)
    }

    pub fn kind(&self) -> &str {
        match self {
            ScrapeData::Text(_) => ScrapingType::Text.as_str(),
            ScrapeData::Titles(_) => ScrapingType::Titles.as_str(),
            ScrapeData::Links(_) => ScrapingType::Links.as_str(),
            ScrapeData::Images(_) => ScrapingType::Images.as_str(),
            ScrapeData::Custom(_) => ScrapingType::Custom.as_str(),
            ScrapeData::Other { kind, .. } => kind,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ScrapeData::Text(items)
            | ScrapeData::Titles(items)
            | ScrapeData::Images(items)
            | ScrapeData::Custom(items) => items.len(),
            ScrapeData::Links(links) => links.len(),
            ScrapeData::Other { items, .. } => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn to_wire(&self) -> Vec<Value> {
        match self {
            ScrapeData::Text(items)
            | ScrapeData::Titles(items)
            | ScrapeData::Images(items)
            | ScrapeData::Custom(items) => items.iter().cloned().map(Value::String).collect(),
            ScrapeData::Links(links) => links
                .iter()
                .map(|link| serde_json::json!({ "text": link.text, "url": link.url }))
                .collect(),
            ScrapeData::Other { items, .. } => items.clone(),
        }
    }
}

fn strings(kind: ScrapingType, items: Vec<Value>) -> Result<Vec<String>, String> {
    items
        .into_iter()
        .map(|item| match item {
            Value::String(s) => Ok(s),
            other => Err(format!("{} item is not a string: {}", kind, other)),
        })
        .collect()
}

/// The reply of `POST /scrape` exactly as it travels over the wire. Every
/// field is optional because failure replies only carry `error`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WireResult {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "WireResult", into = "WireResult")]
pub struct ScrapeResult {
    pub success: bool,
    pub url: String,
    pub data: ScrapeData,
    /// Always `data.len()`.
    pub count: usize,
    /// Seconds, as measured by the server.
    pub execution_time: f64,
    pub timestamp: String,
    pub selector: Option<String>,
    pub error: Option<String>,
}

impl ScrapeResult {
    pub fn kind(&self) -> &str {
        self.data.kind()
    }
}

impl TryFrom<WireResult> for ScrapeResult {
    type Error = String;

    fn try_from(wire: WireResult) -> Result<Self, Self::Error> {
        let url = wire.url.ok_or("missing field `url`")?;
        let kind = wire.kind.ok_or("missing field `type`")?;
        let data = ScrapeData::from_wire(&kind, wire.data.unwrap_or_default())?;

        let count = data.len();
        if let Some(reported) = wire.count {
            if reported != count {
                warn!("Server reported {} items but sent {}", reported, count);
            }
        }

        Ok(ScrapeResult {
            success: wire.success,
            url,
            data,
            count,
            execution_time: wire.execution_time.unwrap_or_default(),
            timestamp: wire.timestamp.unwrap_or_default(),
            selector: wire.selector,
            error: wire.error,
        })
    }
}

impl From<ScrapeResult> for WireResult {
    fn from(result: ScrapeResult) -> Self {
        WireResult {
            success: result.success,
            kind: Some(result.kind().to_string()),
            data: Some(result.data.to_wire()),
            url: Some(result.url),
            count: Some(result.count),
            execution_time: Some(result.execution_time),
            timestamp: Some(result.timestamp),
            selector: result.selector,
            error: result.error,
        }
    }
}
