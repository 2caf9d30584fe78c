use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use html_escape::{encode_double_quoted_attribute, encode_text};
use serde_json::Value;

use crate::api::models::{ScrapeData, ScrapeResult};

pub const NO_DATA: &str = "<p>No data found matching your criteria.</p>";

const LOCAL_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

pub fn item_label(kind: &str) -> &'static str {
    match kind {
        "text" => "📝 Text",
        "titles" => "📋 Title",
        "custom" => "🎯 Custom",
        "links" => "🔗 Link",
        "images" => "🖼️ Image",
        _ => "📄 Item",
    }
}

/// Renders the whole results panel for `result`. The output replaces the
/// previous panel, it is never merged into it.
pub fn render(result: &ScrapeResult) -> String {
    if result.data.is_empty() {
        return NO_DATA.to_string();
    }

    let mut html = String::with_capacity(256 + result.count * 128);
    html.push_str(&summary(result));

    let label = item_label(result.kind());
    match &result.data {
        ScrapeData::Links(links) => {
            for (i, link) in links.iter().enumerate() {
                html.push_str(&format!(
                    "<div class=\"data-item\"><strong>{} {}:</strong><br>\
                     <strong>Text:</strong> {}<br>\
                     <strong>URL:</strong> {}</div>\n",
                    label,
                    i + 1,
                    encode_text(&link.text),
                    anchor(&link.url),
                ));
            }
        }
        ScrapeData::Images(urls) => {
            for (i, url) in urls.iter().enumerate() {
                html.push_str(&format!(
                    "<div class=\"data-item\"><strong>{} {}:</strong><br>{}</div>\n",
                    label,
                    i + 1,
                    anchor(url),
                ));
            }
        }
        ScrapeData::Text(items)
        | ScrapeData::Titles(items)
        | ScrapeData::Custom(items) => {
            for (i, item) in items.iter().enumerate() {
                html.push_str(&plain_item(label, i, item));
            }
        }
        ScrapeData::Other { items, .. } => {
            for (i, item) in items.iter().enumerate() {
                let text = match item {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                html.push_str(&plain_item(label, i, &text));
            }
        }
    }

    html
}

fn summary(result: &ScrapeResult) -> String {
    let mut block = format!(
        "<div class=\"data-item summary\"><strong>📊 Scraping Summary:</strong><br>\n\
         URL: {}<br>\n\
         Type: {}<br>\n\
         Items Found: {}<br>\n\
         Execution Time: {}s<br>\n\
         Timestamp: {}",
        encode_text(&result.url),
        encode_text(result.kind()),
        result.count,
        result.execution_time,
        encode_text(&localize_timestamp(&result.timestamp)),
    );
    if let Some(selector) = &result.selector {
        block.push_str(&format!("<br>\nCSS Selector: {}", encode_text(selector)));
    }
    block.push_str("</div>\n");
    block
}

fn plain_item(label: &str, index: usize, text: &str) -> String {
    format!(
        "<div class=\"data-item\"><strong>{} {}:</strong> {}</div>\n",
        label,
        index + 1,
        encode_text(text)
    )
}

fn anchor(url: &str) -> String {
    format!(
        "<a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">{}</a>",
        encode_double_quoted_attribute(url),
        encode_text(url)
    )
}

/// Formats an ISO-8601 timestamp in local time. Timestamps without an
/// offset are read as local time already.
pub fn localize_timestamp(raw: &str) -> String {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return parsed.with_timezone(&Local).format(LOCAL_FORMAT).to_string();
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .and_then(|naive| Local.from_local_datetime(&naive).earliest())
        .map(|local| local.format(LOCAL_FORMAT).to_string())
        .unwrap_or_else(|| "Invalid Date".to_string())
}
