use serde_json::Value;
use tracing::debug;

use crate::api::models::{ScrapeResult, WireResult};
use crate::error::{ClientError, Result, SCRAPE_FAILED};

/// A completed HTTP exchange with the scrape endpoint, not yet interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiReply {
    pub status: u16,
    pub body: String,
}

impl ApiReply {
    pub fn is_ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Decides which outcome a reply maps to.
///
/// A body that is not JSON at all is a transport failure, whatever the
/// status. A JSON body on a non-2xx status, or without `success: true`, is
/// an application failure carrying the server's `error` text when there is
/// one; the rest of such a body is never checked. Only a successful reply
/// must match the full result shape.
pub fn interpret_response(reply: &ApiReply) -> Result<ScrapeResult> {
    let body: Value = serde_json::from_str(&reply.body).map_err(|e| {
        debug!("Unparsable reply (status {}): {}", reply.status, e);
        ClientError::Transport(format!("invalid response body: {}", e))
    })?;

    if !reply.is_ok() || body.get("success").and_then(Value::as_bool) != Some(true) {
        let message = body
            .get("error")
            .and_then(Value::as_str)
            .filter(|msg| !msg.is_empty())
            .unwrap_or(SCRAPE_FAILED);
        return Err(ClientError::Application(message.to_string()));
    }

    let wire: WireResult = serde_json::from_value(body)
        .map_err(|e| ClientError::Transport(format!("malformed result: {}", e)))?;
    ScrapeResult::try_from(wire).map_err(ClientError::Transport)
}
