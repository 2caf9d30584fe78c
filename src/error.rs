/// Fixed fallback shown when the server rejects a request without saying why.
pub const SCRAPE_FAILED: &str = "Failed to scrape the website";

/// Fixed message for any request that never produced a usable reply.
pub const NETWORK_ERROR: &str = "Network error: Could not connect to the scraping server";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please fill in all required fields.")]
    MissingFields,

    #[error("Please provide a CSS selector for custom scraping.")]
    MissingSelector,
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    Application(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("Display error: {0}")]
    Display(String),
}

impl ClientError {
    /// Text shown to the user in an error notice.
    pub fn notice_message(&self) -> String {
        match self {
            ClientError::Validation(err) => err.to_string(),
            ClientError::Application(msg) => msg.clone(),
            ClientError::Transport(_) => NETWORK_ERROR.to_string(),
            ClientError::Config(msg) => format!("Configuration error: {}", msg),
            ClientError::Export(msg) => format!("Failed to export results: {}", msg),
            ClientError::Display(msg) => format!("Failed to display results: {}", msg),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Transport(err.to_string())
    }
}

impl From<std::env::VarError> for ClientError {
    fn from(err: std::env::VarError) -> Self {
        ClientError::Config(err.to_string())
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::Export(err.to_string())
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Export(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
