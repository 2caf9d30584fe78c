use async_trait::async_trait;
use once_cell::sync::Lazy;
use reqwest::{Client, ClientBuilder};
use tracing::debug;

use crate::api::models::{HealthReport, ScrapeRequest};
use crate::api::response::ApiReply;
use crate::config::Config;
use crate::error::Result;

// Shared client to reuse connections. No connect or request timeout: a call
// runs until the transport reports completion or failure.
static CLIENT: Lazy<Client> = Lazy::new(|| {
    ClientBuilder::new()
        .pool_max_idle_per_host(10)
        .build()
        .expect("Failed to build HTTP client")
});

/// The remote scraping API as seen by the controller.
#[async_trait]
pub trait ScrapeApi: Send + Sync {
    async fn health(&self) -> Result<HealthReport>;

    /// Sends one scrape request. `Err` means the exchange never completed;
    /// any HTTP status, good or bad, comes back as an `ApiReply`.
    async fn scrape(&self, request: &ScrapeRequest) -> Result<ApiReply>;
}

pub struct HttpApi {
    health_url: String,
    scrape_url: String,
}

impl HttpApi {
    pub fn new(config: &Config) -> Self {
        HttpApi {
            health_url: config.health_url(),
            scrape_url: config.scrape_url(),
        }
    }
}

#[async_trait]
impl ScrapeApi for HttpApi {
    async fn health(&self) -> Result<HealthReport> {
        debug!("GET {}", self.health_url);
        let report = CLIENT
            .get(&self.health_url)
            .send()
            .await?
            .json::<HealthReport>()
            .await?;
        Ok(report)
    }

    async fn scrape(&self, request: &ScrapeRequest) -> Result<ApiReply> {
        debug!("POST {} ({})", self.scrape_url, request.scraping_type);
        // `.json()` also sets `Content-Type: application/json`
        let response = CLIENT.post(&self.scrape_url).json(request).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(ApiReply { status, body })
    }
}
