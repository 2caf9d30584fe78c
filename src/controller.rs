use std::sync::Arc;
use chrono::{DateTime, Utc};
use tracing::{debug, error, info, warn};

use crate::api::client::ScrapeApi;
use crate::api::models::{ScrapeRequest, ScrapeResult, ScrapingType};
use crate::api::response::interpret_response;
use crate::config::Config;
use crate::error::ValidationError;
use crate::export::{export_file_name, export_json, EXPORTED};
use crate::notice::Notifier;
use crate::render::render;
use crate::view::{SharedView, View};

pub const API_UNHEALTHY: &str = "API is not responding properly";
pub const API_UNREACHABLE: &str = "Cannot connect to scraping server. Make sure the server is running.";

/// Raw form fields as the user left them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormInput {
    pub url: String,
    /// `None` when nothing (or nothing recognised) is selected.
    pub scraping_type: Option<ScrapingType>,
    pub custom_selector: String,
}

pub fn validate(input: &FormInput) -> Result<(), ValidationError> {
    let Some(kind) = input.scraping_type else {
        return Err(ValidationError::MissingFields);
    };
    if input.url.is_empty() {
        return Err(ValidationError::MissingFields);
    }
    if kind == ScrapingType::Custom && input.custom_selector.is_empty() {
        return Err(ValidationError::MissingSelector);
    }
    Ok(())
}

pub fn build_request(input: &FormInput) -> Result<ScrapeRequest, ValidationError> {
    validate(input)?;
    let scraping_type = input.scraping_type.ok_or(ValidationError::MissingFields)?;
    Ok(ScrapeRequest {
        url: input.url.clone(),
        scraping_type,
        custom_selector: (scraping_type == ScrapingType::Custom).then(|| input.custom_selector.clone()),
    })
}

pub fn success_message(result: &ScrapeResult) -> String {
    format!(
        "Successfully scraped {} items from {} in {}s",
        result.count, result.url, result.execution_time
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Validating,
    Submitting,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    SelectType(Option<ScrapingType>),
    Submit(FormInput),
    Export,
}

/// How a submission ended. Whatever the variant, the user has already been
/// told through a notice.
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    Rejected(ValidationError),
    Succeeded { count: usize },
    Failed(String),
}

pub struct RequestController<A: ScrapeApi, V: View> {
    api: A,
    view: SharedView<V>,
    notifier: Notifier<V>,
    phase: Phase,
    current: Option<ScrapeResult>,
}

impl<A: ScrapeApi, V: View> RequestController<A, V> {
    pub fn new(api: A, view: SharedView<V>, config: &Config) -> Self {
        {
            let mut v = view.lock();
            v.set_loading(false);
            v.set_submit_enabled(true);
            v.set_custom_selector_visible(false);
            v.hide_results();
        }
        RequestController {
            notifier: Notifier::new(Arc::clone(&view), config),
            api,
            view,
            phase: Phase::Idle,
            current: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn current_result(&self) -> Option<&ScrapeResult> {
        self.current.as_ref()
    }

    pub fn view(&self) -> &SharedView<V> {
        &self.view
    }

    /// Checks the API once. Problems are reported but never block use.
    pub async fn check_health(&self) -> bool {
        match self.api.health().await {
            Ok(report) if report.is_healthy() => {
                info!("API is healthy");
                true
            }
            Ok(report) => {
                warn!("API reported status {:?}", report.status);
                self.notifier.error(API_UNHEALTHY);
                false
            }
            Err(err) => {
                warn!("Health check failed: {}", err);
                self.notifier.error(API_UNREACHABLE);
                false
            }
        }
    }

    pub async fn dispatch(&mut self, command: Command) {
        match command {
            Command::SelectType(kind) => self.select_type(kind),
            Command::Submit(input) => {
                self.submit(&input).await;
            }
            Command::Export => {
                self.export();
            }
        }
    }

    pub fn select_type(&self, kind: Option<ScrapingType>) {
        self.view
            .lock()
            .set_custom_selector_visible(kind == Some(ScrapingType::Custom));
    }

    pub async fn submit(&mut self, input: &FormInput) -> Submission {
        self.phase = Phase::Validating;
        let request = match build_request(input) {
            Ok(request) => request,
            Err(err) => {
                debug!("Rejected form input: {}", err);
                self.notifier.error(&err.to_string());
                self.phase = Phase::Idle;
                return Submission::Rejected(err);
            }
        };

        self.notifier.clear();
        let busy = Busy::enter(&self.view, &mut self.phase);

        info!("Scraping {} ({})", request.url, request.scraping_type);
        let outcome = match self.api.scrape(&request).await {
            Ok(reply) => interpret_response(&reply),
            Err(err) => Err(err),
        };

        let submission = match outcome {
            Ok(result) => {
                let count = result.count;
                let message = success_message(&result);
                self.current.take();
                let shown = self.view.lock().show_results(&render(&result));
                self.current = Some(result);
                match shown {
                    Ok(()) => {
                        info!("{}", message);
                        self.notifier.success(&message);
                        Submission::Succeeded { count }
                    }
                    Err(err) => {
                        error!("Results could not be shown: {}", err);
                        let message = err.notice_message();
                        self.notifier.error(&message);
                        Submission::Failed(message)
                    }
                }
            }
            Err(err) => {
                error!("Scraping failed: {}", err);
                let message = err.notice_message();
                self.notifier.error(&message);
                Submission::Failed(message)
            }
        };

        drop(busy);
        submission
    }

    /// Exports the held result. Returns whether a file was handed out;
    /// without a held result nothing happens at all.
    pub fn export(&self) -> bool {
        self.export_at(Utc::now())
    }

    pub fn export_at(&self, now: DateTime<Utc>) -> bool {
        let Some(result) = &self.current else {
            debug!("Nothing to export");
            return false;
        };

        let file_name = export_file_name(now);
        let delivered = export_json(result).and_then(|json| self.view.lock().download(&file_name, &json));
        match delivered {
            Ok(()) => {
                info!("Exported {} items to {}", result.count, file_name);
                self.notifier.success(EXPORTED);
                true
            }
            Err(err) => {
                error!("Export failed: {}", err);
                self.notifier.error(&err.notice_message());
                false
            }
        }
    }
}

/// Loading indicator on, submit control off, results hidden and the phase
/// at `Submitting`, for as long as it lives. Dropping it restores the
/// controls and returns to `Idle` on every path out of a submission,
/// including a cancelled one.
struct Busy<'a, V: View> {
    view: &'a SharedView<V>,
    phase: &'a mut Phase,
}

impl<'a, V: View> Busy<'a, V> {
    fn enter(view: &'a SharedView<V>, phase: &'a mut Phase) -> Self {
        {
            let mut v = view.lock();
            v.hide_results();
            v.set_loading(true);
            v.set_submit_enabled(false);
        }
        *phase = Phase::Submitting;
        Busy { view, phase }
    }
}

impl<V: View> Drop for Busy<'_, V> {
    fn drop(&mut self) {
        let mut v = self.view.lock();
        v.set_loading(false);
        v.set_submit_enabled(true);
        *self.phase = Phase::Idle;
    }
}
