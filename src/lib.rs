pub mod api;
pub mod config;
pub mod controller;
pub mod error;
pub mod export;
pub mod notice;
pub mod render;
pub mod terminal;
pub mod view;

pub use api::client::{HttpApi, ScrapeApi};
pub use api::models::{ScrapeRequest, ScrapeResult, ScrapingType};
pub use controller::{Command, FormInput, RequestController, Submission};
pub use error::{ClientError, Result};
pub use view::{MemoryView, NoticeKind, View};
