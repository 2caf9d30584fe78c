use std::sync::Arc;
use parking_lot::Mutex;

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoticeKind {
    Error,
    Success,
}

/// The UI surface driven by the controller.
///
/// Every method is a plain state change on the surface. The controller
/// decides when to call them; a view never calls back into the controller.
pub trait View: Send + 'static {
    fn set_loading(&mut self, visible: bool);
    fn set_submit_enabled(&mut self, enabled: bool);
    fn set_custom_selector_visible(&mut self, visible: bool);

    /// Replaces the results panel content and makes the panel visible.
    fn show_results(&mut self, html: &str) -> Result<()>;
    fn hide_results(&mut self);

    fn show_notice(&mut self, kind: NoticeKind, message: &str);
    fn hide_notice(&mut self, kind: NoticeKind);

    /// Hands a finished export to the user.
    fn download(&mut self, file_name: &str, contents: &str) -> Result<()>;
}

/// A view shared between the controller and its notice timers.
pub type SharedView<V> = Arc<Mutex<V>>;

/// In-memory view for headless use. It keeps what a page would show.
#[derive(Debug, Clone)]
pub struct MemoryView {
    pub loading: bool,
    pub submit_enabled: bool,
    pub custom_selector_visible: bool,
    pub results_visible: bool,
    pub results_html: String,
    pub error: Option<String>,
    pub success: Option<String>,
    pub downloads: Vec<(String, String)>,
    /// Every notice ever shown, in order.
    pub notice_log: Vec<(NoticeKind, String)>,
}

impl Default for MemoryView {
    fn default() -> Self {
        MemoryView {
            loading: false,
            submit_enabled: true,
            custom_selector_visible: false,
            results_visible: false,
            results_html: String::new(),
            error: None,
            success: None,
            downloads: Vec::new(),
            notice_log: Vec::new(),
        }
    }
}

impl View for MemoryView {
    fn set_loading(&mut self, visible: bool) {
        self.loading = visible;
    }

    fn set_submit_enabled(&mut self, enabled: bool) {
        self.submit_enabled = enabled;
    }

    fn set_custom_selector_visible(&mut self, visible: bool) {
        self.custom_selector_visible = visible;
    }

    fn show_results(&mut self, html: &str) -> Result<()> {
        self.results_html = html.to_string();
        self.results_visible = true;
        Ok(())
    }

    fn hide_results(&mut self) {
        self.results_visible = false;
    }

    fn show_notice(&mut self, kind: NoticeKind, message: &str) {
        self.notice_log.push((kind, message.to_string()));
        match kind {
            NoticeKind::Error => self.error = Some(message.to_string()),
            NoticeKind::Success => self.success = Some(message.to_string()),
        }
    }

    fn hide_notice(&mut self, kind: NoticeKind) {
        match kind {
            NoticeKind::Error => self.error = None,
            NoticeKind::Success => self.success = None,
        }
    }

    fn download(&mut self, file_name: &str, contents: &str) -> Result<()> {
        self.downloads.push((file_name.to_string(), contents.to_string()));
        Ok(())
    }
}
