use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::runtime::Handle;
use tracing::{debug, warn};

use crate::config::Config;
use crate::view::{NoticeKind, SharedView, View};

/// Shows transient notices and dismisses them after their lifetime.
///
/// Each notice gets a generation number. A dismissal timer only hides its
/// notice if no newer notice of the same kind was shown in the meantime.
pub struct Notifier<V: View> {
    view: SharedView<V>,
    error_ttl: Duration,
    success_ttl: Duration,
    generations: Arc<[AtomicU64; 2]>,
}

impl<V: View> Notifier<V> {
    pub fn new(view: SharedView<V>, config: &Config) -> Self {
        Notifier {
            view,
            error_ttl: config.error_notice_ttl,
            success_ttl: config.success_notice_ttl,
            generations: Arc::new([AtomicU64::new(0), AtomicU64::new(0)]),
        }
    }

    pub fn error(&self, message: &str) {
        self.show(NoticeKind::Error, message, self.error_ttl);
    }

    pub fn success(&self, message: &str) {
        self.show(NoticeKind::Success, message, self.success_ttl);
    }

    /// Hides both notices without touching pending timers.
    pub fn clear(&self) {
        let mut view = self.view.lock();
        view.hide_notice(NoticeKind::Error);
        view.hide_notice(NoticeKind::Success);
    }

    fn show(&self, kind: NoticeKind, message: &str, ttl: Duration) {
        let slot = slot(kind);
        let generation = {
            let mut view = self.view.lock();
            view.hide_notice(NoticeKind::Error);
            view.hide_notice(NoticeKind::Success);
            let generation = self.generations[slot].fetch_add(1, Ordering::SeqCst) + 1;
            view.show_notice(kind, message);
            generation
        };

        let Ok(runtime) = Handle::try_current() else {
            warn!("No tokio runtime, {:?} notice will stay until replaced", kind);
            return;
        };
        let view = Arc::clone(&self.view);
        let generations = Arc::clone(&self.generations);
        runtime.spawn(async move {
            tokio::time::sleep(ttl).await;
            let mut view = view.lock();
            if generations[slot].load(Ordering::SeqCst) == generation {
                view.hide_notice(kind);
            } else {
                debug!("{:?} notice superseded, timer skipped", kind);
            }
        });
    }
}

fn slot(kind: NoticeKind) -> usize {
    match kind {
        NoticeKind::Error => 0,
        NoticeKind::Success => 1,
    }
}
