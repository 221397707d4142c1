//! Announcer - Screen Reader Live Region
//!
//! Writes messages into the `aria-live` region and clears them after a delay.
//! A new message replaces the current one and restarts the clear timer.

use std::time::{Duration, Instant};

use crate::constants::{ANNOUNCEMENTS_SELECTOR, ANNOUNCEMENT_CLEAR_MS};
use crate::dom::{self, Document};
use crate::timer::{TimerKey, TimerQueue};

#[derive(Debug, Clone)]
pub struct Announcer {
    selector: String,
    clear_after: Duration,
    last_message: Option<String>,
}

impl Announcer {
    pub fn new(clear_after: Duration) -> Self {
        Self {
            selector: ANNOUNCEMENTS_SELECTOR.to_string(),
            clear_after,
            last_message: None,
        }
    }

    /// Announce `message`; silently skipped when the page has no live region
    pub fn announce(
        &mut self,
        document: &mut dyn Document,
        timers: &mut TimerQueue,
        now: Instant,
        message: &str,
    ) {
        let Some(region) = dom::lookup(document, &self.selector) else {
            tracing::debug!(message, "No live region, announcement dropped");
            return;
        };

        document.set_text_content(region, message);
        timers.schedule(TimerKey::ClearAnnouncement, now, self.clear_after);
        self.last_message = Some(message.to_string());
        tracing::debug!(message, "Announced");
    }

    /// Empty the live region
    pub fn clear(&mut self, document: &mut dyn Document) {
        if let Some(region) = dom::lookup(document, &self.selector) {
            document.set_text_content(region, "");
        }
    }

    /// Most recent message, even after the region was cleared
    pub fn last_message(&self) -> Option<&str> {
        self.last_message.as_deref()
    }
}

impl Default for Announcer {
    fn default() -> Self {
        Self::new(Duration::from_millis(ANNOUNCEMENT_CLEAR_MS))
    }
}
