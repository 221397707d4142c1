//! Controllers
//!
//! Each controller owns one part of the page. The application root starts them
//! once, then routes every [`PageEvent`] and timer through them in order.
//!
//! ```text
//! PageEvent → TypographyGuide::dispatch → Controller::handle_event → Document mutation
//!                                                             └→ Announcer / Storage / TimerQueue
//! ```

mod a11y;
mod checklist;
mod scale;
mod tabs;
mod theme;

pub use a11y::*;
pub use checklist::*;
pub use scale::*;
pub use tabs::*;
pub use theme::*;

use std::time::Instant;

use crate::announcer::Announcer;
use crate::dom::Document;
use crate::error::Result;
use crate::event::PageEvent;
use crate::preferences::SystemPreferences;
use crate::storage::Storage;
use crate::timer::{TimerKey, TimerQueue};

/// Shared services lent to a controller for the duration of one call
pub struct GuideContext<'a> {
    pub document: &'a mut dyn Document,
    pub storage: &'a mut dyn Storage,
    pub timers: &'a mut TimerQueue,
    pub announcer: &'a mut Announcer,
    pub preferences: SystemPreferences,
    pub now: Instant,
}

impl GuideContext<'_> {
    /// Announce a message through the live region
    pub fn announce(&mut self, message: &str) {
        self.announcer
            .announce(&mut *self.document, self.timers, self.now, message);
    }
}

/// A page controller with an explicit lifecycle
pub trait Controller {
    /// Name used in logs
    fn name(&self) -> &'static str;

    /// Bind to the document and apply the initial state
    ///
    /// An error leaves this controller inert; other controllers still start.
    fn start(&mut self, cx: &mut GuideContext<'_>) -> Result<()>;

    /// React to a page event, returning whether it was handled
    fn handle_event(&mut self, _event: &PageEvent, _cx: &mut GuideContext<'_>) -> bool {
        false
    }

    /// A timer owned by this controller fired
    fn on_timer(&mut self, _key: TimerKey, _cx: &mut GuideContext<'_>) {}

    /// Re-apply current state to the document
    fn refresh(&mut self, _cx: &mut GuideContext<'_>) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::time::Instant;

    use super::GuideContext;
    use crate::announcer::Announcer;
    use crate::dom::MemoryDocument;
    use crate::preferences::SystemPreferences;
    use crate::storage::MemoryStorage;
    use crate::timer::TimerQueue;

    /// Owned services a controller test borrows a [`GuideContext`] from
    pub struct Harness {
        pub document: MemoryDocument,
        pub storage: MemoryStorage,
        pub timers: TimerQueue,
        pub announcer: Announcer,
        pub preferences: SystemPreferences,
        pub now: Instant,
    }

    impl Harness {
        pub fn new(document: MemoryDocument) -> Self {
            Self {
                document,
                storage: MemoryStorage::new(),
                timers: TimerQueue::new(),
                announcer: Announcer::default(),
                preferences: SystemPreferences::default(),
                now: Instant::now(),
            }
        }

        pub fn cx(&mut self) -> GuideContext<'_> {
            GuideContext {
                document: &mut self.document,
                storage: &mut self.storage,
                timers: &mut self.timers,
                announcer: &mut self.announcer,
                preferences: self.preferences,
                now: self.now,
            }
        }
    }
}
