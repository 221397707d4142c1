//! Application - Guide Root
//!
//! Owns the document, storage and every controller instance. Controllers are
//! started once; a controller that fails to start stays inert while the rest
//! of the page keeps working.

use std::time::{Duration, Instant};

use ahash::AHashSet;
use tracing::{debug, error, info, warn};

use crate::announcer::Announcer;
use crate::config::GuideConfig;
use crate::constants::{CHECKBOX_SELECTOR, READY_MESSAGE};
use crate::controllers::{
    AccessibilityMirror, ChecklistController, Controller, GuideContext, ScaleController,
    TabController, ThemeController,
};
use crate::dom::{Document, NodeId};
use crate::error::{Error, Result};
use crate::event::PageEvent;
use crate::preferences::SystemPreferences;
use crate::storage::Storage;
use crate::timer::{TimerKey, TimerQueue};

/// The Typography System Guide page
pub struct TypographyGuide<D, S> {
    document: D,
    storage: S,
    preferences: SystemPreferences,
    timers: TimerQueue,
    announcer: Announcer,
    ready_delay: Duration,
    tabs: TabController,
    ios: ScaleController,
    android: ScaleController,
    theme: ThemeController,
    checklist: ChecklistController,
    accessibility: AccessibilityMirror,
    inert: AHashSet<&'static str>,
    started: bool,
}

/// Disjoint borrows of the guide: services for the context plus every controller
struct Parts<'a> {
    cx: GuideContext<'a>,
    controllers: [&'a mut dyn Controller; 6],
    inert: &'a mut AHashSet<&'static str>,
}

impl<D: Document, S: Storage> TypographyGuide<D, S> {
    /// Create a guide over `document` and `storage`
    pub fn new(document: D, storage: S, preferences: SystemPreferences, config: &GuideConfig) -> Self {
        let debounce = config.timing.slider_debounce();
        Self {
            document,
            storage,
            preferences,
            timers: TimerQueue::new(),
            announcer: Announcer::new(config.timing.announcement_clear()),
            ready_delay: config.timing.ready_announcement(),
            tabs: TabController::new(),
            ios: ScaleController::ios().with_debounce(debounce),
            android: ScaleController::android().with_debounce(debounce),
            theme: ThemeController::new(config.storage.theme_key.clone()),
            checklist: ChecklistController::new(config.storage.checklist_key.clone()),
            accessibility: AccessibilityMirror::new(),
            inert: AHashSet::new(),
            started: false,
        }
    }

    /// Create a guide with default configuration
    pub fn with_defaults(document: D, storage: S, preferences: SystemPreferences) -> Self {
        Self::new(document, storage, preferences, &GuideConfig::default())
    }

    fn parts(&mut self, now: Instant) -> Parts<'_> {
        let Self {
            document,
            storage,
            preferences,
            timers,
            announcer,
            tabs,
            ios,
            android,
            theme,
            checklist,
            accessibility,
            inert,
            ..
        } = self;

        let controllers: [&mut dyn Controller; 6] = [tabs, ios, android, theme, checklist, accessibility];
        Parts {
            cx: GuideContext {
                document,
                storage,
                timers,
                announcer,
                preferences: *preferences,
                now,
            },
            controllers,
            inert,
        }
    }

    /// Start every controller and schedule the ready announcement
    pub fn start(&mut self, now: Instant) {
        if self.started {
            debug!("Typography Guide already started");
            return;
        }

        let ready_delay = self.ready_delay;
        let Parts {
            mut cx,
            controllers,
            inert,
        } = self.parts(now);

        for controller in controllers {
            let name = controller.name();
            match controller.start(&mut cx) {
                Ok(()) => {
                    inert.remove(name);
                }
                Err(e @ Error::MissingElement { .. }) => {
                    warn!(controller = name, error = %e, "Controller inert, page element missing");
                    inert.insert(name);
                }
                Err(e) => {
                    error!(controller = name, error = %e, "Failed to initialize controller");
                    inert.insert(name);
                }
            }
        }
        cx.timers.schedule(TimerKey::ReadyAnnouncement, now, ready_delay);

        self.started = true;
        info!(inert = self.inert.len(), "Typography Guide initialized");
    }

    /// Deliver a page event to every active controller
    ///
    /// Returns whether any controller handled it.
    pub fn dispatch(&mut self, event: &PageEvent, now: Instant) -> bool {
        match event {
            PageEvent::MediaChange { feature, matches } => self.preferences.set(*feature, *matches),
            PageEvent::Input { target, value } => self.document.set_value(*target, value),
            _ => {}
        }

        let Parts {
            mut cx,
            controllers,
            inert,
        } = self.parts(now);

        let mut handled = false;
        for controller in controllers {
            if inert.contains(controller.name()) {
                continue;
            }
            handled |= controller.handle_event(event, &mut cx);
        }
        debug!(?event, handled, "Dispatched page event");
        handled
    }

    /// Set a checkbox as the user would and deliver its change event
    pub fn set_checked(&mut self, checkbox: NodeId, checked: bool, now: Instant) -> bool {
        self.document.set_checked(checkbox, checked);
        self.dispatch(&PageEvent::Change { target: checkbox }, now)
    }

    /// Uncheck every checklist item and forget the stored states
    pub fn reset_checklist(&mut self, now: Instant) -> Result<()> {
        if self.inert.contains(self.checklist.name()) {
            return Err(Error::missing(CHECKBOX_SELECTOR));
        }
        let Self {
            document,
            storage,
            preferences,
            timers,
            announcer,
            checklist,
            ..
        } = self;
        let mut cx = GuideContext {
            document,
            storage,
            timers,
            announcer,
            preferences: *preferences,
            now,
        };
        checklist.reset(&mut cx)?;
        cx.announce("Checklist reset");
        Ok(())
    }

    /// Fire every timer due at `now`, returning how many fired
    pub fn advance(&mut self, now: Instant) -> usize {
        let due = self.timers.take_due(now);
        let fired = due.len();

        let Parts {
            mut cx,
            mut controllers,
            inert,
        } = self.parts(now);

        for key in due {
            match key {
                TimerKey::ClearAnnouncement => cx.announcer.clear(&mut *cx.document),
                TimerKey::ReadyAnnouncement => cx.announce(READY_MESSAGE),
                TimerKey::SliderDebounce(_) => {
                    for controller in controllers.iter_mut() {
                        if !inert.contains(controller.name()) {
                            controller.on_timer(key, &mut cx);
                        }
                    }
                }
            }
        }
        fired
    }

    /// Re-apply every active controller's state to the document
    pub fn refresh(&mut self, now: Instant) {
        let Parts {
            mut cx,
            controllers,
            inert,
        } = self.parts(now);

        for controller in controllers {
            if inert.contains(controller.name()) {
                continue;
            }
            if let Err(e) = controller.refresh(&mut cx) {
                warn!(controller = controller.name(), error = %e, "Refresh failed");
            }
        }
    }

    // ==================== Getters ====================

    /// Earliest pending timer deadline
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_deadline()
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Whether the named controller failed to start
    pub fn is_inert(&self, name: &str) -> bool {
        self.inert.contains(name)
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut D {
        &mut self.document
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn preferences(&self) -> SystemPreferences {
        self.preferences
    }

    pub fn announcer(&self) -> &Announcer {
        &self.announcer
    }

    pub fn tabs(&self) -> &TabController {
        &self.tabs
    }

    pub fn ios_scale(&self) -> &ScaleController {
        &self.ios
    }

    pub fn android_scale(&self) -> &ScaleController {
        &self.android
    }

    pub fn theme(&self) -> &ThemeController {
        &self.theme
    }

    pub fn checklist(&self) -> &ChecklistController {
        &self.checklist
    }

    pub fn accessibility(&self) -> &AccessibilityMirror {
        &self.accessibility
    }

    /// Consume the guide, returning its storage
    pub fn into_storage(self) -> S {
        self.storage
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controllers::Theme;
    use crate::dom::{self, Element, MemoryDocument, Selector};
    use crate::event::Key;
    use crate::page::{element_by_id, standard_page};
    use crate::preferences::MediaFeature;
    use crate::storage::MemoryStorage;

    type Guide = TypographyGuide<MemoryDocument, MemoryStorage>;

    fn started_guide(storage: MemoryStorage, preferences: SystemPreferences, now: Instant) -> Guide {
        let mut guide = Guide::with_defaults(standard_page(), storage, preferences);
        guide.start(now);
        guide
    }

    fn text_of(guide: &Guide, id: &str) -> String {
        let node = element_by_id(guide.document(), id).expect("element");
        guide.document().text_content(node)
    }

    fn live_region(guide: &Guide) -> String {
        text_of(guide, "announcements")
    }

    /// Storage whose every operation fails
    struct BrokenStorage;

    impl Storage for BrokenStorage {
        fn get_item(&self, _key: &str) -> Result<Option<String>> {
            Err(Error::Storage {
                message: "unavailable".into(),
            })
        }

        fn set_item(&mut self, _key: &str, _value: &str) -> Result<()> {
            Err(Error::Storage {
                message: "quota exceeded".into(),
            })
        }

        fn remove_item(&mut self, _key: &str) -> Result<()> {
            Err(Error::Storage {
                message: "unavailable".into(),
            })
        }
    }

    #[test]
    fn test_start_applies_initial_state() {
        let now = Instant::now();
        let guide = started_guide(MemoryStorage::new(), SystemPreferences::default(), now);

        assert!(guide.is_started());
        assert_eq!(guide.tabs().active_index(), 0);
        assert_eq!(text_of(&guide, "ios-scale-value"), "Large (Default)");
        assert_eq!(text_of(&guide, "android-scale-value"), "1.0x");
        assert_eq!(guide.theme().theme(), Theme::Light);
        assert_eq!(
            guide.document().attribute(guide.document().root(), "data-theme").as_deref(),
            Some("light")
        );
        assert!(!guide.is_inert("checklist"));
    }

    #[test]
    fn test_ready_announcement_then_clear() {
        let now = Instant::now();
        let mut guide = started_guide(MemoryStorage::new(), SystemPreferences::default(), now);
        // Initial tab activation announces, then the region clears
        guide.advance(now + Duration::from_millis(499));

        assert_eq!(guide.advance(now + Duration::from_millis(500)), 1);
        assert_eq!(live_region(&guide), READY_MESSAGE);

        guide.advance(now + Duration::from_millis(1500));
        assert_eq!(live_region(&guide), "");
        assert!(guide.next_deadline().is_none());
    }

    #[test]
    fn test_failing_controllers_do_not_block_others() {
        let mut doc = MemoryDocument::new();
        let body = doc.body();
        let label = doc.append(body, Element::new("label"));
        let checkbox = doc.append(label, Element::new("input").attr("type", "checkbox"));

        let now = Instant::now();
        let mut guide = Guide::with_defaults(doc, MemoryStorage::new(), SystemPreferences::default());
        guide.start(now);

        assert!(guide.is_inert("tabs"));
        assert!(guide.is_inert("ios-scale"));
        assert!(guide.is_inert("android-scale"));
        assert!(!guide.is_inert("theme"));
        assert!(!guide.is_inert("checklist"));

        assert!(guide.set_checked(checkbox, true, now));
        assert!(guide.storage().get_item(crate::constants::CHECKLIST_STORAGE_KEY).ok().flatten().is_some());
    }

    #[test]
    fn test_keyboard_navigation_through_dispatch() {
        let now = Instant::now();
        let mut guide = started_guide(MemoryStorage::new(), SystemPreferences::default(), now);
        let first = guide.tabs().tab(0).expect("tab");

        let left = PageEvent::KeyDown {
            target: Some(first),
            key: Key::ArrowLeft,
        };
        assert!(guide.dispatch(&left, now));
        assert_eq!(guide.tabs().active_index(), 2);
        assert_eq!(live_region(&guide), "Checklist tab selected");

        let panel = element_by_id(guide.document(), "checklist-content").expect("panel");
        assert!(guide.document().has_class(panel, "active"));

        let tab = PageEvent::KeyDown {
            target: guide.document().focused(),
            key: Key::Tab,
        };
        guide.dispatch(&tab, now);
        assert!(guide.accessibility().keyboard_mode());
        guide.dispatch(&PageEvent::MouseDown, now);
        assert!(!guide.accessibility().keyboard_mode());
    }

    #[test]
    fn test_slider_input_debounced_then_committed() {
        let now = Instant::now();
        let mut guide = started_guide(MemoryStorage::new(), SystemPreferences::default(), now);
        let slider = element_by_id(guide.document(), "ios-scale-slider").expect("slider");

        guide.dispatch(
            &PageEvent::Input {
                target: slider,
                value: "0".into(),
            },
            now,
        );
        assert_eq!(text_of(&guide, "ios-scale-value"), "Large (Default)");

        guide.advance(now + Duration::from_millis(16));
        assert_eq!(text_of(&guide, "ios-scale-value"), "xSmall");
        let title = guide
            .document()
            .query(&Selector::Class("ios-large-title".into()))
            .expect("title");
        assert_eq!(
            guide.document().style(title, "font-size"),
            Some(format!("{}px", 34.0 * 0.8))
        );

        guide.dispatch(&PageEvent::Change { target: slider }, now + Duration::from_millis(20));
        assert_eq!(live_region(&guide), "iOS text size changed to xSmall");
    }

    #[test]
    fn test_theme_survives_reload_and_ignores_os() {
        let now = Instant::now();
        let mut guide = started_guide(MemoryStorage::new(), SystemPreferences::default(), now);
        let toggle = element_by_id(guide.document(), "theme-toggle").expect("toggle");
        let icon = dom::lookup(guide.document(), ".theme-toggle-icon").expect("icon");

        assert!(guide.dispatch(&PageEvent::Click { target: icon }, now));
        assert_eq!(guide.theme().theme(), Theme::Dark);
        assert_eq!(dom::normalized_text(guide.document(), toggle), "☀️Light");

        let storage = guide.into_storage();
        let mut reloaded = started_guide(storage, SystemPreferences::default(), now);
        assert_eq!(reloaded.theme().theme(), Theme::Dark);

        let light_os = PageEvent::MediaChange {
            feature: MediaFeature::DarkScheme,
            matches: false,
        };
        reloaded.dispatch(&light_os, now);
        assert_eq!(reloaded.theme().theme(), Theme::Dark);
        assert!(!reloaded.preferences().dark_scheme);
    }

    #[test]
    fn test_checklist_survives_reload() {
        let now = Instant::now();
        let mut guide = started_guide(MemoryStorage::new(), SystemPreferences::default(), now);
        let boxes = guide.checklist().checkboxes().to_vec();
        guide.set_checked(boxes[2], true, now);

        let reloaded = started_guide(guide.into_storage(), SystemPreferences::default(), now);
        let states: Vec<bool> = reloaded
            .checklist()
            .checkboxes()
            .iter()
            .map(|&c| reloaded.document().is_checked(c))
            .collect();
        assert_eq!(states, vec![false, false, true, false, false, false]);
        let progress = dom::lookup(reloaded.document(), ".checklist-progress").expect("progress");
        assert_eq!(reloaded.document().text_content(progress), "1 of 6 complete");
    }

    #[test]
    fn test_broken_storage_degrades_quietly() {
        let now = Instant::now();
        let mut preferences = SystemPreferences::default();
        preferences.dark_scheme = true;
        preferences.high_contrast = true;

        let mut guide = TypographyGuide::with_defaults(standard_page(), BrokenStorage, preferences);
        guide.start(now);
        assert_eq!(guide.theme().theme(), Theme::Dark);
        let root = guide.document().root();
        assert!(guide.document().has_class(root, "high-contrast"));

        let boxes = guide.checklist().checkboxes().to_vec();
        assert!(guide.set_checked(boxes[0], true, now));
        assert!(guide.document().is_checked(boxes[0]));

        let toggle = element_by_id(guide.document(), "theme-toggle").expect("toggle");
        guide.dispatch(&PageEvent::Click { target: toggle }, now);
        assert_eq!(guide.theme().theme(), Theme::Light);
    }

    #[test]
    fn test_reset_checklist() {
        let now = Instant::now();
        let mut guide = started_guide(MemoryStorage::new(), SystemPreferences::default(), now);
        let boxes = guide.checklist().checkboxes().to_vec();
        guide.set_checked(boxes[1], true, now);

        guide.reset_checklist(now).expect("reset");
        assert!(!guide.document().is_checked(boxes[1]));
        assert_eq!(live_region(&guide), "Checklist reset");
        assert!(guide.storage().get_item(crate::constants::CHECKLIST_STORAGE_KEY).ok().flatten().is_none());
    }

    #[test]
    fn test_refresh_reapplies_state() {
        let now = Instant::now();
        let mut guide = started_guide(MemoryStorage::new(), SystemPreferences::default(), now);
        let body = guide.document().body();
        let extra = guide
            .document_mut()
            .append(body, Element::new("p").class("ios-body"));

        // Let the startup announcements run out
        guide.advance(now + Duration::from_millis(1000));
        guide.advance(now + Duration::from_millis(2000));
        assert_eq!(live_region(&guide), "");
        assert!(guide.next_deadline().is_none());

        let later = now + Duration::from_millis(2500);
        guide.refresh(later);
        assert_eq!(guide.document().style(extra, "font-size").as_deref(), Some("17px"));
        assert_eq!(guide.tabs().active_index(), 0);
        assert_eq!(live_region(&guide), "");
        assert!(guide.next_deadline().is_none());
    }
}
