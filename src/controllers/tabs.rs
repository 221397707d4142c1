//! TabController - Tab Navigation
//!
//! Keeps exactly one tab active, shows its panel and maintains a roving
//! `tabindex` so only the active tab is reachable with the Tab key.

use crate::constants::{
    ACTIVE_CLASS, TAB_CLASS, TAB_KEY_ATTRIBUTE, TAB_PANEL_SELECTOR, TAB_PANEL_SUFFIX, TAB_SELECTOR,
};
use crate::dom::{self, NodeId, Selector};
use crate::error::{Error, Result};
use crate::event::{Key, PageEvent};

use super::{Controller, GuideContext};

/// Tab navigation over the page's `.tab` elements
#[derive(Debug, Default)]
pub struct TabController {
    tabs: Vec<NodeId>,
    panels: Vec<NodeId>,
    active: usize,
}

impl TabController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tabs found at start
    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    /// Index of the active tab
    pub fn active_index(&self) -> usize {
        self.active
    }

    /// Element of the active tab
    pub fn active_tab(&self) -> Option<NodeId> {
        self.tabs.get(self.active).copied()
    }

    /// Element of the tab at `index`
    pub fn tab(&self, index: usize) -> Option<NodeId> {
        self.tabs.get(index).copied()
    }

    /// Activate the tab at `index`
    ///
    /// Out-of-range indices and tabs without a matching panel leave every tab
    /// and panel as they were.
    pub fn activate(&mut self, index: usize, cx: &mut GuideContext<'_>) -> Result<()> {
        let target = self.apply(index, cx)?;
        let label = dom::normalized_text(&*cx.document, target);
        cx.announce(&format!("{label} tab selected"));
        tracing::debug!(index, tab = %label, "Activated tab");
        Ok(())
    }

    /// Write the active state for tab `index` without announcing it
    fn apply(&mut self, index: usize, cx: &mut GuideContext<'_>) -> Result<NodeId> {
        let Some(&target) = self.tabs.get(index) else {
            return Err(Error::OutOfRange {
                message: format!("tab index {index} (have {})", self.tabs.len()),
            });
        };

        let key = cx
            .document
            .attribute(target, TAB_KEY_ATTRIBUTE)
            .ok_or_else(|| Error::missing(format!("[{TAB_KEY_ATTRIBUTE}] on tab {index}")))?;
        let panel_id = format!("{key}{TAB_PANEL_SUFFIX}");
        let panel = cx
            .document
            .query(&Selector::Id(panel_id.clone()))
            .ok_or_else(|| Error::missing(format!("#{panel_id}")))?;

        for (i, &tab) in self.tabs.iter().enumerate() {
            let is_active = i == index;
            cx.document.toggle_class(tab, ACTIVE_CLASS, is_active);
            cx.document
                .set_attribute(tab, "aria-selected", if is_active { "true" } else { "false" });
            cx.document
                .set_attribute(tab, "tabindex", if is_active { "0" } else { "-1" });
        }

        for &content in &self.panels {
            cx.document.toggle_class(content, ACTIVE_CLASS, false);
        }
        cx.document.toggle_class(panel, ACTIVE_CLASS, true);

        self.active = index;
        Ok(target)
    }

    /// Target index for a navigation key pressed on tab `current`
    fn key_target(&self, key: &Key, current: usize) -> Option<usize> {
        let last = self.tabs.len().checked_sub(1)?;
        match key {
            Key::ArrowLeft => Some(if current > 0 { current - 1 } else { last }),
            Key::ArrowRight => Some(if current < last { current + 1 } else { 0 }),
            Key::Home => Some(0),
            Key::End => Some(last),
            _ => None,
        }
    }

    fn tab_index_of(&self, node: NodeId, cx: &GuideContext<'_>) -> Option<usize> {
        let selector = Selector::Class(TAB_CLASS.to_string());
        let tab = cx.document.closest(node, &selector)?;
        self.tabs.iter().position(|&t| t == tab)
    }

    fn activate_or_warn(&mut self, index: usize, cx: &mut GuideContext<'_>) -> bool {
        match self.activate(index, cx) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, index, "Tab activation skipped");
                false
            }
        }
    }
}

impl Controller for TabController {
    fn name(&self) -> &'static str {
        "tabs"
    }

    fn start(&mut self, cx: &mut GuideContext<'_>) -> Result<()> {
        self.tabs = dom::lookup_all(&*cx.document, TAB_SELECTOR);
        self.panels = dom::lookup_all(&*cx.document, TAB_PANEL_SELECTOR);
        if self.tabs.is_empty() {
            return Err(Error::missing(TAB_SELECTOR));
        }

        let initial = self
            .tabs
            .iter()
            .position(|&tab| cx.document.has_class(tab, ACTIVE_CLASS))
            .unwrap_or(0);
        self.activate_or_warn(initial, cx);

        tracing::info!(tabs = self.tabs.len(), active = self.active, "Tab navigation initialized");
        Ok(())
    }

    fn handle_event(&mut self, event: &PageEvent, cx: &mut GuideContext<'_>) -> bool {
        match event {
            PageEvent::Click { target } => {
                let Some(index) = self.tab_index_of(*target, cx) else {
                    return false;
                };
                self.activate_or_warn(index, cx);
                true
            }
            PageEvent::KeyDown {
                target: Some(target),
                key,
            } => {
                let Some(current) = self.tab_index_of(*target, cx) else {
                    return false;
                };
                let Some(next) = self.key_target(key, current) else {
                    return false;
                };
                if self.activate_or_warn(next, cx) {
                    cx.document.focus(self.tabs[next]);
                }
                true
            }
            _ => false,
        }
    }

    fn refresh(&mut self, cx: &mut GuideContext<'_>) -> Result<()> {
        self.tabs = dom::lookup_all(&*cx.document, TAB_SELECTOR);
        self.panels = dom::lookup_all(&*cx.document, TAB_PANEL_SELECTOR);
        let index = self.active.min(self.tabs.len().saturating_sub(1));
        self.apply(index, cx).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controllers::testing::Harness;
    use crate::dom::{Document, Element, MemoryDocument};

    fn tab_page(keys: &[&str], with_panels: &[&str], active: Option<usize>) -> MemoryDocument {
        let mut doc = MemoryDocument::new();
        let body = doc.body();
        doc.append(body, Element::new("div").id("announcements"));
        let list = doc.append(body, Element::new("div").attr("role", "tablist"));
        for (i, key) in keys.iter().enumerate() {
            let mut tab = Element::new("button")
                .class("tab")
                .attr("data-tab", *key)
                .text(format!("{key} guide"));
            if active == Some(i) {
                tab = tab.class("active");
            }
            doc.append(list, tab);
        }
        for key in with_panels {
            doc.append(
                body,
                Element::new("section")
                    .id(format!("{key}-content"))
                    .class("tab-content"),
            );
        }
        doc
    }

    fn started(doc: MemoryDocument) -> (Harness, TabController) {
        let mut harness = Harness::new(doc);
        let mut tabs = TabController::new();
        tabs.start(&mut harness.cx()).expect("tabs start");
        (harness, tabs)
    }

    fn assert_single_active(harness: &Harness, tabs: &TabController, keys: &[&str]) {
        let doc = &harness.document;
        let active_tabs: Vec<_> = (0..tabs.len())
            .filter(|&i| doc.has_class(tabs.tab(i).expect("tab"), "active"))
            .collect();
        assert_eq!(active_tabs, vec![tabs.active_index()]);

        let panels = doc.query_all(&Selector::Class("tab-content".into()));
        let visible: Vec<_> = panels.iter().filter(|&&p| doc.has_class(p, "active")).collect();
        assert_eq!(visible.len(), 1);
        assert_eq!(
            doc.attribute(*visible[0], "id"),
            Some(format!("{}-content", keys[tabs.active_index()]))
        );
    }

    #[test]
    fn test_initial_tab_defaults_to_first() {
        let keys = ["ios", "android", "checklist"];
        let (harness, tabs) = started(tab_page(&keys, &keys, None));
        assert_eq!(tabs.active_index(), 0);
        assert_single_active(&harness, &tabs, &keys);
    }

    #[test]
    fn test_initial_tab_respects_marked_active() {
        let keys = ["ios", "android", "checklist"];
        let (harness, tabs) = started(tab_page(&keys, &keys, Some(2)));
        assert_eq!(tabs.active_index(), 2);
        assert_single_active(&harness, &tabs, &keys);
    }

    #[test]
    fn test_activate_every_index() {
        let keys = ["ios", "android", "checklist"];
        let (mut harness, mut tabs) = started(tab_page(&keys, &keys, None));
        for i in 0..keys.len() {
            tabs.activate(i, &mut harness.cx()).expect("activate");
            assert_single_active(&harness, &tabs, &keys);

            let tab = tabs.tab(i).expect("tab");
            assert_eq!(harness.document.attribute(tab, "aria-selected").as_deref(), Some("true"));
            assert_eq!(harness.document.attribute(tab, "tabindex").as_deref(), Some("0"));
        }
        assert_eq!(harness.announcer.last_message(), Some("checklist guide tab selected"));
    }

    #[test]
    fn test_activate_out_of_range_keeps_state() {
        let keys = ["ios", "android"];
        let (mut harness, mut tabs) = started(tab_page(&keys, &keys, Some(1)));
        let before = harness.document.snapshot();

        assert!(tabs.activate(2, &mut harness.cx()).is_err());
        assert_eq!(tabs.active_index(), 1);
        assert_eq!(
            serde_json::to_value(harness.document.snapshot()).expect("json"),
            serde_json::to_value(before).expect("json")
        );
    }

    #[test]
    fn test_refresh_reapplies_without_announcing() {
        let keys = ["ios", "android", "checklist"];
        let (mut harness, mut tabs) = started(tab_page(&keys, &keys, Some(1)));
        let region = dom::lookup(&harness.document, "#announcements").expect("region");
        harness.document.set_text_content(region, "");
        harness.timers.cancel(crate::timer::TimerKey::ClearAnnouncement);

        let stale = tabs.tab(2).expect("tab");
        harness.document.toggle_class(stale, "active", true);
        tabs.refresh(&mut harness.cx()).expect("refresh");

        assert_eq!(tabs.active_index(), 1);
        assert_single_active(&harness, &tabs, &keys);
        assert_eq!(harness.document.text_content(region), "");
        assert!(harness.timers.is_empty());
    }

    #[test]
    fn test_missing_panel_keeps_previous_panel() {
        let keys = ["ios", "android"];
        let (mut harness, mut tabs) = started(tab_page(&keys, &["ios"], None));

        let result = tabs.activate(1, &mut harness.cx());
        assert!(matches!(result, Err(Error::MissingElement { .. })));
        assert_eq!(tabs.active_index(), 0);
        assert_single_active(&harness, &tabs, &keys);
    }

    #[test]
    fn test_arrow_keys_wrap_around() {
        let keys = ["ios", "android", "checklist"];
        let (mut harness, mut tabs) = started(tab_page(&keys, &keys, Some(2)));

        let last = tabs.tab(2).expect("tab");
        let event = PageEvent::KeyDown {
            target: Some(last),
            key: Key::ArrowRight,
        };
        assert!(tabs.handle_event(&event, &mut harness.cx()));
        assert_eq!(tabs.active_index(), 0);
        assert_eq!(harness.document.focused(), tabs.tab(0));

        let first = tabs.tab(0).expect("tab");
        let event = PageEvent::KeyDown {
            target: Some(first),
            key: Key::ArrowLeft,
        };
        assert!(tabs.handle_event(&event, &mut harness.cx()));
        assert_eq!(tabs.active_index(), 2);
        assert_single_active(&harness, &tabs, &keys);
    }

    #[test]
    fn test_home_end_and_unhandled_keys() {
        let keys = ["ios", "android", "checklist"];
        let (mut harness, mut tabs) = started(tab_page(&keys, &keys, Some(1)));
        let middle = tabs.tab(1).expect("tab");

        let end = PageEvent::KeyDown {
            target: Some(middle),
            key: Key::End,
        };
        assert!(tabs.handle_event(&end, &mut harness.cx()));
        assert_eq!(tabs.active_index(), 2);

        let home = PageEvent::KeyDown {
            target: Some(middle),
            key: Key::Home,
        };
        assert!(tabs.handle_event(&home, &mut harness.cx()));
        assert_eq!(tabs.active_index(), 0);

        let other = PageEvent::KeyDown {
            target: Some(middle),
            key: Key::Other("Enter".into()),
        };
        assert!(!tabs.handle_event(&other, &mut harness.cx()));
        assert_eq!(tabs.active_index(), 0);
    }

    #[test]
    fn test_click_activates() {
        let keys = ["ios", "android"];
        let (mut harness, mut tabs) = started(tab_page(&keys, &keys, None));
        let target = tabs.tab(1).expect("tab");
        assert!(tabs.handle_event(&PageEvent::Click { target }, &mut harness.cx()));
        assert_eq!(tabs.active_index(), 1);

        let body = harness.document.body();
        assert!(!tabs.handle_event(&PageEvent::Click { target: body }, &mut harness.cx()));
    }

    #[test]
    fn test_no_tabs_fails_start() {
        let mut harness = Harness::new(MemoryDocument::new());
        let mut tabs = TabController::new();
        assert!(tabs.start(&mut harness.cx()).is_err());
    }
}
