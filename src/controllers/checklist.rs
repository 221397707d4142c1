//! ChecklistController - Persistent Checkbox State
//!
//! Restores every checkbox from storage at start and writes the merged state
//! back on each change. Stored state is a JSON object of index → checked.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::constants::{CHECKBOX_SELECTOR, CHECKLIST_PROGRESS_SELECTOR, CHECKLIST_STORAGE_KEY};
use crate::dom::{self, NodeId, Selector};
use crate::error::{Error, Result};
use crate::event::PageEvent;

use super::{Controller, GuideContext};

/// Stored checkbox states keyed by document-order index
pub type ChecklistState = BTreeMap<usize, bool>;

/// Persists the checked state of the page's checkboxes
#[derive(Debug)]
pub struct ChecklistController {
    storage_key: String,
    checkboxes: Vec<NodeId>,
}

impl ChecklistController {
    pub fn new(storage_key: impl Into<String>) -> Self {
        Self {
            storage_key: storage_key.into(),
            checkboxes: Vec::new(),
        }
    }

    pub fn checkboxes(&self) -> &[NodeId] {
        &self.checkboxes
    }

    /// Read the stored mapping
    ///
    /// Entries whose key is not an index or whose value is not a bool are
    /// skipped; a blob that is not a JSON object yields an empty mapping.
    pub fn stored_state(&self, cx: &GuideContext<'_>) -> ChecklistState {
        let raw = match cx.storage.get_item(&self.storage_key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return ChecklistState::new(),
            Err(e) => {
                tracing::warn!(error = %e, "Could not read checkbox states");
                return ChecklistState::new();
            }
        };

        let entries: serde_json::Map<String, Value> = match serde_json::from_str(&raw) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(error = %e, "Could not parse stored checkbox states");
                return ChecklistState::new();
            }
        };

        entries
            .into_iter()
            .filter_map(|(key, value)| match (key.parse::<usize>(), value.as_bool()) {
                (Ok(index), Some(checked)) => Some((index, checked)),
                _ => {
                    tracing::debug!(key = %key, value = %value, "Skipping stored checkbox entry");
                    None
                }
            })
            .collect()
    }

    /// Apply stored states to matching checkboxes
    ///
    /// Checkboxes without a stored entry keep their markup default.
    pub fn restore(&self, cx: &mut GuideContext<'_>) -> usize {
        let states = self.stored_state(cx);
        let mut restored = 0;
        for (&index, &checked) in &states {
            if let Some(&checkbox) = self.checkboxes.get(index) {
                cx.document.set_checked(checkbox, checked);
                restored += 1;
            }
        }
        restored
    }

    /// Record a checkbox state, merging with previously stored entries
    pub fn save_state(&self, index: usize, checked: bool, cx: &mut GuideContext<'_>) -> Result<()> {
        let mut states = self.stored_state(cx);
        states.insert(index, checked);
        let raw = serde_json::to_string(&states)?;
        cx.storage.set_item(&self.storage_key, &raw)
    }

    /// Handle a checkbox change by index
    pub fn on_change(&self, index: usize, checked: bool, cx: &mut GuideContext<'_>) {
        if let Err(e) = self.save_state(index, checked, cx) {
            tracing::warn!(error = %e, index, "Could not save checkbox state");
        }

        if let Some(&checkbox) = self.checkboxes.get(index) {
            let label = Selector::Tag("label".to_string());
            if let Some(label) = cx.document.closest(checkbox, &label) {
                let text = dom::normalized_text(&*cx.document, label);
                let state = if checked { "checked" } else { "unchecked" };
                cx.announce(&format!("{text} {state}"));
            }
        }
        self.render_progress(cx);
    }

    /// Checked and total checkbox counts
    pub fn progress(&self, cx: &GuideContext<'_>) -> (usize, usize) {
        let checked = self
            .checkboxes
            .iter()
            .filter(|&&c| cx.document.is_checked(c))
            .count();
        (checked, self.checkboxes.len())
    }

    /// Clear stored state and uncheck every checkbox
    pub fn reset(&self, cx: &mut GuideContext<'_>) -> Result<()> {
        for &checkbox in &self.checkboxes {
            cx.document.set_checked(checkbox, false);
        }
        self.render_progress(cx);
        cx.storage.remove_item(&self.storage_key)
    }

    fn render_progress(&self, cx: &mut GuideContext<'_>) {
        let Some(output) = dom::lookup(&*cx.document, CHECKLIST_PROGRESS_SELECTOR) else {
            return;
        };
        let (checked, total) = self.progress(cx);
        cx.document
            .set_text_content(output, &format!("{checked} of {total} complete"));
    }
}

impl Default for ChecklistController {
    fn default() -> Self {
        Self::new(CHECKLIST_STORAGE_KEY)
    }
}

impl Controller for ChecklistController {
    fn name(&self) -> &'static str {
        "checklist"
    }

    fn start(&mut self, cx: &mut GuideContext<'_>) -> Result<()> {
        self.checkboxes = dom::lookup_all(&*cx.document, CHECKBOX_SELECTOR);
        if self.checkboxes.is_empty() {
            return Err(Error::missing(CHECKBOX_SELECTOR));
        }

        let restored = self.restore(cx);
        self.render_progress(cx);
        tracing::info!(
            checkboxes = self.checkboxes.len(),
            restored,
            "Checkbox state manager initialized"
        );
        Ok(())
    }

    fn handle_event(&mut self, event: &PageEvent, cx: &mut GuideContext<'_>) -> bool {
        let PageEvent::Change { target } = event else {
            return false;
        };
        let Some(index) = self.checkboxes.iter().position(|c| c == target) else {
            return false;
        };
        let checked = cx.document.is_checked(*target);
        self.on_change(index, checked, cx);
        true
    }

    fn refresh(&mut self, cx: &mut GuideContext<'_>) -> Result<()> {
        self.checkboxes = dom::lookup_all(&*cx.document, CHECKBOX_SELECTOR);
        self.restore(cx);
        self.render_progress(cx);
        Ok(())
    }
}
