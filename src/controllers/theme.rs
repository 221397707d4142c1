//! ThemeController - Light/Dark Theme
//!
//! Seeds the theme from the stored choice or the OS colour scheme, flips it on
//! the toggle button and persists the user's choice. Once the user has chosen,
//! OS colour-scheme changes are ignored.

use crate::constants::{
    THEME_ATTRIBUTE, THEME_ICON_SELECTOR, THEME_LABEL_SELECTOR, THEME_STORAGE_KEY,
    THEME_TOGGLE_SELECTOR,
};
use crate::dom::{self, NodeId, Selector};
use crate::error::Result;
use crate::event::PageEvent;
use crate::preferences::MediaFeature;

use super::{Controller, GuideContext};

const LIGHT_THEME_MODE: &str = "light";
const DARK_THEME_MODE: &str = "dark";

/// Page colour theme
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Token written to the theme marker and to storage
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => LIGHT_THEME_MODE,
            Theme::Dark => DARK_THEME_MODE,
        }
    }

    /// Parse a stored token
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim() {
            LIGHT_THEME_MODE => Some(Theme::Light),
            DARK_THEME_MODE => Some(Theme::Dark),
            _ => None,
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Theme::Light => "Light",
            Theme::Dark => "Dark",
        }
    }

    /// Icon and label the toggle button shows, naming the theme it switches to
    pub fn toggle_face(&self) -> (&'static str, &'static str) {
        match self {
            Theme::Dark => ("☀️", "Light"),
            Theme::Light => ("🌙", "Dark"),
        }
    }
}

/// Light/dark theme state and its toggle button
#[derive(Debug)]
pub struct ThemeController {
    storage_key: String,
    theme: Theme,
    explicit: bool,
    toggle: Option<NodeId>,
}

impl ThemeController {
    pub fn new(storage_key: impl Into<String>) -> Self {
        Self {
            storage_key: storage_key.into(),
            theme: Theme::default(),
            explicit: false,
            toggle: None,
        }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Whether the user has made a choice that overrides the OS preference
    pub fn has_explicit_choice(&self) -> bool {
        self.explicit
    }

    /// Flip the theme, persist it and announce the change
    pub fn toggle(&mut self, cx: &mut GuideContext<'_>) -> Theme {
        self.theme = self.theme.toggled();
        self.explicit = true;
        self.render(cx);

        if let Err(e) = cx.storage.set_item(&self.storage_key, self.theme.as_str()) {
            tracing::warn!(error = %e, "Could not save theme preference");
        }

        cx.announce(&format!("{} theme enabled", self.theme.display_name()));
        tracing::info!(theme = self.theme.as_str(), "Theme toggled");
        self.theme
    }

    fn stored_theme(&self, cx: &GuideContext<'_>) -> Option<Theme> {
        let token = match cx.storage.get_item(&self.storage_key) {
            Ok(token) => token?,
            Err(e) => {
                tracing::warn!(error = %e, "Could not read theme preference");
                return None;
            }
        };
        let theme = Theme::from_token(&token);
        if theme.is_none() {
            tracing::warn!(token = %token, "Ignoring unrecognised theme preference");
        }
        theme
    }

    fn render(&self, cx: &mut GuideContext<'_>) {
        let root = cx.document.root();
        cx.document.set_attribute(root, THEME_ATTRIBUTE, self.theme.as_str());

        let Some(button) = self.toggle else {
            return;
        };
        let (icon, label) = self.theme.toggle_face();
        let icon_node = Selector::parse(THEME_ICON_SELECTOR)
            .ok()
            .and_then(|s| cx.document.query_within(button, &s));
        let label_node = Selector::parse(THEME_LABEL_SELECTOR)
            .ok()
            .and_then(|s| cx.document.query_within(button, &s));

        match (icon_node, label_node) {
            (None, None) => cx.document.set_text_content(button, &format!("{icon} {label}")),
            (icon_node, label_node) => {
                if let Some(node) = icon_node {
                    cx.document.set_text_content(node, icon);
                }
                if let Some(node) = label_node {
                    cx.document.set_text_content(node, label);
                }
            }
        }
        cx.document.set_attribute(
            button,
            "aria-label",
            &format!("Switch to {} theme", label.to_lowercase()),
        );
    }
}

impl Default for ThemeController {
    fn default() -> Self {
        Self::new(THEME_STORAGE_KEY)
    }
}

impl Controller for ThemeController {
    fn name(&self) -> &'static str {
        "theme"
    }

    fn start(&mut self, cx: &mut GuideContext<'_>) -> Result<()> {
        self.toggle = dom::lookup(&*cx.document, THEME_TOGGLE_SELECTOR);
        if self.toggle.is_none() {
            tracing::warn!("Theme toggle not found, theme marker only");
        }

        match self.stored_theme(cx) {
            Some(theme) => {
                self.theme = theme;
                self.explicit = true;
            }
            None => {
                self.theme = if cx.preferences.dark_scheme {
                    Theme::Dark
                } else {
                    Theme::Light
                };
            }
        }

        self.render(cx);
        tracing::info!(theme = self.theme.as_str(), explicit = self.explicit, "Theme initialized");
        Ok(())
    }

    fn handle_event(&mut self, event: &PageEvent, cx: &mut GuideContext<'_>) -> bool {
        match event {
            PageEvent::Click { target } => {
                let Some(button) = self.toggle else {
                    return false;
                };
                let hit = Selector::parse(THEME_TOGGLE_SELECTOR)
                    .ok()
                    .and_then(|s| cx.document.closest(*target, &s));
                if hit != Some(button) {
                    return false;
                }
                self.toggle(cx);
                true
            }
            PageEvent::MediaChange {
                feature: MediaFeature::DarkScheme,
                matches,
            } => {
                if self.explicit {
                    tracing::debug!("OS colour scheme changed, explicit choice kept");
                    return true;
                }
                self.theme = if *matches { Theme::Dark } else { Theme::Light };
                self.render(cx);
                true
            }
            _ => false,
        }
    }

    fn refresh(&mut self, cx: &mut GuideContext<'_>) -> Result<()> {
        self.toggle = dom::lookup(&*cx.document, THEME_TOGGLE_SELECTOR);
        self.render(cx);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controllers::testing::Harness;
    use crate::dom::{Document, Element, MemoryDocument};
    use crate::storage::Storage;

    fn theme_page(with_parts: bool) -> (MemoryDocument, NodeId) {
        let mut doc = MemoryDocument::new();
        let body = doc.body();
        doc.append(body, Element::new("div").id("announcements"));
        let button = doc.append(body, Element::new("button").id("theme-toggle"));
        if with_parts {
            doc.append(button, Element::new("span").class("theme-toggle-icon"));
            doc.append(button, Element::new("span").class("theme-toggle-label"));
        }
        (doc, button)
    }

    fn marker(harness: &Harness) -> Option<String> {
        let root = harness.document.root();
        harness.document.attribute(root, "data-theme")
    }

    fn face(harness: &Harness, button: NodeId) -> String {
        dom::normalized_text(&harness.document, button)
    }

    #[test]
    fn test_initial_theme_follows_os() {
        let (doc, _) = theme_page(true);
        let mut harness = Harness::new(doc);
        harness.preferences.dark_scheme = true;
        let mut theme = ThemeController::default();
        theme.start(&mut harness.cx()).expect("start");

        assert_eq!(theme.theme(), Theme::Dark);
        assert!(!theme.has_explicit_choice());
        assert_eq!(marker(&harness).as_deref(), Some("dark"));
    }

    #[test]
    fn test_stored_choice_beats_os() {
        let (doc, _) = theme_page(true);
        let mut harness = Harness::new(doc);
        harness.preferences.dark_scheme = true;
        harness
            .storage
            .set_item(THEME_STORAGE_KEY, "light")
            .expect("seed storage");

        let mut theme = ThemeController::default();
        theme.start(&mut harness.cx()).expect("start");
        assert_eq!(theme.theme(), Theme::Light);
        assert!(theme.has_explicit_choice());
    }

    #[test]
    fn test_unrecognised_token_falls_back_to_os() {
        let (doc, _) = theme_page(true);
        let mut harness = Harness::new(doc);
        harness
            .storage
            .set_item(THEME_STORAGE_KEY, "sepia")
            .expect("seed storage");

        let mut theme = ThemeController::default();
        theme.start(&mut harness.cx()).expect("start");
        assert_eq!(theme.theme(), Theme::Light);
        assert!(!theme.has_explicit_choice());
    }

    #[test]
    fn test_toggle_twice_round_trips() {
        let (doc, button) = theme_page(true);
        let mut harness = Harness::new(doc);
        let mut theme = ThemeController::default();
        theme.start(&mut harness.cx()).expect("start");
        assert_eq!(face(&harness, button), "🌙Dark");

        assert_eq!(theme.toggle(&mut harness.cx()), Theme::Dark);
        assert_eq!(marker(&harness).as_deref(), Some("dark"));
        assert_eq!(face(&harness, button), "☀️Light");
        assert_eq!(
            harness.document.attribute(button, "aria-label").as_deref(),
            Some("Switch to light theme")
        );
        assert_eq!(harness.announcer.last_message(), Some("Dark theme enabled"));

        assert_eq!(theme.toggle(&mut harness.cx()), Theme::Light);
        assert_eq!(marker(&harness).as_deref(), Some("light"));
        assert_eq!(face(&harness, button), "🌙Dark");
        assert_eq!(
            harness.storage.get_item(THEME_STORAGE_KEY).ok().flatten().as_deref(),
            Some("light")
        );
    }

    #[test]
    fn test_plain_button_text() {
        let (doc, button) = theme_page(false);
        let mut harness = Harness::new(doc);
        let mut theme = ThemeController::default();
        theme.start(&mut harness.cx()).expect("start");

        assert!(theme.handle_event(&PageEvent::Click { target: button }, &mut harness.cx()));
        assert_eq!(harness.document.text_content(button), "☀️ Light");
    }

    #[test]
    fn test_os_change_ignored_after_explicit_choice() {
        let (doc, _) = theme_page(true);
        let mut harness = Harness::new(doc);
        let mut theme = ThemeController::default();
        theme.start(&mut harness.cx()).expect("start");

        let dark = PageEvent::MediaChange {
            feature: MediaFeature::DarkScheme,
            matches: true,
        };
        theme.handle_event(&dark, &mut harness.cx());
        assert_eq!(theme.theme(), Theme::Dark);

        theme.toggle(&mut harness.cx());
        assert_eq!(theme.theme(), Theme::Light);

        theme.handle_event(&dark, &mut harness.cx());
        assert_eq!(theme.theme(), Theme::Light);
        assert_eq!(marker(&harness).as_deref(), Some("light"));
    }

    #[test]
    fn test_missing_button_keeps_marker() {
        let mut harness = Harness::new(MemoryDocument::new());
        let mut theme = ThemeController::default();
        theme.start(&mut harness.cx()).expect("start");
        assert_eq!(marker(&harness).as_deref(), Some("light"));
    }
}
