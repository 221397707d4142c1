//! Guide Constants
//!
//! Centralized selectors, class names, storage keys and timings shared by the controllers.

/// Live region used for screen-reader announcements
pub const ANNOUNCEMENTS_SELECTOR: &str = "#announcements";

/// Tab navigation
pub const TAB_CLASS: &str = "tab";
pub const TAB_SELECTOR: &str = ".tab";
pub const TAB_PANEL_SELECTOR: &str = ".tab-content";
pub const TAB_KEY_ATTRIBUTE: &str = "data-tab";
pub const TAB_PANEL_SUFFIX: &str = "-content";

/// Class marking the active tab and its panel
pub const ACTIVE_CLASS: &str = "active";

/// Theme toggle
pub const THEME_TOGGLE_SELECTOR: &str = "#theme-toggle";
pub const THEME_ICON_SELECTOR: &str = ".theme-toggle-icon";
pub const THEME_LABEL_SELECTOR: &str = ".theme-toggle-label";
pub const THEME_ATTRIBUTE: &str = "data-theme";

/// Checklist
pub const CHECKBOX_SELECTOR: &str = "input[type=checkbox]";
pub const CHECKLIST_PROGRESS_SELECTOR: &str = ".checklist-progress";

/// Accessibility classes
pub const REDUCED_MOTION_CLASS: &str = "reduced-motion";
pub const HIGH_CONTRAST_CLASS: &str = "high-contrast";
pub const KEYBOARD_NAVIGATION_CLASS: &str = "keyboard-navigation";

/// Storage keys
pub const CHECKLIST_STORAGE_KEY: &str = "typography-guide-checkboxes";
pub const THEME_STORAGE_KEY: &str = "typography-guide-theme";

/// Timings
pub const ANNOUNCEMENT_CLEAR_MS: u64 = 1000;
pub const SLIDER_DEBOUNCE_MS: u64 = 16;
pub const READY_ANNOUNCEMENT_MS: u64 = 500;

/// Announced once the page has started
pub const READY_MESSAGE: &str = "Typography guide loaded and ready for use";
