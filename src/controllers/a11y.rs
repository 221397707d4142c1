//! AccessibilityMirror - OS Preference Mirroring
//!
//! Reflects reduced-motion and high-contrast preferences as root classes and
//! tracks whether the user is navigating by keyboard so focus rings only show then.

use crate::constants::{HIGH_CONTRAST_CLASS, KEYBOARD_NAVIGATION_CLASS, REDUCED_MOTION_CLASS};
use crate::error::Result;
use crate::event::{Key, PageEvent};
use crate::preferences::MediaFeature;

use super::{Controller, GuideContext};

/// Mirrors accessibility media features onto the document
#[derive(Debug, Default)]
pub struct AccessibilityMirror {
    keyboard_mode: bool,
}

impl AccessibilityMirror {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the last interaction was a Tab keypress rather than a mouse press
    pub fn keyboard_mode(&self) -> bool {
        self.keyboard_mode
    }

    fn mirrored_class(feature: MediaFeature) -> Option<&'static str> {
        match feature {
            MediaFeature::ReducedMotion => Some(REDUCED_MOTION_CLASS),
            MediaFeature::HighContrast => Some(HIGH_CONTRAST_CLASS),
            MediaFeature::DarkScheme => None,
        }
    }

    fn mirror(&self, feature: MediaFeature, matches: bool, cx: &mut GuideContext<'_>) {
        if let Some(class) = Self::mirrored_class(feature) {
            let root = cx.document.root();
            cx.document.toggle_class(root, class, matches);
        }
    }

    fn set_keyboard_mode(&mut self, on: bool, cx: &mut GuideContext<'_>) {
        self.keyboard_mode = on;
        let body = cx.document.body();
        cx.document.toggle_class(body, KEYBOARD_NAVIGATION_CLASS, on);
    }
}

impl Controller for AccessibilityMirror {
    fn name(&self) -> &'static str {
        "accessibility"
    }

    fn start(&mut self, cx: &mut GuideContext<'_>) -> Result<()> {
        for feature in [MediaFeature::ReducedMotion, MediaFeature::HighContrast] {
            let matches = cx.preferences.matches(feature);
            self.mirror(feature, matches, cx);
        }
        tracing::info!(
            reduced_motion = cx.preferences.reduced_motion,
            high_contrast = cx.preferences.high_contrast,
            "Accessibility enhancements initialized"
        );
        Ok(())
    }

    fn handle_event(&mut self, event: &PageEvent, cx: &mut GuideContext<'_>) -> bool {
        match event {
            PageEvent::MediaChange { feature, matches } => {
                if Self::mirrored_class(*feature).is_none() {
                    return false;
                }
                self.mirror(*feature, *matches, cx);
                true
            }
            PageEvent::KeyDown { key: Key::Tab, .. } => {
                self.set_keyboard_mode(true, cx);
                true
            }
            PageEvent::MouseDown => {
                self.set_keyboard_mode(false, cx);
                true
            }
            _ => false,
        }
    }

    fn refresh(&mut self, cx: &mut GuideContext<'_>) -> Result<()> {
        self.start(cx)
    }
}
