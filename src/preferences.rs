//! System Preferences
//!
//! OS-level media features the guide reacts to.

/// Media query features mirrored from the operating system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaFeature {
    /// `(prefers-color-scheme: dark)`
    DarkScheme,
    /// `(prefers-reduced-motion: reduce)`
    ReducedMotion,
    /// `(prefers-contrast: high)`
    HighContrast,
}

impl MediaFeature {
    /// The media query string a browser host would watch
    pub fn query(&self) -> &'static str {
        match self {
            MediaFeature::DarkScheme => "(prefers-color-scheme: dark)",
            MediaFeature::ReducedMotion => "(prefers-reduced-motion: reduce)",
            MediaFeature::HighContrast => "(prefers-contrast: high)",
        }
    }

    /// Parse a short name as used by the demo shell
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "dark" | "dark-scheme" => Some(MediaFeature::DarkScheme),
            "reduced-motion" | "motion" => Some(MediaFeature::ReducedMotion),
            "high-contrast" | "contrast" => Some(MediaFeature::HighContrast),
            _ => None,
        }
    }
}

/// Current state of every watched media feature
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SystemPreferences {
    pub dark_scheme: bool,
    pub reduced_motion: bool,
    pub high_contrast: bool,
}

impl SystemPreferences {
    pub fn matches(&self, feature: MediaFeature) -> bool {
        match feature {
            MediaFeature::DarkScheme => self.dark_scheme,
            MediaFeature::ReducedMotion => self.reduced_motion,
            MediaFeature::HighContrast => self.high_contrast,
        }
    }

    pub fn set(&mut self, feature: MediaFeature, matches: bool) {
        match feature {
            MediaFeature::DarkScheme => self.dark_scheme = matches,
            MediaFeature::ReducedMotion => self.reduced_motion = matches,
            MediaFeature::HighContrast => self.high_contrast = matches,
        }
    }
}
