//! ScaleController - Dynamic Type / Font Scale Demos
//!
//! Maps a slider value to a `(label, factor)` pair and resizes the demo
//! elements of one platform to `base size × factor`.

use std::time::Duration;

use crate::constants::SLIDER_DEBOUNCE_MS;
use crate::dom::{self, NodeId, Selector};
use crate::error::{Error, Result};
use crate::event::PageEvent;
use crate::timer::TimerKey;

use super::{Controller, GuideContext};

/// Platform whose type scale a controller demonstrates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Platform {
    Ios,
    Android,
}

/// How a slider value maps to a scale factor
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScaleMode {
    /// Slider value is an index into parallel label/factor tables
    Discrete {
        labels: &'static [&'static str],
        factors: &'static [f64],
    },
    /// Slider value is the factor itself
    Continuous,
}

/// Everything that differs between the iOS and Android demos
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleTable {
    pub platform: Platform,
    pub slider: &'static str,
    pub output: &'static str,
    /// Demo role class and its base size, in `unit`
    pub roles: &'static [(&'static str, f64)],
    pub unit: &'static str,
    pub mode: ScaleMode,
    pub announce_prefix: &'static str,
}

/// iOS Dynamic Type content size categories
pub const IOS_SCALE_LABELS: [&str; 7] = [
    "xSmall",
    "Small",
    "Medium",
    "Large (Default)",
    "xLarge",
    "xxLarge",
    "xxxLarge",
];
pub const IOS_SCALE_FACTORS: [f64; 7] = [0.8, 0.9, 0.95, 1.0, 1.15, 1.3, 1.5];

pub static IOS_SCALE: ScaleTable = ScaleTable {
    platform: Platform::Ios,
    slider: "#ios-scale-slider",
    output: "#ios-scale-value",
    roles: &[
        ("ios-large-title", 34.0),
        ("ios-title-1", 28.0),
        ("ios-body", 17.0),
        ("ios-caption-1", 12.0),
    ],
    unit: "px",
    mode: ScaleMode::Discrete {
        labels: &IOS_SCALE_LABELS,
        factors: &IOS_SCALE_FACTORS,
    },
    announce_prefix: "iOS text size changed to",
};

pub static ANDROID_SCALE: ScaleTable = ScaleTable {
    platform: Platform::Android,
    slider: "#android-scale-slider",
    output: "#android-scale-value",
    roles: &[
        ("android-display-large", 57.0),
        ("android-headline-large", 32.0),
        ("android-body-large", 16.0),
        ("android-label-medium", 12.0),
    ],
    unit: "px",
    mode: ScaleMode::Continuous,
    announce_prefix: "Android font scale changed to",
};

/// A resolved slider position
#[derive(Debug, Clone, PartialEq)]
pub struct ScaleResolution {
    pub label: String,
    pub factor: f64,
}

impl ScaleTable {
    /// Resolve a raw slider value
    pub fn resolve(&self, raw: &str) -> Result<ScaleResolution> {
        let raw = raw.trim();
        match self.mode {
            ScaleMode::Discrete { labels, factors } => {
                let index: usize = raw.parse().map_err(|_| Error::OutOfRange {
                    message: format!("{:?} scale index {raw:?}", self.platform),
                })?;
                match (labels.get(index), factors.get(index)) {
                    (Some(label), Some(factor)) => Ok(ScaleResolution {
                        label: (*label).to_string(),
                        factor: *factor,
                    }),
                    _ => Err(Error::OutOfRange {
                        message: format!("{:?} scale index {index}", self.platform),
                    }),
                }
            }
            ScaleMode::Continuous => {
                let factor: f64 = raw.parse().map_err(|_| Error::OutOfRange {
                    message: format!("{:?} scale factor {raw:?}", self.platform),
                })?;
                if !factor.is_finite() || factor <= 0.0 {
                    return Err(Error::OutOfRange {
                        message: format!("{:?} scale factor {factor}", self.platform),
                    });
                }
                Ok(ScaleResolution {
                    label: format!("{}x", tenths_label(factor)),
                    factor,
                })
            }
        }
    }

    /// Base size for the first role class in `classes`
    pub fn base_size(&self, classes: &[String]) -> Option<f64> {
        classes.iter().find_map(|class| {
            self.roles
                .iter()
                .find(|(role, _)| *role == class.as_str())
                .map(|(_, size)| *size)
        })
    }
}

/// Whether `value` lies exactly halfway between two tenths
///
/// `value × 20` must be an odd integer. With `value = m × 2^e`, that holds
/// exactly when `m` has `-(e + 2)` trailing zero bits.
fn is_tenths_tie(value: f64) -> bool {
    let bits = value.to_bits();
    let exponent = ((bits >> 52) & 0x7ff) as i32;
    let fraction = bits & ((1u64 << 52) - 1);
    let (mantissa, exponent) = if exponent == 0 {
        (fraction, -1074)
    } else {
        (fraction | (1u64 << 52), exponent - 1075)
    };
    let shift = exponent + 2;
    mantissa != 0 && shift <= 0 && mantissa.trailing_zeros() as i32 == -shift
}

/// Format a positive value with one decimal, rounding exact ties up
///
/// `{:.1}` rounds ties to even, which would render 1.25 as `1.2`.
fn tenths_label(value: f64) -> String {
    if !is_tenths_tie(value) {
        return format!("{value:.1}");
    }
    // On a tie `value × 10` is exact, so ceil lands on the upper neighbour
    let tenths = (value * 10.0).ceil();
    format!("{:.1}", tenths / 10.0)
}

/// Drives one platform's scale slider and demo elements
#[derive(Debug)]
pub struct ScaleController {
    table: &'static ScaleTable,
    debounce: Duration,
    slider: Option<NodeId>,
    output: Option<NodeId>,
    examples: Vec<NodeId>,
    current: Option<ScaleResolution>,
}

impl ScaleController {
    pub fn new(table: &'static ScaleTable, debounce: Duration) -> Self {
        Self {
            table,
            debounce,
            slider: None,
            output: None,
            examples: Vec::new(),
            current: None,
        }
    }

    pub fn ios() -> Self {
        Self::new(&IOS_SCALE, Duration::from_millis(SLIDER_DEBOUNCE_MS))
    }

    pub fn android() -> Self {
        Self::new(&ANDROID_SCALE, Duration::from_millis(SLIDER_DEBOUNCE_MS))
    }

    /// Set the trailing debounce window; zero applies every input immediately
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn platform(&self) -> Platform {
        self.table.platform
    }

    /// Last successfully applied resolution
    pub fn current(&self) -> Option<&ScaleResolution> {
        self.current.as_ref()
    }

    /// Read the slider and apply the resolved scale to every demo element
    ///
    /// Nothing is written when the value does not resolve.
    pub fn update(&mut self, cx: &mut GuideContext<'_>) -> Result<ScaleResolution> {
        let (Some(slider), Some(output)) = (self.slider, self.output) else {
            return Err(Error::missing(self.table.slider));
        };

        let resolution = self.table.resolve(&cx.document.value(slider))?;
        cx.document.set_text_content(output, &resolution.label);

        for &element in &self.examples {
            if let Some(base) = self.table.base_size(&cx.document.classes(element)) {
                let size = format!("{}{}", base * resolution.factor, self.table.unit);
                cx.document.set_style(element, "font-size", &size);
            }
        }

        tracing::debug!(
            platform = ?self.table.platform,
            label = %resolution.label,
            factor = resolution.factor,
            "Applied type scale"
        );
        self.current = Some(resolution.clone());
        Ok(resolution)
    }

    fn update_or_warn(&mut self, cx: &mut GuideContext<'_>) -> Option<ScaleResolution> {
        match self.update(cx) {
            Ok(resolution) => Some(resolution),
            Err(e) => {
                tracing::warn!(platform = ?self.table.platform, error = %e, "Scale update skipped");
                None
            }
        }
    }

    fn timer_key(&self) -> TimerKey {
        TimerKey::SliderDebounce(self.table.platform)
    }
}

impl Controller for ScaleController {
    fn name(&self) -> &'static str {
        match self.table.platform {
            Platform::Ios => "ios-scale",
            Platform::Android => "android-scale",
        }
    }

    fn start(&mut self, cx: &mut GuideContext<'_>) -> Result<()> {
        self.slider = dom::lookup(&*cx.document, self.table.slider);
        self.output = dom::lookup(&*cx.document, self.table.output);
        if self.slider.is_none() {
            return Err(Error::missing(self.table.slider));
        }
        if self.output.is_none() {
            return Err(Error::missing(self.table.output));
        }

        let roles = Selector::any_class(self.table.roles.iter().map(|(role, _)| *role));
        self.examples = cx.document.query_all(&roles);

        self.update_or_warn(cx);
        tracing::info!(
            platform = ?self.table.platform,
            examples = self.examples.len(),
            "Type scaling initialized"
        );
        Ok(())
    }

    fn handle_event(&mut self, event: &PageEvent, cx: &mut GuideContext<'_>) -> bool {
        match event {
            PageEvent::Input { target, .. } if Some(*target) == self.slider => {
                if self.debounce.is_zero() {
                    self.update_or_warn(cx);
                } else {
                    cx.timers.schedule(self.timer_key(), cx.now, self.debounce);
                }
                true
            }
            PageEvent::Change { target } if Some(*target) == self.slider => {
                cx.timers.cancel(self.timer_key());
                if let Some(resolution) = self.update_or_warn(cx) {
                    let message = format!("{} {}", self.table.announce_prefix, resolution.label);
                    cx.announce(&message);
                }
                true
            }
            _ => false,
        }
    }

    fn on_timer(&mut self, key: TimerKey, cx: &mut GuideContext<'_>) {
        if key == self.timer_key() {
            self.update_or_warn(cx);
        }
    }

    fn refresh(&mut self, cx: &mut GuideContext<'_>) -> Result<()> {
        let roles = Selector::any_class(self.table.roles.iter().map(|(role, _)| *role));
        self.examples = cx.document.query_all(&roles);
        self.update(cx).map(|_| ())
    }
}
