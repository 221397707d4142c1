//! Standard Page
//!
//! Builds the Typography System Guide markup into a [`MemoryDocument`]:
//! three tabs with their panels, the iOS and Android scale demos, the theme
//! toggle, the review checklist and the live region.

use crate::controllers::{ANDROID_SCALE, IOS_SCALE, ScaleTable};
use crate::dom::{Document, Element, MemoryDocument, NodeId};

/// Items of the typography review checklist
pub const CHECKLIST_ITEMS: [&str; 6] = [
    "Body text is at least 17pt on iOS and 16sp on Android",
    "Text scales with Dynamic Type and font scale settings",
    "Layouts reflow at the largest accessibility sizes",
    "Contrast meets WCAG AA in light and dark themes",
    "Line height is at least 1.4 for body copy",
    "No text is embedded in images",
];

/// Demo sentence shown for every type role
const SAMPLE_TEXT: &str = "The quick brown fox jumps over the lazy dog";

/// Build the complete guide page
pub fn standard_page() -> MemoryDocument {
    let mut doc = MemoryDocument::new();
    let body = doc.body();

    let header = doc.append(body, Element::new("header"));
    doc.append(header, Element::new("h1").text("Typography System Guide"));
    let toggle = doc.append(
        header,
        Element::new("button")
            .id("theme-toggle")
            .attr("type", "button"),
    );
    doc.append(toggle, Element::new("span").class("theme-toggle-icon").attr("aria-hidden", "true"));
    doc.append(toggle, Element::new("span").class("theme-toggle-label"));

    let tablist = doc.append(
        body,
        Element::new("nav")
            .attr("role", "tablist")
            .attr("aria-label", "Platform guides"),
    );
    for (key, label, active) in [
        ("ios", "iOS", true),
        ("android", "Android", false),
        ("checklist", "Checklist", false),
    ] {
        let mut tab = Element::new("button")
            .id(format!("{key}-tab"))
            .class("tab")
            .attr("role", "tab")
            .attr("data-tab", key)
            .attr("aria-controls", format!("{key}-content"))
            .text(label);
        if active {
            tab = tab.class("active");
        }
        doc.append(tablist, tab);
    }

    let main = doc.append(body, Element::new("main"));
    scale_panel(&mut doc, main, "ios", "iOS Dynamic Type", &IOS_SCALE, "0", "6", "1", "3");
    scale_panel(&mut doc, main, "android", "Android Font Scale", &ANDROID_SCALE, "0.85", "2.0", "0.05", "1.0");
    checklist_panel(&mut doc, main);

    doc.append(
        body,
        Element::new("div")
            .id("announcements")
            .class("sr-only")
            .attr("aria-live", "polite")
            .attr("aria-atomic", "true"),
    );

    doc
}

#[allow(clippy::too_many_arguments)]
fn scale_panel(
    doc: &mut MemoryDocument,
    parent: NodeId,
    key: &str,
    title: &str,
    table: &ScaleTable,
    min: &str,
    max: &str,
    step: &str,
    value: &str,
) {
    let panel = doc.append(
        parent,
        Element::new("section")
            .id(format!("{key}-content"))
            .class("tab-content")
            .attr("role", "tabpanel")
            .attr("aria-labelledby", format!("{key}-tab")),
    );
    doc.append(panel, Element::new("h2").text(title));

    let controls = doc.append(panel, Element::new("div").class("scale-controls"));
    doc.append(
        controls,
        Element::new("input")
            .id(table.slider.trim_start_matches('#'))
            .attr("type", "range")
            .attr("min", min)
            .attr("max", max)
            .attr("step", step)
            .value(value),
    );
    doc.append(
        controls,
        Element::new("output")
            .id(table.output.trim_start_matches('#'))
            .attr("aria-live", "off"),
    );

    for (role, _) in table.roles {
        doc.append(panel, Element::new("p").class("type-sample").class(*role).text(SAMPLE_TEXT));
    }
}

fn checklist_panel(doc: &mut MemoryDocument, parent: NodeId) {
    let panel = doc.append(
        parent,
        Element::new("section")
            .id("checklist-content")
            .class("tab-content")
            .attr("role", "tabpanel")
            .attr("aria-labelledby", "checklist-tab"),
    );
    doc.append(panel, Element::new("h2").text("Typography Review Checklist"));
    doc.append(panel, Element::new("p").class("checklist-progress"));

    let list = doc.append(panel, Element::new("ul").class("checklist"));
    for item in CHECKLIST_ITEMS {
        let li = doc.append(list, Element::new("li"));
        let label = doc.append(li, Element::new("label"));
        doc.append(label, Element::new("input").attr("type", "checkbox"));
        doc.append(label, Element::new("span").text(item));
    }
}

/// Element with the given `id`, if present
pub fn element_by_id(doc: &dyn Document, id: &str) -> Option<NodeId> {
    doc.query(&crate::dom::Selector::Id(id.to_string()))
}
