//! Shell - Line Commands for the Demo Driver
//!
//! Each stdin line is one command. Elements are addressed by their `id`.
//!
//! ```text
//! click <id>              key <id|-> <KeyName>     input <id> <value>
//! change <id>             check <index> on|off     reset
//! mousedown               media <feature> on|off   state
//! dump                    help                     quit
//! ```

use std::str::FromStr;
use std::time::Instant;

use serde::Serialize;

use crate::app::TypographyGuide;
use crate::dom::{Document, MemoryDocument, NodeId};
use crate::error::{Error, Result};
use crate::event::{Key, PageEvent};
use crate::page::element_by_id;
use crate::preferences::MediaFeature;
use crate::storage::Storage;

pub const HELP: &str = "\
commands:
  click <id>               click an element
  key <id|-> <KeyName>     key press on an element, or with nothing focused
  input <id> <value>       slider input
  change <id>              slider commit
  check <index> on|off     toggle a checklist item
  reset                    clear the checklist
  mousedown                pointer press
  media <feature> on|off   dark | reduced-motion | high-contrast
  state                    guide summary as JSON
  dump                     document snapshot as JSON
  quit";

/// A parsed shell command
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Click(String),
    Key { target: Option<String>, key: Key },
    Input { target: String, value: String },
    Change(String),
    Check { index: usize, checked: bool },
    Reset,
    MouseDown,
    Media { feature: MediaFeature, matches: bool },
    State,
    Dump,
    Help,
    Quit,
}

/// What the driver should do after a command
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Continue(Option<String>),
    Quit,
}

fn invalid(message: impl Into<String>) -> Error {
    Error::Invalid {
        message: message.into(),
    }
}

fn parse_switch(word: Option<&str>) -> Result<bool> {
    match word {
        Some("on" | "true" | "1") => Ok(true),
        Some("off" | "false" | "0") => Ok(false),
        other => Err(invalid(format!("expected on|off, got {:?}", other.unwrap_or("")))),
    }
}

fn required<'a>(word: Option<&'a str>, what: &str) -> Result<&'a str> {
    word.ok_or_else(|| invalid(format!("missing {what}")))
}

impl FromStr for Command {
    type Err = Error;

    fn from_str(line: &str) -> Result<Self> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Err(invalid("empty command"));
        };

        let command = match verb.to_ascii_lowercase().as_str() {
            "click" => Command::Click(required(words.next(), "element id")?.to_string()),
            "key" => {
                let target = required(words.next(), "element id")?;
                let key = required(words.next(), "key name")?;
                Command::Key {
                    target: (target != "-").then(|| target.to_string()),
                    key: Key::from_name(key),
                }
            }
            "input" => Command::Input {
                target: required(words.next(), "element id")?.to_string(),
                value: required(words.next(), "value")?.to_string(),
            },
            "change" => Command::Change(required(words.next(), "element id")?.to_string()),
            "check" => {
                let index = required(words.next(), "checkbox index")?;
                let index = index
                    .parse()
                    .map_err(|_| invalid(format!("bad checkbox index {index:?}")))?;
                Command::Check {
                    index,
                    checked: parse_switch(words.next())?,
                }
            }
            "reset" => Command::Reset,
            "mousedown" => Command::MouseDown,
            "media" => {
                let name = required(words.next(), "media feature")?;
                let feature = MediaFeature::from_name(name)
                    .ok_or_else(|| invalid(format!("unknown media feature {name:?}")))?;
                Command::Media {
                    feature,
                    matches: parse_switch(words.next())?,
                }
            }
            "state" => Command::State,
            "dump" => Command::Dump,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => return Err(invalid(format!("unknown command {other:?}"))),
        };

        if let Some(extra) = words.next() {
            return Err(invalid(format!("unexpected argument {extra:?}")));
        }
        Ok(command)
    }
}

/// Summary printed by the `state` command
#[derive(Debug, Serialize)]
pub struct GuideSummary {
    pub active_tab: Option<String>,
    pub theme: &'static str,
    pub explicit_theme: bool,
    pub ios_scale: Option<String>,
    pub android_scale: Option<String>,
    pub checked: usize,
    pub total: usize,
    pub keyboard_mode: bool,
    pub announcement: Option<String>,
}

impl GuideSummary {
    pub fn of<S: Storage>(guide: &TypographyGuide<MemoryDocument, S>) -> Self {
        let document = guide.document();
        let checkboxes = guide.checklist().checkboxes();
        Self {
            active_tab: guide
                .tabs()
                .active_tab()
                .and_then(|tab| document.attribute(tab, "data-tab")),
            theme: guide.theme().theme().as_str(),
            explicit_theme: guide.theme().has_explicit_choice(),
            ios_scale: guide.ios_scale().current().map(|r| r.label.clone()),
            android_scale: guide.android_scale().current().map(|r| r.label.clone()),
            checked: checkboxes.iter().filter(|&&c| document.is_checked(c)).count(),
            total: checkboxes.len(),
            keyboard_mode: guide.accessibility().keyboard_mode(),
            announcement: guide.announcer().last_message().map(str::to_string),
        }
    }
}

fn resolve(document: &dyn Document, id: &str) -> Result<NodeId> {
    element_by_id(document, id).ok_or_else(|| Error::missing(format!("#{id}")))
}

/// Run one command against the guide
pub fn execute<S: Storage>(
    guide: &mut TypographyGuide<MemoryDocument, S>,
    command: &Command,
    now: Instant,
) -> Result<Outcome> {
    let event = match command {
        Command::Click(id) => PageEvent::Click {
            target: resolve(guide.document(), id)?,
        },
        Command::Key { target, key } => PageEvent::KeyDown {
            target: match target {
                Some(id) => Some(resolve(guide.document(), id)?),
                None => guide.document().focused(),
            },
            key: key.clone(),
        },
        Command::Input { target, value } => PageEvent::Input {
            target: resolve(guide.document(), target)?,
            value: value.clone(),
        },
        Command::Change(id) => PageEvent::Change {
            target: resolve(guide.document(), id)?,
        },
        Command::MouseDown => PageEvent::MouseDown,
        Command::Media { feature, matches } => PageEvent::MediaChange {
            feature: *feature,
            matches: *matches,
        },
        Command::Check { index, checked } => {
            let total = guide.checklist().checkboxes().len();
            let Some(&checkbox) = guide.checklist().checkboxes().get(*index) else {
                return Err(Error::OutOfRange {
                    message: format!("checkbox {index} of {total}"),
                });
            };
            guide.set_checked(checkbox, *checked, now);
            return Ok(Outcome::Continue(None));
        }
        Command::Reset => {
            guide.reset_checklist(now)?;
            return Ok(Outcome::Continue(None));
        }
        Command::State => {
            let summary = serde_json::to_string_pretty(&GuideSummary::of(guide))?;
            return Ok(Outcome::Continue(Some(summary)));
        }
        Command::Dump => {
            let snapshot = serde_json::to_string_pretty(&guide.document().snapshot())?;
            return Ok(Outcome::Continue(Some(snapshot)));
        }
        Command::Help => return Ok(Outcome::Continue(Some(HELP.to_string()))),
        Command::Quit => return Ok(Outcome::Quit),
    };

    if !guide.dispatch(&event, now) {
        tracing::debug!(?command, "Command had no effect");
    }
    Ok(Outcome::Continue(None))
}
