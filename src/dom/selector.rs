//! Selector - Minimal CSS selector subset
//!
//! Supports `#id`, `.class`, `tag`, `tag[attr=value]` and comma-separated lists,
//! which covers every lookup the guide performs.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// A parsed selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// `#name`
    Id(String),
    /// `.name`
    Class(String),
    /// `name`
    Tag(String),
    /// `tag[attr=value]`
    TagAttribute {
        tag: String,
        attribute: String,
        value: String,
    },
    /// `a, b, c`
    AnyOf(Vec<Selector>),
}

impl Selector {
    /// Parse a selector string
    pub fn parse(input: &str) -> Result<Self> {
        let parts: Vec<&str> = input.split(',').map(str::trim).collect();
        if parts.len() == 1 {
            return parse_simple(parts[0]).ok_or_else(|| invalid(input));
        }

        let mut selectors = Vec::with_capacity(parts.len());
        for part in parts {
            selectors.push(parse_simple(part).ok_or_else(|| invalid(input))?);
        }
        Ok(Selector::AnyOf(selectors))
    }

    /// Build a class selector list from class names
    pub fn any_class<I, S>(classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Selector::AnyOf(classes.into_iter().map(|c| Selector::Class(c.into())).collect())
    }

    /// Test the selector against an element's tag, attribute lookup and classes
    pub fn matches<'a>(
        &self,
        tag: &str,
        attribute: impl Fn(&str) -> Option<&'a str> + Copy,
        has_class: impl Fn(&str) -> bool + Copy,
    ) -> bool {
        match self {
            Selector::Id(id) => attribute("id") == Some(id.as_str()),
            Selector::Class(class) => has_class(class),
            Selector::Tag(name) => tag.eq_ignore_ascii_case(name),
            Selector::TagAttribute {
                tag: name,
                attribute: attr,
                value,
            } => tag.eq_ignore_ascii_case(name) && attribute(attr) == Some(value.as_str()),
            Selector::AnyOf(selectors) => selectors.iter().any(|s| s.matches(tag, attribute, has_class)),
        }
    }
}

impl FromStr for Selector {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Selector::parse(s)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Id(id) => write!(f, "#{id}"),
            Selector::Class(class) => write!(f, ".{class}"),
            Selector::Tag(tag) => write!(f, "{tag}"),
            Selector::TagAttribute {
                tag,
                attribute,
                value,
            } => write!(f, "{tag}[{attribute}={value}]"),
            Selector::AnyOf(selectors) => {
                for (i, selector) in selectors.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{selector}")?;
                }
                Ok(())
            }
        }
    }
}

fn invalid(input: &str) -> Error {
    Error::InvalidSelector {
        selector: input.to_string(),
    }
}

fn is_ident(s: &str) -> bool {
    !s.is_empty()
        && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        && !s.starts_with(|c: char| c.is_ascii_digit())
}

fn parse_simple(part: &str) -> Option<Selector> {
    if let Some(id) = part.strip_prefix('#') {
        return is_ident(id).then(|| Selector::Id(id.to_string()));
    }
    if let Some(class) = part.strip_prefix('.') {
        return is_ident(class).then(|| Selector::Class(class.to_string()));
    }
    if let Some((tag, rest)) = part.split_once('[') {
        let body = rest.strip_suffix(']')?;
        let (attribute, value) = body.split_once('=')?;
        let value = value.trim().trim_matches(|c| c == '"' || c == '\'');
        let attribute = attribute.trim();
        if !is_ident(tag) || !is_ident(attribute) || value.is_empty() {
            return None;
        }
        return Some(Selector::TagAttribute {
            tag: tag.to_string(),
            attribute: attribute.to_string(),
            value: value.to_string(),
        });
    }
    is_ident(part).then(|| Selector::Tag(part.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_forms() {
        assert_eq!(Selector::parse("#ios-scale-slider").ok(), Some(Selector::Id("ios-scale-slider".into())));
        assert_eq!(Selector::parse(".tab").ok(), Some(Selector::Class("tab".into())));
        assert_eq!(Selector::parse("label").ok(), Some(Selector::Tag("label".into())));
        assert_eq!(
            Selector::parse("input[type=\"checkbox\"]").ok(),
            Some(Selector::TagAttribute {
                tag: "input".into(),
                attribute: "type".into(),
                value: "checkbox".into(),
            })
        );
    }

    #[test]
    fn test_parse_list() {
        let selector = Selector::parse(".ios-body, .ios-caption-1").expect("valid list");
        assert_eq!(selector, Selector::any_class(["ios-body", "ios-caption-1"]));
        assert_eq!(selector.to_string(), ".ios-body, .ios-caption-1");
    }

    #[test]
    fn test_parse_invalid() {
        assert!(Selector::parse("").is_err());
        assert!(Selector::parse("#").is_err());
        assert!(Selector::parse("#1-content").is_err());
        assert!(Selector::parse(".a, ").is_err());
        assert!(Selector::parse("input[type]").is_err());
    }
}
