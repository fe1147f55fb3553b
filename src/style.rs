//! Scoped style sheets
//!
//! Each widget ships a small CSS-like sheet. A sheet is parsed per surface and
//! only ever consulted by that surface, so rules never leak between widgets.
//!
//! ```text
//! /* comment */
//! :host { border: rounded; border-color: cyan; padding: 1; }
//! .title, .label { color: yellow; font-weight: bold; }
//! ```

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::BorderType;
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;
use thiserror::Error;

static COMMENT_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)/\*.*?\*/").unwrap());

static RULE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"([^{}]*)\{([^{}]*)\}").unwrap());

static CLASS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\.[A-Za-z_][A-Za-z0-9_-]*$").unwrap());

/// A malformed style sheet
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StyleError {
    #[error("unexpected text in style sheet: '{0}'")]
    Syntax(String),
    #[error("unsupported selector '{0}'")]
    Selector(String),
    #[error("unknown property '{0}'")]
    UnknownProperty(String),
    #[error("invalid value '{value}' for '{property}'")]
    InvalidValue { property: String, value: String },
    #[error("property '{0}' only applies to :host")]
    HostOnly(String),
}

/// Styling of the surface itself
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostStyle {
    pub style: Style,
    pub border: Option<BorderType>,
    pub border_color: Option<Color>,
    pub padding: u16,
}

/// A parsed sheet: one host style plus named class styles
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleSheet {
    host: HostStyle,
    classes: HashMap<String, Style>,
}

enum Selector {
    Host,
    Class(String),
}

impl StyleSheet {
    pub fn parse(source: &str) -> Result<Self, StyleError> {
        let source = COMMENT_REGEX.replace_all(source, "");
        let mut sheet = StyleSheet::default();
        let mut cursor = 0;

        for caps in RULE_REGEX.captures_iter(&source) {
            let (Some(whole), Some(selectors), Some(body)) = (caps.get(0), caps.get(1), caps.get(2))
            else {
                continue;
            };
            // The selector group absorbs any text since the previous rule, so
            // stray text surfaces as a selector error.
            cursor = whole.end();

            let selectors = selectors
                .as_str()
                .split(',')
                .map(parse_selector)
                .collect::<Result<Vec<_>, _>>()?;

            for declaration in body.as_str().split(';') {
                let declaration = declaration.trim();
                if declaration.is_empty() {
                    continue;
                }
                let (property, value) = declaration
                    .split_once(':')
                    .ok_or_else(|| StyleError::Syntax(declaration.to_string()))?;
                let (property, value) = (property.trim(), value.trim());

                for selector in &selectors {
                    match selector {
                        Selector::Host => apply_host(&mut sheet.host, property, value)?,
                        Selector::Class(name) => {
                            let style = sheet.classes.entry(name.clone()).or_default();
                            if is_host_only(property) {
                                return Err(StyleError::HostOnly(property.to_string()));
                            }
                            *style = apply(*style, property, value)?;
                        }
                    }
                }
            }
        }

        ensure_blank(&source[cursor..])?;
        Ok(sheet)
    }

    pub fn host(&self) -> &HostStyle {
        &self.host
    }

    /// Combined style for a space-separated class list
    ///
    /// Classes are patched left to right; unknown classes contribute nothing.
    pub fn class_style(&self, classes: &str) -> Style {
        classes
            .split_whitespace()
            .filter_map(|name| self.classes.get(name))
            .fold(Style::default(), |acc, style| acc.patch(*style))
    }

    pub fn has_class(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }
}

fn ensure_blank(text: &str) -> Result<(), StyleError> {
    let text = text.trim();
    if text.is_empty() {
        Ok(())
    } else {
        Err(StyleError::Syntax(text.to_string()))
    }
}

fn parse_selector(raw: &str) -> Result<Selector, StyleError> {
    let selector = raw.trim();
    if selector == ":host" {
        Ok(Selector::Host)
    } else if CLASS_REGEX.is_match(selector) {
        Ok(Selector::Class(selector[1..].to_string()))
    } else {
        Err(StyleError::Selector(selector.to_string()))
    }
}

fn is_host_only(property: &str) -> bool {
    matches!(property, "border" | "border-color" | "padding")
}

fn invalid(property: &str, value: &str) -> StyleError {
    StyleError::InvalidValue {
        property: property.to_string(),
        value: value.to_string(),
    }
}

fn parse_color(property: &str, value: &str) -> Result<Color, StyleError> {
    value.parse::<Color>().map_err(|_| invalid(property, value))
}

fn apply(style: Style, property: &str, value: &str) -> Result<Style, StyleError> {
    let style = match (property, value) {
        ("color", _) => style.fg(parse_color(property, value)?),
        ("background", _) => style.bg(parse_color(property, value)?),
        ("font-weight", "bold") => style.add_modifier(Modifier::BOLD),
        ("font-weight", "dim") => style.add_modifier(Modifier::DIM),
        ("font-weight", "normal") => style.remove_modifier(Modifier::BOLD | Modifier::DIM),
        ("font-style", "italic") => style.add_modifier(Modifier::ITALIC),
        ("font-style", "normal") => style.remove_modifier(Modifier::ITALIC),
        ("text-decoration", "underline") => style.add_modifier(Modifier::UNDERLINED),
        ("text-decoration", "none") => style.remove_modifier(Modifier::UNDERLINED),
        ("font-weight" | "font-style" | "text-decoration", _) => {
            return Err(invalid(property, value))
        }
        _ => return Err(StyleError::UnknownProperty(property.to_string())),
    };
    Ok(style)
}

fn apply_host(host: &mut HostStyle, property: &str, value: &str) -> Result<(), StyleError> {
    match property {
        "border" => {
            host.border = match value {
                "none" => None,
                "plain" => Some(BorderType::Plain),
                "rounded" => Some(BorderType::Rounded),
                "double" => Some(BorderType::Double),
                "thick" => Some(BorderType::Thick),
                _ => return Err(invalid(property, value)),
            };
        }
        "border-color" => host.border_color = Some(parse_color(property, value)?),
        "padding" => {
            host.padding = value.parse().map_err(|_| invalid(property, value))?;
        }
        _ => host.style = apply(host.style, property, value)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHEET: &str = r#"
        /* surface */
        :host { border: rounded; border-color: cyan; padding: 1; color: white; }
        .title, .label { color: yellow; font-weight: bold; }
        .label { color: gray; }
        .error { color: red; font-style: italic; }
    "#;

    #[test]
    fn test_parse_host_and_classes() {
        let sheet = StyleSheet::parse(SHEET).unwrap();

        assert_eq!(sheet.host().border, Some(BorderType::Rounded));
        assert_eq!(sheet.host().border_color, Some(Color::Cyan));
        assert_eq!(sheet.host().padding, 1);
        assert_eq!(sheet.host().style.fg, Some(Color::White));

        let title = sheet.class_style("title");
        assert_eq!(title.fg, Some(Color::Yellow));
        assert!(title.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn test_later_rules_win() {
        let sheet = StyleSheet::parse(SHEET).unwrap();
        let label = sheet.class_style("label");
        assert_eq!(label.fg, Some(Color::Gray));
        assert!(label.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn test_class_list_patches_left_to_right() {
        let sheet = StyleSheet::parse(SHEET).unwrap();
        let combined = sheet.class_style("title error missing");
        assert_eq!(combined.fg, Some(Color::Red));
        assert!(combined.add_modifier.contains(Modifier::BOLD | Modifier::ITALIC));
        assert_eq!(sheet.class_style("missing"), Style::default());
    }

    #[test]
    fn test_hex_colors() {
        let sheet = StyleSheet::parse(".accent { background: #102030; }").unwrap();
        assert_eq!(sheet.class_style("accent").bg, Some(Color::Rgb(0x10, 0x20, 0x30)));
    }

    #[test]
    fn test_errors_are_reported() {
        assert_eq!(
            StyleSheet::parse(".a { colour: red; }"),
            Err(StyleError::UnknownProperty("colour".to_string()))
        );
        assert_eq!(
            StyleSheet::parse(".a { border: rounded; }"),
            Err(StyleError::HostOnly("border".to_string()))
        );
        assert!(matches!(
            StyleSheet::parse(".a { color: not-a-colour; }"),
            Err(StyleError::InvalidValue { .. })
        ));
        assert!(matches!(
            StyleSheet::parse("div { color: red; }"),
            Err(StyleError::Selector(_))
        ));
        assert!(matches!(
            StyleSheet::parse(".a { color: red; } stray"),
            Err(StyleError::Syntax(_))
        ));
        assert!(matches!(
            StyleSheet::parse(".a { color red; }"),
            Err(StyleError::Syntax(_))
        ));
    }
}
