//! Template markup
//!
//! Templates are line oriented. Each source line becomes one rendered line:
//!
//! ```text
//! <title>Users</title>
//! <span class="label">Email</span> ada@example.com
//! <hr>
//! ```
//!
//! Spans pick up their style from the owning surface's sheet. Text must be
//! entity-escaped with [`escape`]; any other `<` or `>` is a template bug.

use crate::style::StyleSheet;
use ratatui::text::{Line, Span};
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

static SPAN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<span class="([^"]*)">([^<>]*)</span>"#).unwrap());

static TITLE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^<title>([^<>]*)</title>$").unwrap());

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MarkupError {
    #[error("unexpected markup on line {line}: '{text}'")]
    UnexpectedTag { line: usize, text: String },
}

/// Parsed template ready to draw
#[derive(Debug, Default)]
pub struct Markup {
    pub title: Option<String>,
    pub lines: Vec<Line<'static>>,
}

/// Escape text for inclusion in a template
///
/// Control characters (newlines included) become spaces, so escaped text
/// always stays on the line it was placed on.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            c if c.is_control() => out.push(' '),
            c => out.push(c),
        }
    }
    out
}

fn unescape(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&amp;", "&")
}

fn plain(text: &str, line: usize) -> Result<Span<'static>, MarkupError> {
    if text.contains(['<', '>']) {
        return Err(MarkupError::UnexpectedTag {
            line,
            text: text.to_string(),
        });
    }
    Ok(Span::raw(unescape(text)))
}

/// Parse `source` against `sheet`; `width` sizes horizontal rules
pub fn parse(source: &str, sheet: &StyleSheet, width: u16) -> Result<Markup, MarkupError> {
    let mut markup = Markup::default();

    for (index, raw) in source.lines().enumerate() {
        let line_no = index + 1;
        let trimmed = raw.trim();

        if trimmed == "<hr>" {
            let rule = "─".repeat(width as usize);
            markup
                .lines
                .push(Line::from(Span::styled(rule, sheet.class_style("hr"))));
            continue;
        }

        if let Some(caps) = TITLE_REGEX.captures(trimmed) {
            markup.title = caps.get(1).map(|m| unescape(m.as_str()));
            continue;
        }

        let mut spans = Vec::new();
        let mut cursor = 0;
        for caps in SPAN_REGEX.captures_iter(raw) {
            let (Some(whole), Some(classes), Some(text)) = (caps.get(0), caps.get(1), caps.get(2))
            else {
                continue;
            };
            if whole.start() > cursor {
                spans.push(plain(&raw[cursor..whole.start()], line_no)?);
            }
            spans.push(Span::styled(
                unescape(text.as_str()),
                sheet.class_style(classes.as_str()),
            ));
            cursor = whole.end();
        }
        if cursor < raw.len() {
            spans.push(plain(&raw[cursor..], line_no)?);
        }

        markup.lines.push(Line::from(spans));
    }

    Ok(markup)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::{Color, Modifier};

    fn sheet() -> StyleSheet {
        StyleSheet::parse(".name { color: green; } .bold { font-weight: bold; } .hr { color: gray; }")
            .unwrap()
    }

    #[test]
    fn test_spans_and_plain_text() {
        let markup = parse(
            r#"Hello <span class="name bold">Ada</span>!"#,
            &sheet(),
            10,
        )
        .unwrap();

        let line = &markup.lines[0];
        assert_eq!(line.spans.len(), 3);
        assert_eq!(line.spans[0].content, "Hello ");
        assert_eq!(line.spans[1].content, "Ada");
        assert_eq!(line.spans[1].style.fg, Some(Color::Green));
        assert!(line.spans[1].style.add_modifier.contains(Modifier::BOLD));
        assert_eq!(line.spans[2].content, "!");
    }

    #[test]
    fn test_title_and_rule() {
        let markup = parse("<title>Users &amp; Groups</title>\n<hr>\n", &sheet(), 4).unwrap();
        assert_eq!(markup.title.as_deref(), Some("Users & Groups"));
        assert_eq!(markup.lines.len(), 1);
        assert_eq!(markup.lines[0].spans[0].content, "────");
        assert_eq!(markup.lines[0].spans[0].style.fg, Some(Color::Gray));
    }

    #[test]
    fn test_empty_lines_are_kept() {
        let markup = parse("a\n\nb", &sheet(), 4).unwrap();
        assert_eq!(markup.lines.len(), 3);
    }

    #[test]
    fn test_escaped_text_round_trips() {
        let user_text = r#"<script> & "quotes""#;
        let source = format!(r#"<span class="name">{}</span>"#, escape(user_text));
        let markup = parse(&source, &sheet(), 4).unwrap();
        assert_eq!(markup.lines[0].spans[0].content, user_text);
    }

    #[test]
    fn test_escape_keeps_text_on_one_line() {
        assert_eq!(escape("Ann\nMarie\r\tB"), "Ann Marie  B");

        let source = format!(r#"<span class="name">{}</span>"#, escape("Ann\nMarie"));
        let markup = parse(&source, &sheet(), 4).unwrap();
        assert_eq!(markup.lines.len(), 1);
        assert_eq!(markup.lines[0].spans[0].content, "Ann Marie");
    }

    #[test]
    fn test_stray_tags_fail() {
        let err = parse("ok\n<b>bold</b>", &sheet(), 4).unwrap_err();
        assert_eq!(
            err,
            MarkupError::UnexpectedTag {
                line: 2,
                text: "<b>bold</b>".to_string()
            }
        );
        assert!(parse(r#"<span class="name">open"#, &sheet(), 4).is_err());
    }
}
