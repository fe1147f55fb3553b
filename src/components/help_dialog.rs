//! Help dialog component
//!
//! Displays all keyboard shortcuts available in the application.

use crate::action::Action;
use crate::component::Widget;
use crate::markup::escape;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::Rect;

pub const TAG: &str = "help-dialog";

pub const WIDTH: u16 = 60;
pub const HEIGHT: u16 = 24;

const STYLES: &str = r#"
:host { border: plain; border-color: cyan; color: white; }
.section { color: yellow; font-weight: bold; }
.rule { color: dark-gray; }
.key { color: cyan; font-weight: bold; }
.hint { color: dark-gray; }
"#;

const SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "Users",
        &[
            ("j / ↓", "Select next user"),
            ("k / ↑", "Select previous user"),
            ("g / G", "Jump to first / last user"),
            ("e / Enter", "Edit selected user"),
            ("n", "New user"),
            ("Space", "Toggle active"),
            ("r", "Reload users"),
        ],
    ),
    (
        "Edit Form",
        &[
            ("Tab / ↓", "Next field"),
            ("Shift+Tab / ↑", "Previous field"),
            ("Enter", "Validate and save"),
            ("Esc", "Discard changes"),
        ],
    ),
    (
        "Page",
        &[
            ("m", "Expand / collapse menu"),
            ("?", "Show this help"),
            ("q", "Quit"),
            ("Ctrl+c", "Quit immediately"),
        ],
    ),
];

/// Help dialog showing all keyboard shortcuts
#[derive(Default)]
pub struct HelpDialog {
    pub scroll_offset: usize,
    visible_height: usize,
}

impl HelpDialog {
    fn content() -> Vec<String> {
        let mut lines = Vec::new();
        for (title, shortcuts) in SECTIONS {
            lines.push(String::new());
            lines.push(format!(r#"  <span class="section">{}</span>"#, title));
            lines.push(format!(
                r#"  <span class="rule">{}</span>"#,
                "─".repeat(title.len() + 2)
            ));
            for (key, description) in *shortcuts {
                lines.push(format!(
                    r#"  <span class="key">{:16}</span>{}"#,
                    escape(key),
                    escape(description)
                ));
            }
        }
        lines.push(String::new());
        lines.push(r#"  <span class="hint">Press q, Esc, or ? to close</span>"#.to_string());
        lines
    }

    fn max_scroll(&self) -> usize {
        Self::content().len().saturating_sub(self.visible_height)
    }
}

impl Widget for HelpDialog {
    fn tag(&self) -> &'static str {
        TAG
    }

    fn styles(&self) -> &'static str {
        STYLES
    }

    fn template(&self) -> String {
        let mut lines = vec!["<title>Keyboard Shortcuts</title>".to_string()];
        lines.extend(Self::content().into_iter().skip(self.scroll_offset));
        lines.join("\n")
    }

    fn on_layout(&mut self, area: Rect) {
        self.visible_height = usize::from(area.height.saturating_sub(2));
        self.scroll_offset = self.scroll_offset.min(self.max_scroll());
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => Some(Action::CloseModal),
            KeyCode::Char('j') | KeyCode::Down => {
                self.scroll_offset = (self.scroll_offset + 1).min(self.max_scroll());
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.scroll_offset = self.scroll_offset.saturating_sub(1);
                None
            }
            KeyCode::PageDown => {
                self.scroll_offset = (self.scroll_offset + 10).min(self.max_scroll());
                None
            }
            KeyCode::PageUp => {
                self.scroll_offset = self.scroll_offset.saturating_sub(10);
                None
            }
            _ => None,
        };
        Ok(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_close_keys() {
        let mut dialog = HelpDialog::default();
        for code in [KeyCode::Esc, KeyCode::Char('q'), KeyCode::Char('?')] {
            assert_eq!(
                dialog.handle_key_event(key(code)).unwrap(),
                Some(Action::CloseModal)
            );
        }
    }

    #[test]
    fn test_scroll_is_clamped() {
        let mut dialog = HelpDialog::default();
        dialog.on_layout(Rect::new(0, 0, WIDTH, 10));
        let max = dialog.max_scroll();
        assert!(max > 0);

        for _ in 0..100 {
            dialog.handle_key_event(key(KeyCode::Down)).unwrap();
        }
        assert_eq!(dialog.scroll_offset, max);

        dialog.handle_key_event(key(KeyCode::PageUp)).unwrap();
        assert_eq!(dialog.scroll_offset, max.saturating_sub(10));
    }

    #[test]
    fn test_template_lists_shortcuts() {
        let template = HelpDialog::default().template();
        assert!(template.contains("Keyboard Shortcuts"));
        assert!(template.contains("Toggle active"));
        assert!(template.contains("Shift+Tab / ↑"));
    }
}
