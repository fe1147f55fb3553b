//! Quit confirmation dialog component

use crate::action::Action;
use crate::component::Widget;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

pub const TAG: &str = "quit-dialog";

pub const WIDTH: u16 = 40;
pub const HEIGHT: u16 = 7;

/// Surface row holding the yes/no buttons
const BUTTON_ROW: u16 = 4;

const STYLES: &str = r#"
:host { border: plain; border-color: yellow; padding: 3; }
.question { color: white; font-weight: bold; }
.yes { color: green; font-weight: bold; }
.no { color: red; font-weight: bold; }
"#;

/// Quit confirmation dialog
#[derive(Default)]
pub struct QuitDialog;

impl Widget for QuitDialog {
    fn tag(&self) -> &'static str {
        TAG
    }

    fn styles(&self) -> &'static str {
        STYLES
    }

    fn template(&self) -> String {
        [
            "<title>Quit?</title>",
            "",
            r#"<span class="question">Are you sure you want to quit?</span>"#,
            "",
            r#"<span class="yes"> y </span>Yes, quit  <span class="no"> n/Esc </span>No, cancel"#,
        ]
        .join("\n")
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => Some(Action::ForceQuit),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Some(Action::CloseModal),
            _ => None,
        };
        Ok(action)
    }

    fn handle_click(&mut self, column: u16, row: u16) -> Result<Option<Action>> {
        if row != BUTTON_ROW {
            return Ok(None);
        }
        // Border and padding, then " y Yes, quit  " and " n/Esc No, cancel"
        let action = match column {
            4..=17 => Some(Action::ForceQuit),
            18..=34 => Some(Action::CloseModal),
            _ => None,
        };
        Ok(action)
    }
}
