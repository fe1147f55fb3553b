//! Page footer: copyright, latest status message and key hints

use crate::action::Action;
use crate::component::{MountContext, Widget};
use crate::markup::escape;
use anyhow::Result;
use chrono::{Datelike, Local};

pub const TAG: &str = "app-footer";

const STYLES: &str = r#"
:host { background: black; color: gray; padding: 1; }
.copy { color: dark-gray; }
.status { color: white; }
.error { color: red; font-weight: bold; }
.key { color: cyan; font-weight: bold; }
"#;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Status {
    Info(String),
    Error(String),
}

pub struct Footer {
    year: i32,
    status: Option<Status>,
}

impl Default for Footer {
    fn default() -> Self {
        Self::new()
    }
}

impl Footer {
    pub fn new() -> Self {
        Self {
            year: Local::now().year(),
            status: None,
        }
    }
}

impl Widget for Footer {
    fn tag(&self) -> &'static str {
        TAG
    }

    fn styles(&self) -> &'static str {
        STYLES
    }

    fn template(&self) -> String {
        let status = match &self.status {
            Some(Status::Info(msg)) => format!(r#"<span class="status">{}</span>"#, escape(msg)),
            Some(Status::Error(msg)) => format!(r#"<span class="error">{}</span>"#, escape(msg)),
            None => String::new(),
        };

        format!(
            concat!(
                r#"<span class="copy">© {} userdeck</span> │ "#,
                r#"<span class="key">?</span> help <span class="key">m</span> menu "#,
                r#"<span class="key">q</span> quit │ {}"#
            ),
            self.year, status
        )
    }

    fn on_mount(&mut self, _ctx: &MountContext<'_>) -> Result<()> {
        self.year = Local::now().year();
        Ok(())
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::Status(msg) => self.status = Some(Status::Info(msg.clone())),
            Action::Navigate(target) => {
                self.status = Some(Status::Info(format!("Viewing {}", target)))
            }
            Action::SetLoading(true) => self.status = Some(Status::Info("Loading…".to_string())),
            Action::SetError(Some(err)) => self.status = Some(Status::Error(err.clone())),
            _ => {}
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_footer_shows_latest_status() {
        let mut footer = Footer::new();
        assert!(footer.template().contains(&format!("© {} userdeck", footer.year)));

        footer.update(&Action::Status("Saved <Ada>".to_string())).unwrap();
        assert!(footer.template().contains("Saved &lt;Ada&gt;"));

        footer
            .update(&Action::SetError(Some("directory offline".to_string())))
            .unwrap();
        let template = footer.template();
        assert!(template.contains(r#"<span class="error">directory offline</span>"#));
        assert!(!template.contains("Saved"));
    }

    #[test]
    fn test_navigation_updates_status() {
        let mut footer = Footer::new();
        footer.update(&Action::Navigate("Users".to_string())).unwrap();
        assert!(footer.template().contains("Viewing Users"));
    }
}
