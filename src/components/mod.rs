//! UI Components
//!
//! Each widget encapsulates its own state, styles, markup and event handling.
//! Widgets are registered by tag and created through the registry.

pub mod footer;
pub mod help_dialog;
pub mod layout;
pub mod quit_dialog;
pub mod sidebar;
pub mod users_panel;

pub use footer::Footer;
pub use help_dialog::HelpDialog;
pub use layout::{calculate_main_layout, centered_popup, fit_width};
pub use quit_dialog::QuitDialog;
pub use sidebar::{MenuState, Sidebar};
pub use users_panel::UsersPanel;

use crate::component::{Component, Encapsulated};
use crate::registry::{self, RegistryError};

fn new_sidebar() -> Box<dyn Component> {
    Box::new(Encapsulated::new(Sidebar::new()))
}

fn new_footer() -> Box<dyn Component> {
    Box::new(Encapsulated::new(Footer::new()))
}

fn new_users_panel() -> Box<dyn Component> {
    Box::new(Encapsulated::new(UsersPanel::new()))
}

fn new_quit_dialog() -> Box<dyn Component> {
    Box::new(Encapsulated::new(QuitDialog))
}

fn new_help_dialog() -> Box<dyn Component> {
    Box::new(Encapsulated::new(HelpDialog::default()))
}

/// Define every built-in widget; safe to call more than once
pub fn register_all() -> Result<(), RegistryError> {
    registry::define(sidebar::TAG, new_sidebar)?;
    registry::define(footer::TAG, new_footer)?;
    registry::define(users_panel::TAG, new_users_panel)?;
    registry::define(quit_dialog::TAG, new_quit_dialog)?;
    registry::define(help_dialog::TAG, new_help_dialog)?;
    Ok(())
}
