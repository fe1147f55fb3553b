//! Action enum - All possible application actions
//!
//! Actions are discrete operations that the application can perform.
//! Components emit Actions in response to events, and the App processes
//! them and forwards them to every mounted component.

use crate::model::User;
use std::fmt;

/// All possible actions in the application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // ─────────────────────────────────────────────────────────────────────────
    // App Lifecycle
    // ─────────────────────────────────────────────────────────────────────────
    /// Regular tick for time-based updates
    Tick,
    /// Terminal was resized
    Resize(u16, u16),
    /// Quit without confirmation
    ForceQuit,

    // ─────────────────────────────────────────────────────────────────────────
    // Modals
    // ─────────────────────────────────────────────────────────────────────────
    /// Open quit confirmation dialog
    OpenQuitDialog,
    /// Open help dialog showing all keyboard shortcuts
    OpenHelp,
    /// Close the current modal
    CloseModal,

    // ─────────────────────────────────────────────────────────────────────────
    // Navigation
    // ─────────────────────────────────────────────────────────────────────────
    /// Expand or collapse the sidebar menu
    ToggleMenu,
    /// A sidebar link was activated
    Navigate(String),

    // ─────────────────────────────────────────────────────────────────────────
    // Users
    // ─────────────────────────────────────────────────────────────────────────
    /// Ask the data source for a fresh user list
    RefreshUsers,
    /// Loading flag reported by the data source
    SetLoading(bool),
    /// Error reported by the data source
    SetError(Option<String>),
    /// Complete user list delivered by the data source
    RecordsLoaded(Vec<User>),

    // ─────────────────────────────────────────────────────────────────────────
    // Status
    // ─────────────────────────────────────────────────────────────────────────
    /// Show a message in the footer
    Status(String),
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Tick => write!(f, "Tick"),
            Action::Resize(w, h) => write!(f, "Resize({}, {})", w, h),
            Action::ForceQuit => write!(f, "ForceQuit"),
            Action::OpenQuitDialog => write!(f, "OpenQuitDialog"),
            Action::OpenHelp => write!(f, "OpenHelp"),
            Action::CloseModal => write!(f, "CloseModal"),
            Action::ToggleMenu => write!(f, "ToggleMenu"),
            Action::Navigate(target) => write!(f, "Navigate({})", target),
            Action::RefreshUsers => write!(f, "RefreshUsers"),
            Action::SetLoading(loading) => write!(f, "SetLoading({})", loading),
            Action::SetError(Some(msg)) => write!(f, "SetError({})", msg),
            Action::SetError(None) => write!(f, "SetError(None)"),
            Action::RecordsLoaded(users) => write!(f, "RecordsLoaded({} users)", users.len()),
            Action::Status(msg) => write!(f, "Status({})", msg),
        }
    }
}
