//! Sidebar navigation menu
//!
//! A collapsible menu. The toggle control on the first row switches between
//! collapsed (icons only) and expanded (icons and labels). On narrow
//! viewports an expanded menu also collapses when the user clicks anywhere
//! outside it.

use crate::action::Action;
use crate::component::{MountContext, Widget};
use crate::config::DEFAULT_BREAKPOINT;
use crate::listeners::{GlobalListeners, GlobalSignal, Subscription};
use anyhow::Result;
use ratatui::layout::{Position, Rect};
use std::cell::Cell;
use std::rc::Rc;

pub const TAG: &str = "app-sidebar";

pub const COLLAPSED_WIDTH: u16 = 7;
pub const EXPANDED_WIDTH: u16 = 24;

/// Surface rows (inside the border) holding the toggle and the first link
const TOGGLE_ROW: u16 = 1;
const FIRST_LINK_ROW: u16 = 3;

const LINKS: [(&str, &str); 3] = [("◆", "Dashboard"), ("●", "Users"), ("⚙", "Settings")];

const STYLES: &str = r#"
:host { border: plain; border-color: dark-gray; padding: 1; }
.toggle { color: cyan; font-weight: bold; }
.brand { color: white; font-weight: bold; }
.link { color: gray; }
.active { color: cyan; font-weight: bold; }
"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuState {
    Collapsed,
    Expanded,
}

impl MenuState {
    pub fn toggled(self) -> Self {
        match self {
            MenuState::Collapsed => MenuState::Expanded,
            MenuState::Expanded => MenuState::Collapsed,
        }
    }
}

pub struct Sidebar {
    menu: Rc<Cell<MenuState>>,
    /// Where the surface currently sits on the page
    bounds: Rc<Cell<Rect>>,
    invalidated: Rc<Cell<bool>>,
    breakpoint: u16,
    active_link: usize,
}

impl Default for Sidebar {
    fn default() -> Self {
        Self::new()
    }
}

impl Sidebar {
    pub fn new() -> Self {
        Self {
            menu: Rc::new(Cell::new(MenuState::Collapsed)),
            bounds: Rc::new(Cell::new(Rect::default())),
            invalidated: Rc::new(Cell::new(false)),
            breakpoint: DEFAULT_BREAKPOINT,
            active_link: 1,
        }
    }

    pub fn menu_state(&self) -> MenuState {
        self.menu.get()
    }

    pub fn toggle(&mut self) {
        self.menu.set(self.menu.get().toggled());
    }

    pub fn active_link(&self) -> &'static str {
        LINKS[self.active_link].1
    }
}

impl Widget for Sidebar {
    fn tag(&self) -> &'static str {
        TAG
    }

    fn styles(&self) -> &'static str {
        STYLES
    }

    fn template(&self) -> String {
        let expanded = self.menu.get() == MenuState::Expanded;
        let mut lines = Vec::with_capacity(LINKS.len() + 2);

        if expanded {
            lines.push(r#"<span class="toggle">≡</span> <span class="brand">userdeck</span>"#.to_string());
        } else {
            lines.push(r#"<span class="toggle">≡</span>"#.to_string());
        }
        lines.push(String::new());

        for (i, (icon, label)) in LINKS.iter().enumerate() {
            let class = if i == self.active_link { "link active" } else { "link" };
            let text = if expanded {
                format!("{} {}", icon, label)
            } else {
                icon.to_string()
            };
            lines.push(format!(r#"<span class="{}">{}</span>"#, class, text));
        }

        lines.join("\n")
    }

    fn on_mount(&mut self, ctx: &MountContext<'_>) -> Result<()> {
        self.breakpoint = ctx.config.sidebar_breakpoint;
        Ok(())
    }

    fn on_layout(&mut self, area: Rect) {
        self.bounds.set(area);
    }

    fn subscribe(&mut self, listeners: &GlobalListeners) -> Option<Subscription> {
        let menu = Rc::clone(&self.menu);
        let bounds = Rc::clone(&self.bounds);
        let invalidated = Rc::clone(&self.invalidated);
        let breakpoint = self.breakpoint;

        Some(listeners.subscribe(move |signal| {
            let GlobalSignal::PointerDown {
                column,
                row,
                viewport_width,
            } = *signal;

            let outside = !bounds.get().contains(Position::new(column, row));
            if menu.get() == MenuState::Expanded && viewport_width <= breakpoint && outside {
                tracing::debug!(viewport_width, "outside click collapsed sidebar");
                menu.set(MenuState::Collapsed);
                invalidated.set(true);
            }
        }))
    }

    fn handle_click(&mut self, _column: u16, row: u16) -> Result<Option<Action>> {
        if row == TOGGLE_ROW {
            self.toggle();
            return Ok(None);
        }

        let index = row.checked_sub(FIRST_LINK_ROW).map(usize::from);
        match index {
            Some(i) if i < LINKS.len() => {
                self.active_link = i;
                Ok(Some(Action::Navigate(LINKS[i].1.to_string())))
            }
            _ => Ok(None),
        }
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        if *action == Action::ToggleMenu {
            self.toggle();
        }
        Ok(None)
    }

    fn take_invalidation(&mut self) -> bool {
        self.invalidated.replace(false)
    }

    fn preferred_width(&self) -> Option<u16> {
        Some(match self.menu.get() {
            MenuState::Collapsed => COLLAPSED_WIDTH,
            MenuState::Expanded => EXPANDED_WIDTH,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{Component, Encapsulated};
    use crate::config::Config;
    use crossterm::event::{KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
    use ratatui::{backend::TestBackend, Terminal};

    fn press(column: u16, viewport_width: u16) -> GlobalSignal {
        GlobalSignal::PointerDown {
            column,
            row: 2,
            viewport_width,
        }
    }

    fn mounted(listeners: &GlobalListeners) -> Encapsulated<Sidebar> {
        let config = Config::default();
        let mut sidebar = Encapsulated::new(Sidebar::new());
        sidebar
            .mount(&MountContext {
                listeners,
                config: &config,
            })
            .unwrap();

        let mut terminal = Terminal::new(TestBackend::new(100, 10)).unwrap();
        terminal
            .draw(|frame| {
                sidebar
                    .draw(frame, Rect::new(0, 0, EXPANDED_WIDTH, 10))
                    .unwrap()
            })
            .unwrap();
        sidebar
    }

    #[test]
    fn test_starts_collapsed_and_toggles() {
        let mut sidebar = Sidebar::new();
        assert_eq!(sidebar.menu_state(), MenuState::Collapsed);

        sidebar.update(&Action::ToggleMenu).unwrap();
        assert_eq!(sidebar.menu_state(), MenuState::Expanded);
        assert_eq!(sidebar.preferred_width(), Some(EXPANDED_WIDTH));

        sidebar.update(&Action::ToggleMenu).unwrap();
        assert_eq!(sidebar.menu_state(), MenuState::Collapsed);
        assert_eq!(sidebar.preferred_width(), Some(COLLAPSED_WIDTH));
    }

    #[test]
    fn test_outside_click_collapses_on_narrow_viewport() {
        let listeners = GlobalListeners::new();
        let mut sidebar = mounted(&listeners);
        sidebar.widget_mut().toggle();

        listeners.dispatch(&press(60, 768));

        assert_eq!(sidebar.widget().menu_state(), MenuState::Collapsed);
        assert!(sidebar.widget_mut().take_invalidation());
        assert!(!sidebar.widget_mut().take_invalidation());
    }

    #[test]
    fn test_outside_click_ignored_on_wide_viewport() {
        let listeners = GlobalListeners::new();
        let mut sidebar = mounted(&listeners);
        sidebar.widget_mut().toggle();

        listeners.dispatch(&press(60, 769));

        assert_eq!(sidebar.widget().menu_state(), MenuState::Expanded);
    }

    #[test]
    fn test_inside_click_does_not_collapse() {
        let listeners = GlobalListeners::new();
        let mut sidebar = mounted(&listeners);
        sidebar.widget_mut().toggle();

        listeners.dispatch(&press(3, 80));

        assert_eq!(sidebar.widget().menu_state(), MenuState::Expanded);
    }

    #[test]
    fn test_toggle_control_and_links() {
        let listeners = GlobalListeners::new();
        let mut sidebar = mounted(&listeners);
        let click = |row| MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 2,
            row,
            modifiers: KeyModifiers::NONE,
        };

        sidebar.handle_mouse_event(click(TOGGLE_ROW)).unwrap();
        assert_eq!(sidebar.widget().menu_state(), MenuState::Expanded);
        assert!(sidebar.surface().unwrap().text()[1].contains("userdeck"));

        let action = sidebar.handle_mouse_event(click(FIRST_LINK_ROW + 2)).unwrap();
        assert_eq!(action, Some(Action::Navigate("Settings".to_string())));
        assert_eq!(sidebar.widget().active_link(), "Settings");
    }

    #[test]
    fn test_unmount_releases_outside_click_listener() {
        let listeners = GlobalListeners::new();
        let mut sidebar = mounted(&listeners);
        assert_eq!(listeners.len(), 1);

        sidebar.unmount();
        assert!(listeners.is_empty());
    }
}
