//! Root application - the host page
//!
//! The App owns the page-level components (sidebar, content, footer) and the
//! modal dialogs, all created by tag through the registry. It routes input,
//! feeds the page-wide listeners, talks to the user directory and forwards
//! every action to the page components. It contains no widget logic itself.

use crate::action::Action;
use crate::component::{Component, MountContext};
use crate::components::{
    self, calculate_main_layout, centered_popup, footer, help_dialog, quit_dialog, sidebar,
    users_panel,
};
use crate::config::Config;
use crate::listeners::{GlobalListeners, GlobalSignal};
use crate::model::{Modal, ModalStack};
use crate::registry;
use crate::services::UserDirectory;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{widgets::Clear, Frame};
use std::collections::VecDeque;

/// Main application state - coordinates between components
pub struct App {
    pub config: Config,

    /// Flag to indicate the app should quit
    pub should_quit: bool,

    /// Modal overlay stack
    pub modals: ModalStack,

    listeners: GlobalListeners,

    /// User data source
    directory: UserDirectory,

    /// A refresh was requested and runs on the next tick
    pending_fetch: bool,

    /// Actions waiting to be processed
    queue: VecDeque<Action>,

    /// Width of the page in columns
    viewport_width: u16,

    // ─────────────────────────────────────────────────────────────────────────
    // Child Components
    // ─────────────────────────────────────────────────────────────────────────
    sidebar: Box<dyn Component>,
    content: Box<dyn Component>,
    footer: Box<dyn Component>,
    quit_dialog: Box<dyn Component>,
    help_dialog: Box<dyn Component>,
}

impl App {
    pub fn new(config: Config) -> Result<App> {
        components::register_all()?;

        Ok(App {
            directory: UserDirectory::from_config(&config),
            config,
            should_quit: false,
            modals: ModalStack::new(),
            listeners: GlobalListeners::new(),
            pending_fetch: false,
            queue: VecDeque::new(),
            viewport_width: 0,
            sidebar: registry::create(sidebar::TAG)?,
            content: registry::create(users_panel::TAG)?,
            footer: registry::create(footer::TAG)?,
            quit_dialog: registry::create(quit_dialog::TAG)?,
            help_dialog: registry::create(help_dialog::TAG)?,
        })
    }

    /// Mount the page and request the first user list
    pub fn init(&mut self) -> Result<()> {
        let ctx = MountContext {
            listeners: &self.listeners,
            config: &self.config,
        };
        self.sidebar.mount(&ctx)?;
        self.content.mount(&ctx)?;
        self.footer.mount(&ctx)?;
        tracing::info!(listeners = self.listeners.len(), "page mounted");

        self.dispatch(Action::RefreshUsers)
    }

    /// Process `action` and every follow-up it produces
    pub fn dispatch(&mut self, action: Action) -> Result<()> {
        self.queue.push_back(action);
        while let Some(action) = self.queue.pop_front() {
            if action != Action::Tick {
                tracing::trace!(%action, "dispatch");
            }
            self.update(action)?;
        }
        Ok(())
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Ok(Some(Action::ForceQuit));
        }

        match self.modals.top().copied() {
            Some(Modal::QuitConfirm) => return self.quit_dialog.handle_key_event(key),
            Some(Modal::Help) => return self.help_dialog.handle_key_event(key),
            None => {}
        }

        if self.content.captures_input() {
            return self.content.handle_key_event(key);
        }

        let action = match key.code {
            KeyCode::Char('q') => Some(Action::OpenQuitDialog),
            KeyCode::Char('?') => Some(Action::OpenHelp),
            KeyCode::Char('m') => Some(Action::ToggleMenu),
            _ => return self.content.handle_key_event(key),
        };
        Ok(action)
    }

    pub fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return Ok(None);
        }

        // An open modal owns every press; the page behind it sees nothing
        match self.modals.top().copied() {
            Some(Modal::QuitConfirm) => return self.quit_dialog.handle_mouse_event(mouse),
            Some(Modal::Help) => return self.help_dialog.handle_mouse_event(mouse),
            None => {}
        }

        // Page-wide listeners see every press before any component does
        self.listeners.dispatch(&GlobalSignal::PointerDown {
            column: mouse.column,
            row: mouse.row,
            viewport_width: self.viewport_width,
        });

        for component in [&mut self.sidebar, &mut self.content, &mut self.footer] {
            if let Some(action) = component.handle_mouse_event(mouse)? {
                return Ok(Some(action));
            }
        }
        Ok(None)
    }

    /// Apply one action; follow-ups are queued
    fn update(&mut self, action: Action) -> Result<()> {
        match &action {
            Action::Tick => {
                if let Some(result) = self.run_pending_fetch() {
                    self.queue.push_back(result);
                }
            }
            Action::Resize(width, _) => {
                self.viewport_width = *width;
            }
            Action::ForceQuit => {
                self.should_quit = true;
                self.unmount_all();
                return Ok(());
            }
            Action::OpenQuitDialog => self.open_modal(Modal::QuitConfirm)?,
            Action::OpenHelp => self.open_modal(Modal::Help)?,
            Action::CloseModal => self.close_modal(),
            Action::RefreshUsers => {
                self.pending_fetch = true;
                self.queue.push_back(Action::SetLoading(true));
            }
            _ => {}
        }

        for component in [&mut self.sidebar, &mut self.content, &mut self.footer] {
            if !component.is_mounted() {
                continue;
            }
            if let Some(next) = component.update(action.clone())? {
                self.queue.push_back(next);
            }
        }
        Ok(())
    }

    fn run_pending_fetch(&mut self) -> Option<Action> {
        if !std::mem::take(&mut self.pending_fetch) {
            return None;
        }
        match self.directory.fetch() {
            Ok(users) => Some(Action::RecordsLoaded(users)),
            Err(err) => {
                tracing::warn!(error = %format!("{:#}", err), "user fetch failed");
                Some(Action::SetError(Some(format!("{:#}", err))))
            }
        }
    }

    fn open_modal(&mut self, modal: Modal) -> Result<()> {
        let ctx = MountContext {
            listeners: &self.listeners,
            config: &self.config,
        };
        match modal {
            Modal::QuitConfirm => self.quit_dialog.mount(&ctx)?,
            Modal::Help => self.help_dialog.mount(&ctx)?,
        }
        self.modals.push(modal);
        Ok(())
    }

    fn close_modal(&mut self) {
        match self.modals.pop() {
            Some(Modal::QuitConfirm) => self.quit_dialog.unmount(),
            Some(Modal::Help) => self.help_dialog.unmount(),
            None => {}
        }
    }

    fn unmount_all(&mut self) {
        while !self.modals.is_empty() {
            self.close_modal();
        }
        self.sidebar.unmount();
        self.content.unmount();
        self.footer.unmount();
    }

    pub fn draw(&mut self, frame: &mut Frame) -> Result<()> {
        let area = frame.area();
        self.viewport_width = area.width;

        let sidebar_width = self
            .sidebar
            .preferred_width()
            .unwrap_or(sidebar::COLLAPSED_WIDTH);
        let layout = calculate_main_layout(area, sidebar_width);

        self.sidebar.draw(frame, layout.sidebar)?;
        self.content.draw(frame, layout.content)?;
        self.footer.draw(frame, layout.footer)?;

        let modals: Vec<Modal> = self.modals.iter().copied().collect();
        for modal in modals {
            let (dialog, width, height) = match modal {
                Modal::QuitConfirm => (
                    &mut self.quit_dialog,
                    quit_dialog::WIDTH,
                    quit_dialog::HEIGHT,
                ),
                Modal::Help => (
                    &mut self.help_dialog,
                    help_dialog::WIDTH,
                    help_dialog::HEIGHT,
                ),
            };
            let popup = centered_popup(area, width, height);
            frame.render_widget(Clear, popup);
            dialog.draw(frame, popup)?;
        }
        Ok(())
    }
}
