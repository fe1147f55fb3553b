//! Component traits - the encapsulated widget model
//!
//! A `Widget` describes a piece of UI: a style sheet (its StyleProvider), a
//! markup template built from its state (its TemplateProvider), and how it
//! reacts to input. `Encapsulated` wraps a widget with the lifecycle every
//! widget shares: it owns an isolated `RenderSurface`, keeps at most one
//! page-level subscription, scopes mouse input to its own surface, and
//! re-renders the whole surface after every handled event.
//!
//! The host only ever talks to the object-safe `Component` trait.

use crate::action::Action;
use crate::config::Config;
use crate::listeners::{GlobalListeners, Subscription};
use crate::markup::MarkupError;
use crate::style::{StyleError, StyleSheet};
use crate::surface::RenderSurface;
use anyhow::Result;
use crossterm::event::{KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{layout::Rect, Frame};
use thiserror::Error;

/// What a component can see while it mounts
#[derive(Debug, Clone, Copy)]
pub struct MountContext<'a> {
    pub listeners: &'a GlobalListeners,
    pub config: &'a Config,
}

#[derive(Debug, Error)]
pub enum ComponentError {
    #[error("<{0}> is not mounted")]
    NotMounted(&'static str),
    #[error("<{tag}> has an invalid style sheet")]
    Style {
        tag: &'static str,
        #[source]
        source: StyleError,
    },
    #[error("<{tag}> produced invalid markup")]
    Markup {
        tag: &'static str,
        #[source]
        source: MarkupError,
    },
}

/// A self-contained piece of UI
pub trait Widget {
    /// Registered tag name
    fn tag(&self) -> &'static str;

    /// Style sheet scoped to this widget's surface
    fn styles(&self) -> &'static str;

    /// Markup for the current state
    fn template(&self) -> String;

    /// Called once when the surface is first allocated
    fn on_mount(&mut self, ctx: &MountContext<'_>) -> Result<()> {
        let _ = ctx;
        Ok(())
    }

    /// Called when the surface moves or changes size
    fn on_layout(&mut self, area: Rect) {
        let _ = area;
    }

    /// Register page-level listeners; the returned handle is held until unmount
    fn subscribe(&mut self, listeners: &GlobalListeners) -> Option<Subscription> {
        let _ = listeners;
        None
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let _ = key;
        Ok(None)
    }

    /// A left click inside the surface, in surface-local coordinates
    fn handle_click(&mut self, column: u16, row: u16) -> Result<Option<Action>> {
        let _ = (column, row);
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        let _ = action;
        Ok(None)
    }

    /// Whether state changed outside of an event handler (e.g. from a
    /// page-level listener) since the last call
    fn take_invalidation(&mut self) -> bool {
        false
    }

    fn preferred_width(&self) -> Option<u16> {
        None
    }

    /// Whether the widget wants every key (e.g. while a form is open)
    fn captures_input(&self) -> bool {
        false
    }
}

/// Host-facing interface of a mounted component
pub trait Component {
    fn tag(&self) -> &'static str;

    /// Allocate the surface, attach handlers and render
    ///
    /// Mounting an already mounted component re-renders it and nothing else.
    fn mount(&mut self, ctx: &MountContext<'_>) -> Result<()>;

    /// Register page-level listeners unless already registered
    fn attach_handlers(&mut self, listeners: &GlobalListeners);

    /// Replace the surface contents from the current state
    fn render(&mut self) -> Result<()>;

    /// Release listeners and the surface
    fn unmount(&mut self);

    fn surface(&self) -> Option<&RenderSurface>;

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>>;

    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<Option<Action>>;

    fn update(&mut self, action: Action) -> Result<Option<Action>>;

    /// Place the surface at `area` and copy it onto the frame
    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()>;

    fn is_mounted(&self) -> bool {
        self.surface().is_some()
    }

    fn preferred_width(&self) -> Option<u16> {
        None
    }

    fn captures_input(&self) -> bool {
        false
    }
}

/// A widget bound to its own surface
pub struct Encapsulated<W> {
    widget: W,
    surface: Option<RenderSurface>,
    subscription: Option<Subscription>,
}

impl<W: Widget> Encapsulated<W> {
    pub fn new(widget: W) -> Self {
        Self {
            widget,
            surface: None,
            subscription: None,
        }
    }

    pub fn widget(&self) -> &W {
        &self.widget
    }

    pub fn widget_mut(&mut self) -> &mut W {
        &mut self.widget
    }

    fn rerender_after<T>(&mut self, outcome: Result<T>) -> Result<T> {
        let value = outcome?;
        if self.surface.is_some() {
            self.render()?;
        }
        Ok(value)
    }
}

impl<W: Widget> Component for Encapsulated<W> {
    fn tag(&self) -> &'static str {
        self.widget.tag()
    }

    fn mount(&mut self, ctx: &MountContext<'_>) -> Result<()> {
        if self.surface.is_none() {
            self.surface = Some(RenderSurface::new(self.widget.tag()));
            self.widget.on_mount(ctx)?;
            tracing::debug!(tag = self.widget.tag(), "mounted");
        }
        self.attach_handlers(ctx.listeners);
        self.render()
    }

    fn attach_handlers(&mut self, listeners: &GlobalListeners) {
        if self.subscription.is_none() {
            self.subscription = self.widget.subscribe(listeners);
        }
    }

    fn render(&mut self) -> Result<()> {
        let tag = self.widget.tag();
        let surface = self
            .surface
            .as_mut()
            .ok_or(ComponentError::NotMounted(tag))?;

        let sheet = StyleSheet::parse(self.widget.styles())
            .map_err(|source| ComponentError::Style { tag, source })?;
        let template = self.widget.template();
        surface
            .replace(&sheet, &template)
            .map_err(|source| ComponentError::Markup { tag, source })?;
        Ok(())
    }

    fn unmount(&mut self) {
        if self.surface.is_some() {
            tracing::debug!(tag = self.widget.tag(), "unmounted");
        }
        self.subscription = None;
        self.surface = None;
    }

    fn surface(&self) -> Option<&RenderSurface> {
        self.surface.as_ref()
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let outcome = self.widget.handle_key_event(key);
        self.rerender_after(outcome)
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return Ok(None);
        }
        let Some(area) = self
            .surface
            .as_ref()
            .filter(|s| s.contains(mouse.column, mouse.row))
            .map(RenderSurface::area)
        else {
            return Ok(None);
        };

        let outcome = self
            .widget
            .handle_click(mouse.column - area.x, mouse.row - area.y);
        self.rerender_after(outcome)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        let is_tick = action == Action::Tick;
        let outcome = self.widget.update(&action);
        if is_tick {
            return outcome;
        }
        self.rerender_after(outcome)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let tag = self.widget.tag();
        let surface = self
            .surface
            .as_mut()
            .ok_or(ComponentError::NotMounted(tag))?;

        let resized = surface.resize(area);
        if resized {
            self.widget.on_layout(area);
        }
        if resized | self.widget.take_invalidation() {
            self.render()?;
        }
        if let Some(surface) = &self.surface {
            surface.blit(frame.buffer_mut());
        }
        Ok(())
    }

    fn preferred_width(&self) -> Option<u16> {
        self.widget.preferred_width()
    }

    fn captures_input(&self) -> bool {
        self.widget.captures_input()
    }
}
