//! Isolated render surfaces
//!
//! A `RenderSurface` is the private drawing area of one component instance.
//! It owns its own cell buffer: rendering never touches the host frame, and
//! the host never draws into the surface. The host only copies the finished
//! buffer over the surface's area when drawing.

use crate::markup::{self, MarkupError};
use crate::style::StyleSheet;
use ratatui::{
    buffer::Buffer,
    layout::{Position, Rect},
    style::Style,
    widgets::{Block, Borders, Padding, Paragraph, Widget},
};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_SURFACE_ID: AtomicU64 = AtomicU64::new(1);

/// Unique identity of a surface for the life of the process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceId(u64);

#[derive(Debug)]
pub struct RenderSurface {
    id: SurfaceId,
    owner: &'static str,
    area: Rect,
    buffer: Buffer,
    generation: u64,
}

impl RenderSurface {
    pub fn new(owner: &'static str) -> Self {
        Self {
            id: SurfaceId(NEXT_SURFACE_ID.fetch_add(1, Ordering::Relaxed)),
            owner,
            area: Rect::default(),
            buffer: Buffer::empty(Rect::default()),
            generation: 0,
        }
    }

    pub fn id(&self) -> SurfaceId {
        self.id
    }

    pub fn owner(&self) -> &'static str {
        self.owner
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    /// Number of completed renders
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    pub fn contains(&self, column: u16, row: u16) -> bool {
        self.area.contains(Position::new(column, row))
    }

    /// Move the surface, returning whether its area changed
    pub fn resize(&mut self, area: Rect) -> bool {
        if self.area == area {
            return false;
        }
        self.area = area;
        true
    }

    /// Replace the entire contents of the surface
    ///
    /// The new contents are drawn into a fresh buffer which is swapped in only
    /// once complete, so a failed render leaves the previous contents intact.
    pub fn replace(&mut self, sheet: &StyleSheet, template: &str) -> Result<(), MarkupError> {
        let area = self.area;
        let host = sheet.host();
        let mut buffer = Buffer::empty(area);

        let mut block = Block::default()
            .style(host.style)
            .padding(Padding::horizontal(host.padding));
        if let Some(border) = host.border {
            let border_style = host
                .border_color
                .map(|color| Style::default().fg(color))
                .unwrap_or_default();
            block = block
                .borders(Borders::ALL)
                .border_type(border)
                .border_style(border_style);
        }

        let inner = block.inner(area);
        let markup = markup::parse(template, sheet, inner.width)?;
        if let Some(title) = markup.title {
            block = block.title(format!(" {} ", title));
        }

        block.render(area, &mut buffer);
        Paragraph::new(markup.lines)
            .style(host.style)
            .render(inner, &mut buffer);

        self.buffer = buffer;
        self.generation += 1;
        Ok(())
    }

    /// Copy the surface onto `target`, overwriting every cell it covers
    pub fn blit(&self, target: &mut Buffer) {
        let visible = self.area.intersection(target.area);
        for y in visible.top()..visible.bottom() {
            for x in visible.left()..visible.right() {
                if let (Some(src), Some(dst)) = (self.buffer.cell((x, y)), target.cell_mut((x, y))) {
                    *dst = src.clone();
                }
            }
        }
    }

    /// Rendered text, one string per row
    pub fn text(&self) -> Vec<String> {
        let area = self.buffer.area;
        (area.top()..area.bottom())
            .map(|y| {
                (area.left()..area.right())
                    .filter_map(|x| self.buffer.cell((x, y)).map(|c| c.symbol().to_string()))
                    .collect::<String>()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::Color;

    const SHEET: &str = ":host { border: plain; color: white; } .name { color: green; }";

    fn surface(area: Rect) -> RenderSurface {
        let mut surface = RenderSurface::new("test-surface");
        surface.resize(area);
        surface
    }

    #[test]
    fn test_surface_ids_are_unique() {
        let a = RenderSurface::new("a-b");
        let b = RenderSurface::new("a-b");
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_replace_draws_border_title_and_text() {
        let mut surface = surface(Rect::new(0, 0, 12, 3));
        let sheet = StyleSheet::parse(SHEET).unwrap();
        surface
            .replace(&sheet, "<title>T</title>\n<span class=\"name\">Ada</span>")
            .unwrap();

        let text = surface.text();
        assert_eq!(text[0], "┌ T ───────┐");
        assert_eq!(text[1], "│Ada       │");
        assert_eq!(surface.generation(), 1);

        let cell = surface.buffer().cell((1, 1)).unwrap();
        assert_eq!(cell.fg, Color::Green);
    }

    #[test]
    fn test_replace_is_a_full_replace() {
        let mut surface = surface(Rect::new(0, 0, 10, 2));
        let sheet = StyleSheet::parse(".x { color: red; }").unwrap();
        surface.replace(&sheet, "long line here\nsecond").unwrap();
        surface.replace(&sheet, "ab").unwrap();

        assert_eq!(surface.text(), vec!["ab        ", "          "]);
        assert_eq!(surface.generation(), 2);
    }

    #[test]
    fn test_failed_render_keeps_previous_contents() {
        let mut surface = surface(Rect::new(0, 0, 6, 1));
        let sheet = StyleSheet::default();
        surface.replace(&sheet, "hello").unwrap();

        assert!(surface.replace(&sheet, "<b>bad</b>").is_err());
        assert_eq!(surface.text(), vec!["hello "]);
        assert_eq!(surface.generation(), 1);
    }

    #[test]
    fn test_blit_only_touches_surface_area() {
        let mut surface = surface(Rect::new(2, 1, 3, 1));
        surface.replace(&StyleSheet::default(), "abc").unwrap();

        let mut host = Buffer::empty(Rect::new(0, 0, 6, 3));
        for y in 0..3 {
            host.set_string(0, y, "######", Style::default().fg(Color::Red));
        }
        surface.blit(&mut host);

        assert_eq!(host.cell((2, 1)).unwrap().symbol(), "a");
        assert_eq!(host.cell((2, 1)).unwrap().fg, Color::Reset);
        assert_eq!(host.cell((1, 1)).unwrap().symbol(), "#");
        assert_eq!(host.cell((5, 1)).unwrap().symbol(), "#");
        assert_eq!(host.cell((2, 0)).unwrap().fg, Color::Red);
    }

    #[test]
    fn test_resize_reports_changes() {
        let mut surface = RenderSurface::new("x-y");
        assert!(surface.resize(Rect::new(0, 0, 4, 4)));
        assert!(!surface.resize(Rect::new(0, 0, 4, 4)));
        assert!(surface.contains(3, 3));
        assert!(!surface.contains(4, 0));
    }
}
