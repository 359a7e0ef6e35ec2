use gloam_engine::backend::{BitmapId, DrawOp, OverlayHandle, RenderBackend};
use gloam_engine::coords::{CanvasPoint, CanvasRect, CanvasSize};
use gloam_engine::error::BackendError;
use gloam_engine::paint::Color;

use crate::symbol::{Direction, Shape, Symbol};

/// Color of the drop shadow behind shadowed text and symbols.
pub const SHADOW_COLOR: Color = Color::BLACK;
/// Offset of the drop shadow from the foreground.
pub const SHADOW_OFFSET: CanvasPoint = CanvasPoint::new(1, 1);

/// Drawing surface passed to [`HudElement::redraw`](crate::element::HudElement::redraw).
///
/// Coordinates are element-local. Each primitive is shifted by the drawing
/// offset, multiplied by the element scale and clipped to the element
/// bounds. Backend failures are kept so the caller can retry the redraw.
pub struct Painter<'a> {
    backend: &'a mut dyn RenderBackend,
    overlay: OverlayHandle,
    size: CanvasSize,
    scale: i32,
    color: Color,
    offset: CanvasPoint,
    error: Option<BackendError>,
}

impl<'a> Painter<'a> {
    pub(crate) fn new(backend: &'a mut dyn RenderBackend, overlay: OverlayHandle, size: CanvasSize, scale: i32) -> Self {
        Self {
            backend,
            overlay,
            size,
            scale: scale.max(1),
            color: Color::WHITE,
            offset: CanvasPoint::ORIGIN,
            error: None,
        }
    }

    /// The first backend error raised while drawing, if any.
    pub(crate) fn finish(self) -> Option<BackendError> {
        self.error
    }

    // ── state ─────────────────────────────────────────────────────────────

    /// Element size, unscaled.
    #[inline]
    pub fn size(&self) -> CanvasSize {
        self.size
    }

    #[inline]
    pub fn set_drawing_color(&mut self, color: Color) {
        self.color = color;
    }

    #[inline]
    pub fn drawing_color(&self) -> Color {
        self.color
    }

    /// Shifts every following primitive by `offset`.
    #[inline]
    pub fn set_drawing_offset(&mut self, offset: CanvasPoint) {
        self.offset = offset;
    }

    #[inline]
    pub fn drawing_offset(&self) -> CanvasPoint {
        self.offset
    }

    // ── metrics ───────────────────────────────────────────────────────────

    pub fn text_size(&self, text: &str) -> CanvasSize {
        self.backend.text_size(text)
    }

    pub fn bitmap_size(&self, bitmap: BitmapId) -> Option<CanvasSize> {
        self.backend.bitmap_size(bitmap)
    }

    pub fn bitmap_frames(&self, bitmap: BitmapId) -> u32 {
        self.backend.bitmap_frames(bitmap)
    }

    // ── primitives ────────────────────────────────────────────────────────

    /// Solid rectangle. `NOCLIP` fills the whole element.
    pub fn fill_area(&mut self, area: CanvasRect) {
        let area = area.resolve(self.size);
        if area.size().is_empty() {
            return;
        }
        let rect = self.to_surface_rect(area);
        self.push(DrawOp::FillRect { rect, color: self.color });
    }

    /// Rectangle outline. `NOCLIP` outlines the whole element.
    pub fn draw_box(&mut self, area: CanvasRect) {
        let area = area.resolve(self.size);
        if area.size().is_empty() {
            return;
        }
        let rect = self.to_surface_rect(area);
        self.push(DrawOp::Rect { rect, color: self.color });
    }

    pub fn draw_line(&mut self, from: CanvasPoint, to: CanvasPoint) {
        let (from, to) = (self.to_surface(from), self.to_surface(to));
        self.push(DrawOp::Line { from, to, color: self.color });
    }

    pub fn draw_text(&mut self, text: &str, position: CanvasPoint) {
        if text.is_empty() {
            return;
        }
        let position = self.to_surface(position);
        self.push(DrawOp::Text { text: text.to_owned(), position, color: self.color });
    }

    /// Text over a black copy shifted by [`SHADOW_OFFSET`].
    pub fn draw_text_shadowed(&mut self, text: &str, position: CanvasPoint) {
        let color = self.color;
        self.color = SHADOW_COLOR;
        self.draw_text(text, position + SHADOW_OFFSET);
        self.color = color;
        self.draw_text(text, position);
    }

    /// One frame of a bitmap. `clip` is in bitmap pixels; `NOCLIP` draws all of it.
    pub fn draw_bitmap(&mut self, bitmap: BitmapId, frame: u32, position: CanvasPoint, clip: CanvasRect) {
        let position = self.to_surface(position);
        self.push(DrawOp::Bitmap { bitmap, frame, position, clip });
    }

    /// A built-in symbol in the current color, optionally over its shadow.
    pub fn draw_symbol(
        &mut self,
        symbol: Symbol,
        size: CanvasSize,
        position: CanvasPoint,
        direction: Direction,
        shadowed: bool,
    ) {
        let shapes = symbol.shapes(size, direction);
        if shadowed {
            let color = self.color;
            self.color = SHADOW_COLOR;
            self.draw_shapes(&shapes, position + SHADOW_OFFSET);
            self.color = color;
        }
        self.draw_shapes(&shapes, position);
    }

    fn draw_shapes(&mut self, shapes: &[Shape], position: CanvasPoint) {
        for shape in shapes {
            match *shape {
                Shape::Line(a, b) => self.draw_line(a + position, b + position),
                Shape::Box(r) => self.draw_box(r + position),
                Shape::Fill(r) => self.fill_area(r + position),
            }
        }
    }

    // ── internals ─────────────────────────────────────────────────────────

    #[inline]
    fn to_surface(&self, p: CanvasPoint) -> CanvasPoint {
        (p + self.offset) * self.scale
    }

    #[inline]
    fn to_surface_rect(&self, r: CanvasRect) -> CanvasRect {
        CanvasRect::from_origin_size(self.to_surface(r.origin()), r.size().scaled(self.scale))
    }

    fn push(&mut self, op: DrawOp) {
        if self.error.is_some() {
            return;
        }
        let clip = CanvasRect::from_size(self.size.scaled(self.scale));
        if let Err(e) = self.backend.draw(self.overlay, op, clip) {
            self.error = Some(e);
        }
    }
}

#[cfg(test)]
mod tests {
    use gloam_engine::backend::RecordingBackend;

    use super::*;

    fn with_painter(scale: i32, f: impl FnOnce(&mut Painter<'_>)) -> Vec<(DrawOp, CanvasRect)> {
        let mut backend = RecordingBackend::new(CanvasSize::new(640, 480));
        let size = CanvasSize::new(40, 20);
        let overlay = backend.create_overlay(size.scaled(scale)).unwrap();
        let mut painter = Painter::new(&mut backend, overlay, size, scale);
        f(&mut painter);
        assert!(painter.finish().is_none());
        backend.surface(overlay).unwrap().ops.clone()
    }

    #[test]
    fn noclip_fills_element() {
        let ops = with_painter(1, |p| {
            p.set_drawing_color(Color::RED);
            p.fill_area(CanvasRect::NOCLIP);
        });
        assert_eq!(
            ops,
            vec![(DrawOp::FillRect { rect: CanvasRect::new(0, 0, 40, 20), color: Color::RED }, CanvasRect::new(0, 0, 40, 20))]
        );
    }

    #[test]
    fn offset_and_scale_apply() {
        let ops = with_painter(2, |p| {
            p.set_drawing_offset(CanvasPoint::new(3, 4));
            p.draw_line(CanvasPoint::ORIGIN, CanvasPoint::new(5, 0));
            p.fill_area(CanvasRect::new(1, 1, 2, 2));
        });
        assert_eq!(ops[0].0, DrawOp::Line { from: CanvasPoint::new(6, 8), to: CanvasPoint::new(16, 8), color: Color::WHITE });
        assert_eq!(ops[1].0, DrawOp::FillRect { rect: CanvasRect::new(8, 10, 4, 4), color: Color::WHITE });
        assert_eq!(ops[1].1, CanvasRect::new(0, 0, 80, 40));
    }

    #[test]
    fn empty_areas_draw_nothing() {
        let ops = with_painter(1, |p| {
            p.fill_area(CanvasRect::new(0, 0, 0, 20));
            p.draw_box(CanvasRect::new(0, 0, 10, 0));
            p.draw_text("", CanvasPoint::ORIGIN);
        });
        assert!(ops.is_empty());
    }

    #[test]
    fn shadowed_text_draws_shadow_first() {
        let ops = with_painter(1, |p| {
            p.set_drawing_color(Color::YELLOW);
            p.draw_text_shadowed("Hi", CanvasPoint::new(2, 2));
        });
        assert_eq!(
            ops.iter().map(|(op, _)| op.clone()).collect::<Vec<_>>(),
            vec![
                DrawOp::Text { text: "Hi".into(), position: CanvasPoint::new(3, 3), color: Color::BLACK },
                DrawOp::Text { text: "Hi".into(), position: CanvasPoint::new(2, 2), color: Color::YELLOW },
            ]
        );
    }

    #[test]
    fn shadowed_symbol_restores_color() {
        let ops = with_painter(1, |p| {
            p.set_drawing_color(Color::GREEN);
            p.draw_symbol(Symbol::Square, CanvasSize::new(8, 8), CanvasPoint::new(4, 0), Direction::None, true);
            assert_eq!(p.drawing_color(), Color::GREEN);
        });
        assert_eq!(ops.len(), 2);
        assert_eq!(ops[0].0, DrawOp::FillRect { rect: CanvasRect::new(5, 1, 8, 8), color: Color::BLACK });
        assert_eq!(ops[1].0, DrawOp::FillRect { rect: CanvasRect::new(4, 0, 8, 8), color: Color::GREEN });
    }

    #[test]
    fn backend_error_is_kept() {
        let mut backend = RecordingBackend::new(CanvasSize::new(640, 480));
        let overlay = backend.create_overlay(CanvasSize::new(10, 10)).unwrap();
        let mut painter = Painter::new(&mut backend, overlay, CanvasSize::new(10, 10), 1);
        painter.draw_bitmap(BitmapId(9), 0, CanvasPoint::ORIGIN, CanvasRect::NOCLIP);
        assert_eq!(painter.finish(), Some(BackendError::UnknownBitmap(9)));
    }
}
