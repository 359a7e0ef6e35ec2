use gloam_engine::backend::{OverlayHandle, RenderBackend};
use gloam_engine::coords::{CanvasPoint, CanvasSize};
use gloam_engine::ids::ObjectId;

use crate::ctx::HudCtx;
use crate::painter::Painter;

// ── ElementCore ───────────────────────────────────────────────────────────

/// State every HUD element carries: geometry, draw flags and the overlay
/// surface it owns.
#[derive(Debug)]
pub struct ElementCore {
    host: ObjectId,
    overlay: Option<OverlayHandle>,
    /// Surface size the overlay was last allocated at.
    overlay_size: CanvasSize,
    draw: bool,
    redraw: bool,
    drawing: bool,
    initialized: bool,
    position: CanvasPoint,
    size: CanvasSize,
    scale: i32,
    opacity: u8,
    subscriptions: Vec<String>,
}

impl ElementCore {
    pub fn new(host: ObjectId) -> Self {
        Self {
            host,
            overlay: None,
            overlay_size: CanvasSize::ZERO,
            draw: false,
            redraw: true,
            drawing: false,
            initialized: false,
            position: CanvasPoint::OFFSCREEN,
            size: CanvasSize::ZERO,
            scale: 1,
            opacity: u8::MAX,
            subscriptions: Vec::new(),
        }
    }

    #[inline]
    pub fn host(&self) -> ObjectId {
        self.host
    }

    #[inline]
    pub fn overlay(&self) -> Option<OverlayHandle> {
        self.overlay
    }

    /// Whether the last `prepare` allowed drawing.
    #[inline]
    pub fn is_drawn(&self) -> bool {
        self.draw
    }

    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// True only inside [`HudElement::redraw`].
    #[inline]
    pub fn is_drawing(&self) -> bool {
        self.drawing
    }

    #[inline]
    pub fn needs_redraw(&self) -> bool {
        self.redraw
    }

    #[inline]
    pub fn schedule_redraw(&mut self) {
        self.redraw = true;
    }

    // ── geometry ──────────────────────────────────────────────────────────

    #[inline]
    pub fn position(&self) -> CanvasPoint {
        self.position
    }

    /// Moves the element. Moving only re-composites; content is kept.
    #[inline]
    pub fn set_position(&mut self, position: CanvasPoint) {
        self.position = position;
    }

    #[inline]
    pub fn size(&self) -> CanvasSize {
        self.size
    }

    /// Resizes the element; a change schedules a redraw.
    pub fn set_size(&mut self, size: CanvasSize) {
        let size = size.clamped();
        if size != self.size {
            self.size = size;
            self.redraw = true;
        }
    }

    #[inline]
    pub fn scale(&self) -> i32 {
        self.scale
    }

    /// Integer pixel scale; values below 1 are treated as 1.
    pub fn set_scale(&mut self, scale: i32) {
        let scale = scale.max(1);
        if scale != self.scale {
            self.scale = scale;
            self.redraw = true;
        }
    }

    #[inline]
    pub fn opacity(&self) -> u8 {
        self.opacity
    }

    #[inline]
    pub fn set_opacity(&mut self, opacity: u8) {
        self.opacity = opacity;
    }

    // ── subscriptions ─────────────────────────────────────────────────────

    /// Asks for `on_property_changed` when `property` changes on the host.
    pub fn subscribe_property(&mut self, property: &str) {
        if !self.is_subscribed(property) {
            self.subscriptions.push(property.to_owned());
        }
    }

    pub fn is_subscribed(&self, property: &str) -> bool {
        self.subscriptions.iter().any(|p| p.eq_ignore_ascii_case(property))
    }

    // ── lifecycle ─────────────────────────────────────────────────────────

    pub(crate) fn set_drawn(&mut self, draw: bool) {
        self.draw = draw;
    }

    pub(crate) fn mark_initialized(&mut self) {
        self.initialized = true;
        self.redraw = true;
    }

    /// Frees the overlay and drops subscriptions. Safe to call repeatedly.
    pub fn deinitialize(&mut self, backend: &mut dyn RenderBackend) {
        if let Some(overlay) = self.overlay.take() {
            backend.free_overlay(overlay);
        }
        self.overlay_size = CanvasSize::ZERO;
        self.subscriptions.clear();
        self.draw = false;
        self.initialized = false;
    }
}

// ── HudElement trait ──────────────────────────────────────────────────────

/// One independently drawn HUD visual.
///
/// Each frame the scene calls [`prepare`](Self::prepare); when it returns
/// `true` the element is rendered into its overlay (calling
/// [`redraw`](Self::redraw) only when a redraw is pending) and composited
/// at its position.
pub trait HudElement: 'static {
    fn core(&self) -> &ElementCore;
    fn core_mut(&mut self) -> &mut ElementCore;

    /// Called once when the element joins a scene.
    fn initialize(&mut self, _ctx: &mut HudCtx<'_>) {}

    /// Called when the element leaves a scene, before its overlay is freed.
    fn deinitialize(&mut self, _ctx: &mut HudCtx<'_>) {}

    /// Decides visibility and geometry for this frame. Return `false` to skip drawing.
    fn prepare(&mut self, ctx: &mut HudCtx<'_>) -> bool;

    /// Issues the element's primitives. Only called while a redraw is pending.
    fn redraw(&mut self, painter: &mut Painter<'_>);

    /// A subscribed property changed on the host.
    fn on_property_changed(&mut self, _property: &str, _ctx: &mut HudCtx<'_>) {}

    /// A named message for the host. Return `true` if it was handled.
    fn on_message(&mut self, _message: &str, _ctx: &mut HudCtx<'_>) -> bool {
        false
    }

    /// Runs after each simulation step.
    fn on_post_sim(&mut self, _ctx: &mut HudCtx<'_>) {}
}

// ── draw stages ───────────────────────────────────────────────────────────

/// Stage 1: keeps the overlay allocated at `size * scale` and redraws it
/// when needed. Backend failures skip the frame and leave the redraw pending.
pub(crate) fn render_surface(element: &mut dyn HudElement, backend: &mut dyn RenderBackend) {
    let core = element.core_mut();
    if !core.draw {
        return;
    }
    let surface = core.size.scaled(core.scale);
    if surface.is_empty() {
        return;
    }

    let overlay = match core.overlay {
        Some(overlay) if core.overlay_size == surface => overlay,
        Some(overlay) => match backend.resize_overlay(overlay, surface) {
            Ok(()) => {
                core.overlay_size = surface;
                core.redraw = true;
                overlay
            }
            Err(e) => {
                log::debug!("{}: overlay resize failed: {e}", core.host);
                return;
            }
        },
        None => match backend.create_overlay(surface) {
            Ok(overlay) => {
                core.overlay = Some(overlay);
                core.overlay_size = surface;
                core.redraw = true;
                overlay
            }
            Err(e) => {
                log::debug!("{}: overlay allocation failed: {e}", core.host);
                return;
            }
        },
    };

    if !core.redraw {
        return;
    }
    if let Err(e) = backend.clear_overlay(overlay) {
        log::debug!("{}: overlay clear failed: {e}", core.host);
        return;
    }

    let (host, size, scale) = (core.host, core.size, core.scale);
    core.drawing = true;
    let mut painter = Painter::new(backend, overlay, size, scale);
    element.redraw(&mut painter);
    let failure = painter.finish();

    let core = element.core_mut();
    core.drawing = false;
    match failure {
        None => core.redraw = false,
        Some(e) => log::debug!("{host}: redraw failed, retrying next frame: {e}"),
    }
}

/// Stage 2: composites the overlay at the element position. An element
/// whose surface is empty shows nothing, even if an older overlay survives.
pub(crate) fn composite(element: &dyn HudElement, backend: &mut dyn RenderBackend) {
    let core = element.core();
    if !core.draw || core.position.is_offscreen() || core.size.scaled(core.scale).is_empty() {
        return;
    }
    let Some(overlay) = core.overlay else {
        return;
    };
    if let Err(e) = backend.blit_overlay(overlay, core.position, core.opacity) {
        log::debug!("{}: blit failed: {e}", core.host);
    }
}

#[cfg(test)]
mod tests {
    use gloam_engine::backend::{DrawOp, RecordingBackend};
    use gloam_engine::coords::CanvasRect;
    use gloam_engine::paint::Color;

    use super::*;

    struct Block {
        core: ElementCore,
        redraws: u32,
    }

    impl Block {
        fn new() -> Self {
            let mut core = ElementCore::new(ObjectId(1));
            core.draw = true;
            core.set_size(CanvasSize::new(10, 4));
            core.set_position(CanvasPoint::new(5, 5));
            Self { core, redraws: 0 }
        }
    }

    impl HudElement for Block {
        fn core(&self) -> &ElementCore {
            &self.core
        }
        fn core_mut(&mut self) -> &mut ElementCore {
            &mut self.core
        }
        fn prepare(&mut self, _ctx: &mut HudCtx<'_>) -> bool {
            true
        }
        fn redraw(&mut self, painter: &mut Painter<'_>) {
            self.redraws += 1;
            painter.set_drawing_color(Color::RED);
            painter.fill_area(CanvasRect::NOCLIP);
        }
    }

    fn backend() -> RecordingBackend {
        RecordingBackend::new(CanvasSize::new(320, 200))
    }

    #[test]
    fn redraws_once_per_pending_redraw() {
        let mut backend = backend();
        let mut block = Block::new();

        render_surface(&mut block, &mut backend);
        render_surface(&mut block, &mut backend);
        assert_eq!(block.redraws, 1);
        assert!(!block.core.needs_redraw());

        block.core.schedule_redraw();
        render_surface(&mut block, &mut backend);
        assert_eq!(block.redraws, 2);

        let surface = backend.surface(block.core.overlay().unwrap()).unwrap();
        assert_eq!(surface.clears, 2);
        assert_eq!(surface.ops.len(), 1);
    }

    #[test]
    fn resize_reallocates_and_redraws() {
        let mut backend = backend();
        let mut block = Block::new();
        render_surface(&mut block, &mut backend);

        block.core.set_size(CanvasSize::new(20, 4));
        block.core.set_scale(2);
        render_surface(&mut block, &mut backend);
        assert_eq!(block.redraws, 2);
        let surface = backend.surface(block.core.overlay().unwrap()).unwrap();
        assert_eq!(surface.size, CanvasSize::new(40, 8));
        assert_eq!(surface.ops[0].0, DrawOp::FillRect { rect: CanvasRect::new(0, 0, 40, 8), color: Color::RED });
    }

    #[test]
    fn allocation_failure_retries_next_frame() {
        let mut backend = backend();
        backend.fail_allocations = 1;
        let mut block = Block::new();

        render_surface(&mut block, &mut backend);
        assert_eq!(block.redraws, 0);
        assert!(block.core.overlay().is_none());
        assert!(block.core.needs_redraw());

        render_surface(&mut block, &mut backend);
        assert_eq!(block.redraws, 1);
    }

    #[test]
    fn hidden_elements_never_draw() {
        let mut backend = backend();
        let mut block = Block::new();
        block.core.draw = false;
        render_surface(&mut block, &mut backend);
        composite(&block, &mut backend);
        assert_eq!(block.redraws, 0);
        assert_eq!(backend.live_overlays(), 0);
        assert!(backend.blits().is_empty());
    }

    #[test]
    fn offscreen_position_skips_blit() {
        let mut backend = backend();
        let mut block = Block::new();
        render_surface(&mut block, &mut backend);
        composite(&block, &mut backend);
        assert_eq!(backend.blits().len(), 1);

        backend.begin_frame();
        block.core.set_position(CanvasPoint::OFFSCREEN);
        composite(&block, &mut backend);
        assert!(backend.blits().is_empty());
    }

    #[test]
    fn empty_surface_hides_the_stale_overlay() {
        let mut backend = backend();
        let mut block = Block::new();
        render_surface(&mut block, &mut backend);
        composite(&block, &mut backend);
        assert_eq!(backend.blits().len(), 1);

        backend.begin_frame();
        block.core.set_size(CanvasSize::new(0, 4));
        render_surface(&mut block, &mut backend);
        composite(&block, &mut backend);
        assert!(backend.blits().is_empty());
        assert_eq!(block.redraws, 1);

        backend.begin_frame();
        block.core.set_size(CanvasSize::new(10, 4));
        render_surface(&mut block, &mut backend);
        composite(&block, &mut backend);
        assert_eq!(block.redraws, 2);
        assert_eq!(backend.blits().len(), 1);
    }

    #[test]
    fn deinitialize_is_idempotent() {
        let mut backend = backend();
        let mut block = Block::new();
        block.core.subscribe_property("DesignNote");
        render_surface(&mut block, &mut backend);

        block.core.deinitialize(&mut backend);
        block.core.deinitialize(&mut backend);
        assert_eq!(backend.freed_overlays(), 1);
        assert!(!block.core.is_subscribed("designnote"));
    }
}
