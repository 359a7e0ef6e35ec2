//! An arrow and label pointing at an object on screen.

use gloam_engine::coords::{CanvasPoint, CanvasRect, CanvasSize};
use gloam_engine::ids::ObjectId;
use gloam_engine::paint::Color;
use gloam_engine::persist::Slot;

use crate::ctx::HudCtx;
use crate::element::{ElementCore, HudElement};
use crate::image::Image;
use crate::painter::{Painter, SHADOW_OFFSET};
use crate::symbol::{Direction, Symbol};

const SYMBOL_SIZE: CanvasSize = CanvasSize::new(24, 24);
const PADDING: i32 = 8;
const ENABLED_SLOT: &str = "marker_enabled";

/// Marks the host object with an image and optional label beside its
/// projected bounds, on whichever side faces the screen center.
///
/// Parameters: `marker` (initially shown), `marker_image` (default arrow),
/// `marker_text` (`hud` string key or `@name`), `marker_color`.
/// `MarkerOn` / `MarkerOff` messages toggle it.
pub struct ObjectMarker {
    core: ElementCore,
    image: Image,
    text: String,
    color: Color,
    direction: Direction,
    image_pos: CanvasPoint,
    text_pos: CanvasPoint,
}

impl ObjectMarker {
    pub fn new(host: ObjectId) -> Self {
        Self {
            core: ElementCore::new(host),
            image: Image::Symbol(Symbol::Arrow),
            text: String::new(),
            color: Color::WHITE,
            direction: Direction::Left,
            image_pos: CanvasPoint::ORIGIN,
            text_pos: CanvasPoint::ORIGIN,
        }
    }

    /// Which way the arrow points.
    #[inline]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    fn configure(&mut self, ctx: &mut HudCtx<'_>) {
        let host = ctx.host();
        let raw = ctx.params().get_string("marker_image", "arrow");
        self.image = Image::resolve(&raw, &*ctx.backend).unwrap_or_else(|| {
            log::warn!("{host}: marker_image {raw:?} is neither a symbol nor a bitmap");
            Image::Symbol(Symbol::Arrow)
        });
        self.color = ctx.params().get_color("marker_color", Color::WHITE);

        let source = ctx.params().get_string("marker_text", "");
        self.text = match source.trim() {
            "" | "@none" => String::new(),
            "@name" => ctx.world.object_name(host).unwrap_or_default(),
            key => ctx.world.localized("hud", key).unwrap_or_else(|| key.to_owned()),
        };
        self.core.schedule_redraw();
    }

    fn image_size(&self, ctx: &HudCtx<'_>) -> CanvasSize {
        match self.image {
            Image::None => CanvasSize::ZERO,
            image => image.size(&*ctx.backend, SYMBOL_SIZE),
        }
    }
}

impl HudElement for ObjectMarker {
    fn core(&self) -> &ElementCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ElementCore {
        &mut self.core
    }

    fn initialize(&mut self, ctx: &mut HudCtx<'_>) {
        let host = ctx.host();
        if !ctx.store.exists(host, ENABLED_SLOT) {
            let shown = ctx.params().get_bool("marker", true);
            ctx.store.set(host, ENABLED_SLOT, Slot::Bool(shown));
        }
        self.core.subscribe_property("DesignNote");
        self.configure(ctx);
    }

    fn prepare(&mut self, ctx: &mut HudCtx<'_>) -> bool {
        let host = ctx.host();
        if !ctx.store.get_bool(host, ENABLED_SLOT).unwrap_or(true) {
            return false;
        }
        let bounds = ctx.object_to_canvas(host);
        if bounds.is_offscreen() {
            return false;
        }

        let canvas = ctx.canvas_size();
        let image = self.image_size(ctx);
        let text = if self.text.is_empty() { CanvasSize::ZERO } else { ctx.text_size(&self.text) };
        let text_span = if text.w > 0 { PADDING + text.w } else { 0 };
        let content = CanvasSize::new(image.w + text_span, image.h.max(text.h));

        // Sit on the side of the object nearer the screen center, pointing back at it.
        let direction = if bounds.center().x < canvas.w / 2 { Direction::Left } else { Direction::Right };
        let x = match direction {
            Direction::Right => {
                self.text_pos.x = 0;
                self.image_pos.x = if text.w > 0 { text.w + PADDING } else { 0 };
                bounds.x - PADDING - content.w
            }
            _ => {
                self.image_pos.x = 0;
                self.text_pos.x = image.w + PADDING;
                bounds.x + bounds.w + PADDING
            }
        };
        self.image_pos.y = (content.h - image.h) / 2;
        self.text_pos.y = (content.h - text.h) / 2;

        if direction != self.direction {
            self.direction = direction;
            self.core.schedule_redraw();
        }
        self.core.set_position(CanvasPoint::new(x, bounds.center().y - content.h / 2));
        self.core.set_size(CanvasSize::new(content.w + SHADOW_OFFSET.x, content.h + SHADOW_OFFSET.y));
        true
    }

    fn redraw(&mut self, painter: &mut Painter<'_>) {
        painter.set_drawing_color(self.color);
        match self.image {
            Image::None => {}
            Image::Symbol(symbol) => painter.draw_symbol(symbol, SYMBOL_SIZE, self.image_pos, self.direction, true),
            Image::Bitmap(bitmap) => painter.draw_bitmap(bitmap, 0, self.image_pos, CanvasRect::NOCLIP),
        }
        if !self.text.is_empty() {
            painter.draw_text_shadowed(&self.text, self.text_pos);
        }
    }

    fn on_property_changed(&mut self, property: &str, ctx: &mut HudCtx<'_>) {
        if property.eq_ignore_ascii_case("DesignNote") {
            self.configure(ctx);
        }
    }

    fn on_message(&mut self, message: &str, ctx: &mut HudCtx<'_>) -> bool {
        let shown = match message {
            "MarkerOn" => true,
            "MarkerOff" => false,
            _ => return false,
        };
        ctx.store.set(ctx.host(), ENABLED_SLOT, Slot::Bool(shown));
        self.core.schedule_redraw();
        true
    }
}
