//! A sight drawn at the center of the screen while a tool is in hand.

use gloam_engine::coords::{CanvasPoint, CanvasRect, CanvasSize};
use gloam_engine::ids::ObjectId;
use gloam_engine::paint::Color;
use gloam_engine::persist::Slot;

use crate::ctx::HudCtx;
use crate::element::{ElementCore, HudElement};
use crate::image::Image;
use crate::painter::{Painter, SHADOW_OFFSET};
use crate::symbol::{Direction, Symbol};

const SYMBOL_SIZE: CanvasSize = CanvasSize::new(32, 32);
/// Room for the symbol plus its drop shadow.
const SHADOWED_SIZE: CanvasSize = CanvasSize::new(SYMBOL_SIZE.w + SHADOW_OFFSET.x, SYMBOL_SIZE.h + SHADOW_OFFSET.y);
const ENABLED_SLOT: &str = "tool_sight_enabled";

/// Symbol or bitmap whose hotspot sits on the canvas center.
///
/// Selecting or focusing the host inventory item shows the sight;
/// deselecting or unfocusing hides it. Configured by `tool_sight_image`
/// and `tool_sight_color`.
pub struct ToolSight {
    core: ElementCore,
    image: Image,
    color: Color,
}

impl ToolSight {
    pub fn new(host: ObjectId) -> Self {
        Self { core: ElementCore::new(host), image: Image::Symbol(Symbol::Crosshairs), color: Color::WHITE }
    }

    #[inline]
    pub fn image(&self) -> Image {
        self.image
    }

    fn configure(&mut self, ctx: &mut HudCtx<'_>) {
        let raw = ctx.params().get_string("tool_sight_image", "crosshairs");
        self.image = Image::resolve(&raw, &*ctx.backend).unwrap_or_else(|| {
            log::warn!("{}: tool_sight_image {raw:?} is neither a symbol nor a bitmap", ctx.host());
            Image::Symbol(Symbol::Crosshairs)
        });
        self.color = ctx.params().get_color("tool_sight_color", Color::WHITE);
        self.core.schedule_redraw();
    }

    fn set_enabled(&mut self, ctx: &mut HudCtx<'_>, enabled: bool) {
        ctx.store.set(ctx.host(), ENABLED_SLOT, Slot::Bool(enabled));
        self.core.schedule_redraw();
    }
}

impl HudElement for ToolSight {
    fn core(&self) -> &ElementCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ElementCore {
        &mut self.core
    }

    fn initialize(&mut self, ctx: &mut HudCtx<'_>) {
        self.core.subscribe_property("DesignNote");
        self.configure(ctx);
    }

    fn prepare(&mut self, ctx: &mut HudCtx<'_>) -> bool {
        if !ctx.store.get_bool(ctx.host(), ENABLED_SLOT).unwrap_or(false) {
            return false;
        }
        let (size, hotspot) = match self.image {
            Image::None => return false,
            Image::Symbol(symbol) => (SHADOWED_SIZE, symbol.hotspot(SYMBOL_SIZE, Direction::None)),
            image @ Image::Bitmap(_) => {
                let size = image.size(&*ctx.backend, SYMBOL_SIZE);
                (size, CanvasPoint::from_size(size) / 2)
            }
        };
        let center = CanvasPoint::from_size(ctx.canvas_size()) / 2;
        self.core.set_position(center - hotspot);
        self.core.set_size(size);
        true
    }

    fn redraw(&mut self, painter: &mut Painter<'_>) {
        painter.set_drawing_color(self.color);
        match self.image {
            Image::None => {}
            Image::Symbol(symbol) => {
                painter.draw_symbol(symbol, SYMBOL_SIZE, CanvasPoint::ORIGIN, Direction::None, true)
            }
            Image::Bitmap(bitmap) => painter.draw_bitmap(bitmap, 0, CanvasPoint::ORIGIN, CanvasRect::NOCLIP),
        }
    }

    fn on_property_changed(&mut self, property: &str, ctx: &mut HudCtx<'_>) {
        if property.eq_ignore_ascii_case("DesignNote") {
            self.configure(ctx);
        }
    }

    fn on_message(&mut self, message: &str, ctx: &mut HudCtx<'_>) -> bool {
        match message {
            "InvSelect" | "InvFocus" => self.set_enabled(ctx, true),
            "InvDeSelect" | "InvDeFocus" => self.set_enabled(ctx, false),
            _ => return false,
        }
        true
    }
}
