use gloam_engine::coords::{CanvasPoint, CanvasRect, CanvasSize};
use gloam_engine::ids::ObjectId;
use gloam_engine::paint::Color;

use crate::ctx::HudCtx;
use crate::element::{ElementCore, HudElement};
use crate::painter::Painter;

const BORDER: i32 = 1;
const PADDING: i32 = 8;
const BACKGROUND_COLOR: Color = Color::BLACK;
const OPACITY: u8 = 192;

/// Name of the object whose subtitles sit at the canvas center.
pub const PLAYER: &str = "Player";

/// A line of speech shown just below the speaker.
///
/// Hidden while the speaker is off screen. The box is clamped so it never
/// leaves the canvas.
pub struct Subtitle {
    core: ElementCore,
    text: String,
    color: Color,
}

impl Subtitle {
    pub fn new(speaker: ObjectId, text: impl Into<String>, color: Color) -> Self {
        let mut core = ElementCore::new(speaker);
        core.set_opacity(OPACITY);
        Self { core, text: text.into(), color }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.core.schedule_redraw();
    }
}

impl HudElement for Subtitle {
    fn core(&self) -> &ElementCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ElementCore {
        &mut self.core
    }

    fn prepare(&mut self, ctx: &mut HudCtx<'_>) -> bool {
        let canvas = ctx.canvas_size();
        let text = ctx.text_size(&self.text);
        let size = CanvasSize::new(text.w + 2 * (BORDER + PADDING), text.h + 2 * (BORDER + PADDING));

        let speaker = ctx.host();
        let anchor = if ctx.world.find_object(PLAYER) == Some(speaker) {
            CanvasPoint::from_size(canvas) / 2
        } else {
            let centroid = ctx.object_centroid_to_canvas(speaker);
            if centroid.is_offscreen() {
                return false;
            }
            centroid
        };

        let x = (anchor.x - size.w / 2).min(canvas.w - size.w).max(0);
        let y = (anchor.y + PADDING).min(canvas.h - size.h).max(0);
        self.core.set_position(CanvasPoint::new(x, y));
        self.core.set_size(size);
        true
    }

    fn redraw(&mut self, painter: &mut Painter<'_>) {
        painter.set_drawing_color(BACKGROUND_COLOR);
        painter.fill_area(CanvasRect::NOCLIP);
        painter.set_drawing_color(self.color);
        painter.draw_box(CanvasRect::NOCLIP);
        painter.draw_text_shadowed(&self.text, CanvasPoint::new(BORDER + PADDING, BORDER + PADDING));
    }
}
