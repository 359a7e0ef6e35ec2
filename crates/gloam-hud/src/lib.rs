//! Gloam HUD: screen-space elements composited over the host's 3D view.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use gloam_hud::prelude::*;
//!
//! let mut scene = HudScene::new();
//! let mut services = HudServices::new(&mut backend, &world, &mut params, &mut store);
//! scene.add(StatMeter::new(player), &mut services);
//!
//! // Once per frame:
//! scene.frame(&mut services);
//! ```
//!
//! # Writing an element
//!
//! Implement [`HudElement`](element::HudElement): compute geometry in
//! `prepare`, issue primitives in `redraw`.
//!
//! ```rust,ignore
//! pub struct Badge { core: ElementCore }
//!
//! impl HudElement for Badge {
//!     fn core(&self) -> &ElementCore { &self.core }
//!     fn core_mut(&mut self) -> &mut ElementCore { &mut self.core }
//!     fn prepare(&mut self, ctx: &mut HudCtx<'_>) -> bool {
//!         self.core.set_position(ctx.object_centroid_to_canvas(ctx.host()));
//!         self.core.set_size(CanvasSize::new(8, 8));
//!         true
//!     }
//!     fn redraw(&mut self, painter: &mut Painter<'_>) {
//!         painter.fill_area(CanvasRect::NOCLIP);
//!     }
//! }
//! ```

pub mod anchor;
pub mod ctx;
pub mod element;
pub mod elements;
pub mod image;
pub mod painter;
pub mod scene;
pub mod symbol;

/// Everything needed to host and write HUD elements.
pub mod prelude {
    pub use crate::anchor::{Anchor, Edge, MARGIN};
    pub use crate::ctx::{HudCtx, HudServices};
    pub use crate::element::{ElementCore, HudElement};
    pub use crate::elements::{
        marker::ObjectMarker,
        sight::ToolSight,
        stat_meter::{Orient, StatMeter, Style, Tier},
        subtitle::Subtitle,
    };
    pub use crate::image::Image;
    pub use crate::painter::Painter;
    pub use crate::scene::{ElementId, HudScene};
    pub use crate::symbol::{Direction, Symbol};

    pub use gloam_engine::coords::{CanvasPoint, CanvasRect, CanvasSize};
    pub use gloam_engine::paint::Color;
}
