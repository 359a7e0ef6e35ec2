//! Rendering backend contract.
//!
//! Responsibilities of the backend (the host's renderer):
//! - own overlay surfaces and composite them onto the screen
//! - rasterize primitive draw ops into a surface
//! - report text and bitmap metrics
//! - project world space into canvas space
//!
//! HUD code never talks to pixels except through this trait.

mod camera;
mod recording;

use glam::Vec3;

use crate::coords::{CanvasPoint, CanvasRect, CanvasSize};
use crate::error::BackendError;
use crate::paint::Color;

pub use camera::Camera;
pub use recording::{Blit, RecordingBackend, Surface};

/// Backend-owned overlay surface.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OverlayHandle(pub u32);

/// Backend-owned bitmap (possibly multi-frame).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct BitmapId(pub u32);

/// One primitive draw into an overlay surface, in surface pixels.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    FillRect { rect: CanvasRect, color: Color },
    Rect { rect: CanvasRect, color: Color },
    Line { from: CanvasPoint, to: CanvasPoint, color: Color },
    Text { text: String, position: CanvasPoint, color: Color },
    /// `clip` is in bitmap pixels; `NOCLIP` draws the whole frame.
    Bitmap { bitmap: BitmapId, frame: u32, position: CanvasPoint, clip: CanvasRect },
}

/// The host renderer, as seen by the HUD layer.
pub trait RenderBackend {
    /// Size of the screen canvas.
    fn canvas_size(&self) -> CanvasSize;

    fn create_overlay(&mut self, size: CanvasSize) -> Result<OverlayHandle, BackendError>;
    fn resize_overlay(&mut self, overlay: OverlayHandle, size: CanvasSize) -> Result<(), BackendError>;
    /// Clears the surface to fully transparent.
    fn clear_overlay(&mut self, overlay: OverlayHandle) -> Result<(), BackendError>;
    fn free_overlay(&mut self, overlay: OverlayHandle);

    /// Draws `op` into the surface, discarding pixels outside `clip`.
    fn draw(&mut self, overlay: OverlayHandle, op: DrawOp, clip: CanvasRect) -> Result<(), BackendError>;

    /// Composites the surface onto the screen at `position` (0 = invisible, 255 = opaque).
    fn blit_overlay(&mut self, overlay: OverlayHandle, position: CanvasPoint, opacity: u8) -> Result<(), BackendError>;

    /// Pixel size of `text` in the HUD font.
    fn text_size(&self, text: &str) -> CanvasSize;

    fn find_bitmap(&self, name: &str) -> Option<BitmapId>;
    fn bitmap_size(&self, bitmap: BitmapId) -> Option<CanvasSize>;
    fn bitmap_frames(&self, bitmap: BitmapId) -> u32;

    /// Screen position of a world point, or `None` when it is not in view.
    fn project_point(&self, point: Vec3) -> Option<CanvasPoint>;

    /// Screen rectangle covering a world-space box, or `None` when no part is in view.
    fn project_bounds(&self, min: Vec3, max: Vec3) -> Option<CanvasRect>;
}
