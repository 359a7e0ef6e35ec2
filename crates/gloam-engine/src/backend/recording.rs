use std::collections::BTreeMap;

use glam::Vec3;

use crate::coords::{CanvasPoint, CanvasRect, CanvasSize};
use crate::error::BackendError;

use super::{BitmapId, Camera, DrawOp, OverlayHandle, RenderBackend};

/// Recorded contents of one overlay surface.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Surface {
    pub size: CanvasSize,
    /// Ops drawn since the last clear, with the clip each was drawn under.
    pub ops: Vec<(DrawOp, CanvasRect)>,
    /// Number of times the surface has been cleared.
    pub clears: u32,
}

/// One composite of a surface onto the screen.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Blit {
    pub overlay: OverlayHandle,
    pub position: CanvasPoint,
    pub opacity: u8,
}

#[derive(Debug, Clone)]
struct BitmapEntry {
    name: String,
    size: CanvasSize,
    frames: u32,
}

/// In-memory backend that records everything drawn into it.
///
/// Used by tests and headless runs. Text metrics are fixed-width; projection
/// goes through a [`Camera`].
///
/// Each surface keeps its ops until cleared; [`begin_frame`](Self::begin_frame)
/// resets the per-frame blit list.
#[derive(Debug, Clone)]
pub struct RecordingBackend {
    canvas: CanvasSize,
    pub camera: Camera,
    surfaces: BTreeMap<OverlayHandle, Surface>,
    next_overlay: u32,
    blits: Vec<Blit>,
    bitmaps: Vec<BitmapEntry>,
    /// Number of upcoming `create_overlay` calls that will fail.
    pub fail_allocations: u32,
    /// Glyph cell used for text metrics.
    pub glyph: CanvasSize,
    freed: u32,
}

impl RecordingBackend {
    pub fn new(canvas: CanvasSize) -> Self {
        Self {
            canvas,
            camera: Camera::default(),
            surfaces: BTreeMap::new(),
            next_overlay: 1,
            blits: Vec::new(),
            bitmaps: Vec::new(),
            fail_allocations: 0,
            glyph: CanvasSize::new(8, 12),
            freed: 0,
        }
    }

    pub fn set_canvas_size(&mut self, canvas: CanvasSize) {
        self.canvas = canvas;
    }

    /// Registers a bitmap that [`find_bitmap`](RenderBackend::find_bitmap) can resolve.
    pub fn add_bitmap(&mut self, name: impl Into<String>, size: CanvasSize, frames: u32) -> BitmapId {
        self.bitmaps.push(BitmapEntry { name: name.into(), size, frames: frames.max(1) });
        BitmapId(self.bitmaps.len() as u32 - 1)
    }

    /// Clears the blit list. Call once at the start of every frame.
    pub fn begin_frame(&mut self) {
        self.blits.clear();
    }

    /// Blits issued since the last [`begin_frame`](Self::begin_frame).
    pub fn blits(&self) -> &[Blit] {
        &self.blits
    }

    pub fn surface(&self, overlay: OverlayHandle) -> Option<&Surface> {
        self.surfaces.get(&overlay)
    }

    /// Number of live overlay surfaces.
    pub fn live_overlays(&self) -> usize {
        self.surfaces.len()
    }

    /// Number of overlays released so far.
    pub fn freed_overlays(&self) -> u32 {
        self.freed
    }

    fn surface_mut(&mut self, overlay: OverlayHandle) -> Result<&mut Surface, BackendError> {
        self.surfaces.get_mut(&overlay).ok_or(BackendError::UnknownOverlay(overlay))
    }
}

impl RenderBackend for RecordingBackend {
    fn canvas_size(&self) -> CanvasSize {
        self.canvas
    }

    fn create_overlay(&mut self, size: CanvasSize) -> Result<OverlayHandle, BackendError> {
        if self.fail_allocations > 0 {
            self.fail_allocations -= 1;
            return Err(BackendError::Allocation(size));
        }
        if size.is_empty() {
            return Err(BackendError::Allocation(size));
        }
        let handle = OverlayHandle(self.next_overlay);
        self.next_overlay += 1;
        self.surfaces.insert(handle, Surface { size, ..Default::default() });
        Ok(handle)
    }

    fn resize_overlay(&mut self, overlay: OverlayHandle, size: CanvasSize) -> Result<(), BackendError> {
        if size.is_empty() {
            return Err(BackendError::Allocation(size));
        }
        let surface = self.surface_mut(overlay)?;
        surface.size = size;
        surface.ops.clear();
        Ok(())
    }

    fn clear_overlay(&mut self, overlay: OverlayHandle) -> Result<(), BackendError> {
        let surface = self.surface_mut(overlay)?;
        surface.ops.clear();
        surface.clears += 1;
        Ok(())
    }

    fn free_overlay(&mut self, overlay: OverlayHandle) {
        if self.surfaces.remove(&overlay).is_some() {
            self.freed += 1;
        } else {
            log::warn!("free of unknown overlay {overlay:?}");
        }
    }

    fn draw(&mut self, overlay: OverlayHandle, op: DrawOp, clip: CanvasRect) -> Result<(), BackendError> {
        if let DrawOp::Bitmap { bitmap, .. } = &op {
            if bitmap.0 as usize >= self.bitmaps.len() {
                return Err(BackendError::UnknownBitmap(bitmap.0));
            }
        }
        let surface = self.surface_mut(overlay)?;
        let clip = clip.resolve(surface.size);
        surface.ops.push((op, clip));
        Ok(())
    }

    fn blit_overlay(&mut self, overlay: OverlayHandle, position: CanvasPoint, opacity: u8) -> Result<(), BackendError> {
        if !self.surfaces.contains_key(&overlay) {
            return Err(BackendError::UnknownOverlay(overlay));
        }
        self.blits.push(Blit { overlay, position, opacity });
        Ok(())
    }

    fn text_size(&self, text: &str) -> CanvasSize {
        // Widest line × line count.
        let lines: Vec<&str> = text.lines().collect();
        if lines.is_empty() {
            return CanvasSize::ZERO;
        }
        let widest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) as i32;
        CanvasSize::new(widest * self.glyph.w, lines.len() as i32 * self.glyph.h)
    }

    fn find_bitmap(&self, name: &str) -> Option<BitmapId> {
        self.bitmaps
            .iter()
            .position(|b| b.name.eq_ignore_ascii_case(name))
            .map(|i| BitmapId(i as u32))
    }

    fn bitmap_size(&self, bitmap: BitmapId) -> Option<CanvasSize> {
        self.bitmaps.get(bitmap.0 as usize).map(|b| b.size)
    }

    fn bitmap_frames(&self, bitmap: BitmapId) -> u32 {
        self.bitmaps.get(bitmap.0 as usize).map_or(0, |b| b.frames)
    }

    fn project_point(&self, point: Vec3) -> Option<CanvasPoint> {
        self.camera.project(point, self.canvas)
    }

    fn project_bounds(&self, min: Vec3, max: Vec3) -> Option<CanvasRect> {
        self.camera.project_bounds(min, max, self.canvas)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::Color;

    #[test]
    fn overlay_lifecycle() {
        let mut backend = RecordingBackend::new(CanvasSize::new(640, 480));
        let h = backend.create_overlay(CanvasSize::new(10, 10)).unwrap();
        backend
            .draw(h, DrawOp::FillRect { rect: CanvasRect::new(0, 0, 4, 4), color: Color::RED }, CanvasRect::NOCLIP)
            .unwrap();
        assert_eq!(backend.surface(h).unwrap().ops.len(), 1);
        // NOCLIP is resolved against the surface.
        assert_eq!(backend.surface(h).unwrap().ops[0].1, CanvasRect::new(0, 0, 10, 10));

        backend.clear_overlay(h).unwrap();
        assert!(backend.surface(h).unwrap().ops.is_empty());
        assert_eq!(backend.surface(h).unwrap().clears, 1);

        backend.free_overlay(h);
        assert_eq!(backend.live_overlays(), 0);
        assert_eq!(backend.freed_overlays(), 1);
        assert!(backend.blit_overlay(h, CanvasPoint::ORIGIN, 255).is_err());
    }

    #[test]
    fn injected_allocation_failure() {
        let mut backend = RecordingBackend::new(CanvasSize::new(640, 480));
        backend.fail_allocations = 1;
        assert!(backend.create_overlay(CanvasSize::new(5, 5)).is_err());
        assert!(backend.create_overlay(CanvasSize::new(5, 5)).is_ok());
    }

    #[test]
    fn fixed_width_text_metrics() {
        let backend = RecordingBackend::new(CanvasSize::new(640, 480));
        assert_eq!(backend.text_size("abcd"), CanvasSize::new(32, 12));
        assert_eq!(backend.text_size("ab\nabcdef"), CanvasSize::new(48, 24));
        assert_eq!(backend.text_size(""), CanvasSize::ZERO);
    }

    #[test]
    fn bitmap_lookup_is_case_insensitive() {
        let mut backend = RecordingBackend::new(CanvasSize::new(640, 480));
        let id = backend.add_bitmap("Gem", CanvasSize::new(16, 16), 5);
        assert_eq!(backend.find_bitmap("gem"), Some(id));
        assert_eq!(backend.bitmap_frames(id), 5);
        assert_eq!(backend.find_bitmap("missing"), None);
    }
}
