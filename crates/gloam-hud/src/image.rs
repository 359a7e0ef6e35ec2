use gloam_engine::backend::{BitmapId, RenderBackend};
use gloam_engine::coords::CanvasSize;

use crate::symbol::Symbol;

/// An element's configured picture: a built-in symbol or a backend bitmap.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum Image {
    #[default]
    None,
    Symbol(Symbol),
    Bitmap(BitmapId),
}

impl Image {
    /// Interprets parameter text. Symbol names win over bitmap names;
    /// `None` means the text names neither.
    pub fn resolve(raw: &str, backend: &dyn RenderBackend) -> Option<Image> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Some(Image::None);
        }
        if let Some(symbol) = Symbol::parse(raw) {
            return Some(match symbol {
                Symbol::None => Image::None,
                s => Image::Symbol(s),
            });
        }
        backend.find_bitmap(raw).map(Image::Bitmap)
    }

    #[inline]
    pub fn symbol(self) -> Symbol {
        match self {
            Image::Symbol(s) => s,
            _ => Symbol::None,
        }
    }

    #[inline]
    pub fn bitmap(self) -> Option<BitmapId> {
        match self {
            Image::Bitmap(b) => Some(b),
            _ => None,
        }
    }

    /// Natural size: the bitmap's size, else `fallback`.
    pub fn size(self, backend: &dyn RenderBackend, fallback: CanvasSize) -> CanvasSize {
        self.bitmap().and_then(|b| backend.bitmap_size(b)).unwrap_or(fallback)
    }
}

#[cfg(test)]
mod tests {
    use gloam_engine::backend::RecordingBackend;

    use super::*;

    #[test]
    fn resolves_symbols_then_bitmaps() {
        let mut backend = RecordingBackend::new(CanvasSize::new(640, 480));
        let gem = backend.add_bitmap("gem", CanvasSize::new(24, 24), 5);

        assert_eq!(Image::resolve("", &backend), Some(Image::None));
        assert_eq!(Image::resolve("none", &backend), Some(Image::None));
        assert_eq!(Image::resolve("arrow", &backend), Some(Image::Symbol(Symbol::Arrow)));
        assert_eq!(Image::resolve("GEM", &backend), Some(Image::Bitmap(gem)));
        assert_eq!(Image::resolve("missing", &backend), None);

        let fallback = CanvasSize::new(32, 32);
        assert_eq!(Image::Bitmap(gem).size(&backend, fallback), CanvasSize::new(24, 24));
        assert_eq!(Image::Symbol(Symbol::Square).size(&backend, fallback), fallback);
    }
}
