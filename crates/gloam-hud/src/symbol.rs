//! Built-in vector glyphs.

use gloam_engine::coords::{CanvasPoint, CanvasRect, CanvasSize};

/// A glyph drawn from lines and boxes rather than a bitmap.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum Symbol {
    #[default]
    None,
    Arrow,
    Crosshairs,
    Reticule,
    Square,
}

/// Which way a directional symbol points. Only arrows are affected;
/// `None` points an arrow down.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum Direction {
    #[default]
    None,
    Left,
    Right,
}

/// One piece of a symbol, in symbol-local coordinates.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Shape {
    Line(CanvasPoint, CanvasPoint),
    Box(CanvasRect),
    Fill(CanvasRect),
}

impl Symbol {
    pub fn parse(raw: &str) -> Option<Symbol> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "none" => Some(Symbol::None),
            "arrow" => Some(Symbol::Arrow),
            "crosshairs" | "crosshair" => Some(Symbol::Crosshairs),
            "reticule" | "reticle" => Some(Symbol::Reticule),
            "square" => Some(Symbol::Square),
            _ => None,
        }
    }

    /// The shapes making up this symbol at `size`.
    pub fn shapes(self, size: CanvasSize, direction: Direction) -> Vec<Shape> {
        let (w, h) = (size.w, size.h);
        if size.is_empty() {
            return Vec::new();
        }
        let p = CanvasPoint::new;
        match self {
            Symbol::None => Vec::new(),
            Symbol::Arrow => match direction {
                Direction::Right | Direction::Left => {
                    let mirror = |pt: CanvasPoint| match direction {
                        Direction::Left => p(w - 1 - pt.x, pt.y),
                        _ => pt,
                    };
                    let tip = p(w - 1, h / 2);
                    [
                        (p(0, h / 2), tip),
                        (p(w / 2, 0), tip),
                        (p(w / 2, h - 1), tip),
                    ]
                    .into_iter()
                    .map(|(a, b)| Shape::Line(mirror(a), mirror(b)))
                    .collect()
                }
                Direction::None => {
                    let tip = p(w / 2, h - 1);
                    vec![
                        Shape::Line(p(w / 2, 0), tip),
                        Shape::Line(p(0, h / 2), tip),
                        Shape::Line(p(w - 1, h / 2), tip),
                    ]
                }
            },
            Symbol::Crosshairs => {
                let (cx, cy) = (w / 2, h / 2);
                let gap = (w.min(h) / 8).max(1);
                vec![
                    Shape::Line(p(0, cy), p(cx - gap, cy)),
                    Shape::Line(p(cx + gap, cy), p(w - 1, cy)),
                    Shape::Line(p(cx, 0), p(cx, cy - gap)),
                    Shape::Line(p(cx, cy + gap), p(cx, h - 1)),
                ]
            }
            Symbol::Reticule => {
                let (cx, cy) = (w / 2, h / 2);
                let tick = (w.min(h) / 4).max(1);
                vec![
                    Shape::Box(CanvasRect::from_size(size)),
                    Shape::Line(p(cx, 0), p(cx, tick)),
                    Shape::Line(p(cx, h - 1 - tick), p(cx, h - 1)),
                    Shape::Line(p(0, cy), p(tick, cy)),
                    Shape::Line(p(w - 1 - tick, cy), p(w - 1, cy)),
                ]
            }
            Symbol::Square => vec![Shape::Fill(CanvasRect::from_size(size))],
        }
    }

    /// The point of the symbol that should sit on its target: an arrow's tip,
    /// otherwise the center.
    pub fn hotspot(self, size: CanvasSize, direction: Direction) -> CanvasPoint {
        match (self, direction) {
            (Symbol::Arrow, Direction::Right) => CanvasPoint::new(size.w, size.h / 2),
            (Symbol::Arrow, Direction::Left) => CanvasPoint::new(0, size.h / 2),
            (Symbol::Arrow, Direction::None) => CanvasPoint::new(size.w / 2, size.h),
            _ => CanvasPoint::from_size(size) / 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIZE: CanvasSize = CanvasSize::new(32, 16);

    #[test]
    fn parse_names() {
        assert_eq!(Symbol::parse("Arrow"), Some(Symbol::Arrow));
        assert_eq!(Symbol::parse(" crosshairs "), Some(Symbol::Crosshairs));
        assert_eq!(Symbol::parse("reticule"), Some(Symbol::Reticule));
        assert_eq!(Symbol::parse("square"), Some(Symbol::Square));
        assert_eq!(Symbol::parse("none"), Some(Symbol::None));
        assert_eq!(Symbol::parse("gem.pcx"), None);
    }

    #[test]
    fn right_arrow_converges_on_tip() {
        let shapes = Symbol::Arrow.shapes(SIZE, Direction::Right);
        assert_eq!(shapes.len(), 3);
        for shape in shapes {
            let Shape::Line(_, to) = shape else { panic!("arrow is made of lines") };
            assert_eq!(to, CanvasPoint::new(31, 8));
        }
    }

    #[test]
    fn left_arrow_is_mirrored() {
        let shapes = Symbol::Arrow.shapes(SIZE, Direction::Left);
        assert!(shapes.iter().all(|s| matches!(s, Shape::Line(_, to) if *to == CanvasPoint::new(0, 8))));
    }

    #[test]
    fn undirected_arrow_points_down() {
        let shapes = Symbol::Arrow.shapes(SIZE, Direction::None);
        assert!(shapes.iter().all(|s| matches!(s, Shape::Line(_, to) if *to == CanvasPoint::new(16, 15))));
    }

    #[test]
    fn square_fills_and_reticule_boxes() {
        assert_eq!(Symbol::Square.shapes(SIZE, Direction::None), vec![Shape::Fill(CanvasRect::new(0, 0, 32, 16))]);
        let reticule = Symbol::Reticule.shapes(SIZE, Direction::None);
        assert_eq!(reticule[0], Shape::Box(CanvasRect::new(0, 0, 32, 16)));
        assert_eq!(reticule.len(), 5);
        assert!(Symbol::None.shapes(SIZE, Direction::None).is_empty());
        assert!(Symbol::Square.shapes(CanvasSize::ZERO, Direction::None).is_empty());
    }

    #[test]
    fn hotspots() {
        assert_eq!(Symbol::Arrow.hotspot(SIZE, Direction::Right), CanvasPoint::new(32, 8));
        assert_eq!(Symbol::Arrow.hotspot(SIZE, Direction::Left), CanvasPoint::new(0, 8));
        assert_eq!(Symbol::Arrow.hotspot(SIZE, Direction::None), CanvasPoint::new(16, 16));
        assert_eq!(Symbol::Crosshairs.hotspot(SIZE, Direction::Left), CanvasPoint::new(16, 8));
    }
}
