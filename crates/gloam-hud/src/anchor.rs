//! Placement of elements against the canvas edges.

use gloam_engine::coords::{CanvasPoint, CanvasSize};

/// Default distance between an anchored element and the canvas edge.
pub const MARGIN: i32 = 16;

/// Alignment along one axis.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Edge {
    Start,
    Center,
    End,
}

impl Edge {
    /// Offset of an `element`-long span along a `canvas`-long axis.
    #[inline]
    pub fn place(self, canvas: i32, element: i32, margin: i32) -> i32 {
        match self {
            Edge::Start => margin,
            Edge::Center => (canvas - element) / 2,
            Edge::End => canvas - margin - element,
        }
    }
}

/// One of nine compass positions on the canvas.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum Anchor {
    #[default]
    NorthWest,
    North,
    NorthEast,
    West,
    Center,
    East,
    SouthWest,
    South,
    SouthEast,
}

impl Anchor {
    pub fn parse(raw: &str) -> Option<Anchor> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "nw" | "northwest" => Some(Anchor::NorthWest),
            "north" | "n" => Some(Anchor::North),
            "ne" | "northeast" => Some(Anchor::NorthEast),
            "west" | "w" => Some(Anchor::West),
            "center" | "c" => Some(Anchor::Center),
            "east" | "e" => Some(Anchor::East),
            "sw" | "southwest" => Some(Anchor::SouthWest),
            "south" | "s" => Some(Anchor::South),
            "se" | "southeast" => Some(Anchor::SouthEast),
            _ => None,
        }
    }

    /// Column: west, center or east.
    pub fn horizontal(self) -> Edge {
        match self {
            Anchor::NorthWest | Anchor::West | Anchor::SouthWest => Edge::Start,
            Anchor::North | Anchor::Center | Anchor::South => Edge::Center,
            Anchor::NorthEast | Anchor::East | Anchor::SouthEast => Edge::End,
        }
    }

    /// Row: north, middle or south.
    pub fn vertical(self) -> Edge {
        match self {
            Anchor::NorthWest | Anchor::North | Anchor::NorthEast => Edge::Start,
            Anchor::West | Anchor::Center | Anchor::East => Edge::Center,
            Anchor::SouthWest | Anchor::South | Anchor::SouthEast => Edge::End,
        }
    }

    /// Canvas origin for an `element`-sized box at this anchor, plus `offset`.
    pub fn calculate_position(
        self,
        canvas: CanvasSize,
        element: CanvasSize,
        offset: CanvasPoint,
        margin: i32,
    ) -> CanvasPoint {
        CanvasPoint::new(
            self.horizontal().place(canvas.w, element.w, margin),
            self.vertical().place(canvas.h, element.h, margin),
        ) + offset
    }
}
