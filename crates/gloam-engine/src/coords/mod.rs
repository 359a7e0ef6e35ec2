//! Canvas geometry shared by drawing primitives and layout code.
//!
//! Canonical space:
//! - Integer screen pixels
//! - Origin top-left
//! - +X right, +Y down
//!
//! Negative sizes never describe real geometry; they are clipping sentinels.

mod point;
mod rect;
mod size;

pub use point::CanvasPoint;
pub use rect::CanvasRect;
pub use size::CanvasSize;
