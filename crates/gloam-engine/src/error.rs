//! Error types for the host-facing services.
//!
//! None of these are fatal: HUD and transition code degrades to "nothing
//! drawn" or "no transition" and retries on the next frame or trigger.

use thiserror::Error;

use crate::backend::OverlayHandle;
use crate::coords::CanvasSize;

/// Failure reported by a [`RenderBackend`](crate::backend::RenderBackend).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// The backend could not provide a drawing surface of this size.
    #[error("cannot allocate a {}x{} overlay surface", .0.w, .0.h)]
    Allocation(CanvasSize),
    /// The handle does not name a live overlay.
    #[error("unknown overlay handle {0:?}")]
    UnknownOverlay(OverlayHandle),
    /// The bitmap id does not name a loaded bitmap.
    #[error("unknown bitmap {0}")]
    UnknownBitmap(u32),
}

/// Malformed design-note text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamError {
    #[error("parameter entry {0:?} has no '=' separator")]
    MissingSeparator(String),
    #[error("parameter entry {0:?} has an empty name")]
    EmptyName(String),
    #[error("unterminated quote in value of {0:?}")]
    UnterminatedQuote(String),
}

/// Failure while snapshotting or restoring persistent state.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("cannot encode saved state: {0}")]
    Encode(#[from] ron::Error),
    #[error("cannot decode saved state: {0}")]
    Decode(#[from] ron::error::SpannedError),
    #[error("slot {name:?} on {owner} does not hold saved text")]
    WrongSlotKind { owner: crate::ids::ObjectId, name: String },
}
