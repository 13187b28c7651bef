//! Freehand scratch surface backed by an owned RGBA bitmap.

mod resize;
mod surface;

use thiserror::Error;

pub use resize::{LogicalSize, PendingResize, ResizeRequest, ResizeTicket};
pub use surface::{Point, STROKE_WIDTH, Scratchpad, StrokeColor};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ScratchpadError {
    #[error("cannot allocate a {width}x{height} bitmap")]
    Allocation { width: u32, height: u32 },
    #[error("failed to encode scratchpad: {0}")]
    Encode(String),
}
