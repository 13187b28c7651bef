/// Displayed size of the surface in CSS (logical) pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LogicalSize {
    pub width: f32,
    pub height: f32,
}

impl LogicalSize {
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// Backing bitmap dimensions for this size at `pixel_ratio`.
    ///
    /// Returns `None` when either dimension rounds to zero.
    #[must_use]
    pub fn backing(&self, pixel_ratio: f32) -> Option<(u32, u32)> {
        let width = scaled(self.width, pixel_ratio)?;
        let height = scaled(self.height, pixel_ratio)?;
        Some((width, height))
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn scaled(value: f32, ratio: f32) -> Option<u32> {
    let px = (value * ratio).round();
    if !px.is_finite() || px < 1.0 || px > u32::MAX as f32 {
        return None;
    }
    Some(px as u32)
}

/// A single resize notification from the host.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResizeRequest {
    pub size: LogicalSize,
    pub pixel_ratio: f32,
}

impl ResizeRequest {
    #[must_use]
    pub fn new(size: LogicalSize, pixel_ratio: f32) -> Self {
        let pixel_ratio = if pixel_ratio.is_finite() && pixel_ratio > 0.0 {
            pixel_ratio
        } else {
            1.0
        };
        Self { size, pixel_ratio }
    }
}

/// Handle returned for each queued resize; only the newest one flushes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ResizeTicket(u64);

/// Coalesces bursts of resize notifications down to the latest one.
#[derive(Debug, Default)]
pub struct PendingResize {
    generation: u64,
    request: Option<ResizeRequest>,
}

impl PendingResize {
    /// Replaces any queued request with `request`.
    pub fn push(&mut self, request: ResizeRequest) -> ResizeTicket {
        self.generation = self.generation.wrapping_add(1);
        self.request = Some(request);
        ResizeTicket(self.generation)
    }

    #[must_use]
    pub fn is_current(&self, ticket: ResizeTicket) -> bool {
        ticket.0 == self.generation && self.request.is_some()
    }

    /// Takes the queued request if `ticket` is still the newest.
    pub fn take(&mut self, ticket: ResizeTicket) -> Option<ResizeRequest> {
        if ticket.0 != self.generation {
            return None;
        }
        self.request.take()
    }
}
