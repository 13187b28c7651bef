use tiny_skia::{
    Color, FilterQuality, LineCap, LineJoin, Paint, PathBuilder, Pixmap, PixmapPaint, PixmapRef,
    Stroke, Transform,
};
use tracing::debug;

use super::ScratchpadError;
use super::resize::{LogicalSize, PendingResize, ResizeRequest, ResizeTicket};

/// Stroke width in logical pixels.
pub const STROKE_WIDTH: f32 = 3.0;

/// A pointer position in logical pixels, relative to the surface origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// The three pen colors offered by the scratchpad toolbar.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum StrokeColor {
    #[default]
    Slate,
    Red,
    Blue,
}

impl StrokeColor {
    pub const ALL: [Self; 3] = [Self::Slate, Self::Red, Self::Blue];

    #[must_use]
    pub fn hex(self) -> &'static str {
        match self {
            Self::Slate => "#334155",
            Self::Red => "#ef4444",
            Self::Blue => "#3b82f6",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Slate => "Black",
            Self::Red => "Red",
            Self::Blue => "Blue",
        }
    }

    fn rgb(self) -> (u8, u8, u8) {
        match self {
            Self::Slate => (0x33, 0x41, 0x55),
            Self::Red => (0xef, 0x44, 0x44),
            Self::Blue => (0x3b, 0x82, 0xf6),
        }
    }

    fn color(self) -> Color {
        let (r, g, b) = self.rgb();
        Color::from_rgba8(r, g, b, 0xff)
    }
}

/// Freehand drawing surface.
///
/// Points are given in logical pixels; the backing bitmap is `logical × pixel_ratio`
/// device pixels. Resizing migrates the old bitmap into the new one so earlier
/// strokes survive.
pub struct Scratchpad {
    pixmap: Pixmap,
    logical: LogicalSize,
    pixel_ratio: f32,
    color: StrokeColor,
    last_point: Option<Point>,
    pending: PendingResize,
}

impl Scratchpad {
    /// # Errors
    ///
    /// Returns `ScratchpadError::Allocation` if the size is empty or too large.
    pub fn new(size: LogicalSize, pixel_ratio: f32) -> Result<Self, ScratchpadError> {
        let request = ResizeRequest::new(size, pixel_ratio);
        let pixmap = allocate(request)?;
        Ok(Self {
            pixmap,
            logical: size,
            pixel_ratio: request.pixel_ratio,
            color: StrokeColor::default(),
            last_point: None,
            pending: PendingResize::default(),
        })
    }

    #[must_use]
    pub fn logical_size(&self) -> LogicalSize {
        self.logical
    }

    #[must_use]
    pub fn pixel_ratio(&self) -> f32 {
        self.pixel_ratio
    }

    #[must_use]
    pub fn backing_size(&self) -> (u32, u32) {
        (self.pixmap.width(), self.pixmap.height())
    }

    #[must_use]
    pub fn color(&self) -> StrokeColor {
        self.color
    }

    #[must_use]
    pub fn is_drawing(&self) -> bool {
        self.last_point.is_some()
    }

    #[must_use]
    pub fn pixmap(&self) -> PixmapRef<'_> {
        self.pixmap.as_ref()
    }

    /// Applies to strokes started or extended after this call.
    pub fn set_color(&mut self, color: StrokeColor) {
        self.color = color;
    }

    pub fn start_stroke(&mut self, at: Point) {
        self.last_point = Some(at);
    }

    /// Appends a segment to the current stroke. Ignored when no stroke is active.
    pub fn extend_stroke(&mut self, to: Point) {
        let Some(from) = self.last_point else {
            return;
        };
        self.paint_segment(from, to);
        self.last_point = Some(to);
    }

    pub fn end_stroke(&mut self) {
        self.last_point = None;
    }

    pub fn clear(&mut self) {
        self.pixmap.fill(Color::TRANSPARENT);
    }

    /// Queues a resize; a later request replaces it before it is flushed.
    pub fn request_resize(&mut self, size: LogicalSize, pixel_ratio: f32) -> ResizeTicket {
        self.pending.push(ResizeRequest::new(size, pixel_ratio))
    }

    #[must_use]
    pub fn is_resize_current(&self, ticket: ResizeTicket) -> bool {
        self.pending.is_current(ticket)
    }

    /// Applies the queued resize if `ticket` is still the newest one.
    ///
    /// Returns `Ok(true)` when the backing bitmap was replaced.
    ///
    /// # Errors
    ///
    /// Returns `ScratchpadError::Allocation` if the new bitmap cannot be allocated.
    pub fn flush_resize(&mut self, ticket: ResizeTicket) -> Result<bool, ScratchpadError> {
        match self.pending.take(ticket) {
            Some(request) => self.resize(request),
            None => Ok(false),
        }
    }

    /// Resizes immediately: allocate the new bitmap, blit the old one scaled to fill
    /// it, then release the old one.
    ///
    /// # Errors
    ///
    /// Returns `ScratchpadError::Allocation` if the new bitmap cannot be allocated.
    pub fn resize(&mut self, request: ResizeRequest) -> Result<bool, ScratchpadError> {
        if request.size.is_empty() {
            return Ok(false);
        }
        let Some((width, height)) = request.size.backing(request.pixel_ratio) else {
            return Ok(false);
        };

        self.logical = request.size;
        self.pixel_ratio = request.pixel_ratio;
        if (width, height) == self.backing_size() {
            return Ok(false);
        }

        let mut next = allocate(request)?;
        #[allow(clippy::cast_precision_loss)]
        let scale = Transform::from_scale(
            width as f32 / self.pixmap.width() as f32,
            height as f32 / self.pixmap.height() as f32,
        );
        let paint = PixmapPaint {
            quality: FilterQuality::Bilinear,
            ..PixmapPaint::default()
        };
        next.draw_pixmap(0, 0, self.pixmap.as_ref(), &paint, scale, None);

        debug!(
            from_width = self.pixmap.width(),
            from_height = self.pixmap.height(),
            to_width = width,
            to_height = height,
            "migrated scratchpad bitmap"
        );
        self.pixmap = next;
        Ok(true)
    }

    /// Encodes the backing bitmap as PNG.
    ///
    /// # Errors
    ///
    /// Returns `ScratchpadError::Encode` if PNG encoding fails.
    pub fn to_png(&self) -> Result<Vec<u8>, ScratchpadError> {
        self.pixmap
            .encode_png()
            .map_err(|err| ScratchpadError::Encode(err.to_string()))
    }

    fn paint_segment(&mut self, from: Point, to: Point) {
        let mut builder = PathBuilder::new();
        builder.move_to(from.x, from.y);
        builder.line_to(to.x, to.y);
        let Some(path) = builder.finish() else {
            return;
        };

        let mut paint = Paint::default();
        paint.set_color(self.color.color());
        paint.anti_alias = true;
        let stroke = Stroke {
            width: STROKE_WIDTH,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Stroke::default()
        };
        let transform = Transform::from_scale(self.pixel_ratio, self.pixel_ratio);
        self.pixmap
            .stroke_path(&path, &paint, &stroke, transform, None);
    }
}

fn allocate(request: ResizeRequest) -> Result<Pixmap, ScratchpadError> {
    let (width, height) = request
        .size
        .backing(request.pixel_ratio)
        .ok_or(ScratchpadError::Allocation {
            width: 0,
            height: 0,
        })?;
    Pixmap::new(width, height).ok_or(ScratchpadError::Allocation { width, height })
}
