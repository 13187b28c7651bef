use std::time::{Duration, Instant};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use drill_core::scratchpad::{
    LogicalSize, Point, ResizeTicket, Scratchpad, ScratchpadError, StrokeColor,
};

/// Size used until the host reports the real one.
const INITIAL_SIZE: LogicalSize = LogicalSize::new(400.0, 400.0);

/// Minimum gap between image refreshes while a stroke is in progress.
const PREVIEW_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColorSwatchVm {
    pub color: StrokeColor,
    pub hex: &'static str,
    pub aria_label: String,
    pub selected: bool,
}

/// Drawing surface plus the pieces the webview needs to show it.
///
/// The bitmap is shown as a PNG data URL. The URL is cached and only rebuilt by
/// `sync_image` after the bitmap changed.
pub struct ScratchpadVm {
    pad: Scratchpad,
    image: String,
    dirty: bool,
    encoded_at: Instant,
}

impl ScratchpadVm {
    /// # Errors
    ///
    /// Returns `ScratchpadError::Allocation` if the initial bitmap cannot be allocated,
    /// or `ScratchpadError::Encode` if it cannot be encoded.
    pub fn new(pixel_ratio: f32) -> Result<Self, ScratchpadError> {
        let pad = Scratchpad::new(INITIAL_SIZE, pixel_ratio)?;
        let image = encode(&pad)?;
        Ok(Self {
            pad,
            image,
            dirty: false,
            encoded_at: Instant::now(),
        })
    }

    #[must_use]
    pub fn surface(&self) -> &Scratchpad {
        &self.pad
    }

    #[must_use]
    pub fn swatches(&self) -> Vec<ColorSwatchVm> {
        StrokeColor::ALL
            .iter()
            .map(|color| ColorSwatchVm {
                color: *color,
                hex: color.hex(),
                aria_label: format!("Select {} color", color.label()),
                selected: *color == self.pad.color(),
            })
            .collect()
    }

    pub fn set_color(&mut self, color: StrokeColor) {
        self.pad.set_color(color);
    }

    pub fn pointer_down(&mut self, x: f64, y: f64) {
        self.pad.start_stroke(point(x, y));
    }

    /// Returns `true` when a segment was painted.
    pub fn pointer_move(&mut self, x: f64, y: f64) -> bool {
        if !self.pad.is_drawing() {
            return false;
        }
        self.pad.extend_stroke(point(x, y));
        self.dirty = true;
        true
    }

    pub fn pointer_up(&mut self) {
        self.pad.end_stroke();
    }

    pub fn clear(&mut self) {
        self.pad.clear();
        self.dirty = true;
    }

    pub fn request_resize(&mut self, width: f64, height: f64, pixel_ratio: f32) -> ResizeTicket {
        #[allow(clippy::cast_possible_truncation)]
        let size = LogicalSize::new(width as f32, height as f32);
        self.pad.request_resize(size, pixel_ratio)
    }

    /// # Errors
    ///
    /// Returns `ScratchpadError::Allocation` if the new bitmap cannot be allocated.
    pub fn flush_resize(&mut self, ticket: ResizeTicket) -> Result<bool, ScratchpadError> {
        let replaced = self.pad.flush_resize(ticket)?;
        self.dirty |= replaced;
        Ok(replaced)
    }

    #[must_use]
    pub fn has_pending_image(&self) -> bool {
        self.dirty
    }

    /// Re-encodes the image URL if the bitmap changed.
    ///
    /// Without `force`, refreshes closer than `PREVIEW_INTERVAL` to the previous one
    /// are skipped and stay pending. Returns `Ok(true)` when the URL was rebuilt.
    ///
    /// # Errors
    ///
    /// Returns `ScratchpadError::Encode` if PNG encoding fails.
    pub fn sync_image(&mut self, force: bool, now: Instant) -> Result<bool, ScratchpadError> {
        if !self.dirty {
            return Ok(false);
        }
        if !force && now.saturating_duration_since(self.encoded_at) < PREVIEW_INTERVAL {
            return Ok(false);
        }
        self.image = encode(&self.pad)?;
        self.dirty = false;
        self.encoded_at = now;
        Ok(true)
    }

    /// The last encoded bitmap as a `data:` URL for an `img` element.
    #[must_use]
    pub fn image_url(&self) -> &str {
        &self.image
    }
}

fn encode(pad: &Scratchpad) -> Result<String, ScratchpadError> {
    let png = pad.to_png()?;
    Ok(format!("data:image/png;base64,{}", STANDARD.encode(png)))
}

#[allow(clippy::cast_possible_truncation)]
fn point(x: f64, y: f64) -> Point {
    Point::new(x as f32, y as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swatches_mark_the_active_color() {
        let mut vm = ScratchpadVm::new(1.0).unwrap();
        vm.set_color(StrokeColor::Blue);
        let swatches = vm.swatches();
        assert_eq!(swatches.len(), 3);
        let selected: Vec<_> = swatches.iter().filter(|s| s.selected).collect();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].hex, "#3b82f6");
        assert_eq!(swatches[0].aria_label, "Select Black color");
    }

    #[test]
    fn moves_only_paint_while_pressed() {
        let mut vm = ScratchpadVm::new(1.0).unwrap();
        assert!(!vm.pointer_move(10.0, 10.0));
        vm.pointer_down(10.0, 10.0);
        assert!(vm.pointer_move(40.0, 40.0));
        vm.pointer_up();
        assert!(!vm.pointer_move(50.0, 50.0));
    }

    #[test]
    fn image_url_is_a_png_data_url() {
        let vm = ScratchpadVm::new(1.0).unwrap();
        let url = vm.image_url();
        // base64 of the PNG signature.
        assert!(url.starts_with("data:image/png;base64,iVBORw0KGgo"), "{url}");
    }

    #[test]
    fn burst_of_resizes_applies_only_the_last() {
        let mut vm = ScratchpadVm::new(1.0).unwrap();
        let first = vm.request_resize(200.0, 100.0, 1.0);
        let last = vm.request_resize(300.0, 200.0, 2.0);

        assert!(!vm.flush_resize(first).unwrap());
        assert!(vm.flush_resize(last).unwrap());
        assert_eq!(vm.surface().backing_size(), (600, 400));
    }

    #[test]
    fn image_is_cached_until_the_bitmap_changes() {
        let mut vm = ScratchpadVm::new(1.0).unwrap();
        let blank = vm.image_url().to_string();
        let start = Instant::now();
        assert!(!vm.sync_image(true, start).unwrap());

        vm.pointer_down(10.0, 10.0);
        assert!(!vm.has_pending_image());
        assert!(vm.pointer_move(60.0, 60.0));
        assert!(vm.has_pending_image());
        assert!(vm.sync_image(true, start).unwrap());
        let first_segment = vm.image_url().to_string();
        assert_ne!(first_segment, blank);

        // Moves inside the preview interval stay pending.
        assert!(vm.pointer_move(120.0, 60.0));
        assert!(!vm.sync_image(false, start + Duration::from_millis(10)).unwrap());
        assert_eq!(vm.image_url(), first_segment);
        assert!(vm.has_pending_image());

        assert!(vm.sync_image(false, start + PREVIEW_INTERVAL).unwrap());
        assert_ne!(vm.image_url(), first_segment);
        assert!(!vm.has_pending_image());
    }

    #[test]
    fn clear_and_resize_mark_the_image_stale() {
        let mut vm = ScratchpadVm::new(1.0).unwrap();
        vm.clear();
        assert!(vm.has_pending_image());
        assert!(vm.sync_image(true, Instant::now()).unwrap());

        let stale = vm.request_resize(200.0, 100.0, 1.0);
        let ticket = vm.request_resize(300.0, 200.0, 1.0);
        assert!(!vm.flush_resize(stale).unwrap());
        assert!(!vm.has_pending_image());
        assert!(vm.flush_resize(ticket).unwrap());
        assert!(vm.has_pending_image());
    }

    #[test]
    fn later_resize_uses_its_own_pixel_ratio() {
        let mut vm = ScratchpadVm::new(1.0).unwrap();
        let ticket = vm.request_resize(300.0, 200.0, 1.0);
        assert!(vm.flush_resize(ticket).unwrap());
        assert_eq!(vm.surface().backing_size(), (300, 200));

        // Same logical size after moving to a denser screen.
        let ticket = vm.request_resize(300.0, 200.0, 2.0);
        assert!(vm.flush_resize(ticket).unwrap());
        assert_eq!(vm.surface().backing_size(), (600, 400));
    }
}
