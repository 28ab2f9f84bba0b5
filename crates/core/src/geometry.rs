//! Coordinate transforms for the crop workflow.
//!
//! Three coordinate spaces are involved: the source image's native pixels,
//! the zoomed image (source scaled by the user-controlled zoom factor), and
//! the displayed image (zoomed image scaled down to fit the viewing area).
//! Everything here is a pure function of its arguments so the math stays
//! testable without any UI toolkit attached.
//!
//! The forward direction (`compute_display_layout`) produces what is drawn
//! on screen; `invert_to_source_pixels` is its exact algebraic inverse and
//! is applied once per export to recover the region of original pixels the
//! user framed. The two must stay in lockstep: any asymmetry silently
//! corrupts every exported crop.

use crate::error::{AppError, Result};
use eframe::egui::{Pos2, Rect, Vec2, pos2, vec2};
use serde::{Deserialize, Serialize};

/// Inset reserved around the displayed image for visual margin, in points.
pub const CONTAINER_PADDING: f32 = 40.0;

/// Smallest accepted crop dimension, in pixels.
pub const MIN_CROP_DIM: u32 = 64;
/// Largest accepted crop dimension, in pixels.
pub const MAX_CROP_DIM: u32 = 2048;

/// Output pixel dimensions of every exported crop.
///
/// Both dimensions are bounded to `[MIN_CROP_DIM, MAX_CROP_DIM]`;
/// out-of-range updates are rejected and leave the previous value intact.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropSettings {
    pub width: u32,
    pub height: u32,
}

impl CropSettings {
    /// Creates crop settings if both dimensions are within bounds.
    pub fn new(width: u32, height: u32) -> Option<Self> {
        let range = MIN_CROP_DIM..=MAX_CROP_DIM;
        if range.contains(&width) && range.contains(&height) {
            Some(Self { width, height })
        } else {
            None
        }
    }

    /// Applies new dimensions, returning `false` (and keeping the current
    /// value) when either is out of range.
    pub fn update(&mut self, width: u32, height: u32) -> bool {
        match Self::new(width, height) {
            Some(next) => {
                *self = next;
                true
            }
            None => false,
        }
    }

    /// The target size as a float vector.
    pub fn size(&self) -> Vec2 {
        vec2(self.width as f32, self.height as f32)
    }
}

impl Default for CropSettings {
    fn default() -> Self {
        Self {
            width: 512,
            height: 512,
        }
    }
}

/// Result of fitting the zoomed image into a container.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DisplayLayout {
    /// Fit-to-container multiplier applied after zoom; never exceeds 1.0.
    pub display_scale: f32,
    /// On-screen size of the image (zoomed, then display-scaled).
    pub displayed_size: Vec2,
    /// The crop rectangle in display coordinates, relative to the
    /// displayed image's top-left corner.
    pub crop_rect: Rect,
}

/// A crop region in the source image's native pixel coordinates.
///
/// Values are kept as floats: they may exceed the image bounds by a
/// floating-point epsilon at the edges, and samplers are expected to clamp
/// rather than reject.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SourceRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl SourceRect {
    /// Clamps the region to `[0, width) x [0, height)` and rounds to whole
    /// pixels. Returns `None` when nothing remains.
    pub fn clamp_to(&self, image_width: u32, image_height: u32) -> Option<(u32, u32, u32, u32)> {
        let x0 = self.x.max(0.0).min(image_width as f32);
        let y0 = self.y.max(0.0).min(image_height as f32);
        let x1 = (self.x + self.width).clamp(0.0, image_width as f32);
        let y1 = (self.y + self.height).clamp(0.0, image_height as f32);

        let w = (x1 - x0).round() as u32;
        let h = (y1 - y0).round() as u32;
        if w == 0 || h == 0 {
            return None;
        }
        Some((x0.floor() as u32, y0.floor() as u32, w, h))
    }
}

/// Computes the zoom factor for a slider position in `[0, 100]`.
///
/// At 100 the source is shown at its native resolution (factor 1.0); at 0
/// the crop area exactly fills the zoomed image along its tighter axis.
/// The lower bound `min_zoom = max(crop_w / img_w, crop_h / img_h)` keeps
/// the crop rectangle inside the zoomed image in both dimensions.
///
/// Images with a zero dimension cannot be zoomed meaningfully; the factor
/// falls back to 1.0 so callers never divide by zero.
pub fn compute_zoom_factor(image_size: Vec2, crop: CropSettings, zoom_percent: u8) -> f32 {
    if image_size.x <= 0.0 || image_size.y <= 0.0 {
        return 1.0;
    }

    let min_zoom = (crop.width as f32 / image_size.x).max(crop.height as f32 / image_size.y);
    let percent = zoom_percent.min(100) as f32 / 100.0;
    min_zoom + (1.0 - min_zoom) * percent
}

/// Fits the zoomed image into `container_size` and centers the crop rect.
///
/// The zoom factor is applied first, then a display scale of
/// `min(fit_x, fit_y, 1.0)` computed against the container minus a fixed
/// padding inset. The display scale never upscales past 1.0.
pub fn compute_display_layout(
    image_size: Vec2,
    zoom_factor: f32,
    container_size: Vec2,
    crop: CropSettings,
) -> DisplayLayout {
    let max_w = (container_size.x - CONTAINER_PADDING).max(1.0);
    let max_h = (container_size.y - CONTAINER_PADDING).max(1.0);

    let zoomed = image_size * zoom_factor;
    let display_scale = (max_w / zoomed.x).min(max_h / zoomed.y).min(1.0);
    let displayed_size = zoomed * display_scale;

    let crop_size = crop.size() * display_scale;
    let origin = pos2(
        (displayed_size.x - crop_size.x) / 2.0,
        (displayed_size.y - crop_size.y) / 2.0,
    );

    DisplayLayout {
        display_scale,
        displayed_size,
        crop_rect: Rect::from_min_size(origin, crop_size),
    }
}

/// Recenters a crop rectangle of fixed size on a pointer position, clamped
/// so it stays inside the displayed image. The size never changes; only
/// the position moves.
pub fn reposition_crop_rect(crop_size: Vec2, pointer: Pos2, displayed_size: Vec2) -> Rect {
    let max_x = (displayed_size.x - crop_size.x).max(0.0);
    let max_y = (displayed_size.y - crop_size.y).max(0.0);

    let origin = pos2(
        (pointer.x - crop_size.x / 2.0).clamp(0.0, max_x),
        (pointer.y - crop_size.y / 2.0).clamp(0.0, max_y),
    );
    Rect::from_min_size(origin, crop_size)
}

/// Maps a display-space crop rectangle back to source pixels.
///
/// This is the exact inverse of the forward layout transform: display
/// coordinates are divided by the display scale to reach the zoomed space,
/// then by the zoom factor to reach native pixels. With zoom 1 and scale 1
/// the result reads exactly `crop_w x crop_h` source pixels.
pub fn invert_to_source_pixels(
    crop_rect: Rect,
    display_scale: f32,
    zoom_factor: f32,
) -> Result<SourceRect> {
    if display_scale <= 0.0 || zoom_factor <= 0.0 {
        return Err(AppError::DegenerateTransform {
            scale: display_scale,
            zoom: zoom_factor,
        });
    }

    let to_source = 1.0 / (display_scale * zoom_factor);
    Ok(SourceRect {
        x: crop_rect.min.x * to_source,
        y: crop_rect.min.y * to_source,
        width: crop_rect.width() * to_source,
        height: crop_rect.height() * to_source,
    })
}
