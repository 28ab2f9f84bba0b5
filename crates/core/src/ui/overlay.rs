//! Drawing helpers for the crop overlay.
//!
//! The displayed image is dimmed everywhere except the crop rectangle,
//! which gets a border, corner handles and a size label.

use eframe::egui;

/// Accent color for the crop chrome.
pub const CROP_ACCENT: egui::Color32 = egui::Color32::from_rgb(0xfb, 0xbf, 0x24);

/// Side length of the square corner handles, in points.
const CORNER_SIZE: f32 = 6.0;

/// Draws the dark overlay with a transparent "cutout" for the crop area.
///
/// # Arguments
/// * `painter` - The egui painter to draw with
/// * `image_rect` - The displayed image's on-screen rectangle
/// * `crop_rect` - The crop area (screen coordinates) to keep clear
/// * `alpha` - Darkness level (0-255, higher = darker)
pub fn draw_crop_overlay(
    painter: &egui::Painter,
    image_rect: egui::Rect,
    crop_rect: egui::Rect,
    alpha: u8,
) {
    let color = egui::Color32::from_black_alpha(alpha);
    let (img, crop) = (image_rect, crop_rect);

    // Full-width bands above and below the crop, side bands between them.
    let regions = [
        egui::Rect::from_min_max(img.min, egui::pos2(img.max.x, crop.min.y)),
        egui::Rect::from_min_max(egui::pos2(img.min.x, crop.max.y), img.max),
        egui::Rect::from_min_max(egui::pos2(img.min.x, crop.min.y), egui::pos2(crop.min.x, crop.max.y)),
        egui::Rect::from_min_max(egui::pos2(crop.max.x, crop.min.y), egui::pos2(img.max.x, crop.max.y)),
    ];
    for region in regions {
        painter.rect_filled(region, 0.0, color);
    }
}

/// Draws the crop border with corner handles.
pub fn draw_crop_frame(painter: &egui::Painter, crop_rect: egui::Rect) {
    painter.rect_stroke(
        crop_rect,
        0.0,
        egui::Stroke::new(2.0, CROP_ACCENT),
        egui::StrokeKind::Middle,
    );

    for corner in [
        crop_rect.min,
        egui::pos2(crop_rect.max.x, crop_rect.min.y),
        egui::pos2(crop_rect.min.x, crop_rect.max.y),
        crop_rect.max,
    ] {
        painter.rect_filled(
            egui::Rect::from_center_size(corner, egui::vec2(CORNER_SIZE, CORNER_SIZE)),
            0.0,
            CROP_ACCENT,
        );
    }
}

/// Draws the `WxH` target-size label above the crop rectangle.
pub fn draw_size_label(painter: &egui::Painter, crop_rect: egui::Rect, width: u32, height: u32) {
    painter.text(
        egui::pos2(crop_rect.center().x, crop_rect.min.y - 4.0),
        egui::Align2::CENTER_BOTTOM,
        format!("{width}\u{00d7}{height}"),
        egui::FontId::proportional(12.0),
        CROP_ACCENT,
    );
}
