//! Crop extraction and JPEG encoding.
//!
//! Takes a source-pixel region produced by the geometry engine, samples it
//! from the original file, resamples to the exact target size and writes a
//! JPEG at quality 95. The output keeps the source file's name, so the
//! encoder is selected explicitly rather than inferred from the extension.

use crate::error::{AppError, Result};
use crate::geometry::{CropSettings, SourceRect};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use log::debug;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// JPEG quality used for every export.
pub const JPEG_QUALITY: u8 = 95;

/// Samples `source_rect` from the image at `source_path`, resamples to the
/// target dimensions and writes the JPEG to `output_path`.
///
/// The rect may overshoot the image bounds by a floating-point epsilon;
/// it is clamped to the pixel grid before sampling. A region that clamps
/// to nothing is an [`AppError::EmptyCrop`].
pub fn export_crop(
    source_path: &Path,
    source_rect: &SourceRect,
    target: CropSettings,
    output_path: &Path,
) -> Result<()> {
    let source = image::open(source_path)
        .map_err(|e| AppError::load(format!("{}: {e}", source_path.display())))?;

    let (x, y, w, h) = source_rect
        .clamp_to(source.width(), source.height())
        .ok_or(AppError::EmptyCrop)?;
    debug!(
        "Sampling {w}x{h}+{x}+{y} from {} into {}x{}",
        source_path.display(),
        target.width,
        target.height
    );

    let cropped = source.crop_imm(x, y, w, h);
    let resized = cropped.resize_exact(target.width, target.height, FilterType::Lanczos3);

    let file = File::create(output_path)
        .map_err(|e| AppError::export(format!("{}: {e}", output_path.display())))?;
    let writer = BufWriter::new(file);
    let mut encoder = JpegEncoder::new_with_quality(writer, JPEG_QUALITY);
    encoder
        .encode_image(&resized.to_rgb8())
        .map_err(|e| AppError::image(format!("JPEG encode failed: {e}")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn checkered(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            if (x / 8 + y / 8) % 2 == 0 {
                Rgb([220, 40, 40])
            } else {
                Rgb([40, 40, 220])
            }
        })
    }

    #[test]
    fn exports_target_sized_jpeg() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("source.png");
        checkered(200, 160).save(&source).unwrap();

        let rect = SourceRect {
            x: 10.0,
            y: 12.0,
            width: 128.0,
            height: 128.0,
        };
        let output = dir.path().join("out.png");
        export_crop(&source, &rect, CropSettings::new(64, 64).unwrap(), &output).unwrap();

        // JPEG bytes regardless of the output extension.
        let bytes = std::fs::read(&output).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (64, 64));
    }

    #[test]
    fn clamps_epsilon_overshoot_at_edges() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("source.png");
        checkered(100, 100).save(&source).unwrap();

        let rect = SourceRect {
            x: -0.0003,
            y: 0.0,
            width: 100.0006,
            height: 100.0,
        };
        let output = dir.path().join("edge.jpg");
        export_crop(&source, &rect, CropSettings::new(64, 64).unwrap(), &output).unwrap();
        assert_eq!(image::image_dimensions(&output).unwrap(), (64, 64));
    }

    #[test]
    fn rejects_regions_outside_the_image() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("source.png");
        checkered(64, 64).save(&source).unwrap();

        let rect = SourceRect {
            x: 500.0,
            y: 500.0,
            width: 32.0,
            height: 32.0,
        };
        let err = export_crop(
            &source,
            &rect,
            CropSettings::new(64, 64).unwrap(),
            &dir.path().join("never.jpg"),
        )
        .unwrap_err();
        assert!(matches!(err, AppError::EmptyCrop));
    }

    #[test]
    fn missing_source_is_a_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let rect = SourceRect {
            x: 0.0,
            y: 0.0,
            width: 10.0,
            height: 10.0,
        };
        let err = export_crop(
            &dir.path().join("gone.png"),
            &rect,
            CropSettings::new(64, 64).unwrap(),
            &dir.path().join("out.jpg"),
        )
        .unwrap_err();
        assert!(matches!(err, AppError::ImageLoad(_)));
    }
}
