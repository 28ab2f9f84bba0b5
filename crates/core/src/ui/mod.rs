//! User interface for kroppie.
//!
//! A single-window egui application: an image list on the left, the crop
//! workspace in the centre, caption and export controls at the bottom.
//!
//! # Architecture
//!
//! The UI is split into focused submodules:
//! - [`app`]: the main application state and panel layout
//! - [`overlay`]: drawing utilities for the crop overlay
//!
//! All state transitions run to completion inside one frame callback on
//! the UI thread; the core never sees two operations interleaved.

mod app;
mod overlay;

pub use app::KroppieApp;

use crate::error::{AppError, Result};
use crate::profile::Profile;
use std::path::PathBuf;

/// Launches the main window and runs until the user closes it.
///
/// # Arguments
/// * `profile` - The persisted profile loaded at startup
/// * `initial_source` - Directory to open immediately, overriding the
///   profile's remembered source directory
pub fn run(profile: Profile, initial_source: Option<PathBuf>) -> Result<()> {
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([1200.0, 700.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Kroppie - Dataset Cropper",
        options,
        Box::new(move |_cc| {
            Ok(Box::new(KroppieApp::new(profile, initial_source)) as Box<dyn eframe::App>)
        }),
    )
    .map_err(|e| AppError::ui(format!("Failed to run UI: {e}")))
}
