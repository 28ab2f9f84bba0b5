//! Thin filesystem collaborators: directory listing, dimension probing,
//! caption sidecar I/O and a couple of best-effort desktop integrations.

use crate::error::{AppError, Result};
use crate::session::ImageEntry;
use log::warn;
use std::fs;
use std::path::{Path, PathBuf};

/// Recognized raster extensions for source directory listings.
pub const SUPPORTED_IMAGE_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "bmp", "gif", "webp"];

/// Size assumed for images whose header cannot be read.
pub const FALLBACK_IMAGE_SIZE: (u32, u32) = (1920, 1080);

/// Lists image files in `dir`, filtered by extension and sorted by name so
/// the order stays stable for the session.
pub fn list_images(dir: &Path) -> Result<Vec<ImageEntry>> {
    let entries =
        fs::read_dir(dir).map_err(|e| AppError::scan(format!("{}: {e}", dir.display())))?;
    let mut images: Vec<ImageEntry> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && has_supported_extension(path))
        .filter_map(|path| {
            let name = path.file_name()?.to_str()?.to_string();
            Some(ImageEntry { name, path })
        })
        .collect();

    images.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(images)
}

fn has_supported_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SUPPORTED_IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Reads an image's pixel dimensions from its header.
///
/// Probe failures fall back to [`FALLBACK_IMAGE_SIZE`] so the viewer stays
/// usable; the export path re-decodes the file and reports real errors.
pub fn probe_image_size(path: &Path) -> (u32, u32) {
    match image::image_dimensions(path) {
        Ok(dims) => dims,
        Err(e) => {
            warn!("Could not probe {}: {e}", path.display());
            FALLBACK_IMAGE_SIZE
        }
    }
}

/// Path of the `.txt` sidecar belonging to an image path.
pub fn caption_path(image_path: &Path) -> PathBuf {
    image_path.with_extension("txt")
}

/// Reads the caption sidecar for an image, trimmed. Returns an empty
/// string when the sidecar does not exist.
pub fn read_caption(image_path: &Path) -> String {
    fs::read_to_string(caption_path(image_path))
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

/// Writes (or overwrites) the caption sidecar for an exported image.
pub fn write_caption(output_image_path: &Path, text: &str) -> Result<()> {
    fs::write(caption_path(output_image_path), text)?;
    Ok(())
}

/// Creates `path` and any missing parents. Idempotent.
pub fn ensure_directory(path: &Path) -> Result<()> {
    fs::create_dir_all(path)?;
    Ok(())
}

/// Opens the native directory picker. Returns `None` when cancelled.
pub fn pick_directory(title: &str) -> Option<PathBuf> {
    rfd::FileDialog::new().set_title(title).pick_folder()
}

/// Reveals a directory in the platform file manager. Best-effort: failure
/// is logged and otherwise ignored.
pub fn open_in_file_manager(path: &Path) {
    #[cfg(target_os = "macos")]
    let launcher = "open";
    #[cfg(target_os = "windows")]
    let launcher = "explorer";
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    let launcher = "xdg-open";

    if let Err(e) = std::process::Command::new(launcher).arg(path).spawn() {
        warn!("Could not open {} in file manager: {e}", path.display());
    }
}
