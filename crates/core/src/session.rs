//! Per-directory session state: the image list, the current position,
//! processed bookkeeping and per-image crop counters.
//!
//! Nothing here touches the filesystem; the orchestrator feeds listings in
//! and reads transitions out. All of it resets when a new source directory
//! is opened, except that the caption history (which outlives any single
//! directory) lives in the profile instead.

use crate::geometry::DisplayLayout;
use eframe::egui::{Vec2, vec2};
use log::warn;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// Direction for stepping through the image list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

/// One image file in the source directory listing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageEntry {
    pub name: String,
    pub path: PathBuf,
}

/// Mutable state for the currently open source directory.
#[derive(Default)]
pub struct SessionState {
    images: Vec<ImageEntry>,
    current_index: Option<usize>,
    processed: HashSet<PathBuf>,
    crop_counter: HashMap<PathBuf, u32>,

    /// Zoom slider position in `[0, 100]`.
    pub zoom_percent: u8,
    /// Zoom factor derived from the slider for the current image.
    pub zoom_factor: f32,
    /// Native pixel size of the current image.
    pub image_size: Vec2,
    /// Caption text being edited for the current image.
    pub caption: String,
    /// Layout computed for the last known container size, if any.
    pub layout: Option<DisplayLayout>,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            zoom_percent: 100,
            zoom_factor: 1.0,
            image_size: vec2(0.0, 0.0),
            ..Self::default()
        }
    }

    /// Replaces the image list, resetting the index, the processed set and
    /// the crop counters. The index lands on 0 for a non-empty list.
    pub fn set_images(&mut self, images: Vec<ImageEntry>) {
        self.current_index = if images.is_empty() { None } else { Some(0) };
        self.images = images;
        self.processed.clear();
        self.crop_counter.clear();
        self.layout = None;
    }

    pub fn images(&self) -> &[ImageEntry] {
        &self.images
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    pub fn current(&self) -> Option<&ImageEntry> {
        self.current_index.and_then(|i| self.images.get(i))
    }

    /// Jumps to index `i`. Out-of-range indices are ignored.
    pub fn select(&mut self, i: usize) -> Option<&ImageEntry> {
        if i >= self.images.len() {
            warn!("Ignoring selection of out-of-range image index {i}");
            return None;
        }
        self.current_index = Some(i);
        self.layout = None;
        self.images.get(i)
    }

    /// Steps the index by one, clamped to the list bounds. Returns the new
    /// index when it changed.
    pub fn navigate(&mut self, direction: Direction) -> Option<usize> {
        let current = self.current_index?;
        let next = match direction {
            Direction::Next => (current + 1).min(self.images.len().saturating_sub(1)),
            Direction::Previous => current.saturating_sub(1),
        };
        if next == current {
            return None;
        }
        self.current_index = Some(next);
        self.layout = None;
        Some(next)
    }

    /// The first index after `after` whose image has not been processed.
    pub fn next_unprocessed_after(&self, after: usize) -> Option<usize> {
        self.images
            .iter()
            .enumerate()
            .skip(after + 1)
            .find(|(_, entry)| !self.processed.contains(&entry.path))
            .map(|(i, _)| i)
    }

    pub fn mark_processed(&mut self, path: &Path) {
        self.processed.insert(path.to_path_buf());
    }

    pub fn is_processed(&self, path: &Path) -> bool {
        self.processed.contains(path)
    }

    pub fn processed_count(&self) -> usize {
        self.processed.len()
    }

    /// Increments and returns the crop counter for a source image. The
    /// first call for a path returns 1.
    pub fn bump_crop_count(&mut self, path: &Path) -> u32 {
        let count = self.crop_counter.entry(path.to_path_buf()).or_insert(0);
        *count += 1;
        *count
    }
}

/// Output filename for the `crop_count`-th export of a source image:
/// the original name for the first crop, `<stem>_crop<N><ext>` after.
pub fn export_file_name(name: &str, crop_count: u32) -> String {
    if crop_count <= 1 {
        return name.to_string();
    }
    match name.rfind('.') {
        Some(dot) if dot > 0 => {
            let (stem, ext) = name.split_at(dot);
            format!("{stem}_crop{crop_count}{ext}")
        }
        _ => format!("{name}_crop{crop_count}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str) -> ImageEntry {
        ImageEntry {
            name: name.to_string(),
            path: PathBuf::from(format!("/imgs/{name}")),
        }
    }

    fn session_with(names: &[&str]) -> SessionState {
        let mut session = SessionState::new();
        session.set_images(names.iter().map(|n| entry(n)).collect());
        session
    }

    #[test]
    fn set_images_resets_index_and_bookkeeping() {
        let mut session = session_with(&["a.jpg", "b.jpg"]);
        session.mark_processed(Path::new("/imgs/a.jpg"));
        session.bump_crop_count(Path::new("/imgs/a.jpg"));

        session.set_images(vec![entry("c.jpg")]);
        assert_eq!(session.current_index(), Some(0));
        assert_eq!(session.processed_count(), 0);
        assert_eq!(session.bump_crop_count(Path::new("/imgs/c.jpg")), 1);
    }

    #[test]
    fn empty_list_has_no_current_image() {
        let session = session_with(&[]);
        assert_eq!(session.current_index(), None);
        assert!(session.current().is_none());
    }

    #[test]
    fn navigation_clamps_at_boundaries() {
        let mut session = session_with(&["a.jpg", "b.jpg", "c.jpg"]);
        assert_eq!(session.navigate(Direction::Previous), None);
        assert_eq!(session.navigate(Direction::Next), Some(1));
        assert_eq!(session.navigate(Direction::Next), Some(2));
        assert_eq!(session.navigate(Direction::Next), None);
        assert_eq!(session.current_index(), Some(2));
    }

    #[test]
    fn select_ignores_out_of_range() {
        let mut session = session_with(&["a.jpg"]);
        assert!(session.select(3).is_none());
        assert_eq!(session.current_index(), Some(0));
    }

    #[test]
    fn next_unprocessed_skips_processed_entries() {
        let mut session = session_with(&["a.jpg", "b.jpg", "c.jpg", "d.jpg"]);
        session.mark_processed(Path::new("/imgs/b.jpg"));
        session.mark_processed(Path::new("/imgs/c.jpg"));

        assert_eq!(session.next_unprocessed_after(0), Some(3));
        assert_eq!(session.next_unprocessed_after(3), None);
    }

    #[test]
    fn crop_counter_increments_per_path() {
        let mut session = session_with(&["a.jpg", "b.jpg"]);
        let a = Path::new("/imgs/a.jpg");
        let b = Path::new("/imgs/b.jpg");
        assert_eq!(session.bump_crop_count(a), 1);
        assert_eq!(session.bump_crop_count(a), 2);
        assert_eq!(session.bump_crop_count(b), 1);
        assert_eq!(session.bump_crop_count(a), 3);
    }

    #[test]
    fn export_names_disambiguate_repeat_crops() {
        assert_eq!(export_file_name("foo.jpg", 1), "foo.jpg");
        assert_eq!(export_file_name("foo.jpg", 2), "foo_crop2.jpg");
        assert_eq!(export_file_name("foo.jpg", 3), "foo_crop3.jpg");
    }

    #[test]
    fn export_names_handle_odd_stems() {
        assert_eq!(export_file_name("archive.tar.png", 2), "archive.tar_crop2.png");
        assert_eq!(export_file_name("noext", 2), "noext_crop2");
        assert_eq!(export_file_name(".hidden", 2), ".hidden_crop2");
    }
}
