//! Orchestration of the crop workflow.
//!
//! [`Workspace`] ties the persisted profile, the per-directory session and
//! the geometry engine together and exposes the operations the UI drives:
//! open a directory, select and step through images, keep the display
//! layout current, and run the export pipeline. Each mutating operation
//! persists the profile once when it finishes.
//!
//! Everything runs on one logical thread; an operation completes before
//! the next user event is handled, so no step of one export ever
//! interleaves with another.

use crate::error::Result;
use crate::export;
use crate::files;
use crate::geometry::{self, DisplayLayout};
use crate::profile::Profile;
use crate::session::{self, Direction, SessionState};
use eframe::egui::{Pos2, Vec2, pos2, vec2};
use log::{debug, warn};
use std::path::{Path, PathBuf};

/// Coordinates the profile, session state and collaborators.
pub struct Workspace {
    pub profile: Profile,
    pub session: SessionState,
}

impl Workspace {
    pub fn new(profile: Profile) -> Self {
        Self {
            profile,
            session: SessionState::new(),
        }
    }

    /// Writes the profile back to disk, logging (not propagating) failure
    /// so a broken config directory never blocks the workflow.
    fn persist(&self) {
        if let Err(e) = self.profile.save() {
            warn!("Could not persist profile: {e}");
        }
    }

    /// Opens a source directory: lists its images, resets the session and
    /// selects the first image. The output directory defaults to
    /// `<source>/output` the first time one is needed.
    ///
    /// Returns the number of images found.
    pub fn open_source_directory(&mut self, dir: &Path) -> Result<usize> {
        let images = files::list_images(dir)?;
        debug!("Opened {} with {} images", dir.display(), images.len());

        self.profile.source_directory = Some(dir.to_path_buf());
        if self.profile.output_directory.is_none() {
            self.profile.output_directory = Some(dir.join("output"));
        }

        let count = images.len();
        self.session.set_images(images);
        self.load_current();
        self.persist();
        Ok(count)
    }

    /// Sets the output directory explicitly.
    pub fn set_output_directory(&mut self, dir: PathBuf) {
        self.profile.output_directory = Some(dir);
        self.persist();
    }

    /// Jumps to image `i`; out-of-range indices are ignored.
    pub fn select_image(&mut self, i: usize) {
        if self.session.select(i).is_some() {
            self.load_current();
        }
    }

    /// Steps to the previous/next image, clamped at the list boundaries.
    /// The processed set is untouched. Returns `true` when the index moved.
    pub fn navigate(&mut self, direction: Direction) -> bool {
        if self.session.navigate(direction).is_some() {
            self.load_current();
            true
        } else {
            false
        }
    }

    /// Refreshes per-image state after the current index changed: probes
    /// the native size, loads the caption sidecar and resets the zoom to
    /// 100 %.
    fn load_current(&mut self) {
        let Some(entry) = self.session.current().cloned() else {
            self.session.caption.clear();
            self.session.image_size = vec2(0.0, 0.0);
            self.session.layout = None;
            return;
        };
        let (w, h) = files::probe_image_size(&entry.path);
        self.session.image_size = vec2(w as f32, h as f32);
        self.session.caption = files::read_caption(&entry.path);
        self.session.zoom_percent = 100;
        self.session.layout = None;
        self.refresh_zoom_factor();
    }

    fn refresh_zoom_factor(&mut self) {
        self.session.zoom_factor = geometry::compute_zoom_factor(
            self.session.image_size,
            self.profile.crop,
            self.session.zoom_percent,
        );
    }

    /// Moves the zoom slider. The layout is recomputed on the next
    /// [`update_layout`](Self::update_layout) call.
    pub fn set_zoom_percent(&mut self, percent: u8) {
        self.session.zoom_percent = percent.min(100);
        self.refresh_zoom_factor();
    }

    /// Applies new crop dimensions. Out-of-range values are rejected and
    /// the previous settings stay in effect; on success the zoom resets to
    /// 100 % and the layout is invalidated.
    pub fn set_crop_settings(&mut self, width: u32, height: u32) -> bool {
        if !self.profile.crop.update(width, height) {
            return false;
        }
        self.session.zoom_percent = 100;
        self.session.layout = None;
        self.refresh_zoom_factor();
        self.persist();
        true
    }

    /// Reconfigures the caption history bound; out-of-range values are
    /// rejected.
    pub fn set_history_length(&mut self, len: usize) -> bool {
        if self.profile.history.set_max_len(len) {
            self.persist();
            true
        } else {
            false
        }
    }

    pub fn set_shared_tags(&mut self, tags: String) {
        self.profile.shared_tags = tags;
        self.persist();
    }

    /// Copies a history entry back into the caption and shared tags.
    pub fn apply_history_entry(&mut self, id: &str) {
        if let Some(entry) = self.profile.history.get(id).cloned() {
            self.session.caption = entry.caption;
            self.profile.shared_tags = entry.tags;
            self.persist();
        }
    }

    pub fn delete_history_entry(&mut self, id: &str) {
        self.profile.history.delete(id);
        self.persist();
    }

    /// Recomputes the display layout for the measured container size.
    ///
    /// When a layout already exists, the crop centre is carried over as a
    /// fraction of the displayed image, so the crop stays where the user
    /// put it across zoom changes and window resizes; the first layout for
    /// an image centres the crop.
    pub fn update_layout(&mut self, container_size: Vec2) -> Option<DisplayLayout> {
        self.session.current()?;

        let previous_center = self.session.layout.as_ref().and_then(|l| {
            if l.displayed_size.x > 0.0 && l.displayed_size.y > 0.0 {
                Some(vec2(
                    l.crop_rect.center().x / l.displayed_size.x,
                    l.crop_rect.center().y / l.displayed_size.y,
                ))
            } else {
                None
            }
        });

        let mut layout = geometry::compute_display_layout(
            self.session.image_size,
            self.session.zoom_factor,
            container_size,
            self.profile.crop,
        );
        if let Some(fraction) = previous_center {
            let pointer = pos2(
                fraction.x * layout.displayed_size.x,
                fraction.y * layout.displayed_size.y,
            );
            layout.crop_rect = geometry::reposition_crop_rect(
                layout.crop_rect.size(),
                pointer,
                layout.displayed_size,
            );
        }

        self.session.layout = Some(layout);
        self.session.layout.clone()
    }

    /// Drags the crop rectangle to centre on a pointer position given in
    /// displayed-image coordinates.
    pub fn drag_crop_to(&mut self, pointer: Pos2) {
        if let Some(layout) = &mut self.session.layout {
            layout.crop_rect = geometry::reposition_crop_rect(
                layout.crop_rect.size(),
                pointer,
                layout.displayed_size,
            );
        }
    }

    /// Exports the current crop: ensures the output directory, inverts the
    /// crop rectangle to source pixels, writes the JPEG under a per-image
    /// disambiguated name, writes the caption sidecar, records the history
    /// entry and marks the image processed. With `advance`, moves to the
    /// first unprocessed image after the current one, falling back to a
    /// clamped next-step.
    ///
    /// A call without a current image or layout is a no-op (`Ok(None)`).
    /// Failures propagate from the failing step; earlier steps are not
    /// rolled back.
    pub fn export_current(&mut self, advance: bool) -> Result<Option<PathBuf>> {
        let Some(entry) = self.session.current().cloned() else {
            return Ok(None);
        };
        let Some(layout) = self.session.layout.clone() else {
            return Ok(None);
        };

        let output_dir = match &self.profile.output_directory {
            Some(dir) => dir.clone(),
            None => {
                let dir = entry.path.parent().unwrap_or(Path::new(".")).join("output");
                self.profile.output_directory = Some(dir.clone());
                dir
            }
        };
        files::ensure_directory(&output_dir)?;

        let source_rect = geometry::invert_to_source_pixels(
            layout.crop_rect,
            layout.display_scale,
            self.session.zoom_factor,
        )?;

        let crop_count = self.session.bump_crop_count(&entry.path);
        let file_name = session::export_file_name(&entry.name, crop_count);
        let output_path = output_dir.join(&file_name);

        export::export_crop(&entry.path, &source_rect, self.profile.crop, &output_path)?;

        let caption = self.session.caption.clone();
        let tags = self.profile.shared_tags.trim().to_string();
        let full_caption = if tags.is_empty() {
            caption.clone()
        } else {
            format!("{caption}, {tags}")
        };
        files::write_caption(&output_path, &full_caption)?;

        self.profile.history.record(&caption, &tags);
        self.session.mark_processed(&entry.path);
        debug!("Exported {} -> {}", entry.path.display(), output_path.display());

        if advance {
            let current = self.session.current_index().unwrap_or(0);
            match self.session.next_unprocessed_after(current) {
                Some(next) => self.select_image(next),
                None => {
                    self.navigate(Direction::Next);
                }
            }
        }

        self.persist();
        Ok(Some(output_path))
    }
}
