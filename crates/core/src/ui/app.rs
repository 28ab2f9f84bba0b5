//! Main application window.
//!
//! `KroppieApp` owns the [`Workspace`] and drives it from egui events:
//! directory selection and the image list on the left, the crop workspace
//! in the centre, caption/tags/history and export controls at the bottom.

use super::overlay;
use crate::files;
use crate::session::Direction;
use crate::workspace::Workspace;
use crate::profile::Profile;
use eframe::egui;
use log::{error, warn};
use std::path::PathBuf;

/// Darkness of the dimmed region outside the crop rectangle.
const OVERLAY_ALPHA: u8 = 128;

/// The main kroppie application window.
pub struct KroppieApp {
    workspace: Workspace,

    // Current image texture, re-uploaded when the selected path changes.
    texture: Option<egui::TextureHandle>,
    texture_path: Option<PathBuf>,

    // Crop drag state machine: Idle <-> Dragging.
    drag_active: bool,

    // History panel state
    show_history: bool,
    history_query: String,

    // Settings window state
    show_settings: bool,
    history_len_input: String,

    // Crop dimension fields; invalid text leaves the settings untouched.
    crop_width_input: String,
    crop_height_input: String,

    // Directory to open on the first frame.
    pending_open: Option<PathBuf>,

    // Last failure or export result shown in the status row.
    status: Option<String>,
}

impl KroppieApp {
    /// Creates the application from the persisted profile.
    ///
    /// # Arguments
    /// * `profile` - Profile loaded at startup
    /// * `initial_source` - Directory to open immediately; falls back to
    ///   the profile's remembered source directory
    pub fn new(profile: Profile, initial_source: Option<PathBuf>) -> Self {
        let pending_open = initial_source
            .or_else(|| profile.source_directory.clone())
            .filter(|dir| dir.is_dir());
        let crop = profile.crop;
        let history_len = profile.history.max_len();

        Self {
            workspace: Workspace::new(profile),
            texture: None,
            texture_path: None,
            drag_active: false,
            show_history: false,
            history_query: String::new(),
            show_settings: false,
            history_len_input: history_len.to_string(),
            crop_width_input: crop.width.to_string(),
            crop_height_input: crop.height.to_string(),
            pending_open,
            status: None,
        }
    }

    fn open_directory(&mut self, dir: PathBuf) {
        match self.workspace.open_source_directory(&dir) {
            Ok(count) => {
                self.status = Some(format!("Loaded {count} images from {}", dir.display()));
            }
            Err(e) => {
                error!("Could not open {}: {e}", dir.display());
                self.status = Some(format!("Could not open directory: {e}"));
            }
        }
    }

    /// Runs the export pipeline and reports the outcome in the status row.
    fn export(&mut self, advance: bool) {
        match self.workspace.export_current(advance) {
            Ok(Some(path)) => {
                self.status = Some(format!("Saved {}", path.display()));
            }
            Ok(None) => {}
            Err(e) => {
                error!("Export failed: {e}");
                self.status = Some(format!("Export failed: {e}"));
            }
        }
    }

    /// Uploads the current image as a texture when the selection changed.
    fn ensure_texture(&mut self, ctx: &egui::Context) {
        let Some(entry) = self.workspace.session.current() else {
            self.texture = None;
            self.texture_path = None;
            return;
        };
        if self.texture_path.as_deref() == Some(entry.path.as_path()) {
            return;
        }
        let path = entry.path.clone();

        match image::open(&path) {
            Ok(img) => {
                let rgba = img.to_rgba8();
                let size = [img.width() as usize, img.height() as usize];
                let pixels = rgba.as_flat_samples();
                let color_image = egui::ColorImage::from_rgba_unmultiplied(size, pixels.as_slice());
                self.texture = Some(ctx.load_texture(
                    path.display().to_string(),
                    color_image,
                    egui::TextureOptions::LINEAR,
                ));
            }
            Err(e) => {
                warn!("Could not load {}: {e}", path.display());
                self.status = Some(format!("Could not load image: {e}"));
                self.texture = None;
            }
        }
        self.texture_path = Some(path);
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        let (save, save_next) = ctx.input(|i| {
            (
                i.modifiers.command && i.key_pressed(egui::Key::S),
                i.modifiers.command && i.key_pressed(egui::Key::N),
            )
        });
        if save {
            self.export(false);
        }
        if save_next {
            self.export(true);
        }

        // Arrow navigation only while no text field has focus.
        if ctx.memory(|m| m.focused().is_none()) {
            let (prev, next) = ctx.input(|i| {
                (
                    i.key_pressed(egui::Key::ArrowLeft),
                    i.key_pressed(egui::Key::ArrowRight),
                )
            });
            if prev {
                self.workspace.navigate(Direction::Previous);
            }
            if next {
                self.workspace.navigate(Direction::Next);
            }
        }
    }

    // =====================================================================
    // Panels
    // =====================================================================

    fn directory_panel(&mut self, ui: &mut egui::Ui) {
        ui.heading("Directories");

        ui.horizontal(|ui| {
            if ui.button("Source…").clicked() {
                if let Some(dir) = files::pick_directory("Select source directory") {
                    self.open_directory(dir);
                }
            }
            let source = self
                .workspace
                .profile
                .source_directory
                .as_ref()
                .map(|d| d.display().to_string())
                .unwrap_or_else(|| "not selected".to_string());
            ui.label(egui::RichText::new(source).small()).on_hover_text("Source directory");
        });

        ui.horizontal(|ui| {
            if ui.button("Output…").clicked() {
                if let Some(dir) = files::pick_directory("Select output directory") {
                    self.workspace.set_output_directory(dir);
                }
            }
            let output = self
                .workspace
                .profile
                .output_directory
                .as_ref()
                .map(|d| d.display().to_string())
                .unwrap_or_else(|| "not selected".to_string());
            ui.label(egui::RichText::new(output).small()).on_hover_text("Output directory");
        });

        ui.separator();
        ui.heading(format!("Images ({})", self.workspace.session.images().len()));

        let current = self.workspace.session.current_index();
        let mut clicked = None;
        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for (i, entry) in self.workspace.session.images().iter().enumerate() {
                    let processed = self.workspace.session.is_processed(&entry.path);
                    let marker = if processed { "\u{2714} " } else { "" };
                    let selected = current == Some(i);
                    if ui
                        .selectable_label(selected, format!("{marker}{}", entry.name))
                        .clicked()
                    {
                        clicked = Some(i);
                    }
                }
            });
        if let Some(i) = clicked {
            self.workspace.select_image(i);
        }
    }

    fn caption_panel(&mut self, ui: &mut egui::Ui) {
        ui.add_space(4.0);
        ui.horizontal(|ui| {
            ui.label("Caption:");
            ui.add(
                egui::TextEdit::singleline(&mut self.workspace.session.caption)
                    .desired_width(f32::INFINITY)
                    .hint_text("Describe this image"),
            );
        });

        ui.horizontal(|ui| {
            ui.label("Shared tags:");
            let mut tags = self.workspace.profile.shared_tags.clone();
            let response = ui.add(
                egui::TextEdit::singleline(&mut tags)
                    .desired_width(f32::INFINITY)
                    .hint_text("Appended to every exported caption"),
            );
            if response.changed() {
                self.workspace.set_shared_tags(tags);
            }
        });

        self.history_row(ui);
        self.action_row(ui);
        self.status_row(ui);
        ui.add_space(4.0);
    }

    fn history_row(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if ui
                .selectable_label(self.show_history, "History")
                .on_hover_text("Reuse a previous caption")
                .clicked()
            {
                self.show_history = !self.show_history;
            }
            if self.show_history {
                ui.add(
                    egui::TextEdit::singleline(&mut self.history_query)
                        .desired_width(220.0)
                        .hint_text("Search history"),
                );
            }
        });

        if !self.show_history {
            return;
        }

        let query = self.history_query.trim().to_string();
        let entries: Vec<_> = if query.is_empty() {
            self.workspace.profile.history.list().to_vec()
        } else {
            self.workspace
                .profile
                .history
                .search(&query)
                .into_iter()
                .cloned()
                .collect()
        };
        if entries.is_empty() {
            return;
        }

        let mut apply = None;
        let mut remove = None;
        egui::ScrollArea::vertical()
            .max_height(140.0)
            .id_salt("history_scroll")
            .show(ui, |ui| {
                for entry in &entries {
                    ui.horizontal(|ui| {
                        if ui.button("\u{00d7}").on_hover_text("Delete entry").clicked() {
                            remove = Some(entry.id.clone());
                        }
                        let mut preview = entry.caption.clone();
                        if preview.chars().count() > 60 {
                            preview = preview.chars().take(57).collect::<String>() + "…";
                        }
                        let text = if entry.tags.is_empty() {
                            preview
                        } else {
                            format!("{preview}  [{}]", entry.tags)
                        };
                        if ui
                            .selectable_label(false, text)
                            .on_hover_text(&entry.timestamp)
                            .clicked()
                        {
                            apply = Some(entry.id.clone());
                        }
                    });
                }
            });
        if let Some(id) = remove {
            self.workspace.delete_history_entry(&id);
        }
        if let Some(id) = apply {
            self.workspace.apply_history_entry(&id);
        }
    }

    fn action_row(&mut self, ui: &mut egui::Ui) {
        let has_image = self.workspace.session.current().is_some();
        let index = self.workspace.session.current_index();
        let total = self.workspace.session.images().len();

        ui.horizontal(|ui| {
            if ui.add_enabled(has_image, egui::Button::new("\u{25c0} Prev")).clicked() {
                self.workspace.navigate(Direction::Previous);
            }
            ui.label(match index {
                Some(i) => format!("{} of {total}", i + 1),
                None => "0 of 0".to_string(),
            });
            if ui.add_enabled(has_image, egui::Button::new("Next \u{25b6}")).clicked() {
                self.workspace.navigate(Direction::Next);
            }

            ui.separator();

            if ui
                .add_enabled(has_image, egui::Button::new("Crop + Save"))
                .on_hover_text("Ctrl+S")
                .clicked()
            {
                self.export(false);
            }
            if ui
                .add_enabled(has_image, egui::Button::new("Crop + Next"))
                .on_hover_text("Ctrl+N")
                .clicked()
            {
                self.export(true);
            }

            ui.separator();

            if ui.button("\u{2699} Settings").clicked() {
                self.show_settings = !self.show_settings;
            }
            let output_dir = self.workspace.profile.output_directory.clone();
            if ui
                .add_enabled(output_dir.is_some(), egui::Button::new("Open output folder"))
                .clicked()
            {
                if let Some(dir) = output_dir {
                    files::open_in_file_manager(&dir);
                }
            }
        });
    }

    fn status_row(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label(format!(
                "Processed: {}/{}",
                self.workspace.session.processed_count(),
                self.workspace.session.images().len()
            ));
            if let Some(layout) = &self.workspace.session.layout {
                ui.separator();
                ui.label(format!("Scale: {:.0}%", layout.display_scale * 100.0));
            }
            if let Some(status) = &self.status {
                ui.separator();
                ui.label(egui::RichText::new(status).small());
            }
        });
    }

    fn crop_controls(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label("Zoom:");
            let mut percent = self.workspace.session.zoom_percent;
            let slider = ui.add(
                egui::Slider::new(&mut percent, 0..=100)
                    .suffix("%")
                    .show_value(true),
            );
            if slider.changed() {
                self.workspace.set_zoom_percent(percent);
            }

            ui.separator();

            ui.label("Crop:");
            let width_edit = ui.add(
                egui::TextEdit::singleline(&mut self.crop_width_input).desired_width(56.0),
            );
            ui.label("\u{00d7}");
            let height_edit = ui.add(
                egui::TextEdit::singleline(&mut self.crop_height_input).desired_width(56.0),
            );

            if width_edit.changed() || height_edit.changed() {
                if let (Ok(w), Ok(h)) = (
                    self.crop_width_input.trim().parse::<u32>(),
                    self.crop_height_input.trim().parse::<u32>(),
                ) {
                    // Out-of-range values are rejected; the previous
                    // settings stay in effect.
                    self.workspace.set_crop_settings(w, h);
                }
            }
            if width_edit.lost_focus() || height_edit.lost_focus() {
                self.crop_width_input = self.workspace.profile.crop.width.to_string();
                self.crop_height_input = self.workspace.profile.crop.height.to_string();
            }

            ui.label(format!(
                "px (output {}\u{00d7}{})",
                self.workspace.profile.crop.width, self.workspace.profile.crop.height
            ));
        });
    }

    /// Lays out the current image inside the available rect and handles
    /// crop dragging.
    fn image_workspace(&mut self, ui: &mut egui::Ui) {
        let container = ui.available_rect_before_wrap();
        if self.workspace.session.current().is_none() {
            ui.painter().text(
                container.center(),
                egui::Align2::CENTER_CENTER,
                "Select a source directory to begin",
                egui::FontId::proportional(16.0),
                ui.visuals().weak_text_color(),
            );
            return;
        }

        let Some(layout) = self.workspace.update_layout(container.size()) else {
            return;
        };
        let origin = egui::pos2(
            container.min.x + (container.width() - layout.displayed_size.x) / 2.0,
            container.min.y + (container.height() - layout.displayed_size.y) / 2.0,
        );
        let image_rect = egui::Rect::from_min_size(origin, layout.displayed_size);

        if let Some(texture) = &self.texture {
            ui.painter().image(
                texture.id(),
                image_rect,
                egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                egui::Color32::WHITE,
            );
        }

        // Idle -> Dragging -> Idle; every event yields a freshly clamped rect.
        let response = ui.interact(image_rect, ui.id().with("crop_drag"), egui::Sense::click_and_drag());
        if response.drag_started() {
            self.drag_active = true;
        }
        if response.drag_stopped() {
            self.drag_active = false;
        }
        if (self.drag_active && response.dragged()) || response.drag_started() || response.clicked()
        {
            if let Some(pointer) = response.interact_pointer_pos() {
                let local = egui::pos2(pointer.x - origin.x, pointer.y - origin.y);
                self.workspace.drag_crop_to(local);
            }
        }

        if let Some(layout) = &self.workspace.session.layout {
            let crop_screen = layout.crop_rect.translate(origin.to_vec2());
            overlay::draw_crop_overlay(ui.painter(), image_rect, crop_screen, OVERLAY_ALPHA);
            overlay::draw_crop_frame(ui.painter(), crop_screen);
            overlay::draw_size_label(
                ui.painter(),
                crop_screen,
                self.workspace.profile.crop.width,
                self.workspace.profile.crop.height,
            );
        }
    }

    fn settings_window(&mut self, ctx: &egui::Context) {
        let mut open = self.show_settings;
        egui::Window::new("Settings")
            .open(&mut open)
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label("History length (10-500):");
                    ui.add(
                        egui::TextEdit::singleline(&mut self.history_len_input).desired_width(56.0),
                    );
                });
                if ui.button("Save").clicked() {
                    let applied = self
                        .history_len_input
                        .trim()
                        .parse::<usize>()
                        .ok()
                        .map(|len| self.workspace.set_history_length(len))
                        .unwrap_or(false);
                    if !applied {
                        // Rejected: restore the effective value.
                        self.history_len_input =
                            self.workspace.profile.history.max_len().to_string();
                    }
                    self.show_settings = false;
                }
            });
        if !open {
            self.show_settings = false;
        }
    }
}

impl eframe::App for KroppieApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if let Some(dir) = self.pending_open.take() {
            self.open_directory(dir);
        }

        self.ensure_texture(ctx);
        self.handle_shortcuts(ctx);

        egui::SidePanel::left("image_list")
            .default_width(280.0)
            .show(ctx, |ui| self.directory_panel(ui));

        egui::TopBottomPanel::bottom("caption_panel").show(ctx, |ui| self.caption_panel(ui));

        egui::CentralPanel::default().show(ctx, |ui| {
            self.crop_controls(ui);
            ui.separator();
            self.image_workspace(ui);
        });

        if self.show_settings {
            self.settings_window(ctx);
        }
    }
}
