//! Kroppie Core Library
//!
//! This library provides the core functionality for Kroppie, a desktop tool
//! for preparing image training datasets: browse a directory of images,
//! position a fixed-size crop window, attach a caption plus shared tags,
//! and export the crop with its caption sidecar.
//!
//! # Overview
//!
//! The intricate part is the coordinate-transform pipeline in [`geometry`]:
//! a crop rectangle drawn in on-screen display coordinates must map back,
//! exactly, to pixel coordinates in the unscaled source image through two
//! independent scale factors (user zoom and fit-to-container display
//! scale). Everything else orchestrates around it:
//!
//! - **Geometry**: coordinate spaces and crop invariants via [`geometry`]
//! - **Session**: image list, position and processed bookkeeping via [`session`]
//! - **History**: bounded, deduplicating caption reuse via [`history`]
//! - **Profile**: persisted settings and directories via [`profile`]
//! - **Export**: crop sampling and JPEG encoding via [`export`]
//! - **Orchestration**: the workflow facade via [`workspace`]
//! - **User Interface**: the egui shell via [`ui`]
//!
//! # Quick Start
//!
//! ```ignore
//! use kroppie_core::{Profile, ui};
//!
//! let profile = Profile::load();
//! ui::run(profile, None)?;
//! ```

pub mod error;
pub mod export;
pub mod files;
pub mod geometry;
pub mod history;
pub mod profile;
pub mod session;
pub mod ui;
pub mod workspace;

// Re-export primary types for convenience
pub use error::{AppError, Result};
pub use geometry::{CropSettings, DisplayLayout, SourceRect};
pub use history::{HistoryEntry, HistoryStore};
pub use profile::Profile;
pub use session::{Direction, ImageEntry, SessionState};
pub use workspace::Workspace;
