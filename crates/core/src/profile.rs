//! Persisted user profile.
//!
//! Everything that survives a restart lives in one struct written as JSON
//! to the user's config directory (e.g. `~/.config/kroppie/profile.json`
//! on Linux): directories, shared tags, crop settings and the caption
//! history. Mutating operations call [`Profile::save`] once when done.
//!
//! The backing file is remembered on the profile itself, so callers can
//! load from (and save to) any path; only [`Profile::load`] resolves the
//! per-user location.

use crate::error::Result;
use crate::geometry::CropSettings;
use crate::history::HistoryStore;
use directories::ProjectDirs;
use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// User-profile state persisted between sessions.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Profile {
    /// Last opened source directory; reopened on startup when still valid.
    #[serde(default)]
    pub source_directory: Option<PathBuf>,
    /// Export destination. Defaults to `<source>/output` the first time it
    /// is needed and is not recomputed afterwards.
    #[serde(default)]
    pub output_directory: Option<PathBuf>,
    /// Session-wide suffix appended to every exported caption.
    #[serde(default)]
    pub shared_tags: String,
    #[serde(default)]
    pub crop: CropSettings,
    #[serde(default)]
    pub history: HistoryStore,
    /// File this profile was loaded from and saves back to. Profiles
    /// built without one (e.g. `Profile::default()`) are never written.
    #[serde(skip)]
    storage_path: Option<PathBuf>,
}

impl Profile {
    /// Per-user location of the profile file.
    fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "kroppie").map(|dirs| dirs.config_dir().join("profile.json"))
    }

    /// Loads the profile from the user's config directory, falling back to
    /// defaults when the file is missing or unreadable.
    pub fn load() -> Self {
        match Self::default_path() {
            Some(path) => Self::load_from(path),
            None => Self::default(),
        }
    }

    /// Loads the profile from an explicit file, remembering it as the
    /// target for [`save`](Self::save). A missing or malformed file yields
    /// defaults backed by the same path.
    pub fn load_from(path: PathBuf) -> Self {
        let mut profile: Profile = fs::read_to_string(&path)
            .ok()
            .and_then(|content| match serde_json::from_str(&content) {
                Ok(profile) => Some(profile),
                Err(e) => {
                    warn!("Ignoring malformed profile: {e}");
                    None
                }
            })
            .unwrap_or_default();
        profile.storage_path = Some(path);
        profile
    }

    /// Persists the profile to its backing file, creating missing parent
    /// directories. A profile without a backing file is left unsaved.
    ///
    /// # Errors
    /// Returns an error if serialization or file writing fails.
    pub fn save(&self) -> Result<()> {
        let Some(path) = &self.storage_path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_json() {
        let mut profile = Profile {
            source_directory: Some(PathBuf::from("/data/source")),
            shared_tags: "style, test".to_string(),
            ..Profile::default()
        };
        profile.history.record("a cat", "animal");

        let json = serde_json::to_string(&profile).unwrap();
        let back: Profile = serde_json::from_str(&json).unwrap();
        assert_eq!(back.source_directory, profile.source_directory);
        assert_eq!(back.shared_tags, "style, test");
        assert_eq!(back.history.list().len(), 1);
        assert_eq!(back.crop, CropSettings::default());
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let back: Profile = serde_json::from_str("{}").unwrap();
        assert!(back.source_directory.is_none());
        assert!(back.output_directory.is_none());
        assert_eq!(back.crop, CropSettings::default());
        assert!(back.history.list().is_empty());
    }

    #[test]
    fn saves_back_to_the_loaded_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("profile.json");

        let mut profile = Profile::load_from(path.clone());
        assert!(profile.source_directory.is_none());

        profile.shared_tags = "studio lighting".to_string();
        profile.save().unwrap();
        assert!(path.is_file());

        let back = Profile::load_from(path);
        assert_eq!(back.shared_tags, "studio lighting");
    }

    #[test]
    fn profile_without_backing_file_is_never_written() {
        // Default profiles have nowhere to save; save() must not touch the
        // user's config directory.
        Profile::default().save().unwrap();
    }

    #[test]
    fn malformed_file_yields_defaults_on_the_same_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.json");
        fs::write(&path, "{ not json").unwrap();

        let profile = Profile::load_from(path.clone());
        assert!(profile.source_directory.is_none());

        profile.save().unwrap();
        let back: Profile = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(back.crop, CropSettings::default());
    }
}
