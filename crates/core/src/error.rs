//! Error types for the kroppie-core library.
//!
//! This module provides granular error variants for different failure modes,
//! enabling precise error handling and user-friendly error messages.

use thiserror::Error;

/// Errors that can occur within the kroppie-core library.
///
/// Each variant represents a specific failure mode with contextual information
/// to help diagnose and handle errors appropriately.
#[derive(Error, Debug)]
pub enum AppError {
    /// Scanning a directory for image files failed.
    #[error("Directory scan failed: {0}")]
    DirectoryScan(String),

    /// Loading or decoding an image file failed.
    #[error("Image load failed: {0}")]
    ImageLoad(String),

    /// Cropping, resampling or encoding an image failed.
    #[error("Image processing failed: {0}")]
    ImageProcessing(String),

    /// The crop region is empty after clamping to the image bounds.
    #[error("Crop region is empty or outside the image")]
    EmptyCrop,

    /// The display transform cannot be inverted (non-positive scale or zoom).
    #[error("Degenerate display transform: scale {scale}, zoom {zoom}")]
    DegenerateTransform { scale: f32, zoom: f32 },

    /// Writing an export artifact (image or caption sidecar) failed.
    #[error("Export failed: {0}")]
    Export(String),

    /// UI-related errors (window creation, event loop).
    #[error("UI error: {0}")]
    Ui(String),

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AppError {
    /// Creates a directory scan error with the given message.
    pub fn scan(msg: impl Into<String>) -> Self {
        Self::DirectoryScan(msg.into())
    }

    /// Creates an image load error with the given message.
    pub fn load(msg: impl Into<String>) -> Self {
        Self::ImageLoad(msg.into())
    }

    /// Creates an image processing error with the given message.
    pub fn image(msg: impl Into<String>) -> Self {
        Self::ImageProcessing(msg.into())
    }

    /// Creates an export error with the given message.
    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export(msg.into())
    }

    /// Creates a UI error with the given message.
    pub fn ui(msg: impl Into<String>) -> Self {
        Self::Ui(msg.into())
    }
}

/// A convenient alias for Result with [`AppError`].
pub type Result<T> = std::result::Result<T, AppError>;
