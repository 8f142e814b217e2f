//! Common types and parameters used throughout the pipeline.
//!
//! This module contains the core data structures that describe the
//! classifier's input geometry, the frames flowing through the pipeline,
//! and the ranked recognition results handed to the caller.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A frame frozen from the camera feed.
///
/// Packed 4-channel pixels; the alpha channel is carried by the frame
/// source but discarded during tensor encoding.
pub type FrameBuffer = image::RgbaImage;

/// A width/height pair as reported by the camera hardware layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelSize {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl PixelSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for PixelSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Parameters that define the classifier's input contract and the bundled
/// artifacts it loads at startup.
///
/// The defaults mirror the shipped quantized breed model: a 224x224 RGB
/// input tensor with one byte per channel.
#[derive(Debug, Clone, Deserialize)]
pub struct ClassifierParameters {
    /// Required width of input images in pixels
    pub image_size_x: u32,
    /// Required height of input images in pixels
    pub image_size_y: u32,
    /// Number of color channels in the input tensor (3 = RGB)
    pub channel_count: u32,
    /// Bytes per color channel (1 for a quantized model)
    pub bytes_per_channel: u32,
    /// Path to the bundled model artifact
    pub model_path: std::path::PathBuf,
    /// Path to the bundled label list, one label per line
    pub labels_path: std::path::PathBuf,
}

impl Default for ClassifierParameters {
    fn default() -> Self {
        Self {
            image_size_x: 224,
            image_size_y: 224,
            channel_count: 3,
            bytes_per_channel: 1,
            model_path: "breed_class_1_224_model.tflite".into(),
            labels_path: "breed_class_1_224_labels.txt".into(),
        }
    }
}

impl ClassifierParameters {
    /// Total tensor size in bytes for one input frame.
    pub fn tensor_len(&self) -> usize {
        self.image_size_x as usize
            * self.image_size_y as usize
            * self.channel_count as usize
            * self.bytes_per_channel as usize
    }
}

/// One ranked classification result.
///
/// `confidence` is the raw per-label score emitted by the model, widened
/// to `f32`. The quantized model emits one byte per label and no soft-max
/// is applied, so this is an unnormalized score in `0.0..=255.0`, not a
/// probability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recognition {
    /// Label index, as a string identifier
    pub id: String,
    /// Human-readable label text, `"unknown"` when the model's output is
    /// wider than the label list
    pub label: String,
    /// Raw confidence score, higher is more confident
    pub confidence: f32,
}

impl Recognition {
    pub fn new(index: usize, label: impl Into<String>, confidence: f32) -> Self {
        Self {
            id: index.to_string(),
            label: label.into(),
            confidence,
        }
    }
}

impl fmt::Display for Recognition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.1})", self.label, self.confidence)
    }
}
