//! Camera capture and on-device image classification core.
//!
//! This crate implements the pipeline behind a "point the camera at a dog,
//! get a ranked list of breeds" application: the camera session state
//! machine, the frame-to-tensor encoder, the inference engine adapter, and
//! the top-K selection over the model's raw scores. UI rendering,
//! navigation, permission prompting, and photo persistence are external
//! collaborators.
//!
//! # Architecture
//!
//! Everything hardware- and inference-related runs on one background
//! worker owned by [`CapturePipeline`]:
//!
//! - [`camera::session::CameraSession`] drives the camera handle through
//!   `Closed → Opening → Open → PreviewRunning ⇄ Capturing`, fed by named
//!   [`camera::CameraEvent`]s from the hardware layer.
//! - [`tensor::TensorEncoder`] turns a frozen 224x224 frame into the
//!   row-major R,G,B byte tensor the model consumes.
//! - [`classifier::Classifier`] owns the loaded model and label list and
//!   runs one forward pass per call through an [`engine::InferenceEngine`].
//! - [`classifier::topk`] ranks the raw per-label scores and keeps the top
//!   three.
//!
//! The foreground posts commands and consumes [`PipelineEvent`]s; results
//! are all-or-nothing and arrive together with the frozen frame for
//! display or storage.

pub mod camera;
pub mod classifier;
pub mod engine;
mod error;
pub mod pipeline;
pub mod tensor;
pub mod types;

pub use camera::session::{CameraSession, CameraState};
pub use camera::{CameraEvent, CameraEventSender, CameraHal, CaptureRequest, PermissionGate,
    RequestTemplate, SurfaceToken};
pub use classifier::Classifier;
pub use engine::{InferenceEngine, ModelArtifact};
pub use error::PipelineError;
pub use pipeline::{CapturePipeline, PipelineEvent};
pub use types::{ClassifierParameters, FrameBuffer, PixelSize, Recognition};

#[cfg(test)]
mod tests;
