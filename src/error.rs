//! Error types for the capture and classification pipeline.
//!
//! This module defines the error taxonomy shared by the camera session
//! state machine, the classifier, and the capture orchestrator. The main
//! error type is `PipelineError`, which distinguishes recoverable
//! conditions (a denied permission, a failed session negotiation) from
//! terminal ones (a disconnected camera handle) and from outright contract
//! violations (capturing while no preview is running).

use thiserror::Error;

/// Represents all possible errors that can occur in the capture and
/// classification pipeline.
///
/// This enum implements the standard Error trait using thiserror. Variants
/// map directly onto the recovery policy the caller should apply: camera
/// handle errors require a full reopen, `SessionNegotiationFailed` may
/// simply be retried, and `InvalidOperation`/`Encoding` indicate misuse of
/// the API rather than a runtime fault.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The camera permission has not been granted.
    ///
    /// Returned by `open()` before any hardware call is made. The caller
    /// is expected to prompt for the permission and retry; the pipeline
    /// never retries a denied permission on its own.
    #[error("camera permission has not been granted")]
    PermissionDenied,

    /// No camera device (or no supported output size) was reported by the
    /// hardware layer.
    #[error("no usable camera device available")]
    CameraUnavailable,

    /// The camera device disconnected while in use.
    ///
    /// Terminal for the current handle; the device must be reopened.
    #[error("camera device disconnected")]
    CameraDisconnected,

    /// The camera hardware reported a fatal device error.
    ///
    /// Terminal for the current handle; the device must be reopened.
    #[error("camera device error: {0}")]
    CameraDevice(String),

    /// Preview session negotiation with the hardware failed.
    ///
    /// Recoverable: the state machine stays where it was and the caller
    /// may retry the preview setup or abort.
    #[error("preview session negotiation failed: {0}")]
    SessionNegotiationFailed(String),

    /// A frame's dimensions do not match the classifier's configured
    /// input size.
    ///
    /// This is a contract violation on the caller's side: frames must be
    /// scaled to the model input size before encoding.
    #[error("frame is {actual_width}x{actual_height}, classifier expects {expected_width}x{expected_height}")]
    Encoding {
        expected_width: u32,
        expected_height: u32,
        actual_width: u32,
        actual_height: u32,
    },

    /// The model artifact or label list could not be loaded.
    ///
    /// Fatal to the classification feature at startup. The surrounding
    /// application may still run camera-only.
    #[error("failed to load model resources: {0}")]
    ModelLoad(String),

    /// The classifier was used after `shutdown()` or before a model was
    /// loaded.
    #[error("classifier is not initialized")]
    NotInitialized,

    /// An operation was invoked in a state that does not permit it, e.g.
    /// requesting a still capture while no preview is running.
    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    /// A file system operation on the model or label artifact failed.
    #[error("failed to access artifact: {0}")]
    File(#[from] std::io::Error),
}
