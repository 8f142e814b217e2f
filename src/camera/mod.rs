//! Camera hardware interface and session state machine.
//!
//! The hardware camera subsystem is a collaborator behind the
//! [`CameraHal`] trait: the core consumes device enumeration, supported
//! output sizes, asynchronous open, session negotiation, and request
//! submission; completion and failure arrive back as named
//! [`CameraEvent`]s on a channel drained only by the pipeline's background
//! worker. The [`session`] module turns those events into explicit state
//! machine transitions.

pub mod session;

use crossbeam_channel::Sender;

use crate::error::PipelineError;
use crate::types::{FrameBuffer, PixelSize};

/// Opaque token for the display surface the preview renders into,
/// supplied by the UI collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceToken(pub u64);

/// Exposure template for a capture request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestTemplate {
    /// Continuously resubmitted to drive the live preview.
    Preview,
    /// A single frozen frame for classification.
    StillCapture,
}

/// An immutable descriptor of one exposure.
///
/// Built fresh on every mode change and never mutated once submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureRequest {
    pub template: RequestTemplate,
    pub surface: SurfaceToken,
    /// Run the hardware's automatic exposure/focus control.
    pub auto_control: bool,
}

impl CaptureRequest {
    pub fn new(template: RequestTemplate, surface: SurfaceToken) -> Self {
        Self {
            template,
            surface,
            auto_control: true,
        }
    }
}

/// Notifications from the camera hardware layer.
///
/// Hardware callbacks are reframed as named events; implementations send
/// them into the channel handed over at open time, and the pipeline's
/// single background worker is the only consumer, so ordering follows
/// submission order.
#[derive(Debug)]
pub enum CameraEvent {
    /// The asynchronous open completed and the handle is usable.
    Opened,
    /// The device went away. Terminal for the current handle.
    Disconnected,
    /// The device reported a fatal error. Terminal for the current handle.
    Error(String),
    /// Preview session negotiation succeeded.
    SessionConfigured,
    /// Preview session negotiation failed; the session may be retried.
    SessionConfigureFailed(String),
    /// A one-shot capture completed with the frozen frame.
    CaptureCompleted(FrameBuffer),
}

/// Sender half used by HAL implementations to deliver [`CameraEvent`]s.
pub type CameraEventSender = Sender<CameraEvent>;

/// The hardware camera subsystem.
///
/// Synchronous calls either fail immediately or start an asynchronous
/// operation whose completion arrives as a [`CameraEvent`]. All methods
/// are invoked from the pipeline's background worker only.
pub trait CameraHal: Send {
    /// Enumerates available camera devices.
    fn device_ids(&mut self) -> Result<Vec<String>, PipelineError>;

    /// Output sizes supported by one device, in the hardware's reported
    /// order.
    fn supported_sizes(&mut self, device: &str) -> Result<Vec<PixelSize>, PipelineError>;

    /// Begins an asynchronous open of `device`. Completion arrives as
    /// [`CameraEvent::Opened`] or [`CameraEvent::Error`].
    fn open(&mut self, device: &str) -> Result<(), PipelineError>;

    /// Begins preview session negotiation against `surface` at the given
    /// working dimension. Outcome arrives as `SessionConfigured` or
    /// `SessionConfigureFailed`.
    fn create_session(&mut self, surface: SurfaceToken, dimension: PixelSize)
        -> Result<(), PipelineError>;

    /// (Re)submits the repeating preview request.
    fn submit_repeating(&mut self, request: &CaptureRequest) -> Result<(), PipelineError>;

    /// Submits a one-shot still capture. The frozen frame arrives as
    /// [`CameraEvent::CaptureCompleted`].
    fn submit_once(&mut self, request: &CaptureRequest) -> Result<(), PipelineError>;

    /// Releases the device handle and any in-flight requests. Must be
    /// safe to call when nothing is open.
    fn close(&mut self);
}

/// The permission subsystem collaborator.
///
/// Only the synchronous check is consumed here; prompting the user is the
/// surrounding application's job.
pub trait PermissionGate: Send {
    fn camera_granted(&self) -> bool;
}
