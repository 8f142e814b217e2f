//! The camera session state machine.
//!
//! Lifecycle: `Closed → Opening → Open → PreviewRunning ⇄ Capturing`,
//! with any hardware disconnect or error collapsing back to `Closed`.
//! All transitions run on the pipeline's single background worker, so the
//! handle, session, and request fields are owned here without locking.

use tracing::{debug, error, warn};

use crate::camera::{
    CameraEvent, CameraHal, CaptureRequest, PermissionGate, RequestTemplate, SurfaceToken,
};
use crate::error::PipelineError;
use crate::types::{FrameBuffer, PixelSize};

/// Lifecycle states of the camera handle and its preview session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraState {
    /// No handle held.
    Closed,
    /// Asynchronous open requested, waiting for the hardware.
    Opening,
    /// Handle held, preview session not yet negotiated.
    Open,
    /// Repeating preview request active.
    PreviewRunning,
    /// One-shot still capture in flight.
    Capturing,
}

/// Drives one camera handle through its lifecycle.
///
/// The session exclusively owns the hardware handle fields; hardware
/// callbacks enter through [`handle_event`] as named events rather than
/// mutating shared state.
///
/// [`handle_event`]: CameraSession::handle_event
pub struct CameraSession {
    hal: Box<dyn CameraHal>,
    permissions: Box<dyn PermissionGate>,
    state: CameraState,
    device_id: Option<String>,
    dimension: Option<PixelSize>,
    surface: Option<SurfaceToken>,
    repeating: Option<CaptureRequest>,
}

impl CameraSession {
    pub fn new(hal: Box<dyn CameraHal>, permissions: Box<dyn PermissionGate>) -> Self {
        Self {
            hal,
            permissions,
            state: CameraState::Closed,
            device_id: None,
            dimension: None,
            surface: None,
            repeating: None,
        }
    }

    pub fn state(&self) -> CameraState {
        self.state
    }

    /// Selects a device and begins the asynchronous open.
    ///
    /// Requires the camera permission to be granted already; on denial
    /// this fails with [`PipelineError::PermissionDenied`] without
    /// touching the hardware, and it is the caller's job to prompt and
    /// call again. Picks the first enumerated device and its first
    /// reported output size as the working dimension.
    pub fn open(&mut self, surface: SurfaceToken) -> Result<(), PipelineError> {
        if self.state != CameraState::Closed {
            return Err(PipelineError::InvalidOperation(format!(
                "open requested while {:?}",
                self.state
            )));
        }
        if !self.permissions.camera_granted() {
            return Err(PipelineError::PermissionDenied);
        }

        let device_id = self
            .hal
            .device_ids()?
            .into_iter()
            .next()
            .ok_or(PipelineError::CameraUnavailable)?;
        let dimension = self
            .hal
            .supported_sizes(&device_id)?
            .into_iter()
            .next()
            .ok_or(PipelineError::CameraUnavailable)?;

        debug!(device = %device_id, %dimension, "opening camera");
        self.hal.open(&device_id)?;
        self.device_id = Some(device_id);
        self.dimension = Some(dimension);
        self.surface = Some(surface);
        self.state = CameraState::Opening;
        Ok(())
    }

    /// Applies one hardware event to the state machine.
    ///
    /// Returns the frozen frame when a still capture completes while one
    /// is expected; frames arriving in any other state are stale (the
    /// handle has since closed or reopened) and are discarded.
    pub fn handle_event(&mut self, event: CameraEvent) -> Option<FrameBuffer> {
        match event {
            CameraEvent::Opened => {
                if self.state != CameraState::Opening {
                    // A close raced the open; release the late handle.
                    debug!(state = ?self.state, "late open completion, releasing handle");
                    self.hal.close();
                    return None;
                }
                self.state = CameraState::Open;
                if let Err(e) = self.create_preview_session() {
                    warn!("preview session setup failed: {e}");
                }
                None
            }
            CameraEvent::Disconnected => {
                if self.state != CameraState::Closed {
                    warn!("camera disconnected, releasing handle");
                    self.teardown();
                }
                None
            }
            CameraEvent::Error(reason) => {
                if self.state != CameraState::Closed {
                    error!("camera device error: {reason}");
                    self.teardown();
                }
                None
            }
            CameraEvent::SessionConfigured => {
                if self.state != CameraState::Open {
                    debug!(state = ?self.state, "ignoring session configuration");
                    return None;
                }
                self.state = CameraState::PreviewRunning;
                if let Err(e) = self.update_preview() {
                    warn!("starting repeating preview failed: {e}");
                }
                None
            }
            CameraEvent::SessionConfigureFailed(reason) => {
                // Recoverable: no transition, the caller may retry.
                warn!("preview session negotiation failed: {reason}");
                None
            }
            CameraEvent::CaptureCompleted(frame) => {
                if self.state != CameraState::Capturing {
                    debug!(state = ?self.state, "discarding stale capture");
                    return None;
                }
                self.state = CameraState::PreviewRunning;
                if let Err(e) = self.update_preview() {
                    warn!("resuming preview after capture failed: {e}");
                }
                Some(frame)
            }
        }
    }

    /// Negotiates the preview session against the stored surface.
    ///
    /// Builds a fresh repeating preview request; the transition to
    /// `PreviewRunning` happens once the hardware confirms with
    /// [`CameraEvent::SessionConfigured`]. On failure no transition
    /// occurs and the call may be retried.
    pub fn create_preview_session(&mut self) -> Result<(), PipelineError> {
        if self.state != CameraState::Open {
            return Err(PipelineError::InvalidOperation(format!(
                "preview session requested while {:?}",
                self.state
            )));
        }
        let surface = self.surface.ok_or_else(|| {
            PipelineError::SessionNegotiationFailed("no preview surface".into())
        })?;
        let dimension = self.dimension.ok_or(PipelineError::CameraUnavailable)?;

        self.repeating = Some(CaptureRequest::new(RequestTemplate::Preview, surface));
        self.hal.create_session(surface, dimension)
    }

    /// (Re)submits the repeating preview request with auto control.
    ///
    /// Idempotent while the preview is running.
    pub fn update_preview(&mut self) -> Result<(), PipelineError> {
        if self.state != CameraState::PreviewRunning {
            return Err(PipelineError::InvalidOperation(format!(
                "preview update requested while {:?}",
                self.state
            )));
        }
        let request = self
            .repeating
            .as_ref()
            .ok_or_else(|| PipelineError::SessionNegotiationFailed("no active session".into()))?;
        self.hal.submit_repeating(request)
    }

    /// Submits a one-shot still capture.
    ///
    /// Valid only while the preview is running; anything else is a
    /// contract violation reported without a hardware call. The frozen
    /// frame comes back through [`handle_event`].
    ///
    /// [`handle_event`]: CameraSession::handle_event
    pub fn capture_still(&mut self) -> Result<(), PipelineError> {
        if self.state != CameraState::PreviewRunning {
            return Err(PipelineError::InvalidOperation(format!(
                "still capture requested while {:?}",
                self.state
            )));
        }
        let surface = self
            .surface
            .ok_or_else(|| PipelineError::SessionNegotiationFailed("no preview surface".into()))?;

        let request = CaptureRequest::new(RequestTemplate::StillCapture, surface);
        self.hal.submit_once(&request)?;
        self.state = CameraState::Capturing;
        Ok(())
    }

    /// Releases the handle and all session state, from any state.
    ///
    /// A no-op when nothing is open.
    pub fn close(&mut self) {
        if self.state == CameraState::Closed {
            return;
        }
        debug!(state = ?self.state, "closing camera");
        self.teardown();
    }

    fn teardown(&mut self) {
        self.hal.close();
        self.device_id = None;
        self.dimension = None;
        self.surface = None;
        self.repeating = None;
        self.state = CameraState::Closed;
    }
}
