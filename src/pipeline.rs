//! The capture orchestrator.
//!
//! [`CapturePipeline`] owns the single background worker that the whole
//! core runs on: one dedicated thread holding the camera session and the
//! classifier, draining a command queue and the camera hardware event
//! queue strictly in arrival order. Request submission and handle
//! lifecycle are order-sensitive, so nothing here is processed
//! concurrently; the foreground only posts commands and polls published
//! events.

use crossbeam_channel::{never, select, unbounded, Receiver, Sender};
use image::imageops::{self, FilterType};
use std::thread;
use tracing::{debug, info, warn};

use crate::camera::session::{CameraSession, CameraState};
use crate::camera::{CameraEvent, SurfaceToken};
use crate::classifier::Classifier;
use crate::error::PipelineError;
use crate::types::{FrameBuffer, Recognition};

/// Results and state notifications published to the foreground.
///
/// The receiver side is polled (or blocked on) by the display layer;
/// nothing in the core renders or persists anything itself.
#[derive(Debug)]
pub enum PipelineEvent {
    /// The camera session moved to a new state.
    StateChanged(CameraState),
    /// A still capture was classified. Carries the frozen frame so the
    /// caller can display or persist it alongside the ranked results.
    Recognized {
        frame: FrameBuffer,
        results: Vec<Recognition>,
    },
    /// A command or classification attempt failed. All-or-nothing: no
    /// partial results accompany this.
    Failed(PipelineError),
}

enum Command {
    Open(SurfaceToken),
    CaptureStill,
    UpdatePreview,
    SetAccelerated(bool),
    Close,
    Shutdown,
}

/// Coordinates frame capture and classification on a background worker.
///
/// Dropping the pipeline shuts the worker down, closing the camera and
/// releasing the classifier engine.
pub struct CapturePipeline {
    commands: Sender<Command>,
    events: Receiver<PipelineEvent>,
    worker: Option<thread::JoinHandle<()>>,
}

impl CapturePipeline {
    /// Spawns the background worker.
    ///
    /// `camera_events` is the receiving half of the channel the camera
    /// HAL implementation delivers its events on; the worker is its only
    /// consumer.
    pub fn start(
        session: CameraSession,
        classifier: Classifier,
        camera_events: Receiver<CameraEvent>,
    ) -> Result<Self, PipelineError> {
        let (commands, command_rx) = unbounded();
        let (event_tx, events) = unbounded();

        let worker = thread::Builder::new()
            .name("camera-worker".into())
            .spawn(move || {
                Worker {
                    session,
                    classifier,
                    events: event_tx,
                }
                .run(command_rx, camera_events)
            })?;

        Ok(Self {
            commands,
            events,
            worker: Some(worker),
        })
    }

    /// Requests the camera to open against the given preview surface.
    pub fn open(&self, surface: SurfaceToken) {
        self.post(Command::Open(surface));
    }

    /// Requests a still capture. Valid only while the preview runs; a
    /// violation is published as [`PipelineEvent::Failed`].
    pub fn capture_still(&self) {
        self.post(Command::CaptureStill);
    }

    /// Resubmits the repeating preview request.
    pub fn update_preview(&self) {
        self.post(Command::UpdatePreview);
    }

    /// Toggles hardware-accelerated inference.
    pub fn set_accelerated(&self, enabled: bool) {
        self.post(Command::SetAccelerated(enabled));
    }

    /// Closes the camera, flushing work queued ahead of this command
    /// first. Results of captures still in flight are discarded.
    pub fn close(&self) {
        self.post(Command::Close);
    }

    /// The stream of published results and state changes.
    pub fn events(&self) -> &Receiver<PipelineEvent> {
        &self.events
    }

    fn post(&self, command: Command) {
        if self.commands.send(command).is_err() {
            warn!("capture worker is gone, dropping command");
        }
    }
}

impl Drop for CapturePipeline {
    fn drop(&mut self) {
        let _ = self.commands.send(Command::Shutdown);
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

struct Worker {
    session: CameraSession,
    classifier: Classifier,
    events: Sender<PipelineEvent>,
}

impl Worker {
    fn run(mut self, commands: Receiver<Command>, mut camera_events: Receiver<CameraEvent>) {
        info!("capture worker started");
        let mut last_state = self.session.state();

        loop {
            select! {
                recv(commands) -> command => match command {
                    Ok(Command::Shutdown) | Err(_) => break,
                    Ok(command) => self.handle_command(command),
                },
                recv(camera_events) -> event => match event {
                    Ok(event) => self.handle_camera_event(event),
                    Err(_) => {
                        // HAL side hung up; stop selecting on it.
                        debug!("camera event channel disconnected");
                        camera_events = never();
                    }
                },
            }

            let state = self.session.state();
            if state != last_state {
                last_state = state;
                let _ = self.events.send(PipelineEvent::StateChanged(state));
            }
        }

        self.session.close();
        self.classifier.shutdown();
        info!("capture worker stopped");
    }

    fn handle_command(&mut self, command: Command) {
        let outcome = match command {
            Command::Open(surface) => self.session.open(surface),
            Command::CaptureStill => self.session.capture_still(),
            Command::UpdatePreview => self.session.update_preview(),
            Command::SetAccelerated(enabled) => {
                self.classifier.set_accelerated(enabled);
                Ok(())
            }
            Command::Close => {
                self.session.close();
                Ok(())
            }
            Command::Shutdown => unreachable!("handled by the worker loop"),
        };

        if let Err(e) = outcome {
            warn!("command failed: {e}");
            let _ = self.events.send(PipelineEvent::Failed(e));
        }
    }

    fn handle_camera_event(&mut self, event: CameraEvent) {
        if let Some(frame) = self.session.handle_event(event) {
            self.classify(frame);
        }
    }

    /// Scales the frozen frame to the classifier input and publishes the
    /// ranked results.
    ///
    /// Nearest-neighbor scaling: deterministic and cheap; the model is
    /// not sensitive to the resize filter.
    fn classify(&mut self, frame: FrameBuffer) {
        let (width, height) = self.classifier.input_size();
        let scaled = if frame.dimensions() == (width, height) {
            frame.clone()
        } else {
            imageops::resize(&frame, width, height, FilterType::Nearest)
        };

        match self.classifier.recognize(&scaled) {
            Ok(results) => {
                if self.session.state() == CameraState::Closed {
                    debug!("camera closed during classification, discarding result");
                    return;
                }
                let _ = self.events.send(PipelineEvent::Recognized { frame, results });
            }
            Err(e) => {
                warn!("classification failed: {e}");
                let _ = self.events.send(PipelineEvent::Failed(e));
            }
        }
    }
}
