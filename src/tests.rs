#[cfg(test)]
mod tests {
    use crate::camera::session::{CameraSession, CameraState};
    use crate::camera::{
        CameraEvent, CameraEventSender, CameraHal, CaptureRequest, PermissionGate, SurfaceToken,
    };
    use crate::classifier::Classifier;
    use crate::engine::{InferenceEngine, ModelArtifact};
    use crate::error::PipelineError;
    use crate::pipeline::{CapturePipeline, PipelineEvent};
    use crate::types::{ClassifierParameters, FrameBuffer, PixelSize};
    use crossbeam_channel::{unbounded, Receiver};
    use std::io::Write;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tempfile::TempDir;

    const RECV_TIMEOUT: Duration = Duration::from_secs(5);

    /// Inference stub emitting a fixed five-label score vector.
    struct StubEngine;

    const STUB_SCORES: [u8; 5] = [90, 95, 10, 95, 3];

    impl InferenceEngine for StubEngine {
        fn load(&mut self, _model: &ModelArtifact) -> Result<usize, PipelineError> {
            Ok(STUB_SCORES.len())
        }

        fn run(&mut self, _tensor: &[u8], scores: &mut [u8]) -> Result<(), PipelineError> {
            scores.copy_from_slice(&STUB_SCORES);
            Ok(())
        }
    }

    /// HAL fake that acknowledges every request by sending the matching
    /// event, the way real hardware completes asynchronously.
    struct EventfulHal {
        events: CameraEventSender,
        calls: Arc<Mutex<Vec<&'static str>>>,
        frame: FrameBuffer,
    }

    impl CameraHal for EventfulHal {
        fn device_ids(&mut self) -> Result<Vec<String>, PipelineError> {
            self.calls.lock().unwrap().push("device_ids");
            Ok(vec!["0".into()])
        }

        fn supported_sizes(&mut self, _device: &str) -> Result<Vec<PixelSize>, PipelineError> {
            self.calls.lock().unwrap().push("supported_sizes");
            Ok(vec![PixelSize::new(640, 480)])
        }

        fn open(&mut self, _device: &str) -> Result<(), PipelineError> {
            self.calls.lock().unwrap().push("open");
            let _ = self.events.send(CameraEvent::Opened);
            Ok(())
        }

        fn create_session(
            &mut self,
            _surface: SurfaceToken,
            _dimension: PixelSize,
        ) -> Result<(), PipelineError> {
            self.calls.lock().unwrap().push("create_session");
            let _ = self.events.send(CameraEvent::SessionConfigured);
            Ok(())
        }

        fn submit_repeating(&mut self, _request: &CaptureRequest) -> Result<(), PipelineError> {
            self.calls.lock().unwrap().push("submit_repeating");
            Ok(())
        }

        fn submit_once(&mut self, _request: &CaptureRequest) -> Result<(), PipelineError> {
            self.calls.lock().unwrap().push("submit_once");
            let _ = self
                .events
                .send(CameraEvent::CaptureCompleted(self.frame.clone()));
            Ok(())
        }

        fn close(&mut self) {
            self.calls.lock().unwrap().push("close");
        }
    }

    struct Granted(bool);

    impl PermissionGate for Granted {
        fn camera_granted(&self) -> bool {
            self.0
        }
    }

    struct Fixture {
        pipeline: CapturePipeline,
        calls: Arc<Mutex<Vec<&'static str>>>,
        _dir: TempDir,
    }

    fn classifier_fixture(dir: &TempDir) -> Classifier {
        let model_path = dir.path().join("model.tflite");
        let labels_path = dir.path().join("labels.txt");
        std::fs::write(&model_path, b"TFL3").unwrap();
        let mut f = std::fs::File::create(&labels_path).unwrap();
        for label in ["beagle", "husky", "poodle", "collie", "boxer"] {
            writeln!(f, "{label}").unwrap();
        }
        let params = ClassifierParameters {
            model_path,
            labels_path,
            ..ClassifierParameters::default()
        };
        Classifier::new(params, Box::new(StubEngine)).unwrap()
    }

    fn pipeline_fixture(granted: bool, frame: FrameBuffer) -> Fixture {
        let dir = TempDir::new().unwrap();
        let classifier = classifier_fixture(&dir);

        let (event_tx, event_rx) = unbounded();
        let calls = Arc::new(Mutex::new(Vec::new()));
        let hal = EventfulHal {
            events: event_tx,
            calls: calls.clone(),
            frame,
        };
        let session = CameraSession::new(Box::new(hal), Box::new(Granted(granted)));
        let pipeline = CapturePipeline::start(session, classifier, event_rx).unwrap();

        Fixture {
            pipeline,
            calls,
            _dir: dir,
        }
    }

    fn wait_for_state(events: &Receiver<PipelineEvent>, wanted: CameraState) {
        loop {
            match events.recv_timeout(RECV_TIMEOUT).expect("pipeline event") {
                PipelineEvent::StateChanged(state) if state == wanted => return,
                PipelineEvent::Failed(e) => panic!("pipeline failed: {e}"),
                _ => (),
            }
        }
    }

    fn wait_for_failure(events: &Receiver<PipelineEvent>) -> PipelineError {
        loop {
            match events.recv_timeout(RECV_TIMEOUT).expect("pipeline event") {
                PipelineEvent::Failed(e) => return e,
                _ => (),
            }
        }
    }

    #[test]
    fn capture_produces_top_three_ranked_results() {
        let fixture = pipeline_fixture(true, FrameBuffer::new(224, 224));
        let pipeline = &fixture.pipeline;

        pipeline.open(SurfaceToken(7));
        wait_for_state(pipeline.events(), CameraState::PreviewRunning);

        pipeline.capture_still();
        let (frame, results) = loop {
            match pipeline.events().recv_timeout(RECV_TIMEOUT).unwrap() {
                PipelineEvent::Recognized { frame, results } => break (frame, results),
                PipelineEvent::Failed(e) => panic!("pipeline failed: {e}"),
                _ => (),
            }
        };

        assert_eq!(frame.dimensions(), (224, 224));
        assert_eq!(results.len(), 3);
        assert!(results[0].confidence >= results[1].confidence);
        assert!(results[1].confidence >= results[2].confidence);
        assert_eq!(results[0].confidence, 95.0);
        assert_eq!(results[0].label, "husky");
        assert_eq!(results[1].label, "collie");
        assert_eq!(results[2].label, "beagle");
    }

    #[test]
    fn oversized_frames_are_scaled_before_classification() {
        let fixture = pipeline_fixture(true, FrameBuffer::new(640, 480));
        let pipeline = &fixture.pipeline;

        pipeline.open(SurfaceToken(7));
        wait_for_state(pipeline.events(), CameraState::PreviewRunning);

        pipeline.capture_still();
        loop {
            match pipeline.events().recv_timeout(RECV_TIMEOUT).unwrap() {
                PipelineEvent::Recognized { frame, results } => {
                    // The published frame keeps its capture size.
                    assert_eq!(frame.dimensions(), (640, 480));
                    assert_eq!(results.len(), 3);
                    break;
                }
                PipelineEvent::Failed(e) => panic!("pipeline failed: {e}"),
                _ => (),
            }
        }
    }

    #[test]
    fn capture_before_preview_is_reported_not_executed() {
        let fixture = pipeline_fixture(true, FrameBuffer::new(224, 224));
        let pipeline = &fixture.pipeline;

        pipeline.capture_still();
        let error = wait_for_failure(pipeline.events());
        assert!(matches!(error, PipelineError::InvalidOperation(_)));
        assert!(fixture.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn denied_permission_surfaces_without_hardware_calls() {
        let fixture = pipeline_fixture(false, FrameBuffer::new(224, 224));
        let pipeline = &fixture.pipeline;

        pipeline.open(SurfaceToken(7));
        let error = wait_for_failure(pipeline.events());
        assert!(matches!(error, PipelineError::PermissionDenied));
        assert!(fixture.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn close_is_safe_at_any_time_and_repeatable() {
        let fixture = pipeline_fixture(true, FrameBuffer::new(224, 224));
        let pipeline = &fixture.pipeline;

        // Closing an already-closed camera is a no-op.
        pipeline.close();
        pipeline.close();

        pipeline.open(SurfaceToken(7));
        wait_for_state(pipeline.events(), CameraState::PreviewRunning);
        pipeline.close();
        wait_for_state(pipeline.events(), CameraState::Closed);

        // A capture after close is a contract violation again.
        pipeline.capture_still();
        let error = wait_for_failure(pipeline.events());
        assert!(matches!(error, PipelineError::InvalidOperation(_)));
    }

    #[test]
    fn camera_can_be_reopened_after_close() {
        let fixture = pipeline_fixture(true, FrameBuffer::new(224, 224));
        let pipeline = &fixture.pipeline;

        pipeline.open(SurfaceToken(7));
        wait_for_state(pipeline.events(), CameraState::PreviewRunning);
        pipeline.close();
        wait_for_state(pipeline.events(), CameraState::Closed);

        pipeline.open(SurfaceToken(7));
        wait_for_state(pipeline.events(), CameraState::PreviewRunning);
    }

    #[test]
    fn acceleration_toggle_does_not_change_results() {
        let fixture = pipeline_fixture(true, FrameBuffer::new(224, 224));
        let pipeline = &fixture.pipeline;

        pipeline.set_accelerated(true);
        pipeline.open(SurfaceToken(7));
        wait_for_state(pipeline.events(), CameraState::PreviewRunning);

        pipeline.capture_still();
        loop {
            match pipeline.events().recv_timeout(RECV_TIMEOUT).unwrap() {
                PipelineEvent::Recognized { results, .. } => {
                    assert_eq!(results[0].label, "husky");
                    break;
                }
                PipelineEvent::Failed(e) => panic!("pipeline failed: {e}"),
                _ => (),
            }
        }
    }
}
