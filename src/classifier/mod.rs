//! The image classifier: model loading, inference, and result ranking.
//!
//! [`Classifier`] is the adapter in front of the inference engine. At
//! startup it memory-maps the model artifact, hands it to the engine, and
//! reads the ordered label list; per call it encodes a frame, runs one
//! forward pass, and reduces the raw score vector to the top ranked
//! labels. It is stateless between calls apart from the loaded engine and
//! the reused tensor/score buffers.

pub mod topk;

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, info};

use crate::engine::{InferenceEngine, ModelArtifact};
use crate::error::PipelineError;
use crate::tensor::TensorEncoder;
use crate::types::{ClassifierParameters, FrameBuffer, Recognition};

/// An image classifier over a fixed, pre-trained model.
///
/// Inference latency is model-dependent but non-trivial, so `recognize`
/// must be called off the UI-facing context; the capture pipeline runs it
/// on its background worker.
pub struct Classifier {
    engine: Option<Box<dyn InferenceEngine>>,
    labels: Vec<String>,
    encoder: TensorEncoder,
    /// One confidence byte per model output slot, reused across calls.
    scores: Vec<u8>,
    params: ClassifierParameters,
}

impl Classifier {
    /// Loads the model artifact and label list and prepares the engine.
    ///
    /// Fails with [`PipelineError::ModelLoad`] if either bundled resource
    /// is missing or malformed. This is fatal to the classification
    /// feature; the surrounding application decides whether to continue
    /// camera-only.
    pub fn new(
        params: ClassifierParameters,
        mut engine: Box<dyn InferenceEngine>,
    ) -> Result<Self, PipelineError> {
        let artifact = ModelArtifact::open(&params.model_path)?;
        let output_width = engine.load(&artifact)?;
        let labels = load_label_list(&params.labels_path)?;

        if labels.len() < output_width {
            debug!(
                labels = labels.len(),
                output_width, "label list shorter than model output, excess reported as unknown"
            );
        }

        let encoder = TensorEncoder::new(&params);
        info!(
            model = %params.model_path.display(),
            labels = labels.len(),
            output_width,
            "created image classifier"
        );

        Ok(Self {
            engine: Some(engine),
            labels,
            encoder,
            scores: vec![0; output_width],
            params,
        })
    }

    /// The input size frames must be scaled to before `recognize`.
    pub fn input_size(&self) -> (u32, u32) {
        (self.params.image_size_x, self.params.image_size_y)
    }

    /// Number of labels loaded from the label list.
    pub fn label_count(&self) -> usize {
        self.labels.len()
    }

    /// Whether a model is currently loaded.
    pub fn is_loaded(&self) -> bool {
        self.engine.is_some()
    }

    /// Classifies one frame of the configured input size and returns the
    /// top ranked labels, confidence descending.
    ///
    /// All-or-nothing: any failure along encode → inference → ranking is
    /// returned as an error, never a partial result. After [`shutdown`],
    /// fails with [`PipelineError::NotInitialized`].
    ///
    /// [`shutdown`]: Classifier::shutdown
    pub fn recognize(&mut self, frame: &FrameBuffer) -> Result<Vec<Recognition>, PipelineError> {
        let engine = self.engine.as_mut().ok_or(PipelineError::NotInitialized)?;
        let tensor = self.encoder.encode(frame)?;
        engine.run(tensor, &mut self.scores)?;
        Ok(topk::select_top(
            &self.scores,
            &self.labels,
            topk::RESULT_COUNT,
        ))
    }

    /// Forwards the hardware-acceleration preference to the engine.
    pub fn set_accelerated(&mut self, enabled: bool) {
        if let Some(engine) = self.engine.as_mut() {
            engine.set_accelerated(enabled);
        }
    }

    /// Releases the loaded model. Subsequent `recognize` calls fail with
    /// [`PipelineError::NotInitialized`].
    pub fn shutdown(&mut self) {
        if self.engine.take().is_some() {
            info!("released classifier engine");
        }
    }
}

/// Reads the ordered label list, one label per line; line order defines
/// index order.
fn load_label_list(path: &Path) -> Result<Vec<String>, PipelineError> {
    let file = File::open(path)
        .map_err(|e| PipelineError::ModelLoad(format!("cannot open {}: {e}", path.display())))?;
    let mut labels = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line.map_err(|e| {
            PipelineError::ModelLoad(format!("cannot read {}: {e}", path.display()))
        })?;
        labels.push(line.trim().to_string());
    }
    Ok(labels)
}
