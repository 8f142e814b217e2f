//! Inference engine abstraction.
//!
//! The classifier talks to the underlying inference runtime through the
//! [`InferenceEngine`] trait rather than binding to one engine directly.
//! The shipped model is a quantized graph whose forward pass emits one
//! confidence byte per label; how that pass executes (interpreter, FFI
//! binding, hardware delegate) is the engine's business. Tests plug in
//! stub engines, production wires a real runtime binding.

mod artifact;

pub use artifact::ModelArtifact;

use crate::error::PipelineError;

/// Trait for inference engines backing the classifier.
///
/// An engine is created empty, loaded once with a [`ModelArtifact`], and
/// then runs one forward pass per `run` call. Engines hold no state
/// between calls beyond the loaded model itself.
pub trait InferenceEngine: Send {
    /// Load the mapped model artifact, returning the model's output width
    /// (the number of label slots it scores).
    ///
    /// Fails with [`PipelineError::ModelLoad`] if the artifact is not a
    /// model this engine can execute.
    fn load(&mut self, model: &ModelArtifact) -> Result<usize, PipelineError>;

    /// Run one forward pass.
    ///
    /// `tensor` is the encoded input frame; `scores` has exactly the
    /// output width reported by `load` and receives one confidence byte
    /// per label, positionally mapped to the label list by load order.
    fn run(&mut self, tensor: &[u8], scores: &mut [u8]) -> Result<(), PipelineError>;

    /// Enable or disable hardware-accelerated execution.
    ///
    /// Advisory: engines without an accelerated path ignore this, and the
    /// scores produced must not depend on the setting.
    fn set_accelerated(&mut self, _enabled: bool) {}
}
