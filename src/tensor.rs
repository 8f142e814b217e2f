//! Conversion of frames into the classifier's input tensor layout.
//!
//! The model consumes a directly-addressable byte buffer of exactly
//! `width * height * 3` bytes: row-major pixel order, channel order
//! R, G, B, one byte per channel. The encoder owns a reusable output
//! buffer that is rewound before every call rather than reallocated, so
//! repeated classifications do not churn the allocator.

use tracing::trace;

use crate::error::PipelineError;
use crate::types::{ClassifierParameters, FrameBuffer};

/// Encodes frames into the fixed byte layout the inference engine expects.
///
/// `encode` is a pure function of the input frame: identical frames always
/// produce byte-identical tensors.
pub struct TensorEncoder {
    width: u32,
    height: u32,
    buf: Vec<u8>,
}

impl TensorEncoder {
    pub fn new(params: &ClassifierParameters) -> Self {
        Self {
            width: params.image_size_x,
            height: params.image_size_y,
            buf: Vec::with_capacity(params.tensor_len()),
        }
    }

    /// The tensor size in bytes produced by every successful `encode`.
    pub fn tensor_len(&self) -> usize {
        self.width as usize * self.height as usize * 3
    }

    /// Encodes one frame, returning a view of the reused tensor buffer.
    ///
    /// Scans row 0..height, within a row column 0..width, appending the
    /// R, G, B bytes of each pixel and discarding alpha. Fails with
    /// [`PipelineError::Encoding`] if the frame dimensions do not exactly
    /// match the configured input size; the caller is responsible for
    /// scaling beforehand.
    pub fn encode(&mut self, frame: &FrameBuffer) -> Result<&[u8], PipelineError> {
        let (w, h) = frame.dimensions();
        if w != self.width || h != self.height {
            return Err(PipelineError::Encoding {
                expected_width: self.width,
                expected_height: self.height,
                actual_width: w,
                actual_height: h,
            });
        }

        // Rewind, keeping the allocation from the previous call.
        self.buf.clear();
        for pixel in frame.pixels() {
            let [r, g, b, _a] = pixel.0;
            self.buf.push(r);
            self.buf.push(g);
            self.buf.push(b);
        }

        trace!(len = self.buf.len(), "encoded frame into input tensor");
        Ok(&self.buf)
    }
}
