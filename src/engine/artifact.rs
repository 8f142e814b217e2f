//! Read-only access to the bundled model artifact.

use memmap2::Mmap;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::PipelineError;

/// The bundled model file, memory-mapped read-only.
///
/// The byte format is opaque at this level; the artifact only guarantees
/// that the file exists, is non-empty, and stays mapped for as long as an
/// engine holds on to it.
pub struct ModelArtifact {
    path: PathBuf,
    map: Mmap,
}

impl ModelArtifact {
    /// Opens and maps the model file.
    ///
    /// A missing file surfaces as [`PipelineError::ModelLoad`]; an empty
    /// file is rejected the same way since no engine can load it.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, PipelineError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            PipelineError::ModelLoad(format!("cannot open {}: {e}", path.display()))
        })?;

        // Safety: the artifact is a bundled read-only asset; nothing
        // truncates or rewrites it while the application runs.
        let map = unsafe { Mmap::map(&file) }.map_err(|e| {
            PipelineError::ModelLoad(format!("cannot map {}: {e}", path.display()))
        })?;

        if map.is_empty() {
            return Err(PipelineError::ModelLoad(format!(
                "{} is empty",
                path.display()
            )));
        }

        debug!(path = %path.display(), len = map.len(), "mapped model artifact");
        Ok(Self {
            path: path.to_path_buf(),
            map,
        })
    }

    /// The mapped model bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.map
    }

    /// Size of the artifact in bytes.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Path the artifact was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_artifact_is_a_model_load_error() {
        let result = ModelArtifact::open("no_such_model.tflite");
        assert!(matches!(result, Err(PipelineError::ModelLoad(_))));
    }

    #[test]
    fn empty_artifact_is_rejected() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let result = ModelArtifact::open(file.path());
        assert!(matches!(result, Err(PipelineError::ModelLoad(_))));
    }

    #[test]
    fn mapped_bytes_match_the_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"TFL3-not-a-real-model").unwrap();
        let artifact = ModelArtifact::open(file.path()).unwrap();
        assert_eq!(artifact.bytes(), b"TFL3-not-a-real-model");
        assert_eq!(artifact.len(), 21);
    }
}
