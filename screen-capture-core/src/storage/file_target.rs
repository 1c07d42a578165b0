use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use sha2::{Digest, Sha256};

use crate::models::artifact::{Artifact, ArtifactReference, RecordingMetadata, SavedRecording};
use crate::models::error::CaptureError;
use crate::session::assembler::hex_encode;
use crate::storage::metadata;
use crate::traits::download_target::DownloadTarget;

/// Download target that saves artifacts into a directory.
///
/// References stay resolvable until revoked. Each save writes the recording
/// and a `.metadata.json` sidecar, then verifies the SHA-256 of what landed
/// on disk.
pub struct FileDownloadTarget {
    directory: PathBuf,
    references: HashMap<String, Artifact>,
    write_metadata: bool,
}

impl FileDownloadTarget {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            references: HashMap::new(),
            write_metadata: true,
        }
    }

    pub fn without_metadata(mut self) -> Self {
        self.write_metadata = false;
        self
    }

    pub fn directory(&self) -> &PathBuf {
        &self.directory
    }

    /// Number of references not yet revoked.
    pub fn live_references(&self) -> usize {
        self.references.len()
    }
}

impl DownloadTarget for FileDownloadTarget {
    fn create_reference(&mut self, artifact: &Artifact) -> Result<ArtifactReference, CaptureError> {
        let url = format!("blob:screen-capture/{}", uuid::Uuid::new_v4());
        self.references.insert(url.clone(), artifact.clone());
        log::info!("Artifact reference created: {}", url);
        Ok(ArtifactReference {
            url,
            artifact_id: artifact.id().to_string(),
        })
    }

    fn revoke(&mut self, reference: &ArtifactReference) {
        if self.references.remove(&reference.url).is_some() {
            log::debug!("Artifact reference revoked: {}", reference.url);
        }
    }

    fn save(
        &mut self,
        reference: &ArtifactReference,
        file_name: &str,
    ) -> Result<SavedRecording, CaptureError> {
        let artifact = self
            .references
            .get(&reference.url)
            .ok_or_else(|| {
                CaptureError::StorageError(format!("reference {} has been revoked", reference.url))
            })?;

        fs::create_dir_all(&self.directory)
            .map_err(|e| CaptureError::StorageError(format!("failed to create directory: {}", e)))?;
        let path = self.directory.join(file_name);
        fs::write(&path, artifact.bytes())
            .map_err(|e| CaptureError::StorageError(format!("failed to write recording: {}", e)))?;

        let written = fs::read(&path)
            .map_err(|e| {
                CaptureError::StorageError(format!("failed to read file for checksum: {}", e))
            })?;
        if hex_encode(&Sha256::digest(&written)) != artifact.checksum() {
            return Err(CaptureError::StorageError("checksum mismatch after write".into()));
        }

        if self.write_metadata {
            let sidecar = RecordingMetadata::from_artifact(artifact, file_name);
            metadata::write_metadata(&sidecar, &path)?;
        }

        log::info!("Recording saved to {}", path.display());
        Ok(SavedRecording {
            location: path.to_string_lossy().to_string(),
            file_name: file_name.to_string(),
            size_bytes: written.len() as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::artifact::RecordingDetails;
    use crate::models::quality::{FrameRate, QualityPreset};
    use crate::session::assembler;
    use crate::session::encoder_driver::EncodedRecording;

    fn artifact(bytes: &[u8]) -> Artifact {
        assembler::assemble(
            EncodedRecording {
                chunks: vec![bytes.to_vec()],
                mime_type: "video/webm;codecs=vp9,opus".into(),
            },
            RecordingDetails {
                duration_secs: 1,
                quality: QualityPreset::Low,
                frame_rate: FrameRate::Fps30,
                has_audio: true,
            },
        )
        .unwrap()
    }

    fn temp_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("screen_capture_test_{}_{}", name, std::process::id()))
    }

    #[test]
    fn save_writes_recording_and_sidecar() {
        let dir = temp_dir("save");
        let mut target = FileDownloadTarget::new(&dir);
        let artifact = artifact(b"webm-bytes");
        let reference = target.create_reference(&artifact).unwrap();

        let saved = target.save(&reference, "clip.webm").unwrap();

        assert_eq!(saved.size_bytes, 10);
        assert_eq!(fs::read(dir.join("clip.webm")).unwrap(), b"webm-bytes");
        let meta = metadata::read_metadata(&dir.join("clip.webm")).unwrap();
        assert_eq!(meta.checksum, artifact.checksum());
        assert_eq!(meta.file_name, "clip.webm");
        assert_eq!(meta.width, 854);

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn revoked_reference_cannot_be_saved() {
        let dir = temp_dir("revoked");
        let mut target = FileDownloadTarget::new(&dir).without_metadata();
        let reference = target.create_reference(&artifact(b"x")).unwrap();
        assert_eq!(target.live_references(), 1);

        target.revoke(&reference);
        target.revoke(&reference);

        assert_eq!(target.live_references(), 0);
        assert!(matches!(
            target.save(&reference, "x.webm"),
            Err(CaptureError::StorageError(_))
        ));
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn references_are_unique() {
        let mut target = FileDownloadTarget::new(temp_dir("unique"));
        let artifact = artifact(b"abc");
        let a = target.create_reference(&artifact).unwrap();
        let b = target.create_reference(&artifact).unwrap();

        assert_ne!(a.url, b.url);
        assert_eq!(a.artifact_id, b.artifact_id);
    }
}
