use sha2::{Digest, Sha256};

use crate::models::artifact::{Artifact, RecordingDetails};
use crate::models::error::CaptureError;
use crate::session::encoder_driver::EncodedRecording;

/// Concatenate the chunk sequence into one immutable artifact.
///
/// An empty sequence is a processing failure, never a zero-byte artifact.
pub fn assemble(
    recording: EncodedRecording,
    details: RecordingDetails,
) -> Result<Artifact, CaptureError> {
    let EncodedRecording { chunks, mime_type } = recording;
    log::info!("Creating artifact from {} chunk(s)", chunks.len());

    let total: usize = chunks.iter().map(Vec::len).sum();
    if total == 0 {
        return Err(CaptureError::ProcessingFailed("no media data was recorded".into()));
    }

    let mut bytes = Vec::with_capacity(total);
    for chunk in &chunks {
        bytes.extend_from_slice(chunk);
    }

    let checksum = hex_encode(&Sha256::digest(&bytes));
    let artifact = Artifact::new(bytes, mime_type, checksum, chunks.len(), details);
    log::info!(
        "Artifact created: {} bytes, type: {}",
        artifact.size(),
        artifact.media_type()
    );
    Ok(artifact)
}

pub(crate) fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}
