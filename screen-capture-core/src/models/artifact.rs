use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::quality::{FrameRate, QualityPreset};

/// Immutable result of a completed recording.
///
/// Bytes are shared, never mutated after assembly.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    id: String,
    bytes: Arc<[u8]>,
    media_type: String,
    checksum: String,
    chunk_count: usize,
    duration_secs: u64,
    created_at: DateTime<Utc>,
    quality: QualityPreset,
    frame_rate: FrameRate,
    has_audio: bool,
}

/// Session facts recorded alongside the artifact bytes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecordingDetails {
    pub duration_secs: u64,
    pub quality: QualityPreset,
    pub frame_rate: FrameRate,
    pub has_audio: bool,
}

impl Artifact {
    pub(crate) fn new(
        bytes: Vec<u8>,
        media_type: String,
        checksum: String,
        chunk_count: usize,
        details: RecordingDetails,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            bytes: bytes.into(),
            media_type,
            checksum,
            chunk_count,
            duration_secs: details.duration_secs,
            created_at: Utc::now(),
            quality: details.quality,
            frame_rate: details.frame_rate,
            has_audio: details.has_audio,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    /// SHA-256 hex digest of the bytes.
    pub fn checksum(&self) -> &str {
        &self.checksum
    }

    pub fn chunk_count(&self) -> usize {
        self.chunk_count
    }

    pub fn duration_secs(&self) -> u64 {
        self.duration_secs
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn quality(&self) -> QualityPreset {
        self.quality
    }

    pub fn frame_rate(&self) -> FrameRate {
        self.frame_rate
    }

    pub fn has_audio(&self) -> bool {
        self.has_audio
    }

    /// File extension matching the container of the media type.
    pub fn extension(&self) -> &'static str {
        extension_for(&self.media_type)
    }
}

/// Map a media type such as `video/webm;codecs=vp9,opus` to a file extension.
pub fn extension_for(media_type: &str) -> &'static str {
    let container = media_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    match container.as_str() {
        "video/mp4" => "mp4",
        "video/x-matroska" => "mkv",
        "video/ogg" => "ogv",
        _ => "webm",
    }
}

/// Revocable handle to an artifact, usable as a download target.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ArtifactReference {
    pub url: String,
    pub artifact_id: String,
}

/// Read-only artifact projection for the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArtifactSummary {
    pub id: String,
    pub size_bytes: usize,
    pub media_type: String,
    pub checksum: String,
    pub duration_secs: u64,
    pub suggested_file_name: String,
}

/// Where `DownloadTarget::save` put an artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedRecording {
    pub location: String,
    pub file_name: String,
    pub size_bytes: u64,
}

/// Metadata written next to a saved recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordingMetadata {
    pub id: String,
    pub file_name: String,
    pub media_type: String,
    pub size_bytes: u64,
    pub checksum: String,
    pub duration_secs: u64,
    pub created_at: String,
    pub quality: QualityPreset,
    pub width: u32,
    pub height: u32,
    pub frame_rate: FrameRate,
    pub has_audio: bool,
}

impl RecordingMetadata {
    pub fn from_artifact(artifact: &Artifact, file_name: &str) -> Self {
        let profile = artifact.quality().profile();
        Self {
            id: artifact.id().to_string(),
            file_name: file_name.to_string(),
            media_type: artifact.media_type().to_string(),
            size_bytes: artifact.size() as u64,
            checksum: artifact.checksum().to_string(),
            duration_secs: artifact.duration_secs(),
            created_at: artifact.created_at().to_rfc3339(),
            quality: artifact.quality(),
            width: profile.width,
            height: profile.height,
            frame_rate: artifact.frame_rate(),
            has_audio: artifact.has_audio(),
        }
    }
}
