use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Kind of media carried by a track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackKind {
    Video,
    Audio,
}

/// Handle to a live media track owned by a capture session.
///
/// Clones share the same liveness flag, so a platform implementation can keep
/// a clone and observe when the session stops the track. Stopping is
/// idempotent.
#[derive(Debug, Clone)]
pub struct MediaTrack {
    id: String,
    kind: TrackKind,
    label: String,
    live: Arc<AtomicBool>,
}

impl MediaTrack {
    pub fn new(kind: TrackKind, label: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            kind,
            label: label.into(),
            live: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn video(label: impl Into<String>) -> Self {
        Self::new(TrackKind::Video, label)
    }

    pub fn audio(label: impl Into<String>) -> Self {
        Self::new(TrackKind::Audio, label)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> TrackKind {
        self.kind
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_live(&self) -> bool {
        self.live.load(Ordering::SeqCst)
    }

    /// Stop the track. Returns `true` if this call ended it.
    pub fn stop(&self) -> bool {
        self.live.swap(false, Ordering::SeqCst)
    }
}

impl PartialEq for MediaTrack {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for MediaTrack {}

/// An ordered set of tracks returned by a capture capability.
#[derive(Debug, Clone, Default)]
pub struct MediaStream {
    tracks: Vec<MediaTrack>,
}

impl MediaStream {
    pub fn new(tracks: Vec<MediaTrack>) -> Self {
        Self { tracks }
    }

    pub fn tracks(&self) -> &[MediaTrack] {
        &self.tracks
    }

    pub fn video_tracks(&self) -> impl Iterator<Item = &MediaTrack> {
        self.tracks.iter().filter(|t| t.kind() == TrackKind::Video)
    }

    pub fn audio_tracks(&self) -> impl Iterator<Item = &MediaTrack> {
        self.tracks.iter().filter(|t| t.kind() == TrackKind::Audio)
    }

    pub fn has_audio(&self) -> bool {
        self.audio_tracks().next().is_some()
    }

    /// Comma separated track kinds, for logging.
    pub fn describe(&self) -> String {
        self.tracks
            .iter()
            .map(|t| match t.kind() {
                TrackKind::Video => "video",
                TrackKind::Audio => "audio",
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn stop_all(&self) {
        for track in &self.tracks {
            track.stop();
        }
    }
}

/// The stream handed to the encoder: one video track, at most one audio track.
#[derive(Debug, Clone)]
pub struct CompositeStream {
    video: MediaTrack,
    audio: Option<MediaTrack>,
}

impl CompositeStream {
    pub fn new(video: MediaTrack, audio: Option<MediaTrack>) -> Self {
        Self { video, audio }
    }

    pub fn video_track(&self) -> &MediaTrack {
        &self.video
    }

    pub fn audio_track(&self) -> Option<&MediaTrack> {
        self.audio.as_ref()
    }

    pub fn video_track_count(&self) -> usize {
        1
    }

    pub fn audio_track_count(&self) -> usize {
        usize::from(self.audio.is_some())
    }

    pub fn tracks(&self) -> Vec<&MediaTrack> {
        std::iter::once(&self.video)
            .chain(self.audio.as_ref())
            .collect()
    }

    pub fn stop_all(&self) {
        self.video.stop();
        if let Some(ref audio) = self.audio {
            audio.stop();
        }
    }
}
