//! # screen-capture-core
//!
//! Platform-agnostic screen recording core.
//!
//! Captures the screen together with system audio and the microphone, mixes
//! both audio sources into one track, drives a chunked encoder and assembles
//! the chunks into a downloadable artifact. Platform capabilities (display
//! capture, microphone capture, audio graph, encoder, download target) are
//! consumed through the traits in [`traits`] and plug into the
//! [`RecordingController`].
//!
//! ## Architecture
//!
//! ```text
//! screen-capture-core (this crate)
//! ├── traits/       ← capture, audio graph, encoder, download target, delegate
//! ├── models/       ← CaptureError, SessionState, RecorderConfiguration, MediaTrack, Artifact
//! ├── processing/   ← SoftwareAudioGraph, MixBus, SourceBuffer
//! ├── session/      ← probe, acquirer, mixer, composer, encoder, assembler, RecordingController
//! ├── storage/      ← FileDownloadTarget, metadata sidecar
//! └── naming        ← default output names, download file names
//! ```

pub mod models;
pub mod naming;
pub mod processing;
pub mod session;
pub mod storage;
pub mod traits;

// Re-export key types at crate root for convenience.
pub use models::artifact::{
    Artifact, ArtifactReference, ArtifactSummary, RecordingMetadata, SavedRecording,
};
pub use models::config::RecorderConfiguration;
pub use models::error::{AcquireError, CaptureError};
pub use models::media::{CompositeStream, MediaStream, MediaTrack, TrackKind};
pub use models::quality::{FrameRate, QualityPreset, QualityProfile};
pub use models::state::{SessionSnapshot, SessionState};
pub use naming::{LocalTime, TimeSource};
pub use processing::software_graph::{SoftwareAudioGraph, SoftwareGraphFactory};
pub use session::clock::{format_elapsed, SessionClock};
pub use session::controller::{CaptureBackend, RecordingController, StopHandle};
pub use storage::file_target::FileDownloadTarget;
pub use traits::audio_graph::{AudioGraph, AudioGraphFactory};
pub use traits::display_capture::{DisplayCapture, DisplaySurface, ScreenRequest};
pub use traits::download_target::DownloadTarget;
pub use traits::encoder::{ChunkSink, ChunkedEncoder, EncoderEvent, EncoderFactory, EncoderSettings};
pub use traits::microphone_capture::{MicrophoneCapture, MicrophoneRequest};
pub use traits::session_delegate::SessionDelegate;
