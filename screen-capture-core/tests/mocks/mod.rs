//! Mock infrastructure for testing
//!
//! Scriptable stand-ins for every platform capability. Each mock shares its
//! observable state through `Arc`s so tests can inspect it after the mock
//! has been boxed into a `CaptureBackend`.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use parking_lot::Mutex;

use screen_capture_core::{
    AcquireError, Artifact, ArtifactReference, CaptureBackend, CaptureError, ChunkSink,
    ChunkedEncoder, CompositeStream, DisplayCapture, DownloadTarget, EncoderFactory,
    EncoderSettings, MediaStream, MediaTrack, MicrophoneCapture, MicrophoneRequest,
    RecorderConfiguration, SavedRecording, ScreenRequest, SessionDelegate, SessionState,
    SoftwareGraphFactory, StopHandle, TimeSource,
};

/// Configuration with host-driven ticking so tests never spawn a clock thread.
pub fn test_config() -> RecorderConfiguration {
    RecorderConfiguration {
        tick_interval_ms: None,
        stop_timeout_ms: 500,
        ..Default::default()
    }
}

/// 7 March 2026, 09:05:03.
pub fn fixed_moment() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 3, 7)
        .unwrap()
        .and_hms_opt(9, 5, 3)
        .unwrap()
}

pub struct FixedTime(pub NaiveDateTime);

impl TimeSource for FixedTime {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

// --- Display ---

#[derive(Clone)]
pub enum ScreenOutcome {
    /// Video track, plus a system audio track when requested and offered.
    Grant { offers_audio: bool },
    /// Only audio tracks, no video.
    AudioOnly,
    Fail(AcquireError),
}

pub struct FakeDisplay {
    pub supported: bool,
    pub outcome: ScreenOutcome,
    pub requests: Arc<Mutex<Vec<ScreenRequest>>>,
    pub issued: Arc<Mutex<Vec<MediaStream>>>,
    /// Raised while the platform prompt is open, like a user clicking stop.
    pub stop_during_request: Arc<Mutex<Option<StopHandle>>>,
}

impl FakeDisplay {
    pub fn granting(offers_audio: bool) -> Self {
        Self::with_outcome(ScreenOutcome::Grant { offers_audio })
    }

    pub fn failing(error: AcquireError) -> Self {
        Self::with_outcome(ScreenOutcome::Fail(error))
    }

    pub fn with_outcome(outcome: ScreenOutcome) -> Self {
        Self {
            supported: true,
            outcome,
            requests: Arc::new(Mutex::new(Vec::new())),
            issued: Arc::new(Mutex::new(Vec::new())),
            stop_during_request: Arc::new(Mutex::new(None)),
        }
    }

    pub fn unsupported() -> Self {
        Self {
            supported: false,
            ..Self::granting(true)
        }
    }
}

impl DisplayCapture for FakeDisplay {
    fn is_supported(&self) -> bool {
        self.supported
    }

    fn request(&mut self, request: &ScreenRequest) -> Result<MediaStream, AcquireError> {
        self.requests.lock().push(request.clone());
        if let Some(ref handle) = *self.stop_during_request.lock() {
            handle.request_stop();
        }
        let stream = match &self.outcome {
            ScreenOutcome::Grant { offers_audio } => {
                let mut tracks = vec![MediaTrack::video("screen")];
                if request.audio && *offers_audio {
                    tracks.push(MediaTrack::audio("system"));
                }
                MediaStream::new(tracks)
            }
            ScreenOutcome::AudioOnly => MediaStream::new(vec![MediaTrack::audio("system")]),
            ScreenOutcome::Fail(e) => return Err(e.clone()),
        };
        self.issued.lock().push(stream.clone());
        Ok(stream)
    }
}

// --- Microphone ---

pub struct FakeMicrophone {
    pub failure: Option<AcquireError>,
    pub requests: Arc<Mutex<usize>>,
    pub issued: Arc<Mutex<Vec<MediaStream>>>,
}

impl FakeMicrophone {
    pub fn working() -> Self {
        Self {
            failure: None,
            requests: Arc::new(Mutex::new(0)),
            issued: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing(error: AcquireError) -> Self {
        Self {
            failure: Some(error),
            ..Self::working()
        }
    }
}

impl MicrophoneCapture for FakeMicrophone {
    fn request(&mut self, _request: &MicrophoneRequest) -> Result<MediaStream, AcquireError> {
        *self.requests.lock() += 1;
        if let Some(ref e) = self.failure {
            return Err(e.clone());
        }
        let stream = MediaStream::new(vec![MediaTrack::audio("microphone")]);
        self.issued.lock().push(stream.clone());
        Ok(stream)
    }
}

// --- Encoder ---

/// What one encoder instance was asked to encode.
#[derive(Debug, Clone)]
pub struct EncoderStart {
    pub video_tracks: usize,
    pub audio_tracks: usize,
    pub settings: EncoderSettings,
}

/// Encoder that emits scripted chunks.
///
/// `live_chunks` are delivered as soon as the encoder starts, `final_chunks`
/// when it is stopped, followed by the stop signal.
pub struct ScriptedEncoderFactory {
    pub supported: Vec<String>,
    pub live_chunks: Vec<Vec<u8>>,
    pub final_chunks: Vec<Vec<u8>>,
    /// Send the stop signal right after the live chunks.
    pub finish_on_start: bool,
    /// Never send the stop signal.
    pub hang_on_stop: bool,
    pub fail_create: bool,
    pub starts: Arc<Mutex<Vec<EncoderStart>>>,
    pub stops: Arc<Mutex<usize>>,
}

impl ScriptedEncoderFactory {
    pub fn new(final_chunks: Vec<Vec<u8>>) -> Self {
        Self {
            supported: vec!["video/webm;codecs=vp9,opus".into(), "video/webm".into()],
            live_chunks: Vec::new(),
            final_chunks,
            finish_on_start: false,
            hang_on_stop: false,
            fail_create: false,
            starts: Arc::new(Mutex::new(Vec::new())),
            stops: Arc::new(Mutex::new(0)),
        }
    }
}

impl EncoderFactory for ScriptedEncoderFactory {
    fn is_type_supported(&self, mime_type: &str) -> bool {
        self.supported.iter().any(|s| s == mime_type)
    }

    fn create(
        &mut self,
        stream: &CompositeStream,
        settings: &EncoderSettings,
    ) -> Result<Box<dyn ChunkedEncoder>, CaptureError> {
        if self.fail_create {
            return Err(CaptureError::EncodingFailed("encoder rejected the stream".into()));
        }
        self.starts.lock().push(EncoderStart {
            video_tracks: stream.video_track_count(),
            audio_tracks: stream.audio_track_count(),
            settings: settings.clone(),
        });
        Ok(Box::new(ScriptedEncoder {
            live_chunks: self.live_chunks.clone(),
            final_chunks: self.final_chunks.clone(),
            finish_on_start: self.finish_on_start,
            hang_on_stop: self.hang_on_stop,
            stops: Arc::clone(&self.stops),
            sink: None,
        }))
    }
}

struct ScriptedEncoder {
    live_chunks: Vec<Vec<u8>>,
    final_chunks: Vec<Vec<u8>>,
    finish_on_start: bool,
    hang_on_stop: bool,
    stops: Arc<Mutex<usize>>,
    sink: Option<ChunkSink>,
}

impl ChunkedEncoder for ScriptedEncoder {
    fn start(&mut self, sink: ChunkSink) -> Result<(), CaptureError> {
        for chunk in self.live_chunks.drain(..) {
            let _ = sink.chunk(chunk);
        }
        if self.finish_on_start {
            let _ = sink.stopped();
        }
        self.sink = Some(sink);
        Ok(())
    }

    fn stop(&mut self) -> Result<(), CaptureError> {
        *self.stops.lock() += 1;
        let Some(ref sink) = self.sink else {
            return Ok(());
        };
        for chunk in self.final_chunks.drain(..) {
            let _ = sink.chunk(chunk);
        }
        if !self.hang_on_stop {
            let _ = sink.stopped();
        }
        Ok(())
    }
}

// --- Downloads ---

#[derive(Default)]
pub struct DownloadLog {
    pub live: HashSet<String>,
    pub revoked: Vec<String>,
    pub saved: Vec<(String, usize)>,
    pub artifacts: Vec<(String, usize)>,
}

/// In-memory download target that records every call.
pub struct RecordingDownloads {
    pub log: Arc<Mutex<DownloadLog>>,
    sizes: std::collections::HashMap<String, usize>,
    next: usize,
}

impl RecordingDownloads {
    pub fn new() -> Self {
        Self {
            log: Arc::new(Mutex::new(DownloadLog::default())),
            sizes: Default::default(),
            next: 0,
        }
    }
}

impl DownloadTarget for RecordingDownloads {
    fn create_reference(&mut self, artifact: &Artifact) -> Result<ArtifactReference, CaptureError> {
        self.next += 1;
        let url = format!("blob:test/{}", self.next);
        self.sizes.insert(url.clone(), artifact.size());

        let mut log = self.log.lock();
        log.live.insert(url.clone());
        let entry = (artifact.id().to_string(), artifact.size());
        log.artifacts.push(entry);
        Ok(ArtifactReference {
            url,
            artifact_id: artifact.id().to_string(),
        })
    }

    fn revoke(&mut self, reference: &ArtifactReference) {
        let mut log = self.log.lock();
        if log.live.remove(&reference.url) {
            log.revoked.push(reference.url.clone());
        }
    }

    fn save(
        &mut self,
        reference: &ArtifactReference,
        file_name: &str,
    ) -> Result<SavedRecording, CaptureError> {
        let mut log = self.log.lock();
        if !log.live.contains(&reference.url) {
            return Err(CaptureError::StorageError("reference was revoked".into()));
        }
        let size = self.sizes.get(&reference.url).copied().unwrap_or(0);
        log.saved.push((file_name.to_string(), size));
        Ok(SavedRecording {
            location: format!("downloads/{}", file_name),
            file_name: file_name.to_string(),
            size_bytes: size as u64,
        })
    }
}

// --- Delegate ---

#[derive(Default)]
pub struct RecordingDelegate {
    pub states: Mutex<Vec<SessionState>>,
    pub errors: Mutex<Vec<CaptureError>>,
    pub warnings: Mutex<Vec<CaptureError>>,
    pub artifacts: Mutex<Vec<String>>,
}

impl SessionDelegate for RecordingDelegate {
    fn on_state_changed(&self, state: SessionState) {
        self.states.lock().push(state);
    }

    fn on_error(&self, error: &CaptureError) {
        self.errors.lock().push(error.clone());
    }

    fn on_warning(&self, warning: &CaptureError) {
        self.warnings.lock().push(warning.clone());
    }

    fn on_artifact_ready(&self, artifact: &Artifact) {
        self.artifacts.lock().push(artifact.id().to_string());
    }
}

// --- Harness ---

/// Handles onto the mocks of a backend, kept after the backend is boxed.
pub struct MockHandles {
    pub screen_requests: Arc<Mutex<Vec<ScreenRequest>>>,
    pub screens: Arc<Mutex<Vec<MediaStream>>>,
    pub stop_during_request: Arc<Mutex<Option<StopHandle>>>,
    pub mic_requests: Arc<Mutex<usize>>,
    pub microphones: Arc<Mutex<Vec<MediaStream>>>,
    pub encoder_starts: Arc<Mutex<Vec<EncoderStart>>>,
    pub encoder_stops: Arc<Mutex<usize>>,
    pub downloads: Arc<Mutex<DownloadLog>>,
    /// Shares the record of the audio graph built for the latest start.
    pub graphs: SoftwareGraphFactory,
}

impl MockHandles {
    /// Every track handed out by the capture mocks.
    pub fn all_tracks(&self) -> Vec<MediaTrack> {
        self.screens
            .lock()
            .iter()
            .chain(self.microphones.lock().iter())
            .flat_map(|s| s.tracks().to_vec())
            .collect()
    }
}

pub fn backend(
    display: FakeDisplay,
    microphone: FakeMicrophone,
    encoder: ScriptedEncoderFactory,
) -> (CaptureBackend, MockHandles) {
    let downloads = RecordingDownloads::new();
    let graphs = SoftwareGraphFactory::default();
    let handles = MockHandles {
        screen_requests: Arc::clone(&display.requests),
        screens: Arc::clone(&display.issued),
        stop_during_request: Arc::clone(&display.stop_during_request),
        mic_requests: Arc::clone(&microphone.requests),
        microphones: Arc::clone(&microphone.issued),
        encoder_starts: Arc::clone(&encoder.starts),
        encoder_stops: Arc::clone(&encoder.stops),
        downloads: Arc::clone(&downloads.log),
        graphs: graphs.clone(),
    };
    let backend = CaptureBackend {
        display: Box::new(display),
        microphone: Box::new(microphone),
        audio: Box::new(graphs),
        encoder: Box::new(encoder),
        downloads: Box::new(downloads),
    };
    (backend, handles)
}

/// Two chunks of 3 and 5 bytes.
pub fn two_chunks() -> Vec<Vec<u8>> {
    vec![vec![1, 2, 3], vec![4, 5, 6, 7, 8]]
}
