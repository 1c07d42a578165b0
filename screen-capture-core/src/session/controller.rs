use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::models::artifact::{
    Artifact, ArtifactReference, ArtifactSummary, RecordingDetails, SavedRecording,
};
use crate::models::config::RecorderConfiguration;
use crate::models::error::CaptureError;
use crate::models::media::{CompositeStream, MediaStream};
use crate::models::quality::{FrameRate, QualityPreset};
use crate::models::state::{SessionSnapshot, SessionState};
use crate::naming::{self, LocalTime, TimeSource};
use crate::session::acquirer;
use crate::session::assembler;
use crate::session::clock::{format_elapsed, SessionClock};
use crate::session::composer;
use crate::session::encoder_driver::EncoderDriver;
use crate::session::mixer::{self, MixedAudio};
use crate::session::probe::CapabilityProbe;
use crate::traits::audio_graph::AudioGraphFactory;
use crate::traits::display_capture::DisplayCapture;
use crate::traits::download_target::DownloadTarget;
use crate::traits::encoder::EncoderFactory;
use crate::traits::microphone_capture::MicrophoneCapture;
use crate::traits::session_delegate::SessionDelegate;

/// The platform capabilities a controller drives.
pub struct CaptureBackend {
    pub display: Box<dyn DisplayCapture>,
    pub microphone: Box<dyn MicrophoneCapture>,
    pub audio: Box<dyn AudioGraphFactory>,
    pub encoder: Box<dyn EncoderFactory>,
    pub downloads: Box<dyn DownloadTarget>,
}

/// Cloneable request to stop the recording from another thread.
///
/// A request made while the controller is still acquiring is queued and
/// honoured as soon as recording begins. While recording it is honoured by
/// the next [`RecordingController::poll`].
#[derive(Debug, Clone, Default)]
pub struct StopHandle {
    requested: Arc<AtomicBool>,
}

impl StopHandle {
    pub fn request_stop(&self) {
        self.requested.store(true, Ordering::SeqCst);
    }

    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }

    fn take(&self) -> bool {
        self.requested.swap(false, Ordering::SeqCst)
    }

    fn clear(&self) {
        self.requested.store(false, Ordering::SeqCst);
    }
}

/// Media handles held by a session. Released exactly once, on every exit.
#[derive(Default)]
struct CaptureResources {
    screen: Option<MediaStream>,
    microphone: Option<MediaStream>,
    mixed: Option<MixedAudio>,
    composite: Option<CompositeStream>,
}

impl CaptureResources {
    fn release(&mut self) {
        if let Some(composite) = self.composite.take() {
            composite.stop_all();
        }
        if let Some(mut mixed) = self.mixed.take() {
            mixed.close();
        }
        if let Some(microphone) = self.microphone.take() {
            microphone.stop_all();
        }
        if let Some(screen) = self.screen.take() {
            screen.stop_all();
        }
    }
}

impl Drop for CaptureResources {
    fn drop(&mut self) {
        self.release();
    }
}

struct ActiveRecording {
    resources: CaptureResources,
    driver: EncoderDriver,
    has_audio: bool,
}

/// Owns the capture session and every state transition.
///
/// ```text
/// [DisplayCapture] ──video─────────────────────────┐
///        └──system audio─┐                         ├→ [CompositeStream] → [EncoderDriver]
/// [MicrophoneCapture] ───┴→ [AudioGraph] → mixed ──┘                            │ chunks
///                                                     [assemble] ← stop ←───────┘
///                                                         └→ [DownloadTarget]
/// ```
/// All methods take `&mut self`: the exclusive borrow is the single write
/// path. Hosts sharing a controller across threads wrap it in a mutex, which
/// queues competing requests.
pub struct RecordingController {
    backend: CaptureBackend,
    config: RecorderConfiguration,
    probe: CapabilityProbe,
    state: SessionState,
    error: Option<CaptureError>,
    warning: Option<CaptureError>,
    output_name: String,
    clock: SessionClock,
    active: Option<ActiveRecording>,
    artifact: Option<Artifact>,
    reference: Option<ArtifactReference>,
    stop_handle: StopHandle,
    delegate: Option<Arc<dyn SessionDelegate>>,
    time: Arc<dyn TimeSource>,
}

impl RecordingController {
    /// Validate the configuration and probe the display capability once.
    pub fn new(
        backend: CaptureBackend,
        config: RecorderConfiguration,
    ) -> Result<Self, CaptureError> {
        if let Err(reason) = config.validate() {
            return Err(CaptureError::ConfigurationFailed(reason));
        }

        let probe = CapabilityProbe::run(backend.display.as_ref());
        let time: Arc<dyn TimeSource> = Arc::new(LocalTime);
        let output_name = naming::default_output_name(&config.file_name_prefix, time.now());

        Ok(Self {
            clock: SessionClock::new(config.tick_interval()),
            backend,
            config,
            probe,
            state: SessionState::Idle,
            error: None,
            warning: None,
            output_name,
            active: None,
            artifact: None,
            reference: None,
            stop_handle: StopHandle::default(),
            delegate: None,
            time,
        })
    }

    /// Replace the clock used for default output names.
    pub fn with_time_source(mut self, time: Arc<dyn TimeSource>) -> Self {
        self.time = time;
        self.output_name = self.fresh_output_name();
        self
    }

    pub fn set_delegate(&mut self, delegate: Arc<dyn SessionDelegate>) {
        let on_tick = Arc::clone(&delegate);
        self.clock
            .set_on_tick(Arc::new(move |secs| on_tick.on_elapsed(secs)));
        self.delegate = Some(delegate);
    }

    // --- Read-only projections ---

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_degraded(&self) -> bool {
        self.probe.is_degraded()
    }

    pub fn config(&self) -> &RecorderConfiguration {
        &self.config
    }

    pub fn output_name(&self) -> &str {
        &self.output_name
    }

    pub fn error(&self) -> Option<&CaptureError> {
        self.error.as_ref()
    }

    pub fn warning(&self) -> Option<&CaptureError> {
        self.warning.as_ref()
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.clock.elapsed()
    }

    pub fn artifact(&self) -> Option<&Artifact> {
        self.artifact.as_ref()
    }

    pub fn artifact_reference(&self) -> Option<&ArtifactReference> {
        self.reference.as_ref()
    }

    /// The composite stream being encoded, while recording.
    pub fn composite_stream(&self) -> Option<&CompositeStream> {
        self.active
            .as_ref()
            .and_then(|a| a.resources.composite.as_ref())
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop_handle.clone()
    }

    /// Name the artifact would be saved under right now.
    pub fn suggested_file_name(&self) -> Option<String> {
        let artifact = self.artifact.as_ref()?;
        Some(self.download_name(artifact.extension()))
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let (chunk_count, bytes_recorded) = match (&self.active, &self.artifact) {
            (Some(active), _) => (active.driver.chunk_count(), active.driver.bytes_recorded()),
            (None, Some(artifact)) => (artifact.chunk_count(), artifact.size() as u64),
            (None, None) => (0, 0),
        };
        let elapsed = self.clock.elapsed();

        SessionSnapshot {
            state: self.state,
            elapsed_secs: elapsed,
            elapsed_label: format_elapsed(elapsed),
            degraded: self.probe.is_degraded(),
            error: self.error.as_ref().map(CaptureError::user_message),
            warning: self.warning.as_ref().map(CaptureError::user_message),
            config: self.config.clone(),
            output_name: self.output_name.clone(),
            chunk_count,
            bytes_recorded,
            artifact: self.artifact.as_ref().map(|a| ArtifactSummary {
                id: a.id().to_string(),
                size_bytes: a.size(),
                media_type: a.media_type().to_string(),
                checksum: a.checksum().to_string(),
                duration_secs: a.duration_secs(),
                suggested_file_name: self.download_name(a.extension()),
            }),
        }
    }

    // --- Configuration ---

    pub fn set_quality(&mut self, quality: QualityPreset) -> Result<(), CaptureError> {
        self.ensure_configurable()?;
        self.config.quality = quality;
        Ok(())
    }

    pub fn set_frame_rate(&mut self, frame_rate: FrameRate) -> Result<(), CaptureError> {
        self.ensure_configurable()?;
        self.config.frame_rate = frame_rate;
        Ok(())
    }

    pub fn set_mic_enabled(&mut self, enabled: bool) -> Result<(), CaptureError> {
        self.ensure_configurable()?;
        self.config.mic_enabled = enabled;
        Ok(())
    }

    pub fn set_system_audio_enabled(&mut self, enabled: bool) -> Result<(), CaptureError> {
        self.ensure_configurable()?;
        self.config.system_audio_enabled = enabled;
        Ok(())
    }

    /// Editable while idle and once the artifact is ready.
    pub fn set_output_name(&mut self, name: impl Into<String>) -> Result<(), CaptureError> {
        if !self.state.allows_rename() {
            return Err(CaptureError::InvalidState(format!(
                "cannot rename while {}",
                self.state.name()
            )));
        }
        self.output_name = name.into();
        Ok(())
    }

    // --- Lifecycle ---

    /// Acquire streams, build the composite stream and start encoding.
    ///
    /// Transitions: idle → acquiring → recording, or back to idle on failure
    /// with every partially acquired handle released. A microphone failure
    /// only records a warning.
    pub fn start(&mut self) -> Result<(), CaptureError> {
        if self.probe.is_degraded() {
            let err = CaptureError::EnvironmentUnsupported;
            self.report_error(err.clone());
            return Err(err);
        }
        if !self.state.is_idle() {
            return Err(CaptureError::InvalidState(format!(
                "cannot start while {}",
                self.state.name()
            )));
        }

        self.stop_handle.clear();
        self.error = None;
        self.warning = None;
        self.discard_artifact();
        self.clock.reset();
        self.set_state(SessionState::Acquiring);

        match self.acquire() {
            Ok(active) => {
                self.active = Some(active);
                self.clock.start();
                self.set_state(SessionState::Recording);
                log::info!("Recording started");

                if self.stop_handle.take() {
                    log::info!("Stop was requested during acquisition, stopping now");
                    if let Err(e) = self.stop() {
                        log::warn!("Deferred stop failed: {}", e);
                    }
                }
                Ok(())
            }
            Err(err) => {
                self.stop_handle.clear();
                if err == CaptureError::EnvironmentUnsupported {
                    self.probe.mark_degraded();
                }
                self.set_state(SessionState::Idle);
                self.report_error(err.clone());
                Err(err)
            }
        }
    }

    /// Drain delivered chunks and honour pending stop conditions.
    ///
    /// Stops when a stop was requested through a [`StopHandle`], when the
    /// user ended screen sharing from the platform UI, or when the encoder
    /// finished on its own.
    pub fn poll(&mut self) -> Result<(), CaptureError> {
        if !self.state.is_recording() {
            return Ok(());
        }

        let mut should_stop = self.stop_handle.take();
        if let Some(active) = self.active.as_mut() {
            active.driver.collect();
            let sharing_ended = active
                .resources
                .composite
                .as_ref()
                .is_some_and(|c| !c.video_track().is_live());
            if sharing_ended {
                log::info!("Screen sharing ended, stopping recording");
                should_stop = true;
            }
            if active.driver.is_finished() {
                log::warn!("Encoder finished before stop was requested");
                should_stop = true;
            }
        }

        if should_stop {
            self.stop().map(|_| ())
        } else {
            Ok(())
        }
    }

    /// Advance a host-driven clock by one second.
    pub fn tick(&mut self) -> u64 {
        self.clock.tick()
    }

    /// Stop recording and assemble the artifact.
    ///
    /// Transitions: recording → processing → ready, or idle with
    /// `ProcessingFailed` when nothing usable was recorded.
    pub fn stop(&mut self) -> Result<Artifact, CaptureError> {
        if !self.state.is_recording() {
            return Err(CaptureError::InvalidState(format!(
                "cannot stop while {}",
                self.state.name()
            )));
        }
        let Some(active) = self.active.take() else {
            return Err(CaptureError::InvalidState("no active recording".into()));
        };

        log::info!("Stopping recording...");
        self.clock.stop();
        self.set_state(SessionState::Processing);

        let ActiveRecording {
            mut resources,
            driver,
            has_audio,
        } = active;
        let encoded = driver.stop(self.config.stop_timeout());
        resources.release();

        let details = RecordingDetails {
            duration_secs: self.clock.elapsed(),
            quality: self.config.quality,
            frame_rate: self.config.frame_rate,
            has_audio,
        };
        let outcome = encoded
            .and_then(|recording| assembler::assemble(recording, details))
            .and_then(|artifact| self.publish(artifact));

        match outcome {
            Ok(artifact) => Ok(artifact),
            Err(e) => {
                let err = match e {
                    CaptureError::ProcessingFailed(_) | CaptureError::Timeout => e,
                    other => CaptureError::ProcessingFailed(other.to_string()),
                };
                self.set_state(SessionState::Idle);
                self.report_error(err.clone());
                Err(err)
            }
        }
    }

    /// Discard the current artifact and return to idle with a fresh name.
    ///
    /// Safe to call repeatedly from ready or idle.
    pub fn new_recording(&mut self) -> Result<(), CaptureError> {
        if self.state.is_busy() {
            return Err(CaptureError::InvalidState(format!(
                "cannot reset while {}",
                self.state.name()
            )));
        }

        self.discard_artifact();
        self.clock.reset();
        self.error = None;
        self.warning = None;
        self.output_name = self.fresh_output_name();
        if !self.state.is_idle() {
            self.set_state(SessionState::Idle);
        }
        Ok(())
    }

    /// Save the artifact under the current output name.
    pub fn download(&mut self) -> Result<SavedRecording, CaptureError> {
        if !self.state.is_ready() {
            return Err(CaptureError::InvalidState("no recording is ready".into()));
        }
        let (Some(artifact), Some(reference)) = (&self.artifact, &self.reference) else {
            return Err(CaptureError::InvalidState("no recording is ready".into()));
        };

        let file_name = self.download_name(artifact.extension());
        log::info!("Downloading recording as {}", file_name);
        self.backend.downloads.save(reference, &file_name)
    }

    /// Release every handle, the clock and the artifact reference.
    ///
    /// Also run on drop.
    pub fn shutdown(&mut self) {
        self.clock.stop();
        if let Some(active) = self.active.take() {
            let ActiveRecording {
                mut resources,
                driver,
                ..
            } = active;
            driver.abort();
            resources.release();
        }
        self.discard_artifact();
        if self.state.is_busy() {
            self.set_state(SessionState::Idle);
        }
    }

    // --- Internal helpers ---

    fn acquire(&mut self) -> Result<ActiveRecording, CaptureError> {
        let want_system_audio = self.config.system_audio_enabled;
        let mut resources = CaptureResources::default();

        let screen = acquirer::acquire_screen(
            self.backend.display.as_mut(),
            self.config.quality,
            self.config.frame_rate,
            want_system_audio,
        )?;
        let system_audio = if want_system_audio {
            screen.audio_tracks().next().cloned()
        } else {
            None
        };
        let screen = resources.screen.insert(screen);

        let mic_enabled = self.config.mic_enabled;
        match acquirer::acquire_microphone(self.backend.microphone.as_mut(), mic_enabled) {
            Ok(microphone) => resources.microphone = microphone,
            Err(warning) => self.report_warning(warning),
        }

        resources.mixed = mixer::mix(
            self.backend.audio.as_mut(),
            system_audio.as_ref(),
            resources.microphone.as_ref(),
        )?;

        let composite = composer::compose(screen, resources.mixed.as_ref())?;
        let has_audio = composite.audio_track_count() > 0;
        let encoder = self.backend.encoder.as_mut();
        let driver = EncoderDriver::start(encoder, &composite, &self.config)?;
        resources.composite = Some(composite);

        Ok(ActiveRecording {
            resources,
            driver,
            has_audio,
        })
    }

    fn publish(&mut self, artifact: Artifact) -> Result<Artifact, CaptureError> {
        self.discard_artifact();
        let reference = self.backend.downloads.create_reference(&artifact)?;
        self.reference = Some(reference);
        self.artifact = Some(artifact.clone());
        self.set_state(SessionState::Ready);

        if let Some(ref delegate) = self.delegate {
            delegate.on_artifact_ready(&artifact);
        }
        Ok(artifact)
    }

    fn discard_artifact(&mut self) {
        if let Some(reference) = self.reference.take() {
            self.backend.downloads.revoke(&reference);
        }
        self.artifact = None;
    }

    fn download_name(&self, extension: &str) -> String {
        naming::download_file_name(&self.output_name, extension)
            .or_else(|| naming::download_file_name(&self.fresh_output_name(), extension))
            .unwrap_or_else(|| format!("{}.{}", self.config.file_name_prefix, extension))
    }

    fn fresh_output_name(&self) -> String {
        naming::default_output_name(&self.config.file_name_prefix, self.time.now())
    }

    fn ensure_configurable(&self) -> Result<(), CaptureError> {
        if self.state.allows_configuration() {
            Ok(())
        } else {
            Err(CaptureError::InvalidState(format!(
                "settings can only change while idle, not while {}",
                self.state.name()
            )))
        }
    }

    fn set_state(&mut self, state: SessionState) {
        log::debug!("Session state: {} -> {}", self.state.name(), state.name());
        self.state = state;
        if let Some(ref delegate) = self.delegate {
            delegate.on_state_changed(state);
        }
    }

    fn report_error(&mut self, error: CaptureError) {
        log::error!("Recording error: {}", error);
        if let Some(ref delegate) = self.delegate {
            delegate.on_error(&error);
        }
        self.error = Some(error);
    }

    fn report_warning(&mut self, warning: CaptureError) {
        log::warn!("Recording warning: {}", warning);
        if let Some(ref delegate) = self.delegate {
            delegate.on_warning(&warning);
        }
        self.warning = Some(warning);
    }
}

impl Drop for RecordingController {
    fn drop(&mut self) {
        self.shutdown();
    }
}
