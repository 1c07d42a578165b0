use std::sync::Arc;

use parking_lot::Mutex;

use crate::models::error::CaptureError;
use crate::models::media::MediaTrack;
use crate::processing::mix_bus::{MixBus, MixLevels};
use crate::processing::source_buffer::SourceBuffer;
use crate::traits::audio_graph::{AudioGraph, AudioGraphFactory};

struct ConnectedSource {
    track_id: String,
    buffer: SourceBuffer,
}

struct GraphState {
    sources: Vec<ConnectedSource>,
    levels: MixLevels,
    closed: bool,
}

/// In-process audio graph for hosts without a native one.
///
/// Clones share the same graph, so the host keeps a clone to `feed` captured
/// samples while the session owns the boxed graph.
/// ```text
/// [source A] → feed → [SourceBuffer A] ─┐
///                                       ├→ [MixBus::sum] → render()
/// [source B] → feed → [SourceBuffer B] ─┘
/// ```
#[derive(Clone)]
pub struct SoftwareAudioGraph {
    bus: MixBus,
    output: MediaTrack,
    capacity_frames: usize,
    state: Arc<Mutex<GraphState>>,
}

impl SoftwareAudioGraph {
    pub fn new(sample_rate: f64, buffer_secs: f64) -> Self {
        Self {
            bus: MixBus::new(sample_rate),
            output: MediaTrack::audio("mixed-audio"),
            capacity_frames: (sample_rate * buffer_secs) as usize,
            state: Arc::new(Mutex::new(GraphState {
                sources: Vec::new(),
                levels: MixLevels::default(),
                closed: false,
            })),
        }
    }

    pub fn sample_rate(&self) -> f64 {
        self.bus.target_sample_rate
    }

    pub fn source_count(&self) -> usize {
        self.state.lock().sources.len()
    }

    /// Ids of the connected source tracks, in connection order.
    pub fn source_ids(&self) -> Vec<String> {
        let state = self.state.lock();
        state.sources.iter().map(|s| s.track_id.clone()).collect()
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    pub fn levels(&self) -> MixLevels {
        self.state.lock().levels
    }

    /// Push captured samples for a connected source.
    pub fn feed(
        &self,
        track_id: &str,
        samples: &[f32],
        sample_rate: f64,
        channels: u16,
    ) -> Result<(), CaptureError> {
        let stereo = self.bus.to_stereo(samples, channels);
        let resampled = self.bus.resample_stereo(&stereo, sample_rate);

        let mut state = self.state.lock();
        if state.closed {
            return Err(CaptureError::InvalidState("audio graph is closed".into()));
        }
        let source = state
            .sources
            .iter_mut()
            .find(|s| s.track_id == track_id)
            .ok_or_else(|| {
                CaptureError::ConfigurationFailed(format!("track {} is not connected", track_id))
            })?;
        source.buffer.write_frames(&resampled);
        Ok(())
    }

    /// Pull `frames` mixed stereo frames from the graph.
    pub fn render(&self, frames: usize) -> Vec<f32> {
        let mut state = self.state.lock();
        let blocks: Vec<Vec<f32>> = state
            .sources
            .iter_mut()
            .map(|s| s.buffer.read_frames(frames))
            .collect();

        let mixed = if blocks.is_empty() {
            vec![0.0; frames * 2]
        } else {
            self.bus.sum(&blocks)
        };
        state.levels = MixBus::levels(&mixed);
        mixed
    }
}

impl AudioGraph for SoftwareAudioGraph {
    fn connect(&mut self, source: &MediaTrack) -> Result<(), CaptureError> {
        let mut state = self.state.lock();
        if state.closed {
            return Err(CaptureError::InvalidState("audio graph is closed".into()));
        }
        if state.sources.iter().any(|s| s.track_id == source.id()) {
            return Ok(());
        }
        log::debug!(
            "Audio graph: connecting {} ({})",
            source.label(),
            source.id()
        );
        state.sources.push(ConnectedSource {
            track_id: source.id().to_string(),
            buffer: SourceBuffer::new(self.capacity_frames),
        });
        Ok(())
    }

    fn output(&self) -> MediaTrack {
        self.output.clone()
    }

    fn close(&mut self) {
        let mut state = self.state.lock();
        state.sources.clear();
        state.closed = true;
        self.output.stop();
    }
}

/// Creates a fresh [`SoftwareAudioGraph`] per session.
///
/// Clones observe the same [`latest`](Self::latest) graph.
#[derive(Clone)]
pub struct SoftwareGraphFactory {
    sample_rate: f64,
    buffer_secs: f64,
    latest: Arc<Mutex<Option<SoftwareAudioGraph>>>,
}

impl SoftwareGraphFactory {
    pub fn new(sample_rate: f64) -> Self {
        Self {
            sample_rate,
            buffer_secs: 5.0,
            latest: Arc::new(Mutex::new(None)),
        }
    }

    /// The graph created for the most recent session, for feeding samples.
    pub fn latest(&self) -> Option<SoftwareAudioGraph> {
        self.latest.lock().clone()
    }
}

impl Default for SoftwareGraphFactory {
    fn default() -> Self {
        Self::new(48000.0)
    }
}

impl AudioGraphFactory for SoftwareGraphFactory {
    fn create(&mut self) -> Result<Box<dyn AudioGraph>, CaptureError> {
        let graph = SoftwareAudioGraph::new(self.sample_rate, self.buffer_secs);
        *self.latest.lock() = Some(graph.clone());
        Ok(Box::new(graph))
    }
}
