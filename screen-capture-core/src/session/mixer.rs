use crate::models::error::CaptureError;
use crate::models::media::{MediaStream, MediaTrack};
use crate::traits::audio_graph::{AudioGraph, AudioGraphFactory};

/// Output of the per-session mixing graph.
///
/// Owns the graph; `close` tears it down and is safe to call twice.
pub struct MixedAudio {
    graph: Box<dyn AudioGraph>,
    track: MediaTrack,
    source_count: usize,
    closed: bool,
}

impl MixedAudio {
    pub fn track(&self) -> &MediaTrack {
        &self.track
    }

    /// Number of source tracks routed into the graph.
    pub fn source_count(&self) -> usize {
        self.source_count
    }

    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.track.stop();
        self.graph.close();
    }
}

impl std::fmt::Debug for MixedAudio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MixedAudio")
            .field("track", &self.track)
            .field("source_count", &self.source_count)
            .field("closed", &self.closed)
            .finish()
    }
}

/// Merge zero, one or two audio sources into a single track.
///
/// No graph is created when there is nothing to mix.
pub fn mix(
    factory: &mut dyn AudioGraphFactory,
    system_audio: Option<&MediaTrack>,
    microphone: Option<&MediaStream>,
) -> Result<Option<MixedAudio>, CaptureError> {
    let sources: Vec<&MediaTrack> = system_audio
        .into_iter()
        .chain(microphone.into_iter().flat_map(|s| s.audio_tracks()))
        .collect();

    if sources.is_empty() {
        log::debug!("No audio sources, recording video only");
        return Ok(None);
    }

    let mut graph = factory.create()?;
    for source in &sources {
        if let Err(e) = graph.connect(source) {
            graph.close();
            return Err(e);
        }
    }

    let track = graph.output();
    log::debug!("Mixed {} source(s) into {}", sources.len(), track.id());
    Ok(Some(MixedAudio {
        graph,
        track,
        source_count: sources.len(),
        closed: false,
    }))
}
