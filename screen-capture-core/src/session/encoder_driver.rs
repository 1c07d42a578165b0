use std::sync::mpsc::{self, Receiver, RecvTimeoutError, TryRecvError};
use std::time::{Duration, Instant};

use crate::models::config::RecorderConfiguration;
use crate::models::error::CaptureError;
use crate::models::media::CompositeStream;
use crate::traits::encoder::{
    ChunkSink, ChunkedEncoder, EncoderEvent, EncoderFactory, EncoderSettings,
};

/// Pick the first preferred format the platform supports, else the fallback.
pub fn select_format(
    factory: &dyn EncoderFactory,
    preferences: &[String],
    fallback: &str,
) -> String {
    preferences
        .iter()
        .find(|format| factory.is_type_supported(format))
        .cloned()
        .unwrap_or_else(|| fallback.to_string())
}

/// The chunk sequence of a finished encoder, in emission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedRecording {
    pub chunks: Vec<Vec<u8>>,
    pub mime_type: String,
}

impl EncodedRecording {
    pub fn total_bytes(&self) -> usize {
        self.chunks.iter().map(Vec::len).sum()
    }
}

/// Drives a platform encoder through start → chunks → stop.
///
/// Owns the chunk sequence until `stop` hands it over.
pub struct EncoderDriver {
    encoder: Box<dyn ChunkedEncoder>,
    events: Receiver<EncoderEvent>,
    chunks: Vec<Vec<u8>>,
    bytes_recorded: u64,
    mime_type: String,
    finished: bool,
}

impl EncoderDriver {
    pub fn start(
        factory: &mut dyn EncoderFactory,
        stream: &CompositeStream,
        config: &RecorderConfiguration,
    ) -> Result<Self, CaptureError> {
        let preferences = &config.format_preferences;
        let mime_type = select_format(factory, preferences, &config.fallback_format);
        log::info!("Using format: {}", mime_type);

        let settings = EncoderSettings {
            mime_type: mime_type.clone(),
            video_bits_per_second: config.quality.profile().bitrate,
            timeslice: config.chunk_interval(),
        };
        let mut encoder = factory.create(stream, &settings)?;

        let (tx, events) = mpsc::channel();
        encoder.start(ChunkSink::new(tx))?;
        log::info!("Encoder started");

        Ok(Self {
            encoder,
            events,
            chunks: Vec::new(),
            bytes_recorded: 0,
            mime_type,
            finished: false,
        })
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn bytes_recorded(&self) -> u64 {
        self.bytes_recorded
    }

    /// Whether the encoder already delivered its terminal signal.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Drain chunks delivered so far without blocking.
    pub fn collect(&mut self) -> usize {
        let before = self.chunks.len();
        while !self.finished {
            match self.events.try_recv() {
                Ok(event) => self.accept(event),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    log::warn!("Encoder dropped its sink without a stop signal");
                    self.finished = true;
                }
            }
        }
        self.chunks.len() - before
    }

    /// Stop the encoder and wait for every pending chunk and the stop signal.
    pub fn stop(mut self, timeout: Duration) -> Result<EncodedRecording, CaptureError> {
        if !self.finished {
            self.encoder.stop()?;
        }

        let deadline = Instant::now() + timeout;
        while !self.finished {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.events.recv_timeout(remaining) {
                Ok(event) => self.accept(event),
                Err(RecvTimeoutError::Timeout) => {
                    log::error!("Encoder did not confirm stop within {:?}", timeout);
                    return Err(CaptureError::Timeout);
                }
                Err(RecvTimeoutError::Disconnected) => {
                    log::warn!("Encoder dropped its sink without a stop signal");
                    self.finished = true;
                }
            }
        }

        log::info!("Recording stopped with {} chunk(s)", self.chunks.len());
        Ok(EncodedRecording {
            chunks: std::mem::take(&mut self.chunks),
            mime_type: std::mem::take(&mut self.mime_type),
        })
    }

    /// Stop without waiting for the remaining chunks. Used on teardown.
    pub fn abort(mut self) {
        if !self.finished {
            if let Err(e) = self.encoder.stop() {
                log::warn!("Failed to stop encoder on teardown: {}", e);
            }
        }
    }

    fn accept(&mut self, event: EncoderEvent) {
        match event {
            EncoderEvent::Chunk(data) if data.is_empty() => {
                log::debug!("Discarding empty chunk");
            }
            EncoderEvent::Chunk(data) => {
                log::debug!("Chunk received: {} bytes", data.len());
                self.bytes_recorded += data.len() as u64;
                self.chunks.push(data);
            }
            EncoderEvent::Stopped => {
                self.finished = true;
            }
        }
    }
}
