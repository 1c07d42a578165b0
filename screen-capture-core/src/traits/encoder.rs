use std::sync::mpsc::{SendError, Sender};
use std::time::Duration;

use crate::models::error::CaptureError;
use crate::models::media::CompositeStream;

/// Settings handed to the platform encoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncoderSettings {
    pub mime_type: String,
    pub video_bits_per_second: u32,
    /// How often the encoder emits a chunk.
    pub timeslice: Duration,
}

/// Events flowing from an encoder to its driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncoderEvent {
    Chunk(Vec<u8>),
    /// Terminal signal. No chunk follows it.
    Stopped,
}

/// Sending half handed to an encoder on start.
///
/// Delivery is FIFO, so a `Stopped` sent after the last chunk is observed
/// after it.
#[derive(Debug, Clone)]
pub struct ChunkSink {
    tx: Sender<EncoderEvent>,
}

impl ChunkSink {
    pub(crate) fn new(tx: Sender<EncoderEvent>) -> Self {
        Self { tx }
    }

    pub fn chunk(&self, data: Vec<u8>) -> Result<(), SendError<EncoderEvent>> {
        self.tx.send(EncoderEvent::Chunk(data))
    }

    pub fn stopped(&self) -> Result<(), SendError<EncoderEvent>> {
        self.tx.send(EncoderEvent::Stopped)
    }
}

/// A started platform encoder.
pub trait ChunkedEncoder: Send {
    /// Begin encoding, emitting chunks every `settings.timeslice` through `sink`.
    fn start(&mut self, sink: ChunkSink) -> Result<(), CaptureError>;

    /// Request finalization. Pending chunks and then `Stopped` follow on the sink.
    fn stop(&mut self) -> Result<(), CaptureError>;
}

/// Platform chunked-encoder capability.
pub trait EncoderFactory: Send {
    fn is_type_supported(&self, mime_type: &str) -> bool;

    fn create(
        &mut self,
        stream: &CompositeStream,
        settings: &EncoderSettings,
    ) -> Result<Box<dyn ChunkedEncoder>, CaptureError>;
}
