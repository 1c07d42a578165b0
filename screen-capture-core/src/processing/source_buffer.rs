/// Circular buffer of interleaved stereo frames for one graph input.
///
/// Wrap in `parking_lot::Mutex` for cross-thread access.
///
/// Overflow drops the oldest frames. Reads always return the requested frame
/// count, padding with silence when the source has fallen behind.
#[derive(Debug)]
pub struct SourceBuffer {
    samples: Vec<f32>,
    write_frame: usize,
    read_frame: usize,
    available: usize,
    capacity_frames: usize,
}

const CHANNELS: usize = 2;

impl SourceBuffer {
    pub fn new(capacity_frames: usize) -> Self {
        let capacity_frames = capacity_frames.max(1);
        Self {
            samples: vec![0.0; capacity_frames * CHANNELS],
            write_frame: 0,
            read_frame: 0,
            available: 0,
            capacity_frames,
        }
    }

    /// Append interleaved stereo samples. A trailing half frame is ignored.
    pub fn write_frames(&mut self, stereo: &[f32]) {
        let mut frames: Vec<&[f32]> = stereo.chunks_exact(CHANNELS).collect();
        if frames.is_empty() {
            return;
        }
        if frames.len() > self.capacity_frames {
            frames.drain(..frames.len() - self.capacity_frames);
        }

        let overflow = (self.available + frames.len()).saturating_sub(self.capacity_frames);
        if overflow > 0 {
            self.read_frame = (self.read_frame + overflow) % self.capacity_frames;
            self.available -= overflow;
        }

        for frame in &frames {
            let at = self.write_frame * CHANNELS;
            self.samples[at..at + CHANNELS].copy_from_slice(frame);
            self.write_frame = (self.write_frame + 1) % self.capacity_frames;
        }
        self.available += frames.len();
    }

    /// Remove `frames` frames, zero-padded past what is buffered.
    pub fn read_frames(&mut self, frames: usize) -> Vec<f32> {
        let mut out = vec![0.0f32; frames * CHANNELS];
        let to_read = frames.min(self.available);
        for i in 0..to_read {
            let at = ((self.read_frame + i) % self.capacity_frames) * CHANNELS;
            out[i * CHANNELS..(i + 1) * CHANNELS].copy_from_slice(&self.samples[at..at + CHANNELS]);
        }
        self.read_frame = (self.read_frame + to_read) % self.capacity_frames;
        self.available -= to_read;
        out
    }

    pub fn available_frames(&self) -> usize {
        self.available
    }

    pub fn is_empty(&self) -> bool {
        self.available == 0
    }

    pub fn clear(&mut self) {
        self.write_frame = 0;
        self.read_frame = 0;
        self.available = 0;
    }

    pub fn capacity_frames(&self) -> usize {
        self.capacity_frames
    }
}
