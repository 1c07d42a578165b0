use crate::models::error::AcquireError;
use crate::models::media::MediaStream;

/// Processing options requested for the microphone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MicrophoneRequest {
    pub echo_cancellation: bool,
    pub noise_suppression: bool,
    pub auto_gain_control: bool,
}

impl Default for MicrophoneRequest {
    fn default() -> Self {
        Self {
            echo_cancellation: true,
            noise_suppression: true,
            auto_gain_control: true,
        }
    }
}

/// Platform microphone capture capability.
pub trait MicrophoneCapture: Send {
    fn request(&mut self, request: &MicrophoneRequest) -> Result<MediaStream, AcquireError>;
}
