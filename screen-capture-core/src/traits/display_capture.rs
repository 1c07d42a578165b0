use crate::models::error::AcquireError;
use crate::models::media::MediaStream;

/// Kind of surface the user is asked to share.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplaySurface {
    Monitor,
    Window,
    Browser,
}

/// Parameters of a screen capture request.
///
/// Width, height and frame rate are ideals; the platform may deliver less.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenRequest {
    pub surface: DisplaySurface,
    pub ideal_width: u32,
    pub ideal_height: u32,
    pub ideal_frame_rate: u32,
    /// Ask for system/tab audio jointly with video. Best effort.
    pub audio: bool,
}

/// Platform display capture capability.
pub trait DisplayCapture: Send {
    /// Whether the host exposes screen capture at all.
    fn is_supported(&self) -> bool;

    /// Ask the user to share a surface.
    ///
    /// Blocks until the platform prompt is answered.
    fn request(&mut self, request: &ScreenRequest) -> Result<MediaStream, AcquireError>;
}
