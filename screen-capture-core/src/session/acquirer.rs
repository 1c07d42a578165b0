//! Screen and microphone acquisition.
//!
//! Screen failure is fatal to a start; microphone failure is a warning.

use crate::models::error::{AcquireError, CaptureError};
use crate::models::media::MediaStream;
use crate::models::quality::{FrameRate, QualityPreset};
use crate::traits::display_capture::{DisplayCapture, DisplaySurface, ScreenRequest};
use crate::traits::microphone_capture::{MicrophoneCapture, MicrophoneRequest};

pub fn screen_request(
    quality: QualityPreset,
    frame_rate: FrameRate,
    want_system_audio: bool,
) -> ScreenRequest {
    let profile = quality.profile();
    ScreenRequest {
        surface: DisplaySurface::Monitor,
        ideal_width: profile.width,
        ideal_height: profile.height,
        ideal_frame_rate: frame_rate.fps(),
        audio: want_system_audio,
    }
}

/// Request the screen stream. On error nothing stays acquired.
pub fn acquire_screen(
    display: &mut dyn DisplayCapture,
    quality: QualityPreset,
    frame_rate: FrameRate,
    want_system_audio: bool,
) -> Result<MediaStream, CaptureError> {
    log::info!("Requesting screen access...");
    let request = screen_request(quality, frame_rate, want_system_audio);
    let stream = display.request(&request).map_err(|e| {
        log::error!("Failed to obtain screen stream: {}", e);
        map_screen_error(e)
    })?;

    if stream.video_tracks().next().is_none() {
        stream.stop_all();
        return Err(CaptureError::AcquisitionFailed("screen stream carried no video track".into()));
    }

    log::info!("Screen stream obtained: {}", stream.describe());
    Ok(stream)
}

/// Request the microphone when enabled.
///
/// `Err(MicrophoneUnavailable)` is non-fatal: the caller records it and
/// carries on without the microphone.
pub fn acquire_microphone(
    microphone: &mut dyn MicrophoneCapture,
    enabled: bool,
) -> Result<Option<MediaStream>, CaptureError> {
    if !enabled {
        return Ok(None);
    }

    match microphone.request(&MicrophoneRequest::default()) {
        Ok(stream) if stream.has_audio() => {
            log::info!("Microphone stream obtained");
            Ok(Some(stream))
        }
        Ok(stream) => {
            log::warn!("Microphone stream carried no audio track");
            stream.stop_all();
            Err(CaptureError::MicrophoneUnavailable)
        }
        Err(e) => {
            log::warn!("Failed to access microphone: {}", e);
            Err(CaptureError::MicrophoneUnavailable)
        }
    }
}

fn map_screen_error(error: AcquireError) -> CaptureError {
    match error {
        AcquireError::Denied => CaptureError::PermissionDenied,
        AcquireError::Blocked | AcquireError::Unsupported => CaptureError::EnvironmentUnsupported,
        AcquireError::Failed(detail) => CaptureError::AcquisitionFailed(detail),
    }
}
