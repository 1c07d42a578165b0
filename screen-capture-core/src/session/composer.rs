use crate::models::error::CaptureError;
use crate::models::media::{CompositeStream, MediaStream};
use crate::session::mixer::MixedAudio;

/// Assemble the stream handed to the encoder.
///
/// Takes the first video track of the screen stream and the mixed track, if
/// any. Raw source audio never reaches the encoder directly.
pub fn compose(
    screen: &MediaStream,
    mixed: Option<&MixedAudio>,
) -> Result<CompositeStream, CaptureError> {
    let video = screen
        .video_tracks()
        .next()
        .cloned()
        .ok_or_else(|| {
            CaptureError::AcquisitionFailed("screen stream carried no video track".into())
        })?;

    let composite = CompositeStream::new(video, mixed.map(|m| m.track().clone()));
    log::info!(
        "Composite stream created with {} video and {} audio track(s)",
        composite.video_track_count(),
        composite.audio_track_count()
    );
    Ok(composite)
}
