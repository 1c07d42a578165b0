use crate::models::artifact::Artifact;
use crate::models::error::CaptureError;
use crate::models::state::SessionState;

/// Event delegate for recording session notifications.
///
/// `on_elapsed` is called from the clock thread, everything else from the
/// thread driving the controller. Implementations should marshal to the UI
/// thread if needed.
///
/// `on_elapsed` must not lock the controller: stopping a recording joins the
/// clock thread while the controller is held, so waiting on it there deadlocks.
pub trait SessionDelegate: Send + Sync {
    fn on_state_changed(&self, state: SessionState);

    /// Called once per clock tick with the elapsed seconds, on the clock thread.
    fn on_elapsed(&self, _elapsed_secs: u64) {}

    /// A fatal error returned the session to idle.
    fn on_error(&self, error: &CaptureError);

    /// A non-fatal problem; the session keeps its trajectory.
    fn on_warning(&self, _warning: &CaptureError) {}

    fn on_artifact_ready(&self, _artifact: &Artifact) {}
}
