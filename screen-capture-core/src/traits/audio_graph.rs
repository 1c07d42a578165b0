use crate::models::error::CaptureError;
use crate::models::media::MediaTrack;

/// A signal-routing graph that merges source tracks into one output track.
pub trait AudioGraph: Send {
    /// Route a source track into the merge destination.
    fn connect(&mut self, source: &MediaTrack) -> Result<(), CaptureError>;

    /// The merged output track. Stable for the lifetime of the graph.
    fn output(&self) -> MediaTrack;

    /// Disconnect every source and release the graph.
    fn close(&mut self);
}

/// Creates a fresh graph for each session.
pub trait AudioGraphFactory: Send {
    fn create(&mut self) -> Result<Box<dyn AudioGraph>, CaptureError>;
}
