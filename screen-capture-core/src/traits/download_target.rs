use crate::models::artifact::{Artifact, ArtifactReference, SavedRecording};
use crate::models::error::CaptureError;

/// Platform downloadable-reference capability.
pub trait DownloadTarget: Send {
    /// Make the artifact addressable for download.
    fn create_reference(&mut self, artifact: &Artifact) -> Result<ArtifactReference, CaptureError>;

    /// Release a reference. Revoking twice is a no-op.
    fn revoke(&mut self, reference: &ArtifactReference);

    /// Hand the referenced artifact to the platform "save as file" affordance.
    fn save(
        &mut self,
        reference: &ArtifactReference,
        file_name: &str,
    ) -> Result<SavedRecording, CaptureError>;
}
