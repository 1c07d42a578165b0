use serde::Serialize;

use super::artifact::ArtifactSummary;
use super::config::RecorderConfiguration;

/// Recording session state machine.
///
/// State transitions:
/// ```text
/// idle → acquiring → recording → processing → ready
///   ↑        │                        │          │
///   └────────┴──── failure ───────────┘          │
///   └──────────────── new recording ─────────────┘
/// ```
/// Errors are an overlay carried next to the state, not a state of their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    #[default]
    Idle,
    Acquiring,
    Recording,
    Processing,
    Ready,
}

impl SessionState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Acquiring => "acquiring",
            Self::Recording => "recording",
            Self::Processing => "processing",
            Self::Ready => "ready",
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_recording(&self) -> bool {
        matches!(self, Self::Recording)
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }

    /// Whether a start, stop or assembly is in flight.
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Acquiring | Self::Recording | Self::Processing)
    }

    /// Quality, frame rate and audio toggles are editable only while idle.
    pub fn allows_configuration(&self) -> bool {
        self.is_idle()
    }

    /// The output name stays editable once the artifact is ready.
    pub fn allows_rename(&self) -> bool {
        matches!(self, Self::Idle | Self::Ready)
    }
}

/// Read-only projection of a session for the presentation layer.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub state: SessionState,
    pub elapsed_secs: u64,
    /// `MM:SS`
    pub elapsed_label: String,
    pub degraded: bool,
    pub error: Option<String>,
    pub warning: Option<String>,
    pub config: RecorderConfiguration,
    pub output_name: String,
    pub chunk_count: usize,
    pub bytes_recorded: u64,
    pub artifact: Option<ArtifactSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rename_allowed_in_idle_and_ready() {
        assert!(SessionState::Idle.allows_rename());
        assert!(SessionState::Ready.allows_rename());
        assert!(!SessionState::Recording.allows_rename());
        assert!(!SessionState::Ready.allows_configuration());
    }

    #[test]
    fn busy_states() {
        assert!(SessionState::Acquiring.is_busy());
        assert!(SessionState::Processing.is_busy());
        assert!(!SessionState::Ready.is_busy());
        assert!(!SessionState::Idle.is_busy());
    }
}
