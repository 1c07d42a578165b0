use serde::{Deserialize, Serialize};

/// Target resolution and video bitrate for a recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QualityProfile {
    pub name: &'static str,
    pub width: u32,
    pub height: u32,
    /// Video bits per second.
    pub bitrate: u32,
}

/// The fixed set of selectable quality levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityPreset {
    Low,
    Medium,
    #[default]
    High,
    Ultra,
}

impl QualityPreset {
    pub const ALL: [QualityPreset; 4] = [Self::Low, Self::Medium, Self::High, Self::Ultra];

    pub fn profile(self) -> QualityProfile {
        match self {
            Self::Low => QualityProfile {
                name: "low",
                width: 854,
                height: 480,
                bitrate: 1_000_000,
            },
            Self::Medium => QualityProfile {
                name: "medium",
                width: 1280,
                height: 720,
                bitrate: 2_500_000,
            },
            Self::High => QualityProfile {
                name: "high",
                width: 1920,
                height: 1080,
                bitrate: 5_000_000,
            },
            Self::Ultra => QualityProfile {
                name: "ultra",
                width: 3840,
                height: 2160,
                bitrate: 12_000_000,
            },
        }
    }

    /// Localized menu label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "Baja (480p)",
            Self::Medium => "Media (720p)",
            Self::High => "Alta (1080p)",
            Self::Ultra => "Ultra (4K)",
        }
    }
}

/// Capture frame rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FrameRate {
    #[default]
    #[serde(rename = "30")]
    Fps30,
    #[serde(rename = "60")]
    Fps60,
}

impl FrameRate {
    pub const ALL: [FrameRate; 2] = [Self::Fps30, Self::Fps60];

    pub fn fps(self) -> u32 {
        match self {
            Self::Fps30 => 30,
            Self::Fps60 => 60,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Fps30 => "30 FPS",
            Self::Fps60 => "60 FPS",
        }
    }
}
