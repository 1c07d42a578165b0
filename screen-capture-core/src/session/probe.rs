use crate::traits::display_capture::DisplayCapture;

/// Result of the one-time startup check for screen capture support.
///
/// Once degraded, always degraded: there is no re-probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapabilityProbe {
    degraded: bool,
}

impl CapabilityProbe {
    pub fn run(display: &dyn DisplayCapture) -> Self {
        let supported = display.is_supported();
        if supported {
            log::info!("Screen capture supported");
        } else {
            log::warn!("Screen capture not supported, recording disabled");
        }
        Self {
            degraded: !supported,
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    /// Latch degraded mode after the platform reports capture is forbidden.
    pub(crate) fn mark_degraded(&mut self) {
        self.degraded = true;
    }
}
