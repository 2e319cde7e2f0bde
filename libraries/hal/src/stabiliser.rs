/// Stabiliser interface
use mixer::{AxisTerms, FlightFlags, RcChannels};

/// Correction terms fed into one mixer cycle.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Corrections {
    /// Rate-loop output per axis
    pub gyro: AxisTerms,

    /// Auto-level output for roll and pitch; the yaw slot carries the vertical axis
    pub acc: AxisTerms,
}

/// Producer of the gyro and accelerometer correction terms.
///
/// The control loops behind it are not part of the mixer; it only needs the terms
/// and the mode flags that gate them.
pub trait Stabiliser {
    /// Run the control loops against the current stick positions
    fn corrections(&mut self, rc: &RcChannels) -> Corrections;

    /// Stability, auto-level and failsafe flags for this cycle
    fn flags(&self) -> FlightFlags;
}
