/// RC Input interface
use mixer::{RxMode, RC_CHANNELS};

/// One decoded receiver frame in the radio's own channel order.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RcFrame {
    /// Signed raw values centred on zero, roughly ±1200 at full stick.
    pub channels: [i16; RC_CHANNELS],
}

impl RcFrame {
    pub fn new(channels: [i16; RC_CHANNELS]) -> Self {
        RcFrame { channels }
    }
}

/// RC Input interface
pub trait RcInput {
    /// Initialize the RC input
    fn init(&mut self) -> bool;

    /// Get the number of channels the receiver delivers
    fn channel_count(&self) -> usize;

    /// Take the newest complete frame, if one arrived since the last call
    fn read_frame(&mut self) -> Option<RcFrame>;

    /// Check if the receiver is currently in failsafe mode
    fn is_in_failsafe(&self) -> bool;

    /// Get the receiver framing in use
    fn rx_mode(&self) -> RxMode;

    /// Snapshot of the receiver health
    fn status(&self) -> RcInputStatus {
        RcInputStatus {
            channel_count: self.channel_count(),
            failsafe_active: self.is_in_failsafe(),
            rx_mode: self.rx_mode(),
        }
    }
}

/// RC Input status information
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RcInputStatus {
    /// The number of available channels
    pub channel_count: usize,

    /// Whether failsafe mode is active
    pub failsafe_active: bool,

    /// The receiver framing in use
    pub rx_mode: RxMode,
}
