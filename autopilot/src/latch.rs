use core::cell::Cell;

use critical_section::Mutex;
use mixer::{RcChannels, RC_CHANNELS};

/// Receiver state as seen at the start of a cycle.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RcSnapshot {
    pub rc: RcChannels,
    /// Receiver reports loss of signal.
    pub failsafe: bool,
    /// Frames published so far; wraps.
    pub frames: u32,
}

/// Hand-off between the receiver interrupt and the mixer cycle.
///
/// The producer always publishes a whole frame and the cycle copies the whole frame
/// out, each inside one critical section, so a cycle never sees half of two frames.
pub struct InputLatch {
    inner: Mutex<Cell<RcSnapshot>>,
}

impl InputLatch {
    pub const fn new() -> Self {
        InputLatch {
            inner: Mutex::new(Cell::new(RcSnapshot {
                rc: RcChannels([0; RC_CHANNELS]),
                failsafe: false,
                frames: 0,
            })),
        }
    }

    pub fn publish(&self, rc: RcChannels, failsafe: bool) {
        critical_section::with(|cs| {
            let cell = self.inner.borrow(cs);
            let frames = cell.get().frames.wrapping_add(1);
            cell.set(RcSnapshot { rc, failsafe, frames });
        });
    }

    pub fn snapshot(&self) -> RcSnapshot {
        critical_section::with(|cs| self.inner.borrow(cs).get())
    }
}

impl Default for InputLatch {
    fn default() -> Self {
        Self::new()
    }
}
