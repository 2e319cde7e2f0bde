use hal::RcFrame;
use mixer::{RcChannel, RcChannels, RC_CHANNELS};
use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelOrderError {
    #[error("{0:?} is assigned to more than one receiver channel")]
    Duplicate(RcChannel),
}

/// Logical channel carried by each receiver channel, in receiver order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelOrder([RcChannel; RC_CHANNELS]);

impl ChannelOrder {
    /// Throttle, aileron, elevator, rudder (JR/Spektrum style).
    pub const TAER: ChannelOrder = ChannelOrder(RcChannel::ALL);

    /// Aileron, elevator, throttle, rudder (Futaba style).
    pub const AETR: ChannelOrder = ChannelOrder([
        RcChannel::Aileron,
        RcChannel::Elevator,
        RcChannel::Throttle,
        RcChannel::Rudder,
        RcChannel::Gear,
        RcChannel::Aux1,
        RcChannel::Aux2,
        RcChannel::Aux3,
    ]);

    pub fn new(order: [RcChannel; RC_CHANNELS]) -> Result<Self, ChannelOrderError> {
        for (i, channel) in order.iter().enumerate() {
            if order[..i].contains(channel) {
                return Err(ChannelOrderError::Duplicate(*channel));
            }
        }
        Ok(ChannelOrder(order))
    }
}

impl Default for ChannelOrder {
    fn default() -> Self {
        ChannelOrder::TAER
    }
}

#[derive(Default, Debug)]
pub struct RcMapper {
    order: ChannelOrder,
}

impl RcMapper {
    pub fn new(order: ChannelOrder) -> Self {
        RcMapper { order }
    }

    pub fn order(&self) -> ChannelOrder {
        self.order
    }

    pub fn map(&self, frame: &RcFrame) -> RcChannels {
        let mut rc = RcChannels::default();
        for (channel, value) in self.order.0.iter().zip(frame.channels.iter()) {
            rc.set(*channel, *value);
        }
        rc
    }
}
