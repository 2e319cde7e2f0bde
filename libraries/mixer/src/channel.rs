//! Channel identities, axis couplings and the per-slot mix row.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of physical servo/ESC outputs.
pub const MAX_OUTPUTS: usize = 8;

/// Physical outputs plus the virtual intermediate slots.
pub const PSEUDO_OUTPUTS: usize = 12;

/// Slots processed while camera stabilisation is enabled.
pub const MIN_OUTPUTS: usize = 4;

/// Number of logical receiver inputs.
pub const RC_CHANNELS: usize = 8;

/// Logical receiver input, independent of the radio's channel order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum RcChannel {
    Throttle = 0,
    Aileron = 1,
    Elevator = 2,
    Rudder = 3,
    Gear = 4,
    Aux1 = 5,
    Aux2 = 6,
    Aux3 = 7,
}

impl RcChannel {
    pub const ALL: [RcChannel; RC_CHANNELS] = [
        RcChannel::Throttle,
        RcChannel::Aileron,
        RcChannel::Elevator,
        RcChannel::Rudder,
        RcChannel::Gear,
        RcChannel::Aux1,
        RcChannel::Aux2,
        RcChannel::Aux3,
    ];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Raw receiver values indexed by [`RcChannel`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RcChannels(pub [i16; RC_CHANNELS]);

impl RcChannels {
    pub fn get(&self, channel: RcChannel) -> i16 {
        self.0[channel.index()]
    }

    /// Unassigned sources read as zero.
    pub fn source(&self, channel: Option<RcChannel>) -> i16 {
        channel.map_or(0, |c| self.get(c))
    }

    pub fn set(&mut self, channel: RcChannel, value: i16) {
        self.0[channel.index()] = value;
    }

    pub fn with(mut self, channel: RcChannel, value: i16) -> Self {
        self.set(channel, value);
        self
    }
}

/// Where a secondary mix term reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MixSource {
    /// Value of another output slot, as it stands when this slot is finished.
    Output(usize),
    /// Raw receiver input.
    Rc(RcChannel),
}

impl MixSource {
    /// Decode the flat menu index: outputs first, then receiver inputs.
    pub fn from_index(index: u8) -> Option<Self> {
        let index = index as usize;
        if index < PSEUDO_OUTPUTS {
            Some(MixSource::Output(index))
        } else {
            RcChannel::from_index(index - PSEUDO_OUTPUTS).map(MixSource::Rc)
        }
    }

    pub fn index(self) -> u8 {
        match self {
            MixSource::Output(slot) => slot as u8,
            MixSource::Rc(channel) => (PSEUDO_OUTPUTS + channel.index()) as u8,
        }
    }
}

/// Stabilisation axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Roll = 0,
    Pitch = 1,
    Yaw = 2,
}

/// Per-axis correction terms. For the accelerometer vector the yaw slot carries the
/// vertical axis.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AxisTerms(pub [i16; 3]);

impl AxisTerms {
    pub fn new(roll: i16, pitch: i16, yaw: i16) -> Self {
        AxisTerms([roll, pitch, yaw])
    }

    pub fn get(&self, axis: Axis) -> i16 {
        self.0[axis as usize]
    }
}

/// Tri-state coupling of a correction term into a channel.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Coupling {
    #[default]
    Off,
    On,
    Reversed,
}

/// Direction a term is applied to the running channel value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    Add,
    Subtract,
}

impl Polarity {
    /// 16-bit wrapping, like the rest of the channel arithmetic.
    #[inline]
    pub fn apply(self, value: i16, term: i16) -> i16 {
        match self {
            Polarity::Add => value.wrapping_add(term),
            Polarity::Subtract => value.wrapping_sub(term),
        }
    }

    pub fn flip(self) -> Self {
        match self {
            Polarity::Add => Polarity::Subtract,
            Polarity::Subtract => Polarity::Add,
        }
    }
}

/// Gyro term polarity with the coupling set to `On`, indexed by [`Axis`].
pub const GYRO_POLARITY: [Polarity; 3] = [Polarity::Subtract, Polarity::Add, Polarity::Subtract];

/// Accelerometer term polarity with the coupling set to `On` (roll, pitch).
pub const ACC_POLARITY: [Polarity; 2] = [Polarity::Subtract, Polarity::Add];

/// Auto-level trim polarity with the coupling set to `On` (roll, pitch).
pub const ACC_TRIM_POLARITY: [Polarity; 2] = [Polarity::Add, Polarity::Add];

impl Coupling {
    /// Resolve an axis' `On` polarity against this coupling.
    pub fn polarity(self, on: Polarity) -> Option<Polarity> {
        match self {
            Coupling::Off => None,
            Coupling::On => Some(on),
            Coupling::Reversed => Some(on.flip()),
        }
    }
}

/// Secondary mix term: source plus volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MixTerm {
    pub source: MixSource,
    pub volume: i8,
}

impl MixTerm {
    pub const fn new(source: MixSource, volume: i8) -> Self {
        MixTerm { source, volume }
    }
}

/// Mix configuration of one output slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ChannelMix {
    pub source: Option<RcChannel>,
    pub source_volume: i8,
    pub roll_gyro: Coupling,
    pub pitch_gyro: Coupling,
    pub yaw_gyro: Coupling,
    pub roll_acc: Coupling,
    pub pitch_acc: Coupling,
    /// Fixed offset in percent.
    pub offset: i8,
    pub extra: [Option<MixTerm>; 3],
}

impl Default for ChannelMix {
    fn default() -> Self {
        ChannelMix {
            source: None,
            source_volume: 100,
            roll_gyro: Coupling::Off,
            pitch_gyro: Coupling::Off,
            yaw_gyro: Coupling::Off,
            roll_acc: Coupling::Off,
            pitch_acc: Coupling::Off,
            offset: 0,
            extra: [None; 3],
        }
    }
}

impl ChannelMix {
    /// Cleared slot: no source and zero volume.
    pub const fn empty() -> Self {
        ChannelMix {
            source: None,
            source_volume: 0,
            roll_gyro: Coupling::Off,
            pitch_gyro: Coupling::Off,
            yaw_gyro: Coupling::Off,
            roll_acc: Coupling::Off,
            pitch_acc: Coupling::Off,
            offset: 0,
            extra: [None; 3],
        }
    }

    pub fn sourced(source: RcChannel) -> Self {
        ChannelMix {
            source: Some(source),
            ..Default::default()
        }
    }

    pub fn gyro(&self, axis: Axis) -> Coupling {
        match axis {
            Axis::Roll => self.roll_gyro,
            Axis::Pitch => self.pitch_gyro,
            Axis::Yaw => self.yaw_gyro,
        }
    }

    /// Yaw has no accelerometer coupling.
    pub fn acc(&self, axis: Axis) -> Coupling {
        match axis {
            Axis::Roll => self.roll_acc,
            Axis::Pitch => self.pitch_acc,
            Axis::Yaw => Coupling::Off,
        }
    }

    pub fn is_sourced_by(&self, channel: RcChannel) -> bool {
        self.source == Some(channel)
    }
}
