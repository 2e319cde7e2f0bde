use crate::channel::RcChannel::{Aileron, Elevator, Rudder, Throttle};
use crate::channel::{ChannelMix, Coupling, MixSource, MixTerm, RcChannel, MAX_OUTPUTS};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Factory mix tables for the physical outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Preset {
    Aeroplane,
    FlyingWing,
    CamStab,
}

const OFF: Coupling = Coupling::Off;
const ON: Coupling = Coupling::On;

const fn row(
    source: Option<RcChannel>,
    gyro: [Coupling; 3],
    acc: [Coupling; 2],
    extra: [Option<MixTerm>; 3],
) -> ChannelMix {
    ChannelMix {
        source,
        source_volume: 100,
        roll_gyro: gyro[0],
        pitch_gyro: gyro[1],
        yaw_gyro: gyro[2],
        roll_acc: acc[0],
        pitch_acc: acc[1],
        offset: 0,
        extra,
    }
}

const NO_MIX: [Option<MixTerm>; 3] = [None; 3];
const FLAT: [Coupling; 3] = [OFF, OFF, OFF];
const LEVEL: [Coupling; 2] = [OFF, OFF];

// Rudder -= yaw, aileron -= roll, elevator += pitch.
const AEROPLANE: [ChannelMix; MAX_OUTPUTS] = [
    row(Some(Throttle), FLAT, LEVEL, NO_MIX),
    row(None, FLAT, LEVEL, NO_MIX),
    row(None, FLAT, LEVEL, NO_MIX),
    row(None, FLAT, LEVEL, NO_MIX),
    row(Some(Elevator), [OFF, ON, OFF], [OFF, ON], NO_MIX),
    row(Some(Aileron), [ON, OFF, OFF], [ON, OFF], NO_MIX),
    row(None, [ON, OFF, OFF], [ON, OFF], NO_MIX),
    row(Some(Rudder), [OFF, OFF, ON], LEVEL, NO_MIX),
];

// Outputs 4 and 5 carry stabilised aileron and elevator; the elevons mix them at ±50%.
const FLYING_WING: [ChannelMix; MAX_OUTPUTS] = [
    row(Some(Throttle), FLAT, LEVEL, NO_MIX),
    row(None, FLAT, LEVEL, NO_MIX),
    row(None, FLAT, LEVEL, NO_MIX),
    row(Some(Aileron), [ON, OFF, OFF], [ON, OFF], NO_MIX),
    row(Some(Elevator), [OFF, ON, OFF], [OFF, ON], NO_MIX),
    row(
        None,
        FLAT,
        LEVEL,
        [
            Some(MixTerm::new(MixSource::Output(3), 50)),
            Some(MixTerm::new(MixSource::Output(4), 50)),
            None,
        ],
    ),
    row(
        None,
        FLAT,
        LEVEL,
        [
            Some(MixTerm::new(MixSource::Output(3), -50)),
            Some(MixTerm::new(MixSource::Output(4), 50)),
            None,
        ],
    ),
    row(Some(Rudder), [OFF, OFF, ON], LEVEL, NO_MIX),
];

// Outputs 2-4 stabilise an uncontrolled gimbal; 6-8 follow the sticks.
const CAM_STAB: [ChannelMix; MAX_OUTPUTS] = [
    row(None, FLAT, LEVEL, NO_MIX),
    row(None, [OFF, ON, OFF], [OFF, ON], NO_MIX),
    row(None, [OFF, OFF, ON], LEVEL, NO_MIX),
    row(None, [ON, OFF, OFF], [ON, OFF], NO_MIX),
    row(None, FLAT, LEVEL, NO_MIX),
    row(Some(Elevator), [OFF, ON, OFF], [OFF, ON], NO_MIX),
    row(Some(Rudder), [OFF, OFF, ON], LEVEL, NO_MIX),
    row(Some(Aileron), [ON, OFF, OFF], [ON, OFF], NO_MIX),
];

impl Preset {
    pub fn table(self) -> [ChannelMix; MAX_OUTPUTS] {
        match self {
            Preset::Aeroplane => AEROPLANE,
            Preset::FlyingWing => FLYING_WING,
            Preset::CamStab => CAM_STAB,
        }
    }
}
