use super::{ChannelValues, MixerInputs, MixerState};
use crate::channel::{
    Axis, AxisTerms, RcChannel, RcChannels, ACC_POLARITY, ACC_TRIM_POLARITY, GYRO_POLARITY,
};
use crate::config::{Config, FailsafeType};
use crate::scale::scale;

/// Upper bound of the height-damping throttle correction.
pub const MAX_ZGAIN: i16 = 500;

const GYRO_AXES: [Axis; 3] = [Axis::Roll, Axis::Pitch, Axis::Yaw];
const ACC_AXES: [Axis; 2] = [Axis::Roll, Axis::Pitch];

pub(super) fn primary(
    mut values: ChannelValues,
    config: &Config,
    rc: &RcChannels,
    active: usize,
) -> ChannelValues {
    for (value, mix) in values.iter_mut().zip(config.channels.iter()).take(active) {
        *value = scale(rc.source(mix.source), mix.source_volume as i16);
    }
    values
}

/// Push throttle against vertical acceleration changes.
pub(super) fn height_damping(
    mut values: ChannelValues,
    config: &Config,
    active: usize,
    acc: &AxisTerms,
    state: &mut MixerState,
) -> ChannelValues {
    if config.dampen == 0 {
        return values;
    }

    let vertical = acc.get(Axis::Yaw);
    let change = state.old_z.wrapping_sub(vertical);
    let damping = ((change as i32 * config.dampen as i32) as i16).min(MAX_ZGAIN);

    for (value, mix) in values.iter_mut().zip(config.channels.iter()).take(active) {
        if mix.is_sourced_by(RcChannel::Throttle) {
            *value = value.wrapping_add(damping);
        }
    }

    state.old_z = vertical;
    values
}

pub(super) fn gyro(
    mut values: ChannelValues,
    config: &Config,
    active: usize,
    inputs: &MixerInputs,
) -> ChannelValues {
    if !inputs.flags.stability {
        return values;
    }

    for (value, mix) in values.iter_mut().zip(config.channels.iter()).take(active) {
        for axis in GYRO_AXES {
            if let Some(polarity) = mix.gyro(axis).polarity(GYRO_POLARITY[axis as usize]) {
                *value = polarity.apply(*value, inputs.gyro.get(axis));
            }
        }
    }
    values
}

/// Auto-level trims in raw units (roll, pitch).
fn level_trims(config: &Config, inputs: &MixerInputs) -> [i16; 2] {
    let mut trims = [0i16; 2];

    if config.failsafe_type == FailsafeType::Advanced && inputs.flags.failsafe && !config.cam_stab {
        trims[0] = (config.failsafe.aileron as i16) << 2;
        trims[1] = (config.failsafe.elevator as i16) << 2;
    }

    let mode = config.flight_mode();
    trims[0] = trims[0].wrapping_add((mode.acc_roll_zero_trim as i16) << 2);
    trims[1] = trims[1].wrapping_add((mode.acc_pitch_zero_trim as i16) << 2);
    trims
}

pub(super) fn accelerometer(
    mut values: ChannelValues,
    config: &Config,
    active: usize,
    inputs: &MixerInputs,
) -> ChannelValues {
    if !inputs.flags.auto_level {
        return values;
    }

    let trims = level_trims(config, inputs);

    for (value, mix) in values.iter_mut().zip(config.channels.iter()).take(active) {
        for (i, axis) in ACC_AXES.into_iter().enumerate() {
            let coupling = mix.acc(axis);
            if let Some(polarity) = coupling.polarity(ACC_TRIM_POLARITY[i]) {
                *value = polarity.apply(*value, trims[i]);
            }
            if let Some(polarity) = coupling.polarity(ACC_POLARITY[i]) {
                *value = polarity.apply(*value, inputs.acc.get(axis));
            }
        }
    }
    values
}
