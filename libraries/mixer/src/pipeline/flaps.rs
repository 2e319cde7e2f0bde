use super::{ChannelValues, MixerState};
use crate::channel::RcChannel;
use crate::config::{Config, MixMode};
use crate::scale::scale;

/// Coarse flap slew step in raw units.
pub const FLAP_STEP: i16 = 5;

/// Reduce the up-going throw of paired ailerons.
///
/// The first aileron-like slot seen is the left surface and only its positive side is
/// reduced. Every one after it is treated as the right surface and only its negative side
/// is reduced.
pub(super) fn differential(mut values: ChannelValues, config: &Config, active: usize) -> ChannelValues {
    let Some(flap_chan) = config.flap_chan else {
        return values;
    };
    if config.differential == 0 {
        return values;
    }

    let factor = 100 - config.differential as i16;
    let mut left_found = false;

    for (value, mix) in values.iter_mut().zip(config.channels.iter()).take(active) {
        if !(mix.is_sourced_by(RcChannel::Aileron) || mix.is_sourced_by(flap_chan)) {
            continue;
        }
        if left_found {
            if *value < 0 {
                *value = scale(*value, factor);
            }
        } else {
            if *value > 0 {
                *value = scale(*value, factor);
            }
            left_found = true;
        }
    }
    values
}

fn slew_speed(gap: i32) -> i16 {
    if gap.abs() >= FLAP_STEP as i32 {
        FLAP_STEP
    } else {
        1
    }
}

/// Put the un-mixed flap back onto the flaperons, slew limited by the flap speed.
pub(super) fn remix(
    mut values: ChannelValues,
    config: &Config,
    active: usize,
    state: &mut MixerState,
) -> ChannelValues {
    if config.mix_mode != MixMode::Aeroplane {
        return values;
    }
    let Some(flap_chan) = config.flap_chan else {
        return values;
    };

    if config.flap_speed > 0 {
        if state.flap_skip == config.flap_speed {
            let speed = slew_speed(state.slow_flaps as i32 - state.flap as i32);
            if state.slow_flaps < state.flap {
                state.slow_flaps = state.slow_flaps.wrapping_add(speed);
            } else if state.slow_flaps > state.flap {
                state.slow_flaps = state.slow_flaps.wrapping_sub(speed);
            }
        }
    } else {
        state.slow_flaps = state.flap;
    }

    state.flap_skip = state.flap_skip.wrapping_add(1);
    if state.flap_skip > config.flap_speed {
        state.flap_skip = 0;
    }

    for (value, mix) in values.iter_mut().zip(config.channels.iter()).take(active) {
        if mix.is_sourced_by(RcChannel::Aileron) {
            *value = value.wrapping_add(state.slow_flaps);
        }
        if mix.is_sourced_by(flap_chan) {
            *value = value.wrapping_sub(state.slow_flaps);
        }
    }
    values
}
