use super::MixerState;
use crate::channel::{RcChannel, RcChannels};
use crate::config::{Config, MixMode};

/// Flaperon inputs at or beyond this magnitude are treated as unmeasurable.
const MEASURABLE_LIMIT: i16 = 1200;

fn measurable(value: i16) -> bool {
    value > -MEASURABLE_LIMIT && value < MEASURABLE_LIMIT
}

/// Recover the flap signal from a transmitter-side flaperon mix.
///
/// The flap is half the difference between the aileron and flap-channel inputs. While
/// either input is out of range the previous flap value is held and the lock is set.
pub(super) fn unmix_flaps(config: &Config, rc: &RcChannels, state: &mut MixerState) {
    let Some(flap_chan) = config.flap_chan else {
        state.flap = 0;
        state.flap_locked = false;
        return;
    };

    let aileron = rc.get(RcChannel::Aileron);
    let flap_input = rc.get(flap_chan);
    let locked = !(measurable(aileron) && measurable(flap_input));

    if !locked {
        state.flap = aileron.wrapping_sub(flap_input) >> 1;
    }

    if locked != state.flap_locked {
        if locked {
            log::warn!(
                target: "mixer::pipeline",
                "flaperon inputs out of range (aileron {}, flap {}), holding flap at {}",
                aileron,
                flap_input,
                state.flap
            );
        } else {
            log::warn!(target: "mixer::pipeline", "flaperon inputs back in range");
        }
    }
    state.flap_locked = locked;
}

/// Strip the flap signal from both flaperon inputs, leaving pure roll on each.
pub(super) fn unmix_ailerons(config: &Config, mut rc: RcChannels) -> RcChannels {
    if config.mix_mode != MixMode::Aeroplane {
        return rc;
    }
    if let Some(flap_chan) = config.flap_chan {
        let roll = rc.get(RcChannel::Aileron).wrapping_add(rc.get(flap_chan)) >> 1;
        rc.set(RcChannel::Aileron, roll);
        rc.set(flap_chan, roll);
    }
    rc
}
