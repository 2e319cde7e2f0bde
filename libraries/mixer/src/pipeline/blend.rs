use super::{ChannelValues, TransitionInput};
use crate::channel::{MixSource, RcChannels, MAX_OUTPUTS};
use crate::config::{Config, MixMode};
use crate::limits::DerivedLimits;
use crate::scale::scale;

/// Outputs blended in transition mode, each with the slot four above it.
const TRANSITION_OUTPUTS: core::ops::Range<usize> = 4..8;
const TRANSITION_STRIDE: usize = 4;

/// Furthest the transition stick may push the blend position either side of centre.
const TRANSITION_TRAVEL: i16 = 8;

/// Mix in the secondary sources, then apply reversal and the per-slot offset.
///
/// Slots are finished in ascending order, so a slot reading a lower one sees its final
/// value and a slot reading a higher one sees the value left by the earlier stages.
pub(super) fn secondary(
    mut values: ChannelValues,
    config: &Config,
    limits: &DerivedLimits,
    rc: &RcChannels,
    active: usize,
) -> ChannelValues {
    for slot in 0..active {
        let mix = &config.channels[slot];
        let mut value = values[slot];

        for (n, term) in mix.extra.iter().enumerate() {
            let Some(term) = term else { continue };
            if term.volume == 0 {
                continue;
            }

            let source = match term.source {
                MixSource::Output(other) => values.get(other).copied().unwrap_or(0),
                MixSource::Rc(channel) => {
                    // The first term restarts from the unscaled primary input.
                    if n == 0 {
                        value = rc.source(mix.source);
                    }
                    rc.get(channel)
                }
            };
            value = value.wrapping_add(scale(source, term.volume as i16));
        }

        if slot < MAX_OUTPUTS && config.outputs[slot].reversed {
            value = value.wrapping_neg();
        }
        values[slot] = value.wrapping_add(limits.channel_offsets[slot]);
    }
    values
}

/// Blend position in percent: 0 keeps the first mixer, 100 selects the second.
pub fn transition_percent(config: &Config, input: &TransitionInput) -> i16 {
    let position = if config.transition_speed == 0 {
        input.value.clamp(-TRANSITION_TRAVEL, TRANSITION_TRAVEL) + TRANSITION_TRAVEL
    } else {
        input.counter
    };
    ((position as i32 * 64) / 10).clamp(0, 100) as i16
}

pub(super) fn transition(
    mut values: ChannelValues,
    config: &Config,
    input: &TransitionInput,
) -> ChannelValues {
    if config.mix_mode != MixMode::Transition {
        return values;
    }

    let blend = transition_percent(config, input);
    for i in TRANSITION_OUTPUTS {
        let first = scale(values[i], 100 - blend);
        let second = scale(values[i + TRANSITION_STRIDE], blend);
        values[i] = first.wrapping_add(second);
    }
    values
}

/// Shift the physical outputs back onto the servo range.
pub(super) fn restore_trim(mut values: ChannelValues, limits: &DerivedLimits) -> ChannelValues {
    for (value, output) in values.iter_mut().zip(limits.outputs.iter()) {
        *value = value.wrapping_add(output.trim);
    }
    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::{ChannelMix, MixTerm, RcChannel, PSEUDO_OUTPUTS};
    use crate::scale::SERVO_CENTER;

    fn transition_config() -> Config {
        let mut config = Config::default();
        config.mix_mode = MixMode::Transition;
        config
    }

    #[test]
    fn test_output_sources_read_finished_lower_slots() {
        let mut config = Config::default();
        config.channels[2] = ChannelMix::empty();
        config.channels[2].offset = 10;
        config.channels[3] = ChannelMix::empty();
        config.channels[3].extra[0] = Some(MixTerm::new(MixSource::Output(2), 100));
        config.channels[3].extra[1] = Some(MixTerm::new(MixSource::Output(9), 50));
        let limits = DerivedLimits::compute(&config);

        let mut values = [0; PSEUDO_OUTPUTS];
        values[9] = 80;
        let values = secondary(values, &config, &limits, &RcChannels::default(), PSEUDO_OUTPUTS);
        assert_eq!(values[2], 120, "slot 3 carries its offset");
        assert_eq!(values[3], 120 + 40, "finished slot 3 plus half of slot 10");
    }

    #[test]
    fn test_first_rc_term_rereads_primary_input() {
        let mut config = Config::default();
        config.channels[0] = ChannelMix::sourced(RcChannel::Aileron);
        config.channels[0].extra[0] = Some(MixTerm::new(MixSource::Rc(RcChannel::Rudder), 50));
        config.channels[1] = ChannelMix::sourced(RcChannel::Aileron);
        config.channels[1].extra[1] = Some(MixTerm::new(MixSource::Rc(RcChannel::Rudder), 50));
        let limits = DerivedLimits::compute(&config);
        let rc = RcChannels::default()
            .with(RcChannel::Aileron, 300)
            .with(RcChannel::Rudder, 100);

        let mut values = [0; PSEUDO_OUTPUTS];
        values[0] = 999;
        values[1] = 999;
        let values = secondary(values, &config, &limits, &rc, PSEUDO_OUTPUTS);
        assert_eq!(values[0], 300 + 50, "first term replaces the running value");
        assert_eq!(values[1], 999 + 50, "later terms keep the running value");
    }

    #[test]
    fn test_zero_volume_terms_are_skipped() {
        let mut config = Config::default();
        config.channels[0].extra[0] = Some(MixTerm::new(MixSource::Rc(RcChannel::Rudder), 0));
        let limits = DerivedLimits::compute(&config);
        let rc = RcChannels::default().with(RcChannel::Throttle, 10);
        let mut values = [0; PSEUDO_OUTPUTS];
        values[0] = 77;
        let values = secondary(values, &config, &limits, &rc, PSEUDO_OUTPUTS);
        assert_eq!(values[0], 77, "a zero-volume term must not re-read the primary input");
    }

    #[test]
    fn test_reversal_for_physical_outputs_only() {
        let mut config = Config::default();
        config.set_reversed(7, true).expect("output exists");
        config.channels[7].offset = 1;
        let limits = DerivedLimits::compute(&config);
        let mut values = [0; PSEUDO_OUTPUTS];
        values[7] = 200;
        values[8] = 200;
        let values = secondary(values, &config, &limits, &RcChannels::default(), PSEUDO_OUTPUTS);
        assert_eq!(values[7], -200 + 12, "negated before the offset is added");
        assert_eq!(values[8], 200, "virtual slots cannot be reversed");
    }

    #[test]
    fn test_transition_percent() {
        let mut config = transition_config();
        let at = |value| TransitionInput { value, counter: 0 };
        assert_eq!(transition_percent(&config, &at(-10)), 0);
        assert_eq!(transition_percent(&config, &at(-8)), 0);
        assert_eq!(transition_percent(&config, &at(0)), 51);
        assert_eq!(transition_percent(&config, &at(7)), 96);
        assert_eq!(transition_percent(&config, &at(10)), 100);

        config.set_transition_speed(5).expect("valid transition speed");
        let counted = TransitionInput { value: -10, counter: 16 };
        assert_eq!(transition_percent(&config, &counted), 100, "counter drives the blend");
        let counted = TransitionInput { value: 10, counter: -3 };
        assert_eq!(transition_percent(&config, &counted), 0);
    }

    #[test]
    fn test_transition_extremes_and_midpoint() {
        let config = transition_config();
        let mut values = [0; PSEUDO_OUTPUTS];
        for i in 4..8 {
            values[i] = 400;
            values[i + 4] = -400;
        }

        let start = transition(values, &config, &TransitionInput { value: -8, counter: 0 });
        assert_eq!(start[4..8], [400; 4], "start keeps the first mixer");

        let end = transition(values, &config, &TransitionInput { value: 8, counter: 0 });
        assert_eq!(end[4..8], [-400; 4], "end selects the second mixer");

        let mid = transition(values, &config, &TransitionInput { value: 0, counter: 0 });
        assert!(mid[5].abs() <= 8, "midpoint {} should be close to the average", mid[5]);
        assert_eq!(mid[0], 0, "outputs below 5 are not blended");
    }

    #[test]
    fn test_transition_only_in_transition_mode() {
        let mut values = [0; PSEUDO_OUTPUTS];
        values[4] = 400;
        let input = TransitionInput { value: 8, counter: 0 };
        assert_eq!(transition(values, &Config::default(), &input), values);
    }

    #[test]
    fn test_restore_trim_physical_only() {
        let mut config = Config::default();
        config.set_trim(2, 10).expect("valid trim");
        let limits = DerivedLimits::compute(&config);
        let values = restore_trim([0; PSEUDO_OUTPUTS], &limits);
        assert_eq!(values[2], SERVO_CENTER + 120);
        assert_eq!(values[0], SERVO_CENTER);
        assert_eq!(values[8], 0, "virtual slots carry no trim");
    }
}
