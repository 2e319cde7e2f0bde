use super::{ChannelValues, FlightFlags};
use crate::channel::{RcChannel, MAX_OUTPUTS};
use crate::config::{Config, FailsafeType, RxMode};
use crate::limits::DerivedLimits;
use crate::scale::percent_to_position;

pub(super) fn override_outputs(
    mut values: ChannelValues,
    config: &Config,
    limits: &DerivedLimits,
    flags: &FlightFlags,
) -> ChannelValues {
    if !flags.failsafe || config.cam_stab {
        return values;
    }

    match config.failsafe_type {
        FailsafeType::Simple => {
            for (value, output) in values.iter_mut().zip(limits.outputs.iter()) {
                *value = output.failsafe;
            }
        }
        FailsafeType::Advanced => {
            let throttle = percent_to_position(config.failsafe.throttle);
            let rudder = (config.failsafe.rudder as i16) << 4;

            for (value, mix) in values.iter_mut().zip(config.channels.iter()).take(MAX_OUTPUTS) {
                // Only a CPPM receiver is known to hold the throttle channel on signal loss.
                if mix.is_sourced_by(RcChannel::Throttle) && config.rx_mode == RxMode::Cppm {
                    *value = throttle;
                }
                if mix.is_sourced_by(RcChannel::Rudder) {
                    *value = value.wrapping_add(rudder);
                }
            }
        }
    }
    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::PSEUDO_OUTPUTS;
    use crate::scale::SERVO_CENTER;

    fn failing() -> FlightFlags {
        FlightFlags {
            failsafe: true,
            ..Default::default()
        }
    }

    fn advanced() -> Config {
        let mut config = Config::default();
        config.failsafe_type = FailsafeType::Advanced;
        config.failsafe.throttle = -50;
        config.failsafe.rudder = 3;
        config
    }

    #[test]
    fn test_simple_failsafe_leaves_virtual_slots() {
        let mut config = Config::default();
        config.set_failsafe_position(3, 20).expect("valid failsafe");
        let limits = DerivedLimits::compute(&config);
        let values = override_outputs([123; PSEUDO_OUTPUTS], &config, &limits, &failing());
        assert_eq!(values[3], SERVO_CENTER + 240);
        assert_eq!(values[0], SERVO_CENTER);
        assert_eq!(values[9], 123, "only physical outputs are replaced");
    }

    #[test]
    fn test_advanced_failsafe_cppm() {
        let config = advanced();
        let limits = DerivedLimits::compute(&config);
        let values = override_outputs([1000; PSEUDO_OUTPUTS], &config, &limits, &failing());
        assert_eq!(values[0], SERVO_CENTER - 600, "throttle held at -50%");
        assert_eq!(values[7], 1000 + 48, "rudder nudged by 3 << 4");
        assert_eq!(values[5], 1000, "aileron keeps mixing");
    }

    #[test]
    fn test_advanced_failsafe_other_receivers_keep_throttle() {
        let mut config = advanced();
        config.rx_mode = RxMode::Pwm1;
        let limits = DerivedLimits::compute(&config);
        let values = override_outputs([1000; PSEUDO_OUTPUTS], &config, &limits, &failing());
        assert_eq!(values[0], 1000);
        assert_eq!(values[7], 1048);
    }

    #[test]
    fn test_no_override_without_failsafe() {
        let config = advanced();
        let limits = DerivedLimits::compute(&config);
        let values = [1000; PSEUDO_OUTPUTS];
        assert_eq!(override_outputs(values, &config, &limits, &FlightFlags::default()), values);
    }
}
