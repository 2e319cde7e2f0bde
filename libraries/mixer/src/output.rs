use crate::channel::MAX_OUTPUTS;
use crate::limits::{DerivedLimits, Limits};
use crate::pipeline::ChannelValues;

/// Final actuator positions, one per physical output.
pub type ServoCommands = [i16; MAX_OUTPUTS];

/// Clamp one output to its travel limits.
///
/// The maximum is checked first, so inverted limits resolve to the maximum instead of
/// panicking like [`i16::clamp`] would.
#[inline]
pub fn clamp_output(value: i16, limits: &Limits) -> i16 {
    if value > limits.maximum {
        limits.maximum
    } else if value < limits.minimum {
        limits.minimum
    } else {
        value
    }
}

/// Clamp the physical outputs of a finished cycle into actuator commands.
pub fn update_servos(values: &ChannelValues, limits: &DerivedLimits) -> ServoCommands {
    let mut commands = [0; MAX_OUTPUTS];
    for ((command, value), limit) in commands.iter_mut().zip(values.iter()).zip(limits.outputs.iter()) {
        *command = clamp_output(*value, limit);
    }
    commands
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::scale::SERVO_CENTER;

    fn travel(minimum: i16, maximum: i16) -> Limits {
        Limits {
            minimum,
            maximum,
            ..Default::default()
        }
    }

    #[test]
    fn test_clamp_within_travel() {
        let limits = travel(2550, 4950);
        assert_eq!(clamp_output(3750, &limits), 3750);
        assert_eq!(clamp_output(5000, &limits), 4950);
        assert_eq!(clamp_output(i16::MIN, &limits), 2550);
    }

    #[test]
    fn test_clamp_is_idempotent_and_monotonic() {
        let limits = travel(3000, 4000);
        let mut previous = i16::MIN;
        for value in (i16::MIN..=i16::MAX).step_by(97) {
            let once = clamp_output(value, &limits);
            assert_eq!(clamp_output(once, &limits), once, "clamping twice changes {value}");
            assert!(once >= previous, "clamp must not decrease at {value}");
            previous = once;
        }
    }

    #[test]
    fn test_inverted_limits_pick_maximum() {
        let limits = travel(4000, 3000);
        assert_eq!(clamp_output(3500, &limits), 3000);
    }

    #[test]
    fn test_update_servos_drops_virtual_slots() {
        let config = Config::default();
        let limits = DerivedLimits::compute(&config);
        let mut values = [SERVO_CENTER; 12];
        values[1] = 9000;
        values[2] = -9000;
        let commands = update_servos(&values, &limits);
        assert_eq!(commands.len(), MAX_OUTPUTS);
        assert_eq!(commands[0], SERVO_CENTER);
        assert_eq!(commands[1], SERVO_CENTER + 1200, "clamped to +100% travel");
        assert_eq!(commands[2], SERVO_CENTER - 1200, "clamped to -100% travel");
    }
}
