// Raw-unit operating parameters derived from the percentage configuration.
use crate::channel::{MAX_OUTPUTS, PSEUDO_OUTPUTS};
use crate::config::{Config, FLIGHT_MODES};
use crate::scale::{percent_to_offset, percent_to_position, UNITS_PER_PERCENT};

/// A value of 80,000 is ±1250, full throw at the output, at 125%.
const I_LIMIT_MULTIPLIER: i32 = 640;

/// Divisor used when dynamic gain is disabled.
const DYN_GAIN_BASE: i16 = 2500;

/// Travel, failsafe and trim of one physical output in raw units.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub minimum: i16,
    pub maximum: i16,
    pub failsafe: i16,
    pub trim: i16,
}

/// Everything the real-time side needs in raw units.
///
/// Recompute with [`DerivedLimits::compute`] at startup and after every configuration
/// edit, never from inside a mixer cycle.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DerivedLimits {
    /// Auto-select threshold of each flight mode.
    pub auto_triggers: [i16; FLIGHT_MODES],
    /// Integral-term output limits (roll, pitch, yaw) for the active flight mode.
    pub raw_i_limits: [i32; 3],
    /// Integral-term input constraints; zero when the axis has no I gain.
    pub raw_i_constrain: [i32; 3],
    pub outputs: [Limits; MAX_OUTPUTS],
    pub channel_offsets: [i16; PSEUDO_OUTPUTS],
    pub dyn_gain_div: i16,
    pub deadband: i16,
    pub hands_free_trigger: i16,
}

impl DerivedLimits {
    pub fn compute(config: &Config) -> Self {
        let mode = config.flight_mode();

        let mut auto_triggers = [0; FLIGHT_MODES];
        for (trigger, profile) in auto_triggers.iter_mut().zip(config.flight_modes.iter()) {
            *trigger = percent_to_position(profile.profile_limit);
        }

        let mut raw_i_limits = [0; 3];
        let mut raw_i_constrain = [0; 3];
        for (i, axis) in mode.axes().iter().enumerate() {
            raw_i_limits[i] = integral_limit(axis.i_limit);
            raw_i_constrain[i] = integral_constrain(raw_i_limits[i], axis.i_mult);
        }

        let mut outputs = [Limits::default(); MAX_OUTPUTS];
        for (limits, setup) in outputs.iter_mut().zip(config.outputs.iter()) {
            *limits = Limits {
                minimum: percent_to_position(setup.min_travel),
                maximum: percent_to_position(setup.max_travel),
                failsafe: percent_to_position(setup.failsafe),
                trim: percent_to_position(setup.trim),
            };
        }

        let mut channel_offsets = [0; PSEUDO_OUTPUTS];
        for (offset, mix) in channel_offsets.iter_mut().zip(config.channels.iter()) {
            *offset = percent_to_offset(mix.offset);
        }

        let deadband = config.deadband as i16 * UNITS_PER_PERCENT;

        let limits = DerivedLimits {
            auto_triggers,
            raw_i_limits,
            raw_i_constrain,
            outputs,
            channel_offsets,
            dyn_gain_div: dynamic_gain_divisor(config.dyn_gain),
            deadband,
            hands_free_trigger: deadband,
        };
        log::debug!(target: "mixer::limits", "derived limits recomputed: {:?}", limits);
        limits
    }
}

fn integral_limit(percent: i8) -> i32 {
    percent as i32 * I_LIMIT_MULTIPLIER
}

// gain 32 @ 125% -> 80,000; gain 100 @ 125% -> 25,600; gain 1 @ 100% -> 2,048,000
fn integral_constrain(raw_limit: i32, gain: i8) -> i32 {
    if gain == 0 {
        return 0;
    }
    let divisor = ((gain as i32) << 7) / 32;
    (raw_limit / divisor) << 7
}

fn dynamic_gain_divisor(dyn_gain: u8) -> i16 {
    if dyn_gain > 0 {
        DYN_GAIN_BASE / dyn_gain as i16
    } else {
        DYN_GAIN_BASE
    }
}
