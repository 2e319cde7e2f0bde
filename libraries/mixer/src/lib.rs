//! Fixed-point channel mixer for fixed-wing and camera-gimbal stabilisation.
//!
//! [`DerivedLimits::compute`] turns a percentage [`Config`] into raw units whenever the
//! configuration changes. [`Mixer::cycle`] then converts one snapshot of receiver inputs
//! and correction terms into clamped [`ServoCommands`].
#![cfg_attr(not(test), no_std)]

mod channel;
mod config;
mod limits;
mod output;
mod pipeline;
mod presets;
mod scale;

pub use channel::{
    Axis, AxisTerms, ChannelMix, Coupling, MixSource, MixTerm, Polarity, RcChannel, RcChannels,
    ACC_POLARITY, ACC_TRIM_POLARITY, GYRO_POLARITY, MAX_OUTPUTS, MIN_OUTPUTS, PSEUDO_OUTPUTS,
    RC_CHANNELS,
};
pub use config::{
    AxisProfile, Config, ConfigError, FailsafeTrims, FailsafeType, FlightMode, MixMode,
    OutputSetup, RxMode, FLIGHT_MODES, MAX_DEADBAND, MAX_FLAP_SPEED, MAX_PERCENT,
    MAX_TRANSITION_SPEED,
};
pub use limits::{DerivedLimits, Limits};
pub use output::{clamp_output, update_servos, ServoCommands};
pub use pipeline::{
    active_outputs, transition_percent, ChannelValues, FlightFlags, Mixer, MixerInputs,
    MixerState, TransitionInput, FLAP_STEP, MAX_ZGAIN,
};
pub use presets::Preset;
pub use scale::{percent_to_offset, percent_to_position, scale, SERVO_CENTER, UNITS_PER_PERCENT};
