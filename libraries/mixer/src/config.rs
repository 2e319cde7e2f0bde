// Mixer configuration snapshot and its validation.
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::channel::{ChannelMix, MixSource, RcChannel, MAX_OUTPUTS, PSEUDO_OUTPUTS};
use crate::presets::Preset;

/// Number of flight-mode profiles.
pub const FLIGHT_MODES: usize = 3;

/// Largest magnitude accepted for travel, trim and volume percentages.
pub const MAX_PERCENT: i16 = 125;

pub const MAX_FLAP_SPEED: u8 = 10;
pub const MAX_TRANSITION_SPEED: u8 = 40;
pub const MAX_DEADBAND: u8 = 5;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{field} value {value} is outside {min}..={max}")]
    PercentOutOfRange {
        field: &'static str,
        value: i16,
        min: i16,
        max: i16,
    },

    #[error("output {output}: minimum travel {min} is above maximum travel {max}")]
    InvertedTravel { output: usize, min: i8, max: i8 },

    #[error("the aileron input cannot also be the flap channel")]
    InvalidFlapChannel,

    #[error("flight mode {0} does not exist")]
    FlightModeOutOfRange(usize),

    #[error("output {0} does not exist")]
    OutputOutOfRange(usize),

    #[error("mix slot {0} does not exist")]
    SlotOutOfRange(usize),

    #[error("slot {slot} mixes from missing output {target}")]
    MixTargetOutOfRange { slot: usize, target: usize },

    #[error("flap speed {0} is outside 0..={max}", max = MAX_FLAP_SPEED)]
    FlapSpeedOutOfRange(u8),

    #[error("transition speed {0} is outside 0..={max}", max = MAX_TRANSITION_SPEED)]
    TransitionSpeedOutOfRange(u8),
}

fn check_percent(field: &'static str, value: i16, min: i16, max: i16) -> Result<(), ConfigError> {
    if value < min || value > max {
        return Err(ConfigError::PercentOutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}

fn check_signed(field: &'static str, value: i8) -> Result<(), ConfigError> {
    check_percent(field, value as i16, -MAX_PERCENT, MAX_PERCENT)
}

/// Overall surface topology.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MixMode {
    #[default]
    Aeroplane,
    FlyingWing,
    /// Outputs 5-8 blend into the virtual slots 9-12.
    Transition,
}

/// Receiver framing. Only CPPM changes mixer behaviour (advanced failsafe throttle).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RxMode {
    #[default]
    Cppm,
    Pwm1,
    Pwm2,
    Pwm3,
    Xtreme,
    Sbus,
    Spektrum,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FailsafeType {
    /// Replace every physical output with its failsafe position.
    #[default]
    Simple,
    /// Keep mixing; offset auto-level trims, hold throttle, nudge rudder.
    Advanced,
}

/// Failsafe adjustments, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FailsafeTrims {
    pub throttle: i8,
    pub aileron: i8,
    pub elevator: i8,
    pub rudder: i8,
}

impl Default for FailsafeTrims {
    fn default() -> Self {
        Self {
            throttle: -100,
            aileron: 0,
            elevator: 0,
            rudder: 0,
        }
    }
}

/// Integral-term settings for one axis of a flight mode.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AxisProfile {
    pub i_mult: i8,
    /// Integral throw limit in percent.
    pub i_limit: i8,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FlightMode {
    pub roll: AxisProfile,
    pub pitch: AxisProfile,
    pub yaw: AxisProfile,
    /// Stick position (percent) that auto-selects this mode.
    pub profile_limit: i8,
    pub acc_roll_zero_trim: i8,
    pub acc_pitch_zero_trim: i8,
}

impl FlightMode {
    pub fn axes(&self) -> [AxisProfile; 3] {
        [self.roll, self.pitch, self.yaw]
    }
}

/// Travel, failsafe and trim of one physical output, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OutputSetup {
    pub min_travel: i8,
    pub max_travel: i8,
    pub failsafe: i8,
    pub trim: i8,
    pub reversed: bool,
}

impl Default for OutputSetup {
    fn default() -> Self {
        Self {
            min_travel: -100,
            max_travel: 100,
            failsafe: 0,
            trim: 0,
            reversed: false,
        }
    }
}

/// Complete mixer configuration.
///
/// The pipeline only ever borrows a `Config`; edits happen between cycles and must be
/// followed by [`DerivedLimits::compute`](crate::DerivedLimits::compute).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Config {
    pub mix_mode: MixMode,
    pub cam_stab: bool,
    pub rx_mode: RxMode,
    pub flap_chan: Option<RcChannel>,
    /// Aileron differential in percent.
    pub differential: i8,
    /// Cycles between flap slew steps; 0 disables slewing.
    pub flap_speed: u8,
    /// Height damping gain; 0 disables it.
    pub dampen: i8,
    /// 0 selects the external transition input, otherwise the internal counter.
    pub transition_speed: u8,
    /// Active flight mode.
    pub flight: usize,
    pub flight_modes: [FlightMode; FLIGHT_MODES],
    pub failsafe_type: FailsafeType,
    pub failsafe: FailsafeTrims,
    pub outputs: [OutputSetup; MAX_OUTPUTS],
    pub channels: [ChannelMix; PSEUDO_OUTPUTS],
    /// Stick deadband in percent.
    pub deadband: u8,
    /// Dynamic gain in percent; 0 disables it.
    pub dyn_gain: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self::for_preset(Preset::Aeroplane)
    }
}

impl Config {
    /// Factory settings with the given mix table loaded.
    pub fn for_preset(preset: Preset) -> Self {
        let mut config = Config {
            mix_mode: MixMode::Aeroplane,
            cam_stab: false,
            rx_mode: RxMode::default(),
            flap_chan: None,
            differential: 0,
            flap_speed: 0,
            dampen: 0,
            transition_speed: 0,
            flight: 0,
            flight_modes: [FlightMode::default(); FLIGHT_MODES],
            failsafe_type: FailsafeType::default(),
            failsafe: FailsafeTrims::default(),
            outputs: [OutputSetup::default(); MAX_OUTPUTS],
            channels: [ChannelMix::empty(); PSEUDO_OUTPUTS],
            deadband: 2,
            dyn_gain: 0,
        };
        config.load_preset(preset);
        config
    }

    /// Replace the mix table with a preset and select the matching topology.
    pub fn load_preset(&mut self, preset: Preset) -> &mut Self {
        self.channels = [ChannelMix::empty(); PSEUDO_OUTPUTS];
        self.channels[..MAX_OUTPUTS].copy_from_slice(&preset.table());
        match preset {
            Preset::Aeroplane => {
                self.mix_mode = MixMode::Aeroplane;
                self.cam_stab = false;
            }
            Preset::FlyingWing => {
                self.mix_mode = MixMode::FlyingWing;
                self.cam_stab = false;
            }
            Preset::CamStab => self.cam_stab = true,
        }
        log::info!(target: "mixer::config", "loaded {:?} mix preset", preset);
        self
    }

    pub fn flight_mode(&self) -> &FlightMode {
        &self.flight_modes[self.flight]
    }

    pub fn set_flap_channel(&mut self, flap_chan: Option<RcChannel>) -> Result<&mut Self, ConfigError> {
        if flap_chan == Some(RcChannel::Aileron) {
            return Err(ConfigError::InvalidFlapChannel);
        }
        self.flap_chan = flap_chan;
        Ok(self)
    }

    pub fn set_differential(&mut self, differential: i8) -> Result<&mut Self, ConfigError> {
        check_percent("differential", differential as i16, 0, 100)?;
        self.differential = differential;
        Ok(self)
    }

    pub fn set_flap_speed(&mut self, flap_speed: u8) -> Result<&mut Self, ConfigError> {
        if flap_speed > MAX_FLAP_SPEED {
            return Err(ConfigError::FlapSpeedOutOfRange(flap_speed));
        }
        self.flap_speed = flap_speed;
        Ok(self)
    }

    pub fn set_transition_speed(&mut self, speed: u8) -> Result<&mut Self, ConfigError> {
        if speed > MAX_TRANSITION_SPEED {
            return Err(ConfigError::TransitionSpeedOutOfRange(speed));
        }
        self.transition_speed = speed;
        Ok(self)
    }

    pub fn set_dampen(&mut self, dampen: i8) -> Result<&mut Self, ConfigError> {
        check_percent("height damping", dampen as i16, 0, 100)?;
        self.dampen = dampen;
        Ok(self)
    }

    pub fn set_deadband(&mut self, deadband: u8) -> Result<&mut Self, ConfigError> {
        check_percent("deadband", deadband as i16, 0, MAX_DEADBAND as i16)?;
        self.deadband = deadband;
        Ok(self)
    }

    pub fn set_dynamic_gain(&mut self, dyn_gain: u8) -> Result<&mut Self, ConfigError> {
        check_percent("dynamic gain", dyn_gain as i16, 0, 100)?;
        self.dyn_gain = dyn_gain;
        Ok(self)
    }

    pub fn set_flight_mode(&mut self, flight: usize) -> Result<&mut Self, ConfigError> {
        if flight >= FLIGHT_MODES {
            return Err(ConfigError::FlightModeOutOfRange(flight));
        }
        self.flight = flight;
        Ok(self)
    }

    pub fn set_travel(&mut self, output: usize, min: i8, max: i8) -> Result<&mut Self, ConfigError> {
        let setup = self
            .outputs
            .get_mut(output)
            .ok_or(ConfigError::OutputOutOfRange(output))?;
        check_signed("minimum travel", min)?;
        check_signed("maximum travel", max)?;
        if min > max {
            return Err(ConfigError::InvertedTravel { output, min, max });
        }
        setup.min_travel = min;
        setup.max_travel = max;
        Ok(self)
    }

    pub fn set_trim(&mut self, output: usize, trim: i8) -> Result<&mut Self, ConfigError> {
        check_signed("trim", trim)?;
        self.outputs
            .get_mut(output)
            .ok_or(ConfigError::OutputOutOfRange(output))?
            .trim = trim;
        Ok(self)
    }

    pub fn set_failsafe_position(&mut self, output: usize, position: i8) -> Result<&mut Self, ConfigError> {
        check_signed("failsafe position", position)?;
        self.outputs
            .get_mut(output)
            .ok_or(ConfigError::OutputOutOfRange(output))?
            .failsafe = position;
        Ok(self)
    }

    pub fn set_reversed(&mut self, output: usize, reversed: bool) -> Result<&mut Self, ConfigError> {
        self.outputs
            .get_mut(output)
            .ok_or(ConfigError::OutputOutOfRange(output))?
            .reversed = reversed;
        Ok(self)
    }

    pub fn set_channel(&mut self, slot: usize, mix: ChannelMix) -> Result<&mut Self, ConfigError> {
        if slot >= PSEUDO_OUTPUTS {
            return Err(ConfigError::SlotOutOfRange(slot));
        }
        Self::check_channel(slot, &mix)?;
        self.channels[slot] = mix;
        Ok(self)
    }

    fn check_channel(slot: usize, mix: &ChannelMix) -> Result<(), ConfigError> {
        check_signed("source volume", mix.source_volume)?;
        check_signed("channel offset", mix.offset)?;
        for term in mix.extra.iter().flatten() {
            check_signed("mix volume", term.volume)?;
            if let MixSource::Output(target) = term.source {
                if target >= PSEUDO_OUTPUTS {
                    return Err(ConfigError::MixTargetOutOfRange { slot, target });
                }
            }
        }
        Ok(())
    }

    /// Check a whole snapshot, e.g. one restored from storage.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.flap_chan == Some(RcChannel::Aileron) {
            return Err(ConfigError::InvalidFlapChannel);
        }
        check_percent("differential", self.differential as i16, 0, 100)?;
        if self.flap_speed > MAX_FLAP_SPEED {
            return Err(ConfigError::FlapSpeedOutOfRange(self.flap_speed));
        }
        if self.transition_speed > MAX_TRANSITION_SPEED {
            return Err(ConfigError::TransitionSpeedOutOfRange(self.transition_speed));
        }
        check_percent("height damping", self.dampen as i16, 0, 100)?;
        check_percent("deadband", self.deadband as i16, 0, MAX_DEADBAND as i16)?;
        check_percent("dynamic gain", self.dyn_gain as i16, 0, 100)?;
        if self.flight >= FLIGHT_MODES {
            return Err(ConfigError::FlightModeOutOfRange(self.flight));
        }

        for mode in &self.flight_modes {
            check_signed("profile limit", mode.profile_limit)?;
            for axis in mode.axes() {
                check_percent("I-term gain", axis.i_mult as i16, 0, i8::MAX as i16)?;
                check_percent("I-term limit", axis.i_limit as i16, 0, MAX_PERCENT)?;
            }
        }

        let fs = &self.failsafe;
        for value in [fs.throttle, fs.aileron, fs.elevator, fs.rudder] {
            check_signed("failsafe trim", value)?;
        }

        for (output, setup) in self.outputs.iter().enumerate() {
            check_signed("minimum travel", setup.min_travel)?;
            check_signed("maximum travel", setup.max_travel)?;
            check_signed("failsafe position", setup.failsafe)?;
            check_signed("trim", setup.trim)?;
            if setup.min_travel > setup.max_travel {
                return Err(ConfigError::InvertedTravel {
                    output,
                    min: setup.min_travel,
                    max: setup.max_travel,
                });
            }
        }

        for (slot, mix) in self.channels.iter().enumerate() {
            Self::check_channel(slot, mix)?;
        }
        Ok(())
    }
}
