//! The per-cycle mixing pipeline.
//!
//! A cycle starts from a zeroed [`ChannelValues`] accumulator and threads it through
//! the stages below in a fixed order. Each stage reads the previous stage's output, so
//! the order in [`Mixer::process`] is part of the flight behaviour.
//!
//! 1. flap and aileron un-mixing on a working copy of the receiver inputs
//! 2. primary source scaling
//! 3. height damping, gyro mixing, accelerometer mixing
//! 4. aileron differential, flap re-mixing with slew limiting
//! 5. secondary source blending, reversal and per-channel offset
//! 6. transition blending, trim restoration
//! 7. failsafe override

mod blend;
mod failsafe;
mod flaps;
mod stabilise;
mod unmix;

use crate::channel::{AxisTerms, RcChannels, MIN_OUTPUTS, PSEUDO_OUTPUTS};
use crate::config::Config;
use crate::limits::DerivedLimits;
use crate::output::{update_servos, ServoCommands};

pub use blend::transition_percent;
pub use flaps::FLAP_STEP;
pub use stabilise::MAX_ZGAIN;

/// Working value of every output slot during one cycle.
pub type ChannelValues = [i16; PSEUDO_OUTPUTS];

/// Mode and status flags owned by the flight-mode logic.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FlightFlags {
    pub stability: bool,
    pub auto_level: bool,
    pub failsafe: bool,
}

/// Transition position sources.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TransitionInput {
    /// Transition stick scaled down by 128, roughly ±10.
    pub value: i16,
    /// Internal timed counter, 0..=16 across the full transition.
    pub counter: i16,
}

/// Everything one cycle reads from the collaborators, captured as a single snapshot.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MixerInputs {
    pub rc: RcChannels,
    pub gyro: AxisTerms,
    /// Roll, pitch and vertical accelerometer terms.
    pub acc: AxisTerms,
    pub transition: TransitionInput,
    pub flags: FlightFlags,
}

/// State the pipeline carries from one cycle to the next.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MixerState {
    flap: i16,
    slow_flaps: i16,
    flap_skip: u8,
    old_z: i16,
    flap_locked: bool,
}

impl MixerState {
    /// Flap position un-mixed from the flaperon inputs, held while they are out of range.
    pub fn flap_target(&self) -> i16 {
        self.flap
    }

    /// Slew-limited flap position re-mixed into the ailerons.
    pub fn slewed_flap(&self) -> i16 {
        self.slow_flaps
    }

    pub fn flap_skip(&self) -> u8 {
        self.flap_skip
    }

    /// Set while the flaperon inputs are outside the measurable range.
    ///
    /// Nothing downstream acts on it; the flap is simply held.
    pub fn flap_locked(&self) -> bool {
        self.flap_locked
    }

    /// Vertical accelerometer sample from the previous cycle.
    pub fn last_vertical_acc(&self) -> i16 {
        self.old_z
    }
}

/// Number of slots a cycle processes.
pub fn active_outputs(config: &Config) -> usize {
    if config.cam_stab {
        MIN_OUTPUTS
    } else {
        PSEUDO_OUTPUTS
    }
}

/// Channel mixing engine. Owns only the cross-cycle state; configuration, limits and
/// inputs are borrowed per cycle.
#[derive(Debug, Default)]
pub struct Mixer {
    state: MixerState,
}

impl Mixer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &MixerState {
        &self.state
    }

    pub fn reset(&mut self) {
        self.state = MixerState::default();
    }

    /// Run the pipeline once and return the unclamped slot values.
    pub fn process(
        &mut self,
        config: &Config,
        limits: &DerivedLimits,
        inputs: &MixerInputs,
    ) -> ChannelValues {
        let active = active_outputs(config);
        let values: ChannelValues = [0; PSEUDO_OUTPUTS];

        unmix::unmix_flaps(config, &inputs.rc, &mut self.state);
        let rc = unmix::unmix_ailerons(config, inputs.rc);

        let values = stabilise::primary(values, config, &rc, active);
        let values = stabilise::height_damping(values, config, active, &inputs.acc, &mut self.state);
        let values = stabilise::gyro(values, config, active, inputs);
        let values = stabilise::accelerometer(values, config, active, inputs);

        let values = flaps::differential(values, config, active);
        let values = flaps::remix(values, config, active, &mut self.state);

        let values = blend::secondary(values, config, limits, &rc, active);
        let values = blend::transition(values, config, &inputs.transition);
        let values = blend::restore_trim(values, limits);

        failsafe::override_outputs(values, config, limits, &inputs.flags)
    }

    /// Run the pipeline and clamp the physical outputs to their travel limits.
    pub fn cycle(
        &mut self,
        config: &Config,
        limits: &DerivedLimits,
        inputs: &MixerInputs,
    ) -> ServoCommands {
        let values = self.process(config, limits, inputs);
        update_servos(&values, limits)
    }
}
