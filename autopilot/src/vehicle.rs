use hal::Stabiliser;
use mixer::{
    Config, ConfigError, DerivedLimits, Mixer, MixerInputs, MixerState, Preset, RcChannel,
    RcChannels, ServoCommands, TransitionInput, MAX_OUTPUTS, SERVO_CENTER,
};

use crate::InputLatch;

pub struct Vehicle {
    config: Config,
    limits: DerivedLimits,
    mixer: Mixer,
    latch: &'static InputLatch,
    output: ServoCommands,
    transition_channel: RcChannel,
    transition_counter: i16,
    failsafe: bool,
}

impl Vehicle {
    pub fn new(config: Config, latch: &'static InputLatch) -> Result<Self, ConfigError> {
        config.validate()?;
        let limits = DerivedLimits::compute(&config);
        Ok(Vehicle {
            config,
            limits,
            mixer: Mixer::new(),
            latch,
            output: [SERVO_CENTER; MAX_OUTPUTS],
            transition_channel: RcChannel::Aux1,
            transition_counter: 0,
            failsafe: false,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn limits(&self) -> &DerivedLimits {
        &self.limits
    }

    pub fn mixer_state(&self) -> &MixerState {
        self.mixer.state()
    }

    // Replace the configuration and recompute the derived limits.
    // Never called from inside a cycle; the borrow of `&mut self` keeps it that way.
    pub fn apply_config(&mut self, config: Config) -> Result<(), ConfigError> {
        config.validate()?;
        self.limits = DerivedLimits::compute(&config);
        self.config = config;
        log::info!(
            target: "autopilot::vehicle",
            "configuration applied: {:?} mix, flap channel {:?}",
            self.config.mix_mode,
            self.config.flap_chan
        );
        Ok(())
    }

    pub fn load_preset(&mut self, preset: Preset) -> Result<(), ConfigError> {
        let mut config = self.config.clone();
        config.load_preset(preset);
        self.apply_config(config)
    }

    // Update the input from the RC receiver
    // Embed: call from the receiver interrupt
    // SITL: call from the receiver thread
    pub fn update_rc_input(&self, rc: RcChannels, failsafe: bool) {
        self.latch.publish(rc, failsafe);
    }

    pub fn set_transition_channel(&mut self, channel: RcChannel) {
        self.transition_channel = channel;
    }

    // Timed transition position, only used with a non-zero transition speed
    pub fn set_transition_counter(&mut self, counter: i16) {
        self.transition_counter = counter;
    }

    pub fn in_failsafe(&self) -> bool {
        self.failsafe
    }

    pub fn get_pwm_output(&self) -> &ServoCommands {
        &self.output
    }

    // Run one mixer cycle on the latest receiver frame
    pub fn update(&mut self, stabiliser: &mut dyn Stabiliser) -> &ServoCommands {
        let snapshot = self.latch.snapshot();
        let corrections = stabiliser.corrections(&snapshot.rc);

        let mut flags = stabiliser.flags();
        flags.failsafe |= snapshot.failsafe;
        if flags.failsafe != self.failsafe {
            if flags.failsafe {
                log::warn!(target: "autopilot::vehicle", "failsafe engaged after {} frames", snapshot.frames);
            } else {
                log::warn!(target: "autopilot::vehicle", "failsafe cleared");
            }
            self.failsafe = flags.failsafe;
        }

        let inputs = MixerInputs {
            rc: snapshot.rc,
            gyro: corrections.gyro,
            acc: corrections.acc,
            transition: TransitionInput {
                // Roughly ±10 across the stick travel
                value: snapshot.rc.get(self.transition_channel) >> 7,
                counter: self.transition_counter,
            },
            flags,
        };

        self.output = self.mixer.cycle(&self.config, &self.limits, &inputs);
        &self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hal::Corrections;
    use mixer::{AxisTerms, FlightFlags, MixMode};

    struct FixedStabiliser {
        corrections: Corrections,
        flags: FlightFlags,
        seen: RcChannels,
    }

    impl FixedStabiliser {
        fn idle() -> Self {
            FixedStabiliser {
                corrections: Corrections::default(),
                flags: FlightFlags::default(),
                seen: RcChannels::default(),
            }
        }
    }

    impl Stabiliser for FixedStabiliser {
        fn corrections(&mut self, rc: &RcChannels) -> Corrections {
            self.seen = *rc;
            self.corrections
        }

        fn flags(&self) -> FlightFlags {
            self.flags
        }
    }

    fn latch() -> &'static InputLatch {
        Box::leak(Box::new(InputLatch::new()))
    }

    fn sticks() -> RcChannels {
        RcChannels::default()
            .with(RcChannel::Throttle, 500)
            .with(RcChannel::Aileron, 300)
            .with(RcChannel::Elevator, -200)
    }

    #[test]
    fn test_update_mixes_latest_frame() {
        let mut vehicle = Vehicle::new(Config::default(), latch()).expect("default config is valid");
        let mut stabiliser = FixedStabiliser::idle();
        assert_eq!(*vehicle.get_pwm_output(), [SERVO_CENTER; MAX_OUTPUTS], "outputs start neutral");

        vehicle.update_rc_input(sticks(), false);
        let out = *vehicle.update(&mut stabiliser);

        assert_eq!(stabiliser.seen, sticks(), "stabiliser sees the latched sticks");
        assert_eq!(out[0], SERVO_CENTER + 500);
        assert_eq!(out[5], SERVO_CENTER + 300);
        assert_eq!(out, *vehicle.get_pwm_output());
    }

    #[test]
    fn test_corrections_reach_the_mixer() {
        let mut vehicle = Vehicle::new(Config::default(), latch()).expect("default config is valid");
        let mut stabiliser = FixedStabiliser::idle();
        stabiliser.corrections.gyro = AxisTerms::new(40, 0, 0);
        stabiliser.flags.stability = true;

        vehicle.update_rc_input(sticks(), false);
        let out = vehicle.update(&mut stabiliser);
        assert_eq!(out[5], SERVO_CENTER + 300 - 40, "roll gyro subtracts from the aileron");
    }

    #[test]
    fn test_receiver_failsafe_applies_failsafe_positions() {
        let mut config = Config::default();
        config.set_failsafe_position(0, -100).expect("valid failsafe");
        let mut vehicle = Vehicle::new(config, latch()).expect("config is valid");
        let mut stabiliser = FixedStabiliser::idle();

        vehicle.update_rc_input(sticks(), true);
        let out = *vehicle.update(&mut stabiliser);
        assert!(vehicle.in_failsafe());
        assert_eq!(out[0], SERVO_CENTER - 1200, "throttle goes to its failsafe position");

        vehicle.update_rc_input(sticks(), false);
        vehicle.update(&mut stabiliser);
        assert!(!vehicle.in_failsafe(), "failsafe clears with the receiver");
    }

    #[test]
    fn test_apply_config_rejects_invalid_and_keeps_previous() {
        let mut vehicle = Vehicle::new(Config::default(), latch()).expect("default config is valid");
        let mut config = Config::default();
        config.flap_speed = 99;
        assert_eq!(
            vehicle.apply_config(config),
            Err(ConfigError::FlapSpeedOutOfRange(99))
        );
        assert_eq!(vehicle.config().flap_speed, 0, "rejected config must not be applied");
    }

    #[test]
    fn test_apply_config_recomputes_limits() {
        let mut vehicle = Vehicle::new(Config::default(), latch()).expect("default config is valid");
        let mut config = Config::default();
        config.set_travel(0, -100, 25).expect("valid travel");
        vehicle.apply_config(config).expect("valid config");
        assert_eq!(vehicle.limits().outputs[0].maximum, SERVO_CENTER + 300);

        let mut stabiliser = FixedStabiliser::idle();
        vehicle.update_rc_input(sticks(), false);
        assert_eq!(vehicle.update(&mut stabiliser)[0], SERVO_CENTER + 300);
    }

    #[test]
    fn test_load_preset() {
        let mut vehicle = Vehicle::new(Config::default(), latch()).expect("default config is valid");
        vehicle.load_preset(Preset::FlyingWing).expect("preset is valid");
        assert_eq!(vehicle.config().mix_mode, MixMode::FlyingWing);
    }

    #[test]
    fn test_transition_value_from_channel() {
        let mut config = Config::default();
        config.mix_mode = MixMode::Transition;
        config.channels[8] = mixer::ChannelMix::sourced(RcChannel::Elevator);
        config.channels[8].source_volume = -100;
        let mut vehicle = Vehicle::new(config, latch()).expect("config is valid");
        vehicle.set_transition_channel(RcChannel::Gear);
        let mut stabiliser = FixedStabiliser::idle();

        vehicle.update_rc_input(sticks().with(RcChannel::Gear, 1200), false);
        let out = *vehicle.update(&mut stabiliser);
        assert_eq!(out[4], SERVO_CENTER + 200, "full transition selects the second mixer");

        vehicle.update_rc_input(sticks().with(RcChannel::Gear, -1200), false);
        let out = *vehicle.update(&mut stabiliser);
        assert_eq!(out[4], SERVO_CENTER - 200, "no transition keeps the first mixer");
    }
}
