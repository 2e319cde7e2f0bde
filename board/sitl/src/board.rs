use autopilot::Resources;
use hal::{pulse_width_us, Corrections, RcFrame, RcInput, ServoOutput, Stabiliser};
use mixer::{AxisTerms, FlightFlags, RcChannel, RcChannels, RxMode, ServoCommands, MAX_OUTPUTS, RC_CHANNELS};

/// Frames during which the simulated transmitter is switched off.
const SIGNAL_LOSS: std::ops::Range<u32> = 400..450;

pub struct FlightControllerBoard {}

impl FlightControllerBoard {
    pub fn new() -> Self {
        FlightControllerBoard {}
    }
}

impl autopilot::Board for FlightControllerBoard {
    fn name(&self) -> &str {
        "SITL"
    }

    fn split_resources(self) -> Resources {
        Resources {
            rc_input: Box::new(SimReceiver::new()),
            stabiliser: Box::new(SimStabiliser::default()),
            servos: Box::new(ConsoleServos::default()),
        }
    }
}

/// Sweeps the sticks slowly through their travel.
pub struct SimReceiver {
    frame: u32,
}

impl SimReceiver {
    pub fn new() -> Self {
        SimReceiver { frame: 0 }
    }
}

impl RcInput for SimReceiver {
    fn init(&mut self) -> bool {
        self.frame = 0;
        true
    }

    fn channel_count(&self) -> usize {
        RC_CHANNELS
    }

    fn read_frame(&mut self) -> Option<RcFrame> {
        self.frame = self.frame.wrapping_add(1);
        if SIGNAL_LOSS.contains(&self.frame) {
            return None;
        }

        let t = self.frame as f32 / 50.0;
        let sweep = |period: f32, amplitude: f32| ((t * std::f32::consts::TAU / period).sin() * amplitude) as i16;
        Some(RcFrame::new([
            sweep(20.0, 1000.0),
            sweep(4.0, 600.0),
            sweep(6.0, 400.0),
            sweep(8.0, 300.0),
            0,
            sweep(30.0, 1200.0),
            0,
            0,
        ]))
    }

    fn is_in_failsafe(&self) -> bool {
        SIGNAL_LOSS.contains(&self.frame)
    }

    fn rx_mode(&self) -> RxMode {
        RxMode::Cppm
    }
}

/// Pretends the airframe rotates with stick movement and leans with stick deflection.
#[derive(Default)]
pub struct SimStabiliser {
    last: RcChannels,
}

impl Stabiliser for SimStabiliser {
    fn corrections(&mut self, rc: &RcChannels) -> Corrections {
        let rate = |channel| rc.get(channel).wrapping_sub(self.last.get(channel)).wrapping_mul(2);
        let corrections = Corrections {
            gyro: AxisTerms::new(
                rate(RcChannel::Aileron),
                rate(RcChannel::Elevator),
                rate(RcChannel::Rudder),
            ),
            acc: AxisTerms::new(rc.get(RcChannel::Aileron) / 8, rc.get(RcChannel::Elevator) / 8, 0),
        };
        self.last = *rc;
        corrections
    }

    fn flags(&self) -> FlightFlags {
        FlightFlags {
            stability: true,
            auto_level: true,
            failsafe: false,
        }
    }
}

/// Logs the pulse widths instead of driving timers.
#[derive(Default)]
pub struct ConsoleServos {
    writes: u32,
}

impl ServoOutput for ConsoleServos {
    fn init(&mut self) -> bool {
        true
    }

    fn output_count(&self) -> usize {
        MAX_OUTPUTS
    }

    fn write(&mut self, commands: &ServoCommands) {
        self.writes = self.writes.wrapping_add(1);
        if self.writes % 50 == 0 {
            let pulses: Vec<u16> = commands.iter().map(|raw| pulse_width_us(*raw)).collect();
            log::info!(target: "sitl::servos", "write {}: {:?} us", self.writes, pulses);
        }
    }
}
