/// Servo output interface
use mixer::ServoCommands;

/// Convert a raw actuator command to a pulse width in microseconds.
///
/// 2.5 raw units per microsecond, so the neutral position 3750 maps to 1500us.
/// Negative commands map to 0.
pub fn pulse_width_us(raw: i16) -> u16 {
    (raw.max(0) as u32 * 2 / 5) as u16
}

/// Servo/ESC output driver
pub trait ServoOutput {
    /// Initialize the output timers
    fn init(&mut self) -> bool;

    /// Number of physical outputs the driver can drive
    fn output_count(&self) -> usize;

    /// Write one set of clamped commands
    fn write(&mut self, commands: &ServoCommands);
}
