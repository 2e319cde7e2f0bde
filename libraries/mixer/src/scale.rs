// Fixed-point percentage scaling shared by the limits computation and the mixer stages.

/// Raw units per percent of travel.
pub const UNITS_PER_PERCENT: i16 = 12;

/// Raw value of a centred actuator.
pub const SERVO_CENTER: i16 = 3750;

/// Multiply a raw value by an integer percentage.
///
/// The ±100% and 0% cases never touch 32-bit arithmetic. Every other multiplier is
/// applied in 32 bits and divided by 100 with truncation toward zero, then narrowed
/// back to 16 bits. Downstream trim and limit comparisons rely on this exact rounding.
#[inline]
pub fn scale(value: i16, percent: i16) -> i16 {
    match percent {
        100 => value,
        -100 => value.wrapping_neg(),
        0 => 0,
        _ => ((value as i32 * percent as i32) / 100) as i16,
    }
}

/// Map a signed percentage onto an absolute actuator position.
#[inline]
pub fn percent_to_position(percent: i8) -> i16 {
    percent as i16 * UNITS_PER_PERCENT + SERVO_CENTER
}

/// Map a signed percentage onto a relative offset (no neutral position added).
#[inline]
pub fn percent_to_offset(percent: i8) -> i16 {
    percent as i16 * UNITS_PER_PERCENT
}
