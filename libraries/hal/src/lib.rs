#![cfg_attr(not(test), no_std)]

mod rc_input;
mod servo_output;
mod stabiliser;

pub use rc_input::*;
pub use servo_output::*;
pub use stabiliser::*;
