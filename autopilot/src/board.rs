use hal::{RcInput, ServoOutput, Stabiliser};

pub trait Board
where
    Self: Sized,
{
    fn name(&self) -> &str;

    fn split_resources(self) -> Resources;
}

/// Collaborators a board hands to the flight loop.
pub struct Resources {
    /// Moved to the receiver task, hence `Send`.
    pub rc_input: Box<dyn RcInput + Send>,
    pub stabiliser: Box<dyn Stabiliser>,
    pub servos: Box<dyn ServoOutput>,
}
