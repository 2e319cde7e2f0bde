mod board;
mod latch;
mod rc;
mod vehicle;

pub use board::{Board, Resources};
pub use latch::{InputLatch, RcSnapshot};
pub use rc::{ChannelOrder, ChannelOrderError, RcMapper};
pub use vehicle::Vehicle;
