use std::{
    sync::mpsc,
    thread::JoinHandle,
    time::{Duration, Instant},
};

use autopilot::{InputLatch, RcMapper};
use hal::RcInput;

pub enum ReceiverCommand {
    Stop,
}

/// Stands in for the receiver interrupt: polls the receiver and publishes each frame.
pub struct ReceiverWorker {
    rc_input: Box<dyn RcInput + Send>,
    mapper: RcMapper,
    latch: &'static InputLatch,
    failsafe: bool,
}

impl ReceiverWorker {
    pub fn new(rc_input: Box<dyn RcInput + Send>, mapper: RcMapper, latch: &'static InputLatch) -> Self {
        Self {
            rc_input,
            mapper,
            latch,
            failsafe: false,
        }
    }

    pub fn run(mut self, to_worker_rx: mpsc::Receiver<ReceiverCommand>) -> JoinHandle<()> {
        std::thread::spawn(move || {
            let mut last_loop_time = Instant::now();
            let minimum_elapsed_duration = Duration::from_millis(1000 / 50); // 50 Hz
            loop {
                match to_worker_rx.try_recv() {
                    Ok(ReceiverCommand::Stop) | Err(mpsc::TryRecvError::Disconnected) => return,
                    Err(mpsc::TryRecvError::Empty) => {}
                }
                let now = Instant::now();
                let dt = now.duration_since(last_loop_time);
                if dt < minimum_elapsed_duration {
                    std::thread::sleep(minimum_elapsed_duration - dt);
                    continue;
                }
                last_loop_time = now;
                self.poll();
            }
        })
    }

    fn poll(&mut self) {
        match self.rc_input.read_frame() {
            Some(frame) => {
                let rc = self.mapper.map(&frame);
                self.latch.publish(rc, self.rc_input.is_in_failsafe());
                self.failsafe = false;
            }
            None => {
                // Keep the last sticks but report the loss
                if !self.failsafe && self.rc_input.is_in_failsafe() {
                    let last = self.latch.snapshot();
                    self.latch.publish(last.rc, true);
                    self.failsafe = true;
                }
            }
        }
    }
}
