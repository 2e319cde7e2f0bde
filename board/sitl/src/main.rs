use std::{
    sync::mpsc,
    time::{Duration, Instant},
};

use anyhow::{anyhow, bail, Context};
use autopilot::{Board, InputLatch, RcMapper, Vehicle};
use board::FlightControllerBoard;
use mixer::{Config, MAX_OUTPUTS};
use receiver::{ReceiverCommand, ReceiverWorker};

mod board;
mod receiver;

static LATCH: InputLatch = InputLatch::new();

const DEFAULT_CYCLES: u32 = 1000;

enum State {
    Initializing,
    Running,
    Stopping,
}

fn load_config(path: Option<&str>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let text = std::fs::read_to_string(path).with_context(|| format!("failed to read {path}"))?;
    let config: Config =
        serde_json::from_str(&text).with_context(|| format!("failed to parse {path}"))?;
    config
        .validate()
        .with_context(|| format!("invalid configuration in {path}"))?;
    Ok(config)
}

// Usage: sitl [config.json] [cycles]
fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let config = load_config(args.get(1).map(String::as_str))?;
    let cycles = match args.get(2) {
        Some(n) => n
            .parse()
            .with_context(|| format!("invalid cycle count {n}"))?,
        None => DEFAULT_CYCLES,
    };

    let board = FlightControllerBoard::new();
    log::info!("Starting {} board", board.name());
    let resources = board.split_resources();
    let mut rc_input = Some(resources.rc_input);
    let mut stabiliser = resources.stabiliser;
    let mut servos = resources.servos;

    let mut vehicle = Vehicle::new(config, &LATCH).context("rejected configuration")?;

    let mut last_update_time = Instant::now();
    let minimum_elapsed_duration = Duration::from_millis(1000 / 100); // 100 Hz
    let mut state = State::Initializing;
    let mut receiver = None;
    let mut update_cycle_count = 0;
    loop {
        let now = Instant::now();
        let dt = now.duration_since(last_update_time);
        if dt < minimum_elapsed_duration {
            std::thread::sleep(minimum_elapsed_duration - dt);
            continue;
        }
        last_update_time = now;

        match state {
            State::Initializing => {
                let Some(mut rc) = rc_input.take() else {
                    bail!("receiver already started");
                };
                if !rc.init() {
                    bail!("receiver failed to initialise");
                }
                if !servos.init() {
                    bail!("servo outputs failed to initialise");
                }
                if servos.output_count() < MAX_OUTPUTS {
                    log::warn!("only {} of {} outputs are driven", servos.output_count(), MAX_OUTPUTS);
                }

                let status = rc.status();
                log::info!("Receiver: {:?}", status);
                if status.rx_mode != vehicle.config().rx_mode {
                    log::warn!(
                        "receiver uses {:?} but the configuration expects {:?}",
                        status.rx_mode,
                        vehicle.config().rx_mode
                    );
                }

                let (to_worker_tx, to_worker_rx) = mpsc::channel();
                let handle = ReceiverWorker::new(rc, RcMapper::default(), &LATCH).run(to_worker_rx);
                receiver = Some((to_worker_tx, handle));
                state = State::Running;
            }
            State::Running => {
                let output = vehicle.update(&mut *stabiliser);
                servos.write(output);

                update_cycle_count += 1;
                if update_cycle_count >= cycles {
                    state = State::Stopping;
                }
            }
            State::Stopping => {
                log::info!(
                    "Stopping after {} cycles, slewed flap {}",
                    update_cycle_count,
                    vehicle.mixer_state().slewed_flap()
                );
                if let Some((to_worker_tx, handle)) = receiver.take() {
                    // The worker also stops when the channel is dropped
                    let _ = to_worker_tx.send(ReceiverCommand::Stop);
                    handle
                        .join()
                        .map_err(|_| anyhow!("receiver thread panicked"))?;
                }
                break;
            }
        }
    }
    Ok(())
}
