//! Ticker Replay - writes five canned price frames to the display in a loop,
//! without touching the network. Used to check the serial link and firmware.
//!
//! Usage example (CLI):
//! ```bash
//! ticker_replay --serial-port COM4 --interval-secs 10
//! ```
mod replay;

use std::time::Duration;

use clap::Parser;
use crossbeam_channel::bounded;
use log::info;
use ticker_common::args::{SerialArgs, print_available_ports};
use ticker_common::defaults::{
    DEFAULT_BAUD_RATE, DEFAULT_REPLAY_INTERVAL_SECS, READ_TIMEOUT, default_serial_port,
};
use ticker_common::serial::{SerialForwarder, open_port};
use ticker_common::{Result, TickerError};

use crate::replay::Replayer;

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about = "Replays canned price frames to a serial display", long_about = None)]
struct Args {
    /// Seconds to wait after each frame.
    #[clap(long, default_value_t = DEFAULT_REPLAY_INTERVAL_SECS)]
    interval_secs: u64,

    /// Stop after this many passes over the frames. Runs forever when omitted.
    #[clap(long)]
    cycles: Option<u64>,

    #[command(flatten)]
    serial: SerialArgs,
}

fn main() -> Result<(), TickerError> {
    dotenv::dotenv().ok();
    init_logger();
    let args = Args::parse();

    if args.serial.list_ports {
        return print_available_ports();
    }

    let (shutdown_tx, shutdown_rx) = bounded::<()>(1);
    ctrlc::set_handler(move || {
        info!("Ctrl+C received. Stopping replay...");
        let _ = shutdown_tx.try_send(());
    })
    .map_err(|e| TickerError::Format(format!("Error setting Ctrl+C handler: {}", e)))?;

    let port_name = args
        .serial
        .port()
        .unwrap_or_else(|| default_serial_port().to_string());
    let baud_rate = args.serial.baud_rate.unwrap_or(DEFAULT_BAUD_RATE);
    let port = open_port(&port_name, baud_rate, READ_TIMEOUT)?;

    let mut replayer = Replayer::new(
        SerialForwarder::new(port),
        Duration::from_secs(args.interval_secs),
    );
    let sent = replayer.run(&shutdown_rx, args.cycles)?;
    info!("Replay finished after {} frame(s)", sent);
    Ok(())
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}
