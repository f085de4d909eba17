//! Ticker Feed - polls the CoinMarketCap listing endpoint and forwards the two
//! displayed prices to a microcontroller over a serial port as
//! `"<price>,<price>,\n"`.
//!
//! Usage example (CLI):
//! ```bash
//! TICKER_API_KEY=... ticker_feed --serial-port COM4 --symbols BTC,ETH
//! ```
//!
//! Failed polls are logged and retried with exponential backoff; a failed serial
//! write stops the process. Ctrl+C stops the loop between polls.
use clap::Parser;
use crossbeam_channel::bounded;
use log::info;
use ticker_common::args::print_available_ports;
use ticker_common::defaults::READ_TIMEOUT;
use ticker_common::serial::{SerialForwarder, open_port};
use ticker_common::{Result, TickerError};
use ticker_feed::args::Args;
use ticker_feed::config::FeedConfig;
use ticker_feed::fetcher::PriceFetcher;
use ticker_feed::model::backoff::Backoff;
use ticker_feed::poller::Poller;

fn main() -> Result<(), TickerError> {
    dotenv::dotenv().ok();
    init_logger();
    let args = Args::parse();

    if args.serial.list_ports {
        return print_available_ports();
    }

    let config = FeedConfig::load(&args)?;
    info!("Starting feed with {:?}", config);

    let (shutdown_tx, shutdown_rx) = bounded::<()>(1);
    ctrlc::set_handler(move || {
        info!("Ctrl+C received. Shutting down feed...");
        let _ = shutdown_tx.try_send(());
    })
    .map_err(|e| TickerError::Format(format!("Error setting Ctrl+C handler: {}", e)))?;

    let fetcher = PriceFetcher::new(&config.api_url, &config.api_key, config.request_timeout)?;
    let port = open_port(&config.serial_port, config.baud_rate, READ_TIMEOUT)?;
    let mut poller = Poller::new(
        fetcher,
        SerialForwarder::new(port),
        config.selection.clone(),
        Backoff::new(config.poll_interval, config.max_backoff),
    );

    if args.once {
        let frame = poller.run_once()?;
        info!("Frame sent: {}", frame);
        return Ok(());
    }
    poller.run(&shutdown_rx)
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}
