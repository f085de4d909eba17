//! Poll loop tying the fetcher to the serial forwarder.
//!
//! Each iteration fetches a listing, picks the displayed prices, formats a
//! frame and writes it. Fetch and validation failures are logged and retried
//! after a growing delay; a failed serial write ends the loop. Waiting happens
//! in a `select!` on the shutdown channel so Ctrl+C interrupts it.
use crossbeam_channel::{Receiver, select};
use log::{debug, error, info, warn};
use ticker_common::defaults::CONVERT_CURRENCY;
use ticker_common::serial::FrameSink;
use ticker_common::{Frame, Result, TickerError};

use crate::fetcher::PriceSource;
use crate::model::backoff::Backoff;
use crate::model::listing::PriceSelection;

/// Drives fetch → format → write → wait.
pub struct Poller<S: PriceSource, K: FrameSink> {
    source: S,
    sink: K,
    selection: PriceSelection,
    backoff: Backoff,
}

impl<S: PriceSource, K: FrameSink> Poller<S, K> {
    /// Polls `source` and writes to `sink`, waiting per `backoff`.
    pub fn new(source: S, sink: K, selection: PriceSelection, backoff: Backoff) -> Self {
        Self {
            source,
            sink,
            selection,
            backoff,
        }
    }

    /// One fetch and, if it yields usable prices, one write.
    pub fn run_once(&mut self) -> Result<Frame> {
        let listing = self.source.fetch()?;
        let prices = listing.select(&self.selection, CONVERT_CURRENCY)?;
        for point in &prices {
            info!(
                "{}: {:.2} {} (24h {:+.2}%)",
                point.symbol,
                point.price,
                CONVERT_CURRENCY,
                point.percent_change_24h.unwrap_or_default()
            );
        }

        let values: Vec<f64> = prices.iter().map(|p| p.price).collect();
        let frame = Frame::from_prices(&values);
        self.sink.send(&frame)?;
        Ok(frame)
    }

    /// Runs one iteration and updates the backoff.
    ///
    /// Returns `Ok(None)` when the iteration failed in a way worth retrying.
    pub fn poll(&mut self) -> Result<Option<Frame>> {
        match self.run_once() {
            Ok(frame) => {
                if self.backoff.failures() > 0 {
                    info!("Feed recovered after {} failed poll(s)", self.backoff.failures());
                }
                self.backoff.record_success();
                debug!("Frame sent: {}", frame);
                Ok(Some(frame))
            }
            Err(e) if e.is_fetch_error() => {
                let streak = self.backoff.record_failure();
                warn!(
                    "Poll failed ({} in a row), next attempt in {:?}: {}",
                    streak,
                    self.backoff.delay(),
                    e
                );
                Ok(None)
            }
            Err(e) => {
                error!("Poll aborted: {}", e);
                Err(e)
            }
        }
    }

    /// Polls until a shutdown signal arrives or a fatal error occurs.
    pub fn run(&mut self, shutdown: &Receiver<()>) -> Result<(), TickerError> {
        info!("Poll loop started");
        loop {
            self.poll()?;
            let delay = self.backoff.jittered_delay();
            select! {
                recv(shutdown) -> _ => break,
                default(delay) => {},
            }
        }
        info!("Poll loop stopping...");
        Ok(())
    }

    /// Consecutive failed polls.
    pub fn failures(&self) -> u32 {
        self.backoff.failures()
    }

    /// Frame destination.
    pub fn sink(&self) -> &K {
        &self.sink
    }
}
