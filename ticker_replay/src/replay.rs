//! Canned frames for exercising the display without network access.
use std::time::Duration;

use crossbeam_channel::{Receiver, select};
use log::info;
use ticker_common::serial::FrameSink;
use ticker_common::{Frame, Result};

/// Lines written by the harness, in order.
pub const TEST_FRAMES: [&str; 5] = [
    "55000,3000,\n",
    "54940,2980,\n",
    "54990,2950,\n",
    "54920,3050,\n",
    "54900,3100,\n",
];

/// Cycles through [`TEST_FRAMES`], pausing after each write.
pub struct Replayer<K: FrameSink> {
    sink: K,
    frames: Vec<Frame>,
    interval: Duration,
}

impl<K: FrameSink> Replayer<K> {
    pub fn new(sink: K, interval: Duration) -> Self {
        Self {
            sink,
            frames: TEST_FRAMES.iter().map(|line| Frame::from_line(line)).collect(),
            interval,
        }
    }

    /// Writes the frames for `cycles` passes, or forever when `None`.
    ///
    /// Stops early when `shutdown` fires. Returns the number of frames written.
    pub fn run(&mut self, shutdown: &Receiver<()>, cycles: Option<u64>) -> Result<u64> {
        let mut sent = 0u64;
        let mut cycle = 0u64;
        while cycles.is_none_or(|max| cycle < max) {
            for frame in &self.frames {
                self.sink.send(frame)?;
                sent += 1;
                info!("Replayed frame {}: {}", sent, frame);
                select! {
                    recv(shutdown) -> _ => return Ok(sent),
                    default(self.interval) => {},
                }
            }
            cycle += 1;
        }
        Ok(sent)
    }
}
