//! Writing frames to the display over a serial link.
//!
//! The link is fire-and-forget: frames are written synchronously, followed by a
//! short settle pause, and nothing is ever read back. [`SerialForwarder`] is
//! generic over any `Write` so it can drive a real port or an in-memory buffer.
use std::io::Write;
use std::thread;
use std::time::Duration;

use log::{debug, info};
use serialport::{DataBits, Parity, SerialPort, StopBits};

use crate::defaults::WRITE_SETTLE;
use crate::error::TickerError;
use crate::frame::Frame;

/// Destination for outbound frames.
pub trait FrameSink {
    /// Writes one frame. Errors mean the link is unusable.
    fn send(&mut self, frame: &Frame) -> Result<(), TickerError>;
}

/// Writes frames to a byte sink, pausing after each one.
pub struct SerialForwarder<W: Write> {
    writer: W,
    settle: Duration,
    frames_sent: u64,
}

impl<W: Write> SerialForwarder<W> {
    /// Wraps `writer` with the default settle delay.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            settle: WRITE_SETTLE,
            frames_sent: 0,
        }
    }

    /// Overrides the pause taken after each write.
    pub fn with_settle(mut self, settle: Duration) -> Self {
        self.settle = settle;
        self
    }

    /// Number of frames written so far.
    pub fn frames_sent(&self) -> u64 {
        self.frames_sent
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> FrameSink for SerialForwarder<W> {
    fn send(&mut self, frame: &Frame) -> Result<(), TickerError> {
        self.writer.write_all(frame.as_bytes())?;
        self.writer.flush()?;
        self.frames_sent += 1;
        debug!("Frame #{} written: {}", self.frames_sent, frame);
        if !self.settle.is_zero() {
            thread::sleep(self.settle);
        }
        Ok(())
    }
}

/// Opens `path` at `baud_rate`, 8N1, with the given read timeout.
pub fn open_port(
    path: &str,
    baud_rate: u32,
    read_timeout: Duration,
) -> Result<Box<dyn SerialPort>, TickerError> {
    let port = serialport::new(path, baud_rate)
        .data_bits(DataBits::Eight)
        .parity(Parity::None)
        .stop_bits(StopBits::One)
        .timeout(read_timeout)
        .open()?;
    info!("Serial port {} opened at {} baud", path, baud_rate);
    Ok(port)
}

/// Names of the serial devices present on this machine.
pub fn available_ports() -> Result<Vec<String>, TickerError> {
    let ports = serialport::available_ports()?;
    Ok(ports.into_iter().map(|p| p.port_name).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    struct Unplugged;

    impl Write for Unplugged {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "device removed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn writes_frames_back_to_back() {
        let mut forwarder = SerialForwarder::new(Vec::new()).with_settle(Duration::ZERO);
        forwarder.send(&Frame::from_line("55000,3000,\n")).unwrap();
        forwarder
            .send(&Frame::from_prices(&[54999.999, 2999.994]))
            .unwrap();

        assert_eq!(forwarder.frames_sent(), 2);
        assert_eq!(forwarder.into_inner(), b"55000,3000,\n55000.0,2999.99,\n");
    }

    #[test]
    fn write_failure_surfaces_as_io_error() {
        let mut forwarder = SerialForwarder::new(Unplugged).with_settle(Duration::ZERO);
        let err = forwarder.send(&Frame::from_line("1,2,")).unwrap_err();
        assert!(matches!(err, TickerError::Io(_)));
        assert_eq!(forwarder.frames_sent(), 0);
    }
}
