//! # Serial channel primitives
//!
//! The ESP8266 is attached by a UART link. Any type implementing [Read], [Write] and [ReadReady] of
//! [embedded_io] may be used as channel. Reads never block: if [ReadReady::read_ready] returns false,
//! zero bytes are read.
use crate::deadline::Deadline;
use crate::error::Error;
use embedded_io::{ErrorType, Read, ReadReady, Write};

/// Full-duplex byte stream connected to the ESP8266
pub trait Serial: Read + Write + ReadReady {}

impl<T: Read + Write + ReadReady> Serial for T {}

/// Number of stop bits
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StopBits {
    One,
    Two,
}

/// Parity mode
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Parity {
    None,
    Odd,
    Even,
}

/// UART settings
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SerialSettings {
    pub baud_rate: u32,
    pub data_bits: u8,
    pub parity: Parity,
    pub stop_bits: StopBits,
}

impl Default for SerialSettings {
    /// Factory settings of the ESP8266 AT firmware: 115200 8N1
    fn default() -> Self {
        Self {
            baud_rate: crate::config::DEFAULT_BAUD_RATE,
            data_bits: 8,
            parity: Parity::None,
            stop_bits: StopBits::One,
        }
    }
}

/// Serial channels which can be (re)configured at runtime
pub trait Configure: ErrorType {
    fn configure(&mut self, settings: &SerialSettings) -> Result<(), Self::Error>;
}

/// Reads a single byte if one is available right now
pub(crate) fn read_byte<S: Read + ReadReady>(serial: &mut S) -> Result<Option<u8>, S::Error> {
    if !serial.read_ready()? {
        return Ok(None);
    }

    let mut byte = [0x0; 1];
    match serial.read(&mut byte)? {
        0 => Ok(None),
        _ => Ok(Some(byte[0])),
    }
}

/// Reads as much as is available right now, limited by the buffer size
pub(crate) fn read_available<S: Read + ReadReady>(serial: &mut S, buffer: &mut [u8]) -> Result<usize, S::Error> {
    if buffer.is_empty() || !serial.read_ready()? {
        return Ok(0);
    }

    serial.read(buffer)
}

/// Writes all data, retrying partial writes until the deadline expires
pub(crate) fn write_all<S: Write, D: Deadline>(
    serial: &mut S,
    mut data: &[u8],
    deadline: &mut D,
) -> Result<(), Error<S::Error>> {
    while !data.is_empty() {
        let written = serial.write(data).map_err(Error::Serial)?;
        data = &data[written.min(data.len())..];

        if !data.is_empty() {
            deadline.check()?;
        }
    }

    serial.flush().map_err(Error::Serial)
}
