//! # Packet header state machine
//!
//! Inbound socket data is framed by the ESP8266 as `+IPD,<length>:<payload>`, where the length
//! consists of 1-4 ASCII decimal digits. Frames are interleaved with other console output, e.g. status
//! lines or command confirmations.
//!
//! The state machine is fed one byte at a time. Any unexpected byte silently resets the machine, so
//! scanning resynchronizes with the next well-formed header.
use crate::serial::{read_available, read_byte};
use embedded_io::{Read, ReadReady};

/// Scan position
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum State {
    ExpectPlus,
    ExpectI,
    ExpectP,
    ExpectD,
    ExpectComma,
    ExpectDigit1,
    ExpectDigit2,
    ExpectDigit3,
    ExpectDigit4,
    ExpectColon,
    HeaderComplete,
}

/// Tracks the current frame header and the remaining payload length
#[derive(Clone, Debug)]
pub struct PacketManager {
    pub(crate) state: State,

    /// Parsed payload length. Once the header is complete, the payload bytes still to be read.
    length: u16,
}

impl Default for PacketManager {
    fn default() -> Self {
        Self::new()
    }
}

impl PacketManager {
    pub fn new() -> Self {
        Self {
            state: State::ExpectPlus,
            length: 0,
        }
    }

    /// Scans for a frame header using all bytes available right now.
    /// Returns as soon as the header is complete or no more bytes are available.
    pub fn find<S: Read + ReadReady>(&mut self, serial: &mut S) -> Result<(), S::Error> {
        while !self.is_complete_header() {
            match read_byte(serial)? {
                Some(byte) => self.update_state(byte),
                None => break,
            }
        }

        Ok(())
    }

    /// Returns true if a header was parsed and its payload is not fully consumed yet
    pub fn is_complete_header(&self) -> bool {
        self.state == State::HeaderComplete
    }

    /// Returns the remaining payload length of the current frame, or zero if no header was parsed
    pub fn packet_length(&self) -> u16 {
        if self.is_complete_header() {
            return self.length;
        }

        0
    }

    /// Reads payload bytes of the current frame into the buffer and returns the number of bytes read.
    ///
    /// Reads at most the remaining frame length and never more than is available right now. Once the
    /// frame is fully consumed, the state machine starts scanning for the next header.
    pub fn read_packet<S: Read + ReadReady>(&mut self, serial: &mut S, buffer: &mut [u8]) -> Result<usize, S::Error> {
        if !self.is_complete_header() {
            return Ok(0);
        }

        let capacity = buffer.len().min(self.length as usize);
        let read = read_available(serial, &mut buffer[..capacity])?.min(capacity);
        self.length -= read as u16;

        if self.length == 0 {
            self.reset();
        }

        Ok(read)
    }

    /// Restarts scanning for a header
    pub fn reset(&mut self) {
        self.state = State::ExpectPlus;
        self.length = 0;
    }

    /// Continues with the length digits, as `+IPD,` was already consumed by someone else
    pub(crate) fn expect_length(&mut self) {
        self.state = State::ExpectDigit1;
        self.length = 0;
    }

    /// Advances the state machine by one byte
    pub(crate) fn update_state(&mut self, byte: u8) {
        self.state = match (self.state, byte) {
            (State::ExpectPlus, b'+') => State::ExpectI,
            (State::ExpectI, b'I') => State::ExpectP,
            (State::ExpectP, b'P') => State::ExpectD,
            (State::ExpectD, b'D') => State::ExpectComma,
            (State::ExpectComma, b',') => {
                self.length = 0;
                State::ExpectDigit1
            }
            (State::ExpectDigit1, b'0'..=b'9')
            | (State::ExpectDigit2, b'0'..=b'9')
            | (State::ExpectDigit3, b'0'..=b'9')
            | (State::ExpectDigit4, b'0'..=b'9') => {
                self.length = self.length * 10 + u16::from(byte - b'0');
                Self::next_digit_state(self.state)
            }
            (State::ExpectDigit2, b':')
            | (State::ExpectDigit3, b':')
            | (State::ExpectDigit4, b':')
            | (State::ExpectColon, b':') => {
                trace!("Found +IPD header with length {}", self.length);
                State::HeaderComplete
            }
            (State::HeaderComplete, _) => State::HeaderComplete,
            (_, b'+') => State::ExpectI,
            (State::ExpectPlus, _) => State::ExpectPlus,
            (state, byte) => {
                debug!("Dropping malformed +IPD header in state {:?} at byte {:?}", state, byte);
                State::ExpectPlus
            }
        };
    }

    fn next_digit_state(state: State) -> State {
        match state {
            State::ExpectDigit1 => State::ExpectDigit2,
            State::ExpectDigit2 => State::ExpectDigit3,
            State::ExpectDigit3 => State::ExpectDigit4,
            _ => State::ExpectColon,
        }
    }
}
