//! Mocks for doc examples
use core::convert::Infallible;
use embedded_io::{ErrorType, Read, ReadReady, Write};
use fugit::{TimerDurationU32, TimerInstantU32};
use fugit_timer::Timer;
use heapless::{Deque, Vec};

/// Scripted ESP8266, answering commands with canned responses
#[derive(Default)]
pub struct ExampleSerial {
    /// Pending output of the module
    output: Deque<u8, 256>,

    /// Command line received so far
    line: Vec<u8, 256>,

    /// Payload bytes still expected after a CIPSEND prompt
    payload_remaining: usize,

    /// Length of the current CIPSEND payload
    payload_length: usize,
}

impl ExampleSerial {
    fn respond(&mut self, response: &[u8]) {
        for byte in response {
            let _ = self.output.push_back(*byte);
        }
    }

    fn handle_line(&mut self) {
        let line = self.line.clone();
        self.line.clear();

        match line.as_slice() {
            b"AT+RST\r\n" => self.respond(b"\r\nOK\r\n\r\n ets Jan  8 2013,rst cause:2\r\nready\r\n"),
            b"AT+CWJAP?\r\n" => self.respond(b"+CWJAP:\"test_wifi\",\"10:fe:ed:05:ba:50\",1,-45\r\n\r\nOK\r\n"),
            b"AT+CIPCLOSE\r\n" => self.respond(b"CLOSED\r\n\r\nOK\r\n"),
            command if command.starts_with(b"AT+CWJAP=") => {
                self.respond(b"WIFI CONNECTED\r\nWIFI GOT IP\r\n\r\nOK\r\n")
            }
            command if command.starts_with(b"AT+CIPSTART=") => self.respond(b"CONNECT\r\n\r\nOK\r\n"),
            command if command.starts_with(b"AT+CIPSEND=") => {
                self.payload_length = Self::parse_length(&command[11..]);
                self.payload_remaining = self.payload_length;
                self.respond(b"\r\nOK\r\n> ");
            }
            _ => self.respond(b"\r\nOK\r\n"),
        }
    }

    fn handle_payload_byte(&mut self) {
        self.payload_remaining -= 1;

        if self.payload_remaining == 0 {
            self.respond(b"\r\nRecv ");
            let mut digits = [0x0; 20];
            let digits = Self::format_length(self.payload_length, &mut digits);
            self.respond(digits);
            self.respond(b" bytes\r\n\r\nSEND OK\r\n\r\n+IPD,16:nice to see you!");
        }
    }

    fn parse_length(digits: &[u8]) -> usize {
        digits
            .iter()
            .take_while(|byte| byte.is_ascii_digit())
            .fold(0, |length, digit| length * 10 + usize::from(digit - b'0'))
    }

    fn format_length(mut length: usize, buffer: &mut [u8; 20]) -> &[u8] {
        let mut position = buffer.len();

        loop {
            position -= 1;
            buffer[position] = b'0' + (length % 10) as u8;
            length /= 10;

            if length == 0 {
                return &buffer[position..];
            }
        }
    }
}

impl ErrorType for ExampleSerial {
    type Error = Infallible;
}

impl Read for ExampleSerial {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let mut length = 0;

        while length < buf.len() {
            match self.output.pop_front() {
                Some(byte) => buf[length] = byte,
                None => break,
            }
            length += 1;
        }

        Ok(length)
    }
}

impl ReadReady for ExampleSerial {
    fn read_ready(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.output.is_empty())
    }
}

impl Write for ExampleSerial {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        for byte in buf {
            if self.payload_remaining > 0 {
                self.handle_payload_byte();
                continue;
            }

            let _ = self.line.push(*byte);
            if *byte == b'\n' {
                self.handle_line();
            }
        }

        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Timer mock, which never elapses
#[derive(Default)]
pub struct ExampleTimer {}

impl Timer<1_000_000> for ExampleTimer {
    type Error = u32;

    fn now(&mut self) -> TimerInstantU32<1000000> {
        TimerInstantU32::from_ticks(0)
    }

    fn start(&mut self, _duration: TimerDurationU32<1000000>) -> Result<(), Self::Error> {
        Ok(())
    }

    fn cancel(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn wait(&mut self) -> nb::Result<(), Self::Error> {
        nb::Result::Err(nb::Error::WouldBlock)
    }
}
