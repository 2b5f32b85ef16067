//! # Single connection socket operations
//!
//! The module is used in single connection mode, so at most one TCP, UDP or SSL connection is open at
//! a time.
//!
//! Inbound data is received as `+IPD,<length>:<payload>` frames. [server_read](Driver::server_read)
//! reassembles the payload of consecutive frames into the caller buffer, independent of frame and
//! buffer sizes. It never blocks but returns whatever payload is available right now.
use crate::commands::{
    CloseSocketCommand, ConnectCommand, SslBufferSizeCommand, StatusCommand, TransmissionPrepareCommand,
};
use crate::config::DOMAIN_MAX_LENGTH;
use crate::deadline::Deadline;
use crate::driver::Driver;
use crate::error::Error;
use crate::scanner::{pipe, Find, ParseUnsigned, Scanner};
use crate::serial::{read_byte, write_all, Serial};

/// Transport protocol of a connection
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SocketType {
    Tcp,
    Udp,
    Ssl,
}

impl SocketType {
    /// Connection type argument of CIPSTART
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            SocketType::Tcp => "TCP",
            SocketType::Udp => "UDP",
            SocketType::Ssl => "SSL",
        }
    }

    /// Port used if none is given
    pub fn default_port(&self) -> u16 {
        match self {
            SocketType::Tcp | SocketType::Udp => 80,
            SocketType::Ssl => 443,
        }
    }
}

/// Remote end of a connection. The domain is resolved by the module.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SocketConfig<'a> {
    pub socket_type: SocketType,
    pub domain: &'a str,
    pub port: u16,
}

impl<'a> SocketConfig<'a> {
    pub fn new(socket_type: SocketType, domain: &'a str, port: u16) -> Self {
        Self {
            socket_type,
            domain,
            port,
        }
    }

    pub fn tcp(domain: &'a str, port: u16) -> Self {
        Self::new(SocketType::Tcp, domain, port)
    }

    pub fn udp(domain: &'a str, port: u16) -> Self {
        Self::new(SocketType::Udp, domain, port)
    }

    pub fn ssl(domain: &'a str, port: u16) -> Self {
        Self::new(SocketType::Ssl, domain, port)
    }

    /// Config using the default port of the socket type
    pub fn with_default_port(socket_type: SocketType, domain: &'a str) -> Self {
        Self::new(socket_type, domain, socket_type.default_port())
    }
}

/// Link status reported by CIPSTATUS
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LinkStatus {
    /// Joined to an access point and got an IP
    GotIp,
    /// A connection is open
    Connected,
    /// The connection was closed
    Disconnected,
    /// Not joined to an access point
    NoAccessPoint,
    /// Status code not known by this driver
    Unknown(u32),
}

impl From<u32> for LinkStatus {
    fn from(code: u32) -> Self {
        match code {
            2 => LinkStatus::GotIp,
            3 => LinkStatus::Connected,
            4 => LinkStatus::Disconnected,
            5 => LinkStatus::NoAccessPoint,
            _ => LinkStatus::Unknown(code),
        }
    }
}

impl<S: Serial> Driver<S> {
    /// Opens a connection to the given remote
    ///
    /// For SSL connections the SSL buffer size is configured first.
    pub fn connect_to_server<D: Deadline>(
        &mut self,
        config: &SocketConfig<'_>,
        deadline: &mut D,
    ) -> Result<(), Error<S::Error>> {
        if config.domain.len() > DOMAIN_MAX_LENGTH {
            return Err(Error::InvalidDomainLength);
        }

        if config.socket_type == SocketType::Ssl {
            self.send_command(&SslBufferSizeCommand::new(self.config.ssl_buffer_size), deadline)?;
            self.wait_for_ok(deadline)?;
        }

        let command = ConnectCommand::new(config.socket_type.as_str(), config.domain, config.port)
            .ok_or(Error::InvalidDomainLength)?;
        self.send_command(&command, deadline)?;
        self.wait_for_ok(deadline)?;

        self.packets.reset();
        Ok(())
    }

    /// Sends the given data and returns the length sent.
    ///
    /// Data exceeding the max. transmit size is rejected by [Error::PayloadTooLarge], s.
    /// [Config::max_transmit_size](crate::config::Config::max_transmit_size). If the start of an inbound
    /// frame is received before the transmission was confirmed, the frame header state is updated, so
    /// the payload can be read by [server_read](Self::server_read).
    pub fn server_write<D: Deadline>(&mut self, data: &[u8], deadline: &mut D) -> Result<usize, Error<S::Error>> {
        if data.len() > self.config.max_transmit_size {
            return Err(Error::PayloadTooLarge);
        }

        // CIPSEND does not accept zero length
        if data.is_empty() {
            return Ok(0);
        }

        self.send_command(&TransmissionPrepareCommand::new(data.len()), deadline)?;
        self.wait_for(self.config.responses.prompt, deadline)?;
        write_all(&mut self.serial, data, deadline)?;

        let mut find_packet = Find::new(self.config.responses.start_of_packet);
        let mut find_send_finished = Find::new(self.config.responses.send_finished);

        if self.race(&mut [&mut find_packet], &mut find_send_finished, deadline)? {
            trace!("Inbound frame started before transmission was confirmed");
            self.packets.expect_length();
        }

        Ok(data.len())
    }

    /// Reads the payload of inbound frames into the buffer and returns the number of bytes read.
    ///
    /// Data is read until the buffer is full or no more data is available right now. Frames are
    /// concatenated, and frames larger than the buffer are continued by the next call.
    pub fn server_read(&mut self, buffer: &mut [u8]) -> Result<usize, Error<S::Error>> {
        let mut buffer = Buffer::new(buffer);

        while !buffer.is_full() {
            self.packets.find(&mut self.serial).map_err(Error::Serial)?;
            let read = self
                .packets
                .read_packet(&mut self.serial, buffer.remaining_mut())
                .map_err(Error::Serial)?;

            if read == 0 {
                break;
            }

            buffer.advance(read);
        }

        Ok(buffer.len())
    }

    /// Returns true if a connection is currently open
    ///
    /// The module answers with a `STATUS:<n>` line, followed by a `+CIPSTATUS:` line for an open
    /// connection, followed by `OK`.
    pub fn is_connected_to_server<D: Deadline>(&mut self, deadline: &mut D) -> Result<bool, Error<S::Error>> {
        self.send_command(&StatusCommand, deadline)?;

        let mut find_status = Find::new(self.config.responses.status);
        let mut find_start = Find::new(self.config.responses.socket_status);
        let mut find_ok = Find::new(self.config.responses.ok);

        if self.race(&mut [&mut find_status, &mut find_start], &mut find_ok, deadline)? {
            // Consuming the remaining response
            self.wait_for_ok(deadline)?;
            return Ok(true);
        }

        Ok(false)
    }

    /// Queries the link status
    pub fn server_status<D: Deadline>(&mut self, deadline: &mut D) -> Result<LinkStatus, Error<S::Error>> {
        self.send_command(&StatusCommand, deadline)?;

        let mut find_status = Find::new(self.config.responses.status);
        let mut find_colon = Find::new(b":");
        let mut code = ParseUnsigned::new();

        loop {
            if let Some(byte) = read_byte(&mut self.serial).map_err(Error::Serial)? {
                pipe(byte, &mut [&mut find_status, &mut find_colon, &mut code]);
            }

            if code.is_finished() {
                break;
            }

            deadline.check()?;
        }

        // Response is consumed up to OK in any case, so it's not confused with the next confirmation
        self.wait_for_ok(deadline)?;
        let code = code.value().ok_or(Error::UnexpectedResponse)?;

        Ok(LinkStatus::from(code))
    }

    /// Closes the current connection
    pub fn disconnect_from_server<D: Deadline>(&mut self, deadline: &mut D) -> Result<(), Error<S::Error>> {
        self.packets.reset();
        self.send_command(&CloseSocketCommand, deadline)?;
        self.wait_for_ok(deadline)
    }
}

/// Helper for filling receive buffer
pub(crate) struct Buffer<'a> {
    buffer: &'a mut [u8],

    /// Next buffer index to start inserting data
    position: usize,
}

impl<'a> Buffer<'a> {
    pub fn new(buffer: &'a mut [u8]) -> Self {
        Self { buffer, position: 0 }
    }

    /// Returns the unfilled part of the buffer
    pub fn remaining_mut(&mut self) -> &mut [u8] {
        &mut self.buffer[self.position..]
    }

    /// Marks the given number of bytes as filled
    pub fn advance(&mut self, length: usize) {
        self.position = (self.position + length).min(self.buffer.len());
    }

    /// Returns true if the buffer is completely filled
    pub fn is_full(&self) -> bool {
        self.position >= self.buffer.len()
    }

    /// Returns the current fill length
    pub fn len(&self) -> usize {
        self.position
    }
}
