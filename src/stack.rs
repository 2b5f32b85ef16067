//! # TCP client stack
//!
//! [Adapter] implements [TcpClientStack] of [embedded_nal] on top of the [Driver]. The module runs in
//! single connection mode, so just one socket may exist at a time.
//!
//! Blocking steps are limited by a timeout, measured by the given [Timer]. Defaults to five seconds.
//!
//! ## Example
//!
//! ````
//! # use core::str::FromStr;
//! # use embedded_nal::TcpClientStack;
//! # use esp8266_at::config::Config;
//! # use esp8266_at::driver::Driver;
//! # use esp8266_at::example::{ExampleSerial, ExampleTimer};
//! # use esp8266_at::stack::Adapter;
//! # use core::net::SocketAddr;
//! #
//! let driver = Driver::new(ExampleSerial::default(), Config::default());
//! let mut adapter: Adapter<_, _, 1_000_000> = Adapter::new(driver, ExampleTimer::default());
//!
//! // Creating a TCP connection
//! let mut socket = adapter.socket().unwrap();
//! adapter.connect(&mut socket, SocketAddr::from_str("10.0.0.1:21").unwrap()).unwrap();
//!
//! // Sending some data
//! adapter.send(&mut socket, b"hallo!").unwrap();
//!
//! // Receiving some data
//! let mut rx_buffer = [0x0; 64];
//! let length = adapter.receive(&mut socket, &mut rx_buffer).unwrap();
//! assert_eq!(16, length);
//! assert_eq!(b"nice to see you!", &rx_buffer[..16]);
//!
//! // Closing socket
//! adapter.close(socket).unwrap();
//! ````
use crate::deadline::TimerDeadline;
use crate::driver::Driver;
use crate::error::Error as DriverError;
use crate::serial::Serial;
use crate::socket::SocketConfig;
use core::fmt::Write;
use core::net::SocketAddr;
use embedded_nal::{TcpClientStack, TcpError, TcpErrorKind};
use fugit::{ExtU32, TimerDurationU32};
use fugit_timer::Timer;
use heapless::String;

/// Socket of the single connection
#[derive(Debug)]
pub struct Socket {
    _private: (),
}

/// Internal connection state
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub(crate) enum SocketState {
    /// Socket may be (re)used
    #[default]
    Closed,
    /// Socket was returned by socket() but is not connected yet
    Open,
    /// Connection is fully open
    Connected,
}

/// Network related errors
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error<E> {
    /// Driver error
    Driver(DriverError<E>),

    /// No socket available, since just a single connection is supported.
    NoSocketAvailable,

    /// Given socket is already connected to another remote. Socket needs to be closed first.
    AlreadyConnected,

    /// Unable to send data if socket is not connected
    SocketUnconnected,

    /// IPv6 remotes are not supported
    UnsupportedAddress,

    /// Upstream timer error
    TimerError,
}

impl<E> From<DriverError<E>> for Error<E> {
    fn from(error: DriverError<E>) -> Self {
        Self::Driver(error)
    }
}

impl<E: core::fmt::Debug> TcpError for Error<E> {
    fn kind(&self) -> TcpErrorKind {
        match self {
            Error::SocketUnconnected => TcpErrorKind::PipeClosed,
            _ => TcpErrorKind::Other,
        }
    }
}

#[cfg(feature = "defmt")]
impl<E: defmt::Format> defmt::Format for Error<E> {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::Driver(e) => defmt::write!(f, "Error::Driver({})", e),
            Error::NoSocketAvailable => defmt::write!(f, "Error::NoSocketAvailable"),
            Error::AlreadyConnected => defmt::write!(f, "Error::AlreadyConnected"),
            Error::SocketUnconnected => defmt::write!(f, "Error::SocketUnconnected"),
            Error::UnsupportedAddress => defmt::write!(f, "Error::UnsupportedAddress"),
            Error::TimerError => defmt::write!(f, "Error::TimerError"),
        }
    }
}

/// Network stack of a single ESP8266 module
pub struct Adapter<S: Serial, T: Timer<TIMER_HZ>, const TIMER_HZ: u32> {
    /// AT command driver
    pub(crate) driver: Driver<S>,

    /// Timer used for timeout measurement
    pub(crate) timer: T,

    /// Timeout of a single blocking operation
    pub(crate) timeout: TimerDurationU32<TIMER_HZ>,

    /// State of the single socket
    pub(crate) state: SocketState,
}

impl<S: Serial, T: Timer<TIMER_HZ>, const TIMER_HZ: u32> Adapter<S, T, TIMER_HZ> {
    /// Creates a new network adapter. The driver is expected to be reset and joined already.
    pub fn new(driver: Driver<S>, timer: T) -> Self {
        Self {
            driver,
            timer,
            timeout: 5_000.millis(),
            state: SocketState::Closed,
        }
    }

    /// Sets the timeout of blocking operations in ms
    pub fn set_timeout_ms(&mut self, timeout: u32) {
        self.timeout = TimerDurationU32::millis(timeout);
    }

    /// Returns the underlying driver, e.g. for joining an access point
    pub fn driver(&mut self) -> &mut Driver<S> {
        &mut self.driver
    }

    /// Consumes the adapter and returns driver and timer
    pub fn release(self) -> (Driver<S>, T) {
        (self.driver, self.timer)
    }

    /// Starts the timer for a single blocking operation
    fn start_deadline(
        timer: &mut T,
        timeout: TimerDurationU32<TIMER_HZ>,
    ) -> Result<TimerDeadline<'_, T, TIMER_HZ>, Error<S::Error>> {
        TimerDeadline::start(timer, timeout).map_err(|_| Error::TimerError)
    }

    /// Returns true if the socket is currently connected. Queries the module, so connection aborts by
    /// the remote side are taken into account.
    pub fn is_connected(&mut self, _socket: &Socket) -> Result<bool, Error<S::Error>> {
        if self.state != SocketState::Connected {
            return Ok(false);
        }

        let mut deadline = Self::start_deadline(&mut self.timer, self.timeout)?;
        let connected = self.driver.is_connected_to_server(&mut deadline)?;

        if !connected {
            self.state = SocketState::Open;
        }

        Ok(connected)
    }
}

impl<S: Serial, T: Timer<TIMER_HZ>, const TIMER_HZ: u32> TcpClientStack for Adapter<S, T, TIMER_HZ> {
    type TcpSocket = Socket;
    type Error = Error<S::Error>;

    /// Returns the single socket. If the socket is already in use [Error::NoSocketAvailable] is returned.
    fn socket(&mut self) -> Result<Self::TcpSocket, Self::Error> {
        if self.state != SocketState::Closed {
            return Err(Error::NoSocketAvailable);
        }

        self.state = SocketState::Open;
        Ok(Socket { _private: () })
    }

    /// Opens a new TCP connection. Just IPv4 remotes are supported.
    /// Returns [Error::AlreadyConnected] if socket is already connected.
    fn connect(&mut self, _socket: &mut Socket, remote: SocketAddr) -> nb::Result<(), Self::Error> {
        if self.state == SocketState::Connected {
            return nb::Result::Err(nb::Error::Other(Error::AlreadyConnected));
        }

        let address = match remote {
            SocketAddr::V4(address) => address,
            SocketAddr::V6(_) => return nb::Result::Err(nb::Error::Other(Error::UnsupportedAddress)),
        };

        // "255.255.255.255" fits in 15 chars
        let mut host: String<15> = String::new();
        if write!(host, "{}", address.ip()).is_err() {
            return nb::Result::Err(nb::Error::Other(Error::UnsupportedAddress));
        }

        let mut deadline = Self::start_deadline(&mut self.timer, self.timeout)?;
        self.driver
            .connect_to_server(&SocketConfig::tcp(host.as_str(), address.port()), &mut deadline)
            .map_err(Error::Driver)?;

        self.state = SocketState::Connected;
        nb::Result::Ok(())
    }

    /// Sends the given buffer and returns the length (in bytes) sent.
    /// The data is divided into blocks of the max. transmit size.
    fn send(&mut self, _socket: &mut Socket, buffer: &[u8]) -> nb::Result<usize, Error<S::Error>> {
        if self.state != SocketState::Connected {
            return nb::Result::Err(nb::Error::Other(Error::SocketUnconnected));
        }

        let chunk_size = self.driver.config.max_transmit_size.max(1);

        for chunk in buffer.chunks(chunk_size) {
            let mut deadline = Self::start_deadline(&mut self.timer, self.timeout)?;
            self.driver.server_write(chunk, &mut deadline).map_err(Error::Driver)?;
        }

        nb::Result::Ok(buffer.len())
    }

    /// Receives data (if available) and writes it to the given buffer.
    /// Returns [nb::Error::WouldBlock] if no data is available right now.
    fn receive(&mut self, _socket: &mut Self::TcpSocket, buffer: &mut [u8]) -> nb::Result<usize, Self::Error> {
        if self.state != SocketState::Connected {
            return nb::Result::Err(nb::Error::Other(Error::SocketUnconnected));
        }

        match self.driver.server_read(buffer).map_err(Error::Driver)? {
            0 if !buffer.is_empty() => nb::Result::Err(nb::Error::WouldBlock),
            length => nb::Result::Ok(length),
        }
    }

    /// Closes the socket
    ///
    /// If the socket is not connected, no command is sent to the module but just the internal state is
    /// reset. In case of an error the socket is internally set to closed nevertheless, as it is consumed.
    fn close(&mut self, _socket: Self::TcpSocket) -> Result<(), Self::Error> {
        let state = self.state;
        self.state = SocketState::Closed;

        if state != SocketState::Connected {
            return Ok(());
        }

        let mut deadline = Self::start_deadline(&mut self.timer, self.timeout)?;
        self.driver.disconnect_from_server(&mut deadline)?;
        Ok(())
    }
}
