//! # Scoped connection
//!
//! [Connection] borrows the driver for the lifetime of a single connection. Dropping an open
//! connection writes a best-effort close command without waiting for a confirmation.
//!
//! ## Example
//!
//! ````
//! # use esp8266_at::config::Config;
//! # use esp8266_at::deadline::NeverTimeout;
//! # use esp8266_at::driver::Driver;
//! # use esp8266_at::example::ExampleSerial;
//! # use esp8266_at::socket::SocketConfig;
//! #
//! let mut deadline = NeverTimeout;
//! let mut driver = Driver::create(ExampleSerial::default(), Config::default(), &mut deadline).unwrap();
//! driver.connect_to_ap("test_wifi", "secret", &mut deadline).unwrap();
//!
//! let mut connection = driver.connect(&SocketConfig::tcp("example.com", 80), &mut deadline).unwrap();
//! connection.write(b"hallo!", &mut deadline).unwrap();
//!
//! let mut buffer = [0x0; 8];
//! let mut received = [0x0; 16];
//! let mut length = 0;
//!
//! // Payload is continued across multiple reads
//! while length < received.len() {
//!     let read = connection.read(&mut buffer).unwrap();
//!     received[length..length + read].copy_from_slice(&buffer[..read]);
//!     length += read;
//! }
//!
//! assert_eq!(b"nice to see you!", &received);
//! connection.close(&mut deadline).unwrap();
//! ````
use crate::commands::CloseSocketCommand;
use crate::deadline::{Deadline, PollLimit};
use crate::driver::Driver;
use crate::error::Error;
use crate::serial::Serial;
use crate::socket::SocketConfig;

/// Max. polls for writing the close command when dropping an open connection
const DROP_CLOSE_POLL_LIMIT: usize = 1_000;

/// Open connection to a remote. Closed when dropped.
pub struct Connection<'d, S: Serial> {
    pub(crate) driver: &'d mut Driver<S>,

    /// False once closed or detached
    open: bool,
}

impl<S: Serial> Driver<S> {
    /// Opens a connection, which is closed once the returned handle is dropped
    pub fn connect<D: Deadline>(
        &mut self,
        config: &SocketConfig<'_>,
        deadline: &mut D,
    ) -> Result<Connection<'_, S>, Error<S::Error>> {
        self.connect_to_server(config, deadline)?;

        Ok(Connection {
            driver: self,
            open: true,
        })
    }
}

impl<S: Serial> Connection<'_, S> {
    /// Sends all data. Data larger than the max. transmit size is split into multiple transmissions.
    pub fn write<D: Deadline>(&mut self, data: &[u8], deadline: &mut D) -> Result<usize, Error<S::Error>> {
        let chunk_size = self.driver.config.max_transmit_size.max(1);

        for chunk in data.chunks(chunk_size) {
            self.driver.server_write(chunk, deadline)?;
        }

        Ok(data.len())
    }

    /// Reads the payload available right now. Returns zero if no data is pending.
    pub fn read(&mut self, buffer: &mut [u8]) -> Result<usize, Error<S::Error>> {
        self.driver.server_read(buffer)
    }

    /// Returns true if the module still reports an open connection
    pub fn is_connected<D: Deadline>(&mut self, deadline: &mut D) -> Result<bool, Error<S::Error>> {
        self.driver.is_connected_to_server(deadline)
    }

    /// Closes the connection and waits for the confirmation
    pub fn close<D: Deadline>(mut self, deadline: &mut D) -> Result<(), Error<S::Error>> {
        self.open = false;
        self.driver.disconnect_from_server(deadline)
    }

    /// Releases the handle without closing the connection
    pub fn detach(mut self) {
        self.open = false;
    }
}

impl<S: Serial> Drop for Connection<'_, S> {
    fn drop(&mut self) {
        if !self.open {
            return;
        }

        debug!("Closing dropped connection");
        self.driver.packets.reset();
        let _ = self
            .driver
            .send_command(&CloseSocketCommand, &mut PollLimit::new(DROP_CLOSE_POLL_LIMIT));
    }
}
