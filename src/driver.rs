//! # AT command driver
//!
//! [Driver] issues AT commands over the serial channel and waits for textual confirmations. Every
//! blocking operation takes a [Deadline], which is sampled once per polling iteration.
//!
//! Access point related operations are located in [wifi](crate::wifi), socket related ones in
//! [socket](crate::socket).
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
//!
//! // Joining the access point
//! driver.connect_to_ap("test_wifi", "secret", &mut deadline).unwrap();
//! assert!(driver.is_connected_to_ap(&mut deadline).unwrap());
//!
//! // Opening a TCP connection
//! driver.connect_to_server(&SocketConfig::tcp("example.com", 80), &mut deadline).unwrap();
//!
//! // Sending some data
//! driver.server_write(b"hallo!", &mut deadline).unwrap();
//!
//! // Receiving some data
//! let mut buffer = [0x0; 64];
//! let length = driver.server_read(&mut buffer).unwrap();
//! assert_eq!(b"nice to see you!", &buffer[..length]);
//!
//! // Closing the connection
//! driver.disconnect_from_server(&mut deadline).unwrap();
//! ````
use crate::commands::{DisableEchoCommand, ResetCommand};
use crate::config::Config;
use crate::deadline::Deadline;
use crate::error::Error;
use crate::packet::PacketManager;
use crate::scanner::{pipe, Find, Scanner};
use crate::serial::{read_byte, write_all, Configure, Serial, SerialSettings};
use atat::AtatCmd;

/// Size of the stack buffer commands get encoded into
const COMMAND_BUFFER_SIZE: usize = 256;

/// AT command driver of a single ESP8266 module
pub struct Driver<S: Serial> {
    /// Serial channel connected to the module
    pub(crate) serial: S,

    /// Confirmation literals and limits
    pub(crate) config: Config,

    /// Frame header state of inbound socket data
    pub(crate) packets: PacketManager,
}

impl<S: Serial> Driver<S> {
    /// Creates a new driver without touching the module
    pub fn new(serial: S, config: Config) -> Self {
        Self {
            serial,
            config,
            packets: PacketManager::new(),
        }
    }

    /// Creates a new driver and resets the module
    pub fn create<D: Deadline>(serial: S, config: Config, deadline: &mut D) -> Result<Self, Error<S::Error>> {
        let mut driver = Self::new(serial, config);
        driver.reset(deadline)?;

        Ok(driver)
    }

    /// Resets the module and disables the command echo
    pub fn reset<D: Deadline>(&mut self, deadline: &mut D) -> Result<(), Error<S::Error>> {
        self.send_command(&ResetCommand, deadline)?;
        self.wait_for(self.config.responses.ready, deadline)?;

        self.send_command(&DisableEchoCommand, deadline)?;
        self.wait_for_ok(deadline)?;

        self.packets.reset();
        Ok(())
    }

    /// Returns the driver configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Consumes the driver and returns the serial channel
    pub fn release(self) -> S {
        self.serial
    }

    /// Encodes and writes a single command
    pub(crate) fn send_command<Cmd: AtatCmd, D: Deadline>(
        &mut self,
        command: &Cmd,
        deadline: &mut D,
    ) -> Result<(), Error<S::Error>> {
        let mut buffer = [0x0; COMMAND_BUFFER_SIZE];
        let length = command.write(&mut buffer);

        debug!(
            "Sending command {:?}",
            core::str::from_utf8(&buffer[..length]).unwrap_or("<binary>").trim_end()
        );
        write_all(&mut self.serial, &buffer[..length], deadline)
    }

    /// Waits until the given literal was received
    pub(crate) fn wait_for<D: Deadline>(&mut self, pattern: &[u8], deadline: &mut D) -> Result<(), Error<S::Error>> {
        let mut find = Find::new(pattern);

        loop {
            if let Some(byte) = read_byte(&mut self.serial).map_err(Error::Serial)? {
                find.feed(byte);

                if find.is_finished() {
                    return Ok(());
                }
            }

            if let Err(timeout) = deadline.check() {
                warn!("Timeout while waiting for {:?}", core::str::from_utf8(pattern).unwrap_or("<binary>"));
                return Err(timeout.into());
            }
        }
    }

    /// Waits for the generic acknowledgement
    pub(crate) fn wait_for_ok<D: Deadline>(&mut self, deadline: &mut D) -> Result<(), Error<S::Error>> {
        self.wait_for(self.config.responses.ok, deadline)
    }

    /// Feeds every received byte both into the affirmative pipeline and the negative scanner until one
    /// of them finishes.
    ///
    /// Returns true if the affirmative pipeline finished first and false if the negative scanner
    /// finished first. If both finish on the same byte, the response is ambiguous.
    pub(crate) fn race<D: Deadline>(
        &mut self,
        affirmative: &mut [&mut dyn Scanner],
        negative: &mut dyn Scanner,
        deadline: &mut D,
    ) -> Result<bool, Error<S::Error>> {
        loop {
            if let Some(byte) = read_byte(&mut self.serial).map_err(Error::Serial)? {
                pipe(byte, affirmative);
                negative.feed(byte);
            }

            let confirmed = affirmative.last().map_or(true, |stage| stage.is_finished());
            match (confirmed, negative.is_finished()) {
                (true, false) => return Ok(true),
                (false, true) => return Ok(false),
                (true, true) => return Err(Error::UnexpectedResponse),
                (false, false) => deadline.check()?,
            }
        }
    }
}

impl<S: Serial + Configure> Driver<S> {
    /// Configures the serial channel to the factory settings of the module (115200 8N1), drops any
    /// pending output and resets the module.
    pub fn create_configured<D: Deadline>(
        mut serial: S,
        config: Config,
        deadline: &mut D,
    ) -> Result<Self, Error<S::Error>> {
        serial.configure(&SerialSettings::default()).map_err(Error::Serial)?;
        serial.flush().map_err(Error::Serial)?;

        Self::create(serial, config, deadline)
    }
}
