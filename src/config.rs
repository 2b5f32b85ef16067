//! # Driver configuration
//!
//! Confirmation literals and limits are bundled to a [Config] record, which is handed to the
//! [Driver](crate::driver::Driver) on construction.

/// Default baud rate of the ESP8266 AT firmware
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// Max. payload size of a single CIPSEND command
pub const MAX_TRANSMIT_SIZE: usize = 2048;

/// Max. payload size of a single `+IPD` frame (TCP MSS)
pub const MAX_RECEIVE_FRAME_SIZE: usize = 1460;

/// Max. length of an access point SSID
pub const SSID_MAX_LENGTH: usize = 32;

/// Max. length of an access point password
pub const PASSWORD_MAX_LENGTH: usize = 64;

/// Max. length of a remote domain or IP address
pub const DOMAIN_MAX_LENGTH: usize = 128;

/// Literals the driver waits for
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Responses {
    /// Generic command acknowledgement
    pub ok: &'static [u8],

    /// Module finished a reset
    pub ready: &'static [u8],

    /// Prefix of the access point status line, only present if joined
    pub ap_connected: &'static [u8],

    /// Module is ready to receive the CIPSEND payload
    pub prompt: &'static [u8],

    /// CIPSEND payload was transmitted
    pub send_finished: &'static [u8],

    /// Start of an inbound data frame
    pub start_of_packet: &'static [u8],

    /// Link status line of CIPSTATUS
    pub status: &'static [u8],

    /// Prefix of a connection line of CIPSTATUS, only present if a socket is connected
    pub socket_status: &'static [u8],
}

impl Default for Responses {
    fn default() -> Self {
        Self {
            ok: b"OK\r\n",
            ready: b"ready\r\n",
            ap_connected: b"+CWJAP:",
            prompt: b">",
            send_finished: b"SEND OK\r\n",
            start_of_packet: b"+IPD,",
            status: b"STATUS",
            socket_status: b"+CIPSTATUS:",
        }
    }
}

/// Driver configuration
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub responses: Responses,

    /// Max. payload size of a single CIPSEND command
    pub max_transmit_size: usize,

    /// SSL buffer size set before opening SSL connections
    pub ssl_buffer_size: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            responses: Responses::default(),
            max_transmit_size: MAX_TRANSMIT_SIZE,
            ssl_buffer_size: 4096,
        }
    }
}

impl Config {
    /// Sets the max. CIPSEND payload size. Values above [MAX_TRANSMIT_SIZE] are clamped, zero is raised to one.
    pub fn with_max_transmit_size(mut self, size: usize) -> Self {
        self.max_transmit_size = size.clamp(1, MAX_TRANSMIT_SIZE);
        self
    }

    pub fn with_ssl_buffer_size(mut self, size: u16) -> Self {
        self.ssl_buffer_size = size;
        self
    }

    pub fn with_responses(mut self, responses: Responses) -> Self {
        self.responses = responses;
        self
    }
}
