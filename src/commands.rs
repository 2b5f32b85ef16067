use crate::responses::NoResponse;
use atat::atat_derive::AtatCmd;
use atat::heapless::String;
use core::fmt::Write;
use core::net::Ipv4Addr;

/// Soft reset of the module. Completion is signaled by `ready`.
#[derive(Clone, AtatCmd)]
#[at_cmd("+RST", NoResponse)]
pub struct ResetCommand;

/// Disables the command echo
#[derive(Clone, AtatCmd)]
#[at_cmd("E0", NoResponse)]
pub struct DisableEchoCommand;

/// Sets the WIFI mode
#[derive(Clone, Default, AtatCmd)]
#[at_cmd("+CWMODE", NoResponse)]
pub struct WifiModeCommand {
    /// WIFI mode:
    ///     1: Station mode.
    ///     2: SoftAP mode.
    ///     3: SoftAP+Station mode.
    #[at_arg(position = 0)]
    mode: usize,
}

impl WifiModeCommand {
    pub fn station_mode() -> Self {
        Self { mode: 1 }
    }
}

/// Command for joining the target WIFI access point
#[derive(Clone, Default, AtatCmd)]
#[at_cmd("+CWJAP", NoResponse)]
pub struct AccessPointConnectCommand {
    /// The SSID of the target access point
    ssid: String<32>,

    /// The password/key of the target access point
    password: String<64>,
}

impl AccessPointConnectCommand {
    /// Returns None if SSID or password exceed the max. length
    pub fn new(ssid: &str, password: &str) -> Option<Self> {
        Some(Self {
            ssid: to_string(ssid)?,
            password: to_string(password)?,
        })
    }
}

/// Queries the access point the module is joined to
#[derive(Clone, AtatCmd)]
#[at_cmd("+CWJAP?", NoResponse)]
pub struct AccessPointStatusCommand;

/// Leaves the current access point
#[derive(Clone, AtatCmd)]
#[at_cmd("+CWQAP", NoResponse)]
pub struct AccessPointDisconnectCommand;

/// Sets a static station IP
#[derive(Clone, AtatCmd)]
#[at_cmd("+CIPSTA", NoResponse)]
pub struct SetStationAddressCommand {
    address: String<15>,
}

impl SetStationAddressCommand {
    pub fn new(address: Ipv4Addr) -> Self {
        let mut encoded = String::new();
        // "255.255.255.255" fits in 15 chars
        let _ = write!(encoded, "{}", address);
        Self { address: encoded }
    }
}

/// Sets the size of the SSL buffer
#[derive(Clone, AtatCmd)]
#[at_cmd("+CIPSSLSIZE", NoResponse)]
pub struct SslBufferSizeCommand {
    size: u16,
}

impl SslBufferSizeCommand {
    pub fn new(size: u16) -> Self {
        Self { size }
    }
}

/// Establish TCP Connection, UDP Transmission, or SSL Connection
#[derive(Clone, AtatCmd)]
#[at_cmd("+CIPSTART", NoResponse)]
pub struct ConnectCommand {
    /// Connection type: TCP, UDP or SSL
    connection_type: String<3>,

    /// Remote domain or IP address
    remote_host: String<128>,

    /// Remote port
    port: u16,
}

impl ConnectCommand {
    /// Returns None if the remote host exceeds the max. length
    pub fn new(connection_type: &str, remote_host: &str, port: u16) -> Option<Self> {
        Some(Self {
            connection_type: to_string(connection_type)?,
            remote_host: to_string(remote_host)?,
            port,
        })
    }
}

/// Announces the length of the following payload. Gets confirmed by `>`.
#[derive(Clone, AtatCmd)]
#[at_cmd("+CIPSEND", NoResponse)]
pub struct TransmissionPrepareCommand {
    length: usize,
}

impl TransmissionPrepareCommand {
    pub fn new(length: usize) -> Self {
        Self { length }
    }
}

/// Queries the link status
#[derive(Clone, AtatCmd)]
#[at_cmd("+CIPSTATUS", NoResponse)]
pub struct StatusCommand;

/// Closes the single connection
#[derive(Clone, AtatCmd)]
#[at_cmd("+CIPCLOSE", NoResponse)]
pub struct CloseSocketCommand;

/// Copies the value to a fixed-capacity string. Returns None if the value does not fit.
fn to_string<const N: usize>(value: &str) -> Option<String<N>> {
    let mut string = String::new();
    string.push_str(value).ok()?;
    Some(string)
}
