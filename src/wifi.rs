//! # WIFI access point client
//!
//! Joining a network, querying the join state and setting a static IP is supported.
//!
//! Note: If the connection was not successful or is lost, the ESP8266 will try independently from time
//! to time to establish connection to the network. The status can be queried using
//! [is_connected_to_ap](Driver::is_connected_to_ap).
use crate::commands::{
    AccessPointConnectCommand, AccessPointDisconnectCommand, AccessPointStatusCommand, SetStationAddressCommand,
    WifiModeCommand,
};
use crate::config::{PASSWORD_MAX_LENGTH, SSID_MAX_LENGTH};
use crate::deadline::Deadline;
use crate::driver::Driver;
use crate::error::Error;
use crate::scanner::Find;
use crate::serial::Serial;
use core::net::Ipv4Addr;

impl<S: Serial> Driver<S> {
    /// Switches to station mode and joins the given access point.
    ///
    /// Credentials are not validated, besides checking that they fit into the command.
    pub fn connect_to_ap<D: Deadline>(
        &mut self,
        ssid: &str,
        password: &str,
        deadline: &mut D,
    ) -> Result<(), Error<S::Error>> {
        if ssid.len() > SSID_MAX_LENGTH {
            return Err(Error::InvalidSsidLength);
        }

        if password.len() > PASSWORD_MAX_LENGTH {
            return Err(Error::InvalidPasswordLength);
        }

        self.send_command(&WifiModeCommand::station_mode(), deadline)?;
        self.wait_for_ok(deadline)?;

        let command = AccessPointConnectCommand::new(ssid, password).ok_or(Error::InvalidSsidLength)?;
        self.send_command(&command, deadline)?;
        self.wait_for_ok(deadline)
    }

    /// Sets a static IP address of the station interface
    pub fn set_ip_address<D: Deadline>(&mut self, address: Ipv4Addr, deadline: &mut D) -> Result<(), Error<S::Error>> {
        self.send_command(&SetStationAddressCommand::new(address), deadline)?;
        self.wait_for_ok(deadline)
    }

    /// Returns true if the module is currently joined to an access point
    ///
    /// If joined, the module answers with an `+CWJAP:` line followed by `OK`. Otherwise just `OK` (or
    /// `No AP` + `OK`) is received.
    pub fn is_connected_to_ap<D: Deadline>(&mut self, deadline: &mut D) -> Result<bool, Error<S::Error>> {
        self.send_command(&AccessPointStatusCommand, deadline)?;

        let mut find_confirm = Find::new(self.config.responses.ap_connected);
        let mut find_ok = Find::new(self.config.responses.ok);

        if self.race(&mut [&mut find_confirm], &mut find_ok, deadline)? {
            // Consuming the remaining response
            self.wait_for_ok(deadline)?;
            return Ok(true);
        }

        Ok(false)
    }

    /// Leaves the current access point
    pub fn disconnect_from_ap<D: Deadline>(&mut self, deadline: &mut D) -> Result<(), Error<S::Error>> {
        self.send_command(&AccessPointDisconnectCommand, deadline)?;
        self.wait_for_ok(deadline)
    }
}
