//! # ESP8266 AT driver
//!
//! Driver for ESP8266 WIFI modules running the AT firmware, attached by a serial channel. The module is
//! used as WIFI station in single connection mode.
//!
//! The crate is `no_std` and does not allocate. Commands get encoded by [atat], while confirmations are
//! matched directly on the raw byte stream by incremental [scanners](scanner).
//!
//! ## Overview
//!
//! * [Driver](driver::Driver): Reset, access point and socket operations. Blocking steps take a
//!   [Deadline](deadline::Deadline), the driver does not own any clock.
//! * [Connection](connection::Connection): Scoped connection, closed when dropped.
//! * [Adapter](stack::Adapter): [embedded_nal::TcpClientStack] implementation backed by a [fugit_timer::Timer].
//!
//! ## Inbound data
//!
//! The module forwards received socket data unsolicited as `+IPD,<length>:<payload>` frames. The
//! [PacketManager](packet::PacketManager) locates these frames in the stream, so reads return just the
//! payload. Reads never block.
//!
//! ## Logging
//!
//! Enable the `log` feature for emitting log messages by the [log](https://docs.rs/log) crate. The
//! `defmt` feature adds [defmt](https://docs.rs/defmt) formatting of the error types.
#![cfg_attr(not(test), no_std)]
#![cfg_attr(feature = "strict", deny(warnings))]

#[macro_use]
mod fmt;

pub(crate) mod commands;
pub mod config;
pub mod connection;
pub mod deadline;
pub mod driver;
pub mod error;
pub mod packet;
pub(crate) mod responses;
pub mod scanner;
pub mod serial;
pub mod socket;
pub mod stack;
pub mod wifi;

#[cfg(feature = "examples")]
pub mod example;

#[cfg(test)]
mod tests;
