use crate::config::Config;
use crate::deadline::{NeverTimeout, PollLimit};
use crate::driver::Driver;
use crate::error::Error;
use crate::scanner::Find;
use crate::serial::{Parity, SerialSettings, StopBits};
use crate::tests::mock::MockSerial;
use embedded_io::ErrorKind;

type DriverType = Driver<MockSerial>;

fn add_reset_responses(serial: &mut MockSerial) {
    serial.add_response(b"\r\nOK\r\n\r\n ets Jan  8 2013,rst cause:2\r\n\r\nready\r\n");
    serial.add_response(b"ATE0\r\n\r\nOK\r\n");
}

#[test]
fn test_create_resets_module() {
    let mut serial = MockSerial::new();
    add_reset_responses(&mut serial);

    let driver = DriverType::create(serial, Config::default(), &mut NeverTimeout).unwrap();

    let serial = driver.release();
    assert_eq!("AT+RST\r\nATE0\r\n", serial.get_written_as_string());
    assert_eq!(0, serial.pending());
}

#[test]
fn test_new_does_not_touch_module() {
    let driver = DriverType::new(MockSerial::new(), Config::default());
    assert_eq!(&Config::default(), driver.config());

    let serial = driver.release();
    assert!(serial.get_written().is_empty());
}

#[test]
fn test_reset_timeout_without_ready() {
    let mut serial = MockSerial::new();
    serial.add_ok_response();

    let mut driver = DriverType::new(serial, Config::default());
    let error = driver.reset(&mut PollLimit::new(100)).unwrap_err();

    assert_eq!(Error::Timeout, error);
    assert_eq!("AT+RST\r\n", driver.serial.get_written_as_string());
}

#[test]
fn test_reset_timeout_without_echo_confirmation() {
    let mut serial = MockSerial::new();
    serial.add_response(b"ready\r\n");

    let mut driver = DriverType::new(serial, Config::default());
    let error = driver.reset(&mut PollLimit::new(100)).unwrap_err();

    assert_eq!(Error::Timeout, error);
    assert_eq!("AT+RST\r\nATE0\r\n", driver.serial.get_written_as_string());
}

#[test]
fn test_reset_clears_packet_state() {
    let mut serial = MockSerial::new();
    add_reset_responses(&mut serial);

    let mut driver = DriverType::new(serial, Config::default());
    driver.packets.expect_length();
    driver.reset(&mut NeverTimeout).unwrap();

    assert!(!driver.packets.is_complete_header());
    assert_eq!(crate::packet::State::ExpectPlus, driver.packets.state);
}

#[test]
fn test_create_configured() {
    let mut serial = MockSerial::new();
    add_reset_responses(&mut serial);

    let driver = DriverType::create_configured(serial, Config::default(), &mut NeverTimeout).unwrap();
    let serial = driver.release();

    let settings = serial.settings.unwrap();
    assert_eq!(SerialSettings::default(), settings);
    assert_eq!(115_200, settings.baud_rate);
    assert_eq!(8, settings.data_bits);
    assert_eq!(Parity::None, settings.parity);
    assert_eq!(StopBits::One, settings.stop_bits);
    assert!(serial.flush_count > 0);
}

#[test]
fn test_send_command_partial_writes() {
    let mut serial = MockSerial::new();
    serial.limit_writes(3);

    let mut driver = DriverType::new(serial, Config::default());
    driver
        .send_command(&crate::commands::ResetCommand, &mut NeverTimeout)
        .unwrap();

    assert_eq!("AT+RST\r\n", driver.serial.get_written_as_string());
}

#[test]
fn test_send_command_partial_writes_timeout() {
    let mut serial = MockSerial::new();
    serial.limit_writes(3);

    let mut driver = DriverType::new(serial, Config::default());
    let error = driver
        .send_command(&crate::commands::ResetCommand, &mut PollLimit::new(1))
        .unwrap_err();

    assert_eq!(Error::Timeout, error);
    assert_eq!("AT+RST", driver.serial.get_written_as_string());
}

#[test]
fn test_send_command_serial_error() {
    let mut serial = MockSerial::new();
    serial.fail_next_write();

    let mut driver = DriverType::new(serial, Config::default());
    let error = driver
        .send_command(&crate::commands::ResetCommand, &mut NeverTimeout)
        .unwrap_err();

    assert_eq!(Error::Serial(ErrorKind::Other), error);
}

#[test]
fn test_wait_for_skips_unrelated_output() {
    let mut serial = MockSerial::new();
    serial.add_response(b"WIFI DISCONNECT\r\nbusy p...\r\n\r\nOK\r\nmore");

    let mut driver = DriverType::new(serial, Config::default());
    driver.wait_for_ok(&mut NeverTimeout).unwrap();

    // Bytes after the confirmation are left untouched
    assert_eq!(4, driver.serial.pending());
}

#[test]
fn test_wait_for_checks_deadline_per_iteration() {
    let mut driver = DriverType::new(MockSerial::new(), Config::default());

    let mut checks = 0;
    let error = driver
        .wait_for_ok(&mut || {
            checks += 1;
            match checks {
                5 => Err(crate::deadline::Timeout),
                _ => Ok(()),
            }
        })
        .unwrap_err();

    assert_eq!(Error::Timeout, error);
    assert_eq!(5, checks);
}

#[test]
fn test_wait_for_read_error() {
    let mut serial = MockSerial::new();
    serial.add_ok_response();
    serial.fail_next_read();

    let mut driver = DriverType::new(serial, Config::default());
    let error = driver.wait_for_ok(&mut NeverTimeout).unwrap_err();

    assert_eq!(Error::Serial(ErrorKind::Other), error);
}

#[test]
fn test_race_affirmative_first() {
    let mut serial = MockSerial::new();
    serial.add_response(b"+CWJAP:\"test_wifi\"\r\n\r\nOK\r\n");

    let mut driver = DriverType::new(serial, Config::default());
    let mut affirmative = Find::new(b"+CWJAP:");
    let mut negative = Find::new(b"OK\r\n");

    assert!(driver
        .race(&mut [&mut affirmative], &mut negative, &mut NeverTimeout)
        .unwrap());
}

#[test]
fn test_race_negative_first() {
    let mut serial = MockSerial::new();
    serial.add_response(b"No AP\r\n\r\nOK\r\n");

    let mut driver = DriverType::new(serial, Config::default());
    let mut affirmative = Find::new(b"+CWJAP:");
    let mut negative = Find::new(b"OK\r\n");

    assert!(!driver
        .race(&mut [&mut affirmative], &mut negative, &mut NeverTimeout)
        .unwrap());
}

#[test]
fn test_race_ambiguous() {
    let mut serial = MockSerial::new();
    serial.add_response(b"\r\nOK\r\n");

    let mut driver = DriverType::new(serial, Config::default());
    let mut affirmative = Find::new(b"OK");
    let mut negative = Find::new(b"K");

    let error = driver
        .race(&mut [&mut affirmative], &mut negative, &mut NeverTimeout)
        .unwrap_err();
    assert_eq!(Error::UnexpectedResponse, error);
}

#[test]
fn test_race_timeout() {
    let mut serial = MockSerial::new();
    serial.add_response(b"busy p...\r\n");

    let mut driver = DriverType::new(serial, Config::default());
    let mut affirmative = Find::new(b"+CWJAP:");
    let mut negative = Find::new(b"OK\r\n");

    let error = driver
        .race(&mut [&mut affirmative], &mut negative, &mut PollLimit::new(20))
        .unwrap_err();
    assert_eq!(Error::Timeout, error);
}
