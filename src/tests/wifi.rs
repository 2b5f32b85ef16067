use crate::config::Config;
use crate::deadline::{NeverTimeout, PollLimit};
use crate::driver::Driver;
use crate::error::Error;
use crate::tests::mock::MockSerial;
use core::net::Ipv4Addr;

type DriverType = Driver<MockSerial>;

fn driver(serial: MockSerial) -> DriverType {
    Driver::new(serial, Config::default())
}

#[test]
fn test_connect_to_ap_correct_commands() {
    let mut serial = MockSerial::new();
    serial.add_ok_response();
    serial.add_response(b"WIFI CONNECTED\r\nWIFI GOT IP\r\n\r\nOK\r\n");

    let mut driver = driver(serial);
    driver.connect_to_ap("test_wifi", "secret", &mut NeverTimeout).unwrap();

    assert_eq!(
        "AT+CWMODE=1\r\nAT+CWJAP=\"test_wifi\",\"secret\"\r\n",
        driver.serial.get_written_as_string()
    );
    assert_eq!(0, driver.serial.pending());
}

#[test]
fn test_connect_to_ap_mode_timeout() {
    let mut driver = driver(MockSerial::new());
    let error = driver
        .connect_to_ap("test_wifi", "secret", &mut PollLimit::new(10))
        .unwrap_err();

    assert_eq!(Error::Timeout, error);
    assert_eq!("AT+CWMODE=1\r\n", driver.serial.get_written_as_string());
}

#[test]
fn test_connect_to_ap_join_timeout() {
    let mut serial = MockSerial::new();
    serial.add_ok_response();
    serial.add_response(b"WIFI DISCONNECT\r\n+CWJAP:3\r\n\r\nFAIL\r\n");

    let mut driver = driver(serial);
    let error = driver
        .connect_to_ap("test_wifi", "secret", &mut PollLimit::new(100))
        .unwrap_err();

    assert_eq!(Error::Timeout, error);
    assert_eq!(
        "AT+CWMODE=1\r\nAT+CWJAP=\"test_wifi\",\"secret\"\r\n",
        driver.serial.get_written_as_string()
    );
}

#[test]
fn test_connect_to_ap_ssid_too_long() {
    let mut driver = driver(MockSerial::new());
    let ssid = "a".repeat(33);

    let error = driver.connect_to_ap(&ssid, "secret", &mut NeverTimeout).unwrap_err();
    assert_eq!(Error::InvalidSsidLength, error);
    assert!(driver.serial.get_written().is_empty());
}

#[test]
fn test_connect_to_ap_password_too_long() {
    let mut driver = driver(MockSerial::new());
    let password = "a".repeat(65);

    let error = driver
        .connect_to_ap("test_wifi", &password, &mut NeverTimeout)
        .unwrap_err();
    assert_eq!(Error::InvalidPasswordLength, error);
    assert!(driver.serial.get_written().is_empty());
}

#[test]
fn test_connect_to_ap_max_length_credentials() {
    let mut serial = MockSerial::new();
    serial.add_ok_response();
    serial.add_ok_response();

    let mut driver = driver(serial);
    let ssid = "s".repeat(32);
    let password = "p".repeat(64);

    driver.connect_to_ap(&ssid, &password, &mut NeverTimeout).unwrap();
    assert_eq!(
        format!("AT+CWMODE=1\r\nAT+CWJAP=\"{}\",\"{}\"\r\n", ssid, password),
        driver.serial.get_written_as_string()
    );
}

#[test]
fn test_is_connected_to_ap_true() {
    let mut serial = MockSerial::new();
    serial.add_response(b"+CWJAP:\"test_wifi\",\"10:fe:ed:05:ba:50\",1,-45\r\n\r\nOK\r\n");

    let mut driver = driver(serial);
    assert!(driver.is_connected_to_ap(&mut NeverTimeout).unwrap());

    assert_eq!("AT+CWJAP?\r\n", driver.serial.get_written_as_string());
    assert_eq!(0, driver.serial.pending());
}

#[test]
fn test_is_connected_to_ap_false() {
    let mut serial = MockSerial::new();
    serial.add_response(b"No AP\r\n\r\nOK\r\n");

    let mut driver = driver(serial);
    assert!(!driver.is_connected_to_ap(&mut NeverTimeout).unwrap());
    assert_eq!(0, driver.serial.pending());
}

#[test]
fn test_is_connected_to_ap_plain_ok() {
    let mut serial = MockSerial::new();
    serial.add_ok_response();

    let mut driver = driver(serial);
    assert!(!driver.is_connected_to_ap(&mut NeverTimeout).unwrap());
}

#[test]
fn test_is_connected_to_ap_timeout() {
    let mut driver = driver(MockSerial::new());
    let error = driver.is_connected_to_ap(&mut PollLimit::new(10)).unwrap_err();

    assert_eq!(Error::Timeout, error);
}

#[test]
fn test_is_connected_to_ap_missing_ok_after_status() {
    let mut serial = MockSerial::new();
    serial.add_response(b"+CWJAP:\"test_wifi\"");

    let mut driver = driver(serial);
    let error = driver.is_connected_to_ap(&mut PollLimit::new(50)).unwrap_err();

    assert_eq!(Error::Timeout, error);
}

#[test]
fn test_set_ip_address() {
    let mut serial = MockSerial::new();
    serial.add_ok_response();

    let mut driver = driver(serial);
    driver
        .set_ip_address(Ipv4Addr::new(10, 0, 0, 181), &mut NeverTimeout)
        .unwrap();

    assert_eq!("AT+CIPSTA=\"10.0.0.181\"\r\n", driver.serial.get_written_as_string());
}

#[test]
fn test_disconnect_from_ap() {
    let mut serial = MockSerial::new();
    serial.add_response(b"\r\nOK\r\nWIFI DISCONNECT\r\n");

    let mut driver = driver(serial);
    driver.disconnect_from_ap(&mut NeverTimeout).unwrap();

    assert_eq!("AT+CWQAP\r\n", driver.serial.get_written_as_string());
}
