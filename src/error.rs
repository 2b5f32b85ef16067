use crate::deadline::Timeout;

/// Driver errors. `E` is the error type of the serial channel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error<E> {
    /// Deadline expired before the expected confirmation was received
    Timeout,

    /// Upstream serial error
    Serial(E),

    /// Received a response which matches neither the affirmative nor the negative pattern of a query
    UnexpectedResponse,

    /// Data exceeds the maximum transmit size of a single CIPSEND command
    PayloadTooLarge,

    /// Given SSID is longer then the max. size of 32 chars
    InvalidSsidLength,

    /// Given password is longer then the max. size of 64 chars
    InvalidPasswordLength,

    /// Given domain is longer then the max. size of 128 chars
    InvalidDomainLength,
}

impl<E> From<Timeout> for Error<E> {
    fn from(_: Timeout) -> Self {
        Self::Timeout
    }
}

#[cfg(feature = "defmt")]
impl<E: defmt::Format> defmt::Format for Error<E> {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::Timeout => defmt::write!(f, "Error::Timeout"),
            Error::Serial(e) => defmt::write!(f, "Error::Serial({})", e),
            Error::UnexpectedResponse => defmt::write!(f, "Error::UnexpectedResponse"),
            Error::PayloadTooLarge => defmt::write!(f, "Error::PayloadTooLarge"),
            Error::InvalidSsidLength => defmt::write!(f, "Error::InvalidSsidLength"),
            Error::InvalidPasswordLength => defmt::write!(f, "Error::InvalidPasswordLength"),
            Error::InvalidDomainLength => defmt::write!(f, "Error::InvalidDomainLength"),
        }
    }
}
