//! # Deadline tokens
//!
//! Every blocking operation of the [Driver](crate::driver::Driver) takes a [Deadline], which gets sampled
//! once per polling iteration. The driver never owns a clock.
//!
//! Any closure returning `Result<(), Timeout>` is a deadline:
//!
//! ````
//! # use esp8266_at::deadline::{Deadline, Timeout};
//! let mut remaining = 2;
//! let mut deadline = || {
//!     if remaining == 0 {
//!         return Err(Timeout);
//!     }
//!     remaining -= 1;
//!     Ok(())
//! };
//!
//! assert_eq!(Ok(()), deadline.check());
//! assert_eq!(Ok(()), deadline.check());
//! assert_eq!(Err(Timeout), deadline.check());
//! ````
use fugit::TimerDurationU32;
use fugit_timer::Timer;

/// Signals that the time for an operation has run out
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Timeout;

/// Cancellation token checked between blocking steps
pub trait Deadline {
    /// Returns an error if no more time remains
    fn check(&mut self) -> Result<(), Timeout>;
}

impl<F: FnMut() -> Result<(), Timeout>> Deadline for F {
    fn check(&mut self) -> Result<(), Timeout> {
        self()
    }
}

/// Deadline which never expires
#[derive(Copy, Clone, Debug, Default)]
pub struct NeverTimeout;

impl Deadline for NeverTimeout {
    fn check(&mut self) -> Result<(), Timeout> {
        Ok(())
    }
}

/// Expires after the given number of checks
#[derive(Copy, Clone, Debug)]
pub struct PollLimit {
    remaining: usize,
}

impl PollLimit {
    pub fn new(polls: usize) -> Self {
        Self { remaining: polls }
    }

    /// Number of checks left before expiring
    pub fn remaining(&self) -> usize {
        self.remaining
    }
}

impl Deadline for PollLimit {
    fn check(&mut self) -> Result<(), Timeout> {
        if self.remaining == 0 {
            return Err(Timeout);
        }

        self.remaining -= 1;
        Ok(())
    }
}

/// Deadline backed by a [fugit_timer::Timer]. Expires as soon as the started timer elapsed.
pub struct TimerDeadline<'t, T: Timer<TIMER_HZ>, const TIMER_HZ: u32> {
    timer: &'t mut T,
}

impl<'t, T: Timer<TIMER_HZ>, const TIMER_HZ: u32> TimerDeadline<'t, T, TIMER_HZ> {
    /// Starts the timer with the given duration
    pub fn start(timer: &'t mut T, duration: TimerDurationU32<TIMER_HZ>) -> Result<Self, T::Error> {
        timer.start(duration)?;
        Ok(Self { timer })
    }
}

impl<T: Timer<TIMER_HZ>, const TIMER_HZ: u32> Deadline for TimerDeadline<'_, T, TIMER_HZ> {
    fn check(&mut self) -> Result<(), Timeout> {
        match self.timer.wait() {
            Ok(()) => Err(Timeout),
            Err(nb::Error::WouldBlock) => Ok(()),
            Err(nb::Error::Other(error)) => {
                warn!("Timer failed while waiting: {:?}", error);
                Err(Timeout)
            }
        }
    }
}
