//! # Stream scanners
//!
//! Incremental matchers consuming one byte at a time. Scanners never fail, they stay
//! [Status::InProgress] until the pattern was seen.
//!
//! Scanners can be chained to a pipeline by [pipe]. Each byte is handed to the first stage which is
//! still in progress, so a stage only observes the bytes following the match of its predecessor:
//!
//! ````
//! # use esp8266_at::scanner::{pipe, Find, ParseUnsigned, Scanner};
//! let mut find = Find::new(b"+IPD,");
//! let mut length = ParseUnsigned::new();
//!
//! for byte in b"\r\n+IPD,1460:" {
//!     pipe(*byte, &mut [&mut find, &mut length]);
//! }
//!
//! assert!(length.is_finished());
//! assert_eq!(Some(1460), length.value());
//! ````

/// Progress of a scanner
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Status {
    InProgress,
    Finished,
}

/// Byte-at-a-time stream operator
pub trait Scanner {
    /// Feeds one byte. Returns the byte if it was not consumed, so it can be passed to the next stage.
    fn feed(&mut self, byte: u8) -> Option<u8>;

    /// Current progress
    fn status(&self) -> Status;

    /// Restarts the scanner
    fn reset(&mut self);

    fn is_finished(&self) -> bool {
        self.status() == Status::Finished
    }

    fn in_progress(&self) -> bool {
        self.status() == Status::InProgress
    }
}

/// Feeds the byte through the given stages in order
pub fn pipe(byte: u8, stages: &mut [&mut dyn Scanner]) {
    let mut remaining = Some(byte);

    for stage in stages.iter_mut() {
        match remaining {
            Some(byte) => remaining = stage.feed(byte),
            None => return,
        }
    }
}

/// Searches a literal anywhere in the stream
///
/// On a mismatch the search falls back to the longest already matched suffix which is also a prefix of
/// the pattern, so overlapping occurrences are not missed.
#[derive(Clone, Debug)]
pub struct Find<'a> {
    pattern: &'a [u8],

    /// Length of the currently matched prefix
    matched: usize,
}

impl<'a> Find<'a> {
    pub fn new(pattern: &'a [u8]) -> Self {
        Self { pattern, matched: 0 }
    }

    /// Returns the length of the longest proper prefix of `pattern[..length]` which is also its suffix
    fn fallback(&self, length: usize) -> usize {
        let matched = &self.pattern[..length];

        (1..length)
            .rev()
            .find(|candidate| matched[..*candidate] == matched[length - candidate..])
            .unwrap_or(0)
    }
}

impl Scanner for Find<'_> {
    fn feed(&mut self, byte: u8) -> Option<u8> {
        if self.is_finished() {
            return Some(byte);
        }

        loop {
            if self.pattern[self.matched] == byte {
                self.matched += 1;
                break;
            }

            if self.matched == 0 {
                break;
            }

            self.matched = self.fallback(self.matched);
        }

        None
    }

    fn status(&self) -> Status {
        if self.matched == self.pattern.len() {
            return Status::Finished;
        }

        Status::InProgress
    }

    fn reset(&mut self) {
        self.matched = 0;
    }
}

/// Accumulates ASCII decimal digits. Finishes on the first non-digit byte, which is not consumed.
#[derive(Clone, Debug, Default)]
pub struct ParseUnsigned {
    value: u32,
    digits: usize,
    finished: bool,
}

impl ParseUnsigned {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parsed value. None if no digit was received before the terminating byte.
    pub fn value(&self) -> Option<u32> {
        if self.digits == 0 {
            return None;
        }

        Some(self.value)
    }
}

impl Scanner for ParseUnsigned {
    fn feed(&mut self, byte: u8) -> Option<u8> {
        if self.finished {
            return Some(byte);
        }

        if !byte.is_ascii_digit() {
            self.finished = true;
            return Some(byte);
        }

        self.value = self.value.saturating_mul(10).saturating_add(u32::from(byte - b'0'));
        self.digits += 1;
        None
    }

    fn status(&self) -> Status {
        if self.finished {
            return Status::Finished;
        }

        Status::InProgress
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}
