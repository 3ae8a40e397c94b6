//! Single byte-range support for the `Range` request header.
//!
//! Only the `bytes` unit and a single range are accepted:
//!
//! - `bytes=N-`  from offset `N` through the end of the resource
//! - `bytes=-N`  the last `N` bytes
//! - `bytes=N-M` offsets `N` through `M`, inclusive
//!
//! Syntax problems are reported as [`RangeError::Malformed`], numbers that parse but do
//! not fit the resource as [`RangeError::Unsatisfiable`].

use crate::ensure;
use crate::protocol::RangeError;

const BYTES_UNIT: &str = "bytes=";

/// End of a byte range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeEnd {
    /// Inclusive last offset requested by the client.
    Closed(u64),
    /// Through the end of the resource.
    Open,
}

/// An immutable byte window over a resource of `total_length` bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    start: u64,
    end: RangeEnd,
    total_length: u64,
}

impl ByteRange {
    pub fn new(start: u64, end: RangeEnd, total_length: u64) -> Self {
        Self { start, end, total_length }
    }

    /// Parses a raw `Range` header value against a resource of `total_length` bytes and
    /// validates the outcome.
    ///
    /// # Examples
    ///
    /// ```
    /// use seekserve_http::protocol::{ByteRange, RangeError};
    ///
    /// let range = ByteRange::parse("bytes=-20", 100).unwrap();
    /// assert_eq!(range.start(), 80);
    /// assert_eq!(range.len(), 20);
    ///
    /// assert!(matches!(ByteRange::parse("bytes=abc-def", 100), Err(RangeError::Malformed { .. })));
    /// assert!(matches!(ByteRange::parse("bytes=500-100", 1000), Err(RangeError::Unsatisfiable { .. })));
    /// ```
    pub fn parse(header: &str, total_length: u64) -> Result<Self, RangeError> {
        let spec = header
            .trim()
            .strip_prefix(BYTES_UNIT)
            .ok_or_else(|| RangeError::malformed("only the bytes unit is supported"))?;

        ensure!(!spec.contains(','), RangeError::malformed("multiple ranges are not supported"));

        let (first, last) = spec.split_once('-').ok_or_else(|| RangeError::malformed("missing '-' separator"))?;
        let (first, last) = (first.trim(), last.trim());

        let range = match (first.is_empty(), last.is_empty()) {
            (true, true) => return Err(RangeError::malformed("empty range spec")),

            // suffix form: the last N bytes
            (true, false) => {
                let suffix = parse_position(last)?;
                let unsatisfiable = || RangeError::unsatisfiable(total_length);
                let start = total_length.checked_sub(suffix).ok_or_else(unsatisfiable)?;
                let end = total_length.checked_sub(1).ok_or_else(unsatisfiable)?;
                Self::new(start, RangeEnd::Closed(end), total_length)
            }

            (false, true) => Self::new(parse_position(first)?, RangeEnd::Open, total_length),

            (false, false) => Self::new(parse_position(first)?, RangeEnd::Closed(parse_position(last)?), total_length),
        };

        ensure!(range.is_valid(), RangeError::unsatisfiable(total_length));
        Ok(range)
    }

    /// First byte offset of the window.
    #[inline]
    pub fn start(&self) -> u64 {
        self.start
    }

    #[inline]
    pub fn end(&self) -> RangeEnd {
        self.end
    }

    /// Size of the resource the range was computed against.
    #[inline]
    pub fn total_length(&self) -> u64 {
        self.total_length
    }

    #[inline]
    pub fn is_open_ended(&self) -> bool {
        self.end == RangeEnd::Open
    }

    /// Inclusive last byte offset, with an open end resolved against the total length.
    pub fn last_byte(&self) -> u64 {
        match self.end {
            RangeEnd::Closed(end) => end,
            RangeEnd::Open => self.total_length.saturating_sub(1),
        }
    }

    /// Number of bytes covered by the window.
    pub fn len(&self) -> u64 {
        match self.end {
            RangeEnd::Closed(end) => end.saturating_add(1).saturating_sub(self.start),
            RangeEnd::Open => self.total_length.saturating_sub(self.start),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A range is valid when it starts inside the resource and, if closed, ends inside
    /// the resource at or after its start.
    pub fn is_valid(&self) -> bool {
        if self.start >= self.total_length {
            return false;
        }

        match self.end {
            RangeEnd::Closed(end) => self.start <= end && end < self.total_length,
            RangeEnd::Open => true,
        }
    }
}

fn parse_position(token: &str) -> Result<u64, RangeError> {
    ensure!(
        !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit()),
        RangeError::malformed(format!("'{token}' is not a byte offset"))
    );

    token.parse::<u64>().map_err(|e| RangeError::malformed(format!("'{token}' is not a byte offset: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unsatisfiable(header: &str, total: u64) -> bool {
        matches!(ByteRange::parse(header, total), Err(RangeError::Unsatisfiable { complete_length }) if complete_length == total)
    }

    fn malformed(header: &str, total: u64) -> bool {
        matches!(ByteRange::parse(header, total), Err(RangeError::Malformed { .. }))
    }

    #[test]
    fn open_ended_range_runs_to_last_byte() {
        let total = 1000;
        for n in [0, 1, 500, 999] {
            let range = ByteRange::parse(&format!("bytes={n}-"), total).unwrap();
            assert_eq!(range.start(), n);
            assert!(range.is_open_ended());
            assert_eq!(range.last_byte(), total - 1);
            assert_eq!(range.len(), total - n);
        }
    }

    #[test]
    fn suffix_range_selects_tail() {
        let range = ByteRange::parse("bytes=-20", 100).unwrap();
        assert_eq!(range.start(), 80);
        assert_eq!(range.end(), RangeEnd::Closed(99));
        assert_eq!(range.len(), 20);

        let whole = ByteRange::parse("bytes=-100", 100).unwrap();
        assert_eq!(whole.start(), 0);
        assert_eq!(whole.len(), 100);
    }

    #[test]
    fn suffix_longer_than_file_is_unsatisfiable() {
        assert!(unsatisfiable("bytes=-101", 100));
        assert!(unsatisfiable("bytes=-1", 0));
    }

    #[test]
    fn zero_suffix_is_unsatisfiable() {
        assert!(unsatisfiable("bytes=-0", 100));
    }

    #[test]
    fn first_byte_only() {
        let range = ByteRange::parse("bytes=0-0", 10).unwrap();
        assert_eq!(range.start(), 0);
        assert_eq!(range.last_byte(), 0);
        assert_eq!(range.len(), 1);
    }

    #[test]
    fn closed_range() {
        let range = ByteRange::parse("bytes=10-19", 100).unwrap();
        assert_eq!(range.start(), 10);
        assert_eq!(range.end(), RangeEnd::Closed(19));
        assert_eq!(range.len(), 10);
    }

    #[test]
    fn inverted_range_is_unsatisfiable() {
        assert!(unsatisfiable("bytes=500-100", 1000));
    }

    #[test]
    fn out_of_bounds_is_unsatisfiable() {
        assert!(unsatisfiable("bytes=100-", 100));
        assert!(unsatisfiable("bytes=0-100", 100));
        assert!(unsatisfiable("bytes=0-", 0));
    }

    #[test]
    fn syntax_errors_are_malformed() {
        assert!(malformed("bytes=abc-def", 100));
        assert!(malformed("bytes=0-9,20-29", 100));
        assert!(malformed("bytes=-", 100));
        assert!(malformed("bytes=1-2-3", 100));
        assert!(malformed("bytes=+1-2", 100));
        assert!(malformed("bytes=10", 100));
        assert!(malformed("items=0-9", 100));
        assert!(malformed("bytes=99999999999999999999999-", 100));
    }

    #[test]
    fn validity_rule() {
        assert!(ByteRange::new(0, RangeEnd::Open, 1).is_valid());
        assert!(!ByteRange::new(1, RangeEnd::Open, 1).is_valid());
        assert!(!ByteRange::new(5, RangeEnd::Closed(4), 10).is_valid());
        assert!(!ByteRange::new(5, RangeEnd::Closed(10), 10).is_valid());
        assert!(ByteRange::new(5, RangeEnd::Closed(9), 10).is_valid());
    }
}
