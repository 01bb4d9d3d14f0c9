//! # Quote Numbering
//!
//! Human-facing quote numbers of the form `<year>-<sequence>`.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  stored state          current year     next state        number        │
//! │  ─────────────         ────────────     ──────────        ──────        │
//! │  (none)                2026             (2026, 1)         2026-00001    │
//! │  (2026, 41)            2026             (2026, 42)        2026-00042    │
//! │  (2026, 918)           2027             (2027, 1)         2027-00001    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! This module is arithmetic only. Persisting the state (and doing so
//! atomically) is the store's job.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;

/// Minimum digits of the sequence part.
pub const SEQUENCE_WIDTH: usize = 5;

// =============================================================================
// Quote Number
// =============================================================================

/// A formatted quote number such as `2026-00001`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct QuoteNumber(String);

impl QuoteNumber {
    /// Formats a year and sequence.
    ///
    /// ## Example
    /// ```rust
    /// use solar_core::numbering::QuoteNumber;
    ///
    /// assert_eq!(QuoteNumber::new(2026, 1).as_str(), "2026-00001");
    /// assert_eq!(QuoteNumber::new(2026, 123_456).as_str(), "2026-123456");
    /// ```
    pub fn new(year: i32, sequence: u32) -> Self {
        QuoteNumber(format!("{year}-{sequence:0width$}", width = SEQUENCE_WIDTH))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The year part.
    pub fn year(&self) -> Option<i32> {
        self.0.split_once('-').and_then(|(y, _)| y.parse().ok())
    }

    /// The sequence part.
    pub fn sequence(&self) -> Option<u32> {
        self.0.split_once('-').and_then(|(_, s)| s.parse().ok())
    }
}

impl fmt::Display for QuoteNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for QuoteNumber {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidFormat {
            field: "quote number".to_string(),
            reason: "expected YYYY-NNNNN".to_string(),
        };

        let (year, sequence) = s.trim().split_once('-').ok_or_else(invalid)?;
        let year_ok = year.len() == 4 && year.chars().all(|c| c.is_ascii_digit());
        let sequence_ok =
            sequence.len() >= SEQUENCE_WIDTH && sequence.chars().all(|c| c.is_ascii_digit());
        if !year_ok || !sequence_ok {
            return Err(invalid());
        }

        Ok(QuoteNumber(format!("{year}-{sequence}")))
    }
}

// =============================================================================
// Quote Sequence
// =============================================================================

/// The last number issued, per year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteSequence {
    pub year: i32,
    pub last_sequence: u32,
}

impl QuoteSequence {
    /// Advances to the next number: same year increments, a new year
    /// restarts at 1.
    pub fn advance(self, current_year: i32) -> (QuoteSequence, QuoteNumber) {
        let next = if self.year == current_year {
            QuoteSequence {
                year: current_year,
                last_sequence: self.last_sequence + 1,
            }
        } else {
            QuoteSequence {
                year: current_year,
                last_sequence: 1,
            }
        };
        (next, QuoteNumber::new(next.year, next.last_sequence))
    }
}

/// Next number given the stored state, if any.
pub fn next_quote_number(
    previous: Option<QuoteSequence>,
    current_year: i32,
) -> (QuoteSequence, QuoteNumber) {
    match previous {
        Some(seq) => seq.advance(current_year),
        None => {
            let first = QuoteSequence {
                year: current_year,
                last_sequence: 1,
            };
            (first, QuoteNumber::new(current_year, 1))
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_number_of_the_year() {
        let (state, number) = next_quote_number(None, 2026);
        assert_eq!(state, QuoteSequence { year: 2026, last_sequence: 1 });
        assert_eq!(number.as_str(), "2026-00001");
    }

    #[test]
    fn test_same_year_increments() {
        let prev = QuoteSequence { year: 2026, last_sequence: 41 };
        let (state, number) = next_quote_number(Some(prev), 2026);
        assert_eq!(state.last_sequence, 42);
        assert_eq!(number.to_string(), "2026-00042");
    }

    #[test]
    fn test_year_change_resets() {
        let prev = QuoteSequence { year: 2026, last_sequence: 918 };
        let (state, number) = prev.advance(2027);
        assert_eq!(state, QuoteSequence { year: 2027, last_sequence: 1 });
        assert_eq!(number.as_str(), "2027-00001");
    }

    #[test]
    fn test_parse_quote_number() {
        let n: QuoteNumber = "2026-00042".parse().unwrap();
        assert_eq!(n.year(), Some(2026));
        assert_eq!(n.sequence(), Some(42));

        assert!("2026-42".parse::<QuoteNumber>().is_err());
        assert!("26-00042".parse::<QuoteNumber>().is_err());
        assert!("2026_00042".parse::<QuoteNumber>().is_err());
        assert!("abcd-00042".parse::<QuoteNumber>().is_err());
    }

    #[test]
    fn test_quote_number_serializes_as_plain_string() {
        let json = serde_json::to_string(&QuoteNumber::new(2026, 7)).unwrap();
        assert_eq!(json, "\"2026-00007\"");
    }
}
