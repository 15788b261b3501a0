//! Frequency values with unit parsing and display.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A clock frequency stored in Hertz.
///
/// Board files annotate clock resources with a `Frequency`, and the
/// constraint ledger carries one per constrained port. All internal
/// bookkeeping is in Hz; conversion to other units (nextpnr wants MHz)
/// happens only at the output boundary.
///
/// Parses from strings like `"12MHz"`, `"100KHz"`, `"1GHz"`, `"48000Hz"`,
/// and bare numbers (interpreted as Hz).
#[derive(Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Frequency(f64);

/// Unit suffixes accepted by the parser, with their Hz multipliers.
const UNITS: &[(&str, f64)] = &[
    ("ghz", 1e9),
    ("mhz", 1e6),
    ("khz", 1e3),
    ("hz", 1.0),
];

impl Frequency {
    /// Creates a frequency from a value in Hertz.
    pub fn new(hz: f64) -> Self {
        Self(hz)
    }

    /// Returns the frequency in Hertz.
    pub fn hz(&self) -> f64 {
        self.0
    }

    /// Returns the frequency in kilohertz.
    pub fn khz(&self) -> f64 {
        self.0 / 1e3
    }

    /// Returns the frequency in megahertz.
    pub fn mhz(&self) -> f64 {
        self.0 / 1e6
    }

    /// Returns the frequency in gigahertz.
    pub fn ghz(&self) -> f64 {
        self.0 / 1e9
    }
}

impl fmt::Debug for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Frequency({self})")
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hz = self.0;
        for (suffix, mult) in UNITS {
            if hz >= *mult {
                let scaled = hz / mult;
                let unit = match *suffix {
                    "ghz" => "GHz",
                    "mhz" => "MHz",
                    "khz" => "KHz",
                    _ => "Hz",
                };
                return write!(f, "{scaled}{unit}");
            }
        }
        write!(f, "{hz}Hz")
    }
}

/// Error type for parsing frequency strings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid frequency: '{input}'")]
pub struct ParseFrequencyError {
    /// The input string that failed to parse.
    pub input: String,
}

impl FromStr for Frequency {
    type Err = ParseFrequencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let err = || ParseFrequencyError {
            input: s.to_string(),
        };

        let lower = s.to_ascii_lowercase();
        for (suffix, mult) in UNITS {
            if let Some(num) = lower.strip_suffix(suffix) {
                let value: f64 = num.trim().parse().map_err(|_| err())?;
                return Ok(Frequency(value * mult));
            }
        }

        // Bare number, interpreted as Hz
        let value: f64 = s.parse().map_err(|_| err())?;
        Ok(Frequency(value))
    }
}
