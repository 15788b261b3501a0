//! Electrical direction tags for pin groups.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The electrical direction of a pin group, as seen from the design.
///
/// The declared direction is the ceiling of what the pins can do; a
/// request may narrow it (`io` to any of the others) but never widen it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dir {
    /// Input only (`"i"`).
    Input,
    /// Output only (`"o"`).
    Output,
    /// Output with a separate output-enable (`"oe"`).
    OutputEnable,
    /// Bidirectional: input, output, and output-enable (`"io"`).
    InOut,
}

impl Dir {
    /// Returns the short token used in board files and diagnostics.
    pub fn token(self) -> &'static str {
        match self {
            Dir::Input => "i",
            Dir::Output => "o",
            Dir::OutputEnable => "oe",
            Dir::InOut => "io",
        }
    }

    /// Returns true if a design can sample this pin group.
    pub fn has_input(self) -> bool {
        matches!(self, Dir::Input | Dir::InOut)
    }

    /// Returns true if a design can drive this pin group.
    pub fn has_output(self) -> bool {
        matches!(self, Dir::Output | Dir::OutputEnable | Dir::InOut)
    }

    /// Returns true if this direction carries an output-enable signal.
    pub fn has_enable(self) -> bool {
        matches!(self, Dir::OutputEnable | Dir::InOut)
    }
}

impl fmt::Display for Dir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Error type for parsing direction tokens.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("direction must be one of \"i\", \"o\", \"oe\", or \"io\", not {input:?}")]
pub struct ParseDirError {
    /// The token that failed to parse.
    pub input: String,
}

impl FromStr for Dir {
    type Err = ParseDirError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "i" => Ok(Dir::Input),
            "o" => Ok(Dir::Output),
            "oe" => Ok(Dir::OutputEnable),
            "io" => Ok(Dir::InOut),
            _ => Err(ParseDirError {
                input: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_roundtrip() {
        for dir in [Dir::Input, Dir::Output, Dir::OutputEnable, Dir::InOut] {
            assert_eq!(dir.token().parse::<Dir>().unwrap(), dir);
        }
    }

    #[test]
    fn capabilities() {
        assert!(Dir::Input.has_input());
        assert!(!Dir::Input.has_output());
        assert!(Dir::Output.has_output());
        assert!(!Dir::Output.has_enable());
        assert!(Dir::OutputEnable.has_output());
        assert!(Dir::OutputEnable.has_enable());
        assert!(Dir::InOut.has_input());
        assert!(Dir::InOut.has_output());
        assert!(Dir::InOut.has_enable());
    }

    #[test]
    fn parse_invalid() {
        let err = "wrong".parse::<Dir>().unwrap_err();
        assert_eq!(
            format!("{err}"),
            "direction must be one of \"i\", \"o\", \"oe\", or \"io\", not \"wrong\""
        );
    }

    #[test]
    fn display() {
        assert_eq!(format!("{}", Dir::InOut), "io");
    }
}
