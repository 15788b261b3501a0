//! Electrical pin groups: the leaf building block of a resource.

use crate::dir::Dir;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tether_common::Frequency;

/// Free-form electrical attributes attached to a pin group
/// (I/O standard, drive strength, pull-ups, and similar).
///
/// Attribute keys and values are passed through to the platform binder
/// as primitive parameters; the resolver itself only carries them.
pub type Attrs = BTreeMap<String, String>;

/// A reference to a named, numbered connector.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnRef {
    /// Connector name, e.g. `"pmod"`.
    pub name: String,
    /// Connector number.
    pub number: u32,
}

impl ConnRef {
    /// Creates a connector reference.
    pub fn new(name: impl Into<String>, number: u32) -> Self {
        Self {
            name: name.into(),
            number,
        }
    }
}

impl fmt::Display for ConnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.name, self.number)
    }
}

/// The pin topology of a group: single-ended wires or differential pairs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupKind {
    /// An ordered set of single-ended pins.
    SingleEnded {
        /// Physical pin tokens (or connector-local labels), in bit order.
        pins: Vec<String>,
    },
    /// An ordered set of differential pairs; `p` and `n` have equal length.
    Differential {
        /// Non-inverting pin tokens, in bit order.
        p: Vec<String>,
        /// Inverting pin tokens, in bit order.
        n: Vec<String>,
    },
}

/// One electrical group: a set of pins with a direction, optional
/// polarity inversion, optional connector indirection, attributes, and
/// an optional clock annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PinGroup {
    /// Pin topology.
    pub kind: GroupKind,
    /// Declared direction; the ceiling of what a request may ask for.
    pub dir: Dir,
    /// True if the declared polarity is inverted (active-low). Surfaced
    /// to the platform binder as a flag; never applied to pin tokens.
    pub invert: bool,
    /// If set, pin tokens are labels on this connector rather than
    /// physical package pins.
    pub conn: Option<ConnRef>,
    /// Electrical attributes, passed through to the platform binder.
    pub attrs: Attrs,
    /// Clock annotation; becomes an implicit clock constraint on the
    /// group's port when the resource is requested.
    pub clock: Option<Frequency>,
}

fn split_tokens(names: &str) -> Vec<String> {
    names.split_whitespace().map(str::to_string).collect()
}

impl PinGroup {
    /// A single-ended group from a whitespace-separated pin list.
    pub fn pins(names: &str, dir: Dir) -> Self {
        Self {
            kind: GroupKind::SingleEnded {
                pins: split_tokens(names),
            },
            dir,
            invert: false,
            conn: None,
            attrs: Attrs::new(),
            clock: None,
        }
    }

    /// A single-ended group with inverted (active-low) polarity.
    pub fn pins_n(names: &str, dir: Dir) -> Self {
        Self {
            invert: true,
            ..Self::pins(names, dir)
        }
    }

    /// A differential group from whitespace-separated `p` and `n` lists.
    ///
    /// # Panics
    ///
    /// Panics if the `p` and `n` lists have different lengths; a
    /// differential declaration with unpaired pins is malformed.
    pub fn diff_pairs(p: &str, n: &str, dir: Dir) -> Self {
        let p = split_tokens(p);
        let n = split_tokens(n);
        assert_eq!(
            p.len(),
            n.len(),
            "differential group must pair every p pin with an n pin"
        );
        Self {
            kind: GroupKind::Differential { p, n },
            dir,
            invert: false,
            conn: None,
            attrs: Attrs::new(),
            clock: None,
        }
    }

    /// A differential group with inverted declared polarity.
    pub fn diff_pairs_n(p: &str, n: &str, dir: Dir) -> Self {
        Self {
            invert: true,
            ..Self::diff_pairs(p, n, dir)
        }
    }

    /// Marks the group's pin tokens as labels on the given connector.
    pub fn with_conn(mut self, name: impl Into<String>, number: u32) -> Self {
        self.conn = Some(ConnRef::new(name, number));
        self
    }

    /// Adds an electrical attribute.
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    /// Attaches a clock annotation.
    pub fn with_clock(mut self, frequency: Frequency) -> Self {
        self.clock = Some(frequency);
        self
    }

    /// Returns the bit width of the group.
    pub fn width(&self) -> u32 {
        match &self.kind {
            GroupKind::SingleEnded { pins } => pins.len() as u32,
            GroupKind::Differential { p, .. } => p.len() as u32,
        }
    }
}

impl fmt::Display for PinGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = if self.invert { "-n" } else { "" };
        match &self.kind {
            GroupKind::SingleEnded { pins } => {
                write!(f, "(pins{tag} {}", self.dir)?;
                for pin in pins {
                    write!(f, " {pin}")?;
                }
                write!(f, ")")
            }
            GroupKind::Differential { p, n } => {
                write!(f, "(diffpairs{tag} {} (p", self.dir)?;
                for pin in p {
                    write!(f, " {pin}")?;
                }
                write!(f, ") (n")?;
                for pin in n {
                    write!(f, " {pin}")?;
                }
                write!(f, "))")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_ended_width() {
        let group = PinGroup::pins("B0 B1 B2 B3", Dir::InOut);
        assert_eq!(group.width(), 4);
        assert!(!group.invert);
    }

    #[test]
    fn differential_width() {
        let group = PinGroup::diff_pairs("H1", "H2", Dir::Input);
        assert_eq!(group.width(), 1);
    }

    #[test]
    #[should_panic(expected = "differential group must pair")]
    fn differential_unpaired() {
        PinGroup::diff_pairs("H1 H3", "H2", Dir::Input);
    }

    #[test]
    fn inverted_variants() {
        assert!(PinGroup::pins_n("X0", Dir::InOut).invert);
        assert!(PinGroup::diff_pairs_n("Y0", "Y1", Dir::InOut).invert);
    }

    #[test]
    fn display_single_ended() {
        let group = PinGroup::pins("A0", Dir::Output);
        assert_eq!(format!("{group}"), "(pins o A0)");
    }

    #[test]
    fn display_inverted() {
        let group = PinGroup::pins_n("X0", Dir::InOut);
        assert_eq!(format!("{group}"), "(pins-n io X0)");
    }

    #[test]
    fn display_differential() {
        let group = PinGroup::diff_pairs("H1", "H2", Dir::Input);
        assert_eq!(format!("{group}"), "(diffpairs i (p H1) (n H2))");
    }

    #[test]
    fn builder_methods() {
        let group = PinGroup::pins("1 2", Dir::InOut)
            .with_conn("pmod", 0)
            .with_attr("IO_STANDARD", "SB_LVCMOS")
            .with_clock(Frequency::new(12e6));
        assert_eq!(group.conn.as_ref().unwrap().name, "pmod");
        assert_eq!(group.attrs["IO_STANDARD"], "SB_LVCMOS");
        assert_eq!(group.clock.unwrap().mhz(), 12.0);
    }

    #[test]
    fn serde_roundtrip() {
        let group = PinGroup::diff_pairs("H1", "H2", Dir::Input).with_clock(Frequency::new(100e6));
        let json = serde_json::to_string(&group).unwrap();
        let back: PinGroup = serde_json::from_str(&json).unwrap();
        assert_eq!(group, back);
    }
}
