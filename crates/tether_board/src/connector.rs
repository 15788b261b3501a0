//! Connector declarations: label-to-pin indirection tables.

use crate::pins::ConnRef;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The target of one connector slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectorTarget {
    /// A literal physical package pin.
    Pin(String),
    /// A label on another connector; indirection may chain but must
    /// terminate at a literal pin.
    Remote {
        /// Label on the referenced connector.
        label: String,
        /// The referenced connector.
        conn: ConnRef,
    },
}

/// A named, numbered mapping from local pin labels to physical pins or
/// to slots on another connector (a header or expansion-port pinout).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connector {
    /// Connector name, e.g. `"pmod"`.
    pub name: String,
    /// Connector number.
    pub number: u32,
    /// Ordered label-to-target mapping.
    pub mapping: Vec<(String, ConnectorTarget)>,
}

impl Connector {
    /// Creates a connector from an explicit label-to-target mapping.
    pub fn new(
        name: impl Into<String>,
        number: u32,
        mapping: Vec<(String, ConnectorTarget)>,
    ) -> Self {
        Self {
            name: name.into(),
            number,
            mapping,
        }
    }

    /// Creates a connector from a whitespace-separated physical pin list.
    ///
    /// Labels are the 1-based positions in the list; a `-` entry leaves
    /// that position unmapped (it still occupies a position number).
    pub fn from_pin_list(name: impl Into<String>, number: u32, pins: &str) -> Self {
        let mapping = pins
            .split_whitespace()
            .enumerate()
            .filter(|(_, pin)| *pin != "-")
            .map(|(index, pin)| {
                (
                    (index + 1).to_string(),
                    ConnectorTarget::Pin(pin.to_string()),
                )
            })
            .collect();
        Self {
            name: name.into(),
            number,
            mapping,
        }
    }

    /// Returns the target mapped to `label`, if any.
    pub fn lookup(&self, label: &str) -> Option<&ConnectorTarget> {
        self.mapping
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, target)| target)
    }
}

impl fmt::Display for Connector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(connector {} {}", self.name, self.number)?;
        for (label, target) in &self.mapping {
            match target {
                ConnectorTarget::Pin(pin) => write!(f, " {label}=>{pin}")?,
                ConnectorTarget::Remote { label: remote, conn } => {
                    write!(f, " {label}=>{remote}@{conn}")?
                }
            }
        }
        write!(f, ")")
    }
}
