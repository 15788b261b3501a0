//! Resource declarations: named, numbered logical hardware interfaces.

use crate::pins::PinGroup;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The body of a resource: either a leaf electrical group or a list of
/// named subsignals, never both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ResourceBody {
    /// A leaf: one electrical group.
    Leaf(PinGroup),
    /// An internal node: named children, each resource-shaped.
    Node(Vec<Subsignal>),
}

/// A named child within a resource's body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subsignal {
    /// Child name, e.g. `"scl"`.
    pub name: String,
    /// Child body, itself a leaf or a node.
    pub body: ResourceBody,
}

impl Subsignal {
    /// A leaf subsignal wrapping one electrical group.
    pub fn new(name: impl Into<String>, group: PinGroup) -> Self {
        Self {
            name: name.into(),
            body: ResourceBody::Leaf(group),
        }
    }

    /// A nested subsignal with its own children.
    pub fn nested(name: impl Into<String>, subs: Vec<Subsignal>) -> Self {
        Self {
            name: name.into(),
            body: ResourceBody::Node(subs),
        }
    }
}

/// A logical hardware interface declaration, identified by name and number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    /// Resource name, e.g. `"user_led"`.
    pub name: String,
    /// Resource number; `user_led` 0 and `user_led` 1 are distinct.
    pub number: u32,
    /// Leaf group or subsignal tree.
    pub body: ResourceBody,
}

impl Resource {
    /// A leaf resource wrapping one electrical group.
    pub fn single(name: impl Into<String>, number: u32, group: PinGroup) -> Self {
        Self {
            name: name.into(),
            number,
            body: ResourceBody::Leaf(group),
        }
    }

    /// A resource composed of named subsignals.
    pub fn with_subsignals(name: impl Into<String>, number: u32, subs: Vec<Subsignal>) -> Self {
        Self {
            name: name.into(),
            number,
            body: ResourceBody::Node(subs),
        }
    }
}

fn fmt_body(body: &ResourceBody, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match body {
        ResourceBody::Leaf(group) => write!(f, "{group}"),
        ResourceBody::Node(subs) => {
            let mut first = true;
            for sub in subs {
                if !first {
                    write!(f, " ")?;
                }
                first = false;
                write!(f, "(subsignal {} ", sub.name)?;
                fmt_body(&sub.body, f)?;
                write!(f, ")")?;
            }
            Ok(())
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(resource {} {} ", self.name, self.number)?;
        fmt_body(&self.body, f)?;
        write!(f, ")")
    }
}
