//! Per-request direction and data-rate overrides.
//!
//! Overrides mirror the shape of the resource body they apply to: a
//! scalar for a leaf, a name-keyed map for a subsignal tree. The
//! resolver rejects shape mismatches rather than guessing.

use std::collections::BTreeMap;
use tether_board::Dir;

/// A direction override for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirOverride {
    /// Keep the declared direction.
    Default,
    /// Narrow to the given direction; only `io` may be narrowed.
    Dir(Dir),
    /// Raw request (`"-"`): no signal semantics, the caller gets the
    /// physical wire directly. Allowed from any declared direction.
    Raw,
    /// Per-subsignal overrides; required when the resource has subsignals.
    /// Missing names keep their declared direction.
    Map(BTreeMap<String, DirOverride>),
}

impl Default for DirOverride {
    fn default() -> Self {
        DirOverride::Default
    }
}

impl DirOverride {
    /// Builds a per-subsignal map from `(name, override)` pairs.
    pub fn map<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (&'static str, DirOverride)>,
    {
        DirOverride::Map(
            entries
                .into_iter()
                .map(|(name, ovr)| (name.to_string(), ovr))
                .collect(),
        )
    }
}

/// A data-rate override for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XdrOverride {
    /// Keep the default rate (0: combinational, unregistered).
    Default,
    /// Request the given rate: 0 unregistered, 1 single-data-rate
    /// registered, 2 double-data-rate.
    Rate(u8),
    /// Per-subsignal overrides; required when the resource has subsignals.
    /// Missing names default to rate 0.
    Map(BTreeMap<String, XdrOverride>),
}

impl Default for XdrOverride {
    fn default() -> Self {
        XdrOverride::Default
    }
}

impl XdrOverride {
    /// Builds a per-subsignal map from `(name, override)` pairs.
    pub fn map<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (&'static str, XdrOverride)>,
    {
        XdrOverride::Map(
            entries
                .into_iter()
                .map(|(name, ovr)| (name.to_string(), ovr))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        assert_eq!(DirOverride::default(), DirOverride::Default);
        assert_eq!(XdrOverride::default(), XdrOverride::Default);
    }

    #[test]
    fn map_builder() {
        let ovr = DirOverride::map([("sda", DirOverride::Dir(Dir::Output))]);
        match ovr {
            DirOverride::Map(map) => {
                assert_eq!(map["sda"], DirOverride::Dir(Dir::Output));
            }
            _ => panic!("expected map"),
        }
    }
}
