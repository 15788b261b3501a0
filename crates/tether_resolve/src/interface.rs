//! Bound-interface types produced by request resolution.

use serde::{Deserialize, Serialize};
use std::fmt;
use tether_board::{Attrs, Dir};

/// A named wire handle handed to the design.
///
/// Signals carry no netlist payload here; they are the stable names the
/// logic-representation layer connects to when it consumes the platform
/// binder's primitive instantiations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signal {
    /// Unique signal name within the session, e.g. `"i2c_0__sda__i"`.
    pub name: String,
    /// Bit width.
    pub width: u32,
}

impl Signal {
    /// Creates a signal handle.
    pub fn new(name: impl Into<String>, width: u32) -> Self {
        Self {
            name: name.into(),
            width,
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Index of a [`Port`] in the session ledger, in creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PortId(u32);

impl PortId {
    /// Creates a `PortId` from a raw index.
    pub fn from_raw(index: u32) -> Self {
        Self(index)
    }

    /// Returns the raw index.
    pub fn as_raw(self) -> u32 {
        self.0
    }
}

/// Which electrical component of a binding a port represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PortComponent {
    /// The single-ended wire of a non-differential group.
    Io,
    /// The non-inverting half of a differential pair.
    P,
    /// The inverting half of a differential pair.
    N,
}

impl PortComponent {
    /// Returns the component tag used in port names and platform policy
    /// hooks (`"io"`, `"p"`, `"n"`).
    pub fn as_str(self) -> &'static str {
        match self {
            PortComponent::Io => "io",
            PortComponent::P => "p",
            PortComponent::N => "n",
        }
    }
}

/// One electrical top-level wire exposed to the outside world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Port {
    /// Port name derived from the request path, e.g. `"i2c_0__sda__io"`.
    pub name: String,
    /// Bit width.
    pub width: u32,
    /// Physical pin tokens bound to this port, in bit order.
    pub pins: Vec<String>,
    /// Electrical attributes of the originating pin group.
    pub attrs: Attrs,
    /// Which component of its binding this port is.
    pub component: PortComponent,
}

/// The per-direction, per-data-rate signal set of a bound pin.
///
/// Which fields are present follows from the resolved direction and
/// data rate: rate 0 and 1 use `i`/`o`, rate 2 splits each direction
/// into both-edge samples (`i0`/`i1`, `o0`/`o1`), rates 1 and 2 add the
/// sampling/driving clock per direction, and `oe` exists for the `oe`
/// and `io` directions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PinSignals {
    /// Input sample (rate 0 and 1).
    pub i: Option<Signal>,
    /// Positive-edge input sample (rate 2).
    pub i0: Option<Signal>,
    /// Negative-edge input sample (rate 2).
    pub i1: Option<Signal>,
    /// Input sampling clock (rate 1 and 2).
    pub i_clk: Option<Signal>,
    /// Output drive (rate 0 and 1).
    pub o: Option<Signal>,
    /// Positive-edge output drive (rate 2).
    pub o0: Option<Signal>,
    /// Negative-edge output drive (rate 2).
    pub o1: Option<Signal>,
    /// Output driving clock (rate 1 and 2).
    pub o_clk: Option<Signal>,
    /// Output enable, one bit (directions `oe` and `io`).
    pub oe: Option<Signal>,
}

/// A resolved leaf interface: the object a design drives and samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IoPin {
    /// Hierarchical name from the request path, e.g. `"i2c_0__sda"`.
    pub name: String,
    /// Bit width.
    pub width: u32,
    /// Resolved direction.
    pub dir: Dir,
    /// Resolved data rate: 0, 1, or 2.
    pub xdr: u8,
    /// The signal handles for this pin.
    pub sigs: PinSignals,
}

impl IoPin {
    /// Creates a bound pin, deriving its signal set from `dir` and `xdr`.
    pub fn new(name: impl Into<String>, width: u32, dir: Dir, xdr: u8) -> Self {
        let name = name.into();
        let field = |suffix: &str, w: u32| Some(Signal::new(format!("{name}__{suffix}"), w));
        let mut sigs = PinSignals::default();
        if dir.has_input() {
            if xdr == 2 {
                sigs.i0 = field("i0", width);
                sigs.i1 = field("i1", width);
            } else {
                sigs.i = field("i", width);
            }
            if xdr >= 1 {
                sigs.i_clk = field("i_clk", 1);
            }
        }
        if dir.has_output() {
            if xdr == 2 {
                sigs.o0 = field("o0", width);
                sigs.o1 = field("o1", width);
            } else {
                sigs.o = field("o", width);
            }
            if xdr >= 1 {
                sigs.o_clk = field("o_clk", 1);
            }
        }
        if dir.has_enable() {
            sigs.oe = field("oe", 1);
        }
        Self {
            name,
            width,
            dir,
            xdr,
            sigs,
        }
    }
}

/// The bound interface returned by a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Interface {
    /// A leaf with direction and data-rate semantics applied.
    Pin(IoPin),
    /// A tree of named interfaces mirroring the resource's subsignals.
    Record(Vec<(String, Interface)>),
    /// A raw request (`"-"`): the physical wires directly, keyed `"io"`
    /// for single-ended groups and `"p"`/`"n"` for differential ones.
    Raw(Vec<(String, PortId)>),
}

impl Interface {
    /// Returns the leaf pin if this interface is one.
    pub fn as_pin(&self) -> Option<&IoPin> {
        match self {
            Interface::Pin(pin) => Some(pin),
            _ => None,
        }
    }

    /// Returns the named child of a record interface.
    pub fn field(&self, name: &str) -> Option<&Interface> {
        match self {
            Interface::Record(fields) => fields
                .iter()
                .find(|(field, _)| field == name)
                .map(|(_, iface)| iface),
            _ => None,
        }
    }

    /// Returns the named child as a leaf pin (`field` + `as_pin`).
    pub fn pin(&self, name: &str) -> Option<&IoPin> {
        self.field(name).and_then(Interface::as_pin)
    }

    /// Returns the port of a raw interface's named wire.
    pub fn raw_port(&self, name: &str) -> Option<PortId> {
        match self {
            Interface::Raw(wires) => wires
                .iter()
                .find(|(wire, _)| wire == name)
                .map(|(_, id)| *id),
            _ => None,
        }
    }
}
