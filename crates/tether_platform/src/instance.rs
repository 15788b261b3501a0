//! The primitive-instantiation data model.
//!
//! The platform binder emits [`Instance`] records: device-native I/O
//! cells with their parameters and net connections. The
//! logic-representation layer consumes these records for inclusion in
//! the design netlist; nothing in this crate writes netlist text.

use serde::{Deserialize, Serialize};

/// A net connection: a whole signal, one bit of a signal, or a constant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Net {
    /// A whole named signal.
    Bundle(String),
    /// One bit of a named signal.
    Bit {
        /// Signal name.
        signal: String,
        /// Bit index.
        index: u32,
    },
    /// A constant value.
    Const(u64),
}

impl Net {
    /// A whole-signal net.
    pub fn bundle(signal: impl Into<String>) -> Self {
        Net::Bundle(signal.into())
    }

    /// A single-bit net.
    pub fn bit(signal: impl Into<String>, index: u32) -> Self {
        Net::Bit {
            signal: signal.into(),
            index,
        }
    }
}

/// A primitive parameter value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParamValue {
    /// An integer parameter.
    Int(u64),
    /// A string parameter.
    Str(String),
}

/// One argument of a primitive instantiation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum IoArg {
    /// A physical package-pin attachment.
    Pad {
        /// Cell port name, e.g. `"PACKAGE_PIN"`.
        name: String,
        /// Physical pin token.
        pin: String,
    },
    /// A cell parameter.
    Param {
        /// Parameter name.
        name: String,
        /// Parameter value.
        value: ParamValue,
    },
    /// A net driving a cell input.
    Input {
        /// Cell port name.
        name: String,
        /// The driving net.
        net: Net,
    },
    /// A cell output driving a net.
    Output {
        /// Cell port name.
        name: String,
        /// The driven net.
        net: Net,
    },
}

impl IoArg {
    /// A package-pin attachment argument.
    pub fn pad(name: impl Into<String>, pin: impl Into<String>) -> Self {
        IoArg::Pad {
            name: name.into(),
            pin: pin.into(),
        }
    }

    /// An integer parameter argument.
    pub fn param_int(name: impl Into<String>, value: u64) -> Self {
        IoArg::Param {
            name: name.into(),
            value: ParamValue::Int(value),
        }
    }

    /// A string parameter argument.
    pub fn param_str(name: impl Into<String>, value: impl Into<String>) -> Self {
        IoArg::Param {
            name: name.into(),
            value: ParamValue::Str(value.into()),
        }
    }

    /// A cell-input argument.
    pub fn input(name: impl Into<String>, net: Net) -> Self {
        IoArg::Input {
            name: name.into(),
            net,
        }
    }

    /// A cell-output argument.
    pub fn output(name: impl Into<String>, net: Net) -> Self {
        IoArg::Output {
            name: name.into(),
            net,
        }
    }
}

/// One device primitive instantiation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instance {
    /// Cell kind, e.g. `"SB_IO"`, `"SB_GB_IO"`, `"SB_LUT4"`, `"$dff"`.
    pub kind: String,
    /// Instance name, unique within the session.
    pub name: String,
    /// Pads, parameters, and net connections.
    pub args: Vec<IoArg>,
}

impl Instance {
    /// Returns the value of the named parameter, if present.
    pub fn param(&self, name: &str) -> Option<&ParamValue> {
        self.args.iter().find_map(|arg| match arg {
            IoArg::Param { name: n, value } if n == name => Some(value),
            _ => None,
        })
    }

    /// Returns the net driving the named cell input, if connected.
    pub fn input(&self, name: &str) -> Option<&Net> {
        self.args.iter().find_map(|arg| match arg {
            IoArg::Input { name: n, net } if n == name => Some(net),
            _ => None,
        })
    }

    /// Returns the net driven by the named cell output, if connected.
    pub fn output(&self, name: &str) -> Option<&Net> {
        self.args.iter().find_map(|arg| match arg {
            IoArg::Output { name: n, net } if n == name => Some(net),
            _ => None,
        })
    }

    /// Returns the physical pin attached to the named pad, if any.
    pub fn pad(&self, name: &str) -> Option<&str> {
        self.args.iter().find_map(|arg| match arg {
            IoArg::Pad { name: n, pin } if n == name => Some(pin.as_str()),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Instance {
        Instance {
            kind: "SB_IO".to_string(),
            name: "user_led_0".to_string(),
            args: vec![
                IoArg::pad("PACKAGE_PIN", "A0"),
                IoArg::param_int("PIN_TYPE", 0b011000),
                IoArg::param_str("IO_STANDARD", "SB_LVCMOS"),
                IoArg::input("D_OUT_0", Net::bit("user_led_0__o", 0)),
            ],
        }
    }

    #[test]
    fn accessors() {
        let inst = sample();
        assert_eq!(inst.pad("PACKAGE_PIN"), Some("A0"));
        assert_eq!(inst.param("PIN_TYPE"), Some(&ParamValue::Int(0b011000)));
        assert_eq!(
            inst.input("D_OUT_0"),
            Some(&Net::bit("user_led_0__o", 0))
        );
        assert_eq!(inst.output("D_IN_0"), None);
        assert_eq!(inst.param("DRIVE"), None);
    }

    #[test]
    fn serde_roundtrip() {
        let inst = sample();
        let json = serde_json::to_string(&inst).unwrap();
        let back: Instance = serde_json::from_str(&json).unwrap();
        assert_eq!(inst, back);
    }
}
