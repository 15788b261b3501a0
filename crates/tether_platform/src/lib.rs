//! Device-family I/O binding for resolved board resources.
//!
//! This crate turns the bindings accumulated in a
//! [`ResourceManager`](tether_resolve::ResourceManager) session into
//! device-native I/O primitive instantiations, and formats the session's
//! pin and clock constraints for the external toolchain.
//!
//! The [`IoPlatform`] trait is the capability interface: one operation
//! per direction/topology combination, implemented once per device
//! family. Device families differ only in their encoding tables and
//! primitive names; all resolution logic lives upstream in
//! `tether_resolve`. Use [`load_platform`] to select a family by name.

#![warn(missing_docs)]

pub mod constraints;
pub mod error;
pub mod ice40;
pub mod instance;

pub use constraints::{write_pcf, write_pre_pack};
pub use error::PlatformError;
pub use ice40::Ice40;
pub use instance::{Instance, IoArg, Net, ParamValue};

use tether_board::{Attrs, Dir};
use tether_resolve::{IoPin, Port, ResourceManager};

/// The capability interface of one device family's I/O cells.
///
/// Each operation receives the bound pin, its port(s), the declaring
/// group's attributes, and the explicit-inversion flag, and returns the
/// primitive instantiations realizing it, or a
/// [`PlatformError::UnsupportedFeature`] if the family cannot.
pub trait IoPlatform: std::fmt::Debug {
    /// Returns the canonical family name (e.g. `"ice40"`).
    fn family_name(&self) -> &str;

    /// Returns the device part name this platform was loaded for.
    fn device_name(&self) -> &str;

    /// Policy hook: returns true if the given component (`"io"`, `"p"`,
    /// `"n"`) of a binding should not be emitted as a physical port.
    ///
    /// The default emits every component. Families override this for
    /// I/O standards whose cells subsume a component (e.g. the
    /// complementary pin of certain differential input standards).
    fn should_skip_port_component(&self, _port: &Port, _attrs: &Attrs, _component: &str) -> bool {
        false
    }

    /// Binds a single-ended input pin.
    fn get_input(
        &self,
        pin: &IoPin,
        port: &Port,
        attrs: &Attrs,
        invert: bool,
    ) -> Result<Vec<Instance>, PlatformError>;

    /// Binds a single-ended output pin.
    fn get_output(
        &self,
        pin: &IoPin,
        port: &Port,
        attrs: &Attrs,
        invert: bool,
    ) -> Result<Vec<Instance>, PlatformError>;

    /// Binds a single-ended tristate (output with enable) pin.
    fn get_tristate(
        &self,
        pin: &IoPin,
        port: &Port,
        attrs: &Attrs,
        invert: bool,
    ) -> Result<Vec<Instance>, PlatformError>;

    /// Binds a single-ended bidirectional pin.
    fn get_input_output(
        &self,
        pin: &IoPin,
        port: &Port,
        attrs: &Attrs,
        invert: bool,
    ) -> Result<Vec<Instance>, PlatformError>;

    /// Binds a differential input pin.
    fn get_diff_input(
        &self,
        pin: &IoPin,
        p_port: &Port,
        n_port: &Port,
        attrs: &Attrs,
        invert: bool,
    ) -> Result<Vec<Instance>, PlatformError>;

    /// Binds a differential output pin.
    fn get_diff_output(
        &self,
        pin: &IoPin,
        p_port: &Port,
        n_port: &Port,
        attrs: &Attrs,
        invert: bool,
    ) -> Result<Vec<Instance>, PlatformError>;
}

/// Loads an I/O platform by family and device name.
///
/// Supported families: `"ice40"` (aliases: `"ice-40"`, `"lattice_ice40"`,
/// `"siliconblue"`).
///
/// # Errors
///
/// Returns [`PlatformError::UnknownFamily`] if the family name is not
/// recognized. An unknown device within a known family falls back to
/// the smallest known part; the platform is still usable.
pub fn load_platform(family: &str, device: &str) -> Result<Box<dyn IoPlatform>, PlatformError> {
    match family.to_ascii_lowercase().as_str() {
        "ice40" | "ice-40" | "lattice_ice40" | "siliconblue" => {
            let (platform, _exact) = Ice40::new(device);
            Ok(Box::new(platform))
        }
        _ => Err(PlatformError::UnknownFamily {
            family: family.to_string(),
        }),
    }
}

/// Binds every leaf pin recorded in the session ledger, in creation
/// order, returning the full primitive instantiation set.
///
/// Dispatches each binding to the platform operation matching its
/// resolved direction. Differential bindings only support input and
/// output; other directions are reported as unsupported.
pub fn bind_session(
    platform: &dyn IoPlatform,
    manager: &ResourceManager,
) -> Result<Vec<Instance>, PlatformError> {
    let mut instances = Vec::new();
    for binding in manager.iter_single_ended_pins() {
        let port = manager.port(binding.port);
        let bound = match binding.pin.dir {
            Dir::Input => platform.get_input(&binding.pin, port, &binding.attrs, binding.invert)?,
            Dir::Output => {
                platform.get_output(&binding.pin, port, &binding.attrs, binding.invert)?
            }
            Dir::OutputEnable => {
                platform.get_tristate(&binding.pin, port, &binding.attrs, binding.invert)?
            }
            Dir::InOut => {
                platform.get_input_output(&binding.pin, port, &binding.attrs, binding.invert)?
            }
        };
        instances.extend(bound);
    }
    for binding in manager.iter_differential_pins() {
        let p_port = manager.port(binding.p);
        let n_port = manager.port(binding.n);
        let bound = match binding.pin.dir {
            Dir::Input => platform.get_diff_input(
                &binding.pin,
                p_port,
                n_port,
                &binding.attrs,
                binding.invert,
            )?,
            Dir::Output => platform.get_diff_output(
                &binding.pin,
                p_port,
                n_port,
                &binding.attrs,
                binding.invert,
            )?,
            Dir::OutputEnable | Dir::InOut => {
                return Err(PlatformError::UnsupportedFeature {
                    family: platform.family_name().to_string(),
                    feature: "differential tristate".to_string(),
                    pin: binding.pin.name.clone(),
                    xdr: binding.pin.xdr,
                })
            }
        };
        instances.extend(bound);
    }
    Ok(instances)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_ice40() {
        let platform = load_platform("ice40", "iCE40HX8K").unwrap();
        assert_eq!(platform.family_name(), "ice40");
        assert_eq!(platform.device_name(), "iCE40HX8K");
    }

    #[test]
    fn load_ice40_aliases() {
        for family in ["iCE40", "ice-40", "lattice_ice40", "siliconblue"] {
            let platform = load_platform(family, "iCE40UP5K").unwrap();
            assert_eq!(platform.family_name(), "ice40");
        }
    }

    #[test]
    fn load_unknown_family() {
        let err = load_platform("ecp5", "LFE5U-25F").unwrap_err();
        assert_eq!(
            format!("{err}"),
            "unknown I/O platform family: \"ecp5\". Supported: ice40"
        );
    }

    #[test]
    fn load_unknown_device_falls_back() {
        let platform = load_platform("ice40", "UNKNOWN_PART").unwrap();
        assert_eq!(platform.device_name(), "iCE40LP384");
    }

    #[test]
    fn bind_session_realizes_every_binding() {
        use tether_board::{PinGroup, Resource, Subsignal};
        use tether_common::Frequency;

        let mut manager = ResourceManager::new(
            vec![
                Resource::single(
                    "clk100",
                    0,
                    PinGroup::diff_pairs("H1", "H2", Dir::Input)
                        .with_clock(Frequency::new(100e6)),
                ),
                Resource::single("user_led", 0, PinGroup::pins("A0", Dir::Output)),
                Resource::with_subsignals(
                    "i2c",
                    0,
                    vec![
                        Subsignal::new("scl", PinGroup::pins("N10", Dir::Output)),
                        Subsignal::new("sda", PinGroup::pins("N11", Dir::InOut)),
                    ],
                ),
            ],
            vec![],
        )
        .unwrap();
        manager.request("clk100", 0).unwrap();
        manager.request("user_led", 0).unwrap();
        manager.request("i2c", 0).unwrap();

        let platform = load_platform("ice40", "iCE40HX8K").unwrap();
        let instances = bind_session(platform.as_ref(), &manager).unwrap();
        let names: Vec<_> = instances.iter().map(|i| i.name.as_str()).collect();
        // One SB_IO per single-ended leaf, one for the differential
        // input's non-inverting pin, ordered single-ended then
        // differential.
        assert_eq!(
            names,
            ["user_led_0__io", "i2c_0__scl__io", "i2c_0__sda__io", "clk100_0__p"]
        );
        assert!(instances.iter().all(|i| i.kind == "SB_IO"));
    }

    #[test]
    fn bind_session_rejects_differential_tristate() {
        use tether_board::{PinGroup, Resource};

        let mut manager = ResourceManager::new(
            vec![Resource::single(
                "link",
                0,
                PinGroup::diff_pairs("G1", "G2", Dir::InOut),
            )],
            vec![],
        )
        .unwrap();
        manager.request("link", 0).unwrap();

        let platform = load_platform("ice40", "iCE40HX8K").unwrap();
        let err = bind_session(platform.as_ref(), &manager).unwrap_err();
        assert!(matches!(err, PlatformError::UnsupportedFeature { .. }));
    }
}
