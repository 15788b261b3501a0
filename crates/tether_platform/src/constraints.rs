//! Toolchain constraint-file writers.
//!
//! [`write_pcf`] formats the session's pin allocations as a nextpnr
//! physical constraint file; [`write_pre_pack`] formats its clock
//! constraints as a pre-pack Python script consumed via nextpnr's
//! `--pre-pack` option.

use crate::IoPlatform;
use tether_resolve::ResourceManager;

/// Formats the session's pin constraints as PCF `set_io` lines.
///
/// Ports the platform subsumes into another port's cell (see
/// [`IoPlatform::should_skip_port_component`]) are left out. Multi-bit
/// ports get one line per bit, named `port[bit]`.
pub fn write_pcf(platform: &dyn IoPlatform, manager: &ResourceManager) -> String {
    let mut pcf = String::new();
    for port in manager.iter_ports() {
        if platform.should_skip_port_component(port, &port.attrs, port.component.as_str()) {
            continue;
        }
        for (bit, pin) in port.pins.iter().enumerate() {
            if port.width == 1 {
                pcf.push_str(&format!("set_io {} {}\n", port.name, pin));
            } else {
                pcf.push_str(&format!("set_io {}[{}] {}\n", port.name, bit, pin));
            }
        }
    }
    pcf
}

/// Formats the session's clock constraints as an icepack pre-pack
/// script, one `ctx.addClock` call per constrained port, in MHz.
pub fn write_pre_pack(manager: &ResourceManager) -> String {
    let mut script = String::new();
    for (port, frequency) in manager.iter_clock_constraints() {
        script.push_str(&format!(
            "ctx.addClock(\"{}\", {})\n",
            port.name,
            frequency.mhz()
        ));
    }
    script
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Ice40;
    use tether_board::{Dir, PinGroup, Resource};
    use tether_common::Frequency;

    fn board() -> ResourceManager {
        let resources = vec![
            Resource::single(
                "clk100",
                0,
                PinGroup::diff_pairs("H1", "H2", Dir::Input)
                    .with_attr("IO_STANDARD", "SB_LVDS_INPUT")
                    .with_clock(Frequency::new(100e6)),
            ),
            Resource::single("user_led", 0, PinGroup::pins("A0", Dir::Output)),
            Resource::single("bus", 0, PinGroup::pins("C0 C1", Dir::Output)),
        ];
        ResourceManager::new(resources, vec![]).unwrap()
    }

    #[test]
    fn pcf_lists_requested_ports() {
        let mut manager = board();
        manager.request("user_led", 0).unwrap();
        let platform = Ice40::new("iCE40HX8K").0;
        assert_eq!(write_pcf(&platform, &manager), "set_io user_led_0__io A0\n");
    }

    #[test]
    fn pcf_expands_multi_bit_ports() {
        let mut manager = board();
        manager.request("bus", 0).unwrap();
        let platform = Ice40::new("iCE40HX8K").0;
        assert_eq!(
            write_pcf(&platform, &manager),
            "set_io bus_0__io[0] C0\nset_io bus_0__io[1] C1\n"
        );
    }

    #[test]
    fn pcf_skips_lvds_complement() {
        let mut manager = board();
        manager.request("clk100", 0).unwrap();
        let platform = Ice40::new("iCE40HX8K").0;
        // The SB_IO on the non-inverting pin subsumes the complement.
        assert_eq!(write_pcf(&platform, &manager), "set_io clk100_0__p H1\n");
    }

    #[test]
    fn pre_pack_constrains_clocks_in_mhz() {
        let mut manager = board();
        manager.request("clk100", 0).unwrap();
        manager.request("user_led", 0).unwrap();
        assert_eq!(
            write_pre_pack(&manager),
            "ctx.addClock(\"clk100_0__p\", 100)\n"
        );
    }

    #[test]
    fn pre_pack_empty_without_clocks() {
        let mut manager = board();
        manager.request("user_led", 0).unwrap();
        assert_eq!(write_pre_pack(&manager), "");
    }
}
