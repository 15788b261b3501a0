//! Lattice iCE40 device family binder.
//!
//! Realizes bound pins as `SB_IO`/`SB_GB_IO` cells. The cell's
//! `PIN_TYPE` parameter encodes the direction and data rate; explicit
//! inversion is realized as an `SB_LUT4` pass-through; double-data-rate
//! pins get one extra `$dff` retiming stage per direction.
//!
//! Differential tristate and bidirectional buffers are not supported on
//! iCE40 because they require external termination, which is
//! incompatible for input and output differential I/Os.

use crate::error::PlatformError;
use crate::instance::{Instance, IoArg, Net};
use crate::IoPlatform;
use tether_board::{Attrs, Dir};
use tether_resolve::{IoPin, Port, Signal};

/// Device parameters for a specific iCE40 part.
struct Ice40Device {
    /// Part name, e.g. `"iCE40HX8K"`.
    name: &'static str,
    /// The nextpnr device-selection option.
    nextpnr_device: &'static str,
    /// Suffix appended to the package name for nextpnr (`":4k"` for the
    /// 4K parts, which are placed as 8K dies with half the logic fused).
    package_suffix: &'static str,
}

/// Known iCE40 device variants.
const ICE40_DEVICES: &[Ice40Device] = &[
    Ice40Device {
        name: "iCE40LP384",
        nextpnr_device: "--lp384",
        package_suffix: "",
    },
    Ice40Device {
        name: "iCE40LP1K",
        nextpnr_device: "--lp1k",
        package_suffix: "",
    },
    Ice40Device {
        name: "iCE40LP4K",
        nextpnr_device: "--lp8k",
        package_suffix: ":4k",
    },
    Ice40Device {
        name: "iCE40LP8K",
        nextpnr_device: "--lp8k",
        package_suffix: "",
    },
    Ice40Device {
        name: "iCE40HX1K",
        nextpnr_device: "--hx1k",
        package_suffix: "",
    },
    Ice40Device {
        name: "iCE40HX4K",
        nextpnr_device: "--hx8k",
        package_suffix: ":4k",
    },
    Ice40Device {
        name: "iCE40HX8K",
        nextpnr_device: "--hx8k",
        package_suffix: "",
    },
    Ice40Device {
        name: "iCE40UP5K",
        nextpnr_device: "--up5k",
        package_suffix: "",
    },
    Ice40Device {
        name: "iCE5LP4K",
        nextpnr_device: "--u4k",
        package_suffix: "",
    },
];

/// The smallest iCE40 device, used as fallback for unknown part names.
const FALLBACK_INDEX: usize = 0;

/// I/O platform for the Lattice iCE40 FPGA family.
#[derive(Debug)]
pub struct Ice40 {
    /// Index into `ICE40_DEVICES` for the selected part.
    device_index: usize,
}

impl Ice40 {
    /// Creates an iCE40 platform for the given device part name.
    ///
    /// Returns the platform and whether the part name matched exactly;
    /// unknown parts fall back to the smallest known device.
    pub fn new(device: &str) -> (Self, bool) {
        let index = ICE40_DEVICES
            .iter()
            .position(|d| d.name.eq_ignore_ascii_case(device));
        match index {
            Some(i) => (Self { device_index: i }, true),
            None => (
                Self {
                    device_index: FALLBACK_INDEX,
                },
                false,
            ),
        }
    }

    fn device(&self) -> &Ice40Device {
        &ICE40_DEVICES[self.device_index]
    }

    /// Returns the nextpnr device-selection option for this part.
    pub fn nextpnr_device_option(&self) -> &str {
        self.device().nextpnr_device
    }

    /// Returns the nextpnr package-name suffix for this part.
    pub fn nextpnr_package_suffix(&self) -> &str {
        self.device().package_suffix
    }

    fn check_xdr(&self, feature: &str, pin: &IoPin) -> Result<(), PlatformError> {
        if pin.xdr <= 2 {
            Ok(())
        } else {
            Err(PlatformError::UnsupportedFeature {
                family: self.family_name().to_string(),
                feature: feature.to_string(),
                pin: pin.name.clone(),
                xdr: pin.xdr,
            })
        }
    }

    /// Emits the `SB_IO`/`SB_GB_IO` cells (and supporting `SB_LUT4` /
    /// `$dff` cells) for one port of a binding.
    fn io_buffer(
        &self,
        pin: &IoPin,
        port: &Port,
        attrs: &Attrs,
        i_invert: Option<bool>,
        o_invert: Option<bool>,
    ) -> Result<Vec<Instance>, PlatformError> {
        let mut attrs = attrs.clone();
        let is_global_input = attrs
            .remove("GLOBAL")
            .map(|value| !value.is_empty() && value != "0")
            .unwrap_or(false);
        if is_global_input && i_invert == Some(true) {
            return Err(PlatformError::GlobalInputInverted {
                pin: pin.name.clone(),
            });
        }

        let mut instances = Vec::new();
        let sigs = &pin.sigs;

        // Cell-side signals; an SB_LUT4 pass-through sits between them
        // and the fabric signals when an inversion decision is present.
        let pin_i = sigs.i.as_ref().map(|i| ixor(&mut instances, i, i_invert));
        let pin_i0 = sigs.i0.as_ref().map(|i| ixor(&mut instances, i, i_invert));
        let pin_i1 = sigs.i1.as_ref().map(|i| ixor(&mut instances, i, i_invert));
        let pin_o = sigs.o.as_ref().map(|o| oxor(&mut instances, o, o_invert));
        let pin_o0 = sigs.o0.as_ref().map(|o| oxor(&mut instances, o, o_invert));
        let pin_o1 = sigs.o1.as_ref().map(|o| oxor(&mut instances, o, o_invert));

        // DDR retiming. Both input edge-samples are re-registered before
        // they enter fabric: hold time grows to an entire cycle, at the
        // cost of one cycle of latency. Only the negedge output sample
        // is re-registered after it leaves fabric: setup time grows to
        // an entire cycle without adding latency.
        let mut i0_ff = None;
        let mut i1_ff = None;
        let mut o1_ff = None;
        if pin.xdr == 2 {
            if let (Some(p0), Some(p1), Some(clk)) = (&pin_i0, &pin_i1, &sigs.i_clk) {
                let ff0 = Signal::new(format!("{}_ff", p0.name), p0.width);
                let ff1 = Signal::new(format!("{}_ff", p1.name), p1.width);
                instances.push(dff(clk, &ff0, p0));
                instances.push(dff(clk, &ff1, p1));
                i0_ff = Some(ff0);
                i1_ff = Some(ff1);
            }
            if let (Some(p1), Some(clk)) = (&pin_o1, &sigs.o_clk) {
                let ff = Signal::new(format!("{}_ff", p1.name), p1.width);
                instances.push(dff(clk, p1, &ff));
                o1_ff = Some(ff);
            }
        }

        let pin_type = pin_type_code(pin);
        for bit in 0..port.width {
            let mut args = vec![IoArg::pad("PACKAGE_PIN", port.pins[bit as usize].clone())];
            for (key, value) in &attrs {
                args.push(IoArg::param_str(key.clone(), value.clone()));
            }
            args.push(IoArg::param_int("PIN_TYPE", pin_type));

            if let Some(clk) = &sigs.i_clk {
                args.push(IoArg::input("INPUT_CLK", Net::bundle(&clk.name)));
            }
            if let Some(clk) = &sigs.o_clk {
                args.push(IoArg::input("OUTPUT_CLK", Net::bundle(&clk.name)));
            }

            if pin.dir.has_input() {
                if pin.xdr == 2 {
                    if let (Some(ff0), Some(ff1)) = (&i0_ff, &i1_ff) {
                        args.push(IoArg::output("D_IN_0", Net::bit(&ff0.name, bit)));
                        args.push(IoArg::output("D_IN_1", Net::bit(&ff1.name, bit)));
                    }
                } else if let Some(i) = &pin_i {
                    let cell_port = if pin.xdr == 0 && is_global_input {
                        "GLOBAL_BUFFER_OUTPUT"
                    } else {
                        "D_IN_0"
                    };
                    args.push(IoArg::output(cell_port, Net::bit(&i.name, bit)));
                }
            }
            if pin.dir.has_output() {
                if pin.xdr == 2 {
                    if let (Some(o0), Some(ff)) = (&pin_o0, &o1_ff) {
                        args.push(IoArg::input("D_OUT_0", Net::bit(&o0.name, bit)));
                        args.push(IoArg::input("D_OUT_1", Net::bit(&ff.name, bit)));
                    }
                } else if let Some(o) = &pin_o {
                    args.push(IoArg::input("D_OUT_0", Net::bit(&o.name, bit)));
                }
            }
            if let Some(oe) = &sigs.oe {
                args.push(IoArg::input("OUTPUT_ENABLE", Net::bundle(&oe.name)));
            }

            let kind = if is_global_input { "SB_GB_IO" } else { "SB_IO" };
            let name = if port.width == 1 {
                port.name.clone()
            } else {
                format!("{}_{bit}", port.name)
            };
            instances.push(Instance {
                kind: kind.to_string(),
                name,
                args,
            });
        }
        Ok(instances)
    }
}

/// Computes the `PIN_TYPE` cell parameter from direction and data rate.
fn pin_type_code(pin: &IoPin) -> u64 {
    let i_type: u64 = if !pin.dir.has_input() {
        0b00 // PIN_NO_INPUT, same encoding as PIN_INPUT_REGISTERED
    } else if pin.xdr == 0 {
        0b01 // PIN_INPUT
    } else {
        0b00 // PIN_INPUT_REGISTERED
    };
    let o_type: u64 = if !pin.dir.has_output() {
        0b0000 // PIN_NO_OUTPUT
    } else {
        match (pin.xdr, pin.dir) {
            (0, Dir::Output) => 0b0110, // PIN_OUTPUT
            (0, _) => 0b1010,           // PIN_OUTPUT_TRISTATE
            (1, Dir::Output) => 0b0101, // PIN_OUTPUT_REGISTERED
            (1, _) => 0b1101,           // PIN_OUTPUT_REGISTERED_ENABLE_REGISTERED
            (_, Dir::Output) => 0b0100, // PIN_OUTPUT_DDR
            _ => 0b1100,                // PIN_OUTPUT_DDR_ENABLE_REGISTERED
        }
    };
    (o_type << 2) | i_type
}

/// One whole-width retiming register: `q` follows `d` on `clk`'s posedge.
fn dff(clk: &Signal, d: &Signal, q: &Signal) -> Instance {
    Instance {
        kind: "$dff".to_string(),
        name: format!("{}_dff", q.name),
        args: vec![
            IoArg::param_int("CLK_POLARITY", 1),
            IoArg::param_int("WIDTH", u64::from(d.width)),
            IoArg::input("CLK", Net::bundle(&clk.name)),
            IoArg::input("D", Net::bundle(&d.name)),
            IoArg::output("Q", Net::bundle(&q.name)),
        ],
    }
}

/// Per-bit `SB_LUT4` pass-throughs from `from` to `to`, inverting or
/// buffering. A buffering LUT is still a real cell: differential
/// outputs rely on it to match the inverting half's delay.
fn lut_chain(instances: &mut Vec<Instance>, from: &Signal, to: &Signal, invert: bool, base: &str) {
    for bit in 0..from.width {
        instances.push(Instance {
            kind: "SB_LUT4".to_string(),
            name: format!("{base}_lut{bit}"),
            args: vec![
                IoArg::param_int("LUT_INIT", if invert { 0b01 } else { 0b10 }),
                IoArg::input("I0", Net::bit(&from.name, bit)),
                IoArg::input("I1", Net::Const(0)),
                IoArg::input("I2", Net::Const(0)),
                IoArg::input("I3", Net::Const(0)),
                IoArg::output("O", Net::bit(&to.name, bit)),
            ],
        });
    }
}

/// Input-path inversion: returns the cell-side signal the `SB_IO`
/// drives; the LUT forwards it to the fabric signal.
fn ixor(instances: &mut Vec<Instance>, fabric: &Signal, invert: Option<bool>) -> Signal {
    match invert {
        None => fabric.clone(),
        Some(inv) => {
            let cell_side = Signal::new(format!("{}_x{}", fabric.name, inv as u8), fabric.width);
            lut_chain(instances, &cell_side, fabric, inv, &cell_side.name);
            cell_side
        }
    }
}

/// Output-path inversion: returns the cell-side signal the `SB_IO`
/// samples; the LUT feeds it from the fabric signal.
fn oxor(instances: &mut Vec<Instance>, fabric: &Signal, invert: Option<bool>) -> Signal {
    match invert {
        None => fabric.clone(),
        Some(inv) => {
            let cell_side = Signal::new(format!("{}_x{}", fabric.name, inv as u8), fabric.width);
            lut_chain(instances, fabric, &cell_side, inv, &cell_side.name);
            cell_side
        }
    }
}

impl IoPlatform for Ice40 {
    fn family_name(&self) -> &str {
        "ice40"
    }

    fn device_name(&self) -> &str {
        self.device().name
    }

    /// A differential input is placed by only instantiating an `SB_IO`
    /// for the pin with z=0, which is the non-inverting pin. The pinout
    /// differs between LP/HX and UP series: for LP/HX, z=0 is DPxxB (B
    /// non-inverting); for UP, z=0 is IOB_xxA (A non-inverting).
    fn should_skip_port_component(&self, _port: &Port, attrs: &Attrs, component: &str) -> bool {
        attrs.get("IO_STANDARD").map(String::as_str).unwrap_or("SB_LVCMOS") == "SB_LVDS_INPUT"
            && component == "n"
    }

    fn get_input(
        &self,
        pin: &IoPin,
        port: &Port,
        attrs: &Attrs,
        invert: bool,
    ) -> Result<Vec<Instance>, PlatformError> {
        self.check_xdr("single-ended input", pin)?;
        self.io_buffer(pin, port, attrs, invert.then_some(true), None)
    }

    fn get_output(
        &self,
        pin: &IoPin,
        port: &Port,
        attrs: &Attrs,
        invert: bool,
    ) -> Result<Vec<Instance>, PlatformError> {
        self.check_xdr("single-ended output", pin)?;
        self.io_buffer(pin, port, attrs, None, invert.then_some(true))
    }

    fn get_tristate(
        &self,
        pin: &IoPin,
        port: &Port,
        attrs: &Attrs,
        invert: bool,
    ) -> Result<Vec<Instance>, PlatformError> {
        self.check_xdr("single-ended tristate", pin)?;
        self.io_buffer(pin, port, attrs, None, invert.then_some(true))
    }

    fn get_input_output(
        &self,
        pin: &IoPin,
        port: &Port,
        attrs: &Attrs,
        invert: bool,
    ) -> Result<Vec<Instance>, PlatformError> {
        self.check_xdr("single-ended input/output", pin)?;
        self.io_buffer(pin, port, attrs, invert.then_some(true), invert.then_some(true))
    }

    fn get_diff_input(
        &self,
        pin: &IoPin,
        p_port: &Port,
        _n_port: &Port,
        attrs: &Attrs,
        invert: bool,
    ) -> Result<Vec<Instance>, PlatformError> {
        self.check_xdr("differential input", pin)?;
        // Only the non-inverting pin is instantiated; see
        // should_skip_port_component. The standard is inherently
        // inverting, so no LUT is inserted for the complement.
        self.io_buffer(pin, p_port, attrs, invert.then_some(true), None)
    }

    fn get_diff_output(
        &self,
        pin: &IoPin,
        p_port: &Port,
        n_port: &Port,
        attrs: &Attrs,
        invert: bool,
    ) -> Result<Vec<Instance>, PlatformError> {
        self.check_xdr("differential output", pin)?;
        // The non-inverting pin is not driven the same way as a regular
        // output: the inverter on the complement introduces a LUT delay,
        // so an identical LUT is instantiated on the non-inverting pin
        // to keep the xdr=0 waveform symmetric.
        let mut instances = self.io_buffer(pin, p_port, attrs, None, Some(invert))?;
        instances.extend(self.io_buffer(pin, n_port, attrs, None, Some(!invert))?);
        Ok(instances)
    }
}
