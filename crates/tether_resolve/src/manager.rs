//! The session resource manager: database, resolver, and ledger.

use crate::error::ResourceError;
use crate::interface::{Interface, IoPin, Port, PortComponent, PortId};
use crate::overrides::{DirOverride, XdrOverride};
use std::collections::{BTreeMap, BTreeSet};
use tether_board::{
    Attrs, ConnRef, Connector, ConnectorTarget, Dir, GroupKind, PinGroup, Resource, ResourceBody,
};
use tether_common::Frequency;

/// A resolved single-ended leaf pin and the port it is bound to.
#[derive(Debug, Clone, PartialEq)]
pub struct SingleEndedBinding {
    /// The bound pin.
    pub pin: IoPin,
    /// The port carrying its physical pins.
    pub port: PortId,
    /// Electrical attributes of the declaring group.
    pub attrs: Attrs,
    /// Declared polarity inversion flag, for the platform binder.
    pub invert: bool,
}

/// A resolved differential leaf pin and its two ports.
#[derive(Debug, Clone, PartialEq)]
pub struct DifferentialBinding {
    /// The bound pin.
    pub pin: IoPin,
    /// The non-inverting port.
    pub p: PortId,
    /// The inverting port.
    pub n: PortId,
    /// Electrical attributes of the declaring group.
    pub attrs: Attrs,
    /// Declared polarity inversion flag, for the platform binder.
    pub invert: bool,
}

/// Owns one build session: the declared resources and connectors, the
/// physical-pin allocation record, the ordered port list, and the clock
/// constraints.
///
/// All iterators are snapshots over slices and can be restarted; the
/// constraint-file writer, the platform binder, and the clock-script
/// writer each take an independent pass over the same ledger.
#[derive(Debug, Default)]
pub struct ResourceManager {
    resources: BTreeMap<(String, u32), Resource>,
    connectors: BTreeMap<(String, u32), Connector>,
    requested: BTreeSet<(String, u32)>,
    /// Physical pin token to the resource component that claimed it.
    allocated: BTreeMap<String, String>,
    ports: Vec<Port>,
    single_ended: Vec<SingleEndedBinding>,
    differential: Vec<DifferentialBinding>,
    clock_constraints: Vec<(PortId, Frequency)>,
    /// Bound pin name to its (first) port, for clock-constraint lookup.
    pin_ports: BTreeMap<String, PortId>,
}

impl ResourceManager {
    /// Creates a manager over the given declarations.
    pub fn new(
        resources: Vec<Resource>,
        connectors: Vec<Connector>,
    ) -> Result<Self, ResourceError> {
        let mut manager = Self::default();
        manager.add_resources(resources)?;
        manager.add_connectors(connectors)?;
        Ok(manager)
    }

    /// Registers resources, rejecting identity collisions.
    pub fn add_resources(
        &mut self,
        resources: impl IntoIterator<Item = Resource>,
    ) -> Result<(), ResourceError> {
        for resource in resources {
            let key = (resource.name.clone(), resource.number);
            if let Some(existing) = self.resources.get(&key) {
                return Err(ResourceError::DuplicateResource {
                    new: resource,
                    existing: existing.clone(),
                });
            }
            self.resources.insert(key, resource);
        }
        Ok(())
    }

    /// Registers connectors, rejecting identity collisions.
    pub fn add_connectors(
        &mut self,
        connectors: impl IntoIterator<Item = Connector>,
    ) -> Result<(), ResourceError> {
        for connector in connectors {
            let key = (connector.name.clone(), connector.number);
            if let Some(existing) = self.connectors.get(&key) {
                return Err(ResourceError::DuplicateConnector {
                    new: connector,
                    existing: existing.clone(),
                });
            }
            self.connectors.insert(key, connector);
        }
        Ok(())
    }

    /// Returns the registered resource with the given identity.
    pub fn lookup(&self, name: &str, number: u32) -> Result<&Resource, ResourceError> {
        self.resources
            .get(&(name.to_string(), number))
            .ok_or_else(|| ResourceError::Unknown {
                name: name.to_string(),
                number,
            })
    }

    /// Requests a resource with the declared direction and data rate 0.
    pub fn request(&mut self, name: &str, number: u32) -> Result<Interface, ResourceError> {
        self.request_with(name, number, DirOverride::Default, XdrOverride::Default)
    }

    /// Requests a resource, applying direction and data-rate overrides.
    ///
    /// Overrides must mirror the resource's shape: scalars for a leaf,
    /// name-keyed maps for a subsignal tree. Each resource may be
    /// requested at most once per session, and every physical pin it
    /// reaches is claimed exclusively.
    pub fn request_with(
        &mut self,
        name: &str,
        number: u32,
        dir: DirOverride,
        xdr: XdrOverride,
    ) -> Result<Interface, ResourceError> {
        let resource = self.lookup(name, number)?.clone();
        let key = (name.to_string(), number);
        if self.requested.contains(&key) {
            return Err(ResourceError::AlreadyRequested {
                name: name.to_string(),
                number,
            });
        }
        self.requested.insert(key);
        let display = resource.to_string();
        let path = format!("{}_{}", resource.name, resource.number);
        self.resolve_body(&resource.body, dir, xdr, path, &display)
    }

    fn resolve_body(
        &mut self,
        body: &ResourceBody,
        dir: DirOverride,
        xdr: XdrOverride,
        path: String,
        display: &str,
    ) -> Result<Interface, ResourceError> {
        match body {
            ResourceBody::Node(subs) => {
                let dir_map = match dir {
                    DirOverride::Default => BTreeMap::new(),
                    DirOverride::Map(map) => map,
                    _ => {
                        return Err(ResourceError::DirMapRequired {
                            resource: display.to_string(),
                        })
                    }
                };
                let xdr_map = match xdr {
                    XdrOverride::Default => BTreeMap::new(),
                    XdrOverride::Map(map) => map,
                    _ => {
                        return Err(ResourceError::XdrMapRequired {
                            resource: display.to_string(),
                        })
                    }
                };
                let mut fields = Vec::new();
                for sub in subs {
                    let child_dir = dir_map.get(&sub.name).cloned().unwrap_or_default();
                    let child_xdr = xdr_map.get(&sub.name).cloned().unwrap_or_default();
                    let child_path = format!("{path}__{}", sub.name);
                    let child =
                        self.resolve_body(&sub.body, child_dir, child_xdr, child_path, display)?;
                    fields.push((sub.name.clone(), child));
                }
                Ok(Interface::Record(fields))
            }
            ResourceBody::Leaf(group) => self.resolve_group(group, dir, xdr, path, display),
        }
    }

    fn resolve_group(
        &mut self,
        group: &PinGroup,
        dir: DirOverride,
        xdr: XdrOverride,
        path: String,
        display: &str,
    ) -> Result<Interface, ResourceError> {
        // Direction lattice: the declaration is the ceiling. Only `io`
        // narrows to another direction; any declaration may go raw.
        let resolved_dir = match dir {
            DirOverride::Default => Some(group.dir),
            DirOverride::Raw => None,
            DirOverride::Dir(to) => {
                if to == group.dir || group.dir == Dir::InOut {
                    Some(to)
                } else {
                    return Err(ResourceError::DirNotAllowed {
                        group: group.to_string(),
                        from: group.dir,
                        to,
                    });
                }
            }
            DirOverride::Map(_) => {
                return Err(ResourceError::DirMapUnexpected {
                    resource: display.to_string(),
                })
            }
        };
        let rate = match xdr {
            XdrOverride::Default => 0,
            XdrOverride::Rate(rate) => {
                if rate > 2 {
                    return Err(ResourceError::InvalidXdr {
                        group: group.to_string(),
                        xdr: rate,
                    });
                }
                rate
            }
            XdrOverride::Map(_) => {
                return Err(ResourceError::XdrMapUnexpected {
                    resource: display.to_string(),
                })
            }
        };

        let conn = group.conn.as_ref();
        let (wires, first_port) = match &group.kind {
            GroupKind::SingleEnded { pins } => {
                let phys = self.chase_pins(pins, conn, &path)?;
                self.claim_pins(&phys, &path)?;
                let port = self.add_port(format!("{path}__io"), phys, group, PortComponent::Io);
                (vec![("io".to_string(), port)], port)
            }
            GroupKind::Differential { p, n } => {
                let phys_p = self.chase_pins(p, conn, &path)?;
                let phys_n = self.chase_pins(n, conn, &path)?;
                self.claim_pins(&phys_p, &path)?;
                self.claim_pins(&phys_n, &path)?;
                let p_port = self.add_port(format!("{path}__p"), phys_p, group, PortComponent::P);
                let n_port = self.add_port(format!("{path}__n"), phys_n, group, PortComponent::N);
                (
                    vec![("p".to_string(), p_port), ("n".to_string(), n_port)],
                    p_port,
                )
            }
        };

        // A clock annotation becomes an implicit constraint on the
        // (first) port, subject to the one-constraint-per-port rule.
        if let Some(frequency) = group.clock {
            self.add_port_clock_constraint(first_port, frequency)?;
        }

        match resolved_dir {
            None => Ok(Interface::Raw(wires)),
            Some(dir) => {
                let pin = IoPin::new(path, group.width(), dir, rate);
                self.pin_ports.insert(pin.name.clone(), first_port);
                match &group.kind {
                    GroupKind::SingleEnded { .. } => {
                        self.single_ended.push(SingleEndedBinding {
                            pin: pin.clone(),
                            port: first_port,
                            attrs: group.attrs.clone(),
                            invert: group.invert,
                        });
                    }
                    GroupKind::Differential { .. } => {
                        self.differential.push(DifferentialBinding {
                            pin: pin.clone(),
                            p: wires[0].1,
                            n: wires[1].1,
                            attrs: group.attrs.clone(),
                            invert: group.invert,
                        });
                    }
                }
                Ok(Interface::Pin(pin))
            }
        }
    }

    /// Follows connector indirection for each token down to a physical pin.
    fn chase_pins(
        &self,
        tokens: &[String],
        conn: Option<&ConnRef>,
        requested: &str,
    ) -> Result<Vec<String>, ResourceError> {
        tokens
            .iter()
            .map(|token| self.chase_pin(token, conn, requested))
            .collect()
    }

    fn chase_pin(
        &self,
        token: &str,
        conn: Option<&ConnRef>,
        requested: &str,
    ) -> Result<String, ResourceError> {
        let Some(conn) = conn else {
            return Ok(token.to_string());
        };
        let mut label = token.to_string();
        let mut current = conn.clone();
        let mut seen: BTreeSet<(String, u32, String)> = BTreeSet::new();
        loop {
            let Some(connector) = self
                .connectors
                .get(&(current.name.clone(), current.number))
            else {
                return Err(ResourceError::UnknownConnector {
                    name: current.name,
                    number: current.number,
                    requested: requested.to_string(),
                });
            };
            if !seen.insert((current.name.clone(), current.number, label.clone())) {
                return Err(ResourceError::ConnectorLoop {
                    name: current.name,
                    number: current.number,
                    label,
                });
            }
            match connector.lookup(&label) {
                None => {
                    return Err(ResourceError::UnknownConnectorPin {
                        name: current.name,
                        number: current.number,
                        label,
                    })
                }
                Some(ConnectorTarget::Pin(pin)) => return Ok(pin.clone()),
                Some(ConnectorTarget::Remote { label: next, conn }) => {
                    label = next.clone();
                    current = conn.clone();
                }
            }
        }
    }

    fn claim_pins(&mut self, pins: &[String], requested: &str) -> Result<(), ResourceError> {
        for pin in pins {
            if let Some(owner) = self.allocated.get(pin) {
                return Err(ResourceError::PinConflict {
                    pin: pin.clone(),
                    requested: requested.to_string(),
                    claimed_by: owner.clone(),
                });
            }
            self.allocated.insert(pin.clone(), requested.to_string());
        }
        Ok(())
    }

    fn add_port(
        &mut self,
        name: String,
        pins: Vec<String>,
        group: &PinGroup,
        component: PortComponent,
    ) -> PortId {
        let id = PortId::from_raw(self.ports.len() as u32);
        self.ports.push(Port {
            name,
            width: pins.len() as u32,
            pins,
            attrs: group.attrs.clone(),
            component,
        });
        id
    }

    /// Returns the port with the given id.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not produced by this session.
    pub fn port(&self, id: PortId) -> &Port {
        &self.ports[id.as_raw() as usize]
    }

    /// Every port created so far, in creation order.
    pub fn iter_ports(&self) -> impl Iterator<Item = &Port> {
        self.ports.iter()
    }

    /// Pin-constraint records: `(port name, pins in bit order, attrs)`.
    pub fn iter_port_constraints(&self) -> impl Iterator<Item = (&str, &[String], &Attrs)> {
        self.ports
            .iter()
            .map(|port| (port.name.as_str(), port.pins.as_slice(), &port.attrs))
    }

    /// Pin-constraint records expanded to one entry per bit; multi-bit
    /// ports are named `name[bit]`.
    pub fn iter_port_constraints_bits(&self) -> impl Iterator<Item = (String, String)> + '_ {
        self.ports.iter().flat_map(|port| {
            port.pins.iter().enumerate().map(move |(bit, pin)| {
                let name = if port.width == 1 {
                    port.name.clone()
                } else {
                    format!("{}[{}]", port.name, bit)
                };
                (name, pin.clone())
            })
        })
    }

    /// Every single-ended leaf binding, in creation order.
    pub fn iter_single_ended_pins(&self) -> impl Iterator<Item = &SingleEndedBinding> {
        self.single_ended.iter()
    }

    /// Every differential leaf binding, in creation order.
    pub fn iter_differential_pins(&self) -> impl Iterator<Item = &DifferentialBinding> {
        self.differential.iter()
    }

    /// Every clock constraint, in the order they were added.
    pub fn iter_clock_constraints(&self) -> impl Iterator<Item = (&Port, Frequency)> {
        self.clock_constraints
            .iter()
            .map(|(id, frequency)| (self.port(*id), *frequency))
    }

    /// Constrains the port behind a previously requested pin to `frequency`.
    pub fn add_clock_constraint(
        &mut self,
        pin: &IoPin,
        frequency: Frequency,
    ) -> Result<(), ResourceError> {
        let port = self.pin_port(pin)?;
        self.add_port_clock_constraint(port, frequency)
    }

    /// Constrains a port to `frequency`; at most one constraint per port.
    pub fn add_port_clock_constraint(
        &mut self,
        port: PortId,
        frequency: Frequency,
    ) -> Result<(), ResourceError> {
        if !frequency.hz().is_finite() || frequency.hz() <= 0.0 {
            return Err(ResourceError::InvalidFrequency {
                value: frequency.hz(),
            });
        }
        if let Some((_, existing)) = self
            .clock_constraints
            .iter()
            .find(|(id, _)| *id == port)
        {
            return Err(ResourceError::ClockConstraintExists {
                port: self.port(port).name.clone(),
                existing: *existing,
            });
        }
        self.clock_constraints.push((port, frequency));
        Ok(())
    }

    /// Returns the clock constraint on the port behind a requested pin.
    pub fn get_clock_constraint(&self, pin: &IoPin) -> Result<Frequency, ResourceError> {
        let port = self.pin_port(pin)?;
        self.clock_constraints
            .iter()
            .find(|(id, _)| *id == port)
            .map(|(_, frequency)| *frequency)
            .ok_or_else(|| ResourceError::NoClockConstraint {
                port: self.port(port).name.clone(),
            })
    }

    fn pin_port(&self, pin: &IoPin) -> Result<PortId, ResourceError> {
        self.pin_ports
            .get(&pin.name)
            .copied()
            .ok_or_else(|| ResourceError::ClockOnUnrequested {
                name: pin.name.clone(),
            })
    }
}
