//! Error types for resource registration and request resolution.

use tether_board::{Connector, Dir, Resource};
use tether_common::Frequency;

/// Errors raised while registering declarations or resolving requests.
///
/// All variants carry enough context to diagnose the defect without
/// re-deriving session state: duplicate registrations name both
/// declarations, allocation conflicts name both claimants and the shared
/// pin, and override errors name the offending value and the valid
/// alternatives.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ResourceError {
    /// A resource with the same name and number is already registered.
    #[error("trying to add {new}, but {existing} has the same name and number")]
    DuplicateResource {
        /// The rejected declaration.
        new: Resource,
        /// The declaration already registered under the same identity.
        existing: Resource,
    },

    /// A connector with the same name and number is already registered.
    #[error("trying to add {new}, but {existing} has the same name and number")]
    DuplicateConnector {
        /// The rejected declaration.
        new: Connector,
        /// The declaration already registered under the same identity.
        existing: Connector,
    },

    /// The named resource is not registered.
    #[error("resource {name}#{number} does not exist")]
    Unknown {
        /// Requested resource name.
        name: String,
        /// Requested resource number.
        number: u32,
    },

    /// The resource was already requested this session.
    #[error("resource {name}#{number} has already been requested")]
    AlreadyRequested {
        /// Requested resource name.
        name: String,
        /// Requested resource number.
        number: u32,
    },

    /// Two resource components claim the same physical pin.
    #[error(
        "resource component {requested} uses physical pin {pin}, but it is \
         already used by resource component {claimed_by} that was requested earlier"
    )]
    PinConflict {
        /// The shared physical pin.
        pin: String,
        /// The component being resolved.
        requested: String,
        /// The component that claimed the pin earlier.
        claimed_by: String,
    },

    /// A pin token references a connector that is not registered.
    #[error("resource component {requested} references connector {name}#{number}, which does not exist")]
    UnknownConnector {
        /// Referenced connector name.
        name: String,
        /// Referenced connector number.
        number: u32,
        /// The component being resolved.
        requested: String,
    },

    /// A pin token references a label the connector does not map.
    #[error("connector {name}#{number} has no pin labeled {label}")]
    UnknownConnectorPin {
        /// Referenced connector name.
        name: String,
        /// Referenced connector number.
        number: u32,
        /// The unmapped label.
        label: String,
    },

    /// Connector indirection never reaches a physical pin.
    #[error(
        "connector pin {label} on {name}#{number} never resolves to a \
         physical pin (indirection loop)"
    )]
    ConnectorLoop {
        /// Connector name where the loop was detected.
        name: String,
        /// Connector number where the loop was detected.
        number: u32,
        /// The label being chased when the loop closed.
        label: String,
    },

    /// A direction override widens the declared capability.
    #[error(
        "direction of {group} cannot be changed from \"{from}\" to \"{to}\"; \
         direction can be changed from \"io\" to \"i\", \"o\", or \"oe\", \
         or from anything to \"-\""
    )]
    DirNotAllowed {
        /// Display form of the offending pin group.
        group: String,
        /// Declared direction.
        from: Dir,
        /// Requested direction.
        to: Dir,
    },

    /// A scalar direction override was given for a subsignal tree.
    #[error(
        "directions must be given per subsignal, not as a single direction, \
         because {resource} has subsignals"
    )]
    DirMapRequired {
        /// Display form of the resource with subsignals.
        resource: String,
    },

    /// A per-subsignal direction map was given for a leaf.
    #[error(
        "directions must be a single direction, not a per-subsignal map, \
         because {resource} has no subsignals"
    )]
    DirMapUnexpected {
        /// Display form of the leaf resource.
        resource: String,
    },

    /// The requested data rate is outside the supported range.
    #[error("data rate of {group} must be 0, 1, or 2, not {xdr}")]
    InvalidXdr {
        /// Display form of the offending pin group.
        group: String,
        /// The rejected data rate.
        xdr: u8,
    },

    /// A scalar data-rate override was given for a subsignal tree.
    #[error(
        "data rates must be given per subsignal, not as a single rate, \
         because {resource} has subsignals"
    )]
    XdrMapRequired {
        /// Display form of the resource with subsignals.
        resource: String,
    },

    /// A per-subsignal data-rate map was given for a leaf.
    #[error(
        "data rates must be a single rate, not a per-subsignal map, \
         because {resource} has no subsignals"
    )]
    XdrMapUnexpected {
        /// Display form of the leaf resource.
        resource: String,
    },

    /// A clock constraint targets a signal no request produced.
    #[error(
        "signal {name} is not part of a previously requested resource \
         and cannot designate a clock"
    )]
    ClockOnUnrequested {
        /// Name of the unbound signal.
        name: String,
    },

    /// The port already carries a clock constraint.
    #[error("cannot add clock constraint on port {port}, which is already constrained to {existing}")]
    ClockConstraintExists {
        /// The constrained port name.
        port: String,
        /// The frequency it is already constrained to.
        existing: Frequency,
    },

    /// The port carries no clock constraint.
    #[error("port {port} has no clock constraint")]
    NoClockConstraint {
        /// The unconstrained port name.
        port: String,
    },

    /// The clock frequency is not a usable number.
    #[error("clock frequency must be finite and positive, not {value}")]
    InvalidFrequency {
        /// The rejected frequency in Hz.
        value: f64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use tether_board::PinGroup;

    #[test]
    fn duplicate_resource_names_both() {
        let err = ResourceError::DuplicateResource {
            new: Resource::single("user_led", 0, PinGroup::pins("A1", Dir::Output)),
            existing: Resource::single("user_led", 0, PinGroup::pins("A0", Dir::Output)),
        };
        assert_eq!(
            format!("{err}"),
            "trying to add (resource user_led 0 (pins o A1)), but \
             (resource user_led 0 (pins o A0)) has the same name and number"
        );
    }

    #[test]
    fn pin_conflict_names_both_claimants() {
        let err = ResourceError::PinConflict {
            pin: "H1".to_string(),
            requested: "clk20_0".to_string(),
            claimed_by: "clk100_0".to_string(),
        };
        assert_eq!(
            format!("{err}"),
            "resource component clk20_0 uses physical pin H1, but it is \
             already used by resource component clk100_0 that was requested earlier"
        );
    }

    #[test]
    fn dir_not_allowed_lists_valid_transitions() {
        let err = ResourceError::DirNotAllowed {
            group: "(pins o A0)".to_string(),
            from: Dir::Output,
            to: Dir::Input,
        };
        assert_eq!(
            format!("{err}"),
            "direction of (pins o A0) cannot be changed from \"o\" to \"i\"; \
             direction can be changed from \"io\" to \"i\", \"o\", or \"oe\", \
             or from anything to \"-\""
        );
    }

    #[test]
    fn clock_exists_reports_frequency() {
        let err = ResourceError::ClockConstraintExists {
            port: "clk100_0__p".to_string(),
            existing: Frequency::new(100e6),
        };
        assert_eq!(
            format!("{err}"),
            "cannot add clock constraint on port clk100_0__p, which is \
             already constrained to 100MHz"
        );
    }
}
