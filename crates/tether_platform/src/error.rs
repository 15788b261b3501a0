//! Error types for platform I/O binding.

/// Errors raised while binding resolved pins to device primitives.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlatformError {
    /// The device family cannot realize the requested feature combination.
    #[error("platform {family} does not support {feature} with data rate {xdr} on pin {pin}")]
    UnsupportedFeature {
        /// Device family name.
        family: String,
        /// The unsupported feature, e.g. `"single-ended input"`.
        feature: String,
        /// The offending pin.
        pin: String,
        /// The requested data rate.
        xdr: u8,
    },

    /// A global-buffer-routed input cannot also be inverted.
    #[error("pin {pin}: a global buffer input cannot be combined with explicit inversion")]
    GlobalInputInverted {
        /// The offending pin.
        pin: String,
    },

    /// The platform family name is not recognized.
    #[error("unknown I/O platform family: {family:?}. Supported: ice40")]
    UnknownFamily {
        /// The rejected family name.
        family: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_feature_names_pin_and_rate() {
        let err = PlatformError::UnsupportedFeature {
            family: "ice40".to_string(),
            feature: "single-ended input".to_string(),
            pin: "clk_in_0".to_string(),
            xdr: 3,
        };
        assert_eq!(
            format!("{err}"),
            "platform ice40 does not support single-ended input with data rate 3 on pin clk_in_0"
        );
    }

    #[test]
    fn global_invert_conflict() {
        let err = PlatformError::GlobalInputInverted {
            pin: "clk_in_0".to_string(),
        };
        assert_eq!(
            format!("{err}"),
            "pin clk_in_0: a global buffer input cannot be combined with explicit inversion"
        );
    }
}
