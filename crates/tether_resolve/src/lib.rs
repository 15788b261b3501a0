//! Resource resolution: from board declarations to bound pins and ports.
//!
//! The [`ResourceManager`] owns one build session. Callers register
//! [`Resource`](tether_board::Resource) and
//! [`Connector`](tether_board::Connector) declarations, then request
//! resources by name and number. Each request walks the resource body,
//! follows connector indirection down to physical package pins, claims
//! those pins exclusively, and hands back an [`Interface`] carrying the
//! signals a design drives and samples. The manager also keeps the
//! session ledger: every [`Port`] produced, in request order, and the
//! clock constraints attached to them.
//!
//! Resolution is fail-fast: every error reflects a defect in the static
//! board description and aborts the request that discovered it.

#![warn(missing_docs)]

pub mod error;
pub mod interface;
pub mod manager;
pub mod overrides;

pub use error::ResourceError;
pub use interface::{Interface, IoPin, PinSignals, Port, PortComponent, PortId, Signal};
pub use manager::{DifferentialBinding, ResourceManager, SingleEndedBinding};
pub use overrides::{DirOverride, XdrOverride};
