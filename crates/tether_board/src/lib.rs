//! Board resource and connector declarations.
//!
//! This crate holds the immutable declaration model that describes a
//! board to the rest of the toolkit: named, numbered [`Resource`]s (an
//! LED, a clock input, an I2C bus) built from single-ended or
//! differential [`PinGroup`]s, optionally nested as [`Subsignal`]s, and
//! [`Connector`]s that map local pin labels (a PMOD header, an expansion
//! port) to physical package pins or to slots on another connector.
//!
//! Declarations are pure data. Resolving them against a session,
//! allocating physical pins, and producing ports is the job of
//! `tether_resolve`; turning resolved pins into device I/O primitives is
//! the job of `tether_platform`.

#![warn(missing_docs)]

pub mod connector;
pub mod dir;
pub mod pins;
pub mod resource;

pub use connector::{Connector, ConnectorTarget};
pub use dir::{Dir, ParseDirError};
pub use pins::{Attrs, ConnRef, GroupKind, PinGroup};
pub use resource::{Resource, ResourceBody, Subsignal};
