//! Shared foundational types for the tether pin-binding toolkit.
//!
//! This crate provides the [`Frequency`] value type used by clock
//! annotations on board resources and by the clock-constraint ledger.

#![warn(missing_docs)]

pub mod frequency;

pub use frequency::{Frequency, ParseFrequencyError};
