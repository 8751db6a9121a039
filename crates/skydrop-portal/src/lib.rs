//! Portal transition engine for skydrop.
//!
//! Drives the preload -> trigger -> timed-return sequence from per-frame
//! distance checks and emits scene commands for the host to apply.

pub mod fsm;

pub use fsm::{evaluate, PortalContext, PortalState, PortalUpdate};
pub use skydrop_core as core;

#[cfg(test)]
mod tests;
