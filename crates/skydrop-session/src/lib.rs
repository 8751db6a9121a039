//! Per-session engine for skydrop.
//!
//! Hands the latest fix from the ingestion thread to the frame loop, keeps
//! the motion estimate, origin, point-of-interest selection and portal state,
//! and produces a `FrameSnapshot` every tick. Completely headless, so whole
//! sessions can be driven deterministically in tests.

pub mod commands;
pub mod engine;
pub mod fix_slot;
pub mod freshness;
pub mod motion;
pub mod scene;
pub mod snapshot;

pub use skydrop_core as core;
pub use engine::SessionEngine;
pub use fix_slot::{FixSlot, ReceivedFix};
pub use snapshot::FrameSnapshot;
