//! Single-slot, last-write-wins handoff of the latest fix.
//!
//! The ingestion side publishes from its own thread; the frame loop reads the
//! slot once per tick. Older fixes are overwritten, never queued.

use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};

use skydrop_core::types::Fix;

/// A fix plus when it was received and its position in the stream.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReceivedFix {
    pub fix: Fix,
    /// Wall-clock receive time, used for freshness.
    pub received_at_millis: u64,
    /// Increments with every publish, starting at 1.
    pub sequence: u64,
}

/// Cloneable handle to the shared slot.
#[derive(Debug, Clone, Default)]
pub struct FixSlot {
    inner: Arc<Mutex<Option<ReceivedFix>>>,
}

impl FixSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the stored fix. Returns the new sequence number.
    pub fn publish(&self, fix: Fix, received_at_millis: u64) -> u64 {
        // The slot holds a plain value, so a panicked writer cannot leave it half-written.
        let mut slot = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let sequence = slot.as_ref().map_or(1, |prev| prev.sequence + 1);
        *slot = Some(ReceivedFix {
            fix,
            received_at_millis,
            sequence,
        });
        sequence
    }

    pub fn latest(&self) -> Option<ReceivedFix> {
        *self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
