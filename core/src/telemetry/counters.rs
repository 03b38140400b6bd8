//! telemetry/counters.rs
//! Mutable counters collected while depadding a stream.
//!
//! Summary: byte and chunk counts plus the padding length stripped at finalize.
//! Converted into an immutable TelemetrySnapshot at stream end.
use std::ops::AddAssign;

use serde::{Deserialize, Serialize};

/// Deterministic counters collected during stream processing
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepadCounters {
    pub chunks_in: u64,
    pub bytes_in: u64,
    pub bytes_out: u64,
    pub blocks_flushed: u64,
    pub padding_bytes: u64,
}

impl DepadCounters {
    /// Record one non-empty chunk handed to `update`.
    pub fn add_chunk(&mut self, len: usize) {
        self.chunks_in += 1;
        self.bytes_in += len as u64;
    }

    /// Record the bytes released by one `update` call.
    ///
    /// - `held_len`: size of the previously held block, 0 if none was released
    /// - `passthrough_len`: zero-copy slice length taken from the chunk
    pub fn add_output(&mut self, held_len: usize, passthrough_len: usize) {
        if held_len > 0 {
            self.blocks_flushed += 1;
        }
        self.bytes_out += (held_len + passthrough_len) as u64;
    }

    /// Record the residue and stripped padding from `finalize`.
    pub fn add_residue(&mut self, residue_len: usize, padding_len: usize) {
        self.bytes_out += residue_len as u64;
        self.padding_bytes += padding_len as u64;
    }

    /// Bytes accepted but not yet released or stripped.
    pub fn pending_bytes(&self) -> u64 {
        self.bytes_in - self.bytes_out - self.padding_bytes
    }

    pub fn merge(&mut self, other: &DepadCounters) {
        *self += *other;
    }
}

impl AddAssign for DepadCounters {
    fn add_assign(&mut self, rhs: Self) {
        self.chunks_in      += rhs.chunks_in;
        self.bytes_in       += rhs.bytes_in;
        self.bytes_out      += rhs.bytes_out;
        self.blocks_flushed += rhs.blocks_flushed;
        self.padding_bytes  += rhs.padding_bytes;
    }
}
