//! telemetry/snapshot.rs
//! Immutable end-of-stream view over counters and timers.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::padding::PaddingScheme;
use crate::telemetry::counters::DepadCounters;
use crate::telemetry::timers::{StageTimes, TelemetryTimer};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    pub scheme: PaddingScheme,
    pub block_size: usize,
    pub chunks_in: u64,
    pub bytes_in: u64,
    pub bytes_out: u64,
    pub blocks_flushed: u64,
    pub padding_bytes: u64,
    pub throughput_bytes_per_sec: f64,
    pub elapsed: Duration,
    pub stage_times: StageTimes,
    /// Captured plaintext when the caller asked for an in-memory sink.
    #[serde(skip)]
    pub output: Option<Vec<u8>>,
}

impl TelemetrySnapshot {
    pub fn from(
        scheme: PaddingScheme,
        block_size: usize,
        counters: &DepadCounters,
        timer: &TelemetryTimer,
    ) -> Self {
        let elapsed = timer.elapsed();
        let throughput = if elapsed.as_secs_f64() > 0.0 {
            counters.bytes_out as f64 / elapsed.as_secs_f64()
        } else {
            0.0
        };

        Self {
            scheme,
            block_size,
            chunks_in: counters.chunks_in,
            bytes_in: counters.bytes_in,
            bytes_out: counters.bytes_out,
            blocks_flushed: counters.blocks_flushed,
            padding_bytes: counters.padding_bytes,
            throughput_bytes_per_sec: throughput,
            elapsed,
            stage_times: timer.stage_times.clone(),
            output: None,
        }
    }

    pub fn attach_output(&mut self, buf: Vec<u8>) {
        self.output = Some(buf);
    }

    /// Input must be fully accounted for as output or stripped padding.
    pub fn sanity_check(&self) -> bool {
        self.bytes_in == self.bytes_out + self.padding_bytes
            && self.stage_times.total() <= self.elapsed
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
