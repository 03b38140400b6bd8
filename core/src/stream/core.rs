//! stream/core.rs
//! Stable public API: parameters, configuration and the one-call façade.

use std::io::{Read, Write};

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_READ_CHUNK, MAX_READ_CHUNK, MIN_READ_CHUNK};
use crate::padding::{BlockDepadder, PaddingError, PaddingScheme};
use crate::stream::io::{open_input, open_output, InputSource, OutputSink};
use crate::stream::reader::DepadReader;
use crate::stream::writer::DepadWriter;
use crate::telemetry::{Stage, TelemetrySnapshot, TelemetryTimer};
use crate::types::StreamError;

/// Which scheme to strip and at what block size. Chosen by the caller; the
/// engine never guesses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepadParams {
    pub scheme: PaddingScheme,
    pub block_size: usize,
}

impl DepadParams {
    pub fn new(scheme: PaddingScheme, block_size: usize) -> Self {
        Self { scheme, block_size }
    }

    pub fn validate(&self) -> Result<(), StreamError> {
        self.scheme.check_block_size(self.block_size)?;
        Ok(())
    }

    pub fn build_depadder(&self) -> Result<BlockDepadder, PaddingError> {
        BlockDepadder::new(self.scheme, self.block_size)
    }

    /// e.g. `{"scheme":"pkcs7","block_size":16}`
    pub fn from_json(json: &str) -> Result<Self, StreamError> {
        let params: Self = serde_json::from_str(json)
            .map_err(|e| StreamError::Validation(format!("invalid depad params: {e}")))?;
        params.validate()?;
        Ok(params)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Bytes pulled from the source per engine call.
    /// - `None` → `DEFAULT_READ_CHUNK` (4 KiB).
    #[serde(default)]
    pub chunk_size: Option<usize>,

    /// Keep the write target open after the writer closes.
    /// - `None` or `Some(false)` → the target is released on close.
    #[serde(default)]
    pub leave_open: Option<bool>,

    /// Whether to capture an in-memory output buffer.
    /// - `Some(true)` → the snapshot carries the depadded bytes (tests/benches).
    #[serde(default)]
    pub with_buf: Option<bool>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            chunk_size: None,
            leave_open: Some(false),
            with_buf: Some(false),
        }
    }
}

impl ApiConfig {
    pub fn new(chunk_size: Option<usize>, leave_open: Option<bool>, with_buf: Option<bool>) -> Self {
        Self {
            chunk_size,
            leave_open: leave_open.or(Some(false)),
            with_buf: with_buf.or(Some(false)),
        }
    }

    pub fn with_buf_enabled() -> Self {
        Self { with_buf: Some(true), ..Self::default() }
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size.unwrap_or(DEFAULT_READ_CHUNK)
    }

    pub fn leave_open(&self) -> bool {
        self.leave_open.unwrap_or(false)
    }

    pub fn validate(&self) -> Result<(), StreamError> {
        let chunk = self.chunk_size();
        if !(MIN_READ_CHUNK..=MAX_READ_CHUNK).contains(&chunk) {
            return Err(StreamError::Validation(format!(
                "invalid chunk size: {chunk}, must be within {MIN_READ_CHUNK}..={MAX_READ_CHUNK}"
            )));
        }
        Ok(())
    }
}

pub fn validate_params(params: &DepadParams, config: &ApiConfig) -> Result<(), StreamError> {
    params.validate()?;
    config.validate()?;
    Ok(())
}

/// Pull-model adapter configured from params + config.
pub fn depad_reader<R: Read>(
    reader: R,
    params: &DepadParams,
    config: &ApiConfig,
) -> Result<DepadReader<R>, StreamError> {
    validate_params(params, config)?;
    Ok(DepadReader::with_depadder(reader, params.build_depadder()?, config.chunk_size()))
}

/// Push-model adapter configured from params + config.
pub fn depad_writer<W: Write>(
    writer: W,
    params: &DepadParams,
    config: &ApiConfig,
) -> Result<DepadWriter<W>, StreamError> {
    validate_params(params, config)?;
    Ok(DepadWriter::with_depadder(writer, params.build_depadder()?, config.leave_open()))
}

/// Depad a complete in-memory buffer.
pub fn depad_to_vec(params: &DepadParams, data: &[u8]) -> Result<Vec<u8>, StreamError> {
    params.validate()?;
    Ok(crate::padding::depad_slice(params.scheme, params.block_size, data)?)
}

/// 🔓 Depad stream: source → engine → sink, with telemetry.
pub fn depad_stream(
    input: InputSource,
    output: OutputSink,
    params: DepadParams,
    config: ApiConfig,
) -> Result<TelemetrySnapshot, StreamError> {
    validate_params(&params, &config)?;

    let reader = open_input(input)?;
    let (mut writer, maybe_buf) = open_output(output, config.with_buf)?;

    let mut depad = DepadReader::with_depadder(reader, params.build_depadder()?, config.chunk_size());
    let mut timer = TelemetryTimer::new();
    let mut buf = vec![0u8; config.chunk_size()];

    loop {
        let n = timer.time(Stage::Depad, || depad.read(&mut buf))?;
        if n == 0 {
            break;
        }
        timer.time(Stage::Write, || writer.write_all(&buf[..n]))?;
    }
    timer.time(Stage::Write, || writer.flush())?;
    timer.finish();

    let mut snapshot =
        TelemetrySnapshot::from(params.scheme, params.block_size, depad.counters(), &timer);

    // --- Output buffer extraction for tests ---
    if let Some(ref arc_buf) = maybe_buf {
        let buf = arc_buf
            .lock()
            .map_err(|_| StreamError::Validation("output buffer poisoned".into()))?;
        snapshot.attach_output(buf.clone());
    }

    Ok(snapshot)
}
