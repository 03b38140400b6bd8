//! padding/mod.rs
//! Streaming removal of block-cipher padding.
//!
//! Notes:
//! - The engine never forwards a block speculatively; only a later byte or an
//!   explicit end of input decides whether a held block was the padded one.
//! - Output is identical for every way of chunking the same input.
//! - Schemes are a closed enum; the engine stays scheme-agnostic.

pub mod types;
pub mod scheme;
pub mod validators;
pub mod engine;

pub use types::*;
pub use scheme::*;
pub use engine::*;

/// Depad a complete in-memory buffer in one call.
pub fn depad_slice(
    scheme: PaddingScheme,
    block_size: usize,
    data: &[u8],
) -> Result<Vec<u8>, PaddingError> {
    let mut depadder = BlockDepadder::new(scheme, block_size)?;
    let mut out = Vec::with_capacity(data.len());
    let step = depadder.update(data)?;
    out.extend_from_slice(step.released);
    out.extend_from_slice(step.passthrough);
    out.extend_from_slice(depadder.finalize()?);
    Ok(out)
}
