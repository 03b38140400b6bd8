//! padding/engine.rs
//! Block-buffering depadding engine.
//!
//! Design notes:
//! - Exactly one block of look-ahead. A held block is only released as data
//!   once a later byte arrives; end of input is signalled by `finalize`.
//! - Two fixed block buffers flip between "held" and "just released", so the
//!   released block can be handed out by reference while the new tail is
//!   copied into the other slot. No allocation after construction.
//! - Complete blocks inside a chunk are forwarded as a slice of that chunk.

use log::debug;

use crate::padding::scheme::PaddingScheme;
use crate::padding::types::PaddingError;
use crate::telemetry::DepadCounters;

/// Bytes released by one `update` call, to be forwarded in field order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepadOutput<'s, 'c> {
    /// Previously held block, now known not to be the last one.
    pub released: &'s [u8],
    /// Zero-copy prefix of the caller's chunk.
    pub passthrough: &'c [u8],
}

impl<'s, 'c> DepadOutput<'s, 'c> {
    pub const fn empty() -> Self {
        Self { released: &[], passthrough: &[] }
    }

    pub fn len(&self) -> usize {
        self.released.len() + self.passthrough.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Both parts in output order.
    pub fn parts(&self) -> [&[u8]; 2] {
        [self.released, self.passthrough]
    }
}

/// Push-style depadding protocol.
///
/// Feed decrypted, still padded bytes in stream order through `update`, then
/// call `finalize` exactly once after the end of input has been observed.
pub trait DepadHandler {
    fn block_size(&self) -> usize;

    fn update<'s, 'c>(&'s mut self, chunk: &'c [u8]) -> Result<DepadOutput<'s, 'c>, PaddingError>;

    fn finalize(&mut self) -> Result<&[u8], PaddingError>;

    fn is_finalized(&self) -> bool;
}

pub struct BlockDepadder {
    scheme: PaddingScheme,
    block_size: usize,
    buffers: [Box<[u8]>; 2],
    active: usize,
    held: usize,
    finalized: bool,
    counters: DepadCounters,
}

impl std::fmt::Debug for BlockDepadder {
    // Buffer contents are plaintext; keep them out of logs.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockDepadder")
            .field("scheme", &self.scheme)
            .field("block_size", &self.block_size)
            .field("held", &self.held)
            .field("finalized", &self.finalized)
            .finish()
    }
}

impl BlockDepadder {
    pub fn new(scheme: PaddingScheme, block_size: usize) -> Result<Self, PaddingError> {
        scheme.check_block_size(block_size)?;
        debug!("depadder created: scheme={scheme}, block_size={block_size}");
        Ok(Self {
            scheme,
            block_size,
            buffers: [
                vec![0u8; block_size].into_boxed_slice(),
                vec![0u8; block_size].into_boxed_slice(),
            ],
            active: 0,
            held: 0,
            finalized: false,
            counters: DepadCounters::default(),
        })
    }

    pub fn scheme(&self) -> PaddingScheme {
        self.scheme
    }

    /// Bytes currently retained as the candidate final block.
    pub fn held_len(&self) -> usize {
        self.held
    }

    pub fn counters(&self) -> &DepadCounters {
        &self.counters
    }

    fn ensure_open(&self) -> Result<(), PaddingError> {
        if self.finalized {
            return Err(PaddingError::Finalized);
        }
        Ok(())
    }
}

impl DepadHandler for BlockDepadder {
    fn block_size(&self) -> usize {
        self.block_size
    }

    fn update<'s, 'c>(&'s mut self, chunk: &'c [u8]) -> Result<DepadOutput<'s, 'c>, PaddingError> {
        self.ensure_open()?;
        if chunk.is_empty() {
            return Ok(DepadOutput::empty());
        }
        self.counters.add_chunk(chunk.len());

        let bs = self.block_size;
        let mut rest = chunk;

        // Resolve the held block: any byte past it proves it is not final.
        let release = if self.held == bs {
            true
        } else if self.held > 0 {
            let take = (bs - self.held).min(rest.len());
            let start = self.held;
            self.buffers[self.active][start..start + take].copy_from_slice(&rest[..take]);
            self.held += take;
            rest = &rest[take..];
            if rest.is_empty() {
                return Ok(DepadOutput::empty());
            }
            true
        } else {
            false
        };

        let previous = self.active;
        if release {
            self.active ^= 1;
        }

        // Keep the last 1..=bs bytes back as the new candidate.
        let used = ((rest.len() - 1) / bs) * bs;
        let (passthrough, tail) = rest.split_at(used);

        let [first, second] = &mut self.buffers;
        let (prev_buf, next_buf) = if previous == 0 { (first, second) } else { (second, first) };
        let released: &[u8];
        let target: &mut [u8];
        if release {
            released = &prev_buf[..];
            target = &mut next_buf[..];
        } else {
            released = &[];
            target = &mut prev_buf[..];
        }
        target[..tail.len()].copy_from_slice(tail);
        self.held = tail.len();

        self.counters.add_output(released.len(), passthrough.len());
        Ok(DepadOutput { released, passthrough })
    }

    fn finalize(&mut self) -> Result<&[u8], PaddingError> {
        self.ensure_open()?;
        self.finalized = true;

        if self.held == 0 {
            debug!("depadder finalized: empty stream");
            return Ok(&[]);
        }
        if self.held != self.block_size {
            debug!(
                "depadder finalized: misaligned tail ({} of {} bytes)",
                self.held, self.block_size
            );
            return Err(PaddingError::Alignment {
                held: self.held,
                block_size: self.block_size,
            });
        }

        let block = &self.buffers[self.active][..];
        let padding = self.scheme.padding_len(block)?;
        let residue = &block[..self.block_size - padding];
        self.counters.add_residue(residue.len(), padding);
        debug!(
            "depadder finalized: scheme={}, padding={padding}, residue={}",
            self.scheme,
            residue.len()
        );
        Ok(residue)
    }

    fn is_finalized(&self) -> bool {
        self.finalized
    }
}

impl Drop for BlockDepadder {
    fn drop(&mut self) {
        use zeroize::Zeroize;
        for buf in self.buffers.iter_mut() {
            buf.zeroize();
        }
    }
}
