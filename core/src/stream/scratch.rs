//! stream/scratch.rs
//! Shared pool of staging buffers between a source and the engine.
//!
//! Staged bytes are padded plaintext, so every buffer is zeroized before it
//! goes back to the pool (or is freed when the pool is full).

use std::ops::{Deref, DerefMut};
use std::sync::OnceLock;

use crossbeam::queue::ArrayQueue;
use zeroize::Zeroize;

use crate::constants::{SCRATCH_MAX_POOLED, SCRATCH_POOL_CAP};

pub struct ScratchPool {
    idle: ArrayQueue<Vec<u8>>,
}

impl ScratchPool {
    pub fn new(capacity: usize) -> Self {
        Self { idle: ArrayQueue::new(capacity.max(1)) }
    }

    /// Process-wide pool used by the stream adapters.
    pub fn shared() -> &'static ScratchPool {
        static POOL: OnceLock<ScratchPool> = OnceLock::new();
        POOL.get_or_init(|| ScratchPool::new(SCRATCH_POOL_CAP))
    }

    /// Borrow a zero-filled buffer of exactly `len` bytes.
    pub fn rent(&self, len: usize) -> ScratchBuf<'_> {
        let mut buf = self.idle.pop().unwrap_or_default();
        // Pooled buffers are already zeroed; resize only extends with zeros.
        buf.resize(len, 0);
        ScratchBuf { buf, pool: self }
    }

    pub fn idle_len(&self) -> usize {
        self.idle.len()
    }

    fn give_back(&self, mut buf: Vec<u8>) {
        buf.zeroize();
        if buf.capacity() > SCRATCH_MAX_POOLED {
            return;
        }
        // Full pool: the buffer is simply dropped.
        let _ = self.idle.push(buf);
    }
}

/// Rented buffer; zeroized and returned on drop.
pub struct ScratchBuf<'p> {
    buf: Vec<u8>,
    pool: &'p ScratchPool,
}

impl Deref for ScratchBuf<'_> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.buf
    }
}

impl DerefMut for ScratchBuf<'_> {
    fn deref_mut(&mut self) -> &mut [u8] {
        &mut self.buf
    }
}

impl Drop for ScratchBuf<'_> {
    fn drop(&mut self) {
        self.pool.give_back(std::mem::take(&mut self.buf));
    }
}
