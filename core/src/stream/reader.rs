//! stream/reader.rs
//! Pull-model adapter: wraps a source of padded plaintext and yields the
//! depadded bytes through `Read` (or `read_async` over `futures::io`).
//!
//! Sync and async entry points share one algorithm:
//! 1. Serve whatever is cached.
//! 2. While the caller wants more and the source is not exhausted, pull one
//!    bounded chunk into a pooled scratch buffer and feed the engine.
//! 3. A zero-length pull finalizes the engine; the residue joins the cache.
//!
//! The bytes delivered never depend on the caller's read sizes.

use std::io::{self, Read};

use bytes::{Buf, BytesMut};
use futures::io::{AsyncRead, AsyncReadExt};
use log::trace;

use crate::constants::DEFAULT_READ_CHUNK;
use crate::padding::{BlockDepadder, DepadHandler, PaddingError, PaddingScheme};
use crate::stream::scratch::ScratchPool;
use crate::telemetry::DepadCounters;

pub struct DepadReader<R> {
    inner: R,
    depadder: BlockDepadder,
    cache: BytesMut,
    reached_end: bool,
    chunk_size: usize,
}

impl<R> DepadReader<R> {
    pub fn new(inner: R, scheme: PaddingScheme, block_size: usize) -> Result<Self, PaddingError> {
        let depadder = BlockDepadder::new(scheme, block_size)?;
        Ok(Self::with_depadder(inner, depadder, DEFAULT_READ_CHUNK))
    }

    /// Wrap an already constructed engine; `chunk_size` bounds each pull.
    pub fn with_depadder(inner: R, depadder: BlockDepadder, chunk_size: usize) -> Self {
        Self {
            inner,
            depadder,
            cache: BytesMut::new(),
            reached_end: false,
            chunk_size: chunk_size.max(1),
        }
    }

    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    pub fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    pub fn counters(&self) -> &DepadCounters {
        self.depadder.counters()
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Source exhausted and every depadded byte delivered.
    pub fn is_finished(&self) -> bool {
        self.reached_end && self.cache.is_empty()
    }

    fn wants_more(&self, filled: usize, wanted: usize) -> bool {
        filled < wanted && !self.reached_end
    }

    fn drain_cache(&mut self, buf: &mut [u8]) -> usize {
        let n = buf.len().min(self.cache.len());
        if n > 0 {
            buf[..n].copy_from_slice(&self.cache[..n]);
            self.cache.advance(n);
        }
        n
    }

    /// Feed one pulled chunk; an empty chunk marks end of input.
    fn absorb(&mut self, chunk: &[u8]) -> io::Result<()> {
        if chunk.is_empty() {
            let residue = self.depadder.finalize()?;
            trace!("depad reader: source exhausted, residue {} bytes", residue.len());
            self.cache.extend_from_slice(residue);
            self.reached_end = true;
            return Ok(());
        }

        let out = self.depadder.update(chunk)?;
        trace!("depad reader: pulled {} bytes, released {}", chunk.len(), out.len());
        for part in out.parts() {
            self.cache.extend_from_slice(part);
        }
        Ok(())
    }
}

impl<R: Read> Read for DepadReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }

        let mut filled = self.drain_cache(buf);
        if self.wants_more(filled, buf.len()) {
            let mut scratch = ScratchPool::shared().rent(self.chunk_size);
            while self.wants_more(filled, buf.len()) {
                let n = pull(&mut self.inner, &mut scratch)?;
                self.absorb(&scratch[..n])?;
                filled += self.drain_cache(&mut buf[filled..]);
            }
        }
        Ok(filled)
    }
}

impl<R: AsyncRead + Unpin> DepadReader<R> {
    /// Async counterpart of `Read::read`.
    pub async fn read_async(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }

        let mut filled = self.drain_cache(buf);
        if self.wants_more(filled, buf.len()) {
            let mut scratch = ScratchPool::shared().rent(self.chunk_size);
            while self.wants_more(filled, buf.len()) {
                let n = pull_async(&mut self.inner, &mut scratch).await?;
                self.absorb(&scratch[..n])?;
                filled += self.drain_cache(&mut buf[filled..]);
            }
        }
        Ok(filled)
    }

    /// Read until end of stream, appending to `out`.
    pub async fn read_to_end_async(&mut self, out: &mut Vec<u8>) -> io::Result<usize> {
        let start = out.len();
        let mut buf = vec![0u8; self.chunk_size];
        loop {
            let n = self.read_async(&mut buf).await?;
            if n == 0 {
                break;
            }
            out.extend_from_slice(&buf[..n]);
        }
        Ok(out.len() - start)
    }
}

fn pull<R: Read>(inner: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    loop {
        match inner.read(buf) {
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            other => return other,
        }
    }
}

async fn pull_async<R: AsyncRead + Unpin>(inner: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    loop {
        match inner.read(buf).await {
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            other => return other,
        }
    }
}
