//! stream/writer.rs
//! Push-model adapters: every write goes through the engine and the released
//! bytes are forwarded to the wrapped sink straight away; closing finalizes.
//!
//! - `DepadWriter` wraps a `std::io::Write` and closes itself on drop.
//! - `AsyncDepadWriter` wraps a `futures::io::AsyncWrite`; it cannot finalize
//!   on drop and must be closed with `close_async`.

use std::io::{self, Write};

use futures::io::{AsyncWrite, AsyncWriteExt};
use log::{trace, warn};

use crate::padding::{BlockDepadder, DepadHandler, PaddingError, PaddingScheme};
use crate::telemetry::DepadCounters;

/// Engine plus the one-shot close guard shared by both writers.
struct WriteCore {
    depadder: BlockDepadder,
    leave_open: bool,
    closed: bool,
}

impl WriteCore {
    fn new(depadder: BlockDepadder, leave_open: bool) -> Self {
        Self { depadder, leave_open, closed: false }
    }

    fn ensure_writable(&self) -> io::Result<()> {
        if self.closed {
            return Err(PaddingError::Finalized.into());
        }
        Ok(())
    }

    /// Returns false if the close already ran.
    fn begin_close(&mut self) -> bool {
        !std::mem::replace(&mut self.closed, true)
    }
}

fn sink_gone() -> io::Error {
    io::Error::new(io::ErrorKind::BrokenPipe, "depad writer target already released")
}

pub struct DepadWriter<W: Write> {
    inner: Option<W>,
    core: WriteCore,
}

impl<W: Write> DepadWriter<W> {
    pub fn new(inner: W, scheme: PaddingScheme, block_size: usize) -> Result<Self, PaddingError> {
        let depadder = BlockDepadder::new(scheme, block_size)?;
        Ok(Self::with_depadder(inner, depadder, false))
    }

    /// With `leave_open`, `close` flushes the target but keeps it available
    /// through `get_mut` / `into_inner`.
    pub fn with_depadder(inner: W, depadder: BlockDepadder, leave_open: bool) -> Self {
        Self { inner: Some(inner), core: WriteCore::new(depadder, leave_open) }
    }

    pub fn get_ref(&self) -> Option<&W> {
        self.inner.as_ref()
    }

    pub fn get_mut(&mut self) -> Option<&mut W> {
        self.inner.as_mut()
    }

    pub fn counters(&self) -> &DepadCounters {
        self.core.depadder.counters()
    }

    pub fn is_closed(&self) -> bool {
        self.core.closed
    }

    /// Finalize, write the residue and release the target.
    ///
    /// Runs once; later calls return `Ok(())`. On a finalize error the target
    /// is still released and whatever was already written must be discarded.
    pub fn close(&mut self) -> io::Result<()> {
        if !self.core.begin_close() {
            return Ok(());
        }
        let finished = self.write_residue();
        let released = self.release();
        finished.and(released)
    }

    /// Close and hand the target back regardless of `leave_open`.
    pub fn finish(mut self) -> io::Result<W> {
        self.core.leave_open = true;
        self.close()?;
        self.inner.take().ok_or_else(sink_gone)
    }

    /// Target after a `leave_open` close.
    pub fn into_inner(mut self) -> Option<W> {
        self.inner.take()
    }

    fn write_residue(&mut self) -> io::Result<()> {
        let residue = self.core.depadder.finalize()?;
        trace!("depad writer: closing, residue {} bytes", residue.len());
        if residue.is_empty() {
            return Ok(());
        }
        match self.inner.as_mut() {
            Some(w) => w.write_all(residue),
            None => Err(sink_gone()),
        }
    }

    fn release(&mut self) -> io::Result<()> {
        let flushed = match self.inner.as_mut() {
            Some(w) => w.flush(),
            None => Ok(()),
        };
        if !self.core.leave_open {
            self.inner = None;
        }
        flushed
    }
}

impl<W: Write> Write for DepadWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.core.ensure_writable()?;
        let out = self.core.depadder.update(buf)?;
        let w = self.inner.as_mut().ok_or_else(sink_gone)?;
        trace!("depad writer: accepted {} bytes, forwarding {}", buf.len(), out.len());
        for part in out.parts() {
            if !part.is_empty() {
                w.write_all(part)?;
            }
        }
        Ok(buf.len())
    }

    /// Flushes the target only; the held block stays held.
    fn flush(&mut self) -> io::Result<()> {
        match self.inner.as_mut() {
            Some(w) => w.flush(),
            None => Ok(()),
        }
    }
}

impl<W: Write> Drop for DepadWriter<W> {
    fn drop(&mut self) {
        if self.core.closed {
            return;
        }
        if let Err(e) = self.close() {
            warn!("depad writer: implicit close failed: {e}");
        }
    }
}

pub struct AsyncDepadWriter<W: AsyncWrite + Unpin> {
    inner: Option<W>,
    core: WriteCore,
}

impl<W: AsyncWrite + Unpin> AsyncDepadWriter<W> {
    pub fn new(inner: W, scheme: PaddingScheme, block_size: usize) -> Result<Self, PaddingError> {
        let depadder = BlockDepadder::new(scheme, block_size)?;
        Ok(Self::with_depadder(inner, depadder, false))
    }

    pub fn with_depadder(inner: W, depadder: BlockDepadder, leave_open: bool) -> Self {
        Self { inner: Some(inner), core: WriteCore::new(depadder, leave_open) }
    }

    pub fn get_mut(&mut self) -> Option<&mut W> {
        self.inner.as_mut()
    }

    pub fn into_inner(mut self) -> Option<W> {
        self.inner.take()
    }

    pub fn counters(&self) -> &DepadCounters {
        self.core.depadder.counters()
    }

    pub fn is_closed(&self) -> bool {
        self.core.closed
    }

    /// Async counterpart of `Write::write`; always consumes all of `buf`.
    pub async fn write_async(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.core.ensure_writable()?;
        let out = self.core.depadder.update(buf)?;
        let w = self.inner.as_mut().ok_or_else(sink_gone)?;
        trace!("depad writer: accepted {} bytes, forwarding {}", buf.len(), out.len());
        for part in out.parts() {
            if !part.is_empty() {
                w.write_all(part).await?;
            }
        }
        Ok(buf.len())
    }

    pub async fn flush_async(&mut self) -> io::Result<()> {
        match self.inner.as_mut() {
            Some(w) => w.flush().await,
            None => Ok(()),
        }
    }

    /// Finalize, write the residue, then close the target (or only flush it
    /// with `leave_open`). Runs once.
    pub async fn close_async(&mut self) -> io::Result<()> {
        if !self.core.begin_close() {
            return Ok(());
        }

        let finished = match self.core.depadder.finalize() {
            Ok(residue) if residue.is_empty() => Ok(()),
            Ok(residue) => match self.inner.as_mut() {
                Some(w) => w.write_all(residue).await,
                None => Err(sink_gone()),
            },
            Err(e) => Err(e.into()),
        };

        let released = match self.inner.as_mut() {
            Some(w) if self.core.leave_open => w.flush().await,
            Some(w) => w.close().await,
            None => Ok(()),
        };
        if !self.core.leave_open {
            self.inner = None;
        }
        finished.and(released)
    }
}

impl<W: AsyncWrite + Unpin> Drop for AsyncDepadWriter<W> {
    fn drop(&mut self) {
        if !self.core.closed {
            warn!("async depad writer dropped before close_async; output is incomplete");
        }
    }
}
