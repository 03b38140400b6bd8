//! padding/types.rs
//! Size descriptors and the padding error taxonomy.

use std::fmt;
use std::io;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::padding::scheme::PaddingScheme;

/// Permissible block sizes for one scheme: `min..=max` in steps of `step`.
///
/// A fixed size is expressed as `min == max` with `step == 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeDescriptor {
    pub min: usize,
    pub max: usize,
    pub step: usize,
}

impl SizeDescriptor {
    /// Checked constructor.
    pub fn new(min: usize, max: usize, step: usize) -> Result<Self, PaddingError> {
        let descriptor = Self { min, max, step };
        descriptor.validate()?;
        Ok(descriptor)
    }

    /// Single permitted size.
    pub const fn fixed(size: usize) -> Self {
        Self { min: size, max: size, step: 0 }
    }

    pub const fn range(min: usize, max: usize, step: usize) -> Self {
        Self { min, max, step }
    }

    /// Reject descriptors that cannot describe any sensible size set.
    pub fn validate(&self) -> Result<(), PaddingError> {
        let bad = self.min == 0
            || self.max == 0
            || self.max < self.min
            || (self.step == 0 && self.min != self.max);
        if bad {
            return Err(PaddingError::InvalidDescriptor {
                min: self.min,
                max: self.max,
                step: self.step,
            });
        }
        Ok(())
    }

    pub fn is_allowed(&self, size: usize) -> bool {
        if self.step == 0 {
            return size == self.min;
        }
        (self.min..=self.max).contains(&size) && (size - self.min) % self.step == 0
    }

    pub fn is_fixed(&self) -> bool {
        self.step == 0
    }
}

impl fmt::Display for SizeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_fixed() {
            write!(f, "{} bytes", self.min)
        } else {
            write!(f, "{}..={} bytes in steps of {}", self.min, self.max, self.step)
        }
    }
}

/// Every failure the depadding engine can report.
///
/// All variants are fatal for the stream that produced them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaddingError {
    /// Block size outside the scheme's descriptor.
    #[error("block size {block_size} is not allowed for {scheme}: expected {allowed}")]
    InvalidBlockSize {
        scheme: PaddingScheme,
        block_size: usize,
        allowed: SizeDescriptor,
    },

    /// Internally inconsistent size descriptor.
    #[error("invalid size descriptor: min={min}, max={max}, step={step}")]
    InvalidDescriptor { min: usize, max: usize, step: usize },

    /// Stream ended with a partial block held.
    #[error("stream length is not a multiple of the block size: {held} of {block_size} bytes in final block")]
    Alignment { held: usize, block_size: usize },

    /// Final block failed the scheme's padding rule.
    #[error("invalid {scheme} padding: {reason}")]
    InvalidPadding {
        scheme: PaddingScheme,
        reason: &'static str,
    },

    /// `update` or `finalize` called after `finalize`.
    #[error("depadder already finalized")]
    Finalized,

    /// Unrecognized scheme name in configuration.
    #[error("unknown padding scheme: {0}")]
    UnknownScheme(String),
}

impl PaddingError {
    /// Recover the engine error carried inside an adapter's `io::Error`.
    pub fn from_io(err: &io::Error) -> Option<&PaddingError> {
        err.get_ref()?.downcast_ref::<PaddingError>()
    }

    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            PaddingError::Alignment { .. } | PaddingError::InvalidPadding { .. }
        )
    }
}

impl From<PaddingError> for io::Error {
    fn from(e: PaddingError) -> Self {
        let kind = match e {
            PaddingError::Alignment { .. } | PaddingError::InvalidPadding { .. } => {
                io::ErrorKind::InvalidData
            }
            _ => io::ErrorKind::InvalidInput,
        };
        io::Error::new(kind, e)
    }
}
