//! padding/scheme.rs
//! Closed set of supported padding schemes.
//!
//! Each scheme binds one size descriptor and one last-block rule. The engine
//! dispatches on the enum and keeps no scheme-specific state of its own.

use std::fmt;
use std::str::FromStr;

use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::constants::{scheme_names, DES_BLOCK_SIZE, ISO7816_MARKER, MAX_BLOCK_SIZE};
use crate::padding::types::{PaddingError, SizeDescriptor};
use crate::padding::validators::{iso7816_padding_len, last_byte_padding_len, zero_padding_len};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaddingScheme {
    #[serde(rename = "zero")]
    Zero,
    #[serde(rename = "ansix923")]
    AnsiX923,
    #[serde(rename = "iso10126")]
    Iso10126,
    #[serde(rename = "pkcs7")]
    Pkcs7,
    #[serde(rename = "pkcs5")]
    Pkcs5,
    #[serde(rename = "iso7816-4")]
    Iso7816_4,
}

impl PaddingScheme {
    pub const ALL: [PaddingScheme; 6] = [
        PaddingScheme::Zero,
        PaddingScheme::AnsiX923,
        PaddingScheme::Iso10126,
        PaddingScheme::Pkcs7,
        PaddingScheme::Pkcs5,
        PaddingScheme::Iso7816_4,
    ];

    /// Block sizes this scheme may be used with.
    pub const fn size_descriptor(&self) -> SizeDescriptor {
        match self {
            PaddingScheme::Zero      => SizeDescriptor::range(1, MAX_BLOCK_SIZE, 1),
            PaddingScheme::AnsiX923  => SizeDescriptor::fixed(DES_BLOCK_SIZE),
            PaddingScheme::Iso10126  => SizeDescriptor::range(1, 255, 1),
            PaddingScheme::Pkcs7     => SizeDescriptor::range(1, 255, 1),
            PaddingScheme::Pkcs5     => SizeDescriptor::fixed(DES_BLOCK_SIZE),
            PaddingScheme::Iso7816_4 => SizeDescriptor::range(1, MAX_BLOCK_SIZE, 1),
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            PaddingScheme::Zero      => scheme_names::ZERO,
            PaddingScheme::AnsiX923  => scheme_names::ANSI_X923,
            PaddingScheme::Iso10126  => scheme_names::ISO10126,
            PaddingScheme::Pkcs7     => scheme_names::PKCS7,
            PaddingScheme::Pkcs5     => scheme_names::PKCS5,
            PaddingScheme::Iso7816_4 => scheme_names::ISO7816_4,
        }
    }

    /// Check `block_size` against the scheme's descriptor.
    pub fn check_block_size(&self, block_size: usize) -> Result<(), PaddingError> {
        let allowed = self.size_descriptor();
        allowed.validate()?;
        if !allowed.is_allowed(block_size) {
            return Err(PaddingError::InvalidBlockSize {
                scheme: *self,
                block_size,
                allowed,
            });
        }
        Ok(())
    }

    /// Number of trailing padding bytes in the final block.
    ///
    /// `block` must be exactly one full block.
    pub fn padding_len(&self, block: &[u8]) -> Result<usize, PaddingError> {
        let result = match self {
            PaddingScheme::Zero => Ok(zero_padding_len(block)),
            PaddingScheme::AnsiX923
            | PaddingScheme::Iso10126
            | PaddingScheme::Pkcs7
            | PaddingScheme::Pkcs5 => last_byte_padding_len(block),
            PaddingScheme::Iso7816_4 => iso7816_padding_len(block),
        };
        result.map_err(|reason| PaddingError::InvalidPadding { scheme: *self, reason })
    }

    /// Pad `data` up to a whole number of blocks.
    ///
    /// Zero padding adds nothing to already aligned input; every other scheme
    /// always appends between 1 and `block_size` bytes.
    pub fn pad(&self, data: &[u8], block_size: usize) -> Result<Vec<u8>, PaddingError> {
        self.check_block_size(block_size)?;

        let rem = data.len() % block_size;
        let n = match self {
            PaddingScheme::Zero if rem == 0 => 0,
            _ => block_size - rem,
        };

        let mut out = Vec::with_capacity(data.len() + n);
        out.extend_from_slice(data);
        if n == 0 {
            return Ok(out);
        }

        match self {
            PaddingScheme::Zero => out.resize(data.len() + n, 0),
            PaddingScheme::Pkcs7 | PaddingScheme::Pkcs5 => out.resize(data.len() + n, n as u8),
            PaddingScheme::AnsiX923 => {
                out.resize(data.len() + n - 1, 0);
                out.push(n as u8);
            }
            PaddingScheme::Iso10126 => {
                let mut filler = vec![0u8; n - 1];
                rand::thread_rng().fill_bytes(&mut filler);
                out.extend_from_slice(&filler);
                out.push(n as u8);
            }
            PaddingScheme::Iso7816_4 => {
                out.push(ISO7816_MARKER);
                out.resize(data.len() + n, 0);
            }
        }
        Ok(out)
    }
}

impl fmt::Display for PaddingScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PaddingScheme {
    type Err = PaddingError;

    /// Case-insensitive; `_` and `-` separators are interchangeable.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        let compact = normalized.replace('-', "");
        PaddingScheme::ALL
            .into_iter()
            .find(|scheme| {
                let name = scheme.name();
                name == normalized || name.replace('-', "") == compact
            })
            .ok_or_else(|| PaddingError::UnknownScheme(s.to_string()))
    }
}
