//! constants.rs
//! Stable defaults and bounds shared by the engine and the stream adapters.

/// Defaults when Option<T> is None
pub const DEFAULT_READ_CHUNK: usize = 4 * 1024; // 4 KiB

/// Smallest pull the read adapter may be configured with.
pub const MIN_READ_CHUNK: usize = 16;

/// Max read chunk sanity bound (1 MiB).
pub const MAX_READ_CHUNK: usize = 1024 * 1024;

/// Number of idle scratch buffers the shared pool keeps around.
pub const SCRATCH_POOL_CAP: usize = 32;

/// Buffers larger than this are never returned to the pool.
pub const SCRATCH_MAX_POOLED: usize = MAX_READ_CHUNK;

/// Largest block size any scheme accepts (Zero, ISO/IEC 7816-4).
pub const MAX_BLOCK_SIZE: usize = 4096;

/// Block size fixed by PKCS#5 and ANSI X9.23.
pub const DES_BLOCK_SIZE: usize = 8;

/// Marker byte that opens ISO/IEC 7816-4 padding.
pub const ISO7816_MARKER: u8 = 0x80;

/// Stable scheme names (config files, logs, `FromStr`).
pub mod scheme_names {
    pub const ZERO: &str      = "zero";
    pub const ANSI_X923: &str = "ansix923";
    pub const ISO10126: &str  = "iso10126";
    pub const PKCS7: &str     = "pkcs7";
    pub const PKCS5: &str     = "pkcs5";
    pub const ISO7816_4: &str = "iso7816-4";
}
