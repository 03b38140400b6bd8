//! depad-core
//!
//! Streaming removal of block-cipher padding with one block of look-ahead.
//! No cipher, no I/O runtime, no FFI.

#![forbid(unsafe_code)]

// Shared and top level
pub mod constants;
pub mod types;

pub mod padding;
pub mod telemetry;

// Stream layers
pub mod stream;

// -----------------------------------------------------------------------------
// Prelude (Rust users)
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::padding::{BlockDepadder, DepadHandler, DepadOutput, PaddingError, PaddingScheme};
    pub use crate::stream::{
        depad_stream, ApiConfig, AsyncDepadWriter, DepadParams, DepadReader, DepadWriter,
    };
    pub use crate::types::StreamError;
}
