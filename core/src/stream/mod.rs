//! stream — adapters that put the depadding engine between a byte source and
//! a byte sink.
//!
//! This module exposes the stable public API for pipelines that consume
//! decrypted-but-padded output from an external cipher transform.

pub mod core;
pub mod io;
pub mod reader;
pub mod scratch;
pub mod writer;

pub use io::{InputSource, OutputSink};
pub use reader::DepadReader;
pub use writer::{AsyncDepadWriter, DepadWriter};

pub use self::core::{
    depad_reader,
    depad_stream,
    depad_to_vec,
    depad_writer,
    validate_params,
    ApiConfig,
    DepadParams,
};
