//! Runpack is a block codec for arrays of 32-bit and 64-bit unsigned
//! integers, built for streams where small values dominate but outliers
//! exist: inverted indexes, sorted id lists, telemetry counters.
//!
//! ## Key features
//!
//! - **Optimal sub-run packing**: each block of up to 65536 elements is
//!   split by a dynamic-programming partitioner into sub-runs, and every
//!   sub-run is bit-packed at the smallest supported width that covers its
//!   largest element.
//! - **One-shot, allocation-light API**: [`compress`] and [`uncompress`]
//!   work over caller-provided buffers and run to completion; the only
//!   heap state is a partitioning scratch reused across blocks.
//! - **Two wire families**: the 32-bit and 64-bit codecs share their
//!   structure and are told apart by fixed magic numbers.
//!
//! ## The element count travels out of band
//!
//! The stream does not encode how many elements it holds. [`uncompress`]
//! recovers exactly `dst.len()` elements and trusts the caller to pass the
//! original count; store it alongside the stream.
//!
//! ```
//! use runpack::{compress_to_bytes, uncompress_to_vec};
//!
//! let values: Vec<u32> = (0..1000).map(|i| i % 500).collect();
//! let stream = compress_to_bytes(&values);
//! let decoded = uncompress_to_vec::<u32>(&stream, values.len()).unwrap();
//! assert_eq!(decoded, values);
//! ```

use thiserror::Error;
use zerocopy::SizeError;

mod block;
mod codec;
mod element;
mod pack;
mod partition;
mod unpack;
mod wire;

#[cfg(test)]
mod testutil;

pub use codec::{compress, compress_bound, compress_to_bytes, uncompress, uncompress_to_vec};
pub use element::Element;

/// Errors that can occur while compressing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EncodeErr {
    /// The destination buffer cannot hold the compressed stream. Size it
    /// with [`compress_bound`] to rule this out.
    #[error("output buffer too small")]
    OutputFull,
}

/// Errors that can occur while decompressing.
///
/// Any error leaves the destination buffer indeterminate; callers must key
/// on the result and discard the buffer on failure.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeErr {
    /// The stream does not start with this family's magic number.
    #[error("unknown magic value")]
    Magic,

    /// The stream is truncated: a reader ran past the end of the source.
    #[error("not enough bytes")]
    Length,

    /// The stream is malformed: a reserved control encoding, inconsistent
    /// block framing, or a directory that does not match the element count.
    #[error("invalid encoding")]
    Validity,
}

impl<S, D> From<SizeError<S, D>> for DecodeErr {
    #[track_caller]
    fn from(_: SizeError<S, D>) -> Self {
        DecodeErr::Length
    }
}

/// Asserts that a `Result` is an `Err` matching the given pattern.
#[doc(hidden)]
#[macro_export]
macro_rules! assert_error {
    ($result:expr, $pattern:pat $(,)?) => {
        assert!(matches!($result, Err($pattern)));
    };
    ($result:expr, $pattern:pat, $($arg:tt)+) => {
        assert!(matches!($result, Err($pattern)), $($arg)+);
    };
}
