//! Error types for pipe operations.

use std::io;
use thiserror::Error;

/// Errors that can occur on either end of a pipe.
///
/// End-of-stream is not an error: readers see it as `None` (or `Ok(0)`
/// through [`std::io::Read`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PipeError {
    /// The endpoint is already bound to a peer.
    #[error("already connected")]
    AlreadyConnected,

    /// A write was attempted after the pipe was closed or the sink finished.
    #[error("pipe closed")]
    Closed,

    /// A read was attempted after the reader closed the pipe.
    #[error("stream closed")]
    StreamClosed,

    /// The endpoint has no peer yet.
    #[error("pipe not connected")]
    NotConnected,

    /// The configured ring has no usable slot.
    #[error("invalid pipe capacity {capacity} (must be at least 2)")]
    InvalidCapacity {
        /// The rejected capacity.
        capacity: usize,
    },
}

impl PipeError {
    /// Returns `true` if the pipe has been torn down and can never be used again.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Closed | Self::StreamClosed)
    }
}

impl From<PipeError> for io::Error {
    fn from(err: PipeError) -> Self {
        let kind = match err {
            PipeError::Closed => io::ErrorKind::BrokenPipe,
            PipeError::StreamClosed | PipeError::NotConnected => io::ErrorKind::NotConnected,
            PipeError::AlreadyConnected | PipeError::InvalidCapacity { .. } => {
                io::ErrorKind::InvalidInput
            }
        };
        io::Error::new(kind, err)
    }
}
