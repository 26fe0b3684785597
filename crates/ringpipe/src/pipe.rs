//! Pipe construction.

use crate::buffer::SharedRingBuffer;
use crate::{PipeConfig, PipeError, PipeSink, PipeSource};
use std::sync::Arc;
use tracing::debug;

/// Creates a connected pipe with the default 512-slot ring.
///
/// # Example
///
/// ```
/// let (sink, source) = ringpipe_rs::pipe();
/// sink.write_bytes(b"ok").unwrap();
/// assert_eq!(source.available(), 2);
/// ```
pub fn pipe() -> (PipeSink, PipeSource) {
    connected(PipeConfig::default())
}

/// Creates a connected pipe whose ring is built from `config`.
///
/// Fails with [`PipeError::InvalidCapacity`] if the ring would have no usable slot.
pub fn pipe_with_config(config: PipeConfig) -> Result<(PipeSink, PipeSource), PipeError> {
    config.validate()?;
    Ok(connected(config))
}

fn connected(config: PipeConfig) -> (PipeSink, PipeSource) {
    let buffer = Arc::new(SharedRingBuffer::new(config));
    debug!(capacity = config.capacity, "pipe created");
    (
        PipeSink::from_buffer(Arc::clone(&buffer)),
        PipeSource::from_buffer(config, buffer),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipe_is_connected_both_ways() {
        let (mut sink, mut source) = pipe();
        assert!(sink.is_connected());
        assert!(source.is_connected());
        assert!(source.shares_buffer_with(&sink));
        assert_eq!(source.connect(&mut sink), Err(PipeError::AlreadyConnected));
    }

    #[test]
    fn test_pipe_with_config() {
        let (sink, source) = pipe_with_config(PipeConfig::new(4, true)).unwrap();
        assert_eq!(source.capacity(), 4);
        assert_eq!(sink.capacity(), Some(4));

        sink.write_byte(1).unwrap();
        assert_eq!(source.metrics().bytes_written, 1);
        assert_eq!(sink.metrics(), source.metrics());
    }

    #[test]
    fn test_pipe_with_invalid_config() {
        assert_eq!(
            pipe_with_config(PipeConfig::new(0, false)).unwrap_err(),
            PipeError::InvalidCapacity { capacity: 0 }
        );
    }

    #[test]
    fn test_independent_pipes_do_not_share() {
        let (sink_a, _source_a) = pipe();
        let (_sink_b, source_b) = pipe();
        assert!(!source_b.shares_buffer_with(&sink_a));
    }
}
