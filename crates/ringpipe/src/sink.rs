//! Write side of a pipe.

use crate::buffer::SharedRingBuffer;
use crate::{PipeError, PipeMetrics, PipeSource};
use std::io;
use std::sync::Arc;

/// The writing endpoint of a pipe.
///
/// Closing (or dropping) a sink finishes the stream: the reader drains what
/// is buffered and then sees end-of-stream instead of blocking.
#[derive(Debug, Default)]
pub struct PipeSink {
    buffer: Option<Arc<SharedRingBuffer>>,
}

impl PipeSink {
    /// Creates an unconnected sink.
    pub fn new() -> Self {
        Self { buffer: None }
    }

    pub(crate) fn from_buffer(buffer: Arc<SharedRingBuffer>) -> Self {
        Self {
            buffer: Some(buffer),
        }
    }

    /// Binds this sink and `source` to a fresh shared ring sized by the source.
    ///
    /// Same as [`PipeSource::connect`] seen from the other end.
    pub fn connect(&mut self, source: &mut PipeSource) -> Result<(), PipeError> {
        source.connect(self)
    }

    pub(crate) fn bind(&mut self, buffer: Arc<SharedRingBuffer>) {
        debug_assert!(self.buffer.is_none(), "sink bound twice");
        self.buffer = Some(buffer);
    }

    pub(crate) fn shared_buffer(&self) -> Option<&Arc<SharedRingBuffer>> {
        self.buffer.as_ref()
    }

    fn buffer(&self) -> Result<&SharedRingBuffer, PipeError> {
        self.buffer.as_deref().ok_or(PipeError::NotConnected)
    }

    /// Writes one byte, blocking while the ring is full.
    pub fn write_byte(&self, byte: u8) -> Result<(), PipeError> {
        self.buffer()?.put(byte)
    }

    /// Writes all of `bytes` in order, blocking whenever the ring is full.
    pub fn write_bytes(&self, bytes: &[u8]) -> Result<(), PipeError> {
        self.buffer()?.put_slice(bytes)
    }

    /// Declares that no more bytes will be written. Idempotent.
    pub fn finish(&self) {
        if let Some(buffer) = self.buffer.as_deref() {
            buffer.mark_finished();
        }
    }

    /// Closes the write side; equivalent to [`finish`](Self::finish).
    pub fn close(&self) {
        self.finish();
    }

    pub fn is_connected(&self) -> bool {
        self.buffer.is_some()
    }

    /// Returns `true` once this sink has finished the stream.
    pub fn is_finished(&self) -> bool {
        self.buffer.as_deref().is_some_and(SharedRingBuffer::is_finished)
    }

    /// Returns the number of slots in the ring, or `None` while unconnected.
    pub fn capacity(&self) -> Option<usize> {
        self.buffer.as_deref().map(SharedRingBuffer::capacity)
    }

    /// Returns a snapshot of the pipe's counters.
    pub fn metrics(&self) -> PipeMetrics {
        self.buffer
            .as_deref()
            .map_or_else(PipeMetrics::new, SharedRingBuffer::metrics)
    }
}

impl Drop for PipeSink {
    fn drop(&mut self) {
        self.finish();
    }
}

/// `write` blocks until the whole slice is in the ring.
impl io::Write for PipeSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::Write::write(&mut &*self, buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl io::Write for &PipeSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_bytes(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_unconnected_sink() {
        let sink = PipeSink::new();
        assert!(!sink.is_connected());
        assert!(!sink.is_finished());
        assert_eq!(sink.capacity(), None);
        assert_eq!(sink.write_byte(1), Err(PipeError::NotConnected));
        sink.close();
    }

    #[test]
    fn test_connect_from_sink_side() {
        let mut source = PipeSource::new();
        let mut sink = PipeSink::new();
        sink.connect(&mut source).unwrap();

        assert!(source.shares_buffer_with(&sink));
        assert_eq!(sink.capacity(), Some(512));
        assert_eq!(sink.connect(&mut source), Err(PipeError::AlreadyConnected));
        assert_eq!(source.connect(&mut sink), Err(PipeError::AlreadyConnected));
    }

    #[test]
    fn test_write_after_close_fails() {
        let (sink, source) = crate::pipe();
        sink.write_byte(1).unwrap();
        sink.close();
        assert!(sink.is_finished());
        assert_eq!(sink.write_byte(2), Err(PipeError::Closed));
        assert_eq!(source.read_byte().unwrap(), Some(1));
        assert_eq!(source.read_byte().unwrap(), None);
    }

    #[test]
    fn test_drop_finishes_stream() {
        let (sink, source) = crate::pipe();
        sink.write_bytes(&[9, 8]).unwrap();
        drop(sink);

        let mut buf = [0u8; 4];
        assert_eq!(source.read_bytes(&mut buf).unwrap(), Some(2));
        assert_eq!(source.read_bytes(&mut buf).unwrap(), None);
    }

    #[test]
    fn test_io_write() {
        let (mut sink, source) = crate::pipe();
        sink.write_all(b"abc").unwrap();
        sink.flush().unwrap();
        assert_eq!(source.available(), 3);

        source.close();
        let err = sink.write(b"d").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }
}
