use crate::invariants::{
    debug_assert_bounded_count, debug_assert_closed_empty, debug_assert_index_in_range,
};
use crate::{PipeConfig, PipeError, PipeMetrics};
use parking_lot::{Condvar, Mutex};
use tracing::{debug, trace};

// =============================================================================
// SYNCHRONIZATION STRATEGY
// =============================================================================
//
// The ring is a classic monitor: one mutex guards the storage, both indices
// and the two lifecycle flags, and one condition variable is shared by the
// writer and the reader.
//
// - Every state change (bytes stored, bytes consumed, finished, closed) is
//   followed by `notify_all`.
// - Every wait sits in a loop that re-checks `closed` first, then the
//   full/empty condition, then `finished`. Spurious wakeups simply go round
//   the loop.
// - `Condvar::wait` releases the mutex while parked and reacquires it before
//   returning, so a `put` that completes before a `take` starts is always
//   visible to it.
//
// One slot is always left empty: `read == write` means empty and
// `(write + 1) % capacity == read` means full.
//
// =============================================================================

/// How much a bulk read should gather before returning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Fill {
    /// Keep blocking until the buffer is full or end-of-stream.
    Exact,
    /// Block for the first byte, then return whatever is buffered.
    Available,
}

/// Everything guarded by the ring's mutex.
struct State {
    storage: Box<[u8]>,
    /// Next slot to read.
    read: usize,
    /// Next slot to write.
    write: usize,
    /// Reader released the pipe.
    closed: bool,
    /// Writer declared end-of-stream.
    finished: bool,
    metrics: PipeMetrics,
}

impl State {
    fn new(capacity: usize) -> Self {
        Self {
            storage: vec![0; capacity].into_boxed_slice(),
            read: 0,
            write: 0,
            closed: false,
            finished: false,
            metrics: PipeMetrics::new(),
        }
    }

    #[inline]
    fn capacity(&self) -> usize {
        self.storage.len()
    }

    #[inline]
    fn len(&self) -> usize {
        (self.write + self.capacity() - self.read) % self.capacity()
    }

    #[inline]
    fn is_empty(&self) -> bool {
        self.read == self.write
    }

    #[inline]
    fn is_full(&self) -> bool {
        (self.write + 1) % self.capacity() == self.read
    }

    /// Copies as much of `bytes` as fits. Returns the number of bytes stored.
    fn put_from(&mut self, bytes: &[u8]) -> usize {
        let capacity = self.capacity();
        let free = capacity - 1 - self.len();
        let mut count = bytes.len().min(free);
        let total = count;
        let mut src = bytes;

        // At most two contiguous runs: up to the end of storage, then from 0.
        while count > 0 {
            let run = count.min(capacity - self.write);
            self.storage[self.write..self.write + run].copy_from_slice(&src[..run]);
            self.write = (self.write + run) % capacity;
            src = &src[run..];
            count -= run;
        }

        debug_assert_index_in_range!("write", self.write, capacity);
        debug_assert_bounded_count!(self.len(), capacity);
        total
    }

    /// Moves as many buffered bytes as fit into `out`. Returns the count.
    fn take_into(&mut self, out: &mut [u8]) -> usize {
        let capacity = self.capacity();
        let mut count = out.len().min(self.len());
        let total = count;
        let mut pos = 0;

        while count > 0 {
            let run = count.min(capacity - self.read);
            out[pos..pos + run].copy_from_slice(&self.storage[self.read..self.read + run]);
            self.read = (self.read + run) % capacity;
            pos += run;
            count -= run;
        }

        debug_assert_index_in_range!("read", self.read, capacity);
        total
    }
}

/// Fixed-capacity circular byte store shared by one sink and one source.
///
/// All access goes through the internal lock; endpoints only ever see it
/// behind an `Arc`.
pub(crate) struct SharedRingBuffer {
    state: Mutex<State>,
    /// Signalled on every state transition, for writers and readers alike.
    changed: Condvar,
    enable_metrics: bool,
}

impl SharedRingBuffer {
    /// Creates an empty ring. `config` must already be validated.
    pub(crate) fn new(config: PipeConfig) -> Self {
        debug_assert!(config.validate().is_ok(), "unvalidated pipe config");
        Self {
            state: Mutex::new(State::new(config.capacity)),
            changed: Condvar::new(),
            enable_metrics: config.enable_metrics,
        }
    }

    // ---------------------------------------------------------------------
    // STATUS
    // ---------------------------------------------------------------------

    pub(crate) fn capacity(&self) -> usize {
        self.state.lock().capacity()
    }

    /// Returns the number of unread bytes without blocking.
    pub(crate) fn available(&self) -> usize {
        let state = self.state.lock();
        if state.closed {
            0
        } else {
            state.len()
        }
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    pub(crate) fn is_finished(&self) -> bool {
        self.state.lock().finished
    }

    pub(crate) fn metrics(&self) -> PipeMetrics {
        self.state.lock().metrics
    }

    // ---------------------------------------------------------------------
    // WRITER API
    // ---------------------------------------------------------------------

    /// Stores one byte, blocking while the ring is full.
    #[inline]
    pub(crate) fn put(&self, byte: u8) -> Result<(), PipeError> {
        self.put_slice(&[byte])
    }

    /// Stores every byte of `bytes` in order, blocking whenever the ring is full.
    ///
    /// Bytes are copied in as large batches as the free space allows, and
    /// readers are woken after each batch. If the pipe closes part way
    /// through, `Closed` is returned and the rest of `bytes` is dropped.
    pub(crate) fn put_slice(&self, bytes: &[u8]) -> Result<(), PipeError> {
        let mut state = self.state.lock();
        let mut written = 0;

        loop {
            // The sink only finishes on its own close, so a write after
            // finish is a write to a closed pipe.
            if state.closed || state.finished {
                return Err(PipeError::Closed);
            }
            if written == bytes.len() {
                return Ok(());
            }
            if state.is_full() {
                if self.enable_metrics {
                    state.metrics.writer_waits += 1;
                }
                trace!(pending = bytes.len() - written, "pipe full, writer waiting");
                self.changed.wait(&mut state);
                continue;
            }

            let n = state.put_from(&bytes[written..]);
            written += n;
            if self.enable_metrics {
                state.metrics.bytes_written += n as u64;
            }
            self.changed.notify_all();
        }
    }

    /// Marks the stream finished: buffered bytes stay readable, then readers
    /// see end-of-stream. Idempotent.
    pub(crate) fn mark_finished(&self) {
        let mut state = self.state.lock();
        if !state.finished {
            state.finished = true;
            debug!(buffered = state.len(), "pipe finished by writer");
        }
        self.changed.notify_all();
    }

    // ---------------------------------------------------------------------
    // READER API
    // ---------------------------------------------------------------------

    /// Takes one byte, blocking while the ring is empty and not finished.
    ///
    /// Returns `Ok(None)` at end-of-stream.
    pub(crate) fn take(&self) -> Result<Option<u8>, PipeError> {
        let mut byte = [0u8; 1];
        Ok(self.take_into(&mut byte, Fill::Exact)?.map(|_| byte[0]))
    }

    /// Reads into `out` according to `fill`.
    ///
    /// Returns `Ok(None)` only when nothing was read and end-of-stream was
    /// reached. A short count means end-of-stream (or, for
    /// [`Fill::Available`], that the ring ran dry). An empty `out` returns
    /// `Ok(Some(0))` unless the pipe is closed.
    pub(crate) fn take_into(&self, out: &mut [u8], fill: Fill) -> Result<Option<usize>, PipeError> {
        let mut state = self.state.lock();
        let mut filled = 0;

        loop {
            if state.closed {
                // Bytes already handed over are kept; the next call reports the close.
                return if filled > 0 {
                    Ok(Some(filled))
                } else {
                    Err(PipeError::StreamClosed)
                };
            }
            if filled == out.len() {
                return Ok(Some(filled));
            }
            if !state.is_empty() {
                let n = state.take_into(&mut out[filled..]);
                filled += n;
                if self.enable_metrics {
                    state.metrics.bytes_read += n as u64;
                }
                self.changed.notify_all();
                if fill == Fill::Available {
                    return Ok(Some(filled));
                }
                continue;
            }
            if state.finished {
                return Ok(if filled == 0 { None } else { Some(filled) });
            }

            if self.enable_metrics {
                state.metrics.reader_waits += 1;
            }
            trace!(filled, wanted = out.len(), "pipe empty, reader waiting");
            self.changed.wait(&mut state);
        }
    }

    /// Tears the pipe down: discards buffered bytes and fails every later
    /// read and write. Idempotent.
    pub(crate) fn mark_closed(&self) {
        let mut state = self.state.lock();
        if !state.closed {
            debug!(discarded = state.len(), "pipe closed by reader");
            state.closed = true;
        }
        state.read = 0;
        state.write = 0;
        debug_assert_closed_empty!(state.closed, state.read, state.write);
        self.changed.notify_all();
    }
}

impl std::fmt::Debug for SharedRingBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("SharedRingBuffer")
            .field("capacity", &state.capacity())
            .field("read", &state.read)
            .field("write", &state.write)
            .field("closed", &state.closed)
            .field("finished", &state.finished)
            .finish()
    }
}
