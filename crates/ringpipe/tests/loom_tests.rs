//! Loom-based concurrency tests for ringpipe-rs.
//!
//! Run with: `cargo test --features loom --test loom_tests --release`
//!
//! Loom exhaustively explores all possible thread interleavings to find
//! lost wakeups and deadlocks in the put/take/finish/close monitor.

#![cfg(feature = "loom")]

use loom::sync::{Arc, Condvar, Mutex};
use loom::thread;

/// Simplified pipe monitor for loom testing.
///
/// Same protocol as the crate's ring (one mutex, one condvar, notify on every
/// transition, one slot kept empty), with a tiny capacity to keep the state
/// space manageable for loom's exhaustive search.
struct LoomPipe {
    state: Mutex<State>,
    changed: Condvar,
}

struct State {
    buf: [u8; 3],
    read: usize,
    write: usize,
    closed: bool,
    finished: bool,
}

#[derive(Debug, PartialEq)]
enum LoomError {
    Closed,
    StreamClosed,
}

const CAP: usize = 3;

impl LoomPipe {
    fn new() -> Self {
        Self {
            state: Mutex::new(State {
                buf: [0; CAP],
                read: 0,
                write: 0,
                closed: false,
                finished: false,
            }),
            changed: Condvar::new(),
        }
    }

    fn put(&self, b: u8) -> Result<(), LoomError> {
        let mut s = self.state.lock().unwrap();
        loop {
            if s.closed || s.finished {
                return Err(LoomError::Closed);
            }
            if (s.write + 1) % CAP != s.read {
                break;
            }
            s = self.changed.wait(s).unwrap();
        }
        let w = s.write;
        s.buf[w] = b;
        s.write = (w + 1) % CAP;
        self.changed.notify_all();
        Ok(())
    }

    fn take(&self) -> Result<Option<u8>, LoomError> {
        let mut s = self.state.lock().unwrap();
        loop {
            if s.closed {
                return Err(LoomError::StreamClosed);
            }
            if s.read != s.write {
                break;
            }
            if s.finished {
                return Ok(None);
            }
            s = self.changed.wait(s).unwrap();
        }
        let r = s.read;
        let b = s.buf[r];
        s.read = (r + 1) % CAP;
        self.changed.notify_all();
        Ok(Some(b))
    }

    fn finish(&self) {
        self.state.lock().unwrap().finished = true;
        self.changed.notify_all();
    }

    fn close(&self) {
        let mut s = self.state.lock().unwrap();
        s.closed = true;
        s.read = 0;
        s.write = 0;
        self.changed.notify_all();
    }
}

/// Writer overruns the 2-byte ring; every byte still arrives in order.
#[test]
fn loom_fifo_with_backpressure() {
    loom::model(|| {
        let pipe = Arc::new(LoomPipe::new());
        let writer = Arc::clone(&pipe);

        let producer = thread::spawn(move || {
            for b in 1..=3 {
                writer.put(b).unwrap();
            }
            writer.finish();
        });

        let mut received = Vec::new();
        while let Some(b) = pipe.take().unwrap() {
            received.push(b);
        }

        producer.join().unwrap();
        assert_eq!(received, vec![1, 2, 3]);
    });
}

/// Finish wakes a reader parked on an empty ring.
#[test]
fn loom_finish_wakes_reader() {
    loom::model(|| {
        let pipe = Arc::new(LoomPipe::new());
        let reader = Arc::clone(&pipe);

        let consumer = thread::spawn(move || reader.take());
        pipe.finish();

        assert_eq!(consumer.join().unwrap(), Ok(None));
    });
}

/// Close wakes a writer parked on a full ring.
#[test]
fn loom_close_wakes_writer() {
    loom::model(|| {
        let pipe = Arc::new(LoomPipe::new());
        pipe.put(1).unwrap();
        pipe.put(2).unwrap();

        let writer = Arc::clone(&pipe);
        let producer = thread::spawn(move || writer.put(3));
        pipe.close();

        assert_eq!(producer.join().unwrap(), Err(LoomError::Closed));
        assert_eq!(pipe.take(), Err(LoomError::StreamClosed));
    });
}

/// Close racing a single write: the write either lands before the close or fails.
#[test]
fn loom_close_races_write() {
    loom::model(|| {
        let pipe = Arc::new(LoomPipe::new());
        let writer = Arc::clone(&pipe);

        let producer = thread::spawn(move || writer.put(7));
        pipe.close();

        let result = producer.join().unwrap();
        assert!(result.is_ok() || result == Err(LoomError::Closed));
        assert_eq!(pipe.take(), Err(LoomError::StreamClosed));
    });
}
