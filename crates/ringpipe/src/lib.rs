//! RingPipe - Bounded Blocking Byte Pipe
//!
//! A thread-to-thread byte pipe: one [`PipeSink`] writes into a fixed-size
//! circular buffer and one [`PipeSource`] reads from it. Both ends block,
//! the writer while the ring is full and the reader while it is empty.
//!
//! # Key Features
//!
//! - One mutex + condition variable monitor, woken on every state change
//! - Finish protocol: closing the sink lets the reader drain, then see end-of-stream
//! - Close protocol: closing the source tears the pipe down for both ends
//! - `std::io::Read` / `std::io::Write` adapters
//!
//! # Example
//!
//! ```
//! use ringpipe_rs::{PipeSink, PipeSource};
//! use std::thread;
//!
//! let mut source = PipeSource::new();
//! let mut sink = PipeSink::new();
//! source.connect(&mut sink).unwrap();
//!
//! let producer = thread::spawn(move || {
//!     sink.write_bytes(b"hello").unwrap();
//!     // Dropping the sink finishes the stream.
//! });
//!
//! let mut buf = [0u8; 16];
//! let n = source.read_bytes(&mut buf).unwrap().unwrap();
//! assert_eq!(&buf[..n], b"hello");
//! assert_eq!(source.read_byte().unwrap(), None);
//! producer.join().unwrap();
//! ```

mod buffer;
mod config;
mod error;
mod invariants;
mod metrics;
mod pipe;
mod sink;
mod source;

pub use config::{PipeConfig, DEFAULT_CAPACITY, HIGH_THROUGHPUT_CONFIG, LOW_LATENCY_CONFIG};
pub use error::PipeError;
pub use metrics::PipeMetrics;
pub use pipe::{pipe, pipe_with_config};
pub use sink::PipeSink;
pub use source::PipeSource;
