//! Demonstration of ringpipe-rs features.
//!
//! Run with: `RUST_LOG=ringpipe_rs=debug cargo run -p ringpipe-rs --features demo --bin pipe_demo`

use ringpipe_rs::{pipe, pipe_with_config, PipeConfig, PipeError, PipeSink, PipeSource};
use std::io::{BufRead, BufReader, Write};
use std::thread;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_thread_names(true)
        .init();

    info!("=== ringpipe-rs Demo ===");

    demo_basic_usage()?;
    demo_backpressure()?;
    demo_end_of_stream()?;
    demo_reader_close()?;
    demo_line_protocol()?;

    info!("=== All demos completed successfully! ===");
    Ok(())
}

/// Demo 1: Connect two endpoints and move bytes between threads
fn demo_basic_usage() -> Result<(), Box<dyn std::error::Error>> {
    info!("--- Demo 1: Basic Usage ---");

    let mut source = PipeSource::new();
    let mut sink = PipeSink::new();
    source.connect(&mut sink)?;

    let producer = thread::Builder::new()
        .name("producer".into())
        .spawn(move || -> Result<(), PipeError> {
            for b in b"hello, pipe" {
                sink.write_byte(*b)?;
            }
            Ok(())
        })?;

    let mut text = Vec::new();
    while let Some(b) = source.read_byte()? {
        text.push(b);
    }
    producer.join().map_err(|_| "producer panicked")??;

    info!(text = %String::from_utf8_lossy(&text), "received");
    Ok(())
}

/// Demo 2: A small ring throttles a fast writer
fn demo_backpressure() -> Result<(), Box<dyn std::error::Error>> {
    info!("--- Demo 2: Backpressure ---");

    let (sink, source) = pipe_with_config(PipeConfig::new(8, true))?;

    let producer = thread::Builder::new()
        .name("producer".into())
        .spawn(move || sink.write_bytes(&[7u8; 100]))?;

    let mut buf = [0u8; 10];
    let mut total = 0;
    while let Some(n) = source.read_bytes(&mut buf)? {
        total += n;
        thread::sleep(Duration::from_millis(1));
    }
    producer.join().map_err(|_| "producer panicked")??;

    let metrics = source.metrics();
    info!(
        total,
        writer_waits = metrics.writer_waits,
        reader_waits = metrics.reader_waits,
        "drained through an 8-slot ring"
    );
    Ok(())
}

/// Demo 3: Finish keeps buffered data readable, then reports end-of-stream
fn demo_end_of_stream() -> Result<(), Box<dyn std::error::Error>> {
    info!("--- Demo 3: End Of Stream ---");

    let (sink, source) = pipe();
    sink.write_bytes(&[1, 2])?;
    sink.finish();

    let reads = [source.read_byte()?, source.read_byte()?, source.read_byte()?];
    info!(?reads, "reads after finish");
    Ok(())
}

/// Demo 4: Closing the reader tears the pipe down for both ends
fn demo_reader_close() -> Result<(), Box<dyn std::error::Error>> {
    info!("--- Demo 4: Reader Close ---");

    let (sink, source) = pipe();
    sink.write_bytes(b"discarded")?;
    source.close();

    let write = sink.write_byte(0);
    let read = source.read_byte();
    info!(?write, ?read, "after close");
    Ok(())
}

/// Demo 5: std::io adapters carry a line protocol
fn demo_line_protocol() -> Result<(), Box<dyn std::error::Error>> {
    info!("--- Demo 5: std::io Adapters ---");

    let (mut sink, source) = pipe();
    let producer = thread::Builder::new()
        .name("producer".into())
        .spawn(move || -> std::io::Result<()> {
            for i in 0..3 {
                writeln!(sink, "line {}", i)?;
            }
            Ok(())
        })?;

    for line in BufReader::new(source).lines() {
        info!(line = %line?, "read line");
    }
    producer.join().map_err(|_| "producer panicked")??;
    Ok(())
}
