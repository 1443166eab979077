//! Bounded in-memory byte pipe
//!
//! Connects the producer thread to the blocking reader handed to a stream
//! primitive. Both ends also watch a "closed" channel; disconnecting it
//! fails every blocked read or write immediately.

use crossbeam_channel::{bounded, select, Receiver, Sender};
use std::io::{self, Read, Write};

pub(crate) fn closed_error() -> io::Error {
    io::Error::new(io::ErrorKind::BrokenPipe, "stream decoder closed")
}

/// Create a pipe holding at most `depth` in-flight writes
pub fn pipe(depth: usize, closed: Receiver<()>) -> (PipeWriter, PipeReader) {
    let (tx, rx) = bounded(depth.max(1));
    (
        PipeWriter {
            tx,
            closed: closed.clone(),
        },
        PipeReader {
            rx,
            closed,
            chunk: Vec::new(),
            pos: 0,
        },
    )
}

/// Write end of a pipe; dropping it signals end-of-input
#[derive(Debug)]
pub struct PipeWriter {
    tx: Sender<Vec<u8>>,
    closed: Receiver<()>,
}

impl Write for PipeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }

        select! {
            send(self.tx, buf.to_vec()) -> res => res
                .map(|_| buf.len())
                .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "pipe reader dropped")),
            recv(self.closed) -> _ => Err(closed_error()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Read end of a pipe
#[derive(Debug)]
pub struct PipeReader {
    rx: Receiver<Vec<u8>>,
    closed: Receiver<()>,
    chunk: Vec<u8>,
    pos: usize,
}

impl Read for PipeReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }

        while self.pos >= self.chunk.len() {
            select! {
                recv(self.rx) -> msg => match msg {
                    Ok(chunk) => {
                        self.chunk = chunk;
                        self.pos = 0;
                    }
                    // Writer dropped: end of input
                    Err(_) => return Ok(0),
                },
                recv(self.closed) -> _ => return Err(closed_error()),
            }
        }

        let available = &self.chunk[self.pos..];
        let n = buf.len().min(available.len());
        buf[..n].copy_from_slice(&available[..n]);
        self.pos += n;
        Ok(n)
    }
}
