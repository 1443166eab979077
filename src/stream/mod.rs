//! Stream-adapter backend
//!
//! Bridges a primitive that only offers a blocking byte-stream reader to the
//! same whole-buffer contract as the step backend. Each call opens a fresh
//! bounded pipe, a producer thread pushes the input into it, and the calling
//! thread pulls fixed-size chunks from the primitive's reader until a short
//! chunk marks the end of output.
//!
//! Cancellation is cooperative: the context owns a child of the caller's
//! [`CancellationToken`], and a watcher thread runs the same teardown as
//! [`StreamDecoder::close`] once it fires. Teardown disconnects the pipes,
//! which unblocks any read or write in flight.

mod pipe;
mod teardown;
mod zstd;

pub use pipe::{pipe, PipeReader, PipeWriter};
pub use self::zstd::ZstdStream;

use crate::config::trace;
use crate::{DecodeError, Decompressor, Result};
use crossbeam_channel::Receiver;
use std::io::{self, Read, Write};
use std::sync::Arc;
use std::thread;
use teardown::Teardown;
use tokio_util::sync::CancellationToken;

/// A primitive that decodes from a blocking reader
pub trait StreamPrimitive: Send + 'static {
    /// Reader yielding decompressed bytes
    type Reader: Read + Send;

    /// Start decoding the compressed bytes arriving on `compressed`
    fn open(&mut self, compressed: PipeReader) -> io::Result<Self::Reader>;
}

/// Configuration options for the stream backend
#[derive(Debug, Clone)]
pub struct StreamOptions {
    /// Size of each chunk pulled from the primitive's reader
    pub chunk_size: usize,
    /// Number of producer writes the pipe holds before blocking
    pub pipe_capacity: usize,
    /// Size of each slice the producer writes into the pipe
    pub write_chunk: usize,
}

impl Default for StreamOptions {
    fn default() -> Self {
        Self {
            chunk_size: 4096,
            pipe_capacity: 4,
            write_chunk: 64 * 1024,
        }
    }
}

impl StreamOptions {
    /// Create options optimized for large inputs
    pub fn large_input() -> Self {
        Self {
            chunk_size: 64 * 1024,
            pipe_capacity: 8,
            write_chunk: 1024 * 1024,
        }
    }

    /// Create options optimized for memory-constrained environments
    pub fn low_memory() -> Self {
        Self {
            chunk_size: 4096,
            pipe_capacity: 2,
            write_chunk: 16 * 1024,
        }
    }
}

/// Whole-buffer decoder bridging a blocking stream primitive
pub struct StreamDecoder<P: StreamPrimitive> {
    shared: Arc<Teardown<P>>,
    closed: Receiver<()>,
    options: StreamOptions,
}

/// Clonable handle that closes a [`StreamDecoder`] from any thread
pub struct CloseHandle<P: StreamPrimitive> {
    shared: Arc<Teardown<P>>,
}

impl<P: StreamPrimitive> Clone for CloseHandle<P> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<P: StreamPrimitive> std::fmt::Debug for CloseHandle<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloseHandle")
            .field("closed", &self.shared.is_released())
            .finish()
    }
}

impl<P: StreamPrimitive> CloseHandle<P> {
    /// Close the decoder; returns whether this call performed the release
    pub fn close(&self) -> bool {
        release(&self.shared, "close handle")
    }
}

fn release<P>(shared: &Teardown<P>, origin: &str) -> bool {
    let released = shared.run();
    if released {
        trace!("stream decoder released by {}", origin);
    }
    released
}

impl<P: StreamPrimitive> StreamDecoder<P> {
    /// Create a decoder with its own cancellation token
    pub fn new(primitive: P) -> Result<Self> {
        Self::with_cancellation(primitive, &CancellationToken::new())
    }

    /// Create a decoder that is torn down when `parent` is cancelled
    pub fn with_cancellation(primitive: P, parent: &CancellationToken) -> Result<Self> {
        Self::with_options(primitive, parent, StreamOptions::default())
    }

    /// Create a decoder with explicit options
    pub fn with_options(
        primitive: P,
        parent: &CancellationToken,
        options: StreamOptions,
    ) -> Result<Self> {
        let token = parent.child_token();
        let (teardown, closed) = Teardown::new(primitive, token.clone());
        let shared = Arc::new(teardown);

        let watched = Arc::clone(&shared);
        thread::Builder::new()
            .name("stream-decoder-watch".to_string())
            .spawn(move || {
                futures::executor::block_on(token.cancelled());
                release(&watched, "cancellation");
            })
            .map_err(|e| {
                DecodeError::PrimitiveInitFailed(format!("cannot spawn watcher thread: {e}"))
            })?;

        trace!(
            "stream decoder created (chunk {} bytes, pipe depth {})",
            options.chunk_size,
            options.pipe_capacity
        );

        Ok(Self {
            shared,
            closed,
            options,
        })
    }

    /// Token cancelled when this decoder is torn down
    pub fn cancellation_token(&self) -> CancellationToken {
        self.shared.token().clone()
    }

    /// Handle that can close this decoder from another thread
    pub fn close_handle(&self) -> CloseHandle<P> {
        CloseHandle {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Whether the decoder has been closed or cancelled
    pub fn is_closed(&self) -> bool {
        self.shared.is_released() || self.shared.token().is_cancelled()
    }

    /// Decompress one complete buffer
    pub fn decompress(&mut self, data: &[u8]) -> Result<Vec<u8>> {
        if self.shared.token().is_cancelled() {
            release(&self.shared, "cancellation");
        }
        if self.shared.is_released() {
            return Err(DecodeError::Closed);
        }
        if data.is_empty() {
            return Ok(Vec::new());
        }

        let (mut writer, compressed) = pipe(self.options.pipe_capacity, self.closed.clone());
        let mut reader = self
            .shared
            .with_primitive(|primitive| primitive.open(compressed))
            .ok_or(DecodeError::Closed)??;

        let write_chunk = self.options.write_chunk.max(1);
        let chunk_size = self.options.chunk_size.max(1);

        let (output, produced) = thread::scope(|scope| {
            let producer = scope.spawn(move || -> io::Result<()> {
                for slice in data.chunks(write_chunk) {
                    writer.write_all(slice)?;
                }
                Ok(())
            });

            let output = read_until_short(&mut reader, chunk_size);
            // Unblocks a producer stuck on a full pipe if decoding stopped early
            drop(reader);
            (output, producer.join())
        });

        let output = output.map_err(|e| {
            log::warn!("stream decompression failed: {}", e);
            DecodeError::StreamFailure(e)
        })?;

        match produced {
            Ok(Ok(())) => {}
            Ok(Err(e)) => trace!("producer stopped early: {}", e),
            Err(_) => {
                return Err(DecodeError::StreamFailure(io::Error::other(
                    "producer thread panicked",
                )))
            }
        }

        trace!("stream decompressed {} -> {} bytes", data.len(), output.len());
        Ok(output)
    }

    /// Release the primitive and disconnect the pipes
    pub fn close(&mut self) {
        release(&self.shared, "close");
    }
}

impl<P: StreamPrimitive> Drop for StreamDecoder<P> {
    fn drop(&mut self) {
        release(&self.shared, "drop");
    }
}

impl<P: StreamPrimitive> std::fmt::Debug for StreamDecoder<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamDecoder")
            .field("closed", &self.shared.is_released())
            .field("options", &self.options)
            .finish()
    }
}

impl<P: StreamPrimitive> Decompressor for StreamDecoder<P> {
    fn decompress(&mut self, data: &[u8]) -> Result<Vec<u8>> {
        StreamDecoder::decompress(self, data)
    }

    fn close(&mut self) {
        StreamDecoder::close(self)
    }
}

/// Read fixed-size chunks until one comes back short
fn read_until_short<R: Read>(reader: &mut R, chunk_size: usize) -> io::Result<Vec<u8>> {
    let mut chunk = vec![0u8; chunk_size];
    let mut output = Vec::new();

    loop {
        let n = fill_chunk(reader, &mut chunk)?;
        output.extend_from_slice(&chunk[..n]);
        if n < chunk.len() {
            return Ok(output);
        }
    }
}

/// Fill `chunk` unless the reader reaches end of output first
fn fill_chunk<R: Read>(reader: &mut R, chunk: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < chunk.len() {
        match reader.read(&mut chunk[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
