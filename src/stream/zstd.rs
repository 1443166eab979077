//! Blocking zstd reader primitive

use super::{PipeReader, StreamPrimitive};
use std::io::{self, BufReader};

/// Stream primitive backed by `zstd::stream::read::Decoder`
#[derive(Debug, Clone, Default)]
pub struct ZstdStream {
    window_log_max: Option<u32>,
}

impl ZstdStream {
    /// Create a primitive with zstd's default limits
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept frames whose window exceeds the default limit, up to `2^log`
    pub fn with_window_log_max(mut self, log: u32) -> Self {
        self.window_log_max = Some(log);
        self
    }
}

impl StreamPrimitive for ZstdStream {
    type Reader = zstd::stream::read::Decoder<'static, BufReader<PipeReader>>;

    fn open(&mut self, compressed: PipeReader) -> io::Result<Self::Reader> {
        let mut decoder = zstd::stream::read::Decoder::new(compressed)?;
        if let Some(log) = self.window_log_max {
            decoder.window_log_max(log)?;
        }
        Ok(decoder)
    }
}
