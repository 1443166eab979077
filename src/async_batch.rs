//! Async batch decompression module
//!
//! Decompresses many buffers concurrently. Every in-flight buffer gets its
//! own decoder context, so no context is ever shared between tasks.

#[cfg(feature = "async")]
/// Concurrent decompression with a configurable concurrency limit
pub mod processor {
    use crate::async_decode::functions::join_error;
    use crate::config::DecoderOptions;
    use crate::step::{StepDecoder, ZstdStep};
    use crate::Result;
    use bytes::Bytes;
    use futures::stream::{self, StreamExt, TryStreamExt};

    /// Concurrent batch decoder
    #[derive(Debug, Clone)]
    pub struct AsyncBatchDecoder {
        concurrency_limit: usize,
        options: DecoderOptions,
    }

    impl AsyncBatchDecoder {
        /// Create a batch decoder with one task per CPU
        pub fn new() -> Self {
            Self {
                concurrency_limit: num_cpus::get(),
                options: DecoderOptions::from_globals(),
            }
        }

        /// Set the concurrency limit
        pub fn with_concurrency(mut self, limit: usize) -> Self {
            self.concurrency_limit = limit.max(1);
            self
        }

        /// Set the options used for every context
        pub fn with_options(mut self, options: DecoderOptions) -> Self {
            self.options = options;
            self
        }

        /// Decompress all inputs, returning outputs in input order
        pub async fn decompress_all(&self, inputs: Vec<Bytes>) -> Result<Vec<Bytes>> {
            stream::iter(inputs.into_iter().map(|data| {
                let options = self.options.clone();
                async move { decompress_one(options, data).await }
            }))
            .buffered(self.concurrency_limit)
            .try_collect()
            .await
        }

        /// Stream `(index, output)` pairs as they complete
        pub fn decompress_streaming(
            &self,
            inputs: Vec<Bytes>,
        ) -> impl futures::Stream<Item = Result<(usize, Bytes)>> + '_ {
            stream::iter(inputs.into_iter().enumerate().map(move |(index, data)| {
                let options = self.options.clone();
                async move {
                    let output = decompress_one(options, data).await?;
                    Ok((index, output))
                }
            }))
            .buffer_unordered(self.concurrency_limit)
        }
    }

    impl Default for AsyncBatchDecoder {
        fn default() -> Self {
            Self::new()
        }
    }

    async fn decompress_one(options: DecoderOptions, data: Bytes) -> Result<Bytes> {
        tokio::task::spawn_blocking(move || {
            let mut decoder = StepDecoder::with_options(ZstdStep::new()?, options)?;
            decoder.decompress(&data).map(Bytes::from)
        })
        .await
        .map_err(join_error)?
    }
}

#[cfg(feature = "async")]
pub use processor::AsyncBatchDecoder;
