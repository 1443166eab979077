//! Async decompression module
//!
//! Runs the blocking backends on tokio's blocking pool so they can be used
//! from async code without stalling the runtime.

#[cfg(feature = "async")]
pub mod functions {
    use crate::step::{StepDecoder, ZstdStep};
    use crate::{DecodeError, Decompressor, Result};
    use bytes::Bytes;

    pub(crate) fn join_error(err: tokio::task::JoinError) -> DecodeError {
        DecodeError::StreamFailure(std::io::Error::other(err))
    }

    /// Decompress a zstd frame on the blocking pool
    pub async fn decompress_async(data: Bytes) -> Result<Bytes> {
        tokio::task::spawn_blocking(move || {
            let mut decoder = StepDecoder::new(ZstdStep::new()?)?;
            decoder.decompress(&data).map(Bytes::from)
        })
        .await
        .map_err(join_error)?
    }

    /// Async wrapper moving any [`Decompressor`] into blocking tasks
    #[derive(Debug)]
    pub struct AsyncDecoder<D> {
        inner: Option<D>,
    }

    impl<D: Decompressor + Send + 'static> AsyncDecoder<D> {
        /// Wrap a decoder context
        pub fn new(decoder: D) -> Self {
            Self {
                inner: Some(decoder),
            }
        }

        /// Decompress one complete buffer on the blocking pool
        ///
        /// If the blocking task panics the context is lost and later calls
        /// return [`DecodeError::Closed`].
        pub async fn decompress(&mut self, data: Bytes) -> Result<Bytes> {
            let mut decoder = self.inner.take().ok_or(DecodeError::Closed)?;

            let (decoder, result) = tokio::task::spawn_blocking(move || {
                let result = decoder.decompress(&data);
                (decoder, result)
            })
            .await
            .map_err(join_error)?;

            self.inner = Some(decoder);
            result.map(Bytes::from)
        }

        /// Close the wrapped context; calling it again is a no-op
        pub fn close(&mut self) {
            if let Some(mut decoder) = self.inner.take() {
                decoder.close();
            }
        }

        /// Whether the wrapped context has been closed
        pub fn is_closed(&self) -> bool {
            self.inner.is_none()
        }
    }
}

#[cfg(feature = "async")]
pub use functions::*;
