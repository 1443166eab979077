//! Async wrappers over the blocking backends
#![cfg(feature = "async")]

use bytes::Bytes;
use futures::TryStreamExt;
use oneshot_decode::{
    decompress_async, AsyncBatchDecoder, AsyncDecoder, DecodeError, DecoderOptions, StepDecoder,
    ZstdStep,
};

fn frame(text: &str) -> Bytes {
    Bytes::from(zstd::encode_all(text.as_bytes(), 3).unwrap())
}

#[tokio::test]
async fn test_decompress_async() {
    let output = decompress_async(frame("async one-shot")).await.unwrap();
    assert_eq!(&output[..], b"async one-shot");

    let err = decompress_async(Bytes::from_static(b"not a frame"))
        .await
        .unwrap_err();
    assert!(err.is_corruption());
}

#[tokio::test]
async fn test_async_decoder_reuses_context() {
    let mut decoder = AsyncDecoder::new(StepDecoder::new(ZstdStep::new().unwrap()).unwrap());

    for text in ["first", "second", "third"] {
        let output = decoder.decompress(frame(text)).await.unwrap();
        assert_eq!(&output[..], text.as_bytes());
    }

    decoder.close();
    decoder.close();
    assert!(decoder.is_closed());
    assert!(matches!(
        decoder.decompress(frame("late")).await,
        Err(DecodeError::Closed)
    ));
}

#[cfg(feature = "stream")]
#[tokio::test]
async fn test_async_decoder_over_stream_backend() {
    use oneshot_decode::{StreamDecoder, ZstdStream};

    let mut decoder = AsyncDecoder::new(StreamDecoder::new(ZstdStream::new()).unwrap());
    let text = "stream backend ".repeat(2000);

    let output = decoder.decompress(frame(&text)).await.unwrap();
    assert_eq!(&output[..], text.as_bytes());
}

#[tokio::test]
async fn test_batch_preserves_order() {
    let texts: Vec<String> = (0..32).map(|i| format!("buffer {i} ").repeat(i + 1)).collect();
    let inputs = texts.iter().map(|text| frame(text)).collect();

    let batch = AsyncBatchDecoder::new().with_concurrency(4);
    let outputs = batch.decompress_all(inputs).await.unwrap();

    assert_eq!(outputs.len(), texts.len());
    for (output, text) in outputs.iter().zip(&texts) {
        assert_eq!(&output[..], text.as_bytes());
    }
}

#[tokio::test]
async fn test_batch_fails_on_bad_input() {
    let inputs = vec![
        frame("good"),
        Bytes::from_static(b"definitely not a zstd frame"),
        frame("good"),
    ];
    let batch = AsyncBatchDecoder::default().with_options(DecoderOptions::default());

    assert!(batch.decompress_all(inputs).await.is_err());
}

#[tokio::test]
async fn test_batch_streaming_reports_indices() {
    let inputs: Vec<Bytes> = (0..10).map(|i| frame(&format!("item {i}"))).collect();
    let batch = AsyncBatchDecoder::new().with_concurrency(3);

    let mut results: Vec<(usize, Bytes)> = batch
        .decompress_streaming(inputs)
        .try_collect()
        .await
        .unwrap();
    results.sort_by_key(|(index, _)| *index);

    for (i, (index, output)) in results.iter().enumerate() {
        assert_eq!(*index, i);
        assert_eq!(&output[..], format!("item {i}").as_bytes());
    }
}
