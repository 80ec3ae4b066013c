//! Object content download, buffered or streaming.

use std::pin::Pin;
use std::task::{Context, Poll};

use axum::http::HeaderMap;
use bytes::{Bytes, BytesMut};
use futures_util::Stream;

use crate::error::{ProxyError, Result};
use crate::gcs::client::{encode_object_path, GcsClient};

/// A fully buffered object body plus the backend's response headers.
#[derive(Debug)]
pub struct BufferedContent {
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// An open media download delivering the body incrementally.
pub struct StreamingContent {
    pub headers: HeaderMap,
    pub stream: ContentStream,
}

impl GcsClient {
    /// Download the whole object into memory.
    ///
    /// On a non-success status the connection is released before the
    /// error surfaces.
    pub async fn fetch_buffered(&self, object_path: &str) -> Result<BufferedContent> {
        let response = self.media_request(object_path).await?;
        let headers = response.headers().clone();
        let body = response.bytes().await?;
        Ok(BufferedContent { headers, body })
    }

    /// Open a media download and return a lazy chunk stream tied to it.
    ///
    /// The backend connection stays open until the stream is exhausted
    /// or dropped. A non-success status fails before any chunk is
    /// yielded.
    pub async fn fetch_streaming(&self, object_path: &str) -> Result<StreamingContent> {
        let response = self.media_request(object_path).await?;
        let headers = response.headers().clone();
        let stream = ContentStream::new(response, self.chunk_size());
        Ok(StreamingContent { headers, stream })
    }

    async fn media_request(&self, object_path: &str) -> Result<reqwest::Response> {
        let url = format!(
            "{}?alt=media",
            self.object_url(&encode_object_path(object_path))
        );
        tracing::debug!(url = %url, "Fetching object content");

        let response = self.authed_get(&url).await?;
        let status = response.status();
        if !status.is_success() {
            // Dropping the response releases the connection before the
            // caller sees the error.
            drop(response);
            return Err(ProxyError::Upstream {
                status: status.as_u16(),
            });
        }
        Ok(response)
    }
}

/// Lazy, finite, non-restartable chunk stream over an open download.
///
/// Bytes arriving from the backend are re-sliced into `chunk_size`
/// pieces; the final chunk carries the remainder. The stream owns the
/// connection: exhaustion or drop (client went away) releases it, so an
/// abandoned download never leaks a backend connection.
pub struct ContentStream {
    inner: Pin<Box<dyn Stream<Item = reqwest::Result<Bytes>> + Send + 'static>>,
    buffer: BytesMut,
    chunk_size: usize,
    done: bool,
}

impl ContentStream {
    fn new(response: reqwest::Response, chunk_size: usize) -> Self {
        Self::from_stream(response.bytes_stream(), chunk_size)
    }

    fn from_stream<S>(stream: S, chunk_size: usize) -> Self
    where
        S: Stream<Item = reqwest::Result<Bytes>> + Send + 'static,
    {
        Self {
            inner: Box::pin(stream),
            buffer: BytesMut::new(),
            chunk_size,
            done: false,
        }
    }
}

impl Stream for ContentStream {
    type Item = Result<Bytes>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.as_mut().get_mut();
        loop {
            if this.buffer.len() >= this.chunk_size {
                let chunk = this.buffer.split_to(this.chunk_size).freeze();
                return Poll::Ready(Some(Ok(chunk)));
            }
            if this.done {
                if this.buffer.is_empty() {
                    return Poll::Ready(None);
                }
                let rest = this.buffer.split().freeze();
                return Poll::Ready(Some(Ok(rest)));
            }
            match this.inner.as_mut().poll_next(cx) {
                Poll::Ready(Some(Ok(bytes))) => {
                    this.buffer.extend_from_slice(&bytes);
                }
                Poll::Ready(Some(Err(e))) => {
                    // Mid-stream failure terminates the stream; buffered
                    // bytes are discarded rather than served as a tail.
                    this.done = true;
                    this.buffer.clear();
                    return Poll::Ready(Some(Err(ProxyError::Transport(e))));
                }
                Poll::Ready(None) => {
                    tracing::debug!("Media download complete");
                    this.done = true;
                }
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::{stream, StreamExt};

    async fn collect(stream: ContentStream) -> Vec<Bytes> {
        stream.map(|chunk| chunk.unwrap()).collect().await
    }

    #[tokio::test]
    async fn test_rechunks_to_fixed_size() {
        let input = stream::iter(vec![
            Ok(Bytes::from_static(b"hello")),
            Ok(Bytes::from_static(b"world")),
        ]);
        let chunks = collect(ContentStream::from_stream(input, 4)).await;
        assert_eq!(chunks, vec![
            Bytes::from_static(b"hell"),
            Bytes::from_static(b"owor"),
            Bytes::from_static(b"ld"),
        ]);
    }

    #[tokio::test]
    async fn test_exact_multiple_has_no_empty_tail() {
        let input = stream::iter(vec![Ok(Bytes::from_static(b"abcdefgh"))]);
        let chunks = collect(ContentStream::from_stream(input, 4)).await;
        assert_eq!(chunks.len(), 2);
        assert!(chunks.iter().all(|c| c.len() == 4));
    }

    #[tokio::test]
    async fn test_empty_body_yields_no_chunks() {
        let input = stream::iter(Vec::<reqwest::Result<Bytes>>::new());
        let chunks = collect(ContentStream::from_stream(input, 4)).await;
        assert!(chunks.is_empty());
    }

    #[tokio::test]
    async fn test_concatenation_reproduces_body() {
        let body: Vec<u8> = (0u16..1000).map(|i| (i % 251) as u8).collect();
        let pieces: Vec<reqwest::Result<Bytes>> = body
            .chunks(7)
            .map(|c| Ok(Bytes::copy_from_slice(c)))
            .collect();
        let chunks = collect(ContentStream::from_stream(stream::iter(pieces), 64)).await;

        assert!(chunks[..chunks.len() - 1].iter().all(|c| c.len() == 64));
        let joined: Vec<u8> = chunks.iter().flat_map(|c| c.iter().copied()).collect();
        assert_eq!(joined, body);
    }
}
