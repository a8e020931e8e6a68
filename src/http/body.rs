//! Response body types
//!
//! In-memory bodies for generated pages and error text, and a streaming
//! body that reads a file in fixed-size chunks instead of loading it whole.

use http_body_util::combinators::UnsyncBoxBody;
use http_body_util::{BodyExt, Empty, Full};
use hyper::body::{Body, Bytes, Frame, SizeHint};
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::fs::File;
use tokio::io::{AsyncRead, ReadBuf};

/// Body type of every response the server produces
pub type ResponseBody = UnsyncBoxBody<Bytes, io::Error>;

const CHUNK_SIZE: usize = 64 * 1024;

/// Body with the given bytes
pub fn full(data: impl Into<Bytes>) -> ResponseBody {
    Full::new(data.into())
        .map_err(|never| match never {})
        .boxed_unsync()
}

/// Body with no bytes
pub fn empty() -> ResponseBody {
    Empty::new().map_err(|never| match never {}).boxed_unsync()
}

/// Streams exactly `len` bytes of an open file
pub struct FileBody {
    file: File,
    remaining: u64,
    buf: Vec<u8>,
}

impl FileBody {
    pub fn new(file: File, len: u64) -> Self {
        let capacity = usize::try_from(len).map_or(CHUNK_SIZE, |n| n.min(CHUNK_SIZE));
        Self {
            file,
            remaining: len,
            buf: vec![0; capacity],
        }
    }

    pub fn boxed(self) -> ResponseBody {
        BodyExt::boxed_unsync(self)
    }
}

impl Body for FileBody {
    type Data = Bytes;
    type Error = io::Error;

    fn poll_frame(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Bytes>, io::Error>>> {
        let this = &mut *self;
        if this.remaining == 0 {
            return Poll::Ready(None);
        }

        let want = usize::try_from(this.remaining).map_or(this.buf.len(), |n| n.min(this.buf.len()));
        let mut read_buf = ReadBuf::new(&mut this.buf[..want]);
        match Pin::new(&mut this.file).poll_read(cx, &mut read_buf) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(Err(e)) => Poll::Ready(Some(Err(e))),
            Poll::Ready(Ok(())) => {
                let filled = read_buf.filled();
                if filled.is_empty() {
                    // Shrank since Content-Length was sent
                    return Poll::Ready(Some(Err(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        "file ended before its advertised length",
                    ))));
                }
                let chunk = Bytes::copy_from_slice(filled);
                this.remaining -= chunk.len() as u64;
                Poll::Ready(Some(Ok(Frame::data(chunk))))
            }
        }
    }

    fn is_end_stream(&self) -> bool {
        self.remaining == 0
    }

    fn size_hint(&self) -> SizeHint {
        SizeHint::with_exact(self.remaining)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::TestDir;

    #[tokio::test]
    async fn test_file_body_streams_whole_file() {
        let dir = TestDir::new("body-stream");
        let contents: Vec<u8> = (0..200_000u32).map(|i| (i % 251) as u8).collect();
        let path = dir.write("big.bin", &contents);

        let file = File::open(&path).await.unwrap();
        let body = FileBody::new(file, contents.len() as u64);
        assert_eq!(body.size_hint().exact(), Some(200_000));

        let collected = body.collect().await.unwrap().to_bytes();
        assert_eq!(collected.len(), contents.len());
        assert_eq!(&collected[..], &contents[..]);
    }

    #[tokio::test]
    async fn test_file_body_reports_truncation() {
        let dir = TestDir::new("body-truncated");
        let path = dir.write("short.txt", b"abc");

        let file = File::open(&path).await.unwrap();
        let result = FileBody::new(file, 10).collect().await;
        assert_eq!(result.unwrap_err().kind(), io::ErrorKind::UnexpectedEof);
    }

    #[tokio::test]
    async fn test_in_memory_bodies() {
        assert_eq!(full("hello").collect().await.unwrap().to_bytes(), "hello");
        assert!(empty().collect().await.unwrap().to_bytes().is_empty());
        assert_eq!(full("hello").size_hint().exact(), Some(5));
    }
}
