//! Bounded response body reading
//!
//! Only the head of a page is needed to find its title, so bodies are
//! streamed and cut off after a fixed number of bytes.

use futures::{Stream, StreamExt};
use tokio::time::Instant;

/// Reads at most `limit` bytes from a chunked body and decodes them as text
///
/// Chunks are consumed as the transport yields them; the chunk that crosses
/// the limit is trimmed and reading stops. Malformed UTF-8 is replaced
/// rather than rejected. A transport error ends the read early and whatever
/// arrived before it is returned.
///
/// # Example
///
/// ```
/// use futures::stream;
/// use subdomain_census::crawler::read_truncated;
///
/// # futures::executor::block_on(async {
/// let chunks = stream::iter(vec![Ok::<_, std::io::Error>(b"hello world".to_vec())]);
/// assert_eq!(read_truncated(chunks, 5).await, "hello");
/// # });
/// ```
pub async fn read_truncated<S, B, E>(mut body: S, limit: usize) -> String
where
    S: Stream<Item = Result<B, E>> + Unpin,
    B: AsRef<[u8]>,
    E: std::fmt::Display,
{
    let mut buffer: Vec<u8> = Vec::with_capacity(limit.min(16 * 1024));

    while buffer.len() < limit {
        if !append_chunk(&mut buffer, body.next().await, limit) {
            break;
        }
    }

    String::from_utf8_lossy(&buffer).into_owned()
}

/// Like [`read_truncated`], but gives up waiting for more data at `deadline`
///
/// A body that stalls keeps whatever arrived before the deadline, the same
/// way a transport error does.
pub async fn read_truncated_until<S, B, E>(mut body: S, limit: usize, deadline: Instant) -> String
where
    S: Stream<Item = Result<B, E>> + Unpin,
    B: AsRef<[u8]>,
    E: std::fmt::Display,
{
    let mut buffer: Vec<u8> = Vec::with_capacity(limit.min(16 * 1024));

    while buffer.len() < limit {
        let next = match tokio::time::timeout_at(deadline, body.next()).await {
            Ok(next) => next,
            Err(_) => {
                tracing::debug!("Body stalled after {} bytes", buffer.len());
                break;
            }
        };
        if !append_chunk(&mut buffer, next, limit) {
            break;
        }
    }

    String::from_utf8_lossy(&buffer).into_owned()
}

/// Adds one stream item to the buffer; `false` once the stream is done
fn append_chunk<B, E>(buffer: &mut Vec<u8>, next: Option<Result<B, E>>, limit: usize) -> bool
where
    B: AsRef<[u8]>,
    E: std::fmt::Display,
{
    let chunk = match next {
        Some(Ok(chunk)) => chunk,
        Some(Err(e)) => {
            tracing::debug!("Body stream ended early after {} bytes: {}", buffer.len(), e);
            return false;
        }
        None => return false,
    };

    let chunk = chunk.as_ref();
    let take = chunk.len().min(limit - buffer.len());
    buffer.extend_from_slice(&chunk[..take]);
    true
}
