use std::future::Future;
use std::pin::Pin;

use bytes::Bytes;
use http_body_util::{BodyExt, LengthLimitError, Limited};
use hyper::body::Body;
use thiserror::Error;
use tracing::warn;

/// Largest form body the server will buffer.
pub const MAX_FORM_BYTES: usize = 16 * 1024;

#[derive(Debug, Error)]
pub enum BodyError {
    #[error("request body exceeds {0} bytes")]
    TooLarge(usize),

    #[error("failed to read request body: {0}")]
    Read(String),
}

/// Buffer a request body, refusing anything over `limit` bytes.
pub async fn collect_body<B>(body: B, limit: usize) -> Result<Bytes, BodyError>
where
    B: Body<Data = Bytes> + Send + 'static,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    // Boxed so the `Limited<B>` future does not appear in callers' async
    // state machines (works around a rustc higher-ranked `Send` check issue).
    let collected: Pin<Box<dyn Future<Output = _> + Send>> =
        Box::pin(Limited::new(body, limit).collect());
    match collected.await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(e) if e.is::<LengthLimitError>() => {
            warn!("Rejected request body over {} bytes", limit);
            Err(BodyError::TooLarge(limit))
        }
        Err(e) => Err(BodyError::Read(e.to_string())),
    }
}
