//! The seam between API clients and the HTTP stack.

use std::future::Future;

use crate::client::SfHttpClient;
use crate::error::Result;
use crate::request::RequestBuilder;
use crate::response::RawResponse;

/// Performs one HTTP round trip.
///
/// API clients are generic over this trait so the HTTP stack can be swapped
/// (or stubbed) without touching protocol logic.
pub trait Transport: Send + Sync {
    /// Send the request and return the raw response, whatever its status.
    fn send(&self, request: RequestBuilder) -> impl Future<Output = Result<RawResponse>> + Send;
}

impl Transport for SfHttpClient {
    async fn send(&self, request: RequestBuilder) -> Result<RawResponse> {
        self.execute(request).await
    }
}
