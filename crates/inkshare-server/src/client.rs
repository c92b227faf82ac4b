//! In-process client for the service router.
//!
//! Drives the axum [`Router`] directly as a tower service, so the share flow
//! can run against the real handlers without opening a socket. Used by
//! embedders that host the service next to the editor, and by the tests.

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, header},
};
use inkshare_core::blob::sanitize_object_name;
use inkshare_core::share::protocol::{ErrorResponse, UploadResponse};
use inkshare_core::share::TransportResult;
use inkshare_core::{
    BlobError, BlobResult, BlobStore, BoxFuture, Transport, TransportError, TransportResponse,
};
use tower::ServiceExt;

/// Upper bound on response bodies read back from the router.
const MAX_RESPONSE_BYTES: usize = 256 * 1024 * 1024;

/// Client that sends requests straight into a [`Router`].
#[derive(Clone)]
pub struct InProcessClient {
    router: Router,
}

impl InProcessClient {
    pub fn new(router: Router) -> Self {
        Self { router }
    }

    async fn send(&self, request: Request<Body>) -> TransportResult<TransportResponse> {
        let response = match self.router.clone().oneshot(request).await {
            Ok(response) => response,
            Err(never) => match never {},
        };
        let status = response.status().as_u16();
        let body = to_bytes(response.into_body(), MAX_RESPONSE_BYTES)
            .await
            .map_err(|e| TransportError::Body(e.to_string()))?;
        Ok(TransportResponse {
            status,
            body: body.to_vec(),
        })
    }

    fn request(
        method: Method,
        path: &str,
        content_type: &str,
        body: Vec<u8>,
    ) -> TransportResult<Request<Body>> {
        Request::builder()
            .method(method)
            .uri(path)
            .header(header::CONTENT_TYPE, content_type)
            .body(Body::from(body))
            .map_err(|e| TransportError::Request(e.to_string()))
    }

    fn upload_path(object_name: &str) -> BlobResult<String> {
        sanitize_object_name(object_name)
            .map(|name| format!("/uploads/{}", name))
            .ok_or_else(|| BlobError::InvalidName(object_name.to_string()))
    }
}

impl Transport for InProcessClient {
    fn post_json(
        &self,
        path: &str,
        body: Vec<u8>,
    ) -> BoxFuture<'_, TransportResult<TransportResponse>> {
        let request = Self::request(Method::POST, path, "application/json", body);
        Box::pin(async move { self.send(request?).await })
    }
}

/// Turn a failed upload reply into a [`BlobError`].
fn upload_error(response: &TransportResponse, object: &str) -> BlobError {
    let message = serde_json::from_slice::<ErrorResponse>(&response.body)
        .map(|e| e.message)
        .unwrap_or_else(|_| response.text());
    match response.status {
        404 => BlobError::NotFound(object.to_string()),
        400 => BlobError::InvalidName(object.to_string()),
        status => BlobError::Upload(format!("HTTP {}: {}", status, message)),
    }
}

impl BlobStore for InProcessClient {
    fn put(&self, object_name: &str, bytes: Vec<u8>) -> BoxFuture<'_, BlobResult<String>> {
        let path = Self::upload_path(object_name);
        let object = object_name.to_string();
        Box::pin(async move {
            let request = Self::request(Method::PUT, &path?, "application/octet-stream", bytes)
                .map_err(|e| BlobError::Upload(e.to_string()))?;
            let response = self
                .send(request)
                .await
                .map_err(|e| BlobError::Upload(e.to_string()))?;
            if !response.is_success() {
                return Err(upload_error(&response, &object));
            }
            let reply: UploadResponse = serde_json::from_slice(&response.body)
                .map_err(|e| BlobError::Upload(format!("Unreadable upload reply: {}", e)))?;
            Ok(reply.url)
        })
    }

    fn get(&self, object_name: &str) -> BoxFuture<'_, BlobResult<Vec<u8>>> {
        let path = Self::upload_path(object_name);
        let object = object_name.to_string();
        Box::pin(async move {
            let request = Self::request(Method::GET, &path?, "application/octet-stream", Vec::new())
                .map_err(|e| BlobError::Other(e.to_string()))?;
            let response = self
                .send(request)
                .await
                .map_err(|e| BlobError::Other(e.to_string()))?;
            if response.is_success() {
                Ok(response.body)
            } else {
                Err(upload_error(&response, &object))
            }
        })
    }

    fn exists(&self, object_name: &str) -> BoxFuture<'_, BlobResult<bool>> {
        let object = object_name.to_string();
        Box::pin(async move {
            match self.get(&object).await {
                Ok(_) => Ok(true),
                Err(BlobError::NotFound(_)) | Err(BlobError::InvalidName(_)) => Ok(false),
                Err(e) => Err(e),
            }
        })
    }
}
