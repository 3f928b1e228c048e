//! Generation service boundary
//!
//! This module provides:
//! - `GenerationService` trait for the remote text-to-animation service
//! - A mock service for tests and offline use
//! - An HTTP bridge client (feature `bridge`)

mod bridge;
mod mock;

pub use bridge::HttpGenerationService;
pub use mock::MockGenerationService;

use crate::config::{ServiceBackend, ServiceConfig};
use crate::error::Result;
use crate::model::{GenerationRequest, GenerationResult, MediaRef};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Remote service that turns a request into a multi-track artifact
///
/// Errors of any kind are treated uniformly by the coordinator: the request
/// ends in `Failed` with the error's message as the reason.
#[async_trait]
pub trait GenerationService: Send + Sync {
    /// Short identifier used in logs
    fn name(&self) -> &str;

    /// Generate a result for one request
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationResult>;

    /// Fetch the bytes behind a media reference, for local download
    async fn fetch_media(&self, media: &MediaRef) -> Result<Vec<u8>>;

    /// Check if the service is ready to use
    async fn is_available(&self) -> bool {
        true
    }
}

/// Build the service selected by configuration
pub fn from_config(config: &ServiceConfig) -> Arc<dyn GenerationService> {
    match config.backend {
        ServiceBackend::Mock => Arc::new(MockGenerationService::with_latency(Duration::from_millis(
            config.mock_latency_ms,
        ))),
        ServiceBackend::Http => Arc::new(HttpGenerationService::new(
            config.url.clone(),
            config.timeout_ms,
        )),
    }
}
