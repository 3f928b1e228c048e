//! HTTP generation bridge
//!
//! Talks JSON to the generation bridge, which fronts the actual inference
//! service. Compiled in with the `bridge` feature; without it every call
//! reports the service unavailable.

use super::GenerationService;
use crate::error::{Result, SceneError};
use crate::model::{AudioProfile, EmotionalTone, GenerationRequest, GenerationResult, MediaRef};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Request body for `POST /generate`
#[cfg_attr(not(feature = "bridge"), allow(dead_code))]
#[derive(Debug, Serialize)]
struct BridgeRequest<'a> {
    prompt: &'a str,
    emotional_tone: EmotionalTone,
    audio_profile: AudioProfile,
}

impl<'a> From<&'a GenerationRequest> for BridgeRequest<'a> {
    fn from(request: &'a GenerationRequest) -> Self {
        Self {
            prompt: request.prompt(),
            emotional_tone: request.emotional_tone(),
            audio_profile: request.audio_profile(),
        }
    }
}

/// Response body from `POST /generate`
#[cfg_attr(not(feature = "bridge"), allow(dead_code))]
#[derive(Debug, Deserialize)]
struct BridgeResponse {
    success: bool,
    result: Option<GenerationResult>,
    error_code: Option<String>,
    error_message: Option<String>,
}

impl BridgeResponse {
    #[cfg_attr(not(feature = "bridge"), allow(dead_code))]
    fn into_result(self) -> Result<GenerationResult> {
        match (self.success, self.result) {
            (true, Some(result)) => Ok(result),
            (true, None) => Err(SceneError::Service {
                reason: "bridge reported success without a result".to_string(),
            }),
            (false, _) => {
                let message = self
                    .error_message
                    .unwrap_or_else(|| "Unknown generation error".to_string());
                let reason = match self.error_code {
                    Some(code) => format!("{} ({})", message, code),
                    None => message,
                };
                Err(SceneError::Service { reason })
            }
        }
    }
}

/// Generation service reached over HTTP
pub struct HttpGenerationService {
    bridge_url: String,
    timeout_ms: u64,
    #[cfg(feature = "bridge")]
    client: Option<reqwest::Client>,
}

impl HttpGenerationService {
    /// Create a client for the bridge at `bridge_url`
    pub fn new(bridge_url: impl Into<String>, timeout_ms: u64) -> Self {
        let bridge_url = bridge_url.into().trim_end_matches('/').to_string();

        #[cfg(feature = "bridge")]
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| tracing::error!(error = %e, "failed to build HTTP client"))
            .ok();

        Self {
            bridge_url,
            timeout_ms,
            #[cfg(feature = "bridge")]
            client,
        }
    }

    pub fn bridge_url(&self) -> &str {
        &self.bridge_url
    }

    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    #[cfg(feature = "bridge")]
    fn client(&self) -> Result<&reqwest::Client> {
        self.client
            .as_ref()
            .ok_or_else(|| SceneError::ServiceUnavailable {
                reason: "HTTP client could not be initialised".to_string(),
            })
    }

    #[cfg(feature = "bridge")]
    fn map_transport_error(&self, e: reqwest::Error) -> SceneError {
        if e.is_timeout() {
            SceneError::ServiceTimeout {
                timeout_ms: self.timeout_ms,
            }
        } else if e.is_connect() {
            SceneError::ServiceUnavailable {
                reason: format!("Cannot connect to bridge at {}: {}", self.bridge_url, e),
            }
        } else {
            SceneError::Service {
                reason: e.to_string(),
            }
        }
    }

    #[cfg(not(feature = "bridge"))]
    fn not_compiled() -> SceneError {
        SceneError::ServiceUnavailable {
            reason: "HTTP bridge support not compiled. Build with --features bridge".to_string(),
        }
    }
}

#[async_trait]
impl GenerationService for HttpGenerationService {
    fn name(&self) -> &str {
        "http-bridge"
    }

    #[cfg(feature = "bridge")]
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationResult> {
        let url = format!("{}/generate", self.bridge_url);
        tracing::info!(%url, prompt = request.prompt(), "dispatching generation request");

        let response = self
            .client()?
            .post(&url)
            .json(&BridgeRequest::from(&request))
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        if !response.status().is_success() {
            return Err(SceneError::ServiceUnavailable {
                reason: format!("Bridge returned error: {}", response.status()),
            });
        }

        response
            .json::<BridgeResponse>()
            .await
            .map_err(|e| SceneError::Service {
                reason: format!("Invalid response from bridge: {}", e),
            })?
            .into_result()
    }

    #[cfg(not(feature = "bridge"))]
    async fn generate(&self, _request: GenerationRequest) -> Result<GenerationResult> {
        Err(Self::not_compiled())
    }

    #[cfg(feature = "bridge")]
    async fn fetch_media(&self, media: &MediaRef) -> Result<Vec<u8>> {
        let response = self
            .client()?
            .get(media.resolve_url())
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        if !response.status().is_success() {
            return Err(SceneError::Service {
                reason: format!("Fetching {} returned {}", media.kind, response.status()),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.map_transport_error(e))?;
        Ok(bytes.to_vec())
    }

    #[cfg(not(feature = "bridge"))]
    async fn fetch_media(&self, _media: &MediaRef) -> Result<Vec<u8>> {
        Err(Self::not_compiled())
    }

    #[cfg(feature = "bridge")]
    async fn is_available(&self) -> bool {
        let Ok(client) = self.client() else {
            return false;
        };
        let url = format!("{}/health", self.bridge_url);
        match client.get(&url).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    #[cfg(not(feature = "bridge"))]
    async fn is_available(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let service = HttpGenerationService::new("http://localhost:8001/", 1000);
        assert_eq!(service.bridge_url(), "http://localhost:8001");
        assert_eq!(service.timeout_ms(), 1000);
    }

    #[test]
    fn test_request_body_shape() {
        let request =
            GenerationRequest::new(" owl ", EmotionalTone::Sad, AudioProfile::silent()).unwrap();
        let body = serde_json::to_value(BridgeRequest::from(&request)).unwrap();

        assert_eq!(body["prompt"], "owl");
        assert_eq!(body["emotional_tone"], "sad");
        assert_eq!(body["audio_profile"]["include_narration"], false);
        assert_eq!(body["audio_profile"]["narration_volume"], 75);
    }

    #[test]
    fn test_error_response_becomes_service_error() {
        let response: BridgeResponse = serde_json::from_str(
            r#"{"success": false, "result": null, "error_code": "OOM", "error_message": "out of memory"}"#,
        )
        .unwrap();
        let err = response.into_result().unwrap_err();
        assert!(matches!(err, SceneError::Service { .. }));
        assert!(err.to_string().contains("out of memory (OOM)"));
    }

    #[test]
    fn test_success_without_result_is_error() {
        let response: BridgeResponse =
            serde_json::from_str(r#"{"success": true, "result": null, "error_code": null, "error_message": null}"#)
                .unwrap();
        assert!(response.into_result().is_err());
    }

    #[cfg(not(feature = "bridge"))]
    #[tokio::test]
    async fn test_unavailable_without_feature() {
        let service = HttpGenerationService::new("http://localhost:8001", 1000);
        let request =
            GenerationRequest::new("owl", EmotionalTone::Happy, AudioProfile::default()).unwrap();

        let err = service.generate(request).await.unwrap_err();
        assert!(matches!(err, SceneError::ServiceUnavailable { .. }));
        assert!(!service.is_available().await);
    }
}
