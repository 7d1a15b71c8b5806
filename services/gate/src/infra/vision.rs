//! Text detection through the Cloud Vision `images:annotate` REST API.

use anyhow::Context as _;
use base64::{Engine, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};

use crate::domain::repository::{Annotator, BoxFuture};
use crate::error::GateError;

pub const DEFAULT_VISION_ENDPOINT: &str = "https://vision.googleapis.com/v1/images:annotate";

const TEXT_DETECTION: &str = "TEXT_DETECTION";

#[derive(Debug, Serialize)]
struct BatchAnnotateRequest {
    requests: Vec<AnnotateImageRequest>,
}

#[derive(Debug, Serialize)]
struct AnnotateImageRequest {
    image: Image,
    features: Vec<Feature>,
}

#[derive(Debug, Serialize)]
struct Image {
    /// Base64 of the raw image bytes.
    content: String,
}

#[derive(Debug, Serialize)]
struct Feature {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct BatchAnnotateResponse {
    #[serde(default)]
    responses: Vec<serde_json::Value>,
}

fn batch_request(images: &[Vec<u8>]) -> BatchAnnotateRequest {
    BatchAnnotateRequest {
        requests: images
            .iter()
            .map(|bytes| AnnotateImageRequest {
                image: Image {
                    content: STANDARD.encode(bytes),
                },
                features: vec![Feature {
                    kind: TEXT_DETECTION,
                }],
            })
            .collect(),
    }
}

pub struct VisionAnnotator {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl VisionAnnotator {
    pub fn new(endpoint: String, api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
            api_key,
        }
    }

    async fn call(&self, images: Vec<Vec<u8>>) -> anyhow::Result<Vec<serde_json::Value>> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(&batch_request(&images))
            .send()
            .await
            .context("send annotate request")?
            .error_for_status()
            .context("annotate request rejected")?;
        let batch: BatchAnnotateResponse =
            response.json().await.context("decode annotate response")?;
        Ok(batch.responses)
    }
}

impl Annotator for VisionAnnotator {
    fn annotate(
        &self,
        images: Vec<Vec<u8>>,
    ) -> BoxFuture<'_, Result<Vec<serde_json::Value>, GateError>> {
        Box::pin(async move { self.call(images).await.map_err(GateError::Internal) })
    }
}

/// Stand-in when no API key is configured; every call fails with a 500.
pub struct UnconfiguredAnnotator;

impl Annotator for UnconfiguredAnnotator {
    fn annotate(
        &self,
        _images: Vec<Vec<u8>>,
    ) -> BoxFuture<'_, Result<Vec<serde_json::Value>, GateError>> {
        Box::pin(async {
            Err(GateError::Internal(anyhow::anyhow!(
                "annotation backend not configured"
            )))
        })
    }
}
