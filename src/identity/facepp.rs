//! Face++ face comparison client

use base64::Engine;

use crate::{Error, Result};

const COMPARE_URL: &str = "https://api-us.faceplusplus.com/facepp/v3/compare";

/// Response from the Face++ compare API
#[derive(serde::Deserialize)]
struct CompareResponse {
    /// Similarity confidence 0-100; absent when no face pair was found
    confidence: Option<f32>,
    error_message: Option<String>,
}

/// Compares two face images and reports a similarity confidence
pub struct FaceCompareClient {
    client: reqwest::Client,
    api_key: String,
    api_secret: String,
}

impl FaceCompareClient {
    /// Create a new face comparison client
    ///
    /// # Errors
    ///
    /// Returns error if credentials are missing
    pub fn new(api_key: String, api_secret: String) -> Result<Self> {
        if api_key.is_empty() || api_secret.is_empty() {
            return Err(Error::Config(
                "Face++ API key and secret required for face matching".to_string(),
            ));
        }

        Ok(Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(15))
                .build()
                .map_err(Error::Http)?,
            api_key,
            api_secret,
        })
    }

    /// Compare a reference image against a probe image
    ///
    /// Returns the similarity confidence (0-100), or `None` when the API
    /// could not find a comparable face pair in the two images.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the API reports an error
    pub async fn compare(&self, reference: &[u8], probe: &[u8]) -> Result<Option<f32>> {
        let engine = base64::engine::general_purpose::STANDARD;

        let form = reqwest::multipart::Form::new()
            .text("api_key", self.api_key.clone())
            .text("api_secret", self.api_secret.clone())
            .text("image_base64_1", engine.encode(reference))
            .text("image_base64_2", engine.encode(probe));

        let response = self
            .client
            .post(COMPARE_URL)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "face compare request failed");
                e
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Face(format!("compare API error {status}: {body}")));
        }

        let result: CompareResponse = response.json().await.map_err(|e| {
            tracing::error!(error = %e, "failed to parse compare response");
            e
        })?;

        if let Some(message) = result.error_message {
            return Err(Error::Face(message));
        }

        tracing::debug!(confidence = ?result.confidence, "face comparison complete");
        Ok(result.confidence)
    }
}
