//! First-match-wins face resolution over the reference gallery

use async_trait::async_trait;

use super::{FaceCompareClient, IdentityResolver, ReferenceGallery};
use crate::Result;

/// Resolves probe frames by scanning the gallery through the compare API
pub struct FaceMatchResolver {
    gallery: ReferenceGallery,
    client: FaceCompareClient,
    threshold: f32,
}

impl FaceMatchResolver {
    /// Create a resolver over a gallery
    ///
    /// `threshold` is the minimum similarity confidence (0-100) for a
    /// comparison to count as a match.
    #[must_use]
    pub fn new(gallery: ReferenceGallery, client: FaceCompareClient, threshold: f32) -> Self {
        Self {
            gallery,
            client,
            threshold,
        }
    }
}

#[async_trait]
impl IdentityResolver for FaceMatchResolver {
    async fn resolve(&self, probe: &[u8]) -> Result<Option<String>> {
        if self.gallery.is_empty() {
            tracing::warn!("reference gallery is empty, nothing to match against");
            return Ok(None);
        }

        for reference in self.gallery.iter() {
            let bytes = match std::fs::read(&reference.path) {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::warn!(
                        person = %reference.person_id,
                        error = %e,
                        "skipping unreadable reference image"
                    );
                    continue;
                }
            };

            // A failed comparison against one reference must not abort the
            // scan; the remaining references may still match.
            match self.client.compare(&bytes, probe).await {
                Ok(Some(confidence)) if confidence >= self.threshold => {
                    tracing::info!(
                        person = %reference.person_id,
                        confidence,
                        "face matched"
                    );
                    return Ok(Some(reference.person_id.clone()));
                }
                Ok(Some(confidence)) => {
                    tracing::debug!(
                        person = %reference.person_id,
                        confidence,
                        threshold = self.threshold,
                        "below threshold"
                    );
                }
                Ok(None) => {
                    tracing::debug!(person = %reference.person_id, "no comparable face pair");
                }
                Err(e) => {
                    tracing::warn!(
                        person = %reference.person_id,
                        error = %e,
                        "comparison failed, skipping reference"
                    );
                }
            }
        }

        tracing::info!("no reference matched the probe");
        Ok(None)
    }
}
