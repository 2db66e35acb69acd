//! Identity resolution for attendance check-in
//!
//! Maps a captured probe frame to a known person by comparing it against
//! a gallery of labeled reference images through a cloud face-comparison
//! API. The ledger consumes only the resolved person id.

mod facepp;
mod gallery;
mod resolver;

use async_trait::async_trait;

use crate::Result;

pub use facepp::FaceCompareClient;
pub use gallery::{ReferenceGallery, ReferenceImage};
pub use resolver::FaceMatchResolver;

/// Resolves a probe image to a person id, however matching is implemented
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    /// Resolve a probe image to a known person
    ///
    /// Returns `Ok(None)` when no reference matches; a miss is an
    /// expected outcome, not an error.
    ///
    /// # Errors
    ///
    /// Returns error if resolution cannot be attempted at all
    async fn resolve(&self, probe: &[u8]) -> Result<Option<String>>;
}
