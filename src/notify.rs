//! Best-effort notification of spoken text to a UI listener

use serde::Serialize;

/// Payload posted to the listener endpoint
#[derive(Serialize)]
struct SpeakNotification<'a> {
    text: &'a str,
}

/// Posts assistant speech to a UI listener endpoint, best-effort
///
/// The UI is a convenience, never a dependency: an unreachable listener
/// is logged at debug and otherwise ignored.
#[derive(Clone)]
pub struct UiNotifier {
    client: reqwest::Client,
    endpoint: Option<String>,
}

impl UiNotifier {
    /// Create a notifier for an optional listener endpoint
    #[must_use]
    pub fn new(endpoint: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(2))
            .build()
            .unwrap_or_default();

        Self { client, endpoint }
    }

    /// A notifier that never posts anywhere
    #[must_use]
    pub fn disabled() -> Self {
        Self::new(None)
    }

    /// Post the text to the listener, swallowing any failure
    pub async fn notify(&self, text: &str) {
        let Some(endpoint) = &self.endpoint else {
            return;
        };

        let result = self
            .client
            .post(endpoint)
            .json(&SpeakNotification { text })
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => {
                tracing::trace!(endpoint, "UI notified");
            }
            Ok(response) => {
                tracing::debug!(endpoint, status = %response.status(), "UI listener rejected notification");
            }
            Err(e) => {
                tracing::debug!(endpoint, error = %e, "UI listener not reachable");
            }
        }
    }
}
