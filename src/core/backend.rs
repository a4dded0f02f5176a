//! Backend seam: the two operations the diagnostic needs from a model API.

use crate::core::probe::ErrorSignal;

/// One catalog entry as reported by the backend.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawModel {
    pub name: String,
    pub display_name: Option<String>,
    pub input_token_limit: Option<u64>,
    pub output_token_limit: Option<u64>,
}

/// Errors from a single backend call.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// The API answered with a non-success status.
    #[error("{code} {status}: {message}")]
    Api {
        code: u16,
        status: String,
        message: String,
    },
    /// The request never produced an HTTP status (refused, reset, timed out).
    #[error("Request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("Unexpected response: {0}")]
    Decode(String),
}

/// Drops the request URL: model names and ports carry digits the text rules
/// would read as status codes.
impl From<reqwest::Error> for BackendError {
    fn from(e: reqwest::Error) -> Self {
        BackendError::Transport(e.without_url())
    }
}

impl BackendError {
    /// Normalize into the shape the classifier consumes.
    pub fn signal(&self) -> ErrorSignal {
        match self {
            BackendError::Api { code, status, .. } => ErrorSignal {
                code: Some(*code),
                status: Some(status.clone()).filter(|s| !s.is_empty()),
                text: self.to_string(),
            },
            BackendError::Transport(e) => ErrorSignal {
                code: e.status().map(|s| s.as_u16()),
                status: None,
                text: self.to_string(),
            },
            BackendError::Decode(_) => ErrorSignal::from_text(self.to_string()),
        }
    }
}

/// The catalog and generation operations of a model API.
#[allow(async_fn_in_trait)]
pub trait ModelBackend {
    /// Fetch the full catalog, in the backend's own order.
    async fn list_models(&self) -> Result<Vec<RawModel>, BackendError>;

    /// Issue one generation request. The response content is not needed.
    async fn generate(
        &self,
        model: &str,
        prompt: &str,
        max_output_tokens: u32,
    ) -> Result<(), BackendError>;
}
