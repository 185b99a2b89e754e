//! Gemini client configuration.

use std::time::Duration;

/// Where requests go and how they authenticate.
#[derive(Clone, PartialEq, Eq)]
pub enum GeminiEndpoint {
    /// `generativelanguage.googleapis.com`, `x-goog-api-key` header.
    GoogleAi { api_key: String },
    /// `{region}-aiplatform.googleapis.com`, bearer token.
    VertexAi {
        project: String,
        region: String,
        access_token: String,
    },
}

impl GeminiEndpoint {
    /// Default API root, without the model path.
    pub fn default_base_url(&self) -> String {
        match self {
            GeminiEndpoint::GoogleAi { .. } => {
                "https://generativelanguage.googleapis.com/v1beta".to_string()
            }
            GeminiEndpoint::VertexAi { region, .. } => {
                format!("https://{region}-aiplatform.googleapis.com/v1")
            }
        }
    }
}

impl std::fmt::Debug for GeminiEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeminiEndpoint::GoogleAi { .. } => f
                .debug_struct("GoogleAi")
                .field("api_key", &"[REDACTED]")
                .finish(),
            GeminiEndpoint::VertexAi {
                project, region, ..
            } => f
                .debug_struct("VertexAi")
                .field("project", project)
                .field("region", region)
                .field("access_token", &"[REDACTED]")
                .finish(),
        }
    }
}

/// Gemini client configuration.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub endpoint: GeminiEndpoint,
    /// Replaces the endpoint's default API root (proxies, tests).
    pub base_url: Option<String>,
    /// Limit on establishing the connection. The call as a whole is
    /// bounded by `ChatSession::with_timeout`.
    pub connect_timeout: Duration,
}

impl GeminiConfig {
    pub fn new(endpoint: GeminiEndpoint) -> Self {
        Self {
            endpoint,
            base_url: None,
            connect_timeout: Duration::from_secs(10),
        }
    }

    pub fn google_ai(api_key: impl Into<String>) -> Self {
        Self::new(GeminiEndpoint::GoogleAi {
            api_key: api_key.into(),
        })
    }

    pub fn vertex_ai(
        project: impl Into<String>,
        region: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Self {
        Self::new(GeminiEndpoint::VertexAi {
            project: project.into(),
            region: region.into(),
            access_token: access_token.into(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// API root in effect, without a trailing slash.
    pub fn base_url(&self) -> String {
        match &self.base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => self.endpoint.default_base_url(),
        }
    }
}
