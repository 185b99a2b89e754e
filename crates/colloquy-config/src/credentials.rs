//! Startup credential resolution.
//!
//! Credentials are read once, before any provider exists, and handed to
//! the provider as a plain value. The lookup function is injected so tests
//! never touch the process environment.

use std::fmt;

use colloquy_common::ConfigError;
use tracing::debug;

use crate::schema::Backend;

pub const GEMINI_API_KEY: &str = "GEMINI_API_KEY";
pub const GOOGLE_CLOUD_PROJECT: &str = "GOOGLE_CLOUD_PROJECT";
pub const GOOGLE_CLOUD_REGION: &str = "GOOGLE_CLOUD_REGION";
pub const GOOGLE_ACCESS_TOKEN: &str = "GOOGLE_ACCESS_TOKEN";

/// Everything needed to authenticate against one backend.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    GoogleAi {
        api_key: String,
    },
    VertexAi {
        project: String,
        region: String,
        access_token: String,
    },
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::GoogleAi { .. } => f
                .debug_struct("GoogleAi")
                .field("api_key", &"[REDACTED]")
                .finish(),
            Credentials::VertexAi {
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

impl Credentials {
    /// Resolve credentials for `backend` from the process environment.
    pub fn from_env(backend: Backend) -> Result<Self, ConfigError> {
        Self::resolve(backend, |name| std::env::var(name).ok())
    }

    /// Resolve credentials for `backend` through `lookup`.
    ///
    /// Empty or whitespace-only values count as missing. For Vertex AI the
    /// first missing variable is reported.
    pub fn resolve<F>(backend: Backend, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |name: &str| -> Result<String, ConfigError> {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| ConfigError::MissingCredential(name.to_string()))
        };

        let credentials = match backend {
            Backend::GoogleAi => Credentials::GoogleAi {
                api_key: require(GEMINI_API_KEY)?,
            },
            Backend::VertexAi => Credentials::VertexAi {
                project: require(GOOGLE_CLOUD_PROJECT)?,
                region: require(GOOGLE_CLOUD_REGION)?,
                access_token: require(GOOGLE_ACCESS_TOKEN)?,
            },
        };

        debug!(backend = %backend, "credentials resolved");
        Ok(credentials)
    }

    pub fn backend(&self) -> Backend {
        match self {
            Credentials::GoogleAi { .. } => Backend::GoogleAi,
            Credentials::VertexAi { .. } => Backend::VertexAi,
        }
    }
}
