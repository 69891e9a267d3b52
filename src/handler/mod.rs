//! Update handlers — the capability every update source implements, plus the
//! reference remote-check flow shared by conventional update endpoints.
//!
//! A handler answers one question: "does this package have an update, and if
//! so what are its metadata?"  `None` means "no update available" and is an
//! expected outcome, not an error — transport failures, non-200 statuses and
//! undecodable bodies all collapse into it.

pub mod info;

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use tracing::{debug, warn};

use crate::config::UpdaterConfig;
use crate::error::UpdaterError;

pub use info::UpdateInfo;

/// A component that can answer an update-data query for packages originating
/// from one remote source.
pub trait UpdateHandler: Send + Sync {
    /// Update metadata for the package identified by `package_file`, or
    /// `None` when no update is available.
    fn get_update_data(&self, package_file: &str, locales: &[String]) -> Option<UpdateInfo>;
}

/// Boxed handler as stored by the registry.
pub type BoxedHandler = Box<dyn UpdateHandler>;

/// Zero-argument, one-shot handler producer.
pub type HandlerFactory = Box<dyn FnOnce() -> BoxedHandler + Send>;

/// Derive a package slug from its package file: the segment before the first
/// `/`, or the whole string when it contains none.
pub fn slug_from_package_file(package_file: &str) -> &str {
    match package_file.split_once('/') {
        Some((slug, _)) => slug,
        None => package_file,
    }
}

// ── Remote reference flow ─────────────────────────────────────────────────────

/// Default remote-check transport timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// A conventional remote update server: where to ask, and with which headers.
pub trait RemoteSource: Send + Sync {
    /// Endpoint queried for `slug`'s update metadata.
    fn update_uri(&self, slug: &str) -> String;

    /// Extra request headers (auth tokens, accept types). Default: none.
    fn headers(&self) -> HeaderMap {
        HeaderMap::new()
    }
}

/// Reference [`UpdateHandler`] for [`RemoteSource`] endpoints.
///
/// One blocking GET per query, no retry. The response must be HTTP 200 with
/// a non-empty body decodable as [`UpdateInfo`]; anything else is reported
/// through tracing and surfaces as `None`.
pub struct RemoteHandler<S> {
    source: S,
    client: Client,
}

impl<S: RemoteSource> RemoteHandler<S> {
    /// Build a handler with the default 10-second timeout.
    pub fn new(source: S) -> Result<Self, UpdaterError> {
        Self::with_timeout(source, DEFAULT_TIMEOUT)
    }

    /// Build a handler with an explicit transport timeout.
    pub fn with_timeout(source: S, timeout: Duration) -> Result<Self, UpdaterError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| UpdaterError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { source, client })
    }

    /// Build a handler from config: timeout and optional user agent.
    pub fn from_config(source: S, config: &UpdaterConfig) -> Result<Self, UpdaterError> {
        let mut builder = Client::builder().timeout(config.timeout());
        if let Some(ua) = &config.user_agent {
            builder = builder.user_agent(ua.clone());
        }
        let client = builder
            .build()
            .map_err(|e| UpdaterError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { source, client })
    }
}

impl<S: RemoteSource> UpdateHandler for RemoteHandler<S> {
    fn get_update_data(&self, package_file: &str, _locales: &[String]) -> Option<UpdateInfo> {
        let slug = slug_from_package_file(package_file);
        let uri = self.source.update_uri(slug);
        debug!(%slug, %uri, "checking remote for update data");

        let response = match self
            .client
            .get(&uri)
            .headers(self.source.headers())
            .send()
        {
            Ok(r) => r,
            Err(e) => {
                warn!(%uri, error = %e, "update request failed (transport)");
                return None;
            }
        };

        let status = response.status();
        if status != StatusCode::OK {
            debug!(%uri, %status, "update endpoint returned non-200");
            return None;
        }

        let body = match response.text() {
            Ok(b) => b,
            Err(e) => {
                warn!(%uri, error = %e, "failed to read update response body");
                return None;
            }
        };
        if body.is_empty() {
            debug!(%uri, "update endpoint returned empty body");
            return None;
        }

        match serde_json::from_str::<UpdateInfo>(&body) {
            Ok(data) => Some(data),
            Err(e) => {
                warn!(%uri, error = %e, "undecodable update response body");
                None
            }
        }
    }
}
