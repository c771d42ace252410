//! Shared HTTP adapter state.
//!
//! Handlers receive this via `actix_web::web::Data` and depend only on the
//! driving ports, so they stay testable without storage.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::DomainError;
use crate::domain::ports::{ReviewCommand, ReviewQuery};

/// Tunables the review handlers read on every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpSettings {
    /// Upper bound on a single service call.
    pub request_timeout: Duration,
    /// `max-age` advertised for stored images.
    pub image_cache_max_age_secs: u64,
    /// Page size used when a listing omits `limit`.
    pub default_list_limit: u32,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(10),
            image_cache_max_age_secs: 30 * 24 * 60 * 60,
            default_list_limit: 10,
        }
    }
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Write side of the review service.
    pub reviews: Arc<dyn ReviewCommand>,
    /// Read side of the review service.
    pub reviews_query: Arc<dyn ReviewQuery>,
    /// Per-request tunables.
    pub settings: HttpSettings,
}

impl HttpState {
    /// Bundle the ports with default settings.
    #[must_use]
    pub fn new(reviews: Arc<dyn ReviewCommand>, reviews_query: Arc<dyn ReviewQuery>) -> Self {
        Self {
            reviews,
            reviews_query,
            settings: HttpSettings::default(),
        }
    }

    /// Replace the settings.
    #[must_use]
    pub const fn with_settings(mut self, settings: HttpSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Run a service call under the configured deadline.
    ///
    /// The call future is dropped when the deadline passes, which abandons any
    /// storage round trip still in flight.
    pub async fn with_deadline<T, F>(&self, call: F) -> Result<T, DomainError>
    where
        F: Future<Output = Result<T, DomainError>>,
    {
        let limit = self.settings.request_timeout;
        tokio::time::timeout(limit, call).await.unwrap_or_else(|_| {
            Err(DomainError::timeout(format!(
                "operation did not complete within {}ms",
                limit.as_millis()
            )))
        })
    }
}
