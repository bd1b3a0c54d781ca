use crate::config::Config;
use crate::error::{FetchError, SetupError};
use crate::http::{build_client, get_limit_status};
use crate::render::{render_instructions, DisplaySurface};
use crate::types::LimitStatus;
use log::{debug, info, warn};
use reqwest::Client;
use url::Url;

/// Owns the HTTP client and the endpoint it reads from.
#[derive(Debug, Clone)]
pub struct StatusFetcher {
    client: Client,
    url: Url,
}

impl StatusFetcher {
    pub fn new(client: Client, url: Url) -> Self {
        Self { client, url }
    }

    pub fn from_config(cfg: &Config) -> Result<Self, SetupError> {
        let url = cfg.limit_url()?;
        let client = build_client(cfg)?;
        Ok(Self::new(client, url))
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Fetch and decode without touching any display.
    pub async fn fetch(&self) -> Result<LimitStatus, FetchError> {
        get_limit_status(&self.client, &self.url).await
    }

    /// Fetch, then render into `view`. On error the view is left as it was.
    pub async fn fetch_and_render<S: DisplaySurface>(
        &self,
        view: &mut StatusView<S>,
    ) -> Result<(), FetchError> {
        let status = self.fetch().await?;
        view.apply(status)
    }
}

/// A display surface plus the last snapshot shown on it. Single writer.
#[derive(Debug, Default)]
pub struct StatusView<S> {
    surface: S,
    last: Option<LimitStatus>,
}

impl<S: DisplaySurface> StatusView<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            last: None,
        }
    }

    /// Render `status` and keep it as the last snapshot.
    ///
    /// The snapshot is only retained once the surface accepted the commit.
    pub fn apply(&mut self, status: LimitStatus) -> Result<(), FetchError> {
        if status.remaining_exceeds_limit() {
            warn!(
                "exporter reports {:?} remaining of a {:?} limit",
                status.pull_remaining, status.pull_limit
            );
        }
        for ins in render_instructions(&status) {
            self.surface.set_text(ins.location, &ins.text);
        }
        self.surface.commit()?;

        if let Some(at) = status.checked_at_time() {
            let age = chrono::Utc::now().signed_duration_since(at);
            debug!("snapshot checked {}s ago", age.num_seconds());
        }
        info!(
            "pull limit for {}: {} of {} remaining",
            status.identity(),
            status
                .pull_remaining
                .map_or_else(|| "?".to_string(), |v| v.to_string()),
            status
                .pull_limit
                .map_or_else(|| "?".to_string(), |v| v.to_string()),
        );
        self.last = Some(status);
        Ok(())
    }

    pub fn last(&self) -> Option<&LimitStatus> {
        self.last.as_ref()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_parts(self) -> (S, Option<LimitStatus>) {
        (self.surface, self.last)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;
    use crate::render::{Location, MemorySurface};
    use std::io;

    struct BrokenSurface;

    impl DisplaySurface for BrokenSurface {
        fn set_text(&mut self, _: Location, _: &str) {}

        fn commit(&mut self) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }
    }

    fn status(remaining: i64) -> LimitStatus {
        LimitStatus {
            pull_limit: Some(100),
            pull_remaining: Some(remaining),
            checked_at: Some("2024-01-01T00:00:00Z".into()),
            ip_address: Some("203.0.113.7".into()),
            ..Default::default()
        }
    }

    #[test]
    fn apply_renders_and_retains() {
        let mut view = StatusView::new(MemorySurface::new());
        view.apply(status(42)).unwrap();
        assert_eq!(view.surface().get(Location::Remaining), Some("42"));
        assert_eq!(view.last(), Some(&status(42)));

        view.apply(status(41)).unwrap();
        assert_eq!(view.surface().get(Location::Remaining), Some("41"));
        assert_eq!(view.surface().commits(), 2);
    }

    #[test]
    fn from_config_reports_bad_url_as_config_error() {
        let cfg = Config::from_lookup(|k| (k == "RLEX_URL").then(|| "ftp://example.org".to_string()));
        let err = StatusFetcher::from_config(&cfg).unwrap_err();
        assert!(matches!(err, SetupError::Config(ConfigError::InvalidUrl { .. })));
        assert!(err.to_string().starts_with("invalid exporter URL"));
    }

    #[test]
    fn failed_commit_keeps_previous_snapshot() {
        let mut view = StatusView::new(BrokenSurface);
        let err = view.apply(status(42)).unwrap_err();
        assert_eq!(err.code(), "display_error");
        assert!(view.last().is_none());
    }
}
