use std::collections::HashSet;
use std::thread;
use std::time::Duration;

use tracing::trace;

use super::{AssetError, AssetKind, AssetRequest};

/// Backend that resolves asset requests. Called from worker threads.
pub trait AssetFetcher: Send + Sync + 'static {
    fn fetch(&self, req: &AssetRequest) -> Result<(), AssetError>;
}

impl<F> AssetFetcher for F
where
    F: Fn(&AssetRequest) -> Result<(), AssetError> + Send + Sync + 'static,
{
    fn fetch(&self, req: &AssetRequest) -> Result<(), AssetError> {
        self(req)
    }
}

/// Fetcher with a fixed set of failing assets and an artificial latency.
///
/// Every asset not listed as failing loads successfully.
#[derive(Debug, Clone, Default)]
pub struct ScriptedFetcher {
    failing: HashSet<(AssetKind, String)>,
    delay: Duration,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail(mut self, kind: AssetKind, id: impl Into<String>) -> Self {
        self.failing.insert((kind, id.into()));
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

impl AssetFetcher for ScriptedFetcher {
    fn fetch(&self, req: &AssetRequest) -> Result<(), AssetError> {
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
        if self.failing.contains(&(req.kind, req.id().to_string())) {
            trace!(url = %req.url, "Scripted asset failure");
            return Err(AssetError::failed(req.kind, req.id(), "unavailable"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::CardKey;
    use crate::models::MediaItem;

    fn request(kind: AssetKind, id: &str) -> AssetRequest {
        AssetRequest::new(CardKey::new(id, 0), kind, &MediaItem::new(id))
    }

    #[test]
    fn test_scripted_failures_are_per_kind() {
        let fetcher = ScriptedFetcher::new().fail(AssetKind::Preview, "bad");
        assert!(fetcher.fetch(&request(AssetKind::Thumbnail, "bad")).is_ok());
        let err = fetcher
            .fetch(&request(AssetKind::Preview, "bad"))
            .unwrap_err();
        assert_eq!(err, AssetError::failed(AssetKind::Preview, "bad", "unavailable"));
        assert!(fetcher.fetch(&request(AssetKind::Preview, "good")).is_ok());
    }

    #[test]
    fn test_closure_fetcher() {
        let fetcher = |req: &AssetRequest| {
            if req.url.contains("maxresdefault") {
                Ok(())
            } else {
                Err(AssetError::failed(req.kind, req.id(), "no embeds"))
            }
        };
        assert!(fetcher.fetch(&request(AssetKind::Thumbnail, "a")).is_ok());
        assert!(fetcher.fetch(&request(AssetKind::Preview, "a")).is_err());
    }
}
