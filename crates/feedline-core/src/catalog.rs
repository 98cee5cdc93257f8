//! Republishing fetched sources to observers.
//!
//! `SourceCatalog` sits between a [`SourceProvider`] and its consumers: a
//! refresh fetches the current directory and publishes it on a watch channel,
//! so any number of observers see the latest list without issuing their own
//! requests. A failed refresh leaves the previously published list in place.

use tokio::sync::watch;

use crate::errors::FeedError;
use crate::sources::{NewsSource, SourceProvider};

pub struct SourceCatalog {
    provider: Box<dyn SourceProvider>,
    tx: watch::Sender<Vec<NewsSource>>,
}

impl SourceCatalog {
    pub fn new(provider: Box<dyn SourceProvider>) -> Self {
        let (tx, _rx) = watch::channel(Vec::new());
        Self { provider, tx }
    }

    /// Fetch the directory and publish the result.
    ///
    /// On failure the error is logged and the previously published list stays
    /// untouched; the error is still returned so non-interactive callers can
    /// surface it. Swallowing it is the consumer's choice.
    pub async fn refresh(&self) -> Result<(), FeedError> {
        match self.provider.fetch_sources().await {
            Ok(sources) => {
                log::info!("Publishing {} news sources", sources.len());
                // send only fails when every receiver is gone; current() still
                // works through the sender, so keep the new value either way.
                self.tx.send_replace(sources);
                Ok(())
            }
            Err(e) => {
                log::error!("Failed to refresh news sources: {}", e);
                Err(e)
            }
        }
    }

    /// Observe published lists; the receiver immediately holds the latest one.
    pub fn subscribe(&self) -> watch::Receiver<Vec<NewsSource>> {
        self.tx.subscribe()
    }

    /// Snapshot of the latest published list.
    pub fn current(&self) -> Vec<NewsSource> {
        self.tx.borrow().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    struct FixtureProvider {
        fail: Arc<AtomicBool>,
    }

    #[async_trait]
    impl SourceProvider for FixtureProvider {
        async fn fetch_sources(&self) -> Result<Vec<NewsSource>, FeedError> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(FeedError::Http("connection refused".to_string()));
            }
            Ok(vec![NewsSource {
                id: "abc-news".to_string(),
                name: "ABC News".to_string(),
                description: "This is ABC news".to_string(),
                url: None,
                category: None,
                language: None,
                country: None,
            }])
        }
    }

    #[tokio::test]
    async fn refresh_publishes_to_subscribers() {
        let catalog = SourceCatalog::new(Box::new(FixtureProvider {
            fail: Arc::new(AtomicBool::new(false)),
        }));
        let mut rx = catalog.subscribe();
        assert!(rx.borrow().is_empty());

        catalog.refresh().await.unwrap();

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().len(), 1);
        assert_eq!(catalog.current()[0].id, "abc-news");
    }

    #[tokio::test]
    async fn failed_refresh_keeps_previous_list() {
        let fail = Arc::new(AtomicBool::new(false));
        let catalog = SourceCatalog::new(Box::new(FixtureProvider { fail: fail.clone() }));

        catalog.refresh().await.unwrap();
        assert_eq!(catalog.current().len(), 1);

        fail.store(true, Ordering::SeqCst);
        assert!(catalog.refresh().await.is_err());
        assert_eq!(catalog.current().len(), 1);
    }

    #[tokio::test]
    async fn refresh_before_any_success_leaves_catalog_empty() {
        let catalog = SourceCatalog::new(Box::new(FixtureProvider {
            fail: Arc::new(AtomicBool::new(true)),
        }));
        assert!(catalog.refresh().await.is_err());
        assert!(catalog.current().is_empty());
    }
}
