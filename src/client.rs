//! High-level media client
//!
//! Ties configuration, request construction, the fetcher and the engine
//! together. Each search builds a fresh engine, so one client can serve many
//! calls while no aggregation state outlives its call.

use crate::config::Config;
use crate::endpoint::{build_seed_requests, Endpoint, Seed};
use crate::engine::{AcceptancePredicate, Aggregation, Engine, PageRequest, SatisfactionPolicy};
use crate::fetcher::{HttpPageFetcher, PageFetcher};
use crate::media::{accept_all, has_all_tags, MediaItem};
use crate::{EndpointError, RippleError};
use std::sync::Arc;

/// Searches the media API by tag, location or user
pub struct MediaClient<F = HttpPageFetcher> {
    config: Config,
    endpoint: Endpoint,
    fetcher: Arc<F>,
}

impl MediaClient<HttpPageFetcher> {
    /// Creates a client that talks HTTP to the configured API
    pub fn new(config: Config) -> Result<Self, RippleError> {
        let fetcher =
            HttpPageFetcher::from_config(&config.user_agent, config.api.request_timeout())?;
        Self::with_fetcher(config, fetcher)
    }
}

impl<F: PageFetcher<Item = MediaItem>> MediaClient<F> {
    /// Creates a client around any page fetcher
    pub fn with_fetcher(config: Config, fetcher: F) -> Result<Self, RippleError> {
        let engine = config.engine.engine_config();
        crate::config::validate_engine_config(&engine)?;
        let endpoint = Endpoint::from_config(&config.api, engine.page_size)?;

        Ok(Self {
            config,
            endpoint,
            fetcher: Arc::new(fetcher),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Resolves seeds into the first request of each lineage
    pub fn seed_requests(&self, seeds: &[Seed]) -> Result<Vec<PageRequest>, EndpointError> {
        build_seed_requests(&self.endpoint, seeds)
    }

    /// Runs one aggregation over arbitrary seeds
    pub async fn aggregate(
        &self,
        seeds: &[Seed],
        predicate: &AcceptancePredicate<MediaItem>,
        policy: &dyn SatisfactionPolicy<MediaItem>,
    ) -> Result<Aggregation<MediaItem>, RippleError> {
        let requests = self.seed_requests(seeds)?;
        let config = self.config.engine.engine_config();
        let engine = Engine::with_shared_fetcher(config, Arc::clone(&self.fetcher))?;
        engine.aggregate(requests, predicate, policy).await
    }

    /// Recent media carrying every one of `tags`
    ///
    /// One lineage runs per tag; an item is kept only if it has all the tags.
    pub async fn tags_media_recent(
        &self,
        tags: &[String],
    ) -> Result<Aggregation<MediaItem>, RippleError> {
        let seeds: Vec<Seed> = tags.iter().map(|tag| Seed::Tag(tag.clone())).collect();
        let policy = self.config.engine.engine_config().threshold_policy();
        self.aggregate(&seeds, &has_all_tags(tags), &policy).await
    }

    /// Media taken around a coordinate pair; every item is kept
    pub async fn location_search(
        &self,
        lat: f64,
        lng: f64,
    ) -> Result<Aggregation<MediaItem>, RippleError> {
        let policy = self.config.engine.engine_config().threshold_policy();
        self.aggregate(&[Seed::Location { lat, lng }], &accept_all(), &policy)
            .await
    }
}
