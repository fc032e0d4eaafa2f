//! Page-level data passed between fetch workers and the aggregator

use crate::fetcher::FetchError;
use std::fmt;
use url::Url;

/// A fully resolved, fetchable location
///
/// Produced either from a seed or from the continuation link of a previous page.
/// The engine never looks inside it; only fetchers interpret the string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageRequest(String);

impl PageRequest {
    pub fn new(location: impl Into<String>) -> Self {
        Self(location.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PageRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Url> for PageRequest {
    fn from(url: Url) -> Self {
        Self(url.into())
    }
}

impl From<&str> for PageRequest {
    fn from(location: &str) -> Self {
        Self(location.to_string())
    }
}

/// One successfully fetched page
#[derive(Debug, Clone)]
pub struct Page<I> {
    /// Items in the order the source returned them
    pub items: Vec<I>,

    /// Where the next page of this lineage lives, if anywhere
    pub next: Option<PageRequest>,
}

impl<I> Page<I> {
    pub fn new(items: Vec<I>, next: Option<PageRequest>) -> Self {
        Self { items, next }
    }

    /// A page with no continuation
    pub fn last(items: Vec<I>) -> Self {
        Self { items, next: None }
    }
}

/// The outcome of one fetch, as delivered to the aggregator
#[derive(Debug)]
pub struct PageResult<I> {
    /// Index of the seed this fetch descends from
    pub lineage: usize,

    /// The request that produced this result
    pub request: PageRequest,

    pub outcome: Result<Page<I>, FetchError>,
}

impl<I> PageResult<I> {
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }
}
