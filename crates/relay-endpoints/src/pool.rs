//! Endpoint pool: the fixed set of processing resources a selector
//! distributes calls over.

use reqwest::Url;
use std::fmt;
use std::ops::Index;
use thiserror::Error;

/// Errors raised while building a pool.
#[derive(Debug, Error)]
pub enum SelectionError {
    /// A selector over an empty pool could never return anything, so an
    /// empty endpoint list is rejected at construction time.
    #[error("endpoint pool is empty")]
    EmptyPool,

    /// An endpoint URL did not parse.
    #[error("invalid endpoint url {url:?}: {reason}")]
    InvalidEndpoint { url: String, reason: String },
}

/// Address of one processing resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    url: Url,
}

impl Endpoint {
    /// Wrap an already-parsed URL.
    pub fn new(url: Url) -> Self {
        Self { url }
    }

    /// Parse an endpoint from its URL string.
    pub fn parse(url: &str) -> Result<Self, SelectionError> {
        Url::parse(url)
            .map(Self::new)
            .map_err(|e| SelectionError::InvalidEndpoint {
                url: url.to_owned(),
                reason: e.to_string(),
            })
    }

    /// The endpoint URL.
    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.url)
    }
}

/// Fixed, ordered, non-empty sequence of endpoints. Immutable once built.
#[derive(Debug, Clone)]
pub struct EndpointPool {
    endpoints: Vec<Endpoint>,
}

impl EndpointPool {
    /// Build a pool. Fails with [`SelectionError::EmptyPool`] when
    /// `endpoints` is empty.
    pub fn new(endpoints: Vec<Endpoint>) -> Result<Self, SelectionError> {
        if endpoints.is_empty() {
            return Err(SelectionError::EmptyPool);
        }
        Ok(Self { endpoints })
    }

    /// Build a pool from URL strings, in order.
    pub fn from_urls<I, S>(urls: I) -> Result<Self, SelectionError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let endpoints = urls
            .into_iter()
            .map(|url| Endpoint::parse(url.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(endpoints)
    }

    /// Number of endpoints in the pool. Always at least one.
    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    /// Always false; an empty pool cannot be constructed.
    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    /// Endpoint at `index`, if in bounds.
    pub fn get(&self, index: usize) -> Option<&Endpoint> {
        self.endpoints.get(index)
    }

    /// Iterate over the endpoints in pool order.
    pub fn iter(&self) -> impl Iterator<Item = &Endpoint> {
        self.endpoints.iter()
    }
}

impl Index<usize> for EndpointPool {
    type Output = Endpoint;

    fn index(&self, index: usize) -> &Endpoint {
        &self.endpoints[index]
    }
}
