//! Multi-endpoint HTTP text processor.

use crate::config::ClientConfig;
use crate::pool::{Endpoint, EndpointPool};
use crate::selector::EndpointSelector;
use async_trait::async_trait;
use relay_api::{ProcessorError, TextProcessor};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use tracing::{debug, warn};

const TEXT_PLAIN: &str = "text/plain";

/// Text processor that posts each payload directly to one endpoint from a
/// fixed pool, chosen per call by the selection strategy.
///
/// Fail-closed, in contrast to the queue path: any invocation failure
/// propagates as [`ProcessorError::EndpointInvocation`], and there is no
/// retry against a different endpoint.
#[derive(Debug)]
pub struct MultiEndpointClient {
    client: Client,
    selector: EndpointSelector,
}

impl MultiEndpointClient {
    /// Create a client around an existing selector.
    pub fn new(selector: EndpointSelector, config: ClientConfig) -> Result<Self, ProcessorError> {
        config.validate().map_err(ProcessorError::Configuration)?;
        let client = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| ProcessorError::Configuration(e.to_string()))?;

        Ok(Self { client, selector })
    }

    /// Round-robin client over the given endpoint URLs, in order.
    pub fn round_robin<I, S>(urls: I, config: ClientConfig) -> Result<Self, ProcessorError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let pool =
            EndpointPool::from_urls(urls).map_err(|e| ProcessorError::Configuration(e.to_string()))?;
        Self::new(EndpointSelector::round_robin(pool), config)
    }

    /// The selector in use.
    pub fn selector(&self) -> &EndpointSelector {
        &self.selector
    }
}

fn invocation_error(endpoint: &Endpoint, e: &reqwest::Error) -> ProcessorError {
    if e.is_connect() {
        ProcessorError::EndpointInvocation(format!("cannot connect to {endpoint}"))
    } else {
        ProcessorError::EndpointInvocation(format!("{endpoint}: {e}"))
    }
}

#[async_trait]
impl TextProcessor for MultiEndpointClient {
    async fn process(&self, text: &str) -> Result<String, ProcessorError> {
        let endpoint = self.selector.next();
        debug!(endpoint = %endpoint, "dispatching text to endpoint");

        let response = self
            .client
            .post(endpoint.url().clone())
            .header(CONTENT_TYPE, TEXT_PLAIN)
            .body(text.to_owned())
            .send()
            .await
            .map_err(|e| {
                warn!(endpoint = %endpoint, error = %e, "endpoint request failed");
                invocation_error(endpoint, &e)
            })?
            .error_for_status()
            .map_err(|e| {
                warn!(endpoint = %endpoint, error = %e, "endpoint returned error status");
                invocation_error(endpoint, &e)
            })?;

        response.text().await.map_err(|e| {
            warn!(endpoint = %endpoint, error = %e, "failed reading endpoint response");
            invocation_error(endpoint, &e)
        })
    }
}
