//! Load Flooder: bursts of extra reviews calls for load testing.
//!
//! Calls run as detached tasks; their outcomes, panics included, are discarded
//! and never reach the request that triggered them.
//!
//! Two bounds apply. At most `concurrency` calls are in flight, and at most
//! `concurrency` bursts wait for a free call slot. A burst arriving while the
//! backlog is full is dropped whole.

use crate::metrics_defs::{FLOOD_BURSTS_DROPPED, FLOOD_CALLS};
use shared::ProductId;
use shared::client::DownstreamClient;
use shared::endpoint::ServiceEndpoint;
use shared::headers::ForwardHeaders;
use std::sync::Arc;
use tokio::sync::Semaphore;

#[derive(Clone)]
pub struct Flooder {
    client: DownstreamClient,
    endpoint: ServiceEndpoint,
    factor: usize,
    permits: Arc<Semaphore>,
    backlog: Arc<Semaphore>,
}

impl Flooder {
    /// `concurrency` bounds both the flood calls in flight across all requests and
    /// the bursts waiting to dispatch.
    pub fn new(
        client: DownstreamClient,
        endpoint: ServiceEndpoint,
        factor: usize,
        concurrency: usize,
    ) -> Self {
        Flooder {
            client,
            endpoint,
            factor,
            permits: Arc::new(Semaphore::new(concurrency.max(1))),
            backlog: Arc::new(Semaphore::new(concurrency.max(1))),
        }
    }

    pub fn factor(&self) -> usize {
        self.factor
    }

    /// Queues `factor` calls for `product_id` and returns immediately.
    pub fn flood(&self, product_id: ProductId, headers: ForwardHeaders) {
        let Ok(slot) = self.backlog.clone().try_acquire_owned() else {
            shared::counter!(FLOOD_BURSTS_DROPPED).increment(1);
            tracing::debug!(product_id, "Flood backlog full, burst dropped");
            return;
        };

        let flooder = self.clone();
        let path = product_id.to_string();
        let headers = Arc::new(headers);

        tokio::spawn(async move {
            let _slot = slot;
            for _ in 0..flooder.factor {
                let Ok(permit) = flooder.permits.clone().acquire_owned().await else {
                    return;
                };
                let client = flooder.client.clone();
                let endpoint = flooder.endpoint.clone();
                let headers = headers.clone();
                let path = path.clone();

                shared::counter!(FLOOD_CALLS).increment(1);
                tokio::spawn(async move {
                    let _outcome = client.call(&endpoint, &headers, &path).await;
                    drop(permit);
                });
            }
        });

        tracing::debug!(product_id, factor = self.factor, "Flood queued");
    }
}
