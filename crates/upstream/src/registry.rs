//! Upstream client registry.
//!
//! Constructs and holds one client per configured variant. Credentials are
//! resolved eagerly here; a variant whose credential is missing is logged
//! and skipped, so it later surfaces as a configuration error at request
//! time without any outbound call being made.

use std::collections::HashMap;
use std::sync::Arc;

use pc_domain::config::{Config, VariantKind};
use pc_domain::error::Result;

use crate::pageindex::PageIndexClient;
use crate::traits::UpstreamClient;
use crate::websearch::WebSearchClient;

pub struct UpstreamRegistry {
    clients: HashMap<String, Arc<dyn UpstreamClient>>,
}

impl UpstreamRegistry {
    /// Build the registry from the application config.
    pub fn from_config(config: &Config) -> Self {
        let mut clients: HashMap<String, Arc<dyn UpstreamClient>> = HashMap::new();

        for vc in &config.variants {
            let result: Result<Arc<dyn UpstreamClient>> = match vc.kind {
                VariantKind::Websearch => {
                    WebSearchClient::from_config(vc).map(|c| Arc::new(c) as _)
                }
                VariantKind::Pageindex => {
                    PageIndexClient::from_config(vc).map(|c| Arc::new(c) as _)
                }
            };

            match result {
                Ok(client) => {
                    tracing::info!(variant = %vc.id, kind = ?vc.kind, "registered upstream");
                    clients.insert(vc.id.clone(), client);
                }
                Err(e) => {
                    tracing::warn!(
                        variant = %vc.id,
                        kind = ?vc.kind,
                        error = %e,
                        "failed to initialize upstream, skipping"
                    );
                }
            }
        }

        if clients.is_empty() && !config.variants.is_empty() {
            tracing::warn!(
                "no upstreams initialized; chat endpoints will fail until \
                 credentials are configured"
            );
        }

        Self { clients }
    }

    /// Build a registry from pre-constructed clients, keyed by their
    /// variant id. Intended for tests with stub upstreams.
    pub fn with_clients(clients: Vec<Arc<dyn UpstreamClient>>) -> Self {
        Self {
            clients: clients
                .into_iter()
                .map(|c| (c.variant_id().to_owned(), c))
                .collect(),
        }
    }

    /// Look up a client by variant id.
    pub fn get(&self, variant_id: &str) -> Option<Arc<dyn UpstreamClient>> {
        self.clients.get(variant_id).cloned()
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    /// All registered variant ids, sorted.
    pub fn list_variants(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.clients.keys().cloned().collect();
        ids.sort();
        ids
    }
}
