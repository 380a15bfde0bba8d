//! In-memory implementation of GraphSource for testing and offline runs

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use wrangle_core::prelude::*;

/// Configuration for the in-memory source
#[derive(Debug, Clone)]
pub struct InMemoryConfig {
    /// Status reported for locations with no registered graph
    pub missing_status: u16,
    /// Whether to log every request
    pub verbose: bool,
}

impl Default for InMemoryConfig {
    fn default() -> Self {
        Self {
            missing_status: 404,
            verbose: false,
        }
    }
}

/// Registered response for a location
#[derive(Debug, Clone)]
enum Response {
    Graph(Graph),
    Failure { status: u16, reason: String },
}

#[derive(Debug, Default)]
struct SourceStore {
    responses: HashMap<String, Response>,
    /// Every location requested, in request order
    requests: Vec<String>,
}

/// Graph source serving registered graphs by location
#[derive(Debug, Clone)]
pub struct InMemoryGraphSource {
    store: Arc<RwLock<SourceStore>>,
    config: InMemoryConfig,
}

impl InMemoryGraphSource {
    /// Create a new empty source
    pub fn new() -> Self {
        Self::new_with_config(InMemoryConfig::default())
    }

    /// Create a new source with configuration
    pub fn new_with_config(config: InMemoryConfig) -> Self {
        debug!("Creating in-memory graph source with config: {:?}", config);
        Self {
            store: Arc::new(RwLock::new(SourceStore::default())),
            config,
        }
    }

    /// Serve `graph` at `location`, replacing any earlier registration
    pub async fn register(&self, location: impl Into<String>, graph: Graph) {
        let location = location.into();
        debug!("Registering {} triples at {}", graph.len(), location);
        self.store
            .write()
            .await
            .responses
            .insert(location, Response::Graph(graph));
    }

    /// Make `location` fail with the given HTTP status
    pub async fn fail(&self, location: impl Into<String>, status: u16, reason: impl Into<String>) {
        self.store.write().await.responses.insert(
            location.into(),
            Response::Failure {
                status,
                reason: reason.into(),
            },
        );
    }

    /// Locations requested so far, in order
    pub async fn requests(&self) -> Vec<String> {
        self.store.read().await.requests.clone()
    }

    /// Number of registered locations
    pub async fn len(&self) -> usize {
        self.store.read().await.responses.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for InMemoryGraphSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GraphSource for InMemoryGraphSource {
    async fn fetch_into(&self, location: &str, into: &mut Graph) -> FetchResult<usize> {
        let response = {
            let mut store = self.store.write().await;
            store.requests.push(location.to_string());
            store.responses.get(location).cloned()
        };
        if self.config.verbose {
            info!("Fetch {}", location);
        }

        match response {
            Some(Response::Graph(graph)) => {
                let read = graph.len();
                into.merge(graph);
                Ok(read)
            }
            Some(Response::Failure { status, reason }) => {
                warn!("Configured failure for {}: {} {}", location, status, reason);
                Err(FetchError::Status {
                    location: location.to_string(),
                    status,
                    reason,
                })
            }
            None => Err(FetchError::Status {
                location: location.to_string(),
                status: self.config.missing_status,
                reason: "Not Found".to_string(),
            }),
        }
    }
}
