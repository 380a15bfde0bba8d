//! Collaborator interfaces

use crate::errors::FetchResult;
use crate::graph::Graph;
use async_trait::async_trait;

/// Supplies triple graphs for locations
#[async_trait]
pub trait GraphSource: Send + Sync {
    /// Fetch the graph at `location` and merge its triples and prefixes into `into`.
    /// Returns the number of triples read from the location.
    async fn fetch_into(&self, location: &str, into: &mut Graph) -> FetchResult<usize>;

    /// Fetch the graph at `location` as a standalone graph
    async fn fetch(&self, location: &str) -> FetchResult<Graph> {
        let mut graph = Graph::new();
        self.fetch_into(location, &mut graph).await?;
        Ok(graph)
    }
}
