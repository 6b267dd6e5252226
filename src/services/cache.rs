use std::sync::Arc;
use std::time::Duration;

use crate::models::Disaster;
use crate::services::firestore::{FirestoreClient, FirestoreError};

const SNAPSHOT_KEY: &str = "disasters";

/// In-memory snapshot of the disaster list
///
/// Hover lookups hit the snapshot instead of the data source; the snapshot
/// expires after the configured TTL and is refetched on the next read.
pub struct DisasterCache {
    snapshots: moka::future::Cache<String, Arc<Vec<Disaster>>>,
    ttl_secs: u64,
}

impl DisasterCache {
    pub fn new(ttl_secs: u64) -> Self {
        let snapshots = moka::future::CacheBuilder::new(1)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self { snapshots, ttl_secs }
    }

    pub fn ttl_secs(&self) -> u64 {
        self.ttl_secs
    }

    /// Current snapshot, if any
    pub async fn get(&self) -> Option<Arc<Vec<Disaster>>> {
        self.snapshots.get(SNAPSHOT_KEY).await
    }

    /// Replace the snapshot
    pub async fn store(&self, disasters: Vec<Disaster>) -> Arc<Vec<Disaster>> {
        let snapshot = Arc::new(disasters);
        self.snapshots.insert(SNAPSHOT_KEY.to_string(), snapshot.clone()).await;
        snapshot
    }

    /// Return the cached snapshot, fetching from Firestore on a miss
    pub async fn get_or_fetch(&self, source: &FirestoreClient) -> Result<Arc<Vec<Disaster>>, FirestoreError> {
        if let Some(snapshot) = self.get().await {
            tracing::trace!("Disaster snapshot cache hit");
            return Ok(snapshot);
        }

        let disasters = source.get_disasters().await?;
        tracing::info!("Fetched {} disasters from data source", disasters.len());

        Ok(self.store(disasters).await)
    }

    /// Find one disaster by id in the current snapshot
    pub async fn find(&self, source: &FirestoreClient, id: &str) -> Result<Option<Disaster>, FirestoreError> {
        let snapshot = self.get_or_fetch(source).await?;
        Ok(snapshot.iter().find(|d| d.id == id).cloned())
    }

    /// Drop the snapshot so the next read refetches
    pub async fn invalidate(&self) {
        self.snapshots.invalidate(SNAPSHOT_KEY).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn disaster(id: &str) -> Disaster {
        Disaster {
            id: id.to_string(),
            location: "Chennai".to_string(),
            severity_label: "moderate".to_string(),
            latitude: 13.0827,
            longitude: 80.2707,
        }
    }

    #[tokio::test]
    async fn test_store_and_get() {
        let cache = DisasterCache::new(60);
        assert!(cache.get().await.is_none());

        cache.store(vec![disaster("a"), disaster("b")]).await;

        let snapshot = cache.get().await.unwrap();
        assert_eq!(snapshot.len(), 2);
    }

    #[tokio::test]
    async fn test_invalidate() {
        let cache = DisasterCache::new(60);
        cache.store(vec![disaster("a")]).await;

        cache.invalidate().await;

        assert!(cache.get().await.is_none());
    }
}
