use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::azure::applications::types::AzureApplication;

/// Application cache: id -> application
///
/// Readers take the lock shared for the duration of their snapshot; the
/// refresh loop takes it exclusively only for the clear-and-repopulate
/// step, so a reader sees either the previous fetch or the current one,
/// never a mix.
#[derive(Debug, Clone, Default)]
pub struct ApplicationCache {
    inner: Arc<RwLock<HashMap<String, AzureApplication>>>,
}

impl ApplicationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole cache with the given fetch result. Returns the
    /// number of cached applications.
    pub async fn replace_all(&self, applications: Vec<AzureApplication>) -> usize {
        let mut map = self.inner.write().await;
        map.clear();
        for application in applications {
            map.insert(application.id.clone(), application);
        }
        map.len()
    }

    pub async fn get(&self, id: &str) -> Option<AzureApplication> {
        self.inner.read().await.get(id).cloned()
    }

    pub async fn snapshot(&self) -> HashMap<String, AzureApplication> {
        self.inner.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn application(id: &str) -> AzureApplication {
        AzureApplication {
            id: id.to_string(),
            app_id: format!("app-{id}"),
            display_name: None,
            password_credentials: vec![],
        }
    }

    #[tokio::test]
    async fn replace_all_drops_previous_entries() {
        let cache = ApplicationCache::new();
        cache
            .replace_all(vec![application("old-1"), application("old-2")])
            .await;

        let cached = cache.replace_all(vec![application("new-1")]).await;

        assert_eq!(cached, 1);
        assert!(cache.get("old-1").await.is_none());
        assert!(cache.get("old-2").await.is_none());
        assert!(cache.get("new-1").await.is_some());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn readers_never_observe_a_partial_replacement() {
        let cache = ApplicationCache::new();
        let odd: Vec<_> = (0..100).map(|i| application(&format!("odd-{i}"))).collect();
        let even: Vec<_> = (0..50).map(|i| application(&format!("even-{i}"))).collect();
        cache.replace_all(odd.clone()).await;

        let writer = {
            let cache = cache.clone();
            tokio::spawn(async move {
                for round in 0..200 {
                    let next = if round % 2 == 0 { even.clone() } else { odd.clone() };
                    cache.replace_all(next).await;
                    tokio::task::yield_now().await;
                }
            })
        };

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let cache = cache.clone();
                tokio::spawn(async move {
                    for _ in 0..200 {
                        let snapshot = cache.snapshot().await;
                        let odd_keys = snapshot.keys().filter(|k| k.starts_with("odd-")).count();
                        let even_keys = snapshot.keys().filter(|k| k.starts_with("even-")).count();
                        // every snapshot is exactly one complete generation
                        assert!(
                            (odd_keys == 100 && even_keys == 0)
                                || (odd_keys == 0 && even_keys == 50),
                            "torn snapshot: {odd_keys} odd / {even_keys} even"
                        );
                        tokio::task::yield_now().await;
                    }
                })
            })
            .collect();

        writer.await.unwrap();
        for reader in readers {
            reader.await.unwrap();
        }
    }
}
