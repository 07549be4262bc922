//! The two records a session persists: the alias table and the list of
//! monitored URLs. Loads never fail; a missing, unreadable or corrupt record
//! reads as empty and the cause is logged. Saves are best effort.

use crate::store::{KeyValueStore, StoreError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

pub const ALIAS_KEY: &str = "vanguard_aliases";
pub const MONITOR_KEY: &str = "vanguard_monitors";

pub struct SessionRecords<S: ?Sized> {
    store: Arc<S>,
}

impl<S: ?Sized> Clone for SessionRecords<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: KeyValueStore + ?Sized> SessionRecords<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn load_aliases(&self) -> BTreeMap<String, String> {
        self.load_or_default(ALIAS_KEY).await
    }

    pub async fn save_aliases(&self, aliases: &BTreeMap<String, String>) {
        self.save_logged(ALIAS_KEY, aliases).await;
    }

    pub async fn load_monitored_urls(&self) -> Vec<String> {
        self.load_or_default(MONITOR_KEY).await
    }

    pub async fn save_monitored_urls(&self, urls: &[String]) {
        self.save_logged(MONITOR_KEY, urls).await;
    }

    async fn load_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        match self.load(key).await {
            Ok(Some(value)) => value,
            Ok(None) => T::default(),
            Err(e) => {
                tracing::warn!("Failed to load {}: {}", key, e);
                T::default()
            }
        }
    }

    async fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        let Some(raw) = self.store.get(key).await? else {
            return Ok(None);
        };
        Ok(Some(serde_json::from_str(&raw)?))
    }

    async fn save_logged<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        if let Err(e) = self.save(key, value).await {
            tracing::warn!("Failed to save {}: {}", key, e);
        }
    }

    async fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let content = serde_json::to_string(value)?;
        self.store.set(key, &content).await
    }
}
