use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::http_probe::result::ProbeResult;

/// Latest probe result per monitored URL.
///
/// Cheap to clone; all clones share the same map. Readers get an
/// `Arc<ProbeResult>` and keep it alive independently of later writes, so a
/// reader always sees one complete result.
#[derive(Clone, Default)]
pub struct ResultStore {
    inner: Arc<RwLock<HashMap<String, Arc<ProbeResult>>>>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write handle for `url`. The scheduler owning the slot is the only
    /// writer for that key.
    pub fn slot(&self, url: impl Into<String>) -> ResultSlot {
        ResultSlot {
            url: url.into(),
            store: self.clone(),
        }
    }

    pub fn latest(&self, url: &str) -> Option<Arc<ProbeResult>> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(url)
            .cloned()
    }

    pub fn alerts(&self, url: &str) -> Vec<String> {
        self.latest(url)
            .map(|result| result.alerts.clone())
            .unwrap_or_default()
    }
}

/// Single-writer handle for one URL's entry in a [`ResultStore`].
pub struct ResultSlot {
    url: String,
    store: ResultStore,
}

impl ResultSlot {
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Replaces the stored result and returns the one it replaced.
    pub fn publish(&self, result: ProbeResult) -> Option<Arc<ProbeResult>> {
        let result = Arc::new(result);
        self.store
            .inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(self.url.clone(), result)
    }

    pub fn latest(&self) -> Option<Arc<ProbeResult>> {
        self.store.latest(&self.url)
    }
}
