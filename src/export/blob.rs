//! Temporary object URLs for in-memory documents.
//!
//! The rasterizer addresses the serialized scene by URL rather than by
//! value. Each URL is owned by an [`ObjectUrl`] guard and revoked exactly
//! once, either explicitly or when the guard drops on an error path.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

const SCHEME: &str = "blob:posterframe/";

#[derive(Debug, Default)]
struct Registry {
    next: u64,
    live: HashMap<String, Arc<[u8]>>,
    created: u64,
    revoked: u64,
}

/// Registry of live object URLs.
#[derive(Debug, Default)]
pub struct ObjectUrlStore {
    inner: Mutex<Registry>,
}

impl ObjectUrlStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Registry> {
        // The registry holds no invariant a panicking holder could break.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register `data` and hand out a URL for it. `mime` is only logged.
    pub fn create(&self, data: impl Into<Arc<[u8]>>, mime: &str) -> ObjectUrl<'_> {
        let data = data.into();
        let mut reg = self.lock();
        let url = format!("{SCHEME}{}", reg.next);
        reg.next += 1;
        reg.created += 1;
        log::debug!("created {url} ({} bytes, {mime})", data.len());
        reg.live.insert(url.clone(), data);
        ObjectUrl {
            store: self,
            url,
            revoked: false,
        }
    }

    /// Bytes behind `url`, if it is still live.
    pub fn resolve(&self, url: &str) -> Option<Arc<[u8]>> {
        self.lock().live.get(url).map(Arc::clone)
    }

    /// Number of URLs created and not yet revoked.
    pub fn live(&self) -> usize {
        self.lock().live.len()
    }

    /// Total URLs ever created.
    pub fn created(&self) -> u64 {
        self.lock().created
    }

    /// Total URLs ever revoked.
    pub fn revoked(&self) -> u64 {
        self.lock().revoked
    }

    fn revoke(&self, url: &str) {
        let mut reg = self.lock();
        if reg.live.remove(url).is_some() {
            reg.revoked += 1;
            log::debug!("revoked {url}");
        }
    }
}

/// A live URL. Revoked when dropped.
#[derive(Debug)]
pub struct ObjectUrl<'a> {
    store: &'a ObjectUrlStore,
    url: String,
    revoked: bool,
}

impl ObjectUrl<'_> {
    pub fn as_str(&self) -> &str {
        &self.url
    }

    /// Revoke now rather than at end of scope.
    pub fn revoke(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if !self.revoked {
            self.revoked = true;
            self.store.revoke(&self.url);
        }
    }
}

impl Drop for ObjectUrl<'_> {
    fn drop(&mut self) {
        self.release();
    }
}
