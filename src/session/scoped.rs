//! Per-thread resource map
//!
//! Holds at most one `Arc<T>` per thread. Creation for one thread never blocks
//! lookups from other threads: the constructor runs outside the lock and the
//! insert re-checks the slot.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::thread::{self, ThreadId};

use crate::{Error, Result};

/// Map from thread id to that thread's resource
#[derive(Debug)]
pub struct ThreadScoped<T> {
    slots: RwLock<HashMap<ThreadId, Arc<T>>>,
}

impl<T> Default for ThreadScoped<T> {
    fn default() -> Self {
        Self {
            slots: RwLock::new(HashMap::new()),
        }
    }
}

impl<T> ThreadScoped<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resource of the calling thread
    pub fn get(&self) -> Result<Option<Arc<T>>> {
        let id = thread::current().id();
        Ok(self
            .slots
            .read()
            .map_err(|e| Error::internal(format!("Lock error: {}", e)))?
            .get(&id)
            .cloned())
    }

    /// Resource of the calling thread, created with `create` when absent
    ///
    /// Only the owning thread inserts into its own slot, so the value created
    /// here is the one stored.
    pub fn get_or_try_insert_with<F>(&self, create: F) -> Result<Arc<T>>
    where
        F: FnOnce() -> Result<T>,
    {
        if let Some(existing) = self.get()? {
            return Ok(existing);
        }

        let value = Arc::new(create()?);
        let id = thread::current().id();
        let mut slots = self
            .slots
            .write()
            .map_err(|e| Error::internal(format!("Lock error: {}", e)))?;
        Ok(slots.entry(id).or_insert(value).clone())
    }

    /// Replace the calling thread's resource, returning the previous one
    pub fn set(&self, value: T) -> Result<Option<Arc<T>>> {
        let id = thread::current().id();
        Ok(self
            .slots
            .write()
            .map_err(|e| Error::internal(format!("Lock error: {}", e)))?
            .insert(id, Arc::new(value)))
    }

    /// Detach the calling thread's resource
    pub fn remove(&self) -> Result<Option<Arc<T>>> {
        let id = thread::current().id();
        Ok(self
            .slots
            .write()
            .map_err(|e| Error::internal(format!("Lock error: {}", e)))?
            .remove(&id))
    }

    /// Number of threads currently holding a resource
    pub fn len(&self) -> usize {
        self.slots.read().map(|slots| slots.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Detach every resource
    pub fn drain(&self) -> Result<Vec<Arc<T>>> {
        let mut slots = self
            .slots
            .write()
            .map_err(|e| Error::internal(format!("Lock error: {}", e)))?;
        Ok(slots.drain().map(|(_, value)| value).collect())
    }

    /// Snapshot of every resource
    pub fn values(&self) -> Result<Vec<Arc<T>>> {
        Ok(self
            .slots
            .read()
            .map_err(|e| Error::internal(format!("Lock error: {}", e)))?
            .values()
            .cloned()
            .collect())
    }
}
