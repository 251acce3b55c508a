//! Session Registry Module
//!
//! Named-singleton registry so multiple call sites can share one
//! configured remote cache without opening duplicate connections.
//!
//! The registry is an explicit object owned by the caller's composition
//! root. Tests and embedders create their own registries; nothing here is
//! process-global.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use crate::error::{CacheError, Result};

// == Session Registry ==
/// Caller-owned registry of named, shared cache instances.
///
/// The first caller to request a given name constructs the instance;
/// subsequent callers by the same name receive the existing instance
/// regardless of differing construction parameters. That asymmetry is a
/// documented sharp edge, not reconciled silently.
///
/// Stored values are type-erased; looking a name up under a different type
/// than it was registered with is an error, never a silent mismatch.
#[derive(Default)]
pub struct SessionRegistry {
    /// Named sessions, type-erased
    sessions: Mutex<HashMap<String, Arc<dyn Any + Send + Sync>>>,
}

impl SessionRegistry {
    // == Constructor ==
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    // == Get Or Init ==
    /// Returns the session registered under `name`, constructing and
    /// registering it first if absent.
    ///
    /// `init` runs without the registry lock held, so a slow construction
    /// does not stall other callers and `init` may itself use the registry.
    /// Its construction parameters are ignored for every later caller of
    /// the same name; when two callers construct concurrently, the first
    /// registration wins and the loser's instance is dropped.
    ///
    /// # Errors
    /// Propagates `init` failures, and returns
    /// [`CacheError::SessionTypeMismatch`] when the name is already
    /// registered under a different type.
    pub fn get_or_init<T, F>(&self, name: &str, init: F) -> Result<Arc<T>>
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> Result<T>,
    {
        if let Some(existing) = self.sessions.lock().get(name) {
            return Arc::clone(existing)
                .downcast::<T>()
                .map_err(|_| CacheError::SessionTypeMismatch(name.to_string()));
        }

        let created = Arc::new(init()?);

        let mut sessions = self.sessions.lock();
        if let Some(existing) = sessions.get(name) {
            // Another caller registered while the lock was released
            return Arc::clone(existing)
                .downcast::<T>()
                .map_err(|_| CacheError::SessionTypeMismatch(name.to_string()));
        }

        sessions.insert(
            name.to_string(),
            Arc::clone(&created) as Arc<dyn Any + Send + Sync>,
        );
        debug!("Registered session `{}`", name);

        Ok(created)
    }

    // == Lookup ==
    /// Returns the session registered under `name`, if present and of the
    /// requested type.
    pub fn lookup<T>(&self, name: &str) -> Option<Arc<T>>
    where
        T: Send + Sync + 'static,
    {
        self.sessions
            .lock()
            .get(name)
            .and_then(|session| Arc::clone(session).downcast::<T>().ok())
    }

    // == Remove ==
    /// Drops the session registered under `name`.
    ///
    /// Returns true if a session was removed. Callers still holding the
    /// `Arc` keep their handle; the name merely becomes available again.
    pub fn remove(&self, name: &str) -> bool {
        self.sessions.lock().remove(name).is_some()
    }

    // == Teardown ==
    /// Drops every registered session.
    pub fn teardown(&self) {
        let mut sessions = self.sessions.lock();
        let count = sessions.len();
        sessions.clear();

        if count > 0 {
            debug!("Tore down {} sessions", count);
        }
    }

    // == Length ==
    /// Returns the number of registered sessions.
    pub fn len(&self) -> usize {
        self.sessions.lock().len()
    }

    /// Returns true if no sessions are registered.
    pub fn is_empty(&self) -> bool {
        self.sessions.lock().is_empty()
    }
}
