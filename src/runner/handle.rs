//! Handles and spawners
//!
//! Both are weak references into a runner's registry. Neither keeps a
//! coroutine (or the runner) alive, and neither fails once its target is
//! gone: a handle just reports "not running".

use std::cell::RefCell;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::{Rc, Weak};

use crate::errors::AdmissionError;
use crate::resumable::Resumable;

use super::registry::Registry;
use super::types::{CoroutineId, Status};

/* ===================== Handle ===================== */

/// Stable reference to a coroutine instance
#[derive(Clone)]
pub struct Handle {
    id: CoroutineId,
    name: Rc<str>,
    registry: Weak<RefCell<Registry>>,
}

impl Handle {
    pub(crate) fn new(id: CoroutineId, name: &str, registry: Weak<RefCell<Registry>>) -> Self {
        Handle {
            id,
            name: Rc::from(name),
            registry,
        }
    }

    /// A handle that is not attached to any runner and never reports running
    pub fn detached(id: CoroutineId, name: &str) -> Self {
        Handle::new(id, name, Weak::new())
    }

    pub fn id(&self) -> CoroutineId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current status, or None once the instance has been reaped
    pub fn status(&self) -> Option<Status> {
        self.with_registry(|registry| registry.status(self.id)).flatten()
    }

    pub fn is_running(&self) -> bool {
        self.status() == Some(Status::Running)
    }

    /// Ticks left before the active frame is stepped again
    pub fn wait_ticks(&self) -> Option<u32> {
        self.with_registry(|registry| {
            registry.entries.get(&self.id).map(|entry| entry.wait_ticks)
        })
        .flatten()
    }

    pub fn is_waiting(&self) -> bool {
        self.is_running() && self.wait_ticks().is_some_and(|ticks| ticks > 0)
    }

    /// Stop the referenced instance; false if it was not running
    pub fn stop(&self) -> bool {
        let Some(registry) = self.registry.upgrade() else {
            return false;
        };
        let Ok(mut registry) = registry.try_borrow_mut() else {
            return false;
        };
        let stopped = registry.stop_id(self.id);
        if stopped {
            tracing::debug!(
                coroutine_id = %self.id,
                name = %self.name,
                "Coroutine stopped by handle"
            );
        }
        stopped
    }

    /// Whether this handle was issued by the runner owning `registry`
    pub(crate) fn belongs_to(&self, registry: &Weak<RefCell<Registry>>) -> bool {
        Weak::ptr_eq(&self.registry, registry)
    }

    fn with_registry<T>(&self, f: impl FnOnce(&Registry) -> T) -> Option<T> {
        let registry = self.registry.upgrade()?;
        let registry = registry.try_borrow().ok()?;
        Some(f(&registry))
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish()
    }
}

impl PartialEq for Handle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && Weak::ptr_eq(&self.registry, &other.registry)
    }
}

impl Eq for Handle {}

impl Hash for Handle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/* ===================== Spawner ===================== */

/// Start/stop access to a runner from inside the bodies it is stepping
///
/// Obtained from `Runner::spawner()`. Starts are queued until the next
/// `update()`; stops take effect on status immediately.
#[derive(Clone)]
pub struct Spawner {
    registry: Weak<RefCell<Registry>>,
}

impl Spawner {
    pub(crate) fn new(registry: Weak<RefCell<Registry>>) -> Self {
        Spawner { registry }
    }

    /// Start a coroutine unconditionally
    ///
    /// If the runner is gone the body is dropped and the returned handle
    /// is detached.
    pub fn start<R>(&self, name: impl Into<String>, body: R, initial_delay: u32) -> Handle
    where
        R: Resumable + 'static,
    {
        let name = name.into();
        match self.registry.upgrade() {
            Some(registry) => {
                let id = registry
                    .borrow_mut()
                    .start(name.clone(), Box::new(body), initial_delay);
                tracing::debug!(
                    coroutine_id = %id,
                    name = %name,
                    initial_delay,
                    "Coroutine queued"
                );
                Handle::new(id, &name, self.registry.clone())
            }
            None => {
                tracing::warn!(name = %name, "Start on a dropped runner ignored");
                Handle::detached(CoroutineId::from_raw(0), &name)
            }
        }
    }

    /// Start a coroutine if the runner's admission policy allows it
    pub fn try_start<R>(
        &self,
        name: impl Into<String>,
        body: R,
        initial_delay: u32,
    ) -> Result<Handle, AdmissionError>
    where
        R: Resumable + 'static,
    {
        let name = name.into();
        let registry = self
            .registry
            .upgrade()
            .ok_or(AdmissionError::RunnerDropped)?;

        let id = {
            let mut registry = registry.borrow_mut();
            if let Err(err) = registry.admit(&name) {
                tracing::warn!(name = %name, error = %err, "Coroutine rejected");
                return Err(err);
            }
            registry.start(name.clone(), Box::new(body), initial_delay)
        };

        tracing::debug!(coroutine_id = %id, name = %name, initial_delay, "Coroutine queued");
        Ok(Handle::new(id, &name, self.registry.clone()))
    }

    /// Stop every running coroutine called `name`
    pub fn stop(&self, name: &str) -> usize {
        self.with_registry(|registry| registry.stop_name(name)).unwrap_or(0)
    }

    /// Stop the coroutine behind `handle`; a handle from another runner is ignored
    pub fn stop_handle(&self, handle: &Handle) -> bool {
        if !handle.belongs_to(&self.registry) {
            return false;
        }
        self.with_registry(|registry| registry.stop_id(handle.id())).unwrap_or(false)
    }

    pub fn stop_all(&self) -> usize {
        self.with_registry(Registry::stop_all).unwrap_or(0)
    }

    fn with_registry<T>(&self, f: impl FnOnce(&mut Registry) -> T) -> Option<T> {
        let registry = self.registry.upgrade()?;
        let mut registry = registry.try_borrow_mut().ok()?;
        Some(f(&mut registry))
    }
}

impl fmt::Debug for Spawner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Spawner")
            .field("attached", &(self.registry.strong_count() > 0))
            .finish()
    }
}
