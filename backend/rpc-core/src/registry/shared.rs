use crate::registry::ReferenceRegistry;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Cloneable handle to a [`ReferenceRegistry`].
///
/// Every table mutation takes the lock. The lock must not be held while a
/// native function runs: callback invokers re-enter the registry.
#[derive(Clone, Default)]
pub struct SharedRegistry {
    inner: Arc<Mutex<ReferenceRegistry>>,
}

impl SharedRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock the registry.
    ///
    /// Registry operations never leave the tables half-updated, so a poisoned
    /// lock is recovered rather than propagated.
    pub fn lock(&self) -> MutexGuard<'_, ReferenceRegistry> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn ptr_eq(&self, other: &SharedRegistry) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}
