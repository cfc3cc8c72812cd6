//! Startup registration of the objects a server exposes.

use crate::value::ObjectMap;

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use log::info;

/// Named root objects available to `getRemoteObject`.
///
/// Cloneable; every connection reads the same catalog.
#[derive(Clone, Default)]
pub struct ObjectCatalog {
    objects: Arc<RwLock<HashMap<String, ObjectMap>>>,
}

impl ObjectCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the object exposed under `name`.
    pub fn register(&self, name: impl Into<String>, object: ObjectMap) {
        let name = name.into();
        info!("Registered object '{name}' with {} keys", object.len());
        self.objects
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name, object);
    }

    /// Snapshot of the object registered under `name`.
    pub fn get(&self, name: &str) -> Option<ObjectMap> {
        self.objects
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    pub fn names(&self) -> Vec<String> {
        self.objects
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }
}
