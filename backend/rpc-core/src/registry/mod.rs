//! Reference tables for handles minted by the codec.
//!
//! Every handle belongs to exactly one object namespace. Disposing the object
//! drops every handle minted while traversing it; disposing a single function
//! handle leaves the rest of the namespace intact.
//!
//! The registry itself is a plain single-owner structure. [`SharedRegistry`]
//! wraps it for use from a connection task (and, with the `process` scope,
//! from several connections at once).

mod shared;

pub use shared::SharedRegistry;

use crate::value::{Function, Symbol, Value};

use models::Handle;

use std::collections::HashMap;

use log::{debug, trace};

/// Handles and source value bound to one object name.
#[derive(Debug, Default)]
pub struct NamedObjectEntry {
    source: Option<Value>,
    functions: HashMap<Handle, Function>,
    symbols: HashMap<Handle, Symbol>,
}

impl NamedObjectEntry {
    /// The value tree this namespace was last derived from, when known.
    pub fn source(&self) -> Option<&Value> {
        self.source.as_ref()
    }

    pub fn functions(&self) -> &HashMap<Handle, Function> {
        &self.functions
    }

    pub fn symbols(&self) -> &HashMap<Handle, Symbol> {
        &self.symbols
    }

    pub fn handle_count(&self) -> usize {
        self.functions.len() + self.symbols.len()
    }
}

#[derive(Debug, Default)]
pub struct ReferenceRegistry {
    objects: HashMap<String, NamedObjectEntry>,
    function_owners: HashMap<Handle, String>,
    symbol_owners: HashMap<Handle, String>,
}

impl ReferenceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the namespace for `name` if needed and record its source tree.
    pub fn open_object(&mut self, name: &str, source: Value) -> &NamedObjectEntry {
        let entry = self.objects.entry(name.to_string()).or_default();
        entry.source = Some(source);
        entry
    }

    /// Mint a handle for `function` under the `owner` namespace.
    pub fn register_function(&mut self, owner: &str, function: Function) -> Handle {
        let handle = Handle::mint();
        self.objects
            .entry(owner.to_string())
            .or_default()
            .functions
            .insert(handle.clone(), function);
        self.function_owners
            .insert(handle.clone(), owner.to_string());
        trace!("Registered function {handle} under '{owner}'");
        handle
    }

    /// Mint a handle for `symbol` under the `owner` namespace.
    pub fn register_symbol(&mut self, owner: &str, symbol: Symbol) -> Handle {
        let handle = Handle::mint();
        self.objects
            .entry(owner.to_string())
            .or_default()
            .symbols
            .insert(handle.clone(), symbol);
        self.symbol_owners.insert(handle.clone(), owner.to_string());
        trace!("Registered symbol {handle} under '{owner}'");
        handle
    }

    pub fn function(&self, handle: &str) -> Option<&Function> {
        let owner = self.function_owners.get(handle)?;
        self.objects.get(owner)?.functions.get(handle)
    }

    pub fn function_owner(&self, handle: &str) -> Option<&str> {
        self.function_owners.get(handle).map(String::as_str)
    }

    pub fn symbol(&self, handle: &str) -> Option<&Symbol> {
        let owner = self.symbol_owners.get(handle)?;
        self.objects.get(owner)?.symbols.get(handle)
    }

    pub fn object(&self, name: &str) -> Option<&NamedObjectEntry> {
        self.objects.get(name)
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    pub fn function_count(&self) -> usize {
        self.function_owners.len()
    }

    pub fn symbol_count(&self) -> usize {
        self.symbol_owners.len()
    }

    /// Remove one function handle.
    ///
    /// Returns `None` unless the handle is still owned by a live namespace.
    pub fn dispose_function(&mut self, handle: &str) -> Option<Function> {
        let owner = self.function_owners.get(handle)?;
        let function = self.objects.get_mut(owner)?.functions.remove(handle)?;
        self.function_owners.remove(handle);
        debug!("Disposed function {handle}");
        Some(function)
    }

    /// Remove a namespace and every handle registered under it.
    ///
    /// Unknown names return `None`; callers treat that as already disposed.
    pub fn dispose_object(&mut self, name: &str) -> Option<NamedObjectEntry> {
        let entry = self.objects.remove(name)?;
        for handle in entry.functions.keys() {
            self.function_owners.remove(handle);
        }
        for handle in entry.symbols.keys() {
            self.symbol_owners.remove(handle);
        }
        debug!(
            "Disposed object '{name}' ({} handles released)",
            entry.handle_count()
        );
        Some(entry)
    }
}
