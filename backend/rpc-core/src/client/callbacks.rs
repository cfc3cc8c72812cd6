use crate::value::Function;

use std::collections::HashMap;

/// Local functions handed to the server as `CallbackFunction(<id>)` markers.
///
/// Ids start at 1 and are never reused within a client.
#[derive(Debug, Default)]
pub struct CallbackTable {
    last_id: u64,
    functions: HashMap<u64, Function>,
}

impl CallbackTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `function` under a fresh id. Registering the same function twice
    /// yields two ids.
    pub fn register(&mut self, function: Function) -> u64 {
        self.last_id += 1;
        self.functions.insert(self.last_id, function);
        self.last_id
    }

    pub fn get(&self, id: u64) -> Option<&Function> {
        self.functions.get(&id)
    }

    pub fn remove(&mut self, id: u64) -> Option<Function> {
        self.functions.remove(&id)
    }

    /// Drop every id bound to `function`; returns how many were removed.
    pub fn dispose(&mut self, function: &Function) -> usize {
        let before = self.functions.len();
        self.functions.retain(|_, stored| !stored.ptr_eq(function));
        before - self.functions.len()
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}
