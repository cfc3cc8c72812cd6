//! Per-connection bookkeeping.

use crate::config::RegistryScope;
use crate::registry::SharedRegistry;

use std::net::SocketAddr;

use log::info;

pub(crate) struct ConnectionState {
    peer: SocketAddr,
    scope: RegistryScope,
    registry: SharedRegistry,
    frames: u64,
    rejected_binary: u64,
}

impl ConnectionState {
    pub(crate) fn new(peer: SocketAddr, scope: RegistryScope, registry: SharedRegistry) -> Self {
        Self {
            peer,
            scope,
            registry,
            frames: 0,
            rejected_binary: 0,
        }
    }

    pub(crate) fn record_text(&mut self) {
        self.frames += 1;
    }

    pub(crate) fn record_binary(&mut self) {
        self.frames += 1;
        self.rejected_binary += 1;
    }

    /// Log the connection summary. A connection-scoped registry is dropped
    /// with the last dispatcher, releasing every handle still listed here.
    pub(crate) fn finish(self) {
        let (objects, functions, symbols) = {
            let registry = self.registry.lock();
            (
                registry.object_count(),
                registry.function_count(),
                registry.symbol_count(),
            )
        };

        match self.scope {
            RegistryScope::Connection => info!(
                "Client {} disconnected after {} frames ({} binary rejected); \
                 released {objects} objects, {functions} functions, {symbols} symbols",
                self.peer, self.frames, self.rejected_binary
            ),
            RegistryScope::Process => info!(
                "Client {} disconnected after {} frames ({} binary rejected); \
                 shared registry holds {objects} objects",
                self.peer, self.frames, self.rejected_binary
            ),
        }
    }
}
