use std::collections::{HashMap, HashSet};

use dsim_core::RankId;
use dsim_store::{FlushReport, StateStore, StoreBackend};

use crate::{RuntimeError, RuntimeResult};

struct Entry<SB: StoreBackend> {
    host: RankId,
    store: StateStore<SB>,
    handle_update_done: HashSet<RankId>,
}

/// Which rank hosts each named `StateStore` replica, and that store's
/// per-step `HandleUpdateDone` gate.
///
/// One replica per store name (not one per rank): a named store lives on
/// exactly one rank, and every other rank forwards its agents'
/// `StateUpdate`s there over the transport. This matches the "one replica
/// per node" placement the engine as a whole assumes — a deployment that
/// wants several independent stores spreads them across different host
/// ranks via separate [`StoreRegistry::register`] calls, not by
/// replicating one store onto every rank.
pub struct StoreRegistry<SB: StoreBackend> {
    entries: HashMap<String, Entry<SB>>,
}

impl<SB: StoreBackend> StoreRegistry<SB> {
    pub fn new() -> Self {
        Self { entries: HashMap::new() }
    }

    pub fn register(&mut self, name: impl Into<String>, host: RankId, backend: SB) {
        let name = name.into();
        self.entries.insert(
            name.clone(),
            Entry {
                host,
                store: StateStore::new(name, backend),
                handle_update_done: HashSet::new(),
            },
        );
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn host_of(&self, name: &str) -> RuntimeResult<RankId> {
        self.entries.get(name).map(|e| e.host).ok_or_else(|| RuntimeError::UnknownStore(name.to_string()))
    }

    /// Every rank that hosts at least one store — a rank reporting
    /// `HandleUpdateDone` is only meaningful to these.
    pub fn hosts(&self) -> Vec<RankId> {
        let mut hosts: Vec<RankId> = self.entries.values().map(|e| e.host).collect();
        hosts.sort_unstable();
        hosts.dedup();
        hosts
    }

    /// Names of the stores hosted on `rank`.
    pub fn stores_on(&self, rank: RankId) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(_, e)| e.host == rank)
            .map(|(name, _)| name.as_str())
            .collect()
    }

    pub fn buffer_update(&mut self, update: dsim_agent::StateUpdate) -> RuntimeResult<()> {
        let entry = self
            .entries
            .get_mut(&update.store_name)
            .ok_or_else(|| RuntimeError::UnknownStore(update.store_name.clone()))?;
        entry.store.handle_update(update);
        Ok(())
    }

    pub fn reset_update_gates(&mut self) {
        for entry in self.entries.values_mut() {
            entry.handle_update_done.clear();
        }
    }

    /// Record that `rank` has forwarded every update it will send this
    /// step. Returns the names of stores hosted on `store_host` that are
    /// now ready to flush (every world rank has reported in).
    pub fn record_update_done(&mut self, rank: RankId, store_host: RankId, world_size: u32) -> Vec<String> {
        self.entries
            .iter_mut()
            .filter(|(_, e)| e.host == store_host)
            .filter_map(|(name, e)| {
                e.handle_update_done.insert(rank);
                if e.handle_update_done.len() == world_size as usize {
                    Some(name.clone())
                } else {
                    None
                }
            })
            .collect()
    }

    pub fn flush(&mut self, name: &str) -> RuntimeResult<FlushReport> {
        let entry = self.entries.get_mut(name).ok_or_else(|| RuntimeError::UnknownStore(name.to_string()))?;
        Ok(entry.store.flush()?)
    }

    pub fn backend(&self, name: &str) -> RuntimeResult<&SB> {
        self.entries
            .get(name)
            .map(|e| e.store.backend())
            .ok_or_else(|| RuntimeError::UnknownStore(name.to_string()))
    }

    pub fn backend_mut(&mut self, name: &str) -> RuntimeResult<&mut SB> {
        self.entries
            .get_mut(name)
            .map(|e| e.store.backend_mut())
            .ok_or_else(|| RuntimeError::UnknownStore(name.to_string()))
    }
}

impl<SB: StoreBackend> Default for StoreRegistry<SB> {
    fn default() -> Self {
        Self::new()
    }
}
