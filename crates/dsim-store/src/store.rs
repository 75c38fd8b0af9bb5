use dsim_agent::StateUpdate;

use crate::StoreResult;

/// What one `flush()` call did, reported up to the `Coordinator`/`Simulator`
/// gate that waits for every store replica to finish.
#[derive(Clone, Debug, Default)]
pub struct FlushReport {
    pub store_name: String,
    pub updates_applied: usize,
    pub elapsed_secs: f64,
}

/// The backend-specific half of applying a [`StateUpdate`]: given one
/// already sorted into place, mutate whatever this store actually holds.
///
/// Implementations match on `update.method` the way an upstream store
/// subclass defines one Python method per mutation it accepts; an unknown
/// method is a [`crate::StoreError::UnknownMethod`], not a panic.
pub trait StoreBackend: Send {
    fn apply(&mut self, update: &StateUpdate) -> StoreResult<()>;

    /// Called once before a flush's batch of `apply` calls. Backends that
    /// have no notion of a transaction (e.g. an in-memory map) can leave
    /// this as a no-op.
    fn begin_transaction(&mut self) -> StoreResult<()> {
        Ok(())
    }

    /// Called once after a flush's batch of `apply` calls all succeeded.
    fn commit_transaction(&mut self) -> StoreResult<()> {
        Ok(())
    }
}

/// A named, buffered `StateStore` replica.
///
/// Wraps any [`StoreBackend`] with the update-buffering and sort-then-apply
/// behavior every replica needs, so a backend only has to implement "apply
/// one already-ordered update".
pub struct StateStore<B: StoreBackend> {
    name: String,
    backend: B,
    buffer: Vec<StateUpdate>,
}

impl<B: StoreBackend> StateStore<B> {
    pub fn new(name: impl Into<String>, backend: B) -> Self {
        Self {
            name: name.into(),
            backend,
            buffer: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Queue `update` for the next [`StateStore::flush`]. Cheap and
    /// infallible — validation happens at `apply` time, once the update's
    /// final position in sort order is known.
    pub fn handle_update(&mut self, update: StateUpdate) {
        self.buffer.push(update);
    }

    pub fn pending_len(&self) -> usize {
        self.buffer.len()
    }

    /// Stable-sort the buffered updates by `(store_name, order_key)` and
    /// apply them to the backend inside one transaction, then clear the
    /// buffer.
    pub fn flush(&mut self) -> StoreResult<FlushReport> {
        let start = std::time::Instant::now();
        self.buffer.sort();

        self.backend.begin_transaction()?;
        let mut applied = 0;
        for update in self.buffer.drain(..) {
            self.backend.apply(&update)?;
            applied += 1;
        }
        self.backend.commit_transaction()?;

        Ok(FlushReport {
            store_name: self.name.clone(),
            updates_applied: applied,
            elapsed_secs: start.elapsed().as_secs_f64(),
        })
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}
