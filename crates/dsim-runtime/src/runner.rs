use std::collections::BTreeMap;
use std::time::Instant;

use dsim_agent::{Agent, AgentBytes, AgentRegistry, Constructor, StateUpdate};
use dsim_core::{AgentId, RankId, Timestep};

use crate::{RuntimeError, RuntimeResult};

/// One agent's outcome from a single `Runner::step_all` call.
pub struct AgentStepOutcome {
    pub id: AgentId,
    pub updates: Vec<StateUpdate>,
    pub step_time: f64,
    pub memory_usage: f64,
    pub is_alive: bool,
}

/// The resident agent pool for one rank.
///
/// Agents are kept in a `BTreeMap` keyed by [`AgentId`] so
/// [`Runner::step_all`] iterates in ascending id order — deterministic
/// across runs with the same population and placement, which the
/// integration tests lean on.
pub struct Runner {
    pub rank: RankId,
    agents: BTreeMap<AgentId, Box<dyn Agent>>,
    current_ts: Option<Timestep>,
}

impl Runner {
    pub fn new(rank: RankId) -> Self {
        Self {
            rank,
            agents: BTreeMap::new(),
            current_ts: None,
        }
    }

    pub fn set_current_timestep(&mut self, ts: Timestep) {
        self.current_ts = Some(ts);
    }

    pub fn current_timestep(&self) -> Option<Timestep> {
        self.current_ts
    }

    pub fn agent_count(&self) -> usize {
        self.agents.len()
    }

    pub fn create_agent(&mut self, id: AgentId, ctor: &Constructor, registry: &AgentRegistry) -> RuntimeResult<()> {
        if self.agents.contains_key(&id) {
            return Err(RuntimeError::DuplicateAgent(id));
        }
        let agent = registry.construct(ctor)?;
        self.agents.insert(id, agent);
        Ok(())
    }

    /// Remove `id` from this rank's pool and serialize it for migration.
    pub fn take_for_move(&mut self, id: AgentId) -> RuntimeResult<AgentBytes> {
        let agent = self.agents.remove(&id).ok_or(RuntimeError::AgentNotHosted(id))?;
        Ok(agent.to_bytes()?)
    }

    pub fn receive_agent(&mut self, id: AgentId, bytes: &AgentBytes, registry: &AgentRegistry) -> RuntimeResult<()> {
        if self.agents.contains_key(&id) {
            return Err(RuntimeError::DuplicateAgent(id));
        }
        let agent = registry.deserialize(bytes)?;
        self.agents.insert(id, agent);
        Ok(())
    }

    /// Step every resident agent once, in insertion (ascending-id) order,
    /// dropping any that report `is_alive() == false` afterward.
    ///
    /// An agent `step` failure is fatal to this rank: it is returned
    /// immediately, the agents after it in iteration order are left
    /// unstepped, and none of the outcomes already collected this call have
    /// been applied to a store yet (that happens in the caller), so no
    /// partial updates from the failing step or its untouched successors
    /// ever reach a `StateStore`.
    pub fn step_all(&mut self) -> RuntimeResult<Vec<AgentStepOutcome>> {
        let ts = self.current_ts.expect("Runner stepped before receiving BeginTimestep");
        let mut outcomes = Vec::with_capacity(self.agents.len());
        let mut dead = Vec::new();

        for (&id, agent) in self.agents.iter_mut() {
            let start = Instant::now();
            let updates = agent.step(&ts).map_err(RuntimeError::from)?;
            let step_time = start.elapsed().as_secs_f64();
            let memory_usage = agent.memory_usage();
            let is_alive = agent.is_alive();
            if !is_alive {
                dead.push(id);
            }
            outcomes.push(AgentStepOutcome {
                id,
                updates,
                step_time,
                memory_usage,
                is_alive,
            });
        }

        for id in dead {
            self.agents.remove(&id);
        }

        Ok(outcomes)
    }
}
