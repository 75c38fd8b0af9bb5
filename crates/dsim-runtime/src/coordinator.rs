use std::collections::{HashMap, HashSet};

use dsim_balance::{BalanceReport, LoadBalancer};
use dsim_core::{AgentId, RankId};

use crate::{RuntimeError, RuntimeResult};

/// Master-side bookkeeping: where every live agent lives, and the three
/// per-step gates (`CreateAgentDone`, `ReceiveAgentDone`,
/// `AgentStepProfileDone`) that must each see every rank once before the
/// corresponding barrier is considered crossed.
///
/// Deliberately holds no transport/message-sending logic — see
/// `crate::engine::Engine`, which drives the actual message flow and calls
/// into this purely as bookkeeping. That split is what makes the gating
/// logic itself unit-testable without standing up a whole `Engine`.
pub struct Coordinator<LB: LoadBalancer> {
    world_size: u32,
    balancer: LB,
    location: HashMap<AgentId, RankId>,
    create_done: HashSet<RankId>,
    move_done: HashSet<RankId>,
    profile_done: HashSet<RankId>,
}

impl<LB: LoadBalancer> Coordinator<LB> {
    pub fn new(world_size: u32, balancer: LB) -> Self {
        Self {
            world_size,
            balancer,
            location: HashMap::new(),
            create_done: HashSet::new(),
            move_done: HashSet::new(),
            profile_done: HashSet::new(),
        }
    }

    pub fn world_size(&self) -> u32 {
        self.world_size
    }

    /// Assign a host rank to a newly planned agent and record it.
    pub fn place_new_agent(&mut self, id: AgentId, la: f64, lb: f64) -> RankId {
        let rank = self.balancer.add_object(id, la, lb);
        self.location.insert(id, rank);
        rank
    }

    pub fn location_of(&self, id: AgentId) -> RuntimeResult<RankId> {
        self.location.get(&id).copied().ok_or(RuntimeError::AgentNotHosted(id))
    }

    // ── creation gate ──────────────────────────────────────────────────

    pub fn reset_create_gate(&mut self) {
        self.create_done.clear();
    }

    /// Returns `true` once every rank in the world has reported done.
    pub fn record_create_done(&mut self, rank: RankId) -> bool {
        self.create_done.insert(rank);
        self.create_done.len() == self.world_size as usize
    }

    // ── move gate ──────────────────────────────────────────────────────

    pub fn reset_move_gate(&mut self) {
        self.move_done.clear();
    }

    pub fn record_move_done(&mut self, rank: RankId) -> bool {
        self.move_done.insert(rank);
        self.move_done.len() == self.world_size as usize
    }

    /// Re-evaluate the balancer and return the moves to carry out this
    /// step, updating this coordinator's location table to match.
    pub fn plan_moves(&mut self) -> BalanceReport {
        let report = self.balancer.balance();
        for mv in &report.moves {
            self.location.insert(mv.object, mv.to);
        }
        report
    }

    // ── step/profile gate ──────────────────────────────────────────────

    pub fn reset_profile_gate(&mut self) {
        self.profile_done.clear();
    }

    pub fn record_profile_done(&mut self, rank: RankId) -> bool {
        self.profile_done.insert(rank);
        self.profile_done.len() == self.world_size as usize
    }

    /// Fold one agent's step outcome into the load balancer — dropping it
    /// from tracking if it died this step.
    pub fn record_profile(&mut self, id: AgentId, step_time: f64, memory_usage: f64, is_alive: bool) -> RuntimeResult<()> {
        if is_alive {
            self.balancer.update_load(id, step_time, memory_usage)?;
        } else {
            self.balancer.remove_object(id);
            self.location.remove(&id);
        }
        Ok(())
    }

    pub fn live_agent_count(&self) -> usize {
        self.location.len()
    }
}
