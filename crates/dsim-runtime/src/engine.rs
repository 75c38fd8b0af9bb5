//! The single-process reference driver loop.
//!
//! [`Engine`] owns every rank's state directly (there is only one process)
//! and an [`InMemoryTransport`] that stands in for a real network. Each
//! [`Engine::run_timestep`] call drains the transport to a fixed point
//! after every phase of the step protocol before moving to the next phase,
//! rather than relying on message arrival order across phases — see the
//! crate-level docs for why that is safe here and what a networked
//! transport would need instead (an explicit barrier broadcast plus
//! per-rank counting, which this engine already does for exactly that
//! reason).

use std::collections::HashMap;

use dsim_agent::AgentRegistry;
use dsim_balance::LoadBalancer;
use dsim_core::{RankId, Timestep};
use dsim_store::{FlushReport, StoreBackend};
use dsim_transport::{transport::Deliverable, Address, InMemoryTransport, Transport, MASTER_RANK};

use crate::{
    coordinator::Coordinator, message::RuntimeMessage, population::Population, registry::StoreRegistry,
    report::{StepReport, SummaryReport}, runner::Runner, timestep::TimestepGenerator, RuntimeResult,
};

enum StepEvent {
    AgentDied,
    Flushed(FlushReport),
}

pub struct Engine<P: Population, TG: TimestepGenerator, LB: LoadBalancer, SB: StoreBackend> {
    transport: InMemoryTransport<RuntimeMessage>,
    registry: AgentRegistry,
    coordinator: Coordinator<LB>,
    runners: HashMap<RankId, Runner>,
    stores: StoreRegistry<SB>,
    population: P,
    timestep_gen: TG,
    world_size: u32,
    step_events: Vec<StepEvent>,
}

impl<P: Population, TG: TimestepGenerator, LB: LoadBalancer, SB: StoreBackend> Engine<P, TG, LB, SB> {
    pub fn new(
        world_size: u32,
        registry: AgentRegistry,
        balancer: LB,
        stores: StoreRegistry<SB>,
        population: P,
        timestep_gen: TG,
    ) -> Self {
        let runners = (0..world_size).map(|r| (RankId(r), Runner::new(RankId(r)))).collect();
        Self {
            transport: InMemoryTransport::single_rank_per_node(world_size),
            registry,
            coordinator: Coordinator::new(world_size, balancer),
            runners,
            stores,
            population,
            timestep_gen,
            world_size,
            step_events: Vec::new(),
        }
    }

    pub fn live_agent_count(&self) -> usize {
        self.coordinator.live_agent_count()
    }

    pub fn store_backend(&self, name: &str) -> RuntimeResult<&SB> {
        self.stores.backend(name)
    }

    /// Mutable access to a registered store's backend — for callers that
    /// need to finalize it (e.g. `SqliteBackend::finish`) once a run ends.
    pub fn store_backend_mut(&mut self, name: &str) -> RuntimeResult<&mut SB> {
        self.stores.backend_mut(name)
    }

    /// Drive the run to completion, or until `max_steps` timesteps have
    /// been processed, whichever comes first.
    pub fn run(&mut self, max_steps: Option<usize>) -> RuntimeResult<SummaryReport> {
        let mut summary = SummaryReport::default();

        loop {
            if max_steps.is_some_and(|max| summary.steps.len() >= max) {
                break;
            }
            let Some(ts) = self.timestep_gen.next() else { break };
            let report = self.run_timestep(ts)?;
            summary.steps.push(report);
        }

        self.transport.send(MASTER_RANK, Address::Every, RuntimeMessage::Shutdown)?;
        self.drain()?;
        Ok(summary)
    }

    fn run_timestep(&mut self, ts: Timestep) -> RuntimeResult<StepReport> {
        let mut report = StepReport {
            timestep: Some(ts),
            ..Default::default()
        };

        self.transport.send(MASTER_RANK, Address::Every, RuntimeMessage::BeginTimestep(ts))?;
        self.drain()?;

        // ---- creation barrier ----
        let new_agents = self.population.plan_agents(&ts);
        report.agents_created = new_agents.len();
        for na in new_agents {
            let host = self.coordinator.place_new_agent(na.id, na.la, na.lb);
            self.transport
                .send(MASTER_RANK, Address::Rank(host), RuntimeMessage::CreateAgent { id: na.id, ctor: na.ctor })?;
        }
        self.drain()?;
        self.coordinator.reset_create_gate();
        self.transport.send(MASTER_RANK, Address::Every, RuntimeMessage::CreationBarrier)?;
        self.drain()?;

        // ---- move barrier ----
        let balance = self.coordinator.plan_moves();
        report.imbalance_before_balance = balance.imbalance_before;
        report.agents_moved = balance.moves.clone();
        for mv in &balance.moves {
            self.transport
                .send(MASTER_RANK, Address::Rank(mv.from), RuntimeMessage::MoveAgent { id: mv.object, to: mv.to })?;
        }
        self.drain()?;
        self.coordinator.reset_move_gate();
        self.transport.send(MASTER_RANK, Address::Every, RuntimeMessage::MoveBarrier)?;
        self.drain()?;

        // ---- step + update barrier ----
        self.coordinator.reset_profile_gate();
        self.stores.reset_update_gates();
        self.transport.send(MASTER_RANK, Address::Every, RuntimeMessage::StepNow)?;
        self.drain()?;

        for event in self.step_events.drain(..) {
            match event {
                StepEvent::AgentDied => report.agents_died += 1,
                StepEvent::Flushed(f) => {
                    report.updates_applied += f.updates_applied;
                    report.flushes.push(f);
                }
            }
        }

        Ok(report)
    }

    fn drain(&mut self) -> RuntimeResult<()> {
        while let Some((to, from, msg)) = self.transport.pop() {
            self.handle_envelope(to, from, msg)?;
        }
        Ok(())
    }

    fn handle_envelope(&mut self, to: RankId, from: RankId, msg: RuntimeMessage) -> RuntimeResult<()> {
        match msg {
            RuntimeMessage::BeginTimestep(ts) => {
                self.runner_mut(to).set_current_timestep(ts);
            }
            RuntimeMessage::Shutdown => {}

            RuntimeMessage::CreateAgent { id, ctor } => {
                let registry = &self.registry;
                self.runners.get_mut(&to).expect("every rank has a Runner").create_agent(id, &ctor, registry)?;
            }
            RuntimeMessage::CreationBarrier => {
                self.transport.send(to, Address::Rank(MASTER_RANK), RuntimeMessage::CreateAgentDone)?;
            }
            RuntimeMessage::CreateAgentDone => {
                self.coordinator.record_create_done(from);
            }

            RuntimeMessage::MoveAgent { id, to: dest } => {
                let bytes = self.runner_mut(to).take_for_move(id)?;
                self.transport.send(to, Address::Rank(dest), RuntimeMessage::ReceiveAgent { id, bytes })?;
            }
            RuntimeMessage::ReceiveAgent { id, bytes } => {
                let registry = &self.registry;
                self.runners
                    .get_mut(&to)
                    .expect("every rank has a Runner")
                    .receive_agent(id, &bytes, registry)?;
            }
            RuntimeMessage::MoveBarrier => {
                self.transport.send(to, Address::Rank(MASTER_RANK), RuntimeMessage::ReceiveAgentDone)?;
            }
            RuntimeMessage::ReceiveAgentDone => {
                self.coordinator.record_move_done(from);
            }

            RuntimeMessage::StepNow => {
                let real_duration = self.runner_mut(to).current_timestep().expect("BeginTimestep precedes StepNow").real_duration();
                let outcomes = self.runner_mut(to).step_all()?;
                for outcome in outcomes {
                    let n_updates = outcome.updates.len();
                    for update in outcome.updates {
                        let host = self.stores.host_of(&update.store_name)?;
                        self.transport.send(to, Address::Rank(host), RuntimeMessage::HandleUpdate { update })?;
                    }
                    self.transport.send(
                        to,
                        Address::Rank(MASTER_RANK),
                        RuntimeMessage::AgentStepProfile {
                            id: outcome.id,
                            step_time: outcome.step_time / real_duration,
                            memory_usage: outcome.memory_usage,
                            n_updates,
                            is_alive: outcome.is_alive,
                        },
                    )?;
                    if !outcome.is_alive {
                        self.step_events.push(StepEvent::AgentDied);
                    }
                }
                self.transport.send(to, Address::Every, RuntimeMessage::HandleUpdateDone)?;
                self.transport.send(to, Address::Rank(MASTER_RANK), RuntimeMessage::AgentStepProfileDone)?;
            }
            RuntimeMessage::HandleUpdate { update } => {
                self.stores.buffer_update(update)?;
            }
            RuntimeMessage::HandleUpdateDone => {
                let ready = self.stores.record_update_done(from, to, self.world_size);
                for name in ready {
                    let flush = self.stores.flush(&name)?;
                    let elapsed_secs = flush.elapsed_secs;
                    self.step_events.push(StepEvent::Flushed(flush));
                    self.transport.send(
                        to,
                        Address::Rank(MASTER_RANK),
                        RuntimeMessage::StoreFlushDone { store: name, elapsed_secs },
                    )?;
                }
            }

            RuntimeMessage::AgentStepProfile {
                id,
                step_time,
                memory_usage,
                n_updates: _,
                is_alive,
            } => {
                self.coordinator.record_profile(id, step_time, memory_usage, is_alive)?;
            }
            RuntimeMessage::AgentStepProfileDone => {
                self.coordinator.record_profile_done(from);
            }
            RuntimeMessage::StoreFlushDone { .. } => {}
        }
        Ok(())
    }

    fn runner_mut(&mut self, rank: RankId) -> &mut Runner {
        self.runners.get_mut(&rank).expect("every rank has a Runner")
    }
}
