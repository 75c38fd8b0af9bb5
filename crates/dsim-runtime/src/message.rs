use dsim_agent::{AgentBytes, Constructor, StateUpdate};
use dsim_core::{AgentId, RankId, Timestep};
use serde::{Deserialize, Serialize};

/// Every payload that crosses a rank boundary during a run.
///
/// One flat enum rather than per-phase message types because a single
/// `Transport<M>` only carries one `M` — see the crate-level protocol
/// overview for which sender/receiver pair uses which variant. `*Done`
/// variants carry no sender field: the envelope's own `from` rank is the
/// sender, so there is nothing to duplicate.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum RuntimeMessage {
    /// Simulator → every rank, broadcast: a new timestep has begun. Each
    /// `Runner` records `ts` but does not step yet — see `StepNow`.
    BeginTimestep(Timestep),
    /// Simulator → every rank, broadcast: no further timesteps will be sent.
    Shutdown,

    /// Coordinator → Runner: build this one agent and add it to the
    /// resident pool.
    CreateAgent { id: AgentId, ctor: Constructor },
    /// Coordinator → every rank, broadcast: every `CreateAgent` for this
    /// step has been sent. A rank answers `CreateAgentDone` once it has
    /// processed every `CreateAgent` that precedes this barrier in arrival
    /// order.
    CreationBarrier,
    /// Runner → Coordinator.
    CreateAgentDone,

    /// Coordinator → Runner: ship `id`, currently resident here, to `to`.
    MoveAgent { id: AgentId, to: RankId },
    /// Runner → Runner: the actual agent payload for a migration.
    ReceiveAgent { id: AgentId, bytes: AgentBytes },
    /// Coordinator → every rank, broadcast: every `MoveAgent` for this step
    /// has been sent and its resulting `ReceiveAgent`s delivered.
    MoveBarrier,
    /// Runner → Coordinator, conceptually a broadcast (every rank
    /// eventually owes this) — this reference engine addresses it directly
    /// to the Coordinator's rank since it is the protocol's only consumer.
    ReceiveAgentDone,

    /// Coordinator → every rank, broadcast: step this timestep's resident
    /// agents now.
    StepNow,
    /// Runner → whichever rank hosts `update.store_name`.
    HandleUpdate { update: StateUpdate },
    /// Runner → every rank, broadcast: every update this rank's agents
    /// produced this step has been forwarded. Every store host counts this
    /// once per rank before it may flush.
    HandleUpdateDone,

    /// Runner → Coordinator: one agent's step outcome, for load tracking.
    AgentStepProfile {
        id: AgentId,
        /// Wall-clock step time already scaled by the timestep's real
        /// duration (`step_time / (ts.end - ts.start)`) — the quantity fed
        /// into the compute-load EMA, not the raw measurement.
        step_time: f64,
        memory_usage: f64,
        n_updates: usize,
        is_alive: bool,
    },
    /// Runner → Coordinator: this rank has stepped every resident agent.
    AgentStepProfileDone,

    /// Store host → Simulator: this store has flushed this step's updates.
    StoreFlushDone { store: String, elapsed_secs: f64 },
}
