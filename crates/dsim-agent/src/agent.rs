use dsim_core::Timestep;

use crate::{AgentBytes, AgentResult, StateUpdate};

/// A steppable, migratable unit of simulation state.
///
/// Mirrors `dt-behavior::BehaviorModel`'s shape — one required method, a
/// `Send + 'static` bound so a `Runner` can hold a heterogeneous
/// `Vec<Box<dyn Agent>>` — generalized from "plan a travel intent" to
/// "advance one timestep and report the state updates it produced".
///
/// Agents are intentionally *not* `Sync`: a `Runner` never touches more than
/// one agent's state concurrently (see the crate-level docs on the
/// single-threaded-actor model), so there is no reason to demand it.
pub trait Agent: Send {
    /// Advance this agent by one timestep, returning the state updates it
    /// wants applied to one or more `StateStore`s this step.
    ///
    /// An agent that returns `Err` is fatal to the hosting rank: the
    /// `Runner` propagates it rather than applying any of that agent's
    /// updates or stepping the agents after it.
    fn step(&mut self, ts: &Timestep) -> AgentResult<Vec<StateUpdate>>;

    /// Whether this agent should still be stepped next timestep. A `Runner`
    /// drops an agent for which this returns `false` after its step.
    fn is_alive(&self) -> bool {
        true
    }

    /// Approximate resident memory in bytes, fed to the load balancer as the
    /// `lb` (memory) load component. The default of `0.0` opts an agent type
    /// out of memory-aware balancing; override it for agents with
    /// significant or widely varying footprints.
    fn memory_usage(&self) -> f64 {
        0.0
    }

    /// The stable tag this agent type registered under in the
    /// [`crate::AgentRegistry`], used to rebuild it on the receiving side of
    /// a migration.
    fn type_tag(&self) -> &'static str;

    /// Serialize this agent's *current* state for migration to another
    /// rank. Round-tripped through the matching `AgentRegistry` deserializer
    /// for `type_tag()`, which must reconstruct a behaviorally equivalent
    /// agent (see the registry round-trip test in `dsim-runtime`).
    fn to_bytes(&self) -> AgentResult<AgentBytes>;
}
