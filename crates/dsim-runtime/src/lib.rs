//! Orchestration: the barrier-synchronized step protocol that drives a
//! population of agents across ranks.
//!
//! | module        | contents                                                |
//! |---------------|------------------------------------------------------------|
//! | `error`       | [`RuntimeError`] / [`RuntimeResult`]                         |
//! | `message`     | [`RuntimeMessage`], every envelope payload the engine sends  |
//! | `population`  | the [`Population`] trait                                     |
//! | `timestep`    | [`TimestepGenerator`] and [`RangeTimestepGenerator`]          |
//! | `coordinator` | [`Coordinator`], master-side bookkeeping                      |
//! | `runner`      | [`Runner`], per-rank agent pool                               |
//! | `registry`    | [`StoreRegistry`], which rank hosts which named store         |
//! | `engine`      | [`Engine`], the single-process reference driver loop          |
//! | `report`      | [`StepReport`] / [`SummaryReport`]                             |
//!
//! # The step protocol
//!
//! Every timestep advances through three barriers, each gated on a
//! `*Done` message from every rank in the world:
//!
//! 1. **Creation.** The `Population` plans this step's new agents; the
//!    `Coordinator` assigns each one a rank via its `LoadBalancer` and sends
//!    a `CreateAgent` to that `Runner`. Every rank answers
//!    `CreateAgentDone` once it has built everything assigned to it.
//! 2. **Migration.** The `Coordinator` calls `LoadBalancer::balance()` and
//!    sends a `MoveAgent` to each agent's current host; that `Runner`
//!    serializes the agent and sends it directly to its new host as
//!    `ReceiveAgent`. Every rank broadcasts `ReceiveAgentDone` once it has
//!    sent and received everything this step's balance pass decided.
//! 3. **Step + update.** Every `Runner` steps its resident agents, forwards
//!    each `StateUpdate` to the `Runner`-addressed host of its target
//!    store, and reports a per-agent `AgentStepProfile` to the
//!    `Coordinator`, finishing with `AgentStepProfileDone`. Once a store
//!    has seen `HandleUpdateDone` from every rank, it flushes and answers
//!    `StoreFlushDone`. The next timestep starts only once the
//!    `Coordinator` has seen every rank's profile and every store has
//!    flushed.
//!
//! No phase depends on inter-rank message *order* — only on message
//! *count* — which is what lets [`dsim_transport::InMemoryTransport`]'s
//! single global queue stand in for a real network without changing the
//! protocol's behavior.

pub mod coordinator;
pub mod engine;
pub mod error;
pub mod message;
pub mod population;
pub mod registry;
pub mod report;
pub mod runner;
pub mod timestep;

#[cfg(test)]
mod tests;

pub use coordinator::Coordinator;
pub use engine::Engine;
pub use error::{RuntimeError, RuntimeResult};
pub use message::RuntimeMessage;
pub use population::{NewAgent, Population};
pub use registry::StoreRegistry;
pub use report::{StepReport, SummaryReport};
pub use runner::Runner;
pub use timestep::{RangeTimestepGenerator, TimestepGenerator};
