//! The `Agent` trait and the types that cross rank boundaries with it.
//!
//! | module      | contents                                              |
//! |-------------|--------------------------------------------------------|
//! | `error`     | [`AgentError`] / [`AgentResult`]                        |
//! | `agent`     | the [`Agent`] trait itself                              |
//! | `update`    | [`StateUpdate`], what a step hands to a `StateStore`     |
//! | `registry`  | [`Constructor`], [`AgentBytes`], and [`AgentRegistry`]   |
//!
//! # Constructing and migrating agents without reflection
//!
//! The upstream design lets a `Population` defer agent construction by
//! shipping a `(class, args, kwargs)` triple that the receiving rank calls
//! reflectively. Rust has neither runtime class objects nor `**kwargs`, and
//! reaching for `erased-serde` or hand-rolled reflection to emulate them
//! would fight the type system instead of using it. Instead:
//!
//! - Every agent type registers under a stable `type_tag` in an
//!   [`registry::AgentRegistry`], once, at startup.
//! - A [`registry::Constructor`] carries that tag plus a serialized
//!   argument payload; `Population::plan_agents` builds one per agent
//!   instead of holding a live `Box<dyn Agent>`.
//! - Migrating a *live* agent ships its own [`registry::AgentBytes`] (tag +
//!   `Agent::to_bytes()` payload) instead, since its constructor arguments
//!   (e.g. "start from the default state") no longer describe its current
//!   state.
//!
//! Both payload kinds are opaque `Vec<u8>` to this crate; the registered
//! closures for a given tag are free to use `serde_json`, `bincode`, or
//! anything else, as long as the two sides agree.

pub mod agent;
pub mod error;
pub mod registry;
pub mod update;


pub use agent::Agent;
pub use error::{AgentError, AgentResult};
pub use registry::{AgentBytes, AgentRegistry, Constructor};
pub use update::StateUpdate;
