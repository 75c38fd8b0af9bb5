//! `dsim-core` — foundational types for the `distsim` simulation engine.
//!
//! This crate is a dependency of every other `dsim-*` crate. It intentionally
//! has no `dsim-*` dependencies and a minimal external one (`thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module     | Contents                                        |
//! |------------|--------------------------------------------------|
//! | [`ids`]    | `AgentId`, `RankId`, `NodeHostId`                 |
//! | [`time`]   | `Timestep`, `SimConfig`                           |
//! | [`error`]  | `CoreError`, `CoreResult`                         |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                              |
//! |---------|------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.  |

pub mod error;
pub mod ids;
pub mod time;

#[cfg(test)]
mod tests;

pub use error::{CoreError, CoreResult};
pub use ids::{AgentId, NodeHostId, RankId};
pub use time::{SimConfig, Timestep};
