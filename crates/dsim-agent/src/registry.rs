use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::{Agent, AgentError, AgentResult};

/// A serialized recipe for building a *fresh* agent, in place of a live
/// `Box<dyn Agent>` the `Population` would otherwise have to hold and ship.
#[derive(Clone, Debug, Serialize, serde::Deserialize)]
pub struct Constructor {
    pub type_tag: &'static str,
    pub payload: Vec<u8>,
}

impl Constructor {
    /// Encode `args` as the construction payload for agent type `type_tag`.
    /// `type_tag` must later be resolved by a constructor registered in an
    /// [`AgentRegistry`] that knows how to decode this shape.
    pub fn new<T: Serialize>(type_tag: &'static str, args: &T) -> AgentResult<Self> {
        let payload =
            serde_json::to_vec(args).map_err(|e| AgentError::Encode(type_tag, e))?;
        Ok(Self { type_tag, payload })
    }
}

/// A serialized *live* agent, shipped across ranks during migration.
#[derive(Clone, Debug, Serialize, serde::Deserialize)]
pub struct AgentBytes {
    pub type_tag: &'static str,
    pub payload: Vec<u8>,
}

impl AgentBytes {
    pub fn new<T: Serialize>(type_tag: &'static str, state: &T) -> AgentResult<Self> {
        let payload =
            serde_json::to_vec(state).map_err(|e| AgentError::Encode(type_tag, e))?;
        Ok(Self { type_tag, payload })
    }
}

type ConstructFn = Box<dyn Fn(&[u8]) -> AgentResult<Box<dyn Agent>> + Send + Sync>;
type DeserializeFn = Box<dyn Fn(&[u8]) -> AgentResult<Box<dyn Agent>> + Send + Sync>;

/// The closed registry of agent types a deployment knows how to build.
///
/// Populated once at startup (mirrors how upstream registers each agent
/// class with its `Population` before the run starts) and shared
/// read-only thereafter — a `Runner` never needs to register a new type
/// mid-run.
#[derive(Default)]
pub struct AgentRegistry {
    constructors: HashMap<&'static str, ConstructFn>,
    deserializers: HashMap<&'static str, DeserializeFn>,
}

impl fmt::Debug for AgentRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AgentRegistry")
            .field("constructors", &self.constructors.keys().collect::<Vec<_>>())
            .field("deserializers", &self.deserializers.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register how to build a fresh agent of `type_tag` from a
    /// [`Constructor`]'s payload.
    pub fn register_constructor(
        &mut self,
        type_tag: &'static str,
        f: impl Fn(&[u8]) -> AgentResult<Box<dyn Agent>> + Send + Sync + 'static,
    ) {
        self.constructors.insert(type_tag, Box::new(f));
    }

    /// Register how to rebuild a live agent of `type_tag` from its own
    /// [`Agent::to_bytes`] payload.
    pub fn register_deserializer(
        &mut self,
        type_tag: &'static str,
        f: impl Fn(&[u8]) -> AgentResult<Box<dyn Agent>> + Send + Sync + 'static,
    ) {
        self.deserializers.insert(type_tag, Box::new(f));
    }

    pub fn construct(&self, ctor: &Constructor) -> AgentResult<Box<dyn Agent>> {
        let f = self
            .constructors
            .get(ctor.type_tag)
            .ok_or(AgentError::UnknownConstructor(ctor.type_tag))?;
        f(&ctor.payload)
    }

    pub fn deserialize(&self, bytes: &AgentBytes) -> AgentResult<Box<dyn Agent>> {
        let f = self
            .deserializers
            .get(bytes.type_tag)
            .ok_or(AgentError::UnknownDeserializer(bytes.type_tag))?;
        f(&bytes.payload)
    }
}
