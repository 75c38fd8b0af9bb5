//! bluepill — smallest example for the distsim simulation engine.
//!
//! A population of agents plays a private, solitary rock/paper/scissors
//! against nobody: each step it advances rock → paper → scissors → paper
//! and writes its new hand to a single SQLite-backed store. New agents are
//! born every step in random batches and agents occasionally die, just to
//! exercise the creation and step-profile barriers on something livelier
//! than a fixed population.

use std::time::Instant;

use anyhow::Result;
use rand::Rng;
use serde::{Deserialize, Serialize};

use dsim_agent::{Agent, AgentBytes, AgentRegistry, AgentResult, Constructor, StateUpdate};
use dsim_balance::RandomLoadBalancer;
use dsim_core::{AgentId, RankId, Timestep};
use dsim_runtime::{Engine, NewAgent, Population, RangeTimestepGenerator, StoreRegistry};
use dsim_store::SqliteBackend;

// ── Constants ─────────────────────────────────────────────────────────────────

const WORLD_SIZE: u32 = 4;
const STEP_COUNT: f64 = 10.0;
const MIN_NEW_AGENTS: u32 = 100;
const MAX_NEW_AGENTS: u32 = 200;

// ── Agent ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
enum Hand {
    Rock,
    Paper,
    Scissors,
}

impl Hand {
    fn next(self) -> Self {
        match self {
            Hand::Rock => Hand::Paper,
            Hand::Paper => Hand::Scissors,
            Hand::Scissors => Hand::Paper,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Hand::Rock => "rock",
            Hand::Paper => "paper",
            Hand::Scissors => "scissors",
        }
    }
}

#[derive(Serialize, Deserialize)]
struct BluePillArgs {
    order_key: String,
}

struct BluePillAgent {
    order_key: String,
    hand: Hand,
}

impl Agent for BluePillAgent {
    fn step(&mut self, _ts: &Timestep) -> AgentResult<Vec<StateUpdate>> {
        self.hand = self.hand.next();
        Ok(vec![StateUpdate::new(
            "bluepill",
            self.order_key.clone(),
            "set_state",
            vec![serde_json::json!(self.hand.as_str())],
        )])
    }

    fn is_alive(&self) -> bool {
        rand::thread_rng().gen_bool(0.5)
    }

    fn memory_usage(&self) -> f64 {
        1.0
    }

    fn type_tag(&self) -> &'static str {
        "bluepill"
    }

    fn to_bytes(&self) -> AgentResult<AgentBytes> {
        AgentBytes::new("bluepill", &(self.order_key.clone(), self.hand))
    }
}

fn bluepill_registry() -> AgentRegistry {
    let mut registry = AgentRegistry::new();
    registry.register_constructor("bluepill", |bytes| {
        let args: BluePillArgs = serde_json::from_slice(bytes)
            .map_err(|e| dsim_agent::AgentError::Decode("bluepill", e))?;
        Ok(Box::new(BluePillAgent {
            order_key: args.order_key,
            hand: Hand::Rock,
        }))
    });
    registry.register_deserializer("bluepill", |bytes| {
        let (order_key, hand): (String, Hand) = serde_json::from_slice(bytes)
            .map_err(|e| dsim_agent::AgentError::Decode("bluepill", e))?;
        Ok(Box::new(BluePillAgent { order_key, hand }))
    });
    registry
}

// ── Population ────────────────────────────────────────────────────────────────

/// Spawns a random batch of fresh rock-handed agents every step, the way
/// `BluePillPopulation` does upstream.
struct BluePillPopulation {
    next_seq: u64,
}

impl Population for BluePillPopulation {
    fn plan_agents(&mut self, ts: &Timestep) -> Vec<NewAgent> {
        let step = ts.step as u64;
        let n = rand::thread_rng().gen_range(MIN_NEW_AGENTS..=MAX_NEW_AGENTS);
        (0..n)
            .map(|i| {
                let id = AgentId::new(RankId(0), self.next_seq);
                self.next_seq += 1;
                let order_key = format!("agent-{step}-{i}");
                let ctor = Constructor::new("bluepill", &BluePillArgs { order_key }).unwrap();
                NewAgent { id, ctor, la: 1.0, lb: 1.0 }
            })
            .collect()
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    println!("=== bluepill — distsim simulation engine ===");
    println!("World size: {WORLD_SIZE}  |  Steps: {STEP_COUNT}");
    println!();

    // 1. Agent registry: how to build and migrate a `BluePillAgent`.
    let registry = bluepill_registry();

    // 2. One store, "bluepill", hosted on rank 0, backed by an in-memory
    //    SQLite database (swap for `SqliteBackend::open` to persist it).
    let mut stores = StoreRegistry::new();
    stores.register("bluepill", RankId(0), SqliteBackend::open_in_memory()?);

    // 3. Random placement — no load-aware balancing, since every agent's
    //    load is identical.
    let balancer = RandomLoadBalancer::new(WORLD_SIZE);

    // 4. Ten evenly spaced timesteps.
    let timestep_gen = RangeTimestepGenerator::new(0.0, STEP_COUNT, 1.0);

    // 5. Build the engine.
    let mut engine = Engine::new(
        WORLD_SIZE,
        registry,
        balancer,
        stores,
        BluePillPopulation { next_seq: 0 },
        timestep_gen,
    );

    // 6. Run.
    let t0 = Instant::now();
    let summary = engine.run(None)?;
    let elapsed = t0.elapsed();

    // Checkpoint the WAL and mark the store finished now that the run is over.
    engine.store_backend_mut("bluepill")?.finish()?;

    // 7. Summary.
    println!("Simulation complete in {:.3} s", elapsed.as_secs_f64());
    println!("  steps run          : {}", summary.steps.len());
    println!("  agents created     : {}", summary.total_agents_created());
    println!("  agent moves        : {}", summary.total_moves());
    println!("  state updates      : {}", summary.total_updates_applied());
    println!("  agents still alive : {}", engine.live_agent_count());
    println!();

    println!("{:<6} {:<10} {:<8} {:<10} {:<8}", "Step", "Created", "Moved", "Updates", "Died");
    println!("{}", "-".repeat(44));
    for report in &summary.steps {
        let step = report.timestep.map(|ts| ts.step).unwrap_or(f64::NAN);
        println!(
            "{:<6} {:<10} {:<8} {:<10} {:<8}",
            step, report.agents_created, report.agents_moved.len(), report.updates_applied, report.agents_died,
        );
    }

    Ok(())
}
