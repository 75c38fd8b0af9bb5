use dsim_agent::{Agent, AgentBytes, AgentRegistry, AgentResult, Constructor, StateUpdate};
use dsim_balance::GreedyLoadBalancer;
use dsim_core::{AgentId, RankId, SimConfig, Timestep};
use dsim_store::MemoryBackend;
use serde::{Deserialize, Serialize};

use crate::{Engine, NewAgent, Population, RangeTimestepGenerator, Runner, StoreRegistry};

#[derive(Serialize, Deserialize)]
struct TickerArgs {
    order_key: String,
}

struct TickerAgent {
    order_key: String,
    count: i64,
    dies_after: Option<i64>,
}

impl Agent for TickerAgent {
    fn step(&mut self, _ts: &Timestep) -> AgentResult<Vec<StateUpdate>> {
        self.count += 1;
        Ok(vec![StateUpdate::new(
            "counters",
            self.order_key.clone(),
            "set_state",
            vec![serde_json::json!(self.count)],
        )])
    }

    fn is_alive(&self) -> bool {
        self.dies_after.is_none_or(|limit| self.count < limit)
    }

    fn type_tag(&self) -> &'static str {
        "ticker"
    }

    fn to_bytes(&self) -> AgentResult<AgentBytes> {
        AgentBytes::new("ticker", &(self.order_key.clone(), self.count, self.dies_after))
    }
}

fn ticker_registry() -> AgentRegistry {
    let mut reg = AgentRegistry::new();
    reg.register_constructor("ticker", |bytes| {
        let args: TickerArgs =
            serde_json::from_slice(bytes).map_err(|e| dsim_agent::AgentError::Decode("ticker", e))?;
        Ok(Box::new(TickerAgent {
            order_key: args.order_key,
            count: 0,
            dies_after: None,
        }))
    });
    reg.register_deserializer("ticker", |bytes| {
        let (order_key, count, dies_after): (String, i64, Option<i64>) =
            serde_json::from_slice(bytes).map_err(|e| dsim_agent::AgentError::Decode("ticker", e))?;
        Ok(Box::new(TickerAgent {
            order_key,
            count,
            dies_after,
        }))
    });
    reg
}

struct OneShotPopulation {
    seeded: bool,
    n: u32,
    dies_after: Option<i64>,
}

impl Population for OneShotPopulation {
    fn plan_agents(&mut self, ts: &Timestep) -> Vec<NewAgent> {
        if self.seeded || ts.step != 0.0 {
            return vec![];
        }
        self.seeded = true;
        (0..self.n)
            .map(|i| {
                let id = AgentId::new(RankId(0), i as u64);
                let ctor = Constructor::new("ticker", &TickerArgs { order_key: format!("t{i}") }).unwrap();
                NewAgent { id, ctor, la: 1.0, lb: 1.0 }
            })
            .collect()
    }
}

fn counters_store(host: RankId) -> StoreRegistry<MemoryBackend> {
    let mut stores = StoreRegistry::new();
    stores.register("counters", host, MemoryBackend::new());
    stores
}

#[test]
fn a_full_run_creates_steps_and_flushes_every_timestep() {
    let mut engine = Engine::new(
        3,
        ticker_registry(),
        GreedyLoadBalancer::new(SimConfig::new(3)),
        counters_store(RankId(0)),
        OneShotPopulation {
            seeded: false,
            n: 3,
            dies_after: None,
        },
        RangeTimestepGenerator::new(0.0, 3.0, 1.0),
    );

    let summary = engine.run(None).unwrap();

    assert_eq!(summary.steps.len(), 3);
    assert_eq!(summary.total_agents_created(), 3);
    assert_eq!(engine.live_agent_count(), 3);

    let backend = engine.store_backend("counters").unwrap();
    for i in 0..3 {
        assert_eq!(backend.get(&format!("t{i}")), Some(&serde_json::json!(3)));
    }
}

#[test]
fn an_agent_that_dies_is_dropped_from_tracking() {
    let mut registry = AgentRegistry::new();
    registry.register_constructor("ticker", |bytes| {
        let args: TickerArgs =
            serde_json::from_slice(bytes).map_err(|e| dsim_agent::AgentError::Decode("ticker", e))?;
        Ok(Box::new(TickerAgent {
            order_key: args.order_key,
            count: 0,
            dies_after: Some(1),
        }))
    });
    registry.register_deserializer("ticker", |bytes| {
        let (order_key, count, dies_after): (String, i64, Option<i64>) =
            serde_json::from_slice(bytes).map_err(|e| dsim_agent::AgentError::Decode("ticker", e))?;
        Ok(Box::new(TickerAgent {
            order_key,
            count,
            dies_after,
        }))
    });

    let mut engine = Engine::new(
        2,
        registry,
        GreedyLoadBalancer::new(SimConfig::new(2)),
        counters_store(RankId(0)),
        OneShotPopulation {
            seeded: false,
            n: 2,
            dies_after: Some(1),
        },
        RangeTimestepGenerator::new(0.0, 2.0, 1.0),
    );

    let summary = engine.run(None).unwrap();
    assert_eq!(summary.steps[0].agents_died, 2);
    assert_eq!(engine.live_agent_count(), 0);
}

#[test]
fn an_update_for_an_unregistered_store_is_an_error() {
    struct BadPopulation;
    impl Population for BadPopulation {
        fn plan_agents(&mut self, ts: &Timestep) -> Vec<NewAgent> {
            if ts.step != 0.0 {
                return vec![];
            }
            let ctor = Constructor::new("ticker", &TickerArgs { order_key: "x".to_string() }).unwrap();
            vec![NewAgent {
                id: AgentId::new(RankId(0), 0),
                ctor,
                la: 1.0,
                lb: 1.0,
            }]
        }
    }

    let mut engine = Engine::new(
        2,
        ticker_registry(),
        GreedyLoadBalancer::new(SimConfig::new(2)),
        StoreRegistry::<MemoryBackend>::new(), // no "counters" store registered
        BadPopulation,
        RangeTimestepGenerator::new(0.0, 1.0, 1.0),
    );

    assert!(engine.run(None).is_err());
}

#[test]
fn creating_an_already_resident_agent_id_is_a_fatal_error() {
    let registry = ticker_registry();
    let mut runner = Runner::new(RankId(0));
    let id = AgentId::new(RankId(0), 0);
    let ctor = Constructor::new("ticker", &TickerArgs { order_key: "t0".to_string() }).unwrap();

    runner.create_agent(id, &ctor, &registry).unwrap();
    assert!(runner.create_agent(id, &ctor, &registry).is_err());
}

#[test]
fn receiving_an_already_resident_agent_id_is_a_fatal_error() {
    let registry = ticker_registry();
    let mut runner = Runner::new(RankId(0));
    let id = AgentId::new(RankId(0), 0);
    let ctor = Constructor::new("ticker", &TickerArgs { order_key: "t0".to_string() }).unwrap();
    runner.create_agent(id, &ctor, &registry).unwrap();

    let bytes = AgentBytes::new("ticker", &("t0".to_string(), 0_i64, Option::<i64>::None)).unwrap();
    assert!(runner.receive_agent(id, &bytes, &registry).is_err());
}

#[test]
fn a_failing_agent_step_aborts_the_run_without_partial_updates() {
    struct PoisonAgent;
    impl Agent for PoisonAgent {
        fn step(&mut self, _ts: &Timestep) -> AgentResult<Vec<StateUpdate>> {
            Err(dsim_agent::AgentError::Step("boom".to_string()))
        }
        fn type_tag(&self) -> &'static str {
            "poison"
        }
        fn to_bytes(&self) -> AgentResult<AgentBytes> {
            AgentBytes::new("poison", &())
        }
    }

    struct PoisonPopulation {
        seeded: bool,
    }
    impl Population for PoisonPopulation {
        fn plan_agents(&mut self, ts: &Timestep) -> Vec<NewAgent> {
            if self.seeded || ts.step != 0.0 {
                return vec![];
            }
            self.seeded = true;
            let ctor = Constructor::new("poison", &()).unwrap();
            vec![NewAgent {
                id: AgentId::new(RankId(0), 0),
                ctor,
                la: 1.0,
                lb: 1.0,
            }]
        }
    }

    let mut registry = AgentRegistry::new();
    registry.register_constructor("poison", |_| Ok(Box::new(PoisonAgent)));
    registry.register_deserializer("poison", |_| Ok(Box::new(PoisonAgent)));

    let mut engine = Engine::new(
        1,
        registry,
        GreedyLoadBalancer::new(SimConfig::new(1)),
        counters_store(RankId(0)),
        PoisonPopulation { seeded: false },
        RangeTimestepGenerator::new(0.0, 1.0, 1.0),
    );

    let err = engine.run(None);
    assert!(err.is_err());
    // The failing agent's step never got far enough to emit an update.
    let backend = engine.store_backend("counters").unwrap();
    assert_eq!(backend.get("t0"), None);
}
