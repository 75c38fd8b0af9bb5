//! A `LoadBalancer` that assigns each new object a uniformly random bucket
//! and never rebalances — a baseline to compare the greedy strategy
//! against, and useful when load is already known to be even (e.g. testing).

use std::collections::HashMap;

use dsim_core::{AgentId, RankId};
use rand::Rng;

use crate::{BalanceError, BalanceReport, BalanceResult, LoadBalancer};

pub struct RandomLoadBalancer {
    n_buckets: u32,
    object_bucket: HashMap<AgentId, RankId>,
}

impl RandomLoadBalancer {
    pub fn new(n_buckets: u32) -> Self {
        assert!(n_buckets > 0, "a load balancer needs at least one bucket");
        Self {
            n_buckets,
            object_bucket: HashMap::new(),
        }
    }
}

impl LoadBalancer for RandomLoadBalancer {
    fn add_object(&mut self, object: AgentId, _la: f64, _lb: f64) -> RankId {
        let bucket = RankId(rand::thread_rng().gen_range(0..self.n_buckets));
        self.object_bucket.insert(object, bucket);
        bucket
    }

    fn remove_object(&mut self, object: AgentId) {
        self.object_bucket.remove(&object);
    }

    fn update_load(&mut self, object: AgentId, _la: f64, _lb: f64) -> BalanceResult<()> {
        if self.object_bucket.contains_key(&object) {
            Ok(())
        } else {
            Err(BalanceError::UnknownObject(object))
        }
    }

    fn object_bucket(&self, object: AgentId) -> BalanceResult<RankId> {
        self.object_bucket
            .get(&object)
            .copied()
            .ok_or(BalanceError::UnknownObject(object))
    }

    fn balance(&mut self) -> BalanceReport {
        BalanceReport::default()
    }
}
