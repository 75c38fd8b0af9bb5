//! EMA-smoothed greedy load balancer.
//!
//! Tracks two load components per object — `la` (compute, e.g. step time)
//! and `lb` (memory) — each smoothed independently with an exponential
//! moving average, then combined into one normalized scalar per object
//! before bucket sums are compared. `balance()` greedily moves objects from
//! the most-loaded bucket to the least-loaded one until the imbalance ratio
//! is within tolerance or no further beneficial move exists.
//!
//! `add_object` seats new objects in a uniformly random bucket (the
//! balancer's own EMA correction pulls them into place over subsequent
//! steps); an object stays ineligible to move in the very `balance()` call
//! that follows its creation, so a freshly seated object is never migrated
//! before it has run at least once.
//!
//! # Deviation from the upstream reference
//!
//! The Python implementation this is grounded on computes the memory
//! component of its per-object normalized load as `object_la[o] / max_lb`
//! (reusing the compute-load table where the memory-load table is clearly
//! intended) and re-zeros its whole bucket-load accumulator array on every
//! iteration of the per-bucket summation loop, which would erase all but
//! the last bucket's sum. Both read as transcription bugs against the
//! balancer's own documented formula. This implementation follows the
//! documented formula — `lambda * (lb / max_lb)` for the memory term, one
//! zeroed accumulator per bucket — rather than reproducing either bug.
//!
//! Bucket selection also trades the upstream's heap-indexed buckets for a
//! linear scan over `bucket_load` each iteration: balancer world sizes are
//! small enough (one bucket per rank) that this is not a hot path, and the
//! scan is far easier to verify against the spec than a heap invariant. The
//! per-bucket min-heap of candidate objects is likewise replaced with a
//! sort — built once per outer iteration over the source bucket's objects,
//! ascending by normalized load, then walked lightest-first exactly as the
//! heap-pop order would produce, stopping at the first object that fails
//! the inequality-preserving test, same as popping a min-heap until it
//! fails.

use std::collections::{HashMap, HashSet};

use dsim_core::{AgentId, RankId, SimConfig};
use rand::Rng;

use crate::{BalanceError, BalanceReport, BalanceResult, LoadBalancer, Move};

pub struct GreedyLoadBalancer {
    n_buckets: u32,
    lambda_a: f64,
    lambda_b: f64,
    lambda_combine: f64,
    imbalance_tol: f64,
    object_la: HashMap<AgentId, f64>,
    object_lb: HashMap<AgentId, f64>,
    object_bucket: HashMap<AgentId, RankId>,
    bucket_objects: Vec<Vec<AgentId>>,
    /// Objects added since the last `balance()` call — excluded from move
    /// candidacy during the next call, then cleared, so a freshly created
    /// object is never migrated before it has run at least once.
    new_objects: HashSet<AgentId>,
}

impl GreedyLoadBalancer {
    /// Builds a balancer for `config.world_size` buckets, using `config`'s
    /// EMA/tolerance tunables in place of hardcoded constants.
    pub fn new(config: SimConfig) -> Self {
        let n_buckets = config.world_size;
        assert!(n_buckets > 0, "a load balancer needs at least one bucket");
        Self {
            n_buckets,
            lambda_a: config.balance_lambda,
            lambda_b: config.balance_lambda,
            lambda_combine: config.balance_combine_lambda,
            imbalance_tol: config.imbalance_tolerance,
            object_la: HashMap::new(),
            object_lb: HashMap::new(),
            object_bucket: HashMap::new(),
            bucket_objects: vec![Vec::new(); n_buckets as usize],
            new_objects: HashSet::new(),
        }
    }

    /// Each object's normalized load: `(1 - LAMBDA) * la/max_la + LAMBDA * lb/max_lb`.
    /// `0.0` for every object when either maximum is `0.0` (nothing has run
    /// yet, or no object reports memory usage) — there is nothing
    /// meaningful to balance on, so every object is treated as weightless.
    fn normalized_loads(&self) -> HashMap<AgentId, f64> {
        let max_la = self.object_la.values().cloned().fold(0.0_f64, f64::max);
        let max_lb = self.object_lb.values().cloned().fold(0.0_f64, f64::max);

        if max_la == 0.0 || max_lb == 0.0 {
            return self.object_la.keys().map(|&o| (o, 0.0)).collect();
        }

        self.object_la
            .keys()
            .map(|&o| {
                let la = self.object_la[&o];
                let lb = self.object_lb[&o];
                let norm = (1.0 - self.lambda_combine) * (la / max_la) + self.lambda_combine * (lb / max_lb);
                (o, norm)
            })
            .collect()
    }

    fn bucket_loads(&self, norm: &HashMap<AgentId, f64>) -> Vec<f64> {
        let mut loads = vec![0.0_f64; self.n_buckets as usize];
        for (bucket, objects) in self.bucket_objects.iter().enumerate() {
            loads[bucket] = objects.iter().map(|o| norm[o]).sum();
        }
        loads
    }

    /// `(max - min) / sum` of bucket loads, per spec. `0.0` when every
    /// bucket is empty of load (nothing to balance on).
    pub(crate) fn imbalance(loads: &[f64]) -> f64 {
        let sum: f64 = loads.iter().sum();
        if sum == 0.0 {
            return 0.0;
        }
        let max = loads.iter().cloned().fold(f64::MIN, f64::max);
        let min = loads.iter().cloned().fold(f64::MAX, f64::min);
        (max - min) / sum
    }

    /// `from`'s objects eligible to move, in move order: lightest
    /// normalized load first (mirroring popping a min-heap built over
    /// `from`'s objects), excluding anything in `new_objects`.
    fn move_order(&self, from: usize, norm: &HashMap<AgentId, f64>) -> Vec<AgentId> {
        let mut objects: Vec<AgentId> = self.bucket_objects[from]
            .iter()
            .copied()
            .filter(|o| !self.new_objects.contains(o))
            .collect();
        objects.sort_by(|a, b| norm[a].partial_cmp(&norm[b]).unwrap());
        objects
    }
}

impl LoadBalancer for GreedyLoadBalancer {
    fn add_object(&mut self, object: AgentId, la: f64, lb: f64) -> RankId {
        let bucket = rand::thread_rng().gen_range(0..self.n_buckets) as usize;

        self.object_la.insert(object, la);
        self.object_lb.insert(object, lb);
        self.object_bucket.insert(object, RankId(bucket as u32));
        self.bucket_objects[bucket].push(object);
        self.new_objects.insert(object);

        RankId(bucket as u32)
    }

    fn remove_object(&mut self, object: AgentId) {
        self.object_la.remove(&object);
        self.object_lb.remove(&object);
        self.new_objects.remove(&object);
        if let Some(bucket) = self.object_bucket.remove(&object) {
            self.bucket_objects[bucket.index()].retain(|&o| o != object);
        }
    }

    fn update_load(&mut self, object: AgentId, la: f64, lb: f64) -> BalanceResult<()> {
        if !self.object_bucket.contains_key(&object) {
            return Err(BalanceError::UnknownObject(object));
        }
        let ema_la = self.object_la.get_mut(&object).unwrap();
        *ema_la = self.lambda_a * *ema_la + (1.0 - self.lambda_a) * la;
        let ema_lb = self.object_lb.get_mut(&object).unwrap();
        *ema_lb = self.lambda_b * *ema_lb + (1.0 - self.lambda_b) * lb;
        Ok(())
    }

    fn object_bucket(&self, object: AgentId) -> BalanceResult<RankId> {
        self.object_bucket
            .get(&object)
            .copied()
            .ok_or(BalanceError::UnknownObject(object))
    }

    fn balance(&mut self) -> BalanceReport {
        let norm = self.normalized_loads();
        let mut loads = self.bucket_loads(&norm);
        let imbalance_before = Self::imbalance(&loads);

        let mut moves = Vec::new();
        // Bounded by total object count: each accepted move strictly
        // decreases the heaviest bucket's load, so this cannot cycle.
        let max_iterations = self.object_la.len() + 1;

        for _ in 0..max_iterations {
            if Self::imbalance(&loads) <= self.imbalance_tol {
                break;
            }

            let from = (0..loads.len()).max_by(|&a, &b| loads[a].partial_cmp(&loads[b]).unwrap()).unwrap();
            let to = (0..loads.len()).min_by(|&a, &b| loads[a].partial_cmp(&loads[b]).unwrap()).unwrap();
            if from == to {
                break;
            }

            // Pop `from`'s objects lightest-first, moving each to `to` as
            // long as the move does not flip which of the two is heavier;
            // stop at the first object that fails the test.
            let mut moved_any = false;
            for object in self.move_order(from, &norm) {
                let w = norm[&object];
                if loads[from] - w >= loads[to] + w {
                    self.bucket_objects[from].retain(|&o| o != object);
                    self.bucket_objects[to].push(object);
                    self.object_bucket.insert(object, RankId(to as u32));
                    loads[from] -= w;
                    loads[to] += w;
                    moves.push(Move {
                        object,
                        from: RankId(from as u32),
                        to: RankId(to as u32),
                    });
                    moved_any = true;
                } else {
                    break;
                }
            }

            if !moved_any {
                break;
            }
        }

        self.new_objects.clear();
        BalanceReport { moves, imbalance_before }
    }
}
