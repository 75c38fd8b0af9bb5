use dsim_core::{AgentId, RankId};

use crate::BalanceResult;

/// A single object's rank reassignment, as decided by [`LoadBalancer::balance`].
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Move {
    pub object: AgentId,
    pub from: RankId,
    pub to: RankId,
}

/// What a [`LoadBalancer::balance`] call did, for the `Coordinator`'s step
/// report and for tests.
#[derive(Clone, Debug, Default)]
pub struct BalanceReport {
    pub moves: Vec<Move>,
    /// `(max_bucket_load - min_bucket_load) / sum_bucket_load` before this
    /// call moved anything; `0.0` if every tracked object has zero load.
    pub imbalance_before: f64,
}

/// Assigns agents to ranks (buckets) and periodically rebalances.
///
/// Every method here is a pure bookkeeping operation over object ids — a
/// `LoadBalancer` never touches the agents themselves, only their rank
/// assignment. Moving the actual agent state is the `Coordinator`'s job once
/// it receives a [`Move`].
pub trait LoadBalancer {
    /// Track a new object with initial load `(la, lb)` and return the
    /// bucket it was assigned to.
    fn add_object(&mut self, object: AgentId, la: f64, lb: f64) -> RankId;

    /// Stop tracking `object` (it died or was otherwise removed).
    fn remove_object(&mut self, object: AgentId);

    /// Feed this step's freshly measured `(la, lb)` for `object` into the
    /// balancer's running estimate of its load.
    fn update_load(&mut self, object: AgentId, la: f64, lb: f64) -> BalanceResult<()>;

    /// The bucket `object` is currently assigned to.
    fn object_bucket(&self, object: AgentId) -> BalanceResult<RankId>;

    /// Re-evaluate the current assignment and return the moves needed to
    /// bring per-bucket load within tolerance. Applies the moves to its own
    /// bookkeeping before returning, so a second call without intervening
    /// `update_load`s reports an empty [`BalanceReport`].
    fn balance(&mut self) -> BalanceReport;
}
