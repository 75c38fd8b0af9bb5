use dsim_balance::Move;
use dsim_core::Timestep;
use dsim_store::FlushReport;

/// What happened during one timestep, for callers that want visibility
/// into the run without a full observer/logging layer.
#[derive(Clone, Debug, Default)]
pub struct StepReport {
    pub timestep: Option<Timestep>,
    pub agents_created: usize,
    pub agents_moved: Vec<Move>,
    pub agents_died: usize,
    pub updates_applied: usize,
    pub flushes: Vec<FlushReport>,
    pub imbalance_before_balance: f64,
}

/// The accumulated result of an [`crate::Engine::run`] call.
#[derive(Clone, Debug, Default)]
pub struct SummaryReport {
    pub steps: Vec<StepReport>,
}

impl SummaryReport {
    pub fn total_updates_applied(&self) -> usize {
        self.steps.iter().map(|s| s.updates_applied).sum()
    }

    pub fn total_agents_created(&self) -> usize {
        self.steps.iter().map(|s| s.agents_created).sum()
    }

    pub fn total_moves(&self) -> usize {
        self.steps.iter().map(|s| s.agents_moved.len()).sum()
    }
}
