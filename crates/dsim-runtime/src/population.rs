use dsim_agent::Constructor;
use dsim_core::{AgentId, Timestep};

/// One agent `Population::plan_agents` wants created this step.
#[derive(Clone, Debug)]
pub struct NewAgent {
    pub id: AgentId,
    pub ctor: Constructor,
    /// Initial compute-load estimate, fed to the load balancer as `la`.
    pub la: f64,
    /// Initial memory-load estimate, fed to the load balancer as `lb`.
    pub lb: f64,
}

/// Decides which agents are born in a given timestep.
///
/// Runs once per step, master-side, before the creation barrier — the
/// `Coordinator` assigns each returned agent a host rank via its
/// `LoadBalancer` and ships a `CreateAgent` there. A `Population` never
/// sees ranks or hosts; it only decides *what* gets created, mirroring how
/// the upstream `Population` actor is oblivious to where the `Coordinator`
/// eventually places each agent.
pub trait Population: Send {
    fn plan_agents(&mut self, ts: &Timestep) -> Vec<NewAgent>;
}
