//! Unit tests for dsim-core primitives.

#[cfg(test)]
mod ids {
    use crate::{AgentId, NodeHostId, RankId};

    #[test]
    fn agent_id_roundtrips_rank_and_sequence() {
        let id = AgentId::new(RankId(3), 42);
        assert_eq!(id.rank(), RankId(3));
        assert_eq!(id.sequence(), 42);
    }

    #[test]
    fn agent_id_ordering_is_rank_major() {
        let a = AgentId::new(RankId(0), 100);
        let b = AgentId::new(RankId(1), 0);
        assert!(a < b, "ids from a lower rank sort first regardless of sequence");
    }

    #[test]
    fn agent_id_ordering_within_rank_is_sequence_order() {
        let a = AgentId::new(RankId(0), 1);
        let b = AgentId::new(RankId(0), 2);
        assert!(a < b);
    }

    #[test]
    fn rank_id_index_and_display() {
        assert_eq!(RankId(7).index(), 7);
        assert_eq!(RankId(7).to_string(), "RankId(7)");
        assert_eq!(NodeHostId(2).index(), 2);
    }
}

#[cfg(test)]
mod time {
    use crate::{SimConfig, Timestep};

    #[test]
    fn real_duration() {
        let ts = Timestep::new(5.0, 5.0, 7.5);
        assert_eq!(ts.real_duration(), 2.5);
    }

    #[test]
    fn sim_config_defaults() {
        let cfg = SimConfig::new(4);
        assert_eq!(cfg.world_size, 4);
        assert_eq!(cfg.balance_lambda, 0.9);
        assert_eq!(cfg.imbalance_tolerance, 0.05);
    }
}
