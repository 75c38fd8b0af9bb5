use dsim_core::{AgentId, RankId, SimConfig};

use crate::{GreedyLoadBalancer, LoadBalancer, RandomLoadBalancer};

fn aid(seq: u64) -> AgentId {
    AgentId::new(RankId(0), seq)
}

#[test]
fn imbalance_is_max_minus_min_over_sum() {
    assert_eq!(GreedyLoadBalancer::imbalance(&[5.0, 0.0, 0.0, 0.0, 0.0]), 1.0);
    assert_eq!(GreedyLoadBalancer::imbalance(&[10.0, 4.0, 2.0]), 0.5);
    assert_eq!(GreedyLoadBalancer::imbalance(&[0.0, 0.0, 0.0]), 0.0);
}

#[test]
fn add_object_assigns_a_valid_bucket() {
    let mut b = GreedyLoadBalancer::new(SimConfig::new(3));
    for i in 0..20 {
        let bucket = b.add_object(aid(i), 0.0, 0.0);
        assert!(bucket.index() < 3);
        assert_eq!(b.object_bucket(aid(i)).unwrap(), bucket);
    }
}

#[test]
fn a_freshly_created_object_never_moves_in_the_same_balance_call() {
    let mut b = GreedyLoadBalancer::new(SimConfig::new(2));
    for i in 0..5 {
        b.add_object(aid(i), 10.0, 10.0);
    }
    for _ in 0..20 {
        for i in 0..5 {
            b.update_load(aid(i), 10.0, 10.0).unwrap();
        }
    }
    // Placement is random, so find which bucket actually holds more of the
    // five loaded objects (the heavier one) and keep re-seating `fresh`
    // there until it lands in it (bounded — astronomically unlikely to
    // need more than a handful of tries).
    let mut counts = [0u32; 2];
    for i in 0..5 {
        counts[b.object_bucket(aid(i)).unwrap().index()] += 1;
    }
    let heavy = RankId(if counts[0] >= counts[1] { 0 } else { 1 });
    let fresh = aid(99);
    let mut landed_on_heavy = false;
    for _ in 0..64 {
        b.remove_object(fresh);
        let bucket = b.add_object(fresh, 10.0, 10.0);
        if bucket == heavy {
            landed_on_heavy = true;
            break;
        }
    }
    assert!(landed_on_heavy, "fresh object never landed on the heavy bucket after 64 tries");

    let report = b.balance();
    assert!(report.moves.iter().all(|mv| mv.object != fresh));
}

#[test]
fn zero_load_is_degenerate_and_never_moves() {
    let mut b = GreedyLoadBalancer::new(SimConfig::new(2));
    b.add_object(aid(0), 0.0, 0.0);
    b.add_object(aid(1), 0.0, 0.0);

    let report = b.balance();
    assert!(report.moves.is_empty());
    assert_eq!(report.imbalance_before, 0.0);
}

#[test]
fn balance_moves_load_from_the_hottest_bucket() {
    let mut b = GreedyLoadBalancer::new(SimConfig::new(2));
    b.add_object(aid(0), 1.0, 1.0);
    b.add_object(aid(1), 1.0, 1.0);
    b.add_object(aid(2), 1.0, 1.0);
    b.add_object(aid(3), 1.0, 1.0);
    // A warm-up balance() call clears `new_objects` so these four are
    // eligible to move on the next call — mirroring a real run, where an
    // object is never migrated in the very round it was created.
    b.balance();

    // Skew load heavily so two objects' bucket becomes the clear hotspot
    // regardless of where add_object randomly seated them.
    for _ in 0..20 {
        b.update_load(aid(0), 10.0, 10.0).unwrap();
        b.update_load(aid(2), 10.0, 10.0).unwrap();
        b.update_load(aid(1), 0.1, 0.1).unwrap();
        b.update_load(aid(3), 0.1, 0.1).unwrap();
    }

    let report = b.balance();
    assert!(report.imbalance_before >= 0.0);
    for mv in &report.moves {
        assert_ne!(mv.from, mv.to);
    }
}

#[test]
fn update_load_on_unknown_object_is_an_error() {
    let mut b = GreedyLoadBalancer::new(SimConfig::new(2));
    assert!(b.update_load(aid(99), 1.0, 1.0).is_err());
}

#[test]
fn remove_object_clears_bucket_membership() {
    let mut b = GreedyLoadBalancer::new(SimConfig::new(2));
    b.add_object(aid(0), 1.0, 1.0);
    b.remove_object(aid(0));
    assert!(b.object_bucket(aid(0)).is_err());
}

#[test]
fn random_balancer_never_produces_moves() {
    let mut b = RandomLoadBalancer::new(4);
    for i in 0..10 {
        b.add_object(aid(i), 1.0, 1.0);
    }
    let report = b.balance();
    assert!(report.moves.is_empty());
}

#[test]
fn random_balancer_assigns_every_object_a_valid_bucket() {
    let mut b = RandomLoadBalancer::new(3);
    for i in 0..20 {
        let bucket = b.add_object(aid(i), 0.0, 0.0);
        assert!(bucket.index() < 3);
        assert_eq!(b.object_bucket(aid(i)).unwrap(), bucket);
    }
}
