use dsim_core::RankId;

use crate::{transport::Deliverable, Address, InMemoryTransport, Transport, MASTER_RANK};

#[test]
fn direct_send_preserves_fifo_order_per_recipient() {
    let mut t: InMemoryTransport<u32> = InMemoryTransport::single_rank_per_node(2);
    t.send(MASTER_RANK, Address::Rank(RankId(1)), 1).unwrap();
    t.send(MASTER_RANK, Address::Rank(RankId(1)), 2).unwrap();

    let (to, from, msg) = t.pop().unwrap();
    assert_eq!((to, from, msg), (RankId(1), MASTER_RANK, 1));
    let (_, _, msg) = t.pop().unwrap();
    assert_eq!(msg, 2);
    assert!(t.is_empty());
}

#[test]
fn every_address_fans_out_to_all_ranks() {
    let mut t: InMemoryTransport<&'static str> = InMemoryTransport::single_rank_per_node(3);
    t.send(MASTER_RANK, Address::Every, "go").unwrap();

    let mut seen = vec![];
    while let Some((to, _, msg)) = t.pop() {
        assert_eq!(msg, "go");
        seen.push(to);
    }
    seen.sort();
    assert_eq!(seen, vec![RankId(0), RankId(1), RankId(2)]);
}

#[test]
fn buffered_send_is_invisible_until_flush() {
    let mut t: InMemoryTransport<u32> = InMemoryTransport::single_rank_per_node(2);
    t.send_buffered(MASTER_RANK, Address::Rank(RankId(1)), 7).unwrap();
    assert!(t.is_empty());

    t.flush(MASTER_RANK).unwrap();
    let (to, _, msg) = t.pop().unwrap();
    assert_eq!((to, msg), (RankId(1), 7));
}

#[test]
fn send_to_unknown_rank_is_rejected() {
    let mut t: InMemoryTransport<u32> = InMemoryTransport::single_rank_per_node(1);
    let err = t.send(MASTER_RANK, Address::Rank(RankId(9)), 1).unwrap_err();
    assert!(matches!(err, crate::TransportError::UnknownRank(RankId(9))));
}

#[test]
fn node_ranks_reports_hosted_ranks() {
    let t: InMemoryTransport<u32> =
        InMemoryTransport::new(vec![vec![RankId(0), RankId(1)], vec![RankId(2)]]);
    assert_eq!(
        t.node_ranks(dsim_core::NodeHostId(0)).unwrap(),
        &[RankId(0), RankId(1)]
    );
    assert_eq!(t.node_ranks(dsim_core::NodeHostId(1)).unwrap(), &[RankId(2)]);
}
