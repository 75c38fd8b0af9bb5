//! Single-process reference [`Transport`] implementation.
//!
//! One global FIFO queue carries every envelope in send order. That is a
//! strictly stronger guarantee than the trait requires (global order implies
//! per-sender-per-recipient order) and is the simplest thing that is
//! obviously correct for a single-threaded driver loop — see
//! `dsim-runtime::Engine::pump`.

use std::collections::{HashMap, VecDeque};

use dsim_core::{NodeHostId, RankId};

use crate::{transport::Deliverable, Address, Transport, TransportError, TransportResult};

struct Envelope<M> {
    from: RankId,
    to: RankId,
    msg: M,
}

pub struct InMemoryTransport<M> {
    ranks: Vec<RankId>,
    nodes: Vec<NodeHostId>,
    node_ranks: HashMap<NodeHostId, Vec<RankId>>,
    queue: VecDeque<Envelope<M>>,
    buffers: HashMap<RankId, Vec<Envelope<M>>>,
}

impl<M> InMemoryTransport<M> {
    /// Build a world where `node_ranks[i]` lists the ranks hosted on node
    /// `i`. One rank per node is, by convention, the store-replica host
    /// (`dsim-runtime::StoreRegistry` picks the first rank in each list).
    pub fn new(node_ranks: Vec<Vec<RankId>>) -> Self {
        let nodes: Vec<NodeHostId> = (0..node_ranks.len() as u32).map(NodeHostId).collect();
        let mut ranks: Vec<RankId> = node_ranks.iter().flatten().copied().collect();
        ranks.sort_unstable();

        let node_ranks = nodes.iter().copied().zip(node_ranks).collect();

        Self {
            ranks,
            nodes,
            node_ranks,
            queue: VecDeque::new(),
            buffers: HashMap::new(),
        }
    }

    /// Convenience for tests and demos: one rank per node, `world_size` ranks
    /// total.
    pub fn single_rank_per_node(world_size: u32) -> Self {
        let node_ranks = (0..world_size).map(|r| vec![RankId(r)]).collect();
        Self::new(node_ranks)
    }

    fn check_rank(&self, rank: RankId) -> TransportResult<()> {
        if self.ranks.contains(&rank) {
            Ok(())
        } else {
            Err(TransportError::UnknownRank(rank))
        }
    }

    fn enqueue(&mut self, from: RankId, to: Address, msg: M) -> TransportResult<()>
    where
        M: Clone,
    {
        match to {
            Address::Rank(rank) => {
                self.check_rank(rank)?;
                self.queue.push_back(Envelope { from, to: rank, msg });
            }
            Address::Every => {
                for &rank in &self.ranks {
                    self.queue.push_back(Envelope {
                        from,
                        to: rank,
                        msg: msg.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

impl<M: Clone> Transport<M> for InMemoryTransport<M> {
    fn send(&mut self, from: RankId, to: Address, msg: M) -> TransportResult<()> {
        self.enqueue(from, to, msg)
    }

    fn send_buffered(&mut self, from: RankId, to: Address, msg: M) -> TransportResult<()> {
        self.check_rank(from)?;
        let envelopes = match to {
            Address::Rank(rank) => {
                self.check_rank(rank)?;
                vec![Envelope { from, to: rank, msg }]
            }
            Address::Every => self
                .ranks
                .iter()
                .map(|&rank| Envelope {
                    from,
                    to: rank,
                    msg: msg.clone(),
                })
                .collect(),
        };
        self.buffers.entry(from).or_default().extend(envelopes);
        Ok(())
    }

    fn flush(&mut self, from: RankId) -> TransportResult<()> {
        if let Some(pending) = self.buffers.remove(&from) {
            self.queue.extend(pending);
        }
        Ok(())
    }

    fn ranks(&self) -> &[RankId] {
        &self.ranks
    }

    fn nodes(&self) -> &[NodeHostId] {
        &self.nodes
    }

    fn node_ranks(&self, node: NodeHostId) -> TransportResult<&[RankId]> {
        self.node_ranks
            .get(&node)
            .map(Vec::as_slice)
            .ok_or(TransportError::UnknownNode(node))
    }
}

impl<M> Deliverable<M> for InMemoryTransport<M> {
    fn pop(&mut self) -> Option<(RankId, RankId, M)> {
        self.queue.pop_front().map(|e| (e.to, e.from, e.msg))
    }

    fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
