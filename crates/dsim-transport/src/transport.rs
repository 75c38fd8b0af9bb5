use dsim_core::{NodeHostId, RankId};

use crate::{Address, TransportResult};

/// Rank zero is always the master: it runs the `Simulator`, `Population`,
/// and `TimestepGenerator`. Every other rank runs a `Runner`.
pub const MASTER_RANK: RankId = RankId(0);

/// A capability for exchanging messages of type `M` between ranks.
///
/// Implementations must preserve FIFO order between any one ordered pair of
/// ranks: if rank `a` sends `m1` then `m2` to rank `b`, `b` must observe
/// `m1` before `m2`. No ordering guarantee is made across different sender
/// ranks — actors that depend on cross-rank ordering use an explicit gate
/// (a `*Done` count, a barrier) rather than relying on delivery order.
pub trait Transport<M> {
    /// Send `msg` to `to` immediately.
    fn send(&mut self, from: RankId, to: Address, msg: M) -> TransportResult<()>;

    /// Buffer `msg` for `to` without delivering it; released by the next
    /// [`Transport::flush`] call from the same sender. Lets a rank batch a
    /// tight loop of sends (e.g. one per agent moved this step) into fewer
    /// delivery events.
    fn send_buffered(&mut self, from: RankId, to: Address, msg: M) -> TransportResult<()>;

    /// Deliver every message `from` has buffered via [`Transport::send_buffered`].
    fn flush(&mut self, from: RankId) -> TransportResult<()>;

    /// Every rank participating in this transport's world, master included.
    fn ranks(&self) -> &[RankId];

    /// Every physical node participating in this transport's world.
    fn nodes(&self) -> &[NodeHostId];

    /// The ranks hosted on `node`.
    fn node_ranks(&self, node: NodeHostId) -> TransportResult<&[RankId]>;
}

/// A [`Transport`] whose deliveries can be pumped by an in-process driver
/// loop, rather than arriving on a background thread or socket.
///
/// `dsim-runtime`'s reference `Engine` drives simulations single-threaded by
/// repeatedly popping the next envelope and dispatching it; a networked
/// transport has no use for this trait.
pub trait Deliverable<M> {
    /// Pop the next envelope as `(to, from, msg)`, if any are queued.
    fn pop(&mut self) -> Option<(RankId, RankId, M)>;

    fn is_empty(&self) -> bool;
}
