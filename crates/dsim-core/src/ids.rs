//! Strongly typed, zero-cost identifier wrappers.
//!
//! `RankId` and `NodeHostId` are generated by the same `typed_id!` macro
//! pattern used across the pack: `Copy + Ord + Hash` newtypes around a
//! primitive integer, with a `.index()` helper for direct `Vec` indexing.
//! `AgentId` is hand-rolled because it packs two fields (originating rank +
//! per-rank counter) into one `u64` instead of wrapping a single integer.

use std::fmt;

macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$name> for usize {
            #[inline(always)]
            fn from(id: $name) -> usize {
                id.0 as usize
            }
        }
    };
}

typed_id! {
    /// A process in the distributed deployment. `RankId(0)` is the master
    /// (see [`crate::CoreError`] and the `Transport::MASTER_RANK` constant
    /// in `dsim-transport`).
    pub struct RankId(u32);
}

typed_id! {
    /// A physical host. One or more ranks run on each node; exactly one rank
    /// per node hosts each `StateStore` replica.
    pub struct NodeHostId(u32);
}

// ── AgentId ───────────────────────────────────────────────────────────────────

/// Globally unique, totally ordered agent identifier.
///
/// Packed as `(originating_rank: u16) << 48 | (local_sequence: u48)`. The
/// originating rank is whichever `Population` (always the master) minted the
/// id; the low 48 bits are a per-run monotonic counter. This gives global
/// uniqueness and a total order without an external UUID dependency — the
/// same zero-dependency-ID convention the pack favors for hot-path keys.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentId(pub u64);

const SEQ_BITS: u32 = 48;
const SEQ_MASK: u64 = (1u64 << SEQ_BITS) - 1;

impl AgentId {
    /// Build an id from the minting rank and a per-rank sequence number.
    ///
    /// # Panics
    /// Panics in debug builds if `seq` does not fit in 48 bits.
    pub fn new(rank: RankId, seq: u64) -> Self {
        debug_assert!(seq <= SEQ_MASK, "agent sequence counter overflowed 48 bits");
        AgentId(((rank.0 as u64) << SEQ_BITS) | (seq & SEQ_MASK))
    }

    /// The rank that minted this id.
    #[inline]
    pub fn rank(self) -> RankId {
        RankId((self.0 >> SEQ_BITS) as u32)
    }

    /// The per-rank sequence number this id was minted with.
    #[inline]
    pub fn sequence(self) -> u64 {
        self.0 & SEQ_MASK
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AgentId({}/{})", self.rank().0, self.sequence())
    }
}
