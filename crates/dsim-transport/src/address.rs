use dsim_core::RankId;

/// The target of a send: one specific rank, or every rank in the world.
///
/// `Every` is expanded by the transport into one envelope per rank at send
/// time — recipients never see a multicast address, only their own rank.
#[derive(Copy, Clone, PartialEq, Eq, Debug, serde::Serialize, serde::Deserialize)]
pub enum Address {
    Rank(RankId),
    Every,
}

impl From<RankId> for Address {
    fn from(rank: RankId) -> Self {
        Address::Rank(rank)
    }
}
