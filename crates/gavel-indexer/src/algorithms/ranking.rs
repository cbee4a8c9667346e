//! # Bid Ranking
//!
//! Orders a reconstructed bid ledger by amount and flags the winners.
//! Amount order is used instead of chronology: event order does not always
//! track monotonically increasing amounts across reorgs and duplicate
//! emissions, so "who leads and by how much" is the robust invariant.

use crate::domain::Bid;

/// Sorts bids by amount descending (stable: ties keep source order) and sets
/// `is_winning` on exactly the bids matching the maximum amount.
pub fn rank_bids(mut bids: Vec<Bid>) -> Vec<Bid> {
    if bids.is_empty() {
        return bids;
    }

    bids.sort_by(|a, b| b.amount.cmp(&a.amount));

    let top = bids[0].amount;
    for bid in &mut bids {
        bid.is_winning = bid.amount == top;
    }
    bids
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{datetime_from_unix, Address, Hash, U256};
    use proptest::prelude::*;

    fn bid(amount: u64, tag: u8) -> Bid {
        Bid::from_log(
            1,
            Address::new([tag; 20]),
            U256::from(amount),
            Hash::new([tag; 32]),
            tag as u64,
            datetime_from_unix(1_700_000_000),
        )
    }

    #[test]
    fn test_empty_ledger_stays_empty() {
        assert!(rank_bids(vec![]).is_empty());
    }

    #[test]
    fn test_sorted_descending_with_ties_first() {
        let ranked = rank_bids(vec![bid(3, 1), bid(1, 2), bid(3, 3)]);
        let amounts: Vec<u64> = ranked.iter().map(|b| b.amount.as_u64()).collect();
        assert_eq!(amounts, vec![3, 3, 1]);
    }

    #[test]
    fn test_all_max_bids_flagged_winning() {
        let ranked = rank_bids(vec![bid(3, 1), bid(1, 2), bid(3, 3)]);
        assert!(ranked[0].is_winning);
        assert!(ranked[1].is_winning);
        assert!(!ranked[2].is_winning);
    }

    #[test]
    fn test_ties_keep_source_order() {
        let ranked = rank_bids(vec![bid(3, 1), bid(1, 2), bid(3, 3)]);
        // First-seen amount-3 bid (tag 1) stays ahead of the later one (tag 3)
        assert_eq!(ranked[0].bidder, Address::new([1u8; 20]));
        assert_eq!(ranked[1].bidder, Address::new([3u8; 20]));
    }

    #[test]
    fn test_single_bid_wins() {
        let ranked = rank_bids(vec![bid(5, 1)]);
        assert!(ranked[0].is_winning);
    }

    proptest! {
        #[test]
        fn prop_exactly_max_amount_bids_win(amounts in prop::collection::vec(0u64..1000, 1..40)) {
            let bids: Vec<Bid> = amounts
                .iter()
                .enumerate()
                .map(|(i, a)| bid(*a, i as u8))
                .collect();
            let max = *amounts.iter().max().unwrap();
            let ranked = rank_bids(bids);

            prop_assert!(ranked.windows(2).all(|w| w[0].amount >= w[1].amount));
            for b in &ranked {
                prop_assert_eq!(b.is_winning, b.amount == U256::from(max));
            }
        }
    }
}
