use crate::settings::PrizeConfig;

/// Payout for a 1-based rank under the given prize table. Ranks outside
/// `1..=paid_placements` pay zero, as do placements the amounts vector
/// does not cover.
pub fn payout_for(rank: u32, prizes: &PrizeConfig) -> f64 {
    if rank == 0 || (rank as usize) > prizes.paid_placements {
        return 0.0;
    }
    prizes
        .amounts
        .get(rank as usize - 1)
        .copied()
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(paid: usize, amounts: &[f64]) -> PrizeConfig {
        PrizeConfig {
            paid_placements: paid,
            amounts: amounts.to_vec(),
        }
    }

    #[test]
    fn pays_top_placements_and_nothing_beyond() {
        let prizes = table(3, &[300.0, 150.0, 50.0]);
        assert_eq!(payout_for(1, &prizes), 300.0);
        assert_eq!(payout_for(2, &prizes), 150.0);
        assert_eq!(payout_for(3, &prizes), 50.0);
        assert_eq!(payout_for(4, &prizes), 0.0);
        assert_eq!(payout_for(0, &prizes), 0.0);
    }

    #[test]
    fn short_amounts_vector_pays_zero_for_missing_indices() {
        let prizes = table(3, &[300.0]);
        assert_eq!(payout_for(1, &prizes), 300.0);
        assert_eq!(payout_for(2, &prizes), 0.0);
        assert_eq!(payout_for(3, &prizes), 0.0);
    }

    #[test]
    fn empty_table_pays_nothing() {
        let prizes = table(0, &[]);
        assert_eq!(payout_for(1, &prizes), 0.0);
    }
}
