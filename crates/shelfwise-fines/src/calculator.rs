use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::policy::FineTier;

/// Whole days `at` lies past `due`, truncated. Zero when `at` is not later.
pub fn overdue_days(due: DateTime<Utc>, at: DateTime<Utc>) -> i64 {
    if at <= due {
        return 0;
    }
    (at - due).num_days()
}

/// Largest fine ever assessed: 99,999,999.99, the widest amount a
/// `NUMERIC(10, 2)` column stores.
pub const MAX_FINE: Decimal = Decimal::from_parts(1_410_065_407, 2, 0, false, 2);

/// Tiered fine for a loan due at `due` and returned (or assessed) at
/// `effective`.
///
/// The tier walk charges every tier fully until it reaches the tier that
/// contains the last chargeable day, charges that one partially and stops.
/// `tiers` must be sorted ascending; [`crate::FinePolicy`] guarantees it.
/// The total saturates at [`MAX_FINE`].
pub fn calculate_fine(
    tiers: &[FineTier],
    due: DateTime<Utc>,
    effective: DateTime<Utc>,
    grace_period_days: u32,
) -> Decimal {
    let overdue = overdue_days(due, effective);
    let grace = i64::from(grace_period_days);
    if overdue <= grace {
        return Decimal::ZERO;
    }

    let chargeable = overdue - grace;
    let mut total = Decimal::ZERO;

    for tier in tiers {
        let last_day = if tier.contains(chargeable) {
            chargeable
        } else {
            match tier.days_end {
                Some(end) if chargeable > end => end,
                _ => continue,
            }
        };

        let days = Decimal::from(last_day - tier.days_start + 1);
        total = tier
            .rate_per_day
            .checked_mul(days)
            .and_then(|charge| total.checked_add(charge))
            .map_or(MAX_FINE, |sum| sum.min(MAX_FINE));

        if last_day == chargeable || total == MAX_FINE {
            break;
        }
    }

    total.round_dp(2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::FinePolicy;
    use chrono::{Duration, TimeZone};
    use proptest::prelude::*;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    fn default_fine(due: DateTime<Utc>, returned: DateTime<Utc>) -> Decimal {
        let policy = FinePolicy::default();
        calculate_fine(policy.tiers(), due, returned, policy.grace_period_days())
    }

    #[test]
    fn test_on_time_return_is_free() {
        let due = at(2024, 1, 1);
        for grace in [0, 1, 5, 30] {
            let policy = FinePolicy::default();
            assert_eq!(calculate_fine(policy.tiers(), due, due, grace), Decimal::ZERO);
        }
    }

    #[test]
    fn test_early_return_is_free() {
        assert_eq!(default_fine(at(2024, 1, 10), at(2024, 1, 2)), Decimal::ZERO);
    }

    #[test]
    fn test_within_grace_period() {
        assert_eq!(default_fine(at(2024, 1, 1), at(2024, 1, 3)), Decimal::ZERO);
        assert_eq!(default_fine(at(2024, 1, 1), at(2024, 1, 6)), Decimal::ZERO);
    }

    #[test]
    fn test_first_tier_only() {
        // 9 overdue days, 4 chargeable at 2/day
        let fine = default_fine(at(2024, 1, 1), at(2024, 1, 10));
        assert_eq!(fine, Decimal::new(800, 2));
    }

    #[test]
    fn test_spans_two_tiers() {
        // 19 overdue days, 14 chargeable: 7 x 2 + 7 x 5
        let fine = default_fine(at(2024, 1, 1), at(2024, 1, 20));
        assert_eq!(fine, Decimal::new(4900, 2));
    }

    #[test]
    fn test_reaches_open_ended_tier() {
        // 25 overdue days, 20 chargeable: 7 x 2 + 7 x 5 + 6 x 10
        let fine = default_fine(at(2024, 1, 1), at(2024, 1, 26));
        assert_eq!(fine, Decimal::from(109));
    }

    #[test]
    fn test_tier_boundaries() {
        let due = at(2024, 1, 1);
        // chargeable 7 -> 14, chargeable 8 -> 19, chargeable 15 -> 59
        assert_eq!(default_fine(due, due + Duration::days(12)), Decimal::from(14));
        assert_eq!(default_fine(due, due + Duration::days(13)), Decimal::from(19));
        assert_eq!(default_fine(due, due + Duration::days(20)), Decimal::from(59));
    }

    #[test]
    fn test_partial_days_are_truncated() {
        let due = at(2024, 1, 1);
        let returned = due + Duration::days(6) + Duration::hours(23);
        // 6 whole days, 1 chargeable
        assert_eq!(default_fine(due, returned), Decimal::from(2));
    }

    #[test]
    fn test_less_than_a_day_late_is_free_without_grace() {
        let policy = FinePolicy::default();
        let due = at(2024, 1, 1);
        let fine = calculate_fine(policy.tiers(), due, due + Duration::hours(20), 0);
        assert_eq!(fine, Decimal::ZERO);
    }

    #[test]
    fn test_fractional_rates_round_to_cents() {
        let policy = FinePolicy::new(0, vec![FineTier::open_ended(1, Decimal::new(3333, 3))]).unwrap();
        let fine = policy.fine_between(at(2024, 1, 1), at(2024, 1, 4));
        assert_eq!(fine, Decimal::new(1000, 2));
    }

    #[test]
    fn test_overdue_days() {
        let due = at(2024, 1, 1);
        assert_eq!(overdue_days(due, at(2023, 12, 1)), 0);
        assert_eq!(overdue_days(due, due), 0);
        assert_eq!(overdue_days(due, due + Duration::hours(47)), 1);
        assert_eq!(overdue_days(due, at(2024, 1, 20)), 19);
    }

    #[test]
    fn test_max_fine_matches_column_width() {
        assert_eq!(MAX_FINE, Decimal::new(9_999_999_999, 2));
    }

    #[test]
    fn test_overflowing_rate_saturates_at_cap() {
        let tiers = [FineTier::open_ended(1, Decimal::MAX)];
        let due = at(2024, 1, 1);
        assert_eq!(calculate_fine(&tiers, due, due + Duration::days(3), 0), MAX_FINE);
    }

    #[test]
    fn test_long_overdue_loan_is_capped() {
        let tiers = [
            FineTier::bounded(1, 7, Decimal::from(2)),
            FineTier::open_ended(8, Decimal::from(1_000_000)),
        ];
        let due = at(2000, 1, 1);
        let fine = calculate_fine(&tiers, due, at(2024, 1, 1), 0);
        assert_eq!(fine, MAX_FINE);

        let below = calculate_fine(&tiers, due, due + Duration::days(9), 0);
        assert_eq!(below, Decimal::from(2_000_014));
    }

    proptest! {
        #[test]
        fn prop_fine_is_monotonic(days in 0i64..400, grace in 0u32..30) {
            let policy = FinePolicy::default();
            let due = at(2024, 1, 1);
            let earlier = calculate_fine(policy.tiers(), due, due + Duration::days(days), grace);
            let later = calculate_fine(policy.tiers(), due, due + Duration::days(days + 1), grace);
            prop_assert!(later >= earlier);
            prop_assert!(earlier >= Decimal::ZERO);
        }

        #[test]
        fn prop_within_grace_is_free(grace in 0u32..60, offset in 0i64..60) {
            let policy = FinePolicy::default();
            let due = at(2024, 1, 1);
            let days = offset.min(i64::from(grace));
            let fine = calculate_fine(policy.tiers(), due, due + Duration::days(days), grace);
            prop_assert_eq!(fine, Decimal::ZERO);
        }
    }
}
