use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shelfwise_core::Clock;
use utoipa::ToSchema;

use crate::calculator::{MAX_FINE, calculate_fine};
use crate::errors::{FineError, PolicyError};
use crate::timestamp::parse_timestamp;

pub const DEFAULT_GRACE_PERIOD_DAYS: u32 = 5;

/// A contiguous run of chargeable days billed at one rate.
///
/// `days_start` and `days_end` are 1-based offsets into the chargeable period
/// (the days left after the grace period), inclusive on both ends. A missing
/// `days_end` means the tier never ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FineTier {
    pub days_start: i64,
    pub days_end: Option<i64>,
    #[schema(value_type = f64)]
    pub rate_per_day: Decimal,
}

impl FineTier {
    pub fn bounded(days_start: i64, days_end: i64, rate_per_day: Decimal) -> Self {
        Self {
            days_start,
            days_end: Some(days_end),
            rate_per_day,
        }
    }

    pub fn open_ended(days_start: i64, rate_per_day: Decimal) -> Self {
        Self {
            days_start,
            days_end: None,
            rate_per_day,
        }
    }

    pub fn contains(&self, day: i64) -> bool {
        day >= self.days_start && self.days_end.is_none_or(|end| day <= end)
    }
}

/// Grace period plus a validated tier table.
///
/// Tiers are guaranteed to start at day 1, be sorted, contiguous and end
/// with an open-ended tier, so every chargeable day maps to exactly one rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FinePolicy {
    grace_period_days: u32,
    tiers: Vec<FineTier>,
}

impl Default for FinePolicy {
    fn default() -> Self {
        Self {
            grace_period_days: DEFAULT_GRACE_PERIOD_DAYS,
            tiers: vec![
                FineTier::bounded(1, 7, Decimal::from(2)),
                FineTier::bounded(8, 14, Decimal::from(5)),
                FineTier::open_ended(15, Decimal::from(10)),
            ],
        }
    }
}

impl FinePolicy {
    pub fn new(grace_period_days: u32, mut tiers: Vec<FineTier>) -> Result<Self, PolicyError> {
        tiers.sort_by_key(|tier| tier.days_start);
        validate_tiers(&tiers)?;

        Ok(Self {
            grace_period_days,
            tiers,
        })
    }

    /// Parses a compact tier table such as `1-7:2,8-14:5,15-:10`.
    pub fn parse_tiers(spec: &str) -> Result<Vec<FineTier>, PolicyError> {
        spec.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| {
                let malformed = || PolicyError::Malformed(part.to_string());

                let (range, rate) = part.split_once(':').ok_or_else(malformed)?;
                let (start, end) = range.split_once('-').ok_or_else(malformed)?;

                let days_start = start.trim().parse::<i64>().map_err(|_| malformed())?;
                let days_end = match end.trim() {
                    "" => None,
                    end => Some(end.parse::<i64>().map_err(|_| malformed())?),
                };
                let rate_per_day = rate.trim().parse::<Decimal>().map_err(|_| malformed())?;

                Ok(FineTier {
                    days_start,
                    days_end,
                    rate_per_day,
                })
            })
            .collect()
    }

    pub fn grace_period_days(&self) -> u32 {
        self.grace_period_days
    }

    pub fn tiers(&self) -> &[FineTier] {
        &self.tiers
    }

    /// Fine owed for a loan due at `due` and handed back at `effective`.
    pub fn fine_between(&self, due: DateTime<Utc>, effective: DateTime<Utc>) -> Decimal {
        calculate_fine(&self.tiers, due, effective, self.grace_period_days)
    }

    /// Fine for a loan that was returned at `returned`, or, when it has not
    /// been returned, the fine accrued as of the clock's current time.
    pub fn assess(
        &self,
        due: DateTime<Utc>,
        returned: Option<DateTime<Utc>>,
        clock: &dyn Clock,
    ) -> Decimal {
        let effective = returned.unwrap_or_else(|| clock.now());
        self.fine_between(due, effective)
    }

    /// Same as [`FinePolicy::assess`] for textual dates. A blank return date
    /// counts as "not returned".
    pub fn assess_str(
        &self,
        due: &str,
        returned: Option<&str>,
        clock: &dyn Clock,
    ) -> Result<Decimal, FineError> {
        let due = parse_timestamp(due)?;
        let returned = match returned.map(str::trim) {
            Some(value) if !value.is_empty() => Some(parse_timestamp(value)?),
            _ => None,
        };

        Ok(self.assess(due, returned, clock))
    }
}

fn validate_tiers(tiers: &[FineTier]) -> Result<(), PolicyError> {
    let first = tiers.first().ok_or(PolicyError::NoTiers)?;
    if first.days_start != 1 {
        return Err(PolicyError::FirstTierStart(first.days_start));
    }

    let last_index = tiers.len() - 1;
    let mut expected_start = 1;

    for (index, tier) in tiers.iter().enumerate() {
        if tier.rate_per_day.is_sign_negative() {
            return Err(PolicyError::NegativeRate(index));
        }
        if tier.rate_per_day > MAX_FINE {
            return Err(PolicyError::ExcessiveRate(index));
        }

        if tier.days_start != expected_start {
            return Err(PolicyError::Gap {
                index,
                start: tier.days_start,
                expected: expected_start,
            });
        }

        match tier.days_end {
            Some(end) if end < tier.days_start => {
                return Err(PolicyError::InvertedTier {
                    index,
                    start: tier.days_start,
                    end,
                });
            }
            Some(_) if index == last_index => return Err(PolicyError::BoundedLastTier),
            Some(end) => expected_start = end + 1,
            None if index != last_index => return Err(PolicyError::UnboundedBeforeLast(index)),
            None => {}
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use shelfwise_core::ManualClock;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_default_policy_matches_library_rules() {
        let policy = FinePolicy::default();
        assert_eq!(policy.grace_period_days(), 5);
        assert_eq!(policy.tiers().len(), 3);
        assert_eq!(policy.tiers()[2].days_end, None);
        assert!(FinePolicy::new(5, policy.tiers().to_vec()).is_ok());
    }

    #[test]
    fn test_new_sorts_tiers() {
        let policy = FinePolicy::new(
            0,
            vec![
                FineTier::open_ended(4, Decimal::from(3)),
                FineTier::bounded(1, 3, Decimal::from(1)),
            ],
        )
        .unwrap();
        assert_eq!(policy.tiers()[0].days_start, 1);
    }

    #[test]
    fn test_rejects_empty_table() {
        assert_eq!(FinePolicy::new(5, vec![]), Err(PolicyError::NoTiers));
    }

    #[test]
    fn test_rejects_table_not_starting_at_one() {
        let result = FinePolicy::new(5, vec![FineTier::open_ended(2, Decimal::ONE)]);
        assert_eq!(result, Err(PolicyError::FirstTierStart(2)));
    }

    #[test]
    fn test_rejects_gaps() {
        let result = FinePolicy::new(
            5,
            vec![
                FineTier::bounded(1, 7, Decimal::ONE),
                FineTier::open_ended(9, Decimal::TEN),
            ],
        );
        assert_eq!(
            result,
            Err(PolicyError::Gap {
                index: 1,
                start: 9,
                expected: 8
            })
        );
    }

    #[test]
    fn test_rejects_bounded_last_tier() {
        let result = FinePolicy::new(5, vec![FineTier::bounded(1, 7, Decimal::ONE)]);
        assert_eq!(result, Err(PolicyError::BoundedLastTier));
    }

    #[test]
    fn test_rejects_inverted_tier() {
        let result = FinePolicy::new(
            5,
            vec![
                FineTier::bounded(1, 0, Decimal::ONE),
                FineTier::open_ended(1, Decimal::ONE),
            ],
        );
        assert!(matches!(result, Err(PolicyError::InvertedTier { .. })));
    }

    #[test]
    fn test_rejects_negative_rate() {
        let result = FinePolicy::new(5, vec![FineTier::open_ended(1, Decimal::NEGATIVE_ONE)]);
        assert_eq!(result, Err(PolicyError::NegativeRate(0)));
    }

    #[test]
    fn test_rejects_rate_above_fine_cap() {
        let result = FinePolicy::new(0, vec![FineTier::open_ended(1, Decimal::MAX)]);
        assert_eq!(result, Err(PolicyError::ExcessiveRate(0)));

        let at_cap = FinePolicy::new(0, vec![FineTier::open_ended(1, MAX_FINE)]).unwrap();
        let fine = at_cap.fine_between(at(2024, 1, 1), at(2024, 1, 4));
        assert_eq!(fine, MAX_FINE);
    }

    #[test]
    fn test_parse_tiers() {
        let tiers = FinePolicy::parse_tiers("1-7:2, 8-14:5,15-:10.5").unwrap();
        assert_eq!(
            tiers,
            vec![
                FineTier::bounded(1, 7, Decimal::from(2)),
                FineTier::bounded(8, 14, Decimal::from(5)),
                FineTier::open_ended(15, Decimal::new(105, 1)),
            ]
        );
    }

    #[test]
    fn test_parse_tiers_rejects_garbage() {
        assert_eq!(
            FinePolicy::parse_tiers("1-7"),
            Err(PolicyError::Malformed("1-7".to_string()))
        );
        assert!(FinePolicy::parse_tiers("a-b:c").is_err());
    }

    #[test]
    fn test_tier_contains() {
        let tier = FineTier::bounded(8, 14, Decimal::from(5));
        assert!(tier.contains(8));
        assert!(tier.contains(14));
        assert!(!tier.contains(15));
        assert!(FineTier::open_ended(15, Decimal::TEN).contains(10_000));
    }

    #[test]
    fn test_assess_uses_clock_when_not_returned() {
        let policy = FinePolicy::default();
        let clock = ManualClock::new(at(2024, 1, 10));
        assert_eq!(policy.assess(at(2024, 1, 1), None, &clock), Decimal::from(8));
    }

    #[test]
    fn test_assess_prefers_return_date() {
        let policy = FinePolicy::default();
        let clock = ManualClock::new(at(2030, 1, 1));
        let fine = policy.assess(at(2024, 1, 1), Some(at(2024, 1, 3)), &clock);
        assert_eq!(fine, Decimal::ZERO);
    }

    #[test]
    fn test_assess_str_blank_return_means_now() {
        let policy = FinePolicy::default();
        let clock = ManualClock::new(at(2024, 1, 20));
        let fine = policy.assess_str("2024-01-01", Some("   "), &clock).unwrap();
        assert_eq!(fine, Decimal::from(49));
    }

    #[test]
    fn test_assess_str_propagates_parse_errors() {
        let policy = FinePolicy::default();
        let clock = ManualClock::new(at(2024, 1, 20));
        assert!(policy.assess_str("yesterday", None, &clock).is_err());
        assert!(policy.assess_str("2024-01-01", Some("soon"), &clock).is_err());
    }

    #[test]
    fn test_policy_serializes_rates_as_numbers() {
        let json = serde_json::to_value(FinePolicy::default()).unwrap();
        assert_eq!(json["grace_period_days"], 5);
        assert_eq!(json["tiers"][0]["rate_per_day"], 2.0);
        assert!(json["tiers"][2]["days_end"].is_null());
    }
}
