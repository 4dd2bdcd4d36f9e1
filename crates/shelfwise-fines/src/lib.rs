//! # Shelfwise Fines
//!
//! Late-fee assessment for overdue loans.
//!
//! A [`FinePolicy`] is a grace period plus an ordered table of
//! [`FineTier`]s. Once a loan is more than `grace_period_days` whole days past
//! its due date, every further day is charged at the rate of the tier that
//! day falls into.
//!
//! ```text
//! overdue days:   1 ........ 5 | 6 ....... 12 | 13 ...... 19 | 20 ...
//! chargeable:        (grace)   | 1 ........ 7 | 8 ....... 14 | 15 ...
//! rate per day:         0      |      2       |      5       |  10
//! ```
//!
//! # Example
//!
//! ```ignore
//! use shelfwise_fines::FinePolicy;
//!
//! let policy = FinePolicy::default();
//! let fine = policy.assess_str("2024-01-01", Some("2024-01-20"), &clock)?;
//! assert_eq!(fine, Decimal::from(49));
//! ```

pub mod calculator;
pub mod errors;
pub mod policy;
pub mod timestamp;

pub use calculator::{MAX_FINE, calculate_fine, overdue_days};
pub use errors::{FineError, PolicyError};
pub use policy::{FinePolicy, FineTier};
pub use timestamp::parse_timestamp;
