use std::sync::Arc;

use chrono::{DateTime, Utc};
use shelfwise_core::{AppError, Clock};
use shelfwise_db::LibraryStore;
use shelfwise_fines::{FinePolicy, overdue_days};
use shelfwise_models::analytics::MISSING_REFERENCE;
use shelfwise_models::{OverdueEntry, TransactionFilterParams, TransactionStatus};
use tracing::{debug, instrument};

use super::aggregate::Snapshot;
use crate::metrics;

/// Open loans past their due date, with the fine accrued so far.
pub struct OverdueQuery {
    store: Arc<dyn LibraryStore>,
    clock: Arc<dyn Clock>,
    policy: Arc<FinePolicy>,
}

impl OverdueQuery {
    pub fn new(store: Arc<dyn LibraryStore>, clock: Arc<dyn Clock>, policy: Arc<FinePolicy>) -> Self {
        Self {
            store,
            clock,
            policy,
        }
    }

    #[instrument(skip(self))]
    pub async fn run(&self) -> Result<Vec<OverdueEntry>, AppError> {
        let open = TransactionFilterParams {
            status: Some(TransactionStatus::Issued),
            user_id: None,
        };
        let snapshot = Snapshot::load(self.store.as_ref(), &open).await?;

        let entries = overdue_entries(&snapshot, &self.policy, self.clock.now());
        metrics::set_overdue_loans(entries.len());
        debug!(overdue = entries.len(), "Overdue loans computed");

        Ok(entries)
    }
}

/// Overdue loans in `snapshot` as of `now`, longest overdue first. Ties are
/// ordered by transaction id.
pub fn overdue_entries(snapshot: &Snapshot, policy: &FinePolicy, now: DateTime<Utc>) -> Vec<OverdueEntry> {
    let mut entries: Vec<OverdueEntry> = snapshot
        .transactions
        .iter()
        .filter(|t| t.is_overdue_at(now))
        .map(|t| {
            let user = snapshot.user(&t.user_id);
            let book = snapshot.book(&t.book_id);

            OverdueEntry {
                transaction_id: t.transaction_id.clone(),
                user_id: t.user_id.clone(),
                user_name: user.map_or(MISSING_REFERENCE, |u| u.name.as_str()).to_string(),
                user_email: user.map_or(MISSING_REFERENCE, |u| u.email.as_str()).to_string(),
                book_id: t.book_id.clone(),
                book_title: book.map_or(MISSING_REFERENCE, |b| b.title.as_str()).to_string(),
                issue_date: t.issue_date,
                due_date: t.due_date,
                overdue_days: overdue_days(t.due_date, now),
                fine_amount: policy.fine_between(t.due_date, now),
            }
        })
        .collect();

    entries.sort_by(|a, b| {
        b.overdue_days
            .cmp(&a.overdue_days)
            .then_with(|| a.transaction_id.cmp(&b.transaction_id))
    });
    entries
}
