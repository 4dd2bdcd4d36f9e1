use data_encoding::BASE64;
use shelfwise_core::AppError;
use shelfwise_models::{ReportResponse, TransactionFilterParams};
use tracing::{error, info, instrument};

use crate::modules::analytics::aggregate::{self, Snapshot};
use crate::modules::analytics::overdue::overdue_entries;
use crate::state::AppState;

use super::workbook::{self, ReportData};

pub struct ReportService;

impl ReportService {
    /// Builds the circulation workbook from one snapshot of the library.
    #[instrument(skip(state))]
    pub async fn generate(state: &AppState) -> Result<ReportResponse, AppError> {
        let snapshot =
            Snapshot::load(state.store.as_ref(), &TransactionFilterParams::default()).await?;
        let now = state.clock.now();

        let data = ReportData {
            top_borrowers: aggregate::top_borrowers(&snapshot, state.report_config.top_borrowers),
            overdue: overdue_entries(&snapshot, &state.fine_policy, now),
            fines: aggregate::fine_summary(&snapshot),
        };

        let bytes = workbook::render(&data, &state.report_config.currency_symbol).map_err(|e| {
            error!(error = %e, "Failed to render report");
            AppError::internal(e)
        })?;

        let filename = format!("library_report_{}.xlsx", now.format("%Y-%m-%d"));
        info!(%filename, bytes = bytes.len(), overdue = data.overdue.len(), "Report generated");

        Ok(ReportResponse {
            success: true,
            filename,
            content: BASE64.encode(&bytes),
        })
    }
}
