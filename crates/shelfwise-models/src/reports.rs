use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A generated spreadsheet, base64 encoded for transport in a JSON body.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReportResponse {
    pub success: bool,
    pub filename: String,
    /// Base64 encoded `.xlsx` workbook
    pub content: String,
}
