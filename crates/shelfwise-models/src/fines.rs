use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shelfwise_core::serde::deserialize_optional_string;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Default, Clone, Deserialize, IntoParams, ToSchema)]
pub struct FineAssessmentParams {
    /// ISO-8601 due date
    pub due_date: String,
    /// ISO-8601 return date; blank or missing means now
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub return_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FineAssessment {
    pub due_date: String,
    pub return_date: Option<String>,
    #[schema(value_type = f64)]
    pub fine_amount: Decimal,
}
