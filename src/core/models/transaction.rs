use super::category::ExpenseCategory;
use super::event::Event;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionStatus {
    Success,
    Failed,
}

/// Append-only record of a signed monetary movement. Positive amounts are
/// contributions, negative amounts are refunds or vendor payouts.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct Transaction {
    pub id: String,
    pub amount: f64,
    pub user_id: String,
    pub event_id: String,
    pub category_id: String,
    pub status: TransactionStatus,
    #[schema(value_type = String, example = "2024-06-01T12:34:56Z")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Input to the atomic write path. The owning event is resolved by storage
/// from the category, never supplied by the caller.
#[derive(Clone, Debug)]
pub struct ContributionEntry {
    pub id: String,
    pub user_id: String,
    pub category_id: String,
    pub amount: f64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Result of a successful contribution: the updated category with its parent
/// event attached.
#[derive(Clone, Debug, Serialize, ToSchema)]
pub struct DepositReceipt {
    pub category: ExpenseCategory,
    pub event: Event,
}
