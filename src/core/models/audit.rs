use super::transaction::Transaction;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use utoipa::ToSchema;

/// Structured domain action log entry, recorded through the LoggingService
/// port. Distinct from the transaction ledger, which storage owns.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct AppLog {
    pub id: String,
    pub action: String,
    pub user_id: Option<String>,
    #[schema(value_type = Object)]
    pub details: HashMap<String, serde_json::Value>,
    #[schema(value_type = String, example = "2024-06-01T12:34:56Z")]
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// A ledger transaction joined with display fields for presentation.
#[derive(Clone, Debug, Serialize, ToSchema)]
pub struct AuditRecord {
    pub transaction: Transaction,
    pub user_name: String,
    pub category_name: String,
}
