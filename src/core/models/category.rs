use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// How a category's spending limit is divided among its obligated members.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleType {
    EqualSplit,
}

impl Default for RuleType {
    fn default() -> Self {
        RuleType::EqualSplit
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct CategoryMember {
    pub user_id: String,
    #[schema(value_type = String, example = "2024-06-01T12:34:56Z")]
    pub joined_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ExpenseCategory {
    pub id: String,
    pub event_id: String,
    pub name: String,
    pub spending_limit: Option<f64>,
    pub total_pooled: f64,
    pub rule_type: RuleType,
    /// Opt-in roster; empty means every event participant is implicitly obligated.
    pub members: Vec<CategoryMember>,
}

impl ExpenseCategory {
    pub fn has_member(&self, user_id: &str) -> bool {
        self.members.iter().any(|m| m.user_id == user_id)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum MembershipAction {
    Join,
    Leave,
}
