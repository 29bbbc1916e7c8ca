use super::category::ExpenseCategory;
use super::user::User;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum ParticipantRole {
    Participant,
}

impl std::fmt::Display for ParticipantRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParticipantRole::Participant => write!(f, "PARTICIPANT"),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct Participant {
    pub user: User,
    pub role: ParticipantRole,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct Event {
    pub id: String,
    pub name: String,
    pub group_id: String,
    /// Zero means "no goal recorded"; readers repair it from category limits.
    pub budget_goal: f64,
    pub total_pooled: f64,
    pub participants: Vec<Participant>,
    pub categories: Vec<ExpenseCategory>,
    #[schema(value_type = String, example = "2024-06-01T12:34:56Z")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Event {
    pub fn category(&self, category_id: &str) -> Option<&ExpenseCategory> {
        self.categories.iter().find(|c| c.id == category_id)
    }

    pub fn is_participant(&self, user_id: &str) -> bool {
        self.participants.iter().any(|p| p.user.id == user_id)
    }
}
