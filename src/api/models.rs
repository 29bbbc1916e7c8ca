use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::core::errors::LedgerError;
use crate::core::models::category::MembershipAction;
use crate::core::services::CategoryDraft;

// Request structs for JSON payloads
#[derive(Deserialize, ToSchema)]
pub struct CreateUserRequest {
    pub id: String,
    pub name: String,
    pub email: String,
}

#[derive(Deserialize, ToSchema)]
pub struct CreateGroupRequest {
    pub name: String,
    pub creator_id: String,
    pub member_ids: Vec<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct CreateEventRequest {
    pub name: String,
    pub group_id: String,
    pub participant_user_ids: Vec<String>,
    pub budget_goal: Option<f64>,
    pub categories: Vec<CategoryDraft>,
}

#[derive(Deserialize, ToSchema)]
pub struct MembershipRequest {
    pub user_id: String,
    pub category_id: String,
    pub action: MembershipAction,
}

#[derive(Deserialize, ToSchema)]
pub struct DepositRequest {
    pub user_id: String,
    pub category_id: String,
    pub amount: f64,
}

#[derive(Deserialize, ToSchema)]
pub struct AdjustmentRequest {
    pub user_id: String,
    pub category_id: String,
    pub amount: f64,
}

#[derive(Deserialize, ToSchema)]
pub struct AuditQuery {
    pub limit: Option<usize>,
}

#[derive(Serialize, ToSchema)]
pub struct SuccessResponse {
    pub success: bool,
}

#[derive(Serialize, ToSchema)]
pub struct GroupUserView {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub joined_at: String,
}

#[derive(Serialize, ToSchema)]
pub struct GroupUsersResponse {
    pub users: Vec<GroupUserView>,
}

#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

// Newtype wrapper for LedgerError to implement IntoResponse
pub struct ApiError(pub LedgerError);

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        if let LedgerError::DepositFailed(ref detail) = self.0 {
            tracing::error!(error = %detail, "deposit failed");
        }
        let (status, error_message) = match self.0 {
            LedgerError::MissingEmail => (StatusCode::BAD_REQUEST, "Email is required".to_string()),
            LedgerError::InvalidEmail(email) => (StatusCode::BAD_REQUEST, format!("Invalid email: {}", email)),
            LedgerError::UserNotFound(id) => (StatusCode::NOT_FOUND, format!("User {} not found", id)),
            LedgerError::GroupNotFound(id) => (StatusCode::NOT_FOUND, format!("Group {} not found", id)),
            LedgerError::EventNotFound(id) => (StatusCode::NOT_FOUND, format!("Event {} not found", id)),
            LedgerError::CategoryNotFound(id) => (
                StatusCode::NOT_FOUND,
                format!(
                    "Category {} not found. The dataset may have been reset. Please refresh and retry.",
                    id
                ),
            ),
            LedgerError::InvalidInput(field, msg) => (
                StatusCode::BAD_REQUEST,
                format!("Invalid input for {}: {:?}", field, msg),
            ),
            LedgerError::DepositFailed(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to process deposit".to_string(),
            ),
            LedgerError::InternalServerError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Internal server error: {}", msg),
            ),
            LedgerError::StorageError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, format!("Storage error: {}", msg)),
            LedgerError::LoggingError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, format!("Logging error: {}", msg)),
        };
        (status, Json(ErrorResponse { error: error_message })).into_response()
    }
}
