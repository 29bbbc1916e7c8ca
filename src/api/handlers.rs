use crate::{
    api::models::*,
    core::{
        models::{
            audit::{AppLog, AuditRecord},
            event::Event,
            group::Group,
            transaction::DepositReceipt,
            user::User,
        },
        services::{DueSummary, EventProgress, LedgerService},
    },
    infrastructure::{logging::in_memory::InMemoryLogging, storage::in_memory::InMemoryStorage},
};
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
};
use std::sync::Arc;

// Define API routes
pub fn api_routes(service: Arc<LedgerService<InMemoryLogging, InMemoryStorage>>) -> Router {
    Router::new()
        .route("/users", axum::routing::post(create_user))
        .route("/groups", axum::routing::post(create_group))
        .route("/groups/{group_id}/users", axum::routing::get(get_group_users))
        .route("/groups/{group_id}/events", axum::routing::get(list_events))
        .route("/events", axum::routing::post(create_event))
        .route("/events/{event_id}/progress", axum::routing::get(get_event_progress))
        .route("/events/{event_id}/audit", axum::routing::get(get_audit_log))
        .route(
            "/events/{event_id}/dues/{user_id}",
            axum::routing::get(get_outstanding_dues),
        )
        .route("/categories/membership", axum::routing::post(set_category_membership))
        .route("/categories/deposit", axum::routing::post(deposit))
        .route("/categories/adjustment", axum::routing::post(record_adjustment))
        .route("/logs", axum::routing::get(get_app_logs))
        .with_state(service)
}

#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created or already registered", body = User),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub(crate) async fn create_user(
    State(service): State<Arc<LedgerService<InMemoryLogging, InMemoryStorage>>>,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let user = service
        .add_user(User {
            id: req.id,
            name: req.name,
            email: req.email,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(user)))
}

#[utoipa::path(
    post,
    path = "/api/groups",
    request_body = CreateGroupRequest,
    responses(
        (status = 201, description = "Group created", body = Group),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 404, description = "Creator or member not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub(crate) async fn create_group(
    State(service): State<Arc<LedgerService<InMemoryLogging, InMemoryStorage>>>,
    Json(req): Json<CreateGroupRequest>,
) -> Result<(StatusCode, Json<Group>), ApiError> {
    let group = service.create_group(req.name, &req.creator_id, req.member_ids).await?;
    Ok((StatusCode::CREATED, Json(group)))
}

#[utoipa::path(
    get,
    path = "/api/groups/{group_id}/users",
    params(("group_id" = String, Path, description = "Group to list users for")),
    responses(
        (status = 200, description = "Users in the group", body = GroupUsersResponse),
        (status = 404, description = "Group not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub(crate) async fn get_group_users(
    State(service): State<Arc<LedgerService<InMemoryLogging, InMemoryStorage>>>,
    Path(group_id): Path<String>,
) -> Result<Json<GroupUsersResponse>, ApiError> {
    let members = service.get_group_users(&group_id).await?;
    let users = members
        .into_iter()
        .map(|m| GroupUserView {
            id: m.user.id,
            name: m.user.name,
            email: m.user.email,
            role: m.role.to_string(),
            joined_at: m.joined_at.to_rfc3339(),
        })
        .collect();
    Ok(Json(GroupUsersResponse { users }))
}

#[utoipa::path(
    get,
    path = "/api/groups/{group_id}/events",
    params(("group_id" = String, Path, description = "Group to list events for")),
    responses(
        (status = 200, description = "Events, newest first", body = [Event]),
        (status = 404, description = "Group not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub(crate) async fn list_events(
    State(service): State<Arc<LedgerService<InMemoryLogging, InMemoryStorage>>>,
    Path(group_id): Path<String>,
) -> Result<Json<Vec<Event>>, ApiError> {
    let events = service.list_events(&group_id).await?;
    Ok(Json(events))
}

#[utoipa::path(
    post,
    path = "/api/events",
    request_body = CreateEventRequest,
    responses(
        (status = 201, description = "Event created with nested participants and categories", body = Event),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 404, description = "Group or user not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub(crate) async fn create_event(
    State(service): State<Arc<LedgerService<InMemoryLogging, InMemoryStorage>>>,
    Json(req): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<Event>), ApiError> {
    let event = service
        .create_event(
            req.name,
            &req.group_id,
            req.participant_user_ids,
            req.budget_goal,
            req.categories,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(event)))
}

#[utoipa::path(
    get,
    path = "/api/events/{event_id}/progress",
    params(("event_id" = String, Path, description = "Event to compute progress for")),
    responses(
        (status = 200, description = "Derived funding progress", body = EventProgress),
        (status = 404, description = "Event not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub(crate) async fn get_event_progress(
    State(service): State<Arc<LedgerService<InMemoryLogging, InMemoryStorage>>>,
    Path(event_id): Path<String>,
) -> Result<Json<EventProgress>, ApiError> {
    let progress = service.event_progress(&event_id).await?;
    Ok(Json(progress))
}

#[utoipa::path(
    get,
    path = "/api/events/{event_id}/audit",
    params(
        ("event_id" = String, Path, description = "Event to fetch the audit trail for"),
        ("limit" = Option<usize>, Query, description = "Maximum number of records to return")
    ),
    responses(
        (status = 200, description = "Transactions newest first, with display names", body = [AuditRecord]),
        (status = 404, description = "Event not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub(crate) async fn get_audit_log(
    State(service): State<Arc<LedgerService<InMemoryLogging, InMemoryStorage>>>,
    Path(event_id): Path<String>,
    Query(query): Query<AuditQuery>,
) -> Result<Json<Vec<AuditRecord>>, ApiError> {
    let records = service.get_audit_log(&event_id, query.limit).await?;
    Ok(Json(records))
}

#[utoipa::path(
    get,
    path = "/api/events/{event_id}/dues/{user_id}",
    params(
        ("event_id" = String, Path, description = "Event to compute dues within"),
        ("user_id" = String, Path, description = "User to compute dues for")
    ),
    responses(
        (status = 200, description = "Outstanding dues derived from roster and audit trail", body = DueSummary),
        (status = 404, description = "Event not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub(crate) async fn get_outstanding_dues(
    State(service): State<Arc<LedgerService<InMemoryLogging, InMemoryStorage>>>,
    Path((event_id, user_id)): Path<(String, String)>,
) -> Result<Json<DueSummary>, ApiError> {
    let summary = service.outstanding_dues(&event_id, &user_id).await?;
    Ok(Json(summary))
}

#[utoipa::path(
    post,
    path = "/api/categories/membership",
    request_body = MembershipRequest,
    responses(
        (status = 200, description = "Membership updated (idempotent)", body = SuccessResponse),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 404, description = "User or category not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub(crate) async fn set_category_membership(
    State(service): State<Arc<LedgerService<InMemoryLogging, InMemoryStorage>>>,
    Json(req): Json<MembershipRequest>,
) -> Result<Json<SuccessResponse>, ApiError> {
    service
        .set_category_membership(&req.user_id, &req.category_id, req.action)
        .await?;
    Ok(Json(SuccessResponse { success: true }))
}

#[utoipa::path(
    post,
    path = "/api/categories/deposit",
    request_body = DepositRequest,
    responses(
        (status = 200, description = "Updated category with its parent event", body = DepositReceipt),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 404, description = "Category not found (stale id)", body = ErrorResponse),
        (status = 500, description = "Deposit failed", body = ErrorResponse)
    )
)]
pub(crate) async fn deposit(
    State(service): State<Arc<LedgerService<InMemoryLogging, InMemoryStorage>>>,
    Json(req): Json<DepositRequest>,
) -> Result<Json<DepositReceipt>, ApiError> {
    let receipt = service.deposit(&req.user_id, &req.category_id, req.amount).await?;
    Ok(Json(receipt))
}

#[utoipa::path(
    post,
    path = "/api/categories/adjustment",
    request_body = AdjustmentRequest,
    responses(
        (status = 200, description = "Updated category with its parent event", body = DepositReceipt),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 404, description = "Category not found (stale id)", body = ErrorResponse),
        (status = 500, description = "Adjustment failed", body = ErrorResponse)
    )
)]
pub(crate) async fn record_adjustment(
    State(service): State<Arc<LedgerService<InMemoryLogging, InMemoryStorage>>>,
    Json(req): Json<AdjustmentRequest>,
) -> Result<Json<DepositReceipt>, ApiError> {
    let receipt = service
        .record_adjustment(&req.user_id, &req.category_id, req.amount)
        .await?;
    Ok(Json(receipt))
}

#[utoipa::path(
    get,
    path = "/api/logs",
    responses(
        (status = 200, description = "Domain action log entries", body = [AppLog]),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub(crate) async fn get_app_logs(
    State(service): State<Arc<LedgerService<InMemoryLogging, InMemoryStorage>>>,
) -> Result<Json<Vec<AppLog>>, ApiError> {
    let logs = service.get_app_logs().await?;
    Ok(Json(logs))
}
