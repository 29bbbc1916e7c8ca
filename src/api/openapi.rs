use utoipa::OpenApi;

use crate::{
    api::models::{
        AdjustmentRequest, CreateEventRequest, CreateGroupRequest, CreateUserRequest, DepositRequest, ErrorResponse,
        GroupUserView, GroupUsersResponse, MembershipRequest, SuccessResponse,
    },
    core::{
        models::{
            audit::{AppLog, AuditRecord},
            category::{CategoryMember, ExpenseCategory, MembershipAction, RuleType},
            event::{Event, Participant, ParticipantRole},
            group::{Group, GroupMember, GroupRole},
            transaction::{DepositReceipt, Transaction, TransactionStatus},
            user::User,
        },
        services::{CategoryDraft, CategoryDue, CategoryProgress, DueSummary, EventProgress},
    },
};

#[derive(OpenApi)]
#[openapi(
    paths(
        super::handlers::create_user,
        super::handlers::create_group,
        super::handlers::get_group_users,
        super::handlers::list_events,
        super::handlers::create_event,
        super::handlers::get_event_progress,
        super::handlers::get_audit_log,
        super::handlers::get_outstanding_dues,
        super::handlers::set_category_membership,
        super::handlers::deposit,
        super::handlers::record_adjustment,
        super::handlers::get_app_logs
    ),
    components(schemas(
        CreateUserRequest,
        CreateGroupRequest,
        CreateEventRequest,
        MembershipRequest,
        DepositRequest,
        AdjustmentRequest,
        SuccessResponse,
        GroupUserView,
        GroupUsersResponse,
        ErrorResponse,
        User,
        Group,
        GroupMember,
        GroupRole,
        Event,
        Participant,
        ParticipantRole,
        ExpenseCategory,
        CategoryMember,
        MembershipAction,
        RuleType,
        Transaction,
        TransactionStatus,
        DepositReceipt,
        AppLog,
        AuditRecord,
        CategoryDraft,
        CategoryProgress,
        CategoryDue,
        DueSummary,
        EventProgress
    )),
    info(
        title = "Poolio Ledger API",
        description = "Shared expense pooling ledger: events, category pools, opt-in membership, deposits, dues and audit trail"
    )
)]
pub struct ApiDoc;
