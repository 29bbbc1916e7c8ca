use crate::constants::{
    ADJUSTMENT_RECORDED, AUDIT_QUERIED, CATEGORY_JOINED, CATEGORY_LEFT, CENTS_TOLERANCE, DEPOSIT_RECORDED,
    DUES_QUERIED, EVENT_CREATED, GROUP_CREATED, MAX_AMOUNT, MAX_NAME_LENGTH, USER_ADDED,
};
use crate::core::errors::{FieldError, LedgerError};
use crate::core::models::{
    audit::{AppLog, AuditRecord},
    category::{CategoryMember, ExpenseCategory, MembershipAction, RuleType},
    event::{Event, Participant, ParticipantRole},
    group::{Group, GroupMember, GroupRole},
    transaction::{ContributionEntry, DepositReceipt, TransactionStatus},
    user::User,
};
use crate::infrastructure::logging::LoggingService;
use crate::infrastructure::storage::Storage;
use chrono::Utc;
use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashSet;
use tracing::{debug, info, warn};
use utoipa::ToSchema;
use uuid::Uuid;

/// Category description supplied at event creation time.
#[derive(Clone, Debug, Deserialize, ToSchema)]
pub struct CategoryDraft {
    pub name: String,
    pub spending_limit: Option<f64>,
    pub rule_type: Option<RuleType>,
    #[serde(default)]
    pub member_user_ids: Vec<String>,
}

#[derive(Clone, Debug, Serialize, ToSchema)]
pub struct CategoryProgress {
    pub category_id: String,
    pub name: String,
    pub spending_limit: Option<f64>,
    pub total_pooled: f64,
    pub percentage: u32,
}

#[derive(Clone, Debug, Serialize, ToSchema)]
pub struct EventProgress {
    pub event_id: String,
    pub name: String,
    pub budget_goal: f64,
    pub total_pooled: f64,
    pub percentage: u32,
    pub categories: Vec<CategoryProgress>,
}

#[derive(Clone, Debug, Serialize, ToSchema)]
pub struct CategoryDue {
    pub category_id: String,
    pub name: String,
    pub share: f64,
    pub settled: bool,
}

#[derive(Clone, Debug, Serialize, ToSchema)]
pub struct DueSummary {
    pub event_id: String,
    pub user_id: String,
    pub items: Vec<CategoryDue>,
    pub total_due: f64,
}

fn funded_percentage(pooled: f64, goal: f64) -> u32 {
    if goal > 0.0 {
        ((pooled / goal) * 100.0).floor().min(100.0).max(0.0) as u32
    } else {
        0
    }
}

pub struct LedgerService<L: LoggingService, S: Storage> {
    storage: S,
    logging: L,
}

impl<L: LoggingService, S: Storage> LedgerService<L, S> {
    pub fn new(storage: S, logging: L) -> Self {
        LedgerService { storage, logging }
    }

    // VALIDATION HELPERS

    async fn validate_users(&self, user_ids: &[String]) -> Result<(), LedgerError> {
        for user_id in user_ids {
            if self.storage.get_user(user_id).await?.is_none() {
                return Err(LedgerError::UserNotFound(user_id.clone()));
            }
        }
        Ok(())
    }

    fn validate_string_input(&self, field: &str, value: &str, max_length: usize) -> Result<(), LedgerError> {
        if value.trim().is_empty() {
            return Err(LedgerError::InvalidInput(
                field.to_string(),
                FieldError {
                    field: field.to_string(),
                    title: format!("Invalid {}", field),
                    description: format!("{} cannot be empty", field),
                },
            ));
        }
        if value.len() > max_length {
            return Err(LedgerError::InvalidInput(
                field.to_string(),
                FieldError {
                    field: field.to_string(),
                    title: format!("{} Too Long", field),
                    description: format!("{} cannot exceed {} characters", field, max_length),
                },
            ));
        }
        if value.chars().any(|c| c.is_control() || "<>{}[]".contains(c)) {
            return Err(LedgerError::InvalidInput(
                field.to_string(),
                FieldError {
                    field: field.to_string(),
                    title: format!("Invalid {}", field),
                    description: format!("{} contains invalid characters", field),
                },
            ));
        }
        Ok(())
    }

    fn validate_required_id(&self, field: &str, value: &str) -> Result<(), LedgerError> {
        if value.trim().is_empty() {
            return Err(LedgerError::InvalidInput(
                field.to_string(),
                FieldError {
                    field: field.to_string(),
                    title: format!("Missing {}", field),
                    description: format!("{} is required", field),
                },
            ));
        }
        Ok(())
    }

    fn invalid_amount(&self, field: &str, description: &str) -> LedgerError {
        LedgerError::InvalidInput(
            field.to_string(),
            FieldError {
                field: field.to_string(),
                title: "Invalid Amount".to_string(),
                description: description.to_string(),
            },
        )
    }

    fn validate_whole_cents(&self, field: &str, amount: f64) -> Result<(), LedgerError> {
        let cents = amount * 100.0;
        if (cents - cents.round()).abs() > CENTS_TOLERANCE {
            return Err(self.invalid_amount(field, "Amount cannot have more than 2 decimal places"));
        }
        Ok(())
    }

    fn validate_contribution_amount(&self, field: &str, amount: f64) -> Result<(), LedgerError> {
        if !amount.is_finite() {
            return Err(self.invalid_amount(field, "Amount must be a finite number"));
        }
        if amount <= 0.0 {
            return Err(self.invalid_amount(field, "Amount must be greater than 0"));
        }
        if amount > MAX_AMOUNT {
            return Err(self.invalid_amount(field, "Amount cannot exceed 1,000,000"));
        }
        self.validate_whole_cents(field, amount)
    }

    fn validate_outflow_amount(&self, field: &str, amount: f64) -> Result<(), LedgerError> {
        if !amount.is_finite() {
            return Err(self.invalid_amount(field, "Amount must be a finite number"));
        }
        if amount >= 0.0 {
            return Err(self.invalid_amount(field, "Adjustment amount must be negative"));
        }
        if amount < -MAX_AMOUNT {
            return Err(self.invalid_amount(field, "Amount cannot exceed 1,000,000"));
        }
        self.validate_whole_cents(field, amount)
    }

    fn validate_spending_limit(&self, field: &str, limit: f64) -> Result<(), LedgerError> {
        if !limit.is_finite() {
            return Err(self.invalid_amount(field, "Spending limit must be a finite number"));
        }
        if limit < 0.0 {
            return Err(self.invalid_amount(field, "Spending limit cannot be negative"));
        }
        Ok(())
    }

    // USER & GROUP ADMINISTRATION

    pub async fn add_user(&self, user: User) -> Result<User, LedgerError> {
        if user.email.is_empty() {
            return Err(LedgerError::MissingEmail);
        }
        if !user.email.contains('@') || !user.email.contains('.') || user.email.len() < 5 {
            return Err(LedgerError::InvalidEmail(user.email.clone()));
        }
        self.validate_required_id("id", &user.id)?;
        self.validate_string_input("name", &user.name, MAX_NAME_LENGTH)?;

        let stored = self.storage.create_user_if_not_exists(user.clone()).await?;
        if stored.id == user.id {
            self.logging
                .log_action(
                    USER_ADDED,
                    json!({ "user_id": stored.id, "name": stored.name, "email": stored.email }),
                    Some(&stored.id),
                )
                .await?;
        } else {
            debug!(email = %user.email, "email already registered, returning existing user");
        }
        Ok(stored)
    }

    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>, LedgerError> {
        self.storage.get_user(user_id).await
    }

    pub async fn create_group(
        &self,
        name: String,
        creator_id: &str,
        member_ids: Vec<String>,
    ) -> Result<Group, LedgerError> {
        self.validate_string_input("name", &name, MAX_NAME_LENGTH)?;
        let creator = self
            .storage
            .get_user(creator_id)
            .await?
            .ok_or_else(|| LedgerError::UserNotFound(creator_id.to_string()))?;

        let now = Utc::now();
        let mut members = vec![GroupMember {
            user: creator.clone(),
            role: GroupRole::Owner,
            joined_at: now,
        }];
        let mut seen: HashSet<String> = HashSet::from([creator.id.clone()]);
        for member_id in &member_ids {
            if !seen.insert(member_id.clone()) {
                continue;
            }
            let user = self
                .storage
                .get_user(member_id)
                .await?
                .ok_or_else(|| LedgerError::UserNotFound(member_id.clone()))?;
            members.push(GroupMember {
                user,
                role: GroupRole::Member,
                joined_at: now,
            });
        }

        let group = Group {
            id: Uuid::new_v4().to_string(),
            name,
            creator_id: creator.id.clone(),
            members,
        };
        self.storage.save_group(group.clone()).await?;
        info!(group_id = %group.id, "group created");

        self.logging
            .log_action(
                GROUP_CREATED,
                json!({ "group_id": group.id, "name": group.name, "members": group.members.len() }),
                Some(creator_id),
            )
            .await?;

        Ok(group)
    }

    pub async fn get_group_users(&self, group_id: &str) -> Result<Vec<GroupMember>, LedgerError> {
        let group = self
            .storage
            .get_group(group_id)
            .await?
            .ok_or_else(|| LedgerError::GroupNotFound(group_id.to_string()))?;
        Ok(group.members)
    }

    // EVENT & CATEGORY CREATION

    pub async fn create_event(
        &self,
        name: String,
        group_id: &str,
        participant_user_ids: Vec<String>,
        budget_goal: Option<f64>,
        categories: Vec<CategoryDraft>,
    ) -> Result<Event, LedgerError> {
        self.validate_string_input("name", &name, MAX_NAME_LENGTH)?;
        if self.storage.get_group(group_id).await?.is_none() {
            return Err(LedgerError::GroupNotFound(group_id.to_string()));
        }
        for draft in &categories {
            self.validate_string_input("category name", &draft.name, MAX_NAME_LENGTH)?;
            if let Some(limit) = draft.spending_limit {
                self.validate_spending_limit("spending_limit", limit)?;
            }
            self.validate_users(&draft.member_user_ids).await?;
        }
        if let Some(goal) = budget_goal {
            self.validate_spending_limit("budget_goal", goal)?;
        }

        let mut participants = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        for user_id in &participant_user_ids {
            if !seen.insert(user_id.clone()) {
                continue;
            }
            let user = self
                .storage
                .get_user(user_id)
                .await?
                .ok_or_else(|| LedgerError::UserNotFound(user_id.clone()))?;
            participants.push(Participant {
                user,
                role: ParticipantRole::Participant,
            });
        }

        let now = Utc::now();
        let event_id = Uuid::new_v4().to_string();
        let built: Vec<ExpenseCategory> = categories
            .into_iter()
            .map(|draft| {
                let mut roster_seen: HashSet<String> = HashSet::new();
                ExpenseCategory {
                    id: Uuid::new_v4().to_string(),
                    event_id: event_id.clone(),
                    name: draft.name,
                    spending_limit: draft.spending_limit,
                    total_pooled: 0.0,
                    rule_type: draft.rule_type.unwrap_or_default(),
                    members: draft
                        .member_user_ids
                        .into_iter()
                        .filter(|user_id| roster_seen.insert(user_id.clone()))
                        .map(|user_id| CategoryMember {
                            user_id,
                            joined_at: now,
                        })
                        .collect(),
                }
            })
            .collect();

        let derived_goal: f64 = built.iter().filter_map(|c| c.spending_limit).sum();
        let event = Event {
            id: event_id,
            name,
            group_id: group_id.to_string(),
            budget_goal: budget_goal.filter(|g| *g > 0.0).unwrap_or(derived_goal),
            total_pooled: 0.0,
            participants,
            categories: built,
            created_at: now,
        };

        self.storage.save_event(event.clone()).await?;
        info!(event_id = %event.id, group_id = %group_id, "event created");

        self.logging
            .log_action(
                EVENT_CREATED,
                json!({
                    "event_id": event.id,
                    "group_id": group_id,
                    "name": event.name,
                    "budget_goal": event.budget_goal,
                    "categories": event.categories.len(),
                }),
                None,
            )
            .await?;

        Ok(event)
    }

    // A zero goal next to non-zero category limits means the goal was never
    // recorded; report the derived sum without touching stored state.
    fn repair_budget_goal(&self, event: &mut Event) {
        if event.budget_goal <= 0.0 {
            let derived: f64 = event.categories.iter().filter_map(|c| c.spending_limit).sum();
            if derived > 0.0 {
                warn!(event_id = %event.id, derived, "budget goal missing, derived from category limits");
                event.budget_goal = derived;
            }
        }
    }

    pub async fn get_event(&self, event_id: &str) -> Result<Event, LedgerError> {
        let mut event = self
            .storage
            .get_event(event_id)
            .await?
            .ok_or_else(|| LedgerError::EventNotFound(event_id.to_string()))?;
        self.repair_budget_goal(&mut event);
        Ok(event)
    }

    pub async fn list_events(&self, group_id: &str) -> Result<Vec<Event>, LedgerError> {
        if self.storage.get_group(group_id).await?.is_none() {
            return Err(LedgerError::GroupNotFound(group_id.to_string()));
        }
        let mut events = self.storage.list_events(group_id).await?;
        for event in &mut events {
            self.repair_budget_goal(event);
        }
        Ok(events)
    }

    pub async fn event_progress(&self, event_id: &str) -> Result<EventProgress, LedgerError> {
        let event = self.get_event(event_id).await?;
        let categories = event
            .categories
            .iter()
            .map(|c| CategoryProgress {
                category_id: c.id.clone(),
                name: c.name.clone(),
                spending_limit: c.spending_limit,
                total_pooled: c.total_pooled,
                percentage: funded_percentage(c.total_pooled, c.spending_limit.unwrap_or(0.0)),
            })
            .collect();
        Ok(EventProgress {
            event_id: event.id,
            name: event.name,
            percentage: funded_percentage(event.total_pooled, event.budget_goal),
            budget_goal: event.budget_goal,
            total_pooled: event.total_pooled,
            categories,
        })
    }

    // CATEGORY OPT-IN / OPT-OUT

    pub async fn set_category_membership(
        &self,
        user_id: &str,
        category_id: &str,
        action: MembershipAction,
    ) -> Result<(), LedgerError> {
        self.validate_required_id("user_id", user_id)?;
        self.validate_required_id("category_id", category_id)?;

        match action {
            MembershipAction::Join => {
                if self.storage.get_user(user_id).await?.is_none() {
                    return Err(LedgerError::UserNotFound(user_id.to_string()));
                }
                self.storage.upsert_category_member(category_id, user_id).await?;
                self.logging
                    .log_action(
                        CATEGORY_JOINED,
                        json!({ "category_id": category_id }),
                        Some(user_id),
                    )
                    .await?;
            }
            MembershipAction::Leave => {
                self.storage.remove_category_member(category_id, user_id).await?;
                self.logging
                    .log_action(CATEGORY_LEFT, json!({ "category_id": category_id }), Some(user_id))
                    .await?;
            }
        }
        Ok(())
    }

    // CONTRIBUTION (TRANSACTIONAL WRITE PATH)

    pub async fn deposit(&self, user_id: &str, category_id: &str, amount: f64) -> Result<DepositReceipt, LedgerError> {
        self.validate_required_id("user_id", user_id)?;
        self.validate_required_id("category_id", category_id)?;
        self.validate_contribution_amount("amount", amount)?;

        let receipt = self.record_movement(user_id, category_id, amount).await?;
        self.logging
            .log_action(
                DEPOSIT_RECORDED,
                json!({
                    "category_id": category_id,
                    "event_id": receipt.event.id,
                    "amount": amount,
                }),
                Some(user_id),
            )
            .await?;
        Ok(receipt)
    }

    /// Refund or vendor payout. Structurally distinct from `deposit` (its own
    /// validation and audit action) but flows through the identical atomic
    /// write path, so aggregation sees a single sign convention.
    pub async fn record_adjustment(
        &self,
        user_id: &str,
        category_id: &str,
        amount: f64,
    ) -> Result<DepositReceipt, LedgerError> {
        self.validate_required_id("user_id", user_id)?;
        self.validate_required_id("category_id", category_id)?;
        self.validate_outflow_amount("amount", amount)?;

        let receipt = self.record_movement(user_id, category_id, amount).await?;
        self.logging
            .log_action(
                ADJUSTMENT_RECORDED,
                json!({
                    "category_id": category_id,
                    "event_id": receipt.event.id,
                    "amount": amount,
                }),
                Some(user_id),
            )
            .await?;
        Ok(receipt)
    }

    async fn record_movement(
        &self,
        user_id: &str,
        category_id: &str,
        amount: f64,
    ) -> Result<DepositReceipt, LedgerError> {
        let entry = ContributionEntry {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            category_id: category_id.to_string(),
            amount,
            created_at: Utc::now(),
        };
        let receipt = self.storage.apply_contribution(entry).await.map_err(|e| match e {
            LedgerError::CategoryNotFound(id) => LedgerError::CategoryNotFound(id),
            other => LedgerError::DepositFailed(other.to_string()),
        })?;
        debug!(
            category_id = %receipt.category.id,
            event_id = %receipt.event.id,
            amount,
            "movement recorded"
        );
        Ok(receipt)
    }

    // PER-USER DUES (pure read, derived from roster + audit trail)

    pub async fn outstanding_dues(&self, event_id: &str, user_id: &str) -> Result<DueSummary, LedgerError> {
        let event = self.get_event(event_id).await?;
        let transactions = self.storage.list_event_transactions(event_id).await?;

        let mut items = Vec::new();
        let mut total_due = 0.0;
        for category in &event.categories {
            let (effective_count, is_member) = if !category.members.is_empty() {
                (category.members.len(), category.has_member(user_id))
            } else {
                (event.participants.len(), event.is_participant(user_id))
            };
            if !is_member || effective_count == 0 {
                continue;
            }

            let settled = transactions.iter().any(|t| {
                t.status == TransactionStatus::Success
                    && t.category_id == category.id
                    && t.user_id == user_id
                    && t.amount > 0.0
            });
            let share = match category.rule_type {
                RuleType::EqualSplit => category.spending_limit.unwrap_or(0.0) / effective_count as f64,
            };
            if !settled {
                total_due += share;
            }
            items.push(CategoryDue {
                category_id: category.id.clone(),
                name: category.name.clone(),
                share,
                settled,
            });
        }

        self.logging
            .log_action(DUES_QUERIED, json!({ "event_id": event_id }), Some(user_id))
            .await?;

        Ok(DueSummary {
            event_id: event_id.to_string(),
            user_id: user_id.to_string(),
            items,
            total_due,
        })
    }

    // AUDIT TRAIL

    pub async fn get_audit_log(&self, event_id: &str, limit: Option<usize>) -> Result<Vec<AuditRecord>, LedgerError> {
        let event = self.get_event(event_id).await?;
        let mut transactions = self.storage.list_event_transactions(event_id).await?;
        transactions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        if let Some(limit) = limit {
            transactions.truncate(limit);
        }

        let users = try_join_all(transactions.iter().map(|t| self.storage.get_user(&t.user_id))).await?;

        let records = transactions
            .into_iter()
            .zip(users)
            .map(|(transaction, user)| {
                let category_name = event
                    .category(&transaction.category_id)
                    .map(|c| c.name.clone())
                    .unwrap_or_else(|| "Unknown Category".to_string());
                AuditRecord {
                    user_name: user.map(|u| u.name).unwrap_or_else(|| "Unknown User".to_string()),
                    category_name,
                    transaction,
                }
            })
            .collect::<Vec<_>>();

        self.logging
            .log_action(
                AUDIT_QUERIED,
                json!({ "event_id": event_id, "returned": records.len() }),
                None,
            )
            .await?;

        Ok(records)
    }

    pub async fn get_app_logs(&self) -> Result<Vec<AppLog>, LedgerError> {
        self.logging.get_logs().await
    }
}
