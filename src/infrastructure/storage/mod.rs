use crate::core::errors::LedgerError;
use crate::core::models::{
    category::ExpenseCategory,
    event::Event,
    group::Group,
    transaction::{ContributionEntry, DepositReceipt, Transaction},
    user::User,
};
use async_trait::async_trait;

/// Persistence port. Aggregate totals are only ever written through
/// `apply_contribution`, which must update the category total, the owning
/// event total, and the transaction log as one atomic unit.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn create_user_if_not_exists(&self, user: User) -> Result<User, LedgerError>;
    async fn get_user(&self, user_id: &str) -> Result<Option<User>, LedgerError>;
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, LedgerError>;

    async fn save_group(&self, group: Group) -> Result<(), LedgerError>;
    async fn get_group(&self, group_id: &str) -> Result<Option<Group>, LedgerError>;

    async fn save_event(&self, event: Event) -> Result<(), LedgerError>;
    async fn get_event(&self, event_id: &str) -> Result<Option<Event>, LedgerError>;
    /// Events for a group, newest created first.
    async fn list_events(&self, group_id: &str) -> Result<Vec<Event>, LedgerError>;

    async fn get_category(&self, category_id: &str) -> Result<Option<ExpenseCategory>, LedgerError>;
    /// Idempotent: a (user, category) pair is recorded at most once.
    async fn upsert_category_member(&self, category_id: &str, user_id: &str) -> Result<(), LedgerError>;
    /// Idempotent: removing an absent membership is a no-op.
    async fn remove_category_member(&self, category_id: &str, user_id: &str) -> Result<(), LedgerError>;

    /// All-or-nothing: increments the category and owning event totals and
    /// appends a SUCCESS transaction. A stale category id fails with
    /// `CategoryNotFound` and leaves every total and the log untouched.
    async fn apply_contribution(&self, entry: ContributionEntry) -> Result<DepositReceipt, LedgerError>;
    async fn list_event_transactions(&self, event_id: &str) -> Result<Vec<Transaction>, LedgerError>;
}

pub mod in_memory;
