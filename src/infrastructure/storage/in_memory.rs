use crate::core::errors::LedgerError;
use crate::core::models::{
    category::{CategoryMember, ExpenseCategory},
    event::Event,
    group::Group,
    transaction::{ContributionEntry, DepositReceipt, Transaction, TransactionStatus},
    user::User,
};
use crate::infrastructure::storage::Storage;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

// Lock order everywhere: category_index, events, transactions. Writers that
// need several maps take them in that order and hold them together, so a
// reader never sees an event total without the matching category total.
#[derive(Clone)]
pub struct InMemoryStorage {
    users: Arc<RwLock<HashMap<String, User>>>,
    users_by_email: Arc<RwLock<HashMap<String, User>>>,
    groups: Arc<RwLock<HashMap<String, Group>>>,
    events: Arc<RwLock<HashMap<String, Event>>>,
    category_index: Arc<RwLock<HashMap<String, String>>>, // category id -> event id
    transactions: Arc<RwLock<Vec<Transaction>>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        InMemoryStorage {
            users: Arc::new(RwLock::new(HashMap::new())),
            users_by_email: Arc::new(RwLock::new(HashMap::new())),
            groups: Arc::new(RwLock::new(HashMap::new())),
            events: Arc::new(RwLock::new(HashMap::new())),
            category_index: Arc::new(RwLock::new(HashMap::new())),
            transactions: Arc::new(RwLock::new(Vec::new())),
        }
    }
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Storage for InMemoryStorage {
    async fn create_user_if_not_exists(&self, user: User) -> Result<User, LedgerError> {
        let mut users_by_email = self.users_by_email.write().await;
        if let Some(existing) = users_by_email.get(&user.email) {
            return Ok(existing.clone());
        }
        users_by_email.insert(user.email.clone(), user.clone());
        let mut users = self.users.write().await;
        users.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    async fn get_user(&self, user_id: &str) -> Result<Option<User>, LedgerError> {
        let users = self.users.read().await;
        Ok(users.get(user_id).cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, LedgerError> {
        let users_by_email = self.users_by_email.read().await;
        Ok(users_by_email.get(email).cloned())
    }

    async fn save_group(&self, group: Group) -> Result<(), LedgerError> {
        let mut groups = self.groups.write().await;
        groups.insert(group.id.clone(), group);
        Ok(())
    }

    async fn get_group(&self, group_id: &str) -> Result<Option<Group>, LedgerError> {
        let groups = self.groups.read().await;
        Ok(groups.get(group_id).cloned())
    }

    async fn save_event(&self, event: Event) -> Result<(), LedgerError> {
        let mut category_index = self.category_index.write().await;
        let mut events = self.events.write().await;
        for category in &event.categories {
            category_index.insert(category.id.clone(), event.id.clone());
        }
        events.insert(event.id.clone(), event);
        Ok(())
    }

    async fn get_event(&self, event_id: &str) -> Result<Option<Event>, LedgerError> {
        let events = self.events.read().await;
        Ok(events.get(event_id).cloned())
    }

    async fn list_events(&self, group_id: &str) -> Result<Vec<Event>, LedgerError> {
        let events = self.events.read().await;
        let mut found: Vec<Event> = events.values().filter(|e| e.group_id == group_id).cloned().collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(found)
    }

    async fn get_category(&self, category_id: &str) -> Result<Option<ExpenseCategory>, LedgerError> {
        let category_index = self.category_index.read().await;
        let events = self.events.read().await;
        Ok(category_index
            .get(category_id)
            .and_then(|event_id| events.get(event_id))
            .and_then(|event| event.category(category_id))
            .cloned())
    }

    async fn upsert_category_member(&self, category_id: &str, user_id: &str) -> Result<(), LedgerError> {
        let category_index = self.category_index.read().await;
        let mut events = self.events.write().await;
        let category = category_index
            .get(category_id)
            .and_then(|event_id| events.get_mut(event_id))
            .and_then(|event| event.categories.iter_mut().find(|c| c.id == category_id))
            .ok_or_else(|| LedgerError::CategoryNotFound(category_id.to_string()))?;
        if !category.has_member(user_id) {
            category.members.push(CategoryMember {
                user_id: user_id.to_string(),
                joined_at: chrono::Utc::now(),
            });
        }
        Ok(())
    }

    async fn remove_category_member(&self, category_id: &str, user_id: &str) -> Result<(), LedgerError> {
        let category_index = self.category_index.read().await;
        let mut events = self.events.write().await;
        if let Some(category) = category_index
            .get(category_id)
            .and_then(|event_id| events.get_mut(event_id))
            .and_then(|event| event.categories.iter_mut().find(|c| c.id == category_id))
        {
            category.members.retain(|m| m.user_id != user_id);
        }
        Ok(())
    }

    async fn apply_contribution(&self, entry: ContributionEntry) -> Result<DepositReceipt, LedgerError> {
        let category_index = self.category_index.read().await;
        let mut events = self.events.write().await;
        let mut transactions = self.transactions.write().await;

        let event = category_index
            .get(&entry.category_id)
            .and_then(|event_id| events.get_mut(event_id))
            .ok_or_else(|| LedgerError::CategoryNotFound(entry.category_id.clone()))?;
        let category = event
            .categories
            .iter_mut()
            .find(|c| c.id == entry.category_id)
            .ok_or_else(|| LedgerError::CategoryNotFound(entry.category_id.clone()))?;

        category.total_pooled += entry.amount;
        let category = category.clone();
        event.total_pooled += entry.amount;

        transactions.push(Transaction {
            id: entry.id,
            amount: entry.amount,
            user_id: entry.user_id,
            event_id: event.id.clone(),
            category_id: entry.category_id,
            status: TransactionStatus::Success,
            created_at: entry.created_at,
        });

        Ok(DepositReceipt {
            category,
            event: event.clone(),
        })
    }

    async fn list_event_transactions(&self, event_id: &str) -> Result<Vec<Transaction>, LedgerError> {
        let transactions = self.transactions.read().await;
        Ok(transactions.iter().filter(|t| t.event_id == event_id).cloned().collect())
    }
}
