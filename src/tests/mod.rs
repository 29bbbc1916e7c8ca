mod audit_tests;
mod deposit_tests;
mod user_tests;

use crate::core::models::group::Group;
use crate::core::models::user::User;
use crate::core::services::{CategoryDraft, LedgerService};
use crate::infrastructure::logging::in_memory::InMemoryLogging;
use crate::infrastructure::storage::in_memory::InMemoryStorage;

pub fn create_test_service() -> LedgerService<InMemoryLogging, InMemoryStorage> {
    let storage = InMemoryStorage::new();
    let logging = InMemoryLogging::new();
    LedgerService::new(storage, logging)
}

pub async fn seed_group(
    service: &LedgerService<InMemoryLogging, InMemoryStorage>,
    users: &[(&str, &str)],
) -> Group {
    let mut ids = Vec::new();
    for (id, name) in users {
        let user = service
            .add_user(User {
                id: id.to_string(),
                name: name.to_string(),
                email: format!("{}@example.com", id),
            })
            .await
            .unwrap();
        ids.push(user.id);
    }
    let creator = ids[0].clone();
    service.create_group("Test Group".to_string(), &creator, ids).await.unwrap()
}

pub fn draft(name: &str, spending_limit: Option<f64>, member_user_ids: &[&str]) -> CategoryDraft {
    CategoryDraft {
        name: name.to_string(),
        spending_limit,
        rule_type: None,
        member_user_ids: member_user_ids.iter().map(|s| s.to_string()).collect(),
    }
}
