use crate::core::errors::LedgerError;
use crate::core::models::event::Event;
use crate::core::models::transaction::TransactionStatus;
use crate::core::services::LedgerService;
use crate::infrastructure::logging::in_memory::InMemoryLogging;
use crate::infrastructure::storage::Storage;
use crate::infrastructure::storage::in_memory::InMemoryStorage;
use crate::tests::{create_test_service, draft, seed_group};
use std::sync::Arc;

async fn seed_event(service: &LedgerService<InMemoryLogging, InMemoryStorage>) -> Event {
    let group = seed_group(service, &[("u1", "Alice"), ("u2", "Bob")]).await;
    service
        .create_event(
            "Trip".to_string(),
            &group.id,
            vec!["u1".to_string(), "u2".to_string()],
            None,
            vec![draft("General Pool", Some(500.0), &[])],
        )
        .await
        .unwrap()
}

#[tokio::test]
async fn test_deposit_updates_category_event_and_ledger() {
    let service = create_test_service();
    let event = seed_event(&service).await;
    let category_id = event.categories[0].id.clone();

    service.deposit("u1", &category_id, 100.0).await.unwrap();
    let receipt = service.deposit("u2", &category_id, 50.0).await.unwrap();

    assert_eq!(receipt.category.total_pooled, 150.0);
    assert_eq!(receipt.event.total_pooled, 150.0);

    let records = service.get_audit_log(&event.id, None).await.unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].transaction.amount, 50.0);
    assert_eq!(records[0].transaction.status, TransactionStatus::Success);
    assert_eq!(records[0].transaction.event_id, event.id);
}

#[tokio::test]
async fn test_deposit_to_stale_category_changes_nothing() {
    let service = create_test_service();
    let event = seed_event(&service).await;

    let result = service.deposit("u1", "stale-id", 50.0).await;
    assert!(matches!(result, Err(LedgerError::CategoryNotFound(_))));

    let current = service.get_event(&event.id).await.unwrap();
    assert_eq!(current.total_pooled, 0.0);
    assert_eq!(current.categories[0].total_pooled, 0.0);
    assert!(service.get_audit_log(&event.id, None).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_deposit_rejects_bad_amounts() {
    let service = create_test_service();
    let event = seed_event(&service).await;
    let category_id = event.categories[0].id.clone();

    for amount in [0.0, -10.0, f64::NAN, f64::INFINITY, 10.005, 2_000_000.0] {
        let result = service.deposit("u1", &category_id, amount).await;
        assert!(
            matches!(result, Err(LedgerError::InvalidInput(_, _))),
            "amount {} should be rejected",
            amount
        );
    }
}

#[tokio::test]
async fn test_adjustment_rejects_positive_amounts() {
    let service = create_test_service();
    let event = seed_event(&service).await;
    let category_id = event.categories[0].id.clone();

    let result = service.record_adjustment("u1", &category_id, 25.0).await;
    assert!(matches!(result, Err(LedgerError::InvalidInput(_, _))));
}

#[tokio::test]
async fn test_adjustment_flows_through_the_same_ledger() {
    let service = create_test_service();
    let event = seed_event(&service).await;
    let category_id = event.categories[0].id.clone();

    service.deposit("u1", &category_id, 200.0).await.unwrap();
    let receipt = service.record_adjustment("vendor", &category_id, -80.0).await.unwrap();

    assert_eq!(receipt.category.total_pooled, 120.0);
    assert_eq!(receipt.event.total_pooled, 120.0);

    let records = service.get_audit_log(&event.id, None).await.unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].transaction.amount, -80.0);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_concurrent_deposits_lose_no_increment() {
    let service = Arc::new(create_test_service());
    let event = seed_event(&service).await;
    let category_id = event.categories[0].id.clone();

    let mut handles = Vec::new();
    for _ in 0..10 {
        let service = service.clone();
        let category_id = category_id.clone();
        handles.push(tokio::spawn(async move {
            service.deposit("u1", &category_id, 10.0).await.unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let current = service.get_event(&event.id).await.unwrap();
    assert_eq!(current.total_pooled, 100.0);
    assert_eq!(current.categories[0].total_pooled, 100.0);
}

#[tokio::test]
async fn test_totals_match_ledger_sum() {
    let storage = InMemoryStorage::new();
    let service = LedgerService::new(storage.clone(), InMemoryLogging::new());
    let group = seed_group(&service, &[("u1", "Alice"), ("u2", "Bob")]).await;
    let event = service
        .create_event(
            "Trip".to_string(),
            &group.id,
            vec!["u1".to_string(), "u2".to_string()],
            None,
            vec![draft("Food", Some(300.0), &[]), draft("Venue", Some(200.0), &[])],
        )
        .await
        .unwrap();

    let food = event.categories[0].id.clone();
    let venue = event.categories[1].id.clone();
    service.deposit("u1", &food, 120.0).await.unwrap();
    service.deposit("u2", &food, 30.0).await.unwrap();
    service.deposit("u2", &venue, 75.0).await.unwrap();
    service.record_adjustment("vendor", &food, -50.0).await.unwrap();

    let current = service.get_event(&event.id).await.unwrap();
    let transactions = storage.list_event_transactions(&event.id).await.unwrap();
    let ledger_sum: f64 = transactions
        .iter()
        .filter(|t| t.status == TransactionStatus::Success)
        .map(|t| t.amount)
        .sum();
    assert_eq!(current.total_pooled, ledger_sum);

    for category in &current.categories {
        let category_sum: f64 = transactions
            .iter()
            .filter(|t| t.status == TransactionStatus::Success && t.category_id == category.id)
            .map(|t| t.amount)
            .sum();
        assert_eq!(category.total_pooled, category_sum);
    }
}
