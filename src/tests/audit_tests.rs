use crate::constants::{DEPOSIT_RECORDED, EVENT_CREATED};
use crate::core::errors::LedgerError;
use crate::tests::{create_test_service, draft, seed_group};

#[tokio::test]
async fn test_audit_log_is_newest_first_with_display_names() {
    let service = create_test_service();
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

    service.deposit("u1", &food, 25.0).await.unwrap();
    service.deposit("u2", &venue, 75.0).await.unwrap();

    let records = service.get_audit_log(&event.id, None).await.unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].user_name, "Bob");
    assert_eq!(records[0].category_name, "Venue");
    assert_eq!(records[0].transaction.amount, 75.0);
    assert_eq!(records[1].user_name, "Alice");
    assert_eq!(records[1].category_name, "Food");
}

#[tokio::test]
async fn test_audit_log_honors_limit() {
    let service = create_test_service();
    let group = seed_group(&service, &[("u1", "Alice")]).await;
    let event = service
        .create_event(
            "Trip".to_string(),
            &group.id,
            vec!["u1".to_string()],
            None,
            vec![draft("Food", Some(300.0), &[])],
        )
        .await
        .unwrap();
    let food = event.categories[0].id.clone();

    for _ in 0..5 {
        service.deposit("u1", &food, 10.0).await.unwrap();
    }

    let records = service.get_audit_log(&event.id, Some(2)).await.unwrap();
    assert_eq!(records.len(), 2);
}

#[tokio::test]
async fn test_audit_log_falls_back_for_unknown_contributor() {
    let service = create_test_service();
    let group = seed_group(&service, &[("u1", "Alice")]).await;
    let event = service
        .create_event(
            "Trip".to_string(),
            &group.id,
            vec!["u1".to_string()],
            None,
            vec![draft("Food", Some(300.0), &[])],
        )
        .await
        .unwrap();
    let food = event.categories[0].id.clone();

    service.record_adjustment("external vendor", &food, -20.0).await.unwrap();

    let records = service.get_audit_log(&event.id, None).await.unwrap();
    assert_eq!(records[0].user_name, "Unknown User");
    assert_eq!(records[0].transaction.amount, -20.0);
}

#[tokio::test]
async fn test_audit_log_for_unknown_event() {
    let service = create_test_service();
    let result = service.get_audit_log("missing", None).await;
    assert!(matches!(result, Err(LedgerError::EventNotFound(_))));
}

#[tokio::test]
async fn test_actions_are_recorded_in_app_logs() {
    let service = create_test_service();
    let group = seed_group(&service, &[("u1", "Alice")]).await;
    let event = service
        .create_event(
            "Trip".to_string(),
            &group.id,
            vec!["u1".to_string()],
            None,
            vec![draft("Food", Some(300.0), &[])],
        )
        .await
        .unwrap();
    service
        .deposit("u1", &event.categories[0].id, 10.0)
        .await
        .unwrap();

    let logs = service.get_app_logs().await.unwrap();
    assert!(logs.iter().any(|l| l.action == EVENT_CREATED));
    assert!(logs.iter().any(|l| l.action == DEPOSIT_RECORDED));
}
