use crate::core::errors::LedgerError;
use crate::core::models::user::User;
use crate::tests::create_test_service;

#[tokio::test]
async fn test_add_user() {
    let service = create_test_service();
    let user = User {
        id: "u1".to_string(),
        name: "Test User".to_string(),
        email: "test@example.com".to_string(),
    };
    let added = service.add_user(user.clone()).await.unwrap();
    assert_eq!(added.id, user.id);
    assert_eq!(added.email, user.email);
}

#[tokio::test]
async fn test_add_user_duplicate_email_returns_existing() {
    let service = create_test_service();
    let user = User {
        id: "u1".to_string(),
        name: "Test User".to_string(),
        email: "test@example.com".to_string(),
    };
    service.add_user(user).await.unwrap();

    let duplicate = service
        .add_user(User {
            id: "u2".to_string(),
            name: "Someone Else".to_string(),
            email: "test@example.com".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(duplicate.id, "u1");
    assert_eq!(duplicate.name, "Test User");
}

#[tokio::test]
async fn test_add_user_invalid_email() {
    let service = create_test_service();
    let result = service
        .add_user(User {
            id: "u1".to_string(),
            name: "Test User".to_string(),
            email: "invalid".to_string(),
        })
        .await;
    assert!(matches!(result, Err(LedgerError::InvalidEmail(_))));
}

#[tokio::test]
async fn test_add_user_missing_email() {
    let service = create_test_service();
    let result = service
        .add_user(User {
            id: "u1".to_string(),
            name: "Test User".to_string(),
            email: String::new(),
        })
        .await;
    assert!(matches!(result, Err(LedgerError::MissingEmail)));
}
