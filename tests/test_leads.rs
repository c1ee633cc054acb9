mod helpers;

use helpers::*;
use leadflow::models::{LeadIdentity, UpdateLeadRequest};
use leadflow::services::LeadService;

#[tokio::test]
async fn test_find_or_create_is_idempotent_for_same_phone() {
    let db = setup_test_db().await;
    let service = LeadService::new(db.clone());

    let identity = LeadIdentity {
        phone: Some("+15551234".to_string()),
        name: Some("Ann".to_string()),
        ..Default::default()
    };

    let first = service.find_or_create(&identity).await.unwrap();
    let second = service.find_or_create(&identity).await.unwrap();

    assert_eq!(first.id, second.id);
    let all = db.list_leads(0, 100).await.unwrap();
    assert_eq!(all.len(), 1, "dedup must not create a second lead row");

    teardown_test_db(db).await;
}

#[tokio::test]
async fn test_any_single_identifier_matches_existing_lead() {
    let db = setup_test_db().await;
    let service = LeadService::new(db.clone());

    let original = service
        .find_or_create(&LeadIdentity {
            phone: Some("+15550100".to_string()),
            email: Some("ann@example.com".to_string()),
            name: Some("Ann".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    // Same email, different phone: OR matching still resolves to the
    // existing lead.
    let matched = service
        .find_or_create(&LeadIdentity {
            phone: Some("+15550999".to_string()),
            email: Some("ann@example.com".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(matched.id, original.id);

    teardown_test_db(db).await;
}

#[tokio::test]
async fn test_anonymous_identity_always_creates_new_lead() {
    let db = setup_test_db().await;
    let service = LeadService::new(db.clone());

    let identity = LeadIdentity {
        name: Some("Walk-in".to_string()),
        ..Default::default()
    };

    let first = service.find_or_create(&identity).await.unwrap();
    let second = service.find_or_create(&identity).await.unwrap();

    // A name alone is not an identifier, so no match is attempted.
    assert_ne!(first.id, second.id);
    assert_eq!(db.list_leads(0, 100).await.unwrap().len(), 2);

    teardown_test_db(db).await;
}

#[tokio::test]
async fn test_empty_string_identifiers_are_ignored() {
    let db = setup_test_db().await;
    let service = LeadService::new(db.clone());

    let first = service
        .find_or_create(&LeadIdentity {
            external_id: Some("".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    let second = service
        .find_or_create(&LeadIdentity {
            external_id: Some("".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_ne!(first.id, second.id);

    teardown_test_db(db).await;
}

#[tokio::test]
async fn test_new_lead_carries_all_given_fields() {
    let db = setup_test_db().await;
    let service = LeadService::new(db.clone());

    let lead = service
        .find_or_create(&LeadIdentity {
            external_id: Some("tg-1001".to_string()),
            phone: Some("+15550200".to_string()),
            email: Some("bob@example.com".to_string()),
            name: Some("Bob".to_string()),
        })
        .await
        .unwrap();

    let stored = db.get_lead_by_id(lead.id).await.unwrap().unwrap();
    assert_eq!(stored.external_id.as_deref(), Some("tg-1001"));
    assert_eq!(stored.phone.as_deref(), Some("+15550200"));
    assert_eq!(stored.email.as_deref(), Some("bob@example.com"));
    assert_eq!(stored.name.as_deref(), Some("Bob"));

    teardown_test_db(db).await;
}

#[tokio::test]
async fn test_update_lead_changes_only_given_fields() {
    let db = setup_test_db().await;
    let service = LeadService::new(db.clone());

    let lead = service
        .find_or_create(&LeadIdentity {
            phone: Some("+15550300".to_string()),
            name: Some("Before".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    let updated = db
        .update_lead(
            lead.id,
            &UpdateLeadRequest {
                external_id: None,
                phone: None,
                email: None,
                name: Some("After".to_string()),
            },
        )
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.name.as_deref(), Some("After"));
    assert_eq!(updated.phone.as_deref(), Some("+15550300"));

    teardown_test_db(db).await;
}
