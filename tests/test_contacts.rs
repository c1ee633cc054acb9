mod helpers;

use std::sync::Arc;

use helpers::*;
use leadflow::api::middleware::error::ApiError;
use leadflow::api::middleware::AppState;
use leadflow::models::UpdateContactRequest;

fn app_state(db: leadflow::database::Database, seed: u64) -> AppState {
    AppState::with_random_source(db, Arc::new(SeededRandomSource::new(seed)))
}

#[tokio::test]
async fn test_intake_assigns_operator_and_returns_detail() {
    let db = setup_test_db().await;
    let state = app_state(db.clone(), 5);

    let source = create_test_source(&db, "webshop").await;
    let operator = create_test_operator(&db, "Kate", 10).await;
    create_test_weight(&db, source.id, operator.id, 10).await;

    let detail = state
        .contact_service
        .create_contact(&contact_request(source.id, "+15550700"))
        .await
        .unwrap();

    assert_eq!(detail.source.id, source.id);
    assert_eq!(detail.operator_id, Some(operator.id));
    assert_eq!(
        detail.operator.as_ref().map(|o| o.id),
        Some(operator.id),
        "detail must carry the joined operator"
    );
    assert_eq!(detail.lead.phone.as_deref(), Some("+15550700"));
    assert!(detail.is_active);

    teardown_test_db(db).await;
}

#[tokio::test]
async fn test_intake_without_weights_creates_unassigned_contact() {
    let db = setup_test_db().await;
    let state = app_state(db.clone(), 5);

    // The source exists but no operator is linked to it.
    let source = create_test_source(&db, "bare-source").await;
    create_test_operator(&db, "Luke", 10).await;

    let detail = state
        .contact_service
        .create_contact(&contact_request(source.id, "+15550701"))
        .await
        .unwrap();

    assert_eq!(detail.operator_id, None);
    assert!(detail.operator.is_none());

    teardown_test_db(db).await;
}

#[tokio::test]
async fn test_intake_with_capped_operator_creates_unassigned_contact() {
    let db = setup_test_db().await;
    let state = app_state(db.clone(), 5);

    let source = create_test_source(&db, "capped-source").await;
    let operator = create_test_operator(&db, "Mia", 1).await;
    create_test_weight(&db, source.id, operator.id, 10).await;

    let first = state
        .contact_service
        .create_contact(&contact_request(source.id, "+15550702"))
        .await
        .unwrap();
    assert_eq!(first.operator_id, Some(operator.id));

    // The cap is reached, so the next contact stays unassigned.
    let second = state
        .contact_service
        .create_contact(&contact_request(source.id, "+15550703"))
        .await
        .unwrap();
    assert_eq!(second.operator_id, None);

    teardown_test_db(db).await;
}

#[tokio::test]
async fn test_intake_rejects_unknown_source_before_writing() {
    let db = setup_test_db().await;
    let state = app_state(db.clone(), 5);

    let result = state
        .contact_service
        .create_contact(&contact_request(9999, "+15550704"))
        .await;

    match result {
        Err(ApiError::NotFound(msg)) => assert_eq!(msg, "Source not found"),
        other => panic!("expected NotFound, got {:?}", other),
    }

    // The failed intake must not have left a lead or contact behind.
    assert!(db.list_leads(0, 100).await.unwrap().is_empty());
    assert!(db.list_contacts(0, 100).await.unwrap().is_empty());

    teardown_test_db(db).await;
}

#[tokio::test]
async fn test_repeated_intake_reuses_the_lead() {
    let db = setup_test_db().await;
    let state = app_state(db.clone(), 5);

    let source = create_test_source(&db, "repeat-source").await;

    let first = state
        .contact_service
        .create_contact(&contact_request(source.id, "+15550705"))
        .await
        .unwrap();
    let second = state
        .contact_service
        .create_contact(&contact_request(source.id, "+15550705"))
        .await
        .unwrap();

    assert_eq!(first.lead.id, second.lead.id);
    assert_eq!(db.list_leads(0, 100).await.unwrap().len(), 1);
    assert_eq!(db.contacts_for_lead(first.lead.id).await.unwrap().len(), 2);

    teardown_test_db(db).await;
}

#[tokio::test]
async fn test_update_contact_reassigns_operator() {
    let db = setup_test_db().await;
    let state = app_state(db.clone(), 5);

    let source = create_test_source(&db, "patch-source").await;
    let op_a = create_test_operator(&db, "Nina", 10).await;
    let op_b = create_test_operator(&db, "Omar", 10).await;
    create_test_weight(&db, source.id, op_a.id, 10).await;

    let detail = state
        .contact_service
        .create_contact(&contact_request(source.id, "+15550706"))
        .await
        .unwrap();
    assert_eq!(detail.operator_id, Some(op_a.id));

    let updated = state
        .contact_service
        .update_contact(
            detail.id,
            &UpdateContactRequest {
                is_active: None,
                message: Some("escalated".to_string()),
                operator_id: Some(op_b.id),
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.operator_id, Some(op_b.id));
    assert_eq!(updated.message.as_deref(), Some("escalated"));
    assert!(updated.is_active);

    teardown_test_db(db).await;
}

#[tokio::test]
async fn test_update_missing_contact_is_not_found() {
    let db = setup_test_db().await;
    let state = app_state(db.clone(), 5);

    let result = state
        .contact_service
        .update_contact(
            4242,
            &UpdateContactRequest {
                is_active: Some(false),
                message: None,
                operator_id: None,
            },
        )
        .await;

    match result {
        Err(ApiError::NotFound(_)) => {}
        other => panic!("expected NotFound, got {:?}", other),
    }

    teardown_test_db(db).await;
}

#[tokio::test]
async fn test_distribution_groups_by_source_and_operator() {
    let db = setup_test_db().await;
    let state = app_state(db.clone(), 5);

    let source_a = create_test_source(&db, "dist-a").await;
    let source_b = create_test_source(&db, "dist-b").await;
    let operator = create_test_operator(&db, "Pia", 10).await;
    create_test_weight(&db, source_a.id, operator.id, 10).await;
    // source_b has no operators: its contacts land unassigned.

    state
        .contact_service
        .create_contact(&contact_request(source_a.id, "+15550707"))
        .await
        .unwrap();
    state
        .contact_service
        .create_contact(&contact_request(source_a.id, "+15550708"))
        .await
        .unwrap();
    state
        .contact_service
        .create_contact(&contact_request(source_b.id, "+15550709"))
        .await
        .unwrap();

    let stats = state.contact_service.distribution().await.unwrap();

    let by_operator = stats.get(&source_a.id).expect("source_a must be present");
    assert_eq!(by_operator.get(&operator.id.to_string()), Some(&2));

    let unassigned = stats.get(&source_b.id).expect("source_b must be present");
    assert_eq!(unassigned.get("null"), Some(&1));

    teardown_test_db(db).await;
}

#[tokio::test]
async fn test_intake_with_zeroed_weights_still_assigns_someone() {
    let db = setup_test_db().await;
    let state = app_state(db.clone(), 11);

    let source = create_test_source(&db, "zeroed-intake").await;
    let op_a = create_test_operator(&db, "Quinn", 5).await;
    let op_b = create_test_operator(&db, "Rosa", 5).await;
    create_test_weight(&db, source.id, op_a.id, 10).await;
    create_test_weight(&db, source.id, op_b.id, 10).await;
    force_zero_weight(&db, source.id, op_a.id).await;
    force_zero_weight(&db, source.id, op_b.id).await;

    // With every weight zeroed the selector falls back to a uniform pick;
    // intake must never leave a contact unassigned while operators are
    // eligible.
    for i in 0..10 {
        let detail = state
            .contact_service
            .create_contact(&contact_request(source.id, &format!("+1555090{}", i)))
            .await
            .unwrap();
        assert!(
            detail.operator_id == Some(op_a.id) || detail.operator_id == Some(op_b.id),
            "contact must be assigned to one of the eligible operators"
        );
    }

    teardown_test_db(db).await;
}

#[tokio::test]
async fn test_get_contact_detail_for_unknown_id_is_not_found() {
    let db = setup_test_db().await;
    let state = app_state(db.clone(), 5);

    match state.contact_service.get_contact(777).await {
        Err(ApiError::NotFound(msg)) => assert_eq!(msg, "Contact not found"),
        other => panic!("expected NotFound, got {:?}", other),
    }

    teardown_test_db(db).await;
}
