//! # Rotation Workflow Tests
//!
//! End-to-end rotation cycles against the in-memory store.
//!
//! These tests verify:
//! - The full create -> set -> test -> finish cycle
//! - Idempotent replay of every step (at-least-once delivery)
//! - Static fields surviving a rotation unchanged
//! - Exactly one current version after promotion

mod common;

use base64::prelude::{Engine as _, BASE64_STANDARD};
use common::*;
use secret_rotator::prelude::*;
use serde_json::json;

const STEPS: [&str; 4] = ["createSecret", "setSecret", "testSecret", "finishSecret"];

async fn run_cycle(coordinator: &RotationCoordinator<InMemorySecretStore>, token: &str) {
    for step in STEPS {
        coordinator
            .rotate(&request(token, step))
            .await
            .unwrap_or_else(|e| panic!("{step} failed: {e}"));
    }
}

#[tokio::test]
async fn test_full_rotation_scenario() {
    let store = store_with_rotation(VERSION_B).await;
    let coordinator = RotationCoordinator::new(store.clone());

    // createSecret writes B as the pending candidate
    let outcome = coordinator
        .rotate(&request(VERSION_B, "createSecret"))
        .await
        .expect("createSecret");
    assert_eq!(outcome, StepOutcome::Completed);

    let candidate = stored_payload(&store, VERSION_B).await;
    let original = original_payload();
    assert_eq!(candidate["OTHER"], json!("x"));
    assert_ne!(candidate["FIELD_ENCRYPTION_KEY"], original["FIELD_ENCRYPTION_KEY"]);
    let key = candidate["FIELD_ENCRYPTION_KEY"].as_str().expect("key is text");
    assert_eq!(BASE64_STANDARD.decode(key).expect("base64").len(), 32);
    assert!(candidate["LAST_ROTATED_AT"].is_string());
    assert_eq!(holders_of(&store, "AWSPENDING").await, vec![VERSION_B.to_string()]);
    assert_eq!(holders_of(&store, "AWSCURRENT").await, vec![VERSION_A.to_string()]);

    let outcome = coordinator
        .rotate(&request(VERSION_B, "setSecret"))
        .await
        .expect("setSecret");
    assert_eq!(outcome, StepOutcome::Skipped);

    let outcome = coordinator
        .rotate(&request(VERSION_B, "testSecret"))
        .await
        .expect("testSecret");
    assert_eq!(outcome, StepOutcome::Completed);

    let outcome = coordinator
        .rotate(&request(VERSION_B, "finishSecret"))
        .await
        .expect("finishSecret");
    assert_eq!(outcome, StepOutcome::Completed);

    assert_eq!(holders_of(&store, "AWSCURRENT").await, vec![VERSION_B.to_string()]);
    assert!(holders_of(&store, "AWSPENDING").await.is_empty());
    assert_eq!(holders_of(&store, "AWSPREVIOUS").await, vec![VERSION_A.to_string()]);
}

#[tokio::test]
async fn test_create_twice_yields_one_candidate() {
    let store = store_with_rotation(VERSION_B).await;
    let coordinator = RotationCoordinator::new(store.clone());

    coordinator
        .rotate(&request(VERSION_B, "createSecret"))
        .await
        .expect("first create");
    let first = store
        .secret_string(SECRET_ID, VERSION_B)
        .await
        .expect("candidate written");

    let outcome = coordinator
        .rotate(&request(VERSION_B, "createSecret"))
        .await
        .expect("second create");
    assert_eq!(outcome, StepOutcome::Skipped);

    let second = store
        .secret_string(SECRET_ID, VERSION_B)
        .await
        .expect("candidate still there");
    assert_eq!(first, second, "retry must not regenerate the candidate");
    assert_eq!(store.version_count(SECRET_ID).await, 2);
    assert_eq!(holders_of(&store, "AWSPENDING").await, vec![VERSION_B.to_string()]);
}

#[tokio::test]
async fn test_every_step_is_noop_once_current() {
    let store = store_with_rotation(VERSION_B).await;
    let coordinator = RotationCoordinator::new(store.clone());
    run_cycle(&coordinator, VERSION_B).await;

    let before = store.version_stages(SECRET_ID).await;
    let payload_before = store.secret_string(SECRET_ID, VERSION_B).await;

    for step in STEPS {
        let outcome = coordinator
            .rotate(&request(VERSION_B, step))
            .await
            .unwrap_or_else(|e| panic!("replayed {step} failed: {e}"));
        assert_eq!(outcome, StepOutcome::AlreadyCurrent, "{step}");
    }

    assert_eq!(store.version_stages(SECRET_ID).await, before);
    assert_eq!(store.secret_string(SECRET_ID, VERSION_B).await, payload_before);
}

#[tokio::test]
async fn test_replaying_each_step_mid_cycle() {
    let store = store_with_rotation(VERSION_B).await;
    let coordinator = RotationCoordinator::new(store.clone());

    for step in STEPS {
        for attempt in 0..2 {
            coordinator
                .rotate(&request(VERSION_B, step))
                .await
                .unwrap_or_else(|e| panic!("{step} attempt {attempt} failed: {e}"));
        }
    }

    assert_eq!(holders_of(&store, "AWSCURRENT").await, vec![VERSION_B.to_string()]);
    assert!(holders_of(&store, "AWSPENDING").await.is_empty());
}

#[tokio::test]
async fn test_static_fields_survive_rotation() {
    let store = store_with_rotation(VERSION_B).await;
    let coordinator = RotationCoordinator::new(store.clone());
    run_cycle(&coordinator, VERSION_B).await;

    let original = original_payload();
    let rotated = stored_payload(&store, VERSION_B).await;
    for field in ["OTHER", "SUPABASE_URL", "SMS_RATE_LIMIT"] {
        assert_eq!(rotated[field], original[field], "{field} must pass through");
    }
}

#[tokio::test]
async fn test_consecutive_rotations() {
    let store = store_with_rotation(VERSION_B).await;
    let coordinator = RotationCoordinator::new(store.clone());
    run_cycle(&coordinator, VERSION_B).await;

    store
        .begin_rotation(SECRET_ID, VERSION_C)
        .await
        .expect("secret exists");
    run_cycle(&coordinator, VERSION_C).await;

    let key_b = stored_payload(&store, VERSION_B).await["FIELD_ENCRYPTION_KEY"].clone();
    let key_c = stored_payload(&store, VERSION_C).await["FIELD_ENCRYPTION_KEY"].clone();
    assert_ne!(key_b, key_c);
    assert_eq!(holders_of(&store, "AWSCURRENT").await, vec![VERSION_C.to_string()]);
    assert_eq!(holders_of(&store, "AWSPREVIOUS").await, vec![VERSION_B.to_string()]);
    assert!(holders_of(&store, "AWSPENDING").await.is_empty());
}

#[tokio::test]
async fn test_custom_stages_are_preserved() {
    let store = InMemorySecretStore::new();
    store
        .seed_version(
            SECRET_ID,
            VERSION_A,
            &original_payload().to_string(),
            &["AWSCURRENT", "blue"],
        )
        .await;
    store
        .begin_rotation(SECRET_ID, VERSION_B)
        .await
        .expect("secret exists");
    let coordinator = RotationCoordinator::new(store.clone());
    run_cycle(&coordinator, VERSION_B).await;

    assert_eq!(holders_of(&store, "blue").await, vec![VERSION_A.to_string()]);
}

#[tokio::test]
async fn test_finish_bootstraps_secret_without_current_version() {
    let store = InMemorySecretStore::new();
    store
        .seed_version(
            SECRET_ID,
            VERSION_B,
            &json!({ "FIELD_ENCRYPTION_KEY": key_b64(1, 32) }).to_string(),
            &["AWSPENDING"],
        )
        .await;
    let coordinator = RotationCoordinator::new(store.clone());

    coordinator
        .rotate(&request(VERSION_B, "testSecret"))
        .await
        .expect("candidate is valid");
    let outcome = coordinator
        .rotate(&request(VERSION_B, "finishSecret"))
        .await
        .expect("bootstrap promotion");
    assert_eq!(outcome, StepOutcome::Completed);
    assert_eq!(holders_of(&store, "AWSCURRENT").await, vec![VERSION_B.to_string()]);
}

#[tokio::test]
async fn test_validation_accepts_candidate_written_by_another_writer() {
    let store = seeded_store().await;
    store
        .seed_version(
            SECRET_ID,
            VERSION_B,
            &json!({ "FIELD_ENCRYPTION_KEY": key_b64(9, 32), "UNRELATED": [1, 2, 3] }).to_string(),
            &["AWSPENDING"],
        )
        .await;
    let coordinator = RotationCoordinator::new(store);

    let outcome = coordinator
        .rotate(&request(VERSION_B, "testSecret"))
        .await
        .expect("well-formed key");
    assert_eq!(outcome, StepOutcome::Completed);
}
