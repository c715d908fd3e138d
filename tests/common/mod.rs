//! Common test utilities for rotation workflow tests
//!
//! Builds in-memory stores seeded with a current version the way a real
//! secret looks before its first rotation.

#![allow(dead_code, reason = "Each test binary uses a different subset of helpers")]

use base64::prelude::{Engine as _, BASE64_STANDARD};
use secret_rotator::prelude::*;
use serde_json::{json, Value};

pub const SECRET_ID: &str = "ibimina/app-config";
pub const VERSION_A: &str = "11111111-1111-4111-8111-111111111111";
pub const VERSION_B: &str = "22222222-2222-4222-8222-222222222222";
pub const VERSION_C: &str = "33333333-3333-4333-8333-333333333333";

/// Base64 text for `len` bytes of `fill`
pub fn key_b64(fill: u8, len: usize) -> String {
    BASE64_STANDARD.encode(vec![fill; len])
}

/// Payload of the version that is current before rotation
pub fn original_payload() -> Value {
    json!({
        "FIELD_ENCRYPTION_KEY": key_b64(0xAA, 32),
        "OTHER": "x",
        "SUPABASE_URL": "https://project.supabase.co",
        "SMS_RATE_LIMIT": 30
    })
}

/// Store holding `original_payload` as version A (`AWSCURRENT`)
pub async fn seeded_store() -> InMemorySecretStore {
    let store = InMemorySecretStore::new();
    store
        .seed_version(
            SECRET_ID,
            VERSION_A,
            &original_payload().to_string(),
            &["AWSCURRENT"],
        )
        .await;
    store
}

/// Seeded store with a rotation cycle for `token` already started
pub async fn store_with_rotation(token: &str) -> InMemorySecretStore {
    let store = seeded_store().await;
    store
        .begin_rotation(SECRET_ID, token)
        .await
        .expect("secret was seeded");
    store
}

pub fn request(token: &str, step: &str) -> RotationRequest {
    RotationRequest::new(SECRET_ID, token, step)
}

/// Parsed payload of a stored version
pub async fn stored_payload(store: &InMemorySecretStore, version: &str) -> Value {
    let raw = store
        .secret_string(SECRET_ID, version)
        .await
        .expect("version has a value");
    serde_json::from_str(&raw).expect("stored payload is JSON")
}

/// Versions of the test secret currently holding `stage`
pub async fn holders_of(store: &InMemorySecretStore, stage: &str) -> Vec<String> {
    store
        .version_stages(SECRET_ID)
        .await
        .expect("secret exists")
        .into_iter()
        .filter(|(_, stages)| stages.contains(stage))
        .map(|(version, _)| version)
        .collect()
}
