/// Integration tests for crypto-core JWT functionality
///
/// Covers token issuance, validation against the configured secret,
/// and failure modes callers rely on for 401 responses.
use crypto_core::jwt::{
    access_token_ttl_secs, generate_access_token, get_user_id_from_token, initialize_jwt_secret,
    validate_token,
};
use std::sync::Once;
use uuid::Uuid;

const TEST_SECRET: &str = "integration-test-secret-0123456789";

fn init_test_secret() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        initialize_jwt_secret(TEST_SECRET, 900).expect("Failed to initialize test secret");
    });
}

#[test]
fn test_token_round_trip_preserves_subject() {
    init_test_secret();

    let user_id = Uuid::new_v4();
    let token = generate_access_token(user_id, "player_one").expect("token");

    let claims = validate_token(&token).expect("valid token").claims;
    assert_eq!(claims.sub, user_id.to_string());
    assert_eq!(claims.username, "player_one");
    assert_eq!(claims.token_type, "access");
    assert_eq!(get_user_id_from_token(&token).unwrap(), user_id);
}

#[test]
fn test_configured_ttl_is_applied() {
    init_test_secret();

    assert_eq!(access_token_ttl_secs().unwrap(), 900);
    let token = generate_access_token(Uuid::new_v4(), "ttl_check").unwrap();
    let claims = validate_token(&token).unwrap().claims;
    assert_eq!(claims.exp - claims.iat, 900);
}

#[test]
fn test_tampered_signature_is_rejected() {
    init_test_secret();

    let token = generate_access_token(Uuid::new_v4(), "player_two").unwrap();
    let mut parts: Vec<&str> = token.split('.').collect();
    let bad_sig = "A".repeat(parts[2].len());
    parts[2] = &bad_sig;
    let tampered = parts.join(".");

    assert!(validate_token(&tampered).is_err());
}

#[test]
fn test_empty_token_is_rejected() {
    init_test_secret();
    assert!(validate_token("").is_err());
}

#[test]
fn test_short_secret_is_refused() {
    assert!(initialize_jwt_secret("short", 900).is_err());
}
