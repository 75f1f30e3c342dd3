/// Shared JWT module for the betting backend
///
/// Tokens are signed with HS256 using a single shared secret loaded from the
/// environment at startup. The secret and the token lifetime are stored once
/// in process-wide cells and never change afterwards.
///
/// ## Usage
///
/// ```rust
/// use crypto_core::jwt;
///
/// jwt::initialize_jwt_secret("a-long-random-secret", 86_400)
///     .expect("Failed to initialize JWT secret");
///
/// let token = jwt::generate_access_token(uuid::Uuid::new_v4(), "alice").unwrap();
/// assert!(jwt::validate_token(&token).is_ok());
/// ```
use anyhow::{anyhow, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, Algorithm, DecodingKey, EncodingKey, Header, TokenData, Validation,
};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Constants
// ============================================================================

const JWT_ALGORITHM: Algorithm = Algorithm::HS256;

/// Secrets shorter than this are rejected at startup
const MIN_SECRET_LEN: usize = 16;

// ============================================================================
// Data Structures
// ============================================================================

/// JWT Claims structure
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID as UUID string)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Token type, always "access" for now
    pub token_type: String,
    /// Username at issuance time
    pub username: String,
}

// ============================================================================
// Key Storage
// ============================================================================

struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    access_ttl_secs: i64,
}

static JWT_KEYS: OnceCell<JwtKeys> = OnceCell::new();

// ============================================================================
// Initialization
// ============================================================================

/// Initialize the signing secret and access token lifetime
///
/// MUST be called during application startup before any JWT operations.
/// Can only be called once; subsequent calls return an error.
pub fn initialize_jwt_secret(secret: &str, access_ttl_secs: i64) -> Result<()> {
    if secret.len() < MIN_SECRET_LEN {
        return Err(anyhow!(
            "JWT secret must be at least {MIN_SECRET_LEN} characters"
        ));
    }
    if access_ttl_secs <= 0 {
        return Err(anyhow!("JWT access token TTL must be positive"));
    }

    let keys = JwtKeys {
        encoding: EncodingKey::from_secret(secret.as_bytes()),
        decoding: DecodingKey::from_secret(secret.as_bytes()),
        access_ttl_secs,
    };

    JWT_KEYS
        .set(keys)
        .map_err(|_| anyhow!("JWT secret already initialized"))
}

/// Whether `initialize_jwt_secret` has run
pub fn is_initialized() -> bool {
    JWT_KEYS.get().is_some()
}

fn keys() -> Result<&'static JwtKeys> {
    JWT_KEYS.get().ok_or_else(|| {
        anyhow!("JWT secret not initialized. Call initialize_jwt_secret() during startup.")
    })
}

// ============================================================================
// Token Generation
// ============================================================================

/// Generate a new access token for `user_id`
pub fn generate_access_token(user_id: Uuid, username: &str) -> Result<String> {
    let keys = keys()?;
    let now = Utc::now();
    let expiry = now + Duration::seconds(keys.access_ttl_secs);

    let claims = Claims {
        sub: user_id.to_string(),
        iat: now.timestamp(),
        exp: expiry.timestamp(),
        token_type: "access".to_string(),
        username: username.to_string(),
    };

    encode(&Header::new(JWT_ALGORITHM), &claims, &keys.encoding)
        .map_err(|e| anyhow!("Failed to generate access token: {e}"))
}

/// Access token lifetime in seconds, as configured at startup
pub fn access_token_ttl_secs() -> Result<i64> {
    Ok(keys()?.access_ttl_secs)
}

// ============================================================================
// Token Validation
// ============================================================================

/// Validate and decode a JWT token
///
/// Verifies the HS256 signature and the expiration claim. The token must be
/// passed without the "Bearer " prefix.
pub fn validate_token(token: &str) -> Result<TokenData<Claims>> {
    let keys = keys()?;

    let mut validation = Validation::new(JWT_ALGORITHM);
    validation.validate_exp = true;

    let data = decode::<Claims>(token, &keys.decoding, &validation)
        .map_err(|e| anyhow!("Token validation failed: {e}"))?;

    if data.claims.token_type != "access" {
        return Err(anyhow!("Unexpected token type: {}", data.claims.token_type));
    }

    Ok(data)
}

/// Extract user ID from a validated token
pub fn get_user_id_from_token(token: &str) -> Result<Uuid> {
    let token_data = validate_token(token)?;
    Uuid::parse_str(&token_data.claims.sub)
        .map_err(|e| anyhow!("Invalid user ID format in token: {e}"))
}

// ============================================================================
// Tests
// ============================================================================
