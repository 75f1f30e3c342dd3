use rand::Rng;
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::db::{
    self,
    transaction_repo::{self, NewTransaction},
    user_repo::{self, NewUser},
};
use crate::error::{AppError, Result};
use crate::models::{TransactionKind, User};

const REFERRAL_PREFIX: &str = "SM";
const REFERRAL_SUFFIX_LEN: usize = 6;
const REFERRAL_ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const REFERRAL_ATTEMPTS: usize = 8;

const USERNAME_UNIQUE: &str = "users_username_key";
const PHONE_UNIQUE: &str = "users_phone_key";
const REFERRAL_UNIQUE: &str = "users_referral_code_key";

pub struct Registration {
    pub username: String,
    pub password: String,
    pub phone: Option<String>,
    pub used_ref_code: Option<String>,
}

pub fn generate_referral_code<R: Rng + ?Sized>(rng: &mut R) -> String {
    let suffix: String = (0..REFERRAL_SUFFIX_LEN)
        .map(|_| REFERRAL_ALPHABET[rng.gen_range(0..REFERRAL_ALPHABET.len())] as char)
        .collect();
    format!("{REFERRAL_PREFIX}{suffix}")
}

async fn unused_referral_code(pool: &PgPool) -> Result<String> {
    for _ in 0..REFERRAL_ATTEMPTS {
        let code = generate_referral_code(&mut rand::thread_rng());
        if !user_repo::referral_code_exists(pool, &code).await? {
            return Ok(code);
        }
    }
    Err(AppError::Internal(
        "could not allocate a unique referral code".to_string(),
    ))
}

async fn hash_password(password: String) -> Result<String> {
    tokio::task::spawn_blocking(move || crypto_core::hash_password(&password))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
        .map_err(AppError::from)
}

fn map_user_insert_error(err: sqlx::Error) -> AppError {
    if db::is_unique_violation(&err, USERNAME_UNIQUE) {
        AppError::Conflict("Username already exists".to_string())
    } else if db::is_unique_violation(&err, PHONE_UNIQUE) {
        AppError::Conflict("Phone number already registered".to_string())
    } else if db::is_unique_violation(&err, REFERRAL_UNIQUE) {
        AppError::Conflict("Referral code collision, please retry".to_string())
    } else {
        AppError::Database(err)
    }
}

/// Create an account, crediting the referrer's commission when a known code is supplied
pub async fn register(
    pool: &PgPool,
    registration: Registration,
    referral_bonus: Decimal,
) -> Result<User> {
    if user_repo::find_by_username(pool, &registration.username)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict("Username already exists".to_string()));
    }

    let password_hash = hash_password(registration.password).await?;
    let referral_code = unused_referral_code(pool).await?;

    let mut tx = pool.begin().await?;

    let user = user_repo::create_user(
        &mut *tx,
        &NewUser {
            username: &registration.username,
            password_hash: &password_hash,
            phone: registration.phone.as_deref(),
            referral_code: &referral_code,
            used_ref_code: registration.used_ref_code.as_deref(),
        },
    )
    .await
    .map_err(map_user_insert_error)?;

    if let Some(code) = registration.used_ref_code.as_deref() {
        match user_repo::find_by_referral_code(&mut *tx, code).await? {
            Some(referrer) => {
                user_repo::credit_commission(&mut *tx, referrer.id, referral_bonus).await?;

                let description = format!("Referral bonus for {}", user.username);
                transaction_repo::insert_transaction(
                    &mut *tx,
                    &NewTransaction::completed(
                        referrer.id,
                        TransactionKind::Commission,
                        referral_bonus,
                        &description,
                    ),
                )
                .await?;

                tracing::info!(
                    referrer_id = %referrer.id,
                    user_id = %user.id,
                    bonus = %referral_bonus,
                    "referral commission credited"
                );
            }
            None => {
                tracing::warn!(user_id = %user.id, code = %code, "unknown referral code ignored");
            }
        }
    }

    tx.commit().await?;

    tracing::info!(user_id = %user.id, username = %user.username, "user registered");
    Ok(user)
}

/// Check credentials. Unknown usernames and wrong passwords are indistinguishable.
pub async fn login(pool: &PgPool, username: &str, password: &str) -> Result<User> {
    let invalid = || AppError::Authentication("Invalid credentials".to_string());

    let user = user_repo::find_by_username(pool, username)
        .await?
        .ok_or_else(invalid)?;

    let password = password.to_string();
    let hash = user.password_hash.clone();
    let verified = tokio::task::spawn_blocking(move || crypto_core::verify_password(&password, &hash))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    match verified {
        Ok(()) => Ok(user),
        Err(crypto_core::PasswordError::Mismatch) => {
            tracing::debug!(username = %username, "login rejected");
            Err(invalid())
        }
        Err(e) => Err(AppError::from(e)),
    }
}

pub fn issue_token(user: &User) -> Result<String> {
    crypto_core::jwt::generate_access_token(user.id, &user.username)
        .map_err(|e| AppError::Internal(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_referral_code_shape() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let code = generate_referral_code(&mut rng);
            assert_eq!(code.len(), 8);
            assert!(code.starts_with("SM"));
            assert!(code[2..]
                .chars()
                .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
        }
    }

    #[test]
    fn test_referral_codes_vary() {
        let mut rng = StdRng::seed_from_u64(42);
        let a = generate_referral_code(&mut rng);
        let b = generate_referral_code(&mut rng);
        assert_ne!(a, b);
    }
}
