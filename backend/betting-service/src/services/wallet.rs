use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::{
    audit_repo, payment_method_repo,
    transaction_repo::{self, NewTransaction},
    user_repo,
};
use crate::error::{AppError, Result};
use crate::metrics;
use crate::models::{AuditAction, Transaction, TransactionKind, TransactionStatus};
use crate::services::betting::validate_amount;

pub struct WalletRequest {
    pub user_id: Uuid,
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub payment_method_id: Option<Uuid>,
    pub description: Option<String>,
    pub receipt_url: Option<String>,
}

pub struct Review {
    pub admin_id: Uuid,
    pub transaction_id: Uuid,
    pub status: TransactionStatus,
    pub admin_notes: Option<String>,
}

/// Only approve/reject are admin decisions
pub fn parse_review_status(status: &str) -> Result<TransactionStatus> {
    match status {
        "approved" => Ok(TransactionStatus::Approved),
        "rejected" => Ok(TransactionStatus::Rejected),
        _ => Err(AppError::Validation("Invalid status".to_string())),
    }
}

fn review_details(id: Uuid, status: TransactionStatus, notes: Option<&str>) -> String {
    match notes {
        Some(n) => format!(
            "Updated transaction {} status to {} with notes: {}",
            id,
            status.as_str(),
            n
        ),
        None => format!("Updated transaction {} status to {}", id, status.as_str()),
    }
}

/// File a pending deposit or withdrawal request for admin review
pub async fn request_transaction(pool: &PgPool, request: WalletRequest) -> Result<Transaction> {
    if !request.kind.is_user_requestable() {
        return Err(AppError::Validation(
            "Transaction type must be deposit or withdrawal".to_string(),
        ));
    }
    validate_amount(request.amount)?;

    if let Some(method_id) = request.payment_method_id {
        if !payment_method_repo::is_active(pool, method_id).await? {
            return Err(AppError::Validation(
                "Unknown or inactive payment method".to_string(),
            ));
        }
    }

    if request.kind == TransactionKind::Withdrawal {
        let user = user_repo::find_by_id(pool, request.user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
        if request.amount > user.balance {
            return Err(AppError::InsufficientBalance);
        }
    }

    let transaction = transaction_repo::insert_transaction(
        pool,
        &NewTransaction {
            user_id: request.user_id,
            kind: request.kind,
            amount: request.amount,
            status: TransactionStatus::Pending,
            description: request.description.as_deref(),
            payment_method_id: request.payment_method_id,
            receipt_url: request.receipt_url.as_deref(),
        },
    )
    .await?;

    tracing::info!(
        transaction_id = %transaction.id,
        user_id = %transaction.user_id,
        kind = transaction.kind.as_str(),
        amount = %transaction.amount,
        "wallet request filed"
    );

    Ok(transaction)
}

/// Approve or reject a pending request, moving the balance on approval
pub async fn review_transaction(pool: &PgPool, review: Review) -> Result<Transaction> {
    let mut tx = pool.begin().await?;

    let current = transaction_repo::lock_by_id(&mut *tx, review.transaction_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Transaction not found".to_string()))?;

    if current.status != TransactionStatus::Pending {
        return Err(AppError::Conflict(format!(
            "Transaction is already {}",
            current.status.as_str()
        )));
    }

    if review.status == TransactionStatus::Approved {
        match current.kind {
            TransactionKind::Deposit => {
                if !user_repo::credit_balance(&mut *tx, current.user_id, current.amount).await? {
                    return Err(AppError::NotFound("User not found".to_string()));
                }
            }
            TransactionKind::Withdrawal => {
                if !user_repo::debit_balance(&mut *tx, current.user_id, current.amount).await? {
                    return Err(AppError::InsufficientBalance);
                }
            }
            other => {
                return Err(AppError::Conflict(format!(
                    "{} transactions are not reviewable",
                    other.as_str()
                )));
            }
        }
    }

    let notes = review
        .admin_notes
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty());

    let updated = transaction_repo::mark_reviewed(
        &mut *tx,
        current.id,
        review.status,
        notes,
        review.admin_id,
    )
    .await?;

    audit_repo::record(
        &mut *tx,
        review.admin_id,
        AuditAction::TransactionUpdate,
        &review_details(updated.id, updated.status, notes),
    )
    .await?;

    tx.commit().await?;

    metrics::record_wallet_review(updated.kind.as_str(), updated.status.as_str());
    tracing::info!(
        transaction_id = %updated.id,
        admin_id = %review.admin_id,
        kind = updated.kind.as_str(),
        status = updated.status.as_str(),
        "wallet request reviewed"
    );

    Ok(updated)
}
