mod audit;
mod bet;
mod payment_method;
mod result;
mod transaction;
mod user;

pub use audit::{AuditAction, AuditLog};
pub use bet::{Bet, BetStatus, BetType};
pub use payment_method::PaymentMethod;
pub use result::DrawResult;
pub use transaction::{Transaction, TransactionKind, TransactionStatus};
pub use user::User;
