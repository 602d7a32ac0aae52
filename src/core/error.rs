use crate::core::currency::CurrencyCode;
use crate::core::expense::ExpenseId;
use crate::core::group::GroupId;
use crate::core::member::MemberId;
use crate::core::payment::{PaymentId, PaymentStatus};
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors reported by the ledger engine.
///
/// Every variant is a local validation failure. Nothing is retried; the
/// caller decides how to surface it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("invalid expense {expense}: {reason}")]
    InvalidExpense { expense: ExpenseId, reason: String },

    #[error("member {member} is not in group {group}")]
    MemberNotInGroup { member: MemberId, group: GroupId },

    #[error("amount must be positive, got {amount}")]
    NonPositiveAmount { amount: Decimal },

    #[error("amount {amount} is finer than the minor unit of {currency}")]
    PrecisionExceeded {
        amount: Decimal,
        currency: CurrencyCode,
    },

    #[error("amount {amount} exceeds the maximum of {max}")]
    AmountTooLarge { amount: Decimal, max: Decimal },

    #[error("arithmetic overflow: {0}")]
    Overflow(String),

    #[error("rounding invariant violated: {0}")]
    RoundingInvariantViolation(String),

    #[error("{record} belongs to group {found}, expected {expected}")]
    GroupMismatch {
        record: String,
        expected: GroupId,
        found: GroupId,
    },

    #[error("invalid payment {payment}: {reason}")]
    InvalidPayment { payment: PaymentId, reason: String },

    #[error("payment {payment} cannot move from {from} to {to}")]
    InvalidPaymentTransition {
        payment: PaymentId,
        from: PaymentStatus,
        to: PaymentStatus,
    },

    #[error("expense {0} not found")]
    ExpenseNotFound(ExpenseId),

    #[error("payment {0} not found")]
    PaymentNotFound(PaymentId),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_messages() {
        let err = LedgerError::NonPositiveAmount { amount: dec!(-5) };
        assert_eq!(err.to_string(), "amount must be positive, got -5");

        let err = LedgerError::MemberNotInGroup {
            member: MemberId::new("9"),
            group: GroupId::new("trip"),
        };
        assert_eq!(err.to_string(), "member 9 is not in group trip");
    }

    #[test]
    fn test_transition_message() {
        let err = LedgerError::InvalidPaymentTransition {
            payment: uuid::Uuid::nil(),
            from: PaymentStatus::Settled,
            to: PaymentStatus::Cancelled,
        };
        assert!(err.to_string().contains("from settled to cancelled"));
    }
}
