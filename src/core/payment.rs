use crate::core::error::LedgerError;
use crate::core::group::GroupId;
use crate::core::member::MemberId;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

pub type PaymentId = Uuid;

/// Lifecycle of a settlement payment.
///
/// `Pending` moves to either `Settled` or `Cancelled`; both are terminal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Settled,
    Cancelled,
}

impl PaymentStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, PaymentStatus::Pending)
    }

    pub fn can_transition_to(self, next: PaymentStatus) -> bool {
        matches!(
            (self, next),
            (PaymentStatus::Pending, PaymentStatus::Settled)
                | (PaymentStatus::Pending, PaymentStatus::Cancelled)
        )
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Settled => "settled",
            PaymentStatus::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// A transfer from one member to another that pays down a debt.
///
/// Payments start out pending and only count toward balances once
/// settled.
///
/// # Examples
///
/// ```
/// use divy_ledger::core::group::GroupId;
/// use divy_ledger::core::member::MemberId;
/// use divy_ledger::core::payment::{Payment, PaymentStatus};
/// use rust_decimal_macros::dec;
///
/// let mut payment = Payment::new(GroupId::new("trip"), MemberId::new("2"), MemberId::new("1"), dec!(20));
/// assert_eq!(payment.status(), PaymentStatus::Pending);
///
/// payment.settle().unwrap();
/// assert!(payment.is_settled());
/// assert!(payment.cancel().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    id: PaymentId,
    group_id: GroupId,
    from: MemberId,
    to: MemberId,
    amount: Decimal,
    date: NaiveDate,
    #[serde(default)]
    status: PaymentStatus,
    created_at: DateTime<Utc>,
}

impl Payment {
    /// Create a pending payment dated today.
    pub fn new(group_id: GroupId, from: MemberId, to: MemberId, amount: Decimal) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            group_id,
            from,
            to,
            amount,
            date: now.date_naive(),
            status: PaymentStatus::Pending,
            created_at: now,
        }
    }

    /// Replace the generated id (useful for testing / determinism).
    pub fn with_id(mut self, id: PaymentId) -> Self {
        self.id = id;
        self
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// Confirm the payment went through.
    pub fn settle(&mut self) -> Result<(), LedgerError> {
        self.transition(PaymentStatus::Settled)
    }

    /// Abandon a payment that never went through.
    pub fn cancel(&mut self) -> Result<(), LedgerError> {
        self.transition(PaymentStatus::Cancelled)
    }

    fn transition(&mut self, next: PaymentStatus) -> Result<(), LedgerError> {
        if !self.status.can_transition_to(next) {
            return Err(LedgerError::InvalidPaymentTransition {
                payment: self.id,
                from: self.status,
                to: next,
            });
        }
        log::debug!("payment {} {} -> {}", self.id, self.status, next);
        self.status = next;
        Ok(())
    }

    // --- Accessors ---

    pub fn id(&self) -> PaymentId {
        self.id
    }

    pub fn group_id(&self) -> &GroupId {
        &self.group_id
    }

    pub fn from(&self) -> &MemberId {
        &self.from
    }

    pub fn to(&self) -> &MemberId {
        &self.to
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn status(&self) -> PaymentStatus {
        self.status
    }

    pub fn is_settled(&self) -> bool {
        self.status == PaymentStatus::Settled
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
