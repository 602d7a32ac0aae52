use crate::core::balance::NetBalance;
use crate::core::currency::CurrencyCode;
use crate::core::error::LedgerError;
use crate::core::expense::{Expense, ExpenseId};
use crate::core::group::{Group, GroupId};
use crate::core::member::{Member, MemberId};
use crate::core::payment::{Payment, PaymentId, PaymentStatus};
use crate::engine::ledger::{GroupLedger, HistoryEntry};
use crate::engine::settlement::{simplify_debts, Transfer};
use crate::engine::split::Split;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

/// Reply to `POST /api/shared/expense`.
#[derive(Debug, Clone, Serialize)]
pub struct SplitResponse {
    pub expense_id: ExpenseId,
    /// Signed amount per participant, positive = owed to them.
    pub splits: Split,
}

impl From<Split> for SplitResponse {
    fn from(split: Split) -> Self {
        Self {
            expense_id: split.expense_id(),
            splits: split,
        }
    }
}

/// Reply to `GET /api/shared/group/:id`.
#[derive(Debug, Clone, Serialize)]
pub struct GroupResponse {
    pub id: GroupId,
    pub name: String,
    pub created_by: MemberId,
    pub created_at: DateTime<Utc>,
    pub currency: CurrencyCode,
    pub members: Vec<Member>,
}

impl From<&Group> for GroupResponse {
    fn from(group: &Group) -> Self {
        Self {
            id: group.id().clone(),
            name: group.name().to_string(),
            created_by: group.created_by().clone(),
            created_at: group.created_at(),
            currency: group.currency().clone(),
            members: group.members().cloned().collect(),
        }
    }
}

/// Reply to `GET /api/shared/group/:id/balances`.
#[derive(Debug, Clone, Serialize)]
pub struct BalancesResponse {
    pub net_balances: NetBalance,
    pub simplified_transactions: Vec<Transfer>,
}

impl BalancesResponse {
    pub fn from_ledger(ledger: &GroupLedger) -> Result<Self, LedgerError> {
        let net_balances = ledger.net_balances()?;
        let simplified_transactions = simplify_debts(&net_balances);
        Ok(Self {
            net_balances,
            simplified_transactions,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ExpenseEntry {
    pub id: ExpenseId,
    pub description: String,
    pub amount: Decimal,
    pub paid_by: MemberId,
    pub notes: Option<String>,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl From<&Expense> for ExpenseEntry {
    fn from(e: &Expense) -> Self {
        Self {
            id: e.id(),
            description: e.description().to_string(),
            amount: e.amount(),
            paid_by: e.paid_by().clone(),
            notes: e.notes().map(str::to_string),
            date: e.date(),
            created_at: e.created_at(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentEntry {
    pub id: PaymentId,
    pub from_user: MemberId,
    pub to_user: MemberId,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub status: PaymentStatus,
    pub created_at: DateTime<Utc>,
}

impl From<&Payment> for PaymentEntry {
    fn from(p: &Payment) -> Self {
        Self {
            id: p.id(),
            from_user: p.from().clone(),
            to_user: p.to().clone(),
            amount: p.amount(),
            date: p.date(),
            status: p.status(),
            created_at: p.created_at(),
        }
    }
}

/// Reply to `GET /api/shared/group/:id/history`, newest first.
#[derive(Debug, Clone, Default, Serialize)]
pub struct HistoryResponse {
    pub expenses: Vec<ExpenseEntry>,
    pub payments: Vec<PaymentEntry>,
}

impl From<&GroupLedger> for HistoryResponse {
    fn from(ledger: &GroupLedger) -> Self {
        let mut response = Self::default();
        for entry in ledger.history() {
            match entry {
                HistoryEntry::Expense(e) => response.expenses.push(e.into()),
                HistoryEntry::Payment(p) => response.payments.push(p.into()),
            }
        }
        response
    }
}

/// `{ "error": "..." }` body for any rejected request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl From<&LedgerError> for ErrorResponse {
    fn from(err: &LedgerError) -> Self {
        Self {
            error: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn ledger() -> GroupLedger {
        GroupLedger::new(Group::new(
            GroupId::new("7"),
            "Trip",
            Member::new("1", "ana"),
            vec![Member::new("2", "ben"), Member::new("3", "caro")],
        ))
    }

    #[test]
    fn test_split_response_shape() {
        let mut ledger = ledger();
        let split = ledger
            .add_expense(Expense::new(GroupId::new("7"), MemberId::new("1"), dec!(30)))
            .unwrap();
        let json = serde_json::to_value(SplitResponse::from(split)).unwrap();

        assert!(json["expense_id"].is_string());
        assert_eq!(json["splits"]["1"], "20");
        assert_eq!(json["splits"]["2"], "-10");
        assert_eq!(json["splits"]["3"], "-10");
    }

    #[test]
    fn test_balances_response_shape() {
        let mut ledger = ledger();
        ledger
            .add_expense(Expense::new(GroupId::new("7"), MemberId::new("1"), dec!(30)))
            .unwrap();
        let json = serde_json::to_value(BalancesResponse::from_ledger(&ledger).unwrap()).unwrap();

        assert_eq!(json["net_balances"]["1"], "20");
        assert_eq!(json["net_balances"]["2"], "-10");
        assert_eq!(json["simplified_transactions"].as_array().unwrap().len(), 2);
        assert_eq!(json["simplified_transactions"][0]["to"], "1");
    }

    #[test]
    fn test_group_response_members() {
        let json = serde_json::to_value(GroupResponse::from(ledger().group())).unwrap();
        assert_eq!(json["id"], "7");
        assert_eq!(json["created_by"], "1");
        assert_eq!(json["members"][1]["username"], "ben");
        assert_eq!(json["members"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_history_response() {
        let mut ledger = ledger();
        ledger
            .add_expense(Expense::new(GroupId::new("7"), MemberId::new("2"), dec!(9)))
            .unwrap();
        ledger
            .record_payment(Payment::new(
                GroupId::new("7"),
                MemberId::new("3"),
                MemberId::new("2"),
                dec!(3),
            ))
            .unwrap();
        let json = serde_json::to_value(HistoryResponse::from(&ledger)).unwrap();
        assert_eq!(json["expenses"][0]["paid_by"], "2");
        assert_eq!(json["payments"][0]["from_user"], "3");
        assert_eq!(json["payments"][0]["status"], "pending");
    }

    #[test]
    fn test_error_response() {
        let err = LedgerError::NonPositiveAmount { amount: dec!(0) };
        let json = serde_json::to_value(ErrorResponse::from(&err)).unwrap();
        assert_eq!(json["error"], "amount must be positive, got 0");
    }
}
