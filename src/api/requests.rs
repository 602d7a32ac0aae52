use crate::core::error::LedgerError;
use crate::core::expense::{Expense, SplitPolicy};
use crate::core::group::GroupId;
use crate::core::member::MemberId;
use crate::core::payment::{Payment, PaymentStatus};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Body of `POST /api/shared/expense`.
///
/// Amounts and member ids are accepted as JSON numbers or strings.
/// `excluded_members` is accepted as an alias of `exclude_members`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseRequest {
    pub amount: Decimal,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<GroupId>,
    pub paid_by: MemberId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(default, alias = "excluded_members", skip_serializing_if = "Vec::is_empty")]
    pub exclude_members: Vec<MemberId>,
    /// Explicit shares; the expense is split equally when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub splits: Option<BTreeMap<MemberId, Decimal>>,
}

impl ExpenseRequest {
    /// Build the expense for `group`. A request naming another group is
    /// rejected; one naming no group is taken to belong to `group`.
    pub fn into_expense(self, group: &GroupId) -> Result<Expense, LedgerError> {
        if let Some(found) = self.group_id {
            if &found != group {
                return Err(LedgerError::GroupMismatch {
                    record: "expense request".to_string(),
                    expected: group.clone(),
                    found,
                });
            }
        }

        let mut expense = Expense::new(group.clone(), self.paid_by, self.amount)
            .with_description(self.description)
            .excluding(self.exclude_members);
        if let Some(date) = self.date {
            expense = expense.with_date(date);
        }
        if let Some(context) = self.context.filter(|c| !c.trim().is_empty()) {
            expense = expense.with_notes(context);
        }
        if let Some(shares) = self.splits {
            expense = expense.with_exact_shares(shares);
        }
        Ok(expense)
    }
}

impl From<&Expense> for ExpenseRequest {
    fn from(expense: &Expense) -> Self {
        Self {
            amount: expense.amount(),
            description: expense.description().to_string(),
            date: Some(expense.date()),
            group_id: Some(expense.group_id().clone()),
            paid_by: expense.paid_by().clone(),
            context: expense.notes().map(str::to_string),
            exclude_members: expense.excluded().iter().cloned().collect(),
            splits: match expense.policy() {
                SplitPolicy::Equal => None,
                SplitPolicy::Exact(shares) => Some(shares.clone()),
            },
        }
    }
}

/// Body of `POST /api/shared/group/:id/pay`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRequest {
    pub from_user: MemberId,
    pub to_user: MemberId,
    pub amount: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub status: PaymentStatus,
}

impl PaymentRequest {
    /// Build the payment for `group`. A request arriving as settled or
    /// cancelled is walked through the normal pending transitions.
    pub fn into_payment(self, group: &GroupId) -> Result<Payment, LedgerError> {
        let mut payment = Payment::new(group.clone(), self.from_user, self.to_user, self.amount);
        if let Some(date) = self.date {
            payment = payment.with_date(date);
        }
        match self.status {
            PaymentStatus::Pending => {}
            PaymentStatus::Settled => payment.settle()?,
            PaymentStatus::Cancelled => payment.cancel()?,
        }
        Ok(payment)
    }
}

impl From<&Payment> for PaymentRequest {
    fn from(payment: &Payment) -> Self {
        Self {
            from_user: payment.from().clone(),
            to_user: payment.to().clone(),
            amount: payment.amount(),
            date: Some(payment.date()),
            status: payment.status(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_expense_request_from_frontend_json() {
        let body = r#"{
            "amount": 42.5,
            "description": "Groceries",
            "date": "2024-06-01",
            "group_id": 7,
            "paid_by": 1,
            "context": "",
            "excluded_members": [3]
        }"#;
        let request: ExpenseRequest = serde_json::from_str(body).unwrap();
        assert_eq!(request.amount, dec!(42.5));
        assert_eq!(request.exclude_members, vec![MemberId::new("3")]);

        let expense = request.into_expense(&GroupId::new("7")).unwrap();
        assert_eq!(expense.paid_by(), &MemberId::new("1"));
        assert!(expense.is_excluded(&MemberId::new("3")));
        assert_eq!(expense.notes(), None);
        assert_eq!(expense.date(), NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
    }

    #[test]
    fn test_expense_request_string_amount() {
        let body = r#"{"amount": "19.99", "paid_by": "u1", "exclude_members": ["u2"]}"#;
        let request: ExpenseRequest = serde_json::from_str(body).unwrap();
        assert_eq!(request.amount, dec!(19.99));
        assert!(request.group_id.is_none());
    }

    #[test]
    fn test_expense_request_wrong_group() {
        let body = r#"{"amount": 10, "paid_by": 1, "group_id": 8}"#;
        let request: ExpenseRequest = serde_json::from_str(body).unwrap();
        assert!(matches!(
            request.into_expense(&GroupId::new("7")),
            Err(LedgerError::GroupMismatch { .. })
        ));
    }

    #[test]
    fn test_expense_request_exact_splits() {
        let body = r#"{"amount": 10, "paid_by": 1, "splits": {"1": 4, "2": "6"}}"#;
        let request: ExpenseRequest = serde_json::from_str(body).unwrap();
        let expense = request.into_expense(&GroupId::new("g")).unwrap();
        match expense.policy() {
            SplitPolicy::Exact(shares) => {
                assert_eq!(shares[&MemberId::new("1")], dec!(4));
                assert_eq!(shares[&MemberId::new("2")], dec!(6));
            }
            SplitPolicy::Equal => panic!("expected exact shares"),
        }
    }

    #[test]
    fn test_payment_request_defaults_pending() {
        let body = r#"{"from_user": 2, "to_user": 1, "amount": 20, "date": "2024-06-02"}"#;
        let request: PaymentRequest = serde_json::from_str(body).unwrap();
        let payment = request.into_payment(&GroupId::new("g")).unwrap();
        assert_eq!(payment.status(), PaymentStatus::Pending);
        assert_eq!(payment.amount(), dec!(20));
    }

    #[test]
    fn test_payment_request_settled() {
        let body = r#"{"from_user": 2, "to_user": 1, "amount": 20, "status": "settled"}"#;
        let request: PaymentRequest = serde_json::from_str(body).unwrap();
        let payment = request.into_payment(&GroupId::new("g")).unwrap();
        assert!(payment.is_settled());
    }

    #[test]
    fn test_round_trip_through_expense() {
        let expense = Expense::new(GroupId::new("g"), MemberId::new("1"), dec!(12))
            .with_notes("taxi")
            .excluding([MemberId::new("2")]);
        let request = ExpenseRequest::from(&expense);
        assert_eq!(request.context.as_deref(), Some("taxi"));
        let rebuilt = request.into_expense(&GroupId::new("g")).unwrap();
        assert_eq!(rebuilt.amount(), expense.amount());
        assert_eq!(rebuilt.excluded(), expense.excluded());
    }
}
