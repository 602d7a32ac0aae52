use crate::api::requests::{ExpenseRequest, PaymentRequest};
use crate::core::currency::CurrencyCode;
use crate::core::error::LedgerError;
use crate::core::group::{Group, GroupId};
use crate::core::member::{Member, MemberId};
use crate::engine::ledger::GroupLedger;
use serde::{Deserialize, Serialize};

/// The group part of a snapshot file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupInput {
    pub id: GroupId,
    pub name: String,
    pub created_by: MemberId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<CurrencyCode>,
    pub members: Vec<Member>,
}

/// A whole group ledger as plain JSON: the group plus its expense and
/// payment requests, in the same shapes the HTTP endpoints accept.
///
/// ```json
/// {
///   "group": { "id": 7, "name": "Trip", "created_by": 1,
///              "members": [{ "id": 1, "username": "ana" }, { "id": 2, "username": "ben" }] },
///   "expenses": [{ "amount": "30", "paid_by": 1, "description": "Dinner" }],
///   "payments": [{ "from_user": 2, "to_user": 1, "amount": "15", "status": "settled" }]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub group: GroupInput,
    #[serde(default)]
    pub expenses: Vec<ExpenseRequest>,
    #[serde(default)]
    pub payments: Vec<PaymentRequest>,
}

impl LedgerSnapshot {
    /// Replay the snapshot into a validated ledger. The first invalid
    /// expense or payment aborts the load.
    pub fn into_ledger(self, default_currency: &CurrencyCode) -> Result<GroupLedger, LedgerError> {
        let GroupInput {
            id,
            name,
            created_by,
            currency,
            members,
        } = self.group;

        let creator = members
            .iter()
            .find(|m| m.id == created_by)
            .cloned()
            .unwrap_or_else(|| Member::new(created_by.clone(), created_by.to_string()));
        let group = Group::new(id.clone(), name, creator, members)
            .with_currency(currency.unwrap_or_else(|| default_currency.clone()));

        let mut ledger = GroupLedger::new(group);
        for request in self.expenses {
            ledger.add_expense(request.into_expense(&id)?)?;
        }
        for request in self.payments {
            ledger.record_payment(request.into_payment(&id)?)?;
        }
        Ok(ledger)
    }
}

impl From<&GroupLedger> for LedgerSnapshot {
    fn from(ledger: &GroupLedger) -> Self {
        let group = ledger.group();
        Self {
            group: GroupInput {
                id: group.id().clone(),
                name: group.name().to_string(),
                created_by: group.created_by().clone(),
                currency: Some(group.currency().clone()),
                members: group.members().cloned().collect(),
            },
            expenses: ledger.expenses().iter().map(ExpenseRequest::from).collect(),
            payments: ledger.payments().iter().map(PaymentRequest::from).collect(),
        }
    }
}
