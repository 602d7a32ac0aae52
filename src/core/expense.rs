use crate::core::group::GroupId;
use crate::core::member::MemberId;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use uuid::Uuid;

pub type ExpenseId = Uuid;

/// How an expense is divided among its participants.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "shares")]
pub enum SplitPolicy {
    /// Everyone not excluded bears an equal share.
    #[default]
    Equal,
    /// Caller-supplied shares that must add up to the expense amount.
    Exact(BTreeMap<MemberId, Decimal>),
}

/// A shared expense paid by one member on behalf of a group.
///
/// Expenses are immutable once created; the only lifecycle event is
/// deletion. Amount and membership are not checked here but when the
/// expense is split against its group, so a deserialized expense goes
/// through the same validation as a freshly built one.
///
/// # Examples
///
/// ```
/// use divy_ledger::core::expense::Expense;
/// use divy_ledger::core::group::GroupId;
/// use divy_ledger::core::member::MemberId;
/// use rust_decimal_macros::dec;
///
/// let dinner = Expense::new(GroupId::new("trip"), MemberId::new("1"), dec!(84.50))
///     .with_description("Dinner")
///     .excluding([MemberId::new("3")]);
///
/// assert_eq!(dinner.amount(), dec!(84.50));
/// assert!(dinner.is_excluded(&MemberId::new("3")));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    id: ExpenseId,
    group_id: GroupId,
    paid_by: MemberId,
    amount: Decimal,
    date: NaiveDate,
    description: String,
    notes: Option<String>,
    #[serde(default)]
    excluded: BTreeSet<MemberId>,
    #[serde(default)]
    policy: SplitPolicy,
    created_at: DateTime<Utc>,
}

impl Expense {
    /// Create an equally split expense dated today.
    pub fn new(group_id: GroupId, paid_by: MemberId, amount: Decimal) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            group_id,
            paid_by,
            amount,
            date: now.date_naive(),
            description: String::new(),
            notes: None,
            excluded: BTreeSet::new(),
            policy: SplitPolicy::Equal,
            created_at: now,
        }
    }

    /// Replace the generated id (useful for testing / determinism).
    pub fn with_id(mut self, id: ExpenseId) -> Self {
        self.id = id;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
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

    /// Members who should not owe a share of this expense.
    pub fn excluding(mut self, members: impl IntoIterator<Item = MemberId>) -> Self {
        self.excluded.extend(members);
        self
    }

    /// Split by explicit per-member shares instead of equally.
    pub fn with_exact_shares(mut self, shares: BTreeMap<MemberId, Decimal>) -> Self {
        self.policy = SplitPolicy::Exact(shares);
        self
    }

    // --- Accessors ---

    pub fn id(&self) -> ExpenseId {
        self.id
    }

    pub fn group_id(&self) -> &GroupId {
        &self.group_id
    }

    pub fn paid_by(&self) -> &MemberId {
        &self.paid_by
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn excluded(&self) -> &BTreeSet<MemberId> {
        &self.excluded
    }

    pub fn is_excluded(&self, member: &MemberId) -> bool {
        self.excluded.contains(member)
    }

    pub fn policy(&self) -> &SplitPolicy {
        &self.policy
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
