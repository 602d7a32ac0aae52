use crate::core::currency::CurrencyCode;
use crate::core::error::LedgerError;
use crate::core::member::{Member, MemberId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Identifier of an expense-sharing group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct GroupId(String);

impl GroupId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for GroupId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Same wire leniency as member ids: numbers and strings both accepted.
        let id = MemberId::deserialize(deserializer)?;
        Ok(Self(id.as_str().to_string()))
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for GroupId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// A group of members sharing expenses in one currency.
///
/// The member set is fixed when the group is created and always contains
/// the creator. Members are kept in ascending id order.
///
/// Groups serialize but never deserialize directly; loading goes through
/// `api::snapshot::LedgerSnapshot`, which rebuilds them with [`Group::new`].
///
/// # Examples
///
/// ```
/// use divy_ledger::core::group::{Group, GroupId};
/// use divy_ledger::core::member::{Member, MemberId};
///
/// let group = Group::new(
///     GroupId::new("trip"),
///     "Lisbon trip",
///     Member::new("1", "ana"),
///     vec![Member::new("2", "ben"), Member::new("3", "caro")],
/// );
///
/// assert_eq!(group.member_count(), 3);
/// assert!(group.contains(&MemberId::new("1")));
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct Group {
    id: GroupId,
    name: String,
    created_by: MemberId,
    members: BTreeMap<MemberId, Member>,
    currency: CurrencyCode,
    created_at: DateTime<Utc>,
}

impl Group {
    /// Create a group. The creator is added to the member set if absent.
    pub fn new(
        id: GroupId,
        name: impl Into<String>,
        creator: Member,
        members: impl IntoIterator<Item = Member>,
    ) -> Self {
        let created_by = creator.id.clone();
        let mut by_id = BTreeMap::new();
        by_id.insert(creator.id.clone(), creator);
        for member in members {
            by_id.entry(member.id.clone()).or_insert(member);
        }
        Self {
            id,
            name: name.into(),
            created_by,
            members: by_id,
            currency: CurrencyCode::default(),
            created_at: Utc::now(),
        }
    }

    /// Keep the ledger in a currency other than the default.
    pub fn with_currency(mut self, currency: CurrencyCode) -> Self {
        self.currency = currency;
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    // --- Accessors ---

    pub fn id(&self) -> &GroupId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn created_by(&self) -> &MemberId {
        &self.created_by
    }

    pub fn currency(&self) -> &CurrencyCode {
        &self.currency
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn contains(&self, member: &MemberId) -> bool {
        self.members.contains_key(member)
    }

    pub fn member(&self, id: &MemberId) -> Option<&Member> {
        self.members.get(id)
    }

    /// Members in ascending id order.
    pub fn members(&self) -> impl Iterator<Item = &Member> {
        self.members.values()
    }

    /// Member ids in ascending order.
    pub fn member_ids(&self) -> impl Iterator<Item = &MemberId> {
        self.members.keys()
    }

    /// Fail with `MemberNotInGroup` unless `member` belongs to this group.
    pub fn require_member(&self, member: &MemberId) -> Result<(), LedgerError> {
        if self.contains(member) {
            Ok(())
        } else {
            Err(LedgerError::MemberNotInGroup {
                member: member.clone(),
                group: self.id.clone(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_group() -> Group {
        Group::new(
            GroupId::new("g1"),
            "Flat",
            Member::new("3", "caro"),
            vec![Member::new("10", "dan"), Member::new("2", "ben")],
        )
    }

    #[test]
    fn test_creator_always_member() {
        let group = Group::new(GroupId::new("g"), "Solo", Member::new("1", "ana"), vec![]);
        assert_eq!(group.member_count(), 1);
        assert_eq!(group.created_by(), &MemberId::new("1"));
    }

    #[test]
    fn test_duplicate_members_collapse() {
        let group = Group::new(
            GroupId::new("g"),
            "Dupes",
            Member::new("1", "ana"),
            vec![Member::new("1", "ana"), Member::new("2", "ben"), Member::new("2", "ben")],
        );
        assert_eq!(group.member_count(), 2);
    }

    #[test]
    fn test_members_sorted_by_id() {
        let group = sample_group();
        let ids: Vec<&str> = group.member_ids().map(|m| m.as_str()).collect();
        assert_eq!(ids, vec!["2", "3", "10"]);
    }

    #[test]
    fn test_require_member() {
        let group = sample_group();
        assert!(group.require_member(&MemberId::new("10")).is_ok());
        let err = group.require_member(&MemberId::new("99")).unwrap_err();
        assert!(matches!(err, LedgerError::MemberNotInGroup { .. }));
    }

    #[test]
    fn test_group_id_from_number() {
        let id: GroupId = serde_json::from_str("12").unwrap();
        assert_eq!(id, GroupId::new("12"));
    }

    #[test]
    fn test_default_currency() {
        assert_eq!(sample_group().currency().as_str(), "USD");
        let jpy = sample_group().with_currency(CurrencyCode::new("JPY"));
        assert_eq!(jpy.currency().minor_digits(), 0);
    }
}
