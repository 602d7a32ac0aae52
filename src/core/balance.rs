use crate::core::error::LedgerError;
use crate::core::member::MemberId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Net position of every member of a group.
///
/// A positive balance means the member is owed money (net creditor).
/// A negative balance means the member owes money (net debtor).
///
/// Serializes as the `net_balances` object of the balances endpoint:
/// `{ "<member id>": "<signed amount>" }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NetBalance {
    positions: BTreeMap<MemberId, Decimal>,
}

impl NetBalance {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start every listed member at zero.
    pub fn for_members<'a>(members: impl IntoIterator<Item = &'a MemberId>) -> Self {
        Self {
            positions: members
                .into_iter()
                .map(|m| (m.clone(), Decimal::ZERO))
                .collect(),
        }
    }

    /// Add a signed amount to a member's position.
    ///
    /// Fails with `Overflow` and leaves the position untouched when the
    /// result does not fit in a `Decimal`.
    pub fn adjust(&mut self, member: &MemberId, amount: Decimal) -> Result<(), LedgerError> {
        let position = self
            .positions
            .entry(member.clone())
            .or_insert(Decimal::ZERO);
        let next = position.checked_add(amount).ok_or_else(|| {
            LedgerError::Overflow(format!(
                "position of {} ({}) cannot absorb {}",
                member, position, amount
            ))
        })?;
        *position = unsigned_zero(next);
        Ok(())
    }

    /// Record that `from` handed `amount` to `to`: the payer's debt shrinks,
    /// the receiver is owed that much less. Applied to both sides or neither.
    pub fn apply_transfer(
        &mut self,
        from: &MemberId,
        to: &MemberId,
        amount: Decimal,
    ) -> Result<(), LedgerError> {
        if self.balance(to).checked_sub(amount).is_none() {
            return Err(LedgerError::Overflow(format!(
                "position of {} cannot give up {}",
                to, amount
            )));
        }
        self.adjust(from, amount)?;
        self.adjust(to, -amount)
    }

    /// Get the net position of a member. Unknown members are at zero.
    pub fn balance(&self, member: &MemberId) -> Decimal {
        self.positions
            .get(member)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// All positions in ascending member id order.
    pub fn iter(&self) -> impl Iterator<Item = (&MemberId, &Decimal)> {
        self.positions.iter()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Sum of all positions. Zero for any consistent group.
    pub fn total(&self) -> Decimal {
        self.positions.values().sum()
    }

    /// Every unit owed by someone is owed to someone else.
    pub fn is_balanced(&self) -> bool {
        self.total() == Decimal::ZERO
    }

    /// Whether every member is square.
    pub fn is_settled(&self) -> bool {
        self.positions.values().all(|v| v.is_zero())
    }

    /// Members who are owed money, with the amount owed to them.
    pub fn creditors(&self) -> Vec<(MemberId, Decimal)> {
        self.positions
            .iter()
            .filter(|(_, v)| **v > Decimal::ZERO)
            .map(|(m, v)| (m.clone(), *v))
            .collect()
    }

    /// Members who owe money, with the (positive) amount they owe.
    pub fn debtors(&self) -> Vec<(MemberId, Decimal)> {
        self.positions
            .iter()
            .filter(|(_, v)| **v < Decimal::ZERO)
            .map(|(m, v)| (m.clone(), v.abs()))
            .collect()
    }

    /// Total that still has to change hands to square the group.
    pub fn total_outstanding(&self) -> Decimal {
        // Sum positive positions only (equals the sum of |negative| positions)
        self.positions
            .values()
            .filter(|v| **v > Decimal::ZERO)
            .sum()
    }
}

/// Drop the sign of a zero so it never shows up as `-0.00` on the wire.
pub(crate) fn unsigned_zero(mut value: Decimal) -> Decimal {
    if value.is_zero() {
        value.set_sign_positive(true);
    }
    value
}

impl std::fmt::Display for NetBalance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Net Balances ===")?;
        for (member, amount) in &self.positions {
            let status = if *amount > Decimal::ZERO {
                "is owed"
            } else if *amount < Decimal::ZERO {
                "owes"
            } else {
                "settled"
            };
            writeln!(f, "  {:<12} {:>12}  {}", member, amount, status)?;
        }
        writeln!(f, "Outstanding: {}", self.total_outstanding())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn ids() -> Vec<MemberId> {
        vec![MemberId::new("A"), MemberId::new("B"), MemberId::new("C")]
    }

    #[test]
    fn test_members_start_at_zero() {
        let members = ids();
        let balances = NetBalance::for_members(&members);
        assert_eq!(balances.len(), 3);
        assert!(balances.is_settled());
        assert_eq!(balances.balance(&MemberId::new("B")), Decimal::ZERO);
    }

    #[test]
    fn test_transfer_moves_both_sides() {
        let members = ids();
        let mut balances = NetBalance::for_members(&members);
        balances.apply_transfer(&members[0], &members[1], dec!(20)).unwrap();

        assert_eq!(balances.balance(&members[0]), dec!(20));
        assert_eq!(balances.balance(&members[1]), dec!(-20));
        assert!(balances.is_balanced());
    }

    #[test]
    fn test_creditors_and_debtors() {
        let members = ids();
        let mut balances = NetBalance::for_members(&members);
        balances.adjust(&members[0], dec!(20)).unwrap();
        balances.adjust(&members[1], dec!(-15)).unwrap();
        balances.adjust(&members[2], dec!(-5)).unwrap();

        assert_eq!(balances.creditors(), vec![(members[0].clone(), dec!(20))]);
        assert_eq!(
            balances.debtors(),
            vec![(members[1].clone(), dec!(15)), (members[2].clone(), dec!(5))]
        );
        assert_eq!(balances.total_outstanding(), dec!(20));
        assert!(balances.is_balanced());
    }

    #[test]
    fn test_unbalanced_detected() {
        let mut balances = NetBalance::new();
        balances.adjust(&MemberId::new("A"), dec!(0.01)).unwrap();
        assert!(!balances.is_balanced());
    }

    #[test]
    fn test_serializes_as_flat_map() {
        let mut balances = NetBalance::new();
        balances.adjust(&MemberId::new("1"), dec!(-10.50)).unwrap();
        let json = serde_json::to_value(&balances).unwrap();
        assert_eq!(json["1"], "-10.50");
    }

    #[test]
    fn test_overflow_is_an_error() {
        let a = MemberId::new("A");
        let mut balances = NetBalance::new();
        balances.adjust(&a, Decimal::MAX).unwrap();

        assert!(matches!(
            balances.adjust(&a, Decimal::MAX),
            Err(LedgerError::Overflow(_))
        ));
        assert_eq!(balances.balance(&a), Decimal::MAX);
    }

    #[test]
    fn test_failed_transfer_leaves_both_sides() {
        let (a, b) = (MemberId::new("A"), MemberId::new("B"));
        let mut balances = NetBalance::new();
        balances.adjust(&b, Decimal::MIN).unwrap();

        assert!(balances.apply_transfer(&a, &b, dec!(1)).is_err());
        assert_eq!(balances.balance(&a), Decimal::ZERO);
        assert_eq!(balances.balance(&b), Decimal::MIN);
    }

    #[test]
    fn test_zero_position_is_unsigned() {
        let one = MemberId::new("1");
        let mut balances = NetBalance::new();
        balances.adjust(&one, dec!(0.01)).unwrap();
        balances.adjust(&one, dec!(-0.01)).unwrap();
        assert!(!balances.balance(&one).is_sign_negative());
        let json = serde_json::to_value(&balances).unwrap();
        assert_eq!(json["1"], "0.00");
    }
}
