use crate::core::balance::unsigned_zero;
use crate::core::currency::CurrencyCode;
use crate::core::error::LedgerError;
use crate::core::expense::{Expense, ExpenseId, SplitPolicy};
use crate::core::group::Group;
use crate::core::member::MemberId;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

/// How one expense divides among its participants.
///
/// Holds both views of the same division:
///
/// - **shares**: what each participant bears, payer included, summing to
///   the expense amount;
/// - **signed amounts**: positive = owed to the member, negative = owed by
///   the member. Every non-payer participant is at `-share`, the payer is
///   at `amount - payer_share`, and the values sum to zero.
///
/// Excluded members appear in neither map. Serializes as the signed map,
/// which is the `splits` object of the expense endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split {
    expense_id: ExpenseId,
    payer: MemberId,
    amount: Decimal,
    shares: BTreeMap<MemberId, Decimal>,
    signed: BTreeMap<MemberId, Decimal>,
}

impl Split {
    fn from_shares(
        expense_id: ExpenseId,
        payer: MemberId,
        amount: Decimal,
        shares: BTreeMap<MemberId, Decimal>,
    ) -> Result<Self, LedgerError> {
        let mut signed: BTreeMap<MemberId, Decimal> = shares
            .iter()
            .filter(|(member, _)| **member != payer)
            .map(|(member, share)| (member.clone(), unsigned_zero(-*share)))
            .collect();
        let payer_share = shares.get(&payer).copied().unwrap_or(Decimal::ZERO);
        signed.insert(payer.clone(), unsigned_zero(amount - payer_share));

        let split = Self {
            expense_id,
            payer,
            amount,
            shares,
            signed,
        };

        let share_total: Decimal = split.shares.values().sum();
        if share_total != amount || split.total() != Decimal::ZERO {
            return Err(LedgerError::RoundingInvariantViolation(format!(
                "split of expense {} allocates {} of {} (signed total {})",
                expense_id,
                share_total,
                amount,
                split.total()
            )));
        }
        Ok(split)
    }

    // --- Accessors ---

    pub fn expense_id(&self) -> ExpenseId {
        self.expense_id
    }

    pub fn payer(&self) -> &MemberId {
        &self.payer
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// What each participant bears, in ascending member id order.
    pub fn shares(&self) -> &BTreeMap<MemberId, Decimal> {
        &self.shares
    }

    /// Signed amounts: positive = owed to the member.
    pub fn signed_amounts(&self) -> &BTreeMap<MemberId, Decimal> {
        &self.signed
    }

    pub fn share_of(&self, member: &MemberId) -> Option<Decimal> {
        self.shares.get(member).copied()
    }

    /// Signed amount for a member, `None` if the member is not part of the split.
    pub fn amount_for(&self, member: &MemberId) -> Option<Decimal> {
        self.signed.get(member).copied()
    }

    pub fn contains(&self, member: &MemberId) -> bool {
        self.signed.contains_key(member)
    }

    /// Sum of the signed amounts. Always zero for a split built by the engine.
    pub fn total(&self) -> Decimal {
        self.signed.values().sum()
    }

    /// What the other participants owe the payer in total.
    pub fn owed_to_payer(&self) -> Decimal {
        self.amount_for(&self.payer).unwrap_or(Decimal::ZERO)
    }
}

impl Serialize for Split {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.signed.serialize(serializer)
    }
}

impl std::fmt::Display for Split {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Expense {} ({} paid by {})", self.expense_id, self.amount, self.payer)?;
        for (member, signed) in &self.signed {
            let share = self.share_of(member).unwrap_or(Decimal::ZERO);
            writeln!(f, "  {:<12} share {:>10}  net {:>10}", member, share, signed)?;
        }
        Ok(())
    }
}

/// Largest amount a single expense, share or payment may carry
/// (one quadrillion major units).
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xA4C6_8000, 0x0003_8D7E, 0, false, 0);

/// Reject amounts outside `(0, MAX_AMOUNT]` and amounts finer than the
/// minor unit.
pub fn validate_amount(amount: Decimal, currency: &CurrencyCode) -> Result<(), LedgerError> {
    if amount <= Decimal::ZERO {
        return Err(LedgerError::NonPositiveAmount { amount });
    }
    if amount > MAX_AMOUNT {
        return Err(LedgerError::AmountTooLarge {
            amount,
            max: MAX_AMOUNT,
        });
    }
    if !currency.is_representable(amount) {
        return Err(LedgerError::PrecisionExceeded {
            amount,
            currency: currency.clone(),
        });
    }
    Ok(())
}

/// Divide `amount` equally at the currency's minor unit.
///
/// Each participant gets the share truncated toward zero; the leftover
/// minor units go one each to the lowest member ids, so the shares always
/// add back up to `amount` exactly.
///
/// # Examples
///
/// ```
/// use divy_ledger::core::currency::CurrencyCode;
/// use divy_ledger::core::member::MemberId;
/// use divy_ledger::engine::split::allocate_evenly;
/// use rust_decimal_macros::dec;
///
/// let members = [MemberId::new("3"), MemberId::new("1"), MemberId::new("2")];
/// let shares = allocate_evenly(dec!(10.00), &members, &CurrencyCode::new("USD")).unwrap();
///
/// assert_eq!(shares[&MemberId::new("1")], dec!(3.34));
/// assert_eq!(shares[&MemberId::new("2")], dec!(3.33));
/// assert_eq!(shares[&MemberId::new("3")], dec!(3.33));
/// ```
pub fn allocate_evenly(
    amount: Decimal,
    participants: &[MemberId],
    currency: &CurrencyCode,
) -> Result<BTreeMap<MemberId, Decimal>, LedgerError> {
    if participants.is_empty() {
        return Err(LedgerError::RoundingInvariantViolation(
            "cannot allocate across zero participants".to_string(),
        ));
    }

    let mut ordered = participants.to_vec();
    ordered.sort();
    ordered.dedup();

    let count = Decimal::from(ordered.len());
    let unit = currency.minor_unit();
    let base =
        (amount / count).round_dp_with_strategy(currency.minor_digits(), RoundingStrategy::ToZero);
    let leftover = amount - base * count;

    let extra_units = (leftover / unit)
        .to_usize()
        .filter(|n| *n < ordered.len() && Decimal::from(*n) * unit == leftover)
        .ok_or_else(|| {
            LedgerError::RoundingInvariantViolation(format!(
                "leftover {} of {} over {} participants is not a whole number of minor units",
                leftover,
                amount,
                ordered.len()
            ))
        })?;

    Ok(ordered
        .into_iter()
        .enumerate()
        .map(|(i, member)| {
            let share = if i < extra_units { base + unit } else { base };
            (member, share)
        })
        .collect())
}

/// Compute how one expense splits among the members of its group.
///
/// Participants are the group's members minus the expense's exclusions.
/// The payer must belong to the group and may not exclude themselves.
/// Pure: the same expense and group always give the same split.
pub fn compute_split(expense: &Expense, group: &Group) -> Result<Split, LedgerError> {
    let amount = expense.amount();
    let payer = expense.paid_by();

    validate_amount(amount, group.currency())?;
    if expense.group_id() != group.id() {
        return Err(LedgerError::GroupMismatch {
            record: format!("expense {}", expense.id()),
            expected: group.id().clone(),
            found: expense.group_id().clone(),
        });
    }
    group.require_member(payer)?;
    for member in expense.excluded() {
        group.require_member(member)?;
    }
    if expense.is_excluded(payer) {
        return Err(invalid(expense, "payer cannot be excluded from their own expense"));
    }

    let shares = match expense.policy() {
        SplitPolicy::Equal => {
            let participants: Vec<MemberId> = group
                .member_ids()
                .filter(|m| !expense.is_excluded(m))
                .cloned()
                .collect();
            if participants.is_empty() {
                return Err(invalid(expense, "no participants left after exclusions"));
            }
            allocate_evenly(amount, &participants, group.currency())?
        }
        SplitPolicy::Exact(shares) => exact_shares(expense, group, shares)?,
    };

    let split = Split::from_shares(expense.id(), payer.clone(), amount, shares)?;
    log::debug!(
        "split expense {} of {} across {} participants",
        expense.id(),
        amount,
        split.shares().len()
    );
    Ok(split)
}

fn exact_shares(
    expense: &Expense,
    group: &Group,
    shares: &BTreeMap<MemberId, Decimal>,
) -> Result<BTreeMap<MemberId, Decimal>, LedgerError> {
    if shares.is_empty() {
        return Err(invalid(expense, "exact split has no shares"));
    }
    for (member, share) in shares {
        group.require_member(member)?;
        if expense.is_excluded(member) {
            return Err(invalid(
                expense,
                &format!("excluded member {} cannot carry a share", member),
            ));
        }
        if *share < Decimal::ZERO {
            return Err(invalid(
                expense,
                &format!("share of {} is negative ({})", member, share),
            ));
        }
        if *share > expense.amount() {
            return Err(invalid(
                expense,
                &format!("share of {} ({}) exceeds the expense amount", member, share),
            ));
        }
        if !group.currency().is_representable(*share) {
            return Err(LedgerError::PrecisionExceeded {
                amount: *share,
                currency: group.currency().clone(),
            });
        }
    }

    let total = shares
        .values()
        .try_fold(Decimal::ZERO, |acc, share| acc.checked_add(*share))
        .ok_or_else(|| invalid(expense, "shares overflow when added up"))?;
    if total != expense.amount() {
        return Err(invalid(
            expense,
            &format!("shares add up to {}, expected {}", total, expense.amount()),
        ));
    }
    Ok(shares.clone())
}

fn invalid(expense: &Expense, reason: &str) -> LedgerError {
    log::warn!("rejecting expense {}: {}", expense.id(), reason);
    LedgerError::InvalidExpense {
        expense: expense.id(),
        reason: reason.to_string(),
    }
}
