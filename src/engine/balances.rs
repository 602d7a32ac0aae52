use crate::core::balance::NetBalance;
use crate::core::error::LedgerError;
use crate::core::expense::Expense;
use crate::core::group::Group;
use crate::core::payment::Payment;
use crate::engine::split::{compute_split, validate_amount, Split};

/// Fold one expense's split into running balances.
pub fn apply_split(balances: &mut NetBalance, split: &Split) -> Result<(), LedgerError> {
    for (member, amount) in split.signed_amounts() {
        balances.adjust(member, *amount)?;
    }
    Ok(())
}

/// Check that a payment can be recorded against `group`.
///
/// The amount must be positive and representable in the group's currency,
/// both parties must be members, and a member cannot pay themselves.
pub fn validate_payment(payment: &Payment, group: &Group) -> Result<(), LedgerError> {
    validate_amount(payment.amount(), group.currency())?;
    if payment.group_id() != group.id() {
        return Err(LedgerError::GroupMismatch {
            record: format!("payment {}", payment.id()),
            expected: group.id().clone(),
            found: payment.group_id().clone(),
        });
    }
    group.require_member(payment.from())?;
    group.require_member(payment.to())?;
    if payment.from() == payment.to() {
        return Err(LedgerError::InvalidPayment {
            payment: payment.id(),
            reason: format!("{} cannot pay themselves", payment.from()),
        });
    }
    Ok(())
}

/// Compute every member's net balance over a group's expenses and payments.
///
/// # Algorithm
///
/// 1. Start every member of the group at zero.
/// 2. Add each expense's signed split: the payer gains what the other
///    participants owe, each participant loses their share.
/// 3. Apply each **settled** payment: `from` gains the amount (their debt
///    shrinks), `to` loses it. Pending and cancelled payments are validated
///    but leave balances untouched.
///
/// The result always sums to exactly zero. The function is pure: calling it
/// twice on the same snapshot yields identical balances.
///
/// # Examples
///
/// ```
/// use divy_ledger::prelude::*;
/// use rust_decimal_macros::dec;
///
/// let group = Group::new(
///     GroupId::new("trip"),
///     "Trip",
///     Member::new("A", "ana"),
///     vec![Member::new("B", "ben"), Member::new("C", "caro")],
/// );
/// let expenses = vec![Expense::new(GroupId::new("trip"), MemberId::new("A"), dec!(30))];
///
/// let balances = compute_net_balances(&group, &expenses, &[]).unwrap();
/// assert_eq!(balances.balance(&MemberId::new("A")), dec!(20));
/// assert_eq!(balances.balance(&MemberId::new("B")), dec!(-10));
/// assert!(balances.is_balanced());
/// ```
pub fn compute_net_balances(
    group: &Group,
    expenses: &[Expense],
    payments: &[Payment],
) -> Result<NetBalance, LedgerError> {
    let mut balances = NetBalance::for_members(group.member_ids());

    for expense in expenses {
        let split = compute_split(expense, group)?;
        apply_split(&mut balances, &split)?;
    }

    let mut applied = 0usize;
    for payment in payments {
        validate_payment(payment, group)?;
        if payment.is_settled() {
            balances.apply_transfer(payment.from(), payment.to(), payment.amount())?;
            applied += 1;
        }
    }

    if !balances.is_balanced() {
        return Err(LedgerError::RoundingInvariantViolation(format!(
            "balances of group {} sum to {}",
            group.id(),
            balances.total()
        )));
    }

    log::debug!(
        "group {}: {} expenses, {}/{} payments settled, outstanding {}",
        group.id(),
        expenses.len(),
        applied,
        payments.len(),
        balances.total_outstanding()
    );
    Ok(balances)
}
