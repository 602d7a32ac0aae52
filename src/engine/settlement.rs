use crate::core::balance::NetBalance;
use crate::core::error::LedgerError;
use crate::core::member::MemberId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One suggested transfer that pays down a debt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub from: MemberId,
    pub to: MemberId,
    pub amount: Decimal,
}

/// Produce a short list of transfers that squares every member.
///
/// Greedy: repeatedly match the member owed the most with the member who
/// owes the most and move the smaller of the two amounts. Ties go to the
/// lower member id, so the plan is deterministic. Each step zeroes at least
/// one member, giving at most `n - 1` transfers.
///
/// # Examples
///
/// ```
/// use divy_ledger::core::balance::NetBalance;
/// use divy_ledger::core::member::MemberId;
/// use divy_ledger::engine::settlement::simplify_debts;
/// use rust_decimal_macros::dec;
///
/// let mut balances = NetBalance::new();
/// balances.adjust(&MemberId::new("1"), dec!(-15)).unwrap();
/// balances.adjust(&MemberId::new("2"), dec!(5)).unwrap();
/// balances.adjust(&MemberId::new("3"), dec!(10)).unwrap();
///
/// let plan = simplify_debts(&balances);
/// assert_eq!(plan.len(), 2);
/// assert_eq!(plan[0].to, MemberId::new("3"));
/// assert_eq!(plan[0].amount, dec!(10));
/// ```
pub fn simplify_debts(balances: &NetBalance) -> Vec<Transfer> {
    let mut creditors = balances.creditors();
    let mut debtors = balances.debtors();
    let mut transfers = Vec::new();

    while let (Some(ci), Some(di)) = (largest(&creditors), largest(&debtors)) {
        let amount = creditors[ci].1.min(debtors[di].1);
        transfers.push(Transfer {
            from: debtors[di].0.clone(),
            to: creditors[ci].0.clone(),
            amount,
        });

        creditors[ci].1 -= amount;
        debtors[di].1 -= amount;
        creditors.retain(|(_, v)| *v > Decimal::ZERO);
        debtors.retain(|(_, v)| *v > Decimal::ZERO);
    }

    log::debug!(
        "settlement plan: {} transfers for {} outstanding",
        transfers.len(),
        balances.total_outstanding()
    );
    transfers
}

/// Index of the largest amount; the lowest id wins ties because the input
/// is in ascending id order and only a strictly larger amount replaces it.
fn largest(entries: &[(MemberId, Decimal)]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, (_, amount)) in entries.iter().enumerate() {
        match best {
            Some(b) if entries[b].1 >= *amount => {}
            _ => best = Some(i),
        }
    }
    best
}

/// Balances after every transfer in `plan` has been paid.
pub fn apply_plan(balances: &NetBalance, plan: &[Transfer]) -> Result<NetBalance, LedgerError> {
    let mut after = balances.clone();
    for transfer in plan {
        after.apply_transfer(&transfer.from, &transfer.to, transfer.amount)?;
    }
    Ok(after)
}
