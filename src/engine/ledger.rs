use crate::core::balance::NetBalance;
use crate::core::error::LedgerError;
use crate::core::expense::{Expense, ExpenseId};
use crate::core::group::Group;
use crate::core::payment::{Payment, PaymentId};
use crate::engine::balances::{compute_net_balances, validate_payment};
use crate::engine::settlement::{simplify_debts, Transfer};
use crate::engine::split::{compute_split, Split};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// One entry in a group's history, newest first.
#[derive(Debug, Clone, Copy)]
pub enum HistoryEntry<'a> {
    Expense(&'a Expense),
    Payment(&'a Payment),
}

impl HistoryEntry<'_> {
    pub fn created_at(&self) -> DateTime<Utc> {
        match self {
            HistoryEntry::Expense(e) => e.created_at(),
            HistoryEntry::Payment(p) => p.created_at(),
        }
    }
}

/// A consistent snapshot of one group's expenses and payments.
///
/// Every record is validated against the group on the way in, so the
/// balance computations over the snapshot cannot fail on bad input.
/// Mutations take `&mut self`; callers that share a ledger across threads
/// serialize writes per group themselves. Ledgers are written out as JSON
/// but only loaded back through `LedgerSnapshot::into_ledger`, which
/// replays every record through these checks.
///
/// # Examples
///
/// ```
/// use divy_ledger::prelude::*;
/// use rust_decimal_macros::dec;
///
/// let group = Group::new(
///     GroupId::new("flat"),
///     "Flat 4B",
///     Member::new("1", "ana"),
///     vec![Member::new("2", "ben")],
/// );
/// let mut ledger = GroupLedger::new(group);
///
/// ledger.add_expense(Expense::new(GroupId::new("flat"), MemberId::new("1"), dec!(50))).unwrap();
/// let payment = ledger
///     .record_payment(Payment::new(GroupId::new("flat"), MemberId::new("2"), MemberId::new("1"), dec!(25)))
///     .unwrap();
/// ledger.settle_payment(payment).unwrap();
///
/// assert!(ledger.net_balances().unwrap().is_settled());
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct GroupLedger {
    group: Group,
    expenses: Vec<Expense>,
    payments: Vec<Payment>,
}

impl GroupLedger {
    pub fn new(group: Group) -> Self {
        Self {
            group,
            expenses: Vec::new(),
            payments: Vec::new(),
        }
    }

    /// Validate and store an expense, returning how it splits.
    pub fn add_expense(&mut self, expense: Expense) -> Result<Split, LedgerError> {
        let split = compute_split(&expense, &self.group)?;
        log::info!(
            "group {}: expense {} of {} paid by {}",
            self.group.id(),
            expense.id(),
            expense.amount(),
            expense.paid_by()
        );
        self.expenses.push(expense);
        Ok(split)
    }

    /// Delete an expense. Its split disappears from every balance.
    pub fn remove_expense(&mut self, id: ExpenseId) -> Result<Expense, LedgerError> {
        let index = self
            .expenses
            .iter()
            .position(|e| e.id() == id)
            .ok_or(LedgerError::ExpenseNotFound(id))?;
        log::info!("group {}: expense {} deleted", self.group.id(), id);
        Ok(self.expenses.remove(index))
    }

    /// Validate and store a payment in whatever status it arrives with.
    pub fn record_payment(&mut self, payment: Payment) -> Result<PaymentId, LedgerError> {
        validate_payment(&payment, &self.group)?;
        let id = payment.id();
        log::info!(
            "group {}: payment {} of {} from {} to {} ({})",
            self.group.id(),
            id,
            payment.amount(),
            payment.from(),
            payment.to(),
            payment.status()
        );
        self.payments.push(payment);
        Ok(id)
    }

    pub fn settle_payment(&mut self, id: PaymentId) -> Result<(), LedgerError> {
        self.payment_mut(id)?.settle()
    }

    pub fn cancel_payment(&mut self, id: PaymentId) -> Result<(), LedgerError> {
        self.payment_mut(id)?.cancel()
    }

    fn payment_mut(&mut self, id: PaymentId) -> Result<&mut Payment, LedgerError> {
        self.payments
            .iter_mut()
            .find(|p| p.id() == id)
            .ok_or(LedgerError::PaymentNotFound(id))
    }

    /// The split of a stored expense.
    pub fn split_for(&self, id: ExpenseId) -> Result<Split, LedgerError> {
        let expense = self
            .expense(id)
            .ok_or(LedgerError::ExpenseNotFound(id))?;
        compute_split(expense, &self.group)
    }

    /// Splits of every stored expense, in insertion order.
    pub fn splits(&self) -> Result<Vec<Split>, LedgerError> {
        self.expenses
            .iter()
            .map(|e| compute_split(e, &self.group))
            .collect()
    }

    pub fn net_balances(&self) -> Result<NetBalance, LedgerError> {
        compute_net_balances(&self.group, &self.expenses, &self.payments)
    }

    /// Transfers that would square the group as it stands.
    pub fn settlement_plan(&self) -> Result<Vec<Transfer>, LedgerError> {
        Ok(simplify_debts(&self.net_balances()?))
    }

    /// Expenses and payments, newest first.
    pub fn history(&self) -> Vec<HistoryEntry<'_>> {
        let mut entries: Vec<HistoryEntry<'_>> = self
            .expenses
            .iter()
            .map(HistoryEntry::Expense)
            .chain(self.payments.iter().map(HistoryEntry::Payment))
            .collect();
        entries.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        entries
    }

    // --- Accessors ---

    pub fn group(&self) -> &Group {
        &self.group
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn payments(&self) -> &[Payment] {
        &self.payments
    }

    pub fn expense(&self, id: ExpenseId) -> Option<&Expense> {
        self.expenses.iter().find(|e| e.id() == id)
    }

    pub fn payment(&self, id: PaymentId) -> Option<&Payment> {
        self.payments.iter().find(|p| p.id() == id)
    }
}
