//! Random group ledgers for load testing the engine.
//!
//! Generated ledgers are always valid: payers belong to the group, payers
//! are never excluded, and amounts sit on the currency's minor unit.

use crate::core::currency::CurrencyCode;
use crate::core::expense::Expense;
use crate::core::group::{Group, GroupId};
use crate::core::member::{Member, MemberId};
use crate::core::payment::Payment;
use crate::engine::ledger::GroupLedger;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Configuration for generating a random group ledger.
#[derive(Debug, Clone)]
pub struct ScenarioConfig {
    /// Number of members in the group.
    pub member_count: usize,
    /// Number of expenses to record.
    pub expense_count: usize,
    /// Number of payments to record.
    pub payment_count: usize,
    /// Currency the group keeps its ledger in.
    pub currency: CurrencyCode,
    /// Minimum expense amount.
    pub min_amount: Decimal,
    /// Maximum expense amount.
    pub max_amount: Decimal,
    /// Chance that a non-paying member sits out a given expense.
    pub exclusion_rate: f64,
    /// Chance that a generated payment is already settled.
    pub settled_rate: f64,
    /// Fixed seed for reproducible ledgers.
    pub seed: Option<u64>,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            member_count: 5,
            expense_count: 20,
            payment_count: 5,
            currency: CurrencyCode::default(),
            min_amount: Decimal::from(1),
            max_amount: Decimal::from(500),
            exclusion_rate: 0.2,
            settled_rate: 0.7,
            seed: None,
        }
    }
}

/// Generate a random group ledger.
pub fn generate_random_ledger(config: &ScenarioConfig) -> GroupLedger {
    match config.seed {
        Some(seed) => generate_with(config, &mut StdRng::seed_from_u64(seed)),
        None => generate_with(config, &mut rand::thread_rng()),
    }
}

/// Generate a random group ledger from the given source of randomness.
pub fn generate_with<R: Rng>(config: &ScenarioConfig, rng: &mut R) -> GroupLedger {
    let member_count = config.member_count.max(1);
    let members: Vec<Member> = (1..=member_count)
        .map(|i| Member::new(MemberId::from(i as u64), format!("member-{:03}", i)))
        .collect();
    let ids: Vec<MemberId> = members.iter().map(|m| m.id.clone()).collect();
    let group_id = GroupId::new("generated");

    let group = Group::new(
        group_id.clone(),
        "Generated group",
        members[0].clone(),
        members[1..].to_vec(),
    )
    .with_currency(config.currency.clone());
    let mut ledger = GroupLedger::new(group);

    let exclusion_rate = probability(config.exclusion_rate);
    let settled_rate = probability(config.settled_rate);
    let unit = config.currency.minor_unit();
    let min_units = (config.min_amount / unit).to_i64().unwrap_or(1).max(1);
    let max_units = (config.max_amount / unit).to_i64().unwrap_or(min_units).max(min_units);

    for _ in 0..config.expense_count {
        let payer = ids[rng.gen_range(0..ids.len())].clone();
        let amount = Decimal::from(rng.gen_range(min_units..=max_units)) * unit;
        let excluded: Vec<MemberId> = ids
            .iter()
            .filter(|m| **m != payer && rng.gen_bool(exclusion_rate))
            .cloned()
            .collect();

        let expense = Expense::new(group_id.clone(), payer, amount)
            .with_description("generated expense")
            .excluding(excluded);
        if let Err(e) = ledger.add_expense(expense) {
            log::warn!("generated expense rejected: {}", e);
        }
    }

    if ids.len() > 1 {
        for _ in 0..config.payment_count {
            let from = rng.gen_range(0..ids.len());
            let mut to = rng.gen_range(0..ids.len());
            while to == from {
                to = rng.gen_range(0..ids.len());
            }
            let amount = Decimal::from(rng.gen_range(min_units..=max_units)) * unit;

            let mut payment =
                Payment::new(group_id.clone(), ids[from].clone(), ids[to].clone(), amount);
            if rng.gen_bool(settled_rate) && payment.settle().is_err() {
                log::warn!("generated payment {} could not be settled", payment.id());
            }
            if let Err(e) = ledger.record_payment(payment) {
                log::warn!("generated payment rejected: {}", e);
            }
        }
    }

    ledger
}

/// Rates outside `[0, 1]` are clamped; NaN counts as never.
fn probability(rate: f64) -> f64 {
    if rate.is_nan() {
        0.0
    } else {
        rate.clamp(0.0, 1.0)
    }
}
