//! A weekend trip: split a few expenses, settle one debt, and print the
//! transfers that square the group.

use divy_ledger::prelude::*;
use rust_decimal_macros::dec;
use std::collections::BTreeMap;

fn main() {
    println!("╔══════════════════════════════════════╗");
    println!("║  divy-ledger: Weekend Trip Example   ║");
    println!("╚══════════════════════════════════════╝\n");

    let ana = Member::new(1u64, "ana");
    let ben = Member::new(2u64, "ben");
    let caro = Member::new(3u64, "caro");
    let dev = Member::new(4u64, "dev");

    let group = Group::new(
        GroupId::new("lisbon-2024"),
        "Lisbon weekend",
        ana.clone(),
        vec![ben.clone(), caro.clone(), dev.clone()],
    )
    .with_currency(CurrencyCode::new("EUR"));
    let gid = group.id().clone();
    let mut ledger = GroupLedger::new(group);

    // --- Scenario 1: Equal split with a remainder ---
    println!("━━━ Scenario 1: Apartment, split four ways ━━━\n");
    let apartment = ledger
        .add_expense(
            Expense::new(gid.clone(), ana.id.clone(), dec!(301.00)).with_description("Apartment"),
        )
        .unwrap_or_else(|e| panic!("apartment: {}", e));
    println!("{}", apartment);

    // --- Scenario 2: Someone sits one out ---
    println!("━━━ Scenario 2: Wine tasting, dev skipped it ━━━\n");
    let wine = ledger
        .add_expense(
            Expense::new(gid.clone(), ben.id.clone(), dec!(100.00))
                .with_description("Wine tasting")
                .excluding([dev.id.clone()]),
        )
        .unwrap_or_else(|e| panic!("wine tasting: {}", e));
    println!("{}", wine);

    // --- Scenario 3: Shares entered by hand ---
    println!("━━━ Scenario 3: Taxi, split by distance ━━━\n");
    let mut shares = BTreeMap::new();
    shares.insert(caro.id.clone(), dec!(12.50));
    shares.insert(dev.id.clone(), dec!(27.50));
    let taxi = ledger
        .add_expense(
            Expense::new(gid.clone(), caro.id.clone(), dec!(40.00))
                .with_description("Taxi")
                .with_exact_shares(shares),
        )
        .unwrap_or_else(|e| panic!("taxi: {}", e));
    println!("{}", taxi);

    // --- Scenario 4: Payments ---
    println!("━━━ Scenario 4: dev pays ana back, ben's transfer is pending ━━━\n");
    let paid = ledger
        .record_payment(Payment::new(gid.clone(), dev.id.clone(), ana.id.clone(), dec!(50.00)))
        .unwrap_or_else(|e| panic!("payment: {}", e));
    ledger
        .settle_payment(paid)
        .unwrap_or_else(|e| panic!("settle: {}", e));
    ledger
        .record_payment(Payment::new(gid, ben.id.clone(), ana.id.clone(), dec!(20.00)))
        .unwrap_or_else(|e| panic!("payment: {}", e));

    let balances = ledger
        .net_balances()
        .unwrap_or_else(|e| panic!("balances: {}", e));
    println!("{}", balances);

    for member in ledger.group().members() {
        let position = balances.balance(&member.id);
        let status = if position > dec!(0) {
            "IS OWED"
        } else if position < dec!(0) {
            "OWES"
        } else {
            "SQUARE"
        };
        println!("  {:<8} {:>10} EUR  [{}]", member.username, position, status);
    }
    println!();

    // --- Scenario 5: Settle up ---
    println!("━━━ Scenario 5: Suggested transfers ━━━\n");
    for transfer in simplify_debts(&balances) {
        println!("  {} → {}: {} EUR", transfer.from, transfer.to, transfer.amount);
    }
}
