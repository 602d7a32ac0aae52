use criterion::{black_box, criterion_group, criterion_main, Criterion};
use divy_ledger::engine::balances::compute_net_balances;
use divy_ledger::engine::settlement::simplify_debts;
use divy_ledger::simulation::scenario::{generate_random_ledger, ScenarioConfig};

fn bench_balances_small_group(c: &mut Criterion) {
    let config = ScenarioConfig {
        member_count: 5,
        expense_count: 50,
        payment_count: 10,
        seed: Some(1),
        ..Default::default()
    };
    let ledger = generate_random_ledger(&config);

    c.bench_function("balances_5_members_50_expenses", |b| {
        b.iter(|| {
            compute_net_balances(
                black_box(ledger.group()),
                black_box(ledger.expenses()),
                black_box(ledger.payments()),
            )
        })
    });
}

fn bench_balances_large_group(c: &mut Criterion) {
    let config = ScenarioConfig {
        member_count: 100,
        expense_count: 5_000,
        payment_count: 500,
        seed: Some(2),
        ..Default::default()
    };
    let ledger = generate_random_ledger(&config);

    c.bench_function("balances_100_members_5000_expenses", |b| {
        b.iter(|| {
            compute_net_balances(
                black_box(ledger.group()),
                black_box(ledger.expenses()),
                black_box(ledger.payments()),
            )
        })
    });
}

fn bench_settlement_plan(c: &mut Criterion) {
    let config = ScenarioConfig {
        member_count: 500,
        expense_count: 2_000,
        payment_count: 0,
        seed: Some(3),
        ..Default::default()
    };
    let ledger = generate_random_ledger(&config);
    let balances = ledger.net_balances().expect("generated ledger is valid");

    c.bench_function("settlement_plan_500_members", |b| {
        b.iter(|| simplify_debts(black_box(&balances)))
    });
}

criterion_group!(
    benches,
    bench_balances_small_group,
    bench_balances_large_group,
    bench_settlement_plan
);
criterion_main!(benches);
