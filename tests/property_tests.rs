use divy_ledger::core::currency::CurrencyCode;
use divy_ledger::core::expense::Expense;
use divy_ledger::core::group::{Group, GroupId};
use divy_ledger::core::member::{Member, MemberId};
use divy_ledger::core::payment::Payment;
use divy_ledger::engine::balances::compute_net_balances;
use divy_ledger::engine::settlement::{apply_plan, simplify_debts};
use divy_ledger::engine::split::compute_split;
use proptest::prelude::*;
use rust_decimal::Decimal;

const GROUP: &str = "prop";

/// A group of 1..8 members with numeric ids.
fn arb_group() -> impl Strategy<Value = Group> {
    (1usize..8, prop::sample::select(vec!["USD", "JPY", "KWD"])).prop_map(|(size, currency)| {
        let members: Vec<Member> = (1..=size as u64)
            .map(|i| Member::new(MemberId::from(i), format!("m{}", i)))
            .collect();
        Group::new(
            GroupId::new(GROUP),
            "prop group",
            members[0].clone(),
            members[1..].to_vec(),
        )
        .with_currency(CurrencyCode::new(currency))
    })
}

/// Amount in minor units (1 to 10,000,000) for the group's currency.
fn amount_for(group: &Group, units: u64) -> Decimal {
    Decimal::from(units) * group.currency().minor_unit()
}

/// A valid expense for `group`: payer in the group, never self-excluded.
fn arb_expense(group: Group) -> impl Strategy<Value = (Group, Expense)> {
    let size = group.member_count() as u64;
    (
        1..=size,
        1u64..10_000_000,
        prop::collection::vec(any::<bool>(), size as usize),
    )
        .prop_map(move |(payer, units, exclude_mask)| {
            let payer = MemberId::from(payer);
            let excluded: Vec<MemberId> = group
                .member_ids()
                .zip(exclude_mask.iter())
                .filter(|(m, ex)| **ex && **m != payer)
                .map(|(m, _)| m.clone())
                .collect();
            let expense = Expense::new(GroupId::new(GROUP), payer, amount_for(&group, units))
                .excluding(excluded);
            (group.clone(), expense)
        })
}

/// A group together with valid expenses and payments.
fn arb_ledger() -> impl Strategy<Value = (Group, Vec<Expense>, Vec<Payment>)> {
    arb_group().prop_flat_map(|group| {
        let size = group.member_count() as u64;
        let expenses = prop::collection::vec(
            (1..=size, 1u64..1_000_000, any::<u8>()),
            0..30,
        );
        let payments = prop::collection::vec(
            (1..=size, 1..=size, 1u64..1_000_000, any::<bool>()),
            0..10,
        );
        (Just(group), expenses, payments)
    })
    .prop_map(|(group, raw_expenses, raw_payments)| {
        let expenses = raw_expenses
            .into_iter()
            .map(|(payer, units, mask)| {
                let payer = MemberId::from(payer);
                let excluded: Vec<MemberId> = group
                    .member_ids()
                    .enumerate()
                    .filter(|(i, m)| mask & (1u8 << (i % 8)) != 0 && **m != payer)
                    .map(|(_, m)| m.clone())
                    .collect();
                Expense::new(GroupId::new(GROUP), payer, amount_for(&group, units))
                    .excluding(excluded)
            })
            .collect();

        let payments = raw_payments
            .into_iter()
            .filter(|(from, to, _, _)| from != to)
            .map(|(from, to, units, settled)| {
                let mut payment = Payment::new(
                    GroupId::new(GROUP),
                    MemberId::from(from),
                    MemberId::from(to),
                    amount_for(&group, units),
                );
                if settled {
                    payment.settle().unwrap();
                }
                payment
            })
            .collect();

        (group, expenses, payments)
    })
}

proptest! {
    // ===================================================================
    // Signed split sums to zero; shares sum to the amount.
    // ===================================================================
    #[test]
    fn split_is_zero_sum((group, expense) in arb_group().prop_flat_map(arb_expense)) {
        let split = compute_split(&expense, &group).unwrap();
        prop_assert_eq!(split.total(), Decimal::ZERO);

        let shares: Decimal = split.shares().values().sum();
        prop_assert_eq!(shares, expense.amount());

        let owed_by_others: Decimal = split
            .shares()
            .iter()
            .filter(|(m, _)| *m != expense.paid_by())
            .map(|(_, s)| *s)
            .sum();
        prop_assert_eq!(owed_by_others, split.owed_to_payer());
    }

    // ===================================================================
    // Shares differ by at most one minor unit, larger shares go to
    // lower ids, and excluded members never appear.
    // ===================================================================
    #[test]
    fn equal_split_is_fair((group, expense) in arb_group().prop_flat_map(arb_expense)) {
        let split = compute_split(&expense, &group).unwrap();
        let unit = group.currency().minor_unit();
        let shares: Vec<Decimal> = split.shares().values().copied().collect();

        let max = shares.iter().copied().max().unwrap();
        let min = shares.iter().copied().min().unwrap();
        prop_assert!(max - min <= unit);

        for pair in shares.windows(2) {
            prop_assert!(pair[0] >= pair[1], "shares must not increase with member id");
        }
        for excluded in expense.excluded() {
            prop_assert!(!split.contains(excluded));
        }
        for share in &shares {
            prop_assert!(group.currency().is_representable(*share));
        }
    }

    // ===================================================================
    // Net balances always sum to exactly zero.
    // ===================================================================
    #[test]
    fn balances_are_zero_sum((group, expenses, payments) in arb_ledger()) {
        let balances = compute_net_balances(&group, &expenses, &payments).unwrap();
        prop_assert!(balances.is_balanced());
        prop_assert_eq!(balances.len(), group.member_count());
    }

    // ===================================================================
    // Computing balances is pure: same snapshot, same answer.
    // ===================================================================
    #[test]
    fn balances_are_idempotent((group, expenses, payments) in arb_ledger()) {
        let first = compute_net_balances(&group, &expenses, &payments).unwrap();
        let second = compute_net_balances(&group, &expenses, &payments).unwrap();
        prop_assert_eq!(first, second);
    }

    // ===================================================================
    // Pending payments never move balances.
    // ===================================================================
    #[test]
    fn pending_payments_are_ignored((group, expenses, payments) in arb_ledger()) {
        let settled_only: Vec<Payment> =
            payments.iter().filter(|p| p.is_settled()).cloned().collect();
        let all = compute_net_balances(&group, &expenses, &payments).unwrap();
        let settled = compute_net_balances(&group, &expenses, &settled_only).unwrap();
        prop_assert_eq!(all, settled);
    }

    // ===================================================================
    // The settlement plan squares everyone in at most n - 1 transfers.
    // ===================================================================
    #[test]
    fn settlement_plan_squares_group((group, expenses, payments) in arb_ledger()) {
        let balances = compute_net_balances(&group, &expenses, &payments).unwrap();
        let plan = simplify_debts(&balances);

        prop_assert!(plan.len() < group.member_count().max(1));
        for transfer in &plan {
            prop_assert!(transfer.amount > Decimal::ZERO);
            prop_assert!(transfer.from != transfer.to);
        }
        prop_assert!(apply_plan(&balances, &plan).unwrap().is_settled());
    }
}
