//! divy-ledger CLI
//!
//! Split expenses and compute group balances from a ledger snapshot.
//!
//! # Usage
//!
//! ```bash
//! # Show how every expense splits
//! divy-ledger split --input trip.json
//!
//! # Net balances plus a simplified settlement plan, as JSON
//! divy-ledger balances --input trip.json --format json
//!
//! # Generate a random snapshot for testing
//! divy-ledger generate --members 6 --expenses 40 --output trip.json
//! ```

use divy_ledger::api::responses::{BalancesResponse, ErrorResponse, HistoryResponse, SplitResponse};
use divy_ledger::api::snapshot::LedgerSnapshot;
use divy_ledger::config::LedgerConfig;
use divy_ledger::core::currency::CurrencyCode;
use divy_ledger::core::error::LedgerError;
use divy_ledger::engine::ledger::GroupLedger;
use divy_ledger::engine::settlement::simplify_debts;
use divy_ledger::simulation::scenario::{generate_random_ledger, ScenarioConfig};
use serde::Serialize;
use std::fs;
use std::process;

fn print_usage() {
    eprintln!(
        r#"divy-ledger: expense splitting and group balances

USAGE:
    divy-ledger <COMMAND> [OPTIONS]

COMMANDS:
    split       Show how each expense in a snapshot splits
    balances    Net balances and a simplified settlement plan
    history     Expenses and payments, newest first (JSON)
    generate    Generate a random ledger snapshot (for testing)
    help        Show this message

OPTIONS (split, balances, history):
    --input <FILE>      Path to JSON snapshot file
    --format <FORMAT>   Output format: text (default) or json
    --currency <CODE>   Currency for groups that do not name one
    --no-simplify       Leave out the settlement plan (balances)

OPTIONS (generate):
    --members <N>       Number of members (default: 5)
    --expenses <N>      Number of expenses (default: 20)
    --payments <N>      Number of payments (default: 5)
    --currency <CODE>   Ledger currency (default: USD)
    --seed <N>          Seed for a reproducible ledger
    --output <FILE>     Write to file instead of stdout

ENVIRONMENT:
    DIVY_CURRENCY       Default currency (overridden by --currency)
    DIVY_SIMPLIFY       true/false, include settlement plan by default
    RUST_LOG            Log filter, e.g. RUST_LOG=divy_ledger=debug

EXAMPLES:
    divy-ledger split --input trip.json
    divy-ledger balances --input trip.json --format json
    divy-ledger generate --members 8 --expenses 60 --seed 7 --output trip.json"#
    );
}

struct ReportOptions {
    input_path: String,
    json: bool,
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", message);
    process::exit(1);
}

fn fail_ledger(err: &LedgerError, json: bool) -> ! {
    log::error!("{}", err);
    if json {
        print_json(&ErrorResponse::from(err));
        process::exit(1);
    }
    fail(err)
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => fail(format!("could not encode output: {}", e)),
    }
}

fn next_value(args: &[String], i: usize, flag: &str, expected: &str) -> String {
    args.get(i)
        .cloned()
        .unwrap_or_else(|| fail(format!("{} requires {}", flag, expected)))
}

fn parse_report_args(args: &[String], config: &mut LedgerConfig) -> ReportOptions {
    let mut input_path = None;
    let mut format = "text".to_string();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--input" => {
                i += 1;
                input_path = Some(next_value(args, i, "--input", "a file path"));
            }
            "--format" => {
                i += 1;
                format = next_value(args, i, "--format", "'text' or 'json'");
            }
            "--currency" => {
                i += 1;
                config.default_currency =
                    CurrencyCode::new(next_value(args, i, "--currency", "a currency code"));
            }
            "--no-simplify" => config.include_settlement_plan = false,
            other => fail(format!("Unknown option: {}", other)),
        }
        i += 1;
    }

    if format != "text" && format != "json" {
        fail(format!("unknown format '{}', expected 'text' or 'json'", format));
    }

    ReportOptions {
        input_path: input_path.unwrap_or_else(|| fail("--input <FILE> is required")),
        json: format == "json",
    }
}

fn load_ledger(options: &ReportOptions, config: &LedgerConfig) -> GroupLedger {
    let content = fs::read_to_string(&options.input_path).unwrap_or_else(|e| {
        fail(format!("reading file '{}': {}", options.input_path, e))
    });

    let snapshot: LedgerSnapshot = serde_json::from_str(&content).unwrap_or_else(|e| {
        eprintln!("Error parsing JSON: {}", e);
        eprintln!("Expected format:");
        eprintln!(
            r#"{{
  "group": {{ "id": 7, "name": "Trip", "created_by": 1,
             "members": [{{ "id": 1, "username": "ana" }}, {{ "id": 2, "username": "ben" }}] }},
  "expenses": [{{ "amount": "30.00", "paid_by": 1, "description": "Dinner" }}],
  "payments": [{{ "from_user": 2, "to_user": 1, "amount": "15.00", "status": "settled" }}]
}}"#
        );
        process::exit(1);
    });

    let ledger = snapshot
        .into_ledger(&config.default_currency)
        .unwrap_or_else(|e| fail_ledger(&e, options.json));
    log::info!(
        "loaded group {} with {} expenses and {} payments",
        ledger.group().id(),
        ledger.expenses().len(),
        ledger.payments().len()
    );
    ledger
}

fn cmd_split(args: &[String], mut config: LedgerConfig) {
    let options = parse_report_args(args, &mut config);
    let ledger = load_ledger(&options, &config);
    let splits = ledger
        .splits()
        .unwrap_or_else(|e| fail_ledger(&e, options.json));

    if options.json {
        let responses: Vec<SplitResponse> = splits.into_iter().map(SplitResponse::from).collect();
        print_json(&responses);
    } else {
        for (split, expense) in splits.iter().zip(ledger.expenses()) {
            if !expense.description().is_empty() {
                println!("{}", expense.description());
            }
            println!("{}", split);
        }
    }
}

fn cmd_balances(args: &[String], mut config: LedgerConfig) {
    let options = parse_report_args(args, &mut config);
    let ledger = load_ledger(&options, &config);

    if options.json {
        let mut response =
            BalancesResponse::from_ledger(&ledger).unwrap_or_else(|e| fail_ledger(&e, true));
        if !config.include_settlement_plan {
            response.simplified_transactions.clear();
        }
        print_json(&response);
        return;
    }

    let balances = ledger
        .net_balances()
        .unwrap_or_else(|e| fail_ledger(&e, false));
    println!("Group: {} ({})", ledger.group().name(), ledger.group().currency());
    println!("{}", balances);

    if config.include_settlement_plan {
        let plan = simplify_debts(&balances);
        if plan.is_empty() {
            println!("Everyone is settled up.");
        } else {
            println!("=== Suggested Transfers ===");
            for transfer in &plan {
                println!("  {} → {}: {}", transfer.from, transfer.to, transfer.amount);
            }
        }
    }
}

fn cmd_history(args: &[String], mut config: LedgerConfig) {
    let options = parse_report_args(args, &mut config);
    let ledger = load_ledger(&options, &config);
    print_json(&HistoryResponse::from(&ledger));
}

fn parse_count(args: &[String], i: usize, flag: &str) -> usize {
    args.get(i)
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| fail(format!("{} requires a number", flag)))
}

fn cmd_generate(args: &[String], config: LedgerConfig) {
    let mut scenario = ScenarioConfig {
        currency: config.default_currency,
        ..Default::default()
    };
    let mut output_path: Option<String> = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--members" => {
                i += 1;
                scenario.member_count = parse_count(args, i, "--members");
            }
            "--expenses" => {
                i += 1;
                scenario.expense_count = parse_count(args, i, "--expenses");
            }
            "--payments" => {
                i += 1;
                scenario.payment_count = parse_count(args, i, "--payments");
            }
            "--currency" => {
                i += 1;
                scenario.currency =
                    CurrencyCode::new(next_value(args, i, "--currency", "a currency code"));
            }
            "--seed" => {
                i += 1;
                scenario.seed = Some(parse_count(args, i, "--seed") as u64);
            }
            "--output" => {
                i += 1;
                output_path = Some(next_value(args, i, "--output", "a file path"));
            }
            other => fail(format!("Unknown option: {}", other)),
        }
        i += 1;
    }

    let ledger = generate_random_ledger(&scenario);
    let snapshot = LedgerSnapshot::from(&ledger);
    let json = serde_json::to_string_pretty(&snapshot)
        .unwrap_or_else(|e| fail(format!("could not encode snapshot: {}", e)));

    if let Some(path) = output_path {
        fs::write(&path, &json)
            .unwrap_or_else(|e| fail(format!("writing to '{}': {}", path, e)));
        eprintln!(
            "Generated {} expenses and {} payments across {} members → {}",
            ledger.expenses().len(),
            ledger.payments().len(),
            ledger.group().member_count(),
            path
        );
    } else {
        println!("{}", json);
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let config = LedgerConfig::from_env();
    let command = args[1].as_str();
    let rest = &args[2..];

    match command {
        "split" => cmd_split(rest, config),
        "balances" => cmd_balances(rest, config),
        "history" => cmd_history(rest, config),
        "generate" => cmd_generate(rest, config),
        "help" | "--help" | "-h" => print_usage(),
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            process::exit(1);
        }
    }
}
